use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use axum::{extract::Query, http::Uri, response::Html, routing::get, Router};
use monz0_api::auth::{AuthorizationCallback, CallbackReceiver, PendingAuthorization};
use monz0_api::AuthError;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};
use tracing::{instrument, Level};

use crate::console;

/// Receives the OAuth2 redirect on a local HTTP listener bound to the
/// redirect URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalReceiver {
    host: String,
    port: u16,
    path: String,
}

impl LocalReceiver {
    pub fn from_redirect_uri(redirect_uri: &str) -> Result<Self, AuthError> {
        let uri: Uri = redirect_uri
            .parse()
            .map_err(|e| AuthError::InvalidConfig(format!("redirect uri: {}", e)))?;

        let host = uri
            .host()
            .ok_or_else(|| AuthError::InvalidConfig("redirect uri has no host".to_string()))?
            .to_string();
        let port = uri.port_u16().unwrap_or(80);
        let path = match uri.path() {
            "" => "/".to_string(),
            path => path.to_string(),
        };

        Ok(Self { host, port, path })
    }
}

fn callback_error(e: impl ToString) -> AuthError {
    AuthError::Callback(e.to_string())
}

#[async_trait]
impl CallbackReceiver for LocalReceiver {
    #[instrument(skip(pending))]
    async fn receive(
        &self,
        pending: &PendingAuthorization,
    ) -> Result<AuthorizationCallback, AuthError> {
        let listener = TcpListener::bind((self.host.as_str(), self.port))
            .await
            .map_err(callback_error)?;

        self.receive_on(listener, pending).await
    }
}

impl LocalReceiver {
    async fn receive_on(
        &self,
        listener: TcpListener,
        pending: &PendingAuthorization,
    ) -> Result<AuthorizationCallback, AuthError> {
        let (callback_tx, callback_rx) = oneshot::channel();
        let callback_tx = Arc::new(Mutex::new(Some(callback_tx)));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = Router::new().route(
            &self.path,
            get(move |Query(params): Query<HashMap<String, String>>| {
                let callback_tx = callback_tx.clone();
                async move {
                    tracing::event!(Level::DEBUG, "received authorization callback");
                    if let Some(tx) = callback_tx.lock().await.take() {
                        let _ = tx.send(AuthorizationCallback::from_query(params));
                    }
                    Html("<h2>Authorisation received.</h2><p>You can close this window.</p>")
                }
            }),
        );

        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        console::print_authorization_url(pending);
        println!(
            "Waiting for the redirect on http://{}:{}{} ...",
            self.host, self.port, self.path
        );

        let callback = callback_rx.await.map_err(callback_error);
        let _ = shutdown_tx.send(());
        server.await.map_err(callback_error)?.map_err(callback_error)?;

        callback
    }
}
