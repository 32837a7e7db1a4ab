use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::Transport;
use crate::RequestError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Request {
    Get {
        path: String,
        query: Vec<(String, String)>,
    },
    Put {
        path: String,
        body: Value,
    },
}

/// A [`Transport`] that replays canned responses and records every request
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<Result<Value, RequestError>>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn respond(self, response: Result<Value, RequestError>) -> Self {
        self.queue(response);
        self
    }

    pub fn ok(self, body: Value) -> Self {
        self.respond(Ok(body))
    }

    pub fn queue(&self, response: Result<Value, RequestError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn next(&self) -> Result<Value, RequestError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no response queued")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, RequestError> {
        self.requests.lock().unwrap().push(Request::Get {
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        });
        self.next()
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, RequestError> {
        self.requests.lock().unwrap().push(Request::Put {
            path: path.to_string(),
            body: body.clone(),
        });
        self.next()
    }
}

/// Serve `router` on an ephemeral loopback port, returning its base URL
pub(crate) async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{}", address)
}
