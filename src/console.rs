use std::sync::OnceLock;

use async_trait::async_trait;
use monz0_api::auth::{AuthorizationCallback, CallbackReceiver, PendingAuthorization};
use monz0_api::AuthError;
use tokio::{
    io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin},
    sync::Mutex,
};

/// stdin is read through a single buffer so lines piped in together survive
/// from one prompt to the next
fn stdin() -> &'static Mutex<BufReader<Stdin>> {
    static STDIN: OnceLock<Mutex<BufReader<Stdin>>> = OnceLock::new();
    STDIN.get_or_init(|| Mutex::new(BufReader::new(io::stdin())))
}

/// Print `message` and read one trimmed line from stdin
pub async fn prompt(message: &str) -> io::Result<String> {
    let mut input = stdin().lock().await;
    ask(message, &mut io::stdout(), &mut *input).await
}

async fn ask<R, W>(message: &str, output: &mut W, input: &mut R) -> io::Result<String>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(message.as_bytes()).await?;
    output.flush().await?;

    let mut line = String::new();
    input.read_line(&mut line).await?;

    Ok(line.trim().to_string())
}

pub fn print_authorization_url(pending: &PendingAuthorization) {
    println!(
        "Visit the following URL to authorise access to your account:\n\n{}\n",
        pending.url()
    );
}

/// Receives the OAuth2 redirect by having the user paste it into the console
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReceiver;

#[async_trait]
impl CallbackReceiver for ConsoleReceiver {
    async fn receive(
        &self,
        pending: &PendingAuthorization,
    ) -> Result<AuthorizationCallback, AuthError> {
        print_authorization_url(pending);

        let redirect = prompt("Paste the URL you were redirected to: ")
            .await
            .map_err(|e| AuthError::Callback(e.to_string()))?;

        AuthorizationCallback::from_redirect(&redirect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_PROMPT: &str = "token: ";
    const REDIRECT_PROMPT: &str = "redirect: ";

    #[tokio::test]
    async fn consecutive_prompts_share_buffered_input() {
        let mut input: &[u8] = b"\nhttp://127.0.0.1:8080/callback?code=code_1&state=xyz\n";
        let mut output = Vec::new();

        let token = ask(TOKEN_PROMPT, &mut output, &mut input).await.unwrap();
        let redirect = ask(REDIRECT_PROMPT, &mut output, &mut input)
            .await
            .unwrap();

        assert_eq!(token, "");
        assert_eq!(
            redirect,
            "http://127.0.0.1:8080/callback?code=code_1&state=xyz"
        );
        assert_eq!(output, b"token: redirect: ");
    }

    #[tokio::test]
    async fn trims_pasted_token() {
        let mut input: &[u8] = b"  TOKEN \r\n";

        let token = ask(TOKEN_PROMPT, &mut Vec::new(), &mut input)
            .await
            .unwrap();

        assert_eq!(token, "TOKEN");
    }

    #[tokio::test]
    async fn end_of_input_reads_empty() {
        let mut input: &[u8] = b"";

        let line = ask(TOKEN_PROMPT, &mut Vec::new(), &mut input)
            .await
            .unwrap();

        assert_eq!(line, "");
    }
}
