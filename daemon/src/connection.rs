use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::handlers;
use crate::protocol::{encode, ErrorResponse, Reply, Request, AUTH_REQUIRED, INVALID_PARAMS, METHOD_AUTH};
use crate::state::{ClientId, DaemonState};

const AUTH_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle a single client connection
pub async fn handle_client(stream: TcpStream, state: Arc<DaemonState>) {
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    info!("Client connected: {peer}");

    let client_id = state.register_client().await;
    debug!("Assigned client_id={client_id} to {peer}");

    let (reader, writer) = stream.into_split();
    if let Err(e) = serve(reader, writer, state, client_id).await {
        debug!("Client {peer} error: {e}");
    }

    info!("Client disconnected: {peer}");
}

/// Run the auth phase, then answer requests until EOF.
pub async fn serve<R, W>(
    reader: R,
    mut writer: W,
    state: Arc<DaemonState>,
    client_id: ClientId,
) -> Result<(), String>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);

    if state.token.is_some() {
        match timeout(AUTH_TIMEOUT, wait_for_auth(&mut reader, &mut writer, &state)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                debug!("Auth error: {e}");
                return Err(e);
            }
            Err(_) => {
                warn!("Auth timeout for client {client_id}");
                return Err("Auth timeout".to_string());
            }
        }
    }

    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break, // EOF
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let reply = process_request(trimmed, state.clone(), client_id).await;
                write_line(&mut writer, &reply).await?;
            }
            Err(e) => {
                debug!("Read error: {e}");
                break;
            }
        }
    }

    Ok(())
}

/// Wait for a successful auth request. Failed attempts may be retried.
async fn wait_for_auth<R, W>(
    reader: &mut BufReader<R>,
    writer: &mut W,
    state: &DaemonState,
) -> Result<(), String>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => return Err("Connection closed".to_string()),
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let request: Request = match serde_json::from_str(trimmed) {
                    Ok(r) => r,
                    Err(e) => {
                        let resp = ErrorResponse::new(0, INVALID_PARAMS, format!("Invalid JSON: {e}"));
                        write_line(writer, &resp).await?;
                        continue;
                    }
                };

                if request.method != METHOD_AUTH {
                    let resp = ErrorResponse::new(
                        request.id,
                        AUTH_REQUIRED,
                        "Authentication required. Send auth request first.",
                    );
                    write_line(writer, &resp).await?;
                    continue;
                }

                let reply = handlers::auth::handle(&request, state);
                write_line(writer, &reply).await?;
                if !reply.is_error() {
                    return Ok(());
                }
            }
            Err(e) => return Err(format!("Read error: {e}")),
        }
    }
}

/// Process a single request line
async fn process_request(line: &str, state: Arc<DaemonState>, client_id: ClientId) -> Reply {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => handlers::dispatch(&request, state, client_id).await,
        Err(e) => ErrorResponse::new(0, INVALID_PARAMS, format!("Invalid JSON: {e}")).into(),
    }
}

async fn write_line<W, T>(writer: &mut W, response: &T) -> Result<(), String>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut line = encode(response);
    line.push('\n');
    writer
        .write_all(line.as_bytes())
        .await
        .map_err(|e| format!("Failed to write response: {e}"))?;
    writer
        .flush()
        .await
        .map_err(|e| format!("Failed to flush response: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::state;
    use kale_rok_client::mock::MockRokClient;
    use serde_json::{json, Value};
    use tokio::io::{duplex, split, DuplexStream, ReadHalf, WriteHalf};
    use tokio::task::JoinHandle;

    struct Client {
        reader: BufReader<ReadHalf<DuplexStream>>,
        writer: WriteHalf<DuplexStream>,
        server: JoinHandle<Result<(), String>>,
    }

    impl Client {
        fn connect(state: Arc<DaemonState>) -> Self {
            let (client, server) = duplex(64 * 1024);
            let (server_read, server_write) = split(server);
            let server = tokio::spawn(serve(server_read, server_write, state, 1));
            let (reader, writer) = split(client);
            Self {
                reader: BufReader::new(reader),
                writer,
                server,
            }
        }

        async fn call(&mut self, request: Value) -> Value {
            self.send_raw(&request.to_string()).await
        }

        async fn send_raw(&mut self, line: &str) -> Value {
            self.writer
                .write_all(format!("{line}\n").as_bytes())
                .await
                .expect("write");
            let mut response = String::new();
            self.reader.read_line(&mut response).await.expect("read");
            serde_json::from_str(&response).expect("response json")
        }
    }

    #[tokio::test]
    async fn requires_auth_before_requests() {
        let rok = MockRokClient::new().with_task("t1", json!({"id": "t1"}));
        let mut client = Client::connect(state(Some("secret"), rok));

        let resp = client
            .call(json!({"id": 1, "method": "rok.get_task", "params": {"task_id": "t1"}}))
            .await;
        assert_eq!(resp["error"]["code"], json!("auth_required"));

        let resp = client
            .call(json!({"id": 2, "method": "auth", "params": {"token": "wrong"}}))
            .await;
        assert_eq!(resp["error"]["code"], json!("auth_failed"));

        let resp = client
            .call(json!({"id": 3, "method": "auth", "params": {"token": "secret"}}))
            .await;
        assert_eq!(resp, json!({"id": 3, "result": {"ok": true}}));

        let resp = client
            .call(json!({"id": 4, "method": "rok.get_task", "params": {"task_id": "t1"}}))
            .await;
        assert_eq!(resp, json!({"id": 4, "result": {"id": "t1"}}));
    }

    #[tokio::test]
    async fn serves_without_auth_when_disabled() {
        let rok = MockRokClient::new().with_task("t1", json!({"id": "t1"}));
        let mut client = Client::connect(state(None, rok));

        let resp = client
            .call(json!({"id": 7, "method": "rok.get_task", "params": {"task_id": "t1"}}))
            .await;
        assert_eq!(resp["result"], json!({"id": "t1"}));
    }

    #[tokio::test]
    async fn invalid_json_gets_error_and_connection_survives() {
        let mut client = Client::connect(state(None, MockRokClient::new()));

        let resp = client.send_raw("{not json").await;
        assert_eq!(resp["id"], json!(0));
        assert_eq!(resp["error"]["code"], json!("invalid_params"));

        let resp = client
            .call(json!({"id": 2, "method": "auth", "params": {"token": "x"}}))
            .await;
        assert_eq!(resp["result"]["ok"], json!(true));
    }

    #[tokio::test]
    async fn server_stops_on_eof() {
        let client = Client::connect(state(None, MockRokClient::new()));
        let Client {
            reader,
            writer,
            server,
        } = client;
        drop(writer);
        drop(reader);
        assert!(server.await.expect("join").is_ok());
    }

    #[tokio::test]
    async fn closing_during_auth_is_an_error() {
        let client = Client::connect(state(Some("secret"), MockRokClient::new()));
        let Client {
            reader,
            writer,
            server,
        } = client;
        drop(writer);
        drop(reader);
        assert_eq!(
            server.await.expect("join").unwrap_err(),
            "Connection closed"
        );
    }
}
