// HTTP client tests — MastodonClient against local listeners.
//
// Each listener answers exactly one request with a canned response. Enough to
// check how the user stream authenticates, including across the redirect a
// web host sends to its separate streaming host.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use tusk::mastodon::api::MastodonApi;
use tusk::mastodon::client::{Credentials, MastodonClient};
use tusk::mastodon::models::StreamItem;

async fn within<F: Future>(fut: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(5), fut)
        .await
        .expect("timed out")
}

async fn bind() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

fn credentials(port: u16, token: &str) -> Credentials {
    Credentials {
        instance: format!("http://127.0.0.1:{port}"),
        access_token: token.to_string(),
        ..Credentials::default()
    }
}

/// Read one request head (request line plus headers).
async fn read_head(socket: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head).into_owned()
}

/// A streaming host: 401 unless `token` is in the query string, otherwise a
/// heartbeat and one `delete` event, then the connection closes.
fn spawn_streaming_host(listener: TcpListener, token: &'static str) -> JoinHandle<String> {
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let head = read_head(&mut socket).await;

        let request_line = head.lines().next().unwrap_or_default();
        let authorized = request_line.contains(&format!("access_token={token}"));
        let response = if authorized {
            "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n\
             :thump\n\nevent: delete\ndata: 42\n\n"
        } else {
            "HTTP/1.1 401 Unauthorized\r\nContent-Length: 12\r\nConnection: close\r\n\r\nunauthorized"
        };
        socket.write_all(response.as_bytes()).await.unwrap();
        head
    })
}

/// A web host that moves the request to `localhost:<streaming_port>`,
/// keeping path and query.
fn spawn_web_host(listener: TcpListener, streaming_port: u16) -> JoinHandle<String> {
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let head = read_head(&mut socket).await;

        let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
        let response = format!(
            "HTTP/1.1 301 Moved Permanently\r\nLocation: http://localhost:{streaming_port}{target}\r\n\
             Content-Length: 0\r\nConnection: close\r\n\r\n"
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        head
    })
}

#[tokio::test]
async fn user_stream_authenticates_after_redirect_to_streaming_host() {
    let (streaming, streaming_port) = bind().await;
    let (web, web_port) = bind().await;
    let streaming_host = spawn_streaming_host(streaming, "tok");
    let web_host = spawn_web_host(web, streaming_port);

    let client = MastodonClient::new(credentials(web_port, "tok")).unwrap();
    let mut stream = within(client.user_stream()).await.unwrap();

    let item = within(stream.recv()).await.expect("one item").unwrap();
    assert!(matches!(item, StreamItem::Other { event } if event == "delete"));
    // Server hung up
    assert!(within(stream.recv()).await.is_none());

    let web_head = within(web_host).await.unwrap();
    assert!(web_head.starts_with("GET /api/v1/streaming/user?access_token=tok "));
    assert!(web_head.to_ascii_lowercase().contains("authorization: bearer tok"));

    let streaming_head = within(streaming_host).await.unwrap();
    assert!(streaming_head.starts_with("GET /api/v1/streaming/user?access_token=tok "));
    assert!(streaming_head.contains(&format!("localhost:{streaming_port}")));
}

#[tokio::test]
async fn user_stream_rejection_reports_the_status() {
    let (streaming, port) = bind().await;
    let streaming_host = spawn_streaming_host(streaming, "tok");

    let client = MastodonClient::new(credentials(port, "wrong")).unwrap();
    let err = match within(client.user_stream()).await {
        Ok(_) => panic!("stream should be rejected"),
        Err(e) => e,
    };

    let message = format!("{err:#}");
    assert!(message.contains("Failed to open user stream"), "{message}");
    assert!(message.contains("401"), "{message}");
    within(streaming_host).await.unwrap();
}
