mod common;

use std::sync::Arc;

use sms_spam_detector::server::serve;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::oneshot,
};

use common::SPAM_SCENARIO;

async fn request(addr: std::net::SocketAddr, method: &str, path: &str, body: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    response
}

#[tokio::test]
async fn test_serve_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, stop) = oneshot::channel::<()>();

    let server = tokio::spawn(serve(listener, Arc::new(common::detector()), async move {
        let _ = stop.await;
    }));

    let body = serde_json::json!({ "message": SPAM_SCENARIO }).to_string();
    let response = request(addr, "POST", "/api/predict", &body).await;

    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.contains("content-type: application/json"));
    assert!(response.contains(r#""prediction":"spam""#));
    assert!(response.contains(r#""is_spam":true"#));

    let response = request(addr, "POST", "/api/predict", r#"{"message":"  "}"#).await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request"), "{response}");
    assert!(response.contains("No message provided"));

    let response = request(addr, "GET", "/api/health", "").await;
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains(r#""status":"healthy""#));

    let response = request(addr, "GET", "/missing", "").await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found"));

    shutdown.send(()).unwrap();
    server.await.unwrap().unwrap();
}
