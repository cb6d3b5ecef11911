use std::time::Duration;

use ai_desk::core::text::{
    CHAT_NETWORK_FAILURE, CHAT_UNAVAILABLE, DOWNLOAD_FILENAME,
};
use ai_desk::core::transcript::Message;
use ai_desk::core::{ChatBuilder, GeneratorBuilder};
use ai_desk::http::HttpConfigBuilder;
use ai_desk::surface::DirectorySink;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const KEY: &str = "ai-service-secret-token";

/// A tiny stand-in for the AI service. It checks the key and echoes the
/// input back, one request per connection.
async fn spawn_service() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(handle(stream));
        }
    });
    base_url
}

async fn handle(mut stream: TcpStream) {
    let mut raw = Vec::new();
    let mut buf = [0u8; 1024];
    let (head, body) = loop {
        let n = stream.read(&mut buf).await.unwrap();
        if n == 0 {
            return;
        }
        raw.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&raw).into_owned();
        let Some(head_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let head = text[..head_end].to_ascii_lowercase();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| *name == "content-length")
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if raw.len() >= head_end + 4 + content_length {
            break (head, text[head_end + 4..].to_owned());
        }
    };

    let authorized = head.contains(&format!("x-api-key: {KEY}"));
    let payload: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let (status, reply) = if !authorized {
        ("403 Forbidden", json!({ "detail": "Could not validate credentials" }))
    } else if head.starts_with("post /api/ai/chatbot ") {
        let msg = payload["message"].as_str().unwrap_or_default();
        ("200 OK", json!({ "message": format!("echo: {msg}") }))
    } else if head.starts_with("post /api/ai/generator ") {
        let prompt = payload["prompt"].as_str().unwrap_or_default();
        ("200 OK", json!({ "result": format!("generated: {prompt}") }))
    } else {
        ("404 Not Found", json!({ "detail": "not found" }))
    };

    let reply = reply.to_string();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{reply}",
        reply.len()
    );
    stream.write_all(response.as_bytes()).await.ok();
    stream.shutdown().await.ok();
}

fn quiet_chat(builder: ChatBuilder) -> ai_desk::core::Chat {
    builder.with_welcome_delay(Duration::from_secs(3600)).build()
}

#[tokio::test]
async fn test_chat_round_trip() {
    let base_url = spawn_service().await;
    let client = ai_desk::connect(
        HttpConfigBuilder::with_api_key(KEY)
            .with_base_url(base_url)
            .build(),
    );
    let chat = quiet_chat(ChatBuilder::with_client(client));

    chat.submit("hello").unwrap().await.unwrap();
    assert_eq!(
        chat.transcript().messages(),
        [Message::user("hello"), Message::assistant("echo: hello")]
    );
}

#[tokio::test]
async fn test_chat_with_wrong_key() {
    let base_url = spawn_service().await;
    let client = ai_desk::connect(
        HttpConfigBuilder::with_api_key("guessed")
            .with_base_url(base_url)
            .build(),
    );
    let chat = quiet_chat(ChatBuilder::with_client(client));

    chat.submit("hello").unwrap().await.unwrap();
    assert_eq!(
        chat.transcript().last(),
        Some(&Message::assistant(CHAT_UNAVAILABLE))
    );
}

#[tokio::test]
async fn test_chat_without_service() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = ai_desk::connect(
        HttpConfigBuilder::default().with_base_url(base_url).build(),
    );
    let chat = quiet_chat(ChatBuilder::with_client(client));

    chat.submit("hello").unwrap().await.unwrap();
    assert_eq!(
        chat.transcript().last(),
        Some(&Message::assistant(CHAT_NETWORK_FAILURE))
    );
}

#[tokio::test]
async fn test_generate_and_download() {
    let base_url = spawn_service().await;
    let client = ai_desk::connect(
        HttpConfigBuilder::default().with_base_url(base_url).build(),
    );
    let generator = GeneratorBuilder::with_client(client).build();

    generator.generate("a haiku").unwrap().await.unwrap();
    assert_eq!(generator.view().result, "generated: a haiku");

    let dir = tempfile::tempdir().unwrap();
    let path = generator
        .download_result(&DirectorySink::new(dir.path()))
        .unwrap();
    assert_eq!(path, dir.path().join(DOWNLOAD_FILENAME));
    assert_eq!(
        std::fs::read_to_string(path).unwrap(),
        "generated: a haiku"
    );
}
