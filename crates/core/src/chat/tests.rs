use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ai_desk_test_transport::{PresetReply, TestTransport};
use serde_json::json;
use tokio::time::sleep;

use super::*;
use crate::transcript::Origin;

/// Builds a chat whose welcome message won't show up during a test.
fn quiet_chat(transport: &TestTransport) -> Chat {
    ChatBuilder::with_transport(transport.clone())
        .with_welcome_delay(Duration::from_secs(3600))
        .build()
}

#[tokio::test(start_paused = true)]
async fn test_user_message_before_reply() {
    let mut transport =
        TestTransport::with_replies([PresetReply::chat_message("hi")]);
    transport.set_delay(Duration::from_secs(2));
    let chat = quiet_chat(&transport);

    let task = chat.submit("  hello there \n").unwrap();
    assert_eq!(chat.transcript().messages(), [Message::user("hello there")]);
    assert_eq!(chat.stage(), ChatStage::AwaitingResponse);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].endpoint, "/api/ai/chatbot");
    assert_eq!(requests[0].payload, Some(json!({ "message": "hello there" })));

    task.await.unwrap();
    let transcript = chat.transcript();
    assert_eq!(transcript.len(), 2);
    let reply = transcript.last().unwrap();
    assert_eq!(reply.text(), "hi");
    assert_eq!(reply.origin(), Origin::Assistant);
    assert_eq!(chat.stage(), ChatStage::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_blank_input_is_ignored() {
    let transport = TestTransport::default();
    let chat = quiet_chat(&transport);

    for input in ["", "   ", "\t\n"] {
        assert!(chat.submit(input).is_none());
    }
    assert!(chat.transcript().is_empty());
    assert_eq!(transport.request_count(), 0);
    assert_eq!(chat.stage(), ChatStage::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_reply_fallbacks() {
    let transport = TestTransport::with_replies([
        PresetReply::Json(json!({})),
        PresetReply::chat_message(""),
        PresetReply::Json(json!({ "message": 42 })),
    ]);
    let chat = quiet_chat(&transport);

    for _ in 0..3 {
        chat.submit("ping").unwrap().await.unwrap();
        let transcript = chat.transcript();
        assert_eq!(
            transcript.last(),
            Some(&Message::assistant(CHAT_FALLBACK_REPLY))
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_failures() {
    let transport = TestTransport::with_replies([
        PresetReply::Status(403),
        PresetReply::NetworkFailure,
    ]);
    let chat = quiet_chat(&transport);

    chat.submit("one").unwrap().await.unwrap();
    assert_eq!(
        chat.transcript().last(),
        Some(&Message::assistant(CHAT_UNAVAILABLE))
    );
    assert_eq!(chat.stage(), ChatStage::Idle);

    chat.submit("two").unwrap().await.unwrap();
    assert_eq!(
        chat.transcript().last(),
        Some(&Message::assistant(CHAT_NETWORK_FAILURE))
    );
    assert_eq!(chat.stage(), ChatStage::Idle);
    assert_eq!(chat.transcript().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_clear() {
    let transport =
        TestTransport::with_replies([PresetReply::chat_message("hi")]);
    let chat = quiet_chat(&transport);

    chat.submit("hello").unwrap().await.unwrap();
    assert_eq!(chat.transcript().len(), 2);

    chat.clear();
    assert_eq!(
        chat.transcript().messages(),
        [Message::assistant(CLEARED_MESSAGE)]
    );

    chat.clear();
    assert_eq!(chat.transcript().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_clear_keeps_requests_in_flight() {
    let mut transport =
        TestTransport::with_replies([PresetReply::chat_message("late")]);
    transport.set_delay(Duration::from_secs(1));
    let chat = quiet_chat(&transport);

    let task = chat.submit("hello").unwrap();
    chat.clear();
    assert_eq!(chat.stage(), ChatStage::AwaitingResponse);

    task.await.unwrap();
    assert_eq!(
        chat.transcript().messages(),
        [Message::assistant(CLEARED_MESSAGE), Message::assistant("late")]
    );
}

#[tokio::test(start_paused = true)]
async fn test_replies_land_in_arrival_order() {
    let transport = TestTransport::with_replies([
        PresetReply::Hang,
        PresetReply::chat_message("second"),
    ]);
    let chat = quiet_chat(&transport);

    let first = chat.submit("first").unwrap();
    let second = chat.submit("second").unwrap();
    second.await.unwrap();

    assert_eq!(
        chat.transcript().messages(),
        [
            Message::user("first"),
            Message::user("second"),
            Message::assistant("second"),
        ]
    );
    // The first request never resolves, and nothing times it out.
    sleep(Duration::from_secs(600)).await;
    assert_eq!(chat.stage(), ChatStage::AwaitingResponse);
    assert_eq!(chat.transcript().len(), 3);
    first.abort();
}

#[tokio::test(start_paused = true)]
async fn test_welcome_message() {
    let transport = TestTransport::default();
    let chat = ChatBuilder::with_transport(transport).build();
    assert!(chat.transcript().is_empty());

    sleep(Duration::from_millis(499)).await;
    assert!(chat.transcript().is_empty());

    sleep(Duration::from_millis(2)).await;
    assert_eq!(
        chat.transcript().messages(),
        [Message::assistant(WELCOME_MESSAGE)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_observers() {
    let transport = TestTransport::with_replies([
        PresetReply::chat_message("a"),
        PresetReply::Hang,
        PresetReply::chat_message("b"),
    ]);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let clears = Arc::new(AtomicUsize::new(0));
    let idles = Arc::new(AtomicUsize::new(0));

    let chat = ChatBuilder::with_transport(transport)
        .with_welcome_delay(Duration::from_secs(3600))
        .on_message({
            let seen = Arc::clone(&seen);
            move |msg| seen.lock().unwrap().push(msg.clone())
        })
        .on_clear({
            let clears = Arc::clone(&clears);
            move || {
                clears.fetch_add(1, Ordering::Relaxed);
            }
        })
        .on_idle({
            let idles = Arc::clone(&idles);
            move || {
                idles.fetch_add(1, Ordering::Relaxed);
            }
        })
        .build();

    chat.submit("x").unwrap().await.unwrap();
    assert_eq!(idles.load(Ordering::Relaxed), 1);

    // "y" hangs, so answering "z" doesn't make the chat idle.
    let hung = chat.submit("y").unwrap();
    chat.submit("z").unwrap().await.unwrap();
    assert_eq!(idles.load(Ordering::Relaxed), 1);
    chat.clear();

    assert_eq!(
        *seen.lock().unwrap(),
        [
            Message::user("x"),
            Message::assistant("a"),
            Message::user("y"),
            Message::user("z"),
            Message::assistant("b"),
            Message::assistant(CLEARED_MESSAGE),
        ]
    );
    assert_eq!(clears.load(Ordering::Relaxed), 1);
    hung.abort();
}
