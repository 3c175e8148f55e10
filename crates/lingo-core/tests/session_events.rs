use std::sync::Arc;
use std::time::Duration;

use lingo_core::mocks::{ChannelOutbound, MockDetector, MockSummarizer, MockTranslatorFactory};
use lingo_core::{Capabilities, ChatSession, CoreConfig, Orchestrator};
use protocol::{Command, Event, MessageKind};
use tokio::sync::mpsc;
use tokio::time::timeout;

async fn orchestrator() -> Arc<Orchestrator> {
    let capabilities = Capabilities::new()
        .with_detector(MockDetector::new())
        .with_translator(MockTranslatorFactory::new())
        .with_summarizer(MockSummarizer::new());
    Arc::new(Orchestrator::start(capabilities, &CoreConfig::default()).await)
}

/// Receives events until one satisfies `pred`.
async fn wait_for<F>(rx: &mut mpsc::Receiver<Event>, pred: F) -> Event
where
    F: Fn(&Event) -> bool,
{
    timeout(Duration::from_secs(5), async {
        loop {
            match rx.recv().await {
                Some(event) if pred(&event) => return event,
                Some(_) => continue,
                None => panic!("event stream closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

#[tokio::test]
async fn session_publishes_initial_state() {
    let (tx, mut rx) = mpsc::channel(32);
    let session = ChatSession::spawn(orchestrator().await, ChannelOutbound(tx), 8);

    let Event::Status(status) = wait_for(&mut rx, |_| true).await else {
        panic!("first event should be the status line");
    };
    assert_eq!(status.level, "success");

    let Event::Snapshot(snapshot) = wait_for(&mut rx, |_| true).await else {
        panic!("second event should be a snapshot");
    };
    assert!(snapshot.messages.is_empty());
    assert_eq!(snapshot.session_id, session.id().to_string());

    session.shutdown().await;
}

#[tokio::test]
async fn send_then_translate_through_session() {
    let (tx, mut rx) = mpsc::channel(64);
    let session = ChatSession::spawn(orchestrator().await, ChannelOutbound(tx), 8);

    session.send(Command::send("Bonjour le monde")).await.unwrap();
    wait_for(&mut rx, |e| matches!(e, Event::DetectedLanguage(d) if d.lang == "fr")).await;

    session.send(Command::select_language("en")).await.unwrap();
    session.send(Command::Translate).await.unwrap();

    let Event::Snapshot(snapshot) =
        wait_for(&mut rx, |e| matches!(e, Event::Snapshot(s) if s.messages.len() == 2)).await
    else {
        unreachable!()
    };
    let received = &snapshot.messages[1];
    assert_eq!(received.kind, MessageKind::Received);
    assert_eq!(received.lang.as_deref(), Some("en"));
    assert_eq!(received.original_text.as_deref(), Some("Bonjour le monde"));

    session.shutdown().await;
}

#[tokio::test]
async fn remove_through_session_publishes_smaller_snapshot() {
    let orchestrator = orchestrator().await;
    let (tx, mut rx) = mpsc::channel(64);
    let session = ChatSession::spawn(orchestrator.clone(), ChannelOutbound(tx), 8);

    session.send(Command::send("first")).await.unwrap();
    session.send(Command::send("second")).await.unwrap();
    let Event::Snapshot(full) =
        wait_for(&mut rx, |e| matches!(e, Event::Snapshot(s) if s.messages.len() == 2)).await
    else {
        unreachable!()
    };

    session.send(Command::remove(full.messages[0].id)).await.unwrap();
    let Event::Snapshot(after) =
        wait_for(&mut rx, |e| matches!(e, Event::Snapshot(s) if s.messages.len() == 1)).await
    else {
        unreachable!()
    };
    assert_eq!(after.messages[0].text, "second");
    assert!(after.version > full.version);

    session.shutdown().await;
    assert_eq!(orchestrator.snapshot().len(), 1);
}

#[tokio::test]
async fn unsupported_language_selection_is_ignored() {
    let orchestrator = orchestrator().await;
    let (tx, _rx) = mpsc::channel(64);
    let session = ChatSession::spawn(orchestrator.clone(), ChannelOutbound(tx), 8);

    session.send(Command::select_language("xx")).await.unwrap();
    session.send(Command::select_language("PT")).await.unwrap();
    session.send(Command::select_language("de")).await.unwrap();
    session.shutdown().await;

    assert_eq!(orchestrator.selected_language().as_str(), "pt");
}

#[tokio::test]
async fn shutdown_drains_queued_commands() {
    let orchestrator = orchestrator().await;
    let (tx, _rx) = mpsc::channel(64);
    let session = ChatSession::spawn(orchestrator.clone(), ChannelOutbound(tx), 8);
    session.send(Command::send("hello")).await.unwrap();
    session.send(Command::send("   ")).await.unwrap();
    session.shutdown().await;

    assert_eq!(orchestrator.snapshot().len(), 1);
}
