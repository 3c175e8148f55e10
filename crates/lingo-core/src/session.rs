use anyhow::{anyhow, Result};
use protocol::{Command, Event};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::language::DetectedLanguage;
use crate::log::MessageLog;
use crate::message::MessageId;
use crate::orchestrator::{Orchestrator, Outcome, Step};
use crate::ports::OutboundPort;
use crate::status::Status;

/// Request/response surface for a presentation layer. One command loop owns
/// the order in which commands reach the orchestrator; service calls run on
/// their own tasks so the loop never waits on them.
pub struct ChatSession;

impl ChatSession {
    pub fn spawn<O>(orchestrator: Arc<Orchestrator>, outbound: O, capacity: usize) -> SessionHandle
    where
        O: OutboundPort + 'static,
    {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let outbound = Arc::new(outbound);

        let observer = tokio::spawn(observe(id, orchestrator.clone(), outbound));
        let commands = tokio::spawn(run_commands(orchestrator, rx));
        info!(session_id = %id, "chat session started");

        SessionHandle { id, tx, commands, observer }
    }
}

pub struct SessionHandle {
    id: Uuid,
    tx: mpsc::Sender<Command>,
    commands: JoinHandle<()>,
    observer: JoinHandle<()>,
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| anyhow!("chat session {} is closed", self.id))
    }

    /// Stops accepting commands and waits for the loop to drain. Service
    /// calls already issued keep running to completion.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.commands.await {
            warn!(session_id = %self.id, error = %e, "command loop ended abnormally");
        }
        self.observer.abort();
        info!(session_id = %self.id, "chat session stopped");
    }
}

async fn run_commands(orchestrator: Arc<Orchestrator>, mut rx: mpsc::Receiver<Command>) {
    while let Some(command) = rx.recv().await {
        debug!(?command, "command received");
        match begin(&orchestrator, command) {
            Step::Done(outcome) => debug!(?outcome, "command finished"),
            Step::Pending(job) => {
                let orchestrator = orchestrator.clone();
                tokio::spawn(async move {
                    let outcome = orchestrator.complete(job).await;
                    debug!(?outcome, "job finished");
                });
            }
        }
    }
}

/// Applies the synchronous half of a command in arrival order.
fn begin(orchestrator: &Orchestrator, command: Command) -> Step {
    match command {
        Command::Submit(submit) => orchestrator.begin_submit(&submit.text),
        Command::Send(submit) => orchestrator.begin_send(&submit.text),
        Command::Translate => orchestrator.begin_translate(),
        Command::SummarizeOriginal => orchestrator.begin_summarize_original(),
        Command::SummarizeTranslation(target) => orchestrator.begin_summarize_translation(MessageId::from(target.id)),
        Command::Remove(target) => Step::Done(orchestrator.remove(MessageId::from(target.id))),
        Command::SelectLanguage(select) => match orchestrator.select_language(&select.lang) {
            Ok(tag) => Step::Done(Outcome::Selected(tag)),
            Err(e) => {
                warn!(error = %e, "language selection rejected");
                Step::Done(Outcome::Failed(e))
            }
        },
    }
}

/// Forwards every status, detection and log change as an event.
async fn observe<O: OutboundPort>(id: Uuid, orchestrator: Arc<Orchestrator>, outbound: Arc<O>) {
    let mut status = orchestrator.subscribe_status();
    let mut detected = orchestrator.subscribe_detected();
    let mut log = orchestrator.subscribe_log();
    let session_id = id.to_string();

    let initial = [status_event(&mut status), snapshot_event(&session_id, &mut log)];
    for event in initial {
        if let Err(e) = outbound.send(event).await {
            warn!(session_id = %id, error = %e, "outbound closed");
            return;
        }
    }

    loop {
        let event = tokio::select! {
            changed = status.changed() => match changed {
                Ok(()) => status_event(&mut status),
                Err(_) => break,
            },
            changed = detected.changed() => match changed {
                Ok(()) => detected_event(&mut detected),
                Err(_) => break,
            },
            changed = log.changed() => match changed {
                Ok(()) => snapshot_event(&session_id, &mut log),
                Err(_) => break,
            },
        };
        if let Err(e) = outbound.send(event).await {
            warn!(session_id = %id, error = %e, "outbound closed");
            break;
        }
    }
}

fn status_event(rx: &mut watch::Receiver<Status>) -> Event {
    Event::Status(rx.borrow_and_update().to_protocol())
}

fn detected_event(rx: &mut watch::Receiver<DetectedLanguage>) -> Event {
    Event::DetectedLanguage(protocol::DetectedLanguage {
        v: Some(protocol::VERSION),
        lang: rx.borrow_and_update().to_string(),
    })
}

fn snapshot_event(session_id: &str, rx: &mut watch::Receiver<MessageLog>) -> Event {
    let log = rx.borrow_and_update();
    Event::Snapshot(protocol::Snapshot {
        v: Some(protocol::VERSION),
        session_id: session_id.to_string(),
        version: log.version(),
        messages: log.views(),
    })
}
