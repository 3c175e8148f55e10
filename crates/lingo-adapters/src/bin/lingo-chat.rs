use anyhow::Result;
use async_trait::async_trait;
use lingo_adapters::{capabilities, LlmServiceConfig};
use lingo_core::ports::OutboundPort;
use lingo_core::{ChatSession, CoreConfig, Orchestrator};
use protocol::{Command, Event};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prints events as they arrive.
struct Terminal;

#[async_trait]
impl OutboundPort for Terminal {
    async fn send(&self, event: Event) -> Result<()> {
        match event {
            Event::Status(status) => println!("[{}] {}", status.level, status.text),
            Event::DetectedLanguage(detected) => println!("detected: {}", detected.lang),
            Event::Snapshot(snapshot) => {
                println!("--- conversation v{} ---", snapshot.version);
                for m in &snapshot.messages {
                    let lang = m.lang.as_deref().unwrap_or("--");
                    let flag = if m.needs_summarization { " (summarize?)" } else { "" };
                    println!("#{} {:?} [{}] {}{}", m.id, m.kind, lang, m.text, flag);
                    if let (Some(summary), Some(lang)) = (&m.summary, &m.summary_lang) {
                        println!("    summary [{}]: {}", lang, summary);
                    }
                }
            }
        }
        Ok(())
    }
}

fn parse_line(line: &str) -> Option<Command> {
    let line = line.trim();
    let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    match head {
        "/translate" => Some(Command::Translate),
        "/lang" => Some(Command::select_language(rest)),
        "/send" => Some(Command::send(rest)),
        "/summarize" if rest.is_empty() => Some(Command::SummarizeOriginal),
        "/summarize" => rest.parse().ok().map(Command::summarize_translation),
        "/remove" => rest.parse().ok().map(Command::remove),
        _ if line.starts_with('/') => None,
        _ => Some(Command::submit(line)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lingo_core=info,lingo_adapters=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CoreConfig::from_env();
    let llm_config = LlmServiceConfig::from_env();
    let caps = capabilities(&llm_config, &config.languages);
    let orchestrator = Arc::new(Orchestrator::start(caps, &config).await);
    let session = ChatSession::spawn(orchestrator, Terminal, config.channel_capacity);

    println!("commands: <text> | /send <text> | /translate | /lang <tag> | /summarize [id] | /remove <id> | /quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/quit" {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Some(command) => session.send(command).await?,
            None => eprintln!("unrecognized command: {}", line.trim()),
        }
    }

    session.shutdown().await;
    Ok(())
}
