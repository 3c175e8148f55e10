use lingo_core::mocks::{MockDetector, MockSummarizer, MockTranslatorFactory};
use lingo_core::{Capabilities, CoreConfig, Orchestrator, PrimaryAction};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lingo_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CoreConfig::from_env();

    // Wire mocks
    let capabilities = Capabilities::new()
        .with_detector(MockDetector::new())
        .with_translator(MockTranslatorFactory::new())
        .with_summarizer(MockSummarizer::new());
    let orchestrator = Orchestrator::start(capabilities, &config).await;
    eprintln!("{}", orchestrator.status().text());

    // Parse args: optional `--to <lang>`, the rest is the message
    let mut args = std::env::args().skip(1).collect::<Vec<_>>();
    if let Some(pos) = args.iter().position(|a| a == "--to") {
        args.remove(pos);
        if pos < args.len() {
            let lang = args.remove(pos);
            orchestrator.select_language(&lang)?;
        }
    }
    let text = args.join(" ");
    let text = if text.is_empty() { "Bonjour le monde".to_string() } else { text };

    orchestrator.send(&text).await;
    eprintln!("detected: {}", orchestrator.detected_language());
    if orchestrator.primary_action() == PrimaryAction::Summarize {
        orchestrator.summarize_original_text().await;
    }
    orchestrator.translate().await;
    eprintln!("{}", orchestrator.status().text());

    let snapshot = orchestrator.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot.views())?);
    Ok(())
}
