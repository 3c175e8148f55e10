//! Live calls against Groq. Run with `cargo test -p llm -- --ignored`
//! and GROQ_API_KEY set.

use llm::{ChatMessage, ChatOptions, Client, DEFAULT_MODEL};
use std::time::Instant;

fn client() -> Client {
    let _ = dotenvy::from_path("../../.env");
    Client::from_env_groq(DEFAULT_MODEL).unwrap()
}

#[tokio::test]
#[ignore]
async fn basic_call() {
    let out = client().simple("Say OK.").await.unwrap();
    println!("Response: {}", out);
    assert!(!out.trim().is_empty());
}

#[tokio::test]
#[ignore]
async fn json_object_mode() {
    let msgs = vec![
        ChatMessage::system("Reply ONLY as JSON: {\"language\": <ISO 639-1 code>}"),
        ChatMessage::user("Bonjour le monde"),
    ];
    let out = client()
        .chat(&msgs, ChatOptions { json_object: true, temperature: Some(0.0) })
        .await
        .unwrap();
    println!("JSON Response: {}", out);
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v.get("language").and_then(|x| x.as_str()), Some("fr"));
}

#[tokio::test]
#[ignore]
async fn latency_avg_ms() {
    let cli = client();
    let _ = cli.simple("warm").await.unwrap();

    let runs = 5;
    let mut total = 0u128;
    for i in 0..runs {
        let t0 = Instant::now();
        let _ = cli.simple("one short sentence").await.unwrap();
        let elapsed = t0.elapsed().as_millis();
        total += elapsed;
        println!("Run {}: {}ms", i + 1, elapsed);
    }
    println!("Average latency: {:.1}ms", total as f64 / runs as f64);
}
