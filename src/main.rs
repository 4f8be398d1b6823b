//! Probotics - console chat loop
//!
//! Headless entry point: wires the Gemini client, the persistent stores,
//! and the response orchestrator into a minimal line-based chat.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use probotics::agent::{GeminiClient, Orchestrator};
use probotics::config::AgentConfig;
use probotics::messages::Message;
use probotics::profile::ProfileStore;
use probotics::session::SessionStore;
use probotics::storage::{FileStorage, Storage};
use probotics::terminal::LogSink;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "probotics=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Probotics console");

    let backend = Arc::new(GeminiClient::from_env().context("missing API credentials")?);
    let storage: Arc<dyn Storage> =
        Arc::new(FileStorage::in_data_dir().context("opening data directory")?);

    let profile = ProfileStore::new(storage.clone());
    let mut sessions = SessionStore::open(storage);
    let (log, log_rx) = LogSink::channel(256);
    let orchestrator = Orchestrator::new(backend, profile, log);

    let config = AgentConfig::default().with_tts(false);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("PROBOTICS online. Empty line to exit.");
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let prompt = line.trim();
        if prompt.is_empty() {
            break;
        }

        let history = sessions.current().messages.clone();
        sessions.append(Message::user(prompt));

        let reply = orchestrator.respond(prompt, &history, &[], &config).await;

        while let Ok(entry) = log_rx.try_recv() {
            println!("  [{:?}] {}", entry.level, entry.message);
        }
        println!("{}", reply.content);
        for citation in &reply.grounding {
            println!("  ↳ {} ({})", citation.title, citation.uri);
        }
        sessions.append(reply);
    }

    tracing::info!("Session saved, shutting down");
    Ok(())
}
