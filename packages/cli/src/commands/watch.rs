use anyhow::{Context, Result};
use colored::Colorize;
use contractform_document::now_millis;
use contractform_sync::{ChangeOrigin, DocumentEvent};
use contractform_workspace::label;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use super::session::Session;

pub async fn watch(session: &Session) -> Result<()> {
    session.require_signed_in()?;

    let (identity_tx, identity_rx) = tokio::sync::watch::channel(session.identity());
    let mut events = session.engine.subscribe();
    let handle = session.engine.start(identity_rx);

    println!(
        "{} every {}ms (Ctrl-C to stop)",
        "👀 Watching".bright_blue().bold(),
        session.config.poll_interval_ms
    );

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => print_event(session, &event),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "missed change events"),
                Err(RecvError::Closed) => break,
            },
            signal = tokio::signal::ctrl_c() => {
                signal.context("listening for Ctrl-C")?;
                break;
            }
        }
    }

    handle.shutdown().await;
    drop(identity_tx);
    println!("Stopped");
    Ok(())
}

fn print_event(session: &Session, event: &DocumentEvent) {
    match event {
        DocumentEvent::Changed { id, origin, .. } => {
            let marker = match origin {
                ChangeOrigin::Local => "~".yellow(),
                ChangeOrigin::Remote => "↓".green(),
            };
            let text = session
                .engine
                .get(id)
                .map(|document| label(&document, now_millis()))
                .unwrap_or_default();
            println!("  {} {}  {}", marker, id.as_str().bright_white(), text);
        }
        DocumentEvent::Cleared => println!("  {} signed out; index cleared", "✗".red()),
    }
}
