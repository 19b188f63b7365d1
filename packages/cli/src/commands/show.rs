use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use contractform_document::{contract, now_millis};
use contractform_workspace::{label, Selector};

use super::session::Session;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Contract id (a leading `#` is accepted)
    pub id: String,
}

pub async fn show(args: ShowArgs, session: &Session) -> Result<()> {
    let selector = Selector::from_fragment(&args.id);
    let id = selector
        .id()
        .with_context(|| format!("no contract {:?}", args.id))?;
    let document = match session.engine.get(id) {
        Some(document) => document,
        None => session
            .engine
            .fetch(id)
            .await
            .with_context(|| format!("no contract {:?}", args.id))?,
    };

    println!("{} {}", document.id.as_str().bright_white().bold(), label(&document, now_millis()));
    println!();
    println!("{}", serde_json::to_string_pretty(&document.body)?);

    let rows = contract::class_entries(&document.body);
    let filled = rows.iter().filter(|row| row.is_non_empty()).count();
    println!();
    println!("{} of {} class rows filled", filled, rows.len());
    Ok(())
}
