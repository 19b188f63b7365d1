use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use contractform_document::{Path, Value};
use contractform_workspace::ContractEditor;

use super::session::Session;

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Contract id
    pub id: String,

    /// Dotted field path, e.g. `classes.0.courseName`
    pub path: String,

    /// New value: JSON, or plain text
    pub value: String,
}

pub async fn set(args: SetArgs, session: &Session) -> Result<()> {
    session.require_signed_in()?;

    let value = parse_value(&args.value);
    let editor = ContractEditor::new(session.engine.clone(), args.id.as_str().into());
    let stored = editor
        .set_raw(&args.path, value)
        .with_context(|| format!("setting {:?} on {}", args.path, args.id))?;
    session.save().await?;

    let path = Path::parse(&args.path)?;
    println!(
        "{} {} = {}",
        "✓".green(),
        path.id(stored.id.as_str()),
        stored.body.get_in(path.segments())
    );
    Ok(())
}

/// JSON if it parses, otherwise the raw text.
fn parse_value(raw: &str) -> Value {
    Value::from_json(raw).unwrap_or_else(|_| Value::from(raw))
}
