use anyhow::{Context, Result};
use clap::Args;
use contractform_workspace::{PreviewRequest, Selector};

use super::session::Session;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Contract id
    pub id: String,
}

pub async fn preview(args: PreviewArgs, session: &Session) -> Result<()> {
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

    let request = PreviewRequest::new(&document, &session.identity());
    println!("{}", request.url(&session.config.preview_endpoint)?);
    Ok(())
}
