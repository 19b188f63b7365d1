use anyhow::Result;
use colored::Colorize;
use contractform_workspace::CollectionView;

use super::session::Session;

pub async fn new(session: &Session) -> Result<()> {
    session.require_signed_in()?;

    let mut view = CollectionView::new(session.engine.clone());
    let id = view.create()?;
    session.save().await?;

    println!("{} Created contract {}", "✓".green(), id.as_str().bright_white());
    println!("  Link: {}", view.selector().to_fragment());
    Ok(())
}
