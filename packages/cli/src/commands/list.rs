use anyhow::Result;
use colored::Colorize;
use contractform_workspace::CollectionView;

use super::session::Session;

pub fn list(session: &Session) -> Result<()> {
    session.require_signed_in()?;

    let view = CollectionView::new(session.engine.clone());
    let summaries = view.summaries();

    if summaries.is_empty() {
        println!("No contracts yet. Run: contractform new");
        return Ok(());
    }

    for summary in summaries {
        println!("  {}  {}", summary.id.as_str().bright_white(), summary.label);
    }
    Ok(())
}
