use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory for contract files
    #[arg(short, long, default_value = ".contracts")]
    pub store_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

/// Write a config; `owner` becomes the default identity.
pub fn init(args: InitArgs, owner: Option<String>, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing contract workspace...".bright_blue().bold());

    let config = Config {
        store_dir: args.store_dir.clone(),
        owner_id: owner,
        ..Config::default()
    };

    let store_dir = config.get_store_dir(cwd);
    if !store_dir.exists() {
        fs::create_dir_all(&store_dir)?;
        println!("  {} Created {}/", "✓".green(), args.store_dir);
    }

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "✅ Workspace initialized!".green().bold());
    println!();
    println!("Next steps:");
    match &config.owner_id {
        Some(owner_id) => println!("  1. Signed in as {owner_id}"),
        None => println!("  1. Set ownerId in {DEFAULT_CONFIG_NAME} (or pass --owner)"),
    }
    println!("  2. Run: contractform new");
    println!("  3. Run: contractform list");

    Ok(())
}
