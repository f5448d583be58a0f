//! Initialize Ricewise.

use anyhow::{Context, Result};
use colored::Colorize;
use ricewise_config::{AppPaths, Config};

pub fn run(paths: &AppPaths) -> Result<()> {
    if paths.config_file.exists() {
        println!(
            "{} Ricewise is already initialized.",
            "Note:".yellow().bold()
        );
        println!("  Config: {}", paths.config_file.display());
        return Ok(());
    }

    println!("{}", "Initializing Ricewise...".cyan().bold());

    paths
        .ensure_dirs()
        .context("Failed to create config directory")?;

    Config::create_default_file(&paths.config_file).context("Failed to create config file")?;
    println!(
        "  {} Created config: {}",
        "✓".green(),
        paths.config_file.display()
    );

    println!();
    println!("{}", "Ricewise initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  1. Put GROQ_API_KEY and HF_TOKEN in your environment or a {} file",
        ".env".cyan()
    );
    println!("  2. Copy research paper PDFs into the documents folder");
    println!("  3. Check the setup: {}", "ricewise config check".cyan());
    println!("  4. Start the backend: {}", "ricewise chat".cyan());

    Ok(())
}
