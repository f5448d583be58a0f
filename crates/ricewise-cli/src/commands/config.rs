//! Configuration commands.

use anyhow::Result;
use colored::Colorize;
use ricewise_config::{AppPaths, Config, Credentials};
use ricewise_ingest::discover_pdfs;

use super::format_size;

pub fn show(paths: &AppPaths) -> Result<()> {
    println!("{}", "Current Configuration".cyan().bold());
    println!("{}", "─".repeat(50));

    if paths.config_file.exists() {
        let contents = std::fs::read_to_string(&paths.config_file)?;
        println!("{}", contents);
    } else {
        println!(
            "{}",
            format!(
                "# No config file at {}, showing defaults",
                paths.config_file.display()
            )
            .dimmed()
        );
        println!("{}", Config::default_config_string());
    }

    Ok(())
}

pub fn path(paths: &AppPaths) -> Result<()> {
    println!("{}", paths.config_file.display());
    Ok(())
}

/// Validate settings, credentials, documents and classifier files.
pub fn check(paths: &AppPaths) -> Result<()> {
    println!("{}", "Checking Ricewise setup".cyan().bold());
    println!("{}", "─".repeat(50));

    let mut problems = 0;
    let mut report = |ok: bool, label: &str, detail: String| {
        if ok {
            println!("  {} {} {}", "✓".green(), label, detail.dimmed());
        } else {
            problems += 1;
            println!("  {} {} {}", "✗".red(), label, detail);
        }
    };

    let config = match Config::load_from(&paths.config_file) {
        Ok(config) => {
            report(true, "Config", paths.config_file.display().to_string());
            config
        }
        Err(e) => {
            report(false, "Config", e.to_string());
            Config::default()
        }
    };

    match config.validate() {
        Ok(()) => report(true, "Settings", "valid".to_string()),
        Err(e) => report(false, "Settings", e.to_string()),
    }

    match Credentials::from_env() {
        Ok(_) => report(true, "Credentials", "GROQ_API_KEY and HF_TOKEN set".to_string()),
        Err(e) => report(false, "Credentials", e.to_string()),
    }

    let folder = config.documents.folder_path();
    match discover_pdfs(&folder) {
        Ok(files) => {
            let total: u64 = files
                .iter()
                .filter_map(|f| std::fs::metadata(f).ok())
                .map(|m| m.len())
                .sum();
            report(
                true,
                "Documents",
                format!("{} PDFs ({}) in {}", files.len(), format_size(total), folder.display()),
            )
        }
        Err(e) => report(false, "Documents", e.to_string()),
    }

    for (label, file) in [
        ("Classifier model", config.classifier.model_file()),
        ("Class names", config.classifier.class_names_file()),
    ] {
        let exists = file.is_file();
        let detail = if exists {
            file.display().to_string()
        } else {
            format!("{} not found", file.display())
        };
        report(exists, label, detail);
    }

    println!();
    if problems == 0 {
        println!("{}", "Everything looks good.".green().bold());
        Ok(())
    } else {
        anyhow::bail!("{} problem(s) found", problems)
    }
}
