//! Ask command - answer one question from the research papers.

use crate::server::state::ChatContext;
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use ricewise_config::Config;
use ricewise_core::ChatRequest;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Run the ask command.
pub fn run(mut config: Config, question: &str, top_k: Option<usize>, show_sources: bool) -> Result<()> {
    if let Some(k) = top_k {
        anyhow::ensure!(k > 0, "--top-k must be greater than 0");
        config.rag.top_k = k;
    }

    let question = ChatRequest::new(question)
        .question(config.rag.max_question_chars)
        .map(str::to_string)?;

    let rt = Runtime::new().context("Failed to create async runtime")?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message("Indexing research papers...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let context = rt.block_on(ChatContext::initialize(&config));
    spinner.finish_and_clear();
    let context = context?;

    println!("{} {}", "Question:".cyan().bold(), question);
    println!("{}", "─".repeat(70));
    println!();

    let answer = rt
        .block_on(context.pipeline().answer(&question))
        .context("Failed to generate answer")?;
    let response = context.build_response(&question, answer);

    println!("{}", "Answer:".green().bold());
    println!("{}", response.answer);
    println!();

    if show_sources && !response.sources.is_empty() {
        println!("{}", "Sources:".cyan().bold());
        for source in &response.sources {
            println!(
                "  {} {} (page {})",
                source.title.yellow(),
                source.metadata.source.dimmed(),
                source.metadata.page + 1
            );
            println!("    {}", source.snippet.replace('\n', " ").dimmed());
        }
        println!();
    }

    println!("{}", "You might also ask:".cyan().bold());
    for suggestion in &response.suggestions {
        println!("  • {}", suggestion);
    }
    println!();
    println!(
        "{}",
        format!("Answered in {:.2}s", response.processing_time_seconds).dimmed()
    );

    Ok(())
}
