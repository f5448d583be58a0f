//! Predict command - classify one leaf photo.

use anyhow::{Context, Result};
use colored::Colorize;
use ricewise_config::Config;
use ricewise_vision::Classifier;
use std::path::Path;

const BAR_WIDTH: usize = 30;

pub fn run(config: &Config, image: &Path) -> Result<()> {
    let bytes = std::fs::read(image)
        .with_context(|| format!("Failed to read image {}", image.display()))?;

    let classifier = Classifier::from_config(&config.classifier)
        .context("Failed to load the image classifier")?;
    let prediction = classifier
        .predict(&bytes)
        .with_context(|| format!("Failed to classify {}", image.display()))?;

    println!(
        "{} {}",
        "Result:".green().bold(),
        prediction.label.bold()
    );
    println!();
    println!("{}", "Probabilities:".cyan().bold());

    for (i, (name, prob)) in classifier
        .class_names()
        .as_slice()
        .iter()
        .zip(&prediction.probabilities)
        .enumerate()
    {
        let line = format!("  {:<25} {:.4}  {}", name, prob, bar(*prob));
        if i == prediction.index {
            println!("{}", line.green());
        } else {
            println!("{}", line);
        }
    }

    Ok(())
}

fn bar(prob: f32) -> String {
    let filled = (prob.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(bar(1.0).chars().filter(|c| *c == '█').count(), BAR_WIDTH);
        assert_eq!(bar(1.7).chars().count(), BAR_WIDTH);
        assert_eq!(bar(0.5).chars().filter(|c| *c == '█').count(), 15);
    }
}
