//! Terminal output formatting.

use colored::Colorize;

use incent_core::{calculate_incentive, HelpfulnessReport};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg.green());
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg.red());
}

/// Print an info message.
pub fn info(msg: &str) {
    println!("{} {}", "→".cyan(), msg);
}

/// Print a warning message.
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow().bold(), msg.yellow());
}

/// Print a header.
pub fn header(msg: &str) {
    println!("\n{}", msg.white().bold());
    println!("{}", "─".repeat(msg.chars().count()).dimmed());
}

/// Print a key-value pair.
pub fn kv(key: &str, value: &str) {
    println!("  {} {}", format!("{}:", key).dimmed(), value);
}

/// Print a helpfulness report with its incentive.
pub fn score_report(report: &HelpfulnessReport) {
    let b = &report.breakdown;
    let amount = calculate_incentive(report.score);

    header("Review Helpfulness");
    kv("Score", &format!("{} / 100", report.score).bold().to_string());
    kv("Incentive", &amount.to_string());
    kv("Words", &report.word_count.to_string());
    println!();
    kv("Descriptiveness", &b.descriptiveness.to_string());
    kv("Sentiment", &b.sentiment.to_string());
    kv("Actionability", &b.actionability.to_string());
    kv("Uniqueness", &b.uniqueness.to_string());
    kv("Specificity", &b.specificity.to_string());
    kv("Length adequacy", &b.length_adequacy.to_string());
    println!();

    if report.fallback {
        hint("The review had no usable content, so it received the minimum score.");
    }
}

/// Print a helpful hint.
pub fn hint(msg: &str) {
    println!("{} {}", "💡".dimmed(), msg.dimmed());
}
