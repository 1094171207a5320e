//! CLI output formatting utilities.

use crate::llm::{ChatMessage, Role};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print one transcript message.
    pub fn chat_message(message: &ChatMessage) {
        let sender = message
            .name
            .clone()
            .unwrap_or_else(|| message.role.to_string());
        let label = match message.role {
            Role::Assistant => style(sender).green().bold(),
            Role::Tool => style(sender).magenta().bold(),
            _ => style(sender).cyan().bold(),
        };

        println!("\n{}", label);
        for call in &message.tool_calls {
            println!(
                "   {} {}({})",
                style("tool call").dim(),
                style(&call.name).bold(),
                call.arguments
            );
        }
        if let Some(content) = message.content.as_deref().filter(|c| !c.is_empty()) {
            println!("{}", content);
        }
    }

    /// Print a search result.
    pub fn search_result(
        id: &str,
        score: f64,
        reranker_score: Option<f64>,
        caption: Option<&str>,
        content: &str,
    ) {
        let reranker = reranker_score
            .map(|s| format!(", reranker: {:.2}", s))
            .unwrap_or_default();
        println!(
            "\n{} {} (score: {:.4}{})",
            style(">>").green(),
            style(id).bold(),
            score,
            reranker
        );
        if let Some(caption) = caption {
            println!("   {}", style(content_preview(caption, 200)).italic());
        }
        println!("   {}", content_preview(content, 200));
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Flatten and truncate content with ellipsis.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace(['\r', '\n'], " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        format!("{}...", content.chars().take(max_chars).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("a\nb", 10), "a b");
        assert_eq!(content_preview("abcdef", 3), "abc...");
        assert_eq!(content_preview("ééé", 2), "éé...");
    }
}
