//! Chat command implementation.

use crate::agent::{build_search_agents, TerminationReason};
use crate::cli::{preflight, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run one chat between the user proxy and the search assistant.
pub async fn run_chat(
    message: Option<String>,
    max_auto_replies: Option<usize>,
    settings: Settings,
) -> Result<()> {
    let credentials = preflight::credentials(&settings)?;
    let message = message.unwrap_or_else(|| settings.agent.default_message.clone());

    let (assistant, proxy) = build_search_agents(&settings, &credentials)?;
    let proxy = match max_auto_replies {
        Some(max) => proxy.with_max_consecutive_auto_reply(max),
        None => proxy,
    };

    let spinner = Output::spinner("Assistant working...");
    let result = proxy.initiate_chat(&assistant, &message).await;
    spinner.finish_and_clear();

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            Output::error(&format!("Chat failed: {}", e));
            return Err(e.into());
        }
    };

    for msg in &result.history {
        Output::chat_message(msg);
    }
    println!();

    if !result.tool_calls.is_empty() {
        Output::header(&format!("Tool calls ({})", result.tool_calls.len()));
        for call in &result.tool_calls {
            Output::info(&format!("  {}", truncate(&call.to_string(), 80)));
        }
        println!();
    }

    match result.termination {
        TerminationReason::TerminationMessage => Output::success("Chat finished"),
        other => Output::warning(&format!("Chat stopped: {}", other)),
    }

    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
