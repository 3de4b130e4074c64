//! Terminal output for orchestration results.

use owo_colors::OwoColorize;
use tutor_shared::rpc::{FullOrchestratorResponse, HealthResponse};
use tutor_shared::{ContextSource, Session};

const SEPARATOR: &str = "--------------------------------------------------";

/// Compact human-readable view of one result
pub fn display_response(response: &FullOrchestratorResponse) {
    let result = &response.result;

    println!();
    println!("{}", response.response.bold());
    println!(
        "  intent: {}  topic: {}  mood: {}",
        result.intent.cyan(),
        result.topic.cyan(),
        result.emotional_state.cyan()
    );

    let source = match result.confidence_source {
        ContextSource::Ai => "ai".bright_green().to_string(),
        ContextSource::RuleFallback => "rules".yellow().to_string(),
    };
    println!(
        "  tool: {} ({})  source: {} {:.2}",
        result.tool_name,
        result.variant,
        source,
        result.confidence
    );

    let params: Vec<String> = result
        .parameters
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    println!("  params: {}", params.join(", ").dimmed());

    if !response.suggestions.is_empty() {
        println!("  next:");
        for suggestion in &response.suggestions {
            println!("    * {}", suggestion);
        }
    }
}

pub fn display_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn display_health(health: &HealthResponse) {
    println!("[{}] tutord v{} ({})", "OK".bright_green(), health.version, health.git_sha);
    match &health.model {
        Some(model) => println!("  model:    {}", model),
        None => println!("  model:    {}", "rules only".yellow()),
    }
    println!("  sessions: {}", health.active_sessions);
    println!("  uptime:   {}s", health.uptime_seconds);
}

pub fn display_session(session: &Session) {
    println!("{} ({})", session.session_id.bold(), session.user_id);
    println!("  created:     {}", session.created_at.to_rfc3339());
    println!("  last active: {}", session.last_active_at.to_rfc3339());
    for (i, ctx) in session.history.iter().enumerate() {
        println!(
            "  {:>2}. {} / {} / {} [{}]",
            i + 1,
            ctx.intent,
            ctx.topic,
            ctx.emotional_state,
            ctx.source
        );
    }
}

pub fn separator() {
    println!("{}", SEPARATOR.dimmed());
}
