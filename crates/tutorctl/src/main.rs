//! Tutor Control - CLI client for the tutor router daemon.

mod client;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client::{TutordClient, DEFAULT_URL};
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tutor_shared::rpc::OrchestrateRequest;

/// Canned requests exercising the main adaptation paths
const DEMO_CASES: &[(&str, &str, &str)] = &[
    (
        "Frustrated student needing practice",
        "I'm struggling with calculus derivatives and need practice problems",
        "student123",
    ),
    (
        "Request for explanation",
        "give detailed explanation",
        "student123",
    ),
    (
        "Confident student seeking challenge",
        "I understand photosynthesis well, give me advanced content",
        "student456",
    ),
];

#[derive(Parser)]
#[command(name = "tutorctl")]
#[command(about = "Tutor router - adaptive tool routing for student messages", long_about = None)]
#[command(version = tutor_shared::VERSION)]
struct Cli {
    /// Daemon base URL
    #[arg(long, global = true, env = "TUTOR_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Print full JSON responses
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat that keeps one session
    Chat {
        #[arg(long, default_value = "student_demo")]
        user_id: String,

        /// Mastery summary sent as the profile hint
        #[arg(long)]
        mastery: Option<String>,
    },

    /// Run the predefined demo requests
    Demo,

    /// Send a single message
    Ask {
        message: String,

        #[arg(long, default_value = "student_demo")]
        user_id: String,

        #[arg(long)]
        session_id: Option<String>,

        #[arg(long)]
        mastery: Option<String>,
    },

    /// Show daemon health
    Health,

    /// Show or clear a session
    Session {
        session_id: String,

        /// Delete the session instead of showing it
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = TutordClient::new(&cli.url)?;

    match cli.command {
        Commands::Chat { user_id, mastery } => chat(&client, &user_id, mastery, cli.json).await,
        Commands::Demo => demo(&client, cli.json).await,
        Commands::Ask {
            message,
            user_id,
            session_id,
            mastery,
        } => {
            let mut req = OrchestrateRequest::new(message, user_id);
            req.session_id = session_id;
            if let Some(summary) = mastery {
                req = req.with_mastery(summary);
            }
            let response = client.orchestrate(&req).await?;
            if cli.json {
                output::display_json(&response)
            } else {
                output::display_response(&response);
                println!("  session: {}", response.result.session_id.dimmed());
                Ok(())
            }
        }
        Commands::Health => {
            let health = client.health().await?;
            if cli.json {
                output::display_json(&health)
            } else {
                output::display_health(&health);
                Ok(())
            }
        }
        Commands::Session { session_id, clear } => {
            if clear {
                if client.clear_session(&session_id).await? {
                    println!("Cleared {}", session_id);
                } else {
                    println!("No session {}", session_id);
                }
                return Ok(());
            }
            match client.session(&session_id).await? {
                Some(session) if cli.json => output::display_json(&session),
                Some(session) => {
                    output::display_session(&session);
                    Ok(())
                }
                None => {
                    println!("No session {}", session_id);
                    Ok(())
                }
            }
        }
    }
}

async fn demo(client: &TutordClient, json: bool) -> Result<()> {
    println!("{}", "Tutor router demo".bold());
    output::separator();

    for (i, (description, input, user_id)) in DEMO_CASES.iter().enumerate() {
        println!("Test {}: {}", i + 1, description);
        println!("Input: {}", input.cyan());

        let response = client
            .orchestrate(&OrchestrateRequest::new(*input, *user_id))
            .await?;
        if json {
            output::display_json(&response)?;
        } else {
            output::display_response(&response);
        }
        output::separator();
    }
    Ok(())
}

async fn chat(
    client: &TutordClient,
    user_id: &str,
    mastery: Option<String>,
    json: bool,
) -> Result<()> {
    println!("Tutor chat as {} - type 'exit' to quit.", user_id.bold());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut session_id: Option<String> = None;

    loop {
        stdout.write_all(b"\nYou: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
        {
            break;
        }

        let mut req = OrchestrateRequest::new(input, user_id);
        req.session_id = session_id.clone();
        if let Some(summary) = &mastery {
            req = req.with_mastery(summary.clone());
        }

        match client.orchestrate(&req).await {
            Ok(response) => {
                if json {
                    output::display_json(&response)?;
                } else {
                    output::display_response(&response);
                }
                session_id = Some(response.result.session_id);
            }
            Err(e) => eprintln!("{} {:#}", "error:".bright_red(), e),
        }
    }

    println!("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_arguments() {
        let cli = Cli::try_parse_from([
            "tutorctl",
            "--url",
            "http://localhost:9000",
            "ask",
            "explain gravity",
            "--session-id",
            "s1",
        ])
        .unwrap();

        assert_eq!(cli.url, "http://localhost:9000");
        match cli.command {
            Commands::Ask {
                message,
                user_id,
                session_id,
                mastery,
            } => {
                assert_eq!(message, "explain gravity");
                assert_eq!(user_id, "student_demo");
                assert_eq!(session_id.as_deref(), Some("s1"));
                assert!(mastery.is_none());
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_session_clear_flag() {
        let cli = Cli::try_parse_from(["tutorctl", "session", "abc", "--clear", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Session { clear: true, .. }));
    }

    #[test]
    fn test_demo_cases_have_inputs() {
        for (description, input, user_id) in DEMO_CASES {
            assert!(!description.is_empty() && !input.is_empty() && !user_id.is_empty());
        }
    }
}
