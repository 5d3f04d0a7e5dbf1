use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::Input;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use crate::api::ApiKey;
use crate::config::Config;
use crate::models::UserProfile;
use crate::prompt;
use crate::session::{self, ConsoleSink};

/// Exit status after Ctrl-C, following the shell convention of 128 + SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Args)]
pub struct ChatCommand {
    /// Message for the coach (read from stdin or prompted for when omitted)
    message: Option<String>,

    /// Profile file to use instead of the default
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Model to use instead of the configured one
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature to use instead of the configured one
    #[arg(long)]
    temperature: Option<f32>,

    /// Skip the routine summary shown before asking
    #[arg(long)]
    no_welcome: bool,
}

impl ChatCommand {
    pub async fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let config = Config::load(config_path)?.with_overrides(self.model, self.temperature);

        // Fail before prompting or touching the network when no key is available
        let api_key = ApiKey::from_env_or(config.openai.api_key.as_deref())?;

        let profile = UserProfile::resolve(self.profile.as_deref())?;
        let color = config.ui.color && io::stdout().is_terminal();

        if config.ui.show_welcome && !self.no_welcome {
            println!();
            println!("{}", styled("🤖 AI (Preloaded):", color));
            println!("{}", prompt::welcome_message(&profile));
        }

        let message = match self.message {
            Some(message) => message,
            None => read_message()?,
        };
        let message = message.trim();
        if message.is_empty() {
            bail!("No message given for the coach");
        }

        tracing::info!("Asking {} for {}", config.openai.model, profile.name);

        let mut sink = ConsoleSink::stdout(color);

        tokio::select! {
            result = session::run_session(&config, api_key, &profile, message, &mut sink) => {
                result?;
            }
            _ = tokio::signal::ctrl_c() => {
                eprintln!();
                eprintln!("{}", "Interrupted, response discarded.".yellow());
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        }

        Ok(())
    }
}

fn styled(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

/// Prompt on a terminal, otherwise take everything piped to stdin
fn read_message() -> Result<String> {
    let stdin = io::stdin();

    if stdin.is_terminal() {
        println!();
        let message: String = Input::new().with_prompt("📝 User").interact_text()?;
        return Ok(message);
    }

    let mut message = String::new();
    stdin
        .lock()
        .read_to_string(&mut message)
        .context("Failed to read message from stdin")?;

    Ok(message)
}
