use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::models::UserProfile;
use crate::{prompt, session};

#[derive(Args)]
pub struct PromptCommand {
    /// Profile file to use instead of the default
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Print the full request payload as JSON
    #[arg(long)]
    json: bool,

    /// User message to embed in the JSON payload
    #[arg(requires = "json")]
    message: Option<String>,
}

impl PromptCommand {
    pub fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let profile = UserProfile::resolve(self.profile.as_deref())?;

        if !self.json {
            print!("{}", prompt::system_prompt(&profile));
            return Ok(());
        }

        let config = Config::load(config_path)?;
        let message = self.message.unwrap_or_default();
        let request = session::build_request(&profile, &config.openai, &message);

        println!("{}", request.to_json_pretty()?);

        Ok(())
    }
}
