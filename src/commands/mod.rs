mod chat;
mod config_cmd;
mod profile_cmd;
mod prompt_cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use chat::ChatCommand;
pub use prompt_cmd::PromptCommand;

#[derive(Parser)]
#[command(name = "fit-coach")]
#[command(about = "Terminal fitness coach that streams workout advice", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "FIT_COACH_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the coach about your workout
    Chat(ChatCommand),

    /// Print the system prompt or request payload without calling the API
    Prompt(PromptCommand),

    /// Manage the user profile
    #[command(subcommand)]
    Profile(ProfileSubcommands),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ProfileSubcommands {
    /// Show the active profile
    Show {
        /// Profile file to read instead of the default
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Write the sample profile to the default location
    Init {
        /// Overwrite existing profile
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Edit configuration file
    Edit,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        let config_path = self.config.as_deref();

        match self.command {
            Commands::Chat(cmd) => cmd.execute(config_path).await,
            Commands::Prompt(cmd) => cmd.execute(config_path),
            Commands::Profile(subcmd) => match subcmd {
                ProfileSubcommands::Show { profile } => profile_cmd::show_profile(profile.as_deref()),
                ProfileSubcommands::Init { force } => profile_cmd::init_profile(force),
            },
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(config_path),
                ConfigSubcommands::Edit => config_cmd::edit_config(config_path),
                ConfigSubcommands::Init { force } => config_cmd::init_config(config_path, force),
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
