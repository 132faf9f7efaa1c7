// crates/medivault-server/src/cli/mod.rs
// CLI module for MediVault commands

use clap::{Parser, Subcommand};
use medivault_types::Role;
use std::path::PathBuf;

pub mod ask;
pub mod check;
pub mod serve;
pub mod settings;

#[derive(Parser)]
#[command(name = "medivault")]
#[command(about = "Demo encrypted medical chat assistant")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the query proxy (POST /api/query)
    Serve {
        /// Interface to bind (default from config.toml)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default from config.toml)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask one question as a demo user
    Ask {
        /// The question
        #[arg(index = 1)]
        query: String,

        /// doctor, clinician, admin or researcher
        #[arg(short, long, default_value = "doctor", value_parser = parse_role)]
        role: Role,

        /// Send to a running proxy instead of the in-process one
        #[arg(long, conflicts_with = "offline")]
        proxy: Option<String>,

        /// No network at all: keyword responder only
        #[arg(long)]
        offline: bool,

        /// Write the session's audit log as CSV
        #[arg(long)]
        audit_csv: Option<PathBuf>,

        /// Show info-level logs
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show or change persisted settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Validate environment configuration
    Check,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print current settings as JSON
    Show,
    /// Set one field, e.g. `set dark_mode true`
    Set {
        key: String,
        value: String,
    },
    /// Restore defaults
    Reset,
}

fn parse_role(s: &str) -> Result<Role, String> {
    Role::from_str(s).ok_or_else(|| {
        format!("unknown role '{}' (expected doctor, clinician, admin or researcher)", s)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "medivault",
            "ask",
            "What is the HbA1c trend?",
            "--role",
            "researcher",
            "--offline",
        ])
        .unwrap();
        match cli.command {
            Commands::Ask {
                query,
                role,
                offline,
                proxy,
                ..
            } => {
                assert_eq!(query, "What is the HbA1c trend?");
                assert_eq!(role, Role::Researcher);
                assert!(offline);
                assert!(proxy.is_none());
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_proxy_conflicts_with_offline() {
        let result = Cli::try_parse_from([
            "medivault",
            "ask",
            "q",
            "--offline",
            "--proxy",
            "http://localhost:3030",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_role_rejected() {
        assert!(Cli::try_parse_from(["medivault", "ask", "q", "--role", "janitor"]).is_err());
    }

    #[test]
    fn test_parse_settings_set() {
        let cli =
            Cli::try_parse_from(["medivault", "settings", "set", "dark_mode", "true"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Settings {
                action: Some(SettingsAction::Set { .. })
            }
        ));
    }
}
