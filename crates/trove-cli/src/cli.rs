use clap::{Parser, Subcommand};

/// Top-level CLI parser for the `trv` binary.
#[derive(Debug, Parser)]
#[command(name = "trv", version, about = "Trove - research-collection tooling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Default-agent provisioning
    Agents {
        #[command(subcommand)]
        action: AgentsAction,
    },
    /// Webset inspection
    Webset {
        #[command(subcommand)]
        action: WebsetAction,
    },
    /// Run the webset status polling server
    Serve {
        /// Bind address, e.g. 127.0.0.1:8710 (defaults to configuration)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum AgentsAction {
    /// Install the default agent for every account missing it
    InstallAll,
    /// Install (or replace) the default agent for one account
    InstallUser {
        account_id: String,
        /// Replace an existing default agent
        #[arg(long)]
        replace: bool,
    },
    /// Show installation statistics
    Stats,
}

#[derive(Debug, Subcommand)]
pub enum WebsetAction {
    /// Poll a webset's live status
    Status {
        webset_id: String,
        /// Skip the item list
        #[arg(long)]
        no_items: bool,
        /// Max items to show
        #[arg(long, default_value_t = 20)]
        item_limit: u64,
    },
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{AgentsAction, Cli, Commands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn agents_install_user_parses_flags() {
        let cli = Cli::try_parse_from(["trv", "agents", "install-user", "acct-1", "--replace"])
            .expect("cli should parse");
        match cli.command {
            Commands::Agents {
                action: AgentsAction::InstallUser {
                    account_id,
                    replace,
                },
            } => {
                assert_eq!(account_id, "acct-1");
                assert!(replace);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_accepts_bind_override() {
        let cli = Cli::try_parse_from(["trv", "serve", "--bind", "0.0.0.0:9000"])
            .expect("cli should parse");
        match cli.command {
            Commands::Serve { bind } => assert_eq!(bind.as_deref(), Some("0.0.0.0:9000")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
