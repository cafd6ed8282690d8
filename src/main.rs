use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use exrates::cli::ui::{StyleType, style_text};
use exrates::core::log::init_logging;
use exrates::{AppCommand, RunOptions};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Base currency, overrides the configured one
    #[arg(short, long, global = true)]
    base: Option<String>,

    /// Always query the API, bypassing the response cache
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List supported currencies
    Symbols,
    /// List supported cryptocurrencies
    Crypto,
    /// Show the latest rates
    Latest {
        /// Only these symbols
        symbols: Vec<String>,
    },
    /// Convert an amount of the base currency
    Convert {
        to: String,
        #[arg(default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..))]
        amount: i64,
        /// Use the rate of this day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show the rates of a past day
    Historical {
        date: String,
        symbols: Vec<String>,
    },
    /// Show daily rates between two days
    Timeseries {
        start: String,
        end: String,
        symbols: Vec<String>,
    },
    /// Show how rates moved between two days
    Fluctuation {
        start: String,
        end: String,
        symbols: Vec<String>,
    },
}

impl From<Commands> for AppCommand {
    fn from(cmd: Commands) -> AppCommand {
        match cmd {
            Commands::Symbols => AppCommand::Symbols,
            Commands::Crypto => AppCommand::Crypto,
            Commands::Latest { symbols } => AppCommand::Latest { symbols },
            Commands::Convert { to, amount, date } => AppCommand::Convert { to, amount, date },
            Commands::Historical { date, symbols } => AppCommand::Historical { date, symbols },
            Commands::Timeseries {
                start,
                end,
                symbols,
            } => AppCommand::Timeseries {
                start,
                end,
                symbols,
            },
            Commands::Fluctuation {
                start,
                end,
                symbols,
            } => AppCommand::Fluctuation {
                start,
                end,
                symbols,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let options = RunOptions {
        base: cli.base,
        no_cache: cli.no_cache,
    };

    let result = match cli.command {
        Some(Commands::Setup) => exrates::cli::setup::setup(cli.config_path.as_deref()),
        Some(cmd) => exrates::run_command(cmd.into(), cli.config_path.as_deref(), &options).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::debug!(error = ?e, "Application failed");
        eprintln!("{}", style_text(&format!("Error: {e:#}"), StyleType::Error));
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_rejects_amount_below_one() {
        assert!(Cli::try_parse_from(["exrates", "convert", "EUR", "0"]).is_err());
        assert!(Cli::try_parse_from(["exrates", "convert", "EUR", "-5"]).is_err());

        let cli = Cli::try_parse_from(["exrates", "convert", "EUR"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Convert { amount: 1, .. })
        ));
    }

    #[test]
    fn test_setup_accepts_config_path() {
        let cli = Cli::try_parse_from(["exrates", "setup", "--config-path", "/tmp/x.yaml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Setup)));
        assert_eq!(cli.config_path.as_deref(), Some("/tmp/x.yaml"));
    }
}
