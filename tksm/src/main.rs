use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tksm::{session, Console, ReaderSource, TerminalSource, TksmConfig};
use tksm_core::mnemonic::COLUMN_HEADER;
use tksm_core::{KeyPhraseIndex, KeyWordIndex};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tksm")]
#[command(about = "Phonetic and mnemonic text entry from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding the definition sources
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Configuration file (default: tksm.toml in the data directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default)
    Repl,
    /// Resolve a key string and print each commit
    Decode {
        /// Keys as they would be typed, e.g. "shi2 aab "
        keys: String,
    },
    /// Print the phrase and word indexes as JSON
    Dump,
    /// Print the mnemonic table, one cell per row
    Cells,
}

#[derive(Serialize)]
struct IndexDump<'a> {
    key2ph: &'a KeyPhraseIndex,
    keys2word: &'a KeyWordIndex,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_env("TKSM_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = TksmConfig::discover(cli.config.as_deref(), &cli.data_dir)
        .context("failed to load configuration")?;
    let (tables, report) = tksm::load_tables(&config).with_context(|| {
        format!(
            "failed to load definition sources from {}",
            config.data_dir.display()
        )
    })?;

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => {
            let mut console = Console::new(io::stdout(), &config);
            tksm::print_load_report(&mut console, &tables, &report)?;
            let mut engine = tksm::engine(tables, &config);
            if io::stdin().is_terminal() {
                let mut input = TerminalSource::new().context("failed to enter raw mode")?;
                let mut console = console.raw();
                console.startup()?;
                session::run(&mut engine, &mut input, &mut console)?;
            } else {
                let mut input = ReaderSource::new(io::stdin().lock());
                console.startup()?;
                session::run(&mut engine, &mut input, &mut console)?;
            }
        }
        Commands::Decode { keys } => {
            let mut engine = tksm::engine(tables, &config);
            for text in session::decode(&mut engine, &keys) {
                println!("{text}");
            }
        }
        Commands::Dump => {
            let dump = IndexDump {
                key2ph: &tables.phrases,
                keys2word: &tables.words,
            };
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
        Commands::Cells => {
            for (index, cell) in tables.mnemonic.iter() {
                println!("{} {}", index.to_uppercase(), cell.row());
                println!("{COLUMN_HEADER}");
            }
        }
    }
    Ok(())
}
