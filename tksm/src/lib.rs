//! tksm front end: configuration, source discovery, terminal input, console
//! rendering and the interactive session loop around `tksm_core`.

pub mod config;
pub use config::TksmConfig;

pub mod discovery;

pub mod terminal;
pub use terminal::{InputSource, ReaderSource, TerminalSource};

pub mod renderer;
pub use renderer::Console;

pub mod session;

use std::io::{self, Write};
use std::sync::Arc;
use tksm_core::{DecodeEngine, LoadReport, Tables};

/// Discover and load every definition source named by `config`.
pub fn load_tables(config: &TksmConfig) -> tksm_core::Result<(Tables, LoadReport)> {
    let paths = config
        .source_paths()
        .map_err(|source| tksm_core::Error::Io {
            path: config.data_dir.clone(),
            source,
        })?;
    Tables::load(&paths, config.base())
}

/// Build an engine over loaded tables.
pub fn engine(tables: Tables, config: &TksmConfig) -> DecodeEngine {
    DecodeEngine::new(Arc::new(tables), config.base().clone())
}

/// Summarize what was loaded, listing every skipped definition line.
pub fn print_load_report<W: Write>(
    console: &mut Console<W>,
    tables: &Tables,
    report: &LoadReport,
) -> io::Result<()> {
    console.line(&format!(
        "Loaded {} keys ({} phrases), {} word keys, {} mnemonic cells.",
        tables.phrases.len(),
        tables.phrases.entry_count(),
        tables.words.len(),
        tables.mnemonic.len()
    ))?;
    for issue in report.issues() {
        console.line(&format!("Invalid line {issue}"))?;
    }
    Ok(())
}
