//! Interactive session loop.

use crate::renderer::Console;
use crate::terminal::InputSource;
use std::io::{self, Write};
use tksm_core::{DecodeEngine, Response};
use tracing::debug;

/// Feed characters from `input` to `engine` until termination or end of
/// input, rendering every response. Returns the committed texts in order.
pub fn run<W: Write>(
    engine: &mut DecodeEngine,
    input: &mut dyn InputSource,
    console: &mut Console<W>,
) -> io::Result<Vec<String>> {
    console.line("Enter input mode (Ctrl-C or Ctrl-D to exit):")?;
    let mut commits = Vec::new();
    loop {
        let Some(ch) = input.next_char()? else {
            debug!("end of input");
            console.render(&Response::Exit, engine.buffer(), input)?;
            engine.reset();
            break;
        };
        console.echo(ch)?;
        let response = engine.process_char(ch);
        console.render(&response, engine.buffer(), input)?;
        match response {
            Response::Exit => break,
            Response::Committed(text) => commits.push(text),
            _ => {}
        }
    }
    Ok(commits)
}

/// Resolve `keys` without a terminal, committing whatever is still pending
/// at the end.
pub fn decode(engine: &mut DecodeEngine, keys: &str) -> Vec<String> {
    let mut commits = Vec::new();
    for ch in keys.chars() {
        if let Response::Committed(text) = engine.process_char(ch) {
            commits.push(text);
        }
    }
    if !engine.buffer().is_empty() {
        if let Response::Committed(text) = engine.process_char(' ') {
            commits.push(text);
        }
    }
    commits
}
