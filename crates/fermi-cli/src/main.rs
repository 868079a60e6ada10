//! fermi CLI: terminal chat with a physics-expert Gemini persona

use clap::Parser;
use fermi_engine::{GeminiClient, Settings};
use std::sync::Arc;

/// Terminal chat with a physics-expert Gemini persona.
///
/// Reads the API key from GEMINI_API_KEY and opens the chat interface.
#[derive(Parser)]
#[command(name = "fermi")]
#[command(author, version, about, long_about = None)]
struct Cli {}

fn main() {
    let _cli = Cli::parse();

    // The secret is the one fatal startup condition: without it there is
    // nothing to run, so halt with the setup instruction.
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let client = match GeminiClient::new(&settings) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    if let Err(e) = rt.block_on(fermi_tui::run_tui(Arc::new(client))) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
