//! tr - TestRail migration CLI
//!
//! Copies shared steps, suites, sections and cases from one project into
//! another, skipping what already exists.
//!
//! # Examples
//!
//! ```bash
//! # Preview a full migration
//! tr migrate full --src-project 1 --dst-project 2 --dry-run --pretty
//!
//! # Migrate cases into an explicit fallback section
//! tr migrate cases --src-project 1 --dst-project 2 --dst-section 40
//!
//! # Inspect a saved mapping
//! tr mapping show mappings/mapping_20240501_101500_123456.json
//! ```

use tr_cli::Cli;

use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let pretty = cli.pretty;

    match tr_cli::run(cli).await {
        Ok(value) => {
            let output = if pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };

            match output {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error serializing response: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            log::logger().flush();
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
