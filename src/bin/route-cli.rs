use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;

use route_tree::config::load_config;
use route_tree::routing::{table, PathTree};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect route-tree routing tables", long_about = None)]
struct Cli {
    /// Route table (TOML).
    #[arg(short, long, default_value = "route-tree.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the route table and print the matching tree
    Check,
    /// Resolve a request path against the route table
    Lookup {
        /// Request path, starting with '/'
        path: String,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let tree: PathTree<String> = table::compile(&config.routes, |route| route.name.clone())
        .map_err(|errors| format!("{} conflicting routes", errors.len()))?;

    match cli.command {
        Commands::Check => {
            println!("{} routes OK", config.routes.len());
            print!("{}", tree);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Lookup { path } => match tree.lookup(&path)? {
            Some(found) => {
                let output = json!({
                    "route": found.handler(),
                    "pattern": found.pattern(),
                    "captures": found.captures(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("no route matches {path:?}");
                Ok(ExitCode::FAILURE)
            }
        },
    }
}
