use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use fragmenter::cli::{Cli, Commands};
use fragmenter::commands::{build_fragments, cancel_message, list_pods, order_id};

/// Read a JSON document from a file, or from stdin when piped
fn read_input(path: Option<&Path>, what: &str) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {what} from {}", path.display())),
        _ => {
            if atty::is(atty::Stream::Stdin) {
                anyhow::bail!("No {what} given: pass a file or pipe it on stdin");
            }
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .with_context(|| format!("Failed to read {what} from stdin"))?;
            Ok(input)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            order,
            registry,
            address,
        } => {
            let order_json = read_input(order.as_deref(), "order")?;
            let registry_json = read_input(Some(registry.as_path()), "registry")?;

            let output = build_fragments(&order_json, &registry_json, address)?;

            for failure in &output.failures {
                eprintln!("warning: {failure}");
            }
            eprintln!(
                "order {}: {} fragments ready",
                output.order_id,
                output.request.fragment_count()
            );
            println!("{}", serde_json::to_string_pretty(&output.request)?);
        }
        Commands::Pods { registry } => {
            let registry_json = read_input(registry.as_deref(), "registry")?;
            let pods = list_pods(&registry_json)?;
            println!("{}", serde_json::to_string_pretty(&pods)?);
        }
        Commands::OrderId { order } => {
            let order_json = read_input(order.as_deref(), "order")?;
            println!("{}", order_id(&order_json)?);
        }
        Commands::CancelMessage { order_id } => {
            println!("{}", cancel_message(&order_id)?);
        }
    }

    Ok(())
}
