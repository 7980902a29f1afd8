use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Address;

#[derive(Parser)]
#[command(name = "fragmenter")]
#[command(about = "Split confidential orders into encrypted fragments for darknode pods")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the open-order request for an order
    Build {
        /// Order JSON file ("-" or omitted reads stdin)
        #[arg(short, long)]
        order: Option<PathBuf>,

        /// Registry snapshot JSON file
        #[arg(short, long)]
        registry: PathBuf,

        /// Trader address submitting the order
        #[arg(short, long)]
        address: Address,
    },
    /// Print the pods for a registry snapshot
    Pods {
        /// Registry snapshot JSON file ("-" or omitted reads stdin)
        #[arg(short, long)]
        registry: Option<PathBuf>,
    },
    /// Print the id of an order
    OrderId {
        /// Order JSON file ("-" or omitted reads stdin)
        #[arg(short, long)]
        order: Option<PathBuf>,
    },
    /// Print, as hex, the message a wallet signs to cancel an order
    CancelMessage {
        /// Base64 order id
        #[arg(long)]
        order_id: String,
    },
}
