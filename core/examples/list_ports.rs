//! Example: List the shared ports of a configured workspace.
//!
//! Usage: `cargo run --example list_ports -- [WORKSPACE]`

use spaceport_core::{ConfigStore, Error, LocalBackend, PortService};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let workspace = std::env::args().nth(1).unwrap_or_default();

    let store = match ConfigStore::new() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening config: {}", e);
            return;
        }
    };
    let service = PortService::new(LocalBackend::new(store));

    match service.list_ports(&workspace, &CancellationToken::new()).await {
        Ok(rows) => {
            println!("{:<20} {:<6} {:<10} {}", "LABEL", "PORT", "PRIVACY", "BROWSE URL");
            println!("{}", "-".repeat(80));
            for row in &rows {
                println!(
                    "{:<20} {:<6} {:<10} {}",
                    row.label, row.port, row.privacy, row.browse_url
                );
            }
            println!("\nTotal: {} ports", rows.len());
        }
        Err(Error::NoWorkspaces) => {
            eprintln!("No workspaces configured. Add one with `spaceport workspace add`.");
        }
        Err(e) => {
            eprintln!("Error listing ports: {}", e);
        }
    }
}
