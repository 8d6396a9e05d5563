//! Ports commands - list, privacy and forward.

use anyhow::Result;
use spaceport_core::{ConfigStore, Error, LocalBackend, PortService};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::truncate;

async fn service() -> Result<PortService<LocalBackend>> {
    let store = ConfigStore::new()?;
    let config = store.load().await?;

    Ok(PortService::new(LocalBackend::new(store))
        .with_preview_domain(config.preview_domain)
        .with_bind_address(config.bind_address))
}

/// Turn the "no workspaces" condition into a hint instead of an error chain.
fn explain(err: Error) -> anyhow::Error {
    match err {
        Error::NoWorkspaces => anyhow::anyhow!(
            "no workspaces available; add one with `spaceport workspace add <NAME> --root <DIR>`"
        ),
        other => other.into(),
    }
}

pub async fn list(workspace: &str, json: bool, cancel: &CancellationToken) -> Result<()> {
    let rows = service()
        .await?
        .list_ports(workspace, cancel)
        .await
        .map_err(explain)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No shared ports found.");
        return Ok(());
    }

    // Table header
    println!("{:<20} {:<6} {:<10} BROWSE URL", "LABEL", "PORT", "PRIVACY");
    println!("{}", "-".repeat(80));

    for row in &rows {
        println!(
            "{:<20} {:<6} {:<10} {}",
            truncate(&row.label, 20),
            row.port,
            truncate(&row.privacy, 10),
            row.browse_url
        );
    }

    println!("\nTotal: {} ports", rows.len());
    Ok(())
}

pub async fn privacy(workspace: &str, specs: &[String], cancel: &CancellationToken) -> Result<()> {
    service()
        .await?
        .update_privacy(workspace, specs, cancel)
        .await
        .map_err(explain)
}

pub async fn forward(workspace: &str, specs: &[String], cancel: &CancellationToken) -> Result<()> {
    let result = service()
        .await?
        .forward_ports(workspace, specs, cancel)
        .await;

    match result {
        Ok(()) => Ok(()),
        // Ctrl-C is the normal way to stop forwarding.
        Err(Error::Forward { .. }) if cancel.is_cancelled() => {
            info!("Stopped forwarding");
            Ok(())
        }
        Err(err) => Err(explain(err)),
    }
}
