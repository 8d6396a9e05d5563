//! Workspace commands - manage local workspaces.

use std::path::PathBuf;

use anyhow::{Context, Result};
use spaceport_core::{ConfigStore, WorkspaceEntry};

use super::truncate;

pub async fn add(name: String, root: PathBuf, host: Option<String>) -> Result<()> {
    let root = tokio::fs::canonicalize(&root)
        .await
        .with_context(|| format!("Workspace root {} is not accessible", root.display()))?;

    let mut entry = WorkspaceEntry::new(name, root);
    if let Some(host) = host {
        entry = entry.with_host(host);
    }

    let store = ConfigStore::new()?;
    store.add_workspace(entry.clone()).await?;
    println!("Added workspace {} ({})", entry.name, entry.root.display());
    Ok(())
}

pub async fn remove(name: &str) -> Result<()> {
    let store = ConfigStore::new()?;
    store.remove_workspace(name).await?;
    println!("Removed workspace {}", name);
    Ok(())
}

pub async fn list(json: bool) -> Result<()> {
    let store = ConfigStore::new()?;
    let workspaces = store.get_workspaces().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&workspaces)?);
        return Ok(());
    }

    if workspaces.is_empty() {
        println!("No workspaces configured.");
        return Ok(());
    }

    println!("{:<24} {:<16} ROOT", "NAME", "HOST");
    println!("{}", "-".repeat(80));
    for ws in &workspaces {
        println!(
            "{:<24} {:<16} {}",
            truncate(&ws.name, 24),
            truncate(&ws.host, 16),
            ws.root.display()
        );
    }
    Ok(())
}
