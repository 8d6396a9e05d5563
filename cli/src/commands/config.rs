//! Config commands - show and change configuration.

use std::net::IpAddr;

use anyhow::Result;
use spaceport_core::ConfigStore;

pub async fn show(json: bool) -> Result<()> {
    let store = ConfigStore::new()?;
    let config = store.load().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("Config file:    {}", store.config_path().display());
    println!("Preview domain: {}", config.preview_domain);
    println!("Bind address:   {}", config.bind_address);
    println!("Workspaces:     {}", config.workspaces.len());
    for ws in &config.workspaces {
        let overrides: Vec<String> = ws
            .privacy
            .iter()
            .map(|(port, level)| format!("{}={}", port, level))
            .collect();
        if overrides.is_empty() {
            println!("  {}", ws.name);
        } else {
            println!("  {} ({})", ws.name, overrides.join(", "));
        }
    }
    Ok(())
}


pub async fn set(preview_domain: Option<String>, bind_address: Option<IpAddr>) -> Result<()> {
    let store = ConfigStore::new()?;

    if let Some(domain) = preview_domain {
        store.set_preview_domain(&domain).await?;
        println!("Preview domain set to {}", domain);
    }
    if let Some(address) = bind_address {
        store.set_bind_address(address).await?;
        println!("Bind address set to {}", address);
    }
    Ok(())
}
