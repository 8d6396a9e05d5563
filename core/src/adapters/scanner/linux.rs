//! Linux port scanner implementation using ss.

use std::collections::HashSet;
use std::process::Stdio;

use tokio::process::Command;

use crate::domain::ListeningPort;
use crate::error::{Error, Result};

use super::utils::Utils;
use super::Scanner;

/// Linux-specific port scanner.
pub struct LinuxScanner;

impl LinuxScanner {
    pub fn new() -> Self {
        Self
    }

    fn parse_ss_output(&self, output: &str) -> Vec<ListeningPort> {
        let mut ports = Vec::new();
        let mut seen: HashSet<u16> = HashSet::new();

        for line in output.lines() {
            if line.is_empty() {
                continue;
            }

            // State Recv-Q Send-Q Local-Address:Port Peer-Address:Port
            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 5 {
                continue;
            }

            let (address, port) = match Utils::parse_address(components[3]) {
                Some((a, p)) => (a, p),
                None => continue,
            };

            if !seen.insert(port) {
                continue;
            }

            ports.push(ListeningPort::new(port, address));
        }

        ports.sort_by_key(|p| p.port);
        ports
    }
}

impl Default for LinuxScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for LinuxScanner {
    async fn scan(&self) -> Result<Vec<ListeningPort>> {
        let output = Command::new("ss")
            .args(["-Htln"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run ss: {}", e)))?;

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in ss output: {}", e)))?;

        Ok(self.parse_ss_output(&stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ss_output() {
        let scanner = LinuxScanner::new();

        let output = "LISTEN 0      4096   127.0.0.53%lo:53        0.0.0.0:*\n\
                      LISTEN 0      511          0.0.0.0:8080      0.0.0.0:*\n\
                      LISTEN 0      511             [::]:8080         [::]:*\n\
                      LISTEN 0      128        127.0.0.1:3000      0.0.0.0:*\n";

        let ports = scanner.parse_ss_output(output);
        assert_eq!(
            ports,
            vec![
                ListeningPort::new(53, "127.0.0.53%lo"),
                ListeningPort::new(3000, "127.0.0.1"),
                ListeningPort::new(8080, "0.0.0.0"),
            ]
        );
    }
}
