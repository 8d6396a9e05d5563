//! macOS port scanner implementation using lsof.

use std::collections::HashSet;
use std::process::Stdio;

use tokio::process::Command;

use crate::domain::ListeningPort;
use crate::error::{Error, Result};

use super::utils::Utils;
use super::Scanner;

/// macOS-specific port scanner using lsof.
pub struct DarwinScanner;

impl DarwinScanner {
    /// Create a new macOS scanner.
    pub fn new() -> Self {
        Self
    }

    /// Parse lsof output into listening ports.
    fn parse_lsof_output(&self, output: &str) -> Vec<ListeningPort> {
        let mut ports = Vec::new();
        let mut seen: HashSet<u16> = HashSet::new();

        for line in output.lines().skip(1) {
            if line.is_empty() {
                continue;
            }

            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 9 {
                continue;
            }

            let address_part = components[8..]
                .iter()
                .rev()
                .find(|c| c.contains(':') && !c.starts_with("0x") && !c.starts_with("0t"));

            let Some((address, port)) = address_part.and_then(|a| Utils::parse_address(a)) else {
                continue;
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

impl Default for DarwinScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for DarwinScanner {
    async fn scan(&self) -> Result<Vec<ListeningPort>> {
        let output = Command::new("/usr/sbin/lsof")
            .args(["-iTCP", "-sTCP:LISTEN", "-P", "-n"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run lsof: {}", e)))?;

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in lsof output: {}", e)))?;

        Ok(self.parse_lsof_output(&stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lsof_output() {
        let scanner = DarwinScanner::new();

        let output = r#"COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
node     34805  code   19u  IPv6 0x3d8015e195af1f3f      0t0  TCP [::1]:3000 (LISTEN)
nginx        1  root    6u  IPv4 0x1234567890abcdef      0t0  TCP *:80 (LISTEN)
nginx        1  root    7u  IPv6 0x1234567890abcdee      0t0  TCP *:80 (LISTEN)
"#;

        let ports = scanner.parse_lsof_output(output);
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0], ListeningPort::new(80, "*"));
        assert_eq!(ports[1], ListeningPort::new(3000, "[::1]"));
    }
}
