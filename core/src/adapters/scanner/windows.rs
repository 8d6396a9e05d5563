//! Windows port scanner placeholder.

use crate::domain::ListeningPort;
use crate::error::{Error, Result};

use super::Scanner;

/// Windows-specific port scanner.
pub struct WindowsScanner;

impl WindowsScanner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for WindowsScanner {
    async fn scan(&self) -> Result<Vec<ListeningPort>> {
        Err(Error::UnsupportedPlatform(
            "listing listening ports is not supported on Windows".to_string(),
        ))
    }
}
