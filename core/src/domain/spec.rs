//! Parsers for the textual port arguments accepted on the command line.
//!
//! - Privacy specs: `"<port>:<privacy>"`, e.g. `"8080:public"`.
//! - Forward specs: `"<remote>:<local>"`, e.g. `"8080:18080"`.
//!
//! Parsing is pure. Callers run it over every argument before any network
//! call, so one malformed spec aborts the whole command without side effects.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A requested privacy change for one shared port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacySpec {
    /// Remote port number. Range checks are left to the session.
    pub port: i64,
    /// Privacy level, passed through to the session unvalidated.
    pub privacy: String,
}

/// A remote port paired with the local port it should be forwarded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortPair {
    /// Remote port number, passed through to the session unchecked.
    pub remote: i64,
    /// Local port the listener binds to.
    pub local: u16,
}

impl std::fmt::Display for PortPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "remote {} <=> local {}", self.remote, self.local)
    }
}

fn parse_port(field: &str, what: &str) -> Result<i64> {
    field
        .parse()
        .map_err(|e| Error::InvalidArgument(format!("invalid {} port {:?}: {}", what, field, e)))
}

fn parse_local_port(field: &str) -> Result<u16> {
    let port = parse_port(field, "local")?;
    u16::try_from(port).map_err(|_| {
        Error::InvalidArgument(format!("local port {} is outside 0-65535", port))
    })
}

/// Parse a list of `"<port>:<privacy>"` specs.
pub fn parse_privacy_specs<S: AsRef<str>>(specs: &[S]) -> Result<Vec<PrivacySpec>> {
    specs
        .iter()
        .map(|spec| {
            let spec = spec.as_ref();
            let fields: Vec<&str> = spec.split(':').collect();
            let [port, privacy] = fields[..] else {
                return Err(Error::InvalidArgument(format!(
                    "invalid port privacy format for {:?}",
                    spec
                )));
            };
            Ok(PrivacySpec {
                port: parse_port(port, "privacy")?,
                privacy: privacy.to_string(),
            })
        })
        .collect()
}

/// Parse a list of `"<remote>:<local>"` specs.
///
/// Fields after the second one are ignored, so `"8080:18080:tcp"` is
/// accepted as `8080:18080`.
pub fn parse_port_pairs<S: AsRef<str>>(specs: &[S]) -> Result<Vec<PortPair>> {
    specs
        .iter()
        .map(|spec| {
            let spec = spec.as_ref();
            let mut fields = spec.split(':');
            let (Some(remote), Some(local)) = (fields.next(), fields.next()) else {
                return Err(Error::InvalidArgument(format!(
                    "port pair {:?} is not valid",
                    spec
                )));
            };
            Ok(PortPair {
                remote: parse_port(remote, "remote")?,
                local: parse_local_port(local)?,
            })
        })
        .collect()
}
