//! Helpers shared by the platform scanners.

pub struct Utils;

impl Utils {
    /// Split a socket address column into `(address, port)`.
    ///
    /// Accepts `127.0.0.1:3000`, `*:8080`, `[::1]:3000` and scoped
    /// addresses such as `127.0.0.53%lo:53`. An empty host becomes `*`.
    pub fn parse_address(address: &str) -> Option<(String, u16)> {
        let (host, port) = match address.strip_prefix('[') {
            Some(rest) => {
                let (inner, port) = rest.split_once("]:")?;
                (format!("[{}]", inner), port)
            }
            None => {
                let (host, port) = address.rsplit_once(':')?;
                let host = if host.is_empty() { "*" } else { host };
                (host.to_string(), port)
            }
        };
        Some((host, port.parse().ok()?))
    }
}
