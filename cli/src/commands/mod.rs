//! CLI command implementations.

pub mod config;
pub mod ports;
pub mod workspace;

/// Shorten `s` to at most `max` characters for table output.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max == 0 {
        String::new()
    } else {
        let mut short: String = s.chars().take(max - 1).collect();
        short.push('…');
        short
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("web", 5), "web");
        assert_eq!(truncate("frontend", 5), "fron…");
        assert_eq!(truncate("frontend", 1), "…");
        assert_eq!(truncate("frontend", 0), "");
    }
}
