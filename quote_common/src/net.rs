//! Shared networking constants and helpers used by client and server.

use std::time::Duration;

/// TCP port on which the quote server hands out its collection.
pub const COMMAND_PORT: u16 = 8080;

/// Connect and read timeout used by clients talking to the quote server.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Helper to format an IPv4 address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_ip_and_port() {
        assert_eq!(addr("127.0.0.1", COMMAND_PORT), "127.0.0.1:8080");
    }
}
