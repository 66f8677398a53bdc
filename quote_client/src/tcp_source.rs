//! Fetching the authoritative collection from the quote server over TCP.
//!
//! The server writes one JSON array and closes the connection, so a fetch is just
//! connect, read to EOF, decode.
use log::{debug, info};
use quote_common::net::FETCH_TIMEOUT;
use quote_common::source::QuoteSource;
use quote_common::{Quote, QuoteError};
use std::io::Read;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// `QuoteSource` backed by a running quote server.
pub struct TcpQuoteSource {
    server: String,
    timeout: Duration,
}

impl TcpQuoteSource {
    /// Source for the server at `server` ("ip:port").
    pub fn new(server: &str) -> Self {
        Self {
            server: server.trim().replace('"', ""),
            timeout: FETCH_TIMEOUT,
        }
    }

    fn resolve(&self) -> Result<SocketAddr, QuoteError> {
        self.server
            .to_socket_addrs()
            .map_err(|e| QuoteError::Fetch(format!("bad server address {}: {}", self.server, e)))?
            .next()
            .ok_or_else(|| QuoteError::Fetch(format!("no address for {}", self.server)))
    }
}

impl QuoteSource for TcpQuoteSource {
    fn fetch(&self) -> Result<Vec<Quote>, QuoteError> {
        let addr = self.resolve()?;
        debug!("Connecting to quote server at {}", addr);
        let mut stream = TcpStream::connect_timeout(&addr, self.timeout)
            .map_err(|e| QuoteError::Fetch(format!("failed to connect to {}: {}", addr, e)))?;
        stream
            .set_read_timeout(Some(self.timeout))
            .map_err(|e| QuoteError::Fetch(format!("failed to configure {}: {}", addr, e)))?;

        let mut buf = Vec::new();
        stream
            .read_to_end(&mut buf)
            .map_err(|e| QuoteError::Fetch(format!("failed to read from {}: {}", addr, e)))?;

        let raw: Vec<Quote> = serde_json::from_slice(&buf)
            .map_err(|e| QuoteError::Fetch(format!("server sent invalid quotes: {}", e)))?;
        let quotes = raw
            .iter()
            .enumerate()
            .map(|(index, quote)| {
                Quote::new(&quote.text, &quote.category).map_err(|e| {
                    QuoteError::Fetch(format!("server sent invalid quote {}: {}", index, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        info!("Received {} quotes from {}", quotes.len(), addr);
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread;

    fn one_shot_server(body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream.write_all(body).unwrap();
        });
        addr
    }

    #[test]
    fn fetch_decodes_server_array() {
        let addr = one_shot_server(br#"[{"text":"A","category":"X"}]"#);
        let quotes = TcpQuoteSource::new(&addr).fetch().unwrap();
        assert_eq!(quotes, vec![Quote::new("A", "X").unwrap()]);
    }

    #[test]
    fn fetch_rejects_garbage() {
        let addr = one_shot_server(b"PING");
        let result = TcpQuoteSource::new(&addr).fetch();
        assert!(matches!(result, Err(QuoteError::Fetch(_))));
    }

    #[test]
    fn fetch_rejects_blank_quote() {
        let addr = one_shot_server(br#"[{"text":"A","category":"X"},{"text":"  ","category":""}]"#);
        let result = TcpQuoteSource::new(&addr).fetch();
        assert!(matches!(result, Err(QuoteError::Fetch(_))));
    }

    #[test]
    fn fetch_reports_refused_connection() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().to_string()
        };
        let result = TcpQuoteSource::new(&addr).fetch();
        assert!(matches!(result, Err(QuoteError::Fetch(_))));
    }
}
