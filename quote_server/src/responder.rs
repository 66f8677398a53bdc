use log::{debug, error, info};
use quote_common::Quote;
use quote_common::QuoteError;
use std::io::Write;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// TCP responder that hands out the authoritative quote collection.
///
/// Every accepted connection receives the whole collection as one JSON array and
/// is then closed. The payload is encoded once up front and shared between the
/// per-connection threads.
pub struct QuoteResponder {
    /// The underlying TCP listening socket.
    pub(crate) socket: TcpListener,
    payload: Arc<Vec<u8>>,
    delay: Duration,
}

impl QuoteResponder {
    /// Bind a new responder to `bind_addr` (e.g., `0.0.0.0:8080`) serving `quotes`.
    pub fn new(bind_addr: &str, quotes: &[Quote], delay: Duration) -> Result<Self, QuoteError> {
        let socket = TcpListener::bind(bind_addr)?;
        let payload = Arc::new(serde_json::to_vec(quotes)?);
        Ok(Self {
            socket,
            payload,
            delay,
        })
    }

    /// Address the responder actually listens on.
    pub fn local_addr(&self) -> Result<SocketAddr, QuoteError> {
        Ok(self.socket.local_addr()?)
    }

    /// Blocking accept loop. A failing client is logged and never stops the loop.
    pub(crate) fn serve(self) -> Result<(), QuoteError> {
        info!("Quote server is started on {}", self.local_addr()?);

        for stream in self.socket.incoming() {
            match stream {
                Ok(stream) => {
                    let payload = Arc::clone(&self.payload);
                    let delay = self.delay;
                    thread::spawn(move || {
                        if let Err(e) = respond(stream, &payload, delay) {
                            error!("Failed to answer client: {}", e);
                        }
                    });
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}

fn respond(mut stream: TcpStream, payload: &[u8], delay: Duration) -> Result<(), QuoteError> {
    let peer = stream.peer_addr()?;
    debug!("Client connected: {}", peer);
    if !delay.is_zero() {
        thread::sleep(delay);
    }
    stream.write_all(payload)?;
    stream.flush()?;
    info!("Sent {} bytes of quotes to {}", payload.len(), peer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn fetch_raw(addr: SocketAddr) -> Vec<u8> {
        let mut stream = TcpStream::connect(addr).unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn serves_collection_to_every_client() {
        let quotes = Quote::server_defaults();
        let responder = QuoteResponder::new("127.0.0.1:0", &quotes, Duration::ZERO).unwrap();
        let addr = responder.local_addr().unwrap();
        thread::spawn(move || responder.serve());

        for _ in 0..2 {
            let decoded: Vec<Quote> = serde_json::from_slice(&fetch_raw(addr)).unwrap();
            assert_eq!(decoded, quotes);
        }
    }

    #[test]
    fn bind_failure_is_an_io_error() {
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap().to_string();
        let result = QuoteResponder::new(&addr, &[], Duration::ZERO);
        assert!(matches!(result, Err(QuoteError::Io(_))));
    }
}
