//! RESP-speaking TCP backend.
//!
//! Speaks the two-command subset the service needs (`GET key`,
//! `SET key value EX ttl`) against any Redis-compatible server. One
//! long-lived connection is shared behind an async mutex; a failed or
//! timed-out round trip drops the connection so the next call
//! reconnects.

use crate::backend::{StoreBackend, StoreError};
use crate::config::StoreConfig;
use bytes::{BufMut, BytesMut};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// One parsed server reply.
#[derive(Debug, PartialEq, Eq)]
enum Reply {
    /// `+OK`-style simple string.
    Simple(String),
    /// Bulk payload; `None` is the nil reply.
    Bulk(Option<Vec<u8>>),
}

/// Serializes a command as a RESP array of bulk strings.
fn encode_command(parts: &[&[u8]]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(64);
    buf.put_slice(format!("*{}\r\n", parts.len()).as_bytes());
    for part in parts {
        buf.put_slice(format!("${}\r\n", part.len()).as_bytes());
        buf.put_slice(part);
        buf.put_slice(b"\r\n");
    }
    buf.to_vec()
}

/// Reads one reply from the server.
async fn read_reply<R>(reader: &mut R) -> Result<Reply, StoreError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    let read = reader.read_until(b'\n', &mut line).await?;
    if read == 0 {
        return Err(StoreError::Protocol("connection closed mid-reply".to_string()));
    }
    while line.last() == Some(&b'\n') || line.last() == Some(&b'\r') {
        line.pop();
    }
    let text = String::from_utf8_lossy(line.get(1..).unwrap_or_default()).to_string();

    match line.first() {
        Some(b'+') => Ok(Reply::Simple(text)),
        Some(b'-') => Err(StoreError::Protocol(format!("server error: {text}"))),
        Some(b':') => Ok(Reply::Simple(text)),
        Some(b'$') => {
            let length: i64 = text
                .parse()
                .map_err(|_| StoreError::Protocol(format!("bad bulk length: {text}")))?;
            if length < 0 {
                return Ok(Reply::Bulk(None));
            }
            // Payload plus trailing CRLF.
            let mut payload = vec![0u8; usize::try_from(length).unwrap_or_default() + 2];
            reader.read_exact(&mut payload).await?;
            payload.truncate(payload.len() - 2);
            Ok(Reply::Bulk(Some(payload)))
        }
        _ => Err(StoreError::Protocol(format!(
            "unexpected reply prefix: {:?}",
            line.first()
        ))),
    }
}

/// TCP backend for a Redis-compatible key/value server.
pub struct RedisBackend {
    addr: String,
    socket_timeout: Duration,
    conn: Mutex<Option<BufStream<TcpStream>>>,
}

impl RedisBackend {
    /// Creates a backend for the configured address.
    ///
    /// The connection is established lazily on first use.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            addr: config.addr(),
            socket_timeout: config.socket_timeout(),
            conn: Mutex::new(None),
        }
    }

    /// Sends one command and reads one reply, within the socket timeout.
    async fn round_trip(&self, request: &[u8]) -> Result<Reply, StoreError> {
        let mut guard = self.conn.lock().await;

        let attempt = tokio::time::timeout(self.socket_timeout, async {
            if guard.is_none() {
                let stream = TcpStream::connect(&self.addr).await?;
                *guard = Some(BufStream::new(stream));
            }
            let conn = guard
                .as_mut()
                .ok_or_else(|| StoreError::Protocol("connection missing".to_string()))?;
            conn.write_all(request).await?;
            conn.flush().await?;
            read_reply(conn).await
        })
        .await;

        match attempt {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(err)) => {
                // The stream state is unknown after a failure.
                *guard = None;
                Err(err)
            }
            Err(_) => {
                *guard = None;
                Err(StoreError::Timeout(self.socket_timeout))
            }
        }
    }
}

impl StoreBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let request = encode_command(&[b"GET", key.as_bytes()]);
        match self.round_trip(&request).await? {
            Reply::Bulk(value) => Ok(value),
            Reply::Simple(other) => Err(StoreError::Protocol(format!(
                "unexpected GET reply: {other}"
            ))),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError> {
        let seconds = ttl.as_secs().to_string();
        let request = if ttl.is_zero() {
            encode_command(&[b"SET", key.as_bytes(), value])
        } else {
            encode_command(&[b"SET", key.as_bytes(), value, b"EX", seconds.as_bytes()])
        };
        self.round_trip(&request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[test]
    fn test_encode_get() {
        let encoded = encode_command(&[b"GET", b"i:1"]);
        assert_eq!(encoded, b"*2\r\n$3\r\nGET\r\n$3\r\ni:1\r\n");
    }

    #[test]
    fn test_encode_set_with_ttl() {
        let encoded = encode_command(&[b"SET", b"k", b"v", b"EX", b"60"]);
        assert_eq!(
            encoded,
            b"*5\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n$2\r\nEX\r\n$2\r\n60\r\n"
        );
    }

    #[tokio::test]
    async fn test_read_simple_reply() {
        let mut reader = BufReader::new(&b"+OK\r\n"[..]);
        let reply = read_reply(&mut reader).await.unwrap();
        assert_eq!(reply, Reply::Simple("OK".to_string()));
    }

    #[tokio::test]
    async fn test_read_bulk_reply() {
        let mut reader = BufReader::new(&b"$4\r\nyoga\r\n"[..]);
        let reply = read_reply(&mut reader).await.unwrap();
        assert_eq!(reply, Reply::Bulk(Some(b"yoga".to_vec())));
    }

    #[tokio::test]
    async fn test_read_nil_reply() {
        let mut reader = BufReader::new(&b"$-1\r\n"[..]);
        let reply = read_reply(&mut reader).await.unwrap();
        assert_eq!(reply, Reply::Bulk(None));
    }

    #[tokio::test]
    async fn test_error_reply_is_a_protocol_error() {
        let mut reader = BufReader::new(&b"-ERR wrong number of arguments\r\n"[..]);
        let err = read_reply(&mut reader).await.unwrap_err();
        assert!(matches!(err, StoreError::Protocol(_)));
        assert!(err.to_string().contains("wrong number of arguments"));
    }

    #[tokio::test]
    async fn test_truncated_reply_is_a_protocol_error() {
        let mut reader = BufReader::new(&b""[..]);
        let err = read_reply(&mut reader).await.unwrap_err();
        assert!(matches!(err, StoreError::Protocol(_)));
    }
}
