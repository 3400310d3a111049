use crate::backend::CacheBackend;
use crate::entry::CacheEntry;
use async_trait::async_trait;
use quickplay_core::{QuickplayError, Result};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Dial timeout, applied to the startup connect and every lazy reconnect.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Largest relative `exptime` the memcached protocol accepts; anything
/// bigger is read as an absolute timestamp, which we never send.
const MAX_EXPTIME_SECS: u64 = 60 * 60 * 24 * 30;

type Conn = BufStream<TcpStream>;

/// Networked cache storage speaking the memcached text protocol.
///
/// Entries are stored with a server-managed `exptime`, so the server evicts
/// them on its own and no shutdown flush is needed. A dropped connection is
/// redialed lazily on the next operation.
pub struct RemoteBackend {
    addr: String,
    conn: Mutex<Option<Conn>>,
}

impl RemoteBackend {
    /// Connects to the memcached server at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`QuickplayError::Cache`] when the server cannot be reached.
    /// Connection drops after startup do not kill the backend; the next
    /// operation reconnects.
    pub async fn connect(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        let conn = dial(&addr).await?;
        Ok(Self {
            addr,
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Locks the connection slot, redialing if the last operation broke it.
    async fn connection(&self) -> Result<tokio::sync::MutexGuard<'_, Option<Conn>>> {
        let mut guard = self.conn.lock().await;
        if guard.is_none() {
            *guard = Some(dial(&self.addr).await?);
        }
        Ok(guard)
    }
}

async fn dial(addr: &str) -> Result<Conn> {
    let stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(addr))
        .await
        .map_err(|_| QuickplayError::Cache(format!("connect to {addr} timed out")))?
        .map_err(|e| QuickplayError::Cache(format!("connect to {addr} failed: {e}")))?;
    Ok(BufStream::new(stream))
}

fn io_err(context: &str, e: &std::io::Error) -> QuickplayError {
    QuickplayError::Cache(format!("{context}: {e}"))
}

/// Memcached keys must be free of whitespace and control characters.
fn check_key(key: &str) -> Result<()> {
    if key.is_empty() || key.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(QuickplayError::Cache(format!(
            "key not usable with remote backend: {key:?}"
        )));
    }
    Ok(())
}

async fn send(conn: &mut Conn, bytes: &[u8]) -> Result<()> {
    conn.write_all(bytes)
        .await
        .map_err(|e| io_err("send command", &e))?;
    conn.flush().await.map_err(|e| io_err("flush command", &e))
}

async fn read_reply_line(conn: &mut Conn) -> Result<String> {
    let mut line = String::new();
    let n = conn
        .read_line(&mut line)
        .await
        .map_err(|e| io_err("read reply", &e))?;
    if n == 0 {
        return Err(QuickplayError::Cache("connection closed by server".into()));
    }
    Ok(line)
}

/// Parses `VALUE <key> <flags> <bytes>`, returning the byte count.
fn parse_value_header(line: &str) -> Option<usize> {
    let mut fields = line.split_whitespace();
    if fields.next() != Some("VALUE") {
        return None;
    }
    fields.next()?; // key
    fields.next()?; // flags
    fields.next()?.parse().ok()
}

async fn fetch(conn: &mut Conn, key: &str) -> Result<Option<CacheEntry>> {
    send(conn, format!("get {key}\r\n").as_bytes()).await?;

    let header = read_reply_line(conn).await?;
    if header.starts_with("END") {
        return Ok(None);
    }
    let Some(len) = parse_value_header(&header) else {
        return Err(QuickplayError::Cache(format!(
            "unexpected reply: {}",
            header.trim_end()
        )));
    };

    // Value bytes plus their trailing \r\n, then the END line.
    let mut data = vec![0u8; len + 2];
    conn.read_exact(&mut data)
        .await
        .map_err(|e| io_err("read value", &e))?;
    data.truncate(len);

    let end = read_reply_line(conn).await?;
    if !end.starts_with("END") {
        return Err(QuickplayError::Cache(format!(
            "unexpected trailer: {}",
            end.trim_end()
        )));
    }

    // A corrupt value is a miss, same as the file backend.
    Ok(serde_json::from_slice(&data).ok())
}

async fn store(conn: &mut Conn, entry: &CacheEntry) -> Result<()> {
    let value = serde_json::to_string(entry)
        .map_err(|e| QuickplayError::Cache(format!("encode entry: {e}")))?;
    let exptime = entry.ttl_remaining_secs().clamp(1, MAX_EXPTIME_SECS);
    let command = format!("set {} 0 {} {}\r\n", entry.key, exptime, value.len());

    conn.write_all(command.as_bytes())
        .await
        .map_err(|e| io_err("send command", &e))?;
    conn.write_all(value.as_bytes())
        .await
        .map_err(|e| io_err("send value", &e))?;
    send(conn, b"\r\n").await?;

    let reply = read_reply_line(conn).await?;
    if reply.starts_with("STORED") {
        Ok(())
    } else {
        Err(QuickplayError::Cache(format!(
            "set rejected: {}",
            reply.trim_end()
        )))
    }
}

async fn erase(conn: &mut Conn, key: &str) -> Result<()> {
    send(conn, format!("delete {key}\r\n").as_bytes()).await?;
    let reply = read_reply_line(conn).await?;
    if reply.starts_with("DELETED") || reply.starts_with("NOT_FOUND") {
        Ok(())
    } else {
        Err(QuickplayError::Cache(format!(
            "delete rejected: {}",
            reply.trim_end()
        )))
    }
}

async fn erase_all(conn: &mut Conn) -> Result<()> {
    send(conn, b"flush_all\r\n").await?;
    let reply = read_reply_line(conn).await?;
    if reply.starts_with("OK") {
        Ok(())
    } else {
        Err(QuickplayError::Cache(format!(
            "flush_all rejected: {}",
            reply.trim_end()
        )))
    }
}

#[async_trait]
impl CacheBackend for RemoteBackend {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        check_key(key)?;
        let mut guard = self.connection().await?;
        let Some(conn) = guard.as_mut() else {
            return Err(QuickplayError::Cache("connection missing".into()));
        };

        let result = fetch(conn, key).await;
        if result.is_err() {
            *guard = None;
        }
        result
    }

    async fn set(&self, entry: CacheEntry) -> Result<()> {
        check_key(&entry.key)?;
        let mut guard = self.connection().await?;
        let Some(conn) = guard.as_mut() else {
            return Err(QuickplayError::Cache("connection missing".into()));
        };

        let result = store(conn, &entry).await;
        if result.is_err() {
            *guard = None;
        }
        result
    }

    async fn remove(&self, key: &str) -> Result<()> {
        check_key(key)?;
        let mut guard = self.connection().await?;
        let Some(conn) = guard.as_mut() else {
            return Err(QuickplayError::Cache("connection missing".into()));
        };

        let result = erase(conn, key).await;
        if result.is_err() {
            *guard = None;
        }
        result
    }

    async fn flush(&self) -> Result<()> {
        let mut guard = self.connection().await?;
        let Some(conn) = guard.as_mut() else {
            return Err(QuickplayError::Cache("connection missing".into()));
        };

        let result = erase_all(conn).await;
        if result.is_err() {
            *guard = None;
        }
        result
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    async fn listen() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        (listener, addr)
    }

    #[tokio::test]
    async fn test_connect_refused_is_an_error() {
        let err = RemoteBackend::connect("127.0.0.1:1").await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_get_miss_on_end_reply() {
        let (listener, addr) = listen().await;
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut stream = BufReader::new(stream);
            let mut line = String::new();
            stream.read_line(&mut line).await.unwrap();
            assert_eq!(line, "get pick\r\n");
            stream.get_mut().write_all(b"END\r\n").await.unwrap();
        });

        let backend = RemoteBackend::connect(addr).await.unwrap();
        assert!(backend.get("pick").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_parses_value_reply() {
        let (listener, addr) = listen().await;
        let entry = CacheEntry::new("pick", r#"{"name":"a"}"#, Duration::from_secs(60), 3);
        let value = serde_json::to_string(&entry).unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut stream = BufReader::new(stream);
            let mut line = String::new();
            stream.read_line(&mut line).await.unwrap();
            let reply = format!("VALUE pick 0 {}\r\n{}\r\nEND\r\n", value.len(), value);
            stream.get_mut().write_all(reply.as_bytes()).await.unwrap();
        });

        let backend = RemoteBackend::connect(addr).await.unwrap();
        let got = backend.get("pick").await.unwrap().unwrap();
        assert_eq!(got.payload, r#"{"name":"a"}"#);
        assert_eq!(got.generation, 3);
    }

    #[tokio::test]
    async fn test_get_corrupt_value_is_miss() {
        let (listener, addr) = listen().await;
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut stream = BufReader::new(stream);
            let mut line = String::new();
            stream.read_line(&mut line).await.unwrap();
            stream
                .get_mut()
                .write_all(b"VALUE pick 0 8\r\nnot-json\r\nEND\r\n")
                .await
                .unwrap();
        });

        let backend = RemoteBackend::connect(addr).await.unwrap();
        assert!(backend.get("pick").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_sends_protocol_framing() {
        let (listener, addr) = listen().await;
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut stream = BufReader::new(stream);
            let mut command = String::new();
            stream.read_line(&mut command).await.unwrap();
            let mut data = String::new();
            stream.read_line(&mut data).await.unwrap();
            stream.get_mut().write_all(b"STORED\r\n").await.unwrap();
            let _ = tx.send((command, data));
        });

        let backend = RemoteBackend::connect(addr).await.unwrap();
        let entry = CacheEntry::new("pick", r#"{"x":1}"#, Duration::from_secs(60), 2);
        backend.set(entry.clone()).await.unwrap();

        let (command, data) = rx.await.unwrap();
        let fields: Vec<&str> = command.split_whitespace().collect();
        assert_eq!(fields[0], "set");
        assert_eq!(fields[1], "pick");
        assert_eq!(fields[2], "0");
        let exptime: u64 = fields[3].parse().unwrap();
        assert!((1..=60).contains(&exptime));

        let sent: CacheEntry = serde_json::from_str(data.trim_end()).unwrap();
        assert_eq!(sent.key, "pick");
        assert_eq!(sent.payload, r#"{"x":1}"#);
        assert_eq!(sent.generation, 2);
        assert_eq!(fields[4].parse::<usize>().unwrap(), data.trim_end().len());
    }

    #[tokio::test]
    async fn test_delete_tolerates_not_found() {
        let (listener, addr) = listen().await;
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut stream = BufReader::new(stream);
            let mut line = String::new();
            stream.read_line(&mut line).await.unwrap();
            assert_eq!(line, "delete ghost\r\n");
            stream.get_mut().write_all(b"NOT_FOUND\r\n").await.unwrap();
        });

        let backend = RemoteBackend::connect(addr).await.unwrap();
        backend.remove("ghost").await.unwrap();
    }

    #[tokio::test]
    async fn test_flush_sends_flush_all() {
        let (listener, addr) = listen().await;
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut stream = BufReader::new(stream);
            let mut line = String::new();
            stream.read_line(&mut line).await.unwrap();
            assert_eq!(line, "flush_all\r\n");
            stream.get_mut().write_all(b"OK\r\n").await.unwrap();
        });

        let backend = RemoteBackend::connect(addr).await.unwrap();
        backend.flush().await.unwrap();
    }

    #[tokio::test]
    async fn test_reconnects_after_connection_drop() {
        let (listener, addr) = listen().await;
        tokio::spawn(async move {
            // First connection answers one get, then drops.
            let (stream, _) = listener.accept().await.unwrap();
            let mut stream = BufReader::new(stream);
            let mut line = String::new();
            stream.read_line(&mut line).await.unwrap();
            stream.get_mut().write_all(b"END\r\n").await.unwrap();
            drop(stream);

            // Second connection serves the retried operation.
            let (stream, _) = listener.accept().await.unwrap();
            let mut stream = BufReader::new(stream);
            let mut line = String::new();
            stream.read_line(&mut line).await.unwrap();
            stream.get_mut().write_all(b"END\r\n").await.unwrap();
        });

        let backend = RemoteBackend::connect(addr).await.unwrap();
        assert!(backend.get("pick").await.unwrap().is_none());

        // The dead connection surfaces one error, then the backend redials.
        assert!(backend.get("pick").await.is_err());
        assert!(backend.get("pick").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_whitespace_key_rejected() {
        let (listener, addr) = listen().await;
        tokio::spawn(async move {
            let _conn = listener.accept().await.unwrap();
            std::future::pending::<()>().await;
        });

        let backend = RemoteBackend::connect(addr).await.unwrap();
        assert!(backend.get("bad key").await.is_err());
        assert!(backend.remove("worse\tkey").await.is_err());
    }

    #[test]
    fn test_parse_value_header() {
        assert_eq!(parse_value_header("VALUE pick 0 42\r\n"), Some(42));
        assert_eq!(parse_value_header("VALUE list:2:10 0 7\r\n"), Some(7));
        assert_eq!(parse_value_header("END\r\n"), None);
        assert_eq!(parse_value_header("VALUE pick 0 many\r\n"), None);
    }

    #[test]
    fn test_no_shutdown_flush_needed() {
        // Expiry is exptime-driven on the server.
        let backend = RemoteBackend {
            addr: String::new(),
            conn: Mutex::new(None),
        };
        assert!(!backend.requires_shutdown_flush());
        assert_eq!(backend.name(), "remote");
    }
}
