//! Request/reply transport
//!
//! The codec only needs "send this argument list, give me the reply".
//! `Transport` is that seam; `Connection` implements it over a single TCP
//! connection speaking RESP. Pooling, retries and cluster routing are left
//! to whatever sits behind a custom `Transport`.

use crate::config::ClientConfig;
use crate::error::{GraphError, GraphResult};
use crate::protocol::resp::{RespError, RespValue};
use async_trait::async_trait;
use bytes::BytesMut;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info};

/// Sends one command and returns its reply
///
/// Error replies from the server come back as `GraphError::Server` with the
/// server's message unchanged.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, args: Vec<String>) -> GraphResult<RespValue>;
}

struct ConnectionState {
    stream: TcpStream,
    buffer: BytesMut,
    /// Set while a command is awaiting its reply. Still set on entry means
    /// an earlier reply was abandoned and would answer the wrong command.
    in_flight: bool,
}

/// Single RESP connection; concurrent callers are served one at a time
pub struct Connection {
    state: Mutex<ConnectionState>,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl Connection {
    /// Connect, then authenticate and select the database when configured
    pub async fn connect(config: &ClientConfig) -> GraphResult<Self> {
        let endpoint = config.endpoint();
        let stream = timeout(config.connect_timeout(), TcpStream::connect(&endpoint))
            .await
            .map_err(|_| GraphError::Connection(format!("Timed out connecting to {}", endpoint)))?
            .map_err(|e| GraphError::Connection(format!("Failed to connect to {}: {}", endpoint, e)))?;
        stream.set_nodelay(true)?;

        info!("Connected to {}", endpoint);

        let conn = Self {
            state: Mutex::new(ConnectionState {
                stream,
                buffer: BytesMut::with_capacity(4096),
                in_flight: false,
            }),
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
        };

        if let Some(password) = &config.password {
            let mut args = vec!["AUTH".to_string()];
            if let Some(username) = &config.username {
                args.push(username.clone());
            }
            args.push(password.clone());
            conn.execute(args).await?;
        }

        if config.database != 0 {
            conn.execute(vec!["SELECT".to_string(), config.database.to_string()])
                .await?;
        }

        Ok(conn)
    }

    async fn read_reply(&self, state: &mut ConnectionState) -> GraphResult<RespValue> {
        loop {
            if let Some(value) = try_parse(&mut state.buffer)? {
                return Ok(value);
            }

            let n = timeout(self.read_timeout, state.stream.read_buf(&mut state.buffer))
                .await
                .map_err(|_| GraphError::Connection("Timed out waiting for reply".to_string()))??;

            if n == 0 {
                return Err(GraphError::Connection("Connection closed by server".to_string()));
            }
        }
    }
}

#[async_trait]
impl Transport for Connection {
    async fn execute(&self, args: Vec<String>) -> GraphResult<RespValue> {
        if let Some(cmd) = args.first() {
            debug!("Sending {} ({} args)", cmd, args.len());
        }

        let mut frame = Vec::new();
        RespValue::command(&args).encode(&mut frame)?;

        let mut state = self.state.lock().await;
        if state.in_flight {
            return Err(GraphError::Connection(
                "Connection out of sync after an interrupted command".to_string(),
            ));
        }

        state.in_flight = true;
        timeout(self.write_timeout, state.stream.write_all(&frame))
            .await
            .map_err(|_| GraphError::Connection("Timed out sending command".to_string()))??;

        let reply = self.read_reply(&mut state).await?;
        state.in_flight = false;

        match reply {
            RespValue::Error(msg) => Err(GraphError::Server(msg)),
            reply => Ok(reply),
        }
    }
}

/// Decode one complete value from the front of the buffer
///
/// Decoding runs on a copy so that a partial value leaves the buffer intact
/// until the rest of it arrives.
fn try_parse(buffer: &mut BytesMut) -> GraphResult<Option<RespValue>> {
    let mut probe = buffer.clone();
    match RespValue::decode(&mut probe) {
        Ok(Some(value)) => {
            *buffer = probe;
            Ok(Some(value))
        }
        Ok(None) | Err(RespError::Incomplete) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Accept one connection and answer each incoming command with the next
    /// canned reply, returning the raw requests seen
    async fn fake_server(replies: Vec<&'static [u8]>) -> (ClientConfig, tokio::task::JoinHandle<Vec<Vec<u8>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut seen = Vec::new();
            for reply in replies {
                let mut buf = BytesMut::with_capacity(1024);
                loop {
                    socket.read_buf(&mut buf).await.unwrap();
                    let mut probe = buf.clone();
                    if let Ok(Some(_)) = RespValue::decode(&mut probe) {
                        break;
                    }
                }
                seen.push(buf.to_vec());
                // split the reply to exercise partial reads
                let mid = reply.len() / 2;
                socket.write_all(&reply[..mid]).await.unwrap();
                socket.flush().await.unwrap();
                tokio::time::sleep(Duration::from_millis(10)).await;
                socket.write_all(&reply[mid..]).await.unwrap();
            }
            seen
        });

        (ClientConfig::new("127.0.0.1", port), handle)
    }

    #[tokio::test]
    async fn test_round_trip_over_tcp() {
        let (config, server) = fake_server(vec![&b"*1\r\n*1\r\n$16\r\nNodes created: 1\r\n"[..]]).await;
        let conn = Connection::connect(&config).await.unwrap();

        let reply = conn
            .execute(vec!["GRAPH.QUERY".to_string(), "g".to_string(), "CREATE ()".to_string()])
            .await
            .unwrap();
        assert_eq!(
            reply,
            RespValue::Array(vec![RespValue::Array(vec![RespValue::bulk("Nodes created: 1")])])
        );

        let seen = server.await.unwrap();
        assert_eq!(seen[0], b"*3\r\n$11\r\nGRAPH.QUERY\r\n$1\r\ng\r\n$9\r\nCREATE ()\r\n".to_vec());
    }

    #[tokio::test]
    async fn test_server_error_passthrough() {
        let (config, server) = fake_server(vec![&b"-errMsg: Invalid input 'X'\r\n"[..]]).await;
        let conn = Connection::connect(&config).await.unwrap();

        match conn.execute(vec!["GRAPH.QUERY".to_string()]).await {
            Err(GraphError::Server(msg)) => assert_eq!(msg, "errMsg: Invalid input 'X'"),
            other => panic!("expected server error, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_auth_and_select_on_connect() {
        let (mut config, server) = fake_server(vec![&b"+OK\r\n"[..], &b"+OK\r\n"[..], &b"+PONG\r\n"[..]]).await;
        config.password = Some("secret".to_string());
        config.database = 3;

        let conn = Connection::connect(&config).await.unwrap();
        let pong = conn.execute(vec!["PING".to_string()]).await.unwrap();
        assert_eq!(pong, RespValue::SimpleString("PONG".to_string()));

        let seen = server.await.unwrap();
        assert_eq!(seen[0], b"*2\r\n$4\r\nAUTH\r\n$6\r\nsecret\r\n".to_vec());
        assert_eq!(seen[1], b"*2\r\n$6\r\nSELECT\r\n$1\r\n3\r\n".to_vec());
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = Connection::connect(&ClientConfig::new("127.0.0.1", port)).await;
        assert!(matches!(result, Err(GraphError::Connection(_))));
    }

    #[tokio::test]
    async fn test_timed_out_reply_is_not_handed_to_next_command() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = BytesMut::with_capacity(1024);
            socket.read_buf(&mut buf).await.unwrap();
            tokio::time::sleep(Duration::from_millis(300)).await;
            socket.write_all(b"+FIRST\r\n").await.unwrap();
            buf.clear();
            // answer a second command if one ever arrives
            if socket.read_buf(&mut buf).await.unwrap_or(0) > 0 {
                let _ = socket.write_all(b"+SECOND\r\n").await;
            }
        });

        let mut config = ClientConfig::new("127.0.0.1", port);
        config.read_timeout_ms = 100;
        let conn = Connection::connect(&config).await.unwrap();

        let first = conn.execute(vec!["GRAPH.QUERY".to_string()]).await;
        assert!(matches!(first, Err(GraphError::Connection(_))));

        tokio::time::sleep(Duration::from_millis(400)).await;
        let second = conn.execute(vec!["PING".to_string()]).await;
        match second {
            Err(GraphError::Connection(_)) => {}
            other => panic!("expected the connection to refuse reuse, got {:?}", other),
        }

        drop(conn);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_server_error_keeps_connection_usable() {
        let (config, server) = fake_server(vec![&b"-ERR boom\r\n"[..], &b"+PONG\r\n"[..]]).await;
        let conn = Connection::connect(&config).await.unwrap();

        assert!(matches!(
            conn.execute(vec!["GRAPH.QUERY".to_string()]).await,
            Err(GraphError::Server(_))
        ));
        let pong = conn.execute(vec!["PING".to_string()]).await.unwrap();
        assert_eq!(pong, RespValue::SimpleString("PONG".to_string()));
        server.await.unwrap();
    }

    #[test]
    fn test_try_parse_keeps_partial_value() {
        let mut buffer = BytesMut::from(&b"*2\r\n:1\r\n"[..]);
        assert_eq!(try_parse(&mut buffer).unwrap(), None);
        assert_eq!(&buffer[..], b"*2\r\n:1\r\n");

        buffer.extend_from_slice(b":2\r\n+OK\r\n");
        assert_eq!(
            try_parse(&mut buffer).unwrap(),
            Some(RespValue::Array(vec![RespValue::Integer(1), RespValue::Integer(2)]))
        );
        assert_eq!(&buffer[..], b"+OK\r\n");
    }
}
