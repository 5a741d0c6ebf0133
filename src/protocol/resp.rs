//! RESP (Redis Serialization Protocol) values and framing
//!
//! The generic reply tree every graph command returns, plus the wire
//! encoding used by the client connection. RESP2 types are complete; of
//! RESP3 only the scalar types a graph server emits (null, double, boolean)
//! are understood.
//! Based on the RESP3 specification: https://redis.io/docs/reference/protocol-spec/

use bytes::{Buf, BytesMut};
use std::io::{self, Write};
use thiserror::Error;

/// RESP protocol errors
#[derive(Error, Debug)]
pub enum RespError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Protocol parsing error
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Incomplete data
    #[error("Incomplete data")]
    Incomplete,

    /// Invalid encoding
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
}

pub type RespResult<T> = Result<T, RespError>;

/// Largest bulk string a reply may declare (512 MiB, the Redis default)
const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

/// Largest element count an array may declare
const MAX_ARRAY_LEN: i64 = i32::MAX as i64;

/// RESP value types
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    /// Simple string: +OK\r\n
    SimpleString(String),
    /// Error: -ERR message\r\n
    Error(String),
    /// Integer: :1000\r\n
    Integer(i64),
    /// Bulk string: $6\r\nfoobar\r\n (or $-1\r\n for null)
    BulkString(Option<Vec<u8>>),
    /// Array: *2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n
    Array(Vec<RespValue>),
    /// Null: _\r\n (RESP3)
    Null,
    /// Double: ,3.14\r\n (RESP3)
    Double(f64),
    /// Boolean: #t\r\n (RESP3)
    Boolean(bool),
}

impl RespValue {
    /// Build a bulk string from text
    pub fn bulk(s: impl Into<String>) -> Self {
        RespValue::BulkString(Some(s.into().into_bytes()))
    }

    /// Build the request frame for an argument list: an array of bulk strings
    pub fn command<S: AsRef<str>>(args: &[S]) -> Self {
        RespValue::Array(args.iter().map(|a| RespValue::bulk(a.as_ref())).collect())
    }

    /// Encode RESP value to bytes
    pub fn encode(&self, buf: &mut Vec<u8>) -> io::Result<()> {
        match self {
            RespValue::SimpleString(s) => {
                write!(buf, "+{}\r\n", s)?;
            }
            RespValue::Error(e) => {
                write!(buf, "-{}\r\n", e)?;
            }
            RespValue::Integer(i) => {
                write!(buf, ":{}\r\n", i)?;
            }
            RespValue::BulkString(None) => {
                write!(buf, "$-1\r\n")?;
            }
            RespValue::BulkString(Some(data)) => {
                write!(buf, "${}\r\n", data.len())?;
                buf.extend_from_slice(data);
                write!(buf, "\r\n")?;
            }
            RespValue::Array(items) => {
                write!(buf, "*{}\r\n", items.len())?;
                for item in items {
                    item.encode(buf)?;
                }
            }
            RespValue::Null => {
                write!(buf, "_\r\n")?;
            }
            RespValue::Double(d) => {
                if d.is_nan() {
                    write!(buf, ",nan\r\n")?;
                } else if d.is_infinite() {
                    write!(buf, ",{}inf\r\n", if *d < 0.0 { "-" } else { "" })?;
                } else {
                    write!(buf, ",{}\r\n", d)?;
                }
            }
            RespValue::Boolean(b) => {
                write!(buf, "#{}\r\n", if *b { 't' } else { 'f' })?;
            }
        }
        Ok(())
    }

    /// Parse RESP value from buffer
    ///
    /// Returns `Ok(None)` or `Err(RespError::Incomplete)` when the buffer does
    /// not yet hold a complete value. Bytes may have been consumed in that
    /// case, so callers decode from a copy until a full value arrives.
    pub fn decode(buf: &mut BytesMut) -> RespResult<Option<RespValue>> {
        if buf.is_empty() {
            return Ok(None);
        }

        let first = buf[0];

        match first {
            b'+' => Self::decode_simple_string(buf),
            b'-' => Self::decode_error(buf),
            b':' => Self::decode_integer(buf),
            b'$' => Self::decode_bulk_string(buf),
            b'*' => Self::decode_array(buf),
            b'_' => Self::decode_null(buf),
            b',' => Self::decode_double(buf),
            b'#' => Self::decode_boolean(buf),
            _ => Err(RespError::Protocol(format!(
                "Unknown RESP type: {}",
                first as char
            ))),
        }
    }

    fn decode_simple_string(buf: &mut BytesMut) -> RespResult<Option<RespValue>> {
        match Self::read_text_line(buf)? {
            Some(s) => Ok(Some(RespValue::SimpleString(s))),
            None => Ok(None),
        }
    }

    fn decode_error(buf: &mut BytesMut) -> RespResult<Option<RespValue>> {
        match Self::read_text_line(buf)? {
            Some(s) => Ok(Some(RespValue::Error(s))),
            None => Ok(None),
        }
    }

    fn decode_integer(buf: &mut BytesMut) -> RespResult<Option<RespValue>> {
        if let Some(s) = Self::read_text_line(buf)? {
            let i = s.parse::<i64>()
                .map_err(|e| RespError::Protocol(format!("Invalid integer: {}", e)))?;
            Ok(Some(RespValue::Integer(i)))
        } else {
            Ok(None)
        }
    }

    fn decode_double(buf: &mut BytesMut) -> RespResult<Option<RespValue>> {
        if let Some(s) = Self::read_text_line(buf)? {
            let d = s.parse::<f64>()
                .map_err(|e| RespError::Protocol(format!("Invalid double: {}", e)))?;
            Ok(Some(RespValue::Double(d)))
        } else {
            Ok(None)
        }
    }

    fn decode_boolean(buf: &mut BytesMut) -> RespResult<Option<RespValue>> {
        match Self::read_text_line(buf)?.as_deref() {
            Some("t") => Ok(Some(RespValue::Boolean(true))),
            Some("f") => Ok(Some(RespValue::Boolean(false))),
            Some(other) => Err(RespError::Protocol(format!("Invalid boolean: {}", other))),
            None => Ok(None),
        }
    }

    fn decode_bulk_string(buf: &mut BytesMut) -> RespResult<Option<RespValue>> {
        // First, read the length line
        if let Some(len_str) = Self::read_text_line(buf)? {
            let len = len_str.parse::<i64>()
                .map_err(|e| RespError::Protocol(format!("Invalid bulk string length: {}", e)))?;

            if len == -1 {
                return Ok(Some(RespValue::BulkString(None)));
            }
            if !(0..=MAX_BULK_LEN).contains(&len) {
                return Err(RespError::Protocol(format!("Invalid bulk string length: {}", len)));
            }

            let len = len as usize;

            // Check if we have enough data for the bulk string + \r\n
            if buf.len() < len + 2 {
                return Err(RespError::Incomplete);
            }

            let data = buf[..len].to_vec();
            buf.advance(len);

            if &buf[..2] != b"\r\n" {
                return Err(RespError::Protocol("Missing \\r\\n after bulk string".to_string()));
            }
            buf.advance(2);

            Ok(Some(RespValue::BulkString(Some(data))))
        } else {
            Ok(None)
        }
    }

    fn decode_array(buf: &mut BytesMut) -> RespResult<Option<RespValue>> {
        if let Some(len_str) = Self::read_text_line(buf)? {
            let len = len_str.parse::<i64>()
                .map_err(|e| RespError::Protocol(format!("Invalid array length: {}", e)))?;

            // *-1 is the RESP2 null array
            if len < 0 {
                return Ok(Some(RespValue::Null));
            }

            if len > MAX_ARRAY_LEN {
                return Err(RespError::Protocol(format!("Invalid array length: {}", len)));
            }

            // every element takes at least three bytes, so the buffer bounds
            // what can actually follow
            let mut elements = Vec::with_capacity((len as usize).min(buf.len() / 3));
            for _ in 0..len {
                match Self::decode(buf)? {
                    Some(val) => elements.push(val),
                    None => return Err(RespError::Incomplete),
                }
            }

            Ok(Some(RespValue::Array(elements)))
        } else {
            Ok(None)
        }
    }

    fn decode_null(buf: &mut BytesMut) -> RespResult<Option<RespValue>> {
        match Self::read_text_line(buf)? {
            Some(rest) if rest.is_empty() => Ok(Some(RespValue::Null)),
            Some(_) => Err(RespError::Protocol("Invalid null value".to_string())),
            None => Ok(None),
        }
    }

    /// Read a CRLF-terminated line and return it without its type prefix
    fn read_text_line(buf: &mut BytesMut) -> RespResult<Option<String>> {
        match Self::read_line(buf)? {
            Some(line) => String::from_utf8(line[1..].to_vec())
                .map(Some)
                .map_err(|e| RespError::InvalidEncoding(e.to_string())),
            None => Ok(None),
        }
    }

    /// Read a CRLF-terminated line from the buffer
    fn read_line(buf: &mut BytesMut) -> RespResult<Option<Vec<u8>>> {
        if let Some(pos) = buf.windows(2).position(|w| w == b"\r\n") {
            let line = buf[..pos].to_vec();
            buf.advance(pos + 2);
            Ok(Some(line))
        } else {
            Ok(None)
        }
    }

    /// Convert to array or error
    pub fn as_array(&self) -> RespResult<&[RespValue]> {
        match self {
            RespValue::Array(arr) => Ok(arr),
            _ => Err(RespError::Protocol("Expected array".to_string())),
        }
    }

    /// Borrow the elements if this is an array
    pub fn as_seq(&self) -> Option<&[RespValue]> {
        match self {
            RespValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Convert to bulk string or error
    pub fn as_bulk_string(&self) -> RespResult<Option<&[u8]>> {
        match self {
            RespValue::BulkString(Some(data)) => Ok(Some(data)),
            RespValue::BulkString(None) => Ok(None),
            _ => Err(RespError::Protocol("Expected bulk string".to_string())),
        }
    }

    /// Convert bulk string to UTF-8 string
    pub fn as_string(&self) -> RespResult<Option<String>> {
        match self.as_bulk_string()? {
            Some(bytes) => {
                let s = String::from_utf8(bytes.to_vec())
                    .map_err(|e| RespError::InvalidEncoding(e.to_string()))?;
                Ok(Some(s))
            }
            None => Ok(None),
        }
    }

    /// Borrow the text of a simple or bulk string, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RespValue::SimpleString(s) => Some(s),
            RespValue::BulkString(Some(data)) => std::str::from_utf8(data).ok(),
            _ => None,
        }
    }

    /// Whether this is a null bulk string or a RESP3 null
    pub fn is_null(&self) -> bool {
        matches!(self, RespValue::Null | RespValue::BulkString(None))
    }
}
