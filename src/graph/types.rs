//! Protocol type codes
//!
//! Every cell of a compact reply is a `[type_code, payload]` pair. The codes
//! past `Point` are known to the protocol but not interpreted by this client;
//! their payloads are handed back undecoded.

/// Type code of a tagged reply value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Unknown,
    Null,
    String,
    Integer,
    Boolean,
    Double,
    Array,
    Edge,
    Node,
    Path,
    Map,
    Point,
    VectorF32,
    DateTime,
    Date,
    Time,
    Duration,
}

impl ValueType {
    /// Map a wire code to its type; codes outside the table are `Unknown`
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => ValueType::Null,
            2 => ValueType::String,
            3 => ValueType::Integer,
            4 => ValueType::Boolean,
            5 => ValueType::Double,
            6 => ValueType::Array,
            7 => ValueType::Edge,
            8 => ValueType::Node,
            9 => ValueType::Path,
            10 => ValueType::Map,
            11 => ValueType::Point,
            12 => ValueType::VectorF32,
            13 => ValueType::DateTime,
            14 => ValueType::Date,
            15 => ValueType::Time,
            16 => ValueType::Duration,
            _ => ValueType::Unknown,
        }
    }

    /// Wire code of this type
    pub fn code(self) -> i64 {
        match self {
            ValueType::Unknown => 0,
            ValueType::Null => 1,
            ValueType::String => 2,
            ValueType::Integer => 3,
            ValueType::Boolean => 4,
            ValueType::Double => 5,
            ValueType::Array => 6,
            ValueType::Edge => 7,
            ValueType::Node => 8,
            ValueType::Path => 9,
            ValueType::Map => 10,
            ValueType::Point => 11,
            ValueType::VectorF32 => 12,
            ValueType::DateTime => 13,
            ValueType::Date => 14,
            ValueType::Time => 15,
            ValueType::Duration => 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_table() {
        for code in 0..=16 {
            assert_eq!(ValueType::from_code(code).code(), code);
        }
        assert_eq!(ValueType::from_code(8), ValueType::Node);
        assert_eq!(ValueType::from_code(7), ValueType::Edge);
        assert_eq!(ValueType::from_code(99), ValueType::Unknown);
        assert_eq!(ValueType::from_code(-1), ValueType::Unknown);
    }
}
