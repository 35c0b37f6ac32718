use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    Float,
    Integer,
    Unsigned,
    Boolean,
    String,
}

/// One field sample. Only the integer variant flows through the cursor
/// pipeline; the cache stores all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldVal {
    Float(f64),
    Integer(i64),
    Unsigned(u64),
    Boolean(bool),
    Bytes(Vec<u8>),
}

impl FieldVal {
    pub fn value_type(&self) -> ValueType {
        match self {
            FieldVal::Float(..) => ValueType::Float,
            FieldVal::Integer(..) => ValueType::Integer,
            FieldVal::Unsigned(..) => ValueType::Unsigned,
            FieldVal::Boolean(..) => ValueType::Boolean,
            FieldVal::Bytes(..) => ValueType::String,
        }
    }

    pub fn heap_size(&self) -> usize {
        match self {
            FieldVal::Bytes(b) => b.capacity(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_value_type() {
        assert_eq!(FieldVal::Integer(2).value_type(), ValueType::Integer);
        assert_eq!(
            FieldVal::Bytes(b"x".to_vec()).value_type(),
            ValueType::String
        );
    }
}
