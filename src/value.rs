//! A closed sum type for heterogeneous collections.
//!
//! Statically typed collections (`Set<i64>`, `HashMap<String, u8>`) need no
//! help from this module. [`Value`] is for collections that mix kinds, such as
//! a set holding `1`, `"a"` and `5.0` at once.
//!
//! # Examples
//!
//! ```rust
//! use trieseq::persistent::Set;
//! use trieseq::value::Value;
//!
//! let set = Set::from_values([Value::from(1), Value::from("a"), Value::from(5.0)]);
//! assert_eq!(set.len(), 3);
//! assert!(set.contains(&Value::from("a")));
//! assert!(!set.contains(&Value::from(5)));
//! ```

use std::fmt;

use crate::hashable::{HashError, Hashable};
use crate::persistent::List;
use crate::sequence::Nested;

/// A dynamically typed element.
///
/// Equality is per variant: `Value::Int(1)` and `Value::UInt(1)` are
/// different values, and so are `Value::Int(5)` and `Value::Float(5.0)`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point. Integral floats hash like the integer they hold.
    Float(f64),
    /// Text string.
    Text(String),
    /// Byte sequence, compared by length then contents.
    Bytes(Vec<u8>),
    /// A nested list. Lists can be stored in lists but are not hashable, so
    /// they cannot be set elements or map keys.
    List(List<Value>),
}

impl Value {
    /// Name of the variant, as used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
        }
    }

    /// Returns `true` if this value can be stored in a set or used as a key.
    #[must_use]
    pub const fn is_hashable(&self) -> bool {
        !matches!(self, Self::List(_))
    }
}

impl Hashable for Value {
    /// # Panics
    ///
    /// Panics on [`Value::List`], which has no hash. Use
    /// [`try_hash`](Hashable::try_hash) or
    /// [`Set::try_insert`](crate::persistent::Set::try_insert) to reject it
    /// without panicking.
    fn hash(&self, seed: u32) -> u32 {
        match self.try_hash(seed) {
            Ok(hash) => hash,
            Err(error) => {
                log::error!("refusing to hash value: {error}");
                panic!("{error}");
            }
        }
    }

    fn equal(&self, other: &Self) -> bool {
        self == other
    }

    fn try_hash(&self, seed: u32) -> Result<u32, HashError> {
        match self {
            Self::Int(value) => Ok(value.hash(seed)),
            Self::UInt(value) => Ok(value.hash(seed)),
            Self::Float(value) => Ok(value.hash(seed)),
            Self::Text(value) => Ok(value.hash(seed)),
            Self::Bytes(value) => Ok(value.hash(seed)),
            Self::List(_) => Err(HashError::Unhashable { kind: self.kind() }),
        }
    }
}

impl Nested for Value {
    fn into_nested(self) -> Result<List<Self>, Self> {
        match self {
            Self::List(list) => Ok(list),
            other => Err(other),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

macro_rules! impl_from_for_value {
    ($variant:ident: $($type:ty),* $(,)?) => {
        $(
            impl From<$type> for Value {
                #[inline]
                fn from(value: $type) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

impl_from_for_value!(Int: i8, i16, i32, i64);
impl_from_for_value!(UInt: u16, u32, u64);
impl_from_for_value!(Float: f32, f64);
impl_from_for_value!(Text: &str, String);
impl_from_for_value!(Bytes: Vec<u8>, &[u8]);

impl From<List<Self>> for Value {
    #[inline]
    fn from(list: List<Self>) -> Self {
        Self::List(list)
    }
}

/// Scalars print plainly, byte sequences as `[1 2 3]` and lists as `( a b )`.
impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(formatter, "{value}"),
            Self::UInt(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::Text(value) => formatter.write_str(value),
            Self::Bytes(bytes) => {
                formatter.write_str("[")?;
                for (index, byte) in bytes.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(" ")?;
                    }
                    write!(formatter, "{byte}")?;
                }
                formatter.write_str("]")
            }
            Self::List(list) => write!(formatter, "{list}"),
        }
    }
}
