//! Hashing and equality for values stored in a hash trie.
//!
//! Every value placed in a [`Set`](crate::persistent::Set) or used as a key in a
//! [`HashMap`](crate::persistent::HashMap) implements [`Hashable`]. The trait is a
//! closed capability: the scalar kinds (integers, floats, text, byte sequences)
//! satisfy it through the impls in this module, and user types implement it
//! directly.
//!
//! # Re-hashing per depth
//!
//! A value's path through the trie is not a radix decomposition of one hash.
//! Instead the trie asks for a fresh hash at every depth by passing the depth as
//! the `seed`. Two values that land in the same slot at depth `i` are expected
//! (but not required) to separate at depth `i + 1`.
//!
//! # Examples
//!
//! ```rust
//! use trieseq::hashable::{Hashable, dispatch_equal, dispatch_hash};
//!
//! #[derive(Clone)]
//! struct CaseInsensitive(String);
//!
//! impl Hashable for CaseInsensitive {
//!     fn hash(&self, seed: u32) -> u32 {
//!         self.0.to_ascii_lowercase().hash(seed)
//!     }
//!
//!     fn equal(&self, other: &Self) -> bool {
//!         self.0.eq_ignore_ascii_case(&other.0)
//!     }
//! }
//!
//! let upper = CaseInsensitive("HELLO".to_string());
//! let lower = CaseInsensitive("hello".to_string());
//! assert!(dispatch_equal(&upper, &lower));
//! assert_eq!(dispatch_hash(&upper, 3), dispatch_hash(&lower, 3));
//! ```

use std::fmt;

use crate::persistent::{ARITY, ReferenceCounter};

// =============================================================================
// Errors
// =============================================================================

/// Error returned when a value of an unhashable kind is presented to a trie.
///
/// Only the dynamic [`Value`](crate::value::Value) type can produce this at
/// runtime; statically typed values without a [`Hashable`] impl are rejected by
/// the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashError {
    /// The value's kind has no hashing rule.
    Unhashable {
        /// Name of the offending kind.
        kind: &'static str,
    },
}

impl fmt::Display for HashError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unhashable { kind } => write!(formatter, "{kind} not hashable"),
        }
    }
}

impl std::error::Error for HashError {}

// =============================================================================
// Hashable Definition
// =============================================================================

/// The hash/equality contract for values stored in a hash trie.
///
/// Implementations must keep `hash` consistent with `equal`: for a given seed,
/// equal values must produce equal hashes. `equal` must be an equivalence
/// relation, since it decides both lookup matches and whether an insert is an
/// overwrite.
pub trait Hashable {
    /// Returns a hash of this value for the given seed.
    ///
    /// The seed is the trie depth being dispersed into. Different seeds should
    /// spread unequal values differently, though this is not required for
    /// correctness.
    fn hash(&self, seed: u32) -> u32;

    /// Returns `true` if `other` is equivalent to this value.
    fn equal(&self, other: &Self) -> bool;

    /// Fallible form of [`hash`](Self::hash).
    ///
    /// Types whose hashability depends on runtime state override this so that
    /// callers can reject a value before it reaches the trie.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Unhashable`] if this value cannot be hashed.
    fn try_hash(&self, seed: u32) -> Result<u32, HashError> {
        Ok(self.hash(seed))
    }
}

/// Returns the child slot for `value` at the depth given by `seed`.
///
/// The result is already reduced into `[0, ARITY)`.
#[inline]
pub fn dispatch_hash<T: Hashable + ?Sized>(value: &T, seed: u32) -> usize {
    (value.hash(seed) as usize) % ARITY
}

/// Returns whether two values are equivalent under their [`Hashable`] impl.
#[inline]
pub fn dispatch_equal<T: Hashable + ?Sized>(left: &T, right: &T) -> bool {
    left.equal(right)
}

// =============================================================================
// Built-in hashing rules
// =============================================================================

/// CRC32 (IEEE) of `bytes`, starting from `seed`, then mixed with the seed.
#[inline]
fn checksum(seed: u32, bytes: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new_with_initial(seed);
    hasher.update(bytes);
    mix(seed, hasher.finalize())
}

/// SplitMix64 finalizer over `seed` and `crc`.
///
/// CRC32 is affine: two inputs of equal length differ by the same checksum
/// mask at every seed, so their slots would either differ at every depth or
/// at none. The multiply-xorshift rounds make the slot bits depend on the
/// seed nonlinearly.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
const fn mix(seed: u32, crc: u32) -> u32 {
    let mut bits = ((seed as u64) << 32) | crc as u64;
    bits = (bits ^ (bits >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    bits = (bits ^ (bits >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    bits ^= bits >> 31;
    (bits >> 32) as u32
}

/// Hash of a numeric 32-bit pattern.
///
/// Depth 0 uses the pattern itself; deeper levels checksum it with the seed.
#[inline]
fn pattern_hash(pattern: u32, seed: u32) -> u32 {
    if seed == 0 {
        pattern
    } else {
        checksum(seed, &pattern.to_le_bytes())
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
const fn fold_u64(bits: u64) -> u32 {
    (bits as u32) ^ ((bits >> 32) as u32)
}

/// Hash of a 64-bit pattern.
///
/// Depth 0 folds the pattern to 32 bits; deeper levels checksum all eight
/// bytes, so values whose folds agree still separate further down.
#[inline]
fn wide_hash(bits: u64, seed: u32) -> u32 {
    if seed == 0 {
        fold_u64(bits)
    } else {
        checksum(seed, &bits.to_le_bytes())
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn widest_hash(bits: u128, seed: u32) -> u32 {
    if seed == 0 {
        fold_u64(bits as u64) ^ fold_u64((bits >> 64) as u64)
    } else {
        checksum(seed, &bits.to_le_bytes())
    }
}

/// Integral floats take the bits of the integer they hold, so `5.0` hashes
/// like `5` at every depth. Everything else uses its bit pattern.
#[allow(
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn float_bits(value: f64) -> u64 {
    const INTEGRAL_LIMIT: f64 = 9.0e18;
    if value.is_finite() && value.trunc() == value && value.abs() < INTEGRAL_LIMIT {
        (value as i64) as u64
    } else {
        value.to_bits()
    }
}

macro_rules! impl_hashable_for_narrow_int {
    ($($type:ty),* $(,)?) => {
        $(
            impl Hashable for $type {
                #[inline]
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_lossless)]
                fn hash(&self, seed: u32) -> u32 {
                    pattern_hash(*self as u32, seed)
                }

                #[inline]
                fn equal(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

macro_rules! impl_hashable_for_wide_int {
    ($($type:ty),* $(,)?) => {
        $(
            impl Hashable for $type {
                #[inline]
                #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
                fn hash(&self, seed: u32) -> u32 {
                    wide_hash(*self as u64, seed)
                }

                #[inline]
                fn equal(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_hashable_for_narrow_int!(u8, u16, u32, i8, i16, i32);
impl_hashable_for_wide_int!(u64, i64, usize, isize);

impl Hashable for u128 {
    #[inline]
    fn hash(&self, seed: u32) -> u32 {
        widest_hash(*self, seed)
    }

    #[inline]
    fn equal(&self, other: &Self) -> bool {
        self == other
    }
}

impl Hashable for i128 {
    #[inline]
    #[allow(clippy::cast_sign_loss)]
    fn hash(&self, seed: u32) -> u32 {
        widest_hash(*self as u128, seed)
    }

    #[inline]
    fn equal(&self, other: &Self) -> bool {
        self == other
    }
}

impl Hashable for f64 {
    #[inline]
    fn hash(&self, seed: u32) -> u32 {
        wide_hash(float_bits(*self), seed)
    }

    #[inline]
    #[allow(clippy::float_cmp)]
    fn equal(&self, other: &Self) -> bool {
        self == other
    }
}

impl Hashable for f32 {
    #[inline]
    fn hash(&self, seed: u32) -> u32 {
        wide_hash(float_bits(f64::from(*self)), seed)
    }

    #[inline]
    #[allow(clippy::float_cmp)]
    fn equal(&self, other: &Self) -> bool {
        self == other
    }
}

impl Hashable for bool {
    #[inline]
    fn hash(&self, seed: u32) -> u32 {
        pattern_hash(u32::from(*self), seed)
    }

    #[inline]
    fn equal(&self, other: &Self) -> bool {
        self == other
    }
}

impl Hashable for char {
    #[inline]
    fn hash(&self, seed: u32) -> u32 {
        pattern_hash(u32::from(*self), seed)
    }

    #[inline]
    fn equal(&self, other: &Self) -> bool {
        self == other
    }
}

impl Hashable for str {
    #[inline]
    fn hash(&self, seed: u32) -> u32 {
        checksum(seed, self.as_bytes())
    }

    #[inline]
    fn equal(&self, other: &Self) -> bool {
        self == other
    }
}

impl Hashable for String {
    #[inline]
    fn hash(&self, seed: u32) -> u32 {
        self.as_str().hash(seed)
    }

    #[inline]
    fn equal(&self, other: &Self) -> bool {
        self == other
    }
}

impl Hashable for [u8] {
    #[inline]
    fn hash(&self, seed: u32) -> u32 {
        checksum(seed, self)
    }

    fn equal(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(left, right)| left == right)
    }
}

impl Hashable for Vec<u8> {
    #[inline]
    fn hash(&self, seed: u32) -> u32 {
        self.as_slice().hash(seed)
    }

    #[inline]
    fn equal(&self, other: &Self) -> bool {
        self.as_slice().equal(other.as_slice())
    }
}

// =============================================================================
// Forwarding impls
// =============================================================================

impl<T: Hashable + ?Sized> Hashable for &T {
    #[inline]
    fn hash(&self, seed: u32) -> u32 {
        (**self).hash(seed)
    }

    #[inline]
    fn equal(&self, other: &Self) -> bool {
        (**self).equal(*other)
    }

    #[inline]
    fn try_hash(&self, seed: u32) -> Result<u32, HashError> {
        (**self).try_hash(seed)
    }
}

impl<T: Hashable + ?Sized> Hashable for Box<T> {
    #[inline]
    fn hash(&self, seed: u32) -> u32 {
        (**self).hash(seed)
    }

    #[inline]
    fn equal(&self, other: &Self) -> bool {
        (**self).equal(other)
    }

    #[inline]
    fn try_hash(&self, seed: u32) -> Result<u32, HashError> {
        (**self).try_hash(seed)
    }
}

impl<T: Hashable + ?Sized> Hashable for ReferenceCounter<T> {
    #[inline]
    fn hash(&self, seed: u32) -> u32 {
        (**self).hash(seed)
    }

    #[inline]
    fn equal(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(self, other) || (**self).equal(other)
    }

    #[inline]
    fn try_hash(&self, seed: u32) -> Result<u32, HashError> {
        (**self).try_hash(seed)
    }
}

impl<A: Hashable, B: Hashable> Hashable for (A, B) {
    fn hash(&self, seed: u32) -> u32 {
        self.0.hash(seed).rotate_left(5) ^ self.1.hash(seed)
    }

    fn equal(&self, other: &Self) -> bool {
        self.0.equal(&other.0) && self.1.equal(&other.1)
    }

    fn try_hash(&self, seed: u32) -> Result<u32, HashError> {
        Ok(self.0.try_hash(seed)?.rotate_left(5) ^ self.1.try_hash(seed)?)
    }
}

// =============================================================================
// Tests
// =============================================================================
