//! Four-character property IDs.
//!
//! The host identifies every property by a four-character code. Fixed properties
//! use hand-picked codes (`trig`, `path`, ...). Synthesized argument inputs use a
//! two-character base followed by a two-character encoding of their index:
//!
//! | index        | encoding        |
//! |--------------|-----------------|
//! | 0 – 99       | `00` – `99`     |
//! | 100 – 775    | `AA` – `ZZ`     |
//! | 776 – 1451   | `aa` – `zz`     |
//!
//! Anything above that cannot be encoded.

use std::fmt;

use crate::error::{BridgeError, BridgeResult};

const ONE_CHAR_MAX: usize = 26;
const TWO_CHAR_MAX: usize = ONE_CHAR_MAX * ONE_CHAR_MAX;

/// Base characters of synthesized argument inputs.
pub const SYNTHESIZED_BASE: [u8; 2] = *b"in";

/// A four-character host property code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId([u8; 4]);

impl PropertyId {
    /// Wrap a literal code.
    pub const fn new(code: [u8; 4]) -> Self {
        Self(code)
    }

    /// Encode the ID of the synthesized input at `index`.
    pub fn synthesized(index: usize) -> BridgeResult<Self> {
        Self::encode(SYNTHESIZED_BASE, index)
    }

    /// Encode `index` after a two-character `base`.
    pub fn encode(base: [u8; 2], index: usize) -> BridgeResult<Self> {
        let (ms, ls) = if index < 100 {
            (b'0' + (index / 10) as u8, b'0' + (index % 10) as u8)
        } else if index < 100 + TWO_CHAR_MAX {
            let offset = index - 100;
            (
                b'A' + (offset / ONE_CHAR_MAX) as u8,
                b'A' + (offset % ONE_CHAR_MAX) as u8,
            )
        } else if index < 100 + TWO_CHAR_MAX * 2 {
            let offset = index - (100 + TWO_CHAR_MAX);
            (
                b'a' + (offset / ONE_CHAR_MAX) as u8,
                b'a' + (offset % ONE_CHAR_MAX) as u8,
            )
        } else {
            return Err(BridgeError::PropertyIdOutOfRange(index));
        };
        Ok(Self([base[0], base[1], ms, ls]))
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}
