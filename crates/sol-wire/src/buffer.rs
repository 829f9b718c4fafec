//! Growable byte buffer with an independent read cursor.
//!
//! Every codec in this crate reads and writes through a [`WireBuffer`].
//! Writes append and cannot fail. Reads advance the cursor and fail with
//! [`SolError::EndOfBuffer`] when fewer bytes remain than requested; a short
//! read never returns a partial result.

use crate::error::SolError;

/// Little-endian fixed-width integers that can cross the wire.
pub trait FixedWidth: Sized + Copy {
    const WIDTH: usize;

    fn write_le(self, out: &mut Vec<u8>);

    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_fixed_width {
    ($($ty:ty),*) => {
        $(
            impl FixedWidth for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::WIDTH]);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_fixed_width!(u8, u16, u32, u64);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireBuffer {
    bytes: Vec<u8>,
    cursor: usize,
}

impl WireBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            cursor: 0,
        }
    }

    /// Wrap existing bytes for decoding; the cursor starts at 0.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            cursor: 0,
        }
    }

    /// Bytes not yet consumed by a read.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> Result<u8, SolError> {
        self.bytes
            .get(self.cursor)
            .copied()
            .ok_or(SolError::EndOfBuffer {
                needed: 1,
                remaining: 0,
            })
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&[u8], SolError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(SolError::EndOfBuffer {
                needed: n,
                remaining,
            });
        }
        let start = self.cursor;
        self.cursor += n;
        Ok(&self.bytes[start..self.cursor])
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SolError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_int<T: FixedWidth>(&mut self) -> Result<T, SolError> {
        let raw = self.read_bytes(T::WIDTH)?;
        Ok(T::read_le(raw))
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn write_int<T: FixedWidth>(&mut self, value: T) {
        value.write_le(&mut self.bytes);
    }

    /// Everything written so far, regardless of the read cursor.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
