//! The transaction envelope: signatures followed by the message.
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message                 legacy or versioned (see `message`)
//! ```
//!
//! The codec does not require the signature count to match the message's
//! required signers, so partially signed transactions round-trip unchanged.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::buffer::WireBuffer;
use crate::error::SolError;
use crate::identity::{PublicKey, Signature};
use crate::message::VersionedMessage;
use crate::short_vec::{read_compact_u16, write_len};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<Signature>,
    pub message: VersionedMessage,
}

impl Transaction {
    /// Wrap a message with one placeholder signature per required signer.
    pub fn new_unsigned(message: VersionedMessage) -> Self {
        let slots = usize::from(message.header().num_required_signatures);
        Self {
            signatures: vec![Signature::default(); slots],
            message,
        }
    }

    pub fn write(&self, buf: &mut WireBuffer) -> Result<(), SolError> {
        write_len(buf, self.signatures.len())?;
        for signature in &self.signatures {
            signature.write(buf);
        }
        self.message.write(buf)
    }

    pub fn read(buf: &mut WireBuffer) -> Result<Self, SolError> {
        let num_signatures = read_compact_u16(buf)?;
        let signatures = (0..num_signatures)
            .map(|_| Signature::read(buf))
            .collect::<Result<Vec<_>, _>>()?;
        let message = VersionedMessage::read(buf)?;
        Ok(Self {
            signatures,
            message,
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, SolError> {
        let mut buf = WireBuffer::with_capacity(
            1 + self.signatures.len() * Signature::LEN + 256,
        );
        self.write(&mut buf)?;
        Ok(buf.into_bytes())
    }

    /// Parse a complete transaction; trailing bytes are rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self, SolError> {
        let mut buf = WireBuffer::from_bytes(bytes);
        let tx = Self::read(&mut buf)?;
        if !buf.is_exhausted() {
            return Err(SolError::InvalidValue(format!(
                "{} trailing bytes after transaction",
                buf.remaining()
            )));
        }
        Ok(tx)
    }

    /// Standard-alphabet base64 of the wire bytes, as submitted to RPC.
    pub fn to_base64(&self) -> Result<String, SolError> {
        Ok(STANDARD.encode(self.encode()?))
    }

    pub fn from_base64(encoded: &str) -> Result<Self, SolError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| SolError::InvalidValue(format!("base64 decode failed: {e}")))?;
        Self::decode(&bytes)
    }

    /// The bytes each signer signs.
    pub fn message_bytes(&self) -> Result<Vec<u8>, SolError> {
        self.message.encode()
    }

    /// Place a pre-computed signature into the slot belonging to `signer`.
    ///
    /// Missing slots up to the signer's position are filled with placeholders.
    pub fn set_signature(
        &mut self,
        signer: &PublicKey,
        signature: Signature,
    ) -> Result<(), SolError> {
        let position = self
            .message
            .signer_keys()
            .iter()
            .position(|key| key == signer)
            .ok_or(SolError::SignerNotFound)?;

        if self.signatures.len() <= position {
            self.signatures.resize(position + 1, Signature::default());
        }
        self.signatures[position] = signature;
        Ok(())
    }

    /// True when every required signer has a non-placeholder signature.
    pub fn is_fully_signed(&self) -> bool {
        let required = usize::from(self.message.header().num_required_signatures);
        self.signatures.len() >= required
            && self.signatures[..required]
                .iter()
                .all(|signature| !signature.is_placeholder())
    }
}
