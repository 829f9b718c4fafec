//! Legacy and v0 messages, and the version discriminator between them.
//!
//! ```text
//! Message (legacy):
//!   num_required_sigs     u8
//!   num_readonly_signed   u8
//!   num_readonly_unsigned u8
//!   num_accounts          compact-u16
//!   account_keys          32 bytes * num_accounts
//!   recent_blockhash      32 bytes
//!   num_instructions      compact-u16
//!   instructions[]
//!
//! Message (v0):
//!   version prefix        u8 (0x80 | version)
//!   <legacy fields>
//!   num_lookups           compact-u16
//!   address_table_lookups[]
//! ```
//!
//! A legacy message has no version byte. Its first byte is the signer count,
//! which is always below 0x80, so the high bit of the first byte tells the two
//! apart.

use crate::buffer::WireBuffer;
use crate::error::SolError;
use crate::identity::{Blockhash, PublicKey};
use crate::instruction::{AddressTableLookup, CompiledInstruction};
use crate::short_vec::{read_compact_u16, write_len};

/// Bit mask marking a serialized message as versioned.
pub const MESSAGE_VERSION_PREFIX: u8 = 0x80;

/// The three counts that open every message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    /// Number of signatures required; the first N account keys are signers.
    pub num_required_signatures: u8,
    /// How many of the signing accounts are read-only.
    pub num_readonly_signed_accounts: u8,
    /// How many of the non-signing accounts are read-only.
    pub num_readonly_unsigned_accounts: u8,
}

impl MessageHeader {
    fn write(&self, buf: &mut WireBuffer) -> Result<(), SolError> {
        if self.num_required_signatures & MESSAGE_VERSION_PREFIX != 0 {
            return Err(SolError::InvalidValue(format!(
                "{} required signatures collides with the version prefix",
                self.num_required_signatures
            )));
        }
        buf.write_int(self.num_required_signatures);
        buf.write_int(self.num_readonly_signed_accounts);
        buf.write_int(self.num_readonly_unsigned_accounts);
        Ok(())
    }

    fn read(buf: &mut WireBuffer) -> Result<Self, SolError> {
        Ok(Self {
            num_required_signatures: buf.read_int::<u8>()?,
            num_readonly_signed_accounts: buf.read_int::<u8>()?,
            num_readonly_unsigned_accounts: buf.read_int::<u8>()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyMessage {
    pub header: MessageHeader,
    /// Unique account keys in canonical order: writable signers, read-only
    /// signers, writable non-signers, read-only non-signers.
    pub account_keys: Vec<PublicKey>,
    pub recent_blockhash: Blockhash,
    pub instructions: Vec<CompiledInstruction>,
}

impl LegacyMessage {
    pub fn write(&self, buf: &mut WireBuffer) -> Result<(), SolError> {
        self.header.write(buf)?;

        write_len(buf, self.account_keys.len())?;
        for key in &self.account_keys {
            key.write(buf);
        }

        self.recent_blockhash.write(buf);

        write_len(buf, self.instructions.len())?;
        for ix in &self.instructions {
            ix.write(buf)?;
        }
        Ok(())
    }

    pub fn read(buf: &mut WireBuffer) -> Result<Self, SolError> {
        let header = MessageHeader::read(buf)?;

        let num_accounts = read_compact_u16(buf)?;
        let account_keys = (0..num_accounts)
            .map(|_| PublicKey::read(buf))
            .collect::<Result<Vec<_>, _>>()?;

        let recent_blockhash = Blockhash::read(buf)?;

        let num_instructions = read_compact_u16(buf)?;
        let instructions = (0..num_instructions)
            .map(|_| CompiledInstruction::read(buf))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct V0Message {
    pub header: MessageHeader,
    pub account_keys: Vec<PublicKey>,
    pub recent_blockhash: Blockhash,
    pub instructions: Vec<CompiledInstruction>,
    pub address_table_lookups: Vec<AddressTableLookup>,
}

impl V0Message {
    /// Write the message body, without the version prefix.
    pub fn write(&self, buf: &mut WireBuffer) -> Result<(), SolError> {
        self.header.write(buf)?;

        write_len(buf, self.account_keys.len())?;
        for key in &self.account_keys {
            key.write(buf);
        }

        self.recent_blockhash.write(buf);

        write_len(buf, self.instructions.len())?;
        for ix in &self.instructions {
            ix.write(buf)?;
        }

        write_len(buf, self.address_table_lookups.len())?;
        for lookup in &self.address_table_lookups {
            lookup.write(buf)?;
        }
        Ok(())
    }

    /// Read the message body; the version prefix must already be consumed.
    pub fn read(buf: &mut WireBuffer) -> Result<Self, SolError> {
        let LegacyMessage {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        } = LegacyMessage::read(buf)?;

        let num_lookups = read_compact_u16(buf)?;
        let address_table_lookups = (0..num_lookups)
            .map(|_| AddressTableLookup::read(buf))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
            address_table_lookups,
        })
    }
}

/// Either a legacy message or a v0 message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionedMessage {
    Legacy(LegacyMessage),
    V0(V0Message),
}

impl VersionedMessage {
    /// `None` for legacy messages, otherwise the version number.
    pub fn version(&self) -> Option<u8> {
        match self {
            Self::Legacy(_) => None,
            Self::V0(_) => Some(0),
        }
    }

    pub fn header(&self) -> &MessageHeader {
        match self {
            Self::Legacy(message) => &message.header,
            Self::V0(message) => &message.header,
        }
    }

    pub fn account_keys(&self) -> &[PublicKey] {
        match self {
            Self::Legacy(message) => &message.account_keys,
            Self::V0(message) => &message.account_keys,
        }
    }

    pub fn recent_blockhash(&self) -> &Blockhash {
        match self {
            Self::Legacy(message) => &message.recent_blockhash,
            Self::V0(message) => &message.recent_blockhash,
        }
    }

    pub fn instructions(&self) -> &[CompiledInstruction] {
        match self {
            Self::Legacy(message) => &message.instructions,
            Self::V0(message) => &message.instructions,
        }
    }

    pub fn address_table_lookups(&self) -> Option<&[AddressTableLookup]> {
        match self {
            Self::Legacy(_) => None,
            Self::V0(message) => Some(&message.address_table_lookups),
        }
    }

    /// The account keys that must sign, in signature-slot order.
    pub fn signer_keys(&self) -> &[PublicKey] {
        let keys = self.account_keys();
        let count = usize::from(self.header().num_required_signatures).min(keys.len());
        &keys[..count]
    }

    pub fn write(&self, buf: &mut WireBuffer) -> Result<(), SolError> {
        match self {
            Self::Legacy(message) => message.write(buf),
            Self::V0(message) => {
                buf.write_int(MESSAGE_VERSION_PREFIX);
                message.write(buf)
            }
        }
    }

    pub fn read(buf: &mut WireBuffer) -> Result<Self, SolError> {
        let first = buf.peek_u8()?;
        if first & MESSAGE_VERSION_PREFIX == 0 {
            return Ok(Self::Legacy(LegacyMessage::read(buf)?));
        }

        let version = buf.read_int::<u8>()? & !MESSAGE_VERSION_PREFIX;
        match version {
            0 => Ok(Self::V0(V0Message::read(buf)?)),
            other => Err(SolError::UnsupportedVersion(other)),
        }
    }

    /// Serialize the message. These are the bytes a signer signs.
    pub fn encode(&self) -> Result<Vec<u8>, SolError> {
        let mut buf = WireBuffer::with_capacity(256);
        self.write(&mut buf)?;
        Ok(buf.into_bytes())
    }

    /// Parse a complete message; trailing bytes are rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self, SolError> {
        let mut buf = WireBuffer::from_bytes(bytes);
        let message = Self::read(&mut buf)?;
        if !buf.is_exhausted() {
            return Err(SolError::InvalidValue(format!(
                "{} trailing bytes after message",
                buf.remaining()
            )));
        }
        Ok(message)
    }
}

impl From<LegacyMessage> for VersionedMessage {
    fn from(message: LegacyMessage) -> Self {
        Self::Legacy(message)
    }
}

impl From<V0Message> for VersionedMessage {
    fn from(message: V0Message) -> Self {
        Self::V0(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> MessageHeader {
        MessageHeader {
            num_required_signatures: 1,
            num_readonly_signed_accounts: 0,
            num_readonly_unsigned_accounts: 1,
        }
    }

    fn sample_legacy() -> LegacyMessage {
        LegacyMessage {
            header: sample_header(),
            account_keys: vec![
                PublicKey::from([1u8; 32]),
                PublicKey::from([2u8; 32]),
                PublicKey::default(),
            ],
            recent_blockhash: Blockhash::from([0xcc; 32]),
            instructions: vec![CompiledInstruction {
                program_id_index: 2,
                accounts: vec![0, 1],
                data: vec![2, 0, 0, 0],
            }],
        }
    }

    fn sample_v0() -> V0Message {
        let legacy = sample_legacy();
        V0Message {
            header: legacy.header,
            account_keys: legacy.account_keys,
            recent_blockhash: legacy.recent_blockhash,
            instructions: legacy.instructions,
            address_table_lookups: vec![AddressTableLookup {
                account_key: PublicKey::from([4u8; 32]),
                writable_indexes: vec![0],
                readonly_indexes: vec![1, 2],
            }],
        }
    }

    // -- legacy ---------------------------------------------------------------

    #[test]
    fn legacy_starts_with_header_and_no_prefix() {
        let bytes = VersionedMessage::Legacy(sample_legacy()).encode().unwrap();
        assert_eq!(&bytes[..4], &[1, 0, 1, 3]);
    }

    #[test]
    fn legacy_contains_blockhash_after_keys() {
        let bytes = VersionedMessage::Legacy(sample_legacy()).encode().unwrap();
        let offset = 3 + 1 + 32 * 3;
        assert_eq!(&bytes[offset..offset + 32], &[0xcc; 32]);
    }

    #[test]
    fn legacy_roundtrip() {
        let message = VersionedMessage::Legacy(sample_legacy());
        let bytes = message.encode().unwrap();
        let decoded = VersionedMessage::decode(&bytes).unwrap();
        assert_eq!(decoded, message);
        assert_eq!(decoded.version(), None);
        assert!(decoded.address_table_lookups().is_none());
    }

    #[test]
    fn legacy_header_cannot_collide_with_prefix() {
        let mut legacy = sample_legacy();
        legacy.header.num_required_signatures = 0x80;
        assert!(matches!(
            VersionedMessage::Legacy(legacy).encode(),
            Err(SolError::InvalidValue(_))
        ));
    }

    // -- v0 -------------------------------------------------------------------

    #[test]
    fn v0_starts_with_version_prefix() {
        let bytes = VersionedMessage::V0(sample_v0()).encode().unwrap();
        assert_eq!(bytes[0], 0x80);
        assert_eq!(&bytes[1..5], &[1, 0, 1, 3]);
    }

    #[test]
    fn v0_roundtrip() {
        let message = VersionedMessage::V0(sample_v0());
        let decoded = VersionedMessage::decode(&message.encode().unwrap()).unwrap();
        assert_eq!(decoded, message);
        assert_eq!(decoded.version(), Some(0));
        assert_eq!(decoded.address_table_lookups().unwrap().len(), 1);
    }

    #[test]
    fn v0_without_lookups_ends_with_empty_array() {
        let mut v0 = sample_v0();
        v0.address_table_lookups.clear();
        let bytes = VersionedMessage::V0(v0).encode().unwrap();
        assert_eq!(*bytes.last().unwrap(), 0x00);
    }

    // -- discriminator --------------------------------------------------------

    #[test]
    fn unknown_version_is_rejected() {
        let mut bytes = VersionedMessage::V0(sample_v0()).encode().unwrap();
        bytes[0] = 0x81;
        assert_eq!(
            VersionedMessage::decode(&bytes).unwrap_err(),
            SolError::UnsupportedVersion(1)
        );

        bytes[0] = 0xff;
        assert_eq!(
            VersionedMessage::decode(&bytes).unwrap_err(),
            SolError::UnsupportedVersion(127)
        );
    }

    #[test]
    fn legacy_bytes_with_lookup_tail_are_trailing() {
        let mut bytes = VersionedMessage::Legacy(sample_legacy()).encode().unwrap();
        bytes.push(0x00);
        assert!(matches!(
            VersionedMessage::decode(&bytes),
            Err(SolError::InvalidValue(_))
        ));
    }

    #[test]
    fn empty_input_is_end_of_buffer() {
        assert!(matches!(
            VersionedMessage::decode(&[]),
            Err(SolError::EndOfBuffer { .. })
        ));
    }

    #[test]
    fn truncated_v0_is_end_of_buffer() {
        let bytes = VersionedMessage::V0(sample_v0()).encode().unwrap();
        assert!(matches!(
            VersionedMessage::decode(&bytes[..bytes.len() - 3]),
            Err(SolError::EndOfBuffer { .. })
        ));
    }

    // -- accessors ------------------------------------------------------------

    #[test]
    fn accessors_agree_across_variants() {
        let legacy = VersionedMessage::Legacy(sample_legacy());
        let v0 = VersionedMessage::V0(sample_v0());
        assert_eq!(legacy.header(), v0.header());
        assert_eq!(legacy.account_keys(), v0.account_keys());
        assert_eq!(legacy.recent_blockhash(), v0.recent_blockhash());
        assert_eq!(legacy.instructions(), v0.instructions());
        assert_eq!(legacy.signer_keys(), &[PublicKey::from([1u8; 32])]);
    }
}
