//! Well-known programs and their instruction data layouts.
//!
//! Covers the System Program `Transfer`, the SPL Token `Transfer`, and
//! associated token account (ATA) address derivation.

use crate::buffer::WireBuffer;
use crate::identity::PublicKey;
use crate::instruction::{AccountMeta, Instruction, InstructionData};

// ---------------------------------------------------------------------------
// Well-known program IDs
// ---------------------------------------------------------------------------

/// System Program: 32 zero bytes, Base58 `11111111111111111111111111111111`.
pub const SYSTEM_PROGRAM_ID: PublicKey = PublicKey::new_from_array([0u8; 32]);

/// SPL Token Program: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: PublicKey = PublicKey::new_from_array([
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79, 0xac,
    0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff, 0x00, 0xa9,
]);

/// Associated Token Account Program: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: PublicKey = PublicKey::new_from_array([
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d, 0x83,
    0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9, 0xf8, 0x59,
]);

// ---------------------------------------------------------------------------
// System Program
// ---------------------------------------------------------------------------

/// System Program instructions this crate can encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemInstruction {
    /// Move lamports between two system-owned accounts.
    Transfer { lamports: u64 },
}

impl InstructionData for SystemInstruction {
    /// u32 LE variant index followed by the variant's fields.
    fn instruction_data(&self) -> Vec<u8> {
        let mut buf = WireBuffer::with_capacity(12);
        match self {
            Self::Transfer { lamports } => {
                buf.write_int(2u32);
                buf.write_int(*lamports);
            }
        }
        buf.into_bytes()
    }
}

/// Build a System Program `Transfer` of `lamports` from `from` to `to`.
pub fn system_transfer(
    from: &PublicKey,
    to: &PublicKey,
    lamports: u64,
) -> Instruction<SystemInstruction> {
    Instruction::new(
        SYSTEM_PROGRAM_ID,
        vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        SystemInstruction::Transfer { lamports },
    )
}

// ---------------------------------------------------------------------------
// SPL Token
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenInstruction {
    /// Transfer `amount` base units between token accounts.
    Transfer { amount: u64 },
}

impl InstructionData for TokenInstruction {
    /// One tag byte followed by the variant's fields.
    fn instruction_data(&self) -> Vec<u8> {
        let mut buf = WireBuffer::with_capacity(9);
        match self {
            Self::Transfer { amount } => {
                buf.write_int(3u8);
                buf.write_int(*amount);
            }
        }
        buf.into_bytes()
    }
}

/// Build an SPL Token `Transfer` instruction.
///
/// `source` and `destination` are token accounts; `owner` signs for `source`.
pub fn spl_transfer(
    source: &PublicKey,
    destination: &PublicKey,
    owner: &PublicKey,
    amount: u64,
) -> Instruction<TokenInstruction> {
    Instruction::new(
        TOKEN_PROGRAM_ID,
        vec![
            AccountMeta::new(*source, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        TokenInstruction::Transfer { amount },
    )
}

/// Derive the associated token account for a wallet + mint pair.
///
/// Seeds are `[wallet, token_program_id, mint]` under the associated token
/// account program.
#[cfg(feature = "dalek")]
pub fn associated_token_address(
    wallet: &PublicKey,
    mint: &PublicKey,
) -> Result<crate::pda::ProgramDerivedAddress, crate::error::SolError> {
    crate::pda::ProgramDerivedAddress::find(
        &ASSOCIATED_TOKEN_PROGRAM_ID,
        &[wallet.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
    )
}
