//! Solana transaction wire format, without `solana-sdk`.
//!
//! This crate turns a list of account-addressed instructions into the exact
//! bytes the network accepts, parses those bytes back, and derives program
//! addresses. It covers:
//!
//! - the compact-u16 length prefix and the byte buffer every codec uses,
//! - fixed-length identities (public keys, block hashes, signatures),
//! - compiled instructions, legacy and v0 messages, and the transaction
//!   envelope,
//! - compiling instructions into a message (account dedup and ordering),
//! - Program Derived Address derivation.
//!
//! Signing, RPC, and key storage live elsewhere: compiled transactions carry
//! placeholder signatures that callers replace via
//! [`Transaction::set_signature`].

pub mod buffer;
pub mod compiler;
pub mod error;
pub mod identity;
pub mod instruction;
pub mod message;
pub mod pda;
pub mod programs;
pub mod short_vec;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use buffer::WireBuffer;
pub use compiler::{compile_message, compile_transaction, MAX_ACCOUNTS};
pub use error::SolError;
pub use identity::{
    validate_address, Blockhash, Bs58, PublicKey, Signature, TextCodec, HASH_BYTES,
    PUBKEY_BYTES, SIGNATURE_BYTES,
};
pub use instruction::{
    AccountMeta, AddressTableLookup, CompiledInstruction, Instruction, InstructionData,
};
pub use message::{
    LegacyMessage, MessageHeader, V0Message, VersionedMessage, MESSAGE_VERSION_PREFIX,
};
pub use pda::{
    CurveCheck, PdaHasher, ProgramAddressDeriver, ProgramDerivedAddress, MAX_SEED_LEN,
    PDA_MARKER,
};
#[cfg(feature = "dalek")]
pub use pda::{Ed25519Curve, Sha256Hasher};
#[cfg(feature = "dalek")]
pub use programs::associated_token_address;
pub use programs::{
    spl_transfer, system_transfer, SystemInstruction, TokenInstruction,
    ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
pub use short_vec::{decode_compact_u16, encode_compact_u16};
pub use transaction::Transaction;
