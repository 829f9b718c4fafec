use thiserror::Error;

/// Errors produced while encoding, decoding, compiling or deriving.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolError {
    #[error("end of buffer: needed {needed} bytes, {remaining} remaining")]
    EndOfBuffer { needed: usize, remaining: usize },

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("unsupported message version: {0}")]
    UnsupportedVersion(u8),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("seed {index} is {len} bytes, max is 32")]
    SeedTooLong { index: usize, len: usize },

    #[error("derived address is on the ed25519 curve")]
    AddressOnCurve,

    #[error("transaction references {0} accounts, max is 256")]
    ExceededAccountLimit(usize),

    #[error("no viable bump seed found")]
    BumpSeedsExhausted,

    #[error("public key is not a required signer of this transaction")]
    SignerNotFound,
}
