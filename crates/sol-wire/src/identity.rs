//! Fixed-length identities: public keys, block hashes and signatures.
//!
//! On the wire these are raw bytes with no length prefix. Their textual form
//! is Base58 over the raw bytes, using the Bitcoin alphabet. The text codec is
//! injected through [`TextCodec`]; [`Bs58`] is the default.

use std::fmt;
use std::str::FromStr;

use crate::buffer::WireBuffer;
use crate::error::SolError;

pub const PUBKEY_BYTES: usize = 32;
pub const HASH_BYTES: usize = 32;
pub const SIGNATURE_BYTES: usize = 64;

/// Converts raw identity bytes to and from text.
pub trait TextCodec {
    fn encode(&self, bytes: &[u8]) -> String;

    fn decode(&self, text: &str) -> Result<Vec<u8>, SolError>;
}

/// Base58 text codec backed by the `bs58` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bs58;

impl TextCodec for Bs58 {
    fn encode(&self, bytes: &[u8]) -> String {
        bs58::encode(bytes).into_string()
    }

    fn decode(&self, text: &str) -> Result<Vec<u8>, SolError> {
        bs58::decode(text)
            .into_vec()
            .map_err(|e| SolError::InvalidIdentity(format!("base58 decode failed: {e}")))
    }
}

macro_rules! fixed_identity {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; $len]);

        impl $name {
            pub const LEN: usize = $len;

            pub const fn new_from_array(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub const fn to_bytes(&self) -> [u8; $len] {
                self.0
            }

            /// Build from a slice that must be exactly the right length.
            pub fn try_from_slice(bytes: &[u8]) -> Result<Self, SolError> {
                let arr: [u8; $len] = bytes.try_into().map_err(|_| {
                    SolError::InvalidIdentity(format!(
                        "expected {} bytes, got {}",
                        $len,
                        bytes.len()
                    ))
                })?;
                Ok(Self(arr))
            }

            /// Parse the textual form with an injected codec.
            pub fn parse_with<C: TextCodec + ?Sized>(
                codec: &C,
                text: &str,
            ) -> Result<Self, SolError> {
                Self::try_from_slice(&codec.decode(text)?)
            }

            pub fn to_text_with<C: TextCodec + ?Sized>(&self, codec: &C) -> String {
                codec.encode(&self.0)
            }

            pub fn write(&self, buf: &mut WireBuffer) {
                buf.write_bytes(&self.0);
            }

            pub fn read(buf: &mut WireBuffer) -> Result<Self, SolError> {
                Ok(Self(buf.read_array()?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self([0u8; $len])
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = SolError;

            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                Self::try_from_slice(bytes)
            }
        }

        impl FromStr for $name {
            type Err = SolError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse_with(&Bs58, s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_text_with(&Bs58))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }
    };
}

fixed_identity!(
    /// A 32-byte Ed25519 public key, which is also an account address.
    PublicKey,
    PUBKEY_BYTES
);

fixed_identity!(
    /// A 32-byte recent block hash anchoring a transaction's lifetime.
    Blockhash,
    HASH_BYTES
);

fixed_identity!(
    /// A 64-byte Ed25519 signature.
    ///
    /// The default value (all zeros, Base58 `1111...`) is the placeholder
    /// written into unsigned signature slots.
    Signature,
    SIGNATURE_BYTES
);

impl Signature {
    pub fn is_placeholder(&self) -> bool {
        self.0 == [0u8; SIGNATURE_BYTES]
    }
}

/// Validate a Base58 address string.
///
/// Fails if decoding fails or the decoded length is not 32 bytes.
pub fn validate_address(address: &str) -> Result<PublicKey, SolError> {
    address.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- text form ------------------------------------------------------------

    #[test]
    fn system_program_address_is_all_ones() {
        let key = PublicKey::default();
        assert_eq!(key.to_string(), "11111111111111111111111111111111");
    }

    #[test]
    fn text_roundtrip() {
        let text = "Es8H62JtW4NwQK4Qcz6LCFswiqfnEQdPskSsGBCJASo";
        let key: PublicKey = text.parse().unwrap();
        assert_eq!(key.to_string(), text);
    }

    #[test]
    fn known_address_decodes_to_known_bytes() {
        let key: PublicKey = "Es8H62JtW4NwQK4Qcz6LCFswiqfnEQdPskSsGBCJASo".parse().unwrap();
        assert_eq!(
            hex::encode(key.to_bytes()),
            "038d3a41fdc84eca6199e3eaf0386f8f92ae135a985f584e3ce7f4da03f53a74"
        );
    }

    #[test]
    fn invalid_base58_fails() {
        // '0', 'O', 'I' and 'l' are not in the alphabet.
        let err = "0OIl".parse::<PublicKey>().unwrap_err();
        assert!(matches!(err, SolError::InvalidIdentity(_)));
    }

    #[test]
    fn wrong_decoded_length_fails() {
        let short = bs58::encode([1u8; 31]).into_string();
        let err = short.parse::<PublicKey>().unwrap_err();
        assert_eq!(
            err,
            SolError::InvalidIdentity("expected 32 bytes, got 31".into())
        );
    }

    #[test]
    fn blockhash_parses() {
        let hash: Blockhash = "13uptgsxwDM8pzLj18FCqncEo8Nbz4srN3H7U6xqpaeq".parse().unwrap();
        assert_eq!(hash.to_bytes()[0], 0x00);
    }

    #[test]
    fn placeholder_signature_text() {
        let sig = Signature::default();
        assert!(sig.is_placeholder());
        assert_eq!(sig.to_string(), "1".repeat(64));
    }

    #[test]
    fn validate_address_accepts_and_rejects() {
        assert!(validate_address("CxXjGnBqvcq73ZFP75SXoDVEZ5MhkNMPMRPQwpeUYFFk").is_ok());
        assert!(validate_address("not-an-address").is_err());
    }

    #[test]
    fn debug_shows_type_and_text() {
        let debug = format!("{:?}", PublicKey::default());
        assert_eq!(debug, "PublicKey(11111111111111111111111111111111)");
    }

    // -- injected codec -------------------------------------------------------

    struct HexCodec;

    impl TextCodec for HexCodec {
        fn encode(&self, bytes: &[u8]) -> String {
            hex::encode(bytes)
        }

        fn decode(&self, text: &str) -> Result<Vec<u8>, SolError> {
            hex::decode(text).map_err(|e| SolError::InvalidIdentity(e.to_string()))
        }
    }

    #[test]
    fn parse_with_custom_codec() {
        let text = "ab".repeat(32);
        let key = PublicKey::parse_with(&HexCodec, &text).unwrap();
        assert_eq!(key.to_bytes(), [0xab; 32]);
        assert_eq!(key.to_text_with(&HexCodec), text);
    }

    // -- binary form ----------------------------------------------------------

    #[test]
    fn slice_length_is_checked() {
        assert!(PublicKey::try_from_slice(&[0u8; 32]).is_ok());
        assert!(PublicKey::try_from_slice(&[0u8; 33]).is_err());
        assert!(Signature::try_from_slice(&[0u8; 32]).is_err());
        assert!(Signature::try_from_slice(&[7u8; 64]).is_ok());
    }

    #[test]
    fn binary_form_has_no_prefix() {
        let mut buf = WireBuffer::new();
        PublicKey::from([5u8; 32]).write(&mut buf);
        Signature::from([6u8; 64]).write(&mut buf);
        assert_eq!(buf.as_slice().len(), 96);

        assert_eq!(PublicKey::read(&mut buf).unwrap(), PublicKey::from([5u8; 32]));
        assert_eq!(Signature::read(&mut buf).unwrap(), Signature::from([6u8; 64]));
    }

    #[test]
    fn short_binary_read_is_end_of_buffer() {
        let mut buf = WireBuffer::from_bytes(vec![0u8; 63]);
        assert!(matches!(
            Signature::read(&mut buf),
            Err(SolError::EndOfBuffer {
                needed: 64,
                remaining: 63
            })
        ));
    }

    #[test]
    fn equality_is_bytewise() {
        let a = PublicKey::from([1u8; 32]);
        let mut raw = [1u8; 32];
        assert_eq!(a, PublicKey::from(raw));
        raw[31] = 2;
        assert_ne!(a, PublicKey::from(raw));
    }
}
