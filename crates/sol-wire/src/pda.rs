//! Program Derived Address (PDA) derivation.
//!
//! A PDA is `SHA-256(seed_0 || ... || seed_n || program_id || "ProgramDerivedAddress")`,
//! accepted only when the result is NOT a valid Ed25519 point, so no private
//! key can ever sign for it. [`ProgramAddressDeriver::find`] appends a single
//! bump byte to the seeds and searches from 255 down to 0 for the first
//! off-curve result.
//!
//! The hash and the curve test are injected through [`PdaHasher`] and
//! [`CurveCheck`]. With the `dalek` feature (on by default) [`Sha256Hasher`]
//! and [`Ed25519Curve`] provide the network's definitions.

use crate::error::SolError;
use crate::identity::PublicKey;

/// Longest accepted seed, in bytes.
pub const MAX_SEED_LEN: usize = 32;

/// Domain separator appended after the program ID.
pub const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// A hash over the concatenation of `parts`, producing 32 bytes.
pub trait PdaHasher {
    fn hashv(&self, parts: &[&[u8]]) -> [u8; 32];
}

/// Whether 32 bytes decode to a point on the signing curve.
pub trait CurveCheck {
    fn is_on_curve(&self, bytes: &[u8; 32]) -> bool;
}

#[cfg(feature = "dalek")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

#[cfg(feature = "dalek")]
impl PdaHasher for Sha256Hasher {
    fn hashv(&self, parts: &[&[u8]]) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().into()
    }
}

/// Ed25519 membership via `curve25519-dalek` point decompression.
#[cfg(feature = "dalek")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Curve;

#[cfg(feature = "dalek")]
impl CurveCheck for Ed25519Curve {
    fn is_on_curve(&self, bytes: &[u8; 32]) -> bool {
        curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
            .decompress()
            .is_some()
    }
}

/// A derived address together with the bump seed that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramDerivedAddress {
    pub public_key: PublicKey,
    pub bump_seed: u8,
}

#[cfg(feature = "dalek")]
impl ProgramDerivedAddress {
    /// Derive an address from exact seeds with the default capabilities.
    pub fn create(program_id: &PublicKey, seeds: &[&[u8]]) -> Result<PublicKey, SolError> {
        ProgramAddressDeriver::new().create(program_id, seeds)
    }

    /// Search bump seeds with the default capabilities.
    pub fn find(program_id: &PublicKey, seeds: &[&[u8]]) -> Result<Self, SolError> {
        ProgramAddressDeriver::new().find(program_id, seeds)
    }
}

/// Derives program addresses with an injected hash and curve test.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgramAddressDeriver<H, C> {
    hasher: H,
    curve: C,
}

#[cfg(feature = "dalek")]
impl ProgramAddressDeriver<Sha256Hasher, Ed25519Curve> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: PdaHasher, C: CurveCheck> ProgramAddressDeriver<H, C> {
    pub fn with_capabilities(hasher: H, curve: C) -> Self {
        Self { hasher, curve }
    }

    pub fn create(&self, program_id: &PublicKey, seeds: &[&[u8]]) -> Result<PublicKey, SolError> {
        check_seeds(seeds)?;

        let mut parts: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 2);
        parts.extend_from_slice(seeds);
        parts.push(program_id.as_ref());
        parts.push(PDA_MARKER);

        let hash = self.hasher.hashv(&parts);
        if self.curve.is_on_curve(&hash) {
            return Err(SolError::AddressOnCurve);
        }

        Ok(PublicKey::new_from_array(hash))
    }

    pub fn find(
        &self,
        program_id: &PublicKey,
        seeds: &[&[u8]],
    ) -> Result<ProgramDerivedAddress, SolError> {
        check_seeds(seeds)?;

        for bump in (0u8..=255).rev() {
            let bump_seed = [bump];
            let mut with_bump: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
            with_bump.extend_from_slice(seeds);
            with_bump.push(&bump_seed);

            match self.create(program_id, &with_bump) {
                Ok(public_key) => {
                    log::trace!("program address for {program_id} found at bump {bump}");
                    return Ok(ProgramDerivedAddress {
                        public_key,
                        bump_seed: bump,
                    });
                }
                Err(SolError::AddressOnCurve) => continue,
                Err(other) => return Err(other),
            }
        }

        Err(SolError::BumpSeedsExhausted)
    }
}

fn check_seeds(seeds: &[&[u8]]) -> Result<(), SolError> {
    match seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        Some((index, seed)) => Err(SolError::SeedTooLong {
            index,
            len: seed.len(),
        }),
        None => Ok(()),
    }
}
