//! Compile caller-level instructions into a legacy message.
//!
//! Every account referenced by any instruction is recorded once, in the
//! order it is first seen. An account's signer and writable flags are the
//! union of every reference to it, so a later read-only mention never demotes
//! an earlier writable one (or the other way round). Program IDs are recorded
//! as read-only non-signers.
//!
//! The final key list is the four buckets concatenated:
//!   1. writable signers  (fee payer first, when given)
//!   2. read-only signers
//!   3. writable non-signers
//!   4. read-only non-signers
//!
//! Within a bucket, keys keep first-seen order.

use indexmap::{IndexMap, IndexSet};

use crate::error::SolError;
use crate::identity::{Blockhash, PublicKey};
use crate::instruction::{CompiledInstruction, Instruction, InstructionData};
use crate::message::{LegacyMessage, MessageHeader};
use crate::transaction::Transaction;

/// Account indices are single bytes.
pub const MAX_ACCOUNTS: usize = 256;

#[derive(Debug, Clone, Copy, Default)]
struct AccountFlags {
    is_signer: bool,
    is_writable: bool,
}

/// First-seen ordered record of every account and its merged privileges.
#[derive(Debug, Default)]
struct AccountClassifier {
    accounts: IndexMap<PublicKey, AccountFlags>,
}

impl AccountClassifier {
    fn record(&mut self, pubkey: PublicKey, is_signer: bool, is_writable: bool) {
        let flags = self.accounts.entry(pubkey).or_default();
        flags.is_signer |= is_signer;
        flags.is_writable |= is_writable;
    }

    /// Split into the canonical buckets and derive the header counts.
    fn into_ordered(self) -> Result<(IndexSet<PublicKey>, MessageHeader), SolError> {
        let total = self.accounts.len();
        if total > MAX_ACCOUNTS {
            return Err(SolError::ExceededAccountLimit(total));
        }

        let mut writable_signers = Vec::new();
        let mut readonly_signers = Vec::new();
        let mut writable_unsigned = Vec::new();
        let mut readonly_unsigned = Vec::new();

        for (pubkey, flags) in self.accounts {
            let bucket = match (flags.is_signer, flags.is_writable) {
                (true, true) => &mut writable_signers,
                (true, false) => &mut readonly_signers,
                (false, true) => &mut writable_unsigned,
                (false, false) => &mut readonly_unsigned,
            };
            bucket.push(pubkey);
        }

        let count = |n: usize| u8::try_from(n).map_err(|_| SolError::ExceededAccountLimit(total));
        let header = MessageHeader {
            num_required_signatures: count(writable_signers.len() + readonly_signers.len())?,
            num_readonly_signed_accounts: count(readonly_signers.len())?,
            num_readonly_unsigned_accounts: count(readonly_unsigned.len())?,
        };

        let keys = writable_signers
            .into_iter()
            .chain(readonly_signers)
            .chain(writable_unsigned)
            .chain(readonly_unsigned)
            .collect();

        Ok((keys, header))
    }
}

/// Compile instructions into a legacy message.
///
/// When a fee payer is given it becomes a writable signer at index 0.
pub fn compile_message<D: InstructionData>(
    instructions: &[Instruction<D>],
    recent_blockhash: Blockhash,
    fee_payer: Option<&PublicKey>,
) -> Result<LegacyMessage, SolError> {
    let mut classifier = AccountClassifier::default();

    if let Some(payer) = fee_payer {
        classifier.record(*payer, true, true);
    }

    for ix in instructions {
        for meta in &ix.accounts {
            classifier.record(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        classifier.record(ix.program_id, false, false);
    }

    let (keys, header) = classifier.into_ordered()?;

    let index_of = |pubkey: &PublicKey| -> Result<u8, SolError> {
        keys.get_index_of(pubkey)
            .and_then(|idx| u8::try_from(idx).ok())
            .ok_or(SolError::ExceededAccountLimit(keys.len()))
    };

    let compiled = instructions
        .iter()
        .map(|ix| -> Result<CompiledInstruction, SolError> {
            Ok(CompiledInstruction {
                program_id_index: index_of(&ix.program_id)?,
                accounts: ix
                    .accounts
                    .iter()
                    .map(|meta| index_of(&meta.pubkey))
                    .collect::<Result<Vec<_>, _>>()?,
                data: ix.data.instruction_data(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::trace!(
        "compiled {} instructions over {} accounts, {} signers",
        compiled.len(),
        keys.len(),
        header.num_required_signatures
    );

    Ok(LegacyMessage {
        header,
        account_keys: keys.into_iter().collect(),
        recent_blockhash,
        instructions: compiled,
    })
}

/// Compile instructions into an unsigned transaction.
///
/// Every required signer gets a placeholder signature (all zero bytes) to be
/// replaced by an external signer via [`Transaction::set_signature`].
pub fn compile_transaction<D: InstructionData>(
    instructions: &[Instruction<D>],
    recent_blockhash: Blockhash,
    fee_payer: Option<&PublicKey>,
) -> Result<Transaction, SolError> {
    let message = compile_message(instructions, recent_blockhash, fee_payer)?;
    Ok(Transaction::new_unsigned(message.into()))
}
