//! Instructions before and after compilation.
//!
//! ```text
//! CompiledInstruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//!
//! AddressTableLookup:
//!   account_key             32 bytes
//!   num_writable            compact-u16
//!   writable_indexes        u8 * num_writable
//!   num_readonly            compact-u16
//!   readonly_indexes        u8 * num_readonly
//! ```

use crate::buffer::WireBuffer;
use crate::error::SolError;
use crate::identity::PublicKey;
use crate::short_vec::{read_compact_u16, write_len};

/// A single account reference in an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: PublicKey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: PublicKey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn new_readonly(pubkey: PublicKey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// Produces the opaque data bytes of an instruction.
///
/// Each program defines its own data layout; the compiler only copies the
/// produced bytes into the compiled instruction.
pub trait InstructionData {
    fn instruction_data(&self) -> Vec<u8>;
}

impl InstructionData for Vec<u8> {
    fn instruction_data(&self) -> Vec<u8> {
        self.clone()
    }
}

impl InstructionData for [u8] {
    fn instruction_data(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl<T: InstructionData + ?Sized> InstructionData for &T {
    fn instruction_data(&self) -> Vec<u8> {
        (**self).instruction_data()
    }
}

impl<T: InstructionData + ?Sized> InstructionData for Box<T> {
    fn instruction_data(&self) -> Vec<u8> {
        (**self).instruction_data()
    }
}

/// An instruction as the caller describes it: program, accounts, data.
#[derive(Debug, Clone)]
pub struct Instruction<D: InstructionData = Vec<u8>> {
    pub program_id: PublicKey,
    pub accounts: Vec<AccountMeta>,
    pub data: D,
}

impl<D: InstructionData> Instruction<D> {
    pub fn new(program_id: PublicKey, accounts: Vec<AccountMeta>, data: D) -> Self {
        Self {
            program_id,
            accounts,
            data,
        }
    }
}

impl<D: InstructionData + 'static> Instruction<D> {
    /// Erase the data type so instructions for different programs can share
    /// one list.
    pub fn boxed(self) -> Instruction<Box<dyn InstructionData>> {
        Instruction {
            program_id: self.program_id,
            accounts: self.accounts,
            data: Box::new(self.data),
        }
    }
}

impl std::fmt::Debug for dyn InstructionData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InstructionData({} bytes)", self.instruction_data().len())
    }
}

/// An instruction whose account references are indices into the message's
/// account keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

impl CompiledInstruction {
    pub fn write(&self, buf: &mut WireBuffer) -> Result<(), SolError> {
        buf.write_int(self.program_id_index);
        write_byte_array(buf, &self.accounts)?;
        write_byte_array(buf, &self.data)
    }

    pub fn read(buf: &mut WireBuffer) -> Result<Self, SolError> {
        Ok(Self {
            program_id_index: buf.read_int::<u8>()?,
            accounts: read_byte_array(buf)?,
            data: read_byte_array(buf)?,
        })
    }
}

/// A reference to accounts loaded from an on-chain address lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressTableLookup {
    pub account_key: PublicKey,
    pub writable_indexes: Vec<u8>,
    pub readonly_indexes: Vec<u8>,
}

impl AddressTableLookup {
    pub fn write(&self, buf: &mut WireBuffer) -> Result<(), SolError> {
        self.account_key.write(buf);
        write_byte_array(buf, &self.writable_indexes)?;
        write_byte_array(buf, &self.readonly_indexes)
    }

    pub fn read(buf: &mut WireBuffer) -> Result<Self, SolError> {
        Ok(Self {
            account_key: PublicKey::read(buf)?,
            writable_indexes: read_byte_array(buf)?,
            readonly_indexes: read_byte_array(buf)?,
        })
    }
}

fn write_byte_array(buf: &mut WireBuffer, bytes: &[u8]) -> Result<(), SolError> {
    write_len(buf, bytes.len())?;
    buf.write_bytes(bytes);
    Ok(())
}

fn read_byte_array(buf: &mut WireBuffer) -> Result<Vec<u8>, SolError> {
    let len = read_compact_u16(buf)? as usize;
    Ok(buf.read_bytes(len)?.to_vec())
}
