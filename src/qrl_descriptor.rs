//! The 3-byte QRL extended descriptor and the container sizes built on it.

use crate::error::{Error, XmssResult};
use crate::hash::HashFunction;

/// Byte length of the packed descriptor.
pub const DESCRIPTOR_SIZE: usize = 3;
/// Byte length of the key-generation seed.
pub const SEED_SIZE: usize = 48;
/// Extended seed: descriptor followed by the seed.
pub const EXTENDED_SEED_SIZE: usize = DESCRIPTOR_SIZE + SEED_SIZE;
/// Extended public key: descriptor, root and public seed.
pub const EXTENDED_PK_SIZE: usize = DESCRIPTOR_SIZE + 64;
/// Byte length of a QRL address.
pub const ADDRESS_SIZE: usize = 20;

/// Descriptor signature-type nibble for XMSS.
pub const SIGNATURE_TYPE_XMSS: u8 = 0;
/// Descriptor address-format nibble for SHA-256 derived addresses, the only
/// format this implementation supports.
pub const ADDR_FORMAT_SHA256: u8 = 0;

/// The QRL extended descriptor: hash family, signature type, tree height
/// and address format packed into 3 bytes.
///
/// The signature-type and hash-function fields are carried as raw nibbles;
/// values outside the known enumerations are preserved rather than
/// rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QrlDescriptor {
    hash_function: u8,
    signature_type: u8,
    height: u8,
    addr_format_type: u8,
}

impl QrlDescriptor {
    /// Builds a descriptor from its four fields.
    pub fn new(
        height: u8,
        hash_function: HashFunction,
        signature_type: u8,
        addr_format_type: u8,
    ) -> Self {
        QrlDescriptor {
            hash_function: hash_function as u8,
            signature_type,
            height,
            addr_format_type,
        }
    }

    /// Decodes a packed descriptor.
    ///
    /// The height is reconstructed from the half-height nibble alone; the
    /// parity byte written by [`Self::to_bytes`] is ignored, so only even
    /// heights round-trip.
    pub fn from_bytes(bytes: &[u8; DESCRIPTOR_SIZE]) -> Self {
        QrlDescriptor {
            hash_function: bytes[0] & 0x0F,
            signature_type: (bytes[0] >> 4) & 0x0F,
            height: (bytes[1] & 0x0F) << 1,
            addr_format_type: (bytes[1] >> 4) & 0x0F,
        }
    }

    /// Reads the descriptor prefix of a 51-byte extended seed.
    pub fn from_extended_seed(extended_seed: &[u8]) -> XmssResult<Self> {
        if extended_seed.len() != EXTENDED_SEED_SIZE {
            return Err(Error::InvalidSeedLength {
                expected: EXTENDED_SEED_SIZE,
                got: extended_seed.len(),
            });
        }
        let mut desc = [0u8; DESCRIPTOR_SIZE];
        desc.copy_from_slice(&extended_seed[..DESCRIPTOR_SIZE]);
        Ok(Self::from_bytes(&desc))
    }

    /// Reads the descriptor prefix of a 67-byte extended public key.
    pub fn from_extended_pk(extended_pk: &[u8]) -> XmssResult<Self> {
        if extended_pk.len() != EXTENDED_PK_SIZE {
            return Err(Error::InvalidKeyLength {
                expected: EXTENDED_PK_SIZE,
                got: extended_pk.len(),
            });
        }
        let mut desc = [0u8; DESCRIPTOR_SIZE];
        desc.copy_from_slice(&extended_pk[..DESCRIPTOR_SIZE]);
        Ok(Self::from_bytes(&desc))
    }

    /// Packs the descriptor into its 3-byte wire form.
    pub fn to_bytes(&self) -> [u8; DESCRIPTOR_SIZE] {
        [
            (self.signature_type << 4) | (self.hash_function & 0x0F),
            (self.addr_format_type << 4) | ((self.height >> 1) & 0x0F),
            self.height & 1,
        ]
    }

    /// The raw hash-function nibble.
    pub fn hash_function(&self) -> u8 {
        self.hash_function
    }

    /// The hash family used for tree operations under this descriptor.
    pub fn hash_family(&self) -> HashFunction {
        HashFunction::from_nibble(self.hash_function)
    }

    /// The raw signature-type nibble.
    pub fn signature_type(&self) -> u8 {
        self.signature_type
    }

    /// The tree height.
    pub fn height(&self) -> u8 {
        self.height
    }

    /// The raw address-format nibble.
    pub fn addr_format_type(&self) -> u8 {
        self.addr_format_type
    }
}
