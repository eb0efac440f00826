//! The stateful XMSS tree object, verification and QRL address derivation.

use core::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::error::{Error, XmssResult};
use crate::hash::HashFunction;
use crate::params::{
    BDS_PARAM_K, WOTS_PARAM_N, WOTS_PARAM_W, WotsParams, XmssParams, get_height_from_sig_size,
};
use crate::qrl_descriptor::{
    ADDR_FORMAT_SHA256, ADDRESS_SIZE, DESCRIPTOR_SIZE, EXTENDED_PK_SIZE, QrlDescriptor, SEED_SIZE,
    SIGNATURE_TYPE_XMSS,
};
use crate::utils::bytes_to_ull;
use crate::xmss_commons::xmss_verify_sig;
use crate::xmss_core::{BdsState, xmss_fast_gen_keypair, xmss_fast_sign_msg, xmss_fast_update};

/// Byte length of the packed secret key:
/// `idx(4) || SK_SEED(32) || SK_PRF(32) || PUB_SEED(32) || root(32)`.
pub const SK_SIZE: usize = 4 + 4 * WOTS_PARAM_N as usize;

/// A stateful XMSS signing tree bound to a QRL descriptor.
///
/// The tree owns the secret key, the seed it was derived from and the BDS
/// traversal state. Signing is not reentrant: calls must be strictly
/// serialised by the caller, and the advanced state must be persisted
/// before a signature is released.
#[derive(Clone)]
pub struct Xmss {
    params: XmssParams,
    hash_function: HashFunction,
    height: u8,
    sk: [u8; SK_SIZE],
    seed: [u8; SEED_SIZE],
    bds_state: BdsState,
    desc: QrlDescriptor,
}

impl fmt::Debug for Xmss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Xmss")
            .field("desc", &self.desc)
            .field("index", &self.index())
            .field("sk", &"[REDACTED]")
            .field("seed", &"[REDACTED]")
            .finish()
    }
}

impl Drop for Xmss {
    fn drop(&mut self) {
        self.sk.zeroize();
        self.seed.zeroize();
    }
}

impl Xmss {
    /// Builds a tree from a descriptor and a 48-byte seed, running the full
    /// initial tree build. The index starts at 0.
    pub fn initialize_tree(desc: QrlDescriptor, seed: &[u8]) -> XmssResult<Self> {
        if seed.len() != SEED_SIZE {
            return Err(Error::InvalidSeedLength {
                expected: SEED_SIZE,
                got: seed.len(),
            });
        }
        let height = desc.height();
        if height < 4 || height > 30 || height & 1 != 0 {
            return Err(Error::InvalidHeight(height));
        }

        let params = XmssParams::new(WOTS_PARAM_N, u32::from(height), WOTS_PARAM_W, BDS_PARAM_K)?;
        let hash_function = desc.hash_family();
        let mut bds_state = BdsState::new(u32::from(height), WOTS_PARAM_N, BDS_PARAM_K);
        let mut sk = [0u8; SK_SIZE];
        let mut pk = [0u8; 2 * WOTS_PARAM_N as usize];

        xmss_fast_gen_keypair(hash_function, &params, &mut pk, &mut sk, &mut bds_state, seed)?;

        let mut seed_copy = [0u8; SEED_SIZE];
        seed_copy.copy_from_slice(seed);

        Ok(Xmss {
            params,
            hash_function,
            height,
            sk,
            seed: seed_copy,
            bds_state,
            desc,
        })
    }

    /// Builds a tree from a 48-byte seed and descriptor fields. The
    /// signature type is always XMSS.
    pub fn new_from_seed(
        seed: &[u8],
        height: u8,
        hash_function: HashFunction,
        addr_format_type: u8,
    ) -> XmssResult<Self> {
        let desc = QrlDescriptor::new(height, hash_function, SIGNATURE_TYPE_XMSS, addr_format_type);
        Self::initialize_tree(desc, seed)
    }

    /// Builds a tree from a 51-byte extended seed whose first three bytes
    /// are the packed descriptor.
    pub fn new_from_extended_seed(extended_seed: &[u8]) -> XmssResult<Self> {
        let desc = QrlDescriptor::from_extended_seed(extended_seed)?;
        Self::initialize_tree(desc, &extended_seed[DESCRIPTOR_SIZE..])
    }

    /// Builds a tree from caller-supplied randomness, using the SHA-256
    /// address format.
    pub fn new_from_height<R: rand::CryptoRng + ?Sized>(
        rng: &mut R,
        height: u8,
        hash_function: HashFunction,
    ) -> XmssResult<Self> {
        let mut seed = [0u8; SEED_SIZE];
        rng.fill_bytes(&mut seed);
        let result = Self::new_from_seed(&seed, height, hash_function, ADDR_FORMAT_SHA256);
        seed.zeroize();
        result
    }

    /// The tree height.
    pub fn height(&self) -> u8 {
        self.height
    }

    /// The hash family driving this tree.
    pub fn hash_function(&self) -> HashFunction {
        self.hash_function
    }

    /// The descriptor this tree was built under.
    pub fn descriptor(&self) -> &QrlDescriptor {
        &self.desc
    }

    /// The index of the next one-time key to be used.
    pub fn index(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        {
            bytes_to_ull(&self.sk[..4]) as u32
        }
    }

    /// Fast-forwards the tree to `new_index`, replaying the traversal
    /// updates for every skipped leaf. The index can only move forward.
    pub fn set_index(&mut self, new_index: u32) -> XmssResult<()> {
        xmss_fast_update(
            self.hash_function,
            &self.params,
            &mut self.sk,
            &mut self.bds_state,
            new_index,
        )
    }

    /// Total number of one-time signatures this tree can produce.
    pub fn number_signatures(&self) -> u32 {
        1u32 << self.height
    }

    /// Number of one-time signatures still available.
    pub fn remaining_signatures(&self) -> u32 {
        self.number_signatures() - self.index()
    }

    /// The 48-byte seed this tree was derived from.
    pub fn seed(&self) -> &[u8; SEED_SIZE] {
        &self.seed
    }

    /// The 51-byte extended seed: packed descriptor followed by the seed.
    pub fn extended_seed(&self) -> [u8; DESCRIPTOR_SIZE + SEED_SIZE] {
        let mut out = [0u8; DESCRIPTOR_SIZE + SEED_SIZE];
        out[..DESCRIPTOR_SIZE].copy_from_slice(&self.desc.to_bytes());
        out[DESCRIPTOR_SIZE..].copy_from_slice(&self.seed);
        out
    }

    /// The public seed used for bitmask and key derivation.
    pub fn pk_seed(&self) -> &[u8] {
        &self.sk[68..100]
    }

    /// The Merkle tree root.
    pub fn root(&self) -> &[u8] {
        &self.sk[100..132]
    }

    /// The packed secret key.
    pub fn sk(&self) -> &[u8; SK_SIZE] {
        &self.sk
    }

    /// The 67-byte extended public key: `desc(3) || root(32) || pub_seed(32)`.
    pub fn pk(&self) -> [u8; EXTENDED_PK_SIZE] {
        let mut out = [0u8; EXTENDED_PK_SIZE];
        out[..DESCRIPTOR_SIZE].copy_from_slice(&self.desc.to_bytes());
        out[DESCRIPTOR_SIZE..DESCRIPTOR_SIZE + 32].copy_from_slice(self.root());
        out[DESCRIPTOR_SIZE + 32..].copy_from_slice(self.pk_seed());
        out
    }

    /// The 20-byte QRL address of this tree's public key.
    pub fn address(&self) -> XmssResult<[u8; ADDRESS_SIZE]> {
        get_xmss_address_from_pk(&self.pk())
    }

    /// Read-only view of the BDS traversal state.
    pub fn bds_state(&self) -> &BdsState {
        &self.bds_state
    }

    /// Signs a message, advancing the one-time key index and the traversal
    /// state. Fails with [`Error::KeyExhausted`] once all `2^h` one-time
    /// keys have been used.
    pub fn sign(&mut self, message: &[u8]) -> XmssResult<Vec<u8>> {
        xmss_fast_sign_msg(
            self.hash_function,
            &self.params,
            &mut self.sk,
            &mut self.bds_state,
            message,
        )
    }
}

/// Verifies a signature against a 67-byte extended public key, using the
/// production Winternitz parameter.
pub fn verify(message: &[u8], signature: &[u8], extended_pk: &[u8]) -> XmssResult<()> {
    verify_with_custom_wots_w(message, signature, extended_pk, WOTS_PARAM_W)
}

/// Verifies a signature produced under a non-default Winternitz parameter.
pub fn verify_with_custom_wots_w(
    message: &[u8],
    signature: &[u8],
    extended_pk: &[u8],
    wots_param_w: u32,
) -> XmssResult<()> {
    let desc = QrlDescriptor::from_extended_pk(extended_pk)?;
    if desc.signature_type() != SIGNATURE_TYPE_XMSS {
        return Err(Error::InvalidSignatureType);
    }

    let sig_size =
        u32::try_from(signature.len()).map_err(|_| Error::InvalidSignatureLength(signature.len()))?;
    let height = get_height_from_sig_size(sig_size, wots_param_w)?;
    if height == 0 || height != u32::from(desc.height()) {
        return Err(Error::VerificationFailed);
    }

    let wots_params = WotsParams::new(WOTS_PARAM_N, wots_param_w)?;
    xmss_verify_sig(
        desc.hash_family(),
        &wots_params,
        message,
        signature,
        &extended_pk[DESCRIPTOR_SIZE..],
        height,
    )
}

/// Derives the 20-byte QRL address from a 67-byte extended public key:
/// the re-encoded descriptor followed by the last 17 bytes of
/// `SHA-256(extended_pk)`. Only the SHA-256 address format is supported.
pub fn get_xmss_address_from_pk(extended_pk: &[u8]) -> XmssResult<[u8; ADDRESS_SIZE]> {
    let desc = QrlDescriptor::from_extended_pk(extended_pk)?;
    if desc.addr_format_type() != ADDR_FORMAT_SHA256 {
        return Err(Error::AddrFormatNotSupported);
    }

    let mut address = [0u8; ADDRESS_SIZE];
    address[..DESCRIPTOR_SIZE].copy_from_slice(&desc.to_bytes());
    let hashed_key = Sha256::digest(extended_pk);
    address[DESCRIPTOR_SIZE..]
        .copy_from_slice(&hashed_key[hashed_key.len() - (ADDRESS_SIZE - DESCRIPTOR_SIZE)..]);
    Ok(address)
}
