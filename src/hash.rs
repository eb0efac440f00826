use sha2::{Digest, Sha256};
use sha3::{
    Shake128, Shake256,
    digest::{ExtendableOutput, Update, XofReader},
};
use zeroize::Zeroize;

use crate::error::{Error, XmssResult};
use crate::hash_address::set_key_and_mask;
use crate::utils::ull_to_bytes;

const XMSS_HASH_PADDING_F: u64 = 0;
const XMSS_HASH_PADDING_H: u64 = 1;
const XMSS_HASH_PADDING_HASH: u64 = 2;
const XMSS_HASH_PADDING_PRF: u64 = 3;

/// Hash family driving the whole PRF/F/H network of a tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HashFunction {
    /// SHA-256, truncated to n bytes.
    Sha2_256 = 0,
    /// SHAKE-128 extendable-output function.
    Shake128 = 1,
    /// SHAKE-256 extendable-output function.
    #[default]
    Shake256 = 2,
}

impl HashFunction {
    /// Resolves a descriptor nibble to a hash family.
    ///
    /// Nibbles outside the known set select SHAKE-256; the descriptor field
    /// is preserved as written, so unknown values must still dispatch
    /// deterministically.
    pub(crate) fn from_nibble(v: u8) -> Self {
        match v {
            0 => Self::Sha2_256,
            1 => Self::Shake128,
            _ => Self::Shake256,
        }
    }
}

pub(crate) fn addr_to_bytes(bytes: &mut [u8], addr: &[u32; 8]) {
    for i in 0..8 {
        ull_to_bytes(&mut bytes[i * 4..i * 4 + 4], u64::from(addr[i]));
    }
}

/// Produces `out.len()` bytes of `hash(input)` for the selected family.
fn core_hash(func: HashFunction, out: &mut [u8], input: &[u8]) -> XmssResult<()> {
    match func {
        HashFunction::Sha2_256 => {
            if out.len() > 32 {
                return Err(Error::Hash { n: out.len() });
            }
            let result = Sha256::digest(input);
            out.copy_from_slice(&result[..out.len()]);
        }
        HashFunction::Shake128 => {
            let mut hasher = Shake128::default();
            hasher.update(input);
            let mut reader = hasher.finalize_xof();
            reader.read(out);
        }
        HashFunction::Shake256 => {
            let mut hasher = Shake256::default();
            hasher.update(input);
            let mut reader = hasher.finalize_xof();
            reader.read(out);
        }
    }
    Ok(())
}

/// Computes PRF(key, in) for an n-byte key and a 32-byte input.
/// n is taken from `out.len()`.
pub(crate) fn prf(
    func: HashFunction,
    out: &mut [u8],
    input: &[u8; 32],
    key: &[u8],
) -> XmssResult<()> {
    let n = out.len();
    let mut buf = vec![0u8; 2 * n + 32];

    ull_to_bytes(&mut buf[..n], XMSS_HASH_PADDING_PRF);
    buf[n..2 * n].copy_from_slice(&key[..n]);
    buf[2 * n..].copy_from_slice(input);

    let result = core_hash(func, out, &buf);
    buf.zeroize();
    result
}

/// Randomised message hash.
///
/// The key is the concatenation `R || root || to_byte(idx, n)` and must be
/// exactly 3n bytes; any other length is rejected before hashing.
pub fn h_msg(func: HashFunction, out: &mut [u8], input: &[u8], key: &[u8]) -> XmssResult<()> {
    let n = out.len();
    if key.len() != 3 * n {
        return Err(Error::HMsgKeyLength {
            n: n as u32,
            key_len: key.len(),
        });
    }
    let mut buf = vec![0u8; 4 * n + input.len()];
    ull_to_bytes(&mut buf[..n], XMSS_HASH_PADDING_HASH);
    buf[n..4 * n].copy_from_slice(key);
    buf[4 * n..].copy_from_slice(input);
    core_hash(func, out, &buf)
}

/// Tree hash function for interior nodes (two n-byte inputs).
pub(crate) fn thash_h(
    func: HashFunction,
    out: &mut [u8],
    input: &[u8],
    pub_seed: &[u8],
    addr: &mut [u32; 8],
) -> XmssResult<()> {
    let n = out.len();
    let mut buf = vec![0u8; 4 * n];
    let mut bitmask = vec![0u8; 2 * n];
    let mut addr_as_bytes = [0u8; 32];

    ull_to_bytes(&mut buf[..n], XMSS_HASH_PADDING_H);

    set_key_and_mask(addr, 0);
    addr_to_bytes(&mut addr_as_bytes, addr);
    prf(func, &mut buf[n..2 * n], &addr_as_bytes, pub_seed)?;

    set_key_and_mask(addr, 1);
    addr_to_bytes(&mut addr_as_bytes, addr);
    prf(func, &mut bitmask[..n], &addr_as_bytes, pub_seed)?;

    set_key_and_mask(addr, 2);
    addr_to_bytes(&mut addr_as_bytes, addr);
    prf(func, &mut bitmask[n..2 * n], &addr_as_bytes, pub_seed)?;

    for i in 0..2 * n {
        buf[2 * n + i] = input[i] ^ bitmask[i];
    }

    core_hash(func, out, &buf)
}

/// Chaining hash function for WOTS+ (single n-byte input).
pub(crate) fn thash_f(
    func: HashFunction,
    out: &mut [u8],
    input: &[u8],
    pub_seed: &[u8],
    addr: &mut [u32; 8],
) -> XmssResult<()> {
    let n = out.len();
    let mut buf = vec![0u8; 3 * n];
    let mut bitmask = vec![0u8; n];
    let mut addr_as_bytes = [0u8; 32];

    ull_to_bytes(&mut buf[..n], XMSS_HASH_PADDING_F);

    set_key_and_mask(addr, 0);
    addr_to_bytes(&mut addr_as_bytes, addr);
    prf(func, &mut buf[n..2 * n], &addr_as_bytes, pub_seed)?;

    set_key_and_mask(addr, 1);
    addr_to_bytes(&mut addr_as_bytes, addr);
    prf(func, &mut bitmask, &addr_as_bytes, pub_seed)?;

    for i in 0..n {
        buf[2 * n + i] = input[i] ^ bitmask[i];
    }

    core_hash(func, out, &buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h_msg_rejects_short_key() {
        let mut out = [0u8; 32];
        let err = h_msg(HashFunction::Shake256, &mut out, b"msg", &[0u8; 64]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("n=32"), "{msg}");
        assert!(msg.contains("64"), "{msg}");
    }

    #[test]
    fn test_h_msg_accepts_3n_key() {
        let mut out = [0u8; 32];
        h_msg(HashFunction::Shake256, &mut out, b"msg", &[0u8; 96]).unwrap();
        assert_ne!(out, [0u8; 32]);
    }

    #[test]
    fn test_families_disagree() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        let mut c = [0u8; 32];
        let input = [0x42u8; 32];
        prf(HashFunction::Sha2_256, &mut a, &input, &[0u8; 32]).unwrap();
        prf(HashFunction::Shake128, &mut b, &input, &[0u8; 32]).unwrap();
        prf(HashFunction::Shake256, &mut c, &input, &[0u8; 32]).unwrap();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_nibble_dispatch() {
        assert_eq!(HashFunction::from_nibble(0), HashFunction::Sha2_256);
        assert_eq!(HashFunction::from_nibble(1), HashFunction::Shake128);
        assert_eq!(HashFunction::from_nibble(2), HashFunction::Shake256);
        assert_eq!(HashFunction::from_nibble(5), HashFunction::Shake256);
    }
}
