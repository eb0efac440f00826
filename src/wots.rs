use zeroize::Zeroize;

use crate::error::{Error, XmssResult};
use crate::hash::{HashFunction, prf, thash_f};
use crate::hash_address::{set_chain_addr, set_hash_addr};
use crate::params::WotsParams;
use crate::utils::ull_to_bytes;

/// Expands an n-byte seed into `len` chain seeds:
/// `sk_i = PRF(seed, to_byte(i, 32))`.
fn expand_seed(
    func: HashFunction,
    outseeds: &mut [u8],
    inseed: &[u8],
    params: &WotsParams,
) -> XmssResult<()> {
    let n = params.n as usize;
    let mut ctr_bytes = [0u8; 32];

    for i in 0..params.len as usize {
        ull_to_bytes(&mut ctr_bytes, i as u64);
        prf(func, &mut outseeds[i * n..(i + 1) * n], &ctr_bytes, inseed)?;
    }
    Ok(())
}

/// Computes the chaining function.
/// Interprets `input` as the start-th value of the chain.
fn gen_chain(
    func: HashFunction,
    out: &mut [u8],
    input: &[u8],
    start: u32,
    steps: u32,
    params: &WotsParams,
    pub_seed: &[u8],
    addr: &mut [u32; 8],
) -> XmssResult<()> {
    let n = params.n as usize;

    out[..n].copy_from_slice(&input[..n]);

    let mut i = start;
    while i < start + steps && i < params.w {
        set_hash_addr(addr, i);
        let mut tmp = vec![0u8; n];
        tmp.copy_from_slice(&out[..n]);
        thash_f(func, &mut out[..n], &tmp, pub_seed, addr)?;
        i += 1;
    }
    Ok(())
}

/// Interprets an array of bytes as integers in base w.
/// Digits are taken MSB-first; input bytes beyond the demand of
/// `output.len()` digits are never read.
fn base_w(params: &WotsParams, output: &mut [u32], input: &[u8]) {
    let mut in_idx = 0;
    let mut total: u8 = 0;
    let mut bits: u32 = 0;

    for out_val in output.iter_mut() {
        if bits == 0 {
            total = input[in_idx];
            in_idx += 1;
            bits = 8;
        }
        bits -= params.log_w;
        // w <= 256, so (w - 1) fits in u8.
        #[allow(clippy::cast_possible_truncation)]
        let mask = (params.w - 1) as u8;
        *out_val = u32::from((total >> bits) & mask);
    }
}

/// Writes the first `out_len` base-w digits of `input` into `output`.
/// The input is not consumed and `output[out_len..]` is left untouched.
pub fn calc_base_w(output: &mut [u32], out_len: usize, input: &[u8], params: &WotsParams) {
    base_w(params, &mut output[..out_len], input);
}

/// Computes the WOTS+ checksum over a message in base-w representation.
fn wots_checksum(params: &WotsParams, csum_base_w: &mut [u32], msg_base_w: &[u32]) {
    let mut csum: u32 = 0;

    for val in msg_base_w.iter().take(params.len_1 as usize) {
        csum += params.w - 1 - val;
    }

    csum <<= (8 - (params.len_2 * params.log_w) % 8) % 8;
    let csum_bytes_len = (params.len_2 * params.log_w).div_ceil(8) as usize;
    let mut csum_bytes = vec![0u8; csum_bytes_len];
    ull_to_bytes(&mut csum_bytes, u64::from(csum));
    base_w(params, csum_base_w, &csum_bytes);
}

/// Takes a message digest and derives the matching chain lengths.
fn chain_lengths(params: &WotsParams, lengths: &mut [u32], msg: &[u8]) {
    let len_1 = params.len_1 as usize;
    base_w(params, &mut lengths[..len_1], msg);
    let (msg_part, csum_part) = lengths.split_at_mut(len_1);
    wots_checksum(params, csum_part, msg_part);
}

fn check_addr<'a>(addr: &'a mut [u32]) -> XmssResult<&'a mut [u32; 8]> {
    addr.try_into().map_err(|_| Error::InvalidAddrLen)
}

/// WOTS+ key generation. Expands the n-byte seed into a full private key
/// and computes the corresponding public key into `pk`.
pub fn wots_pkgen(
    func: HashFunction,
    pk: &mut [u8],
    seed: &[u8],
    params: &WotsParams,
    pub_seed: &[u8],
    addr: &mut [u32],
) -> XmssResult<()> {
    let addr = check_addr(addr)?;
    let n = params.n as usize;

    expand_seed(func, pk, seed, params)?;

    for i in 0..params.len as usize {
        #[allow(clippy::cast_possible_truncation)]
        set_chain_addr(addr, i as u32);
        let mut tmp = vec![0u8; n];
        tmp.copy_from_slice(&pk[i * n..(i + 1) * n]);
        gen_chain(
            func,
            &mut pk[i * n..(i + 1) * n],
            &tmp,
            0,
            params.w - 1,
            params,
            pub_seed,
            addr,
        )?;
        tmp.zeroize();
    }
    Ok(())
}

/// Signs an n-byte message digest with the one-time key expanded from
/// `seed`, writing `len * n` bytes into `sig`.
pub fn wots_sign(
    func: HashFunction,
    sig: &mut [u8],
    msg: &[u8],
    seed: &[u8],
    params: &WotsParams,
    pub_seed: &[u8],
    addr: &mut [u32],
) -> XmssResult<()> {
    let addr = check_addr(addr)?;
    let n = params.n as usize;
    let mut lengths = vec![0u32; params.len as usize];

    chain_lengths(params, &mut lengths, msg);

    expand_seed(func, sig, seed, params)?;

    for i in 0..params.len as usize {
        #[allow(clippy::cast_possible_truncation)]
        set_chain_addr(addr, i as u32);
        let mut tmp = vec![0u8; n];
        tmp.copy_from_slice(&sig[i * n..(i + 1) * n]);
        gen_chain(
            func,
            &mut sig[i * n..(i + 1) * n],
            &tmp,
            0,
            lengths[i],
            params,
            pub_seed,
            addr,
        )?;
        tmp.zeroize();
    }
    Ok(())
}

/// Recovers a WOTS+ public key from a signature and the signed digest.
pub fn wots_pk_from_sig(
    func: HashFunction,
    pk: &mut [u8],
    sig: &[u8],
    msg: &[u8],
    params: &WotsParams,
    pub_seed: &[u8],
    addr: &mut [u32],
) -> XmssResult<()> {
    let addr = check_addr(addr)?;
    let n = params.n as usize;
    let mut lengths = vec![0u32; params.len as usize];

    chain_lengths(params, &mut lengths, msg);

    for i in 0..params.len as usize {
        #[allow(clippy::cast_possible_truncation)]
        set_chain_addr(addr, i as u32);
        gen_chain(
            func,
            &mut pk[i * n..(i + 1) * n],
            &sig[i * n..(i + 1) * n],
            lengths[i],
            params.w - 1 - lengths[i],
            params,
            pub_seed,
            addr,
        )?;
    }
    Ok(())
}
