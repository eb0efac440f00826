use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{Error, XmssResult};
use crate::hash::{HashFunction, addr_to_bytes, h_msg, prf, thash_h};
use crate::hash_address::*;
use crate::params::{WotsParams, XmssParams};
use crate::utils::{bytes_to_ull, ull_to_bytes};
use crate::wots::{wots_pk_from_sig, wots_pkgen};

/// Derives the one-time seed for the OTS key pair selected by `addr`.
pub(crate) fn get_seed(
    func: HashFunction,
    seed: &mut [u8],
    sk_seed: &[u8],
    addr: &mut [u32; 8],
) -> XmssResult<()> {
    let mut bytes = [0u8; 32];

    set_chain_addr(addr, 0);
    set_hash_addr(addr, 0);
    set_key_and_mask(addr, 0);
    addr_to_bytes(&mut bytes, addr);
    prf(func, seed, &bytes, sk_seed)
}

/// Compresses a WOTS+ public key into a leaf node using an L-tree.
/// Note that this destroys the used WOTS+ public key.
pub(crate) fn l_tree(
    func: HashFunction,
    params: &WotsParams,
    leaf: &mut [u8],
    wots_pk: &mut [u8],
    pub_seed: &[u8],
    addr: &mut [u32; 8],
) -> XmssResult<()> {
    let n = params.n as usize;
    let mut l = params.len as usize;
    let mut height: u32 = 0;

    set_tree_height(addr, height);

    while l > 1 {
        let parent_nodes = l >> 1;
        for i in 0..parent_nodes {
            #[allow(clippy::cast_possible_truncation)]
            set_tree_index(addr, i as u32);
            let mut tmp = vec![0u8; 2 * n];
            tmp.copy_from_slice(&wots_pk[i * 2 * n..(i * 2 + 2) * n]);
            thash_h(func, &mut wots_pk[i * n..(i + 1) * n], &tmp, pub_seed, addr)?;
        }
        if l & 1 != 0 {
            let src_start = (l - 1) * n;
            let dst_start = (l >> 1) * n;
            let mut tmp = vec![0u8; n];
            tmp.copy_from_slice(&wots_pk[src_start..src_start + n]);
            wots_pk[dst_start..dst_start + n].copy_from_slice(&tmp);
            l = (l >> 1) + 1;
        } else {
            l >>= 1;
        }
        height += 1;
        set_tree_height(addr, height);
    }
    leaf[..n].copy_from_slice(&wots_pk[..n]);
    Ok(())
}

/// Computes the leaf at a given address: derives the one-time seed,
/// generates the WOTS+ key pair and compresses it with an L-tree.
pub(crate) fn gen_leaf_wots(
    func: HashFunction,
    leaf: &mut [u8],
    sk_seed: &[u8],
    params: &XmssParams,
    pub_seed: &[u8],
    ltree_addr: &mut [u32; 8],
    ots_addr: &mut [u32; 8],
) -> XmssResult<()> {
    let n = params.n as usize;
    let mut seed = vec![0u8; n];
    let mut pk = vec![0u8; params.wots_params.key_size as usize];

    get_seed(func, &mut seed, sk_seed, ots_addr)?;
    wots_pkgen(
        func,
        &mut pk,
        &seed,
        &params.wots_params,
        pub_seed,
        &mut ots_addr[..],
    )?;
    seed.zeroize();
    l_tree(func, &params.wots_params, leaf, &mut pk, pub_seed, ltree_addr)
}

/// Computes a root node given a leaf and an authentication path.
pub(crate) fn validate_authpath(
    func: HashFunction,
    root: &mut [u8],
    leaf: &[u8],
    mut leafidx: u32,
    auth_path: &[u8],
    n: usize,
    h: u32,
    pub_seed: &[u8],
    addr: &mut [u32; 8],
) -> XmssResult<()> {
    let mut buffer = vec![0u8; 2 * n];
    let mut auth_offset = 0usize;

    // An odd leaf index means the current node is a right child, so the
    // path node goes on the left.
    if leafidx & 1 != 0 {
        buffer[n..2 * n].copy_from_slice(&leaf[..n]);
        buffer[..n].copy_from_slice(&auth_path[..n]);
    } else {
        buffer[..n].copy_from_slice(&leaf[..n]);
        buffer[n..2 * n].copy_from_slice(&auth_path[..n]);
    }
    auth_offset += n;

    for i in 0..h - 1 {
        set_tree_height(addr, i);
        leafidx >>= 1;
        set_tree_index(addr, leafidx);

        if leafidx & 1 != 0 {
            let tmp = buffer.clone();
            thash_h(func, &mut buffer[n..2 * n], &tmp, pub_seed, addr)?;
            buffer[..n].copy_from_slice(&auth_path[auth_offset..auth_offset + n]);
        } else {
            let tmp = buffer.clone();
            thash_h(func, &mut buffer[..n], &tmp, pub_seed, addr)?;
            buffer[n..2 * n].copy_from_slice(&auth_path[auth_offset..auth_offset + n]);
        }
        auth_offset += n;
    }

    set_tree_height(addr, h - 1);
    leafidx >>= 1;
    set_tree_index(addr, leafidx);
    thash_h(func, root, &buffer, pub_seed, addr)
}

/// Verifies a signature against a bare public key `[root || PUB_SEED]`.
pub(crate) fn xmss_verify_sig(
    func: HashFunction,
    wots_params: &WotsParams,
    msg: &[u8],
    sig: &[u8],
    pk: &[u8],
    h: u32,
) -> XmssResult<()> {
    let n = wots_params.n as usize;
    let key_size = wots_params.key_size as usize;
    let expected = 4 + n + key_size + h as usize * n;
    if sig.len() != expected {
        return Err(Error::InvalidSignatureLength(sig.len()));
    }

    let pub_root = &pk[..n];
    let pub_seed = &pk[n..2 * n];

    let mut ots_addr = [0u32; 8];
    let mut ltree_addr = [0u32; 8];
    let mut node_addr = [0u32; 8];
    set_type(&mut ots_addr, ADRS_TYPE_OTS);
    set_type(&mut ltree_addr, ADRS_TYPE_LTREE);
    set_type(&mut node_addr, ADRS_TYPE_HASHTREE);

    #[allow(clippy::cast_possible_truncation)]
    let idx = bytes_to_ull(&sig[..4]) as u32;

    // Reconstruct the randomised message digest under key R || root || idx.
    let mut hash_key = vec![0u8; 3 * n];
    hash_key[..n].copy_from_slice(&sig[4..4 + n]);
    hash_key[n..2 * n].copy_from_slice(pub_root);
    ull_to_bytes(&mut hash_key[2 * n..3 * n], u64::from(idx));

    let mut msg_digest = vec![0u8; n];
    h_msg(func, &mut msg_digest, msg, &hash_key)?;

    let mut wots_pk = vec![0u8; key_size];
    let mut leaf = vec![0u8; n];
    let mut root = vec![0u8; n];

    set_ots_addr(&mut ots_addr, idx);
    wots_pk_from_sig(
        func,
        &mut wots_pk,
        &sig[4 + n..4 + n + key_size],
        &msg_digest,
        wots_params,
        pub_seed,
        &mut ots_addr[..],
    )?;

    set_ltree_addr(&mut ltree_addr, idx);
    l_tree(
        func,
        wots_params,
        &mut leaf,
        &mut wots_pk,
        pub_seed,
        &mut ltree_addr,
    )?;

    validate_authpath(
        func,
        &mut root,
        &leaf,
        idx,
        &sig[4 + n + key_size..],
        n,
        h,
        pub_seed,
        &mut node_addr,
    )?;

    if !bool::from(root.ct_eq(pub_root)) {
        return Err(Error::VerificationFailed);
    }
    Ok(())
}
