//! BDS traversal state and the XMSS key generation / signing drivers.
//!
//! The BDS algorithm keeps one authentication path plus a bounded amount of
//! auxiliary state and advances it with a constant budget of tree-hash work
//! per signature, instead of recomputing the whole tree each time.

use sha3::{
    Shake256,
    digest::{ExtendableOutput, Update, XofReader},
};
use zeroize::Zeroize;

use crate::error::{Error, XmssResult};
use crate::hash::{HashFunction, h_msg, prf, thash_h};
use crate::hash_address::*;
use crate::params::XmssParams;
use crate::utils::{bytes_to_ull, ull_to_bytes};
use crate::wots::wots_sign;
use crate::xmss_commons::{gen_leaf_wots, get_seed};

/// One tree-hash instance growing the next subtree root at a fixed level.
#[derive(Clone, Debug)]
struct TreeHashInst {
    /// Target level of the node this instance is computing.
    h: u32,
    /// Next leaf index this instance will consume.
    next_idx: u32,
    /// Number of entries this instance currently holds on the shared stack.
    stack_usage: u32,
    /// Whether `node` holds the finished subtree root.
    completed: bool,
    /// The finished node, valid when `completed` is set.
    node: Vec<u8>,
}

impl TreeHashInst {
    fn new(n: u32) -> Self {
        TreeHashInst {
            h: 0,
            next_idx: 0,
            stack_usage: 0,
            completed: false,
            node: vec![0u8; n as usize],
        }
    }
}

/// BDS traversal state for one XMSS tree.
///
/// `auth` always holds the authentication path for the next leaf to be
/// signed; the remaining fields are the working set that keeps it that way
/// across signatures.
#[derive(Clone, Debug)]
pub struct BdsState {
    stack: Vec<u8>,
    stack_offset: usize,
    stack_levels: Vec<u8>,
    auth: Vec<u8>,
    keep: Vec<u8>,
    treehash: Vec<TreeHashInst>,
    retain: Vec<u8>,
    next_leaf: u32,
}

impl BdsState {
    /// Allocates an empty traversal state for a tree of the given height.
    pub fn new(height: u32, n: u32, k: u32) -> Self {
        let h = height as usize;
        let n_us = n as usize;
        BdsState {
            stack: vec![0u8; (h + 1) * n_us],
            stack_offset: 0,
            stack_levels: vec![0u8; h + 1],
            auth: vec![0u8; h * n_us],
            keep: vec![0u8; (h >> 1) * n_us],
            treehash: (0..height - k).map(|_| TreeHashInst::new(n)).collect(),
            retain: vec![0u8; (((1usize << k) - k as usize - 1) * n_us)],
            next_leaf: 0,
        }
    }

    /// The authentication path for the next leaf, `h` nodes of `n` bytes.
    pub fn auth_path(&self) -> &[u8] {
        &self.auth
    }

    /// Number of authentication paths already handed out.
    pub fn next_leaf(&self) -> u32 {
        self.next_leaf
    }
}

/// Builds the full tree for `2^h` leaves starting at `index`, writing the
/// root into `node` and priming `state` with the authentication path for
/// leaf 0, the first tree-hash nodes and the retained top nodes.
pub(crate) fn treehash_setup(
    func: HashFunction,
    node: &mut [u8],
    index: u32,
    state: &mut BdsState,
    sk_seed: &[u8],
    params: &XmssParams,
    pub_seed: &[u8],
    addr: &[u32; 8],
) -> XmssResult<()> {
    let n = params.n as usize;
    let h = params.h;
    let k = params.k;

    let mut ots_addr = [0u32; 8];
    let mut ltree_addr = [0u32; 8];
    let mut node_addr = [0u32; 8];
    copy_subtree_addr(&mut ots_addr, addr);
    set_type(&mut ots_addr, ADRS_TYPE_OTS);
    copy_subtree_addr(&mut ltree_addr, addr);
    set_type(&mut ltree_addr, ADRS_TYPE_LTREE);
    copy_subtree_addr(&mut node_addr, addr);
    set_type(&mut node_addr, ADRS_TYPE_HASHTREE);

    let last_node = index + (1u32 << h);
    let mut stack = vec![0u8; (h as usize + 1) * n];
    let mut stack_levels = vec![0u32; h as usize + 1];
    let mut stack_offset: usize = 0;

    for (i, inst) in state.treehash.iter_mut().enumerate() {
        inst.h = i as u32;
        inst.completed = true;
        inst.stack_usage = 0;
    }

    let mut i: u32 = 0;
    for idx in index..last_node {
        set_ltree_addr(&mut ltree_addr, idx);
        set_ots_addr(&mut ots_addr, idx);
        gen_leaf_wots(
            func,
            &mut stack[stack_offset * n..(stack_offset + 1) * n],
            sk_seed,
            params,
            pub_seed,
            &mut ltree_addr,
            &mut ots_addr,
        )?;
        stack_levels[stack_offset] = 0;
        stack_offset += 1;

        while stack_offset > 1 && stack_levels[stack_offset - 1] == stack_levels[stack_offset - 2] {
            let node_h = stack_levels[stack_offset - 1];
            let top = stack[(stack_offset - 1) * n..stack_offset * n].to_vec();

            // The right sibling being merged is exactly the node the
            // traversal state will want later: the first right node on a
            // level feeds `auth`, the second feeds a tree-hash instance,
            // nodes on the top k levels go to `retain`.
            if i >> node_h == 1 {
                state.auth[node_h as usize * n..(node_h as usize + 1) * n].copy_from_slice(&top);
            } else if node_h < h - k && i >> node_h == 3 {
                state.treehash[node_h as usize].node.copy_from_slice(&top);
            } else if node_h >= h - k {
                let offset = (1usize << (h - 1 - node_h)) + node_h as usize - h as usize
                    + ((((i >> node_h) - 3) >> 1) as usize);
                state.retain[offset * n..(offset + 1) * n].copy_from_slice(&top);
            }

            set_tree_height(&mut node_addr, node_h);
            set_tree_index(&mut node_addr, idx >> (node_h + 1));
            let tmp = stack[(stack_offset - 2) * n..stack_offset * n].to_vec();
            thash_h(
                func,
                &mut stack[(stack_offset - 2) * n..(stack_offset - 1) * n],
                &tmp,
                pub_seed,
                &mut node_addr,
            )?;
            stack_levels[stack_offset - 2] += 1;
            stack_offset -= 1;
        }
        i += 1;
    }
    node[..n].copy_from_slice(&stack[..n]);
    Ok(())
}

/// Lowest stack level currently owned by the given tree-hash instance.
fn treehash_minheight_on_stack(state: &BdsState, params: &XmssParams, level: usize) -> u32 {
    let mut r = params.h;
    for i in 0..state.treehash[level].stack_usage as usize {
        let lvl = u32::from(state.stack_levels[state.stack_offset - i - 1]);
        if lvl < r {
            r = lvl;
        }
    }
    r
}

/// Performs one update step on a tree-hash instance: generates its next
/// leaf, then collapses the shared stack while the top two nodes sit on the
/// same level.
fn treehash_update(
    func: HashFunction,
    level: usize,
    state: &mut BdsState,
    sk_seed: &[u8],
    params: &XmssParams,
    pub_seed: &[u8],
    addr: &[u32; 8],
) -> XmssResult<()> {
    let n = params.n as usize;

    let mut ots_addr = [0u32; 8];
    let mut ltree_addr = [0u32; 8];
    let mut node_addr = [0u32; 8];
    copy_subtree_addr(&mut ots_addr, addr);
    set_type(&mut ots_addr, ADRS_TYPE_OTS);
    copy_subtree_addr(&mut ltree_addr, addr);
    set_type(&mut ltree_addr, ADRS_TYPE_LTREE);
    copy_subtree_addr(&mut node_addr, addr);
    set_type(&mut node_addr, ADRS_TYPE_HASHTREE);

    let next_idx = state.treehash[level].next_idx;
    set_ltree_addr(&mut ltree_addr, next_idx);
    set_ots_addr(&mut ots_addr, next_idx);

    let mut node = vec![0u8; n];
    gen_leaf_wots(
        func,
        &mut node,
        sk_seed,
        params,
        pub_seed,
        &mut ltree_addr,
        &mut ots_addr,
    )?;

    let mut node_height: u32 = 0;
    let mut buf = vec![0u8; 2 * n];
    while state.treehash[level].stack_usage > 0
        && u32::from(state.stack_levels[state.stack_offset - 1]) == node_height
    {
        let top_start = (state.stack_offset - 1) * n;
        buf[..n].copy_from_slice(&state.stack[top_start..top_start + n]);
        buf[n..].copy_from_slice(&node);
        set_tree_height(&mut node_addr, node_height);
        set_tree_index(&mut node_addr, next_idx >> (node_height + 1));
        thash_h(func, &mut node, &buf, pub_seed, &mut node_addr)?;
        node_height += 1;
        state.treehash[level].stack_usage -= 1;
        state.stack_offset -= 1;
    }

    if node_height == state.treehash[level].h {
        // Also implies this instance holds nothing on the stack.
        state.treehash[level].node.copy_from_slice(&node);
        state.treehash[level].completed = true;
    } else {
        let start = state.stack_offset * n;
        state.stack[start..start + n].copy_from_slice(&node);
        state.treehash[level].stack_usage += 1;
        #[allow(clippy::cast_possible_truncation)]
        {
            state.stack_levels[state.stack_offset] = node_height as u8;
        }
        state.stack_offset += 1;
        state.treehash[level].next_idx += 1;
    }
    Ok(())
}

/// Spends up to `updates` tree-hash steps, each on the unfinished instance
/// whose lowest stack node sits deepest (ties break towards the lower
/// level). Returns the number of unused updates.
pub(crate) fn bds_treehash_update(
    func: HashFunction,
    state: &mut BdsState,
    updates: u32,
    sk_seed: &[u8],
    params: &XmssParams,
    pub_seed: &[u8],
    addr: &[u32; 8],
) -> XmssResult<u32> {
    let h = params.h;
    let k = params.k;
    let mut used = 0;

    for _ in 0..updates {
        let mut l_min = h;
        let mut level = (h - k) as usize;
        for i in 0..(h - k) as usize {
            let low = if state.treehash[i].completed {
                h
            } else if state.treehash[i].stack_usage == 0 {
                i as u32
            } else {
                treehash_minheight_on_stack(state, params, i)
            };
            if low < l_min {
                level = i;
                l_min = low;
            }
        }
        if level == (h - k) as usize {
            break;
        }
        treehash_update(func, level, state, sk_seed, params, pub_seed, addr)?;
        used += 1;
    }
    Ok(updates - used)
}

/// Advances the state after signing with `leaf_idx`: rebuilds the
/// authentication path for `leaf_idx + 1` from `keep`, the finished
/// tree-hash nodes and `retain`, then restarts the instances that must grow
/// the subtrees the path will need next.
pub(crate) fn bds_round(
    func: HashFunction,
    state: &mut BdsState,
    leaf_idx: u32,
    sk_seed: &[u8],
    params: &XmssParams,
    pub_seed: &[u8],
    addr: &[u32; 8],
) -> XmssResult<()> {
    let n = params.n as usize;
    let h = params.h;
    let k = params.k;

    let mut ots_addr = [0u32; 8];
    let mut ltree_addr = [0u32; 8];
    let mut node_addr = [0u32; 8];
    copy_subtree_addr(&mut ots_addr, addr);
    set_type(&mut ots_addr, ADRS_TYPE_OTS);
    copy_subtree_addr(&mut ltree_addr, addr);
    set_type(&mut ltree_addr, ADRS_TYPE_LTREE);
    copy_subtree_addr(&mut node_addr, addr);
    set_type(&mut node_addr, ADRS_TYPE_HASHTREE);

    // tau is the lowest level whose path node changes between leaf_idx and
    // leaf_idx + 1.
    let mut tau = h;
    for i in 0..h {
        if (leaf_idx >> i) & 1 == 0 {
            tau = i;
            break;
        }
    }

    // Capture the nodes that build the new level-tau path node before
    // `keep` is refreshed below.
    let mut buf = vec![0u8; 2 * n];
    if tau > 0 {
        let a = (tau - 1) as usize * n;
        buf[..n].copy_from_slice(&state.auth[a..a + n]);
        let kp = ((tau - 1) >> 1) as usize * n;
        buf[n..].copy_from_slice(&state.keep[kp..kp + n]);
    }

    if (leaf_idx >> (tau + 1)) & 1 == 0 && tau < h - 1 {
        let kp = (tau >> 1) as usize * n;
        let ap = tau as usize * n;
        let (auth, keep) = (&state.auth, &mut state.keep);
        keep[kp..kp + n].copy_from_slice(&auth[ap..ap + n]);
    }

    if tau == 0 {
        // The current leaf becomes the level-0 sibling of leaf_idx + 1.
        set_ltree_addr(&mut ltree_addr, leaf_idx);
        set_ots_addr(&mut ots_addr, leaf_idx);
        let mut leaf = vec![0u8; n];
        gen_leaf_wots(
            func,
            &mut leaf,
            sk_seed,
            params,
            pub_seed,
            &mut ltree_addr,
            &mut ots_addr,
        )?;
        state.auth[..n].copy_from_slice(&leaf);
    } else {
        set_tree_height(&mut node_addr, tau - 1);
        set_tree_index(&mut node_addr, leaf_idx >> tau);
        let mut merged = vec![0u8; n];
        thash_h(func, &mut merged, &buf, pub_seed, &mut node_addr)?;
        state.auth[tau as usize * n..(tau as usize + 1) * n].copy_from_slice(&merged);

        for i in 0..tau {
            let dst = i as usize * n;
            if i < h - k {
                let (auth, treehash) = (&mut state.auth, &state.treehash);
                auth[dst..dst + n].copy_from_slice(&treehash[i as usize].node);
            } else {
                let offset = (1usize << (h - 1 - i)) + i as usize - h as usize;
                let row = (((leaf_idx >> i) - 1) >> 1) as usize;
                let src = (offset + row) * n;
                let (auth, retain) = (&mut state.auth, &state.retain);
                auth[dst..dst + n].copy_from_slice(&retain[src..src + n]);
            }
        }

        for i in 0..tau.min(h - k) {
            let start_idx = leaf_idx + 1 + 3 * (1u32 << i);
            if start_idx < 1u32 << h {
                let inst = &mut state.treehash[i as usize];
                inst.h = i;
                inst.next_idx = start_idx;
                inst.completed = false;
                inst.stack_usage = 0;
            }
        }
    }
    Ok(())
}

/// Derives a key pair from a 48-byte seed and runs the initial tree build.
/// Format sk: `[idx(4) || SK_SEED || SK_PRF || PUB_SEED || root]`.
/// Format pk: `[root || PUB_SEED]`.
pub(crate) fn xmss_fast_gen_keypair(
    func: HashFunction,
    params: &XmssParams,
    pk: &mut [u8],
    sk: &mut [u8],
    state: &mut BdsState,
    seed: &[u8],
) -> XmssResult<()> {
    let n = params.n as usize;

    sk[..4].fill(0);

    // SK_SEED || SK_PRF || PUB_SEED are expanded from the seed with
    // SHAKE-256 regardless of the tree's hash family.
    let mut randombits = vec![0u8; 3 * n];
    let mut shake = Shake256::default();
    shake.update(seed);
    shake.finalize_xof().read(&mut randombits);
    sk[4..4 + 3 * n].copy_from_slice(&randombits);
    randombits.zeroize();

    pk[n..2 * n].copy_from_slice(&sk[4 + 2 * n..4 + 3 * n]);

    let mut sk_seed = sk[4..4 + n].to_vec();
    let pub_seed = sk[4 + 2 * n..4 + 3 * n].to_vec();
    let addr = [0u32; 8];
    let mut root = vec![0u8; n];
    treehash_setup(func, &mut root, 0, state, &sk_seed, params, &pub_seed, &addr)?;
    sk_seed.zeroize();

    pk[..n].copy_from_slice(&root);
    sk[4 + 3 * n..4 + 4 * n].copy_from_slice(&root);
    Ok(())
}

/// Signs a message with the current one-time key, advances the index in
/// `sk` and the traversal state, and returns the signature
/// `idx(4) || R(n) || wots_sig || auth_path`.
pub(crate) fn xmss_fast_sign_msg(
    func: HashFunction,
    params: &XmssParams,
    sk: &mut [u8],
    state: &mut BdsState,
    message: &[u8],
) -> XmssResult<Vec<u8>> {
    let n = params.n as usize;
    let h = params.h;
    let k = params.k;
    let key_size = params.wots_params.key_size as usize;

    #[allow(clippy::cast_possible_truncation)]
    let idx = bytes_to_ull(&sk[..4]) as u32;
    if u64::from(idx) >= 1u64 << h {
        return Err(Error::KeyExhausted);
    }

    // Advance the index before any signature material leaves this
    // function; reusing a one-time key is catastrophic.
    ull_to_bytes(&mut sk[..4], u64::from(idx) + 1);

    let mut sk_seed = sk[4..4 + n].to_vec();
    let mut sk_prf = sk[4 + n..4 + 2 * n].to_vec();
    let pub_seed = sk[4 + 2 * n..4 + 3 * n].to_vec();
    let root = sk[4 + 3 * n..4 + 4 * n].to_vec();

    let sig_len = 4 + n + key_size + h as usize * n;
    let mut sig = vec![0u8; sig_len];
    ull_to_bytes(&mut sig[..4], u64::from(idx));

    // R = PRF(SK_PRF, idx), then digest the message under R || root || idx.
    let mut idx_bytes_32 = [0u8; 32];
    ull_to_bytes(&mut idx_bytes_32, u64::from(idx));
    prf(func, &mut sig[4..4 + n], &idx_bytes_32, &sk_prf)?;

    let mut hash_key = vec![0u8; 3 * n];
    hash_key[..n].copy_from_slice(&sig[4..4 + n]);
    hash_key[n..2 * n].copy_from_slice(&root);
    ull_to_bytes(&mut hash_key[2 * n..3 * n], u64::from(idx));

    let mut msg_digest = vec![0u8; n];
    h_msg(func, &mut msg_digest, message, &hash_key)?;

    let mut ots_addr = [0u32; 8];
    set_type(&mut ots_addr, ADRS_TYPE_OTS);
    set_ots_addr(&mut ots_addr, idx);

    let mut ots_seed = vec![0u8; n];
    get_seed(func, &mut ots_seed, &sk_seed, &mut ots_addr)?;
    wots_sign(
        func,
        &mut sig[4 + n..4 + n + key_size],
        &msg_digest,
        &ots_seed,
        &params.wots_params,
        &pub_seed,
        &mut ots_addr[..],
    )?;
    ots_seed.zeroize();

    // The authentication path for this leaf was prepared by the previous
    // round.
    sig[4 + n + key_size..].copy_from_slice(&state.auth[..h as usize * n]);

    if u64::from(idx) < (1u64 << h) - 1 {
        let addr = [0u32; 8];
        bds_round(func, state, idx, &sk_seed, params, &pub_seed, &addr)?;
        bds_treehash_update(func, state, (h - k) >> 1, &sk_seed, params, &pub_seed, &addr)?;
    }
    state.next_leaf += 1;

    sk_seed.zeroize();
    sk_prf.zeroize();
    Ok(sig)
}

/// Fast-forwards the key to `new_idx` by replaying one BDS round per
/// skipped leaf. The index can only move forward.
pub(crate) fn xmss_fast_update(
    func: HashFunction,
    params: &XmssParams,
    sk: &mut [u8],
    state: &mut BdsState,
    new_idx: u32,
) -> XmssResult<()> {
    let h = params.h;
    let k = params.k;
    let num_elems = 1u64 << h;

    #[allow(clippy::cast_possible_truncation)]
    let current_idx = bytes_to_ull(&sk[..4]) as u32;

    if u64::from(new_idx) >= num_elems {
        return Err(Error::IndexTooHigh {
            requested: new_idx,
            height: h,
        });
    }
    if new_idx < current_idx {
        return Err(Error::IndexRewind {
            current: current_idx,
            requested: new_idx,
        });
    }

    let n = params.n as usize;
    let mut sk_seed = sk[4..4 + n].to_vec();
    let pub_seed = sk[4 + 2 * n..4 + 3 * n].to_vec();
    let addr = [0u32; 8];

    for j in current_idx..new_idx {
        bds_round(func, state, j, &sk_seed, params, &pub_seed, &addr)?;
        bds_treehash_update(func, state, (h - k) >> 1, &sk_seed, params, &pub_seed, &addr)?;
    }
    sk_seed.zeroize();

    ull_to_bytes(&mut sk[..4], u64::from(new_idx));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const SK_SIZE: usize = 4 + 4 * 32;

    fn keypair(func: HashFunction, seed: &[u8; 48]) -> ([u8; SK_SIZE], [u8; 64], BdsState) {
        let params = XmssParams::new(32, 4, 16, 2).unwrap();
        let mut state = BdsState::new(4, 32, 2);
        let mut sk = [0u8; SK_SIZE];
        let mut pk = [0u8; 64];
        xmss_fast_gen_keypair(func, &params, &mut pk, &mut sk, &mut state, seed).unwrap();
        (sk, pk, state)
    }

    #[test]
    fn test_keygen_zero_seed_shake256() {
        let (sk, pk, _) = keypair(HashFunction::Shake256, &[0u8; 48]);
        assert_eq!(
            sk,
            hex!(
                "00000000eda313c95591a023a5b37f361c07a5753a92d3d0427459f34c7895d7"
                "27d62816b3aa2224eb9d823127d4f9f8a30fd7a1a02c6483d9c0f1fd41957b9a"
                "e4dfc63a3191da3442686282b3d5160f25cf162a517fd2131f83fbf2698a58f9"
                "c46afc5dd6ba5854d3274e9d997b542dd840930d96bdb5b12c48caee12adc12c"
                "68acbe83"
            )
        );
        // pk is [root || PUB_SEED], both taken straight from sk.
        assert_eq!(pk[..32], sk[100..132]);
        assert_eq!(pk[32..], sk[68..100]);
    }

    #[test]
    fn test_keygen_sha2() {
        let mut seed = [0u8; 48];
        for (i, b) in seed.iter_mut().enumerate() {
            *b = i as u8;
        }
        let (sk, _, _) = keypair(HashFunction::Sha2_256, &seed);
        assert_eq!(
            sk,
            hex!(
                "000000000c459bb1b4d1cd8cdec0209f37d4c91597896ce8de0911bd021db470"
                "29d70dc332ad39708e20dfe28f325b63beffe4f841aa834d46f740d3d988a3bc"
                "ef678de74e3983bd564298c49ae2e7fa6e28d4b954d8cd59398f1225b08d6144"
                "854aee0e9ea7fcc2d3e52ac782161bcf087a786defd63ed243872c5d9041046e"
                "2ffa4193"
            )
        );
    }

    #[test]
    fn test_keygen_is_deterministic() {
        let (sk_a, pk_a, _) = keypair(HashFunction::Shake128, &[0x3Cu8; 48]);
        let (sk_b, pk_b, _) = keypair(HashFunction::Shake128, &[0x3Cu8; 48]);
        assert_eq!(sk_a, sk_b);
        assert_eq!(pk_a, pk_b);
    }

    #[test]
    fn test_seed_expansion_ignores_hash_family() {
        // The secret material comes from SHAKE-256 for every family; only
        // the tree root differs.
        let (sk_a, _, _) = keypair(HashFunction::Sha2_256, &[1u8; 48]);
        let (sk_b, _, _) = keypair(HashFunction::Shake256, &[1u8; 48]);
        assert_eq!(sk_a[..100], sk_b[..100]);
        assert_ne!(sk_a[100..], sk_b[100..]);
    }

    #[test]
    fn test_sign_exhausts_after_capacity() {
        let params = XmssParams::new(32, 4, 16, 2).unwrap();
        let (mut sk, _, mut state) = keypair(HashFunction::Shake256, &[2u8; 48]);
        for _ in 0..16 {
            xmss_fast_sign_msg(HashFunction::Shake256, &params, &mut sk, &mut state, b"m")
                .unwrap();
        }
        let err = xmss_fast_sign_msg(HashFunction::Shake256, &params, &mut sk, &mut state, b"m")
            .unwrap_err();
        assert!(matches!(err, Error::KeyExhausted));
    }

    #[test]
    fn test_update_rejects_rewind_and_overflow() {
        let params = XmssParams::new(32, 4, 16, 2).unwrap();
        let (mut sk, _, mut state) = keypair(HashFunction::Shake256, &[3u8; 48]);
        xmss_fast_update(HashFunction::Shake256, &params, &mut sk, &mut state, 5).unwrap();
        assert_eq!(bytes_to_ull(&sk[..4]), 5);
        let err =
            xmss_fast_update(HashFunction::Shake256, &params, &mut sk, &mut state, 4).unwrap_err();
        assert!(matches!(err, Error::IndexRewind { current: 5, requested: 4 }));
        let err =
            xmss_fast_update(HashFunction::Shake256, &params, &mut sk, &mut state, 16).unwrap_err();
        assert!(matches!(err, Error::IndexTooHigh { requested: 16, .. }));
    }
}
