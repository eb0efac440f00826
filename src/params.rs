use crate::error::{Error, XmssResult};

/// Hash output length used by every QRL signing profile, in bytes.
pub const WOTS_PARAM_N: u32 = 32;
/// Winternitz parameter of the QRL signing profile.
pub const WOTS_PARAM_W: u32 = 16;
/// BDS speed/space trade-off parameter of the QRL signing profile.
pub const BDS_PARAM_K: u32 = 2;

/// WOTS+ chain parameters derived from `(n, w)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WotsParams {
    /// Hash output length in bytes.
    pub n: u32,
    /// Winternitz parameter.
    pub w: u32,
    /// floor(log2(w)).
    pub log_w: u32,
    /// Number of message digits.
    pub len_1: u32,
    /// Number of checksum digits.
    pub len_2: u32,
    /// Total number of chains.
    pub len: u32,
    /// Size of a WOTS+ key or signature in bytes (`len * n`).
    pub key_size: u32,
}

impl WotsParams {
    /// Derives the chain counts for a Winternitz parameter `w`.
    ///
    /// The message digit count uses truncating division, matching the
    /// upstream derivation; for every power-of-two `w` the result equals
    /// the ceiling.
    pub fn new(n: u32, w: u32) -> XmssResult<Self> {
        if w < 2 {
            return Err(Error::InvalidWotsParam(w));
        }
        let log_w = w.ilog2();
        let len_1 = (8 * n) / log_w;
        if len_1 == 0 {
            return Err(Error::InvalidWotsParam(w));
        }
        let len_2 = (len_1 * (w - 1)).ilog2() / log_w + 1;
        let len = len_1 + len_2;
        Ok(WotsParams {
            n,
            w,
            log_w,
            len_1,
            len_2,
            len,
            key_size: len * n,
        })
    }
}

/// Full XMSS parameter set, including the BDS traversal parameter `k`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct XmssParams {
    /// The one-time signature parameters.
    pub wots_params: WotsParams,
    /// Hash output length in bytes.
    pub n: u32,
    /// Tree height; the tree holds `2^h` one-time keys.
    pub h: u32,
    /// Number of top tree levels whose right nodes are retained instead of
    /// recomputed by tree-hash instances.
    pub k: u32,
}

impl XmssParams {
    /// Validates the BDS constraints and derives the WOTS+ parameters.
    pub fn new(n: u32, h: u32, w: u32, k: u32) -> XmssResult<Self> {
        if k < 2 || k >= h || (h - k) % 2 != 0 {
            return Err(Error::BdsParams);
        }
        Ok(XmssParams {
            wots_params: WotsParams::new(n, w)?,
            n,
            h,
            k,
        })
    }
}

/// Length of the signature prefix preceding the authentication path:
/// `idx(4) || R(32) || wots_sig(key_size)`.
pub fn calculate_signature_base_size(key_size: u32) -> u32 {
    key_size + 4 + 32
}

/// Total signature length for a parameter set.
///
/// Authentication path entries are counted at the production hash width of
/// 32 bytes regardless of `n`.
pub fn get_signature_size(params: &XmssParams) -> u32 {
    calculate_signature_base_size(params.wots_params.key_size) + params.h * 32
}

/// Recovers the tree height from a signature length, assuming the
/// production `n` and the given Winternitz parameter.
pub fn get_height_from_sig_size(sig_size: u32, wots_param_w: u32) -> XmssResult<u32> {
    let base = calculate_signature_base_size(WotsParams::new(WOTS_PARAM_N, wots_param_w)?.key_size);
    if sig_size < base || (sig_size - base) % 32 != 0 {
        return Err(Error::InvalidSignatureLength(sig_size as usize));
    }
    Ok((sig_size - base) / 32)
}
