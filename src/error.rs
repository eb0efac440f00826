/// Errors used throughout this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A hash address was supplied with the wrong number of words.
    #[error("addr should be an array of size 8")]
    InvalidAddrLen,
    /// The keyed message hash requires a key of exactly 3n bytes.
    #[error("h_msg takes 3n-bit keys, we got n={n} but a keylength of {key_len}")]
    HMsgKeyLength {
        /// The hash output length parameter.
        n: u32,
        /// The observed key length in bytes.
        key_len: usize,
    },
    /// The Winternitz parameter value is not supported.
    #[error("Invalid parameters: unsupported Winternitz parameter w={0}")]
    InvalidWotsParam(u32),
    /// The BDS parameters do not satisfy the traversal constraints.
    #[error("For BDS traversal, H - K must be even, with H > K >= 2!")]
    BdsParams,
    /// The tree height cannot be encoded in a QRL descriptor.
    #[error("Invalid height: {0} (must be even, between 4 and 30)")]
    InvalidHeight(u8),
    /// All one-time signatures have been used.
    #[error("Key exhausted: all one-time signatures have been used")]
    KeyExhausted,
    /// The provided seed has an incorrect length.
    #[error("Invalid seed length: expected {expected}, got {got}")]
    InvalidSeedLength {
        /// Expected seed length in bytes.
        expected: usize,
        /// Actual seed length in bytes.
        got: usize,
    },
    /// The provided key has an incorrect length.
    #[error("Invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength {
        /// Expected key length in bytes.
        expected: usize,
        /// Actual key length in bytes.
        got: usize,
    },
    /// The provided signature has a length no parameter set produces.
    #[error("Invalid signature length: {0}")]
    InvalidSignatureLength(usize),
    /// The address format type is not supported by this implementation.
    #[error("Address format type not supported")]
    AddrFormatNotSupported,
    /// The descriptor does not carry an XMSS signature type.
    #[error("Invalid signature type")]
    InvalidSignatureType,
    /// A one-time key index may only move forward.
    #[error("Cannot rewind the one-time key index from {current} to {requested}")]
    IndexRewind {
        /// The index currently stored in the key.
        current: u32,
        /// The requested target index.
        requested: u32,
    },
    /// The requested index lies beyond the tree capacity.
    #[error("Index {requested} is out of range for tree height {height}")]
    IndexTooHigh {
        /// The requested target index.
        requested: u32,
        /// The tree height.
        height: u32,
    },
    /// The hash dispatch cannot produce the requested output length.
    #[error("Hash function error: unsupported output length n={n} for SHA2-256")]
    Hash {
        /// The requested output length in bytes.
        n: usize,
    },
    /// Signature verification failed.
    #[error("Signature verification failed")]
    VerificationFailed,
}

/// Result type used by this crate.
pub type XmssResult<T> = Result<T, Error>;
