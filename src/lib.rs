//! XMSS (eXtended Merkle Signature Scheme) tailored to the QRL
//! (Quantum Resistant Ledger) address format.
//!
//! XMSS is a stateful hash-based signature scheme built from the WOTS+
//! one-time signature and a Merkle authentication tree. This crate keeps
//! the authentication path current across signatures with the BDS
//! (Buchmann-Dahmen-Szydlo) traversal algorithm, so each signature costs a
//! bounded amount of tree-hash work instead of a full tree rebuild.
//!
//! Keys, signatures and addresses follow the QRL conventions: a 3-byte
//! extended descriptor selects the hash family, signature type, tree
//! height and address format; the 48-byte seed expands to the secret
//! material via SHAKE-256; addresses are 20 bytes derived from the
//! extended public key.
//!
//! ```
//! use qrl_xmss::{HashFunction, Xmss, verify};
//!
//! let seed = [7u8; 48];
//! let mut tree = Xmss::new_from_seed(&seed, 4, HashFunction::Shake128, 0).unwrap();
//!
//! let message = b"an important message";
//! let signature = tree.sign(message).unwrap();
//! verify(message, &signature, &tree.pk()).unwrap();
//! ```
//!
//! Signing mutates the key: the one-time key index advances with every
//! signature and must never be reused. Callers are responsible for
//! persisting the advanced state before releasing a signature; a tree
//! restored from its extended seed can be brought back to its index with
//! [`Xmss::set_index`].

mod error;
mod hash;
mod hash_address;
mod params;
mod qrl_descriptor;
mod utils;
mod wots;
mod xmss;
mod xmss_commons;
mod xmss_core;

pub use error::{Error, XmssResult};
pub use hash::{HashFunction, h_msg};
pub use params::{
    BDS_PARAM_K, WOTS_PARAM_N, WOTS_PARAM_W, WotsParams, XmssParams,
    calculate_signature_base_size, get_height_from_sig_size, get_signature_size,
};
pub use qrl_descriptor::{
    ADDR_FORMAT_SHA256, ADDRESS_SIZE, DESCRIPTOR_SIZE, EXTENDED_PK_SIZE, EXTENDED_SEED_SIZE,
    QrlDescriptor, SEED_SIZE, SIGNATURE_TYPE_XMSS,
};
pub use wots::{calc_base_w, wots_pk_from_sig, wots_pkgen, wots_sign};
pub use xmss::{SK_SIZE, Xmss, get_xmss_address_from_pk, verify, verify_with_custom_wots_w};
pub use xmss_core::BdsState;

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use sha2::{Digest, Sha256};

    const ZERO_SEED: [u8; 48] = [0u8; 48];

    fn zero_seed_tree() -> Xmss {
        Xmss::new_from_seed(&ZERO_SEED, 4, HashFunction::Shake256, ADDR_FORMAT_SHA256).unwrap()
    }

    #[test]
    fn test_extended_pk_and_address_vectors() {
        let tree = zero_seed_tree();
        assert_eq!(
            tree.pk(),
            hex!(
                "020200d6ba5854d3274e9d997b542dd840930d96bdb5b12c48caee12adc12c68"
                "acbe833191da3442686282b3d5160f25cf162a517fd2131f83fbf2698a58f9c4"
                "6afc5d"
            )
        );
        assert_eq!(
            tree.address().unwrap(),
            hex!("020200ff2c497067edd68b91f36f18c1d7a78498")
        );
        assert_eq!(tree.address().unwrap(), get_xmss_address_from_pk(&tree.pk()).unwrap());
    }

    #[test]
    fn test_sign_known_answers() {
        let mut tree = zero_seed_tree();
        let message = b"This is an example message to sign";

        let sig0 = tree.sign(message).unwrap();
        assert_eq!(sig0.len(), get_signature_size(&XmssParams::new(32, 4, 16, 2).unwrap()) as usize);
        assert_eq!(
            sig0[..72],
            hex!(
                "00000000f2dea779943c1bb01df378f99b3bb4d164a4af8cc57b58cf97d584cc"
                "145986a3ccd7ec0b7b3c06c190af6dcf8f63963aa68de030b6bca83933cd0f4e"
                "10d3d2fef581d301"
            )
        );
        assert_eq!(
            Sha256::digest(&sig0)[..],
            hex!("64817bd07c5567841317f370efdba81f4e6f1872111bab5ee3e4919b3d1151b4")
        );

        let sig1 = tree.sign(message).unwrap();
        assert_eq!(
            Sha256::digest(&sig1)[..],
            hex!("40e8b6148b01681f62b60f7c682976669ec9f02c4fc2850a9e505df6be9dce13")
        );

        let sig2 = tree.sign(message).unwrap();
        assert_eq!(
            Sha256::digest(&sig2)[..],
            hex!("8bf65e31ec52c9823f9552a0b9e9545dbba70d08e30e5b834ea6d470193bd87b")
        );
    }

    #[test]
    fn test_sign_verify_all_leaves() {
        let mut tree = zero_seed_tree();
        let pk = tree.pk();
        let message = b"This is an example message to sign";

        for i in 0..tree.number_signatures() {
            assert_eq!(tree.index(), i);
            assert_eq!(tree.bds_state().next_leaf(), i);
            let sig = tree.sign(message).unwrap();
            verify(message, &sig, &pk).unwrap();
            assert_eq!(tree.index(), i + 1);
            assert_eq!(tree.bds_state().next_leaf(), i + 1);
        }
        assert_eq!(tree.remaining_signatures(), 0);
        assert!(matches!(tree.sign(message), Err(Error::KeyExhausted)));
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let mut tree = Xmss::new_from_seed(&[9u8; 48], 4, HashFunction::Sha2_256, 0).unwrap();
        let pk = tree.pk();
        let message = b"payload";
        let sig = tree.sign(message).unwrap();

        verify(message, &sig, &pk).unwrap();
        assert!(verify(b"other payload", &sig, &pk).is_err());

        for pos in [0, 5, 40, sig.len() - 1] {
            let mut bad = sig.clone();
            bad[pos] ^= 0xFF;
            assert!(verify(message, &bad, &pk).is_err(), "byte {pos}");
        }

        let mut short = sig.clone();
        short.truncate(sig.len() - 32);
        assert!(verify(message, &short, &pk).is_err());
    }

    #[test]
    fn test_verify_checks_descriptor() {
        let mut tree = zero_seed_tree();
        let message = b"payload";
        let sig = tree.sign(message).unwrap();

        // A non-XMSS signature type is rejected outright.
        let mut pk = tree.pk();
        pk[0] |= 0x40;
        assert!(matches!(
            verify(message, &sig, &pk),
            Err(Error::InvalidSignatureType)
        ));

        // A height that disagrees with the signature length is rejected.
        let mut pk = tree.pk();
        pk[1] = (pk[1] & 0xF0) | 3;
        assert!(verify(message, &sig, &pk).is_err());
    }

    #[test]
    fn test_fast_forward_matches_sequential_signing() {
        let seed = [0x21u8; 48];
        let message = b"fast forward";

        let mut sequential =
            Xmss::new_from_seed(&seed, 4, HashFunction::Shake256, ADDR_FORMAT_SHA256).unwrap();
        for _ in 0..5 {
            sequential.sign(message).unwrap();
        }

        let mut jumped =
            Xmss::new_from_seed(&seed, 4, HashFunction::Shake256, ADDR_FORMAT_SHA256).unwrap();
        jumped.set_index(5).unwrap();

        assert_eq!(sequential.sign(message).unwrap(), jumped.sign(message).unwrap());
    }

    #[test]
    fn test_initialize_from_extended_seed() {
        // Descriptor [5, 146, 0]: hash nibble 5, signature type 0,
        // height 4, address format 9. Unknown hash nibbles dispatch to
        // SHAKE-256, so the key material matches the zero-seed tree.
        let mut extended_seed = [0u8; EXTENDED_SEED_SIZE];
        extended_seed[..3].copy_from_slice(&[5, 146, 0]);

        let tree = Xmss::new_from_extended_seed(&extended_seed).unwrap();
        assert_eq!(tree.descriptor().hash_function(), 5);
        assert_eq!(tree.descriptor().signature_type(), 0);
        assert_eq!(tree.descriptor().height(), 4);
        assert_eq!(tree.descriptor().addr_format_type(), 9);

        assert_eq!(&tree.sk()[..8], &hex!("00000000eda313c9"));
        assert_eq!(tree.sk(), zero_seed_tree().sk());
        assert_eq!(tree.extended_seed(), extended_seed);

        // Address format 9 is not derivable.
        let err = tree.address().unwrap_err();
        assert_eq!(err.to_string(), "Address format type not supported");
    }

    #[test]
    fn test_new_from_height_uses_injected_randomness() {
        let mut tree = Xmss::new_from_height(&mut rand::rng(), 4, HashFunction::Shake128).unwrap();
        let pk = tree.pk();
        let sig = tree.sign(b"generated").unwrap();
        verify(b"generated", &sig, &pk).unwrap();
        tree.address().unwrap();
    }

    #[test]
    fn test_rejects_unusable_heights() {
        assert!(Xmss::new_from_seed(&ZERO_SEED, 3, HashFunction::Shake256, 0).is_err());
        assert!(Xmss::new_from_seed(&ZERO_SEED, 2, HashFunction::Shake256, 0).is_err());
        assert!(Xmss::new_from_seed(&ZERO_SEED, 6, HashFunction::Shake256, 0).is_ok());
    }

    #[test]
    fn test_rejects_bad_seed_length() {
        assert!(matches!(
            Xmss::new_from_seed(&[0u8; 47], 4, HashFunction::Shake256, 0),
            Err(Error::InvalidSeedLength { expected: 48, got: 47 })
        ));
        assert!(Xmss::new_from_extended_seed(&[0u8; 52]).is_err());
    }

    #[test]
    fn test_different_families_produce_different_roots() {
        let sha2 = Xmss::new_from_seed(&ZERO_SEED, 4, HashFunction::Sha2_256, 0).unwrap();
        let shake = zero_seed_tree();
        assert_ne!(sha2.root(), shake.root());
        assert_eq!(sha2.pk_seed(), shake.pk_seed());
    }

    #[test]
    fn test_address_rejects_unsupported_format() {
        let mut epk = [0u8; EXTENDED_PK_SIZE];
        epk[1] = 0x10;
        assert!(matches!(
            get_xmss_address_from_pk(&epk),
            Err(Error::AddrFormatNotSupported)
        ));
        assert!(get_xmss_address_from_pk(&epk[..60]).is_err());
    }
}
