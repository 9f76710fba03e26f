// Incremental HMAC dispatch over the supported digests.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};

use crate::algorithm::Algorithm;

/// A running HMAC computation for a runtime-selected hash.
///
/// Both extraction (one pass over the input key material) and each expansion
/// round feed data through one of these and take the final digest.
#[derive(Clone)]
pub enum HmacContext {
    /// HMAC-SHA-1 state.
    Sha1(Hmac<Sha1>),
    /// HMAC-SHA-256 state.
    Sha256(Hmac<Sha256>),
    /// HMAC-SHA-384 state.
    Sha384(Hmac<Sha384>),
    /// HMAC-SHA-512 state.
    Sha512(Hmac<Sha512>),
}

impl HmacContext {
    /// Starts a new HMAC computation keyed with `key`.
    #[must_use]
    pub fn new(algorithm: Algorithm, key: &[u8]) -> Self {
        match algorithm {
            Algorithm::Sha1 => {
                Self::Sha1(Hmac::new_from_slice(key).expect("hmac accepts keys of any length"))
            }
            Algorithm::Sha256 => {
                Self::Sha256(Hmac::new_from_slice(key).expect("hmac accepts keys of any length"))
            }
            Algorithm::Sha384 => {
                Self::Sha384(Hmac::new_from_slice(key).expect("hmac accepts keys of any length"))
            }
            Algorithm::Sha512 => {
                Self::Sha512(Hmac::new_from_slice(key).expect("hmac accepts keys of any length"))
            }
        }
    }

    /// Feeds `data` into the running computation.
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha1(mac) => mac.update(data),
            Self::Sha256(mac) => mac.update(data),
            Self::Sha384(mac) => mac.update(data),
            Self::Sha512(mac) => mac.update(data),
        }
    }

    /// Consumes the computation and returns the digest.
    #[must_use]
    pub fn finalize(self) -> Vec<u8> {
        match self {
            Self::Sha1(mac) => mac.finalize().into_bytes().to_vec(),
            Self::Sha256(mac) => mac.finalize().into_bytes().to_vec(),
            Self::Sha384(mac) => mac.finalize().into_bytes().to_vec(),
            Self::Sha512(mac) => mac.finalize().into_bytes().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 2202 test case 1.
    #[test]
    fn hmac_sha1_vector() {
        let mut mac = HmacContext::new(Algorithm::Sha1, &[0x0b; 20]);
        mac.update(b"Hi There");
        assert_eq!(
            mac.finalize(),
            hex::decode("b617318655057264e28bc0b6fb378c8ef146be00").unwrap()
        );
    }

    // RFC 4231 test case 1.
    #[test]
    fn hmac_sha256_vector() {
        let mut mac = HmacContext::new(Algorithm::Sha256, &[0x0b; 20]);
        mac.update(b"Hi There");
        assert_eq!(
            mac.finalize(),
            hex::decode("b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7")
                .unwrap()
        );
    }

    #[test]
    fn chunked_update_matches_single_pass() {
        let key = b"chunking key";
        let message = b"the quick brown fox jumps over the lazy dog";

        let mut whole = HmacContext::new(Algorithm::Sha512, key);
        whole.update(message);

        let mut pieces = HmacContext::new(Algorithm::Sha512, key);
        for byte in message {
            pieces.update(std::slice::from_ref(byte));
        }

        assert_eq!(whole.finalize(), pieces.finalize());
    }

    #[test]
    fn digest_lengths_match_algorithm() {
        for alg in [
            Algorithm::Sha1,
            Algorithm::Sha256,
            Algorithm::Sha384,
            Algorithm::Sha512,
        ] {
            let mac = HmacContext::new(alg, b"k");
            assert_eq!(mac.finalize().len(), alg.digest_len());
        }
    }
}
