// Hash algorithm selection for HKDF derivation.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Hash functions supported for HKDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// HMAC-SHA-1 (RFC 5869 appendix vectors only; avoid for new designs).
    Sha1,
    /// HMAC-SHA-256 (default).
    Sha256,
    /// HMAC-SHA-384.
    Sha384,
    /// HMAC-SHA-512.
    Sha512,
}

impl Algorithm {
    /// Digest output length in bytes.
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Maximum derivable output per RFC 5869: 255 expansion rounds.
    #[must_use]
    pub const fn max_output_len(self) -> usize {
        self.digest_len() * 255
    }

    /// Canonical name of the algorithm.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
        }
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Sha256
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an algorithm name is not recognized.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown hash algorithm '{0}'; expected SHA1, SHA256, SHA384 or SHA512")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(UnknownAlgorithm(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_lengths() {
        assert_eq!(Algorithm::Sha1.digest_len(), 20);
        assert_eq!(Algorithm::Sha256.digest_len(), 32);
        assert_eq!(Algorithm::Sha384.digest_len(), 48);
        assert_eq!(Algorithm::Sha512.digest_len(), 64);
    }

    #[test]
    fn max_output_is_255_rounds() {
        assert_eq!(Algorithm::Sha256.max_output_len(), 255 * 32);
        assert_eq!(Algorithm::Sha1.max_output_len(), 5100);
    }

    #[test]
    fn parses_common_spellings() {
        assert_eq!("SHA256".parse::<Algorithm>().unwrap(), Algorithm::Sha256);
        assert_eq!("sha-256".parse::<Algorithm>().unwrap(), Algorithm::Sha256);
        assert_eq!("sha1".parse::<Algorithm>().unwrap(), Algorithm::Sha1);
        assert_eq!("SHA-512".parse::<Algorithm>().unwrap(), Algorithm::Sha512);
    }

    #[test]
    fn rejects_unknown_name() {
        let err = "md5".parse::<Algorithm>().unwrap_err();
        assert_eq!(err, UnknownAlgorithm("md5".to_owned()));
    }

    #[test]
    fn display_round_trips() {
        for alg in [
            Algorithm::Sha1,
            Algorithm::Sha256,
            Algorithm::Sha384,
            Algorithm::Sha512,
        ] {
            assert_eq!(alg.to_string().parse::<Algorithm>().unwrap(), alg);
        }
    }
}
