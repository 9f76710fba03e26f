// HKDF extract-and-expand exposed as a seekable output stream.

use std::{fmt, io::Read};

use thiserror::Error;
use tracing::trace;

use crate::{algorithm::Algorithm, mac::HmacContext};

/// Default chunk size when draining a streaming input key material source.
pub const DEFAULT_READ_SIZE: usize = 512 * 1024;

/// Errors surfaced by [`HkdfStream`].
#[derive(Debug, Error)]
pub enum HkdfError {
    /// A read or seek would move the logical position past the maximum
    /// output length allowed by RFC 5869.
    #[error("requested position {requested} exceeds maximum output length {max}")]
    OutOfRange {
        /// The logical end position the caller asked for.
        requested: usize,
        /// Maximum output length for the configured algorithm.
        max: usize,
    },
    /// The input key material source failed while being drained.
    #[error("failed to read input key material: {0}")]
    Io(#[from] std::io::Error),
}

/// Construction parameters for [`HkdfStream`].
#[derive(Debug, Clone)]
pub struct HkdfOptions {
    /// Hash function used for extraction and expansion.
    pub algorithm: Algorithm,
    /// Optional salt. Absent or empty salt is replaced with digest-length
    /// zero bytes per RFC 5869 §2.2.
    pub salt: Option<Vec<u8>>,
    /// Application context string mixed into every expansion round. Empty is
    /// a valid explicit value and also the default.
    pub info: Vec<u8>,
    /// Chunk size when draining a streaming source; ignored for in-memory
    /// input key material.
    pub read_size: usize,
}

impl Default for HkdfOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            salt: None,
            info: Vec::new(),
            read_size: DEFAULT_READ_SIZE,
        }
    }
}

/// An HKDF derivation with a stream cursor over the output key material.
///
/// The pseudorandom key is extracted once at construction. Expansion blocks
/// are generated lazily on read and cached, so seeking backward and
/// re-reading costs no HMAC work. Reads advance the cursor; [`seek`] and
/// [`rewind`] reposition it anywhere within the RFC 5869 output bound.
///
/// Reads and seeks take `&mut self`; a stream shared between threads needs
/// external synchronization, while distinct streams are fully independent.
///
/// [`seek`]: HkdfStream::seek
/// [`rewind`]: HkdfStream::rewind
pub struct HkdfStream {
    algorithm: Algorithm,
    info: Vec<u8>,
    prk: Vec<u8>,
    okm: Vec<u8>,
    position: usize,
    max_length: usize,
}

impl HkdfStream {
    /// Derives from in-memory input key material with default options
    /// (SHA-256, zero salt, empty info).
    #[must_use]
    pub fn new(ikm: impl AsRef<[u8]>) -> Self {
        Self::with_options(ikm, HkdfOptions::default())
    }

    /// Derives from in-memory input key material with explicit options.
    #[must_use]
    pub fn with_options(ikm: impl AsRef<[u8]>, options: HkdfOptions) -> Self {
        let mut mac = extract_context(&options);
        mac.update(ikm.as_ref());
        Self::from_prk_parts(options, mac.finalize())
    }

    /// Derives from a streaming input key material source, draining it fully
    /// in `read_size`-byte chunks through a single running HMAC.
    ///
    /// The source is consumed exactly once; interrupted reads are retried,
    /// any other I/O failure is propagated as [`HkdfError::Io`].
    pub fn from_reader<R: Read>(mut source: R, options: HkdfOptions) -> Result<Self, HkdfError> {
        let mut mac = extract_context(&options);
        let mut buf = vec![0u8; options.read_size.max(1)];
        let mut drained = 0usize;
        loop {
            match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    mac.update(&buf[..n]);
                    drained += n;
                }
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
        trace!(bytes = drained, "drained input key material source");
        Ok(Self::from_prk_parts(options, mac.finalize()))
    }

    fn from_prk_parts(options: HkdfOptions, prk: Vec<u8>) -> Self {
        let algorithm = options.algorithm;
        Self {
            algorithm,
            info: options.info,
            prk,
            okm: Vec::new(),
            position: 0,
            max_length: algorithm.max_output_len(),
        }
    }

    /// The hash algorithm this stream derives with.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Maximum number of bytes derivable from this stream, `digest_len * 255`.
    #[must_use]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Current cursor position within the output stream.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Reads the next `length` bytes of output key material and advances the
    /// cursor. Consecutive reads return disjoint, contiguous slices of the
    /// derived stream.
    ///
    /// Fails with [`HkdfError::OutOfRange`] if the read would end past
    /// [`max_length`], leaving cursor and cache untouched.
    ///
    /// [`max_length`]: HkdfStream::max_length
    pub fn read(&mut self, length: usize) -> Result<Vec<u8>, HkdfError> {
        let new_position = match self.position.checked_add(length) {
            Some(end) if end <= self.max_length => end,
            _ => {
                return Err(HkdfError::OutOfRange {
                    requested: self.position.saturating_add(length),
                    max: self.max_length,
                })
            }
        };

        self.expand_through(new_position.div_ceil(self.algorithm.digest_len()));

        let out = self.okm[self.position..new_position].to_vec();
        self.position = new_position;
        Ok(out)
    }

    /// Like [`read`], returning the bytes lower-case hex encoded.
    ///
    /// [`read`]: HkdfStream::read
    pub fn read_hex(&mut self, length: usize) -> Result<String, HkdfError> {
        Ok(hex::encode(self.read(length)?))
    }

    /// Moves the cursor to an arbitrary position in the output stream.
    ///
    /// Seeking never discards cached blocks: seeking backward re-reads
    /// already-derived material for free, seeking forward defers block
    /// generation to the next read. Fails with [`HkdfError::OutOfRange`] if
    /// `position` exceeds [`max_length`].
    ///
    /// [`max_length`]: HkdfStream::max_length
    pub fn seek(&mut self, position: usize) -> Result<(), HkdfError> {
        if position > self.max_length {
            return Err(HkdfError::OutOfRange {
                requested: position,
                max: self.max_length,
            });
        }
        self.position = position;
        Ok(())
    }

    /// Moves the cursor back to the beginning of the output stream.
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Ensures expansion rounds `1..=round` are present in the cache.
    ///
    /// Round `n` is `HMAC(prk, block(n-1) || info || n)` with `n` encoded as
    /// a single byte; rounds are strictly sequential, each chaining the
    /// previous block. Already-cached rounds are never recomputed.
    fn expand_through(&mut self, round: usize) {
        let digest_len = self.algorithm.digest_len();
        let mut generated = self.okm.len() / digest_len;
        if generated >= round {
            return;
        }
        let fresh = round - generated;

        while generated < round {
            let next = generated + 1;
            let counter =
                u8::try_from(next).expect("round counter stays below the 255-round cap");
            let mut mac = HmacContext::new(self.algorithm, &self.prk);
            if next > 1 {
                mac.update(&self.okm[(next - 2) * digest_len..(next - 1) * digest_len]);
            }
            mac.update(&self.info);
            mac.update(&[counter]);
            self.okm.extend_from_slice(&mac.finalize());
            generated = next;
        }

        trace!(rounds = fresh, through = round, "generated expansion blocks");
    }
}

// Keeps the PRK and cached output out of debug logs.
impl fmt::Debug for HkdfStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HkdfStream")
            .field("algorithm", &self.algorithm)
            .field("info", &self.info)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

fn extract_context(options: &HkdfOptions) -> HmacContext {
    match options.salt.as_deref() {
        Some(salt) if !salt.is_empty() => HmacContext::new(options.algorithm, salt),
        _ => HmacContext::new(
            options.algorithm,
            &vec![0u8; options.algorithm.digest_len()],
        ),
    }
}
