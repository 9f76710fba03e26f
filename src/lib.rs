// HKDF (RFC 5869) with a seekable, lazily expanded output stream.

pub mod algorithm;

pub mod mac;

pub mod stream;

pub use algorithm::{Algorithm, UnknownAlgorithm};

pub use mac::HmacContext;

pub use stream::{HkdfError, HkdfOptions, HkdfStream, DEFAULT_READ_SIZE};
