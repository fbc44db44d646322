use thiserror::Error;

/// Status codes returned by every fallible operation in this crate.
///
/// The key block codec reports exactly one of these kinds per call; the
/// `Display` implementation carries the diagnostic string shown by the
/// command line tool. Structural faults keep their specific kind so callers
/// can localize the problem, while cipher-level failures surface only as
/// [`Error::MacVerificationFailed`], [`Error::DecryptionFailed`] or
/// [`Error::Internal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Key block version ID is not one of `A`, `B`, `C` or `D`.
    #[error("unsupported key block format version")]
    UnsupportedVersion,

    /// Length field is malformed or disagrees with the actual block length.
    #[error("invalid key block length")]
    InvalidLength,

    /// Key block contains a byte outside printable ASCII, or a field
    /// contains a character its encoding does not allow.
    #[error("invalid character in key block")]
    InvalidCharacter,

    #[error("unsupported key usage")]
    UnsupportedKeyUsage,

    #[error("unsupported key algorithm")]
    UnsupportedAlgorithm,

    #[error("unsupported key mode of use")]
    UnsupportedModeOfUse,

    #[error("invalid key version field")]
    InvalidKeyVersion,

    #[error("unsupported key exportability")]
    UnsupportedExportability,

    #[error("invalid optional block")]
    InvalidOptionalBlock,

    /// Key block protection key length does not fit the block version.
    #[error("unsupported key block protection key length")]
    UnsupportedKbpkLength,

    #[error("unsupported key block protection key algorithm")]
    UnsupportedKbpkAlgorithm,

    #[error("key block MAC verification failed")]
    MacVerificationFailed,

    #[error("key block payload decryption failed")]
    DecryptionFailed,

    /// Wrapped key material has an impossible length for its algorithm.
    #[error("invalid wrapped key length")]
    InvalidKeyLength,

    #[error("internal error")]
    Internal,
}
