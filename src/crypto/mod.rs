//! Cipher primitive adapters and the MAC layer.
//!
//! This module is the only place in the crate that talks to cipher
//! libraries: AES operations are backed by the `soft-aes` crate and TDES
//! operations by the RustCrypto `des` family. Everything here is a pure,
//! stateless function over borrowed inputs, so the adapters are re-entrant
//! by construction and hold no cipher state beyond a single call.
//!
//! The key block codec never names a cipher crate itself; it consumes only
//! the functions exported from here.

mod aes;
mod tdes;

pub use aes::*;
pub use tdes::*;

use subtle::ConstantTimeEq;

/// Compare a computed authenticator against a received one in constant time.
///
/// Slices of different lengths compare unequal. This is the only comparator
/// the codec uses for MAC verification.
pub fn verify_mac(expected: &[u8], received: &[u8]) -> bool {
    bool::from(expected.ct_eq(received))
}
