//! # keysec
//!
//! Rust library for ANSI TR-31 / ASC X9.143 interchange key blocks: a
//! standardized container used in retail payments to transport symmetric
//! keys together with bound usage attributes (purpose, algorithm, mode of
//! use, exportability) between cryptographic devices. The binding is
//! cryptographic: a receiver cannot use a key whose header has been
//! tampered with.
//!
//! All four key block format versions are implemented: `A` and `C` (TDES,
//! key variant binding method), `B` (TDES, key derivation binding method)
//! and `D` (AES, key derivation binding method).
//!
//! The library is pure and re-entrant: no I/O, no global state, and every
//! operation is a synchronous function over borrowed inputs. Clear key
//! material and derived keys are wiped when dropped.
//!
//! ```
//! use keysec::keyblock::{unwrap, wrap_with_seed, KeyBlockHeader};
//!
//! let header = KeyBlockHeader::new_with_values("D", "P0", "A", "E", "00", "E").unwrap();
//! let key = hex::decode("3F419E1CB7079442AA37474C2EFBF8B8").unwrap();
//! let random_seed = hex::decode("1C2965473CE206BB855B01533782").unwrap();
//! let kbpk =
//!     hex::decode("88E1AB2A2E3DD38C1FA039A536500CC8A87AB9D62DC92C01058FA79F44657DE6").unwrap();
//!
//! let key_block = wrap_with_seed(&kbpk, header, &key, 0, &random_seed).unwrap();
//! let ctx = unwrap(Some(&kbpk), &key_block).unwrap();
//! assert_eq!(ctx.key().data(), Some(key.as_slice()));
//! ```

pub mod crypto;
pub mod keyblock;
pub mod utils;

mod error;

pub use error::Error;

/// Library version string, as reported by the command line tool.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
