//! Key block wrapping and unwrapping.
//!
//! This module implements the interchange key block construction for the
//! four format versions:
//!
//! - `A` and `C`: TDES with the key variant binding method. The payload is
//!   encrypted in CBC mode over a zero IV and authenticated with an ISO
//!   9797-1 algorithm 1 CBC-MAC over the header and ciphertext, truncated to
//!   4 bytes.
//! - `B`: TDES with the key derivation binding method. A TDES-CMAC over the
//!   header and plaintext payload is both the 8-byte authenticator and the
//!   IV of the CBC encryption.
//! - `D`: AES with the key derivation binding method. An AES-CMAC over the
//!   header and plaintext payload is both the 16-byte authenticator and the
//!   CBC IV.
//!
//! The key block consists of three parts:
//! 1. The key block header with attribute information, not encrypted but
//!    authenticated.
//! 2. The confidential data: two bytes of key length, the key itself, and
//!    random padding up to a fixed or masked length.
//! 3. The MAC over the parts the version's binding method prescribes.
//!
//! Unwrapping verifies the authenticator in constant time before any key
//! material is revealed; the clear key and every intermediate buffer that
//! held it are wiped when dropped. A block whose header parses is always
//! returned as a [`KeyBlock`] context, even when authentication or
//! decryption fails, so callers can inspect the attributes of a bad block;
//! see [`ImportError`].
//!
//! The random seed for padding is either provided by the caller
//! ([`wrap_with_seed`]) or taken from the operating system ([`wrap`]); this
//! library does not assess entropy or random number generation quality. In a
//! production environment, a hardware security module should perform the
//! core cryptographic operations and random number generation.
//!
//! # Example: wrapping and unwrapping a key
//! ```
//! use keysec::keyblock::{wrap_with_seed, unwrap, KeyBlockHeader};
//!
//! let header = KeyBlockHeader::new_with_values("D", "P0", "A", "E", "00", "E").unwrap();
//! let key = hex::decode("3F419E1CB7079442AA37474C2EFBF8B8").unwrap();
//! let random_seed = hex::decode("1C2965473CE206BB855B01533782").unwrap();
//! let kbpk =
//!     hex::decode("88E1AB2A2E3DD38C1FA039A536500CC8A87AB9D62DC92C01058FA79F44657DE6").unwrap();
//!
//! let key_block = wrap_with_seed(&kbpk, header, &key, 0, &random_seed).unwrap();
//! assert_eq!(
//!     key_block,
//!     "D0112P0AE00E0000B82679114F470F540165EDFBF7E250FCEA43F810D215F8D207E2E417C07156A27E8E31DA05F7425509593D03A457DC34"
//! );
//!
//! let ctx = unwrap(Some(&kbpk), &key_block).unwrap();
//! assert_eq!(ctx.key().data(), Some(key.as_slice()));
//! assert_eq!(ctx.key().usage(), "P0");
//! ```
//!
//! # Example: inspecting a block without the protection key
//! ```
//! use keysec::keyblock::unwrap;
//!
//! let key_block =
//!     "D0112P0AE00E0000B82679114F470F540165EDFBF7E250FCEA43F810D215F8D207E2E417C07156A2\
//!      7E8E31DA05F7425509593D03A457DC34";
//! let ctx = unwrap(None, key_block).unwrap();
//! assert_eq!(ctx.header().version_id(), "D");
//! assert!(ctx.key().data().is_none());
//! ```

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use super::derivation::{derive_keys_variant, derive_keys_version_b, derive_keys_version_d};
use super::header::KeyBlockHeader;
use super::key::Key;
use super::payload::{construct_payload, extract_key_from_payload};
use crate::crypto::{
    aes_cmac, aes_decrypt_cbc, aes_encrypt_cbc, tdes_cbc_mac, tdes_cmac, tdes_decrypt_cbc,
    tdes_encrypt_cbc, verify_mac, AES_BLOCK_LEN, DES_BLOCK_LEN,
};
use crate::utils::is_ascii_printable;
use crate::Error;

/// Truncated CBC-MAC length of versions 'A' and 'C' in bytes.
const LEGACY_MAC_LEN: usize = 4;

/// Upper bound of the four-digit decimal length field.
const MAX_KEY_BLOCK_LEN: usize = 9999;

/// Authenticator length in bytes for a key block version.
fn mac_len(version_id: &str) -> usize {
    match version_id {
        "B" => DES_BLOCK_LEN,
        "D" => AES_BLOCK_LEN,
        _ => LEGACY_MAC_LEN,
    }
}

/// Check the protection key length against the block version: TDES double or
/// triple length for 'A', 'B' and 'C'; AES-128/192/256 for 'D'.
fn check_kbpk_length(version_id: &str, kbpk: &[u8]) -> Result<(), Error> {
    let ok = match version_id {
        "D" => matches!(kbpk.len(), 16 | 24 | 32),
        _ => matches!(kbpk.len(), 16 | 24),
    };
    if ok {
        Ok(())
    } else {
        Err(Error::UnsupportedKbpkLength)
    }
}

/// A parsed key block: the header, the wrapped key, and the encrypted
/// payload and authenticator exactly as read from the wire.
///
/// The clear key material inside [`Key`] is present only after unwrapping
/// with the correct protection key; it is wiped when the context is dropped.
#[derive(Debug)]
pub struct KeyBlock {
    header: KeyBlockHeader,
    key: Key,
    payload: Vec<u8>,
    authenticator: Vec<u8>,
}

impl KeyBlock {
    /// Header of the block, optional blocks included.
    pub fn header(&self) -> &KeyBlockHeader {
        &self.header
    }

    /// The wrapped key: attributes always, clear material after successful
    /// unwrapping.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Encrypted payload bytes as carried by the block.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Authenticator bytes as carried by the block.
    pub fn authenticator(&self) -> &[u8] {
        &self.authenticator
    }
}

/// Failure to import a key block.
///
/// Carries the status kind together with whatever context was recovered
/// before the failure: once the header has parsed, the context is populated
/// so the attributes of a bad block remain inspectable. The clear key is
/// never part of the context unless authentication succeeded, in which case
/// there is no error at all.
#[derive(Debug)]
pub struct ImportError {
    kind: Error,
    context: Option<Box<KeyBlock>>,
}

impl ImportError {
    /// The status kind of the failure.
    pub fn kind(&self) -> Error {
        self.kind
    }

    /// The partially populated context, when the header parsed.
    pub fn context(&self) -> Option<&KeyBlock> {
        self.context.as_deref()
    }

    /// Consume the error and take the recovered context.
    pub fn into_context(self) -> Option<KeyBlock> {
        self.context.map(|ctx| *ctx)
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for ImportError {}

impl From<Error> for ImportError {
    fn from(kind: Error) -> Self {
        Self {
            kind,
            context: None,
        }
    }
}

fn fail(ctx: KeyBlock, kind: Error) -> ImportError {
    ImportError {
        kind,
        context: Some(Box::new(ctx)),
    }
}

/// Wrap a key into a key block, with padding drawn from the OS random
/// number generator.
///
/// See [`wrap_with_seed`] for the construction itself.
pub fn wrap(
    kbpk: &[u8],
    header: KeyBlockHeader,
    key: &[u8],
    masked_key_len: usize,
) -> Result<String, Error> {
    // Covers the worst-case padding of the effective key length.
    let seed_len = key.len().max(masked_key_len) + header.block_size() + 2;
    let mut random_seed = Zeroizing::new(vec![0u8; seed_len]);
    OsRng.fill_bytes(&mut random_seed);

    wrap_with_seed(kbpk, header, key, masked_key_len, &random_seed)
}

/// Wrap a key into a key block with caller-provided padding.
///
/// The construction follows the version profile of the header: the optional
/// block region is padded to the cipher block size, the payload is built
/// from the key and the random seed, the total length field is backfilled,
/// the encryption and authentication keys are derived from `kbpk`, and the
/// final block is the ASCII header followed by the uppercase hex ciphertext
/// and authenticator.
///
/// # Arguments
/// * `kbpk` - Key block protection key; TDES double/triple length for
///   versions 'A', 'B' and 'C', AES-128/192/256 for version 'D'.
/// * `header` - Header carrying the attributes to bind. Its length field
///   may hold any value; it is overwritten with the actual block length.
/// * `key` - The clear key or sensitive data to protect.
/// * `masked_key_len` - Length used to mask the true length of short keys;
///   values up to the key length leave the length unmasked.
/// * `random_seed` - Random data used for payload padding; must be at least
///   as long as the padding the layout requires.
pub fn wrap_with_seed(
    kbpk: &[u8],
    mut header: KeyBlockHeader,
    key: &[u8],
    masked_key_len: usize,
    random_seed: &[u8],
) -> Result<String, Error> {
    check_kbpk_length(header.version_id(), kbpk)?;

    // Align the optional block region to the cipher block size.
    header.finalize()?;

    let block_len = header.block_size();
    let version_mac_len = mac_len(header.version_id());

    let payload = construct_payload(key, masked_key_len, block_len, random_seed)?;

    // The length field depends on everything that follows it, so the sizes
    // are fixed first and the header serialized afterwards.
    let total_block_length = header.len() + payload.len() * 2 + version_mac_len * 2;
    if total_block_length > MAX_KEY_BLOCK_LEN || total_block_length % block_len != 0 {
        return Err(Error::InvalidLength);
    }
    header.set_kb_length(total_block_length as u16)?;
    let header_str = header.export_str()?;

    let (ciphertext, mac) =
        protect_payload(kbpk, header_str.as_bytes(), header.version_id(), &payload)?;

    let mut key_block = String::with_capacity(total_block_length);
    key_block.push_str(&header_str);
    key_block.push_str(&hex::encode_upper(&ciphertext));
    key_block.push_str(&hex::encode_upper(&mac));

    Ok(key_block)
}

/// Wrap a key into a key block, taking the header in its string form.
pub fn wrap_with_header_string(
    header_str: &str,
    kbpk: &[u8],
    key: &[u8],
    masked_key_len: usize,
    random_seed: &[u8],
) -> Result<String, Error> {
    let header = KeyBlockHeader::new_from_str(header_str)?;

    wrap_with_seed(kbpk, header, key, masked_key_len, random_seed)
}

/// Unwrap a key block.
///
/// Without a protection key the block is parsed and validated structurally
/// and the returned context carries the header attributes only. With a
/// protection key, the authenticator is verified in constant time and the
/// clear key is revealed and bound to its key check value only on success.
///
/// Once the header has parsed, failures carry the recovered context; see
/// [`ImportError`].
pub fn unwrap(kbpk: Option<&[u8]>, key_block: &str) -> Result<KeyBlock, ImportError> {
    if !is_ascii_printable(key_block) {
        return Err(Error::InvalidCharacter.into());
    }

    let header = KeyBlockHeader::new_from_str(key_block)?;
    let header_len = header.len();
    let block_len = header.block_size();
    let version_mac_len = mac_len(header.version_id());

    let key = Key::from_header(&header);
    let mut ctx = KeyBlock {
        header,
        key,
        payload: Vec::new(),
        authenticator: Vec::new(),
    };

    // The header and optional block region is authenticated as-is, so it
    // must already sit on a cipher block boundary; the write path guarantees
    // this via padding and the parse path rejects anything else.
    if header_len % block_len != 0 {
        return Err(fail(ctx, Error::InvalidOptionalBlock));
    }

    let total_len = key_block.len();
    if total_len != ctx.header.kb_length() as usize {
        return Err(fail(ctx, Error::InvalidLength));
    }
    // Minimum room for one cipher block of payload and the authenticator.
    if total_len < header_len + 2 * block_len + 2 * version_mac_len {
        return Err(fail(ctx, Error::InvalidLength));
    }

    let ciphertext_hex = &key_block[header_len..total_len - version_mac_len * 2];
    let authenticator_hex = &key_block[total_len - version_mac_len * 2..];

    ctx.payload = match hex::decode(ciphertext_hex) {
        Ok(bytes) => bytes,
        Err(_) => return Err(fail(ctx, Error::InvalidCharacter)),
    };
    ctx.authenticator = match hex::decode(authenticator_hex) {
        Ok(bytes) => bytes,
        Err(_) => return Err(fail(ctx, Error::InvalidCharacter)),
    };

    if ctx.payload.len() % block_len != 0 {
        return Err(fail(ctx, Error::InvalidLength));
    }

    // Without a protection key the attributes are all there is to return.
    let Some(kbpk) = kbpk else {
        return Ok(ctx);
    };

    if let Err(e) = check_kbpk_length(ctx.header.version_id(), kbpk) {
        return Err(fail(ctx, e));
    }

    let header_ascii = key_block[..header_len].as_bytes();
    let plaintext = match reveal_payload(
        kbpk,
        header_ascii,
        ctx.header.version_id(),
        &ctx.payload,
        &ctx.authenticator,
    ) {
        Ok(plaintext) => plaintext,
        Err(e) => return Err(fail(ctx, e)),
    };

    let key_bytes = match extract_key_from_payload(&plaintext, ctx.header.algorithm()) {
        Ok(bytes) => bytes,
        Err(e) => return Err(fail(ctx, e)),
    };

    ctx.key.set_data(&key_bytes);

    Ok(ctx)
}

/// Encrypt the payload and compute the authenticator per version profile.
fn protect_payload(
    kbpk: &[u8],
    header_ascii: &[u8],
    version_id: &str,
    payload: &[u8],
) -> Result<(Vec<u8>, Vec<u8>), Error> {
    match version_id {
        "A" | "C" => {
            let (kbek, kbak) = derive_keys_variant(kbpk)?;
            let ciphertext = tdes_encrypt_cbc(&kbek, &[0u8; DES_BLOCK_LEN], payload)?;
            let mut mac_input = header_ascii.to_vec();
            mac_input.extend_from_slice(&ciphertext);
            let mac = tdes_cbc_mac(&kbak, &mac_input)?;
            Ok((ciphertext, mac[..LEGACY_MAC_LEN].to_vec()))
        }
        "B" => {
            let (kbek, kbak) = derive_keys_version_b(kbpk)?;
            let mut mac_input = Zeroizing::new(header_ascii.to_vec());
            mac_input.extend_from_slice(payload);
            let mac = tdes_cmac(&kbak, &mac_input)?;
            let ciphertext = tdes_encrypt_cbc(&kbek, &mac, payload)?;
            Ok((ciphertext, mac.to_vec()))
        }
        "D" => {
            let (kbek, kbak) = derive_keys_version_d(kbpk)?;
            let mut mac_input = Zeroizing::new(header_ascii.to_vec());
            mac_input.extend_from_slice(payload);
            let mac = aes_cmac(&kbak, &mac_input)?;
            let ciphertext = aes_encrypt_cbc(&kbek, &mac, payload)?;
            Ok((ciphertext, mac.to_vec()))
        }
        _ => Err(Error::UnsupportedVersion),
    }
}

/// Verify the authenticator and decrypt the payload per version profile.
///
/// For 'B' and 'D' the payload must be decrypted before the CMAC can be
/// recomputed; the plaintext buffer is wiped on the failure path by its
/// drop. For 'A' and 'C' the CBC-MAC covers the ciphertext and is checked
/// before decryption.
fn reveal_payload(
    kbpk: &[u8],
    header_ascii: &[u8],
    version_id: &str,
    ciphertext: &[u8],
    authenticator: &[u8],
) -> Result<Zeroizing<Vec<u8>>, Error> {
    match version_id {
        "A" | "C" => {
            let (kbek, kbak) = derive_keys_variant(kbpk)?;
            let mut mac_input = header_ascii.to_vec();
            mac_input.extend_from_slice(ciphertext);
            let mac = tdes_cbc_mac(&kbak, &mac_input)?;
            if !verify_mac(&mac[..LEGACY_MAC_LEN], authenticator) {
                return Err(Error::MacVerificationFailed);
            }
            Ok(Zeroizing::new(tdes_decrypt_cbc(
                &kbek,
                &[0u8; DES_BLOCK_LEN],
                ciphertext,
            )?))
        }
        "B" => {
            let (kbek, kbak) = derive_keys_version_b(kbpk)?;
            let iv: [u8; DES_BLOCK_LEN] =
                authenticator.try_into().map_err(|_| Error::Internal)?;
            let plaintext = Zeroizing::new(tdes_decrypt_cbc(&kbek, &iv, ciphertext)?);
            let mut mac_input = Zeroizing::new(header_ascii.to_vec());
            mac_input.extend_from_slice(&plaintext);
            let mac = tdes_cmac(&kbak, &mac_input)?;
            if !verify_mac(&mac, authenticator) {
                return Err(Error::MacVerificationFailed);
            }
            Ok(plaintext)
        }
        "D" => {
            let (kbek, kbak) = derive_keys_version_d(kbpk)?;
            let iv: [u8; AES_BLOCK_LEN] =
                authenticator.try_into().map_err(|_| Error::Internal)?;
            let plaintext = Zeroizing::new(aes_decrypt_cbc(&kbek, &iv, ciphertext)?);
            let mut mac_input = Zeroizing::new(header_ascii.to_vec());
            mac_input.extend_from_slice(&plaintext);
            let mac = aes_cmac(&kbak, &mac_input)?;
            if !verify_mac(&mac, authenticator) {
                return Err(Error::MacVerificationFailed);
            }
            Ok(plaintext)
        }
        _ => Err(Error::UnsupportedVersion),
    }
}
