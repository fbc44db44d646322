//! Triple-DES primitives: single-block ECB, CBC without padding, the ISO
//! 9797-1 algorithm 1 CBC-MAC and the SP 800-38B CMAC over the 64-bit
//! block. Double-length (16 byte) and triple-length (24 byte) keys are
//! dispatched on the key slice length; any other length is rejected.

use cbc_mac::CbcMac;
use cipher::block_padding::NoPadding;
use cipher::generic_array::GenericArray;
use cipher::{BlockDecrypt, BlockDecryptMut, BlockEncrypt, BlockEncryptMut, KeyInit, KeyIvInit};
use cmac::{Cmac, Mac};
use des::{Des, TdesEde2, TdesEde3};

use crate::Error;

/// DES/TDES cipher block length in bytes.
pub const DES_BLOCK_LEN: usize = 8;

/// Double-length TDES key size in bytes.
pub const TDES2_KEY_LEN: usize = 16;

/// Triple-length TDES key size in bytes.
pub const TDES3_KEY_LEN: usize = 24;

/// Encrypt a single block with TDES in ECB mode.
pub fn tdes_encrypt_ecb(
    key: &[u8],
    block: &[u8; DES_BLOCK_LEN],
) -> Result<[u8; DES_BLOCK_LEN], Error> {
    let mut buf = GenericArray::clone_from_slice(block);
    match key.len() {
        TDES2_KEY_LEN => {
            let cipher = TdesEde2::new_from_slice(key).map_err(|_| Error::Internal)?;
            cipher.encrypt_block(&mut buf);
        }
        TDES3_KEY_LEN => {
            let cipher = TdesEde3::new_from_slice(key).map_err(|_| Error::Internal)?;
            cipher.encrypt_block(&mut buf);
        }
        _ => return Err(Error::InvalidKeyLength),
    }
    let mut out = [0u8; DES_BLOCK_LEN];
    out.copy_from_slice(&buf);
    Ok(out)
}

/// Decrypt a single block with TDES in ECB mode.
pub fn tdes_decrypt_ecb(
    key: &[u8],
    block: &[u8; DES_BLOCK_LEN],
) -> Result<[u8; DES_BLOCK_LEN], Error> {
    let mut buf = GenericArray::clone_from_slice(block);
    match key.len() {
        TDES2_KEY_LEN => {
            let cipher = TdesEde2::new_from_slice(key).map_err(|_| Error::Internal)?;
            cipher.decrypt_block(&mut buf);
        }
        TDES3_KEY_LEN => {
            let cipher = TdesEde3::new_from_slice(key).map_err(|_| Error::Internal)?;
            cipher.decrypt_block(&mut buf);
        }
        _ => return Err(Error::InvalidKeyLength),
    }
    let mut out = [0u8; DES_BLOCK_LEN];
    out.copy_from_slice(&buf);
    Ok(out)
}

/// Encrypt with TDES in CBC mode without padding.
///
/// `data` must be a non-empty multiple of the block length.
pub fn tdes_encrypt_cbc(
    key: &[u8],
    iv: &[u8; DES_BLOCK_LEN],
    data: &[u8],
) -> Result<Vec<u8>, Error> {
    if data.is_empty() || data.len() % DES_BLOCK_LEN != 0 {
        return Err(Error::InvalidLength);
    }
    match key.len() {
        TDES2_KEY_LEN => {
            let enc = cbc::Encryptor::<TdesEde2>::new_from_slices(key, iv)
                .map_err(|_| Error::Internal)?;
            Ok(enc.encrypt_padded_vec_mut::<NoPadding>(data))
        }
        TDES3_KEY_LEN => {
            let enc = cbc::Encryptor::<TdesEde3>::new_from_slices(key, iv)
                .map_err(|_| Error::Internal)?;
            Ok(enc.encrypt_padded_vec_mut::<NoPadding>(data))
        }
        _ => Err(Error::InvalidKeyLength),
    }
}

/// Decrypt with TDES in CBC mode without padding.
///
/// `data` must be a non-empty multiple of the block length.
pub fn tdes_decrypt_cbc(
    key: &[u8],
    iv: &[u8; DES_BLOCK_LEN],
    data: &[u8],
) -> Result<Vec<u8>, Error> {
    if data.is_empty() || data.len() % DES_BLOCK_LEN != 0 {
        return Err(Error::InvalidLength);
    }
    match key.len() {
        TDES2_KEY_LEN => {
            let dec = cbc::Decryptor::<TdesEde2>::new_from_slices(key, iv)
                .map_err(|_| Error::Internal)?;
            dec.decrypt_padded_vec_mut::<NoPadding>(data)
                .map_err(|_| Error::DecryptionFailed)
        }
        TDES3_KEY_LEN => {
            let dec = cbc::Decryptor::<TdesEde3>::new_from_slices(key, iv)
                .map_err(|_| Error::Internal)?;
            dec.decrypt_padded_vec_mut::<NoPadding>(data)
                .map_err(|_| Error::DecryptionFailed)
        }
        _ => Err(Error::InvalidKeyLength),
    }
}

/// TDES CBC-MAC per ISO 9797-1 algorithm 1: CBC chain over a zero IV, the
/// last cipher block is the MAC. Used by the legacy key block variants;
/// callers truncate the output as their format requires.
pub fn tdes_cbc_mac(key: &[u8], msg: &[u8]) -> Result<[u8; DES_BLOCK_LEN], Error> {
    let mut out = [0u8; DES_BLOCK_LEN];
    match key.len() {
        TDES2_KEY_LEN => {
            let mut mac = <CbcMac<TdesEde2> as Mac>::new_from_slice(key).map_err(|_| Error::Internal)?;
            mac.update(msg);
            out.copy_from_slice(&mac.finalize().into_bytes());
        }
        TDES3_KEY_LEN => {
            let mut mac = <CbcMac<TdesEde3> as Mac>::new_from_slice(key).map_err(|_| Error::Internal)?;
            mac.update(msg);
            out.copy_from_slice(&mac.finalize().into_bytes());
        }
        _ => return Err(Error::InvalidKeyLength),
    }
    Ok(out)
}

/// TDES CMAC per NIST SP 800-38B / ISO 9797-1 algorithm 5 (subkey constant
/// R = 0x1B for the 64-bit block).
pub fn tdes_cmac(key: &[u8], msg: &[u8]) -> Result<[u8; DES_BLOCK_LEN], Error> {
    let mut out = [0u8; DES_BLOCK_LEN];
    match key.len() {
        TDES2_KEY_LEN => {
            let mut mac = <Cmac<TdesEde2> as Mac>::new_from_slice(key).map_err(|_| Error::Internal)?;
            mac.update(msg);
            out.copy_from_slice(&mac.finalize().into_bytes());
        }
        TDES3_KEY_LEN => {
            let mut mac = <Cmac<TdesEde3> as Mac>::new_from_slice(key).map_err(|_| Error::Internal)?;
            mac.update(msg);
            out.copy_from_slice(&mac.finalize().into_bytes());
        }
        _ => return Err(Error::InvalidKeyLength),
    }
    Ok(out)
}

/// Legacy key check value: first 3 bytes of encrypting the zero block.
pub fn tdes_kcv(key: &[u8]) -> Result<[u8; 3], Error> {
    let enc = tdes_encrypt_ecb(key, &[0u8; DES_BLOCK_LEN])?;
    Ok([enc[0], enc[1], enc[2]])
}

/// Key check value for a single-length (8 byte) DES key.
pub fn des_kcv(key: &[u8]) -> Result<[u8; 3], Error> {
    if key.len() != DES_BLOCK_LEN {
        return Err(Error::InvalidKeyLength);
    }
    let cipher = Des::new_from_slice(key).map_err(|_| Error::Internal)?;
    let mut block = GenericArray::clone_from_slice(&[0u8; DES_BLOCK_LEN]);
    cipher.encrypt_block(&mut block);
    Ok([block[0], block[1], block[2]])
}
