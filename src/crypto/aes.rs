//! AES primitives: CBC without padding over the `soft-aes` backend, and the
//! SP 800-38B CMAC (subkey constant R = 0x87 for the 128-bit block) for all
//! three AES key lengths.

use aes::{Aes128, Aes192, Aes256};
use cmac::{Cmac, Mac};
use soft_aes::aes::{aes_dec_cbc, aes_enc_cbc};

use crate::Error;

/// AES cipher block length in bytes.
pub const AES_BLOCK_LEN: usize = 16;

/// Encrypt with AES in CBC mode without padding.
///
/// `data` must be a non-empty multiple of the block length.
pub fn aes_encrypt_cbc(
    key: &[u8],
    iv: &[u8; AES_BLOCK_LEN],
    data: &[u8],
) -> Result<Vec<u8>, Error> {
    if data.is_empty() || data.len() % AES_BLOCK_LEN != 0 {
        return Err(Error::InvalidLength);
    }
    aes_enc_cbc(data, key, iv, None).map_err(|_| Error::Internal)
}

/// Decrypt with AES in CBC mode without padding.
///
/// `data` must be a non-empty multiple of the block length.
pub fn aes_decrypt_cbc(
    key: &[u8],
    iv: &[u8; AES_BLOCK_LEN],
    data: &[u8],
) -> Result<Vec<u8>, Error> {
    if data.is_empty() || data.len() % AES_BLOCK_LEN != 0 {
        return Err(Error::InvalidLength);
    }
    aes_dec_cbc(data, key, iv, None).map_err(|_| Error::DecryptionFailed)
}

/// AES CMAC per NIST SP 800-38B, dispatched on the key length.
pub fn aes_cmac(key: &[u8], msg: &[u8]) -> Result<[u8; AES_BLOCK_LEN], Error> {
    let mut out = [0u8; AES_BLOCK_LEN];
    match key.len() {
        16 => {
            let mut mac = Cmac::<Aes128>::new_from_slice(key).map_err(|_| Error::Internal)?;
            mac.update(msg);
            out.copy_from_slice(&mac.finalize().into_bytes());
        }
        24 => {
            let mut mac = Cmac::<Aes192>::new_from_slice(key).map_err(|_| Error::Internal)?;
            mac.update(msg);
            out.copy_from_slice(&mac.finalize().into_bytes());
        }
        32 => {
            let mut mac = Cmac::<Aes256>::new_from_slice(key).map_err(|_| Error::Internal)?;
            mac.update(msg);
            out.copy_from_slice(&mac.finalize().into_bytes());
        }
        _ => return Err(Error::InvalidKeyLength),
    }
    Ok(out)
}

/// CMAC-based key check value: first 3 bytes of the CMAC over one zero block.
pub fn aes_kcv(key: &[u8]) -> Result<[u8; 3], Error> {
    let mac = aes_cmac(key, &[0u8; AES_BLOCK_LEN])?;
    Ok([mac[0], mac[1], mac[2]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aes_cbc_sp800_38a_vector() {
        // NIST SP 800-38A, F.2.1 (first block).
        let key = hex::decode("2B7E151628AED2A6ABF7158809CF4F3C").unwrap();
        let iv: [u8; 16] = hex::decode("000102030405060708090A0B0C0D0E0F")
            .unwrap()
            .try_into()
            .unwrap();
        let plaintext = hex::decode("6BC1BEE22E409F96E93D7E117393172A").unwrap();

        let ciphertext = aes_encrypt_cbc(&key, &iv, &plaintext).unwrap();
        assert_eq!(
            hex::encode_upper(&ciphertext),
            "7649ABAC8119B246CEE98E9B12E9197D"
        );

        let decrypted = aes_decrypt_cbc(&key, &iv, &ciphertext).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_aes_cbc_rejects_unaligned_data() {
        let key = [0x22u8; 16];
        let iv = [0u8; 16];
        assert_eq!(
            aes_encrypt_cbc(&key, &iv, &[0u8; 20]),
            Err(Error::InvalidLength)
        );
        assert_eq!(
            aes_decrypt_cbc(&key, &iv, &[0u8; 20]),
            Err(Error::InvalidLength)
        );
    }

    #[test]
    fn test_aes_cmac_sp800_38b_vectors() {
        // NIST SP 800-38B, examples 1 and 2 for AES-128.
        let key = hex::decode("2B7E151628AED2A6ABF7158809CF4F3C").unwrap();

        let tag = aes_cmac(&key, &[]).unwrap();
        assert_eq!(
            hex::encode_upper(tag),
            "BB1D6929E95937287FA37D129B756746"
        );

        let msg = hex::decode("6BC1BEE22E409F96E93D7E117393172A").unwrap();
        let tag = aes_cmac(&key, &msg).unwrap();
        assert_eq!(
            hex::encode_upper(tag),
            "070A16B46B4D4144F79BDD9DD04A287C"
        );
    }

    #[test]
    fn test_aes_kcv_matches_cmac_prefix() {
        let key = hex::decode("00112233445566778899AABBCCDDEEFF").unwrap();
        let kcv = aes_kcv(&key).unwrap();
        let mac = aes_cmac(&key, &[0u8; AES_BLOCK_LEN]).unwrap();
        assert_eq!(kcv, [mac[0], mac[1], mac[2]]);
    }
}
