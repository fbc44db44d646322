use std::cmp::max;

use zeroize::Zeroizing;

use crate::Error;

/// Construct the plaintext payload of a key block.
///
/// The payload is the key length in bits as a 16-bit big-endian value,
/// followed by the key itself and random padding up to a whole number of
/// cipher blocks. `masked_key_length` hides the true length of short keys by
/// padding as if the key were at least that long. The random seed is
/// supplied by the caller and must cover the padding length; this library
/// does not assess entropy quality.
pub(crate) fn construct_payload(
    key: &[u8],
    masked_key_length: usize,
    cipher_block_length: usize,
    random_seed: &[u8],
) -> Result<Zeroizing<Vec<u8>>, Error> {
    let key_len = key.len();
    if key_len == 0 || key_len * 8 > u16::MAX as usize {
        return Err(Error::InvalidKeyLength);
    }

    let raw_key_section_length = 2 + key_len;

    let effective_key_length = max(key_len, masked_key_length);
    let total_payload_length = ((2 + effective_key_length + (cipher_block_length - 1))
        / cipher_block_length)
        * cipher_block_length;

    let padding_length = total_payload_length - raw_key_section_length;

    if random_seed.len() < padding_length {
        return Err(Error::InvalidLength);
    }

    let mut payload = Zeroizing::new(Vec::with_capacity(total_payload_length));

    // Key length in bits, 16-bit big endian.
    payload.extend_from_slice(&(8 * key_len as u16).to_be_bytes());
    payload.extend_from_slice(key);
    payload.extend_from_slice(&random_seed[..padding_length]);

    Ok(payload)
}

/// Extract the wrapped key from a decrypted payload.
///
/// The embedded bit length must be a whole number of bytes, fit inside the
/// payload, and be plausible for the declared algorithm.
pub(crate) fn extract_key_from_payload(
    payload: &[u8],
    algorithm: &str,
) -> Result<Zeroizing<Vec<u8>>, Error> {
    if payload.len() < 2 {
        return Err(Error::InvalidKeyLength);
    }

    let bits = u16::from_be_bytes([payload[0], payload[1]]) as usize;
    if bits == 0 || bits % 8 != 0 {
        return Err(Error::InvalidKeyLength);
    }

    let key_len = bits / 8;
    if 2 + key_len > payload.len() {
        return Err(Error::InvalidKeyLength);
    }
    if !key_length_fits_algorithm(algorithm, key_len) {
        return Err(Error::InvalidKeyLength);
    }

    Ok(Zeroizing::new(payload[2..2 + key_len].to_vec()))
}

/// Whether a clear key length is plausible for the declared algorithm code.
/// Algorithms without fixed symmetric key sizes accept any length that fits
/// the payload.
fn key_length_fits_algorithm(algorithm: &str, key_len: usize) -> bool {
    match algorithm {
        "D" => matches!(key_len, 8 | 16 | 24),
        "T" => matches!(key_len, 16 | 24),
        "A" => matches!(key_len, 16 | 24 | 32),
        _ => true,
    }
}
