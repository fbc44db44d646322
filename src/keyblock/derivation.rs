//! Derivation of the key block encryption key (KBEK) and key block
//! authentication key (KBAK) from the key block protection key (KBPK).
//!
//! Versions A and C use the key variant binding method: a fixed byte XORed
//! over the KBPK per derived key. Versions B and D use the key derivation
//! binding method: a CMAC under the KBPK over fixed derivation inputs of the
//! form `counter | purpose | separator | algorithm | key bits`, one input
//! per output block, concatenated and truncated to the KBPK length. Both
//! derived keys are wiped when dropped.

use zeroize::Zeroizing;

use crate::crypto::{aes_cmac, tdes_cmac};
use crate::utils::xor_byte_arrays;
use crate::Error;

pub(crate) type DerivedKeys = (Zeroizing<Vec<u8>>, Zeroizing<Vec<u8>>);

// Key variant binding method constants.
const KBEK_VARIANT_XOR: u8 = 0x45;
const KBAK_VARIANT_XOR: u8 = 0x4D;

// Derivation inputs for the TDEA key derivation binding method.

// Double-length TDES (128 bit)
const TDES_128_KDI_KBEK: [[u8; 8]; 2] = [
    [0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80],
    [0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80],
];
const TDES_128_KDI_KBAK: [[u8; 8]; 2] = [
    [0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x80],
    [0x02, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x80],
];

// Triple-length TDES (192 bit)
const TDES_192_KDI_KBEK: [[u8; 8]; 3] = [
    [0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0xC0],
    [0x02, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0xC0],
    [0x03, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0xC0],
];
const TDES_192_KDI_KBAK: [[u8; 8]; 3] = [
    [0x01, 0x00, 0x01, 0x00, 0x00, 0x01, 0x00, 0xC0],
    [0x02, 0x00, 0x01, 0x00, 0x00, 0x01, 0x00, 0xC0],
    [0x03, 0x00, 0x01, 0x00, 0x00, 0x01, 0x00, 0xC0],
];

// Derivation inputs for the AES key derivation binding method.

// AES 128 bit
const AES_128_KDI_KBEK: [[u8; 8]; 1] = [[0x01, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x80]];
const AES_128_KDI_KBAK: [[u8; 8]; 1] = [[0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x00, 0x80]];

// AES 192 bit
const AES_192_KDI_KBEK: [[u8; 8]; 2] = [
    [0x01, 0x00, 0x00, 0x00, 0x00, 0x03, 0x00, 0xC0],
    [0x02, 0x00, 0x00, 0x00, 0x00, 0x03, 0x00, 0xC0],
];
const AES_192_KDI_KBAK: [[u8; 8]; 2] = [
    [0x01, 0x00, 0x01, 0x00, 0x00, 0x03, 0x00, 0xC0],
    [0x02, 0x00, 0x01, 0x00, 0x00, 0x03, 0x00, 0xC0],
];

// AES 256 bit
const AES_256_KDI_KBEK: [[u8; 8]; 2] = [
    [0x01, 0x00, 0x00, 0x00, 0x00, 0x04, 0x01, 0x00],
    [0x02, 0x00, 0x00, 0x00, 0x00, 0x04, 0x01, 0x00],
];
const AES_256_KDI_KBAK: [[u8; 8]; 2] = [
    [0x01, 0x00, 0x01, 0x00, 0x00, 0x04, 0x01, 0x00],
    [0x02, 0x00, 0x01, 0x00, 0x00, 0x04, 0x01, 0x00],
];

/// Derive KBEK and KBAK with the key variant binding method (versions 'A'
/// and 'C'): each derived key is the KBPK XORed with a repeated constant.
pub(crate) fn derive_keys_variant(kbpk: &[u8]) -> Result<DerivedKeys, Error> {
    if kbpk.len() != 16 && kbpk.len() != 24 {
        return Err(Error::UnsupportedKbpkLength);
    }

    let kbek = xor_byte_arrays(kbpk, &vec![KBEK_VARIANT_XOR; kbpk.len()])?;
    let kbak = xor_byte_arrays(kbpk, &vec![KBAK_VARIANT_XOR; kbpk.len()])?;

    Ok((Zeroizing::new(kbek), Zeroizing::new(kbak)))
}

/// Derive KBEK and KBAK for key block version 'B' using TDES-CMAC as the
/// pseudorandom function. The derived keys have the length of the KBPK.
pub(crate) fn derive_keys_version_b(kbpk: &[u8]) -> Result<DerivedKeys, Error> {
    let (kbek_inputs, kbak_inputs): (&[[u8; 8]], &[[u8; 8]]) = match kbpk.len() {
        16 => (&TDES_128_KDI_KBEK, &TDES_128_KDI_KBAK),
        24 => (&TDES_192_KDI_KBEK, &TDES_192_KDI_KBAK),
        _ => return Err(Error::UnsupportedKbpkLength),
    };

    Ok((
        derive_tdes_key(kbpk, kbek_inputs)?,
        derive_tdes_key(kbpk, kbak_inputs)?,
    ))
}

/// Derive KBEK and KBAK for key block version 'D' using AES-CMAC as the
/// pseudorandom function. The derived keys have the length of the KBPK; for
/// 192-bit keys the concatenated CMAC output is truncated.
pub(crate) fn derive_keys_version_d(kbpk: &[u8]) -> Result<DerivedKeys, Error> {
    let (kbek_inputs, kbak_inputs): (&[[u8; 8]], &[[u8; 8]]) = match kbpk.len() {
        16 => (&AES_128_KDI_KBEK, &AES_128_KDI_KBAK),
        24 => (&AES_192_KDI_KBEK, &AES_192_KDI_KBAK),
        32 => (&AES_256_KDI_KBEK, &AES_256_KDI_KBAK),
        _ => return Err(Error::UnsupportedKbpkLength),
    };

    Ok((
        derive_aes_key(kbpk, kbek_inputs)?,
        derive_aes_key(kbpk, kbak_inputs)?,
    ))
}

fn derive_tdes_key(kbpk: &[u8], inputs: &[[u8; 8]]) -> Result<Zeroizing<Vec<u8>>, Error> {
    let mut key = Zeroizing::new(Vec::with_capacity(kbpk.len()));
    for input in inputs {
        key.extend_from_slice(&tdes_cmac(kbpk, input)?);
    }
    key.truncate(kbpk.len());
    Ok(key)
}

fn derive_aes_key(kbpk: &[u8], inputs: &[[u8; 8]]) -> Result<Zeroizing<Vec<u8>>, Error> {
    let mut key = Zeroizing::new(Vec::with_capacity(kbpk.len()));
    for input in inputs {
        key.extend_from_slice(&aes_cmac(kbpk, input)?);
    }
    key.truncate(kbpk.len());
    Ok(key)
}
