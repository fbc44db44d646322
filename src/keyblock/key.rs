//! Wrapped key data model.
//!
//! A [`Key`] carries the attributes bound by a key block header together
//! with the clear key material, when available, and its derived key check
//! value. Clear bytes are owned, wiped on drop, and never shown by the
//! `Debug` representation.

use std::fmt;

use zeroize::Zeroizing;

use super::header::KeyBlockHeader;
use crate::crypto::{aes_kcv, des_kcv, tdes_kcv};
use crate::Error;

/// Key version field of a key block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyVersion {
    /// The field is not used (wire form `00`).
    Unused,
    /// A two-digit version number in `0..=99`.
    ValidNumber(u8),
    /// A key component number in `1..=9` (wire form `c1`..`c9`).
    Component(u8),
}

impl KeyVersion {
    /// Parse the two-character wire form of the key version field.
    pub fn from_wire(s: &str) -> Result<Self, Error> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(Error::InvalidKeyVersion);
        }
        if s == "00" {
            return Ok(Self::Unused);
        }
        if bytes[0] == b'c' {
            return match bytes[1] {
                b'1'..=b'9' => Ok(Self::Component(bytes[1] - b'0')),
                _ => Err(Error::InvalidKeyVersion),
            };
        }
        if bytes.iter().all(u8::is_ascii_digit) {
            let n = s.parse::<u8>().map_err(|_| Error::InvalidKeyVersion)?;
            return Ok(Self::ValidNumber(n));
        }
        Err(Error::InvalidKeyVersion)
    }

    /// Encode the field to its two-character wire form.
    pub fn to_wire(self) -> String {
        match self {
            Self::Unused => "00".to_string(),
            Self::ValidNumber(n) => format!("{:02}", n),
            Self::Component(c) => format!("c{}", c),
        }
    }
}

/// A symmetric key with the metadata a key block binds to it.
///
/// Instances are produced by the block codec: on import the attributes come
/// from the parsed header, and the clear `data` is attached only after the
/// authenticator verifies. The key check value is derived from the material
/// and the declared algorithm, never taken as input.
pub struct Key {
    usage: String,
    algorithm: String,
    mode_of_use: String,
    key_version: KeyVersion,
    exportability: String,
    data: Option<Zeroizing<Vec<u8>>>,
    kcv: Option<[u8; 3]>,
}

impl Key {
    /// Build a metadata-only key from a parsed header.
    pub(crate) fn from_header(header: &KeyBlockHeader) -> Self {
        Self {
            usage: header.key_usage().to_string(),
            algorithm: header.algorithm().to_string(),
            mode_of_use: header.mode_of_use().to_string(),
            key_version: header.key_version(),
            exportability: header.exportability().to_string(),
            data: None,
            kcv: None,
        }
    }

    /// Attach clear key material and derive the key check value.
    ///
    /// The KCV is the first 3 bytes of encrypting the zero block for DES and
    /// TDES keys, and of the CMAC over one zero block for AES keys. Other
    /// algorithms, and material lengths the ciphers cannot take, leave the
    /// KCV absent.
    pub(crate) fn set_data(&mut self, data: &[u8]) {
        self.kcv = match self.algorithm.as_str() {
            "T" | "D" => match data.len() {
                8 => des_kcv(data).ok(),
                16 | 24 => tdes_kcv(data).ok(),
                _ => None,
            },
            "A" => aes_kcv(data).ok(),
            _ => None,
        };
        self.data = Some(Zeroizing::new(data.to_vec()));
    }

    /// Key usage code (2 characters).
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Algorithm code (1 character).
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Mode of use code (1 character).
    pub fn mode_of_use(&self) -> &str {
        &self.mode_of_use
    }

    /// Key version field.
    pub fn key_version(&self) -> KeyVersion {
        self.key_version
    }

    /// Exportability code (1 character).
    pub fn exportability(&self) -> &str {
        &self.exportability
    }

    /// Clear key material, present only after successful unwrapping.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_ref().map(|d| d.as_slice())
    }

    /// Length of the clear key material in bytes, 0 when absent.
    pub fn length(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.len())
    }

    /// Derived 3-byte key check value, when the algorithm defines one.
    pub fn kcv(&self) -> Option<&[u8; 3]> {
        self.kcv.as_ref()
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("usage", &self.usage)
            .field("algorithm", &self.algorithm)
            .field("mode_of_use", &self.mode_of_use)
            .field("key_version", &self.key_version)
            .field("exportability", &self.exportability)
            .field("data", &self.data.as_ref().map(|_| "<redacted>"))
            .field("kcv", &self.kcv.map(hex::encode_upper))
            .finish()
    }
}
