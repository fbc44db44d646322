//! Key block headers.
//!
//! This module provides the `KeyBlockHeader` struct, essential for
//! constructing and interpreting interchange key blocks. The header of a key
//! block carries attribute information about the key in uppercase-leaning
//! printable ASCII, so that a block remains readable and loggable end to
//! end. The encoding and acceptable characters for each field are defined
//! individually by the standard.
//!
//! # Header fields
//! - **Byte 0**: Key block version ID (`A`, `B`, `C` or `D`).
//! - **Bytes 1-4**: Key block length, decimal, zero padded, covering the
//!   whole block (header, optional blocks, encrypted data and MAC).
//! - **Bytes 5-6**: Key usage.
//! - **Byte 7**: Algorithm.
//! - **Byte 8**: Mode of use.
//! - **Bytes 9-10**: Key version field.
//! - **Byte 11**: Exportability.
//! - **Bytes 12-13**: Number of optional blocks, decimal.
//! - **Bytes 14-15**: Reserved, `00`.
//! - **Bytes 16+**: Optional blocks, if present.
//!
//! # Example
//! ```
//! use keysec::keyblock::{KeyBlockHeader, OptBlock};
//!
//! // A header with one optional block, finalized to the cipher block size.
//! let mut header = KeyBlockHeader::new_with_values("D", "P0", "A", "E", "00", "E").unwrap();
//! let opt_block = OptBlock::new("CT", "SomeData", None).unwrap();
//! header.set_opt_blocks(Some(Box::new(opt_block)));
//! header.finalize().unwrap();
//!
//! // For the example, declare the block length to be the header length.
//! let header_length = header.len();
//! header.set_kb_length(header_length as u16).unwrap();
//!
//! let header_str = header.export_str().unwrap();
//! assert_eq!(header_str, "D0048P0AE00E0200CT0CSomeDataPB140000000000000000");
//! ```

use super::constants::{
    ALLOWED_ALGORITHMS, ALLOWED_EXPORTABILITIES, ALLOWED_KEY_USAGES, ALLOWED_MODES_OF_USE,
    ALLOWED_VERSION_IDS,
};
use super::key::KeyVersion;
use super::opt_block::OptBlock;
use crate::utils::is_ascii_printable;
use crate::Error;

/// Fixed part of the header in bytes.
const FIXED_HEADER_LEN: usize = 16;

/// Upper bound of the four-digit decimal length field.
const MAX_KB_LENGTH: u16 = 9999;

/// Header of an interchange key block.
///
/// Encapsulates the attribute fields that the wrap profiles authenticate
/// together with the encrypted payload, plus the chain of optional blocks.
/// Setters validate each field against the attribute dictionaries; a header
/// assembled through them always serializes to a well-formed wire string.
#[derive(Debug, PartialEq)]
pub struct KeyBlockHeader {
    version_id: String,
    kb_length: u16,
    key_usage: String,
    algorithm: String,
    mode_of_use: String,
    key_version: KeyVersion,
    exportability: String,
    num_opt_blocks: u8,
    reserved_field: String,
    opt_blocks: Option<Box<OptBlock>>,
}

impl KeyBlockHeader {
    /// Create a new, empty `KeyBlockHeader`.
    ///
    /// String fields start empty, the key version starts unused, and no
    /// optional blocks are attached.
    pub fn new_empty() -> Self {
        Self {
            version_id: String::new(),
            kb_length: 0,
            key_usage: String::new(),
            algorithm: String::new(),
            mode_of_use: String::new(),
            key_version: KeyVersion::Unused,
            exportability: String::new(),
            num_opt_blocks: 0,
            reserved_field: "00".to_string(),
            opt_blocks: None,
        }
    }

    /// Create a new `KeyBlockHeader` from the given field values, validating
    /// each of them. The block length starts at 0 and is filled in when the
    /// block is wrapped.
    pub fn new_with_values(
        version_id: &str,
        key_usage: &str,
        algorithm: &str,
        mode_of_use: &str,
        key_version: &str,
        exportability: &str,
    ) -> Result<Self, Error> {
        let mut header = Self::new_empty();
        header.set_version_id(version_id)?;
        header.set_key_usage(key_usage)?;
        header.set_algorithm(algorithm)?;
        header.set_mode_of_use(mode_of_use)?;
        header.set_key_version(key_version)?;
        header.set_exportability(exportability)?;

        Ok(header)
    }

    /// Parse a `KeyBlockHeader` from the start of a key block string.
    ///
    /// The input may be a complete key block; characters after the header
    /// region (the encrypted payload and MAC) are left untouched. Optional
    /// blocks are parsed according to the declared count.
    pub fn new_from_str(header_str: &str) -> Result<Self, Error> {
        if header_str.len() < FIXED_HEADER_LEN {
            return Err(Error::InvalidLength);
        }
        if !is_ascii_printable(header_str) {
            return Err(Error::InvalidCharacter);
        }

        let kb_length_str = &header_str[1..5];
        if !kb_length_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidLength);
        }
        let kb_length = kb_length_str
            .parse::<u16>()
            .map_err(|_| Error::InvalidLength)?;

        let num_opt_blocks_str = &header_str[12..14];
        if !num_opt_blocks_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidOptionalBlock);
        }
        let num_opt_blocks = num_opt_blocks_str
            .parse::<u8>()
            .map_err(|_| Error::InvalidOptionalBlock)?;

        let mut header = Self::new_empty();
        header.set_version_id(&header_str[0..1])?;
        header.set_kb_length(kb_length)?;
        header.set_key_usage(&header_str[5..7])?;
        header.set_algorithm(&header_str[7..8])?;
        header.set_mode_of_use(&header_str[8..9])?;
        header.set_key_version(&header_str[9..11])?;
        header.set_exportability(&header_str[11..12])?;
        header.set_num_optional_blocks(num_opt_blocks)?;
        header.set_reserved_field(&header_str[14..16])?;

        if num_opt_blocks > 0 {
            let opt_block_str = &header_str[FIXED_HEADER_LEN..];
            let opt_blocks = OptBlock::new_from_str(opt_block_str, num_opt_blocks as usize)?;
            header.opt_blocks = Some(Box::new(opt_blocks));
        }

        Ok(header)
    }

    /// Serialize the header, including optional blocks, to its wire string.
    ///
    /// All attribute fields must be assigned and the block length must be
    /// set; the block codec backfills the length before calling this.
    pub fn export_str(&self) -> Result<String, Error> {
        if self.version_id.is_empty()
            || self.key_usage.is_empty()
            || self.algorithm.is_empty()
            || self.mode_of_use.is_empty()
            || self.exportability.is_empty()
            || self.kb_length == 0
        {
            return Err(Error::Internal);
        }

        let mut header_str = String::with_capacity(self.len());

        header_str.push_str(&self.version_id);
        header_str.push_str(&format!("{:04}", self.kb_length));
        header_str.push_str(&self.key_usage);
        header_str.push_str(&self.algorithm);
        header_str.push_str(&self.mode_of_use);
        header_str.push_str(&self.key_version.to_wire());
        header_str.push_str(&self.exportability);
        header_str.push_str(&format!("{:02}", self.num_opt_blocks));
        header_str.push_str(&self.reserved_field);

        if let Some(ref opt_blocks) = self.opt_blocks {
            header_str.push_str(&opt_blocks.export_str()?);
        }

        Ok(header_str)
    }

    /// Set the version ID; must be one of the allowed version IDs.
    pub fn set_version_id(&mut self, value: &str) -> Result<(), Error> {
        if ALLOWED_VERSION_IDS.contains(&value) {
            self.version_id = value.to_string();
            Ok(())
        } else {
            Err(Error::UnsupportedVersion)
        }
    }

    /// Get the version ID of the key block header.
    pub fn version_id(&self) -> &str {
        &self.version_id
    }

    /// Set the key block length; at most four decimal digits.
    pub fn set_kb_length(&mut self, value: u16) -> Result<(), Error> {
        if value > MAX_KB_LENGTH {
            Err(Error::InvalidLength)
        } else {
            self.kb_length = value;
            Ok(())
        }
    }

    /// Get the key block length.
    pub fn kb_length(&self) -> u16 {
        self.kb_length
    }

    /// Set the key usage; must be one of the allowed usage codes.
    pub fn set_key_usage(&mut self, value: &str) -> Result<(), Error> {
        if ALLOWED_KEY_USAGES.contains(&value) {
            self.key_usage = value.to_string();
            Ok(())
        } else {
            Err(Error::UnsupportedKeyUsage)
        }
    }

    /// Get the key usage of the key block header.
    pub fn key_usage(&self) -> &str {
        &self.key_usage
    }

    /// Set the algorithm; must be one of the allowed algorithm codes.
    pub fn set_algorithm(&mut self, value: &str) -> Result<(), Error> {
        if ALLOWED_ALGORITHMS.contains(&value) {
            self.algorithm = value.to_string();
            Ok(())
        } else {
            Err(Error::UnsupportedAlgorithm)
        }
    }

    /// Get the algorithm of the key block header.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Set the mode of use; must be one of the allowed mode codes.
    pub fn set_mode_of_use(&mut self, value: &str) -> Result<(), Error> {
        if ALLOWED_MODES_OF_USE.contains(&value) {
            self.mode_of_use = value.to_string();
            Ok(())
        } else {
            Err(Error::UnsupportedModeOfUse)
        }
    }

    /// Get the mode of use of the key block header.
    pub fn mode_of_use(&self) -> &str {
        &self.mode_of_use
    }

    /// Set the key version field from its two-character wire form.
    pub fn set_key_version(&mut self, value: &str) -> Result<(), Error> {
        self.key_version = KeyVersion::from_wire(value)?;
        Ok(())
    }

    /// Get the key version field.
    pub fn key_version(&self) -> KeyVersion {
        self.key_version
    }

    /// Set the exportability; must be one of the allowed codes.
    pub fn set_exportability(&mut self, value: &str) -> Result<(), Error> {
        if ALLOWED_EXPORTABILITIES.contains(&value) {
            self.exportability = value.to_string();
            Ok(())
        } else {
            Err(Error::UnsupportedExportability)
        }
    }

    /// Get the exportability of the key block header.
    pub fn exportability(&self) -> &str {
        &self.exportability
    }

    /// Set the number of optional blocks; the field carries two decimal
    /// digits.
    pub fn set_num_optional_blocks(&mut self, value: u8) -> Result<(), Error> {
        if value > 99 {
            return Err(Error::InvalidOptionalBlock);
        }
        self.num_opt_blocks = value;
        Ok(())
    }

    /// Get the number of optional blocks in the key block header.
    pub fn num_optional_blocks(&self) -> u8 {
        self.num_opt_blocks
    }

    /// Set the reserved field, which must be `00`.
    pub fn set_reserved_field(&mut self, value: &str) -> Result<(), Error> {
        if value == "00" {
            self.reserved_field = value.to_string();
            Ok(())
        } else {
            Err(Error::InvalidCharacter)
        }
    }

    /// Get the value of the reserved field in the key block header.
    pub fn reserved_field(&self) -> &str {
        &self.reserved_field
    }

    /// Set the optional blocks and update the optional block count from the
    /// chain length.
    pub fn set_opt_blocks(&mut self, opt_blocks: Option<Box<OptBlock>>) {
        self.opt_blocks = opt_blocks;
        self.num_opt_blocks = match &self.opt_blocks {
            Some(opt_block) => opt_block.count() as u8,
            None => 0,
        };
    }

    /// Get a reference to the optional blocks.
    pub fn opt_blocks(&self) -> &Option<Box<OptBlock>> {
        &self.opt_blocks
    }

    /// Header length in bytes, optional blocks included.
    pub fn len(&self) -> usize {
        let mut header_length = FIXED_HEADER_LEN;

        if let Some(ref opt_blocks) = self.opt_blocks {
            header_length += opt_blocks.total_length();
        }

        header_length
    }

    /// Whether the header carries nothing beyond the fixed region.
    pub fn is_empty(&self) -> bool {
        self.opt_blocks.is_none()
    }

    /// Cipher block length in bytes of the encryption profile this header's
    /// version uses.
    pub fn block_size(&self) -> usize {
        if self.version_id == "D" {
            16
        } else {
            8
        }
    }

    /// Pad the optional block region to the cipher block size.
    ///
    /// When optional blocks are present and the header length is not a
    /// multiple of the block size, a single `PB` block of `0` characters is
    /// appended and the block count updated. A header that already carries a
    /// `PB` block is never padded twice; if such a header is misaligned the
    /// call fails.
    pub fn finalize(&mut self) -> Result<(), Error> {
        let block_size = self.block_size();
        let header_length = self.len();

        if let Some(ref mut opt_blocks) = self.opt_blocks {
            if header_length % block_size != 0 {
                if opt_blocks.contains_id("PB") {
                    return Err(Error::InvalidOptionalBlock);
                }

                let mut padding_needed = block_size - (header_length % block_size);

                // The padding block needs room for its own ID and length
                // field plus at least two fill characters.
                if padding_needed < 6 {
                    padding_needed += block_size;
                }

                let padding_data = "0".repeat(padding_needed - 4);
                let padding_block = OptBlock::new("PB", &padding_data, None)?;

                opt_blocks.append(padding_block);
                self.num_opt_blocks += 1;
            }
        }

        Ok(())
    }
}
