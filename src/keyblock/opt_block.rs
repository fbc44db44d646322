//! Optional blocks of a key block header.
//!
//! Optional blocks carry additional, tagged data inside the header region of
//! a key block. Each block is identified by a two-character ASCII ID and can
//! be linked to the next block to form a chain of data segments, preserved
//! in wire order.
//!
//! # Format
//!
//! An optional block consists of:
//! - An identifier (`id`): a two-character ASCII string identifying the type
//!   of data.
//! - A length field covering the whole block: a two-byte hex-ASCII value for
//!   blocks below 256 bytes, or the extended form `00` + length-of-length +
//!   length for larger blocks.
//! - A data field (`data`): a variable-length string of ASCII printable
//!   characters, stored exactly as it appears on the wire.

use std::fmt::Write;

use super::constants::ALLOWED_OPT_BLOCK_IDS;
use crate::utils::is_ascii_printable;
use crate::Error;

/// An optional block of a key block header.
///
/// The `length` field is the total encoded size of the block in bytes,
/// including the ID and length fields themselves; it is derived from the
/// data and never set directly. The `next` field chains blocks in wire
/// order.
#[derive(Debug, PartialEq, Clone)]
pub struct OptBlock {
    id: String,
    data: String,
    length: usize,
    next: Option<Box<OptBlock>>,
}

impl OptBlock {
    /// Largest encodable block size; the extended length field carries at
    /// most four hex digits on emit.
    const MAX_LENGTH: usize = 65535;

    /// Create a new `OptBlock` with the given `id`, `data` and optional
    /// `next` block.
    pub fn new(id: &str, data: &str, next: Option<OptBlock>) -> Result<Self, Error> {
        let mut opt_block = Self::new_empty();
        opt_block.set_id(id)?;
        opt_block.set_data(data)?;
        opt_block.set_next(next);
        Ok(opt_block)
    }

    /// Create a new empty `OptBlock`.
    pub fn new_empty() -> Self {
        Self {
            id: String::new(),
            data: String::new(),
            length: 0,
            next: None,
        }
    }

    /// Parse a chain of `num_opt_blocks` optional blocks from the start of
    /// `s`. Trailing characters beyond the parsed chain are ignored; the
    /// caller decides what they belong to.
    pub fn new_from_str(s: &str, num_opt_blocks: usize) -> Result<Self, Error> {
        if s.len() < 4 {
            return Err(Error::InvalidOptionalBlock);
        }

        let mut opt_block = Self::new_empty();
        opt_block.set_id(&s[..2])?;

        // The wire length is needed to locate the next block even when the
        // stored canonical length differs (non-canonical extended input).
        let wire_length;
        let data_start;
        if &s[2..4] == "00" {
            // Extended form: the length of the length field in bytes, then
            // the length itself with two hex digits per byte.
            if s.len() < 6 {
                return Err(Error::InvalidOptionalBlock);
            }
            let lenlen = usize::from_str_radix(&s[4..6], 16)
                .map_err(|_| Error::InvalidOptionalBlock)?;
            let len_digits = 2 * lenlen;
            if lenlen == 0 || s.len() < 6 + len_digits {
                return Err(Error::InvalidOptionalBlock);
            }
            wire_length = usize::from_str_radix(&s[6..6 + len_digits], 16)
                .map_err(|_| Error::InvalidOptionalBlock)?;
            data_start = 6 + len_digits;
        } else {
            wire_length = Self::len_from_str(&s[2..4])?;
            data_start = 4;
        }

        if wire_length < data_start || s.len() < wire_length {
            return Err(Error::InvalidOptionalBlock);
        }

        opt_block.set_data(&s[data_start..wire_length])?;

        // Parse the next block if more than one block is expected.
        if num_opt_blocks > 1 {
            let next_block = OptBlock::new_from_str(&s[wire_length..], num_opt_blocks - 1)?;
            opt_block.set_next(Some(next_block));
        }

        Ok(opt_block)
    }

    /// Serialize the `OptBlock` chain to its wire representation.
    ///
    /// Blocks below 256 bytes use the two-digit length form; larger blocks
    /// use the extended form with a four-digit length.
    pub fn export_str(&self) -> Result<String, Error> {
        if self.length < 4 {
            // An uninitialized block has nothing to serialize.
            return Err(Error::InvalidOptionalBlock);
        }

        let mut res = String::new();

        res.push_str(&self.id);

        if self.length < 256 {
            write!(&mut res, "{:02X}", self.length).map_err(|_| Error::Internal)?;
        } else {
            write!(&mut res, "0002{:04X}", self.length).map_err(|_| Error::Internal)?;
        }

        res.push_str(&self.data);

        if let Some(next) = &self.next {
            res.push_str(&next.export_str()?);
        }

        Ok(res)
    }

    /// Set the identifier, which must be one of the allowed optional block
    /// IDs.
    pub fn set_id(&mut self, id: &str) -> Result<(), Error> {
        if Self::is_allowed_id(id) {
            self.id = id.to_string();
            Ok(())
        } else {
            Err(Error::InvalidOptionalBlock)
        }
    }

    /// Return the ID of the `OptBlock`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set the data field and recompute the block length.
    ///
    /// The ID must be set first because the length covers it. Data is
    /// restricted to printable ASCII.
    pub fn set_data(&mut self, data: &str) -> Result<(), Error> {
        if self.id.len() != 2 {
            return Err(Error::InvalidOptionalBlock);
        }
        if !is_ascii_printable(data) {
            return Err(Error::InvalidCharacter);
        }
        self.data = data.to_string();
        self.set_length()
    }

    /// Return the data of the `OptBlock`.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Recompute the total block length from the ID and data. Blocks whose
    /// encoding would not fit the two-digit length field gain the six extra
    /// characters of the extended length form.
    fn set_length(&mut self) -> Result<(), Error> {
        let min_len = self.id.len() + 2 + self.data.len();
        if min_len < 256 {
            self.length = min_len;
        } else {
            self.length = min_len + 6;
        }
        if self.length > Self::MAX_LENGTH {
            self.length = 0;
            return Err(Error::InvalidOptionalBlock);
        }
        Ok(())
    }

    /// Return the total encoded length of this block alone.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Set the next optional block.
    pub fn set_next(&mut self, next_block: Option<OptBlock>) {
        self.next = next_block.map(Box::new);
    }

    /// Return the next `OptBlock` in the chain, if any.
    pub fn next(&self) -> Option<&OptBlock> {
        self.next.as_deref()
    }

    /// Append an `OptBlock` to the end of the chain.
    pub fn append(&mut self, opt_block_to_append: OptBlock) {
        match &mut self.next {
            Some(next_block) => next_block.append(opt_block_to_append),
            None => self.set_next(Some(opt_block_to_append)),
        }
    }

    /// Whether any block in the chain carries the given ID.
    pub fn contains_id(&self, id: &str) -> bool {
        if self.id == id {
            return true;
        }
        match &self.next {
            Some(next) => next.contains_id(id),
            None => false,
        }
    }

    /// Number of blocks in the chain, this one included.
    pub fn count(&self) -> usize {
        1 + self.next.as_ref().map_or(0, |next| next.count())
    }

    /// Whether the given `id` string is an allowed optional block ID.
    pub fn is_allowed_id(id: &str) -> bool {
        ALLOWED_OPT_BLOCK_IDS.contains(&id)
    }

    /// Total encoded length of this block and all subsequent blocks in the
    /// chain.
    pub fn total_length(&self) -> usize {
        let mut total = self.length;
        if let Some(next) = &self.next {
            total += next.total_length();
        }
        total
    }

    /// Parse the two-digit hex length field of an optional block.
    fn len_from_str(s: &str) -> Result<usize, Error> {
        if s.len() != 2 {
            return Err(Error::InvalidOptionalBlock);
        }

        let len = usize::from_str_radix(s, 16).map_err(|_| Error::InvalidOptionalBlock)?;

        // ID and length field alone take four characters.
        if len < 4 {
            return Err(Error::InvalidOptionalBlock);
        }

        Ok(len)
    }
}
