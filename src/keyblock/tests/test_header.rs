use crate::keyblock::*;
use crate::Error;

#[test]
fn test_new_empty() {
    let header = KeyBlockHeader::new_empty();
    assert_eq!(header.version_id(), "");
    assert_eq!(header.kb_length(), 0);
    assert_eq!(header.key_usage(), "");
    assert_eq!(header.algorithm(), "");
    assert_eq!(header.mode_of_use(), "");
    assert_eq!(header.key_version(), KeyVersion::Unused);
    assert_eq!(header.exportability(), "");
    assert_eq!(header.num_optional_blocks(), 0);
    assert_eq!(header.reserved_field(), "00");
}

#[test]
fn test_new_with_values() {
    let header = KeyBlockHeader::new_with_values("B", "B0", "T", "X", "12", "S").unwrap();
    assert_eq!(header.version_id(), "B");
    assert_eq!(header.key_usage(), "B0");
    assert_eq!(header.algorithm(), "T");
    assert_eq!(header.mode_of_use(), "X");
    assert_eq!(header.key_version(), KeyVersion::ValidNumber(12));
    assert_eq!(header.exportability(), "S");
    assert_eq!(header.len(), 16);
    assert_eq!(header.block_size(), 8);
}

#[test]
fn test_new_with_values_rejects_invalid_fields() {
    assert_eq!(
        KeyBlockHeader::new_with_values("X", "P0", "A", "E", "00", "E").unwrap_err(),
        Error::UnsupportedVersion
    );
    assert_eq!(
        KeyBlockHeader::new_with_values("D", "Z9", "A", "E", "00", "E").unwrap_err(),
        Error::UnsupportedKeyUsage
    );
    assert_eq!(
        KeyBlockHeader::new_with_values("D", "P0", "Q", "E", "00", "E").unwrap_err(),
        Error::UnsupportedAlgorithm
    );
    assert_eq!(
        KeyBlockHeader::new_with_values("D", "P0", "A", "Q", "00", "E").unwrap_err(),
        Error::UnsupportedModeOfUse
    );
    assert_eq!(
        KeyBlockHeader::new_with_values("D", "P0", "A", "E", "c0", "E").unwrap_err(),
        Error::InvalidKeyVersion
    );
    assert_eq!(
        KeyBlockHeader::new_with_values("D", "P0", "A", "E", "ab", "E").unwrap_err(),
        Error::InvalidKeyVersion
    );
    assert_eq!(
        KeyBlockHeader::new_with_values("D", "P0", "A", "E", "00", "X").unwrap_err(),
        Error::UnsupportedExportability
    );
}

#[test]
fn test_new_from_str_with_optional_block() {
    let header = KeyBlockHeader::new_from_str("D0048P0TE00N0100KS1800604B120F9292800000").unwrap();

    assert_eq!(header.version_id(), "D");
    assert_eq!(header.kb_length(), 48);
    assert_eq!(header.key_usage(), "P0");
    assert_eq!(header.algorithm(), "T");
    assert_eq!(header.mode_of_use(), "E");
    assert_eq!(header.key_version(), KeyVersion::Unused);
    assert_eq!(header.exportability(), "N");
    assert_eq!(header.num_optional_blocks(), 1);
    assert_eq!(header.len(), 40);
    assert_eq!(header.block_size(), 16);

    let opt_block = header.opt_blocks().as_deref().unwrap();
    assert_eq!(opt_block.id(), "KS");
    assert_eq!(opt_block.data(), "00604B120F9292800000");
    assert!(opt_block.next().is_none());
}

#[test]
fn test_new_from_str_key_version_component() {
    let header = KeyBlockHeader::new_from_str("D0016P0AEc2E0000").unwrap();
    assert_eq!(header.key_version(), KeyVersion::Component(2));
}

#[test]
fn test_new_from_str_errors() {
    // Too short for the fixed header.
    assert_eq!(
        KeyBlockHeader::new_from_str("D0016P0AE00E").unwrap_err(),
        Error::InvalidLength
    );

    // Length field must be decimal digits.
    assert_eq!(
        KeyBlockHeader::new_from_str("DABCDP0AE00E0000").unwrap_err(),
        Error::InvalidLength
    );

    // Optional block count must be decimal digits.
    assert_eq!(
        KeyBlockHeader::new_from_str("D0016P0AE00EXX00").unwrap_err(),
        Error::InvalidOptionalBlock
    );

    // Reserved field must be "00".
    assert_eq!(
        KeyBlockHeader::new_from_str("D0016P0AE00E0001").unwrap_err(),
        Error::InvalidCharacter
    );

    // Character set is printable ASCII.
    assert_eq!(
        KeyBlockHeader::new_from_str("D0016P0AE00E00\t0").unwrap_err(),
        Error::InvalidCharacter
    );

    // Declared optional blocks must actually parse.
    assert_eq!(
        KeyBlockHeader::new_from_str("D0016P0AE00E0100").unwrap_err(),
        Error::InvalidOptionalBlock
    );
}

#[test]
fn test_export_str_with_padding_block() {
    let mut header = KeyBlockHeader::new_with_values("D", "P0", "A", "E", "00", "E").unwrap();
    let opt_block = OptBlock::new("CT", "SomeData", None).unwrap();
    header.set_opt_blocks(Some(Box::new(opt_block)));

    header.finalize().unwrap();
    assert_eq!(header.num_optional_blocks(), 2);
    assert_eq!(header.len() % header.block_size(), 0);

    let header_length = header.len();
    header.set_kb_length(header_length as u16).unwrap();

    let header_str = header.export_str().unwrap();
    assert_eq!(header_str, "D0048P0AE00E0200CT0CSomeDataPB140000000000000000");

    // Parsing the exported string yields the same header.
    let reparsed = KeyBlockHeader::new_from_str(&header_str).unwrap();
    assert_eq!(reparsed, header);
}

#[test]
fn test_finalize_without_opt_blocks_is_noop() {
    let mut header = KeyBlockHeader::new_with_values("A", "P0", "T", "E", "00", "E").unwrap();
    header.finalize().unwrap();
    assert_eq!(header.len(), 16);
    assert_eq!(header.num_optional_blocks(), 0);
}

#[test]
fn test_finalize_aligned_region_is_noop() {
    // 16 + 24 is already a multiple of the TDES block size.
    let mut header = KeyBlockHeader::new_with_values("B", "B0", "T", "X", "12", "S").unwrap();
    let opt_block = OptBlock::new("KS", "00604B120F9292800000", None).unwrap();
    header.set_opt_blocks(Some(Box::new(opt_block)));

    header.finalize().unwrap();
    assert_eq!(header.num_optional_blocks(), 1);
    assert_eq!(header.len(), 40);
}

#[test]
fn test_finalize_refuses_second_padding_block() {
    let mut header = KeyBlockHeader::new_with_values("D", "P0", "A", "E", "00", "E").unwrap();
    let opt_block = OptBlock::new("PB", "AB", None).unwrap();
    header.set_opt_blocks(Some(Box::new(opt_block)));

    assert_eq!(header.finalize().unwrap_err(), Error::InvalidOptionalBlock);
}

#[test]
fn test_set_kb_length_limit() {
    let mut header = KeyBlockHeader::new_empty();
    assert!(header.set_kb_length(9999).is_ok());
    assert_eq!(header.set_kb_length(10000).unwrap_err(), Error::InvalidLength);
}
