use crate::keyblock::*;
use crate::Error;

#[test]
fn test_new_empty_creates_empty_opt_block() {
    let opt_block = OptBlock::new_empty();

    assert!(opt_block.id().is_empty(), "ID should be empty");
    assert!(opt_block.data().is_empty(), "Data should be empty");
    assert_eq!(opt_block.length(), 0, "Length should be 0");
    assert!(opt_block.next().is_none(), "Next should be None");
}

#[test]
fn test_new_with_values() {
    // An OptBlock without a next block.
    let opt_block_1 = OptBlock::new("PB", "FFFF", None).unwrap();
    assert_eq!(opt_block_1.id(), "PB");
    assert_eq!(opt_block_1.data(), "FFFF");
    assert_eq!(opt_block_1.length(), 8);
    assert!(opt_block_1.next().is_none());

    // Another OptBlock with opt_block_1 as the next block.
    let opt_block_1_copy = opt_block_1.clone();
    let opt_block_2 = OptBlock::new("CT", "1234", Some(opt_block_1)).unwrap();
    assert_eq!(opt_block_2.id(), "CT");
    assert_eq!(opt_block_2.data(), "1234");
    assert_eq!(opt_block_2.length(), 8);
    assert_eq!(*opt_block_2.next().unwrap(), opt_block_1_copy);
}

#[test]
fn test_new_with_values_invalid_id() {
    let opt_block = OptBlock::new("xx", "FFFF", None);
    assert_eq!(opt_block.unwrap_err(), Error::InvalidOptionalBlock);
}

#[test]
fn test_new_with_values_invalid_data() {
    let opt_block = OptBlock::new("PB", "ÿÿÿÿ", None);
    assert_eq!(opt_block.unwrap_err(), Error::InvalidCharacter);
}

#[test]
fn test_new_from_string_one_optional_block() {
    let s = "CT0C11223344";
    let expected_opt_block = OptBlock::new("CT", "11223344", None).unwrap();
    let result = OptBlock::new_from_str(s, 1).unwrap();
    assert_eq!(result, expected_opt_block);
}

#[test]
fn test_new_from_string_two_optional_blocks() {
    let s = "CT0C11223344HM0E5566778899";
    let mut expected_block1 = OptBlock::new("CT", "11223344", None).unwrap();
    let expected_block2 = OptBlock::new("HM", "5566778899", None).unwrap();
    expected_block1.set_next(Some(expected_block2));
    let result = OptBlock::new_from_str(s, 2).unwrap();
    assert_eq!(result, expected_block1);
}

#[test]
fn test_new_from_string_extended_optional_block() {
    // 2 (ID) + 2 ("00") + 2 (length of length) + 4 (length) + 246 = 256.
    let mut s = "CT00020100".to_owned();
    let data = "F".repeat(246);
    s += &data;
    let expected_opt_block = OptBlock::new("CT", &data, None).unwrap();
    let result = OptBlock::new_from_str(&s, 1).unwrap();
    assert_eq!(result, expected_opt_block);
}

#[test]
fn test_new_from_string_extended_block_followed_by_short_block() {
    let data = "F".repeat(246);
    let s = format!("CT00020100{}PB080000", data);
    let result = OptBlock::new_from_str(&s, 2).unwrap();

    assert_eq!(result.id(), "CT");
    assert_eq!(result.data(), data);
    let next = result.next().unwrap();
    assert_eq!(next.id(), "PB");
    assert_eq!(next.data(), "0000");
}

#[test]
fn test_export_str_short_form() {
    let mut block = OptBlock::new("KS", "00604B120F9292800000", None).unwrap();
    assert_eq!(block.export_str().unwrap(), "KS1800604B120F9292800000");

    block.set_next(Some(OptBlock::new("PB", "0000", None).unwrap()));
    assert_eq!(
        block.export_str().unwrap(),
        "KS1800604B120F9292800000PB080000"
    );
}

#[test]
fn test_export_str_extended_form_round_trip() {
    // 252 data characters push the block over the two-digit length field:
    // 2 + 2 + 252 = 256, plus 6 for the extended length form itself.
    let data = "A".repeat(252);
    let block = OptBlock::new("CT", &data, None).unwrap();
    assert_eq!(block.length(), 262);

    let exported = block.export_str().unwrap();
    assert!(exported.starts_with("CT00020106"));
    assert_eq!(exported.len(), 262);

    let reparsed = OptBlock::new_from_str(&exported, 1).unwrap();
    assert_eq!(reparsed, block);
}

#[test]
fn test_export_str_uninitialized() {
    let block = OptBlock::new_empty();
    assert_eq!(block.export_str().unwrap_err(), Error::InvalidOptionalBlock);
}

#[test]
fn test_new_from_string_errors() {
    // Too short for ID and length field.
    assert_eq!(
        OptBlock::new_from_str("", 1).unwrap_err(),
        Error::InvalidOptionalBlock
    );
    assert_eq!(
        OptBlock::new_from_str("CT", 1).unwrap_err(),
        Error::InvalidOptionalBlock
    );

    // Length field is not hex.
    assert_eq!(
        OptBlock::new_from_str("CTZZ1122", 1).unwrap_err(),
        Error::InvalidOptionalBlock
    );

    // Length smaller than the ID and length field themselves.
    assert_eq!(
        OptBlock::new_from_str("CT031122", 1).unwrap_err(),
        Error::InvalidOptionalBlock
    );

    // String shorter than the declared length.
    assert_eq!(
        OptBlock::new_from_str("CT0C1122", 1).unwrap_err(),
        Error::InvalidOptionalBlock
    );

    // Fewer blocks than expected.
    assert_eq!(
        OptBlock::new_from_str("CT0C11223344", 2).unwrap_err(),
        Error::InvalidOptionalBlock
    );
}

#[test]
fn test_append_count_and_contains_id() {
    let mut block = OptBlock::new("KS", "00604B120F9292800000", None).unwrap();
    block.append(OptBlock::new("TS", "20180601T080000", None).unwrap());
    block.append(OptBlock::new("PB", "00", None).unwrap());

    assert_eq!(block.count(), 3);
    assert!(block.contains_id("PB"));
    assert!(block.contains_id("TS"));
    assert!(!block.contains_id("KC"));

    // 24 + 19 + 6
    assert_eq!(block.total_length(), 49);
}
