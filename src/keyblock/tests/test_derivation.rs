use super::super::derivation::{
    derive_keys_variant, derive_keys_version_b, derive_keys_version_d,
};
use crate::Error;
use hex::decode as hex_decode;

#[test]
fn test_derive_keys_variant() {
    // The variant method is a fixed XOR over the protection key.
    let kbpk = hex_decode("89E88CF7931444F334BD7547FC3F380C").unwrap();
    let (kbek, kbak) = derive_keys_variant(&kbpk).unwrap();

    assert_eq!(*kbek, hex_decode("CCADC9B2D65101B671F83002B97A7D49").unwrap());
    assert_eq!(*kbak, hex_decode("C4A5C1BADE5909BE79F0380AB1727541").unwrap());
}

#[test]
fn test_derive_keys_variant_triple_length() {
    let kbpk = hex_decode("00112233445566778899AABBCCDDEEFF0011223344556677").unwrap();
    let (kbek, kbak) = derive_keys_variant(&kbpk).unwrap();

    assert_eq!(kbek.len(), 24);
    assert_eq!(kbak.len(), 24);
    // kbpk[0] is 0x00, so the first bytes are the variant constants.
    assert_eq!(kbek[0], 0x45);
    assert_eq!(kbak[0], 0x4D);
}

#[test]
fn test_derive_keys_variant_invalid_kbpk_length() {
    assert_eq!(
        derive_keys_variant(&[0u8; 8]).unwrap_err(),
        Error::UnsupportedKbpkLength
    );
    assert_eq!(
        derive_keys_variant(&[0u8; 32]).unwrap_err(),
        Error::UnsupportedKbpkLength
    );
}

#[test]
fn test_derive_keys_version_b_lengths() {
    let kbpk = hex_decode("1D22BF32387C600AD97F9B97A51311AC").unwrap();
    let (kbek, kbak) = derive_keys_version_b(&kbpk).unwrap();
    assert_eq!(kbek.len(), 16);
    assert_eq!(kbak.len(), 16);
    assert_ne!(*kbek, *kbak);

    let kbpk = hex_decode("00112233445566778899AABBCCDDEEFF0011223344556677").unwrap();
    let (kbek, kbak) = derive_keys_version_b(&kbpk).unwrap();
    assert_eq!(kbek.len(), 24);
    assert_eq!(kbak.len(), 24);
    assert_ne!(*kbek, *kbak);
}

#[test]
fn test_derive_keys_version_b_invalid_kbpk_length() {
    assert_eq!(
        derive_keys_version_b(&[0u8; 32]).unwrap_err(),
        Error::UnsupportedKbpkLength
    );
}

#[test]
fn test_derive_keys_version_d_aes_128() {
    let kbpk = hex_decode("00112233445566778899AABBCCDDEEFF").unwrap();
    let (kbek, kbak) = derive_keys_version_d(&kbpk).unwrap();

    assert_eq!(
        *kbek,
        hex_decode("37DC7700D70781C3E2498A41A027E0B1").unwrap()
    );
    assert_eq!(
        *kbak,
        hex_decode("063E785CE4C4C8FE54921839BD1F9ADF").unwrap()
    );
}

#[test]
fn test_derive_keys_version_d_aes_192() {
    let kbpk = hex_decode("00112233445566778899AABBCCDDEEFF0011223344556677").unwrap();
    let (kbek, kbak) = derive_keys_version_d(&kbpk).unwrap();

    assert_eq!(
        *kbek,
        hex_decode("F343DFB92345457EF5CB08309EEB65DEC170BE7B069FB351").unwrap()
    );
    assert_eq!(
        *kbak,
        hex_decode("23F93132F6677CD822FA653562F71CCE3CB9361733BFA128").unwrap()
    );
}

#[test]
fn test_derive_keys_version_d_aes_256() {
    let kbpk =
        hex_decode("00112233445566778899AABBCCDDEEFF00112233445566778899AABBCCDDEEFF").unwrap();
    let (kbek, kbak) = derive_keys_version_d(&kbpk).unwrap();

    assert_eq!(
        *kbek,
        hex_decode("FCC7C7F7CA33DA31BA8C60493C7DD384C804C20EBA22022BC5AB29FEF42F20C7").unwrap()
    );
    assert_eq!(
        *kbak,
        hex_decode("095DF0DCA65DC922BBEB015F8C855E254FD7CF399B6DA726ABA28206C9A7A3E2").unwrap()
    );
}

#[test]
fn test_derive_keys_version_d_invalid_kbpk_length() {
    let kbpk = hex_decode("0011223344556677").unwrap();
    assert_eq!(
        derive_keys_version_d(&kbpk).unwrap_err(),
        Error::UnsupportedKbpkLength
    );
}
