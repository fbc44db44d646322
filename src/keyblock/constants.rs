//! Attribute dictionaries for key block headers.
//!
//! The tables below enumerate the codes a header may carry and map each to
//! its human-readable description. Lookups return `None` for codes outside
//! the tables; presentation layers pass unknown codes through as their raw
//! characters.

/// Predefined allowed version IDs for the key block.
///
/// Each version ID corresponds to a different method of cryptographic
/// protection and layout of the key block:
/// - `A` (0x41): Key Variant Binding Method. Deprecated; kept for decoding
///   and exchange with legacy devices.
/// - `B` (0x42): TDEA Key Derivation Binding Method. Preferred for new TDEA
///   implementations.
/// - `C` (0x43): TDEA Key Variant Binding Method.
/// - `D` (0x44): AES Key Derivation Binding Method.
///
/// Note: Numeric key block version IDs are reserved for proprietary key
/// block definitions.
pub const ALLOWED_VERSION_IDS: [&str; 4] = ["A", "B", "C", "D"];

/// Predefined allowed key usages for the key block.
///
/// Key usage defines the type of the key and its intended function, whether
/// it is used for encrypting data, calculating a MAC, etc. The key usage is
/// identified by bytes 5 and 6 in the key block header.
pub const ALLOWED_KEY_USAGES: [&str; 37] = [
    "B0", "B1", "B2", "C0", "D0", "D1", "D2", "E0", "E1", "E2", "E3", "E4", "E5", "E6", "I0",
    "K0", "K1", "K2", "K3", "M0", "M1", "M2", "M3", "M4", "M5", "M6", "M7", "M8", "P0", "S0",
    "S1", "S2", "V0", "V1", "V2", "V3", "V4",
];

/// Predefined allowed algorithms for the key block.
///
/// The algorithm byte (byte 7) defines the cryptographic algorithm the
/// protected key may be used with. Numeric values are reserved for
/// proprietary use.
pub const ALLOWED_ALGORITHMS: [&str; 7] = ["A", "D", "E", "H", "R", "S", "T"];

/// Predefined allowed modes of use for the key block.
///
/// The mode of use byte (byte 8) defines the operation the protected key
/// can perform.
pub const ALLOWED_MODES_OF_USE: [&str; 11] =
    ["B", "C", "D", "E", "G", "N", "S", "T", "V", "X", "Y"];

/// Predefined allowed exportabilities for the key block.
///
/// The exportability byte (byte 11) indicates the conditions under which the
/// protected key may be transferred outside its cryptographic domain.
pub const ALLOWED_EXPORTABILITIES: [&str; 3] = ["E", "N", "S"];

/// Predefined allowed optional block IDs.
pub const ALLOWED_OPT_BLOCK_IDS: [&str; 9] =
    ["CT", "HM", "IK", "KC", "KP", "KS", "KV", "PB", "TS"];

/// Human-readable description of a key usage code.
pub fn key_usage_string(code: &str) -> Option<&'static str> {
    match code {
        "B0" => Some("BDK base derivation key"),
        "B1" => Some("Initial DUKPT key"),
        "B2" => Some("Base key variant key"),
        "C0" => Some("CVK card verification key"),
        "D0" => Some("Symmetric key for data encryption"),
        "D1" => Some("Asymmetric key for data encryption"),
        "D2" => Some("Data encryption key for decimalization table"),
        "E0" => Some("EMV/chip issuer master key: application cryptograms"),
        "E1" => Some("EMV/chip issuer master key: secure messaging for confidentiality"),
        "E2" => Some("EMV/chip issuer master key: secure messaging for integrity"),
        "E3" => Some("EMV/chip issuer master key: data authentication code"),
        "E4" => Some("EMV/chip issuer master key: dynamic numbers"),
        "E5" => Some("EMV/chip issuer master key: card personalization"),
        "E6" => Some("EMV/chip issuer master key: other"),
        "I0" => Some("Initialization vector"),
        "K0" => Some("Key encryption or wrapping key"),
        "K1" => Some("Key block protection key"),
        "K2" => Some("TR-34 asymmetric key"),
        "K3" => Some("Asymmetric key for key agreement or key wrapping"),
        "M0" => Some("ISO 16609 MAC algorithm 1 key (TDEA)"),
        "M1" => Some("ISO 9797-1 MAC algorithm 1 key"),
        "M2" => Some("ISO 9797-1 MAC algorithm 2 key"),
        "M3" => Some("ISO 9797-1 MAC algorithm 3 key"),
        "M4" => Some("ISO 9797-1 MAC algorithm 4 key"),
        "M5" => Some("ISO 9797-1:1999 MAC algorithm 5 key"),
        "M6" => Some("ISO 9797-1:2011 MAC algorithm 5 (CMAC) key"),
        "M7" => Some("HMAC key"),
        "M8" => Some("ISO 9797-1:2011 MAC algorithm 6 key"),
        "P0" => Some("PIN encryption key"),
        "S0" => Some("Asymmetric key pair for digital signature"),
        "S1" => Some("Asymmetric key pair, CA key"),
        "S2" => Some("Asymmetric key pair, non-X9.24 key"),
        "V0" => Some("PIN verification key, other algorithm"),
        "V1" => Some("PIN verification key, IBM 3624"),
        "V2" => Some("PIN verification key, VISA PVV"),
        "V3" => Some("PIN verification key, X9.132 algorithm 1"),
        "V4" => Some("PIN verification key, X9.132 algorithm 2"),
        _ => None,
    }
}

/// Human-readable description of an algorithm code.
pub fn algorithm_string(code: &str) -> Option<&'static str> {
    match code {
        "A" => Some("AES"),
        "D" => Some("DES"),
        "E" => Some("Elliptic curve"),
        "H" => Some("HMAC"),
        "R" => Some("RSA"),
        "S" => Some("DSA"),
        "T" => Some("Triple DES"),
        _ => None,
    }
}

/// Human-readable description of a mode of use code.
pub fn mode_of_use_string(code: &str) -> Option<&'static str> {
    match code {
        "B" => Some("Encrypt and decrypt / wrap and unwrap"),
        "C" => Some("Generate and verify"),
        "D" => Some("Decrypt / unwrap only"),
        "E" => Some("Encrypt / wrap only"),
        "G" => Some("Generate only"),
        "N" => Some("No special restrictions"),
        "S" => Some("Signature only"),
        "T" => Some("Sign and decrypt"),
        "V" => Some("Verify only"),
        "X" => Some("Key used to derive other keys"),
        "Y" => Some("Key used to create key variants"),
        _ => None,
    }
}

/// Human-readable description of an exportability code.
pub fn exportability_string(code: &str) -> Option<&'static str> {
    match code {
        "E" => Some("Exportable under a trusted key"),
        "N" => Some("Non-exportable"),
        "S" => Some("Sensitive; exportable under untrusted key"),
        _ => None,
    }
}

/// Human-readable description of an optional block ID.
pub fn opt_block_id_string(code: &str) -> Option<&'static str> {
    match code {
        "CT" => Some("Public key certificate"),
        "HM" => Some("HMAC hash algorithm"),
        "IK" => Some("Initial DUKPT key identifier"),
        "KC" => Some("Key check value of wrapped key"),
        "KP" => Some("Key check value of key block protection key"),
        "KS" => Some("Key set identifier / key serial number"),
        "KV" => Some("Key block values version"),
        "PB" => Some("Padding block"),
        "TS" => Some("Time stamp"),
        _ => None,
    }
}
