//! Property tests for the token codec: round trip over arbitrary field
//! tuples and tamper rejection at arbitrary positions.

use proptest::prelude::*;

use fanhall_auth_core::crypto::HmacKey;
use fanhall_auth_core::error::AuthError;
use fanhall_auth_core::token::{decode, encode, Field, Layout};

fn key() -> HmacKey {
    HmacKey::new("proptest-signing-key-32-bytes-min!!!").unwrap()
}

/// An arbitrary field with its layout fragment
fn field_strategy() -> impl Strategy<Value = (String, Field)> {
    prop_oneof![
        any::<u32>().prop_map(|v| ("I".to_string(), Field::U32(v))),
        prop::collection::vec(any::<u8>(), 1..=32)
            .prop_map(|b| (format!("{}s", b.len()), Field::Bytes(b))),
    ]
}

/// Up to eight fields and the matching layout descriptor
fn tuple_strategy() -> impl Strategy<Value = (String, Vec<Field>)> {
    prop::collection::vec(field_strategy(), 1..=8).prop_map(|fields| {
        let spec: String = fields.iter().map(|(s, _)| s.as_str()).collect();
        let values = fields.into_iter().map(|(_, f)| f).collect();
        (spec, values)
    })
}

proptest! {
    #[test]
    fn roundtrip_preserves_fields((spec, values) in tuple_strategy()) {
        let layout = Layout::parse(&spec).unwrap();
        let token = encode(&layout, &values, &key()).unwrap();
        let decoded = decode(&token, &key()).unwrap();
        prop_assert_eq!(decoded, values);
    }

    #[test]
    fn tampering_any_character_invalidates(
        (spec, values) in tuple_strategy(),
        position in any::<prop::sample::Index>(),
        replacement in "[A-Za-z0-9_-]",
    ) {
        let layout = Layout::parse(&spec).unwrap();
        let token = encode(&layout, &values, &key()).unwrap();

        let index = position.index(token.len());
        let original = token.as_bytes()[index] as char;
        let replacement = replacement.chars().next().unwrap();
        prop_assume!(original != replacement && original != '.');

        let mut tampered: Vec<u8> = token.clone().into_bytes();
        tampered[index] = replacement as u8;
        let tampered = String::from_utf8(tampered).unwrap();

        // Either the MAC no longer matches, or (for tampering inside
        // the signed prefix) the signature covers different data; both
        // must fail as InvalidToken.
        prop_assert!(matches!(
            decode(&tampered, &key()),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn decoding_with_wrong_key_fails((spec, values) in tuple_strategy()) {
        let layout = Layout::parse(&spec).unwrap();
        let token = encode(&layout, &values, &key()).unwrap();

        let wrong = HmacKey::new("a-different-signing-key-32-bytes!!!!").unwrap();
        prop_assert!(matches!(
            decode(&token, &wrong),
            Err(AuthError::InvalidToken)
        ));
    }
}
