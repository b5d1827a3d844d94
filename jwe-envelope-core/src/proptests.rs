//! Property-based tests for the envelope codec.
//!
//! These tests verify invariants hold for arbitrary envelopes:
//!
//! - Compact serialization followed by parsing preserves every component
//! - Flattened JSON round-trips structurally, both from built envelopes and
//!   from raw JSON inputs with any subset of the optional members
//! - The reconstructed AAD is the base64url protected header, plus the
//!   caller AAD when present

use std::collections::BTreeMap;

use proptest::prelude::*;
use serde_json::{Map, Value};

use crate::envelope::{Envelope, Recipient};
use crate::header::Header;
use crate::parse;
use crate::utils::encode;

fn bytes(max: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..max)
}

/// Protected headers with `alg`, `enc` and a few extra string parameters.
fn protected_header() -> impl Strategy<Value = Header> {
    (
        "[A-Za-z0-9+-]{1,16}",
        "[A-Za-z0-9+-]{1,16}",
        prop::collection::vec(("[a-z]{1,8}", "[ -~]{0,16}"), 0..4),
    )
        .prop_map(|(alg, enc, extra)| {
            let mut header = Header::new();
            for (key, value) in extra {
                header.insert(key, value);
            }
            header.with("alg", alg).with("enc", enc)
        })
}

fn compact_envelope() -> impl Strategy<Value = Envelope> {
    (protected_header(), bytes(64), bytes(24), bytes(256), bytes(32)).prop_map(
        |(protected, encrypted_key, iv, ciphertext, tag)| {
            Envelope::builder()
                .protected(protected)
                .recipient(Recipient::new(encrypted_key))
                .iv(iv)
                .ciphertext(ciphertext)
                .tag(tag)
                .build()
                .unwrap()
        },
    )
}

/// Header parameters whose values survive whitespace stripping.
fn params() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z]{1,8}", "[a-z0-9]{1,8}", 0..3)
}

/// Builds one header slot. The slot chosen to carry `alg`/`enc` is always
/// present.
fn header_slot(
    params: Option<BTreeMap<String, String>>,
    carries_alg_enc: bool,
) -> Option<Header> {
    let params = if carries_alg_enc {
        Some(params.unwrap_or_default())
    } else {
        params
    };
    params.map(|params| {
        let header = params
            .into_iter()
            .fold(Header::new(), |header, (key, value)| header.with(key, value));
        if carries_alg_enc {
            header.with("alg", "dir").with("enc", "A128GCM")
        } else {
            header
        }
    })
}

/// Raw flattened JSON objects. Binary members are non-empty when present,
/// `protected` is canonical and non-empty when present, and `aad` may be
/// empty since it is kept whenever present.
fn flattened_json() -> impl Strategy<Value = Value> {
    (
        0..3usize,
        prop::option::of(params()),
        prop::option::of(params()),
        prop::option::of(params()),
        prop::option::of(bytes(32)),
        prop::option::of(prop::collection::vec(any::<u8>(), 1..48)),
        prop::option::of(prop::collection::vec(any::<u8>(), 1..24)),
        prop::option::of(prop::collection::vec(any::<u8>(), 1..96)),
        prop::option::of(prop::collection::vec(any::<u8>(), 1..32)),
    )
        .prop_map(
            |(slot, protected, unprotected, header, aad, encrypted_key, iv, ciphertext, tag)| {
                let mut object = Map::new();

                if let Some(protected) = header_slot(protected, slot == 0) {
                    if !protected.is_empty() {
                        object.insert("protected".into(), encode(protected.to_vec()).into());
                    }
                }
                if let Some(unprotected) = header_slot(unprotected, slot == 1) {
                    object.insert("unprotected".into(), unprotected.into());
                }
                if let Some(header) = header_slot(header, slot == 2) {
                    object.insert("header".into(), header.into());
                }

                let binary = [
                    ("aad", aad),
                    ("encrypted_key", encrypted_key),
                    ("iv", iv),
                    ("ciphertext", ciphertext),
                    ("tag", tag),
                ];
                for (name, value) in binary {
                    if let Some(value) = value {
                        object.insert(name.into(), encode(value).into());
                    }
                }

                Value::Object(object)
            },
        )
}

proptest! {
    /// Compact output parses back to the same components.
    #[test]
    fn compact_round_trip(envelope in compact_envelope()) {
        let compact = envelope.to_compact().unwrap();
        prop_assert_eq!(compact.split('.').count(), 5);
        prop_assert!(!compact.contains('='));

        let parsed = parse(&compact).unwrap();
        prop_assert_eq!(parsed.merged_header_at(0), envelope.merged_header_at(0));
        prop_assert_eq!(parsed.iv(), envelope.iv());
        prop_assert_eq!(parsed.ciphertext(), envelope.ciphertext());
        prop_assert_eq!(parsed.tag(), envelope.tag());
        prop_assert_eq!(
            parsed.recipients()[0].encrypted_key(),
            envelope.recipients()[0].encrypted_key()
        );
        prop_assert_eq!(parsed.compute_aad(), envelope.compute_aad());
    }

    /// Flattened JSON re-serializes to a logically equal object.
    #[test]
    fn flattened_round_trip(
        envelope in compact_envelope(),
        aad in prop::option::of(bytes(32)),
        kid in prop::option::of("[a-z0-9]{1,8}"),
    ) {
        let mut builder = Envelope::builder()
            .protected(envelope.protected_header().clone())
            .iv(envelope.iv().to_vec())
            .ciphertext(envelope.ciphertext().to_vec())
            .tag(envelope.tag().to_vec());
        let mut recipient = Recipient::new(envelope.recipients()[0].encrypted_key().to_vec());
        if let Some(kid) = kid {
            recipient = recipient.with_header(Header::new().with("kid", kid));
        }
        builder = builder.recipient(recipient);
        if let Some(aad) = aad {
            builder = builder.aad(aad);
        }
        let envelope = builder.build().unwrap();

        let json = envelope.to_full_json();
        let reparsed = parse(&json).unwrap();
        let first: Value = serde_json::from_str(&json).unwrap();
        let second: Value = serde_json::from_str(&reparsed.to_full_json()).unwrap();

        prop_assert!(first.get("recipients").is_none());
        prop_assert_eq!(first, second);
        prop_assert_eq!(reparsed.recipients(), envelope.recipients());
        prop_assert_eq!(reparsed.aad(), envelope.aad());
    }

    /// Parsed AAD is built from the received protected bytes.
    #[test]
    fn aad_matches_origin_bytes(
        envelope in compact_envelope(),
        aad in prop::option::of(bytes(32)),
    ) {
        let mut builder = Envelope::builder()
            .protected(envelope.protected_header().clone())
            .recipient(Recipient::new(Vec::new()));
        if let Some(aad) = &aad {
            builder = builder.aad(aad.clone());
        }
        let parsed = parse(&builder.build().unwrap().to_full_json()).unwrap();

        let origin = parsed.original_protected().unwrap().to_vec();
        let expected = match &aad {
            Some(aad) => format!("{}.{}", encode(&origin), encode(aad)),
            None => encode(&origin),
        };
        prop_assert_eq!(parsed.compute_aad(), expected.into_bytes());
    }

    /// Raw flattened JSON survives parse and re-serialization unchanged,
    /// and so does its authenticated data.
    #[test]
    fn raw_flattened_json_round_trip(input in flattened_json()) {
        let envelope = parse(&input.to_string()).unwrap();
        let output = envelope.to_full_json();

        let reserialized: Value = serde_json::from_str(&output).unwrap();
        prop_assert_eq!(&reserialized, &input);
        prop_assert_eq!(parse(&output).unwrap().compute_aad(), envelope.compute_aad());
    }
}
