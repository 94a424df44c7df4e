//! Fuzz target for frame classification
//!
//! Feeds arbitrary text to the classifier under both unmatched-frame policies.
//!
//! # Invariants
//!
//! - Classification never panics
//! - Text that is not JSON is always `Unparseable`, carrying the frame verbatim
//! - The two policies only disagree on frames the drop policy discards
//! - A decoded payload re-encodes to text that classifies to the same kind

#![no_main]

use libfuzzer_sys::fuzz_target;
use partyline_proto::{Classifier, Payload, ProtocolError, UnmatchedPolicy, Variant};

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);

    let logged = Classifier::new(UnmatchedPolicy::SystemMessage).classify(&raw);
    let dropped = Classifier::new(UnmatchedPolicy::Drop).classify(&raw);

    let Some(logged) = logged else {
        panic!("system-message policy never drops");
    };

    if is_invalid_json(&raw) {
        assert_eq!(logged, Variant::Unparseable(raw.to_string()));
        assert_eq!(dropped, Some(logged.clone()));
    }

    match (&logged, &dropped) {
        (_, Some(other)) => assert_eq!(&logged, other),
        (Variant::Unparseable(_), None) => {},
        (variant, None) => panic!("drop policy discarded a {}", variant.kind()),
    }

    if let Ok(payload) = Payload::decode(&raw) {
        let encoded = payload.encode().expect("payload encodes");
        let again = Classifier::default()
            .classify(&encoded)
            .expect("re-encoded payload classifies");
        assert_eq!(again.kind(), logged.kind());
    }
});

fn is_invalid_json(raw: &str) -> bool {
    matches!(Payload::decode(raw), Err(ProtocolError::InvalidJson(_)))
}
