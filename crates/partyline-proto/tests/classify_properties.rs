//! Property-based tests for frame classification.
//!
//! Classification must be total: arbitrary text never panics, never-JSON text
//! is always surfaced, and structured frames land in the variant their
//! discriminator names.

use partyline_proto::{
    ChangeReason, ChatPayload, Classifier, Payload, UnmatchedPolicy, Variant, classify,
};
use proptest::prelude::*;
use serde_json::json;

/// Strategy for user names and message bodies.
fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _.!?-]{0,24}"
}

/// Strategy for wire change reasons.
fn reason() -> impl Strategy<Value = String> {
    prop_oneof![Just("connected".to_string()), Just("left".to_string()), "[a-z]{1,10}"]
}

proptest! {
    #[test]
    fn prop_classify_never_panics(raw in any::<String>()) {
        let _ = classify(&raw);
        let _ = Classifier::new(UnmatchedPolicy::Drop).classify(&raw);
    }

    #[test]
    fn prop_non_json_is_unparseable(raw in "[a-z ]{1,40}") {
        prop_assume!(serde_json::from_str::<serde_json::Value>(&raw).is_err());

        // PROPERTY: text that is not JSON is surfaced verbatim under every policy
        prop_assert_eq!(classify(&raw), Variant::Unparseable(raw.clone()));
        prop_assert_eq!(
            Classifier::new(UnmatchedPolicy::Drop).classify(&raw),
            Some(Variant::Unparseable(raw.clone()))
        );
    }

    #[test]
    fn prop_chat_shape_is_chat(user in text(), message in text(), forged in any::<i64>()) {
        let raw = json!({ "user": user, "message": message, "time": forged }).to_string();

        match classify(&raw) {
            Variant::Chat(chat) => {
                prop_assert_eq!(chat.user, user);
                prop_assert_eq!(chat.message, message);
                prop_assert!(!chat.extra.contains_key("time"));
            },
            other => prop_assert!(false, "expected chat, got {:?}", other),
        }
    }

    #[test]
    fn prop_presence_shape_is_presence(
        user in text(),
        reason in reason(),
        connections in 0u64..10_000,
        with_message in any::<bool>(),
    ) {
        let mut value = json!({ "user": user, "changeReason": reason, "connections": connections });
        if with_message {
            value["message"] = json!("ignored");
        }

        match classify(&value.to_string()) {
            Variant::Presence(presence) => {
                prop_assert_eq!(presence.user, user);
                prop_assert_eq!(presence.change_reason, ChangeReason::from_wire(&reason));
                prop_assert_eq!(presence.connections, connections);
            },
            other => prop_assert!(false, "expected presence, got {:?}", other),
        }
    }

    #[test]
    fn prop_unmatched_objects_follow_policy(key in "[a-z]{1,8}", value in text()) {
        prop_assume!(key != "message" && key != "changeReason");
        let mut object = serde_json::Map::new();
        object.insert(key, serde_json::Value::String(value));
        let raw = serde_json::Value::Object(object).to_string();

        prop_assert_eq!(classify(&raw), Variant::Unparseable(raw.clone()));
        prop_assert_eq!(Classifier::new(UnmatchedPolicy::Drop).classify(&raw), None);
    }

    #[test]
    fn prop_encoded_payloads_classify_back(user in text(), message in text()) {
        let payload = Payload::Chat(ChatPayload::new(user, message));
        let wire = payload.encode().unwrap();

        prop_assert_eq!(classify(&wire), Variant::from(payload));
    }
}
