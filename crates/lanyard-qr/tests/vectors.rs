use lanyard_qr::{AttendeeRef, BadgePayload, Error};
use std::fs;

#[test]
fn vectors_match_badge_encoding() {
    let dir = "tests/vectors";
    for entry in fs::read_dir(dir).expect("read vectors dir") {
        let entry = entry.expect("entry");
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        let contents = fs::read_to_string(&path).expect("read vector");
        let value: serde_json::Value = serde_json::from_str(&contents).expect("json");
        let scan = value["scan"].as_str().expect("scan");

        if let Some(expected) = value.get("error").and_then(|v| v.as_str()) {
            let err = BadgePayload::decode(scan).expect_err("malformed scan");
            assert_eq!(
                error_kind(&err),
                expected,
                "error mismatch for {:?}",
                path
            );
            continue;
        }

        let badge = BadgePayload::decode(scan).expect("decode");
        let expected_ref = if let Some(id) = value["attendee_id"].as_u64() {
            AttendeeRef::Id(id)
        } else {
            AttendeeRef::Email(value["attendee_email"].as_str().expect("ref").to_string())
        };
        assert_eq!(badge.attendee_ref, expected_ref, "ref mismatch for {:?}", path);
        assert_eq!(
            badge.event_ref,
            value["event_ref"].as_str().expect("event_ref"),
            "event mismatch for {:?}",
            path
        );
        assert_eq!(
            badge.expiry,
            value["expiry"].as_i64().expect("expiry"),
            "expiry mismatch for {:?}",
            path
        );
        assert_eq!(
            badge.signature,
            value["signature"].as_str().expect("signature"),
            "signature mismatch for {:?}",
            path
        );
        assert_eq!(badge.encode(), scan, "round trip mismatch for {:?}", path);
    }
}

fn error_kind(err: &Error) -> &'static str {
    match err {
        Error::FieldCount(_) => "field_count",
        Error::UnknownTag(_) => "unknown_tag",
        Error::InvalidExpiry(_) => "invalid_expiry",
        Error::EmbeddedSeparator(_) => "embedded_separator",
    }
}
