use prizebond_core::{BondNumber, Collection, Record, RecordId, SortMode};

#[test]
fn record_serialization_uses_plain_wire_fields() {
    let record = Record {
        id: RecordId::new(42),
        number: BondNumber::parse("0012345").unwrap(),
        created_at: 1_700_000_000_000,
    };

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], 42);
    assert_eq!(json["number"], "0012345");
    assert_eq!(json["created_at"], 1_700_000_000_000_i64);

    let decoded: Record = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn deserialize_rejects_invalid_number() {
    let value = serde_json::json!({
        "id": 1,
        "number": "12345",
        "created_at": 0
    });

    let err = serde_json::from_value::<Record>(value).unwrap_err();
    assert!(
        err.to_string().contains("must be exactly 7 digits"),
        "unexpected error: {err}"
    );
}

#[test]
fn enums_serialize_as_snake_case_labels() {
    assert_eq!(
        serde_json::to_value(Collection::Results).unwrap(),
        serde_json::json!("results")
    );
    assert_eq!(
        serde_json::to_value(SortMode::Newest).unwrap(),
        serde_json::json!("newest")
    );
}
