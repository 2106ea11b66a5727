use super::{DecodeError, Transaction};

use anyhow::{anyhow, Result};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{json, Value};

use crate::schema::{FieldError, FieldErrorKind, TransactionSchema, ValidationError};
use crate::types::RawFields;

fn raw_fields(value: Value) -> Result<RawFields> {
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(anyhow!("expected a JSON object, got {other}"))
    }
}

fn construct(value: Value) -> Result<Result<Transaction, ValidationError>> {
    Ok(Transaction::construct(&TransactionSchema::new(), &raw_fields(value)?))
}

fn expect_errors(value: Value) -> Result<Vec<FieldError>> {
    construct(value)?
        .map(|transaction| Err(anyhow!("expected validation to fail, got {transaction:?}")))
        .unwrap_or_else(|error| Ok(error.into_errors()))
}

#[test]
fn test_valid_input_constructs_record_with_coerced_values() -> Result<()> {
    let transaction = construct(json!({"item_id": 17, "item_name": "widget", "quantity": 4}))??;

    assert_eq!(transaction.item_id(), Some(17));
    assert_eq!(transaction.item_name(), "widget");
    assert_eq!(transaction.quantity(), 4);

    let transaction = construct(json!({"item_id": "17", "item_name": 99, "quantity": 4.0}))??;

    assert_eq!(transaction, Transaction::new(Some(17), "99", 4));

    Ok(())
}

#[test]
fn test_omitted_item_id_is_unset_and_distinct_from_zero() -> Result<()> {
    let absent = construct(json!({"item_name": "widget", "quantity": 1}))??;
    let null = construct(json!({"item_id": null, "item_name": "widget", "quantity": 1}))??;
    let zero = construct(json!({"item_id": 0, "item_name": "widget", "quantity": 1}))??;

    assert_eq!(absent.item_id(), None);
    assert_eq!(null.item_id(), None);
    assert_eq!(zero.item_id(), Some(0));
    assert_ne!(absent, zero);

    Ok(())
}

#[test]
fn test_missing_item_name_is_reported_by_name() -> Result<()> {
    let errors = expect_errors(json!({"item_id": 1, "quantity": 1}))?;

    assert_eq!(errors, vec![FieldError::missing("item_name")]);

    Ok(())
}

#[test]
fn test_missing_quantity_is_reported_by_name() -> Result<()> {
    let errors = expect_errors(json!({"item_name": "widget"}))?;

    assert_eq!(errors, vec![FieldError::missing("quantity")]);

    Ok(())
}

#[test]
fn test_numeric_string_quantity_is_coerced() -> Result<()> {
    let transaction = construct(json!({"item_name": "widget", "quantity": "3"}))??;

    assert_eq!(transaction.quantity(), 3);

    Ok(())
}

#[test]
fn test_non_numeric_quantity_is_uncoercible() -> Result<()> {
    let errors = expect_errors(json!({"item_name": "widget", "quantity": "abc"}))?;

    assert_eq!(errors, vec![FieldError::uncoercible("quantity", &json!("abc"))]);

    Ok(())
}

#[test]
fn test_fractional_quantity_is_rejected() -> Result<()> {
    let errors = expect_errors(json!({"item_name": "widget", "quantity": 3.5}))?;

    assert_eq!(errors, vec![FieldError::uncoercible("quantity", &json!(3.5))]);

    Ok(())
}

#[test]
fn test_invalid_item_id_is_a_field_error_not_unset() -> Result<()> {
    let errors = expect_errors(json!({"item_id": "abc", "item_name": "widget", "quantity": 1}))?;

    assert_eq!(errors, vec![FieldError::uncoercible("item_id", &json!("abc"))]);

    let errors = expect_errors(json!({"item_id": [1], "item_name": "widget", "quantity": 1}))?;

    assert_eq!(errors, vec![FieldError::wrong_type("item_id", &json!([1]))]);

    Ok(())
}

#[test]
fn test_every_invalid_field_is_collected_in_one_pass() -> Result<()> {
    let errors = expect_errors(json!({"item_name": {"first": "wid", "last": "get"}}))?;

    assert_eq!(errors, vec![
        FieldError::wrong_type("item_name", &json!({"first": "wid", "last": "get"})),
        FieldError::missing("quantity"),
    ]);

    let errors = expect_errors(json!({"item_id": 2.5, "item_name": null, "quantity": true}))?;
    let kinds: Vec<_> = errors.iter().map(|error| (error.field.as_str(), error.kind)).collect();

    assert_eq!(kinds, vec![
        ("item_id", FieldErrorKind::Uncoercible),
        ("item_name", FieldErrorKind::WrongType),
        ("quantity", FieldErrorKind::WrongType),
    ]);

    Ok(())
}

#[test]
fn test_zero_and_negative_quantities_are_accepted() -> Result<()> {
    assert_eq!(construct(json!({"item_name": "refund", "quantity": -2}))??.quantity(), -2);
    assert_eq!(construct(json!({"item_name": "sample", "quantity": "0"}))??.quantity(), 0);

    Ok(())
}

#[test]
fn test_undeclared_fields_are_rejected_alongside_field_errors() -> Result<()> {
    let schema = TransactionSchema::new().reject_unknown_fields();
    let raw = raw_fields(json!({"item_name": "widget", "price": 9.99}))?;

    let Err(error) = Transaction::construct(&schema, &raw) else {
        return Err(anyhow!("expected validation to fail"));
    };

    assert_eq!(error.errors(), [
        FieldError::missing("quantity"),
        FieldError::unexpected("price", &json!(9.99)),
    ]);

    Ok(())
}

#[test]
fn test_to_fields_emits_all_keys_with_null_for_unset_item_id() {
    let unset = Transaction::new(None, "widget", 5);
    let set = Transaction::new(Some(0), "widget", 5);

    assert_eq!(Value::Object(unset.to_fields()), json!({"item_id": null, "item_name": "widget", "quantity": 5}));
    assert_eq!(Value::Object(set.to_fields()), json!({"item_id": 0, "item_name": "widget", "quantity": 5}));
}

#[test]
fn test_constructed_values_survive_a_round_trip() -> Result<()> {
    let schema = TransactionSchema::new();
    let inputs = vec![
        json!({"item_id": "12", "item_name": "bolt", "quantity": "3"}),
        json!({"item_name": 7, "quantity": 1.0}),
        json!({"item_id": null, "item_name": "", "quantity": -4}),
        json!({"item_id": 0, "item_name": true, "quantity": " 9 "}),
    ];

    for input in inputs {
        let original = Transaction::construct(&schema, &raw_fields(input)?)?;
        let restored = Transaction::construct(&schema, &original.to_fields())?;

        assert_eq!(restored, original);
    }

    Ok(())
}

#[test]
fn test_random_records_survive_a_round_trip() -> Result<()> {
    let schema = TransactionSchema::new().reject_unknown_fields();
    let mut rng = rand::thread_rng();

    for _ in 0..500 {
        let item_id = if rng.gen_bool(0.3) { None } else { Some(rng.r#gen::<i64>()) };
        let name_length = rng.gen_range(0..24);
        let item_name: String = (&mut rng).sample_iter(&Alphanumeric).take(name_length).map(char::from).collect();
        let quantity = rng.r#gen::<i64>();

        let original = Transaction::new(item_id, item_name, quantity);
        let restored = Transaction::construct(&schema, &original.to_fields())?;

        assert_eq!(restored, original);
    }

    Ok(())
}

#[test]
fn test_serde_decoding_applies_the_same_validation() -> Result<()> {
    let transaction: Transaction = serde_json::from_str(r#"{"item_name": "widget", "quantity": "2"}"#)?;

    assert_eq!(transaction, Transaction::new(None, "widget", 2));

    let error = serde_json::from_str::<Transaction>(r#"{"item_name": ["widget"]}"#)
        .err()
        .ok_or_else(|| anyhow!("expected decoding to fail"))?;
    let message = error.to_string();

    assert!(message.contains("[item_name]"));
    assert!(message.contains("[quantity] Field is required"));

    Ok(())
}

#[test]
fn test_serde_encoding_matches_to_fields() -> Result<()> {
    let transaction = Transaction::new(None, "widget", 2);

    assert_eq!(serde_json::to_value(&transaction)?, Value::Object(transaction.to_fields()));
    assert_eq!(transaction.to_json(), r#"{"item_id":null,"item_name":"widget","quantity":2}"#);

    Ok(())
}

#[test]
fn test_from_json_rejects_non_objects_and_malformed_documents() -> Result<()> {
    let schema = TransactionSchema::new();

    match Transaction::from_json(&schema, "[1, 2, 3]") {
        Err(DecodeError::Validation(error)) => assert!(error.contains("__root__", FieldErrorKind::WrongType)),
        other => return Err(anyhow!("unexpected result: {other:?}"))
    }

    assert!(matches!(Transaction::from_json(&schema, "{\"item_name\":"), Err(DecodeError::Json(_))));
    assert_eq!(
        Transaction::from_json(&schema, r#"{"item_id": 3, "item_name": "nut", "quantity": 10}"#)?,
        Transaction::new(Some(3), "nut", 10)
    );

    Ok(())
}
