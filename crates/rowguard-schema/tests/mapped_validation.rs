use chrono::NaiveDate;
use rowguard_catalog::{ColumnRef, MemoryCatalog, MemoryStore, Model, StorageType, TableInfo};
use rowguard_rules::{Error, ErrorCode, IntRule, Record, StrRule, Value};
use rowguard_schema::{FieldDescriptor, MappedSchema, SchemaError, ValidationContext, ValidationError};
use serde_json::json;

struct User;

impl Model for User {
    fn table_name() -> &'static str {
        "users"
    }
}

fn catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_table(
            TableInfo::new("users")
                .column(ColumnRef::new("id", StorageType::Integer).primary_key())
                .column(ColumnRef::new("name", StorageType::Varchar(Some(255))).not_null().unique())
                .column(ColumnRef::new("bday", StorageType::Date))
                .column(ColumnRef::new("marty_stuff", StorageType::Text)),
        )
        .with_table(
            TableInfo::new("memberships")
                .column(ColumnRef::new("user_id", StorageType::Integer).primary_key())
                .column(ColumnRef::new("group_id", StorageType::Integer).primary_key())
                .column(ColumnRef::new("role", StorageType::Text)),
        )
}

fn user_schema() -> MappedSchema {
    MappedSchema::for_model::<User, _>(&catalog(), Vec::new(), &["name", "bday"]).unwrap()
}

fn marty_row() -> Record {
    let mut row = Record::new();
    row.insert("id".into(), Value::Int(1));
    row.insert("name".into(), Value::from("Marty"));
    row
}

fn marty_input() -> Value {
    Value::from(json!({"name": "Marty", "bday": "1968-06-12"}))
}

#[test]
fn test_marty_with_typecast() {
    let store = MemoryStore::new();
    let context = ValidationContext::new().with_session(&store);

    let result = user_schema().validate(&marty_input(), true, &context).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result["name"], Value::from("Marty"));
    assert_eq!(
        result["bday"],
        Value::Date(NaiveDate::from_ymd_opt(1968, 6, 12).unwrap())
    );
}

#[test]
fn test_duplicate_name_rejected() {
    let mut store = MemoryStore::new();
    store.insert("users", marty_row());
    let context = ValidationContext::new().with_session(&store);

    let err = user_schema().validate(&marty_input(), true, &context).unwrap_err();
    let report = err.report().unwrap();

    assert_eq!(report.errors().len(), 1);
    assert!(report.key_errors().is_none());
    assert_eq!(
        report.value_errors().unwrap()["name"],
        vec![Error::new(ErrorCode::AlreadyExists)]
    );
}

#[test]
fn test_current_instance_is_not_a_duplicate_of_itself() {
    let mut store = MemoryStore::new();
    store.insert("users", marty_row());
    let instance = marty_row();
    let context = ValidationContext::new()
        .with_session(&store)
        .with_instance(&instance);

    let result = user_schema().validate(&marty_input(), true, &context).unwrap();
    assert_eq!(result["name"], Value::from("Marty"));

    // a different persisted row still collides
    let mut other = marty_row();
    other.insert("id".into(), Value::Int(2));
    let context = ValidationContext::new().with_session(&store).with_instance(&other);
    assert!(user_schema().validate(&marty_input(), true, &context).is_err());
}

#[test]
fn test_predicate_sees_validated_values() {
    let schema = MappedSchema::builder("users")
        .field(FieldDescriptor::property("kind").rule(IntRule::new()))
        .field(
            FieldDescriptor::new("marty_stuff")
                .rule(StrRule::new())
                .required(true)
                .predicate(|prev: &Record| prev.get("kind") == Some(&Value::Int(1))),
        )
        .build(&catalog())
        .unwrap();
    let store = MemoryStore::new();
    let context = ValidationContext::new().with_session(&store);

    // "1" only equals Int(1) after the typecast on `kind`
    let err = schema
        .validate(&Value::from(json!({"kind": "1"})), true, &context)
        .unwrap_err();
    assert_eq!(
        err.report().unwrap().key_errors().unwrap()["marty_stuff"],
        vec![Error::new(ErrorCode::RequiredKey)]
    );

    let result = schema
        .validate(&Value::from(json!({"kind": "2"})), true, &context)
        .unwrap();
    assert_eq!(result["kind"], Value::Int(2));

    // skipped fields do not consume their key
    let err = schema
        .validate(&Value::from(json!({"kind": 2, "marty_stuff": "hat"})), false, &context)
        .unwrap_err();
    assert_eq!(
        err.report().unwrap().key_errors().unwrap()["marty_stuff"],
        vec![Error::new(ErrorCode::UnknownKey)]
    );
}

#[test]
fn test_unexpected_field_is_rejected() {
    let store = MemoryStore::new();
    let context = ValidationContext::new().with_session(&store);

    let err = user_schema()
        .validate(&Value::from(json!({"name": "Doc", "unexpected_field": 1})), false, &context)
        .unwrap_err();
    let report = err.report().unwrap();

    assert!(report.value_errors().is_none());
    assert_eq!(
        report.key_errors().unwrap()["unexpected_field"],
        vec![Error::new(ErrorCode::UnknownKey)]
    );
}

#[test]
fn test_missing_session_fails_before_fields() {
    let err = user_schema()
        .validate(&Value::from(json!("not even a dict")), false, &ValidationContext::new())
        .unwrap_err();
    assert!(matches!(err, ValidationError::Schema(SchemaError::MissingSession)));
}

#[test]
fn test_non_mapping_input() {
    let store = MemoryStore::new();
    let context = ValidationContext::new().with_session(&store);

    let err = user_schema()
        .validate(&Value::from(json!(["name", "Marty"])), false, &context)
        .unwrap_err();
    let errors = err.report().unwrap().errors();

    assert_eq!(errors, &[Error::unexpected_type("dict")]);
    assert_eq!(err.report().unwrap().to_json()[0]["args"]["expected_type"], "dict");
}

#[test]
fn test_construction_errors() {
    assert!(matches!(
        MappedSchema::build(&catalog(), "memberships", Vec::new(), &["role"]),
        Err(SchemaError::CompositeIdentity { .. })
    ));

    let err = MappedSchema::for_model::<User, _>(&catalog(), Vec::new(), &["name", "nickname"]).unwrap_err();
    assert!(err.to_string().contains("nickname"));
    assert!(matches!(err, SchemaError::ColumnNotFound { ref column, .. } if column == "nickname"));
}

#[test]
fn test_one_bound_field_per_descriptor_in_order() {
    let schema = MappedSchema::build(
        &catalog(),
        "users",
        vec![FieldDescriptor::new("marty_stuff")],
        &["bday", "name"],
    )
    .unwrap();

    let fields: Vec<(&str, bool, bool)> = schema
        .fields()
        .iter()
        .map(|f| (f.name(), f.required(), f.unique()))
        .collect();
    assert_eq!(
        fields,
        vec![("marty_stuff", false, false), ("bday", false, false), ("name", true, true)]
    );
}

#[test]
fn test_validation_is_idempotent() {
    let store = MemoryStore::new();
    let context = ValidationContext::new().with_session(&store);
    let schema = user_schema();

    let first = schema.validate(&marty_input(), true, &context).unwrap();
    let second = schema.validate(&marty_input(), true, &context).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_null_skips_uniqueness() {
    let mut store = MemoryStore::new();
    let mut row = marty_row();
    row.insert("bday".into(), Value::Null);
    store.insert("users", row);

    let schema = MappedSchema::build(
        &catalog(),
        "users",
        vec![FieldDescriptor::new("bday").unique(true)],
        &[] as &[&str],
    )
    .unwrap();
    let context = ValidationContext::new().with_session(&store);

    let result = schema.validate(&Value::from(json!({"bday": null})), false, &context).unwrap();
    assert_eq!(result["bday"], Value::Null);
}
