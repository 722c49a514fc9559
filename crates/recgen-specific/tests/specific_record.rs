//! Integration tests: generated record types built from compiled schemas.
//!
//! Covers the field access contract end to end: accessor per field,
//! validated writes, all-or-nothing rejection, type-identity equality,
//! and declaration-ordered whole-record validation.

use proptest::prelude::*;

use recgen_core::{Datum, SchemaType, TypeMismatch};
use recgen_schema::compile_json_schema_from_str;
use recgen_specific::{specific_record, RecordError, RecordType, RecordTypeFactory};

const FOO_RECORD: &str = r#"
{"name": "fooRecord",
 "type": "record",
 "fields": [
    {"name": "f1", "type": "int"},
    {"name": "f2", "type": "long"}
 ]}
"#;

const EMPLOYEE: &str = r#"
{"type": "record",
 "name": "Employee",
 "namespace": "org.example.hr",
 "doc": "A person on the payroll.",
 "fields": [
    {"name": "name", "type": "string", "doc": "Full legal name."},
    {"name": "level", "type": {"type": "enum", "name": "Level", "symbols": ["JUNIOR", "SENIOR"]}},
    {"name": "address", "type": {
        "type": "record", "name": "Address",
        "fields": [
            {"name": "street", "type": "string"},
            {"name": "zip", "type": ["null", "string"]}
        ]}},
    {"name": "manager", "type": ["null", "Employee"]},
    {"name": "tags", "type": {"type": "array", "items": "string"}}
 ]}
"#;

fn build(schema: &str) -> RecordType {
    let ty = compile_json_schema_from_str(schema).expect("schema should compile");
    RecordTypeFactory::new()
        .build_from(&ty)
        .expect("schema should be a record")
}

fn mismatch(err: RecordError) -> TypeMismatch {
    match err {
        RecordError::TypeMismatch(m) => m,
        other => panic!("expected TypeMismatch, got: {other}"),
    }
}

#[test]
fn test_foo_record_example() {
    let foo = build(FOO_RECORD);
    assert_eq!(foo.fullname(), "fooRecord");

    let mut rec = foo.new_instance();
    rec.set("f1", 1).unwrap();
    assert_eq!(rec.get("f1").unwrap(), Some(&Datum::Int(1)));

    let mut other = foo.new_instance();
    let err = mismatch(other.set("f1", "bad").unwrap_err());
    assert_eq!(err.schema, SchemaType::Int);
    assert_eq!(err.datum, Datum::from("bad"));
    assert_eq!(other.get("f1").unwrap(), None);
}

#[test]
fn test_every_field_has_a_working_accessor() {
    let emp = build(EMPLOYEE);
    let ty = emp.schema();
    for field in ty.fields() {
        let accessor = emp
            .accessor(field.name())
            .unwrap_or_else(|| panic!("no accessor for {}", field.name()));
        assert_eq!(accessor.field_type(), field.field_type());
    }
    assert_eq!(emp.accessor("name").unwrap().doc(), "Full legal name.");
    assert_eq!(
        emp.accessor("level").unwrap().doc(),
        "Generated property for the level field"
    );
    assert_eq!(emp.doc(), Some("A person on the payroll."));
}

#[test]
fn test_rejected_write_keeps_previous_value() {
    let foo = build(FOO_RECORD);
    let mut rec = foo.new_instance();
    rec.set("f2", 10).unwrap();
    assert!(rec.set("f2", 1.5).is_err());
    assert!(rec.set("f2", Datum::Null).is_err());
    assert_eq!(rec.get("f2").unwrap(), Some(&Datum::Int(10)));
    rec.set("f2", 11).unwrap();
    assert_eq!(rec.get("f2").unwrap(), Some(&Datum::Int(11)));
}

#[test]
fn test_validate_instance_missing_field() {
    let foo = build(FOO_RECORD);
    let mut rec = foo.new_instance();
    rec.set("f2", 2).unwrap();
    let err = mismatch(foo.validate_instance(&rec).unwrap_err());
    assert_eq!(err.schema, SchemaType::Int);
    assert_eq!(err.datum, Datum::Null);
}

#[test]
fn test_validate_instance_reports_first_field_in_declaration_order() {
    let foo = build(FOO_RECORD);
    let rec = foo.new_instance();
    // Both fields are missing; f1 is declared first.
    let err = mismatch(rec.validate().unwrap_err());
    assert_eq!(err.schema, SchemaType::Int);

    let mut rec = foo.new_instance();
    rec.set("f1", 1).unwrap();
    rec.set("f2", 2).unwrap();
    assert!(foo.validate_instance(&rec).is_ok());
}

#[test]
fn test_validate_instance_rejects_other_type() {
    let a = build(FOO_RECORD);
    let b = build(FOO_RECORD);
    let err = a.validate_instance(&b.new_instance()).unwrap_err();
    assert!(matches!(err, RecordError::ForeignInstance { .. }), "got: {err}");
}

#[test]
fn test_equality_respects_type_identity() {
    let schema = compile_json_schema_from_str(FOO_RECORD).unwrap();
    let record = schema.as_record().unwrap().clone();
    let a = specific_record(record.clone());
    let b = specific_record(record);

    let mut x = a.new_instance();
    let mut y = b.new_instance();
    x.set("f1", 1).unwrap();
    y.set("f1", 1).unwrap();
    assert_ne!(x, y);
    assert_eq!(x.to_datum(), y.to_datum());

    let mut z = a.new_instance();
    z.set("f1", 1).unwrap();
    assert_eq!(x, z);
    assert_eq!(z, x);
}

#[test]
fn test_nested_records_and_recursion() {
    let emp = build(EMPLOYEE);

    let mut boss = emp.new_instance();
    boss.set("name", "Ada").unwrap();
    boss.set("level", "SENIOR").unwrap();

    let address = serde_json::json!({"street": "1 Main St", "zip": null});
    boss.set("address", Datum::from(address)).unwrap();
    boss.set("manager", Datum::Null).unwrap();
    boss.set("tags", Datum::Array(vec![Datum::from("founder")])).unwrap();
    boss.validate().unwrap();

    let mut worker = emp.new_instance();
    worker.set("name", "Grace").unwrap();
    assert!(worker.set("level", "INTERN").is_err());
    worker.set("level", "JUNIOR").unwrap();
    worker
        .set("address", Datum::from(serde_json::json!({"street": "2 Side St"})))
        .unwrap();
    worker.set("manager", &boss).unwrap();
    worker.set("tags", Datum::Array(vec![])).unwrap();
    worker.validate().unwrap();

    let bad_manager = serde_json::json!({"name": 42});
    assert!(worker.set("manager", Datum::from(bad_manager)).is_err());
}

#[test]
fn test_instance_from_datum() {
    let foo = build(FOO_RECORD);
    let rec = foo
        .instance_from_datum(Datum::from(serde_json::json!({"f1": 1, "f2": 2})))
        .unwrap();
    assert_eq!(rec.keys(), vec!["f1", "f2"]);

    let err = foo
        .instance_from_datum(Datum::from(serde_json::json!({"f1": 1, "f9": 2})))
        .unwrap_err();
    assert!(matches!(err, RecordError::UnknownField { .. }), "got: {err}");

    let err = foo.instance_from_datum(Datum::Int(3)).unwrap_err();
    assert!(matches!(err, RecordError::InvalidDatum { .. }), "got: {err}");
}

#[test]
fn test_nested_type_outlives_enclosing_schema() {
    let outer = compile_json_schema_from_str(
        r#"{"type": "record", "name": "Outer",
            "fields": [{"name": "inner", "type": {
                "type": "record", "name": "Inner",
                "fields": [{"name": "back", "type": ["null", "Outer"]}]}}]}"#,
    )
    .unwrap();
    let inner_schema = outer.as_record().unwrap().fields()[0].field_type().clone();
    let inner = RecordTypeFactory::new().build_from(&inner_schema).unwrap();
    let value = || Datum::from(serde_json::json!({"inner": {"back": null}}));

    let mut before = inner.new_instance();
    before.set("back", value()).unwrap();

    drop(inner_schema);
    drop(outer);

    let mut after = inner.new_instance();
    after.set("back", value()).unwrap();
    after.validate().unwrap();
    assert_eq!(before, after);
}

fn datum_strategy() -> impl Strategy<Value = Datum> {
    prop_oneof![
        Just(Datum::Null),
        any::<bool>().prop_map(Datum::Boolean),
        any::<i64>().prop_map(Datum::Int),
        (-1.0e6f64..1.0e6).prop_map(Datum::Float),
        "[a-z]{0,12}".prop_map(Datum::String),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(Datum::Bytes),
    ]
}

proptest! {
    /// A write succeeds exactly when the value validates, and a read
    /// afterwards sees the new value or the untouched old one.
    #[test]
    fn set_matches_validate(first in datum_strategy(), second in datum_strategy()) {
        let foo = build(FOO_RECORD);
        let mut rec = foo.new_instance();
        for value in [first, second] {
            let before = rec.get("f1").unwrap().cloned();
            let accepted = recgen_core::validate(&SchemaType::Int, &value);
            let result = rec.set("f1", value.clone());
            prop_assert_eq!(result.is_ok(), accepted);
            if accepted {
                prop_assert_eq!(rec.get("f1").unwrap(), Some(&value));
            } else {
                let err = mismatch(result.unwrap_err());
                prop_assert_eq!(err, TypeMismatch::new(SchemaType::Int, value));
                prop_assert_eq!(rec.get("f1").unwrap().cloned(), before);
            }
        }
    }

    /// Equality is reflexive and symmetric within one type.
    #[test]
    fn equality_reflexive_and_symmetric(a in any::<i32>(), b in any::<i32>()) {
        let foo = build(FOO_RECORD);
        let mut x = foo.new_instance();
        let mut y = foo.new_instance();
        x.set("f1", a).unwrap();
        y.set("f1", b).unwrap();
        prop_assert_eq!(&x, &x);
        prop_assert_eq!(x == y, y == x);
        prop_assert_eq!(x == y, a == b);
    }
}
