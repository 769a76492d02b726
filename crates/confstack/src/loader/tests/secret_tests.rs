//! Secret masking tests: values, provenance, and the debug dump.

use crate::loader::Loader;
use crate::schema::{Schema, Shape};
use crate::sources::EnvVars;
use crate::value::{MASK, Value};

#[test]
fn test_secret_masked_in_value_and_provenance() {
    let schema = Schema::builder()
        .field("token", Shape::secret_str())
        .build()
        .unwrap();

    let resolved = Loader::new(&schema)
        .with_source(EnvVars::from_snapshot([("TOKEN", "super-secret")]))
        .load()
        .unwrap();

    let token = resolved.get("token").unwrap();
    assert_eq!(token.to_string(), MASK);
    assert_eq!(
        resolved.reveal("token"),
        Some(&Value::Str("super-secret".to_string()))
    );
    assert_eq!(
        resolved.provenance("token").unwrap().raw_value,
        Value::Str(MASK.to_string())
    );
}

#[test]
fn test_secret_default_is_masked_in_provenance_too() {
    let schema = Schema::builder()
        .field_with_default(
            "token",
            Shape::secret_str(),
            Value::Secret(crate::value::Secret::new(Value::Str("fallback".to_string()))),
        )
        .build()
        .unwrap();

    let resolved = Loader::new(&schema).load().unwrap();
    assert_eq!(
        resolved.provenance("token").unwrap().raw_value,
        Value::Str(MASK.to_string())
    );
    assert_eq!(
        resolved.reveal("token"),
        Some(&Value::Str("fallback".to_string()))
    );
}

#[test]
fn test_optional_secret_is_masked() {
    let schema = Schema::builder()
        .field("token", Shape::optional(Shape::secret_str()))
        .build()
        .unwrap();

    let resolved = Loader::new(&schema)
        .with_source(EnvVars::from_snapshot([("TOKEN", "hidden")]))
        .load()
        .unwrap();

    assert_eq!(
        resolved.provenance("token").unwrap().raw_value,
        Value::Str(MASK.to_string())
    );
}

#[test]
fn test_conversion_failure_masks_the_secret_in_the_error() {
    let schema = Schema::builder()
        .field("token", Shape::secret(Shape::Int))
        .build()
        .unwrap();

    let err = Loader::new(&schema)
        .with_source(EnvVars::from_snapshot([("TOKEN", "hunter2-secret")]))
        .load()
        .unwrap_err();

    let message = err.to_string();
    assert!(!message.contains("hunter2-secret"), "leaked: {message}");
    assert!(message.contains(MASK));
    // Still a conversion error against the inner shape.
    assert!(message.contains("int"));
}

#[test]
fn test_plain_default_for_secret_field_is_wrapped() {
    let schema = Schema::builder()
        .field_with_default("token", Shape::secret_str(), "fallback")
        .build()
        .unwrap();

    let resolved = Loader::new(&schema).load().unwrap();
    assert_eq!(resolved.get("token").unwrap().to_string(), MASK);
    assert_eq!(
        resolved.reveal("token"),
        Some(&Value::Str("fallback".to_string()))
    );
    assert_eq!(
        resolved.provenance("token").unwrap().raw_value,
        Value::Str(MASK.to_string())
    );
}

#[test]
fn test_null_default_for_optional_secret_stays_null() {
    let schema = Schema::builder()
        .field_with_default("token", Shape::optional(Shape::secret_str()), Value::Null)
        .build()
        .unwrap();

    let resolved = Loader::new(&schema).load().unwrap();
    assert_eq!(resolved.get("token"), Some(&Value::Null));
}

#[test]
fn test_dump_never_contains_the_real_secret() {
    let schema = Schema::builder()
        .field("token", Shape::secret_str())
        .build()
        .unwrap();

    let resolved = Loader::new(&schema)
        .with_source(EnvVars::from_snapshot([("TOKEN", "super-secret")]))
        .load()
        .unwrap();

    let report = resolved.dump().to_string();
    assert!(!report.contains("super-secret"));
    assert!(report.contains(MASK));
}
