use msgc_core::{Arity, CompilerConfig, ConfigError, PrimitiveType, TypeRef, is_identifier};

// ── TypeRef ──────────────────────────────────────────────────────────────────

#[test]
fn type_ref_parses_and_displays_package_name() {
    let r: TypeRef = "sensor_msgs/Image".parse().unwrap();
    assert_eq!(r, TypeRef::new("sensor_msgs", "Image"));
    assert_eq!(r.to_string(), "sensor_msgs/Image");
}

#[test]
fn type_ref_rejects_malformed_names() {
    for bad in ["Image", "a/b/c", "/Image", "pkg/", "1pkg/Image", "pkg/Ima-ge"] {
        let err = bad.parse::<TypeRef>().unwrap_err();
        assert_eq!(err, ConfigError::InvalidTypeName(bad.to_string()));
    }
}

#[test]
fn identifiers_must_start_with_a_letter() {
    assert!(is_identifier("frame_id"));
    assert!(is_identifier("X2"));
    assert!(!is_identifier("_x"));
    assert!(!is_identifier("2x"));
    assert!(!is_identifier(""));
}

// ── PrimitiveType ────────────────────────────────────────────────────────────

#[test]
fn primitive_names_round_trip() {
    for p in PrimitiveType::ALL {
        assert_eq!(PrimitiveType::from_name(p.as_str()), Some(p));
    }
    assert_eq!(PrimitiveType::from_name("Int32"), None);
    assert_eq!(PrimitiveType::from_name("float"), None);
}

#[test]
fn primitive_widths_follow_wire_format() {
    assert_eq!(PrimitiveType::Bool.fixed_width(), Some(1));
    assert_eq!(PrimitiveType::Byte.fixed_width(), Some(1));
    assert_eq!(PrimitiveType::Char.fixed_width(), Some(1));
    assert_eq!(PrimitiveType::U16.fixed_width(), Some(2));
    assert_eq!(PrimitiveType::F32.fixed_width(), Some(4));
    assert_eq!(PrimitiveType::Time.fixed_width(), Some(8));
    assert_eq!(PrimitiveType::Duration.fixed_width(), Some(8));
    assert_eq!(PrimitiveType::String.fixed_width(), None);
}

#[test]
fn time_and_duration_cannot_be_constants() {
    assert!(!PrimitiveType::Time.is_constant_type());
    assert!(!PrimitiveType::Duration.is_constant_type());
    assert!(PrimitiveType::String.is_constant_type());
}

#[test]
fn arity_suffixes_are_normalized() {
    assert_eq!(Arity::Scalar.suffix(), "");
    assert_eq!(Arity::FixedArray(9).suffix(), "[9]");
    assert_eq!(Arity::DynamicArray.suffix(), "[]");
}

// ── CompilerConfig ───────────────────────────────────────────────────────────

#[test]
fn empty_toml_yields_defaults() {
    let config = CompilerConfig::from_toml_str("").unwrap();
    assert_eq!(config, CompilerConfig::default());
    assert_eq!(config.header_type, TypeRef::new("std_msgs", "Header"));
    assert!(config.is_reserved("Header"));
    assert!(config.searches("anything"));
}

#[test]
fn toml_overrides_individual_keys() {
    let config = CompilerConfig::from_toml_str(
        r#"
header_type = "my_msgs/Stamp"
search_path = ["geometry_msgs"]
"#,
    )
    .unwrap();
    assert_eq!(config.header_type, TypeRef::new("my_msgs", "Stamp"));
    assert_eq!(config.builtin_package, "std_msgs");
    assert!(config.searches("geometry_msgs"));
    assert!(!config.searches("nav_msgs"));
}

#[test]
fn toml_with_bad_header_type_is_rejected() {
    let err = CompilerConfig::from_toml_str(r#"header_type = "Header""#).unwrap_err();
    assert!(
        matches!(err, ConfigError::Toml(ref msg) if msg.contains("invalid type name")),
        "unexpected error: {err}"
    );
}
