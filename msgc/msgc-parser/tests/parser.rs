use msgc_core::{Arity, CompilerConfig, FieldType, ParseError, PrimitiveType, TypeRef};
use msgc_parser::{parse_message, parse_service, service_halves};

fn parse(name: &str, text: &str) -> Result<msgc_core::Declaration, ParseError> {
    let type_ref: TypeRef = name.parse().unwrap();
    parse_message(&type_ref, text, &CompilerConfig::default())
}

// ── fields ───────────────────────────────────────────────────────────────────

#[test]
fn parse_basic_primitives() {
    let msg = r#"
int32 x
float64 y
string name
"#;
    let decl = parse("test_msgs/Basic", msg).unwrap();
    assert_eq!(decl.type_ref, TypeRef::new("test_msgs", "Basic"));
    let names: Vec<&str> = decl.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["x", "y", "name"]);
    assert_eq!(decl.fields[0].ty, FieldType::Primitive(PrimitiveType::I32));
    assert_eq!(decl.fields[2].ty, FieldType::Primitive(PrimitiveType::String));
    assert!(decl.fields.iter().all(|f| f.arity == Arity::Scalar));
}

#[test]
fn parse_fixed_and_dynamic_arrays() {
    let decl = parse("test_msgs/Arrays", "float64[9] K\nuint8[] data").unwrap();
    assert_eq!(decl.fields[0].arity, Arity::FixedArray(9));
    assert_eq!(decl.fields[1].arity, Arity::DynamicArray);
}

#[test]
fn parse_time_duration_and_aliases() {
    let decl = parse("test_msgs/T", "time stamp\nduration timeout\nbyte b\nchar c").unwrap();
    let types: Vec<_> = decl.fields.iter().map(|f| f.ty.clone()).collect();
    assert_eq!(
        types,
        vec![
            FieldType::Primitive(PrimitiveType::Time),
            FieldType::Primitive(PrimitiveType::Duration),
            FieldType::Primitive(PrimitiveType::Byte),
            FieldType::Primitive(PrimitiveType::Char),
        ]
    );
}

#[test]
fn parse_qualified_nested_type() {
    let decl = parse("test_msgs/Nested", "geometry_msgs/Point position").unwrap();
    let field = &decl.fields[0];
    assert_eq!(
        field.ty,
        FieldType::Nested(TypeRef::new("geometry_msgs", "Point"))
    );
    assert!(!field.implicit_package);
}

#[test]
fn bare_nested_type_uses_declaring_package() {
    let decl = parse("geometry_msgs/Pose", "Point position\nQuaternion[] rest").unwrap();
    assert_eq!(
        decl.fields[0].ty,
        FieldType::Nested(TypeRef::new("geometry_msgs", "Point"))
    );
    assert!(decl.fields[0].implicit_package);
    assert_eq!(decl.fields[1].arity, Arity::DynamicArray);
}

#[test]
fn bare_header_resolves_to_builtin_package() {
    let decl = parse("sensor_msgs/Image", "Header header\nuint32 height").unwrap();
    assert_eq!(
        decl.fields[0].ty,
        FieldType::Nested(TypeRef::new("std_msgs", "Header"))
    );
    assert!(!decl.fields[0].implicit_package);
}

#[test]
fn reserved_names_follow_configuration() {
    let config = CompilerConfig {
        builtin_package: "core_msgs".to_string(),
        reserved_names: vec!["Stamp".to_string()],
        ..CompilerConfig::default()
    };
    let type_ref = TypeRef::new("a", "B");
    let decl = parse_message(&type_ref, "Stamp s\nHeader h", &config).unwrap();
    assert_eq!(
        decl.fields[0].ty,
        FieldType::Nested(TypeRef::new("core_msgs", "Stamp"))
    );
    assert_eq!(decl.fields[1].ty, FieldType::Nested(TypeRef::new("a", "Header")));
}

// ── comments and whitespace ─────────────────────────────────────────────────

#[test]
fn comments_are_kept_verbatim_outside_semantics() {
    let msg = "# Camera frame\n\n  uint32   height   # rows, in pixels\n#trailer";
    let decl = parse("sensor_msgs/Cam", msg).unwrap();
    assert_eq!(decl.comments, vec![" Camera frame".to_string(), "trailer".to_string()]);
    assert_eq!(decl.fields.len(), 1);
    assert_eq!(decl.fields[0].name, "height");
    assert_eq!(decl.fields[0].comment.as_deref(), Some(" rows, in pixels"));
    assert_eq!(decl.source, msg);
}

#[test]
fn empty_message_has_no_fields() {
    let decl = parse("std_msgs/Empty", "# nothing here\n\n").unwrap();
    assert!(decl.fields.is_empty());
    assert!(decl.constants.is_empty());
}

// ── constants ────────────────────────────────────────────────────────────────

#[test]
fn parse_numeric_constants() {
    let decl = parse("test_msgs/C", "int32 STATUS_OK = 0 # ok\nfloat64 PI=3.14159\nbool ON=True").unwrap();
    assert_eq!(decl.constants.len(), 3);
    assert_eq!(decl.constants[0].name, "STATUS_OK");
    assert_eq!(decl.constants[0].value, "0");
    assert_eq!(decl.constants[0].comment.as_deref(), Some(" ok"));
    assert_eq!(decl.constants[1].ty, PrimitiveType::F64);
    assert_eq!(decl.constants[1].value, "3.14159");
    assert_eq!(decl.constants[2].value, "True");
    assert!(decl.fields.is_empty());
}

#[test]
fn string_constant_keeps_comment_marker_in_value() {
    let decl = parse("test_msgs/S", "string GREETING = hello # world").unwrap();
    let c = &decl.constants[0];
    assert_eq!(c.name, "GREETING");
    assert_eq!(c.value, "hello # world");
    assert_eq!(c.comment, None);
}

#[test]
fn constant_with_nested_type_is_semantic_error() {
    let err = parse("test_msgs/C", "geometry_msgs/Point ORIGIN=0").unwrap_err();
    assert!(matches!(err, ParseError::Semantic { line: 1, .. }), "{err}");
}

#[test]
fn constant_with_array_or_time_type_is_semantic_error() {
    assert!(matches!(
        parse("test_msgs/C", "int32[2] X=1").unwrap_err(),
        ParseError::Semantic { .. }
    ));
    assert!(matches!(
        parse("test_msgs/C", "time T=0").unwrap_err(),
        ParseError::Semantic { .. }
    ));
}

#[test]
fn out_of_range_constant_is_semantic_error() {
    let err = parse("test_msgs/C", "uint8 BIG=256").unwrap_err();
    assert!(format!("{err}").contains("invalid value `256`"), "{err}");
    assert!(parse("test_msgs/C", "int8 LOW=-128").is_ok());
    assert!(parse("test_msgs/C", "bool B=maybe").is_err());
}

// ── errors ───────────────────────────────────────────────────────────────────

#[test]
fn zero_or_non_numeric_array_size_is_syntax_error() {
    let err = parse("test_msgs/A", "int32 ok\nint32[0] bad").unwrap_err();
    assert_eq!(
        err,
        ParseError::Syntax {
            unit: "test_msgs/A".to_string(),
            line: 2,
            token: "int32[0]".to_string(),
            detail: "array size must be a positive integer".to_string(),
        }
    );
    let err = parse("test_msgs/A", "int32[x] bad").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { ref token, .. } if token == "int32[x]"));
}

#[test]
fn bounded_array_syntax_is_rejected() {
    let err = parse("test_msgs/A", "float64[<=10] data").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { line: 1, .. }));
}

#[test]
fn extra_tokens_are_syntax_error_naming_the_token() {
    let err = parse("test_msgs/A", "int32 x y").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { ref token, .. } if token == "y"), "{err}");
    let err = parse("test_msgs/A", "\n\nint32").unwrap_err();
    assert!(
        matches!(err, ParseError::Syntax { line: 3, ref token, .. } if token == "int32"),
        "{err}"
    );
}

#[test]
fn malformed_field_name_is_syntax_error() {
    let err = parse("test_msgs/A", "int32 2x").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { ref token, .. } if token == "2x"));
}

#[test]
fn duplicate_names_are_semantic_errors() {
    let err = parse("test_msgs/D", "int32 x\nfloat64 x").unwrap_err();
    assert_eq!(
        err,
        ParseError::Semantic {
            unit: "test_msgs/D".to_string(),
            line: 2,
            detail: "duplicate name `x`".to_string(),
        }
    );
    let err = parse("test_msgs/D", "int32 A=1\nint32 A=2").unwrap_err();
    assert!(matches!(err, ParseError::Semantic { line: 2, .. }));
}

// ── services ─────────────────────────────────────────────────────────────────

#[test]
fn parse_service_splits_request_and_response() {
    let srv = "int64 a\nint64 b\n---\nint64 sum # result";
    let type_ref = TypeRef::new("rospy_tutorials", "AddTwoInts");
    let svc = parse_service(&type_ref, srv, &CompilerConfig::default()).unwrap();
    assert_eq!(
        svc.request.type_ref,
        TypeRef::new("rospy_tutorials", "AddTwoIntsRequest")
    );
    assert_eq!(
        svc.response.type_ref,
        TypeRef::new("rospy_tutorials", "AddTwoIntsResponse")
    );
    assert_eq!(svc.request.fields.len(), 2);
    assert_eq!(svc.response.fields[0].name, "sum");
    assert_eq!(svc.request.source, "int64 a\nint64 b");
}

#[test]
fn parse_service_with_empty_halves() {
    let type_ref = TypeRef::new("std_srvs", "Empty");
    let svc = parse_service(&type_ref, "---\n", &CompilerConfig::default()).unwrap();
    assert!(svc.request.fields.is_empty());
    assert!(svc.response.fields.is_empty());
}

#[test]
fn service_halves_match_parsed_names() {
    let type_ref: TypeRef = "std_srvs/SetBool".parse().unwrap();
    let srv = parse_service(&type_ref, "bool data\n---\nbool success", &CompilerConfig::default())
        .unwrap();
    let (request, response) = service_halves(&type_ref);
    assert_eq!(request, srv.request.type_ref);
    assert_eq!(response, srv.response.type_ref);
    assert_eq!(request.to_string(), "std_srvs/SetBoolRequest");
}

#[test]
fn parse_service_reports_original_line_numbers() {
    let type_ref = TypeRef::new("s", "S");
    let err = parse_service(&type_ref, "int32 a\n---\nint32 b\nint32 b", &CompilerConfig::default())
        .unwrap_err();
    assert_eq!(
        err,
        ParseError::Semantic {
            unit: "s/SResponse".to_string(),
            line: 4,
            detail: "duplicate name `b`".to_string(),
        }
    );
}

#[test]
fn parse_service_without_separator_fails() {
    let type_ref = TypeRef::new("s", "S");
    let err = parse_service(&type_ref, "int32 a", &CompilerConfig::default()).unwrap_err();
    assert!(matches!(err, ParseError::Syntax { line: 2, .. }), "{err}");
}
