use msgc_codec::{RosMessage, WireReader, WireWriter, decode, encode, frame, unframe};
use msgc_core::{CodecError, CompilerConfig, TypeRef, Value};
use msgc_parser::parse_message;
use msgc_plan::PlanTable;
use msgc_resolver::TypeTable;

// ── helpers ──────────────────────────────────────────────────────────────────

const HEADER: &str = "uint32 seq\ntime stamp\nstring frame_id";

fn plans(units: &[(&str, &str)], root: &str) -> PlanTable {
    let config = CompilerConfig::default();
    let table = TypeTable::from_declarations(units.iter().map(|(n, t)| {
        let r: TypeRef = n.parse().unwrap();
        parse_message(&r, t, &config).unwrap()
    }))
    .unwrap();
    let res = table.resolve(&root.parse().unwrap(), &config).unwrap();
    PlanTable::build(&res, &config).unwrap()
}

fn camera_plans() -> PlanTable {
    plans(
        &[
            ("std_msgs/Header", HEADER),
            (
                "sensor_msgs/Camera",
                "Header header\nuint32 height\nuint32 width\nstring name",
            ),
        ],
        "sensor_msgs/Camera",
    )
}

fn header_value(seq: u32, secs: u32, nsecs: u32, frame_id: &str) -> Value {
    Value::Struct(vec![
        Value::U32(seq),
        Value::Time { secs, nsecs },
        Value::string(frame_id),
    ])
}

fn camera_bytes() -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&7u32.to_le_bytes());
    b.extend_from_slice(&100u32.to_le_bytes());
    b.extend_from_slice(&200u32.to_le_bytes());
    b.extend_from_slice(&4u32.to_le_bytes());
    b.extend_from_slice(b"base");
    b.extend_from_slice(&480u32.to_le_bytes());
    b.extend_from_slice(&640u32.to_le_bytes());
    b.extend_from_slice(&3u32.to_le_bytes());
    b.extend_from_slice(b"cam");
    b
}

fn camera_value() -> Value {
    Value::Struct(vec![
        header_value(7, 100, 200, "base"),
        Value::U32(480),
        Value::U32(640),
        Value::string("cam"),
    ])
}

// ── plan-driven codec ────────────────────────────────────────────────────────

#[test]
fn encode_header_dimensions_and_name() {
    let bytes = encode(&camera_plans(), &camera_value()).unwrap();
    assert_eq!(bytes, camera_bytes());
}

#[test]
fn decode_header_dimensions_and_name() {
    let value = decode(&camera_plans(), &camera_bytes()).unwrap();
    assert_eq!(value, camera_value());
}

#[test]
fn arrays_time_and_aliases_round_trip() {
    let p = plans(
        &[(
            "p/Mixed",
            "bool ok\nbyte b\nchar c\nduration d\nint16[2] pair\nfloat32[] samples\nstring[] tags",
        )],
        "p/Mixed",
    );
    let value = Value::Struct(vec![
        Value::Bool(true),
        Value::I8(-3),
        Value::U8(200),
        Value::Duration { secs: -1, nsecs: 5 },
        Value::Array(vec![Value::I16(-2), Value::I16(300)]),
        Value::Array(vec![Value::F32(0.5), Value::F32(-1.25)]),
        Value::Array(vec![Value::string("a"), Value::string("")]),
    ]);
    let bytes = encode(&p, &value).unwrap();
    let expected_len = 1 + 1 + 1 + 8 + 4 + (4 + 8) + (4 + 5 + 4);
    assert_eq!(bytes.len(), expected_len);
    assert_eq!(&bytes[..3], &[1u8, 0xfd, 200]);
    assert_eq!(decode(&p, &bytes).unwrap(), value);
}

#[test]
fn fixed_arrays_have_no_prefix() {
    let p = plans(&[("p/Fixed", "uint8[3] rgb")], "p/Fixed");
    let value = Value::Struct(vec![Value::Array(vec![
        Value::U8(1),
        Value::U8(2),
        Value::U8(3),
    ])]);
    assert_eq!(encode(&p, &value).unwrap(), vec![1, 2, 3]);
}

#[test]
fn nested_dynamic_array_round_trip() {
    let p = plans(
        &[
            ("geometry_msgs/Point", "float64 x\nfloat64 y\nfloat64 z"),
            ("nav_msgs/Path", "geometry_msgs/Point[] points"),
        ],
        "nav_msgs/Path",
    );
    let point = |v: f64| Value::Struct(vec![Value::F64(v), Value::F64(v + 1.0), Value::F64(v + 2.0)]);
    let value = Value::Struct(vec![Value::Array(vec![point(0.0), point(10.0)])]);
    let bytes = encode(&p, &value).unwrap();
    assert_eq!(bytes.len(), 4 + 2 * 24);
    assert_eq!(decode(&p, &bytes).unwrap(), value);
}

// ── decode errors ────────────────────────────────────────────────────────────

#[test]
fn oversized_string_prefix_fails_before_reading() {
    let mut bytes = camera_bytes();
    let name_prefix = bytes.len() - 7;
    bytes[name_prefix..name_prefix + 4].copy_from_slice(&u32::MAX.to_le_bytes());
    let err = decode(&camera_plans(), &bytes).unwrap_err();
    assert_eq!(
        err,
        CodecError::Decode {
            field: "Camera.name".to_string(),
            offset: name_prefix,
            detail: "length prefix 4294967295 exceeds the 3 remaining bytes".to_string(),
        }
    );
}

#[test]
fn oversized_array_prefix_fails() {
    let p = plans(&[("p/Samples", "float64[] samples")], "p/Samples");
    let mut bytes = 2u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&1.0f64.to_le_bytes());
    let err = decode(&p, &bytes).unwrap_err();
    assert!(matches!(err, CodecError::Decode { ref field, offset: 0, .. } if field == "Samples.samples"));
}

fn empty_items_plans() -> PlanTable {
    plans(
        &[("std_msgs/Empty", ""), ("p/Bag", "std_msgs/Empty[] items")],
        "p/Bag",
    )
}

#[test]
fn zero_sized_element_prefix_is_bounded_by_input() {
    for count in [u32::MAX, 20_000_000, 5] {
        let err = decode(&empty_items_plans(), &count.to_le_bytes()).unwrap_err();
        let CodecError::Decode { field, offset, .. } = err else {
            panic!("expected decode error for count {count}");
        };
        assert_eq!(field, "Bag.items");
        assert_eq!(offset, 0);
    }
}

#[test]
fn zero_sized_elements_within_bound_decode() {
    let value = decode(&empty_items_plans(), &3u32.to_le_bytes()).unwrap();
    assert_eq!(
        value,
        Value::Struct(vec![Value::Array(vec![Value::Struct(vec![]); 3])])
    );
}

#[test]
fn truncated_buffer_names_nested_field() {
    let bytes = camera_bytes();
    let err = decode(&camera_plans(), &bytes[..6]).unwrap_err();
    let CodecError::Decode { field, offset, .. } = err else {
        panic!("expected decode error");
    };
    assert_eq!(field, "Camera.header.stamp");
    assert_eq!(offset, 4);
}

#[test]
fn trailing_bytes_are_rejected() {
    let mut bytes = camera_bytes();
    bytes.push(0);
    let err = decode(&camera_plans(), &bytes).unwrap_err();
    assert!(matches!(err, CodecError::Decode { .. }));
}

#[test]
fn invalid_utf8_is_a_decode_error() {
    let p = plans(&[("std_msgs/String", "string data")], "std_msgs/String");
    let bytes: [u8; 6] = [2, 0, 0, 0, 0xff, 0xfe];
    assert!(matches!(
        decode(&p, &bytes),
        Err(CodecError::Decode { offset: 4, .. })
    ));
}

// ── encode errors ────────────────────────────────────────────────────────────

#[test]
fn wrong_variant_is_an_encoding_error() {
    let mut value = camera_value();
    if let Value::Struct(fields) = &mut value {
        fields[1] = Value::I32(480);
    }
    let err = encode(&camera_plans(), &value).unwrap_err();
    let CodecError::Encoding { field, offset, .. } = err else {
        panic!("expected encoding error");
    };
    assert_eq!(field, "Camera.height");
    assert_eq!(offset, 20);
}

#[test]
fn wrong_struct_arity_and_fixed_length_are_encoding_errors() {
    let short = Value::Struct(vec![header_value(0, 0, 0, "")]);
    assert!(matches!(
        encode(&camera_plans(), &short),
        Err(CodecError::Encoding { .. })
    ));

    let p = plans(&[("p/Fixed", "uint8[3] rgb")], "p/Fixed");
    let two = Value::Struct(vec![Value::Array(vec![Value::U8(1), Value::U8(2)])]);
    assert!(matches!(encode(&p, &two), Err(CodecError::Encoding { ref field, .. }) if field == "Fixed.rgb"));
}

// ── framing ──────────────────────────────────────────────────────────────────

#[test]
fn frame_and_unframe_stream() {
    let mut stream = frame(b"abc").unwrap();
    stream.extend(frame(b"").unwrap());
    assert_eq!(&stream[..4], &3u32.to_le_bytes());

    let (first, rest) = unframe(&stream).unwrap();
    assert_eq!(first, b"abc");
    let (second, rest) = unframe(rest).unwrap();
    assert!(second.is_empty());
    assert!(rest.is_empty());
    assert!(unframe(&[5, 0, 0, 0, 1]).is_err());
}

// ── generated-style bindings ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
struct Header {
    seq: u32,
    stamp: (u32, u32),
    frame_id: String,
}

impl RosMessage for Header {
    const TYPE_NAME: &'static str = "std_msgs/Header";
    const MD5SUM: &'static str = "2176decaecbce78abc3b96ef049fabed";
    const DEFINITION: &'static str = "uint32 seq\ntime stamp\nstring frame_id";

    fn encode_to(&self, w: &mut WireWriter, path: &str) -> Result<(), CodecError> {
        w.put_u32(self.seq);
        w.put_time(self.stamp.0, self.stamp.1);
        w.put_string(&format!("{path}.frame_id"), &self.frame_id)
    }

    fn decode_from(r: &mut WireReader<'_>, path: &str) -> Result<Self, CodecError> {
        Ok(Self {
            seq: r.read_u32(&format!("{path}.seq"))?,
            stamp: r.read_time(&format!("{path}.stamp"))?,
            frame_id: r.read_string(&format!("{path}.frame_id"))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Scan {
    header: Header,
    ranges: Vec<f32>,
}

impl RosMessage for Scan {
    const TYPE_NAME: &'static str = "test_msgs/Scan";
    const MD5SUM: &'static str = "";
    const DEFINITION: &'static str = "Header header\nfloat32[] ranges";

    fn encode_to(&self, w: &mut WireWriter, path: &str) -> Result<(), CodecError> {
        self.header.encode_to(w, &format!("{path}.header"))?;
        w.put_len(&format!("{path}.ranges"), self.ranges.len())?;
        for v in &self.ranges {
            w.put_f32(*v);
        }
        Ok(())
    }

    fn decode_from(r: &mut WireReader<'_>, path: &str) -> Result<Self, CodecError> {
        Ok(Self {
            header: Header::decode_from(r, &format!("{path}.header"))?,
            ranges: r.read_seq(&format!("{path}.ranges"), 4, |r, p| r.read_f32(p))?,
        })
    }
}

#[test]
fn binding_matches_plan_driven_codec() {
    let header = Header {
        seq: 7,
        stamp: (100, 200),
        frame_id: "base".to_string(),
    };
    let bytes = header.encode().unwrap();
    assert_eq!(bytes, camera_bytes()[..20].to_vec());
    assert_eq!(Header::decode(&bytes).unwrap(), header);

    let header_plans = plans(&[("std_msgs/Header", HEADER)], "std_msgs/Header");
    assert_eq!(
        decode(&header_plans, &bytes).unwrap(),
        header_value(7, 100, 200, "base")
    );
}

#[test]
fn binding_reports_paths_and_trailing_bytes() {
    let scan = Scan {
        header: Header {
            seq: 1,
            stamp: (0, 0),
            frame_id: String::new(),
        },
        ranges: vec![1.0, 2.5],
    };
    let mut bytes = scan.encode().unwrap();
    assert_eq!(Scan::decode(&bytes).unwrap(), scan);

    bytes.push(9);
    assert!(matches!(Scan::decode(&bytes), Err(CodecError::Decode { ref field, .. }) if field == "Scan"));

    let truncated = &bytes[..bytes.len() - 4];
    let err = Scan::decode(truncated).unwrap_err();
    assert!(matches!(err, CodecError::Decode { ref field, .. } if field == "Scan.ranges"));
}
