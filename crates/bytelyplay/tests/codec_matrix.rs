use bytelyplay::{
    ByteBuf, Codec, CodecConfig, CodecError, EncodingFormat, FieldKind, FieldReader, FieldWriter,
    Record, Result, TypeSpec, UnknownFieldPolicy, Value,
};

#[derive(Debug, Clone, PartialEq)]
struct Widget {
    id: i64,
    name: String,
    tags: Vec<String>,
}

impl Record for Widget {
    fn write(&self, out: &mut FieldWriter<'_>) -> Result<()> {
        out.put("id", &self.id)?;
        out.put("name", &self.name)?;
        out.put("tags", &self.tags)
    }

    fn read(input: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            id: input.take("id")?,
            name: input.take("name")?,
            tags: input.take("tags")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Reading {
    value: f64,
    count: i64,
    unit: String,
    raw: ByteBuf,
    note: Option<String>,
}

impl Record for Reading {
    fn write(&self, out: &mut FieldWriter<'_>) -> Result<()> {
        out.put("value", &self.value)?;
        out.put("count", &self.count)?;
        out.put("unit", &self.unit)?;
        out.put("raw", &self.raw)?;
        out.put("note", &self.note)
    }

    fn read(input: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            value: input.take("value")?,
            count: input.take("count")?,
            unit: input.take("unit")?,
            raw: input.take_or_default("raw")?,
            note: input.take("note")?,
        })
    }
}

fn widget_spec() -> TypeSpec {
    TypeSpec::new("Widget")
        .required("id", FieldKind::Int)
        .required("name", FieldKind::Text)
        .required("tags", FieldKind::sequence(FieldKind::Text))
}

fn reading_spec() -> TypeSpec {
    TypeSpec::new("Reading")
        .required("value", FieldKind::Float)
        .required("count", FieldKind::Int)
        .defaulted("unit", FieldKind::Text, "celsius")
        .optional("raw", FieldKind::Bytes)
        .optional("note", FieldKind::Text)
}

fn codec_with(config: CodecConfig) -> Codec {
    Codec::builder()
        .register::<Widget>(widget_spec())
        .unwrap()
        .register::<Reading>(reading_spec())
        .unwrap()
        .config(config)
        .build()
        .unwrap()
}

fn codec() -> Codec {
    codec_with(CodecConfig::default())
}

fn widget() -> Widget {
    Widget {
        id: 7,
        name: "widget".into(),
        tags: vec!["a".into(), "b".into()],
    }
}

#[test]
fn widget_scenario_cbor_and_json_agree() {
    let codec = codec();
    let cbor = codec.encode(&widget(), EncodingFormat::Cbor).unwrap();
    let from_cbor: Widget = codec.decode(&cbor, EncodingFormat::Cbor).unwrap();
    assert_eq!(from_cbor, widget());

    let json = codec.encode(&widget(), EncodingFormat::Json).unwrap();
    assert_eq!(
        String::from_utf8(json.clone()).unwrap(),
        r#"{"id":7,"name":"widget","tags":["a","b"]}"#
    );
    let from_json: Widget = codec.decode(&json, EncodingFormat::Json).unwrap();
    assert_eq!(from_json, from_cbor);
}

#[test]
fn cross_format_equivalence_matrix() {
    let codec = codec();
    let reading = Reading {
        value: 21.5,
        count: -3,
        unit: "kelvin".into(),
        raw: ByteBuf(vec![0, 1, 0xfe, 0xff]),
        note: Some("ünïcødé".into()),
    };
    let expected = codec.to_value(&reading).unwrap();
    for format in EncodingFormat::ALL {
        let bytes = codec.encode(&reading, format).unwrap();
        let back: Reading = codec.decode(&bytes, format).unwrap();
        assert_eq!(back, reading, "{format}");
        assert_eq!(codec.decode_value(&bytes, format).unwrap(), expected, "{format}");
    }
}

#[test]
fn sequences_of_records() {
    let codec = codec();
    let widgets = vec![widget(), Widget { id: 8, name: "gadget".into(), tags: vec![] }];
    for format in EncodingFormat::ALL {
        let bytes = codec.encode_seq(&widgets, format).unwrap();
        assert_eq!(codec.decode_seq::<Widget>(&bytes, format).unwrap(), widgets);
    }
    let empty: Vec<Widget> = Vec::new();
    let bytes = codec.encode_seq(&empty, EncodingFormat::Cbor).unwrap();
    assert_eq!(bytes, vec![0x80]);
}

#[test]
fn unknown_fields_are_ignored_by_default() {
    let codec = codec();
    let newer = Value::mapping([
        ("id", Value::Int(7)),
        ("name", Value::from("widget")),
        ("tags", Value::sequence(["a", "b"])),
        ("color", Value::from("blue")),
    ]);
    for format in EncodingFormat::ALL {
        let bytes = codec.encode_value(&newer, format).unwrap();
        assert_eq!(codec.decode::<Widget>(&bytes, format).unwrap(), widget());
    }
}

#[test]
fn unknown_fields_rejected_on_request() {
    let codec = codec_with(CodecConfig {
        unknown_fields: UnknownFieldPolicy::Reject,
        ..CodecConfig::default()
    });
    let bytes = br#"{"id":7,"name":"widget","tags":[],"color":"blue"}"#;
    match codec.decode::<Widget>(bytes, EncodingFormat::Json) {
        Err(CodecError::UnknownField { type_name, field }) => {
            assert_eq!(type_name, "Widget");
            assert_eq!(field, "color");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn missing_required_field() {
    let codec = codec();
    for format in EncodingFormat::ALL {
        let bytes = codec
            .encode_value(&Value::mapping([("id", Value::Int(1)), ("tags", Value::sequence(["x"]))]), format)
            .unwrap();
        match codec.decode::<Widget>(&bytes, format) {
            Err(CodecError::MissingField { type_name, field }) => {
                assert_eq!(type_name, "Widget");
                assert_eq!(field, "name");
            }
            other => panic!("{format}: unexpected {other:?}"),
        }
    }
}

#[test]
fn defaulted_and_optional_fields() {
    let codec = codec();
    let bytes = br#"{"value":1.5,"count":2,"note":null}"#;
    let reading: Reading = codec.decode(bytes, EncodingFormat::Json).unwrap();
    assert_eq!(reading.unit, "celsius");
    assert_eq!(reading.note, None);
    assert!(reading.raw.is_empty());

    // encode side: an absent optional is omitted, a default is filled in
    let value = codec
        .to_value(&Reading {
            value: 0.0,
            count: 0,
            unit: "celsius".into(),
            raw: ByteBuf::default(),
            note: None,
        })
        .unwrap();
    assert!(value.get("note").is_none());
    assert_eq!(value.get("unit"), Some(&Value::from("celsius")));
}

#[test]
fn exact_numeric_coercion() {
    let codec = codec();
    let reading: Reading = codec
        .decode(br#"{"value":3,"count":2.0}"#, EncodingFormat::Json)
        .unwrap();
    assert_eq!(reading.value, 3.0);
    assert_eq!(reading.count, 2);

    match codec.decode::<Reading>(br#"{"value":3,"count":2.5}"#, EncodingFormat::Json) {
        Err(CodecError::TypeMismatch { path, expected, .. }) => {
            assert_eq!(path, "count");
            assert_eq!(expected, "int");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn kind_mismatch_reports_path() {
    let codec = codec();
    let bytes = br#"{"id":7,"name":"w","tags":["a",2]}"#;
    match codec.decode::<Widget>(bytes, EncodingFormat::Json) {
        Err(CodecError::TypeMismatch { path, expected, found }) => {
            assert_eq!(path, "tags[1]");
            assert_eq!(expected, "text");
            assert_eq!(found, "int");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(
        codec.decode::<Widget>(b"[1,2]", EncodingFormat::Json),
        Err(CodecError::TypeMismatch { .. })
    ));
}

#[test]
fn malformed_input_every_format() {
    let codec = codec();
    for format in EncodingFormat::ALL {
        let bytes = codec.encode(&widget(), format).unwrap();
        let truncated = &bytes[..bytes.len() - 2];
        match codec.decode::<Widget>(truncated, format) {
            Err(CodecError::MalformedInput { format: reported, .. }) => assert_eq!(reported, format),
            other => panic!("{format}: unexpected {other:?}"),
        }
        assert!(matches!(
            codec.decode::<Widget>(&[0xff, 0xfe, 0xfd], format),
            Err(CodecError::MalformedInput { .. })
        ));
    }
}

#[test]
fn unrepresentable_value() {
    let codec = codec();
    let reading = Reading {
        value: f64::NAN,
        count: 0,
        unit: "x".into(),
        raw: ByteBuf::default(),
        note: None,
    };
    assert!(matches!(
        codec.encode(&reading, EncodingFormat::Json),
        Err(CodecError::Unrepresentable {
            format: EncodingFormat::Json,
            ..
        })
    ));
    let bytes = codec.encode(&reading, EncodingFormat::Cbor).unwrap();
    let back: Reading = codec.decode(&bytes, EncodingFormat::Cbor).unwrap();
    assert!(back.value.is_nan());
}

#[test]
fn unknown_type_and_unsupported_format() {
    struct Unregistered;
    impl Record for Unregistered {
        fn write(&self, _: &mut FieldWriter<'_>) -> Result<()> {
            Ok(())
        }
        fn read(_: &mut FieldReader<'_>) -> Result<Self> {
            Ok(Unregistered)
        }
    }

    let codec = codec();
    assert!(matches!(
        codec.encode(&Unregistered, EncodingFormat::Json),
        Err(CodecError::UnknownType(_))
    ));
    assert!(matches!(
        codec.decode::<Unregistered>(b"{}", EncodingFormat::Json),
        Err(CodecError::UnknownType(_))
    ));
    assert!(matches!(
        codec.format_by_name("msgpack"),
        Err(CodecError::UnsupportedFormat(_))
    ));
    assert_eq!(codec.format_by_name("smile").unwrap(), EncodingFormat::Smile);

    let json_only = Codec::builder()
        .register::<Widget>(widget_spec())
        .unwrap()
        .formats([EncodingFormat::Json])
        .build()
        .unwrap();
    assert!(matches!(
        json_only.encode(&widget(), EncodingFormat::Cbor),
        Err(CodecError::UnsupportedFormat(_))
    ));
}

#[test]
fn duplicate_registration_fails() {
    let result = Codec::builder()
        .register::<Widget>(widget_spec())
        .unwrap()
        .register::<Widget>(widget_spec());
    assert!(matches!(result, Err(CodecError::Registration(_))));
}

#[test]
fn tagged_round_trip_detects_format() {
    let codec = codec();
    for format in EncodingFormat::ALL {
        let bytes = codec.encode_tagged(&widget(), format).unwrap();
        assert_eq!(bytelyplay::detect_format(&bytes), Some(format));
        assert_eq!(codec.decode_tagged::<Widget>(&bytes).unwrap(), widget());
    }
    assert!(matches!(
        codec.decode_tagged::<Widget>(&[]),
        Err(CodecError::MalformedInput {
            format: EncodingFormat::Json,
            ..
        })
    ));
}

#[test]
fn one_codec_many_threads() {
    let codec = codec();
    std::thread::scope(|s| {
        for t in 0..8i64 {
            let codec = codec.clone();
            s.spawn(move || {
                for i in 0..100i64 {
                    let format = EncodingFormat::ALL[(t + i) as usize % 3];
                    let w = Widget {
                        id: t * 1000 + i,
                        name: format!("w{t}-{i}"),
                        tags: vec![format.to_string()],
                    };
                    let bytes = codec.encode(&w, format).unwrap();
                    assert_eq!(codec.decode::<Widget>(&bytes, format).unwrap(), w);
                }
            });
        }
    });
}

#[test]
fn text_fields_that_look_like_binary_survive() {
    let codec = codec();
    for name in [
        "data:application/octet-stream;base64,AQID",
        "data:application/octet-stream;base64,not base64!",
    ] {
        let w = Widget {
            id: 1,
            name: name.into(),
            tags: vec![format!("\\{name}")],
        };
        for format in EncodingFormat::ALL {
            let bytes = codec.encode(&w, format).unwrap();
            assert_eq!(codec.decode::<Widget>(&bytes, format).unwrap(), w, "{format}");
        }
    }
}
