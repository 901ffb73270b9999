use std::sync::{Arc, Mutex};

use bytelyplay::{
    Codec, CodecError, DataStore, EncodingFormat, FieldKind, FieldReader, FieldWriter, LoadReport,
    Record, Result, TypeSpec, Value,
};

#[derive(Debug, Clone, Default, PartialEq)]
struct Settings {
    volume: i64,
    theme: String,
}

impl Record for Settings {
    fn write(&self, out: &mut FieldWriter<'_>) -> Result<()> {
        out.put("volume", &self.volume)?;
        out.put("theme", &self.theme)
    }

    fn read(input: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            volume: input.take("volume")?,
            theme: input.take("theme")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Progress {
    level: i64,
    score: f64,
    unlocked: Vec<String>,
}

impl Record for Progress {
    fn write(&self, out: &mut FieldWriter<'_>) -> Result<()> {
        out.put("level", &self.level)?;
        out.put("score", &self.score)?;
        out.put("unlocked", &self.unlocked)
    }

    fn read(input: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            level: input.take("level")?,
            score: input.take("score")?,
            unlocked: input.take("unlocked")?,
        })
    }
}

fn codec() -> Codec {
    Codec::builder()
        .register::<Settings>(
            TypeSpec::new("Settings")
                .required("volume", FieldKind::Int)
                .defaulted("theme", FieldKind::Text, "dark"),
        )
        .unwrap()
        .register::<Progress>(
            TypeSpec::new("Progress")
                .required("level", FieldKind::Int)
                .required("score", FieldKind::Float)
                .optional("unlocked", FieldKind::sequence(FieldKind::Text)),
        )
        .unwrap()
        .build()
        .unwrap()
}

struct App {
    settings: Arc<Mutex<Settings>>,
    progress: Arc<Mutex<Progress>>,
}

impl App {
    fn new() -> Self {
        Self {
            settings: Arc::new(Mutex::new(Settings::default())),
            progress: Arc::new(Mutex::new(Progress::default())),
        }
    }

    fn store(&self, codec: Codec, with_progress: bool) -> DataStore {
        let mut builder = DataStore::builder(codec);
        let (get, set) = (Arc::clone(&self.settings), Arc::clone(&self.settings));
        builder
            .slot(
                move || get.lock().unwrap().clone(),
                move |s| *set.lock().unwrap() = s,
            )
            .unwrap();
        if with_progress {
            let (get, set) = (Arc::clone(&self.progress), Arc::clone(&self.progress));
            builder
                .slot(
                    move || get.lock().unwrap().clone(),
                    move |p| *set.lock().unwrap() = p,
                )
                .unwrap();
        }
        builder.build()
    }
}

#[test]
fn save_and_load_every_format() {
    let codec = codec();
    for format in EncodingFormat::ALL {
        let source = App::new();
        *source.settings.lock().unwrap() = Settings {
            volume: 11,
            theme: "light".into(),
        };
        *source.progress.lock().unwrap() = Progress {
            level: 4,
            score: 1234.5,
            unlocked: vec!["sword".into(), "map".into()],
        };
        let bytes = source.store(codec.clone(), true).save(format).unwrap();
        assert_eq!(bytelyplay::detect_format(&bytes), Some(format));

        let target = App::new();
        let report = target.store(codec.clone(), true).load(&bytes).unwrap();
        assert_eq!(
            report,
            LoadReport {
                restored: vec![0, 1],
                missing: vec![],
            }
        );
        assert_eq!(*target.settings.lock().unwrap(), *source.settings.lock().unwrap());
        assert_eq!(*target.progress.lock().unwrap(), *source.progress.lock().unwrap());
    }
}

#[test]
fn document_layout() {
    let codec = codec();
    let app = App::new();
    *app.settings.lock().unwrap() = Settings {
        volume: 3,
        theme: "dark".into(),
    };
    let bytes = app.store(codec.clone(), false).save(EncodingFormat::Json).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        r#"{"0":{"type":"Settings","data":{"volume":3,"theme":"dark"}}}"#
    );
}

#[test]
fn missing_slot_is_reported() {
    let codec = codec();
    let old = App::new();
    old.settings.lock().unwrap().volume = 5;
    let bytes = old.store(codec.clone(), false).save(EncodingFormat::Smile).unwrap();

    let newer = App::new();
    newer.progress.lock().unwrap().level = 99;
    let report = newer.store(codec, true).load(&bytes).unwrap();
    assert_eq!(report.restored, vec![0]);
    assert_eq!(report.missing, vec![1]);
    assert_eq!(newer.settings.lock().unwrap().volume, 5);
    assert_eq!(newer.progress.lock().unwrap().level, 99);
}

#[test]
fn defaults_apply_inside_slot_data() {
    let codec = codec();
    let doc = br#"{"0":{"type":"Settings","data":{"volume":2}},"7":{"type":"Ignored","data":null}}"#;
    let app = App::new();
    let report = app.store(codec, false).load(doc).unwrap();
    assert_eq!(report.restored, vec![0]);
    assert_eq!(
        *app.settings.lock().unwrap(),
        Settings {
            volume: 2,
            theme: "dark".into(),
        }
    );
}

#[test]
fn malformed_documents() {
    let codec = codec();
    let app = App::new();
    let store = app.store(codec.clone(), false);
    assert!(matches!(store.load(&[]), Err(CodecError::MalformedInput { .. })));
    assert!(matches!(
        store.load(&[0x01, 0xff]),
        Err(CodecError::MalformedInput {
            format: EncodingFormat::Cbor,
            ..
        })
    ));
    assert!(matches!(store.load(b"[]"), Err(CodecError::TypeMismatch { .. })));
    let no_data = codec
        .encode_value_tagged(
            &Value::mapping([("0", Value::mapping([("type", Value::from("Settings"))]))]),
            EncodingFormat::Cbor,
        )
        .unwrap();
    assert!(matches!(
        store.load(&no_data),
        Err(CodecError::MissingField { field, .. }) if field == "data"
    ));
}

#[test]
fn store_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DataStore>();

    let codec = codec();
    let app = App::new();
    let store = app.store(codec, true);
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let bytes = store.save(EncodingFormat::Cbor).unwrap();
                store.load(&bytes).unwrap();
            });
        }
    });
}

#[test]
fn failed_load_leaves_every_slot_untouched() {
    let codec = codec();
    let settings = Value::mapping([("volume", Value::Int(9)), ("theme", Value::from("light"))]);
    let wrong_type = Value::mapping([
        ("0", Value::mapping([("type", Value::from("Settings")), ("data", settings.clone())])),
        ("1", Value::mapping([("type", Value::from("Settings")), ("data", settings.clone())])),
    ]);
    let bad_data = Value::mapping([
        ("0", Value::mapping([("type", Value::from("Settings")), ("data", settings)])),
        (
            "1",
            Value::mapping([
                ("type", Value::from("Progress")),
                ("data", Value::mapping([("score", Value::Float(1.0))])),
            ]),
        ),
    ]);

    let app = App::new();
    app.settings.lock().unwrap().volume = 1;
    let store = app.store(codec.clone(), true);
    for (doc, format) in [(wrong_type, EncodingFormat::Json), (bad_data, EncodingFormat::Smile)] {
        let bytes = codec.encode_value_tagged(&doc, format).unwrap();
        assert!(store.load(&bytes).is_err(), "{format}");
        assert_eq!(
            *app.settings.lock().unwrap(),
            Settings {
                volume: 1,
                theme: String::new(),
            }
        );
        assert_eq!(*app.progress.lock().unwrap(), Progress::default());
    }
}
