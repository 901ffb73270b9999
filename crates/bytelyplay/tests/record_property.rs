use bytelyplay::{
    ByteBuf, Codec, EncodingFormat, FieldKind, FieldReader, FieldWriter, Record, Result, TypeSpec,
};
use indexmap::IndexMap;
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Sample {
    id: i64,
    ratio: f64,
    label: String,
    blob: ByteBuf,
    counts: IndexMap<String, i64>,
    parent: Option<Box<Sample>>,
}

impl Record for Sample {
    fn write(&self, out: &mut FieldWriter<'_>) -> Result<()> {
        out.put("id", &self.id)?;
        out.put("ratio", &self.ratio)?;
        out.put("label", &self.label)?;
        out.put("blob", &self.blob)?;
        out.put("counts", &self.counts)?;
        if let Some(parent) = &self.parent {
            out.put_record("parent", parent.as_ref())?;
        }
        Ok(())
    }

    fn read(input: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            id: input.take("id")?,
            ratio: input.take("ratio")?,
            label: input.take("label")?,
            blob: input.take("blob")?,
            counts: input.take("counts")?,
            parent: input.take_optional_record("parent")?.map(Box::new),
        })
    }
}

fn codec() -> Codec {
    Codec::builder()
        .register::<Sample>(
            TypeSpec::new("Sample")
                .required("id", FieldKind::Int)
                .required("ratio", FieldKind::Float)
                .required("label", FieldKind::Text)
                .required("blob", FieldKind::Bytes)
                .required("counts", FieldKind::mapping(FieldKind::Int))
                .optional("parent", FieldKind::record("Sample")),
        )
        .unwrap()
        .build()
        .unwrap()
}

fn arb_sample() -> impl Strategy<Value = Sample> {
    let leaf = (
        any::<i64>(),
        any::<f64>().prop_filter("finite", |f| f.is_finite()),
        ".{0,24}",
        proptest::collection::vec(any::<u8>(), 0..24),
        proptest::collection::vec(("[a-z]{1,4}", any::<i64>()), 0..4),
    )
        .prop_map(|(id, ratio, label, blob, counts)| Sample {
            id,
            ratio,
            label,
            blob: ByteBuf(blob),
            counts: counts.into_iter().collect(),
            parent: None,
        });
    leaf.prop_recursive(3, 8, 1, |inner| {
        (inner.clone(), inner).prop_map(|(mut child, parent)| {
            child.parent = Some(Box::new(parent));
            child
        })
    })
}

proptest! {
    #[test]
    fn records_round_trip_in_every_format(sample in arb_sample()) {
        let codec = codec();
        for format in EncodingFormat::ALL {
            let bytes = codec.encode(&sample, format).unwrap();
            prop_assert_eq!(&codec.decode::<Sample>(&bytes, format).unwrap(), &sample);
        }
    }
}
