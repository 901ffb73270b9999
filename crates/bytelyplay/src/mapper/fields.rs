//! The native side of the mapper: [`Record`], [`FieldValue`] and the field
//! writer/reader handed to record implementations.

use bytelyplay_pack::{Mapping, Value};

use super::kind::{FieldDescriptor, FieldKind, TypeSpec};
use super::registry::{index, join, Mapper};
use crate::{CodecError, Result};

/// A native type that maps to a mapping of named fields.
///
/// ```
/// use bytelyplay::{FieldReader, FieldWriter, Record, Result};
///
/// struct Widget {
///     id: i64,
///     name: String,
///     tags: Vec<String>,
/// }
///
/// impl Record for Widget {
///     fn write(&self, out: &mut FieldWriter<'_>) -> Result<()> {
///         out.put("id", &self.id)?;
///         out.put("name", &self.name)?;
///         out.put("tags", &self.tags)
///     }
///
///     fn read(input: &mut FieldReader<'_>) -> Result<Self> {
///         Ok(Self {
///             id: input.take("id")?,
///             name: input.take("name")?,
///             tags: input.take("tags")?,
///         })
///     }
/// }
/// ```
pub trait Record: Sized + 'static {
    fn write(&self, out: &mut FieldWriter<'_>) -> Result<()>;

    fn read(input: &mut FieldReader<'_>) -> Result<Self>;
}

/// A native value stored in a single field.
pub trait FieldValue: Sized {
    fn encode_field(&self) -> Value;

    /// `path` names the field in errors.
    fn decode_field(value: Value, path: &str) -> Result<Self>;

    /// Value to use when the field is absent. `None` turns absence into
    /// [`CodecError::MissingField`].
    fn absent() -> Option<Self> {
        None
    }
}

fn undeclared(spec: &TypeSpec, name: &str) -> CodecError {
    CodecError::Registration(format!("{}: field `{name}` is not declared", spec.name()))
}

/// Collects the fields of one record on encode.
pub struct FieldWriter<'a> {
    mapper: Mapper<'a>,
    spec: &'a TypeSpec,
    path: String,
    fields: Mapping,
}

impl<'a> FieldWriter<'a> {
    fn declared(&self, name: &str) -> Result<()> {
        match self.spec.field_named(name) {
            Some(_) => Ok(()),
            None => Err(undeclared(self.spec, name)),
        }
    }

    pub fn put<V: FieldValue>(&mut self, name: &str, value: &V) -> Result<()> {
        self.put_value(name, value.encode_field())
    }

    pub fn put_value(&mut self, name: &str, value: Value) -> Result<()> {
        self.declared(name)?;
        self.fields.insert(name.to_owned(), value);
        Ok(())
    }

    pub fn put_record<R: Record>(&mut self, name: &str, record: &R) -> Result<()> {
        self.declared(name)?;
        let value = write_record(self.mapper, record, &join(&self.path, name))?;
        self.fields.insert(name.to_owned(), value);
        Ok(())
    }

    pub fn put_records<R: Record>(&mut self, name: &str, records: &[R]) -> Result<()> {
        self.declared(name)?;
        let path = join(&self.path, name);
        let items = records
            .iter()
            .enumerate()
            .map(|(i, record)| write_record(self.mapper, record, &index(&path, i)))
            .collect::<Result<Vec<_>>>()?;
        self.fields.insert(name.to_owned(), Value::Sequence(items));
        Ok(())
    }

    pub fn type_name(&self) -> &str {
        self.spec.name()
    }
}

/// Hands the conformed fields of one record to [`Record::read`].
pub struct FieldReader<'a> {
    mapper: Mapper<'a>,
    spec: &'a TypeSpec,
    path: String,
    fields: Mapping,
}

impl<'a> FieldReader<'a> {
    fn declared(&self, name: &str) -> Result<&'a FieldDescriptor> {
        self.spec
            .field_named(name)
            .ok_or_else(|| undeclared(self.spec, name))
    }

    fn missing(&self, name: &str) -> CodecError {
        CodecError::MissingField {
            type_name: self.spec.name().to_owned(),
            field: name.to_owned(),
        }
    }

    /// `true` when the field is present (or defaulted) in the input.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn take<V: FieldValue>(&mut self, name: &str) -> Result<V> {
        self.declared(name)?;
        match self.fields.swap_remove(name) {
            Some(value) => V::decode_field(value, &join(&self.path, name)),
            None => V::absent().ok_or_else(|| self.missing(name)),
        }
    }

    pub fn take_or_default<V: FieldValue + Default>(&mut self, name: &str) -> Result<V> {
        self.declared(name)?;
        match self.fields.swap_remove(name) {
            Some(value) => V::decode_field(value, &join(&self.path, name)),
            None => Ok(V::default()),
        }
    }

    pub fn take_record<R: Record>(&mut self, name: &str) -> Result<R> {
        self.take_optional_record(name)?
            .ok_or_else(|| self.missing(name))
    }

    pub fn take_optional_record<R: Record>(&mut self, name: &str) -> Result<Option<R>> {
        let field = self.declared(name)?;
        match self.fields.swap_remove(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => {
                read_record(self.mapper, value, &field.kind, &join(&self.path, name)).map(Some)
            }
        }
    }

    /// An absent list reads as empty.
    pub fn take_records<R: Record>(&mut self, name: &str) -> Result<Vec<R>> {
        let field = self.declared(name)?;
        let path = join(&self.path, name);
        let items = match self.fields.swap_remove(name) {
            None => return Ok(Vec::new()),
            Some(Value::Sequence(items)) => items,
            Some(other) => return Err(CodecError::mismatch(path, &field.kind, other.kind())),
        };
        let any = FieldKind::Any;
        let elem = match &field.kind {
            FieldKind::Sequence(elem) => elem.as_ref(),
            _ => &any,
        };
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| read_record(self.mapper, item, elem, &index(&path, i)))
            .collect()
    }

    pub fn type_name(&self) -> &str {
        self.spec.name()
    }
}

/// Runs `R::write` and conforms the collected fields.
pub(crate) fn write_record<R: Record>(mapper: Mapper<'_>, record: &R, path: &str) -> Result<Value> {
    let spec = mapper.registry.spec_of::<R>()?;
    let mut writer = FieldWriter {
        mapper,
        spec,
        path: path.to_owned(),
        fields: Mapping::with_capacity(spec.fields().len()),
    };
    record.write(&mut writer)?;
    mapper
        .conform_record(writer.fields, spec, path)
        .map(Value::Mapping)
}

/// Conforms `value` to `R`'s spec and runs `R::read`.
///
/// When `declared` already names `R`'s spec the value was conformed along
/// with its parent and is used as is.
pub(crate) fn read_record<R: Record>(
    mapper: Mapper<'_>,
    value: Value,
    declared: &FieldKind,
    path: &str,
) -> Result<R> {
    let spec = mapper.registry.spec_of::<R>()?;
    let fields = match (declared, value) {
        (FieldKind::Record(name), Value::Mapping(map)) if name == spec.name() => map,
        (FieldKind::Record(name), _) if name != spec.name() => {
            return Err(CodecError::Registration(format!(
                "`{path}` is declared as record {name}, read as {}",
                spec.name()
            )))
        }
        (_, Value::Mapping(map)) => mapper.conform_record(map, spec, path)?,
        (_, other) => {
            return Err(CodecError::mismatch(
                path,
                FieldKind::Record(spec.name().to_owned()),
                other.kind(),
            ))
        }
    };
    let mut reader = FieldReader {
        mapper,
        spec,
        path: path.to_owned(),
        fields,
    };
    R::read(&mut reader)
}
