//! Type registry and value conformance.
//!
//! The registry maps each native type to its [`TypeSpec`]. Conformance
//! checks a [`Value`] against a declared [`FieldKind`], applying defaults
//! and the exact numeric coercions, and produces the value the mapper hands
//! to native code.

use std::any::{type_name, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bytelyplay_pack::{Mapping, Value};
use tracing::debug;

use super::kind::{FieldKind, TypeSpec};
use crate::config::UnknownFieldPolicy;
use crate::{CodecError, Result};

/// 2^63, the first float above the `i64` range.
const I64_END: f64 = 9_223_372_036_854_775_808.0;

/// Registered type specs, looked up by native type or by type name.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    by_id: HashMap<TypeId, Arc<TypeSpec>>,
    by_name: HashMap<String, Arc<TypeSpec>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the field layout of native type `T`.
    ///
    /// Fails on a second spec for the same type or type name, and on a
    /// repeated field name.
    pub fn register<T: 'static>(&mut self, spec: TypeSpec) -> Result<()> {
        if self.by_id.contains_key(&TypeId::of::<T>()) {
            return Err(CodecError::Registration(format!(
                "type `{}` is already registered",
                type_name::<T>()
            )));
        }
        if self.by_name.contains_key(spec.name()) {
            return Err(CodecError::Registration(format!(
                "type name `{}` is already registered",
                spec.name()
            )));
        }
        let mut seen = HashSet::new();
        for field in spec.fields() {
            if !seen.insert(field.name.as_str()) {
                return Err(CodecError::Registration(format!(
                    "{}: duplicate field `{}`",
                    spec.name(),
                    field.name
                )));
            }
        }
        debug!(type_name = spec.name(), fields = spec.fields().len(), "registered type");
        let spec = Arc::new(spec);
        self.by_name.insert(spec.name().to_owned(), Arc::clone(&spec));
        self.by_id.insert(TypeId::of::<T>(), spec);
        Ok(())
    }

    pub fn spec_of<T: 'static>(&self) -> Result<&Arc<TypeSpec>> {
        self.by_id
            .get(&TypeId::of::<T>())
            .ok_or_else(|| CodecError::UnknownType(type_name::<T>().to_owned()))
    }

    pub fn spec_named(&self, name: &str) -> Option<&Arc<TypeSpec>> {
        self.by_name.get(name)
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.by_id.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Checks what can only be checked once every type is known: nested
    /// record references resolve, and every default conforms to its kind.
    pub fn validate(&self) -> Result<()> {
        let mapper = Mapper::new(self, UnknownFieldPolicy::Reject);
        for spec in self.by_name.values() {
            for field in spec.fields() {
                let mut missing = None;
                field.kind.visit_records(&mut |name| {
                    if missing.is_none() && !self.by_name.contains_key(name) {
                        missing = Some(name.to_owned());
                    }
                });
                if let Some(name) = missing {
                    return Err(CodecError::Registration(format!(
                        "{}.{}: record type `{name}` is not registered",
                        spec.name(),
                        field.name
                    )));
                }
                if let Some(default) = &field.default {
                    let path = format!("{}.{}", spec.name(), field.name);
                    mapper.conform(default.clone(), &field.kind, &path).map_err(|e| {
                        CodecError::Registration(format!("default does not conform: {e}"))
                    })?;
                }
            }
        }
        Ok(())
    }
}

/// Appends a field name to a dotted path.
pub(crate) fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_owned()
    } else {
        format!("{path}.{name}")
    }
}

pub(crate) fn index(path: &str, i: usize) -> String {
    format!("{path}[{i}]")
}

/// Int to float, only when the float holds exactly the same number.
pub(crate) fn exact_float(i: i64) -> Option<f64> {
    let f = i as f64;
    (f < I64_END && f as i64 == i).then_some(f)
}

/// Float to int, only when the float is finite, integral and in range.
pub(crate) fn exact_int(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && (-I64_END..I64_END).contains(&f)).then_some(f as i64)
}

/// Checks values against declared kinds.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Mapper<'a> {
    pub registry: &'a TypeRegistry,
    pub policy: UnknownFieldPolicy,
}

impl<'a> Mapper<'a> {
    pub fn new(registry: &'a TypeRegistry, policy: UnknownFieldPolicy) -> Self {
        Self { registry, policy }
    }

    /// Returns `value` conformed to `kind`, or the first mismatch found.
    pub fn conform(&self, value: Value, kind: &FieldKind, path: &str) -> Result<Value> {
        match (kind, value) {
            (FieldKind::Any, v) => Ok(v),
            (FieldKind::Bool, v @ Value::Bool(_))
            | (FieldKind::Int, v @ Value::Int(_))
            | (FieldKind::Float, v @ Value::Float(_))
            | (FieldKind::Text, v @ Value::Text(_))
            | (FieldKind::Bytes, v @ Value::Bytes(_)) => Ok(v),
            (FieldKind::Float, Value::Int(i)) => exact_float(i)
                .map(Value::Float)
                .ok_or_else(|| CodecError::mismatch(path, kind, format!("int {i}"))),
            (FieldKind::Int, Value::Float(f)) => exact_int(f)
                .map(Value::Int)
                .ok_or_else(|| CodecError::mismatch(path, kind, format!("float {f}"))),
            (FieldKind::Sequence(elem), Value::Sequence(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| self.conform(item, elem, &index(path, i)))
                .collect::<Result<Vec<_>>>()
                .map(Value::Sequence),
            (FieldKind::Mapping(elem), Value::Mapping(map)) => map
                .into_iter()
                .map(|(key, item)| {
                    let item = self.conform(item, elem, &join(path, &key))?;
                    Ok((key, item))
                })
                .collect::<Result<Mapping>>()
                .map(Value::Mapping),
            (FieldKind::Record(name), Value::Mapping(map)) => {
                let spec = self
                    .registry
                    .spec_named(name)
                    .ok_or_else(|| CodecError::UnknownType(name.clone()))?;
                self.conform_record(map, spec, path).map(Value::Mapping)
            }
            (kind, v) => Err(CodecError::mismatch(path, kind, v.kind())),
        }
    }

    /// Conforms a mapping to a record spec.
    ///
    /// The result holds only declared fields, in descriptor order, with
    /// defaults filled in. A null optional field counts as absent.
    pub fn conform_record(&self, mut map: Mapping, spec: &TypeSpec, path: &str) -> Result<Mapping> {
        for key in map.keys() {
            if spec.field_named(key).is_some() {
                continue;
            }
            match self.policy {
                UnknownFieldPolicy::Ignore => {
                    debug!(type_name = spec.name(), field = %key, "ignoring unknown field");
                }
                UnknownFieldPolicy::Reject => {
                    return Err(CodecError::UnknownField {
                        type_name: spec.name().to_owned(),
                        field: key.clone(),
                    });
                }
            }
        }
        let mut out = Mapping::with_capacity(spec.fields().len());
        for field in spec.fields() {
            let present = map
                .swap_remove(&field.name)
                .filter(|v| field.required || !v.is_null());
            let value = match present.or_else(|| field.default.clone()) {
                Some(v) => self.conform(v, &field.kind, &join(path, &field.name))?,
                None if field.required => {
                    return Err(CodecError::MissingField {
                        type_name: spec.name().to_owned(),
                        field: field.name.clone(),
                    })
                }
                None => continue,
            };
            out.insert(field.name.clone(), value);
        }
        Ok(out)
    }
}
