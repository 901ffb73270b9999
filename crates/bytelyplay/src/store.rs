//! Slot store: capture application state from getter/setter pairs into one
//! tagged document, and restore it later.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use bytelyplay_pack::{EncodingFormat, Mapping, Value};
use tracing::{debug, warn};

use crate::{Codec, CodecError, Record, Result};

const TYPE_KEY: &str = "type";
const DATA_KEY: &str = "data";

type Getter = Box<dyn Fn(&Codec) -> Result<Value> + Send + Sync>;
/// A decoded record waiting for its setter.
type Pending = Box<dyn FnOnce()>;
/// Decodes slot data into a [`Pending`] setter call.
type Setter = Box<dyn Fn(&Codec, Value) -> Result<Pending> + Send + Sync>;

struct Slot {
    id: u32,
    type_name: String,
    get: Getter,
    set: Setter,
}

/// Outcome of [`DataStore::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Slots whose setter ran, in slot order.
    pub restored: Vec<u32>,
    /// Slots with no entry in the document.
    pub missing: Vec<u32>,
}

/// Registers slots for a [`DataStore`].
pub struct DataStoreBuilder {
    codec: Codec,
    slots: Vec<Slot>,
    taken: HashSet<u32>,
    next_id: u32,
}

impl DataStoreBuilder {
    /// Adds a slot under the lowest id not yet taken, counting up from 0.
    pub fn slot<T, G, S>(&mut self, getter: G, setter: S) -> Result<u32>
    where
        T: Record,
        G: Fn() -> T + Send + Sync + 'static,
        S: Fn(T) + Send + Sync + 'static,
    {
        while self.taken.contains(&self.next_id) {
            self.next_id = self
                .next_id
                .checked_add(1)
                .ok_or_else(|| CodecError::Registration("slot ids exhausted".into()))?;
        }
        let id = self.next_id;
        self.slot_with_id(id, getter, setter)
    }

    pub fn slot_with_id<T, G, S>(&mut self, id: u32, getter: G, setter: S) -> Result<u32>
    where
        T: Record,
        G: Fn() -> T + Send + Sync + 'static,
        S: Fn(T) + Send + Sync + 'static,
    {
        if self.taken.contains(&id) {
            return Err(CodecError::Registration(format!("slot id {id} is already taken")));
        }
        let type_name = self.codec.type_name::<T>()?.to_owned();
        debug!(id, type_name = %type_name, "registered slot");
        self.taken.insert(id);
        let setter = Arc::new(setter);
        self.slots.push(Slot {
            id,
            type_name,
            get: Box::new(move |codec: &Codec| codec.to_value(&getter())),
            set: Box::new(move |codec: &Codec, data: Value| {
                let record = codec.from_value::<T>(data)?;
                let setter = Arc::clone(&setter);
                Ok(Box::new(move || setter(record)) as Pending)
            }),
        });
        Ok(id)
    }

    pub fn build(self) -> DataStore {
        DataStore {
            codec: self.codec,
            slots: self.slots,
        }
    }
}

/// A set of slots saved and loaded as one document.
///
/// The document is a mapping from slot id to
/// `{"type": <registered type name>, "data": <record>}`, written with the
/// format identifier byte so [`DataStore::load`] can detect the format.
pub struct DataStore {
    codec: Codec,
    slots: Vec<Slot>,
}

impl fmt::Debug for DataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.slots.iter().map(|slot| (slot.id, &slot.type_name)))
            .finish()
    }
}

impl DataStore {
    pub fn builder(codec: Codec) -> DataStoreBuilder {
        DataStoreBuilder {
            codec,
            slots: Vec::new(),
            taken: HashSet::new(),
            next_id: 0,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots.iter().map(|slot| slot.id)
    }

    /// Captures every slot and encodes the document.
    pub fn save(&self, format: EncodingFormat) -> Result<Vec<u8>> {
        let mut root = Mapping::with_capacity(self.slots.len());
        for slot in &self.slots {
            let data = (slot.get)(&self.codec)?;
            root.insert(
                slot.id.to_string(),
                Value::mapping([
                    (TYPE_KEY, Value::from(slot.type_name.as_str())),
                    (DATA_KEY, data),
                ]),
            );
        }
        self.codec.encode_value_tagged(&Value::Mapping(root), format)
    }

    /// Restores every slot found in `bytes`.
    ///
    /// Slots absent from the document are reported, not treated as errors.
    /// Entries for unknown ids are skipped. Every entry is checked and decoded
    /// before the first setter runs, so a failed load changes nothing.
    pub fn load(&self, bytes: &[u8]) -> Result<LoadReport> {
        let root = match self.codec.decode_value_tagged(bytes)? {
            Value::Mapping(root) => root,
            other => return Err(CodecError::mismatch("", "mapping", other.kind())),
        };
        let mut report = LoadReport::default();
        let mut pending = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let key = slot.id.to_string();
            let Some(entry) = root.get(&key) else {
                warn!(id = slot.id, type_name = %slot.type_name, "no data for slot");
                report.missing.push(slot.id);
                continue;
            };
            let found = entry
                .get(TYPE_KEY)
                .ok_or_else(|| CodecError::MissingField {
                    type_name: slot.type_name.clone(),
                    field: TYPE_KEY.into(),
                })?
                .as_text()
                .map_err(|e| CodecError::mismatch(format!("{key}.{TYPE_KEY}"), e.expected, e.found))?;
            if found != slot.type_name {
                return Err(CodecError::mismatch(key, &slot.type_name, found));
            }
            let data = entry.get(DATA_KEY).cloned().ok_or_else(|| CodecError::MissingField {
                type_name: slot.type_name.clone(),
                field: DATA_KEY.into(),
            })?;
            pending.push((slot.set)(&self.codec, data)?);
            report.restored.push(slot.id);
        }
        for apply in pending {
            apply();
        }
        Ok(report)
    }
}
