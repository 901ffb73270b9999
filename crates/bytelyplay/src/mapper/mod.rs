//! Type Mapper: native records to and from [`bytelyplay_pack::Value`]
//! trees, driven by explicit field descriptors.

mod fields;
mod kind;
mod native;
mod registry;

pub use fields::{FieldReader, FieldValue, FieldWriter, Record};
pub use kind::{FieldDescriptor, FieldKind, TypeSpec};
pub use native::ByteBuf;
pub use registry::TypeRegistry;

pub(crate) use fields::{read_record, write_record};
pub(crate) use registry::Mapper;
