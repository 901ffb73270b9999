//! Stateless format adapters and the registry that collects them.

mod cbor;
mod json;
mod registry;
mod smile;
mod types;

pub use cbor::CborAdapter;
pub use json::JsonAdapter;
pub use registry::Codecs;
pub use smile::SmileAdapter;
pub use types::{FormatAdapter, PackError, PackOptions};
