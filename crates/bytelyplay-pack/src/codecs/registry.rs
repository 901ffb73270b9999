//! Aggregate adapter holder.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{CborAdapter, FormatAdapter, JsonAdapter, PackOptions, SmileAdapter};
use crate::EncodingFormat;

/// Adapters keyed by format, in registration order.
#[derive(Clone)]
pub struct Codecs {
    adapters: IndexMap<EncodingFormat, Arc<dyn FormatAdapter>>,
}

impl Default for Codecs {
    fn default() -> Self {
        Self::new()
    }
}

impl Codecs {
    /// All three built-in adapters with default options.
    pub fn new() -> Self {
        Self::with_options(PackOptions::default())
    }

    pub fn with_options(options: PackOptions) -> Self {
        let mut codecs = Self::empty();
        codecs.insert(Arc::new(JsonAdapter::with_options(
            options.json,
            options.max_depth,
        )));
        codecs.insert(Arc::new(CborAdapter::with_max_depth(options.max_depth)));
        codecs.insert(Arc::new(SmileAdapter::with_options(
            options.smile,
            options.max_depth,
        )));
        codecs
    }

    pub fn empty() -> Self {
        Self {
            adapters: IndexMap::new(),
        }
    }

    /// Installs an adapter under its own format, returning the one it replaced.
    pub fn insert(&mut self, adapter: Arc<dyn FormatAdapter>) -> Option<Arc<dyn FormatAdapter>> {
        self.adapters.insert(adapter.format(), adapter)
    }

    pub fn remove(&mut self, format: EncodingFormat) -> Option<Arc<dyn FormatAdapter>> {
        self.adapters.shift_remove(&format)
    }

    pub fn get(&self, format: EncodingFormat) -> Option<&Arc<dyn FormatAdapter>> {
        self.adapters.get(&format)
    }

    pub fn contains(&self, format: EncodingFormat) -> bool {
        self.adapters.contains_key(&format)
    }

    pub fn formats(&self) -> impl Iterator<Item = EncodingFormat> + '_ {
        self.adapters.keys().copied()
    }
}

impl fmt::Debug for Codecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.formats()).finish()
    }
}
