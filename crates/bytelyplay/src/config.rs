//! Codec configuration, loadable from any serde format.

use bytelyplay_pack::json::JsonOptions;
use bytelyplay_pack::smile::SmileOptions;
use bytelyplay_pack::{PackOptions, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};

/// What to do with mapping keys that no field descriptor declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Skip the key and log it at debug level.
    #[default]
    Ignore,
    /// Fail with [`crate::CodecError::UnknownField`].
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonConfig {
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmileConfig {
    pub shared_names: bool,
    pub shared_values: bool,
    pub raw_binary: bool,
}

impl Default for SmileConfig {
    fn default() -> Self {
        let options = SmileOptions::default();
        Self {
            shared_names: options.shared_names,
            shared_values: options.shared_values,
            raw_binary: options.raw_binary,
        }
    }
}

/// Settings applied by [`crate::CodecBuilder::config`].
///
/// Every field has a default, so a partial document is enough:
///
/// ```
/// use bytelyplay::{CodecConfig, UnknownFieldPolicy};
///
/// let config: CodecConfig = serde_json::from_str(r#"{"unknown_fields":"reject"}"#).unwrap();
/// assert_eq!(config.unknown_fields, UnknownFieldPolicy::Reject);
/// assert_eq!(config, CodecConfig { unknown_fields: UnknownFieldPolicy::Reject, ..Default::default() });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub unknown_fields: UnknownFieldPolicy,
    /// Deepest container nesting accepted on encode and decode.
    pub max_depth: usize,
    pub json: JsonConfig,
    pub smile: SmileConfig,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            json: JsonConfig::default(),
            smile: SmileConfig::default(),
        }
    }
}

impl CodecConfig {
    /// Adapter options for the pack crate.
    pub fn pack_options(&self) -> PackOptions {
        PackOptions {
            json: JsonOptions {
                pretty: self.json.pretty,
            },
            smile: SmileOptions {
                shared_names: self.smile.shared_names,
                shared_values: self.smile.shared_values,
                raw_binary: self.smile.raw_binary,
            },
            max_depth: self.max_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pack_defaults() {
        assert_eq!(CodecConfig::default().pack_options(), PackOptions::default());
    }

    #[test]
    fn toml_document_overrides_selected_fields() {
        let config: CodecConfig = toml::from_str(
            r#"
            unknown_fields = "reject"
            max_depth = 16

            [smile]
            shared_values = true
            "#,
        )
        .unwrap();
        assert_eq!(config.unknown_fields, UnknownFieldPolicy::Reject);
        assert_eq!(config.max_depth, 16);
        assert!(!config.json.pretty);
        assert!(config.smile.shared_names);
        assert!(config.smile.shared_values);

        let options = config.pack_options();
        assert_eq!(options.max_depth, 16);
        assert!(options.smile.shared_values);
    }

    #[test]
    fn unknown_policy_name_is_rejected() {
        assert!(toml::from_str::<CodecConfig>(r#"unknown_fields = "drop""#).is_err());
    }

    #[test]
    fn json_round_trip() {
        let config = CodecConfig {
            json: JsonConfig { pretty: true },
            ..CodecConfig::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<CodecConfig>(&text).unwrap(), config);
    }
}
