#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Loaders that turn TOML content files into director inputs.
//!
//! Content is validated once at load time so that the allocator and the
//! trackers can treat catalog and curve data as trusted afterwards.

mod catalog;
mod curves;
mod settings;

pub use catalog::load_catalog;
pub use curves::load_curves;
pub use settings::load_settings;

/// Errors raised while loading content files.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The file is not valid TOML or does not match the expected layout.
    #[error("failed to parse {kind} file")]
    Parse {
        /// Kind of file being parsed.
        kind: &'static str,
        /// Underlying parser error.
        #[source]
        source: toml::de::Error,
    },
    /// Two templates share the same row name.
    #[error("template `{0}` is defined more than once")]
    DuplicateTemplate(String),
    /// A template field holds a negative or non-finite value.
    #[error("template `{name}` has invalid {field}: {value}")]
    InvalidTemplate {
        /// Row name of the template.
        name: String,
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// A curve row has no keys.
    #[error("curve `{0}` has no keys")]
    EmptyCurve(String),
    /// A curve row contains a non-finite key.
    #[error("curve `{0}` contains a non-finite key")]
    NonFiniteCurveKey(String),
    /// A director setting is outside its valid range.
    #[error("setting `{field}` is invalid: {value}")]
    InvalidSetting {
        /// Offending setting.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
}
