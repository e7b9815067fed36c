use serde::Deserialize;

/// Placeholder syntax used when rendering SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `$1`, `$2`, ... (Postgres). A parameter used twice renders the same index.
    #[default]
    Numbered,
    /// `?` for every parameter. A parameter used twice is bound twice.
    Positional,
}

/// Statement builder configuration.
///
/// Deserializable so it can sit in an application's own config file:
///
/// ```toml
/// [rowbind]
/// primary_key_column = "id"
/// placeholder = "numbered"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Primary-key column for entities whose metadata does not name one.
    pub primary_key_column: String,
    pub placeholder: PlaceholderStyle,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            primary_key_column: "id".to_string(),
            placeholder: PlaceholderStyle::Numbered,
        }
    }
}

impl BuilderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback primary-key column.
    pub fn with_primary_key_column(mut self, column: impl Into<String>) -> Self {
        self.primary_key_column = column.into();
        self
    }

    pub fn with_placeholder(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder = style;
        self
    }
}
