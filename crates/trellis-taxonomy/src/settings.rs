use trellis_types::NameKey;

/// Taxonomy configuration: the reserved default category.
///
/// The default category is the one category guaranteed to always exist. The
/// normalizer tracks it as a sentinel — synthesizing it when absent, pinning
/// it to the root, refusing it as a parent — instead of scattering
/// special-cased conditionals through the mutation logic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaxonomySettings {
    name: String,
    key: NameKey,
}

/// Name used when no (or an unusable) default category name is configured.
pub const FALLBACK_DEFAULT_NAME: &str = "Uncategorized";

impl TaxonomySettings {
    /// Build settings with the given default category name.
    ///
    /// An empty or whitespace-only name falls back to
    /// [`FALLBACK_DEFAULT_NAME`] so the sentinel always has a usable key.
    pub fn new(default_name: &str) -> Self {
        match NameKey::of(default_name) {
            Some(key) => Self {
                name: default_name.trim().to_string(),
                key,
            },
            None => Self::default(),
        }
    }

    /// Display name of the default category.
    pub fn default_name(&self) -> &str {
        &self.name
    }

    /// Uniqueness key of the default category name.
    pub fn default_key(&self) -> &NameKey {
        &self.key
    }
}

impl Default for TaxonomySettings {
    fn default() -> Self {
        Self::new(FALLBACK_DEFAULT_NAME)
    }
}
