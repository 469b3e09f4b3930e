use std::path::{Path, PathBuf};

use tracing::debug;

use trellis_store::{read_json, write_json};
use trellis_types::Category;

use crate::error::TaxonomyResult;
use crate::normalize::normalize;
use crate::settings::TaxonomySettings;

/// The canonical category collection on disk.
///
/// One JSON file holds the whole tree. `read` normalizes whatever it finds,
/// so a missing or drifted file never surfaces invalid state; `write`
/// normalizes before persisting and returns the list *actually* persisted —
/// callers must use that return value, since normalization may have adjusted
/// their input.
pub struct CategoryStore {
    path: PathBuf,
    settings: TaxonomySettings,
}

impl CategoryStore {
    /// Create a store over the given file path.
    pub fn new(path: impl Into<PathBuf>, settings: TaxonomySettings) -> Self {
        Self {
            path: path.into(),
            settings,
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The taxonomy settings this store normalizes against.
    pub fn settings(&self) -> &TaxonomySettings {
        &self.settings
    }

    /// Load and canonicalize the collection. A missing file yields the
    /// normalized empty list, which contains exactly the default category.
    pub fn read(&self) -> TaxonomyResult<Vec<Category>> {
        let raw: Vec<Category> = read_json(&self.path)?.unwrap_or_default();
        Ok(normalize(raw, &self.settings))
    }

    /// Canonicalize and persist `list`, returning the persisted form.
    pub fn write(&self, list: Vec<Category>) -> TaxonomyResult<Vec<Category>> {
        let canonical = normalize(list, &self.settings);
        write_json(&self.path, &canonical)?;
        debug!(path = %self.path.display(), categories = canonical.len(), "categories persisted");
        Ok(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_types::CategoryId;

    fn store(dir: &tempfile::TempDir) -> CategoryStore {
        CategoryStore::new(dir.path().join("categories.json"), TaxonomySettings::default())
    }

    #[test]
    fn missing_file_reads_as_default_only() {
        let dir = tempfile::tempdir().unwrap();
        let list = store(&dir).read().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Uncategorized");
    }

    #[test]
    fn write_returns_normalized_form() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);

        let raw = vec![Category {
            id: CategoryId::parse("a").unwrap(),
            name: "  Go ".into(),
            parent: Some(CategoryId::parse("ghost").unwrap()),
            order: Some(40),
        }];
        let persisted = s.write(raw).unwrap();

        let go = persisted.iter().find(|c| c.name == "Go").unwrap();
        assert!(go.parent.is_none());
        assert_eq!(go.order, Some(0));
        assert!(persisted.iter().any(|c| c.name == "Uncategorized"));
    }

    #[test]
    fn read_after_write_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);

        let persisted = s.write(vec![Category::new("Essays")]).unwrap();
        let reread = s.read().unwrap();
        assert_eq!(reread, persisted);
    }

    #[test]
    fn read_heals_hand_edited_file() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);
        std::fs::write(
            s.path(),
            r#"[{"id":"a","name":"Go"},{"id":"b","name":"go"}]"#,
        )
        .unwrap();

        let list = s.read().unwrap();
        let gos = list.iter().filter(|c| c.name_key().unwrap().matches("go")).count();
        assert_eq!(gos, 1);
    }
}
