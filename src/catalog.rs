use std::path::PathBuf;

use serde::Serialize;

use crate::{
    data_dir::DataDir,
    error::{Error, Result},
    text_util,
    walker,
};

/// One document available in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Display name: the file name without its extension.
    pub name: String,
    /// Path the decoder opens.
    pub locator: String,
    /// File name relative to the catalog root, matched alongside `name`.
    pub raw_name: String,
}

impl CatalogEntry {
    /// Build an entry from a file name and the locator that resolves it.
    pub fn new(raw_name: &str, locator: impl Into<String>) -> Self {
        Self {
            name: text_util::strip_extension(raw_name).to_string(),
            locator: locator.into(),
            raw_name: raw_name.to_string(),
        }
    }

    /// Label shown to the user, with underscores as spaces.
    pub fn label(&self) -> String {
        text_util::display_label(&self.name)
    }
}

/// Supplies the current list of documents.
pub trait CatalogProvider {
    fn list_documents(&self) -> Result<Vec<CatalogEntry>>;
}

/// Lists PDF files under a scripts directory.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(data_dir: &DataDir) -> Self {
        Self {
            root: data_dir.root().to_path_buf(),
        }
    }
}

impl CatalogProvider for DirectoryCatalog {
    fn list_documents(&self) -> Result<Vec<CatalogEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let files = walker::discover_files(&self.root).map_err(|e| {
            Error::CatalogUnavailable {
                path: self.root.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(files
            .iter()
            .map(|file| {
                // Nested files keep their folder so equal file names in
                // different folders stay distinguishable.
                let raw_name = file
                    .relative_path
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                CatalogEntry::new(
                    &raw_name,
                    file.absolute_path.to_string_lossy(),
                )
            })
            .collect())
    }
}

/// List documents, treating an unreadable catalog as an empty one.
pub fn load_or_empty(provider: &dyn CatalogProvider) -> Vec<CatalogEntry> {
    match provider.list_documents() {
        Ok(entries) => {
            tracing::debug!(count = entries.len(), "catalog loaded");
            entries
        }
        Err(e) => {
            tracing::warn!(error = %e, "catalog unavailable, showing no documents");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenCatalog;

    impl CatalogProvider for BrokenCatalog {
        fn list_documents(&self) -> Result<Vec<CatalogEntry>> {
            Err(Error::CatalogUnavailable {
                path: PathBuf::from("/nowhere"),
                reason: "permission denied".into(),
            })
        }
    }

    #[test]
    fn entry_fields_derive_from_file_name() {
        let entry = CatalogEntry::new("Intro_Lecture.pdf", "/s/Intro_Lecture.pdf");
        assert_eq!(entry.name, "Intro_Lecture");
        assert_eq!(entry.raw_name, "Intro_Lecture.pdf");
        assert_eq!(entry.locator, "/s/Intro_Lecture.pdf");
        assert_eq!(entry.label(), "Intro Lecture");
    }

    #[test]
    fn directory_catalog_lists_pdfs() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("b_scene.pdf"), "%PDF").unwrap();
        std::fs::write(tmp.path().join("a_scene.pdf"), "%PDF").unwrap();
        std::fs::write(tmp.path().join("readme.txt"), "hi").unwrap();

        let data_dir = DataDir::resolve(Some(tmp.path())).unwrap();
        let entries = DirectoryCatalog::new(&data_dir).list_documents().unwrap();

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a_scene", "b_scene"]);
        assert!(entries[0].locator.ends_with("a_scene.pdf"));
    }

    #[test]
    fn nested_files_keep_their_folder() {
        let tmp = tempfile::tempdir().unwrap();
        for act in ["act_1", "act_2"] {
            std::fs::create_dir(tmp.path().join(act)).unwrap();
            std::fs::write(tmp.path().join(act).join("Hamlet.pdf"), "%PDF")
                .unwrap();
        }
        std::fs::write(tmp.path().join("Hamlet.pdf"), "%PDF").unwrap();

        let data_dir = DataDir::resolve(Some(tmp.path())).unwrap();
        let entries = DirectoryCatalog::new(&data_dir).list_documents().unwrap();

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Hamlet", "act_1/Hamlet", "act_2/Hamlet"]);
        assert_eq!(entries[1].raw_name, "act_1/Hamlet.pdf");
        assert_eq!(entries[2].label(), "act 2/Hamlet");
    }

    #[test]
    fn missing_directory_is_empty_catalog() {
        let tmp = tempfile::tempdir().unwrap();
        let data_dir = DataDir::resolve(Some(&tmp.path().join("absent"))).unwrap();
        let entries = DirectoryCatalog::new(&data_dir).list_documents().unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn unavailable_catalog_degrades_to_empty() {
        assert!(load_or_empty(&BrokenCatalog).is_empty());
    }
}
