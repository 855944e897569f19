use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{CatalogDocument, CatalogError, DataProvider};
use crate::profile::{Opportunity, Profile};

/// Catalog loaded once from a JSON file in the same layout as the builtin one.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
    profiles: Vec<Profile>,
    opportunities: Vec<Opportunity>,
}

impl FileCatalog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let raw = fs::read_to_string(&path).map_err(|source| CatalogError::Io {
            path: path.clone(),
            source,
        })?;
        let doc = CatalogDocument::from_json(&raw)?;
        let catalog = Self {
            profiles: doc.profiles(),
            opportunities: doc.opportunities(),
            path,
        };
        tracing::debug!(
            path = %catalog.path.display(),
            profiles = catalog.profiles.len(),
            opportunities = catalog.opportunities.len(),
            "catalog file loaded"
        );
        Ok(catalog)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataProvider for FileCatalog {
    fn name(&self) -> &str {
        "file"
    }

    fn profiles(&self) -> Result<Vec<Profile>, CatalogError> {
        Ok(self.profiles.clone())
    }

    fn opportunities(&self) -> Result<Vec<Opportunity>, CatalogError> {
        Ok(self.opportunities.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "internship-matcher-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn reads_catalog_from_disk() {
        let path = temp_path("catalog");
        fs::write(
            &path,
            r#"{"opportunities": [{"id": "x", "title": "X", "requiredSkills": "Rust, Go"}]}"#,
        )
        .expect("write temp catalog");
        let catalog = FileCatalog::open(&path).expect("catalog loads");
        let opportunities = catalog.opportunities().unwrap();
        assert_eq!(opportunities[0].required_skills, vec!["Rust", "Go"]);
        assert!(catalog.profiles().unwrap().is_empty());
        assert_eq!(catalog.path(), path.as_path());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_json_is_reported() {
        let path = temp_path("broken");
        fs::write(&path, "{not json").expect("write temp catalog");
        assert!(matches!(
            FileCatalog::open(&path),
            Err(CatalogError::Json(_))
        ));
        let _ = fs::remove_file(path);
    }
}
