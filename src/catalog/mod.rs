//! Static molecule catalogs.
//!
//! A [`Catalog`] is an ordered, immutable list of [`MoleculeEntry`] records
//! tagged with a source name. The built-in catalog is embedded at compile
//! time from `resources/catalog.toml` and parsed once on first use; custom
//! catalogs use the same TOML schema:
//!
//! ```toml
//! source = "lab"
//!
//! [[molecule]]
//! name = "Ethanol"
//! pubchem_id = "702"
//! smiles = "CCO"
//! formula = "C2H6O"
//! weight = 46.07
//! synonyms = ["Ethyl alcohol"]
//! category = "solvent"
//! ```

mod error;

pub use error::Error;

use crate::model::molecule::MoleculeEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

const BUILTIN_CATALOG_TOML: &str = include_str!("../../resources/catalog.toml");

static BUILTIN_CATALOG: OnceLock<Catalog> = OnceLock::new();

fn default_source() -> String {
    "custom".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default = "default_source")]
    source: String,
    #[serde(rename = "molecule", default)]
    entries: Vec<MoleculeEntry>,
}

impl Catalog {
    /// Builds a catalog from already constructed entries, validating each one.
    pub fn new(source: impl Into<String>, entries: Vec<MoleculeEntry>) -> Result<Self, Error> {
        let catalog = Self {
            source: source.into(),
            entries,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parses a catalog from a TOML document.
    pub fn from_toml(toml: &str) -> Result<Self, Error> {
        let catalog: Catalog = toml::from_str(toml)?;
        catalog.validate()?;
        debug!(
            source = %catalog.source,
            entries = catalog.entries.len(),
            "loaded molecule catalog"
        );
        Ok(catalog)
    }

    /// Reads and parses a catalog file.
    ///
    /// When the document has no `source` key, the file stem is used as the
    /// provenance tag.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut catalog = Self::from_toml(&text)?;
        if catalog.source == default_source()
            && let Some(stem) = path.file_stem()
        {
            catalog.source = stem.to_string_lossy().into_owned();
        }
        Ok(catalog)
    }

    /// The catalog compiled into the library.
    pub fn builtin() -> &'static Catalog {
        BUILTIN_CATALOG.get_or_init(|| {
            Catalog::from_toml(BUILTIN_CATALOG_TOML)
                .expect("Failed to parse embedded molecule catalog. This is a library bug.")
        })
    }

    fn validate(&self) -> Result<(), Error> {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(Error::invalid_entry(index, &entry.name, "name is empty"));
            }
            if entry.formula.trim().is_empty() {
                return Err(Error::invalid_entry(index, &entry.name, "formula is empty"));
            }
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(Error::invalid_entry(
                    index,
                    &entry.name,
                    format!("weight {} is not a non-negative number", entry.weight),
                ));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn entries(&self) -> &[MoleculeEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MoleculeEntry> {
        self.entries.iter()
    }

    /// Case-insensitive lookup by canonical name.
    pub fn find_by_name(&self, name: &str) -> Option<&MoleculeEntry> {
        let needle = name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.name.to_lowercase() == needle)
    }

    pub fn find_by_id(&self, pubchem_id: &str) -> Option<&MoleculeEntry> {
        let needle = pubchem_id.trim();
        self.entries.iter().find(|e| e.pubchem_id == needle)
    }

    /// Distinct category tags, sorted.
    pub fn categories(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| e.category.as_deref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a MoleculeEntry> {
        self.entries.iter().filter(move |e| {
            e.category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(category))
        })
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a MoleculeEntry;
    type IntoIter = std::slice::Iter<'a, MoleculeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
