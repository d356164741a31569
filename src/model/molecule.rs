use super::formula::{Formula, ParseFormulaError};
use crate::settings::Language;
use serde::{Deserialize, Serialize};

/// A single record of the molecule catalog.
///
/// Entries are immutable once a [`Catalog`](crate::Catalog) is loaded.
/// `smiles` is empty for macromolecules that have no useful line notation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeEntry {
    pub name: String,
    pub pubchem_id: String,
    #[serde(default)]
    pub smiles: String,
    pub formula: String,
    /// Average molecular weight in g/mol, as recorded in the catalog.
    pub weight: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl MoleculeEntry {
    pub fn new(
        name: impl Into<String>,
        pubchem_id: impl Into<String>,
        formula: impl Into<String>,
        weight: f64,
    ) -> Self {
        Self {
            name: name.into(),
            pubchem_id: pubchem_id.into(),
            smiles: String::new(),
            formula: formula.into(),
            weight,
            description: String::new(),
            synonyms: Vec::new(),
            category: None,
        }
    }

    pub fn with_smiles(mut self, smiles: impl Into<String>) -> Self {
        self.smiles = smiles.into();
        self
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[inline]
    pub fn has_structure(&self) -> bool {
        !self.smiles.is_empty()
    }

    pub fn parsed_formula(&self) -> Result<Formula, ParseFormulaError> {
        Formula::parse(&self.formula)
    }

    /// Name shown to a user of the given language.
    ///
    /// For Chinese the first synonym written in CJK ideographs is used;
    /// everything else falls back to the canonical name.
    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::En => &self.name,
            Language::Zh => self
                .synonyms
                .iter()
                .find(|s| s.chars().any(is_cjk))
                .map(String::as_str)
                .unwrap_or(&self.name),
        }
    }
}

fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}')
}
