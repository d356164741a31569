//! Fuzzy, multi-criteria molecule lookup over one or more catalogs.
//!
//! Every entry is scored against the query by a fixed set of rules (exact
//! name, synonym, substring, formula, identifier, SMILES, formula pattern and
//! edit-distance similarity). An entry keeps the best score among the rules
//! that fire; entries with no hit are dropped. Results come back sorted by
//! score, highest first, with ties in catalog order.
//!
//! A blank query yields no results. Searching never fails.

mod rules;

pub use rules::{FUZZY_THRESHOLD, MatchKind, is_element_count, similarity};

use crate::catalog::Catalog;
use crate::model::molecule::MoleculeEntry;
use rules::Query;
use serde::Serialize;
use tracing::debug;

/// A ranked hit for a single query.
///
/// Scores are only comparable between results of the same call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchResult<'c> {
    pub entry: &'c MoleculeEntry,
    pub score: u32,
    pub kind: MatchKind,
    /// Source tag of the catalog the entry came from.
    pub source: &'c str,
}

/// Post-ranking filters applied by [`Matcher::search_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Keep at most this many results.
    pub limit: Option<usize>,
    /// Drop results scoring below this value.
    pub min_score: u32,
    /// Keep only entries with this category tag (ASCII case-insensitive).
    pub category: Option<String>,
}

impl SearchOptions {
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn min_score(mut self, min_score: u32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    fn admits(&self, result: &SearchResult<'_>) -> bool {
        if result.score < self.min_score {
            return false;
        }
        match &self.category {
            Some(wanted) => result
                .entry
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(wanted)),
            None => true,
        }
    }
}

/// Searches a fixed, ordered set of catalogs.
#[derive(Debug, Clone)]
pub struct Matcher<'c> {
    catalogs: Vec<&'c Catalog>,
}

impl Matcher<'static> {
    /// A matcher over the built-in catalog only.
    pub fn builtin() -> Self {
        Self::new(Catalog::builtin())
    }
}

impl<'c> Matcher<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalogs: vec![catalog],
        }
    }

    /// Appends another catalog; its entries rank after earlier catalogs on ties.
    pub fn with_catalog(mut self, catalog: &'c Catalog) -> Self {
        self.catalogs.push(catalog);
        self
    }

    pub fn catalogs(&self) -> &[&'c Catalog] {
        &self.catalogs
    }

    pub fn search(&self, query: &str) -> Vec<SearchResult<'c>> {
        self.search_with(query, &SearchOptions::default())
    }

    pub fn search_with(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult<'c>> {
        let Some(query) = Query::new(query) else {
            debug!("blank query, nothing to match");
            return Vec::new();
        };

        let mut results: Vec<SearchResult<'c>> = self
            .catalogs
            .iter()
            .flat_map(|catalog| {
                let source = catalog.source();
                catalog.iter().map(move |entry| (source, entry))
            })
            .filter_map(|(source, entry)| {
                rules::best_match(&query, entry).map(|kind| SearchResult {
                    entry,
                    score: kind.score(),
                    kind,
                    source,
                })
            })
            .filter(|result| options.admits(result))
            .collect();

        // Stable: equal scores keep catalog order.
        results.sort_by(|a, b| b.score.cmp(&a.score));

        if let Some(limit) = options.limit {
            results.truncate(limit);
        }

        debug!(
            query = query.as_str(),
            hits = results.len(),
            top = results.first().map(|r| r.entry.name.as_str()),
            "molecule search finished"
        );

        results
    }

    /// The single highest ranked hit, if any.
    pub fn best(&self, query: &str) -> Option<SearchResult<'c>> {
        self.search_with(query, &SearchOptions::default().limit(1))
            .into_iter()
            .next()
    }
}

/// Collects catalogs in search order; an empty matcher finds nothing.
impl<'c> FromIterator<&'c Catalog> for Matcher<'c> {
    fn from_iter<I: IntoIterator<Item = &'c Catalog>>(iter: I) -> Self {
        Self {
            catalogs: iter.into_iter().collect(),
        }
    }
}

/// Searches a single catalog with default options.
pub fn search<'c>(catalog: &'c Catalog, query: &str) -> Vec<SearchResult<'c>> {
    Matcher::new(catalog).search(query)
}
