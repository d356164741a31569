use crate::model::molecule::MoleculeEntry;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Minimum normalized edit-distance similarity for a fuzzy hit (exclusive).
pub const FUZZY_THRESHOLD: f64 = 0.7;

/// Names and synonyms this short never take part in fuzzy matching.
const FUZZY_MIN_CHARS: usize = 4;

static ELEMENT_COUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Z][a-z]?\d*)+$").expect("element-count pattern is a valid regex")
});

/// The heuristic that produced a match.
///
/// Each kind carries a fixed score; an entry keeps the highest score of all
/// kinds that fire for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    ExactName,
    ExactSynonym,
    NameSubstring,
    SynonymSubstring,
    Formula,
    CatalogId,
    Structure,
    FormulaPattern,
    FuzzyName,
    FuzzySynonym,
}

impl MatchKind {
    pub const fn score(self) -> u32 {
        match self {
            MatchKind::ExactName => 100,
            MatchKind::ExactSynonym => 95,
            MatchKind::Formula => 90,
            MatchKind::CatalogId => 85,
            MatchKind::Structure => 85,
            MatchKind::NameSubstring => 80,
            MatchKind::SynonymSubstring => 75,
            MatchKind::FuzzyName => 70,
            MatchKind::FuzzySynonym => 65,
            MatchKind::FormulaPattern => 60,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            MatchKind::ExactName => "exact name",
            MatchKind::ExactSynonym => "exact synonym",
            MatchKind::NameSubstring => "name substring",
            MatchKind::SynonymSubstring => "synonym substring",
            MatchKind::Formula => "formula",
            MatchKind::CatalogId => "catalog id",
            MatchKind::Structure => "SMILES",
            MatchKind::FormulaPattern => "formula pattern",
            MatchKind::FuzzyName => "similar name",
            MatchKind::FuzzySynonym => "similar synonym",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A query normalized once per search call.
#[derive(Debug)]
pub(crate) struct Query<'q> {
    raw: &'q str,
    lower: String,
    formula_like: bool,
}

impl<'q> Query<'q> {
    /// Returns `None` for empty or whitespace-only input.
    pub(crate) fn new(input: &'q str) -> Option<Self> {
        let raw = input.trim();
        if raw.is_empty() {
            return None;
        }
        Some(Self {
            raw,
            lower: raw.to_lowercase(),
            formula_like: is_element_count(raw),
        })
    }

    pub(crate) fn as_str(&self) -> &str {
        self.raw
    }
}

/// True when `s` reads as element symbols with at least one explicit count.
pub fn is_element_count(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit()) && ELEMENT_COUNT_PATTERN.is_match(s)
}

/// Normalized Levenshtein similarity of two already lowercased strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

fn fuzzy_hit(query: &str, candidate_lower: &str) -> bool {
    candidate_lower.chars().count() >= FUZZY_MIN_CHARS
        && similarity(query, candidate_lower) > FUZZY_THRESHOLD
}

fn mutual_substring(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Evaluates every rule against `entry` and returns the strongest hit.
///
/// Rules are visited in a fixed order and a later rule only replaces the
/// current hit when its score is strictly higher, so equal scores resolve
/// to the earlier rule.
pub(crate) fn best_match(query: &Query<'_>, entry: &MoleculeEntry) -> Option<MatchKind> {
    let q = query.lower.as_str();
    let name = entry.name.to_lowercase();
    let synonyms: Vec<String> = entry.synonyms.iter().map(|s| s.to_lowercase()).collect();

    let mut best: Option<MatchKind> = None;
    let mut consider = |kind: MatchKind, fired: bool| {
        if fired && best.is_none_or(|b| kind.score() > b.score()) {
            best = Some(kind);
        }
    };

    consider(MatchKind::ExactName, name == q);
    consider(MatchKind::ExactSynonym, synonyms.iter().any(|s| s == q));
    consider(MatchKind::NameSubstring, mutual_substring(q, &name));
    consider(
        MatchKind::SynonymSubstring,
        synonyms
            .iter()
            .any(|s| !s.is_empty() && mutual_substring(q, s)),
    );
    consider(MatchKind::Formula, entry.formula.to_lowercase() == q);
    consider(MatchKind::CatalogId, entry.pubchem_id == query.raw);
    consider(
        MatchKind::Structure,
        entry.has_structure() && entry.smiles == query.raw,
    );
    consider(
        MatchKind::FormulaPattern,
        query.formula_like && is_element_count(&entry.formula),
    );
    consider(MatchKind::FuzzyName, fuzzy_hit(q, &name));
    consider(
        MatchKind::FuzzySynonym,
        synonyms.iter().any(|s| fuzzy_hit(q, s)),
    );

    best
}
