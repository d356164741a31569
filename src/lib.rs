//! A small, pure Rust library for looking up molecules by fuzzy name, synonym,
//! formula, identifier or SMILES, and for sketching SMILES strings as
//! schematic 2D drawings.
//!
//! # Features
//!
//! - **Fuzzy search**: Ranks catalog entries by a fixed precedence of exact,
//!   substring, formula, identifier, structure and edit-distance rules
//! - **Catalogs**: An embedded reference catalog plus user catalogs in TOML
//! - **SMILES sketches**: Tokenizes a SMILES subset and lays atoms out on a
//!   zig-zag chain with branches and ring closures
//! - **Export**: Writes sketches as SVG drawings or V2000 SDF mol blocks
//! - **Settings**: A persisted language/theme store with change events
//!
//! # Quick Start
//!
//! ```
//! use molsift::{Matcher, MatchKind, SearchOptions};
//!
//! let matcher = Matcher::builtin();
//!
//! // Exact names win outright
//! let top = matcher.best("aspirin").unwrap();
//! assert_eq!(top.entry.name, "Aspirin");
//! assert_eq!(top.score, 100);
//!
//! // Synonyms, formulas and typos are found too
//! assert_eq!(matcher.best("Acetylsalicylic acid").unwrap().kind, MatchKind::ExactSynonym);
//! assert_eq!(matcher.best("C9H8O4").unwrap().score, 90);
//! assert_eq!(matcher.best("cafeine").unwrap().entry.name, "Caffeine");
//!
//! // Nothing matches a blank query
//! assert!(matcher.search("  ").is_empty());
//!
//! // Filters are applied after ranking
//! let options = SearchOptions::default().limit(3).min_score(70);
//! assert!(matcher.search_with("acid", &options).len() <= 3);
//! ```
//!
//! Sketching a SMILES string and exporting it:
//!
//! ```
//! use molsift::{BondOrder, Canvas, Shape, Theme, sketch};
//!
//! let acetic_acid = sketch("CC(=O)O");
//! assert_eq!(acetic_acid.atom_count(), 4);
//! assert_eq!(acetic_acid.branch_count, 1);
//! assert_eq!(acetic_acid.bonds[0].order, BondOrder::Double);
//! assert_eq!(acetic_acid.shape, Shape::MultipleBonds);
//! assert_eq!(sketch("CC(C").shape, Shape::Branched);
//!
//! let mut svg = Vec::new();
//! molsift::io::svg::write(&mut svg, &acetic_acid, &Canvas::default(), Theme::Light)?;
//! assert!(String::from_utf8(svg).unwrap().contains("<svg"));
//! # Ok::<(), molsift::io::Error>(())
//! ```
//!
//! # Module Organization
//!
//! - [`catalog`]: Built-in and TOML catalogs of [`MoleculeEntry`] records
//! - [`search`]: The fuzzy [`Matcher`] and its scoring rules
//! - [`smiles`]: Tokenizer and schematic layout
//! - [`io`]: SVG and SDF writers
//! - [`settings`]: Language/theme store with pluggable persistence
//!
//! # Data Types
//!
//! - [`MoleculeEntry`]: Catalog record with name, identifier, SMILES, formula and synonyms
//! - [`SearchResult`]: A ranked hit carrying score, [`MatchKind`] and source
//! - [`Formula`]: Parsed molecular formula with molecular weight
//! - [`Element`]: Chemical element (H through Og)
//! - [`Sketch`]: Atoms, [`Bond`]s and [`Shape`] of a laid out SMILES string

pub mod catalog;
pub mod io;
mod model;
pub mod search;
pub mod settings;
pub mod smiles;

pub use catalog::Catalog;

pub use model::bond::{Bond, BondOrder};
pub use model::element::{Element, ParseElementError};
pub use model::formula::{Formula, ParseFormulaError};
pub use model::molecule::MoleculeEntry;

pub use search::{MatchKind, Matcher, SearchOptions, SearchResult, search};

pub use smiles::{Canvas, Shape, Sketch, SketchAtom, sketch, tokenize};

pub use settings::{Language, Settings, SettingsEvent, SettingsStore, Theme};
