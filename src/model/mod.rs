//! Core data types shared by the catalog, the matcher and the SMILES sketcher.
//!
//! - [`element`] – Periodic table lookups (symbol, atomic number, mass).
//! - [`formula`] – Molecular formula parsing and weight calculation.
//! - [`molecule`] – Catalog records.
//! - [`bond`] – Bond orders and index pairs used by sketches.

pub mod bond;
pub mod element;
pub mod formula;
pub mod molecule;
