//! Toy SMILES reader producing schematic 2D sketches.
//!
//! [`tokenize`] splits a string into atoms, bond symbols, branch markers and
//! ring labels. [`sketch`] walks those tokens once, placing atoms along a
//! zig-zag chain, fanning branches out sideways and closing rings with an
//! extra bond, then tags the result with a coarse [`Shape`]. Use
//! [`Sketch::fit_to`] to project the raw layout onto a [`Canvas`].

mod layout;
mod tokenizer;

pub use layout::{BOND_LENGTH, Canvas, Shape, Sketch, SketchAtom, sketch};
pub use tokenizer::{Token, tokenize};
