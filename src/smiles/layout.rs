use super::tokenizer::{Token, tokenize};
use crate::model::bond::{Bond, BondOrder};
use crate::model::element::Element;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Length of every implicitly drawn bond, in raw sketch units.
pub const BOND_LENGTH: f64 = 40.0;

const ZIGZAG_ANGLE: f64 = std::f64::consts::PI / 6.0;
const BRANCH_ANGLE: f64 = std::f64::consts::FRAC_PI_2;

/// Bonded atoms closer than this fraction of a bond are taken as a ring fold.
const CLOSE_CONTACT: f64 = 0.5;

/// Coarse structural class of a sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Ring,
    Branched,
    MultipleBonds,
    Linear,
}

impl Shape {
    pub fn describe(self) -> &'static str {
        match self {
            Shape::Ring => "ring structure",
            Shape::Branched => "branched molecule",
            Shape::MultipleBonds => "multiple bonds",
            Shape::Linear => "linear molecule",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SketchAtom {
    pub element: Element,
    pub position: [f64; 2],
}

/// Drawing area a sketch is fitted into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
            margin: 30.0,
        }
    }
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    fn inner(&self) -> [f64; 2] {
        [
            (self.width - 2.0 * self.margin).max(0.0),
            (self.height - 2.0 * self.margin).max(0.0),
        ]
    }

    fn center(&self) -> [f64; 2] {
        [self.width / 2.0, self.height / 2.0]
    }
}

/// A schematic 2D layout of a SMILES string.
///
/// Not a chemical interpretation: valence, aromaticity and stereochemistry
/// are ignored and ring closures are simply drawn as extra bonds.
#[derive(Debug, Clone, PartialEq)]
pub struct Sketch {
    pub atoms: Vec<SketchAtom>,
    pub bonds: Vec<Bond>,
    pub shape: Shape,
    /// Number of `(` that opened a branch.
    pub branch_count: usize,
}

impl Sketch {
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Returns a copy whose coordinates are scaled uniformly and centred on `canvas`.
    ///
    /// The bounding box is fitted into the canvas minus its margin on both
    /// axes. An axis with no extent does not constrain the scale; a sketch
    /// with no extent at all keeps unit scale and lands on the centre.
    pub fn fit_to(&self, canvas: &Canvas) -> Sketch {
        let mut fitted = self.clone();
        let Some(first) = self.atoms.first() else {
            return fitted;
        };

        let (mut min, mut max) = (first.position, first.position);
        for atom in &self.atoms[1..] {
            for k in 0..2 {
                min[k] = min[k].min(atom.position[k]);
                max[k] = max[k].max(atom.position[k]);
            }
        }

        let inner = canvas.inner();
        let scale = (0..2)
            .filter(|&k| max[k] - min[k] > f64::EPSILON)
            .map(|k| inner[k] / (max[k] - min[k]))
            .reduce(f64::min)
            .unwrap_or(1.0);

        let box_center = [(min[0] + max[0]) / 2.0, (min[1] + max[1]) / 2.0];
        let target = canvas.center();
        for atom in &mut fitted.atoms {
            for k in 0..2 {
                atom.position[k] = (atom.position[k] - box_center[k]) * scale + target[k];
            }
        }
        fitted
    }

    pub(crate) fn bond_length(&self, bond: &Bond) -> f64 {
        distance(self.atoms[bond.i].position, self.atoms[bond.j].position)
    }
}

/// Direction the chain is growing in when an atom is placed.
#[derive(Debug, Clone, Copy)]
struct Frame {
    heading: f64,
    /// Sign of the zig-zag turn taken by the next chain bond.
    turn: f64,
}

impl Frame {
    fn next_step(&self) -> f64 {
        self.heading + self.turn * ZIGZAG_ANGLE
    }
}

struct Sketcher {
    atoms: Vec<SketchAtom>,
    frames: Vec<Frame>,
    branches_from: Vec<usize>,
    bonds: Vec<Bond>,
    attach: Option<usize>,
    cursor: [f64; 2],
    frame: Frame,
    branch_stack: Vec<usize>,
    open_rings: HashMap<u32, usize>,
    ring_bonds: usize,
    branch_count: usize,
}

impl Sketcher {
    fn new() -> Self {
        Self {
            atoms: Vec::new(),
            frames: Vec::new(),
            branches_from: Vec::new(),
            bonds: Vec::new(),
            attach: None,
            cursor: [0.0, 0.0],
            frame: Frame {
                heading: 0.0,
                turn: -1.0,
            },
            branch_stack: Vec::new(),
            open_rings: HashMap::new(),
            ring_bonds: 0,
            branch_count: 0,
        }
    }

    fn feed(&mut self, token: Token) {
        match token {
            Token::Atom(element) => self.place(element),
            Token::Bond(order) => self.upgrade_last_bond(order),
            Token::BranchOpen => self.open_branch(),
            Token::BranchClose => self.close_branch(),
            Token::Ring(label) => self.ring(label),
            Token::Disconnect => {}
        }
    }

    fn place(&mut self, element: Element) {
        let idx = self.atoms.len();
        self.atoms.push(SketchAtom {
            element,
            position: self.cursor,
        });
        self.frames.push(self.frame);
        self.branches_from.push(0);

        if let Some(prev) = self.attach {
            self.bonds.push(Bond::new(prev, idx, BondOrder::Single));
        }

        self.attach = Some(idx);
        self.cursor = step(self.cursor, self.frame.next_step());
        self.frame.turn = -self.frame.turn;
    }

    /// `=` and `#` act on the bond drawn last; with no bond yet they do nothing.
    fn upgrade_last_bond(&mut self, order: BondOrder) {
        if let Some(bond) = self.bonds.last_mut() {
            bond.order = order;
        }
    }

    fn open_branch(&mut self) {
        let Some(root) = self.attach else {
            return;
        };
        self.branches_from[root] += 1;
        self.branch_stack.push(root);
        self.branch_count += 1;

        let side = if (self.branch_stack.len() + self.branches_from[root]) % 2 == 0 {
            1.0
        } else {
            -1.0
        };
        let root_frame = self.frames[root];
        let heading = root_frame.heading + side * BRANCH_ANGLE;
        self.cursor = step(self.atoms[root].position, heading);
        self.frame = Frame {
            heading,
            turn: root_frame.turn,
        };
    }

    fn close_branch(&mut self) {
        let Some(root) = self.branch_stack.pop() else {
            return;
        };
        let root_frame = self.frames[root];
        self.attach = Some(root);
        self.cursor = step(self.atoms[root].position, root_frame.next_step());
        self.frame = Frame {
            heading: root_frame.heading,
            turn: -root_frame.turn,
        };
    }

    fn ring(&mut self, label: u32) {
        let Some(current) = self.attach else {
            return;
        };
        match self.open_rings.remove(&label) {
            None => {
                self.open_rings.insert(label, current);
            }
            Some(start) => {
                let already_bonded = self.bonds.iter().any(|b| b.joins(start, current));
                if start != current && !already_bonded {
                    self.bonds.push(Bond::new(start, current, BondOrder::Single));
                    self.ring_bonds += 1;
                }
            }
        }
    }

    fn finish(self) -> Sketch {
        let mut sketch = Sketch {
            atoms: self.atoms,
            bonds: self.bonds,
            shape: Shape::Linear,
            branch_count: self.branch_count,
        };

        let folded = sketch
            .bonds
            .iter()
            .any(|b| sketch.bond_length(b) < CLOSE_CONTACT * BOND_LENGTH);

        sketch.shape = if self.ring_bonds > 0 || !self.open_rings.is_empty() || folded {
            Shape::Ring
        } else if !self.branch_stack.is_empty() {
            Shape::Branched
        } else if sketch.bonds.iter().any(|b| b.order != BondOrder::Single) {
            Shape::MultipleBonds
        } else {
            Shape::Linear
        };
        sketch
    }
}

/// Lays out `input` in a single left-to-right pass.
///
/// Never fails: unknown characters, unbalanced branches and unmatched ring
/// labels are skipped and the sketch holds whatever was understood.
pub fn sketch(input: &str) -> Sketch {
    let mut sketcher = Sketcher::new();
    for token in tokenize(input) {
        sketcher.feed(token);
    }
    let sketch = sketcher.finish();
    debug!(
        atoms = sketch.atom_count(),
        bonds = sketch.bond_count(),
        shape = %sketch.shape,
        "smiles sketched"
    );
    sketch
}

fn step(from: [f64; 2], angle: f64) -> [f64; 2] {
    [
        from[0] + BOND_LENGTH * angle.cos(),
        from[1] + BOND_LENGTH * angle.sin(),
    ]
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(sketch: &Sketch) -> Vec<&'static str> {
        sketch.atoms.iter().map(|a| a.element.symbol()).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn ethanol_is_a_linear_chain() {
        let s = sketch("CCO");
        assert_eq!(symbols(&s), ["C", "C", "O"]);
        assert_eq!(
            s.bonds,
            vec![
                Bond::new(0, 1, BondOrder::Single),
                Bond::new(1, 2, BondOrder::Single),
            ]
        );
        assert_eq!(s.shape, Shape::Linear);
        assert_eq!(s.shape.to_string(), "linear molecule");
        for bond in &s.bonds {
            assert!(approx(s.bond_length(bond), BOND_LENGTH));
        }
        // Zig-zag: the chain turns back, so the ends are closer than two bonds.
        let span = distance(s.atoms[0].position, s.atoms[2].position);
        assert!(span < 2.0 * BOND_LENGTH && span > BOND_LENGTH);
    }

    #[test]
    fn acetic_acid_upgrades_bond_before_branch() {
        let s = sketch("CC(=O)O");
        assert_eq!(symbols(&s), ["C", "C", "O", "O"]);
        assert_eq!(s.branch_count, 1);
        assert_eq!(
            s.bonds,
            vec![
                Bond::new(0, 1, BondOrder::Double),
                Bond::new(1, 2, BondOrder::Single),
                Bond::new(1, 3, BondOrder::Single),
            ]
        );
        assert_eq!(s.shape, Shape::MultipleBonds);
        assert_ne!(s.atoms[2].position, s.atoms[3].position);
    }

    #[test]
    fn ring_closure_draws_a_bond() {
        let s = sketch("C1CCCCC1");
        assert_eq!(s.atom_count(), 6);
        assert_eq!(s.bond_count(), 6);
        assert!(s.bonds.contains(&Bond::new(0, 5, BondOrder::Single)));
        assert_eq!(s.shape, Shape::Ring);
        assert_eq!(s.shape.to_string(), "ring structure");
    }

    #[test]
    fn unclosed_ring_label_still_counts_as_ring() {
        let s = sketch("C1CC");
        assert_eq!(s.bond_count(), 2);
        assert_eq!(s.shape, Shape::Ring);
    }

    #[test]
    fn bond_symbol_upgrades_previous_bond() {
        let s = sketch("CC=C");
        assert_eq!(
            s.bonds,
            vec![
                Bond::new(0, 1, BondOrder::Double),
                Bond::new(1, 2, BondOrder::Single),
            ]
        );
        assert_eq!(s.shape, Shape::MultipleBonds);

        let s = sketch("CC#N");
        assert_eq!(s.bonds[0].order, BondOrder::Triple);
        assert_eq!(s.bonds[1].order, BondOrder::Single);
        assert_eq!(s.shape, Shape::MultipleBonds);
    }

    #[test]
    fn bond_symbol_before_any_bond_is_ignored() {
        let s = sketch("C=C");
        assert_eq!(s.bonds, vec![Bond::new(0, 1, BondOrder::Single)]);
        assert_eq!(s.shape, Shape::Linear);

        let s = sketch("C#N");
        assert_eq!(s.bonds, vec![Bond::new(0, 1, BondOrder::Single)]);
        assert_eq!(s.shape, Shape::Linear);
    }

    #[test]
    fn bond_symbol_after_ring_closure_upgrades_it() {
        let s = sketch("C1CCCCC1=C");
        assert!(s.bonds.contains(&Bond::new(0, 5, BondOrder::Double)));
        assert!(s.bonds.contains(&Bond::new(5, 6, BondOrder::Single)));
        assert_eq!(s.shape, Shape::Ring);
    }

    #[test]
    fn balanced_branch_without_multiple_bonds_is_linear() {
        let s = sketch("CC(C)C");
        assert_eq!(s.branch_count, 1);
        assert_eq!(s.bond_count(), 3);
        assert_eq!(s.shape, Shape::Linear);
    }

    #[test]
    fn unclosed_branch_is_branched() {
        let s = sketch("CC(C");
        assert_eq!(s.bond_count(), 2);
        assert_eq!(s.shape, Shape::Branched);
        assert_eq!(s.shape.to_string(), "branched molecule");

        // An open branch outranks multiple bonds.
        assert_eq!(sketch("CC=C(C").shape, Shape::Branched);
    }

    #[test]
    fn repeated_branches_fan_to_different_sides() {
        let s = sketch("CC(C)(C)C");
        assert_eq!(s.branch_count, 2);
        assert_ne!(s.atoms[2].position, s.atoms[3].position);
        assert!(s.bonds.contains(&Bond::new(1, 4, BondOrder::Single)));
        assert_eq!(s.shape, Shape::Linear);
    }

    #[test]
    fn malformed_input_degrades_gracefully() {
        let empty = sketch("");
        assert!(empty.is_empty());
        assert_eq!(empty.shape, Shape::Linear);

        let s = sketch(")C(C");
        assert_eq!(s.atom_count(), 2);
        assert_eq!(s.bond_count(), 1);
        assert_eq!(s.shape, Shape::Branched);

        let s = sketch("1(=C))O");
        assert_eq!(symbols(&s), ["C", "O"]);
        assert_eq!(s.bonds, vec![Bond::new(0, 1, BondOrder::Single)]);

        let s = sketch("C11C");
        assert_eq!(s.bond_count(), 1);
    }

    #[test]
    fn sketching_is_deterministic() {
        for input in ["CCO", "CC(=O)O", "CC(=O)OC1=CC=CC=C1C(=O)O", "C#N"] {
            assert_eq!(sketch(input), sketch(input));
        }
    }

    #[test]
    fn fitted_sketch_stays_inside_canvas_margins() {
        let canvas = Canvas::default();
        let fitted = sketch("CN1C=NC2=C1C(=O)N(C(=O)N2C)C").fit_to(&canvas);
        for atom in &fitted.atoms {
            let [x, y] = atom.position;
            assert!(x >= canvas.margin - 1e-9 && x <= canvas.width - canvas.margin + 1e-9);
            assert!(y >= canvas.margin - 1e-9 && y <= canvas.height - canvas.margin + 1e-9);
        }
    }

    #[test]
    fn fitting_preserves_proportions() {
        let raw = sketch("CCCC");
        let fitted = raw.fit_to(&Canvas::new(800.0, 800.0));
        let ratio = |s: &Sketch| s.bond_length(&s.bonds[0]) / s.bond_length(&s.bonds[2]);
        assert!(approx(ratio(&raw), ratio(&fitted)));
        assert_eq!(raw.shape, fitted.shape);
    }

    #[test]
    fn single_atom_is_centred() {
        let canvas = Canvas::new(200.0, 100.0).with_margin(10.0);
        let fitted = sketch("O").fit_to(&canvas);
        assert_eq!(fitted.atoms[0].position, [100.0, 50.0]);
        assert!(sketch("").fit_to(&canvas).is_empty());
    }
}
