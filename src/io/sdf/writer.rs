use crate::io::error::Error;
use crate::smiles::{BOND_LENGTH, Sketch};
use std::io::Write;

/// Length one sketch bond is given in the exported coordinates.
pub const ANGSTROM_PER_BOND: f64 = 1.5;

/// Writes `sketch` as a single V2000 mol block terminated by `$$$$`.
///
/// Raw sketch coordinates are scaled so a bond is [`ANGSTROM_PER_BOND`]
/// long and flipped to a y-up frame; z is always zero.
pub fn write<W: Write>(mut writer: W, sketch: &Sketch, title: &str) -> Result<(), Error> {
    let scale = ANGSTROM_PER_BOND / BOND_LENGTH;

    writeln!(writer, "{}", title.lines().next().unwrap_or_default())?;
    writeln!(writer, "  molsift        2D")?;
    writeln!(writer, "{}", sketch.shape)?;
    writeln!(
        writer,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
        sketch.atom_count(),
        sketch.bond_count()
    )?;

    for atom in &sketch.atoms {
        let [x, y] = atom.position;
        writeln!(
            writer,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
            x * scale,
            // `+ 0.0` turns -0.0 into 0.0
            -y * scale + 0.0,
            0.0,
            atom.element.symbol()
        )?;
    }

    for bond in &sketch.bonds {
        writeln!(
            writer,
            "{:>3}{:>3}{:>3}  0  0  0  0",
            bond.i + 1,
            bond.j + 1,
            bond.order.multiplicity()
        )?;
    }

    writeln!(writer, "M  END")?;
    writeln!(writer, "$$$$")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::sketch;

    fn coords(line: &str) -> [f64; 3] {
        let mut fields = line.split_whitespace().map(|f| f.parse::<f64>().unwrap());
        [
            fields.next().unwrap(),
            fields.next().unwrap(),
            fields.next().unwrap(),
        ]
    }

    #[test]
    fn writes_counts_atoms_and_bonds() {
        let mut buf = Vec::new();
        write(&mut buf, &sketch("CC(=O)O"), "Acetic acid").expect("write sdf");
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Acetic acid");
        assert_eq!(lines[2], "multiple bonds");
        assert_eq!(lines[3], "  4  3  0  0  0  0  0  0  0  0999 V2000");
        assert!(lines[4].contains(" C  "));
        assert!(lines[6].contains(" O  "));
        assert_eq!(lines[8], "  1  2  2  0  0  0  0");
        assert_eq!(lines[9], "  2  3  1  0  0  0  0");
        assert_eq!(lines[10], "  2  4  1  0  0  0  0");
        assert_eq!(&lines[11..], ["M  END", "$$$$"]);
    }

    #[test]
    fn bonds_are_scaled_to_angstroms() {
        let mut buf = Vec::new();
        write(&mut buf, &sketch("CCO"), "ethanol").unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        let a = coords(lines[4]);
        let b = coords(lines[5]);
        let len = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
        assert!((len - ANGSTROM_PER_BOND).abs() < 1e-3);
        assert_eq!(a[2], 0.0);
    }

    #[test]
    fn empty_sketch_is_still_a_valid_block() {
        let mut buf = Vec::new();
        write(&mut buf, &sketch(""), "").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("  0  0  0  0  0  0  0  0  0  0999 V2000"));
        assert!(text.ends_with("M  END\n$$$$\n"));
    }
}
