use crate::io::error::Error;
use crate::model::element::Element;
use crate::settings::Theme;
use crate::smiles::{Canvas, Sketch};
use std::io::Write;

/// Gap between the parallel strokes of a double or triple bond.
const STROKE_GAP: f64 = 5.0;
const LABEL_RADIUS: f64 = 9.0;
const CARBON_DOT_RADIUS: f64 = 3.0;

/// Colours used to draw a sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub bond: &'static str,
    pub carbon: &'static str,
    pub label: &'static str,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: "#ffffff",
                bond: "#333333",
                carbon: "#222222",
                label: "#222222",
            },
            Theme::Dark => Self {
                background: "#1e1e24",
                bond: "#d0d0d8",
                carbon: "#e6e6ee",
                label: "#e6e6ee",
            },
        }
    }

    /// CPK-style colour for heteroatom labels.
    pub fn element(&self, element: Element) -> &'static str {
        match element.symbol() {
            "O" => "#e53935",
            "N" => "#1e88e5",
            "S" => "#fbc02d",
            "P" => "#fb8c00",
            "F" | "Cl" => "#43a047",
            "Br" => "#8d4e2a",
            "I" => "#8e24aa",
            _ => self.label,
        }
    }
}

/// Renders `sketch` fitted to `canvas` as a standalone SVG document.
pub fn write<W: Write>(
    mut writer: W,
    sketch: &Sketch,
    canvas: &Canvas,
    theme: Theme,
) -> Result<(), Error> {
    let palette = Palette::for_theme(theme);
    let fitted = sketch.fit_to(canvas);

    writeln!(
        writer,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = canvas.width,
        h = canvas.height
    )?;
    writeln!(writer, "  <title>{}</title>", fitted.shape)?;
    writeln!(
        writer,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        palette.background
    )?;

    writeln!(
        writer,
        r#"  <g stroke="{}" stroke-width="2" stroke-linecap="round">"#,
        palette.bond
    )?;
    for bond in &fitted.bonds {
        let a = fitted.atoms[bond.i].position;
        let b = fitted.atoms[bond.j].position;
        let normal = unit_normal(a, b);
        for offset in stroke_offsets(bond.order.multiplicity()) {
            let dx = normal[0] * offset;
            let dy = normal[1] * offset;
            writeln!(
                writer,
                r#"    <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"/>"#,
                a[0] + dx,
                a[1] + dy,
                b[0] + dx,
                b[1] + dy
            )?;
        }
    }
    writeln!(writer, "  </g>")?;

    writeln!(
        writer,
        r#"  <g font-family="sans-serif" font-size="14" text-anchor="middle" dominant-baseline="central">"#
    )?;
    for atom in &fitted.atoms {
        let [x, y] = atom.position;
        if atom.element.is_carbon() {
            writeln!(
                writer,
                r#"    <circle cx="{x:.2}" cy="{y:.2}" r="{CARBON_DOT_RADIUS}" fill="{}"/>"#,
                palette.carbon
            )?;
        } else {
            writeln!(
                writer,
                r#"    <circle cx="{x:.2}" cy="{y:.2}" r="{LABEL_RADIUS}" fill="{}"/>"#,
                palette.background
            )?;
            writeln!(
                writer,
                r#"    <text x="{x:.2}" y="{y:.2}" fill="{}">{}</text>"#,
                palette.element(atom.element),
                atom.element.symbol()
            )?;
        }
    }
    writeln!(writer, "  </g>")?;
    writeln!(writer, "</svg>")?;
    Ok(())
}

fn unit_normal(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len = dx.hypot(dy);
    if len <= f64::EPSILON {
        [0.0, 0.0]
    } else {
        [-dy / len, dx / len]
    }
}

fn stroke_offsets(multiplicity: u8) -> Vec<f64> {
    let n = multiplicity.max(1);
    let first = -(f64::from(n) - 1.0) / 2.0;
    (0..n)
        .map(|k| (first + f64::from(k)) * STROKE_GAP)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::sketch;

    fn render(smiles: &str, theme: Theme) -> String {
        let mut buf = Vec::new();
        write(&mut buf, &sketch(smiles), &Canvas::default(), theme).expect("write svg");
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn draws_one_stroke_per_bond_order_unit() {
        let svg = render("CC(=O)O", Theme::Light);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<line ").count(), 4);
        assert_eq!(render("CC#N", Theme::Light).matches("<line ").count(), 4);
    }

    #[test]
    fn labels_heteroatoms_and_dots_carbons() {
        let svg = render("CC(=O)O", Theme::Light);
        assert_eq!(svg.matches("<text ").count(), 2);
        assert_eq!(svg.matches(&format!(r#"r="{CARBON_DOT_RADIUS}""#)).count(), 2);
        assert!(svg.contains(">O</text>"));
        assert!(svg.contains("<title>multiple bonds</title>"));
    }

    #[test]
    fn theme_controls_background() {
        let light = render("CCO", Theme::Light);
        let dark = render("CCO", Theme::Dark);
        assert!(light.contains(r##"fill="#ffffff""##));
        assert!(dark.contains(r##"fill="#1e1e24""##));
        assert_ne!(light, dark);
    }

    #[test]
    fn empty_sketch_renders_blank_canvas() {
        let svg = render("", Theme::Light);
        assert!(svg.contains(r#"width="400""#));
        assert_eq!(svg.matches("<line ").count(), 0);
        assert_eq!(svg.matches("<circle ").count(), 0);
    }

    #[test]
    fn parallel_strokes_are_symmetric() {
        assert_eq!(stroke_offsets(1), vec![0.0]);
        assert_eq!(stroke_offsets(2), vec![-STROKE_GAP / 2.0, STROKE_GAP / 2.0]);
        assert_eq!(stroke_offsets(3), vec![-STROKE_GAP, 0.0, STROKE_GAP]);
        assert_eq!(unit_normal([0.0, 0.0], [0.0, 0.0]), [0.0, 0.0]);
        assert_eq!(unit_normal([0.0, 0.0], [2.0, 0.0]), [0.0, 1.0]);
    }
}
