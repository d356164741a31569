use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use molsift::{Language, MoleculeEntry, SearchResult, Settings, Sketch};

use crate::util::text::{display_width, pad, truncate, wrap};

const INDENT: &str = "      ";

const KEY_WIDTH: usize = 16;
const VALUE_WIDTH: usize = 40;
const MAX_DISTRIBUTION_ROWS: usize = 12;

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Column {
    header: &'static str,
    width: usize,
    align: Align,
}

const fn col(header: &'static str, width: usize, align: Align) -> Column {
    Column {
        header,
        width,
        align,
    }
}

pub fn print_search_results(results: &[SearchResult<'_>], query: &str, language: Language) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let columns = [
        col("#", 2, Align::Right),
        col("Score", 5, Align::Right),
        col("Molecule", 20, Align::Left),
        col("Match", 15, Align::Left),
        col("Source", 8, Align::Left),
    ];
    let rows: Vec<Vec<String>> = results
        .iter()
        .enumerate()
        .map(|(rank, r)| {
            vec![
                (rank + 1).to_string(),
                r.score.to_string(),
                r.entry.display_name(language).to_string(),
                r.kind.to_string(),
                r.source.to_string(),
            ]
        })
        .collect();

    print_grid(&mut out, &format!("Matches for \"{query}\""), &columns, &rows);
}

pub fn print_entry_details(
    entry: &MoleculeEntry,
    source: &str,
    computed_weight: Option<f64>,
    language: Language,
) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let mut rows = vec![
        ("Name", entry.name.clone()),
        ("PubChem CID", entry.pubchem_id.clone()),
        ("Formula", entry.formula.clone()),
        ("Weight", format!("{:.2} g/mol", entry.weight)),
    ];
    match computed_weight {
        Some(w) => rows.push((
            "Computed weight",
            format!("{:.2} g/mol (Δ {:+.2})", w, w - entry.weight),
        )),
        None => rows.push(("Computed weight", "n/a (formula not parsable)".to_string())),
    }
    if entry.has_structure() {
        rows.push(("SMILES", entry.smiles.clone()));
    }
    if let Some(category) = &entry.category {
        rows.push(("Category", category.clone()));
    }
    if !entry.synonyms.is_empty() {
        rows.push(("Synonyms", entry.synonyms.join(", ")));
    }
    if !entry.description.is_empty() {
        rows.push(("Description", entry.description.clone()));
    }
    rows.push(("Source", source.to_string()));

    print_kv_table(&mut out, entry.display_name(language), &rows);
}

pub fn print_catalog_listing(entries: &[(&str, &MoleculeEntry)], language: Language) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let columns = [
        col("Molecule", 20, Align::Left),
        col("Formula", 14, Align::Left),
        col("g/mol", 8, Align::Right),
        col("Category", 16, Align::Left),
    ];
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|(_, e)| {
            vec![
                e.display_name(language).to_string(),
                e.formula.clone(),
                format!("{:.2}", e.weight),
                e.category.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    print_grid(
        &mut out,
        &format!("Catalog ({} molecules)", entries.len()),
        &columns,
        &rows,
    );
}

pub fn print_sketch_summary(sketch: &Sketch) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let rows = vec![
        ("Atoms", sketch.atom_count().to_string()),
        ("Bonds", sketch.bond_count().to_string()),
        ("Branches", sketch.branch_count.to_string()),
        ("Shape", sketch.shape.to_string()),
    ];
    print_kv_table(&mut out, "Sketch Summary", &rows);

    if sketch.is_empty() {
        return;
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for atom in &sketch.atoms {
        *counts.entry(atom.element.symbol()).or_insert(0) += 1;
    }
    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(symbol, count)| (symbol.to_string(), count))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    print_distribution_table(&mut out, "Element Distribution", &sorted, sketch.atom_count());
}

pub fn print_settings(settings: &Settings, path: &Path) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let rows = vec![
        ("Language", settings.language.to_string()),
        ("Theme", settings.theme.to_string()),
        ("File", path.display().to_string()),
    ];
    print_kv_table(&mut out, "Settings", &rows);
}

fn rule(columns: &[Column], left: &str, mid: &str, right: &str) -> String {
    let inner: Vec<String> = columns.iter().map(|c| "─".repeat(c.width + 2)).collect();
    format!("{INDENT}{left}{}{right}", inner.join(mid))
}

fn cell(text: &str, column: &Column) -> String {
    match column.align {
        Align::Left => pad(text, column.width),
        Align::Right => {
            let cut = truncate(text, column.width);
            let fill = column.width.saturating_sub(display_width(&cut));
            format!("{}{cut}", " ".repeat(fill))
        }
    }
}

fn print_grid(out: &mut impl Write, title: &str, columns: &[Column], rows: &[Vec<String>]) {
    let total: usize = columns.iter().map(|c| c.width + 3).sum::<usize>() + 1;

    let _ = writeln!(out, "{INDENT}┌─ {} ─┐", truncate(title, total - 6));
    let _ = writeln!(out, "{}", rule(columns, "┌", "┬", "┐"));

    let header: Vec<String> = columns.iter().map(|c| cell(c.header, c)).collect();
    let _ = writeln!(out, "{INDENT}│ {} │", header.join(" │ "));
    let _ = writeln!(out, "{}", rule(columns, "├", "┼", "┤"));

    if rows.is_empty() {
        let span = total - 4;
        let _ = writeln!(out, "{INDENT}│ {} │", pad("(none)", span));
    }
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .zip(row)
            .map(|(c, text)| cell(text, c))
            .collect();
        let _ = writeln!(out, "{INDENT}│ {} │", cells.join(" │ "));
    }

    let _ = writeln!(out, "{}", rule(columns, "└", "┴", "┘"));
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let columns = [
        col("Field", KEY_WIDTH, Align::Left),
        col("Value", VALUE_WIDTH, Align::Left),
    ];

    let _ = writeln!(
        out,
        "{INDENT}┌─ {} ─┐",
        truncate(title, KEY_WIDTH + VALUE_WIDTH)
    );
    let _ = writeln!(out, "{}", rule(&columns, "┌", "┬", "┐"));

    for (key, value) in rows {
        for (i, line) in wrap(value, VALUE_WIDTH).iter().enumerate() {
            let key = if i == 0 { *key } else { "" };
            let _ = writeln!(
                out,
                "{INDENT}│ {} │ {} │",
                pad(key, KEY_WIDTH),
                pad(line, VALUE_WIDTH)
            );
        }
    }

    let _ = writeln!(out, "{}", rule(&columns, "└", "┴", "┘"));
}

fn print_distribution_table(
    out: &mut impl Write,
    title: &str,
    data: &[(String, usize)],
    total: usize,
) {
    let columns = [
        col("Element", 8, Align::Left),
        col("Count", 6, Align::Right),
        col("Distribution", 30, Align::Left),
    ];
    let bar_width = 20;

    let mut rows: Vec<Vec<String>> = data
        .iter()
        .take(MAX_DISTRIBUTION_ROWS)
        .map(|(name, count)| {
            let pct = (*count as f64 / total as f64) * 100.0;
            vec![
                name.clone(),
                count.to_string(),
                format!("{}  {:>5.1}%", make_bar(pct, bar_width), pct),
            ]
        })
        .collect();

    if data.len() > MAX_DISTRIBUTION_ROWS {
        rows.push(vec![
            "...".to_string(),
            "...".to_string(),
            format!("({} more elements)", data.len() - MAX_DISTRIBUTION_ROWS),
        ]);
    }

    print_grid(out, title, &columns, &rows);
}

fn make_bar(pct: f64, max_width: usize) -> String {
    let filled = ((pct / 100.0) * max_width as f64).round() as usize;
    let empty = max_width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_grid(columns: &[Column], rows: &[Vec<String>]) -> Vec<String> {
        let mut buf = Vec::new();
        print_grid(&mut buf, "Title", columns, rows);
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn grid_rows_line_up_with_borders() {
        let columns = [col("Name", 6, Align::Left), col("N", 3, Align::Right)];
        let lines = render_grid(
            &columns,
            &[
                vec!["Aspirin".to_string(), "1".to_string()],
                vec!["水".to_string(), "22".to_string()],
            ],
        );

        let widths: Vec<usize> = lines[1..].iter().map(|l| display_width(l)).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{lines:#?}");
        assert!(lines[4].contains("Aspir…"));
        assert!(lines[5].contains("水    "));
        assert!(lines[5].ends_with(" 22 │"));
    }

    #[test]
    fn empty_grid_says_none() {
        let columns = [col("Name", 10, Align::Left), col("N", 3, Align::Right)];
        let lines = render_grid(&columns, &[]);
        assert!(lines.iter().any(|l| l.contains("(none)")));
        let widths: Vec<usize> = lines[1..].iter().map(|l| display_width(l)).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{lines:#?}");
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(make_bar(50.0, 4), "██░░");
        assert_eq!(make_bar(100.0, 3), "███");
        assert_eq!(make_bar(0.0, 2), "░░");
    }
}
