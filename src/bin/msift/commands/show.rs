use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use molsift::{MatchKind, MoleculeEntry};

use crate::cli::ShowArgs;
use crate::config::{Catalogs, current_settings};
use crate::display::{Context as DisplayContext, print_entry_details};

#[derive(Serialize)]
struct Details<'a> {
    #[serde(flatten)]
    entry: &'a MoleculeEntry,
    score: u32,
    kind: MatchKind,
    source: &'a str,
    computed_weight: Option<f64>,
}

pub fn run_show(args: ShowArgs, ctx: DisplayContext, settings: &Path) -> Result<()> {
    let catalogs = Catalogs::load(&args.catalog)?;
    let matcher = catalogs.matcher();
    let best = matcher
        .best(&args.query)
        .ok_or_else(|| anyhow!("No match for '{}'", args.query.trim()))?;

    let computed_weight = match best.entry.parsed_formula() {
        Ok(formula) => Some(formula.molecular_weight()),
        Err(e) => {
            tracing::warn!(formula = %best.entry.formula, "cannot compute weight: {e}");
            None
        }
    };

    if args.json {
        let details = Details {
            entry: best.entry,
            score: best.score,
            kind: best.kind,
            source: best.source,
            computed_weight,
        };
        let mut out = io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, &details).context("Failed to encode entry as JSON")?;
        writeln!(out)?;
        return Ok(());
    }

    if ctx.wants_tables() {
        let language = current_settings(settings).language;
        print_entry_details(best.entry, best.source, computed_weight, language);
        return Ok(());
    }

    let entry = best.entry;
    let mut out = io::stdout().lock();
    writeln!(out, "name\t{}", entry.name)?;
    writeln!(out, "pubchem_id\t{}", entry.pubchem_id)?;
    writeln!(out, "formula\t{}", entry.formula)?;
    writeln!(out, "weight\t{:.2}", entry.weight)?;
    if let Some(w) = computed_weight {
        writeln!(out, "computed_weight\t{w:.2}")?;
    }
    writeln!(out, "smiles\t{}", entry.smiles)?;
    writeln!(out, "category\t{}", entry.category.as_deref().unwrap_or_default())?;
    writeln!(out, "synonyms\t{}", entry.synonyms.join("; "))?;
    writeln!(out, "match\t{} ({})", best.kind, best.score)?;
    writeln!(out, "source\t{}", best.source)?;
    Ok(())
}
