use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use molsift::MoleculeEntry;

use crate::cli::ListArgs;
use crate::config::{Catalogs, current_settings};
use crate::display::{Context as DisplayContext, print_catalog_listing};

pub fn run_list(args: ListArgs, ctx: DisplayContext, settings: &Path) -> Result<()> {
    let catalogs = Catalogs::load(&args.catalog)?;

    let entries: Vec<(&str, &MoleculeEntry)> = catalogs
        .iter()
        .flat_map(|catalog| catalog.iter().map(move |entry| (catalog.source(), entry)))
        .filter(|(_, entry)| match &args.category {
            Some(wanted) => entry
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(wanted)),
            None => true,
        })
        .collect();

    if args.json {
        let plain: Vec<&MoleculeEntry> = entries.iter().map(|(_, e)| *e).collect();
        let mut out = io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, &plain).context("Failed to encode catalog as JSON")?;
        writeln!(out)?;
        return Ok(());
    }

    if ctx.wants_tables() {
        let language = current_settings(settings).language;
        print_catalog_listing(&entries, language);
        return Ok(());
    }

    let mut out = io::stdout().lock();
    for (source, entry) in &entries {
        writeln!(
            out,
            "{}\t{}\t{:.2}\t{}\t{}",
            entry.name,
            entry.formula,
            entry.weight,
            entry.category.as_deref().unwrap_or("-"),
            source
        )?;
    }
    Ok(())
}
