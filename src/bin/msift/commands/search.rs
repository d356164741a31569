use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use molsift::SearchResult;

use crate::cli::SearchArgs;
use crate::config::{Catalogs, build_search_options, current_settings};
use crate::display::{Context as DisplayContext, print_search_results};

pub fn run_search(args: SearchArgs, ctx: DisplayContext, settings: &Path) -> Result<()> {
    let catalogs = Catalogs::load(&args.catalog)?;
    let options = build_search_options(&args);
    let results = catalogs.matcher().search_with(&args.query, &options);

    if args.json {
        return write_json(&results);
    }

    if results.is_empty() {
        bail!(
            "No match for '{}' among {} catalog molecules",
            args.query.trim(),
            catalogs.entry_count()
        );
    }

    if ctx.wants_tables() {
        let language = current_settings(settings).language;
        print_search_results(&results, args.query.trim(), language);
        return Ok(());
    }

    let mut out = io::stdout().lock();
    for r in &results {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            r.score, r.entry.name, r.entry.pubchem_id, r.kind, r.source
        )?;
    }
    Ok(())
}

fn write_json(results: &[SearchResult<'_>]) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, results).context("Failed to encode results as JSON")?;
    writeln!(out)?;
    Ok(())
}
