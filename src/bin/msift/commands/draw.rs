use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use tracing::warn;

use molsift::io::{Format, sdf, svg};
use molsift::{Theme, sketch};

use crate::cli::DrawArgs;
use crate::config::{Catalogs, build_canvas, current_settings};
use crate::display::{Context as DisplayContext, Progress, print_sketch_summary};
use crate::io::{create_output, infer_output_format};

const TOTAL_STEPS: u8 = 3;

/// A SMILES string together with the title written into the output.
struct Structure {
    smiles: String,
    title: String,
}

pub fn run_draw(args: DrawArgs, ctx: DisplayContext, settings: &Path) -> Result<()> {
    let format = resolve_output_format(&args)?;
    let canvas = build_canvas(&args.canvas)?;
    let theme: Theme = match args.theme {
        Some(theme) => theme.into(),
        None => current_settings(settings).theme,
    };

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Resolving structure");
    let structure = resolve_structure(&args)?;
    progress.complete_step(
        "Resolving structure",
        &[format!("{} → {}", structure.title, structure.smiles)],
    );

    progress.step("Laying out atoms");
    let layout = sketch(&structure.smiles);
    if layout.is_empty() {
        warn!(smiles = %structure.smiles, "no atoms recognised; writing an empty drawing");
    }
    progress.complete_step(
        "Laying out atoms",
        &[
            format!("{} atoms, {} bonds", layout.atom_count(), layout.bond_count()),
            format!("Classified as {}", layout.shape),
        ],
    );

    if ctx.interactive {
        print_sketch_summary(&layout);
    }

    progress.step("Writing output");
    let mut out = create_output(args.output.as_deref())?;
    match format {
        Format::Svg => svg::write(&mut out, &layout, &canvas, theme),
        Format::Sdf => sdf::write(&mut out, &layout, &structure.title),
    }
    .with_context(|| format!("Failed to write {format} output"))?;
    out.flush().context("Failed to flush output")?;

    let target = args
        .output
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stdout".to_string());
    let mut details = vec![format!("Write {format} → {target}")];
    if format == Format::Svg {
        details.push(format!(
            "{} × {} canvas, {} theme",
            canvas.width, canvas.height, theme
        ));
    }
    progress.complete_step("Writing output", &details);

    progress.finish("Sketch complete");

    Ok(())
}

fn resolve_output_format(args: &DrawArgs) -> Result<Format> {
    if let Some(fmt) = args.outfmt {
        return Ok(fmt.into());
    }
    match &args.output {
        None => Ok(Format::Svg),
        Some(path) => infer_output_format(path).ok_or_else(|| {
            anyhow!(
                "Cannot infer output format from extension of '{}'",
                path.display()
            )
        }),
    }
}

fn resolve_structure(args: &DrawArgs) -> Result<Structure> {
    if let Some(smiles) = &args.smiles {
        return Ok(Structure {
            smiles: smiles.clone(),
            title: smiles.clone(),
        });
    }

    let Some(query) = &args.name else {
        bail!("Provide a SMILES string or --name QUERY");
    };

    let catalogs = Catalogs::load(&args.catalog)?;
    let best = catalogs
        .matcher()
        .best(query)
        .ok_or_else(|| anyhow!("No match for '{}'", query.trim()))?;

    if !best.entry.has_structure() {
        bail!(
            "'{}' has no structure (SMILES) in the {} catalog",
            best.entry.name,
            best.source
        );
    }

    Ok(Structure {
        smiles: best.entry.smiles.clone(),
        title: best.entry.name.clone(),
    })
}
