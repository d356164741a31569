use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use molsift::settings::{SettingsStore, TomlFileBackend};
use molsift::{Canvas, Catalog, Matcher, SearchOptions, Settings};

use crate::cli::{CanvasOptions, CatalogOptions, SearchArgs};

/// The catalogs selected on the command line, in search order.
pub struct Catalogs {
    builtin: bool,
    user: Vec<Catalog>,
}

impl Catalogs {
    pub fn load(opts: &CatalogOptions) -> Result<Self> {
        if opts.no_builtin && opts.catalogs.is_empty() {
            bail!("--no-builtin leaves nothing to search; pass at least one --catalog FILE");
        }

        let user = opts
            .catalogs
            .iter()
            .map(|path| {
                Catalog::from_path(path)
                    .with_context(|| format!("Failed to load catalog: {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            builtin: !opts.no_builtin,
            user,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Catalog> {
        let builtin: Option<&Catalog> = self.builtin.then(Catalog::builtin);
        builtin.into_iter().chain(self.user.iter())
    }

    pub fn matcher(&self) -> Matcher<'_> {
        self.iter().collect()
    }

    pub fn entry_count(&self) -> usize {
        self.iter().map(Catalog::len).sum()
    }
}

pub fn build_search_options(args: &SearchArgs) -> SearchOptions {
    let mut options = SearchOptions::default()
        .limit(args.limit)
        .min_score(args.min_score);
    if let Some(category) = &args.category {
        options = options.category(category.clone());
    }
    options
}

pub fn build_canvas(opts: &CanvasOptions) -> Result<Canvas> {
    if !(opts.width > 0.0 && opts.height > 0.0) {
        bail!(
            "Canvas must have a positive size, got {} × {}",
            opts.width,
            opts.height
        );
    }
    if !(opts.margin >= 0.0) || 2.0 * opts.margin >= opts.width.min(opts.height) {
        bail!(
            "Margin {} leaves no room on a {} × {} canvas",
            opts.margin,
            opts.width,
            opts.height
        );
    }
    Ok(Canvas::new(opts.width, opts.height).with_margin(opts.margin))
}

pub fn open_settings(path: &Path) -> Result<SettingsStore<TomlFileBackend>> {
    debug!(path = %path.display(), "opening settings");
    SettingsStore::open(TomlFileBackend::new(path))
        .with_context(|| format!("Failed to load settings: {}", path.display()))
}

/// Settings for read-only commands; an unreadable file falls back to defaults.
pub fn current_settings(path: &Path) -> Settings {
    match open_settings(path) {
        Ok(store) => store.current(),
        Err(e) => {
            warn!("{e:#}; using default settings");
            Settings::default()
        }
    }
}
