use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing::info;

use molsift::{Settings, SettingsEvent};

use crate::cli::{SettingsAction, SettingsArgs};
use crate::config::open_settings;
use crate::display::{Context as DisplayContext, print_settings};

pub fn run_settings(args: SettingsArgs, ctx: DisplayContext, path: &Path) -> Result<()> {
    let store = open_settings(path)?;

    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    let subscription = store.subscribe(move |event: &SettingsEvent| {
        info!(?event, "settings updated");
        if let Ok(mut events) = sink.lock() {
            events.push(describe(event));
        }
    });

    let save_context = || format!("Failed to save settings: {}", path.display());
    match args.action {
        SettingsAction::Show => {}
        SettingsAction::SetLanguage { language } => {
            store.set_language(language.into()).with_context(save_context)?;
        }
        SettingsAction::SetTheme { theme } => {
            store.set_theme(theme.into()).with_context(save_context)?;
        }
    }
    store.unsubscribe(subscription);

    let current = store.current();
    let changes = changes.lock().map(|c| c.clone()).unwrap_or_default();

    if ctx.wants_tables() {
        print_settings(&current, path);
    } else {
        write_plain(&current)?;
    }

    let mut stderr = io::stderr().lock();
    for change in &changes {
        writeln!(stderr, "  {change}")?;
    }
    Ok(())
}

fn describe(event: &SettingsEvent) -> String {
    match event {
        SettingsEvent::LanguageChanged { old, new } => format!("language: {old} → {new}"),
        SettingsEvent::ThemeChanged { old, new } => format!("theme: {old} → {new}"),
    }
}

fn write_plain(settings: &Settings) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "language = {}", settings.language)?;
    writeln!(out, "theme = {}", settings.theme)?;
    Ok(())
}
