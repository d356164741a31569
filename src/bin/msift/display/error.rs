use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::{pad, wrap};

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {} ║", pad(&line, 59));
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {} ║", pad(&line, 57));
        }
        source = cause.source();
    }

    let hints = HintCollector::collect(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {} ║", pad(first, 55));
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {} ║", pad(line, 55));
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

#[derive(Default)]
struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn collect(err: &Error) -> Vec<String> {
        let mut collector = Self::default();

        for cause in err.chain() {
            if collector.has_typed_hints {
                break;
            }
            collector.collect_catalog_hints(cause);
            collector.collect_settings_hints(cause);
            collector.collect_writer_hints(cause);
        }

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        collector.hints
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_catalog_hints(&mut self, cause: &(dyn std::error::Error + 'static)) {
        use molsift::catalog::Error as CatalogError;

        let Some(catalog_err) = cause.downcast_ref::<CatalogError>() else {
            return;
        };

        self.mark_typed();

        match catalog_err {
            CatalogError::Io { source, .. } => self.collect_std_io_hints(source),

            CatalogError::Parse(_) => {
                self.add("The catalog is not valid TOML or does not match the schema");
                self.add("Each molecule is a [[molecule]] table with name, pubchem_id, formula and weight");
                self.add("Optional keys: smiles, description, synonyms, category");
            }

            CatalogError::InvalidEntry { index, name, .. } => {
                self.add(format!("Fix molecule #{} ({}) in the catalog file", index + 1, name));
                self.add("Every molecule needs a non-empty name and formula and a non-negative weight");
            }
        }
    }

    fn collect_settings_hints(&mut self, cause: &(dyn std::error::Error + 'static)) {
        use molsift::settings::Error as SettingsError;

        let Some(settings_err) = cause.downcast_ref::<SettingsError>() else {
            return;
        };

        self.mark_typed();

        match settings_err {
            SettingsError::Io { source, .. } => self.collect_std_io_hints(source),

            SettingsError::Parse { path, .. } => {
                self.add(format!("Settings file '{}' is malformed", path.display()));
                self.add("Valid keys: language = \"en\" | \"zh\", theme = \"light\" | \"dark\"");
                self.add("Delete the file to fall back to defaults");
            }

            SettingsError::Serialize(_) => {
                self.add("Settings could not be encoded as TOML");
                self.add("This may indicate a bug, please report if reproducible");
            }

            SettingsError::UnknownValue { kind, expected, .. } => {
                self.add(format!("Use one of the supported {kind} values: {expected}"));
            }
        }
    }

    fn collect_writer_hints(&mut self, cause: &(dyn std::error::Error + 'static)) {
        use molsift::io::Error as WriterError;

        let Some(writer_err) = cause.downcast_ref::<WriterError>() else {
            return;
        };

        self.mark_typed();

        match writer_err {
            WriterError::Io { source } => self.collect_std_io_hints(source),

            WriterError::UnknownFormat(_) => {
                self.add("Supported output formats: svg, sdf");
                self.add("Pass --outfmt or use a .svg, .sdf or .mol file extension");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("File is not valid UTF-8 text");
                self.add("Catalog and settings files must be UTF-8 encoded TOML");
            }

            ErrorKind::WriteZero => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            ErrorKind::BrokenPipe => {
                self.add("Output consumer terminated early");
                self.add("This may occur when piping to commands like `head`");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check the file path, permissions and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("no match") {
            self.add("Try a shorter query, a synonym or the molecular formula");
            self.add("Run `msift list` to see every catalog molecule");
            return;
        }

        if msg.contains("no structure") {
            self.add("Macromolecules in the catalog carry no SMILES");
            self.add("Pass a SMILES string directly instead of --name");
            return;
        }

        if msg.contains("output format") || msg.contains("extension") {
            self.add("Pass --outfmt svg|sdf or use a .svg/.sdf/.mol extension");
            return;
        }

        if msg.contains("canvas") || msg.contains("margin") {
            self.add("Use a positive --width and --height");
            self.add("Keep --margin below half of the smaller side");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    for (i, cause) in err.chain().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        text.push_str(&cause.to_string());
    }

    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn catalog_errors_get_schema_hints_through_context() {
        let err = molsift::Catalog::from_toml("[[molecule]]\nname = 3")
            .context("Failed to load catalog: lab.toml")
            .unwrap_err();
        let hints = HintCollector::collect(&err);
        assert!(hints.iter().any(|h| h.contains("[[molecule]]")));
    }

    #[test]
    fn missing_settings_file_hints_at_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::new(molsift::settings::Error::Io {
            path: "x.toml".into(),
            source: io_err,
        });
        let hints = HintCollector::collect(&err);
        assert_eq!(hints[0], "File or directory not found");
    }

    #[test]
    fn untyped_errors_fall_back_to_message_hints() {
        let err = anyhow::anyhow!("No match for query 'zzz'");
        let hints = HintCollector::collect(&err);
        assert!(hints.iter().any(|h| h.contains("msift list")));

        let err = anyhow::anyhow!("something unexpected");
        assert!(HintCollector::collect(&err).is_empty());
    }
}
