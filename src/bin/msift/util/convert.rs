use molsift::io::Format;
use molsift::{Language, Theme};

use crate::cli;

impl From<cli::OutputFormat> for Format {
    fn from(f: cli::OutputFormat) -> Self {
        match f {
            cli::OutputFormat::Svg => Self::Svg,
            cli::OutputFormat::Sdf => Self::Sdf,
        }
    }
}

impl From<cli::LanguageArg> for Language {
    fn from(l: cli::LanguageArg) -> Self {
        match l {
            cli::LanguageArg::En => Self::En,
            cli::LanguageArg::Zh => Self::Zh,
        }
    }
}

impl From<cli::ThemeArg> for Theme {
    fn from(t: cli::ThemeArg) -> Self {
        match t {
            cli::ThemeArg::Light => Self::Light,
            cli::ThemeArg::Dark => Self::Dark,
        }
    }
}
