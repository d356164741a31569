//! Writers that turn a [`Sketch`](crate::smiles::Sketch) into files.
//!
//! Both writers stream into any [`std::io::Write`] and only fail when the
//! underlying writer does.

use std::fmt;
use std::str::FromStr;

pub mod error;

pub use error::Error;

pub mod svg {
    mod writer;
    pub use writer::{Palette, write};
}

pub mod sdf {
    mod writer;
    pub use writer::{ANGSTROM_PER_BOND, write};
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Svg,
    Sdf,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Svg => "svg",
            Format::Sdf => "sdf",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Svg => write!(f, "SVG"),
            Format::Sdf => write!(f, "SDF"),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "svg" => Ok(Format::Svg),
            "sdf" | "mol" => Ok(Format::Sdf),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_names_and_extensions() {
        assert_eq!("SVG".parse::<Format>().unwrap(), Format::Svg);
        assert_eq!("mol".parse::<Format>().unwrap(), Format::Sdf);
        assert_eq!(Format::Sdf.extension(), "sdf");
        assert_eq!(Format::Svg.to_string(), "SVG");

        let err = "png".parse::<Format>().unwrap_err();
        assert_eq!(err.to_string(), "unknown output format 'png' (expected svg or sdf)");
    }
}
