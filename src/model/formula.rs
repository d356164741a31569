//! Molecular formulas in Hill-like notation (`C9H8O4`, `Ca(OH)2`).

use super::element::Element;
use std::fmt;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFormulaError {
    #[error("formula is empty")]
    Empty,

    #[error("unknown element symbol '{symbol}' at position {position}")]
    UnknownElement { symbol: String, position: usize },

    #[error("unexpected character '{found}' at position {position}")]
    UnexpectedChar { found: char, position: usize },

    #[error("unbalanced parenthesis at position {position}")]
    Unbalanced { position: usize },

    #[error("atom count too large at position {position}")]
    CountOverflow { position: usize },
}

/// Element counts of a molecule, kept in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Formula {
    counts: Vec<(Element, u32)>,
}

impl Formula {
    pub fn parse(input: &str) -> Result<Self, ParseFormulaError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseFormulaError::Empty);
        }

        let mut parser = Parser {
            chars: trimmed.char_indices().peekable(),
        };
        parser.group(0)
    }

    pub fn count(&self, element: Element) -> u32 {
        self.counts
            .iter()
            .find(|(e, _)| *e == element)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn elements(&self) -> impl Iterator<Item = (Element, u32)> + '_ {
        self.counts.iter().copied()
    }

    pub fn atom_count(&self) -> u64 {
        self.counts.iter().map(|(_, n)| u64::from(*n)).sum()
    }

    /// Average molecular weight in g/mol.
    pub fn molecular_weight(&self) -> f64 {
        self.counts
            .iter()
            .map(|(e, n)| e.atomic_mass() * f64::from(*n))
            .sum()
    }

    fn add(&mut self, element: Element, n: u32, position: usize) -> Result<(), ParseFormulaError> {
        match self.counts.iter_mut().find(|(e, _)| *e == element) {
            Some((_, count)) => {
                *count = count
                    .checked_add(n)
                    .ok_or(ParseFormulaError::CountOverflow { position })?;
            }
            None => self.counts.push((element, n)),
        }
        Ok(())
    }

    fn merge_scaled(
        &mut self,
        other: Formula,
        factor: u32,
        position: usize,
    ) -> Result<(), ParseFormulaError> {
        for (element, n) in other.counts {
            let scaled = n
                .checked_mul(factor)
                .ok_or(ParseFormulaError::CountOverflow { position })?;
            self.add(element, scaled, position)?;
        }
        Ok(())
    }
}

impl FromStr for Formula {
    type Err = ParseFormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (element, n) in &self.counts {
            if *n == 1 {
                write!(f, "{}", element)?;
            } else {
                write!(f, "{}{}", element, n)?;
            }
        }
        Ok(())
    }
}

struct Parser<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl Parser<'_> {
    fn group(&mut self, depth: usize) -> Result<Formula, ParseFormulaError> {
        let mut formula = Formula::default();

        while let Some(&(position, c)) = self.chars.peek() {
            match c {
                'A'..='Z' => {
                    self.chars.next();
                    let mut symbol = c.to_string();
                    if let Some(&(_, next)) = self.chars.peek()
                        && next.is_ascii_lowercase()
                    {
                        symbol.push(next);
                        self.chars.next();
                    }
                    let element = Element::from_symbol(&symbol)
                        .ok_or(ParseFormulaError::UnknownElement { symbol, position })?;
                    let n = self.count()?;
                    formula.add(element, n, position)?;
                }
                '(' | '[' => {
                    self.chars.next();
                    let close = if c == '(' { ')' } else { ']' };
                    let inner = self.group(depth + 1)?;
                    match self.chars.next() {
                        Some((_, found)) if found == close => {}
                        Some((at, _)) => {
                            return Err(ParseFormulaError::Unbalanced { position: at });
                        }
                        None => return Err(ParseFormulaError::Unbalanced { position }),
                    }
                    let n = self.count()?;
                    formula.merge_scaled(inner, n, position)?;
                }
                ')' | ']' if depth > 0 => break,
                ')' | ']' => return Err(ParseFormulaError::Unbalanced { position }),
                found => return Err(ParseFormulaError::UnexpectedChar { found, position }),
            }
        }

        Ok(formula)
    }

    fn count(&mut self) -> Result<u32, ParseFormulaError> {
        let mut value: Option<u32> = None;
        while let Some(&(position, c)) = self.chars.peek() {
            let Some(digit) = c.to_digit(10) else {
                break;
            };
            self.chars.next();
            value = Some(
                value
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(digit))
                    .ok_or(ParseFormulaError::CountOverflow { position })?,
            );
        }
        Ok(value.unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_formula() {
        let f = Formula::parse("C9H8O4").unwrap();
        assert_eq!(f.count(Element::C), 9);
        assert_eq!(f.count(Element::H), 8);
        assert_eq!(f.count(Element::O), 4);
        assert_eq!(f.atom_count(), 21);
        assert_eq!(f.to_string(), "C9H8O4");
    }

    #[test]
    fn aspirin_weight_matches_reference() {
        let f: Formula = "C9H8O4".parse().unwrap();
        assert!((f.molecular_weight() - 180.159).abs() < 0.01);
    }

    #[test]
    fn two_letter_symbols_and_implicit_counts() {
        let f = Formula::parse("NaCl").unwrap();
        assert_eq!(f.count(Element::from_symbol("Na").unwrap()), 1);
        assert_eq!(f.count(Element::CL), 1);
        assert_eq!(f.to_string(), "NaCl");
    }

    #[test]
    fn groups_are_multiplied_and_merged() {
        let f = Formula::parse("Ca(OH)2").unwrap();
        assert_eq!(f.count(Element::O), 2);
        assert_eq!(f.count(Element::H), 2);
        let f = Formula::parse("CH3(CH2)2CH3").unwrap();
        assert_eq!(f.count(Element::C), 4);
        assert_eq!(f.count(Element::H), 10);
    }

    #[test]
    fn rejects_unknown_elements_and_garbage() {
        assert_eq!(
            Formula::parse("Xx2"),
            Err(ParseFormulaError::UnknownElement {
                symbol: "Xx".into(),
                position: 0
            })
        );
        assert!(matches!(
            Formula::parse("C6H6!"),
            Err(ParseFormulaError::UnexpectedChar { found: '!', .. })
        ));
        assert_eq!(Formula::parse("  "), Err(ParseFormulaError::Empty));
    }

    #[test]
    fn rejects_unbalanced_groups() {
        assert!(matches!(
            Formula::parse("Ca(OH2"),
            Err(ParseFormulaError::Unbalanced { .. })
        ));
        assert!(matches!(
            Formula::parse("CaOH)2"),
            Err(ParseFormulaError::Unbalanced { .. })
        ));
    }

    #[test]
    fn rejects_mismatched_brackets() {
        assert_eq!(
            Formula::parse("Ca(OH]2"),
            Err(ParseFormulaError::Unbalanced { position: 5 })
        );
        assert_eq!(
            Formula::parse("K[Fe)"),
            Err(ParseFormulaError::Unbalanced { position: 4 })
        );
        let f = Formula::parse("K4[Fe(CN)6]").unwrap();
        assert_eq!(f.count(Element::C), 6);
        assert_eq!(f.count(Element::N), 6);
    }

    #[test]
    fn oversized_counts_are_errors_not_panics() {
        assert_eq!(
            Formula::parse("(C99999)99999"),
            Err(ParseFormulaError::CountOverflow { position: 0 })
        );
        assert!(matches!(
            Formula::parse("C4294967295C"),
            Err(ParseFormulaError::CountOverflow { .. })
        ));
        let f = Formula::parse("C4294967295H").unwrap();
        assert_eq!(f.atom_count(), 4_294_967_296);
        assert!(matches!(
            Formula::parse("C99999999999"),
            Err(ParseFormulaError::CountOverflow { .. })
        ));
    }
}
