use crate::model::bond::BondOrder;
use crate::model::element::Element;
use tracing::trace;

/// A lexical unit of the SMILES subset understood by the sketcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Atom(Element),
    /// Ring-closure label; a run of digits forms one label.
    Ring(u32),
    Bond(BondOrder),
    BranchOpen,
    BranchClose,
    Disconnect,
}

/// Splits `input` into tokens, skipping every character the grammar does not know.
///
/// An uppercase letter absorbs the next lowercase letter only when the pair
/// names an element (`Cl`, `Br`, `Na`); otherwise the lowercase letter is
/// skipped on its own.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            'A'..='Z' => {
                let two_letter = chars.peek().and_then(|&(_, next)| {
                    next.is_ascii_lowercase()
                        .then(|| Element::from_symbol(&input[pos..pos + 2]))
                        .flatten()
                });
                if let Some(element) = two_letter {
                    chars.next();
                    tokens.push(Token::Atom(element));
                } else if let Some(element) = Element::from_symbol(&input[pos..pos + 1]) {
                    tokens.push(Token::Atom(element));
                } else {
                    trace!(position = pos, symbol = %c, "skipping unknown element letter");
                }
            }
            '0'..='9' => {
                let mut end = pos + 1;
                while let Some(&(next_pos, next)) = chars.peek() {
                    if !next.is_ascii_digit() {
                        break;
                    }
                    end = next_pos + 1;
                    chars.next();
                }
                match input[pos..end].parse::<u32>() {
                    Ok(label) => tokens.push(Token::Ring(label)),
                    Err(_) => trace!(position = pos, "skipping oversized ring label"),
                }
            }
            '=' => tokens.push(Token::Bond(BondOrder::Double)),
            '#' => tokens.push(Token::Bond(BondOrder::Triple)),
            '(' => tokens.push(Token::BranchOpen),
            ')' => tokens.push(Token::BranchClose),
            '.' => tokens.push(Token::Disconnect),
            _ => trace!(position = pos, found = %c, "skipping unsupported character"),
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(symbol: &str) -> Token {
        Token::Atom(Element::from_symbol(symbol).unwrap())
    }

    #[test]
    fn tokenizes_acetic_acid() {
        assert_eq!(
            tokenize("CC(=O)O"),
            vec![
                atom("C"),
                atom("C"),
                Token::BranchOpen,
                Token::Bond(BondOrder::Double),
                atom("O"),
                Token::BranchClose,
                atom("O"),
            ]
        );
    }

    #[test]
    fn two_letter_symbols_only_when_valid() {
        assert_eq!(tokenize("ClCBr"), vec![atom("Cl"), atom("C"), atom("Br")]);
        assert_eq!(tokenize("[Na+].[Cl-]"), vec![atom("Na"), Token::Disconnect, atom("Cl")]);
        // "Cc" is not an element, so the aromatic 'c' is dropped.
        assert_eq!(tokenize("Cc"), vec![atom("C")]);
    }

    #[test]
    fn digit_runs_form_one_label() {
        assert_eq!(
            tokenize("C12#N"),
            vec![
                atom("C"),
                Token::Ring(12),
                Token::Bond(BondOrder::Triple),
                atom("N"),
            ]
        );
    }

    #[test]
    fn unknown_characters_are_skipped() {
        assert_eq!(
            tokenize("C/C=C\\C@X"),
            vec![
                atom("C"),
                atom("C"),
                Token::Bond(BondOrder::Double),
                atom("C"),
                atom("C"),
            ]
        );
        assert!(tokenize("").is_empty());
        assert!(tokenize("xyz?!").is_empty());
        assert!(tokenize("99999999999999999999").is_empty());
    }

    #[test]
    fn multibyte_input_does_not_panic() {
        assert_eq!(tokenize("C阿O"), vec![atom("C"), atom("O")]);
        assert_eq!(tokenize("Né"), vec![atom("N")]);
    }
}
