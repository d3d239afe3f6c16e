//! Recursive-descent parser for lambda expressions.
//!
//! ```text
//! term := atom (atom)*
//! atom := '(' term ')' | '@' var term | var
//! var  := ['\''] (alnum | '_' | '=' | '/' | '.')*
//! ```
//!
//! Juxtaposed atoms fold to the left into applications. A lambda body
//! extends to the enclosing `)` or the end of input.

use crate::term::{Term, LAMBDA_CHAR};
use crate::ParseError;
use std::str::FromStr;
use tracing::debug;

/// Maximum nesting of parentheses and lambdas
pub const MAX_DEPTH: usize = 256;

fn is_var_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'=' | b'/' | b'.')
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn unexpected(&self) -> ParseError {
        let ch = self.src[self.pos..].chars().next().unwrap_or('\0');
        ParseError::UnexpectedChar { ch, pos: self.pos }
    }

    fn var(&mut self) -> Option<String> {
        let start = self.pos;
        if self.peek() == Some(b'\'') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(b) if is_var_byte(b)) {
            self.pos += 1;
        }
        (self.pos > start).then(|| self.src[start..self.pos].to_string())
    }

    /// Parse a sequence of atoms up to `)` or end of input
    fn term(&mut self, depth: usize) -> Result<Option<Term>, ParseError> {
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep(MAX_DEPTH));
        }

        let mut acc: Option<Term> = None;
        loop {
            self.skip_whitespace();
            let Some(b) = self.peek() else { break };
            let start = self.pos;

            let atom = match b {
                b')' => break,
                b'(' => {
                    self.pos += 1;
                    let inner = self
                        .term(depth + 1)?
                        .ok_or(ParseError::EmptyParens(start))?;
                    if self.peek() != Some(b')') {
                        return Err(ParseError::MissingClose(self.pos));
                    }
                    self.pos += 1;
                    inner
                }
                _ if b == LAMBDA_CHAR as u8 => {
                    self.pos += 1;
                    self.skip_whitespace();
                    let name = self.var().ok_or(ParseError::MissingBinder(start))?;
                    let body = self
                        .term(depth + 1)?
                        .ok_or(ParseError::MissingBody(start))?;
                    Term::lambda(name, body)
                }
                _ => Term::Var(self.var().ok_or_else(|| self.unexpected())?),
            };

            acc = Some(match acc {
                Some(function) => Term::app(function, atom),
                None => atom,
            });
        }

        Ok(acc)
    }
}

/// Parse a lambda expression
pub fn parse(input: &str) -> Result<Term, ParseError> {
    let mut parser = Parser::new(input);
    let result = parser.term(0).and_then(|term| {
        if parser.peek() == Some(b')') {
            return Err(ParseError::UnexpectedClose(parser.pos));
        }
        term.ok_or(ParseError::Empty)
    });

    if let Err(ref err) = result {
        debug!(input, error = %err, "lambda expression rejected");
    }
    result
}

/// Parse `input`, handing any error to `report` instead of returning it
pub fn parse_with<F>(input: &str, report: F) -> Option<Term>
where
    F: FnOnce(&ParseError),
{
    parse(input).map_err(|err| report(&err)).ok()
}

impl FromStr for Term {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn var(name: &str) -> Term {
        Term::var(name)
    }

    #[test]
    fn test_parse_identity() {
        let t = parse("(@x x)").unwrap();
        assert_eq!(t, Term::lambda("x", var("x")));
        assert_eq!(t.to_string(), "(@x x)");
    }

    #[test]
    fn test_parse_application_folds_left() {
        let t = parse("f x y").unwrap();
        assert_eq!(t, Term::app(Term::app(var("f"), var("x")), var("y")));
        assert_eq!(t.to_string(), "f x y");
    }

    #[test]
    fn test_parse_parenthesized_argument() {
        let t = parse("f (g x)").unwrap();
        assert_eq!(t, Term::app(var("f"), Term::app(var("g"), var("x"))));
        assert_eq!(t.to_string(), "f (g x)");
    }

    #[test]
    fn test_whitespace_insensitive() {
        assert_eq!(parse("  f\tx\n ").unwrap(), parse("f x").unwrap());
        assert_eq!(parse("( @x  x )").unwrap(), parse("(@x x)").unwrap());
        assert_eq!(parse("f(g)").unwrap(), Term::app(var("f"), var("g")));
    }

    #[test]
    fn test_lambda_body_extends_right() {
        let t = parse("@x f x y").unwrap();
        assert_eq!(
            t,
            Term::lambda("x", Term::app(Term::app(var("f"), var("x")), var("y")))
        );
        assert_eq!(t.to_string(), "(@x f x y)");

        let t = parse("(@x x) y").unwrap();
        assert_eq!(t, Term::app(Term::lambda("x", var("x")), var("y")));

        let t = parse("f (@x x y) z").unwrap();
        assert_eq!(
            t,
            Term::app(
                Term::app(var("f"), Term::lambda("x", Term::app(var("x"), var("y")))),
                var("z")
            )
        );
    }

    #[test]
    fn test_variable_charset() {
        let t = parse("call 1 /lib/f a.b=c_d 'q").unwrap();
        assert_eq!(t.to_string(), "call 1 /lib/f a.b=c_d 'q");
        assert_eq!(
            t,
            Term::app(
                Term::app(
                    Term::app(Term::app(var("call"), var("1")), var("/lib/f")),
                    var("a.b=c_d")
                ),
                var("'q")
            )
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("   "), Err(ParseError::Empty));
        assert_eq!(parse("(f x"), Err(ParseError::MissingClose(4)));
        assert_eq!(parse("f x)"), Err(ParseError::UnexpectedClose(3)));
        assert_eq!(parse("f ()"), Err(ParseError::EmptyParens(2)));
        assert_eq!(parse("@ (x)"), Err(ParseError::MissingBinder(0)));
        assert_eq!(parse("(@x)"), Err(ParseError::MissingBody(1)));
        assert_eq!(
            parse("f + x"),
            Err(ParseError::UnexpectedChar { ch: '+', pos: 2 })
        );
        assert_eq!(
            parse("f é"),
            Err(ParseError::UnexpectedChar { ch: 'é', pos: 2 })
        );
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}x{}", "(".repeat(MAX_DEPTH + 2), ")".repeat(MAX_DEPTH + 2));
        assert_eq!(parse(&deep), Err(ParseError::TooDeep(MAX_DEPTH)));

        let ok = format!("{}x{}", "(".repeat(16), ")".repeat(16));
        assert_eq!(parse(&ok).unwrap(), var("x"));
    }

    #[test]
    fn test_long_application_chain() {
        let input = "x ".repeat(100_000);
        let t = parse(&input).unwrap();
        assert!(t.is_app());

        let text = t.to_string();
        assert_eq!(text, input.trim_end());
        drop(t);

        assert_eq!(parse(&text).unwrap().to_string().len(), text.len());
    }

    #[test]
    fn test_parse_with_reports() {
        let mut seen = None;
        assert!(parse_with("(x", |e| seen = Some(e.clone())).is_none());
        assert_eq!(seen, Some(ParseError::MissingClose(2)));

        let mut called = false;
        assert!(parse_with("x", |_| called = true).is_some());
        assert!(!called);
    }

    #[test]
    fn test_from_str() {
        let t: Term = "@f @x f x".parse().unwrap();
        assert_eq!(t.to_string(), "(@f(@x f x))");
    }

    fn term_strategy() -> impl Strategy<Value = Term> {
        let leaf = "'?[a-z][a-z0-9_./]{0,3}".prop_map(Term::Var);
        leaf.prop_recursive(6, 48, 2, |inner| {
            prop_oneof![
                ("[a-z][a-z0-9]{0,2}", inner.clone()).prop_map(|(v, b)| Term::lambda(v, b)),
                (inner.clone(), inner).prop_map(|(f, a)| Term::app(f, a)),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_print_parse_round_trip(term in term_strategy()) {
            let text = term.to_string();
            let parsed = parse(&text).unwrap();
            prop_assert_eq!(&parsed, &term);
            prop_assert_eq!(parsed.to_string(), text);
        }
    }
}
