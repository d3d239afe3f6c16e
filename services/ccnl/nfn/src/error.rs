//! Lambda expression parse errors.

use thiserror::Error;

/// Errors raised while parsing a lambda expression.
///
/// Positions are byte offsets into the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing to parse
    #[error("empty expression")]
    Empty,

    /// A `(` was never closed
    #[error("missing ')' at {0}")]
    MissingClose(usize),

    /// A `)` without matching `(`
    #[error("unexpected ')' at {0}")]
    UnexpectedClose(usize),

    /// `()` with nothing inside
    #[error("empty parentheses at {0}")]
    EmptyParens(usize),

    /// Character that cannot start a term
    #[error("unexpected character {ch:?} at {pos}")]
    UnexpectedChar {
        /// Offending character
        ch: char,
        /// Where it was found
        pos: usize,
    },

    /// `@` not followed by a variable name
    #[error("lambda at {0} binds no variable")]
    MissingBinder(usize),

    /// `@x` not followed by a body
    #[error("lambda at {0} has no body")]
    MissingBody(usize),

    /// Parentheses or lambdas nested too deeply
    #[error("nesting deeper than {0}")]
    TooDeep(usize),
}
