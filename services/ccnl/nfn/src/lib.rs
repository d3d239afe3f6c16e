//! Lambda expressions for Named-Function Networking.
//!
//! NFN requests carry a small applicative lambda calculus as the last
//! component of a name. This crate parses that text into a [`Term`] tree
//! and prints trees back in the exact textual form peers expect.
//!
//! ```
//! use ccnl_nfn::{parse, Term};
//!
//! let t = parse("f x y").unwrap();
//! assert_eq!(t, Term::app(Term::app(Term::var("f"), Term::var("x")), Term::var("y")));
//! assert_eq!(t.to_string(), "f x y");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod parser;
pub mod term;

pub use error::ParseError;
pub use parser::{parse, parse_with, MAX_DEPTH};
pub use term::{Term, LAMBDA_CHAR};
