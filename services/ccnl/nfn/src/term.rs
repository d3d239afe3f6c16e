//! Lambda terms and their printer.

use std::fmt;

/// Marker introducing a lambda abstraction
pub const LAMBDA_CHAR: char = '@';

/// Node of a lambda expression tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Variable reference
    Var(String),
    /// Abstraction binding a variable over a body
    Lambda(String, Box<Term>),
    /// Application of a function to an argument
    App(Box<Term>, Box<Term>),
}

impl Term {
    /// Variable term
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(name.into())
    }

    /// Lambda term
    pub fn lambda(name: impl Into<String>, body: Term) -> Self {
        Term::Lambda(name.into(), Box::new(body))
    }

    /// Application term
    pub fn app(function: Term, argument: Term) -> Self {
        Term::App(Box::new(function), Box::new(argument))
    }

    /// Whether this is a variable
    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    /// Whether this is a lambda
    pub fn is_lambda(&self) -> bool {
        matches!(self, Term::Lambda(..))
    }

    /// Whether this is an application
    pub fn is_app(&self) -> bool {
        matches!(self, Term::App(..))
    }

    /// Variable name or lambda binder
    pub fn name(&self) -> Option<&str> {
        match self {
            Term::Var(name) | Term::Lambda(name, _) => Some(name),
            Term::App(..) => None,
        }
    }

    /// Append the textual form to `out`
    pub fn write_to(&self, out: &mut String) {
        self.print(out, '\0');
    }

    // `last` is the context character the caller emitted before this term;
    // a variable after an alphanumeric context gets a separating space.
    fn print(&self, out: &mut String, last: char) {
        match self {
            Term::Lambda(name, body) => {
                out.push('(');
                out.push(LAMBDA_CHAR);
                out.push_str(name);
                body.print(out, 'a');
                out.push(')');
            }
            Term::Var(name) => {
                if last.is_ascii_alphanumeric() {
                    out.push(' ');
                }
                out.push_str(name);
            }
            Term::App(..) => {
                // walk the left spine so long `f a b c ...` chains use no stack
                let mut arguments = Vec::new();
                let mut head = self;
                while let Term::App(function, argument) = head {
                    arguments.push(argument.as_ref());
                    head = function.as_ref();
                }

                head.print(out, last);
                for argument in arguments.into_iter().rev() {
                    if argument.is_var() {
                        argument.print(out, 'a');
                    } else {
                        out.push_str(" (");
                        argument.print(out, '(');
                        out.push(')');
                    }
                }
            }
        }
    }

    /// Move the children out of `self`, leaving empty variables behind
    fn take_children(&mut self, pending: &mut Vec<Term>) {
        match self {
            Term::Var(_) => {}
            Term::Lambda(_, body) => pending.push(std::mem::take(body.as_mut())),
            Term::App(function, argument) => {
                pending.push(std::mem::take(function.as_mut()));
                pending.push(std::mem::take(argument.as_mut()));
            }
        }
    }
}

impl Default for Term {
    fn default() -> Self {
        Term::Var(String::new())
    }
}

// Application chains grow without bound, so children are released from an
// explicit work list instead of by recursive drop glue.
impl Drop for Term {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut term) = pending.pop() {
            term.take_children(&mut pending);
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out);
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_identity() {
        let t = Term::lambda("x", Term::var("x"));
        assert_eq!(t.to_string(), "(@x x)");
    }

    #[test]
    fn test_print_left_nested_application() {
        let t = Term::app(Term::app(Term::var("f"), Term::var("x")), Term::var("y"));
        assert_eq!(t.to_string(), "f x y");
    }

    #[test]
    fn test_print_parenthesizes_non_variable_argument() {
        let t = Term::app(Term::var("f"), Term::app(Term::var("g"), Term::var("x")));
        assert_eq!(t.to_string(), "f (g x)");

        let t = Term::app(Term::var("f"), Term::lambda("x", Term::var("x")));
        assert_eq!(t.to_string(), "f ((@x x))");
    }

    #[test]
    fn test_print_lambda_in_function_position() {
        let t = Term::app(Term::lambda("x", Term::var("x")), Term::var("y"));
        assert_eq!(t.to_string(), "(@x x) y");
    }

    #[test]
    fn test_print_nested_lambda() {
        let t = Term::lambda("x", Term::lambda("y", Term::var("x")));
        assert_eq!(t.to_string(), "(@x(@y x))");
    }

    #[test]
    fn test_print_no_space_after_symbol() {
        let t = Term::app(Term::var("/lib/f"), Term::var("'a"));
        assert_eq!(t.to_string(), "/lib/f 'a");

        let mut out = String::from("call");
        Term::var("x").write_to(&mut out);
        assert_eq!(out, "callx");
    }

    #[test]
    fn test_print_and_drop_long_application_chain() {
        let mut t = Term::var("f");
        for _ in 0..200_000 {
            t = Term::app(t, Term::var("x"));
        }
        let text = t.to_string();
        assert_eq!(text.len(), 1 + 200_000 * 2);
        assert!(text.starts_with("f x x"));
        drop(t);
    }

    #[test]
    fn test_drop_deep_lambda_nesting() {
        let mut t = Term::var("x");
        for _ in 0..200_000 {
            t = Term::lambda("x", t);
        }
        drop(t);
    }

    #[test]
    fn test_predicates() {
        let t = Term::app(Term::var("f"), Term::var("x"));
        assert!(t.is_app());
        assert!(!t.is_var());
        assert_eq!(t.name(), None);
        assert_eq!(Term::lambda("v", Term::var("v")).name(), Some("v"));
    }
}
