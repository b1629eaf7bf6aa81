//! A generalized CKY chart parser.
//!
//! Grammars don't need to be in Chomsky Normal Form: unary rules can chain
//! (`NP -> NP0`, `NP0 -> NP1`, ...) and binary rules can mix terminals and
//! non-terminals (`S -> Sdecl '.'`).
//!
//! ```ignore
//! use ckytree::{tokenize, Grammar, Parser};
//!
//! let g: Grammar = "S -> NP VP\nNP -> 'John'\nVP -> 'swims'".parse()?;
//! let parser = Parser::new(g)?;
//! let result = parser.parse(&tokenize("John swims"));
//! println!("{}", result); // (S (NP John) (VP swims))
//! ```
#[macro_use]
extern crate lazy_static;

pub mod chart;
pub mod error;
pub mod grammar;
pub mod index;
pub mod parse_grammar;
pub mod parser;
pub mod rules;
pub mod syntree;
pub mod tokenize;

pub use crate::error::GrammarError;
pub use crate::grammar::Grammar;
pub use crate::parser::{Analysis, ParseResult, Parser, Recognition};
pub use crate::rules::{Production, Rule, Symbol};
pub use crate::syntree::SynTree;
pub use crate::tokenize::tokenize;

impl Grammar {
  /// Indexes this grammar for parsing
  pub fn into_parser(self) -> Result<Parser, GrammarError> {
    Parser::new(self)
  }
}

#[test]
fn test_end_to_end() {
  let g: Grammar = r#"
    S -> NP VP
    NP -> Det N | 'John'
    VP -> 'swims' | VP Adv
    Det -> 'the'
    N -> 'frog'
    Adv -> 'today'
  "#
  .parse()
  .unwrap();

  let parser = g.into_parser().unwrap();

  assert!(parser.recognize(&tokenize("John swims today")).is_accepted());
  assert!(parser.recognize(&tokenize("the frog swims")).is_accepted());
  assert!(!parser.recognize(&tokenize("frog the swims")).is_accepted());

  assert_eq!(
    parser.parse(&tokenize("the frog swims today")).to_string(),
    "(S (NP (Det the) (N frog)) (VP (VP swims) (Adv today)))"
  );
}

#[test]
fn test_parser_is_shareable() {
  fn assert_send_sync<T: Send + Sync>() {}
  assert_send_sync::<Parser>();
}
