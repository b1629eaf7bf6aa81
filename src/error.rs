//! Errors raised while loading a grammar or building a parser from it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrammarError {
  /// A rule whose right-hand side is empty or longer than two symbols.
  #[error("invalid grammar: rule `{rule}` has {arity} right-hand side symbols, expected 1 or 2")]
  InvalidGrammar { rule: String, arity: usize },

  #[error("grammar syntax error on line {line}: {message}")]
  Syntax { line: usize, message: String },

  #[error("empty ruleset")]
  Empty,

  #[error("couldn't read grammar file: {0}")]
  Io(#[from] std::io::Error),
}
