use std::collections::HashMap;

use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::rules::{Production, Symbol};

/// The grammar's rules split by arity and keyed by right-hand side, so the
/// chart can ask "what can be built from this?" in one lookup.
///
/// Left-hand sides keep the order their rules appear in the grammar, and
/// duplicated rules stay duplicated. Read-only once built, so one index can
/// be shared by any number of charts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrammarIndex {
  unary: HashMap<Production, Vec<Symbol>>,
  binary: HashMap<(Production, Production), Vec<Symbol>>,
}

impl GrammarIndex {
  pub fn new(grammar: &Grammar) -> Result<Self, GrammarError> {
    let mut index = Self::default();

    for rule in grammar.rules.iter() {
      match rule.productions.as_slice() {
        [rhs] => index
          .unary
          .entry(rhs.clone())
          .or_default()
          .push(rule.symbol.clone()),
        [left, right] => index
          .binary
          .entry((left.clone(), right.clone()))
          .or_default()
          .push(rule.symbol.clone()),
        _ => {
          return Err(GrammarError::InvalidGrammar {
            rule: rule.to_string(),
            arity: rule.len(),
          });
        }
      }
    }

    Ok(index)
  }

  /// Parents `A` of every rule `A -> child`
  pub fn unary_parents(&self, child: &Production) -> &[Symbol] {
    self.unary.get(child).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Parents `A` of every rule `A -> left right`
  pub fn binary_parents(&self, left: &Production, right: &Production) -> &[Symbol] {
    // tuple keys can't be borrowed from a pair of references, so clone for the lookup
    self
      .binary
      .get(&(left.clone(), right.clone()))
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  pub fn unary_len(&self) -> usize {
    self.unary.values().map(Vec::len).sum()
  }

  pub fn binary_len(&self) -> usize {
    self.binary.values().map(Vec::len).sum()
  }
}
