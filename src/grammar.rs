use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::GrammarError;
use crate::parse_grammar::parse_rules;
use crate::rules::{Rule, Symbol};

/// A start symbol plus the rules in the order they were written.
/// Never mutated once a parser has been built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
  pub start: Symbol,
  pub rules: Vec<Rule>,
}

/// Writes the grammar in the notation `FromStr` reads, with the start symbol
/// and non-terminals listed in a comment header.
impl fmt::Display for Grammar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "# start: {}", self.start)?;
    write!(f, "# nonterminals:")?;
    for nt in self.nonterminals() {
      write!(f, " {}", nt)?;
    }
    writeln!(f)?;

    for rule in self.rules.iter() {
      writeln!(f, "{}", rule)?;
    }

    Ok(())
  }
}

impl Grammar {
  pub fn new(start: Symbol, rules: Vec<Rule>) -> Self {
    Self { start, rules }
  }

  /// Every symbol that appears on a left-hand side, sorted by name.
  pub fn nonterminals(&self) -> BTreeSet<&Symbol> {
    self.rules.iter().map(|r| &r.symbol).collect()
  }

  pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, GrammarError> {
    fs::read_to_string(path)?.parse()
  }
}

impl FromStr for Grammar {
  type Err = GrammarError;

  /// Parses a grammar from a string. Assumes the first rule's symbol
  /// is the start symbol.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let rules = parse_rules(s)?;
    match rules.first() {
      Some(first) => Ok(Self::new(first.symbol.clone(), rules)),
      None => Err(GrammarError::Empty),
    }
  }
}
