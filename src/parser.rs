use std::fmt;

use tracing::debug;

use crate::chart::{parse_chart, Chart, Label};
use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::index::GrammarIndex;
use crate::rules::Symbol;
use crate::syntree::SynTree;

/// Outcome of [`Parser::recognize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recognition {
  /// Whether the start symbol spans the whole input
  pub accepted: bool,
  /// Number of distinct labels in the cell spanning the whole input
  pub label_count: usize,
  /// How many of those labels are for the start symbol
  pub analyses: usize,
}

impl Recognition {
  pub fn is_accepted(&self) -> bool {
    self.accepted
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult {
  Parsed {
    tree: SynTree<Symbol, String>,
    label_count: usize,
    analyses: usize,
  },
  NoParse,
}

impl ParseResult {
  pub fn is_parsed(&self) -> bool {
    matches!(self, Self::Parsed { .. })
  }

  pub fn tree(&self) -> Option<&SynTree<Symbol, String>> {
    match self {
      Self::Parsed { tree, .. } => Some(tree),
      Self::NoParse => None,
    }
  }
}

impl fmt::Display for ParseResult {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Parsed { tree, .. } => write!(f, "{}", tree.bracketed()),
      Self::NoParse => write!(f, "no parse"),
    }
  }
}

/// A CKY parser for one grammar. Holds nothing per-sentence: every call builds
/// and drops its own chart, so a parser can be shared between threads.
#[derive(Debug, Clone)]
pub struct Parser {
  grammar: Grammar,
  index: GrammarIndex,
}

impl Parser {
  /// Fails if any rule has an empty right-hand side or more than two symbols
  pub fn new(grammar: Grammar) -> Result<Self, GrammarError> {
    let index = GrammarIndex::new(&grammar)?;
    debug!(
      start = %grammar.start,
      unary = index.unary_len(),
      binary = index.binary_len(),
      "built grammar index"
    );
    Ok(Self { grammar, index })
  }

  pub fn grammar(&self) -> &Grammar {
    &self.grammar
  }

  pub fn index(&self) -> &GrammarIndex {
    &self.index
  }

  pub fn start(&self) -> &Symbol {
    &self.grammar.start
  }

  /// Fills and returns the whole chart for `input`
  pub fn chart(&self, input: &[&str]) -> Chart {
    parse_chart(&self.index, input)
  }

  /// Fills the chart for `input` once and keeps it, so the chart, the
  /// recognition result and the trees can all be read from the same fill
  pub fn analyze(&self, input: &[&str]) -> Analysis {
    let chart = self.chart(input);
    let start = self.start().clone();
    let (label_count, analyses) = match chart.top() {
      Some(top) => (top.len(), top.labels_for(&start).count()),
      None => (0, 0),
    };
    debug!(tokens = input.len(), label_count, analyses, "filled chart");
    Analysis {
      chart,
      start,
      recognition: Recognition {
        accepted: analyses > 0,
        label_count,
        analyses,
      },
    }
  }

  pub fn recognize(&self, input: &[&str]) -> Recognition {
    self.analyze(input).recognition()
  }

  /// Parses `input`, returning the tree of the first analysis found for the
  /// start symbol
  pub fn parse(&self, input: &[&str]) -> ParseResult {
    self.analyze(input).parse_result()
  }

  /// Every analysis of `input` for the start symbol, in the order they were found
  pub fn parse_all(&self, input: &[&str]) -> Vec<SynTree<Symbol, String>> {
    self.analyze(input).trees()
  }
}

/// A filled chart and what it says about its input
#[derive(Debug, Clone)]
pub struct Analysis {
  chart: Chart,
  start: Symbol,
  recognition: Recognition,
}

impl Analysis {
  pub fn chart(&self) -> &Chart {
    &self.chart
  }

  pub fn recognition(&self) -> Recognition {
    self.recognition
  }

  fn start_labels(&self) -> impl Iterator<Item = &Label> {
    self
      .chart
      .top()
      .into_iter()
      .flat_map(move |top| top.labels_for(&self.start))
  }

  pub fn first_tree(&self) -> Option<SynTree<Symbol, String>> {
    self.start_labels().next().map(|l| l.derivation.to_tree(0))
  }

  pub fn trees(&self) -> Vec<SynTree<Symbol, String>> {
    self.start_labels().map(|l| l.derivation.to_tree(0)).collect()
  }

  pub fn parse_result(&self) -> ParseResult {
    match self.first_tree() {
      Some(tree) => ParseResult::Parsed {
        tree,
        label_count: self.recognition.label_count,
        analyses: self.recognition.analyses,
      },
      None => ParseResult::NoParse,
    }
  }
}
