use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, debug_span, trace};

use crate::index::GrammarIndex;
use crate::rules::{Production, Symbol};
use crate::syntree::Derivation;

/// "This symbol spans this cell, and here is one way to derive it."
/// Two labels are equal only if both the symbol and the derivation match,
/// so every distinct derivation of a symbol gets its own label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label {
  pub symbol: Production,
  pub derivation: Rc<Derivation>,
}

impl Label {
  /// The literal token, as seeded into a span-1 cell
  pub fn word(token: &str) -> Self {
    Self {
      symbol: Production::terminal(token),
      derivation: Derivation::word(token),
    }
  }

  pub fn new(symbol: Symbol, derivation: Rc<Derivation>) -> Self {
    Self {
      symbol: Production::Nonterminal(symbol),
      derivation,
    }
  }

  pub fn is(&self, symbol: &Symbol) -> bool {
    self.symbol.as_nonterminal() == Some(symbol)
  }
}

impl fmt::Display for Label {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.symbol, self.derivation)
  }
}

/// One cell of the triangular chart, covering tokens `start..end`.
/// Labels are kept in discovery order and never removed.
#[derive(Debug, Clone)]
pub struct Cell {
  span: (usize, usize),
  labels: Vec<Label>,
  seen: HashSet<Label>,
}

impl Cell {
  pub fn new(start: usize, end: usize) -> Self {
    assert!(start < end, "cell {}..{} is below the diagonal", start, end);
    Self {
      span: (start, end),
      labels: Vec::new(),
      seen: HashSet::new(),
    }
  }

  pub fn span(&self) -> (usize, usize) {
    self.span
  }

  pub fn labels(&self) -> &[Label] {
    &self.labels
  }

  pub fn len(&self) -> usize {
    self.labels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.labels.is_empty()
  }

  pub fn has(&self, label: &Label) -> bool {
    self.seen.contains(label)
  }

  pub fn has_symbol(&self, symbol: &Production) -> bool {
    self.labels.iter().any(|l| &l.symbol == symbol)
  }

  /// Labels for `symbol`, in the order they were found
  pub fn labels_for<'a>(&'a self, symbol: &'a Symbol) -> impl Iterator<Item = &'a Label> + 'a {
    self.labels.iter().filter(move |l| l.is(symbol))
  }

  /// Adds `label` unless an identical one is already here, then closes the cell
  /// under unary rules: every `A -> label.symbol` yields a new label for `A`
  /// wrapping this one, which is added (and closed over) in turn.
  ///
  /// A parent that already heads the label's own unary chain is skipped, which
  /// is what stops cyclic rules like `A -> B`, `B -> A` from recursing forever.
  pub fn add_label(&mut self, index: &GrammarIndex, label: Label) {
    if !self.seen.insert(label.clone()) {
      return;
    }
    self.labels.push(label.clone());

    for parent in index.unary_parents(&label.symbol) {
      if label.derivation.unary_chain_contains(parent) {
        trace!(span = ?self.span, lhs = %parent, child = %label.symbol, "unary cycle skipped");
        continue;
      }
      trace!(span = ?self.span, lhs = %parent, child = %label.symbol, "unary");
      let derivation = Derivation::unary(parent.clone(), label.derivation.clone());
      self.add_label(index, Label::new(parent.clone(), derivation));
    }
  }
}

/// Upper-triangular chart over `len` tokens. Cell `(start, end)` exists iff
/// `start < end <= len`.
#[derive(Debug, Clone)]
pub struct Chart {
  len: usize,
  // cells[start][end - start - 1]
  cells: Vec<Vec<Cell>>,
}

impl Chart {
  pub fn new(len: usize) -> Self {
    let cells = (0..len)
      .map(|start| (start + 1..=len).map(|end| Cell::new(start, end)).collect::<Vec<_>>())
      .collect();
    Self { len, cells }
  }

  /// Number of tokens covered by the chart
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn cell(&self, start: usize, end: usize) -> &Cell {
    assert!(start < end && end <= self.len, "no cell {}..{}", start, end);
    &self.cells[start][end - start - 1]
  }

  fn cell_mut(&mut self, start: usize, end: usize) -> &mut Cell {
    assert!(start < end && end <= self.len, "no cell {}..{}", start, end);
    &mut self.cells[start][end - start - 1]
  }

  /// The cell spanning the whole input, if there is any input
  pub fn top(&self) -> Option<&Cell> {
    if self.is_empty() {
      None
    } else {
      Some(self.cell(0, self.len))
    }
  }

  pub fn cells(&self) -> impl Iterator<Item = &Cell> {
    self.cells.iter().flatten()
  }
}

impl fmt::Display for Chart {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for cell in self.cells() {
      let (start, end) = cell.span();
      writeln!(f, "Cell {}..{}:", start, end)?;
      for label in cell.labels() {
        writeln!(f, "  {}", label)?;
      }
    }
    Ok(())
  }
}

pub fn parse_chart(index: &GrammarIndex, input: &[&str]) -> Chart {
  let _span = debug_span!("parse_chart", tokens = input.len()).entered();
  let mut chart = Chart::new(input.len());

  seed(index, &mut chart, input);

  // shorter spans first: both halves of a split must be fully closed before
  // anything is built on top of them
  let n = chart.len();
  for len in 2..=n {
    for start in 0..=(n - len) {
      let end = start + len;
      for mid in (start + 1)..end {
        maybe_build(index, &mut chart, start, mid, end);
      }
    }
  }

  debug!(
    top_labels = chart.top().map(Cell::len).unwrap_or(0),
    "chart filled"
  );
  chart
}

/// Puts each token in its span-1 cell, which pulls in everything reachable
/// from it through unary rules
fn seed(index: &GrammarIndex, chart: &mut Chart, input: &[&str]) {
  for (k, token) in input.iter().enumerate() {
    trace!(span = ?(k, k + 1), token, "seed");
    chart.cell_mut(k, k + 1).add_label(index, Label::word(token));
  }
}

/// Combines every label of `start..mid` with every label of `mid..end` through
/// the binary rules, adding the results to `start..end`
fn maybe_build(index: &GrammarIndex, chart: &mut Chart, start: usize, mid: usize, end: usize) {
  let mut built = Vec::new();

  for left in chart.cell(start, mid).labels() {
    for right in chart.cell(mid, end).labels() {
      for parent in index.binary_parents(&left.symbol, &right.symbol) {
        trace!(start, mid, end, lhs = %parent, left = %left.symbol, right = %right.symbol, "binary");
        let derivation = Derivation::binary(
          parent.clone(),
          left.derivation.clone(),
          right.derivation.clone(),
        );
        built.push(Label::new(parent.clone(), derivation));
      }
    }
  }

  // the source cells are borrowed above, so the target is only touched once they're done
  let cell = chart.cell_mut(start, end);
  for label in built {
    cell.add_label(index, label);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grammar::Grammar;

  fn index(src: &str) -> GrammarIndex {
    let g: Grammar = src.parse().unwrap();
    GrammarIndex::new(&g).unwrap()
  }

  fn nt(name: &str) -> Production {
    Production::nonterminal(name)
  }

  fn count(cell: &Cell, name: &str) -> usize {
    cell.labels_for(&Symbol::new(name)).count()
  }

  #[test]
  fn test_triangle_shape() {
    let chart = Chart::new(3);
    let spans = chart.cells().map(Cell::span).collect::<Vec<_>>();
    assert_eq!(spans, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    assert_eq!(chart.top().map(Cell::span), Some((0, 3)));
    assert!(Chart::new(0).top().is_none());
  }

  #[test]
  #[should_panic]
  fn test_no_cells_below_diagonal() {
    Chart::new(3).cell(2, 2);
  }

  #[test]
  fn test_unary_chain_closure() {
    let index = index("A -> B\nB -> C\nC -> D\nD -> 'x'");
    let chart = parse_chart(&index, &["x"]);
    let cell = chart.cell(0, 1);

    let symbols = cell.labels().iter().map(|l| l.symbol.clone()).collect::<Vec<_>>();
    assert_eq!(
      symbols,
      vec![Production::terminal("x"), nt("D"), nt("C"), nt("B"), nt("A")]
    );
    assert_eq!(
      cell.labels()[4].derivation.to_string(),
      "(A (B (C (D x))))"
    );
  }

  #[test]
  fn test_unary_cycle_terminates() {
    let index = index("A -> B\nB -> A\nA -> 'x'");
    let chart = parse_chart(&index, &["x"]);
    let cell = chart.cell(0, 1);

    assert_eq!(count(cell, "A"), 1);
    assert_eq!(count(cell, "B"), 1);
    assert_eq!(cell.len(), 3);
  }

  #[test]
  fn test_self_loop_terminates() {
    let index = index("A -> A\nA -> 'x'");
    let chart = parse_chart(&index, &["x"]);
    assert_eq!(count(chart.cell(0, 1), "A"), 1);
  }

  #[test]
  fn test_shared_rhs_gives_independent_labels() {
    let index = index("N -> 'fish'\nVi -> 'fish'\nNP -> N\nVP -> Vi");
    let chart = parse_chart(&index, &["fish"]);
    let cell = chart.cell(0, 1);

    let traces = cell
      .labels()
      .iter()
      .map(|l| l.derivation.to_string())
      .collect::<Vec<_>>();
    assert_eq!(traces, vec!["fish", "(N fish)", "(NP (N fish))", "(Vi fish)", "(VP (Vi fish))"]);
  }

  #[test]
  fn test_distinct_derivations_kept() {
    // Y reaches 'a' directly and through X
    let index = index("X -> 'a'\nY -> X\nY -> 'a'");
    let chart = parse_chart(&index, &["a"]);
    let cell = chart.cell(0, 1);
    assert_eq!(count(cell, "Y"), 2);
    assert_eq!(count(cell, "X"), 1);
  }

  #[test]
  fn test_add_label_is_idempotent() {
    let index = index("A -> 'x'\nB -> A");
    let mut cell = Cell::new(0, 1);
    cell.add_label(&index, Label::word("x"));
    let before = cell.len();
    assert_eq!(before, 3);

    cell.add_label(&index, Label::word("x"));
    let a = Label::new(Symbol::new("A"), Derivation::unary(Symbol::new("A"), Derivation::word("x")));
    assert!(cell.has(&a));
    cell.add_label(&index, a);
    assert_eq!(cell.len(), before);
  }

  #[test]
  fn test_binary_completeness() {
    let index = index("S -> S S\nS -> 'x'");
    let chart = parse_chart(&index, &["x", "x", "x"]);

    for start in 0..3 {
      for end in (start + 1)..=3 {
        assert!(chart.cell(start, end).has_symbol(&nt("S")), "S missing at {}..{}", start, end);
      }
    }

    // [x][xx] and [xx][x]
    assert_eq!(count(chart.cell(0, 3), "S"), 2);
    assert_eq!(count(chart.cell(0, 2), "S"), 1);
  }

  #[test]
  fn test_mixed_binary_rules() {
    let index = index("S -> NP '.'\nNP -> 'John'");
    let chart = parse_chart(&index, &["John", "."]);
    let top = chart.top().unwrap();
    assert_eq!(
      top.labels_for(&Symbol::new("S")).map(|l| l.derivation.to_string()).collect::<Vec<_>>(),
      vec!["(S (NP John) .)"]
    );
  }

  #[test]
  fn test_binary_result_is_closed() {
    let index = index("S -> Sdecl\nSdecl -> NP VP\nNP -> 'he'\nVP -> 'swims'");
    let chart = parse_chart(&index, &["he", "swims"]);
    let top = chart.top().unwrap();
    assert_eq!(
      top.labels().iter().map(|l| l.derivation.to_string()).collect::<Vec<_>>(),
      vec!["(Sdecl (NP he) (VP swims))", "(S (Sdecl (NP he) (VP swims)))"]
    );
  }

  #[test]
  fn test_unknown_word_seeds_only_itself() {
    let index = index("S -> NP VP\nNP -> 'John'\nVP -> 'swims'");
    let chart = parse_chart(&index, &["John", "swim"]);
    assert_eq!(chart.cell(1, 2).len(), 1);
    assert!(chart.top().unwrap().is_empty());
  }

  #[test]
  fn test_display() {
    let index = index("A -> 'x'");
    let chart = parse_chart(&index, &["x"]);
    assert_eq!(chart.to_string(), "Cell 0..1:\n  'x': x\n  A: (A x)\n");
  }
}
