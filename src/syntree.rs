use std::fmt;
use std::rc::Rc;

use crate::rules::{Production, Symbol};

/// How a chart label was derived. Built bottom-up as rules fire: unary closure
/// wraps a derivation in a one-child node, binary building joins two.
/// Children are shared with the labels they came from.
#[derive(Debug, PartialEq, Eq, Hash)]
pub enum Derivation {
  Word(String),
  Node(Symbol, Vec<Rc<Derivation>>),
}

impl Derivation {
  pub fn word(token: impl Into<String>) -> Rc<Self> {
    Rc::new(Self::Word(token.into()))
  }

  pub fn unary(parent: Symbol, child: Rc<Derivation>) -> Rc<Self> {
    Rc::new(Self::Node(parent, vec![child]))
  }

  pub fn binary(parent: Symbol, left: Rc<Derivation>, right: Rc<Derivation>) -> Rc<Self> {
    Rc::new(Self::Node(parent, vec![left, right]))
  }

  /// The symbol at the root: the token itself for a word
  pub fn symbol(&self) -> Production {
    match self {
      Self::Word(w) => Production::Terminal(w.clone()),
      Self::Node(s, _) => Production::Nonterminal(s.clone()),
    }
  }

  /// Number of tokens covered
  pub fn token_count(&self) -> usize {
    match self {
      Self::Word(_) => 1,
      Self::Node(_, children) => children.iter().map(|c| c.token_count()).sum(),
    }
  }

  /// Checks whether `symbol` heads any node of the unary chain at the top of this
  /// derivation. Every node on that chain covers the same span, so a symbol
  /// showing up twice means a unary cycle was taken.
  pub fn unary_chain_contains(&self, symbol: &Symbol) -> bool {
    let mut node = self;
    loop {
      match node {
        Self::Node(s, _) if s == symbol => return true,
        Self::Node(_, children) if children.len() == 1 => node = &*children[0],
        _ => return false,
      }
    }
  }

  /// Converts into an owned tree whose leaves start at token `start`
  pub fn to_tree(&self, start: usize) -> SynTree<Symbol, String> {
    let mut pos = start;
    self.build_tree(&mut pos)
  }

  fn build_tree(&self, pos: &mut usize) -> SynTree<Symbol, String> {
    match self {
      Self::Word(w) => {
        *pos += 1;
        SynTree::Leaf(Word {
          value: w.clone(),
          span: (*pos - 1, *pos),
        })
      }
      Self::Node(symbol, children) => {
        let start = *pos;
        let children = children
          .iter()
          .map(|c| c.build_tree(pos))
          .collect::<Vec<_>>();
        SynTree::Branch(
          Constituent {
            value: symbol.clone(),
            span: (start, *pos),
          },
          children,
        )
      }
    }
  }
}

impl fmt::Display for Derivation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Word(w) => write!(f, "{}", w),
      Self::Node(symbol, children) => {
        write!(f, "({}", symbol)?;
        for c in children.iter() {
          write!(f, " {}", c)?;
        }
        write!(f, ")")
      }
    }
  }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Constituent<T> {
  pub value: T,
  pub span: (usize, usize),
}

impl<T> fmt::Display for Constituent<T>
where
  T: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.value)
  }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Word<U> {
  pub value: U,
  pub span: (usize, usize),
}

impl<U> fmt::Display for Word<U>
where
  U: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.value)
  }
}

#[derive(Debug, PartialEq, Clone)]
pub enum SynTree<T, U> {
  Branch(Constituent<T>, Vec<SynTree<T, U>>),
  Leaf(Word<U>),
}

impl<T, U> SynTree<T, U> {
  pub fn is_leaf(&self) -> bool {
    matches!(self, Self::Leaf(_))
  }

  pub fn get_branch(&self) -> Option<(&Constituent<T>, &Vec<SynTree<T, U>>)> {
    match self {
      Self::Branch(c, cs) => Some((c, cs)),
      _ => None,
    }
  }

  pub fn span(&self) -> (usize, usize) {
    match self {
      Self::Branch(c, _) => c.span,
      Self::Leaf(w) => w.span,
    }
  }

  /// The words at the leaves, left to right
  pub fn leaves(&self) -> Vec<&U> {
    match self {
      Self::Leaf(w) => vec![&w.value],
      Self::Branch(_, children) => children.iter().flat_map(|c| c.leaves()).collect(),
    }
  }

  /// Depth-first search for a branch labelled with `value`
  pub fn find_branch(&self, value: &T) -> Option<&Self>
  where
    T: PartialEq,
  {
    match self {
      Self::Leaf(_) => None,
      Self::Branch(c, _) if &c.value == value => Some(self),
      Self::Branch(_, children) => children.iter().find_map(|c| c.find_branch(value)),
    }
  }

  /// Penn-style bracketing without spans: `(S (NP (PropN John)) ...)`
  pub fn bracketed(&self) -> Bracketed<'_, T, U> {
    Bracketed(self)
  }
}

impl<T, U> fmt::Display for SynTree<T, U>
where
  T: fmt::Display,
  U: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Leaf(t) => write!(f, "{}", t),
      Self::Branch(t, ts) => {
        write!(f, "({}", t)?;
        if ts.len() == 1 {
          write!(f, " ({}))", ts[0])
        } else {
          for t in ts.iter() {
            // TODO: is there a nice way to do this that doesn't allocate a String?
            let fmt = format!("{}", t);
            for line in fmt.lines() {
              write!(f, "\n  {}", line)?;
            }
          }
          write!(f, ")")
        }
      }
    }
  }
}

pub struct Bracketed<'a, T, U>(&'a SynTree<T, U>);

impl<T, U> fmt::Display for Bracketed<'_, T, U>
where
  T: fmt::Display,
  U: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.0 {
      SynTree::Leaf(w) => write!(f, "{}", w.value),
      SynTree::Branch(c, children) => {
        write!(f, "({}", c.value)?;
        for child in children.iter() {
          write!(f, " {}", child.bracketed())?;
        }
        write!(f, ")")
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn np_john() -> Rc<Derivation> {
    Derivation::unary(
      Symbol::new("NP"),
      Derivation::unary(Symbol::new("PropN"), Derivation::word("John")),
    )
  }

  #[test]
  fn test_to_tree_spans() {
    let vp = Derivation::unary(
      Symbol::new("VP"),
      Derivation::unary(Symbol::new("Vi"), Derivation::word("swims")),
    );
    let s = Derivation::binary(Symbol::new("S"), np_john(), vp);
    assert_eq!(s.token_count(), 2);
    assert_eq!(s.symbol(), Production::nonterminal("S"));

    let tree = s.to_tree(0);
    assert_eq!(tree.span(), (0, 2));
    assert_eq!(tree.leaves(), vec!["John", "swims"]);
    assert_eq!(
      tree.find_branch(&Symbol::new("Vi")).map(|t| t.span()),
      Some((1, 2))
    );
    assert_eq!(
      tree.bracketed().to_string(),
      "(S (NP (PropN John)) (VP (Vi swims)))"
    );
    assert_eq!(tree.bracketed().to_string(), s.to_string());
  }

  #[test]
  fn test_to_tree_offset() {
    let tree = np_john().to_tree(3);
    assert_eq!(tree.span(), (3, 4));
    let (cons, children) = tree.get_branch().unwrap();
    assert_eq!(cons.value, Symbol::new("NP"));
    assert_eq!(children.len(), 1);
    assert!(!children[0].is_leaf());
  }

  #[test]
  fn test_unary_chain_contains() {
    let np = np_john();
    assert!(np.unary_chain_contains(&Symbol::new("NP")));
    assert!(np.unary_chain_contains(&Symbol::new("PropN")));
    assert!(!np.unary_chain_contains(&Symbol::new("S")));

    // binary nodes end the chain
    let s = Derivation::binary(Symbol::new("S"), np_john(), Derivation::word("."));
    assert!(!s.unary_chain_contains(&Symbol::new("NP")));
    assert!(!Derivation::word("John").unary_chain_contains(&Symbol::new("John")));
  }

  #[test]
  fn test_structural_equality() {
    assert_eq!(np_john(), np_john());
    assert_ne!(
      np_john(),
      Derivation::unary(Symbol::new("NP"), Derivation::word("John"))
    );
  }

  #[test]
  fn test_display_with_spans() {
    let tree = np_john().to_tree(0);
    assert_eq!(tree.to_string(), "(0..1: NP ((0..1: PropN (0..1: John))))");
  }
}
