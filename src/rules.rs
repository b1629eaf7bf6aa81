use std::fmt;

/// A non-terminal grammar category, such as `NP` or `VPdt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
  pub name: String,
}

impl Symbol {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

impl fmt::Display for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name)
  }
}

/// One item on a rule's right-hand side. Terminals match input tokens
/// literally, so `Terminal("a")` and `Nonterminal(a)` never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Production {
  Terminal(String),
  Nonterminal(Symbol),
}

impl Production {
  pub fn terminal(s: impl Into<String>) -> Self {
    Self::Terminal(s.into())
  }

  pub fn nonterminal(name: impl Into<String>) -> Self {
    Self::Nonterminal(Symbol::new(name))
  }

  pub fn as_nonterminal(&self) -> Option<&Symbol> {
    match self {
      Self::Nonterminal(s) => Some(s),
      Self::Terminal(_) => None,
    }
  }
}

impl From<Symbol> for Production {
  fn from(symbol: Symbol) -> Self {
    Self::Nonterminal(symbol)
  }
}

/// Terminals are quoted the way the grammar loader reads them back: single
/// quotes unless the word itself contains one (`"'s"`).
impl fmt::Display for Production {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Terminal(s) if s.contains('\'') => write!(f, "\"{}\"", s),
      Self::Terminal(s) => write!(f, "'{}'", s),
      Self::Nonterminal(s) => write!(f, "{}", s),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
  pub symbol: Symbol,
  pub productions: Vec<Production>,
}

impl Rule {
  pub fn new(symbol: Symbol, productions: Vec<Production>) -> Self {
    Self {
      symbol,
      productions,
    }
  }

  pub fn len(&self) -> usize {
    self.productions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn symbol_str(&self) -> &str {
    &self.symbol.name
  }
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ->", self.symbol)?;
    for p in self.productions.iter() {
      write!(f, " {}", p)?;
    }
    Ok(())
  }
}

#[test]
fn test_terminal_and_nonterminal_are_distinct() {
  assert_ne!(Production::terminal("a"), Production::nonterminal("a"));
  assert_eq!(Production::nonterminal("NP"), Symbol::new("NP").into());
}

#[test]
fn test_rule_display() {
  let rule = Rule::new(
    Symbol::new("S"),
    vec![Production::nonterminal("Sdecl"), Production::terminal(".")],
  );
  assert_eq!(rule.to_string(), "S -> Sdecl '.'");
  assert_eq!(rule.len(), 2);
}

#[test]
fn test_clitic_terminal_display() {
  let rule = Rule::new(
    Symbol::new("Det"),
    vec![Production::nonterminal("NP"), Production::terminal("'s")],
  );
  assert_eq!(rule.to_string(), r#"Det -> NP "'s""#);
  assert_eq!(Production::terminal("'s").to_string(), r#""'s""#);
}
