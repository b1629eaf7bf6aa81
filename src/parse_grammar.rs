//! Simple recursive-descent parsing of line-oriented grammar files:
//!
//! ```text
//! # comment
//! NP -> Det Nom | Nom | NP PP
//! Det -> NP "'s" | 'a' | 'the'
//! ```
use regex::Regex;

use crate::error::GrammarError;
use crate::rules::{Production, Rule, Symbol};

type Infallible<'a, T> = (T, &'a str);
type ParseResult<'a, T> = Result<(T, &'a str), String>;

/// helper macro for initializing a regex with lazy_static!
macro_rules! regex_static {
  ($name:ident, $pattern:expr) => {
    lazy_static! {
      static ref $name: Regex = Regex::new($pattern).unwrap();
    }
  };
}

/// Try to consume a regex, returning None if it doesn't match
fn optional_re<'a>(re: &'static Regex, s: &'a str) -> Infallible<'a, Option<regex::Captures<'a>>> {
  if let Some(caps) = re.captures(s) {
    let m = caps.get(0).unwrap();
    if m.start() > 0 {
      return (None, s);
    }
    let (_, rest) = s.split_at(m.end());
    (Some(caps), rest)
  } else {
    (None, s)
  }
}

/// Try to consume a regex, failing if it doesn't match
fn needed_re<'a>(re: &'static Regex, s: &'a str) -> ParseResult<'a, regex::Captures<'a>> {
  if let (Some(c), rest) = optional_re(re, s) {
    Ok((c, rest))
  } else {
    Err(format!("couldn't match {} at `{}`", re, s))
  }
}

/// Try to consume a char, returning None if it doesn't match
fn optional_char(c: char, s: &str) -> Infallible<Option<char>> {
  match s.strip_prefix(c) {
    Some(rest) => (Some(c), rest),
    None => (None, s),
  }
}

fn skip_whitespace(s: &str) -> &str {
  s.trim_start()
}

/// A line is finished at its end or at the start of a # comment
fn at_line_end(s: &str) -> bool {
  s.is_empty() || s.starts_with('#')
}

/// Tries to parse a name made of letters, numbers, - and _
fn parse_name(s: &str) -> ParseResult<&str> {
  regex_static!(NAME, r"[a-zA-Z0-9\-_]+");
  let (caps, rest) = needed_re(&NAME, s).map_err(|e| format!("name: {}", e))?;
  Ok((caps.get(0).unwrap().as_str(), rest))
}

/// Parses a terminal in single or double quotes. The quotes themselves are dropped.
fn parse_quoted(s: &str) -> ParseResult<&str> {
  regex_static!(QUOTED, r#"'([^']*)'|"([^"]*)""#);
  let (caps, rest) = needed_re(&QUOTED, s).map_err(|_| format!("unterminated quote at `{}`", s))?;
  let inner = caps.get(1).or_else(|| caps.get(2)).unwrap().as_str();
  if inner.is_empty() {
    Err(format!("empty terminal at `{}`", s))
  } else {
    Ok((inner, rest))
  }
}

fn parse_production(s: &str) -> ParseResult<Production> {
  if s.starts_with('\'') || s.starts_with('"') {
    let (word, s) = parse_quoted(s).map_err(|e| format!("terminal: {}", e))?;
    Ok((Production::terminal(word), s))
  } else {
    let (name, s) = parse_name(s).map_err(|e| format!("symbol: {}", e))?;
    Ok((Production::nonterminal(name), s))
  }
}

/// Symbol, arrow, alternatives separated by `|`, terminated by end of line.
/// Returns one rule per alternative.
fn parse_line(s: &str) -> Result<Vec<Rule>, String> {
  #![allow(clippy::trivial_regex)]
  regex_static!(ARROW, "->");

  let s = skip_whitespace(s);
  if at_line_end(s) {
    return Ok(Vec::new());
  }

  let (name, s) = parse_name(s).map_err(|e| format!("rule symbol: {}", e))?;
  let symbol = Symbol::new(name);
  let s = skip_whitespace(s);
  let (_, s) = needed_re(&ARROW, s).map_err(|e| format!("rule arrow: {}", e))?;

  let mut rules = Vec::new();
  let mut productions = Vec::new();
  let mut rem = s;
  loop {
    rem = skip_whitespace(rem);
    if at_line_end(rem) {
      rules.push(Rule::new(symbol, productions));
      return Ok(rules);
    }
    if let (Some(_), s) = optional_char('|', rem) {
      rules.push(Rule::new(symbol.clone(), std::mem::take(&mut productions)));
      rem = s;
      continue;
    }
    let (prod, s) = parse_production(rem).map_err(|e| format!("rule production: {}", e))?;
    productions.push(prod);
    rem = s;
  }
}

/// Parses every line of `s` into rules, in order. Arity is not checked here.
pub fn parse_rules(s: &str) -> Result<Vec<Rule>, GrammarError> {
  let mut rules = Vec::new();
  for (idx, line) in s.lines().enumerate() {
    let mut line_rules = parse_line(line).map_err(|message| GrammarError::Syntax {
      line: idx + 1,
      message,
    })?;
    rules.append(&mut line_rules);
  }
  Ok(rules)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_alternatives_become_rules() {
    let rules = parse_rules("NP -> Det Nom | Nom | NP PP").unwrap();
    assert_eq!(rules.len(), 3);
    assert!(rules.iter().all(|r| r.symbol_str() == "NP"));
    assert_eq!(
      rules[0].productions,
      vec![Production::nonterminal("Det"), Production::nonterminal("Nom")]
    );
    assert_eq!(rules[1].productions, vec![Production::nonterminal("Nom")]);
  }

  #[test]
  fn test_quoted_terminals() {
    let rules = parse_rules(r#"Det -> NP "'s" | 'a' # articles"#).unwrap();
    assert_eq!(
      rules[0].productions,
      vec![Production::nonterminal("NP"), Production::terminal("'s")]
    );
    assert_eq!(rules[1].productions, vec![Production::terminal("a")]);
  }

  #[test]
  fn test_comments_and_blank_lines() {
    let rules = parse_rules("# heading\n\n  S -> A\n   # indented comment\nA -> 'x'\n").unwrap();
    assert_eq!(rules.len(), 2);
  }

  #[test]
  fn test_empty_alternative_is_loaded() {
    let rules = parse_rules("A -> B |").unwrap();
    assert_eq!(rules.len(), 2);
    assert!(rules[1].is_empty());
  }

  #[test]
  fn test_syntax_errors_report_line() {
    match parse_rules("S -> A\nA = 'x'") {
      Err(GrammarError::Syntax { line, message }) => {
        assert_eq!(line, 2);
        assert!(message.contains("rule arrow"), "{}", message);
      }
      other => panic!("expected syntax error, got {:?}", other),
    }

    assert!(matches!(
      parse_rules("A -> 'x"),
      Err(GrammarError::Syntax { line: 1, .. })
    ));
  }
}
