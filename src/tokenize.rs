use regex::Regex;

lazy_static! {
  // words and the first half of a clitic, the rest of a clitic, punctuation
  static ref TOKEN: Regex = Regex::new(r"[-\w]+|'\w+|[^-\w\s]+").unwrap();
}

/// Splits `text` into the tokens a grammar's terminals are matched against.
/// Punctuation becomes its own token and contractions are split in two:
/// `"I'm leaving."` gives `["I", "'m", "leaving", "."]`. Case is kept.
pub fn tokenize(text: &str) -> Vec<&str> {
  TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

#[test]
fn test_contractions_and_punctuation() {
  assert_eq!(tokenize("I'm leaving."), vec!["I", "'m", "leaving", "."]);
  assert_eq!(tokenize("John's  book?!"), vec!["John", "'s", "book", "?!"]);
}

#[test]
fn test_unicode_words() {
  assert_eq!(tokenize("são jaques"), vec!["são", "jaques"]);
  assert_eq!(tokenize("well-known"), vec!["well-known"]);
  assert!(tokenize("   ").is_empty());
}
