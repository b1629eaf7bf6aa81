use std::error::Error;
use std::io;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use ckytree::{tokenize, Grammar, Parser, Recognition};

/// Boxed static error type
type Err = Box<dyn Error + 'static>;

/// Parse sentences against a context-free grammar with a generalized CKY chart.
#[derive(Debug, ClapParser)]
#[command(name = "ckytree", version)]
struct Args {
  /// Grammar file, one `LHS -> alt | alt` rule group per line
  grammar: PathBuf,

  /// Print the parse chart (defaults to not printing)
  #[arg(short, long)]
  chart: bool,

  /// Print every analysis instead of the first one
  #[arg(short, long)]
  all: bool,

  /// Parse this sentence and exit instead of reading from stdin
  #[arg(short, long)]
  sentence: Option<String>,
}

fn parse(parser: &Parser, sentence: &str, args: &Args) {
  let tokens = tokenize(sentence);
  let analysis = parser.analyze(&tokens);

  if args.chart {
    println!("chart:\n{}", analysis.chart());
  }

  let trees = if args.all {
    analysis.trees()
  } else {
    analysis.first_tree().into_iter().collect()
  };

  if trees.is_empty() {
    println!("No parse\n");
    return;
  }

  let Recognition {
    label_count,
    analyses,
    ..
  } = analysis.recognition();
  println!(
    "Parsed {} analys{} ({} label{} at the top)",
    analyses,
    if analyses == 1 { "is" } else { "es" },
    label_count,
    if label_count == 1 { "" } else { "s" }
  );
  for t in trees {
    println!("{}\n", t.bracketed());
  }
}

fn main() -> Result<(), Err> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  let args = Args::parse();

  let g = Grammar::read_from_file(&args.grammar)?;
  tracing::info!(path = %args.grammar.display(), rules = g.rules.len(), "loaded grammar");
  let parser = Parser::new(g)?;

  if let Some(sentence) = args.sentence.as_deref() {
    parse(&parser, sentence, &args);
    return Ok(());
  }

  let mut input = String::new();
  loop {
    print!("> ");
    io::stdout().flush()?;

    match io::stdin().read_line(&mut input) {
      Ok(_) => {
        if input.is_empty() {
          // ctrl+d
          return Ok(());
        }
        parse(&parser, input.trim(), &args);
        input.clear();
      }
      Err(error) => return Err(error.into()),
    }
  }
}
