use colored::*;
use diagnostic::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode, DiagnosticEngine};
use interpreter::runner::Runner;

fn main() {
  let args: Vec<String> = std::env::args().collect();
  let mut runner = Runner::new();

  let code = match args.len() {
    1 => {
      println!("{}", "Running interactive mode".cyan().bold());
      runner.run_repl();
      0
    },
    2 => {
      println!("{}", format!("Running file: {}", args[1]).cyan().bold());
      runner.run_file(&args[1])
    },
    _ => {
      let mut engine = DiagnosticEngine::new();
      let diagnostic = Diagnostic::new(DiagnosticCode::InvalidArguments, "invalid number of arguments".to_string())
        .with_help("Usage: duck-script [script]".to_string());
      engine.emit(diagnostic);
      engine.print_all("");
      64
    },
  };

  std::process::exit(code);
}
