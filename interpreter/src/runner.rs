use std::{
  fs,
  io::{self, Write},
};

use diagnostic::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode, DiagnosticEngine};
use parser::Parser;
use scanner::Scanner;

use crate::interpreter::Interpreter;

/// Exit code convention: 0 success, 65 parse error, 66 file not found,
/// 70 runtime error.
pub const EXIT_OK: i32 = 0;
pub const EXIT_PARSE_ERROR: i32 = 65;
pub const EXIT_FILE_NOT_FOUND: i32 = 66;
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// The external driver spec.md keeps out of the core: reads a script or
/// REPL line, pipes it through Scanner -> Parser -> Interpreter, and
/// turns the engine's error state into a process exit code.
pub struct Runner {
  interpreter: Interpreter,
}

impl Runner {
  pub fn new() -> Self {
    Self {
      interpreter: Interpreter::new(),
    }
  }

  pub fn run_file(&mut self, path: &str) -> i32 {
    let source = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(err) => {
        let mut engine = DiagnosticEngine::new();
        let diagnostic = Diagnostic::new(DiagnosticCode::FileNotFound, format!("could not read file: {path}"))
          .with_help(format!("reason: {err}"));
        engine.emit(diagnostic);
        engine.print_all("");
        return EXIT_FILE_NOT_FOUND;
      },
    };

    let mut engine = DiagnosticEngine::new();
    self.run(&source, &mut engine)
  }

  /// One pass through the pipeline, reused by both `run_file` and the
  /// REPL. `self.interpreter`'s environment persists across calls.
  fn run(&mut self, source: &str, engine: &mut DiagnosticEngine) -> i32 {
    let tokens = Scanner::new(source.to_string()).scan(engine);

    if engine.has_errors() {
      engine.print_all(source);
      return EXIT_PARSE_ERROR;
    }

    let statements = Parser::new(tokens).parse(engine);

    if engine.has_errors() {
      engine.print_all(source);
      return EXIT_PARSE_ERROR;
    }

    self.interpreter.interpret(&statements, engine);

    if engine.has_errors() {
      engine.print_all(source);
      return EXIT_RUNTIME_ERROR;
    }

    EXIT_OK
  }

  /// Reads one line at a time, reusing the same `Interpreter` so that
  /// top-level `var` bindings survive across lines, like the book's REPL.
  pub fn run_repl(&mut self) {
    println!("duck-script REPL. Ctrl-D or `exit` to quit.\n");

    loop {
      print!("> ");
      io::stdout().flush().ok();

      let mut line = String::new();
      let bytes_read = io::stdin().read_line(&mut line).unwrap_or(0);

      if bytes_read == 0 {
        println!("\nbye");
        break;
      }

      let input = line.trim();
      if input == "exit" {
        break;
      }
      if input.is_empty() {
        continue;
      }

      let mut engine = DiagnosticEngine::new();
      self.run(input, &mut engine);
    }
  }
}

impl Default for Runner {
  fn default() -> Self {
    Self::new()
  }
}
