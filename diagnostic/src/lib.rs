pub mod diagnostic;
pub mod diagnostic_code;
pub mod formatter;

use diagnostic::Diagnostic;
use formatter::DiagnosticFormatter;

/// Collector for every diagnostic raised while scanning, parsing, or
/// evaluating a program. This is the "diagnostic sink" spec.md §1/§6
/// describes: the parser and evaluator only ever emit into it, never
/// panic or abort the process directly.
#[derive(Debug, Default)]
pub struct DiagnosticEngine {
  diagnostics: Vec<Diagnostic>,
  error_count: usize,
}

impl DiagnosticEngine {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn emit(&mut self, diagnostic: Diagnostic) {
    self.error_count += 1;
    self.diagnostics.push(diagnostic);
  }

  pub fn has_errors(&self) -> bool {
    self.error_count > 0
  }

  pub fn error_count(&self) -> usize {
    self.error_count
  }

  /// Drop every collected diagnostic, e.g. between REPL lines.
  pub fn clear(&mut self) {
    self.diagnostics.clear();
    self.error_count = 0;
  }

  /// Print all diagnostics with colors to stdout.
  pub fn print_all(&self, source_code: &str) {
    for diagnostic in &self.diagnostics {
      let formatter = DiagnosticFormatter::new(diagnostic, source_code);
      print!("{}", formatter.format());
    }
  }

  /// Get all diagnostics as plain text, e.g. for file logging.
  pub fn format_all_plain(&self, source_code: &str) -> String {
    let mut output = String::new();

    for diagnostic in &self.diagnostics {
      let formatter = DiagnosticFormatter::new(diagnostic, source_code);
      output.push_str(&formatter.format_plain());
      output.push('\n');
    }

    output
  }

  pub fn get_diagnostics(&self) -> &[Diagnostic] {
    &self.diagnostics
  }
}
