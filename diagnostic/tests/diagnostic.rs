use diagnostic::{
  diagnostic::{Diagnostic, Label, Span},
  diagnostic_code::DiagnosticCode,
  DiagnosticEngine,
};

#[test]
fn engine_tracks_error_count() {
  let mut engine = DiagnosticEngine::new();
  assert!(!engine.has_errors());

  engine.emit(Diagnostic::new(
    DiagnosticCode::UndefinedVariable,
    "Undefined variable 'x'.".to_string(),
  ));

  assert!(engine.has_errors());
  assert_eq!(engine.error_count(), 1);
}

#[test]
fn clear_resets_collected_diagnostics() {
  let mut engine = DiagnosticEngine::new();
  engine.emit(Diagnostic::new(
    DiagnosticCode::ExpectedExpression,
    "Expect expression.".to_string(),
  ));
  assert!(engine.has_errors());

  engine.clear();
  assert!(!engine.has_errors());
  assert_eq!(engine.get_diagnostics().len(), 0);
}

#[test]
fn plain_format_includes_source_line_and_underline() {
  let source = "var b = \"unterminated";
  let mut engine = DiagnosticEngine::new();

  let error = Diagnostic::new(
    DiagnosticCode::UnterminatedString,
    "Unterminated string.".to_string(),
  )
  .with_label(Label::primary(
    Span {
      file: "input".to_string(),
      line: 1,
      column: 9,
      length: 13,
    },
    Some("string starts here".to_string()),
  ))
  .with_help("close the string with a matching quote".to_string());

  engine.emit(error);
  let rendered = engine.format_all_plain(source);

  assert!(rendered.contains("Unterminated string."));
  assert!(rendered.contains(source));
  assert!(rendered.contains("help: close the string"));
}
