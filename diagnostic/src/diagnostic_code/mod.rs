/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Error,
  Warning,
  Note,
  Help,
}

/// Unique identifier for each kind of diagnostic this dialect can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
  // Scanning
  UnterminatedString,
  InvalidCharacter,
  InvalidNumber,

  // Parsing
  UnexpectedToken,
  ExpectedExpression,
  MissingClosingParen,
  MissingClosingBrace,
  MissingSemicolon,
  MissingColon,
  InvalidAssignmentTarget,
  ExpectedIdentifier,
  ExpectedLeftParen,

  // Evaluation
  UndefinedVariable,
  TypeMismatch,

  // Driver
  FileNotFound,
  InvalidArguments,
}

impl DiagnosticCode {
  pub fn code(&self) -> String {
    match self {
      Self::UnterminatedString => "E0001".to_string(),
      Self::InvalidCharacter => "E0002".to_string(),
      Self::InvalidNumber => "E0003".to_string(),
      Self::UnexpectedToken => "E0100".to_string(),
      Self::ExpectedExpression => "E0101".to_string(),
      Self::MissingClosingParen => "E0102".to_string(),
      Self::MissingClosingBrace => "E0103".to_string(),
      Self::MissingSemicolon => "E0104".to_string(),
      Self::MissingColon => "E0105".to_string(),
      Self::InvalidAssignmentTarget => "E0106".to_string(),
      Self::ExpectedIdentifier => "E0107".to_string(),
      Self::ExpectedLeftParen => "E0108".to_string(),
      Self::UndefinedVariable => "E0200".to_string(),
      Self::TypeMismatch => "E0201".to_string(),
      Self::FileNotFound => "E0400".to_string(),
      Self::InvalidArguments => "E0401".to_string(),
    }
  }

  pub fn severity(&self) -> Severity {
    Severity::Error
  }
}
