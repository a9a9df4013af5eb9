/// Closed enumeration of token kinds the scanner ever produces and the
/// parser ever matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  // Single-character tokens.
  LeftParen,
  RightParen,
  LeftBrace,
  RightBrace,
  Comma,
  Semicolon,
  Question,
  Colon,
  Minus,
  Plus,
  Slash,
  Star,

  // One or two character tokens.
  Bang,
  BangEqual,
  Equal,
  EqualEqual,
  Greater,
  GreaterEqual,
  Less,
  LessEqual,

  // Literals.
  Identifier,
  String,
  Number,

  // Keywords.
  And,
  Class,
  Else,
  False,
  For,
  Fun,
  If,
  Nil,
  Or,
  Print,
  Return,
  Super,
  This,
  True,
  Var,
  While,

  Eof,
}

/// The literal value a `NUMBER` or `STRING` token carries, already
/// computed by the scanner. Every other token kind carries `Literal::None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
  None,
  Number(f64),
  Str(String),
}
