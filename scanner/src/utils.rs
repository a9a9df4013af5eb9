use diagnostic::{
  diagnostic::{Diagnostic, Label, Span},
  diagnostic_code::DiagnosticCode,
  DiagnosticEngine,
};

use crate::{
  token::{
    types::{Literal, TokenKind},
    Token,
  },
  Scanner,
};

impl Scanner {
  pub(crate) fn scan_tokens(&mut self, engine: &mut DiagnosticEngine) {
    while !self.is_at_end() {
      self.start = self.current;
      self.scan_token(engine);
    }

    self.tokens.push(Token::new(
      TokenKind::Eof,
      String::new(),
      Literal::None,
      self.line,
      self.column,
    ));
  }

  fn scan_token(&mut self, engine: &mut DiagnosticEngine) {
    let c = self.advance();

    match c {
      '(' => self.add_token(TokenKind::LeftParen),
      ')' => self.add_token(TokenKind::RightParen),
      '{' => self.add_token(TokenKind::LeftBrace),
      '}' => self.add_token(TokenKind::RightBrace),
      ',' => self.add_token(TokenKind::Comma),
      ';' => self.add_token(TokenKind::Semicolon),
      '?' => self.add_token(TokenKind::Question),
      ':' => self.add_token(TokenKind::Colon),
      '-' => self.add_token(TokenKind::Minus),
      '+' => self.add_token(TokenKind::Plus),
      '*' => self.add_token(TokenKind::Star),

      '!' => {
        let kind = if self.match_char('=') {
          TokenKind::BangEqual
        } else {
          TokenKind::Bang
        };
        self.add_token(kind);
      },
      '=' => {
        let kind = if self.match_char('=') {
          TokenKind::EqualEqual
        } else {
          TokenKind::Equal
        };
        self.add_token(kind);
      },
      '<' => {
        let kind = if self.match_char('=') {
          TokenKind::LessEqual
        } else {
          TokenKind::Less
        };
        self.add_token(kind);
      },
      '>' => {
        let kind = if self.match_char('=') {
          TokenKind::GreaterEqual
        } else {
          TokenKind::Greater
        };
        self.add_token(kind);
      },

      '/' => {
        if self.match_char('/') {
          // Line comment: discard until the newline.
          while self.peek() != Some('\n') && !self.is_at_end() {
            self.advance();
          }
        } else if self.match_char('*') {
          self.skip_block_comment(engine);
        } else {
          self.add_token(TokenKind::Slash);
        }
      },

      ' ' | '\r' | '\t' => {},
      '\n' => {
        self.line += 1;
        self.column = 1;
      },

      '"' => self.scan_string(engine),

      c if c.is_ascii_digit() => self.scan_number(),
      c if c.is_alphabetic() || c == '_' => self.scan_identifier(),

      _ => {
        let diagnostic = Diagnostic::new(
          DiagnosticCode::InvalidCharacter,
          format!("Unexpected character '{}'.", c),
        )
        .with_label(Label::primary(
          Span {
            file: "input".to_string(),
            line: self.line,
            column: self.column_at_start(),
            length: 1,
          },
          None,
        ));
        engine.emit(diagnostic);
      },
    }
  }

  fn skip_block_comment(&mut self, engine: &mut DiagnosticEngine) {
    let mut depth = 1;
    while depth > 0 {
      if self.is_at_end() {
        let diagnostic = Diagnostic::new(
          DiagnosticCode::UnterminatedString,
          "Unterminated block comment.".to_string(),
        )
        .with_label(Label::primary(
          Span {
            file: "input".to_string(),
            line: self.line,
            column: self.column_at_start(),
            length: 2,
          },
          Some("reached end of file before closing comment".to_string()),
        ));
        engine.emit(diagnostic);
        return;
      }

      match self.advance() {
        '\n' => {
          self.line += 1;
          self.column = 1;
        },
        '*' if self.match_char('/') => depth -= 1,
        '/' if self.match_char('*') => depth += 1,
        _ => {},
      }
    }
  }

  fn scan_string(&mut self, engine: &mut DiagnosticEngine) {
    let mut value = String::new();

    while self.peek() != Some('"') && !self.is_at_end() {
      let c = self.advance();
      if c == '\n' {
        let diagnostic = Diagnostic::new(
          DiagnosticCode::UnterminatedString,
          "Unterminated string.".to_string(),
        )
        .with_label(Label::primary(
          Span {
            file: "input".to_string(),
            line: self.line,
            column: self.column_at_start(),
            length: self.current - self.start,
          },
          Some("newline before closing quote".to_string()),
        ));
        engine.emit(diagnostic);
        self.line += 1;
        self.column = 1;
        return;
      }
      value.push(c);
    }

    if self.is_at_end() {
      let diagnostic = Diagnostic::new(
        DiagnosticCode::UnterminatedString,
        "Unterminated string.".to_string(),
      )
      .with_label(Label::primary(
        Span {
          file: "input".to_string(),
          line: self.line,
          column: self.column_at_start(),
          length: self.current - self.start,
        },
        Some("reached end of file before closing quote".to_string()),
      ));
      engine.emit(diagnostic);
      return;
    }

    // Consume the closing quote.
    self.advance();

    // `value` is the contents between the quotes; the lexeme mirrors it
    // (unlike other tokens, the surrounding `"` delimiters aren't part
    // of the token's text).
    self.push_token(TokenKind::String, value.clone(), Literal::Str(value));
  }

  fn scan_number(&mut self) {
    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
      self.advance();
    }

    if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
      self.advance(); // consume the '.'
      while self.peek().is_some_and(|c| c.is_ascii_digit()) {
        self.advance();
      }
    }

    let lexeme = self.lexeme_text();
    let value: f64 = lexeme.parse().unwrap_or(0.0);
    self.push_token(TokenKind::Number, lexeme, Literal::Number(value));
  }

  fn scan_identifier(&mut self) {
    while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
      self.advance();
    }

    let lexeme = self.lexeme_text();
    let kind = keyword_kind(&lexeme).unwrap_or(TokenKind::Identifier);
    self.push_token(kind, lexeme, Literal::None);
  }

  fn add_token(&mut self, kind: TokenKind) {
    let lexeme = self.lexeme_text();
    self.push_token(kind, lexeme, Literal::None);
  }

  fn push_token(&mut self, kind: TokenKind, lexeme: String, literal: Literal) {
    let column = self.column_at_start();
    self.tokens.push(Token::new(kind, lexeme, literal, self.line, column));
  }

  fn lexeme_text(&self) -> String {
    self.source[self.start..self.current].iter().collect()
  }

  fn column_at_start(&self) -> usize {
    self.column - (self.current - self.start)
  }

  fn is_at_end(&self) -> bool {
    self.current >= self.source.len()
  }

  fn advance(&mut self) -> char {
    let c = self.source[self.current];
    self.current += 1;
    self.column += 1;
    c
  }

  fn peek(&self) -> Option<char> {
    self.source.get(self.current).copied()
  }

  fn peek_next(&self) -> Option<char> {
    self.source.get(self.current + 1).copied()
  }

  fn match_char(&mut self, expected: char) -> bool {
    if self.peek() != Some(expected) {
      return false;
    }
    self.current += 1;
    self.column += 1;
    true
  }
}

/// Maps an identifier's lexeme to its reserved-keyword `TokenKind`, if
/// any. `class`/`fun`/`return`/`super`/`this` are reserved (not parsed
/// into statements by this dialect) so that `Parser::synchronize` can
/// still resynchronize on them the way the grammar they belong to would.
fn keyword_kind(lexeme: &str) -> Option<TokenKind> {
  let kind = match lexeme {
    "and" => TokenKind::And,
    "class" => TokenKind::Class,
    "else" => TokenKind::Else,
    "false" => TokenKind::False,
    "for" => TokenKind::For,
    "fun" => TokenKind::Fun,
    "if" => TokenKind::If,
    "nil" => TokenKind::Nil,
    "or" => TokenKind::Or,
    "print" => TokenKind::Print,
    "return" => TokenKind::Return,
    "super" => TokenKind::Super,
    "this" => TokenKind::This,
    "true" => TokenKind::True,
    "var" => TokenKind::Var,
    "while" => TokenKind::While,
    _ => return None,
  };
  Some(kind)
}
