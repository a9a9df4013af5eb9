/*
 * program      -> declaration* EOF ;
 * declaration  -> varDecls | statement ;
 * varDecls     -> VAR varDecl ( COMMA varDecl )* SEMICOLON ;
 * varDecl      -> IDENTIFIER ( EQUAL assignment )? ;
 * statement    -> forStmt | ifStmt | printStmt | whileStmt | block | exprStmt ;
 * forStmt      -> "for" "(" ( varDecls | exprStmt | ";" ) expression? ";" expression? ")" statement ;
 * ifStmt       -> "if" "(" expression ")" statement ( "else" statement )? ;
 * printStmt    -> "print" expression ";" ;
 * whileStmt    -> "while" "(" expression ")" statement ;
 * block        -> "{" declaration* "}" ;
 * exprStmt     -> expression ";" ;
 * expression   -> comma ;
 * comma        -> assignment ( "," assignment )* ;
 * assignment   -> ternary ( "=" expression )? ;
 * ternary      -> or ( "?" ternary ":" ternary )? ;
 * or           -> and ( "or" and )* ;
 * and          -> equality ( "and" equality )* ;
 * equality     -> comparison ( ( "!=" | "==" ) comparison )* ;
 * comparison   -> term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
 * term         -> factor ( ( "-" | "+" ) factor )* ;
 * factor       -> unary ( ( "/" | "*" ) unary )* ;
 * unary        -> ( "!" | "-" ) unary | primary ;
 * primary      -> NUMBER | STRING | IDENTIFIER | "true" | "false" | "nil" | "(" expression ")" ;
 */

pub mod expr;
pub mod stmt;
pub mod value;

use diagnostic::{
  diagnostic::{Diagnostic, Label},
  diagnostic_code::DiagnosticCode,
  DiagnosticEngine,
};
use scanner::token::{types::{Literal, TokenKind}, Token};

use crate::{
  expr::Expr,
  stmt::{Stmt, VarDecl},
  value::Value,
};

/// Marker that a parse error was already reported to the `DiagnosticEngine`.
/// No payload: the diagnostic itself carries the user-facing message.
struct ParseError;

/// Converts a token stream into a statement list, recovering from
/// syntax errors via panic-mode `synchronize` so one bad declaration
/// doesn't prevent the rest of the program from being parsed.
pub struct Parser {
  tokens: Vec<Token>,
  current: usize,
}

impl Parser {
  pub fn new(tokens: Vec<Token>) -> Self {
    Self { tokens, current: 0 }
  }

  pub fn parse(&mut self, engine: &mut DiagnosticEngine) -> Vec<Stmt> {
    let mut statements = Vec::new();

    while !self.is_at_end() {
      match self.declaration(engine) {
        Ok(stmt) => statements.push(stmt),
        Err(ParseError) => self.synchronize(),
      }
    }

    statements
  }

  fn declaration(&mut self, engine: &mut DiagnosticEngine) -> Result<Stmt, ParseError> {
    if self.match_token(&[TokenKind::Var]) {
      self.var_decls(engine)
    } else {
      self.statement(engine)
    }
  }

  fn var_decls(&mut self, engine: &mut DiagnosticEngine) -> Result<Stmt, ParseError> {
    let mut decls = vec![self.var_decl(engine)?];

    while self.match_token(&[TokenKind::Comma]) {
      decls.push(self.var_decl(engine)?);
    }

    self.consume(
      TokenKind::Semicolon,
      DiagnosticCode::MissingSemicolon,
      "Expect ';' after var declaration",
      engine,
    )?;

    if decls.len() == 1 {
      Ok(Stmt::Var(decls.into_iter().next().unwrap()))
    } else {
      Ok(Stmt::Vars(decls))
    }
  }

  fn var_decl(&mut self, engine: &mut DiagnosticEngine) -> Result<VarDecl, ParseError> {
    let name = self.consume(
      TokenKind::Identifier,
      DiagnosticCode::ExpectedIdentifier,
      "Expect variable name.",
      engine,
    )?;

    let initializer = if self.match_token(&[TokenKind::Equal]) {
      Some(self.assignment(engine)?)
    } else {
      None
    };

    Ok(VarDecl { name, initializer })
  }

  fn statement(&mut self, engine: &mut DiagnosticEngine) -> Result<Stmt, ParseError> {
    if self.match_token(&[TokenKind::For]) {
      return self.for_statement(engine);
    }
    if self.match_token(&[TokenKind::If]) {
      return self.if_statement(engine);
    }
    if self.match_token(&[TokenKind::Print]) {
      return self.print_statement(engine);
    }
    if self.match_token(&[TokenKind::While]) {
      return self.while_statement(engine);
    }
    if self.match_token(&[TokenKind::LeftBrace]) {
      return Ok(Stmt::Block(self.block(engine)?));
    }
    self.expression_statement(engine)
  }

  /// Desugars `for (init; cond; incr) body` into
  /// `{ init; while (cond) { body; incr; } }`.
  fn for_statement(&mut self, engine: &mut DiagnosticEngine) -> Result<Stmt, ParseError> {
    self.consume(
      TokenKind::LeftParen,
      DiagnosticCode::ExpectedLeftParen,
      "'(' expected after 'for'.",
      engine,
    )?;

    let initializer = if self.match_token(&[TokenKind::Semicolon]) {
      None
    } else if self.match_token(&[TokenKind::Var]) {
      Some(self.var_decls(engine)?)
    } else {
      Some(self.expression_statement(engine)?)
    };

    let condition = if !self.check(TokenKind::Semicolon) {
      Some(self.expression(engine)?)
    } else {
      None
    };
    self.consume(
      TokenKind::Semicolon,
      DiagnosticCode::MissingSemicolon,
      "Expect ';' after loop condition.",
      engine,
    )?;

    let increment = if !self.check(TokenKind::RightParen) {
      Some(self.expression(engine)?)
    } else {
      None
    };
    self.consume(
      TokenKind::RightParen,
      DiagnosticCode::MissingClosingParen,
      "')' expected after 'for' condition.",
      engine,
    )?;

    let mut body = self.statement(engine)?;

    if let Some(increment) = increment {
      body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
    }

    let condition = condition.unwrap_or(Expr::Literal(Value::Boolean(true)));
    body = Stmt::While {
      condition,
      body: Box::new(body),
    };

    if let Some(initializer) = initializer {
      body = Stmt::Block(vec![initializer, body]);
    }

    Ok(body)
  }

  fn if_statement(&mut self, engine: &mut DiagnosticEngine) -> Result<Stmt, ParseError> {
    self.consume(
      TokenKind::LeftParen,
      DiagnosticCode::ExpectedLeftParen,
      "'(' expected after if.",
      engine,
    )?;
    let condition = self.expression(engine)?;
    self.consume(
      TokenKind::RightParen,
      DiagnosticCode::MissingClosingParen,
      "')' expected after if condition.",
      engine,
    )?;

    let then_branch = Box::new(self.statement(engine)?);
    let else_branch = if self.match_token(&[TokenKind::Else]) {
      Some(Box::new(self.statement(engine)?))
    } else {
      None
    };

    Ok(Stmt::If {
      condition,
      then_branch,
      else_branch,
    })
  }

  fn print_statement(&mut self, engine: &mut DiagnosticEngine) -> Result<Stmt, ParseError> {
    let value = self.expression(engine)?;
    self.consume(
      TokenKind::Semicolon,
      DiagnosticCode::MissingSemicolon,
      "Expect ';' after value.",
      engine,
    )?;
    Ok(Stmt::Print(value))
  }

  fn while_statement(&mut self, engine: &mut DiagnosticEngine) -> Result<Stmt, ParseError> {
    self.consume(
      TokenKind::LeftParen,
      DiagnosticCode::ExpectedLeftParen,
      "'(' expected after while.",
      engine,
    )?;
    let condition = self.expression(engine)?;
    self.consume(
      TokenKind::RightParen,
      DiagnosticCode::MissingClosingParen,
      "')' expected after while condition.",
      engine,
    )?;
    let body = Box::new(self.statement(engine)?);

    Ok(Stmt::While { condition, body })
  }

  fn block(&mut self, engine: &mut DiagnosticEngine) -> Result<Vec<Stmt>, ParseError> {
    let mut statements = Vec::new();

    while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
      match self.declaration(engine) {
        Ok(stmt) => statements.push(stmt),
        Err(ParseError) => self.synchronize(),
      }
    }

    self.consume(
      TokenKind::RightBrace,
      DiagnosticCode::MissingClosingBrace,
      "Expect '}' after block.",
      engine,
    )?;
    Ok(statements)
  }

  fn expression_statement(&mut self, engine: &mut DiagnosticEngine) -> Result<Stmt, ParseError> {
    let expr = self.expression(engine)?;
    self.consume(
      TokenKind::Semicolon,
      DiagnosticCode::MissingSemicolon,
      "Expect ';' after expression.",
      engine,
    )?;
    Ok(Stmt::Expression(expr))
  }

  // --- expressions, lowest to highest precedence ---

  fn expression(&mut self, engine: &mut DiagnosticEngine) -> Result<Expr, ParseError> {
    self.comma(engine)
  }

  fn comma(&mut self, engine: &mut DiagnosticEngine) -> Result<Expr, ParseError> {
    let mut expr = self.assignment(engine)?;

    while self.match_token(&[TokenKind::Comma]) {
      let operator = self.previous().clone();
      let right = self.assignment(engine)?;
      expr = Expr::Binary {
        left: Box::new(expr),
        operator,
        right: Box::new(right),
      };
    }

    Ok(expr)
  }

  fn assignment(&mut self, engine: &mut DiagnosticEngine) -> Result<Expr, ParseError> {
    let expr = self.ternary(engine)?;

    if self.match_token(&[TokenKind::Equal]) {
      let equals = self.previous().clone();
      // The right-hand side is parsed at full `expression` precedence
      // (spec.md's grammar row), which recurses back through `comma` and
      // `assignment` and is what makes `a = b = c` right-associative.
      let value = self.expression(engine)?;

      if let Expr::Variable(name) = expr {
        return Ok(Expr::Assign {
          name,
          value: Box::new(value),
        });
      }

      self.error(
        &equals,
        DiagnosticCode::InvalidAssignmentTarget,
        "Invalid assignment target.",
        engine,
      );
      // Not aborting: the `=` and its right-hand side are consumed, but
      // the expression evaluates as if they weren't there.
      return Ok(expr);
    }

    Ok(expr)
  }

  fn ternary(&mut self, engine: &mut DiagnosticEngine) -> Result<Expr, ParseError> {
    let condition = self.or(engine)?;

    if self.match_token(&[TokenKind::Question]) {
      let then_branch = self.ternary(engine)?;
      self.consume(TokenKind::Colon, DiagnosticCode::MissingColon, "Expect ':'", engine)?;
      let else_branch = self.ternary(engine)?;

      return Ok(Expr::Ternary {
        condition: Box::new(condition),
        then_branch: Box::new(then_branch),
        else_branch: Box::new(else_branch),
      });
    }

    Ok(condition)
  }

  fn or(&mut self, engine: &mut DiagnosticEngine) -> Result<Expr, ParseError> {
    let mut expr = self.and(engine)?;

    while self.match_token(&[TokenKind::Or]) {
      let operator = self.previous().clone();
      let right = self.and(engine)?;
      expr = Expr::Logical {
        left: Box::new(expr),
        operator,
        right: Box::new(right),
      };
    }

    Ok(expr)
  }

  fn and(&mut self, engine: &mut DiagnosticEngine) -> Result<Expr, ParseError> {
    let mut expr = self.equality(engine)?;

    while self.match_token(&[TokenKind::And]) {
      let operator = self.previous().clone();
      let right = self.equality(engine)?;
      expr = Expr::Logical {
        left: Box::new(expr),
        operator,
        right: Box::new(right),
      };
    }

    Ok(expr)
  }

  fn equality(&mut self, engine: &mut DiagnosticEngine) -> Result<Expr, ParseError> {
    let mut expr = self.comparison(engine)?;

    while self.match_token(&[TokenKind::BangEqual, TokenKind::EqualEqual]) {
      let operator = self.previous().clone();
      let right = self.comparison(engine)?;
      expr = Expr::Binary {
        left: Box::new(expr),
        operator,
        right: Box::new(right),
      };
    }

    Ok(expr)
  }

  fn comparison(&mut self, engine: &mut DiagnosticEngine) -> Result<Expr, ParseError> {
    let mut expr = self.term(engine)?;

    while self.match_token(&[
      TokenKind::Greater,
      TokenKind::GreaterEqual,
      TokenKind::Less,
      TokenKind::LessEqual,
    ]) {
      let operator = self.previous().clone();
      let right = self.term(engine)?;
      expr = Expr::Binary {
        left: Box::new(expr),
        operator,
        right: Box::new(right),
      };
    }

    Ok(expr)
  }

  fn term(&mut self, engine: &mut DiagnosticEngine) -> Result<Expr, ParseError> {
    let mut expr = self.factor(engine)?;

    while self.match_token(&[TokenKind::Minus, TokenKind::Plus]) {
      let operator = self.previous().clone();
      let right = self.factor(engine)?;
      expr = Expr::Binary {
        left: Box::new(expr),
        operator,
        right: Box::new(right),
      };
    }

    Ok(expr)
  }

  fn factor(&mut self, engine: &mut DiagnosticEngine) -> Result<Expr, ParseError> {
    let mut expr = self.unary(engine)?;

    while self.match_token(&[TokenKind::Slash, TokenKind::Star]) {
      let operator = self.previous().clone();
      let right = self.unary(engine)?;
      expr = Expr::Binary {
        left: Box::new(expr),
        operator,
        right: Box::new(right),
      };
    }

    Ok(expr)
  }

  fn unary(&mut self, engine: &mut DiagnosticEngine) -> Result<Expr, ParseError> {
    if self.match_token(&[TokenKind::Bang, TokenKind::Minus]) {
      let operator = self.previous().clone();
      let operand = self.unary(engine)?;
      return Ok(Expr::Unary {
        operator,
        operand: Box::new(operand),
      });
    }

    self.primary(engine)
  }

  fn primary(&mut self, engine: &mut DiagnosticEngine) -> Result<Expr, ParseError> {
    if self.match_token(&[TokenKind::False]) {
      return Ok(Expr::Literal(Value::Boolean(false)));
    }
    if self.match_token(&[TokenKind::True]) {
      return Ok(Expr::Literal(Value::Boolean(true)));
    }
    if self.match_token(&[TokenKind::Nil]) {
      return Ok(Expr::Literal(Value::Nil));
    }
    if self.match_token(&[TokenKind::Number]) {
      let literal = self.previous().literal.clone();
      let n = match literal {
        Literal::Number(n) => n,
        _ => 0.0,
      };
      return Ok(Expr::Literal(Value::Number(n)));
    }
    if self.match_token(&[TokenKind::String]) {
      let literal = self.previous().literal.clone();
      let s = match literal {
        Literal::Str(s) => s,
        _ => String::new(),
      };
      return Ok(Expr::Literal(Value::String(s)));
    }
    if self.match_token(&[TokenKind::Identifier]) {
      return Ok(Expr::Variable(self.previous().clone()));
    }
    if self.match_token(&[TokenKind::LeftParen]) {
      let expr = self.expression(engine)?;
      self.consume(
        TokenKind::RightParen,
        DiagnosticCode::MissingClosingParen,
        "Expect ')' after expression.",
        engine,
      )?;
      return Ok(Expr::Grouping(Box::new(expr)));
    }

    let token = self.peek().clone();
    Err(self.error(&token, DiagnosticCode::ExpectedExpression, "Expect expression.", engine))
  }

  // --- token stream plumbing ---

  fn match_token(&mut self, kinds: &[TokenKind]) -> bool {
    for &kind in kinds {
      if self.check(kind) {
        self.advance();
        return true;
      }
    }
    false
  }

  fn consume(
    &mut self,
    kind: TokenKind,
    code: DiagnosticCode,
    message: &str,
    engine: &mut DiagnosticEngine,
  ) -> Result<Token, ParseError> {
    if self.check(kind) {
      return Ok(self.advance().clone());
    }

    let token = self.peek().clone();
    Err(self.error(&token, code, message, engine))
  }

  fn check(&self, kind: TokenKind) -> bool {
    self.peek().kind == kind
  }

  fn advance(&mut self) -> &Token {
    if !self.is_at_end() {
      self.current += 1;
    }
    self.previous()
  }

  fn is_at_end(&self) -> bool {
    self.peek().kind == TokenKind::Eof
  }

  fn peek(&self) -> &Token {
    &self.tokens[self.current]
  }

  fn previous(&self) -> &Token {
    &self.tokens[self.current - 1]
  }

  /// On any parse error inside `declaration`, discard tokens until the
  /// previously consumed one is `;` or the next one starts a new
  /// declaration — so one bad statement doesn't take the rest of the
  /// program down with it.
  fn synchronize(&mut self) {
    self.advance();

    while !self.is_at_end() {
      if self.previous().kind == TokenKind::Semicolon {
        return;
      }

      match self.peek().kind {
        TokenKind::Class
        | TokenKind::Fun
        | TokenKind::Var
        | TokenKind::For
        | TokenKind::If
        | TokenKind::While
        | TokenKind::Print
        | TokenKind::Return => return,
        _ => {},
      }

      self.advance();
    }
  }

  fn error(&self, token: &Token, code: DiagnosticCode, message: &str, engine: &mut DiagnosticEngine) -> ParseError {
    let formatted = if token.kind == TokenKind::Eof {
      format!("at end {message}")
    } else {
      format!("at '{}' {message}", token.lexeme)
    };

    let diagnostic = Diagnostic::new(code, formatted).with_label(Label::primary(token.to_span(), None));
    engine.emit(diagnostic);
    ParseError
  }
}
