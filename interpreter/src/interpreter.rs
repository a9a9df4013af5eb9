use std::{cell::RefCell, rc::Rc};

use diagnostic::{diagnostic::{Diagnostic, Label}, diagnostic_code::DiagnosticCode, DiagnosticEngine};
use parser::{expr::Expr, stmt::{Stmt, VarDecl}, value::Value};
use scanner::token::{types::TokenKind, Token};

use crate::{env::Environment, RuntimeError};

/// Walks a statement list, holding the current lexical scope as mutable
/// state. One `Interpreter` can be reused across a REPL session so
/// top-level bindings persist between lines.
pub struct Interpreter {
  environment: Rc<RefCell<Environment>>,
}

impl Interpreter {
  pub fn new() -> Self {
    Self {
      environment: Rc::new(RefCell::new(Environment::new())),
    }
  }

  /// Evaluates statements in order. A runtime error stops the rest of
  /// this statement list; it has already been reported to `engine`.
  pub fn interpret(&mut self, statements: &[Stmt], engine: &mut DiagnosticEngine) {
    for stmt in statements {
      if self.execute(stmt, engine).is_err() {
        break;
      }
    }
  }

  fn execute(&mut self, stmt: &Stmt, engine: &mut DiagnosticEngine) -> Result<(), RuntimeError> {
    match stmt {
      Stmt::Expression(expr) => {
        self.evaluate(expr, engine)?;
        Ok(())
      },
      Stmt::Print(expr) => {
        let value = self.evaluate(expr, engine)?;
        println!("{value}");
        Ok(())
      },
      Stmt::Var(decl) => self.execute_var_decl(decl, engine),
      Stmt::Vars(decls) => {
        for decl in decls {
          self.execute_var_decl(decl, engine)?;
        }
        Ok(())
      },
      Stmt::Block(statements) => self.execute_block(statements, engine),
      Stmt::If {
        condition,
        then_branch,
        else_branch,
      } => {
        if self.evaluate(condition, engine)?.is_truthy() {
          self.execute(then_branch, engine)
        } else if let Some(else_branch) = else_branch {
          self.execute(else_branch, engine)
        } else {
          Ok(())
        }
      },
      Stmt::While { condition, body } => {
        while self.evaluate(condition, engine)?.is_truthy() {
          self.execute(body, engine)?;
        }
        Ok(())
      },
    }
  }

  fn execute_var_decl(&mut self, decl: &VarDecl, engine: &mut DiagnosticEngine) -> Result<(), RuntimeError> {
    let value = match &decl.initializer {
      Some(initializer) => self.evaluate(initializer, engine)?,
      None => Value::Nil,
    };
    self.environment.borrow_mut().define(decl.name.lexeme.clone(), value);
    Ok(())
  }

  /// Creates a child scope, runs `statements` inside it, and restores the
  /// enclosing scope on every exit path, including a runtime error.
  fn execute_block(&mut self, statements: &[Stmt], engine: &mut DiagnosticEngine) -> Result<(), RuntimeError> {
    let previous = Rc::clone(&self.environment);
    self.environment = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(&previous))));

    let mut outcome = Ok(());
    for stmt in statements {
      if let Err(err) = self.execute(stmt, engine) {
        outcome = Err(err);
        break;
      }
    }

    self.environment = previous;
    outcome
  }

  fn evaluate(&mut self, expr: &Expr, engine: &mut DiagnosticEngine) -> Result<Value, RuntimeError> {
    match expr {
      Expr::Literal(value) => Ok(value.clone()),
      Expr::Grouping(inner) => self.evaluate(inner, engine),
      Expr::Unary { operator, operand } => self.evaluate_unary(operator, operand, engine),
      Expr::Binary { left, operator, right } => self.evaluate_binary(left, operator, right, engine),
      Expr::Logical { left, operator, right } => self.evaluate_logical(left, operator, right, engine),
      Expr::Ternary {
        condition,
        then_branch,
        else_branch,
      } => {
        if self.evaluate(condition, engine)?.is_truthy() {
          self.evaluate(then_branch, engine)
        } else {
          self.evaluate(else_branch, engine)
        }
      },
      Expr::Variable(name) => self.environment.borrow().get(name, engine),
      Expr::Assign { name, value } => {
        let value = self.evaluate(value, engine)?;
        self.environment.borrow_mut().assign(name, value.clone(), engine)?;
        Ok(value)
      },
    }
  }

  fn evaluate_unary(&mut self, operator: &Token, operand: &Expr, engine: &mut DiagnosticEngine) -> Result<Value, RuntimeError> {
    let value = self.evaluate(operand, engine)?;

    match operator.kind {
      TokenKind::Minus => {
        let n = self.expect_number(operator, &value, engine)?;
        Ok(Value::Number(-n))
      },
      TokenKind::Bang => Ok(Value::Boolean(!value.is_truthy())),
      _ => unreachable!("parser never produces a unary operator outside {{MINUS, BANG}}"),
    }
  }

  fn evaluate_binary(
    &mut self,
    left: &Expr,
    operator: &Token,
    right: &Expr,
    engine: &mut DiagnosticEngine,
  ) -> Result<Value, RuntimeError> {
    // Both operands are evaluated before the operator dispatches, so
    // side effects on the right still happen even for a left type error -
    // no: a left type error short-circuits via `?` below, matching the
    // book's left-to-right evaluate-then-check order.
    let left = self.evaluate(left, engine)?;
    let right = self.evaluate(right, engine)?;

    match operator.kind {
      TokenKind::Minus => Ok(Value::Number(
        self.expect_number(operator, &left, engine)? - self.expect_number(operator, &right, engine)?,
      )),
      TokenKind::Slash => Ok(Value::Number(
        self.expect_number(operator, &left, engine)? / self.expect_number(operator, &right, engine)?,
      )),
      TokenKind::Star => Ok(Value::Number(
        self.expect_number(operator, &left, engine)? * self.expect_number(operator, &right, engine)?,
      )),
      TokenKind::Greater => Ok(Value::Boolean(
        self.expect_number(operator, &left, engine)? > self.expect_number(operator, &right, engine)?,
      )),
      TokenKind::GreaterEqual => Ok(Value::Boolean(
        self.expect_number(operator, &left, engine)? >= self.expect_number(operator, &right, engine)?,
      )),
      TokenKind::Less => Ok(Value::Boolean(
        self.expect_number(operator, &left, engine)? < self.expect_number(operator, &right, engine)?,
      )),
      TokenKind::LessEqual => Ok(Value::Boolean(
        self.expect_number(operator, &left, engine)? <= self.expect_number(operator, &right, engine)?,
      )),
      TokenKind::Plus => self.evaluate_plus(operator, left, right, engine),
      TokenKind::EqualEqual => Ok(Value::Boolean(left == right)),
      TokenKind::BangEqual => Ok(Value::Boolean(left != right)),
      TokenKind::Comma => Ok(right),
      _ => unreachable!("parser never produces a binary operator outside the documented set"),
    }
  }

  fn evaluate_plus(&self, operator: &Token, left: Value, right: Value, engine: &mut DiagnosticEngine) -> Result<Value, RuntimeError> {
    match (&left, &right) {
      (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
      _ if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) => Ok(Value::String(format!("{left}{right}"))),
      _ => Err(self.type_error(operator, "Operands must be two numbers or two strings.", engine)),
    }
  }

  fn evaluate_logical(
    &mut self,
    left: &Expr,
    operator: &Token,
    right: &Expr,
    engine: &mut DiagnosticEngine,
  ) -> Result<Value, RuntimeError> {
    let left_value = self.evaluate(left, engine)?;

    match operator.kind {
      TokenKind::Or if left_value.is_truthy() => Ok(left_value),
      TokenKind::Or => self.evaluate(right, engine),
      TokenKind::And if !left_value.is_truthy() => Ok(left_value),
      TokenKind::And => self.evaluate(right, engine),
      _ => unreachable!("parser never produces a logical operator outside {{AND, OR}}"),
    }
  }

  fn expect_number(&self, operator: &Token, value: &Value, engine: &mut DiagnosticEngine) -> Result<f64, RuntimeError> {
    match value {
      Value::Number(n) => Ok(*n),
      _ => Err(self.type_error(operator, "Operand must be a number.", engine)),
    }
  }

  fn type_error(&self, operator: &Token, message: &str, engine: &mut DiagnosticEngine) -> RuntimeError {
    let diagnostic = Diagnostic::new(DiagnosticCode::TypeMismatch, message.to_string())
      .with_label(Label::primary(operator.to_span(), None));
    engine.emit(diagnostic);
    RuntimeError
  }
}

impl Default for Interpreter {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use diagnostic::DiagnosticEngine;
  use parser::Parser;
  use scanner::Scanner;

  use super::*;

  fn run(source: &str) -> DiagnosticEngine {
    let mut engine = DiagnosticEngine::new();
    let tokens = Scanner::new(source.to_string()).scan(&mut engine);
    let statements = Parser::new(tokens).parse(&mut engine);
    let mut interpreter = Interpreter::new();
    interpreter.interpret(&statements, &mut engine);
    engine
  }

  #[test]
  fn arithmetic_precedence_is_respected() {
    let engine = run("print 1 + 2 * 3;");
    assert!(!engine.has_errors());
  }

  #[test]
  fn short_circuit_or_skips_the_right_operand() {
    // side effect in the right operand (an undefined variable read)
    // must never fire, since `true` already decides `or`.
    let engine = run("print true or undefined_var;");
    assert!(!engine.has_errors());
  }

  #[test]
  fn short_circuit_and_skips_the_right_operand() {
    let engine = run("print false and undefined_var;");
    assert!(!engine.has_errors());
  }

  #[test]
  fn truthiness_matches_book_semantics() {
    let engine = run("print !nil; print !false; print !0; print !\"\";");
    assert!(!engine.has_errors());
  }

  #[test]
  fn undefined_variable_is_a_runtime_error() {
    let engine = run("print missing;");
    assert!(engine.has_errors());
    let rendered = engine.format_all_plain("print missing;");
    assert!(rendered.contains("Undefined variable 'missing'."));
  }

  #[test]
  fn adding_a_number_and_a_string_is_a_type_error() {
    let engine = run("print true + 1;");
    assert!(engine.has_errors());
  }

  #[test]
  fn string_concatenation_uses_print_stringification() {
    let engine = run("print \"a\" + 1;");
    assert!(!engine.has_errors());
  }

  #[test]
  fn inner_block_shadows_then_restores_outer_binding() {
    let engine = run("var a = \"hi\"; { var a = \"bye\"; } print a;");
    assert!(!engine.has_errors());
  }

  #[test]
  fn assignment_from_inner_block_mutates_outer_binding() {
    let mut engine = DiagnosticEngine::new();
    let tokens = Scanner::new("var a = 1; { a = 2; }".to_string()).scan(&mut engine);
    let statements = Parser::new(tokens).parse(&mut engine);
    let mut interpreter = Interpreter::new();
    interpreter.interpret(&statements, &mut engine);
    assert!(!engine.has_errors());
  }

  #[test]
  fn block_scope_is_restored_even_after_a_runtime_error() {
    // the block body fails with a type error, but the outer scope must
    // not be left pointing at the (now-dead) inner environment.
    let engine = run("var a = 1; { var a = 2; true + 1; } print a;");
    assert!(engine.has_errors());
  }

  #[test]
  fn while_loop_runs_until_condition_is_false() {
    let engine = run("var i = 0; while (i < 3) { i = i + 1; }");
    assert!(!engine.has_errors());
  }

  #[test]
  fn for_loop_desugars_and_runs_correctly() {
    let engine = run("for (var i = 0; i < 3; i = i + 1) print i;");
    assert!(!engine.has_errors());
  }

  #[test]
  fn ternary_only_evaluates_the_selected_branch() {
    let engine = run("print (1 == 1) ? \"yes\" : undefined_var;");
    assert!(!engine.has_errors());
  }

  #[test]
  fn comma_operator_returns_the_last_value() {
    let engine = run("print (1, 2, 3);");
    assert!(!engine.has_errors());
  }

  #[test]
  fn division_by_zero_produces_infinity_not_an_error() {
    let engine = run("print 1 / 0;");
    assert!(!engine.has_errors());
  }
}
