use std::{cell::RefCell, collections::HashMap, rc::Rc};

use diagnostic::{diagnostic::{Diagnostic, Label}, diagnostic_code::DiagnosticCode, DiagnosticEngine};
use parser::value::Value;
use scanner::token::Token;

use crate::RuntimeError;

/// A lexically scoped binding table. Children hold an `Rc` back-reference
/// to their enclosing scope; no reference runs the other way, so nothing
/// here can form a cycle.
#[derive(Debug)]
pub struct Environment {
  values: HashMap<String, Value>,
  enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
  pub fn new() -> Self {
    Self {
      values: HashMap::new(),
      enclosing: None,
    }
  }

  pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
    Self {
      values: HashMap::new(),
      enclosing: Some(enclosing),
    }
  }

  /// Insert or overwrite in the local scope. Redefining an existing name
  /// in the same scope is legal.
  pub fn define(&mut self, name: String, value: Value) {
    self.values.insert(name, value);
  }

  pub fn get(&self, name: &Token, engine: &mut DiagnosticEngine) -> Result<Value, RuntimeError> {
    if let Some(value) = self.values.get(&name.lexeme) {
      return Ok(value.clone());
    }

    if let Some(enclosing) = &self.enclosing {
      return enclosing.borrow().get(name, engine);
    }

    Err(undefined_variable(name, engine))
  }

  /// Overwrites the binding wherever it already exists in the chain.
  /// Unlike `define`, this never creates a new binding.
  pub fn assign(&mut self, name: &Token, value: Value, engine: &mut DiagnosticEngine) -> Result<(), RuntimeError> {
    if self.values.contains_key(&name.lexeme) {
      self.values.insert(name.lexeme.clone(), value);
      return Ok(());
    }

    if let Some(enclosing) = &self.enclosing {
      return enclosing.borrow_mut().assign(name, value, engine);
    }

    Err(undefined_variable(name, engine))
  }
}

impl Default for Environment {
  fn default() -> Self {
    Self::new()
  }
}

fn undefined_variable(name: &Token, engine: &mut DiagnosticEngine) -> RuntimeError {
  let message = format!("Undefined variable '{}'.", name.lexeme);
  let diagnostic = Diagnostic::new(DiagnosticCode::UndefinedVariable, message).with_label(Label::primary(name.to_span(), None));
  engine.emit(diagnostic);
  RuntimeError
}

#[cfg(test)]
mod tests {
  use diagnostic::DiagnosticEngine;
  use scanner::token::{types::{Literal, TokenKind}, Token};

  use super::*;

  fn ident(name: &str) -> Token {
    Token::new(TokenKind::Identifier, name.to_string(), Literal::None, 1, 1)
  }

  #[test]
  fn get_falls_through_to_enclosing_scope() {
    let mut engine = DiagnosticEngine::new();
    let outer = Rc::new(RefCell::new(Environment::new()));
    outer.borrow_mut().define("a".to_string(), Value::Number(1.0));

    let inner = Environment::with_enclosing(Rc::clone(&outer));
    let value = inner.get(&ident("a"), &mut engine).unwrap();
    assert_eq!(value, Value::Number(1.0));
  }

  #[test]
  fn inner_define_shadows_without_touching_outer() {
    let mut engine = DiagnosticEngine::new();
    let outer = Rc::new(RefCell::new(Environment::new()));
    outer.borrow_mut().define("a".to_string(), Value::Number(1.0));

    let mut inner = Environment::with_enclosing(Rc::clone(&outer));
    inner.define("a".to_string(), Value::Number(2.0));

    assert_eq!(inner.get(&ident("a"), &mut engine).unwrap(), Value::Number(2.0));
    assert_eq!(outer.borrow().get(&ident("a"), &mut engine).unwrap(), Value::Number(1.0));
  }

  #[test]
  fn assign_mutates_the_outer_binding_it_finds() {
    let mut engine = DiagnosticEngine::new();
    let outer = Rc::new(RefCell::new(Environment::new()));
    outer.borrow_mut().define("a".to_string(), Value::Number(1.0));

    let mut inner = Environment::with_enclosing(Rc::clone(&outer));
    inner.assign(&ident("a"), Value::Number(9.0), &mut engine).unwrap();

    assert_eq!(outer.borrow().get(&ident("a"), &mut engine).unwrap(), Value::Number(9.0));
  }

  #[test]
  fn assign_to_unknown_name_reports_undefined_variable() {
    let mut engine = DiagnosticEngine::new();
    let mut env = Environment::new();
    let result = env.assign(&ident("missing"), Value::Nil, &mut engine);

    assert!(result.is_err());
    assert!(engine.has_errors());
  }

  #[test]
  fn get_unknown_name_reports_undefined_variable() {
    let mut engine = DiagnosticEngine::new();
    let env = Environment::new();
    let result = env.get(&ident("missing"), &mut engine);

    assert!(result.is_err());
    assert_eq!(engine.error_count(), 1);
  }
}
