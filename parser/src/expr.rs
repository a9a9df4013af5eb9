use std::fmt;

use scanner::token::Token;

use crate::value::Value;

/// Expression AST — spec.md §3's tagged variant, one level of recursion
/// per production in the precedence table (spec.md §4.1).
#[derive(Debug, Clone)]
pub enum Expr {
  Literal(Value),
  Grouping(Box<Expr>),
  Unary {
    operator: Token,
    operand: Box<Expr>,
  },
  Binary {
    left: Box<Expr>,
    operator: Token,
    right: Box<Expr>,
  },
  /// Distinguished from `Binary` because `and`/`or` short-circuit.
  Logical {
    left: Box<Expr>,
    operator: Token,
    right: Box<Expr>,
  },
  Ternary {
    condition: Box<Expr>,
    then_branch: Box<Expr>,
    else_branch: Box<Expr>,
  },
  /// `name.kind` is always `Identifier` — the parser never builds one
  /// otherwise.
  Variable(Token),
  Assign {
    name: Token,
    value: Box<Expr>,
  },
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Expr::Literal(value) => write!(f, "{value}"),
      Expr::Grouping(inner) => write!(f, "(group {inner})"),
      Expr::Unary { operator, operand } => write!(f, "({} {})", operator.lexeme, operand),
      Expr::Binary { left, operator, right } => {
        write!(f, "({} {} {})", operator.lexeme, left, right)
      },
      Expr::Logical { left, operator, right } => {
        write!(f, "({} {} {})", operator.lexeme, left, right)
      },
      Expr::Ternary {
        condition,
        then_branch,
        else_branch,
      } => write!(f, "({} ? {} : {})", condition, then_branch, else_branch),
      Expr::Variable(name) => write!(f, "{}", name.lexeme),
      Expr::Assign { name, value } => write!(f, "({} = {})", name.lexeme, value),
    }
  }
}
