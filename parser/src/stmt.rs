use std::fmt;

use scanner::token::Token;

use crate::expr::Expr;

/// A single `var` declaration — `name (= initializer)?`. `Vars` groups
/// several of these sharing one trailing `;` (`var a = 1, b = 2;`).
#[derive(Debug, Clone)]
pub struct VarDecl {
  pub name: Token,
  pub initializer: Option<Expr>,
}

/// Statement AST — spec.md §3.
#[derive(Debug, Clone)]
pub enum Stmt {
  Expression(Expr),
  Print(Expr),
  Var(VarDecl),
  Vars(Vec<VarDecl>),
  Block(Vec<Stmt>),
  If {
    condition: Expr,
    then_branch: Box<Stmt>,
    else_branch: Option<Box<Stmt>>,
  },
  While {
    condition: Expr,
    body: Box<Stmt>,
  },
}

impl fmt::Display for Stmt {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Stmt::Expression(expr) => write!(f, "{expr};"),
      Stmt::Print(expr) => write!(f, "print {expr};"),
      Stmt::Var(decl) => match &decl.initializer {
        Some(init) => write!(f, "var {} = {};", decl.name.lexeme, init),
        None => write!(f, "var {};", decl.name.lexeme),
      },
      Stmt::Vars(decls) => {
        write!(f, "var ")?;
        for (i, decl) in decls.iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          match &decl.initializer {
            Some(init) => write!(f, "{} = {}", decl.name.lexeme, init)?,
            None => write!(f, "{}", decl.name.lexeme)?,
          }
        }
        write!(f, ";")
      },
      Stmt::Block(stmts) => {
        write!(f, "{{ ")?;
        for stmt in stmts {
          write!(f, "{stmt} ")?;
        }
        write!(f, "}}")
      },
      Stmt::If {
        condition,
        then_branch,
        else_branch,
      } => match else_branch {
        Some(else_branch) => write!(f, "if ({condition}) {then_branch} else {else_branch}"),
        None => write!(f, "if ({condition}) {then_branch}"),
      },
      Stmt::While { condition, body } => write!(f, "while ({condition}) {body}"),
    }
  }
}
