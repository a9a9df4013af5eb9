use diagnostic::DiagnosticEngine;
use parser::{expr::Expr, stmt::Stmt, value::Value, Parser};
use scanner::Scanner;

fn parse(source: &str) -> (Vec<Stmt>, DiagnosticEngine) {
  let mut engine = DiagnosticEngine::new();
  let tokens = Scanner::new(source.to_string()).scan(&mut engine);
  let statements = Parser::new(tokens).parse(&mut engine);
  (statements, engine)
}

#[test]
fn factor_binds_tighter_than_term() {
  let (statements, engine) = parse("1 + 2 * 3;");
  assert!(!engine.has_errors());
  match &statements[0] {
    Stmt::Expression(Expr::Binary { left, operator, right }) => {
      assert_eq!(operator.lexeme, "+");
      assert!(matches!(**left, Expr::Literal(Value::Number(n)) if n == 1.0));
      assert!(matches!(**right, Expr::Binary { .. }));
    },
    other => panic!("unexpected statement: {other}"),
  }
}

#[test]
fn term_is_left_associative() {
  let (statements, _) = parse("1 - 2 - 3;");
  match &statements[0] {
    Stmt::Expression(expr) => assert_eq!(expr.to_string(), "(- (- 1 2) 3)"),
    other => panic!("unexpected statement: {other}"),
  }
}

#[test]
fn ternary_is_right_associative() {
  let (statements, engine) = parse("true ? 1 : false ? 2 : 3;");
  assert!(!engine.has_errors());
  match &statements[0] {
    Stmt::Expression(expr) => assert_eq!(expr.to_string(), "(true ? 1 : (false ? 2 : 3))"),
    other => panic!("unexpected statement: {other}"),
  }
}

#[test]
fn comma_operator_evaluates_left_to_right_and_keeps_last() {
  let (statements, engine) = parse("1, 2, 3;");
  assert!(!engine.has_errors());
  match &statements[0] {
    Stmt::Expression(expr) => assert_eq!(expr.to_string(), "(, (, 1 2) 3)"),
    other => panic!("unexpected statement: {other}"),
  }
}

#[test]
fn assignment_is_right_associative() {
  let (statements, engine) = parse("a = b = 3;");
  assert!(!engine.has_errors());
  match &statements[0] {
    Stmt::Expression(Expr::Assign { name, value }) => {
      assert_eq!(name.lexeme, "a");
      assert!(matches!(**value, Expr::Assign { .. }));
    },
    other => panic!("unexpected statement: {other}"),
  }
}

#[test]
fn invalid_assignment_target_reports_but_does_not_abort() {
  let (statements, engine) = parse("1 = 2;");
  assert!(engine.has_errors());
  // the statement still parses to the original left-hand side
  match &statements[0] {
    Stmt::Expression(Expr::Literal(Value::Number(n))) => assert_eq!(*n, 1.0),
    other => panic!("unexpected statement: {other}"),
  }
}

#[test]
fn var_decl_group_shares_one_semicolon() {
  let (statements, engine) = parse("var a = 1, b = 2;");
  assert!(!engine.has_errors());
  match &statements[0] {
    Stmt::Vars(decls) => {
      assert_eq!(decls.len(), 2);
      assert_eq!(decls[0].name.lexeme, "a");
      assert_eq!(decls[1].name.lexeme, "b");
    },
    other => panic!("unexpected statement: {other}"),
  }
}

#[test]
fn single_var_decl_is_not_wrapped_in_vars() {
  let (statements, _) = parse("var a = 1;");
  assert!(matches!(statements[0], Stmt::Var(_)));
}

#[test]
fn for_loop_desugars_to_block_with_while() {
  let (statements, engine) = parse("for (var i = 0; i < 3; i = i + 1) print i;");
  assert!(!engine.has_errors());
  match &statements[0] {
    Stmt::Block(outer) => {
      assert_eq!(outer.len(), 2);
      assert!(matches!(outer[0], Stmt::Var(_)));
      match &outer[1] {
        Stmt::While { condition, body } => {
          assert_eq!(condition.to_string(), "(< i 3)");
          match &**body {
            Stmt::Block(inner) => {
              assert_eq!(inner.len(), 2);
              assert!(matches!(inner[0], Stmt::Print(_)));
              assert!(matches!(inner[1], Stmt::Expression(Expr::Assign { .. })));
            },
            other => panic!("expected desugared loop body block, got {other}"),
          }
        },
        other => panic!("expected while statement, got {other}"),
      }
    },
    other => panic!("expected outer block, got {other}"),
  }
}

#[test]
fn for_loop_without_condition_defaults_to_true() {
  let (statements, engine) = parse("for (;;) print 1;");
  assert!(!engine.has_errors());
  match &statements[0] {
    Stmt::While { condition, .. } => assert_eq!(condition.to_string(), "true"),
    other => panic!("expected while statement, got {other}"),
  }
}

#[test]
fn missing_closing_paren_is_reported_with_token_context() {
  let (_, engine) = parse("(1 + 2;");
  assert!(engine.has_errors());
  let rendered = engine.format_all_plain("(1 + 2;");
  assert!(rendered.contains("Expect ')' after expression."));
}

#[test]
fn missing_expression_at_eof_reports_at_end() {
  let (_, engine) = parse("1 +");
  assert!(engine.has_errors());
  let rendered = engine.format_all_plain("1 +");
  assert!(rendered.contains("at end Expect expression."));
}

#[test]
fn synchronize_recovers_after_a_bad_statement() {
  let (statements, engine) = parse("var = ; print 1;");
  assert!(engine.has_errors());
  // the parser should still find the trailing print statement
  assert!(statements.iter().any(|stmt| matches!(stmt, Stmt::Print(_))));
}

#[test]
fn logical_operators_are_distinct_from_binary() {
  let (statements, _) = parse("true and false or true;");
  match &statements[0] {
    Stmt::Expression(Expr::Logical { operator, .. }) => assert_eq!(operator.lexeme, "or"),
    other => panic!("unexpected statement: {other}"),
  }
}

#[test]
fn block_statement_parses_nested_declarations() {
  let (statements, engine) = parse("{ var a = 1; print a; }");
  assert!(!engine.has_errors());
  match &statements[0] {
    Stmt::Block(inner) => assert_eq!(inner.len(), 2),
    other => panic!("unexpected statement: {other}"),
  }
}
