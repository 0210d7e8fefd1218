#[cfg(test)]
mod parser_tests {
    use calyx::ast::{Expr, Program, Stmt};
    use calyx::error::CalyxError;
    use calyx::lexer::tokenize;
    use calyx::parser::parse;
    use calyx::token::TokenType;

    fn parse_source(source: &str) -> Program {
        let tokens = tokenize(source, None).expect("tokenize should succeed");

        parse(&tokens).expect("parse should succeed")
    }

    fn parse_error(source: &str) -> CalyxError {
        let tokens = tokenize(source, None).expect("tokenize should succeed");

        parse(&tokens).expect_err("parse should fail")
    }

    /// Unwrap the single statement of a program as an expression.
    fn single_expr(source: &str) -> Expr {
        let program = parse_source(source);

        assert_eq!(program.statements.len(), 1, "in {:?}", source);

        match program.statements.into_iter().next() {
            Some(Stmt::Expr(expr)) => expr,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    fn integer(expr: &Expr) -> f64 {
        match expr {
            Expr::Integer { value, .. } => *value,
            other => panic!("expected integer literal, got {:?}", other),
        }
    }

    #[test]
    fn test_let_declaration_with_initializer() {
        let program = parse_source("let x = 1;");

        match &program.statements[0] {
            Stmt::VarDecl {
                constant,
                name,
                initializer,
                ..
            } => {
                assert!(!constant);
                assert_eq!(name, "x");
                assert!(matches!(initializer, Some(Expr::Integer { .. })));
            }

            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_let_binds_implicit_null() {
        let program = parse_source("let x;");

        match &program.statements[0] {
            Stmt::VarDecl { initializer, .. } => assert!(initializer.is_none()),
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_const_is_rejected() {
        match parse_error("const x;") {
            CalyxError::Parse { message, location } => {
                assert_eq!(message, "Constant 'x' must be initialized");
                assert_eq!(location.line, 1);
            }

            other => panic!("expected Parse error, got: {}", other),
        }
    }

    #[test]
    fn test_declaration_requires_semicolon() {
        match parse_error("let x = 1") {
            CalyxError::Parse { message, .. } => {
                assert!(message.contains("';'"), "got: {}", message);
            }

            other => panic!("expected Parse error, got: {}", other),
        }
    }

    #[test]
    fn test_expression_statement_semicolon_is_optional() {
        assert_eq!(parse_source("1 + 2").statements.len(), 1);
        assert_eq!(parse_source("1 + 2;").statements.len(), 1);
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        // 2 + 3 * 4  →  (+ 2 (* 3 4))
        match single_expr("2 + 3 * 4;") {
            Expr::Binary {
                operator,
                left,
                right,
                ..
            } => {
                assert_eq!(operator, "+");
                assert_eq!(integer(&left), 2.0);

                match *right {
                    Expr::Binary {
                        operator,
                        left,
                        right,
                        ..
                    } => {
                        assert_eq!(operator, "*");
                        assert_eq!(integer(&left), 3.0);
                        assert_eq!(integer(&right), 4.0);
                    }

                    other => panic!("expected nested product, got {:?}", other),
                }
            }

            other => panic!("expected sum, got {:?}", other),
        }
    }

    #[test]
    fn test_parentheses_override_precedence() {
        // (2 + 3) * 4  →  (* (+ 2 3) 4); grouping leaves no node of its own.
        match single_expr("(2 + 3) * 4;") {
            Expr::Binary {
                operator,
                left,
                right,
                ..
            } => {
                assert_eq!(operator, "*");
                assert!(matches!(*left, Expr::Binary { ref operator, .. } if operator == "+"));
                assert_eq!(integer(&right), 4.0);
            }

            other => panic!("expected product, got {:?}", other),
        }
    }

    #[test]
    fn test_power_binds_tighter_than_multiplication() {
        // 2 * 3 ** 2  →  (* 2 (** 3 2))
        match single_expr("2 * 3 ** 2;") {
            Expr::Binary {
                operator, right, ..
            } => {
                assert_eq!(operator, "*");
                assert!(matches!(*right, Expr::Binary { ref operator, .. } if operator == "**"));
            }

            other => panic!("expected product, got {:?}", other),
        }
    }

    #[test]
    fn test_same_tier_operators_group_left() {
        // 10 - 3 - 2  →  (- (- 10 3) 2)
        match single_expr("10 - 3 - 2;") {
            Expr::Binary {
                operator, left, ..
            } => {
                assert_eq!(operator, "-");
                assert!(matches!(*left, Expr::Binary { ref operator, .. } if operator == "-"));
            }

            other => panic!("expected difference, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        // a = b = 1  →  (= a (= b 1))
        match single_expr("a = b = 1;") {
            Expr::Assign { target, value, .. } => {
                assert!(matches!(*target, Expr::Identifier { ref name, .. } if name == "a"));
                assert!(matches!(*value, Expr::Assign { .. }));
            }

            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_target_is_captured_as_is() {
        // Structurally legal; the identifier restriction lands at evaluation.
        match single_expr("1 = 2;") {
            Expr::Assign { target, .. } => {
                assert!(matches!(*target, Expr::Integer { .. }));
            }

            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_object_literal_with_shorthand_and_trailing_comma() {
        match single_expr("{ a, b: 2, };") {
            Expr::Object { properties, .. } => {
                assert_eq!(properties.len(), 2);

                assert_eq!(properties[0].key, "a");
                assert!(properties[0].value.is_none());

                assert_eq!(properties[1].key, "b");
                assert!(matches!(properties[1].value, Some(Expr::Integer { .. })));
            }

            other => panic!("expected object literal, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_object_literal() {
        match single_expr("{};") {
            Expr::Object { properties, .. } => assert!(properties.is_empty()),
            other => panic!("expected object literal, got {:?}", other),
        }
    }

    #[test]
    fn test_calls_chain() {
        // f(1)(2)  →  (call (call f [1]) [2])
        match single_expr("f(1)(2);") {
            Expr::Call {
                caller, arguments, ..
            } => {
                assert_eq!(arguments.len(), 1);
                assert_eq!(integer(&arguments[0]), 2.0);

                match *caller {
                    Expr::Call {
                        caller, arguments, ..
                    } => {
                        assert!(matches!(*caller, Expr::Identifier { ref name, .. } if name == "f"));
                        assert_eq!(arguments.len(), 1);
                    }

                    other => panic!("expected inner call, got {:?}", other),
                }
            }

            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_member_access_dot_and_index() {
        // obj.a[0]  →  (member computed (member plain obj a) 0)
        match single_expr("obj.a[b];") {
            Expr::Member {
                object, computed, ..
            } => {
                assert!(computed);

                match *object {
                    Expr::Member {
                        object,
                        property,
                        computed,
                        ..
                    } => {
                        assert!(!computed);
                        assert!(
                            matches!(*object, Expr::Identifier { ref name, .. } if name == "obj")
                        );
                        assert!(
                            matches!(*property, Expr::Identifier { ref name, .. } if name == "a")
                        );
                    }

                    other => panic!("expected inner member, got {:?}", other),
                }
            }

            other => panic!("expected member, got {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_token_reports_type_and_location() {
        match parse_error("let x = ;") {
            CalyxError::UnexpectedToken {
                token_type,
                location,
                ..
            } => {
                assert_eq!(token_type, TokenType::Semicolon);
                assert_eq!(location.line, 1);
                assert_eq!(location.column, 9);
            }

            other => panic!("expected UnexpectedToken, got: {}", other),
        }
    }

    #[test]
    fn test_parse_is_deterministic() {
        let source = "let o = { a, b: 1 + 2 * 3 }; o = o; f(o);";
        let tokens = tokenize(source, None).unwrap();

        let first = parse(&tokens).unwrap();
        let second = parse(&tokens).unwrap();

        assert_eq!(first, second);
    }
}
