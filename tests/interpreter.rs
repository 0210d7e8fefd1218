#[cfg(test)]
mod interpreter_tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use calyx::builtins::{install, substitute};
    use calyx::environment::{resolve, Environment, ScopeRef};
    use calyx::error::{CalyxError, Result};
    use calyx::interpreter::Interpreter;
    use calyx::lexer::tokenize;
    use calyx::parser::parse;
    use calyx::value::{Value, ValueKind};

    fn eval_in(interpreter: &Interpreter, source: &str) -> Result<Value> {
        let tokens = tokenize(source, None).expect("tokenize should succeed");
        let program = parse(&tokens).expect("parse should succeed");

        interpreter.run(&program)
    }

    fn eval(source: &str) -> Result<Value> {
        eval_in(&Interpreter::new(), source)
    }

    fn eval_number(source: &str) -> f64 {
        eval(source)
            .expect("evaluation should succeed")
            .as_number()
            .expect("result should be a number")
    }

    fn exception_message(result: Result<Value>) -> String {
        match result.expect_err("evaluation should fail") {
            CalyxError::Exception { message, .. } => message,
            other => panic!("expected Exception, got: {}", other),
        }
    }

    // ────────────────────────── core evaluation ──────────────────────────

    #[test]
    fn test_declared_variable_reads_back() {
        let interpreter = Interpreter::new();

        eval_in(&interpreter, "let x = 2 + 3;").unwrap();

        // State persists across runs against the same interpreter.
        assert_eq!(eval_in(&interpreter, "x;").unwrap(), Value::number(5.0));
    }

    #[test]
    fn test_program_value_is_last_statement() {
        assert_eq!(eval("1; 2;").unwrap(), Value::number(2.0));
        assert_eq!(eval("").unwrap(), Value::null());
    }

    #[test]
    fn test_bare_let_evaluates_to_null() {
        assert_eq!(eval("let x;").unwrap(), Value::null());
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(eval_number("2 + 3 * 4;"), 14.0);
        assert_eq!(eval_number("(2 + 3) * 4;"), 20.0);
        assert_eq!(eval_number("2 * 3 ** 2;"), 18.0);
        assert_eq!(eval_number("7 % 2;"), 1.0);
    }

    #[test]
    fn test_division_follows_ieee754() {
        let quotient = eval_number("1 / 0;");
        assert!(quotient.is_infinite() && quotient.is_sign_positive());

        assert!(eval_number("0 / 0;").is_nan());
    }

    #[test]
    fn test_type_mismatch_yields_null_silently() {
        assert_eq!(eval("true + 1;").unwrap(), Value::null());
        assert_eq!(eval("null * 2;").unwrap(), Value::null());
    }

    #[test]
    fn test_assignment_updates_and_yields_value() {
        let interpreter = Interpreter::new();

        eval_in(&interpreter, "let a = 1;").unwrap();

        assert_eq!(eval_in(&interpreter, "a = 5;").unwrap(), Value::number(5.0));
        assert_eq!(eval_in(&interpreter, "a;").unwrap(), Value::number(5.0));
    }

    #[test]
    fn test_assignment_target_must_be_identifier() {
        let message = exception_message(eval("1 = 2;"));

        assert!(
            message.contains("Invalid assignment target"),
            "got: {}",
            message
        );
    }

    #[test]
    fn test_invalid_assignment_target_reports_the_target_location() {
        match eval("  1 = 2;").expect_err("evaluation should fail") {
            CalyxError::Exception { location, .. } => {
                assert_eq!(location.line, 1);
                assert_eq!(location.column, 3);
            }

            other => panic!("expected Exception, got: {}", other),
        }
    }

    #[test]
    fn test_undefined_variable_is_an_exception() {
        let message = exception_message(eval("zzz;"));

        assert_eq!(message, "Undefined variable 'zzz'");
    }

    // ───────────────────────── constants and scopes ──────────────────────

    #[test]
    fn test_constant_rejects_reassignment_and_keeps_value() {
        let interpreter = Interpreter::new();

        eval_in(&interpreter, "const y = 1;").unwrap();

        let message = exception_message(eval_in(&interpreter, "y = 2;"));
        assert_eq!(message, "Cannot assign to constant 'y'");

        assert_eq!(eval_in(&interpreter, "y;").unwrap(), Value::number(1.0));
    }

    #[test]
    fn test_redeclaration_in_same_scope_fails() {
        let message = exception_message(eval("let x = 1; let x = 2;"));

        assert_eq!(message, "Cannot redeclare variable 'x'");
    }

    #[test]
    fn test_child_scope_shadows_without_touching_parent() {
        let interpreter = Interpreter::new();

        eval_in(&interpreter, "let x = 1;").unwrap();

        let child: ScopeRef = Rc::new(RefCell::new(Environment::with_parent(Rc::clone(
            interpreter.globals(),
        ))));

        let tokens = tokenize("let x = 2; x;", None).unwrap();
        let program = parse(&tokens).unwrap();

        assert_eq!(
            interpreter.evaluate_program(&program, &child).unwrap(),
            Value::number(2.0)
        );

        // The outer binding is untouched.
        assert_eq!(eval_in(&interpreter, "x;").unwrap(), Value::number(1.0));
    }

    #[test]
    fn test_assignment_walks_to_owning_scope() {
        let interpreter = Interpreter::new();

        eval_in(&interpreter, "let x = 1;").unwrap();

        let child: ScopeRef = Rc::new(RefCell::new(Environment::with_parent(Rc::clone(
            interpreter.globals(),
        ))));

        let tokens = tokenize("x = 9;", None).unwrap();
        let program = parse(&tokens).unwrap();

        interpreter.evaluate_program(&program, &child).unwrap();

        assert_eq!(eval_in(&interpreter, "x;").unwrap(), Value::number(9.0));
    }

    #[test]
    fn test_resolve_finds_the_owning_scope() {
        let interpreter = Interpreter::new();

        eval_in(&interpreter, "let x = 1;").unwrap();

        let child: ScopeRef = Rc::new(RefCell::new(Environment::with_parent(Rc::clone(
            interpreter.globals(),
        ))));

        let owner = resolve(&child, "x").unwrap();
        assert!(Rc::ptr_eq(&owner, interpreter.globals()));

        assert!(resolve(&child, "zzz").is_err());
    }

    // ───────────────────────────── objects ───────────────────────────────

    #[test]
    fn test_object_literal_with_shorthand() {
        let interpreter = Interpreter::new();

        eval_in(&interpreter, "let a = 7; let o = { a, b: 1 + 2 };").unwrap();

        let object = eval_in(&interpreter, "o;").unwrap();

        match &object.kind {
            ValueKind::Object(entries) => {
                let entries = entries.borrow();

                assert_eq!(entries.get("a"), Some(&Value::number(7.0)));
                assert_eq!(entries.get("b"), Some(&Value::number(3.0)));

                // Insertion order is preserved for display.
                let keys: Vec<&String> = entries.keys().collect();
                assert_eq!(keys, ["a", "b"]);
            }

            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_shorthand_key_must_resolve() {
        let message = exception_message(eval("{ missing };"));

        assert_eq!(message, "Undefined variable 'missing'");
    }

    #[test]
    fn test_member_expressions_are_not_evaluated() {
        let message = exception_message(eval("math.pi;"));

        assert_eq!(message, "Member expressions are not evaluated yet");
    }

    // ─────────────────────────── calls and natives ───────────────────────

    #[test]
    fn test_calling_a_non_callable_value() {
        let message = exception_message(eval("let f = 1; f();"));

        assert_eq!(message, "'f' is not callable (found number)");
    }

    #[test]
    fn test_caller_must_be_a_bare_identifier() {
        let message = exception_message(eval("math.pow(2, 3);"));

        assert!(message.contains("Cannot call"), "got: {}", message);
    }

    #[test]
    fn test_native_result_flows_back_into_expressions() {
        fn answer(_env: &ScopeRef, _args: &[Value]) -> Result<Value> {
            Ok(Value::number(42.0))
        }

        let interpreter = Interpreter::new();

        interpreter
            .globals()
            .borrow_mut()
            .declare("answer", Value::native("answer", answer), false)
            .unwrap();

        assert_eq!(
            eval_in(&interpreter, "answer() + 1;").unwrap(),
            Value::number(43.0)
        );
    }

    #[test]
    fn test_native_receives_the_calling_scope() {
        fn mark(env: &ScopeRef, _args: &[Value]) -> Result<Value> {
            env.borrow_mut()
                .declare("marked", Value::bool(true), false)
                .map_err(|_| unreachable!("test scope has no 'marked' binding"))
        }

        let interpreter = Interpreter::new();

        interpreter
            .globals()
            .borrow_mut()
            .declare("mark", Value::native("mark", mark), false)
            .unwrap();

        eval_in(&interpreter, "mark();").unwrap();

        assert_eq!(
            eval_in(&interpreter, "marked;").unwrap(),
            Value::bool(true)
        );
    }

    #[test]
    fn test_install_leaves_existing_bindings_untouched() {
        let scope: ScopeRef = Rc::new(RefCell::new(Environment::new()));

        scope
            .borrow_mut()
            .declare("print", Value::number(1.0), false)
            .unwrap();

        install(&scope);

        // The prior binding survives; the rest of the seed set lands.
        assert_eq!(
            scope.borrow().lookup("print").unwrap(),
            Value::number(1.0)
        );
        assert_eq!(scope.borrow().lookup("true").unwrap(), Value::bool(true));
    }

    #[test]
    fn test_seeded_globals_are_constants() {
        let message = exception_message(eval("true = false;"));

        assert_eq!(message, "Cannot assign to constant 'true'");
    }

    #[test]
    fn test_math_namespace_is_seeded() {
        let math = eval("math;").unwrap();

        assert!(math.readonly);

        match &math.kind {
            ValueKind::Object(entries) => {
                let entries = entries.borrow();

                assert_eq!(
                    entries.get("pi"),
                    Some(&Value::number(std::f64::consts::PI))
                );
                assert!(matches!(
                    entries.get("sqrt").map(|v| &v.kind),
                    Some(ValueKind::Native(_))
                ));
            }

            other => panic!("expected object, got {:?}", other),
        }
    }

    // ─────────────────────────── values and display ──────────────────────

    #[test]
    fn test_display_forms() {
        assert_eq!(Value::null().to_string(), "[null]");
        assert_eq!(Value::bool(true).to_string(), "true");
        assert_eq!(Value::number(3.0).to_string(), "3");
        assert_eq!(Value::number(3.5).to_string(), "3.5");
        assert_eq!(Value::symbol("tag").to_string(), "[symbol tag]");

        let print = eval("print;").unwrap();
        assert_eq!(print.to_string(), "func print() { [native code] }");

        let object = eval("{ a: 1, b: { } };").unwrap();
        assert_eq!(object.to_string(), "{ a: 1, b: {} }");
    }

    #[test]
    fn test_large_integral_numbers_display_in_full() {
        // Beyond 2^63 the i64 fast path would saturate.
        assert_eq!(
            Value::number(1e19).to_string(),
            "10000000000000000000"
        );
        assert_eq!(
            eval("10 ** 19;").unwrap().to_string(),
            "10000000000000000000"
        );
        assert_eq!(
            Value::number(-1e19).to_string(),
            "-10000000000000000000"
        );
    }

    #[test]
    fn test_symbols_compare_by_identity() {
        let a = Value::symbol("tag");
        let b = Value::symbol("tag");

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_equality_ignores_the_readonly_flag() {
        assert_eq!(Value::number(1.0).readonly(), Value::number(1.0));
    }

    // ──────────────────────────── printf format ──────────────────────────

    #[test]
    fn test_substitute_consumes_arguments_in_order() {
        let args = [Value::number(1.0), Value::number(2.0), Value::number(3.0)];

        assert_eq!(substitute("%d + %d = %d", &args), "1 + 2 = 3");
    }

    #[test]
    fn test_substitute_percent_escape_and_bare_percent() {
        assert_eq!(substitute("%d%%", &[Value::number(5.0)]), "5%");
        assert_eq!(substitute("100%", &[]), "100%");
    }

    #[test]
    fn test_substitute_surplus_placeholders_stay_verbatim() {
        assert_eq!(
            substitute("a %s %s", &[Value::string("x")]),
            "a x %s"
        );
    }

    #[test]
    fn test_substitute_surplus_arguments_are_ignored() {
        assert_eq!(
            substitute("%s", &[Value::string("x"), Value::string("y")]),
            "x"
        );
    }
}
