use lox_lang::ast::{Expr, Token, TokenKind};
use lox_lang::cli::{self, CliError, Command, RunOptions};
use lox_lang::evaluator::{Evaluator, Instance, Object, RuntimeError};
use lox_lang::output::{to_json, to_json_pretty};
use lox_lang::parser::parse_str;
use lox_lang::printer::{AstPrinter, print};
use lox_lang::resolver::{Access, Reference, ResolveError, Resolver};
use lox_lang::value::Value;
use pretty_assertions::assert_eq;
use serde_json::json;

fn eval(source: &str) -> Result<Object, RuntimeError> {
    let expr = parse_str(source).expect("source should parse");
    Evaluator::new().evaluate(&expr)
}

fn eval_with(evaluator: &mut Evaluator, source: &str) -> Result<Object, RuntimeError> {
    let expr = parse_str(source).expect("source should parse");
    evaluator.evaluate(&expr)
}

fn rendered(source: &str) -> String {
    eval(source).unwrap().to_string()
}

// ============================================================================
// Evaluation: arithmetic and comparison
// ============================================================================

#[test]
fn test_arithmetic() {
    assert_eq!(rendered("2 + 3"), "5");
    assert_eq!(rendered("1 + 2 * 3"), "7");
    assert_eq!(rendered("(1 + 2) * 3"), "9");
    assert_eq!(rendered("7 / 2"), "3.500000");
    assert_eq!(rendered("-(4 - 10)"), "6");
}

#[test]
fn test_string_concatenation() {
    assert_eq!(rendered(r#""lo" + "x""#), "lox");
}

#[test]
fn test_mixed_addition_fails() {
    assert_eq!(
        eval(r#""a" + 1"#),
        Err(RuntimeError::OperandsMustBeNumbersOrStrings { line: 1 })
    );
}

#[test]
fn test_comparisons() {
    assert_eq!(rendered("1 < 2"), "true");
    assert_eq!(rendered("2 <= 2"), "true");
    assert_eq!(rendered("1 > 2"), "false");
    assert_eq!(rendered("3 >= 4"), "false");
    assert_eq!(
        eval(r#""a" < "b""#),
        Err(RuntimeError::OperandsMustBeNumbers { line: 1 })
    );
}

#[test]
fn test_equality() {
    assert_eq!(rendered("nil == nil"), "true");
    assert_eq!(rendered("nil == false"), "false");
    assert_eq!(rendered("1 == 1"), "true");
    assert_eq!(rendered(r#""a" != "a""#), "false");
    assert_eq!(rendered(r#"0 == "0""#), "false");
    assert_eq!(rendered("clock == clock"), "true");
    assert_eq!(rendered("clock == str"), "false");
}

#[test]
fn test_division_by_zero_follows_floats() {
    assert_eq!(rendered("1 / 0"), "inf");
}

// ============================================================================
// Evaluation: unary and logical
// ============================================================================

#[test]
fn test_unary() {
    assert_eq!(rendered("!nil"), "true");
    assert_eq!(rendered("!0"), "false");
    assert_eq!(rendered(r#"!"""#), "false");
    assert_eq!(rendered("--3"), "3");
    assert_eq!(
        eval("-true"),
        Err(RuntimeError::OperandMustBeNumber { line: 1 })
    );
}

#[test]
fn test_logical_yields_operands() {
    assert_eq!(rendered(r#"nil or "default""#), "default");
    assert_eq!(rendered(r#""first" or "second""#), "first");
    assert_eq!(rendered("false and 1"), "false");
    assert_eq!(rendered("1 and 2"), "2");
}

#[test]
fn test_logical_short_circuits() {
    // `missing` would fail if it were evaluated.
    assert_eq!(rendered("true or missing"), "true");
    assert_eq!(rendered("nil and missing"), "nil");
    assert!(matches!(
        eval("false or missing"),
        Err(RuntimeError::UndefinedVariable { .. })
    ));
}

// ============================================================================
// Evaluation: variables and assignment
// ============================================================================

#[test]
fn test_undefined_variable() {
    let err = eval("\nmystery").unwrap_err();
    assert_eq!(
        err,
        RuntimeError::UndefinedVariable {
            name: "mystery".into(),
            line: 2,
        }
    );
    assert_eq!(err.to_string(), "[line 2] Undefined variable 'mystery'.");
}

#[test]
fn test_assignment_updates_globals() {
    let mut evaluator = Evaluator::new();
    evaluator.define("a", 1.0);
    evaluator.define("b", 2.0);

    let result = eval_with(&mut evaluator, "a = b = a + b").unwrap();
    assert_eq!(result, Object::from(3.0));
    assert_eq!(eval_with(&mut evaluator, "a").unwrap(), Object::from(3.0));
    assert_eq!(eval_with(&mut evaluator, "b").unwrap(), Object::from(3.0));
}

#[test]
fn test_assignment_requires_existing_binding() {
    let mut evaluator = Evaluator::new();
    assert!(matches!(
        eval_with(&mut evaluator, "fresh = 1"),
        Err(RuntimeError::UndefinedVariable { .. })
    ));
    assert!(!evaluator.globals().contains("fresh"));
}

#[test]
fn test_grouped_assignment_still_assigns() {
    let mut evaluator = Evaluator::new();
    evaluator.define("x", Value::Nil);

    assert_eq!(eval_with(&mut evaluator, "(x = 1)").unwrap(), Object::from(1.0));
    assert_eq!(eval_with(&mut evaluator, "x").unwrap(), Object::from(1.0));
}

// ============================================================================
// Evaluation: calls
// ============================================================================

#[test]
fn test_native_str_uses_literal_rendering() {
    assert_eq!(rendered("str(3) + str(0.5)"), "30.500000");
    assert_eq!(rendered("str(nil) + str(true)"), "niltrue");
}

#[test]
fn test_native_clock() {
    let now = eval("clock()").unwrap();
    assert!(now.as_value().and_then(Value::as_number).unwrap() > 0.0);
}

#[test]
fn test_arity_mismatch() {
    assert_eq!(
        eval("str(1, 2)"),
        Err(RuntimeError::ArityMismatch {
            expected: 1,
            got: 2,
            line: 1,
        })
    );
}

#[test]
fn test_calling_a_non_callable() {
    assert_eq!(
        eval(r#""text"()"#),
        Err(RuntimeError::NotCallable {
            type_name: "string",
            line: 0,
        })
    );

    let mut evaluator = Evaluator::new();
    evaluator.define("n", 4.0);
    assert_eq!(
        eval_with(&mut evaluator, "\nn(1)"),
        Err(RuntimeError::NotCallable {
            type_name: "number",
            line: 2,
        })
    );
}

fn native_sum(args: &[Object]) -> Result<Object, RuntimeError> {
    let mut total = 0.0;
    for arg in args {
        match arg.as_value() {
            Some(Value::Number(n)) => total += n,
            _ => return Err(RuntimeError::Native("sum expects numbers".into())),
        }
    }
    Ok(Object::from(total))
}

#[test]
fn test_host_defined_native() {
    let mut evaluator = Evaluator::new();
    evaluator.define_native("sum", 3, native_sum);

    assert_eq!(eval_with(&mut evaluator, "sum(1, 2, 3)").unwrap().to_string(), "6");
    assert_eq!(
        eval_with(&mut evaluator, "sum(1, nil, 3)"),
        Err(RuntimeError::Native("sum expects numbers".into()))
    );
}

#[test]
fn test_arguments_evaluated_left_to_right() {
    let mut evaluator = Evaluator::new();
    evaluator.define("n", 0.0);
    evaluator.define_native("sum", 3, native_sum);

    let result = eval_with(&mut evaluator, "sum(n = n + 1, n = n * 10, n)").unwrap();
    // 1 + 10 + 10
    assert_eq!(result.to_string(), "21");
}

#[test]
fn test_unknown_operators_are_errors() {
    let comma = || Token::symbol(TokenKind::Comma, ",", 4);
    let plus = || Token::symbol(TokenKind::Plus, "+", 4);
    let unknown = |lexeme: &str| {
        Err(RuntimeError::UnknownOperator {
            lexeme: lexeme.into(),
            line: 4,
        })
    };
    let mut evaluator = Evaluator::new();

    let binary = Expr::binary(Expr::literal(2.0), comma(), Expr::literal(3.0));
    assert_eq!(evaluator.evaluate(&binary), unknown(","));

    let unary = Expr::unary(plus(), Expr::literal(3.0));
    assert_eq!(evaluator.evaluate(&unary), unknown("+"));

    // Neither operand value would short-circuit under `and` or `or`.
    for left in [false, true] {
        let logical = Expr::logical(Expr::literal(left), plus(), Expr::literal(3.0));
        assert_eq!(evaluator.evaluate(&logical), unknown("+"));
    }
    assert_eq!(
        unknown(",").unwrap_err().to_string(),
        "[line 4] Unknown operator ','."
    );
}

// ============================================================================
// Evaluation: properties
// ============================================================================

#[test]
fn test_get_and_set_fields() {
    let mut evaluator = Evaluator::new();
    let point = Instance::new("Point").with_field("x", 1.0).into_object();
    evaluator.define("p", point.clone());

    assert_eq!(eval_with(&mut evaluator, "p.x").unwrap(), Object::from(1.0));
    assert_eq!(eval_with(&mut evaluator, "p.y = p.x + 1").unwrap(), Object::from(2.0));

    let Object::Instance(instance) = point else {
        panic!("expected instance");
    };
    assert_eq!(instance.borrow().fields.get("y"), Some(&Object::from(2.0)));
    assert_eq!(eval_with(&mut evaluator, "p").unwrap().to_string(), "Point instance");
}

#[test]
fn test_property_errors() {
    let mut evaluator = Evaluator::new();
    evaluator.define("p", Instance::new("Point").into_object());
    evaluator.define("n", 1.0);

    assert_eq!(
        eval_with(&mut evaluator, "p.z"),
        Err(RuntimeError::UndefinedProperty {
            name: "z".into(),
            line: 1,
        })
    );
    assert_eq!(
        eval_with(&mut evaluator, "n.z"),
        Err(RuntimeError::OnlyInstancesHaveProperties { line: 1 })
    );
    assert_eq!(
        eval_with(&mut evaluator, "n.z = 1"),
        Err(RuntimeError::OnlyInstancesHaveFields { line: 1 })
    );
}

#[test]
fn test_self_referencing_instance_debug_terminates() {
    let mut evaluator = Evaluator::new();
    let point = Instance::new("Point").into_object();
    evaluator.define("p", point.clone());

    eval_with(&mut evaluator, "p.me = p").unwrap();

    let Object::Instance(instance) = &point else {
        panic!("expected instance");
    };
    assert_eq!(format!("{:?}", instance.borrow()), "<Point instance>");
    assert!(format!("{:?}", point).contains("<Point instance>"));
    assert_eq!(eval_with(&mut evaluator, "p.me == p").unwrap(), Object::from(true));
}

// ============================================================================
// Printer
// ============================================================================

#[test]
fn test_printer_forms() {
    assert_eq!(print(&parse_str("a = -b").unwrap()), "(= a (- b))");
    assert_eq!(print(&parse_str("o.f(1, \"s\")").unwrap()), "(call (. o f) 1 s)");
    assert_eq!(print(&parse_str("o.f = nil").unwrap()), "(= (. o f) nil)");
    assert_eq!(print(&parse_str("!(a or b)").unwrap()), "(! (group (or a b)))");
}

#[test]
fn test_printer_accumulates() {
    let mut printer = AstPrinter::new();
    printer.print(&parse_str("1 + 2").unwrap());
    printer.print(&parse_str("true").unwrap());
    assert_eq!(printer.as_str(), "(+ 1 2)true");
}

// ============================================================================
// JSON output
// ============================================================================

#[test]
fn test_json_encoding() {
    let expr = parse_str("f(1, x) or nil").unwrap();
    let json: serde_json::Value = serde_json::from_str(&to_json(&expr)).unwrap();

    assert_eq!(
        json,
        json!({
            "type": "logical",
            "operator": { "lexeme": "or", "line": 1 },
            "left": {
                "type": "call",
                "callee": { "type": "variable", "name": { "lexeme": "f", "line": 1 } },
                "arguments": [
                    { "type": "literal", "value": 1.0 },
                    { "type": "variable", "name": { "lexeme": "x", "line": 1 } }
                ]
            },
            "right": { "type": "literal", "value": null }
        })
    );
}

#[test]
fn test_json_chained_call_keeps_callee_and_arguments_apart() {
    let expr = parse_str("f(a)(b)").unwrap();
    let json: serde_json::Value = serde_json::from_str(&to_json(&expr)).unwrap();

    assert_eq!(json["callee"]["type"], "call");
    assert_eq!(json["callee"]["callee"]["name"]["lexeme"], "f");
    assert_eq!(json["callee"]["arguments"][0]["name"]["lexeme"], "a");
    assert_eq!(json["arguments"][0]["name"]["lexeme"], "b");
}

#[test]
fn test_json_pretty_is_indented() {
    let expr = parse_str("(a)").unwrap();
    let pretty = to_json_pretty(&expr);
    assert!(pretty.contains("\n  \"inner\": {"));
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&pretty).unwrap(),
        serde_json::from_str::<serde_json::Value>(&to_json(&expr)).unwrap()
    );
}

// ============================================================================
// Resolver
// ============================================================================

#[test]
fn test_resolver_records_references_in_evaluation_order() {
    let expr = parse_str("a = f(b, c.d) or e").unwrap();
    let references = Resolver::new().resolve(&expr).unwrap().to_vec();

    let summary: Vec<_> = references
        .iter()
        .map(|r| (r.name.as_str(), r.access, r.conditional))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("f", Access::Read, false),
            ("b", Access::Read, false),
            ("c", Access::Read, false),
            ("e", Access::Read, true),
            ("a", Access::Write, false),
        ]
    );
}

#[test]
fn test_resolver_property_write_reads_object() {
    let expr = parse_str("p.x = v").unwrap();
    let mut resolver = Resolver::new();
    resolver.resolve(&expr).unwrap();
    assert_eq!(
        resolver.into_references(),
        vec![
            Reference {
                name: "p".into(),
                line: 1,
                access: Access::Read,
                conditional: false,
            },
            Reference {
                name: "v".into(),
                line: 1,
                access: Access::Read,
                conditional: false,
            },
        ]
    );
}

#[test]
fn test_strict_resolver_rejects_unknown_names() {
    let expr = parse_str("known + unknown").unwrap();

    let mut resolver = Resolver::with_globals(["known"]);
    let err = resolver.resolve(&expr).unwrap_err();
    assert_eq!(
        err,
        ResolveError::UndefinedVariable {
            name: "unknown".into(),
            line: 1,
        }
    );
    assert_eq!(resolver.references().len(), 1);

    let mut resolver = Resolver::with_globals(["known", "unknown"]);
    assert!(resolver.resolve(&expr).is_ok());
}

// ============================================================================
// CLI
// ============================================================================

fn run(source: &str, command: Command) -> Result<Vec<String>, CliError> {
    let options = RunOptions {
        source: Some(source.to_string()),
        command,
    };
    cli::execute(&options).map(|r| r.lines)
}

#[test]
fn test_cli_eval() {
    assert_eq!(run("1 + 2 * 3", Command::Eval).unwrap(), vec!["7"]);
}

#[test]
fn test_cli_ast() {
    assert_eq!(
        run("(1 + 2) * x", Command::Ast { json: false, pretty: false }).unwrap(),
        vec!["(* (group (+ 1 2)) x)"]
    );
    let json = run("x", Command::Ast { json: true, pretty: false }).unwrap();
    assert_eq!(json, vec![r#"{"name":{"lexeme":"x","line":1},"type":"variable"}"#]);
}

#[test]
fn test_cli_tokens() {
    let lines = run("a + 1", Command::Tokens).unwrap();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("Identifier"));
    assert!(lines[3].contains("Eof"));
}

#[test]
fn test_cli_resolve() {
    let lines = run("a or b", Command::Resolve { globals: vec![] }).unwrap();
    assert_eq!(lines, vec!["   1 read a", "   1 read b (conditional)"]);

    let err = run("a or b", Command::Resolve { globals: vec!["a".into()] }).unwrap_err();
    assert!(matches!(err, CliError::Resolve(_)));
}

#[test]
fn test_cli_errors() {
    assert!(matches!(run("(x) = 1", Command::Eval), Err(CliError::Parse(_))));
    assert!(matches!(run("nope", Command::Eval), Err(CliError::Runtime(_))));
    assert!(matches!(run("#", Command::Tokens), Err(CliError::Lex(_))));

    let options = RunOptions::default();
    assert!(matches!(cli::execute(&options), Err(CliError::NoInput)));
}
