//! End-to-end tests for the shell evaluator.
//!
//! These drive the public entry points the way an embedding debugger would:
//! a session scope is created once and fragments are evaluated against it
//! one after another.

use std::rc::Rc;

use pretty_assertions::assert_eq;
use pry::{
    ast::statements::ExpressionStmt,
    errors::errors::ErrorImpl,
    get_line_at_position, interpret_expr, interpret_stmt, interpret_string,
    interpreter::value::SliceValue,
    lexer::lexer::tokenize,
    parser::parser::parse,
    Function, Package, Scope, StructValue, Type, Value,
};

fn error_of(scope: &Scope, text: &str) -> ErrorImpl {
    interpret_string(scope, text).unwrap_err().get_impl().clone()
}

fn ints(values: &[i64]) -> Value {
    Value::Slice(SliceValue::new(
        Type::Int,
        values.iter().map(|v| Value::Int(*v)).collect(),
    ))
}

#[derive(Debug)]
struct Point {
    x: i64,
    y: i64,
}

impl StructValue for Point {
    fn type_name(&self) -> String {
        String::from("main.Point")
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "X" => Some(Value::Int(self.x)),
            "Y" => Some(Value::Int(self.y)),
            _ => None,
        }
    }

    fn method(&self, name: &str) -> Option<Function> {
        let (x, y) = (self.x, self.y);
        match name {
            "Sum" => Some(Function::native("Sum", move |_| Ok(vec![Value::Int(x + y)]))),
            _ => None,
        }
    }
}

fn host_package() -> Package {
    Package::new("host")
        .with_function("Nothing", Function::native("Nothing", |_| Ok(vec![])))
        .with_function(
            "Double",
            Function::native("Double", |args| match args.as_slice() {
                [Value::Int(n)] => Ok(vec![Value::Int(n * 2)]),
                _ => Err(ErrorImpl::InvalidArgument {
                    message: String::from("Double expects an int"),
                }),
            }),
        )
        .with_function(
            "Parse",
            Function::native("Parse", |args| match args.as_slice() {
                [Value::String(s)] => Ok(match s.parse::<i64>() {
                    Ok(n) => vec![Value::Int(n), Value::Nil],
                    Err(_) => vec![Value::Int(0), Value::Error(format!("bad number {:?}", s))],
                }),
                _ => Ok(vec![Value::Int(0), Value::Nil]),
            }),
        )
        .with_function(
            "Triple",
            Function::native("Triple", |_| {
                Ok(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
            }),
        )
}

#[test]
fn test_declare_then_read() {
    let scope = Scope::with_builtins();

    assert_eq!(interpret_string(&scope, "x := 5").unwrap(), Value::Int(5));
    assert_eq!(interpret_string(&scope, "x").unwrap(), Value::Int(5));
}

#[test]
fn test_redeclare_is_rejected() {
    let scope = Scope::with_builtins();
    interpret_string(&scope, "x := 5").unwrap();

    assert_eq!(
        error_of(&scope, "x := 6"),
        ErrorImpl::AlreadyDefined {
            variable: String::from("x")
        }
    );
    assert_eq!(scope.get("x"), Some(Value::Int(5)));
}

#[test]
fn test_assign_without_declare() {
    let scope = Scope::with_builtins();

    assert_eq!(
        error_of(&scope, "y = 1"),
        ErrorImpl::UndefinedVariable {
            variable: String::from("y")
        }
    );
    assert_eq!(scope.get("y"), None);
}

#[test]
fn test_assign_cannot_change_type() {
    let scope = Scope::with_builtins();
    interpret_string(&scope, "x := 5").unwrap();

    assert_eq!(
        error_of(&scope, r#"x = "hi""#),
        ErrorImpl::TypeMismatch {
            expected: String::from("int"),
            received: String::from("string"),
        }
    );
    assert_eq!(scope.get("x"), Some(Value::Int(5)));

    assert_eq!(interpret_string(&scope, "x = 7").unwrap(), Value::Int(7));
    assert_eq!(scope.get("x"), Some(Value::Int(7)));
}

#[test]
fn test_child_scope_shadows_parent() {
    let parent = Scope::with_builtins();
    interpret_string(&parent, "x := 1").unwrap();

    let child = Scope::with_parent(&parent);
    child.set("y", Value::Int(0));
    child.declare("x", Value::Int(2));

    assert_eq!(interpret_string(&child, "x").unwrap(), Value::Int(2));
    assert_eq!(interpret_string(&parent, "x").unwrap(), Value::Int(1));

    let keys = child.keys();
    assert_eq!(keys.iter().filter(|k| *k == "x").count(), 2);
}

#[test]
fn test_deep_scope_chain() {
    let root = Scope::with_builtins();
    interpret_string(&root, "depth := 0").unwrap();

    let mut scope = root.clone();
    for _ in 0..4 {
        scope = Scope::with_parent(&scope);
    }

    assert_eq!(interpret_string(&scope, "depth + 1").unwrap(), Value::Int(1));
    scope.set("depth", Value::Int(9));
    assert_eq!(root.get("depth"), Some(Value::Int(9)));
}

#[test]
fn test_make_and_append() {
    let scope = Scope::with_builtins();

    assert_eq!(interpret_string(&scope, "s := make([]int, 3)").unwrap(), ints(&[0, 0, 0]));
    assert_eq!(interpret_string(&scope, "append(s, 4)").unwrap(), ints(&[0, 0, 0, 4]));
    assert_eq!(interpret_string(&scope, "s").unwrap(), ints(&[0, 0, 0]));

    assert_eq!(interpret_string(&scope, "s = append(s, 1, 2)").unwrap(), ints(&[0, 0, 0, 1, 2]));
}

#[test]
fn test_map_miss_is_zero() {
    let scope = Scope::with_builtins();
    interpret_string(&scope, "m := make(map[string]int)").unwrap();

    assert_eq!(interpret_string(&scope, r#"m["missing"]"#).unwrap(), Value::Int(0));
}

#[test]
fn test_arithmetic_and_comparison() {
    let scope = Scope::with_builtins();

    assert_eq!(interpret_string(&scope, "1 + 2").unwrap(), Value::Int(3));
    assert_eq!(interpret_string(&scope, "1 == 1").unwrap(), Value::Bool(true));
    assert_eq!(
        error_of(&scope, "int32(1) + int64(1)"),
        ErrorImpl::TypeMismatch {
            expected: String::from("int32"),
            received: String::from("int64"),
        }
    );
}

#[test]
fn test_slice_to_length() {
    let scope = Scope::with_builtins();
    interpret_string(&scope, "s := []int{1, 2, 3, 4}").unwrap();

    assert_eq!(interpret_string(&scope, "s[1:4]").unwrap(), ints(&[2, 3, 4]));
    assert_eq!(interpret_string(&scope, "s[4:4]").unwrap(), ints(&[]));
}

#[test]
fn test_multi_statement_fragment() {
    let scope = Scope::with_builtins();

    assert_eq!(
        interpret_string(&scope, "a := 2\nb := a * 3\nb - 1").unwrap(),
        Value::Int(5)
    );
    assert_eq!(scope.get("b"), Some(Value::Int(6)));
}

#[test]
fn test_failed_fragment_keeps_completed_statements() {
    let scope = Scope::with_builtins();

    assert_eq!(
        error_of(&scope, "a := 1; b := missing; c := 3"),
        ErrorImpl::UnresolvedIdentifier {
            identifier: String::from("missing")
        }
    );
    assert_eq!(scope.get("a"), Some(Value::Int(1)));
    assert_eq!(scope.get("c"), None);
}

#[test]
fn test_closures_across_fragments() {
    let scope = Scope::with_builtins();
    interpret_string(&scope, "base := 100").unwrap();
    interpret_string(&scope, "add := func(n int) int { return base + n }").unwrap();

    assert_eq!(interpret_string(&scope, "add(5)").unwrap(), Value::Int(105));

    // The closure sees later changes to the scope it captured
    interpret_string(&scope, "base = 1").unwrap();
    assert_eq!(interpret_string(&scope, "add(5)").unwrap(), Value::Int(6));
}

#[test]
fn test_multiline_closure() {
    let scope = Scope::with_builtins();
    let source = "sum := func(xs []int) int {\n    total := 0\n    total = xs[0] + xs[1]\n    return total\n}";
    interpret_string(&scope, source).unwrap();

    assert_eq!(interpret_string(&scope, "sum([]int{3, 4})").unwrap(), Value::Int(7));
    assert_eq!(scope.get("total"), None);
}

#[test]
fn test_script_file_as_one_fragment() {
    let scope = Scope::with_builtins();
    let script = "double := func(n int) int {\n    return n * 2\n}\n\nx := double(21)\nx + 0\n";

    assert_eq!(interpret_string(&scope, script).unwrap(), Value::Int(42));
    assert_eq!(scope.get("x"), Some(Value::Int(42)));

    let broken = "a := 1\nb := a + \"s\"\n";
    let error = interpret_string(&scope, broken).unwrap_err();
    let (line, text, _) = get_line_at_position(broken, error.get_position().0).unwrap();
    assert_eq!(line, 2);
    assert_eq!(text.trim_end(), "b := a + \"s\"");
}

#[test]
fn test_package_calls() {
    let scope = Scope::with_builtins();
    scope.declare("host", Value::from(host_package()));

    assert_eq!(interpret_string(&scope, "host.Double(21)").unwrap(), Value::Int(42));
    assert_eq!(interpret_string(&scope, "host.Nothing()").unwrap(), Value::Nil);
    assert_eq!(interpret_string(&scope, r#"host.Parse("12")"#).unwrap(), Value::Int(12));
    assert_eq!(
        error_of(&scope, r#"host.Parse("x")"#),
        ErrorImpl::HostError {
            message: String::from("bad number \"x\"")
        }
    );
    assert_eq!(
        error_of(&scope, "host.Triple()"),
        ErrorImpl::UnsupportedArity { results: 3 }
    );
    assert!(matches!(
        error_of(&scope, r#"host.Double("x")"#),
        ErrorImpl::InvalidArgument { .. }
    ));
    assert_eq!(
        error_of(&scope, "host.Missing"),
        ErrorImpl::UnknownField {
            field: String::from("Missing")
        }
    );
}

#[test]
fn test_struct_fields_and_methods() {
    let scope = Scope::with_builtins();
    scope.declare("p", Value::Struct(Rc::new(Point { x: 3, y: 4 })));

    assert_eq!(interpret_string(&scope, "p.X").unwrap(), Value::Int(3));
    assert_eq!(interpret_string(&scope, "p.X * p.Y").unwrap(), Value::Int(12));
    assert_eq!(interpret_string(&scope, "p.Sum()").unwrap(), Value::Int(7));
    assert_eq!(
        error_of(&scope, "p.Z"),
        ErrorImpl::UnknownField {
            field: String::from("Z")
        }
    );
    assert!(matches!(error_of(&scope, "p == p"), ErrorImpl::UnsupportedOperator { .. }));
}

#[test]
fn test_host_slices_are_shared() {
    let scope = Scope::with_builtins();
    let items = SliceValue::new(Type::Int, vec![Value::Int(1), Value::Int(2)]);
    scope.declare("items", Value::Slice(items.clone()));

    let bump = {
        let items = items.clone();
        Function::native("Bump", move |_| {
            let first = items.get(0).and_then(|v| v.as_integer()).unwrap_or(0) as i64;
            items.set(0, Value::Int(first + 10));
            Ok(vec![])
        })
    };
    scope.declare("bump", Value::Function(bump));

    interpret_string(&scope, "alias := items").unwrap();
    interpret_string(&scope, "bump()").unwrap();

    assert_eq!(interpret_string(&scope, "alias[0]").unwrap(), Value::Int(11));
    assert_eq!(interpret_string(&scope, "items[0]").unwrap(), Value::Int(11));

    // A re-slice owns fresh storage
    interpret_string(&scope, "tail := items[0:1]").unwrap();
    interpret_string(&scope, "bump()").unwrap();
    assert_eq!(interpret_string(&scope, "tail[0]").unwrap(), Value::Int(11));
    assert_eq!(interpret_string(&scope, "items[0]").unwrap(), Value::Int(21));
}

#[test]
fn test_conversions_and_types() {
    let scope = Scope::with_builtins();

    assert_eq!(interpret_string(&scope, "[]byte(\"ab\")[1]").unwrap(), Value::Uint8(98));
    assert_eq!(interpret_string(&scope, "string(rune(65))").unwrap(), Value::from("A"));
    assert_eq!(interpret_string(&scope, "float64(7) / float64(2)").unwrap(), Value::Float64(3.5));
    assert_eq!(
        interpret_string(&scope, "map[string]bool").unwrap(),
        Value::Type(Type::Map(Box::new(Type::String), Box::new(Type::Bool)))
    );
}

#[test]
fn test_assignment_inside_strings() {
    let scope = Scope::with_builtins();

    assert_eq!(
        interpret_string(&scope, r#"eq := "a == b""#).unwrap(),
        Value::from("a == b")
    );
    assert_eq!(interpret_string(&scope, r#"eq == "a == b""#).unwrap(), Value::Bool(true));
}

#[test]
fn test_parse_errors_are_reported() {
    let scope = Scope::with_builtins();

    for source in ["x :=", "1 +", "(1", "a b", "p.X = 1", "@"] {
        let error = interpret_string(&scope, source).unwrap_err();
        assert!(error.is_parse_error(), "{:?} gave {:?}", source, error);
    }
}

#[test]
fn test_public_node_entry_points() {
    let scope = Scope::with_builtins();
    let tokens = tokenize(String::from("n := 4; n * n"), None).unwrap();
    let (_, block) = parse(tokens, Rc::new(String::from("shell")));
    let block = block.unwrap();

    assert_eq!(interpret_stmt(&scope, &block.body[0]).unwrap(), Value::Int(4));

    let expression = block.body[1].downcast::<ExpressionStmt>().unwrap();
    assert_eq!(
        interpret_expr(&scope, &expression.expression).unwrap(),
        Value::Int(16)
    );
}

#[test]
fn test_string_to_type_is_public() {
    assert_eq!(pry::string_to_type("uint16").unwrap(), Type::Uint16);
    assert!(pry::string_to_type("[]int").is_err());
}
