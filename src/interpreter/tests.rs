//! Unit tests for the interpreter module.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::{
    builtins::{append, make},
    expr::{interpret_expr, MAX_CALL_DEPTH},
    interpret_string,
    operators::{binary_op, unary_op, values_equal},
    scope::Scope,
    types::{convert, string_to_type, Type},
    value::{SliceValue, Value},
};
use crate::{
    ast::{
        ast::ExprWrapper,
        expressions::{BasicLitExpr, KeyValueExpr, LitKind},
    },
    errors::errors::ErrorImpl,
    lexer::tokens::TokenKind,
    Position, Span,
};

fn run(text: &str) -> Value {
    interpret_string(&Scope::with_builtins(), text).unwrap()
}

fn run_err(text: &str) -> ErrorImpl {
    interpret_string(&Scope::with_builtins(), text)
        .unwrap_err()
        .get_impl()
        .clone()
}

fn ints(values: &[i64]) -> Value {
    Value::Slice(SliceValue::new(
        Type::Int,
        values.iter().map(|v| Value::Int(*v)).collect(),
    ))
}

// SCOPE

#[test]
fn test_scope_get_walks_every_ancestor() {
    let root = Scope::new();
    root.declare("a", Value::Int(1));
    let child = Scope::with_parent(&root);
    let grandchild = Scope::with_parent(&child);

    assert_eq!(grandchild.get("a"), Some(Value::Int(1)));
    assert_eq!(grandchild.get("b"), None);
}

#[test]
fn test_scope_set_updates_nearest_binding() {
    let root = Scope::new();
    root.declare("a", Value::Int(1));
    let child = Scope::with_parent(&root);
    let grandchild = Scope::with_parent(&child);

    grandchild.set("a", Value::Int(2));

    assert_eq!(root.get("a"), Some(Value::Int(2)));
    assert_eq!(grandchild.keys().iter().filter(|k| *k == "a").count(), 1);
}

#[test]
fn test_scope_set_unknown_binds_locally() {
    let root = Scope::new();
    let child = Scope::with_parent(&root);

    child.set("z", Value::Bool(true));

    assert_eq!(child.get("z"), Some(Value::Bool(true)));
    assert_eq!(root.get("z"), None);
}

#[test]
fn test_scope_shadowing() {
    let parent = Scope::new();
    parent.declare("x", Value::Int(1));
    let child = Scope::with_parent(&parent);
    child.declare("x", Value::Int(2));
    child.declare("y", Value::Int(3));

    assert_eq!(child.get("x"), Some(Value::Int(2)));
    assert_eq!(parent.get("x"), Some(Value::Int(1)));
    assert_eq!(child.keys(), vec!["x", "y", "x"]);
}

#[test]
fn test_scope_builtin_root() {
    let scope = Scope::with_builtins();

    assert_eq!(scope.get("true"), Some(Value::Bool(true)));
    assert_eq!(scope.get("nil"), Some(Value::Nil));
    assert_eq!(scope.get_declared("true"), None);
    assert!(scope.keys().contains(&String::from("append")));
    assert!(scope.parent().is_some_and(|root| root.parent().is_none()));
}

#[test]
fn test_bare_scope_still_sees_builtins() {
    let scope = Scope::new();

    assert_eq!(interpret_string(&scope, "true").unwrap(), Value::Bool(true));
    assert_eq!(
        interpret_string(&scope, "len(1)").unwrap_err().get_impl(),
        &ErrorImpl::UnresolvedIdentifier {
            identifier: String::from("len")
        }
    );
}

// TYPE REGISTRY

#[test]
fn test_string_to_type() {
    assert_eq!(string_to_type("int").unwrap(), Type::Int);
    assert_eq!(string_to_type("byte").unwrap(), Type::Uint8);
    assert_eq!(string_to_type("rune").unwrap(), Type::Int32);
    assert_eq!(string_to_type("complex128").unwrap(), Type::Complex128);
    assert_eq!(string_to_type("error").unwrap(), Type::Error);

    let error = string_to_type("integer").unwrap_err();
    assert_eq!(error.get_error_name(), "UnknownType");
}

#[test]
fn test_type_display() {
    let ty = Type::Map(
        Box::new(Type::String),
        Box::new(Type::Slice(Box::new(Type::Int))),
    );
    assert_eq!(ty.to_string(), "map[string][]int");
    assert_eq!(Type::Chan(Box::new(Type::Float64)).to_string(), "chan float64");
}

#[test]
fn test_zero_values() {
    assert_eq!(Type::Int16.zero_value(), Value::Int16(0));
    assert_eq!(Type::String.zero_value(), Value::String(String::new()));
    assert_eq!(Type::Error.zero_value(), Value::Nil);
    assert_eq!(Type::Slice(Box::new(Type::Int)).zero_value(), ints(&[]));
}

#[test]
fn test_convert_numbers() {
    assert_eq!(convert(&Value::Int(300), &Type::Uint8).unwrap(), Value::Uint8(44));
    assert_eq!(convert(&Value::Float64(3.9), &Type::Int).unwrap(), Value::Int(3));
    assert_eq!(convert(&Value::Float64(-3.9), &Type::Int).unwrap(), Value::Int(-3));
    assert_eq!(convert(&Value::Int(2), &Type::Float32).unwrap(), Value::Float32(2.0));
    assert_eq!(
        convert(&Value::Int(2), &Type::Complex128).unwrap(),
        Value::Complex128(2.0, 0.0)
    );
}

#[test]
fn test_convert_strings() {
    assert_eq!(
        convert(&Value::Int(65), &Type::String).unwrap(),
        Value::from("A")
    );
    assert_eq!(
        convert(&Value::Int(-1), &Type::String).unwrap(),
        Value::from("\u{FFFD}")
    );

    let bytes = convert(&Value::from("hi"), &Type::Slice(Box::new(Type::Uint8))).unwrap();
    assert_eq!(
        bytes,
        Value::Slice(SliceValue::new(
            Type::Uint8,
            vec![Value::Uint8(104), Value::Uint8(105)]
        ))
    );
    assert_eq!(convert(&bytes, &Type::String).unwrap(), Value::from("hi"));
}

#[test]
fn test_convert_mismatch() {
    assert_eq!(
        convert(&Value::Bool(true), &Type::Int).unwrap_err(),
        ErrorImpl::TypeMismatch {
            expected: String::from("int"),
            received: String::from("bool"),
        }
    );
}

// OPERATORS

#[test]
fn test_integer_arithmetic() {
    assert_eq!(binary_op(&Value::Int(1), TokenKind::Plus, &Value::Int(2)).unwrap(), Value::Int(3));
    assert_eq!(binary_op(&Value::Int(7), TokenKind::Percent, &Value::Int(4)).unwrap(), Value::Int(3));
    assert_eq!(binary_op(&Value::Int(6), TokenKind::AndNot, &Value::Int(3)).unwrap(), Value::Int(4));
    assert_eq!(
        binary_op(&Value::Int(i64::MAX), TokenKind::Plus, &Value::Int(1)).unwrap(),
        Value::Int(i64::MIN)
    );
    assert_eq!(
        binary_op(&Value::Uint8(250), TokenKind::Plus, &Value::Uint8(10)).unwrap(),
        Value::Uint8(4)
    );
}

#[test]
fn test_mismatched_widths() {
    assert_eq!(
        binary_op(&Value::Int32(1), TokenKind::Plus, &Value::Int64(1)).unwrap_err(),
        ErrorImpl::TypeMismatch {
            expected: String::from("int32"),
            received: String::from("int64"),
        }
    );
}

#[test]
fn test_division_by_zero() {
    assert_eq!(
        binary_op(&Value::Int(1), TokenKind::Slash, &Value::Int(0)).unwrap_err(),
        ErrorImpl::DivisionByZero
    );
    assert_eq!(
        binary_op(&Value::Uint(1), TokenKind::Percent, &Value::Uint(0)).unwrap_err(),
        ErrorImpl::DivisionByZero
    );
    assert_eq!(
        binary_op(&Value::Float64(1.0), TokenKind::Slash, &Value::Float64(0.0)).unwrap(),
        Value::Float64(f64::INFINITY)
    );
}

#[test]
fn test_shifts() {
    assert_eq!(
        binary_op(&Value::Int(1), TokenKind::ShiftLeft, &Value::Uint8(3)).unwrap(),
        Value::Int(8)
    );
    assert_eq!(
        binary_op(&Value::Int(-8), TokenKind::ShiftRight, &Value::Int(100)).unwrap(),
        Value::Int(-1)
    );
    assert_eq!(
        binary_op(&Value::Uint8(1), TokenKind::ShiftLeft, &Value::Int(8)).unwrap(),
        Value::Uint8(0)
    );
    assert!(matches!(
        binary_op(&Value::Int(1), TokenKind::ShiftLeft, &Value::Int(-1)),
        Err(ErrorImpl::InvalidArgument { .. })
    ));
}

#[test]
fn test_strings_and_booleans() {
    assert_eq!(
        binary_op(&Value::from("ab"), TokenKind::Plus, &Value::from("cd")).unwrap(),
        Value::from("abcd")
    );
    assert_eq!(
        binary_op(&Value::from("a"), TokenKind::Less, &Value::from("b")).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        binary_op(&Value::Bool(true), TokenKind::And, &Value::Bool(false)).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        binary_op(&Value::Bool(true), TokenKind::Plus, &Value::Bool(false)).unwrap_err(),
        ErrorImpl::UnsupportedOperator {
            operator: String::from("+"),
            operand: String::from("bool"),
        }
    );
    assert!(matches!(
        binary_op(&Value::Float64(1.0), TokenKind::Percent, &Value::Float64(1.0)),
        Err(ErrorImpl::UnsupportedOperator { .. })
    ));
}

#[test]
fn test_complex_arithmetic() {
    assert_eq!(
        binary_op(
            &Value::Complex128(1.0, 2.0),
            TokenKind::Star,
            &Value::Complex128(3.0, 4.0)
        )
        .unwrap(),
        Value::Complex128(-5.0, 10.0)
    );
}

#[test]
fn test_equality() {
    assert!(values_equal(&Value::Nil, &Value::Nil).unwrap());
    assert!(!values_equal(&Value::Nil, &Value::Int(0)).unwrap());
    assert!(values_equal(&Value::Type(Type::Int), &Value::Type(Type::Int)).unwrap());
    assert!(matches!(
        values_equal(&ints(&[1]), &ints(&[1])),
        Err(ErrorImpl::UnsupportedOperator { .. })
    ));
    assert!(matches!(
        values_equal(&Value::Int(1), &Value::from("1")),
        Err(ErrorImpl::TypeMismatch { .. })
    ));
}

#[test]
fn test_unary_operators() {
    assert_eq!(unary_op(TokenKind::Dash, &Value::Int(5)).unwrap(), Value::Int(-5));
    assert_eq!(unary_op(TokenKind::Not, &Value::Bool(true)).unwrap(), Value::Bool(false));
    assert_eq!(unary_op(TokenKind::Caret, &Value::Uint8(0)).unwrap(), Value::Uint8(255));
    assert_eq!(unary_op(TokenKind::Plus, &Value::Float32(1.5)).unwrap(), Value::Float32(1.5));
    assert!(matches!(
        unary_op(TokenKind::Dash, &Value::from("s")),
        Err(ErrorImpl::UnsupportedOperator { .. })
    ));
    assert!(matches!(
        unary_op(TokenKind::Arrow, &Value::Int(1)),
        Err(ErrorImpl::UnsupportedOperator { .. })
    ));
}

// BUILTINS

#[test]
fn test_make_slice() {
    let slice = make(vec![Value::Type(Type::Slice(Box::new(Type::Int))), Value::Int(3)]).unwrap();
    assert_eq!(slice, ints(&[0, 0, 0]));

    let with_cap = make(vec![
        Value::Type(Type::Slice(Box::new(Type::Int))),
        Value::Uint8(1),
        Value::Int64(4),
    ])
    .unwrap();
    assert_eq!(with_cap, ints(&[0]));
}

#[test]
fn test_make_errors() {
    let slice_type = Value::Type(Type::Slice(Box::new(Type::Int)));

    assert!(matches!(
        make(vec![slice_type.clone(), Value::Int(2), Value::Int(1)]),
        Err(ErrorImpl::InvalidArgument { .. })
    ));
    assert!(matches!(
        make(vec![slice_type.clone(), Value::Int(-1)]),
        Err(ErrorImpl::InvalidArgument { .. })
    ));
    assert!(matches!(
        make(vec![Value::Type(Type::Int)]),
        Err(ErrorImpl::InvalidArgument { .. })
    ));
    assert!(matches!(make(vec![]), Err(ErrorImpl::ArgumentCount { .. })));
}

#[test]
fn test_make_counts_sizes_only() {
    let slice_type = Value::Type(Type::Slice(Box::new(Type::Int)));
    let map_type = Value::Type(Type::Map(Box::new(Type::String), Box::new(Type::Int)));
    let chan_type = Value::Type(Type::Chan(Box::new(Type::Int)));

    assert_eq!(
        make(vec![slice_type.clone()]).unwrap_err(),
        ErrorImpl::ArgumentCount {
            expected: 1,
            received: 0
        }
    );
    assert_eq!(
        make(vec![slice_type, Value::Int(1), Value::Int(2), Value::Int(3)]).unwrap_err(),
        ErrorImpl::ArgumentCount {
            expected: 2,
            received: 3
        }
    );
    assert_eq!(
        make(vec![map_type, Value::Int(1), Value::Int(2)]).unwrap_err(),
        ErrorImpl::ArgumentCount {
            expected: 1,
            received: 2
        }
    );
    assert_eq!(
        make(vec![chan_type, Value::Int(1), Value::Int(2)]).unwrap_err(),
        ErrorImpl::ArgumentCount {
            expected: 1,
            received: 2
        }
    );
}

#[test]
fn test_make_with_huge_sizes() {
    // A capacity is recorded, never allocated up front
    assert_eq!(run("make([]int, 0, 1 << 62)"), ints(&[]));
    match run("make(chan int, 1 << 62)") {
        Value::Chan(chan) => {
            assert_eq!(chan.capacity, 1 << 62);
            assert!(chan.is_empty());
        }
        other => panic!("expected a channel, got {:?}", other),
    }

    assert_eq!(
        run_err("make([]int, 1 << 62)"),
        ErrorImpl::InvalidArgument {
            message: format!("len {} out of range", 1u64 << 62)
        }
    );
}

#[test]
fn test_make_map_and_chan() {
    match make(vec![Value::Type(Type::Map(Box::new(Type::String), Box::new(Type::Int)))]).unwrap() {
        Value::Map(map) => assert!(map.is_empty()),
        other => panic!("expected a map, got {:?}", other),
    }

    match make(vec![Value::Type(Type::Chan(Box::new(Type::Int))), Value::Int(2)]).unwrap() {
        Value::Chan(chan) => {
            assert_eq!(chan.capacity, 2);
            assert!(chan.is_empty());
        }
        other => panic!("expected a channel, got {:?}", other),
    }
}

#[test]
fn test_append_leaves_argument_untouched() {
    let original = ints(&[1, 2]);
    let appended = append(vec![original.clone(), Value::Int(3)]).unwrap();

    assert_eq!(appended, ints(&[1, 2, 3]));
    assert_eq!(original, ints(&[1, 2]));
}

#[test]
fn test_append_checks_element_type() {
    assert_eq!(
        append(vec![ints(&[]), Value::from("x")]).unwrap_err(),
        ErrorImpl::TypeMismatch {
            expected: String::from("int"),
            received: String::from("string"),
        }
    );
    assert!(matches!(
        append(vec![Value::Int(1)]),
        Err(ErrorImpl::InvalidArgument { .. })
    ));
}

#[test]
fn test_slice_clones_share_storage() {
    let slice = SliceValue::new(Type::Int, vec![Value::Int(1)]);
    let alias = slice.clone();

    assert!(alias.set(0, Value::Int(9)));
    assert_eq!(slice.get(0), Some(Value::Int(9)));
    assert!(!alias.set(5, Value::Int(1)));
}

// EXPRESSIONS

#[test]
fn test_literals() {
    assert_eq!(run("42"), Value::Int(42));
    assert_eq!(run("3.5"), Value::Float64(3.5));
    assert_eq!(run("'a'"), Value::Int32(97));
    assert_eq!(run("\"hi\""), Value::from("hi"));
    assert_eq!(run("`raw`"), Value::from("raw"));
}

#[test]
fn test_string_literal_escapes_are_kept() {
    assert_eq!(run(r#""a\nb""#), Value::from(r"a\nb"));
}

#[test]
fn test_identifier_resolution() {
    assert_eq!(run("int"), Value::Type(Type::Int));
    assert_eq!(run("nil"), Value::Nil);
    assert_eq!(
        run_err("missing"),
        ErrorImpl::UnresolvedIdentifier {
            identifier: String::from("missing")
        }
    );
}

#[test]
fn test_type_names_shadow_variables() {
    let scope = Scope::with_builtins();
    scope.declare("int", Value::Int(1));

    assert_eq!(interpret_string(&scope, "int").unwrap(), Value::Type(Type::Int));
}

#[test]
fn test_type_expressions() {
    assert_eq!(
        run("map[string][]int"),
        Value::Type(Type::Map(
            Box::new(Type::String),
            Box::new(Type::Slice(Box::new(Type::Int)))
        ))
    );
    assert_eq!(run("<-chan int"), Value::Type(Type::Chan(Box::new(Type::Int))));
    assert_eq!(run("chan<- int"), Value::Type(Type::Chan(Box::new(Type::Int))));
    assert!(matches!(
        run_err("map[[]int]bool"),
        ErrorImpl::InvalidArgument { .. }
    ));
}

#[test]
fn test_precedence_and_parens() {
    assert_eq!(run("1 + 2 * 3"), Value::Int(7));
    assert_eq!(run("(1 + 2) * 3"), Value::Int(9));
    assert_eq!(run("10 - 4 - 3"), Value::Int(3));
    assert_eq!(run("1 < 2 && 2 < 3"), Value::Bool(true));
}

#[test]
fn test_composite_literals() {
    assert_eq!(run("[]int{1, 2, 3}"), ints(&[1, 2, 3]));
    assert_eq!(run(r#"map[string]int{"a": 1, "a": 2}["a"]"#), Value::Int(2));
    assert!(matches!(
        run_err(r#"[]int{1, "a"}"#),
        ErrorImpl::TypeMismatch { .. }
    ));
    assert!(matches!(
        run_err("map[string]int{1}"),
        ErrorImpl::InvalidArgument { .. }
    ));
}

#[test]
fn test_indexing() {
    assert_eq!(run("[]int{4, 5, 6}[1]"), Value::Int(5));
    assert_eq!(run(r#""abc"[1]"#), Value::Uint8(98));
    assert_eq!(run("[]int{4, 5}[uint8(1)]"), Value::Int(5));
    assert_eq!(
        run_err("[]int{1}[1]"),
        ErrorImpl::IndexOutOfRange { index: 1, length: 1 }
    );
    assert_eq!(
        run_err("[]int{1}[-1]"),
        ErrorImpl::IndexOutOfRange { index: -1, length: 1 }
    );
    assert_eq!(
        run_err(r#"[]int{1}["a"]"#),
        ErrorImpl::InvalidIndexType {
            received: String::from("string")
        }
    );
    assert!(matches!(run_err("5[0]"), ErrorImpl::UnsupportedOperator { .. }));
}

#[test]
fn test_map_indexing() {
    assert_eq!(run(r#"map[string]int{}["x"]"#), Value::Int(0));
    assert_eq!(run(r#"map[string]string{"k": "v"}["k"]"#), Value::from("v"));
    assert!(matches!(
        run_err("map[string]int{}[1]"),
        ErrorImpl::TypeMismatch { .. }
    ));
}

#[test]
fn test_slicing() {
    assert_eq!(run("[]int{1, 2, 3}[1:]"), ints(&[2, 3]));
    assert_eq!(run("[]int{1, 2, 3}[:2]"), ints(&[1, 2]));
    assert_eq!(run("[]int{1, 2, 3}[1:3]"), ints(&[2, 3]));
    assert_eq!(run("[]int{1, 2, 3}[3:]"), ints(&[]));
    assert_eq!(run(r#""hello"[1:3]"#), Value::from("el"));
    assert_eq!(
        run_err("[]int{1, 2, 3}[:4]"),
        ErrorImpl::IndexOutOfRange { index: 4, length: 3 }
    );
    assert_eq!(
        run_err("[]int{1, 2, 3}[2:1]"),
        ErrorImpl::IndexOutOfRange { index: 2, length: 3 }
    );
}

#[test]
fn test_slicing_multi_byte_strings() {
    assert_eq!(run(r#""héllo"[1:3]"#), Value::from("é"));
    assert_eq!(run(r#""héllo"[1]"#), Value::Uint8(0xc3));
    assert_eq!(
        run_err(r#""héllo"[1:2]"#),
        ErrorImpl::InvalidArgument {
            message: String::from("slice bounds [1:2] split a multi-byte character")
        }
    );
    assert_eq!(
        run(r#"s := "héllo"; s[0:1] + s[1:3] + s[3:]"#),
        Value::from("héllo")
    );
}

#[test]
fn test_key_value_outside_composite() {
    let file = Rc::new(String::from("shell"));
    let span = Span {
        start: Position(0, Rc::clone(&file)),
        end: Position(4, Rc::clone(&file)),
    };
    let literal = |value: &str| {
        ExprWrapper::new(BasicLitExpr {
            kind: LitKind::Int,
            value: value.to_string(),
            span: span.clone(),
        })
    };
    let pair = ExprWrapper::new(KeyValueExpr {
        key: literal("1"),
        value: literal("2"),
        span: span.clone(),
    });

    let error = interpret_expr(&Scope::with_builtins(), &pair).unwrap_err();
    assert!(matches!(error.get_impl(), ErrorImpl::UnsupportedNode { .. }));
    assert_eq!(error.get_position().0, 0);
}

#[test]
fn test_deep_nesting_evaluates() {
    let source = format!("{}1{}", "(".repeat(500), ")".repeat(500));
    assert_eq!(run(&source), Value::Int(1));
}

#[test]
fn test_runaway_recursion_is_an_error() {
    let scope = Scope::with_builtins();

    assert_eq!(
        interpret_string(&scope, "f := func() int { return f() }; f()")
            .unwrap_err()
            .get_impl(),
        &ErrorImpl::CallDepthExceeded {
            limit: MAX_CALL_DEPTH
        }
    );

    // The failed call leaves nothing behind
    assert_eq!(
        interpret_string(&scope, "g := func(n int) int { return n * 2 }; g(4)").unwrap(),
        Value::Int(8)
    );
}

#[test]
fn test_nested_calls_below_the_limit() {
    let scope = Scope::with_builtins();
    interpret_string(&scope, "inc := func(n int) int { return n + 1 }").unwrap();

    let source = format!("{}0{}", "inc(".repeat(200), ")".repeat(200));
    assert_eq!(interpret_string(&scope, &source).unwrap(), Value::Int(200));
}

#[test]
fn test_conversion_calls() {
    assert_eq!(run("float32(1)"), Value::Float32(1.0));
    assert_eq!(run(r#"string([]byte("hi"))"#), Value::from("hi"));
    assert_eq!(run("int8(200)"), Value::Int8(-56));
    assert_eq!(
        run_err("int(1, 2)"),
        ErrorImpl::ArgumentCount {
            expected: 1,
            received: 2
        }
    );
}

#[test]
fn test_not_callable() {
    assert_eq!(
        run_err("5()"),
        ErrorImpl::NotCallable {
            received: String::from("int")
        }
    );
}

#[test]
fn test_selector_on_non_struct() {
    assert!(matches!(
        run_err("x := 1; x.y"),
        ErrorImpl::TypeMismatch { .. }
    ));
}

#[test]
fn test_receive_is_unsupported() {
    assert!(matches!(
        run_err("c := make(chan int); <-c"),
        ErrorImpl::UnsupportedOperator { .. }
    ));
}

// CLOSURES

#[test]
fn test_closure_binds_parameters() {
    assert_eq!(run("func(a, b int) int { return a + b }(2, 3)"), Value::Int(5));
}

#[test]
fn test_closure_captures_defining_scope() {
    assert_eq!(run("x := 10; f := func() int { return x }; f()"), Value::Int(10));
}

#[test]
fn test_closure_parameters_do_not_leak() {
    assert_eq!(
        run_err("f := func(a int) int { return a }; f(1); a"),
        ErrorImpl::UnresolvedIdentifier {
            identifier: String::from("a")
        }
    );
}

#[test]
fn test_closure_argument_checks() {
    assert_eq!(
        run_err("func(a int) {}(1, 2)"),
        ErrorImpl::ArgumentCount {
            expected: 1,
            received: 2
        }
    );
    assert_eq!(
        run_err(r#"func(a int) {}("s")"#),
        ErrorImpl::TypeMismatch {
            expected: String::from("int"),
            received: String::from("string"),
        }
    );
}

#[test]
fn test_closure_results() {
    assert_eq!(run("func() { 5 }()"), Value::Nil);
    assert_eq!(
        run(r#"func() (int, string) { return 1, "a" }()"#),
        Value::Slice(SliceValue::new(Type::Any, vec![Value::Int(1), Value::from("a")]))
    );
    assert!(matches!(
        run_err(r#"func() int { return "a" }()"#),
        ErrorImpl::TypeMismatch { .. }
    ));
}

#[test]
fn test_return_does_not_stop_block() {
    assert_eq!(run("func() int { return 1; 2 }()"), Value::Int(2));
}

#[test]
fn test_assignment_in_closure_stays_local() {
    let scope = Scope::with_builtins();
    let value = interpret_string(&scope, "x := 1; f := func() int { x = 2; return x }; f()").unwrap();

    assert_eq!(value, Value::Int(2));
    assert_eq!(scope.get("x"), Some(Value::Int(1)));
}

// STATEMENTS

#[test]
fn test_empty_input() {
    assert_eq!(run(""), Value::Nil);
    assert_eq!(run("// nothing here"), Value::Nil);
}

#[test]
fn test_block_value_is_last_statement() {
    assert_eq!(run("{ 1; 2; 3 }"), Value::Int(3));
    assert_eq!(run("{}"), Value::Nil);
}

#[test]
fn test_return_forms() {
    assert_eq!(run("return"), Value::Nil);
    assert_eq!(run("return 1"), Value::Int(1));
    assert_eq!(
        run("return 1, 2"),
        Value::Slice(SliceValue::new(Type::Any, vec![Value::Int(1), Value::Int(2)]))
    );
}

#[test]
fn test_assignment_yields_value() {
    assert_eq!(run("x := 5"), Value::Int(5));
    assert_eq!(run("x := 5; x = 6"), Value::Int(6));
}

#[test]
fn test_builtin_names_can_be_declared() {
    let scope = Scope::with_builtins();

    assert_eq!(interpret_string(&scope, "true := 1").unwrap(), Value::Int(1));
    assert_eq!(interpret_string(&scope, "true").unwrap(), Value::Int(1));
    assert!(matches!(
        interpret_string(&Scope::with_builtins(), "false = true")
            .unwrap_err()
            .get_impl(),
        ErrorImpl::UndefinedVariable { .. }
    ));
}

#[test]
fn test_error_keeps_earlier_effects() {
    let scope = Scope::with_builtins();
    let error = interpret_string(&scope, r#"a := 1; b := a + "s""#).unwrap_err();

    assert!(matches!(error.get_impl(), ErrorImpl::TypeMismatch { .. }));
    assert_eq!(scope.get("a"), Some(Value::Int(1)));
    assert_eq!(scope.get("b"), None);
}

#[test]
fn test_error_position() {
    let error = interpret_string(&Scope::with_builtins(), r#"x := 1 + "a""#).unwrap_err();

    assert_eq!(error.get_position().0, 5);
    assert_eq!(*error.get_position().1, "shell");
}

#[test]
fn test_parse_errors_surface() {
    let error = interpret_string(&Scope::with_builtins(), "x := )").unwrap_err();
    assert!(error.is_parse_error());

    let error = interpret_string(&Scope::with_builtins(), "a.b = 1").unwrap_err();
    assert!(error.is_parse_error());

    let error = interpret_string(&Scope::with_builtins(), "for").unwrap_err();
    assert!(error.is_parse_error());
}

#[test]
fn test_equals_inside_string_is_not_assignment() {
    assert_eq!(run(r#""a=b""#), Value::from("a=b"));
    assert_eq!(run(r#"s := "x=y"; s"#), Value::from("x=y"));
}
