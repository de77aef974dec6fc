//! Unit tests for code generation helpers.
//!
//! Whole-program lowering is covered by the integration tests; these check
//! constant folding, scope frames and coercions in isolation.

use std::rc::Rc;

use inkwell::context::Context;

use crate::{
    ast::ast::{BinaryOp, CallExpr, Name, Node, NumberValue},
    errors::errors::ErrorImpl,
};

use super::{
    compiler::{Binding, Compiler},
    fold::{fold, ConstValue},
    types::{coerce, zero, ScalarType},
};

fn new_compiler(context: &Context) -> Compiler<'_> {
    Compiler::new(context, "test", Rc::new("test.c".to_string()))
}

fn int(value: i32) -> Node {
    Node::Number(NumberValue::Int(value))
}

fn float(value: f32) -> Node {
    Node::Number(NumberValue::Float(value))
}

fn ident(value: &str) -> Node {
    Node::Ident(Name {
        value: value.to_string(),
        line: 1,
    })
}

fn global_binding<'ctx>(compiler: &Compiler<'ctx>, name: &str, ty: ScalarType) -> Binding<'ctx> {
    let global = compiler
        .module
        .add_global(compiler.convert_type(ty), None, name);

    Binding {
        ptr: global.as_pointer_value(),
        ty,
        constant: false,
    }
}

#[test]
fn test_fold_integer_arithmetic() {
    let context = Context::create();
    let mut compiler = new_compiler(&context);

    // 1 + 2 * 3
    let node = Node::binary(
        BinaryOp::Add,
        int(1),
        Node::binary(BinaryOp::Mul, int(2), int(3)),
    );
    assert_eq!(fold(&mut compiler, &node, "a", 1), ConstValue::Int(7));

    let node = Node::binary(BinaryOp::Mod, int(17), int(5));
    assert_eq!(fold(&mut compiler, &node, "a", 1), ConstValue::Int(2));

    let node = Node::binary(BinaryOp::Div, int(-7), int(2));
    assert_eq!(fold(&mut compiler, &node, "a", 1), ConstValue::Int(-3));

    assert!(compiler.diagnostics().is_empty());
}

#[test]
fn test_fold_wraps_and_divides_by_zero() {
    let context = Context::create();
    let mut compiler = new_compiler(&context);

    let node = Node::binary(BinaryOp::Add, int(i32::MAX), int(1));
    assert_eq!(fold(&mut compiler, &node, "a", 1), ConstValue::Int(i32::MIN));

    let node = Node::binary(BinaryOp::Div, int(4), int(0));
    assert_eq!(fold(&mut compiler, &node, "a", 1), ConstValue::Int(0));

    let node = Node::binary(BinaryOp::Mod, int(4), int(0));
    assert_eq!(fold(&mut compiler, &node, "a", 1), ConstValue::Int(0));

    let node = Node::binary(BinaryOp::Div, float(4.0), int(0));
    assert_eq!(fold(&mut compiler, &node, "a", 1), ConstValue::Float(0.0));
}

#[test]
fn test_fold_promotes_to_float() {
    let context = Context::create();
    let mut compiler = new_compiler(&context);

    let node = Node::binary(BinaryOp::Mul, int(3), float(0.5));
    assert_eq!(fold(&mut compiler, &node, "a", 1), ConstValue::Float(1.5));

    let node = Node::binary(BinaryOp::Lt, float(1.5), int(2));
    assert_eq!(fold(&mut compiler, &node, "a", 1), ConstValue::Int(1));
}

#[test]
fn test_fold_logical_short_circuits() {
    let context = Context::create();
    let mut compiler = new_compiler(&context);

    // The right operands name nothing, so evaluating them would be diagnosed.
    let node = Node::binary(BinaryOp::And, int(0), ident("missing"));
    assert_eq!(fold(&mut compiler, &node, "a", 1), ConstValue::Int(0));

    let node = Node::binary(BinaryOp::Or, float(2.5), ident("missing"));
    assert_eq!(fold(&mut compiler, &node, "a", 1), ConstValue::Int(1));

    assert!(compiler.diagnostics().is_empty());

    let node = Node::binary(BinaryOp::And, int(3), int(4));
    assert_eq!(fold(&mut compiler, &node, "a", 1), ConstValue::Int(1));
}

#[test]
fn test_fold_uses_earlier_globals() {
    let context = Context::create();
    let mut compiler = new_compiler(&context);

    compiler.record_constant("a", ConstValue::Int(5));

    let node = Node::binary(BinaryOp::Mul, ident("a"), int(2));
    assert_eq!(fold(&mut compiler, &node, "b", 2), ConstValue::Int(10));
}

#[test]
fn test_fold_diagnoses_unknown_names() {
    let context = Context::create();
    let mut compiler = new_compiler(&context);

    let node = Node::binary(BinaryOp::Add, ident("x"), int(1));
    assert_eq!(fold(&mut compiler, &node, "a", 1), ConstValue::Int(1));

    assert_eq!(compiler.diagnostics().len(), 1);
    assert_eq!(
        compiler.diagnostics()[0].get_internal_error(),
        &ErrorImpl::VariableNotDeclared {
            variable: "x".to_string()
        }
    );
}

#[test]
fn test_fold_rejects_calls() {
    let context = Context::create();
    let mut compiler = new_compiler(&context);

    let node = Node::Call(CallExpr {
        callee: Name {
            value: "f".to_string(),
            line: 4,
        },
        args: vec![],
    });
    assert_eq!(fold(&mut compiler, &node, "a", 4), ConstValue::Int(0));

    let diagnostic = &compiler.diagnostics()[0];
    assert_eq!(
        diagnostic.get_internal_error(),
        &ErrorImpl::NonConstantInitializer {
            variable: "a".to_string()
        }
    );
    assert_eq!(diagnostic.get_position().0, 4);
}

#[test]
fn test_const_value_cast() {
    assert_eq!(ConstValue::Float(2.9).cast(ScalarType::Int), ConstValue::Int(2));
    assert_eq!(ConstValue::Float(-2.9).cast(ScalarType::Int), ConstValue::Int(-2));
    assert_eq!(ConstValue::Int(3).cast(ScalarType::Float), ConstValue::Float(3.0));
    assert_eq!(ConstValue::Float(0.5).cast(ScalarType::Bool), ConstValue::Int(1));
    assert_eq!(ConstValue::zero(ScalarType::Float), ConstValue::Float(0.0));
}

#[test]
fn test_scopes_shadow_and_restore() {
    let context = Context::create();
    let mut compiler = new_compiler(&context);

    let outer = global_binding(&compiler, "x", ScalarType::Int);
    let inner = global_binding(&compiler, "x.inner", ScalarType::Float);

    assert!(compiler.declare("x", outer));
    assert!(!compiler.declare("x", outer));
    assert!(compiler.is_global_declared("x"));

    compiler.push_scope();
    assert!(!compiler.is_declared_in_current_scope("x"));
    assert!(compiler.declare("x", inner));
    assert_eq!(compiler.lookup("x").map(|b| b.ty), Some(ScalarType::Float));

    compiler.pop_scope();
    assert_eq!(compiler.lookup("x").map(|b| b.ty), Some(ScalarType::Int));
    assert!(compiler.lookup("y").is_none());
}

#[test]
fn test_global_frame_is_never_popped() {
    let context = Context::create();
    let mut compiler = new_compiler(&context);

    let binding = global_binding(&compiler, "g", ScalarType::Int);
    compiler.declare("g", binding);

    assert_eq!(compiler.scope_depth(), 1);
    compiler.pop_scope();
    compiler.pop_scope();
    assert_eq!(compiler.scope_depth(), 1);
    assert!(compiler.lookup("g").is_some());
}

#[test]
fn test_coerce_between_kinds() {
    let context = Context::create();
    let compiler = new_compiler(&context);

    let function_type = context.void_type().fn_type(&[], false);
    let function = compiler.module.add_function("f", function_type, None);
    let entry = context.append_basic_block(function, "entry");
    compiler.builder.position_at_end(entry);

    let value = zero(&compiler, ScalarType::Int);

    let float = coerce(&compiler, value, ScalarType::Float).unwrap();
    assert_eq!(float.ty, ScalarType::Float);
    assert!(float.value.is_float_value());

    let boolean = coerce(&compiler, float, ScalarType::Bool).unwrap();
    assert_eq!(boolean.ty, ScalarType::Bool);
    assert_eq!(boolean.value.into_int_value().get_type().get_bit_width(), 1);

    let widened = coerce(&compiler, boolean, ScalarType::Int).unwrap();
    assert_eq!(widened.value.into_int_value().get_type().get_bit_width(), 32);

    let same = coerce(&compiler, widened, ScalarType::Int).unwrap();
    assert_eq!(same.value, widened.value);
}

#[test]
fn test_entry_alloca_is_hoisted() {
    let context = Context::create();
    let compiler = new_compiler(&context);

    let function_type = context.void_type().fn_type(&[], false);
    let function = compiler.module.add_function("f", function_type, None);
    let entry = context.append_basic_block(function, "entry");
    let body = context.append_basic_block(function, "body");

    compiler.builder.position_at_end(entry);
    compiler
        .builder
        .build_alloca(context.i32_type(), "first")
        .unwrap();
    compiler.builder.build_unconditional_branch(body).unwrap();
    compiler.builder.position_at_end(body);

    let slot = compiler
        .build_entry_alloca(function, context.bool_type().into(), "slot")
        .unwrap();

    let first = entry.get_first_instruction().unwrap();
    assert_eq!(first.get_name().unwrap().to_str().unwrap(), "slot");
    assert_eq!(slot.as_instruction().unwrap(), first);
    assert!(body.get_first_instruction().is_none());
    assert_eq!(compiler.builder.get_insert_block(), Some(body));
}

#[test]
fn test_verifier_failure_is_a_backend_error() {
    let context = Context::create();
    let compiler = new_compiler(&context);

    // A block without a terminator is rejected by the verifier.
    let function_type = context.void_type().fn_type(&[], false);
    let function = compiler.module.add_function("f", function_type, None);
    context.append_basic_block(function, "entry");

    let error = compiler.verify().err().unwrap();
    assert_eq!(error.category(), crate::errors::errors::ErrorCategory::Backend);
    assert_eq!(error.get_error_name(), "VerificationError");
}
