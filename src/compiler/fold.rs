//! Compile-time evaluation of global initializers.

use crate::{
    ast::ast::{BinaryOp, Node, NumberValue},
    errors::errors::ErrorImpl,
};

use super::{compiler::Compiler, types::ScalarType};

/// A folded scalar. Booleans fold to `Int(0)` or `Int(1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstValue {
    Int(i32),
    Float(f32),
}

impl ConstValue {
    pub fn is_truthy(&self) -> bool {
        match self {
            ConstValue::Int(value) => *value != 0,
            ConstValue::Float(value) => *value != 0.0,
        }
    }

    pub fn as_f32(&self) -> f32 {
        match self {
            ConstValue::Int(value) => *value as f32,
            ConstValue::Float(value) => *value,
        }
    }

    /// Converts to the storage kind of a declaration, truncating floats.
    pub fn cast(self, ty: ScalarType) -> ConstValue {
        match (self, ty) {
            (ConstValue::Float(value), ScalarType::Int) => ConstValue::Int(value as i32),
            (ConstValue::Int(value), ScalarType::Float) => ConstValue::Float(value as f32),
            (value, ScalarType::Bool) => ConstValue::Int(value.is_truthy() as i32),
            (value, _) => value,
        }
    }

    pub fn zero(ty: ScalarType) -> ConstValue {
        match ty {
            ScalarType::Float => ConstValue::Float(0.0),
            _ => ConstValue::Int(0),
        }
    }
}

impl From<NumberValue> for ConstValue {
    fn from(value: NumberValue) -> Self {
        match value {
            NumberValue::Int(value) => ConstValue::Int(value),
            NumberValue::Float(value) => ConstValue::Float(value),
        }
    }
}

/// Folds the initializer of global `variable`.
///
/// Names resolve against globals folded earlier. Anything that cannot be
/// evaluated is diagnosed and folds to zero.
pub fn fold(compiler: &mut Compiler, node: &Node, variable: &str, line: u32) -> ConstValue {
    match node {
        Node::Number(value) => ConstValue::from(*value),
        Node::Ident(name) => match compiler.constant(&name.value) {
            Some(value) => value,
            None => {
                compiler.diagnose(
                    ErrorImpl::VariableNotDeclared {
                        variable: name.value.clone(),
                    },
                    name.line,
                );
                ConstValue::Int(0)
            }
        },
        Node::Binary(binary) if binary.op.is_logical() => {
            let left = fold(compiler, &binary.left, variable, line).is_truthy();

            let result = match binary.op {
                BinaryOp::And if !left => false,
                BinaryOp::Or if left => true,
                _ => fold(compiler, &binary.right, variable, line).is_truthy(),
            };

            ConstValue::Int(result as i32)
        }
        Node::Binary(binary) if binary.op != BinaryOp::Assign => {
            let left = fold(compiler, &binary.left, variable, line);
            let right = fold(compiler, &binary.right, variable, line);
            fold_binary(binary.op, left, right)
        }
        _ => {
            compiler.diagnose(
                ErrorImpl::NonConstantInitializer {
                    variable: variable.to_string(),
                },
                line,
            );
            ConstValue::Int(0)
        }
    }
}

fn fold_binary(op: BinaryOp, left: ConstValue, right: ConstValue) -> ConstValue {
    match (left, right) {
        (ConstValue::Int(left), ConstValue::Int(right)) => match op {
            BinaryOp::Add => ConstValue::Int(left.wrapping_add(right)),
            BinaryOp::Sub => ConstValue::Int(left.wrapping_sub(right)),
            BinaryOp::Mul => ConstValue::Int(left.wrapping_mul(right)),
            BinaryOp::Div if right == 0 => ConstValue::Int(0),
            BinaryOp::Div => ConstValue::Int(left.wrapping_div(right)),
            BinaryOp::Mod if right == 0 => ConstValue::Int(0),
            BinaryOp::Mod => ConstValue::Int(left.wrapping_rem(right)),
            op => ConstValue::Int(compare(op, left, right) as i32),
        },
        (left, right) => {
            let (left, right) = (left.as_f32(), right.as_f32());
            match op {
                BinaryOp::Add => ConstValue::Float(left + right),
                BinaryOp::Sub => ConstValue::Float(left - right),
                BinaryOp::Mul => ConstValue::Float(left * right),
                BinaryOp::Div | BinaryOp::Mod if right == 0.0 => ConstValue::Float(0.0),
                BinaryOp::Div => ConstValue::Float(left / right),
                BinaryOp::Mod => ConstValue::Float(left % right),
                op => ConstValue::Int(compare(op, left, right) as i32),
            }
        }
    }
}

fn compare<T: PartialOrd>(op: BinaryOp, left: T, right: T) -> bool {
    match op {
        BinaryOp::Lt => left < right,
        BinaryOp::Gt => left > right,
        BinaryOp::Le => left <= right,
        BinaryOp::Ge => left >= right,
        BinaryOp::Eq => left == right,
        BinaryOp::Ne => left != right,
        _ => false,
    }
}
