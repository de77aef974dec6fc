use inkwell::{
    values::{BasicMetadataValueEnum, BasicValueEnum},
    FloatPredicate, IntPredicate,
};

use crate::{
    ast::ast::{BinaryExpr, BinaryOp, CallExpr, Node, NumberValue},
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{
    compiler::Compiler,
    fold::ConstValue,
    stmt::current_function,
    types::{coerce, zero, ScalarType, TypedValue},
};

/// Materializes a folded constant as a value of kind `ty`.
pub fn const_to_value<'ctx>(
    compiler: &Compiler<'ctx>,
    value: ConstValue,
    ty: ScalarType,
) -> TypedValue<'ctx> {
    let value: BasicValueEnum<'ctx> = match value.cast(ty) {
        ConstValue::Int(value) if ty == ScalarType::Bool => compiler
            .context
            .bool_type()
            .const_int((value != 0) as u64, false)
            .into(),
        ConstValue::Int(value) => compiler
            .context
            .i32_type()
            .const_int(value as u64, true)
            .into(),
        ConstValue::Float(value) => compiler.context.f32_type().const_float(value as f64).into(),
    };

    TypedValue::new(value, ty)
}

/// Generates LLVM IR for the given expression.
pub fn gen_expression<'ctx>(
    compiler: &mut Compiler<'ctx>,
    expression: &Node,
) -> Result<TypedValue<'ctx>, Error> {
    match expression {
        Node::Number(NumberValue::Int(value)) => Ok(const_to_value(
            compiler,
            ConstValue::Int(*value),
            ScalarType::Int,
        )),
        Node::Number(NumberValue::Float(value)) => Ok(const_to_value(
            compiler,
            ConstValue::Float(*value),
            ScalarType::Float,
        )),
        Node::Ident(name) => {
            let Some(binding) = compiler.lookup(&name.value) else {
                compiler.diagnose(
                    ErrorImpl::VariableNotDeclared {
                        variable: name.value.clone(),
                    },
                    name.line,
                );
                return Ok(zero(compiler, ScalarType::Int));
            };

            let value = compiler.builder.build_load(binding.ptr, &name.value)?;
            Ok(TypedValue::new(value, binding.ty))
        }
        Node::Binary(binary) => match binary.op {
            BinaryOp::Assign => gen_assignment(compiler, binary),
            BinaryOp::And | BinaryOp::Or => gen_logical(compiler, binary),
            _ => gen_binary(compiler, binary),
        },
        Node::Call(call) => gen_call(compiler, call),
        other => Err(Error::new(
            ErrorImpl::UnexpectedNode {
                node: other.kind_name().to_string(),
            },
            Position::null(),
        )),
    }
}

/// Arithmetic and comparisons. Operands are promoted to float when either
/// side is float and to int otherwise.
fn gen_binary<'ctx>(
    compiler: &mut Compiler<'ctx>,
    binary: &BinaryExpr,
) -> Result<TypedValue<'ctx>, Error> {
    let left = gen_expression(compiler, &binary.left)?;
    let right = gen_expression(compiler, &binary.right)?;

    let operand_type = if left.ty == ScalarType::Float || right.ty == ScalarType::Float {
        ScalarType::Float
    } else {
        ScalarType::Int
    };

    let left = coerce(compiler, left, operand_type)?.value;
    let right = coerce(compiler, right, operand_type)?.value;
    let builder = &compiler.builder;

    if operand_type == ScalarType::Float {
        let (left, right) = (left.into_float_value(), right.into_float_value());

        if binary.op.is_comparison() {
            let predicate = match binary.op {
                BinaryOp::Lt => FloatPredicate::OLT,
                BinaryOp::Gt => FloatPredicate::OGT,
                BinaryOp::Le => FloatPredicate::OLE,
                BinaryOp::Ge => FloatPredicate::OGE,
                BinaryOp::Eq => FloatPredicate::OEQ,
                _ => FloatPredicate::ONE,
            };
            let value = builder.build_float_compare(predicate, left, right, "cmp")?;
            return Ok(TypedValue::new(value.into(), ScalarType::Bool));
        }

        let value = match binary.op {
            BinaryOp::Add => builder.build_float_add(left, right, "add")?,
            BinaryOp::Sub => builder.build_float_sub(left, right, "sub")?,
            BinaryOp::Mul => builder.build_float_mul(left, right, "mul")?,
            BinaryOp::Div => builder.build_float_div(left, right, "div")?,
            _ => builder.build_float_rem(left, right, "rem")?,
        };
        return Ok(TypedValue::new(value.into(), ScalarType::Float));
    }

    let (left, right) = (left.into_int_value(), right.into_int_value());

    if binary.op.is_comparison() {
        let predicate = match binary.op {
            BinaryOp::Lt => IntPredicate::SLT,
            BinaryOp::Gt => IntPredicate::SGT,
            BinaryOp::Le => IntPredicate::SLE,
            BinaryOp::Ge => IntPredicate::SGE,
            BinaryOp::Eq => IntPredicate::EQ,
            _ => IntPredicate::NE,
        };
        let value = builder.build_int_compare(predicate, left, right, "cmp")?;
        return Ok(TypedValue::new(value.into(), ScalarType::Bool));
    }

    let value = match binary.op {
        BinaryOp::Add => builder.build_int_add(left, right, "add")?,
        BinaryOp::Sub => builder.build_int_sub(left, right, "sub")?,
        BinaryOp::Mul => builder.build_int_mul(left, right, "mul")?,
        BinaryOp::Div => builder.build_int_signed_div(left, right, "div")?,
        _ => builder.build_int_signed_rem(left, right, "rem")?,
    };
    Ok(TypedValue::new(value.into(), ScalarType::Int))
}

/// `&&` and `||` through a result slot. The slot starts at the value the
/// left operand alone can decide (false for `&&`, true for `||`); the right
/// operand is only evaluated in its own block.
fn gen_logical<'ctx>(
    compiler: &mut Compiler<'ctx>,
    binary: &BinaryExpr,
) -> Result<TypedValue<'ctx>, Error> {
    let is_and = binary.op == BinaryOp::And;
    let function = current_function(compiler)?;
    let bool_type = compiler.context.bool_type();

    let slot = compiler.build_entry_alloca(function, bool_type.into(), "logic")?;
    compiler
        .builder
        .build_store(slot, bool_type.const_int((!is_and) as u64, false))?;

    let left = gen_expression(compiler, &binary.left)?;
    let left = coerce(compiler, left, ScalarType::Bool)?
        .value
        .into_int_value();

    let (rhs_name, end_name) = if is_and {
        ("and.rhs", "and.end")
    } else {
        ("or.rhs", "or.end")
    };
    let rhs_block = compiler.context.append_basic_block(function, rhs_name);
    let end_block = compiler.context.append_basic_block(function, end_name);

    if is_and {
        compiler
            .builder
            .build_conditional_branch(left, rhs_block, end_block)?;
    } else {
        compiler
            .builder
            .build_conditional_branch(left, end_block, rhs_block)?;
    }

    compiler.builder.position_at_end(rhs_block);
    let right = gen_expression(compiler, &binary.right)?;
    let right = coerce(compiler, right, ScalarType::Bool)?;
    compiler.builder.build_store(slot, right.value)?;
    compiler.builder.build_unconditional_branch(end_block)?;

    compiler.builder.position_at_end(end_block);
    let value = compiler.builder.build_load(slot, "logic.value")?;
    Ok(TypedValue::new(value, ScalarType::Bool))
}

fn gen_assignment<'ctx>(
    compiler: &mut Compiler<'ctx>,
    binary: &BinaryExpr,
) -> Result<TypedValue<'ctx>, Error> {
    let Node::Ident(target) = binary.left.as_ref() else {
        gen_expression(compiler, &binary.right)?;
        compiler.diagnose(ErrorImpl::InvalidAssignmentTarget, 0);
        return Ok(zero(compiler, ScalarType::Int));
    };

    let value = gen_expression(compiler, &binary.right)?;

    let Some(binding) = compiler.lookup(&target.value) else {
        compiler.diagnose(
            ErrorImpl::AssignmentToUndeclared {
                variable: target.value.clone(),
            },
            target.line,
        );
        return Ok(zero(compiler, ScalarType::Int));
    };

    let value = coerce(compiler, value, binding.ty)?;

    if binding.constant {
        compiler.diagnose(
            ErrorImpl::AssignmentToConstant {
                variable: target.value.clone(),
            },
            target.line,
        );
        return Ok(value);
    }

    compiler.builder.build_store(binding.ptr, value.value)?;
    Ok(value)
}

/// Calls a function defined earlier in the module, coercing each argument to
/// its parameter's kind.
fn gen_call<'ctx>(compiler: &mut Compiler<'ctx>, call: &CallExpr) -> Result<TypedValue<'ctx>, Error> {
    let callee = &call.callee;

    let Some(function) = compiler.module.get_function(&callee.value) else {
        compiler.diagnose(
            ErrorImpl::FunctionNotDeclared {
                function: callee.value.clone(),
            },
            callee.line,
        );
        return Ok(zero(compiler, ScalarType::Int));
    };

    let return_type = function
        .get_type()
        .get_return_type()
        .and_then(ScalarType::from_basic_type);
    let params = function.get_params();

    if call.args.len() != params.len() {
        let (expected, received) = (params.len(), call.args.len());
        let error = if received > expected {
            ErrorImpl::UnexpectedArguments { expected, received }
        } else {
            ErrorImpl::MissingArguments { expected, received }
        };
        compiler.diagnose(error, callee.line);
        return Ok(zero(compiler, return_type.unwrap_or(ScalarType::Int)));
    }

    let mut args: Vec<BasicMetadataValueEnum<'ctx>> = vec![];
    for (arg, param) in call.args.iter().zip(params.iter()) {
        let value = gen_expression(compiler, arg)?;
        let target = ScalarType::from_basic_type(param.get_type()).unwrap_or(value.ty);
        args.push(coerce(compiler, value, target)?.value.into());
    }

    let name = if return_type.is_some() { "call" } else { "" };
    let result = compiler.builder.build_call(function, &args, name)?;

    match (result.try_as_basic_value().left(), return_type) {
        (Some(value), Some(ty)) => Ok(TypedValue::new(value, ty)),
        _ => Ok(zero(compiler, ScalarType::Int)),
    }
}
