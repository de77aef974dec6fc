use inkwell::{
    types::BasicTypeEnum,
    values::BasicValueEnum,
    FloatPredicate, IntPredicate,
};

use crate::{ast::ast::TypeName, errors::errors::Error};

use super::compiler::Compiler;

/// The value kinds of the language: `i32`, `f32` and `i1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Int,
    Float,
    Bool,
}

impl ScalarType {
    /// `None` for `void`.
    pub fn from_type_name(type_name: TypeName) -> Option<ScalarType> {
        match type_name {
            TypeName::Int => Some(ScalarType::Int),
            TypeName::Float => Some(ScalarType::Float),
            TypeName::Void => None,
        }
    }

    pub fn from_basic_type(basic_type: BasicTypeEnum) -> Option<ScalarType> {
        match basic_type {
            BasicTypeEnum::IntType(int_type) if int_type.get_bit_width() == 1 => {
                Some(ScalarType::Bool)
            }
            BasicTypeEnum::IntType(_) => Some(ScalarType::Int),
            BasicTypeEnum::FloatType(_) => Some(ScalarType::Float),
            _ => None,
        }
    }
}

/// An IR value together with its scalar kind.
#[derive(Debug, Clone, Copy)]
pub struct TypedValue<'ctx> {
    pub value: BasicValueEnum<'ctx>,
    pub ty: ScalarType,
}

impl<'ctx> TypedValue<'ctx> {
    pub fn new(value: BasicValueEnum<'ctx>, ty: ScalarType) -> Self {
        TypedValue { value, ty }
    }
}

/// The zero constant of a kind.
pub fn zero<'ctx>(compiler: &Compiler<'ctx>, ty: ScalarType) -> TypedValue<'ctx> {
    let value = match ty {
        ScalarType::Int => compiler.context.i32_type().const_zero().into(),
        ScalarType::Float => compiler.context.f32_type().const_zero().into(),
        ScalarType::Bool => compiler.context.bool_type().const_zero().into(),
    };

    TypedValue::new(value, ty)
}

/// Converts `value` to `target`. Numeric conversions truncate toward zero;
/// conversions to bool test against zero and bool widens to 0 or 1.
pub fn coerce<'ctx>(
    compiler: &Compiler<'ctx>,
    value: TypedValue<'ctx>,
    target: ScalarType,
) -> Result<TypedValue<'ctx>, Error> {
    if value.ty == target {
        return Ok(value);
    }

    let builder = &compiler.builder;
    let i32_type = compiler.context.i32_type();
    let f32_type = compiler.context.f32_type();

    let converted: BasicValueEnum<'ctx> = match (value.ty, target) {
        (ScalarType::Int, ScalarType::Float) => builder
            .build_signed_int_to_float(value.value.into_int_value(), f32_type, "sitofp")?
            .into(),
        (ScalarType::Float, ScalarType::Int) => builder
            .build_float_to_signed_int(value.value.into_float_value(), i32_type, "fptosi")?
            .into(),
        (ScalarType::Int, ScalarType::Bool) => builder
            .build_int_compare(
                IntPredicate::NE,
                value.value.into_int_value(),
                i32_type.const_zero(),
                "tobool",
            )?
            .into(),
        (ScalarType::Bool, ScalarType::Int) => builder
            .build_int_z_extend(value.value.into_int_value(), i32_type, "zext")?
            .into(),
        (ScalarType::Float, ScalarType::Bool) => builder
            .build_float_compare(
                FloatPredicate::UNE,
                value.value.into_float_value(),
                f32_type.const_zero(),
                "tobool",
            )?
            .into(),
        (ScalarType::Bool, ScalarType::Float) => builder
            .build_unsigned_int_to_float(value.value.into_int_value(), f32_type, "uitofp")?
            .into(),
        _ => value.value,
    };

    Ok(TypedValue::new(converted, target))
}
