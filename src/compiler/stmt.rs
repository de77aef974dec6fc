use inkwell::{
    types::{BasicMetadataTypeEnum, BasicType},
    values::FunctionValue,
    AddressSpace,
};

use crate::{
    ast::ast::{FuncDef, IfStmt, Node, VarDecl},
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{
    compiler::{Binding, Compiler, FunctionContext},
    expr::{const_to_value, gen_expression},
    fold::{fold, ConstValue},
    types::{coerce, zero, ScalarType},
};

fn unexpected(node: &Node) -> Error {
    Error::new(
        ErrorImpl::UnexpectedNode {
            node: node.kind_name().to_string(),
        },
        Position::null(),
    )
}

fn storage_type(decl: &VarDecl) -> Result<ScalarType, Error> {
    ScalarType::from_type_name(decl.ty).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedNode {
                node: format!("void variable {}", decl.name.value),
            },
            Position::null(),
        )
    })
}

/// Lowers one top-level item: a function definition or a global declaration.
pub fn gen_item<'ctx>(compiler: &mut Compiler<'ctx>, item: &Node) -> Result<(), Error> {
    match item {
        Node::FuncDef(function) => gen_function(compiler, function),
        Node::VarDecl(decl) => gen_global(compiler, decl),
        other => Err(unexpected(other)),
    }
}

/// Emits a global whose initializer is folded at compile time.
fn gen_global<'ctx>(compiler: &mut Compiler<'ctx>, decl: &VarDecl) -> Result<(), Error> {
    let name = &decl.name.value;
    let ty = storage_type(decl)?;

    if compiler.is_global_declared(name) || compiler.module.get_function(name).is_some() {
        compiler.diagnose(
            ErrorImpl::VariableAlreadyDeclared {
                variable: name.clone(),
            },
            decl.name.line,
        );
        return Ok(());
    }

    let value = match &decl.init {
        Some(init) => fold(compiler, init, name, decl.name.line).cast(ty),
        None => ConstValue::zero(ty),
    };

    let global = compiler.module.add_global(
        compiler.convert_type(ty),
        Some(AddressSpace::default()),
        name,
    );
    global.set_initializer(&const_to_value(compiler, value, ty).value);
    global.set_constant(decl.constant);

    log::debug!("global {} = {:?}", name, value);

    compiler.record_constant(name, value);
    compiler.declare(
        name,
        Binding {
            ptr: global.as_pointer_value(),
            ty,
            constant: decl.constant,
        },
    );

    Ok(())
}

/// Lowers a function definition.
///
/// Parameters get a slot each in a fresh frame and are stored on entry. The
/// body is lowered in a nested frame. When control can fall off the end, a zero return
/// (or `ret void`) is added.
fn gen_function<'ctx>(compiler: &mut Compiler<'ctx>, function: &FuncDef) -> Result<(), Error> {
    let name = &function.name.value;

    if compiler.module.get_function(name).is_some() || compiler.is_global_declared(name) {
        compiler.diagnose(
            ErrorImpl::FunctionAlreadyDeclared {
                function: name.clone(),
            },
            function.name.line,
        );
        return Ok(());
    }

    let mut param_types = vec![];
    for param in &function.params {
        let ty = ScalarType::from_type_name(param.ty).ok_or_else(|| {
            Error::new(
                ErrorImpl::UnexpectedNode {
                    node: format!("void parameter {}", param.name.value),
                },
                Position::null(),
            )
        })?;
        param_types.push(ty);
    }

    let metadata_types = param_types
        .iter()
        .map(|ty| compiler.convert_type(*ty).into())
        .collect::<Vec<BasicMetadataTypeEnum<'ctx>>>();

    let function_type = match ScalarType::from_type_name(function.return_type) {
        Some(ty) => compiler.convert_type(ty).fn_type(&metadata_types, false),
        None => compiler.context.void_type().fn_type(&metadata_types, false),
    };

    let function_value = compiler.module.add_function(name, function_type, None);
    let entry = compiler.context.append_basic_block(function_value, "entry");
    compiler.builder.position_at_end(entry);

    compiler.set_current_function(Some(FunctionContext {
        function: function_value,
        name: name.clone(),
        line: function.name.line,
        return_type: function.return_type,
    }));
    compiler.push_scope();

    for (index, (param, ty)) in function.params.iter().zip(param_types).enumerate() {
        let slot = compiler
            .builder
            .build_alloca(compiler.convert_type(ty), &param.name.value)?;

        if let Some(value) = function_value.get_nth_param(index as u32) {
            compiler.builder.build_store(slot, value)?;
        }

        let declared = compiler.declare(
            &param.name.value,
            Binding {
                ptr: slot,
                ty,
                constant: false,
            },
        );
        if !declared {
            compiler.diagnose(
                ErrorImpl::VariableAlreadyDeclared {
                    variable: param.name.value.clone(),
                },
                param.name.line,
            );
        }
    }

    // The body gets its own frame so locals may shadow parameters.
    compiler.push_scope();
    gen_statements(compiler, &function.body)?;
    compiler.pop_scope();

    if !compiler.has_terminator() {
        match ScalarType::from_type_name(function.return_type) {
            Some(ty) => {
                let value = zero(compiler, ty).value;
                compiler.builder.build_return(Some(&value))?;
            }
            None => {
                compiler.builder.build_return(None)?;
            }
        }
    }

    compiler.pop_scope();
    compiler.set_current_function(None);

    Ok(())
}

/// Lowers statements in order, stopping once the current block is terminated.
pub fn gen_statements<'ctx>(compiler: &mut Compiler<'ctx>, statements: &[Node]) -> Result<(), Error> {
    for (index, statement) in statements.iter().enumerate() {
        if compiler.has_terminator() {
            log::trace!("skipping {} unreachable statements", statements.len() - index);
            break;
        }

        gen_statement(compiler, statement)?;
    }

    Ok(())
}

pub fn gen_statement<'ctx>(compiler: &mut Compiler<'ctx>, statement: &Node) -> Result<(), Error> {
    match statement {
        Node::VarDecl(decl) => gen_local(compiler, decl),
        Node::Block(statements) => {
            compiler.push_scope();
            let result = gen_statements(compiler, statements);
            compiler.pop_scope();
            result
        }
        Node::If(if_stmt) => gen_if(compiler, if_stmt),
        Node::Return(value) => gen_return(compiler, value.as_deref()),
        Node::Binary(_) | Node::Call(_) | Node::Number(_) | Node::Ident(_) => {
            gen_expression(compiler, statement)?;
            Ok(())
        }
        Node::CompUnit(_) | Node::FuncDef(_) => Err(unexpected(statement)),
    }
}

fn gen_local<'ctx>(compiler: &mut Compiler<'ctx>, decl: &VarDecl) -> Result<(), Error> {
    let name = &decl.name.value;
    let ty = storage_type(decl)?;

    if compiler.is_declared_in_current_scope(name) {
        compiler.diagnose(
            ErrorImpl::VariableAlreadyDeclared {
                variable: name.clone(),
            },
            decl.name.line,
        );
        return Ok(());
    }

    let slot = compiler.builder.build_alloca(compiler.convert_type(ty), name)?;
    compiler.declare(
        name,
        Binding {
            ptr: slot,
            ty,
            constant: decl.constant,
        },
    );

    if let Some(init) = &decl.init {
        let value = gen_expression(compiler, init)?;
        let value = coerce(compiler, value, ty)?;
        compiler.builder.build_store(slot, value.value)?;
    }

    Ok(())
}

fn gen_if<'ctx>(compiler: &mut Compiler<'ctx>, if_stmt: &IfStmt) -> Result<(), Error> {
    let condition = gen_expression(compiler, &if_stmt.condition)?;
    let condition = coerce(compiler, condition, ScalarType::Bool)?
        .value
        .into_int_value();

    let function = current_function(compiler)?;
    let then_block = compiler.context.append_basic_block(function, "if.then");
    let else_block = if_stmt
        .else_branch
        .as_ref()
        .map(|_| compiler.context.append_basic_block(function, "if.else"));
    let merge_block = compiler.context.append_basic_block(function, "if.end");

    compiler.builder.build_conditional_branch(
        condition,
        then_block,
        else_block.unwrap_or(merge_block),
    )?;

    compiler.builder.position_at_end(then_block);
    gen_statement(compiler, &if_stmt.then_branch)?;
    if !compiler.has_terminator() {
        compiler.builder.build_unconditional_branch(merge_block)?;
    }

    if let (Some(else_block), Some(else_branch)) = (else_block, &if_stmt.else_branch) {
        compiler.builder.position_at_end(else_block);
        gen_statement(compiler, else_branch)?;
        if !compiler.has_terminator() {
            compiler.builder.build_unconditional_branch(merge_block)?;
        }
    }

    compiler.builder.position_at_end(merge_block);
    Ok(())
}

fn gen_return<'ctx>(compiler: &mut Compiler<'ctx>, value: Option<&Node>) -> Result<(), Error> {
    let Some(context) = compiler.current_function().cloned() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedNode {
                node: String::from("Return"),
            },
            Position::null(),
        ));
    };

    match (value, ScalarType::from_type_name(context.return_type)) {
        (Some(value), Some(ty)) => {
            let value = gen_expression(compiler, value)?;
            let value = coerce(compiler, value, ty)?;
            compiler.builder.build_return(Some(&value.value))?;
        }
        (Some(value), None) => {
            gen_expression(compiler, value)?;
            compiler.diagnose(
                ErrorImpl::ReturnValueInVoidFunction {
                    function: context.name.clone(),
                },
                context.line,
            );
            compiler.builder.build_return(None)?;
        }
        (None, Some(ty)) => {
            let value = zero(compiler, ty).value;
            compiler.builder.build_return(Some(&value))?;
        }
        (None, None) => {
            compiler.builder.build_return(None)?;
        }
    }

    Ok(())
}

pub(crate) fn current_function<'ctx>(compiler: &Compiler<'ctx>) -> Result<FunctionValue<'ctx>, Error> {
    compiler
        .current_function()
        .map(|context| context.function)
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::UnexpectedNode {
                    node: String::from("statement outside of a function"),
                },
                Position::null(),
            )
        })
}

