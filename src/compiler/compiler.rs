//! Main compiler module.
//!
//! This module contains the core Compiler structure that lowers the syntax
//! tree into an LLVM module. It owns the LLVM module and builder, the stack
//! of scope frames, the table of folded global constants and the semantic
//! diagnostics collected along the way.

use std::{collections::HashMap, path::Path, rc::Rc};

use inkwell::{
    builder::Builder,
    context::Context,
    module::Module,
    types::BasicTypeEnum,
    values::{FunctionValue, PointerValue},
};

use crate::{
    ast::ast::{Node, TypeName},
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{fold::ConstValue, stmt::gen_item, types::ScalarType};

/// Storage a name resolves to: a stack slot, a parameter slot or a global.
#[derive(Debug, Clone, Copy)]
pub struct Binding<'ctx> {
    pub ptr: PointerValue<'ctx>,
    pub ty: ScalarType,
    pub constant: bool,
}

/// The function whose body is being lowered.
#[derive(Debug, Clone)]
pub struct FunctionContext<'ctx> {
    pub function: FunctionValue<'ctx>,
    pub name: String,
    /// Line of the function's name
    pub line: u32,
    pub return_type: TypeName,
}

/// The state of one compilation.
///
/// # Type Parameters
///
/// * `'ctx` - Lifetime of the LLVM context
pub struct Compiler<'ctx> {
    /// Reference to the LLVM context
    pub context: &'ctx Context,
    /// The LLVM module being built
    pub module: Module<'ctx>,
    /// The LLVM IR builder
    pub builder: Builder<'ctx>,

    /// Scope frames, innermost last. Frame 0 holds the globals.
    scopes: Vec<HashMap<String, Binding<'ctx>>>,
    /// Folded values of the globals declared so far
    constants: HashMap<String, ConstValue>,
    /// Semantic problems found while lowering
    diagnostics: Vec<Error>,
    /// The function currently being lowered, if any
    current_function: Option<FunctionContext<'ctx>>,
    /// Name of the source file, used in diagnostic positions
    file: Rc<String>,
}

impl<'ctx> Compiler<'ctx> {
    /// Creates a compiler with an empty module and the global frame pushed.
    ///
    /// # Arguments
    ///
    /// * `context` - Reference to the LLVM context
    /// * `module_name` - Name of the LLVM module
    /// * `file` - Name of the source file
    pub fn new(context: &'ctx Context, module_name: &str, file: Rc<String>) -> Self {
        Compiler {
            context,
            module: context.create_module(module_name),
            builder: context.create_builder(),
            scopes: vec![HashMap::new()],
            constants: HashMap::new(),
            diagnostics: vec![],
            current_function: None,
            file,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        // The global frame stays for the whole compilation.
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Binds `name` in the innermost frame.
    ///
    /// # Returns
    ///
    /// `false` if the frame already binds the name, in which case nothing changes.
    pub fn declare(&mut self, name: &str, binding: Binding<'ctx>) -> bool {
        let Some(frame) = self.scopes.last_mut() else {
            return false;
        };

        if frame.contains_key(name) {
            return false;
        }

        frame.insert(name.to_string(), binding);
        true
    }

    /// Resolves `name` from the innermost frame outwards.
    pub fn lookup(&self, name: &str) -> Option<Binding<'ctx>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .copied()
    }

    pub fn is_declared_in_current_scope(&self, name: &str) -> bool {
        self.scopes
            .last()
            .map(|frame| frame.contains_key(name))
            .unwrap_or(false)
    }

    pub fn is_global_declared(&self, name: &str) -> bool {
        self.scopes
            .first()
            .map(|frame| frame.contains_key(name))
            .unwrap_or(false)
    }

    pub fn constant(&self, name: &str) -> Option<ConstValue> {
        self.constants.get(name).copied()
    }

    pub fn record_constant(&mut self, name: &str, value: ConstValue) {
        self.constants.insert(name.to_string(), value);
    }

    /// Records a semantic diagnostic at `line`. Lowering carries on.
    pub fn diagnose(&mut self, error: ErrorImpl, line: u32) {
        let error = Error::new(error, Position(line, Rc::clone(&self.file)));
        log::warn!("{}", error);
        self.diagnostics.push(error);
    }

    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    pub fn current_function(&self) -> Option<&FunctionContext<'ctx>> {
        self.current_function.as_ref()
    }

    pub fn set_current_function(&mut self, function: Option<FunctionContext<'ctx>>) {
        self.current_function = function;
    }

    /// Whether the block the builder is positioned in already ends in a terminator.
    pub fn has_terminator(&self) -> bool {
        self.builder
            .get_insert_block()
            .and_then(|block| block.get_terminator())
            .is_some()
    }

    /// Allocates a stack slot at the top of `function`'s entry block, leaving
    /// the main builder where it is.
    pub fn build_entry_alloca(
        &self,
        function: FunctionValue<'ctx>,
        ty: BasicTypeEnum<'ctx>,
        name: &str,
    ) -> Result<PointerValue<'ctx>, Error> {
        let builder = self.context.create_builder();

        let Some(entry) = function.get_first_basic_block() else {
            return Ok(self.builder.build_alloca(ty, name)?);
        };

        match entry.get_first_instruction() {
            Some(instruction) => builder.position_before(&instruction),
            None => builder.position_at_end(entry),
        }

        Ok(builder.build_alloca(ty, name)?)
    }

    /// Converts a scalar kind to its LLVM type.
    pub fn convert_type(&self, ty: ScalarType) -> BasicTypeEnum<'ctx> {
        match ty {
            ScalarType::Int => self.context.i32_type().into(),
            ScalarType::Float => self.context.f32_type().into(),
            ScalarType::Bool => self.context.bool_type().into(),
        }
    }

    /// Runs the LLVM verifier over the module.
    pub fn verify(&self) -> Result<(), Error> {
        self.module.verify().map_err(|message| {
            Error::new(
                ErrorImpl::VerificationError {
                    message: message.to_string(),
                },
                Position::null(),
            )
        })
    }

    /// The textual IR of the module.
    pub fn print_to_string(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Writes the textual IR of the module to `path`.
    pub fn save_module_to_file(&self, path: &Path) -> Result<(), Error> {
        self.module.print_to_file(path).map_err(|message| {
            Error::new(
                ErrorImpl::BuilderError {
                    message: message.to_string(),
                },
                Position::null(),
            )
        })
    }
}

/// Lowers a compilation unit into a fresh module named `module_name`.
///
/// Semantic problems do not stop the compilation; they are available from
/// [`Compiler::diagnostics`] afterwards. Builder failures and nodes that
/// cannot appear at the top level are returned as errors.
pub fn compile<'ctx>(
    ast: &Node,
    context: &'ctx Context,
    module_name: &str,
    file: Rc<String>,
) -> Result<Compiler<'ctx>, Error> {
    let mut compiler = Compiler::new(context, module_name, file);

    let Node::CompUnit(items) = ast else {
        return Err(Error::new(
            ErrorImpl::UnexpectedNode {
                node: ast.kind_name().to_string(),
            },
            Position::null(),
        ));
    };

    for item in items {
        gen_item(&mut compiler, item)?;
    }

    log::debug!(
        "lowered {} top-level items with {} diagnostics",
        items.len(),
        compiler.diagnostics.len()
    );

    Ok(compiler)
}
