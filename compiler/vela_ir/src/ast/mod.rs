//! AST node definitions.

mod context;
mod decl;
mod expr;
mod pattern;
mod stmt;
mod type_repr;

pub use context::{DeclContext, DeclContextKind};
pub use decl::{
    AccessorBlock, Associativity, Decl, DeclKind, FuncBody, GenericParam, GenericParams,
    ImportKind, InfixData, OperatorFixity,
};
pub use expr::{Expr, ExprKind};
pub use pattern::{collect_bound_vars, walk_pattern, Pattern, PatternKind, PatternVisitor};
pub use stmt::{BraceItem, BraceItemList};
pub use type_repr::{TypeRepr, TypeReprKind};

use crate::{DeclContextId, DeclId};

/// Parse progress of a source file.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum AstStage {
    #[default]
    Unparsed,
    Parsing,
    Parsed,
}

/// The root a parse attaches declarations to.
#[derive(Debug)]
pub struct SourceFile {
    /// The module-scope declaration context.
    pub context: DeclContextId,
    /// Top-level declarations in source order.
    pub decls: Vec<DeclId>,
    pub stage: AstStage,
}

impl SourceFile {
    pub fn new(context: DeclContextId) -> Self {
        SourceFile {
            context,
            decls: Vec::new(),
            stage: AstStage::Unparsed,
        }
    }
}
