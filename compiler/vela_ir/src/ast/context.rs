//! Declaration contexts.
//!
//! A declaration context is the lexical container that owns child
//! declarations: file → type / extension → nested type / function →
//! nested function. The parser maintains a stack of these; every parsed
//! declaration records the context it was parsed in.

use rustc_hash::FxHashMap;

use crate::{DeclContextId, DeclId, Name};

/// Kind of a declaration context.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclContextKind {
    /// The source file itself (module scope).
    SourceFile,
    /// A nominal type body (struct, class, enum, protocol).
    NominalType,
    /// An extension body.
    Extension,
    /// A function body, including accessor bodies.
    FunctionBody,
    /// A constructor body.
    ConstructorBody,
    /// A destructor body.
    DestructorBody,
    /// An implicit top-level-code wrapper in script mode.
    TopLevelCode,
}

impl DeclContextKind {
    /// Function-like contexts carry local discriminator tables.
    #[inline]
    pub const fn is_function_like(self) -> bool {
        matches!(
            self,
            DeclContextKind::FunctionBody
                | DeclContextKind::ConstructorBody
                | DeclContextKind::DestructorBody
        )
    }
}

/// A declaration context record, owned by the arena.
#[derive(Clone, Debug)]
pub struct DeclContext {
    pub kind: DeclContextKind,
    pub parent: Option<DeclContextId>,
    /// The declaration this context belongs to (absent for the file).
    pub decl: Option<DeclId>,
    /// Local discriminator counters, one per name declared in this
    /// function-like context.
    pub discriminators: FxHashMap<Name, u32>,
}

impl DeclContext {
    pub fn new(kind: DeclContextKind, parent: Option<DeclContextId>) -> Self {
        DeclContext {
            kind,
            parent,
            decl: None,
            discriminators: FxHashMap::default(),
        }
    }

    pub fn with_decl(kind: DeclContextKind, parent: DeclContextId, decl: DeclId) -> Self {
        DeclContext {
            kind,
            parent: Some(parent),
            decl: Some(decl),
            discriminators: FxHashMap::default(),
        }
    }
}
