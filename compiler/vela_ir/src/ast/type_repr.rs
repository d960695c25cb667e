//! Type representation nodes.
//!
//! Type parsing is a peer subsystem of the declaration parser; these nodes
//! fix its result shape.

use crate::attr::TypeAttributes;
use crate::{Name, Span, TypeReprId};

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeReprKind {
    /// A (possibly dotted) type identifier with optional generic arguments
    /// on the last component: `Foo.Bar<Int>`.
    Named {
        components: Vec<(Name, Span)>,
        generic_args: Vec<TypeReprId>,
    },
    /// `(T, U)`
    Tuple(Vec<TypeReprId>),
    /// `T -> U`
    Function { arg: TypeReprId, ret: TypeReprId },
    /// `@attrs T`
    Attributed {
        attrs: TypeAttributes,
        inner: TypeReprId,
    },
    /// Placeholder after a parse error.
    Error,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeRepr {
    pub kind: TypeReprKind,
    pub span: Span,
}

impl TypeRepr {
    pub fn new(kind: TypeReprKind, span: Span) -> Self {
        TypeRepr { kind, span }
    }

    /// Build a simple one-component named type.
    pub fn simple(name: Name, span: Span) -> Self {
        TypeRepr {
            kind: TypeReprKind::Named {
                components: vec![(name, span)],
                generic_args: Vec::new(),
            },
            span,
        }
    }
}
