//! Expression nodes.
//!
//! The declaration parser treats expression parsing as a peer subsystem;
//! this is the small expression surface that peer exposes.

use crate::{ExprId, Name, Span};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    IntLit(u64),
    /// Bit pattern of the literal value.
    FloatLit(u64),
    StringLit { interpolated: bool },
    DeclRef(Name),
    SelfRef,
    Member { base: ExprId, name: Name },
    Assign { lhs: ExprId, rhs: ExprId },
    Paren(ExprId),
    Error,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// Whether this is syntactically a literal. Enum raw values must be.
    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::IntLit(_) | ExprKind::FloatLit(_) | ExprKind::StringLit { .. }
        )
    }

    /// Whether this is a string literal with interpolation segments.
    #[inline]
    pub fn is_interpolated_string(&self) -> bool {
        matches!(self.kind, ExprKind::StringLit { interpolated: true })
    }
}
