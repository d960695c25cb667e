//! Brace item lists.
//!
//! Statement parsing is a peer subsystem; a brace item list is the result
//! shape it produces for `{ ... }` bodies.

use crate::{DeclId, ExprId, Span};

/// One item of a brace-enclosed body.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BraceItem {
    Decl(DeclId),
    Expr(ExprId),
    Return { span: Span, value: Option<ExprId> },
}

/// A `{ ... }` body.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct BraceItemList {
    pub items: Vec<BraceItem>,
    pub lbrace: Span,
    pub rbrace: Span,
}

impl BraceItemList {
    pub fn new(lbrace: Span, items: Vec<BraceItem>, rbrace: Span) -> Self {
        BraceItemList {
            items,
            lbrace,
            rbrace,
        }
    }

    pub fn span(&self) -> Span {
        self.lbrace.merge(self.rbrace)
    }
}
