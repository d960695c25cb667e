//! Core IR for the Vela front-end.
//!
//! Spans, interned names, tokens, declaration/type/pattern/expression AST
//! nodes, and the arena that owns them.

pub mod arena;
pub mod ast;
pub mod attr;
mod interner;
mod name;
mod span;
mod token;

pub use arena::{BraceItemListId, DeclArena, DeclContextId, DeclId, ExprId, PatternId, TypeReprId};
pub use interner::StringInterner;
pub use name::Name;
pub use span::Span;
pub use token::{Token, TokenFlags, TokenKind, TokenList, TokenTag};
