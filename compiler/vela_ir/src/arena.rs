//! Arena ownership for AST nodes.
//!
//! The arena owns every node; the rest of the compiler refers to nodes by
//! typed 32-bit ids. Nodes are never freed individually — their lifetime is
//! the arena's.

use crate::ast::{
    BraceItemList, Decl, DeclContext, DeclContextKind, Expr, Pattern, TypeRepr,
};
use crate::Name;

macro_rules! define_arena_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                $name(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_arena_id!(
    /// Id of a declaration node.
    DeclId
);
define_arena_id!(
    /// Id of an expression node.
    ExprId
);
define_arena_id!(
    /// Id of a pattern node.
    PatternId
);
define_arena_id!(
    /// Id of a type representation node.
    TypeReprId
);
define_arena_id!(
    /// Id of a brace item list.
    BraceItemListId
);
define_arena_id!(
    /// Id of a declaration context.
    DeclContextId
);

/// Arena owning all AST nodes of one parse.
#[derive(Debug, Default)]
pub struct DeclArena {
    decls: Vec<Decl>,
    exprs: Vec<Expr>,
    patterns: Vec<Pattern>,
    type_reprs: Vec<TypeRepr>,
    brace_lists: Vec<BraceItemList>,
    contexts: Vec<DeclContext>,
}

impl DeclArena {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Declarations ---

    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId::from_raw(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    #[inline]
    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.index()]
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    /// Iterate over all declaration ids in allocation order.
    pub fn decl_ids(&self) -> impl Iterator<Item = DeclId> {
        (0..self.decls.len() as u32).map(DeclId::from_raw)
    }

    // --- Expressions ---

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::from_raw(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    // --- Patterns ---

    pub fn alloc_pattern(&mut self, pattern: Pattern) -> PatternId {
        let id = PatternId::from_raw(self.patterns.len() as u32);
        self.patterns.push(pattern);
        id
    }

    #[inline]
    pub fn pattern(&self, id: PatternId) -> &Pattern {
        &self.patterns[id.index()]
    }

    #[inline]
    pub fn pattern_mut(&mut self, id: PatternId) -> &mut Pattern {
        &mut self.patterns[id.index()]
    }

    // --- Type representations ---

    pub fn alloc_type_repr(&mut self, ty: TypeRepr) -> TypeReprId {
        let id = TypeReprId::from_raw(self.type_reprs.len() as u32);
        self.type_reprs.push(ty);
        id
    }

    #[inline]
    pub fn type_repr(&self, id: TypeReprId) -> &TypeRepr {
        &self.type_reprs[id.index()]
    }

    // --- Brace item lists ---

    pub fn alloc_brace_list(&mut self, list: BraceItemList) -> BraceItemListId {
        let id = BraceItemListId::from_raw(self.brace_lists.len() as u32);
        self.brace_lists.push(list);
        id
    }

    #[inline]
    pub fn brace_list(&self, id: BraceItemListId) -> &BraceItemList {
        &self.brace_lists[id.index()]
    }

    // --- Declaration contexts ---

    pub fn alloc_context(&mut self, context: DeclContext) -> DeclContextId {
        let id = DeclContextId::from_raw(self.contexts.len() as u32);
        self.contexts.push(context);
        id
    }

    #[inline]
    pub fn context(&self, id: DeclContextId) -> &DeclContext {
        &self.contexts[id.index()]
    }

    #[inline]
    pub fn context_mut(&mut self, id: DeclContextId) -> &mut DeclContext {
        &mut self.contexts[id.index()]
    }

    /// Check whether a context is at module scope.
    pub fn is_module_scope(&self, id: DeclContextId) -> bool {
        matches!(self.context(id).kind, DeclContextKind::SourceFile)
    }

    /// Walk outward from `id` to the nearest function-like context, if any.
    pub fn enclosing_function(&self, id: DeclContextId) -> Option<DeclContextId> {
        let mut cur = Some(id);
        while let Some(ctx_id) = cur {
            let ctx = self.context(ctx_id);
            if ctx.kind.is_function_like() {
                return Some(ctx_id);
            }
            cur = ctx.parent;
        }
        None
    }

    /// Read-then-increment the local discriminator counter for `name` in the
    /// given function-like context.
    pub fn next_discriminator(&mut self, context: DeclContextId, name: Name) -> u32 {
        let ctx = self.context_mut(context);
        let counter = ctx.discriminators.entry(name).or_insert(0);
        let value = *counter;
        *counter += 1;
        value
    }
}
