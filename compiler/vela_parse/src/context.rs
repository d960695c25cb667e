//! Parse flags, lexical scopes, and declaration-context management.
//!
//! Scopes and contexts are strictly LIFO regions. All entry points go
//! through closure-based helpers on `Parser`, so release runs on every exit
//! path — error returns included. A scope stack can also be *suspended*
//! into a deferred-parse record and reinstalled later.

use vela_ir::ast::{DeclContext, DeclContextKind};
use vela_ir::{DeclContextId, DeclId};

use crate::Parser;

/// Per-declaration parse flags.
///
/// These mirror the context restrictions each container imposes on the
/// declarations it parses.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct DeclParseFlags(u32);

impl DeclParseFlags {
    pub const NONE: DeclParseFlags = DeclParseFlags(0);
    /// This declaration may appear at module scope.
    pub const ALLOW_TOP_LEVEL: DeclParseFlags = DeclParseFlags(1 << 0);
    /// Parsing inside a nominal type or extension body.
    pub const HAS_CONTAINER_TYPE: DeclParseFlags = DeclParseFlags(1 << 1);
    /// No stored properties (extensions, enums, protocols).
    pub const DISALLOW_STORED_INSTANCE_VAR: DeclParseFlags = DeclParseFlags(1 << 2);
    /// No accessor-block variables (protocols).
    pub const DISALLOW_COMPUTED_VAR: DeclParseFlags = DeclParseFlags(1 << 3);
    /// Function signatures only, no bodies (protocols).
    pub const DISALLOW_FUNC_DEF: DeclParseFlags = DeclParseFlags(1 << 4);
    /// No nested nominal declarations.
    pub const DISALLOW_NOMINAL_TYPES: DeclParseFlags = DeclParseFlags(1 << 5);
    /// No `= expr` initializers on bindings.
    pub const DISALLOW_INIT: DeclParseFlags = DeclParseFlags(1 << 6);
    /// Type aliases have no right-hand side.
    pub const DISALLOW_TYPEALIAS_DEF: DeclParseFlags = DeclParseFlags(1 << 7);
    /// Treat type aliases as associated types.
    pub const IN_PROTOCOL: DeclParseFlags = DeclParseFlags(1 << 8);
    /// `case` is legal.
    pub const ALLOW_ENUM_ELEMENT: DeclParseFlags = DeclParseFlags(1 << 9);
    /// `destructor` is legal (class bodies).
    pub const ALLOW_DESTRUCTOR: DeclParseFlags = DeclParseFlags(1 << 10);

    #[inline]
    #[must_use]
    pub const fn with(self, other: DeclParseFlags) -> DeclParseFlags {
        DeclParseFlags(self.0 | other.0)
    }

    #[inline]
    #[must_use]
    pub const fn without(self, other: DeclParseFlags) -> DeclParseFlags {
        DeclParseFlags(self.0 & !other.0)
    }

    #[inline]
    pub const fn has(self, other: DeclParseFlags) -> bool {
        (self.0 & other.0) == other.0
    }
}

/// Kind tag of a lexical scope.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ScopeKind {
    Generics,
    FunctionBody,
    ConstructorBody,
    DestructorBody,
    Extension,
    StructBody,
    ClassBody,
    ProtocolBody,
    EnumBody,
}

/// A suspended scope stack, captured into a deferred-parse record.
#[derive(Clone, Debug, Default)]
pub struct CapturedScopes {
    pub(crate) scopes: Vec<ScopeKind>,
}

impl Parser<'_> {
    /// Depth of the scope stack. Sub-parsers must leave this unchanged.
    pub(crate) fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Depth of the declaration-context stack.
    pub(crate) fn context_depth(&self) -> usize {
        self.context_stack.len()
    }

    /// Run `f` inside a lexical scope of the given kind. The scope is left
    /// on every exit path.
    pub(crate) fn with_scope<T>(&mut self, kind: ScopeKind, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scopes.push(kind);
        let depth = self.scopes.len();
        let result = f(self);
        debug_assert_eq!(self.scopes.len(), depth, "scope stack depth mismatch");
        self.scopes.pop();
        result
    }

    /// The current declaration context.
    #[inline]
    pub(crate) fn current_context(&self) -> DeclContextId {
        *self
            .context_stack
            .last()
            .unwrap_or(&self.file_context)
    }

    /// Run `f` with `context` installed as the current declaration context.
    pub(crate) fn with_decl_context<T>(
        &mut self,
        context: DeclContextId,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.context_stack.push(context);
        let depth = self.context_stack.len();
        let result = f(self);
        debug_assert_eq!(self.context_stack.len(), depth, "context stack depth mismatch");
        self.context_stack.pop();
        result
    }

    /// Allocate a child context owned by `decl` and run `f` inside it.
    pub(crate) fn with_new_context<T>(
        &mut self,
        kind: DeclContextKind,
        decl: DeclId,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let parent = self.current_context();
        let context = self
            .arena
            .alloc_context(DeclContext::with_decl(kind, parent, decl));
        self.with_decl_context(context, f)
    }

    /// Suspend the scope stack into a captured record. The live stack is
    /// left untouched; the capture is a snapshot.
    pub(crate) fn capture_scopes(&self) -> CapturedScopes {
        CapturedScopes {
            scopes: self.scopes.clone(),
        }
    }

    /// Reinstall a captured scope stack for the duration of `f`.
    pub(crate) fn with_captured_scopes<T>(
        &mut self,
        captured: CapturedScopes,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved = std::mem::replace(&mut self.scopes, captured.scopes);
        let result = f(self);
        self.scopes = saved;
        result
    }

    /// Assign the local discriminator for a named declaration, when inside a
    /// function-like context. Counters are per name, dense from zero, in
    /// source order.
    pub(crate) fn set_local_discriminator(&mut self, decl: DeclId) {
        let Some(function) = self.arena.enclosing_function(self.current_context()) else {
            return;
        };
        let Some(name) = self.arena.decl(decl).name() else {
            return;
        };
        if name == vela_ir::Name::EMPTY {
            return;
        }
        let discriminator = self.arena.next_discriminator(function, name);
        self.arena.decl_mut(decl).discriminator = Some(discriminator);
    }
}

#[cfg(test)]
mod tests {
    use super::DeclParseFlags;

    #[test]
    fn flag_algebra() {
        let flags = DeclParseFlags::HAS_CONTAINER_TYPE.with(DeclParseFlags::ALLOW_ENUM_ELEMENT);
        assert!(flags.has(DeclParseFlags::HAS_CONTAINER_TYPE));
        assert!(flags.has(DeclParseFlags::ALLOW_ENUM_ELEMENT));
        assert!(!flags.has(DeclParseFlags::IN_PROTOCOL));
        let removed = flags.without(DeclParseFlags::ALLOW_ENUM_ELEMENT);
        assert!(!removed.has(DeclParseFlags::ALLOW_ENUM_ELEMENT));
    }
}
