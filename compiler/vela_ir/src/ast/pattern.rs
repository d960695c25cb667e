//! Pattern nodes and the post-order pattern walk.

use crate::arena::DeclArena;
use crate::{DeclId, Name, PatternId, Span, TypeReprId};

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum PatternKind {
    /// A name binding. Allocating the pattern also allocates its `Var`
    /// declaration; the id is recorded here.
    Named { name: Name, var: DeclId },
    /// `_`
    Any,
    /// `pattern : type`
    Typed { sub: PatternId, ty: TypeReprId },
    /// `( pattern )`
    Paren(PatternId),
    /// `( pattern, pattern, ... )`
    Tuple {
        elements: Vec<PatternId>,
        lparen: Span,
        rparen: Span,
    },
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
    pub implicit: bool,
}

impl Pattern {
    pub fn new(kind: PatternKind, span: Span) -> Self {
        Pattern {
            kind,
            span,
            implicit: false,
        }
    }

    /// The bound variable if this is (possibly through a type annotation or
    /// parens) a single-name pattern.
    pub fn single_var(&self, arena: &DeclArena) -> Option<(Name, DeclId)> {
        match &self.kind {
            PatternKind::Named { name, var } => Some((*name, *var)),
            PatternKind::Typed { sub, .. } | PatternKind::Paren(sub) => {
                arena.pattern(*sub).single_var(arena)
            }
            _ => None,
        }
    }

    /// The type annotation, if the outermost pattern is typed.
    pub fn type_annotation(&self) -> Option<TypeReprId> {
        match &self.kind {
            PatternKind::Typed { ty, .. } => Some(*ty),
            _ => None,
        }
    }
}

/// Post-order visitor over patterns.
pub trait PatternVisitor {
    fn visit_pattern_post(&mut self, id: PatternId, pattern: &Pattern);
}

/// Walk a pattern tree in post-order, invoking the visitor at each node.
pub fn walk_pattern(arena: &DeclArena, id: PatternId, visitor: &mut impl PatternVisitor) {
    // Children first. Clone the child list out so the borrow on the arena is
    // released before recursing.
    let children: Vec<PatternId> = match &arena.pattern(id).kind {
        PatternKind::Named { .. } | PatternKind::Any => Vec::new(),
        PatternKind::Typed { sub, .. } | PatternKind::Paren(sub) => vec![*sub],
        PatternKind::Tuple { elements, .. } => elements.clone(),
    };
    for child in children {
        walk_pattern(arena, child, visitor);
    }
    visitor.visit_pattern_post(id, arena.pattern(id));
}

/// Collect the `Var` declarations bound by a pattern, in source order.
pub fn collect_bound_vars(arena: &DeclArena, id: PatternId) -> Vec<DeclId> {
    struct Collect {
        vars: Vec<DeclId>,
    }
    impl PatternVisitor for Collect {
        fn visit_pattern_post(&mut self, _id: PatternId, pattern: &Pattern) {
            if let PatternKind::Named { var, .. } = pattern.kind {
                self.vars.push(var);
            }
        }
    }
    let mut collect = Collect { vars: Vec::new() };
    walk_pattern(arena, id, &mut collect);
    collect.vars
}
