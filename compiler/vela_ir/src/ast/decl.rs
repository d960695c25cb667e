//! Declaration nodes.
//!
//! Declarations are a tagged sum over all forms with shared fields (span,
//! attributes, owning context, discriminator) on the common record.

use crate::attr::DeclAttributes;
use crate::{
    BraceItemListId, DeclContextId, DeclId, ExprId, Name, PatternId, Span, TypeReprId,
};

/// What an `import` introduces.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ImportKind {
    Module,
    Type,
    Struct,
    Class,
    Enum,
    Protocol,
    Var,
    Func,
}

/// The accessor region of a computed variable or subscript.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct AccessorBlock {
    pub lbrace: Span,
    pub get: Option<DeclId>,
    pub set: Option<DeclId>,
    pub rbrace: Span,
}

/// Body state of a function-like declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FuncBody {
    /// No body was written (protocol requirements, SIL mode).
    None,
    /// Body parsed eagerly.
    Parsed(BraceItemListId),
    /// Body recorded for delayed parsing; `end` is the offset just past it.
    Delayed { end: u32 },
    /// Body consumed and dropped without building an AST.
    Skipped { end: u32 },
}

impl FuncBody {
    #[inline]
    pub fn brace_list(self) -> Option<BraceItemListId> {
        match self {
            FuncBody::Parsed(id) => Some(id),
            _ => None,
        }
    }
}

/// One generic type parameter.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct GenericParam {
    pub name: Name,
    pub span: Span,
    pub inherited: Vec<TypeReprId>,
}

/// An angle-bracketed generic parameter list.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct GenericParams {
    pub langle: Span,
    pub params: Vec<GenericParam>,
    pub rangle: Span,
}

/// Fixity of an operator declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OperatorFixity {
    Prefix,
    Postfix,
    Infix,
}

impl OperatorFixity {
    pub const fn as_str(self) -> &'static str {
        match self {
            OperatorFixity::Prefix => "prefix",
            OperatorFixity::Postfix => "postfix",
            OperatorFixity::Infix => "infix",
        }
    }
}

/// Associativity of an infix operator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Associativity {
    #[default]
    None,
    Left,
    Right,
}

impl Associativity {
    pub fn from_name(name: &str) -> Option<Associativity> {
        match name {
            "none" => Some(Associativity::None),
            "left" => Some(Associativity::Left),
            "right" => Some(Associativity::Right),
            _ => None,
        }
    }
}

/// Parsed attributes of an infix operator body.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct InfixData {
    pub precedence: u8,
    pub associativity: Associativity,
}

impl Default for InfixData {
    fn default() -> Self {
        InfixData {
            precedence: 100,
            associativity: Associativity::None,
        }
    }
}

/// The form-specific payload of a declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclKind {
    Import {
        kind: ImportKind,
        kind_span: Option<Span>,
        exported: bool,
        path: Vec<(Name, Span)>,
    },
    Extension {
        ty: TypeReprId,
        inherited: Vec<TypeReprId>,
        members: Vec<DeclId>,
        braces: (Span, Span),
    },
    TypeAlias {
        name: Name,
        name_span: Span,
        inherited: Vec<TypeReprId>,
        underlying: Option<TypeReprId>,
    },
    AssociatedType {
        name: Name,
        name_span: Span,
        inherited: Vec<TypeReprId>,
    },
    /// One `pattern (= initializer)?` binding of a `var` declaration.
    PatternBinding {
        static_span: Option<Span>,
        pattern: PatternId,
        init: Option<ExprId>,
    },
    /// A single variable introduced by a named pattern.
    Var {
        name: Name,
        name_span: Span,
        is_static: bool,
        accessors: Option<AccessorBlock>,
    },
    Func {
        static_span: Option<Span>,
        name: Name,
        name_span: Span,
        generics: Option<GenericParams>,
        arg_params: Vec<PatternId>,
        body_params: Vec<PatternId>,
        ret: Option<TypeReprId>,
        selector_style: bool,
        body: FuncBody,
    },
    Enum {
        name: Name,
        name_span: Span,
        generics: Option<GenericParams>,
        inherited: Vec<TypeReprId>,
        members: Vec<DeclId>,
        braces: (Span, Span),
    },
    EnumCase {
        case_span: Span,
        elements: Vec<DeclId>,
    },
    EnumElement {
        name: Name,
        name_span: Span,
        arg_type: Option<TypeReprId>,
        equals: Option<Span>,
        raw_value: Option<ExprId>,
    },
    Struct {
        name: Name,
        name_span: Span,
        generics: Option<GenericParams>,
        inherited: Vec<TypeReprId>,
        members: Vec<DeclId>,
        braces: (Span, Span),
    },
    Class {
        name: Name,
        name_span: Span,
        generics: Option<GenericParams>,
        inherited: Vec<TypeReprId>,
        members: Vec<DeclId>,
        braces: (Span, Span),
    },
    Protocol {
        name: Name,
        name_span: Span,
        inherited: Vec<TypeReprId>,
        members: Vec<DeclId>,
        braces: (Span, Span),
    },
    Constructor {
        generics: Option<GenericParams>,
        arg_pattern: PatternId,
        body_pattern: PatternId,
        self_var: DeclId,
        selector_style: bool,
        body: FuncBody,
    },
    Destructor {
        params: PatternId,
        self_var: DeclId,
        body: FuncBody,
    },
    Subscript {
        indices: PatternId,
        arrow: Span,
        element_ty: TypeReprId,
        braces: Option<(Span, Span)>,
        get: Option<DeclId>,
        set: Option<DeclId>,
    },
    Operator {
        fixity: OperatorFixity,
        name: Name,
        name_span: Span,
        braces: (Span, Span),
        infix: Option<InfixData>,
    },
    /// Executable code at the top level of a script-mode file.
    TopLevelCode { body: BraceItemListId },
}

/// A declaration node: common record plus a kind-specific payload.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Span,
    pub attrs: DeclAttributes,
    /// The lexical container this declaration was parsed in.
    pub context: DeclContextId,
    /// Disambiguates same-named declarations within an enclosing function.
    pub discriminator: Option<u32>,
    pub trailing_semi: Option<Span>,
    /// Marked invalid after a context-restriction violation; semantic
    /// analysis must not touch it.
    pub invalid: bool,
    /// Synthesized by the parser rather than spelled in source.
    pub implicit: bool,
}

impl Decl {
    pub fn new(kind: DeclKind, span: Span, context: DeclContextId) -> Self {
        Decl {
            kind,
            span,
            attrs: DeclAttributes::default(),
            context,
            discriminator: None,
            trailing_semi: None,
            invalid: false,
            implicit: false,
        }
    }

    /// The declared name, for named declaration forms.
    pub fn name(&self) -> Option<Name> {
        match &self.kind {
            DeclKind::TypeAlias { name, .. }
            | DeclKind::AssociatedType { name, .. }
            | DeclKind::Var { name, .. }
            | DeclKind::Func { name, .. }
            | DeclKind::Enum { name, .. }
            | DeclKind::EnumElement { name, .. }
            | DeclKind::Struct { name, .. }
            | DeclKind::Class { name, .. }
            | DeclKind::Protocol { name, .. }
            | DeclKind::Operator { name, .. } => Some(*name),
            _ => None,
        }
    }

    /// Child member declarations for container forms.
    pub fn members(&self) -> &[DeclId] {
        match &self.kind {
            DeclKind::Extension { members, .. }
            | DeclKind::Enum { members, .. }
            | DeclKind::Struct { members, .. }
            | DeclKind::Class { members, .. }
            | DeclKind::Protocol { members, .. } => members,
            _ => &[],
        }
    }
}
