//! Declaration and type attributes.
//!
//! Two parallel fixed vocabularies: one for declarations, one for types.
//! Each attribute records presence plus the source location where it was
//! spelled. Derived accessors expose the ownership kind, resilience kind and
//! fixity, whose members are mutually exclusive within their group.

use crate::Span;

/// Ownership of a variable or type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Ownership {
    #[default]
    None,
    Weak,
    Unowned,
}

/// Resilience of a declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Resilience {
    #[default]
    Default,
    Resilient,
    Fragile,
    BornFragile,
}

/// Calling convention named by the `cc(...)` type attribute.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AbstractCC {
    Freestanding,
    Method,
    C,
    ObjCMethod,
}

impl AbstractCC {
    /// Map a spelled calling-convention name to its kind.
    pub fn from_name(name: &str) -> Option<AbstractCC> {
        match name {
            "freestanding" => Some(AbstractCC::Freestanding),
            "method" => Some(AbstractCC::Method),
            "cdecl" => Some(AbstractCC::C),
            "objc_method" => Some(AbstractCC::ObjCMethod),
            _ => None,
        }
    }
}

macro_rules! define_attr_kinds {
    ($enum_name:ident, $count_const:ident, $( $variant:ident => $spelling:literal ),+ $(,)?) => {
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        #[repr(u8)]
        pub enum $enum_name {
            $( $variant, )+
        }

        impl $enum_name {
            /// Number of attribute kinds.
            pub const $count_const: usize = [ $( $enum_name::$variant, )+ ].len();

            /// All kinds, in declaration order.
            pub const ALL: &'static [$enum_name] = &[ $( $enum_name::$variant, )+ ];

            /// The source spelling of this attribute.
            pub const fn spelling(self) -> &'static str {
                match self {
                    $( $enum_name::$variant => $spelling, )+
                }
            }

            /// Look up an attribute kind by exact spelling.
            pub fn from_spelling(text: &str) -> Option<$enum_name> {
                match text {
                    $( $spelling => Some($enum_name::$variant), )+
                    _ => None,
                }
            }

            #[inline]
            pub const fn index(self) -> usize {
                self as usize
            }
        }
    };
}

define_attr_kinds! {
    DeclAttrKind, COUNT,
    AsmName => "asmname",
    Infix => "infix",
    Unary => "unary",
    Stdlib => "stdlib",
    Weak => "weak",
    Unowned => "unowned",
    NoReturn => "noreturn",
    Optional => "optional",
    Resilient => "resilient",
    Fragile => "fragile",
    BornFragile => "born_fragile",
    Prefix => "prefix",
    Postfix => "postfix",
    Exported => "exported",
    Objc => "objc",
    Conversion => "conversion",
    Transparent => "transparent",
}

define_attr_kinds! {
    TypeAttrKind, COUNT,
    Inout => "inout",
    AutoClosure => "auto_closure",
    NoReturn => "noreturn",
    Cc => "cc",
    LocalStorage => "local_storage",
    SilSelf => "sil_self",
    SilWeak => "sil_weak",
    SilUnowned => "sil_unowned",
    ObjcBlock => "objc_block",
    Thin => "thin",
}

/// Attributes attached to a declaration.
///
/// Presence is a per-kind location slot; the first spelling's location wins
/// on duplicates.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct DeclAttributes {
    /// Location of the first `@` in the attribute list.
    pub at_span: Option<Span>,
    locs: [Option<Span>; DeclAttrKind::COUNT],
    /// Raw content range of the `asmname` string payload.
    pub asm_name: Option<Span>,
}

impl DeclAttributes {
    #[inline]
    pub fn has(&self, kind: DeclAttrKind) -> bool {
        self.locs[kind.index()].is_some()
    }

    #[inline]
    pub fn location_of(&self, kind: DeclAttrKind) -> Option<Span> {
        self.locs[kind.index()]
    }

    /// Set an attribute. The first location wins; setting an already-present
    /// attribute keeps the original location.
    pub fn set(&mut self, kind: DeclAttrKind, span: Span) {
        let slot = &mut self.locs[kind.index()];
        if slot.is_none() {
            *slot = Some(span);
        }
    }

    pub fn clear(&mut self, kind: DeclAttrKind) {
        self.locs[kind.index()] = None;
        if matches!(kind, DeclAttrKind::AsmName) {
            self.asm_name = None;
        }
    }

    /// True if no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.locs.iter().all(Option::is_none)
    }

    /// True if any attribute was spelled.
    pub fn is_valid(&self) -> bool {
        !self.is_empty()
    }

    pub fn ownership(&self) -> Ownership {
        if self.has(DeclAttrKind::Weak) {
            Ownership::Weak
        } else if self.has(DeclAttrKind::Unowned) {
            Ownership::Unowned
        } else {
            Ownership::None
        }
    }

    pub fn has_ownership(&self) -> bool {
        !matches!(self.ownership(), Ownership::None)
    }

    pub fn resilience(&self) -> Resilience {
        if self.has(DeclAttrKind::Resilient) {
            Resilience::Resilient
        } else if self.has(DeclAttrKind::Fragile) {
            Resilience::Fragile
        } else if self.has(DeclAttrKind::BornFragile) {
            Resilience::BornFragile
        } else {
            Resilience::Default
        }
    }

    pub fn is_prefix(&self) -> bool {
        self.has(DeclAttrKind::Prefix)
    }

    pub fn is_postfix(&self) -> bool {
        self.has(DeclAttrKind::Postfix)
    }

    pub fn is_exported(&self) -> bool {
        self.has(DeclAttrKind::Exported)
    }
}

/// Attributes attached to a type representation.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct TypeAttributes {
    /// Location of the first `@` in the attribute list.
    pub at_span: Option<Span>,
    locs: [Option<Span>; TypeAttrKind::COUNT],
    /// Calling convention named by `cc(...)`.
    pub cc: Option<AbstractCC>,
}

impl TypeAttributes {
    #[inline]
    pub fn has(&self, kind: TypeAttrKind) -> bool {
        self.locs[kind.index()].is_some()
    }

    #[inline]
    pub fn location_of(&self, kind: TypeAttrKind) -> Option<Span> {
        self.locs[kind.index()]
    }

    /// Set an attribute. The first location wins.
    pub fn set(&mut self, kind: TypeAttrKind, span: Span) {
        let slot = &mut self.locs[kind.index()];
        if slot.is_none() {
            *slot = Some(span);
        }
    }

    pub fn clear(&mut self, kind: TypeAttrKind) {
        self.locs[kind.index()] = None;
        if matches!(kind, TypeAttrKind::Cc) {
            self.cc = None;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.locs.iter().all(Option::is_none)
    }

    pub fn is_valid(&self) -> bool {
        !self.is_empty()
    }

    /// Ownership from the SIL-level ownership attributes.
    pub fn ownership(&self) -> Ownership {
        if self.has(TypeAttrKind::SilWeak) {
            Ownership::Weak
        } else if self.has(TypeAttrKind::SilUnowned) {
            Ownership::Unowned
        } else {
            Ownership::None
        }
    }

    pub fn has_ownership(&self) -> bool {
        !matches!(self.ownership(), Ownership::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_location_wins() {
        let mut attrs = DeclAttributes::default();
        attrs.set(DeclAttrKind::Weak, Span::new(1, 5));
        attrs.set(DeclAttrKind::Weak, Span::new(9, 13));
        assert_eq!(attrs.location_of(DeclAttrKind::Weak), Some(Span::new(1, 5)));
    }

    #[test]
    fn ownership_derivation() {
        let mut attrs = DeclAttributes::default();
        assert_eq!(attrs.ownership(), Ownership::None);
        attrs.set(DeclAttrKind::Unowned, Span::DUMMY);
        assert_eq!(attrs.ownership(), Ownership::Unowned);
        attrs.clear(DeclAttrKind::Unowned);
        attrs.set(DeclAttrKind::Weak, Span::DUMMY);
        assert_eq!(attrs.ownership(), Ownership::Weak);
    }

    #[test]
    fn spelling_round_trip() {
        for &kind in DeclAttrKind::ALL {
            assert_eq!(DeclAttrKind::from_spelling(kind.spelling()), Some(kind));
        }
        for &kind in TypeAttrKind::ALL {
            assert_eq!(TypeAttrKind::from_spelling(kind.spelling()), Some(kind));
        }
    }

    #[test]
    fn clearing_asmname_drops_payload() {
        let mut attrs = DeclAttributes::default();
        attrs.set(DeclAttrKind::AsmName, Span::new(0, 7));
        attrs.asm_name = Some(Span::new(9, 16));
        attrs.clear(DeclAttrKind::AsmName);
        assert!(attrs.asm_name.is_none());
        assert!(attrs.is_empty());
    }
}
