//! Attribute parsing and validation tests.

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{DeclKind, TypeReprKind};
use vela_ir::attr::{AbstractCC, DeclAttrKind, Ownership, TypeAttrKind};

use super::{assert_clean, codes, find_decl, parse, parse_with};
use crate::ParserOptions;

/// Find the attributes of the first `Var` declaration.
fn var_attrs(output: &crate::ParseOutput) -> vela_ir::attr::DeclAttributes {
    let var = find_decl(output, |k| matches!(k, DeclKind::Var { .. })).expect("var decl");
    output.arena.decl(var).attrs.clone()
}

/// Find the first `Attributed` type in the arena.
fn attributed_type(output: &crate::ParseOutput) -> Option<vela_ir::attr::TypeAttributes> {
    // Reach type reprs through the bindings' annotations.
    let mut result = None;
    for id in output.arena.decl_ids() {
        if let DeclKind::PatternBinding { pattern, .. } = output.arena.decl(id).kind {
            if let Some(ty) = output.arena.pattern(pattern).type_annotation() {
                if let TypeReprKind::Attributed { attrs, .. } = &output.arena.type_repr(ty).kind {
                    result = Some(attrs.clone());
                }
            }
        }
    }
    result
}

#[test]
fn ownership_attribute_is_recorded() {
    let (output, _interner) = parse("class C { @weak var x: Int }");
    assert_clean(&output);
    assert_eq!(var_attrs(&output).ownership(), Ownership::Weak);
}

#[test]
fn duplicate_attribute_keeps_first_location() {
    let (output, _interner) = parse("class C { @weak @weak var x: Int }");
    assert!(codes(&output).contains(&ErrorCode::E1014));

    let attrs = var_attrs(&output);
    assert_eq!(attrs.ownership(), Ownership::Weak);
    // First spelling's location survives.
    let loc = attrs.location_of(DeclAttrKind::Weak).expect("weak location");
    assert_eq!(loc.start, "class C { @".len() as u32);
}

#[test]
fn conflicting_ownership_clears_newcomer() {
    let (output, _interner) = parse("class C { @weak @unowned var x: Int }");
    assert!(codes(&output).contains(&ErrorCode::E1014));

    let attrs = var_attrs(&output);
    assert_eq!(attrs.ownership(), Ownership::Weak);
    assert!(!attrs.has(DeclAttrKind::Unowned));
}

#[test]
fn prefix_postfix_conflict_clears_newer() {
    let (output, _interner) = parse("@prefix @postfix func f() {}");
    assert!(codes(&output).contains(&ErrorCode::E1015));

    let func = find_decl(&output, |k| matches!(k, DeclKind::Func { .. })).expect("func");
    let attrs = &output.arena.decl(func).attrs;
    assert!(attrs.is_prefix());
    assert!(!attrs.is_postfix());
}

#[test]
fn resilience_attributes_are_exclusive() {
    let (output, _interner) = parse("@resilient @fragile func f() {}");
    assert!(codes(&output).contains(&ErrorCode::E1014));

    let func = find_decl(&output, |k| matches!(k, DeclKind::Func { .. })).expect("func");
    let attrs = &output.arena.decl(func).attrs;
    assert_eq!(attrs.resilience(), vela_ir::attr::Resilience::Resilient);
}

#[test]
fn unknown_attribute_recovers_past_value_tail() {
    let (output, _interner) = parse("class C { @bogus=3 var x: Int }");
    assert!(codes(&output).contains(&ErrorCode::E1011));
    // The var still parses.
    assert!(find_decl(&output, |k| matches!(k, DeclKind::Var { .. })).is_some());
}

#[test]
fn type_attribute_on_decl_is_wrong_kind() {
    let (output, _interner) = parse("class C { @inout var x: Int }");
    assert!(codes(&output).contains(&ErrorCode::E1012));
}

#[test]
fn decl_attribute_on_type_is_wrong_kind() {
    let (output, _interner) = parse("class C { var x: @weak Int }");
    assert!(codes(&output).contains(&ErrorCode::E1013));
}

#[test]
fn comma_separated_attribute_list() {
    let (output, _interner) = parse("@resilient, @noreturn func f() {}");
    assert_clean(&output);

    let func = find_decl(&output, |k| matches!(k, DeclKind::Func { .. })).expect("func");
    let attrs = &output.arena.decl(func).attrs;
    assert!(attrs.has(DeclAttrKind::Resilient));
    assert!(attrs.has(DeclAttrKind::NoReturn));
}

#[test]
fn asmname_requires_equals() {
    let (output, _interner) = parse("@asmname func f() {}");
    assert!(codes(&output).contains(&ErrorCode::E1016));

    let func = find_decl(&output, |k| matches!(k, DeclKind::Func { .. })).expect("func");
    assert!(!output.arena.decl(func).attrs.has(DeclAttrKind::AsmName));
}

#[test]
fn asmname_rejects_interpolated_string() {
    let (output, _interner) = parse(r#"@asmname="a\(b)" func f() {}"#);
    assert!(codes(&output).contains(&ErrorCode::E1018));

    let func = find_decl(&output, |k| matches!(k, DeclKind::Func { .. })).expect("func");
    let attrs = &output.arena.decl(func).attrs;
    assert!(!attrs.has(DeclAttrKind::AsmName));
    assert!(attrs.asm_name.is_none());
}

#[test]
fn cc_attribute_with_known_convention() {
    let (output, _interner) = parse("var x: @cc(cdecl) () -> Int");
    assert_clean(&output);

    let attrs = attributed_type(&output).expect("attributed type");
    assert!(attrs.has(TypeAttrKind::Cc));
    assert_eq!(attrs.cc, Some(AbstractCC::C));
}

#[test]
fn cc_attribute_unknown_convention_clears() {
    let (output, _interner) = parse("var x: @cc(banana) () -> Int");
    assert!(codes(&output).contains(&ErrorCode::E1022));

    let attrs = attributed_type(&output).expect("attributed type");
    assert!(!attrs.has(TypeAttrKind::Cc));
    assert!(attrs.cc.is_none());
}

#[test]
fn inout_and_auto_closure_are_exclusive() {
    let (output, _interner) = parse("var x: @inout @auto_closure Int");
    assert!(codes(&output).contains(&ErrorCode::E1015));

    let attrs = attributed_type(&output).expect("attributed type");
    assert!(attrs.has(TypeAttrKind::Inout));
    assert!(!attrs.has(TypeAttrKind::AutoClosure));
}

#[test]
fn sil_attributes_require_sil_mode() {
    let (output, _interner) = parse("var x: @sil_weak Int");
    assert!(codes(&output).contains(&ErrorCode::E1023));

    let attrs = attributed_type(&output).expect("attributed type");
    assert!(!attrs.has(TypeAttrKind::SilWeak));
}

#[test]
fn sil_mode_unlocks_sil_attributes() {
    let options = ParserOptions {
        sil_mode: true,
        ..Default::default()
    };
    let (output, _interner) = parse_with("var x: @sil_weak Int", options);
    assert_clean(&output);

    let attrs = attributed_type(&output).expect("attributed type");
    assert!(attrs.has(TypeAttrKind::SilWeak));
    assert_eq!(attrs.ownership(), Ownership::Weak);
}

#[test]
fn import_rejects_other_attributes() {
    let (output, _interner) = parse("@noreturn import Foo");
    assert!(codes(&output).contains(&ErrorCode::E1030));
}

#[test]
fn operator_decl_rejects_attributes() {
    let (output, _interner) = parse("@noreturn operator infix <+> { }");
    assert!(codes(&output).contains(&ErrorCode::E1090));
}
