//! Boundary behaviors and error recovery.

use vela_diagnostic::{ErrorCode, FixIt};
use vela_ir::ast::DeclKind;

use super::{assert_clean, codes, find_decl, parse};

/// All fix-its attached to diagnostics with the given code.
fn fixits_for(output: &crate::ParseOutput, code: ErrorCode) -> Vec<FixIt> {
    output
        .diagnostics
        .iter()
        .filter(|d| d.code == code)
        .flat_map(|d| d.fixits.iter().cloned())
        .collect()
}

#[test]
fn empty_body_is_valid() {
    let (output, _interner) = parse("class C {}");
    assert_clean(&output);
    assert!(output.arena.decl(output.file.decls[0]).members().is_empty());
}

#[test]
fn lone_rbrace_at_top_level_is_consumed() {
    let (output, _interner) = parse("} class C {}");
    assert_eq!(codes(&output), vec![ErrorCode::E1004]);
    assert!(matches!(
        fixits_for(&output, ErrorCode::E1004).as_slice(),
        [FixIt::Remove { .. }]
    ));
    // Parsing continued.
    assert!(find_decl(&output, |k| matches!(k, DeclKind::Class { .. })).is_some());
}

#[test]
fn destructor_parameters_get_removal_fixit() {
    let (output, _interner) = parse("class C { destructor(x: Int) { } }");
    assert!(codes(&output).contains(&ErrorCode::E1077));
    assert!(matches!(
        fixits_for(&output, ErrorCode::E1077).as_slice(),
        [FixIt::Remove { .. }]
    ));
    // The destructor node survives with an emptied parameter tuple.
    assert!(find_decl(&output, |k| matches!(k, DeclKind::Destructor { .. })).is_some());
}

#[test]
fn destructor_missing_parens_gets_insertion_fixit() {
    let (output, _interner) = parse("class C { destructor { } }");
    assert!(codes(&output).contains(&ErrorCode::E1078));
    let fixits = fixits_for(&output, ErrorCode::E1078);
    assert!(
        matches!(fixits.as_slice(), [FixIt::Insert { text, .. }] if text == "()"),
        "expected insert-\"()\" fix-it, got {fixits:?}"
    );
}

#[test]
fn global_static_func_gets_removal_fixit() {
    let (output, _interner) = parse("static func f() {}");
    assert!(codes(&output).contains(&ErrorCode::E1042));
    assert!(matches!(
        fixits_for(&output, ErrorCode::E1042).as_slice(),
        [FixIt::Remove { .. }]
    ));

    // The function parses, un-static.
    let func = find_decl(&output, |k| matches!(k, DeclKind::Func { .. })).expect("func");
    assert!(matches!(
        output.arena.decl(func).kind,
        DeclKind::Func {
            static_span: None,
            ..
        }
    ));
}

#[test]
fn static_subscript_gets_removal_fixit() {
    let (output, _interner) =
        parse("class C { static subscript(i: Int) -> Int { get: return 1 } }");
    assert!(codes(&output).contains(&ErrorCode::E1080));
    assert!(matches!(
        fixits_for(&output, ErrorCode::E1080).as_slice(),
        [FixIt::Remove { .. }]
    ));
}

#[test]
fn same_line_members_need_semicolon() {
    let (output, _interner) = parse("class C { var a: Int var b: Int }");
    assert!(codes(&output).contains(&ErrorCode::E1047));
    let fixits = fixits_for(&output, ErrorCode::E1047);
    assert!(
        matches!(fixits.as_slice(), [FixIt::Insert { text, .. }] if text == ";"),
        "expected insert-';' fix-it, got {fixits:?}"
    );
}

#[test]
fn semicolon_separated_members_on_one_line() {
    let (output, _interner) = parse("class C { var a: Int; var b: Int }");
    assert_clean(&output);
}

#[test]
fn unhandled_static_is_diagnosed_with_fixit() {
    let (output, _interner) = parse("static import Foo");
    assert!(codes(&output).contains(&ErrorCode::E1041));
    assert!(matches!(
        fixits_for(&output, ErrorCode::E1041).as_slice(),
        [FixIt::Remove { .. }]
    ));
}

#[test]
fn keyword_as_decl_name_synthesizes_sentinel() {
    let (output, interner) = parse("struct class {}");
    assert!(codes(&output).contains(&ErrorCode::E1002));

    // Recovery synthesized `class#`, which cannot be spelled in source.
    let decl = find_decl(&output, |k| matches!(k, DeclKind::Struct { .. })).expect("struct");
    let DeclKind::Struct { name, .. } = &output.arena.decl(decl).kind else {
        unreachable!();
    };
    assert_eq!(interner.lookup(*name), "class#");
}

#[test]
fn case_outside_enum_is_rejected() {
    let (output, _interner) = parse("struct S { case A }");
    assert!(codes(&output).contains(&ErrorCode::E1065));
}

#[test]
fn interpolated_raw_value_is_rejected() {
    let (output, _interner) = parse(r#"enum E { case A = "x\(y)" }"#);
    assert!(codes(&output).contains(&ErrorCode::E1068));

    let element = find_decl(&output, |k| matches!(k, DeclKind::EnumElement { .. }))
        .expect("enum element");
    let DeclKind::EnumElement {
        equals, raw_value, ..
    } = &output.arena.decl(element).kind
    else {
        unreachable!();
    };
    // The equals location is kept; the non-literal value is dropped.
    assert!(equals.is_some());
    assert!(raw_value.is_none());
}

#[test]
fn case_comma_case_is_diagnosed() {
    let (output, _interner) = parse("enum E { case A, case B }");
    assert!(codes(&output).contains(&ErrorCode::E1067));
}

#[test]
fn init_outside_type_is_invalid() {
    let (output, _interner) = parse("init() { }");
    assert!(codes(&output).contains(&ErrorCode::E1075));

    let ctor = find_decl(&output, |k| matches!(k, DeclKind::Constructor { .. }))
        .expect("constructor node still built");
    assert!(output.arena.decl(ctor).invalid);
}

#[test]
fn destructor_outside_class_is_invalid() {
    let (output, _interner) = parse("struct S { destructor() { } }");
    assert!(codes(&output).contains(&ErrorCode::E1076));

    let dtor =
        find_decl(&output, |k| matches!(k, DeclKind::Destructor { .. })).expect("destructor");
    assert!(output.arena.decl(dtor).invalid);
}

#[test]
fn operator_decl_inside_type_is_rejected() {
    let (output, _interner) = parse("class C { operator infix <+> { } }");
    assert!(codes(&output).contains(&ErrorCode::E1093));
}

#[test]
fn nested_extension_is_invalid() {
    let (output, _interner) = parse("class C { extension Foo {} }");
    assert!(codes(&output).contains(&ErrorCode::E1005));

    let ext = find_decl(&output, |k| matches!(k, DeclKind::Extension { .. })).expect("extension");
    assert!(output.arena.decl(ext).invalid);
}

#[test]
fn func_without_body_is_diagnosed() {
    let (output, _interner) = parse("func f()");
    assert!(codes(&output).contains(&ErrorCode::E1105));
}

#[test]
fn protocol_func_body_is_rejected_and_skipped() {
    let (output, _interner) = parse("protocol P { func f() { return 1 } }");
    assert!(codes(&output).contains(&ErrorCode::E1106));
    // Recovery consumed the body; the protocol closed cleanly.
    assert_eq!(output.file.decls.len(), 1);
}

#[test]
fn postfix_exclaim_operator_is_reserved() {
    let (output, _interner) = parse("operator postfix ! { }");
    assert!(codes(&output).contains(&ErrorCode::E1092));
}

#[test]
fn errors_do_not_stop_sibling_parsing() {
    let (output, _interner) = parse("func {\nclass C {}\nenum E { case A }");
    assert!(output.has_errors());
    assert!(find_decl(&output, |k| matches!(k, DeclKind::Class { .. })).is_some());
    assert!(find_decl(&output, |k| matches!(k, DeclKind::Enum { .. })).is_some());
}

#[test]
fn member_error_recovers_to_next_member() {
    let (output, _interner) = parse("class C { func\n var ok: Int }");
    assert!(output.has_errors());
    let var = find_decl(&output, |k| matches!(k, DeclKind::Var { .. }));
    assert!(var.is_some(), "sibling member was not recovered");
}
