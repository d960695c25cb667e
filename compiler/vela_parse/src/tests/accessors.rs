//! Computed variable and subscript accessor tests.

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{BraceItem, DeclKind, ExprKind, PatternKind};
use vela_ir::DeclId;

use super::{assert_clean, codes, find_decl, parse};

/// Dig the setter's value-parameter name out of an accessor function.
fn setter_value_name(output: &crate::ParseOutput, setter: DeclId) -> vela_ir::Name {
    let DeclKind::Func { arg_params, .. } = &output.arena.decl(setter).kind else {
        panic!("expected accessor func");
    };
    let tuple = *arg_params.last().expect("value clause");
    let PatternKind::Tuple { elements, .. } = &output.arena.pattern(tuple).kind else {
        panic!("expected tuple parameter clause");
    };
    let PatternKind::Typed { sub, .. } = &output.arena.pattern(elements[0]).kind else {
        panic!("expected typed value pattern");
    };
    let PatternKind::Named { name, .. } = &output.arena.pattern(*sub).kind else {
        panic!("expected named value pattern");
    };
    *name
}

#[test]
fn computed_var_with_getter_and_setter() {
    let (output, interner) = parse("class C { var x: Int { get: return 1 set(v): self.x = v } }");
    assert_clean(&output);

    let var = find_decl(&output, |k| {
        matches!(k, DeclKind::Var { accessors: Some(_), .. })
    })
    .expect("computed var");
    let DeclKind::Var { accessors, .. } = &output.arena.decl(var).kind else {
        unreachable!();
    };
    let block = (*accessors).expect("accessor block");

    // Getter returns 1.
    let getter = block.get.expect("getter");
    let DeclKind::Func { body, ret, .. } = &output.arena.decl(getter).kind else {
        panic!("expected getter func");
    };
    assert!(ret.is_some());
    let items = &output.arena.brace_list(body.brace_list().expect("body")).items;
    assert_eq!(items.len(), 1);
    let BraceItem::Return { value: Some(value), .. } = items[0] else {
        panic!("expected return item");
    };
    assert!(matches!(output.arena.expr(value).kind, ExprKind::IntLit(1)));

    // Setter parameter is named 'v'.
    let setter = block.set.expect("setter");
    assert_eq!(interner.lookup(setter_value_name(&output, setter)), "v");

    // Setter body is `self.x = v`.
    let DeclKind::Func { body, ret, .. } = &output.arena.decl(setter).kind else {
        unreachable!();
    };
    assert!(ret.is_none());
    let items = &output.arena.brace_list(body.brace_list().expect("body")).items;
    assert_eq!(items.len(), 1);
    let BraceItem::Expr(expr) = items[0] else {
        panic!("expected expression item");
    };
    assert!(matches!(
        output.arena.expr(expr).kind,
        ExprKind::Assign { .. }
    ));
}

#[test]
fn setter_parameter_defaults_to_value() {
    let (output, interner) = parse("class C { var x: Int { get: return 1 set: self.x = 1 } }");
    assert_clean(&output);

    let var = find_decl(&output, |k| {
        matches!(k, DeclKind::Var { accessors: Some(_), .. })
    })
    .expect("computed var");
    let DeclKind::Var { accessors, .. } = &output.arena.decl(var).kind else {
        unreachable!();
    };
    let setter = (*accessors).expect("block").set.expect("setter");
    assert_eq!(interner.lookup(setter_value_name(&output, setter)), "value");
}

#[test]
fn implicit_getter_without_keyword() {
    let (output, _interner) = parse("class C { var x: Int { return 1 } }");
    assert_clean(&output);

    let var = find_decl(&output, |k| {
        matches!(k, DeclKind::Var { accessors: Some(_), .. })
    })
    .expect("computed var");
    let DeclKind::Var { accessors, .. } = &output.arena.decl(var).kind else {
        unreachable!();
    };
    let block = (*accessors).expect("accessor block");
    assert!(block.get.is_some());
    assert!(block.set.is_none());
}

#[test]
fn accessors_are_emitted_in_source_order() {
    let (output, _interner) = parse("class C { var x: Int { set(v): self.x = v get: return 1 } }");
    assert_clean(&output);

    let class = output.arena.decl(output.file.decls[0]);
    let members = class.members();
    // binding, setter, getter, var: accessors ordered by starting location.
    let accessor_spans: Vec<u32> = members
        .iter()
        .filter(|&&id| {
            matches!(
                output.arena.decl(id).kind,
                DeclKind::Func {
                    name: vela_ir::Name::EMPTY,
                    ..
                }
            )
        })
        .map(|&id| output.arena.decl(id).span.start)
        .collect();
    assert_eq!(accessor_spans.len(), 2);
    assert!(accessor_spans[0] < accessor_spans[1]);
}

#[test]
fn missing_type_discards_accessor_block() {
    let (output, _interner) = parse("class C { var x { get: return 1 } }");
    assert!(codes(&output).contains(&ErrorCode::E1050));

    let var = find_decl(&output, |k| matches!(k, DeclKind::Var { .. })).expect("var");
    let DeclKind::Var { accessors, .. } = &output.arena.decl(var).kind else {
        unreachable!();
    };
    assert!(accessors.is_none(), "accessor block should be discarded");
}

#[test]
fn set_without_get_is_discarded() {
    let (output, _interner) = parse("class C { var x: Int { set(v): self.x = v } }");
    assert!(codes(&output).contains(&ErrorCode::E1056));

    let var = find_decl(&output, |k| matches!(k, DeclKind::Var { .. })).expect("var");
    let DeclKind::Var { accessors, .. } = &output.arena.decl(var).kind else {
        unreachable!();
    };
    assert!(accessors.is_none());
}

#[test]
fn duplicate_getter_diagnoses_and_keeps_last() {
    let (output, _interner) =
        parse("class C { var x: Int { get: return 1 get: return 2 } }");
    assert!(codes(&output).contains(&ErrorCode::E1052));

    // The earlier clause is forgotten; the block still has a getter.
    let var = find_decl(&output, |k| {
        matches!(k, DeclKind::Var { accessors: Some(_), .. })
    });
    assert!(var.is_some());
}

#[test]
fn subscript_with_both_accessors() {
    let (output, interner) = parse(
        "class C { subscript(i: Int) -> Int { get: return 1 set(v): self.x = v } }",
    );
    assert_clean(&output);

    let subscript =
        find_decl(&output, |k| matches!(k, DeclKind::Subscript { .. })).expect("subscript");
    let DeclKind::Subscript { get, set, .. } = &output.arena.decl(subscript).kind else {
        unreachable!();
    };
    assert!(get.is_some());
    let setter = (*set).expect("setter");
    assert_eq!(interner.lookup(setter_value_name(&output, setter)), "v");
}

#[test]
fn subscript_requires_getter() {
    let (output, _interner) =
        parse("class C { subscript(i: Int) -> Int { set(v): self.x = v } }");
    assert!(codes(&output).contains(&ErrorCode::E1082));
}

#[test]
fn subscript_outside_type_rejected() {
    let (output, _interner) = parse("subscript(i: Int) -> Int { get: return 1 }");
    assert!(codes(&output).contains(&ErrorCode::E1081));
}

#[test]
fn computed_var_disallowed_in_protocol() {
    let (output, _interner) = parse("protocol P { var x: Int { get: return 1 } }");
    assert!(codes(&output).contains(&ErrorCode::E1060));
}

#[test]
fn stored_var_disallowed_in_protocol() {
    let (output, _interner) = parse("protocol P { var x: Int }");
    assert!(codes(&output).contains(&ErrorCode::E1061));
}

#[test]
fn accessor_var_initializer_rejected() {
    let (output, _interner) = parse("class C { var x: Int { get: return 1 } = 2 }");
    assert!(codes(&output).contains(&ErrorCode::E1057));
}
