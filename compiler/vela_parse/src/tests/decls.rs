//! End-to-end declaration scenarios.

use vela_ir::ast::{
    Associativity, BraceItem, DeclKind, ExprKind, FuncBody, ImportKind, OperatorFixity,
};
use vela_ir::attr::DeclAttrKind;

use super::{assert_clean, find_decl, parse};

#[test]
fn import_module_path() {
    let (output, interner) = parse("import Foo.Bar");
    assert_clean(&output);
    assert_eq!(output.file.decls.len(), 1);

    let decl = output.arena.decl(output.file.decls[0]);
    let DeclKind::Import {
        kind,
        exported,
        path,
        ..
    } = &decl.kind
    else {
        panic!("expected import, got {:?}", decl.kind);
    };
    assert_eq!(*kind, ImportKind::Module);
    assert!(!exported);
    let names: Vec<_> = path.iter().map(|&(name, _)| interner.lookup(name)).collect();
    assert_eq!(names, ["Foo", "Bar"]);
}

#[test]
fn import_with_kind_keyword() {
    let (output, interner) = parse("import func Foo.bar");
    assert_clean(&output);

    let decl = output.arena.decl(output.file.decls[0]);
    let DeclKind::Import { kind, path, .. } = &decl.kind else {
        panic!("expected import");
    };
    assert_eq!(*kind, ImportKind::Func);
    assert_eq!(path.len(), 2);
    assert_eq!(interner.lookup(path[0].0), "Foo");
}

#[test]
fn exported_import() {
    let (output, _interner) = parse("@exported import Foo");
    assert_clean(&output);

    let decl = output.arena.decl(output.file.decls[0]);
    assert!(matches!(
        decl.kind,
        DeclKind::Import { exported: true, .. }
    ));
}

#[test]
fn asmname_func_payload() {
    let source = r#"@asmname="_malloc" func alloc() -> Int"#;
    let (output, interner) = parse(source);
    assert_clean(&output);

    let func = find_decl(&output, |k| matches!(k, DeclKind::Func { .. })).expect("func decl");
    let decl = output.arena.decl(func);
    assert!(decl.attrs.has(DeclAttrKind::AsmName));
    let payload = decl.attrs.asm_name.expect("asmname payload");
    assert_eq!(&source[payload.to_range()], "_malloc");

    let DeclKind::Func { name, ret, body, .. } = &decl.kind else {
        unreachable!();
    };
    assert_eq!(interner.lookup(*name), "alloc");
    assert!(ret.is_some());
    // No body, and no body-required diagnostic thanks to asmname.
    assert!(matches!(body, FuncBody::None));
}

#[test]
fn enum_with_payload_and_raw_value() {
    let (output, interner) = parse("enum E { case A(Int), B = 3 }");
    assert_clean(&output);

    let decl = output.arena.decl(output.file.decls[0]);
    let DeclKind::Enum { name, members, .. } = &decl.kind else {
        panic!("expected enum, got {:?}", decl.kind);
    };
    assert_eq!(interner.lookup(*name), "E");

    // One EnumCase decl plus its two elements.
    let case = output.arena.decl(members[0]);
    let DeclKind::EnumCase { elements, .. } = &case.kind else {
        panic!("expected enum case, got {:?}", case.kind);
    };
    assert_eq!(elements.len(), 2);
    assert_eq!(members.len(), 3);

    let a = output.arena.decl(elements[0]);
    let DeclKind::EnumElement {
        name,
        arg_type,
        raw_value,
        ..
    } = &a.kind
    else {
        panic!("expected enum element");
    };
    assert_eq!(interner.lookup(*name), "A");
    assert!(arg_type.is_some());
    assert!(raw_value.is_none());

    let b = output.arena.decl(elements[1]);
    let DeclKind::EnumElement {
        name, raw_value, ..
    } = &b.kind
    else {
        panic!("expected enum element");
    };
    assert_eq!(interner.lookup(*name), "B");
    let raw = (*raw_value).expect("raw value");
    assert!(matches!(output.arena.expr(raw).kind, ExprKind::IntLit(3)));
}

#[test]
fn infix_operator_decl() {
    let (output, interner) = parse("operator infix <*> { associativity left precedence 150 }");
    assert_clean(&output);

    let decl = output.arena.decl(output.file.decls[0]);
    let DeclKind::Operator {
        fixity,
        name,
        infix,
        ..
    } = &decl.kind
    else {
        panic!("expected operator decl, got {:?}", decl.kind);
    };
    assert_eq!(*fixity, OperatorFixity::Infix);
    assert_eq!(interner.lookup(*name), "<*>");
    let data = (*infix).expect("infix data");
    assert_eq!(data.associativity, Associativity::Left);
    assert_eq!(data.precedence, 150);
}

#[test]
fn infix_operator_defaults() {
    let (output, _interner) = parse("operator infix <+> { }");
    assert_clean(&output);

    let decl = output.arena.decl(output.file.decls[0]);
    let DeclKind::Operator { infix, .. } = &decl.kind else {
        panic!("expected operator decl");
    };
    let data = (*infix).expect("infix data");
    assert_eq!(data.associativity, Associativity::None);
    assert_eq!(data.precedence, 100);
}

#[test]
fn prefix_operator_decl() {
    let (output, _interner) = parse("operator prefix ~~ { }");
    assert_clean(&output);

    let decl = output.arena.decl(output.file.decls[0]);
    assert!(matches!(
        decl.kind,
        DeclKind::Operator {
            fixity: OperatorFixity::Prefix,
            infix: None,
            ..
        }
    ));
}

#[test]
fn generic_operator_func_splits_trailing_less() {
    let (output, interner) = parse("func ==<T>(a: T, b: T) -> Bool {}");
    assert_clean(&output);

    let func = find_decl(&output, |k| matches!(k, DeclKind::Func { .. })).expect("func decl");
    let DeclKind::Func {
        name,
        generics,
        body,
        ..
    } = &output.arena.decl(func).kind
    else {
        unreachable!();
    };
    assert_eq!(interner.lookup(*name), "==");
    let generics = generics.as_ref().expect("generic params");
    assert_eq!(generics.params.len(), 1);
    assert_eq!(interner.lookup(generics.params[0].name), "T");

    let list = body.brace_list().expect("parsed body");
    assert!(output.arena.brace_list(list).items.is_empty());
}

#[test]
fn plain_generic_func() {
    let (output, interner) = parse("func id<T>(x: T) -> T { return x }");
    assert_clean(&output);

    let func = find_decl(&output, |k| matches!(k, DeclKind::Func { .. })).expect("func decl");
    let DeclKind::Func {
        name,
        generics,
        body,
        ..
    } = &output.arena.decl(func).kind
    else {
        unreachable!();
    };
    assert_eq!(interner.lookup(*name), "id");
    assert_eq!(generics.as_ref().expect("generics").params.len(), 1);

    let list = output.arena.brace_list(body.brace_list().expect("body"));
    assert_eq!(list.items.len(), 1);
    assert!(matches!(list.items[0], BraceItem::Return { value: Some(_), .. }));
}

#[test]
fn struct_and_class_and_protocol() {
    let (output, _interner) = parse(
        "struct S { var x: Int }\n\
         class C { destructor() { } }\n\
         protocol P { func f() }",
    );
    assert_clean(&output);

    assert!(find_decl(&output, |k| matches!(k, DeclKind::Struct { .. })).is_some());
    assert!(find_decl(&output, |k| matches!(k, DeclKind::Class { .. })).is_some());
    assert!(find_decl(&output, |k| matches!(k, DeclKind::Protocol { .. })).is_some());
    assert!(find_decl(&output, |k| matches!(k, DeclKind::Destructor { .. })).is_some());
}

#[test]
fn typealias_with_definition() {
    let (output, interner) = parse("typealias Alias = Foo.Bar");
    assert_clean(&output);

    let decl = output.arena.decl(output.file.decls[0]);
    let DeclKind::TypeAlias {
        name, underlying, ..
    } = &decl.kind
    else {
        panic!("expected typealias, got {:?}", decl.kind);
    };
    assert_eq!(interner.lookup(*name), "Alias");
    assert!(underlying.is_some());
}

#[test]
fn protocol_typealias_is_associated_type() {
    let (output, interner) = parse("protocol P { typealias Element }");
    assert_clean(&output);

    let assoc = find_decl(&output, |k| matches!(k, DeclKind::AssociatedType { .. }))
        .expect("associated type");
    let DeclKind::AssociatedType { name, .. } = &output.arena.decl(assoc).kind else {
        unreachable!();
    };
    assert_eq!(interner.lookup(*name), "Element");
}

#[test]
fn extension_with_inheritance() {
    let (output, _interner) = parse("extension Foo : Bar, Baz { func m() {} }");
    assert_clean(&output);

    let decl = output.arena.decl(output.file.decls[0]);
    let DeclKind::Extension {
        inherited, members, ..
    } = &decl.kind
    else {
        panic!("expected extension, got {:?}", decl.kind);
    };
    assert_eq!(inherited.len(), 2);
    assert_eq!(members.len(), 1);
}

#[test]
fn constructor_in_struct() {
    let (output, _interner) = parse("struct S { init(x: Int) { self.x = x } }");
    assert_clean(&output);

    let ctor = find_decl(&output, |k| matches!(k, DeclKind::Constructor { .. }))
        .expect("constructor");
    let decl = output.arena.decl(ctor);
    assert!(!decl.invalid);
    let DeclKind::Constructor { body, .. } = &decl.kind else {
        unreachable!();
    };
    assert!(matches!(body, FuncBody::Parsed(_)));
}

#[test]
fn var_bindings_share_annotation() {
    let (output, _interner) = parse("var a, b: Int");
    assert_clean(&output);

    // Both bindings end up typed: the second's annotation propagates back.
    let bindings: Vec<_> = output
        .arena
        .decl_ids()
        .filter(|&id| matches!(output.arena.decl(id).kind, DeclKind::PatternBinding { .. }))
        .collect();
    assert_eq!(bindings.len(), 2);
    for binding in bindings {
        let DeclKind::PatternBinding { pattern, .. } = output.arena.decl(binding).kind else {
            unreachable!();
        };
        assert!(
            output.arena.pattern(pattern).type_annotation().is_some(),
            "annotation did not propagate"
        );
    }
}

#[test]
fn script_mode_wraps_top_level_bindings() {
    let options = crate::ParserOptions {
        allow_top_level_code: true,
        ..Default::default()
    };
    let (output, _interner) = super::parse_with("var x = 1", options);
    assert_clean(&output);
    assert!(output.found_top_level_code);
    assert!(find_decl(&output, |k| matches!(k, DeclKind::TopLevelCode { .. })).is_some());
}

#[test]
fn library_mode_reports_no_top_level_code() {
    let (output, _interner) = parse("var x = 1");
    assert_clean(&output);
    assert!(!output.found_top_level_code);
}

#[test]
fn trailing_semicolons_attach_to_decls() {
    let (output, _interner) = parse("import Foo;\nvar x = 1;");
    assert_clean(&output);
    let import = find_decl(&output, |k| matches!(k, DeclKind::Import { .. })).expect("import");
    assert!(output.arena.decl(import).trailing_semi.is_some());
}

#[test]
fn decl_ranges_cover_their_tokens() {
    let source = "enum E { case A(Int), B = 3 }";
    let (output, _interner) = parse(source);
    assert_clean(&output);

    let len = source.len() as u32;
    for id in output.arena.decl_ids() {
        let decl = output.arena.decl(id);
        if decl.implicit {
            continue;
        }
        assert!(decl.span.start <= decl.span.end);
        assert!(decl.span.end <= len, "span {} escapes input", decl.span);
    }

    // The enum's range contains every member's range.
    let e = output.arena.decl(output.file.decls[0]);
    for &member in e.members() {
        let member_span = output.arena.decl(member).span;
        assert!(
            e.span.contains_span(member_span),
            "member {member_span} outside enum {}",
            e.span
        );
    }
}

#[test]
fn no_decl_in_two_contexts() {
    let (output, _interner) = parse(
        "class C { var x: Int\n func m() { return 1 } }\nenum E { case A }",
    );
    assert_clean(&output);

    // Each declaration has exactly one owning context; member lists never
    // share declarations.
    let mut seen = std::collections::HashSet::new();
    for id in output.arena.decl_ids() {
        for &member in output.arena.decl(id).members() {
            assert!(seen.insert(member), "decl registered in two contexts");
        }
    }
}

#[test]
fn local_discriminators_are_dense() {
    let (output, interner) = parse("func f() { enum D {}\n enum D {}\n enum D {} }");
    assert_clean(&output);

    let mut discriminators: Vec<u32> = output
        .arena
        .decl_ids()
        .filter_map(|id| {
            let decl = output.arena.decl(id);
            match &decl.kind {
                DeclKind::Enum { name, .. } if interner.lookup(*name) == "D" => decl.discriminator,
                _ => None,
            }
        })
        .collect();
    discriminators.sort_unstable();
    assert_eq!(discriminators, vec![0, 1, 2]);
}
