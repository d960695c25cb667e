//! Delayed-parse harness tests.

use vela_ir::ast::{BraceItem, DeclKind, FuncBody};
use vela_ir::StringInterner;

use super::assert_clean;
use crate::{parse_source_file, BodyPolicy, ParserOptions};

const SOURCE: &str = "class C { func m() { return 1 } }";

fn find_method(output: &crate::ParseOutput, interner: &StringInterner) -> vela_ir::DeclId {
    super::find_decl(output, |k| match k {
        DeclKind::Func { name, .. } => interner.lookup(*name) == "m",
        _ => false,
    })
    .expect("method m")
}

#[test]
fn delayed_body_matches_eager_parse() {
    let interner = StringInterner::new();
    let tokens = vela_lexer::lex(SOURCE, &interner);

    // Eager parse for reference.
    let eager = parse_source_file(SOURCE, &tokens, &interner, ParserOptions::default());
    assert_clean(&eager);
    let eager_method = find_method(&eager, &interner);
    let DeclKind::Func { body, .. } = &eager.arena.decl(eager_method).kind else {
        unreachable!();
    };
    let eager_items = eager
        .arena
        .brace_list(body.brace_list().expect("eager body"))
        .items
        .clone();

    // Delayed parse, then resume.
    let options = ParserOptions {
        body_policy: BodyPolicy::Delay,
        ..Default::default()
    };
    let mut delayed = parse_source_file(SOURCE, &tokens, &interner, options);
    assert_clean(&delayed);
    let method = find_method(&delayed, &interner);
    {
        let DeclKind::Func { body, .. } = &delayed.arena.decl(method).kind else {
            unreachable!();
        };
        assert!(matches!(body, FuncBody::Delayed { .. }));
    }
    assert!(delayed.state.has_delayed_body(method));

    let ok = crate::parse_delayed_body(&mut delayed, &tokens, SOURCE, &interner, method, options);
    assert!(ok, "delayed body failed to parse");
    assert!(
        delayed.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        delayed.diagnostics
    );

    // The record is consumed exactly once.
    assert_eq!(delayed.state.delayed_body_count(), 0);
    assert!(!crate::parse_delayed_body(
        &mut delayed,
        &tokens,
        SOURCE,
        &interner,
        method,
        options
    ));

    // Resuming produced the same body as parsing eagerly.
    let DeclKind::Func { body, .. } = &delayed.arena.decl(method).kind else {
        unreachable!();
    };
    let delayed_items = delayed
        .arena
        .brace_list(body.brace_list().expect("resumed body"))
        .items
        .clone();
    assert_eq!(delayed_items.len(), eager_items.len());
    for (a, b) in delayed_items.iter().zip(eager_items.iter()) {
        match (a, b) {
            (BraceItem::Return { value: va, .. }, BraceItem::Return { value: vb, .. }) => {
                let (va, vb) = (va.expect("value"), vb.expect("value"));
                assert_eq!(delayed.arena.expr(va).kind, eager.arena.expr(vb).kind);
            }
            (BraceItem::Decl(_), BraceItem::Decl(_)) | (BraceItem::Expr(_), BraceItem::Expr(_)) => {}
            other => panic!("body shape mismatch: {other:?}"),
        }
    }
}

#[test]
fn skip_policy_records_skipped_bodies() {
    let interner = StringInterner::new();
    let tokens = vela_lexer::lex(SOURCE, &interner);
    let options = ParserOptions {
        body_policy: BodyPolicy::Skip,
        ..Default::default()
    };
    let output = parse_source_file(SOURCE, &tokens, &interner, options);
    assert_clean(&output);

    let method = find_method(&output, &interner);
    let DeclKind::Func { body, .. } = &output.arena.decl(method).kind else {
        unreachable!();
    };
    assert!(matches!(body, FuncBody::Skipped { .. }));
    assert_eq!(output.state.delayed_body_count(), 0);
}

#[test]
fn unbalanced_body_truncates_at_next_decl() {
    let source = "func f() { var x = 1\nfunc g() {}";
    let interner = StringInterner::new();
    let tokens = vela_lexer::lex(source, &interner);
    let options = ParserOptions {
        body_policy: BodyPolicy::Skip,
        ..Default::default()
    };
    let output = parse_source_file(source, &tokens, &interner, options);

    // f's body is cut off before `func g`; both functions survive.
    let names: Vec<&str> = output
        .arena
        .decl_ids()
        .filter_map(|id| match &output.arena.decl(id).kind {
            DeclKind::Func { name, .. } => Some(interner.lookup(*name)),
            _ => None,
        })
        .collect();
    assert!(names.contains(&"f"));
    assert!(names.contains(&"g"));
}

#[test]
fn completion_token_delays_member_decl() {
    let source = "class C { func m() { self. } }";
    let offset = source.find("self.").expect("offset") as u32 + 5;
    let interner = StringInterner::new();
    let tokens = vela_lexer::lex_with_completion(source, &interner, offset);

    let mut output = parse_source_file(source, &tokens, &interner, ParserOptions::default());

    // First pass: the member declaration is delayed, not registered.
    assert!(output.state.has_delayed_decl());
    let class = super::find_decl(&output, |k| matches!(k, DeclKind::Class { .. })).expect("class");
    assert!(
        output.arena.decl(class).members().is_empty(),
        "delayed member should not be registered"
    );

    // Second pass re-parses the delayed declaration.
    let entries =
        crate::parse_delayed_decl(&mut output, &tokens, source, &interner, ParserOptions::default());
    assert!(!entries.is_empty(), "second pass produced no declarations");
    assert!(!output.state.has_delayed_decl());
}
