//! Parser tests.
//!
//! - `decls`: end-to-end scenarios over the declaration forms
//! - `accessors`: computed variables and subscripts
//! - `attrs`: attribute parsing and validation
//! - `recovery`: boundary behaviors and error recovery
//! - `delayed`: deferred bodies and the completion first pass
//! - `props`: property tests for the parser invariants

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

mod accessors;
mod attrs;
mod decls;
mod delayed;
mod recovery;

use vela_diagnostic::ErrorCode;
use vela_ir::ast::DeclKind;
use vela_ir::{DeclId, StringInterner};

use crate::{parse_source_file, ParseOutput, ParserOptions};

/// Parse a source string with the given options.
pub(crate) fn parse_with(source: &str, options: ParserOptions) -> (ParseOutput, StringInterner) {
    let interner = StringInterner::new();
    let output = {
        let tokens = vela_lexer::lex(source, &interner);
        parse_source_file(source, &tokens, &interner, options)
    };
    (output, interner)
}

/// Parse a source string as a library file.
pub(crate) fn parse(source: &str) -> (ParseOutput, StringInterner) {
    parse_with(source, ParserOptions::default())
}

/// Collect the error codes of all emitted diagnostics.
pub(crate) fn codes(output: &ParseOutput) -> Vec<ErrorCode> {
    output.diagnostics.iter().map(|d| d.code).collect()
}

/// Assert that no diagnostics were emitted.
pub(crate) fn assert_clean(output: &ParseOutput) {
    assert!(
        output.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        output.diagnostics
    );
}

/// Find the first declaration of a given shape in the whole arena.
pub(crate) fn find_decl(
    output: &ParseOutput,
    mut predicate: impl FnMut(&DeclKind) -> bool,
) -> Option<DeclId> {
    output
        .arena
        .decl_ids()
        .find(|&id| predicate(&output.arena.decl(id).kind))
}
