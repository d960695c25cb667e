//! Delayed parsing.
//!
//! Two uses:
//!
//! - **Code-completion first pass**: a sub-parser that hits the completion
//!   token inside a non-module context makes the dispatcher rewind to the
//!   recorded start, consume through the completion token, and register the
//!   region in the persistent state.
//! - **Function bodies**: with a delaying body policy, `{...}` regions are
//!   consumed with brace balancing and recorded (token range, captured
//!   scopes, declaration context) keyed on the declaration. Re-entry
//!   replays the bounded region and attaches the parsed body.
//!
//! Resumption restores the parser to its original state on exit: cursor
//! position, replay clamp, and scope stack all unwind.

use rustc_hash::FxHashMap;

use vela_diagnostic::ErrorCode;
use vela_ir::ast::FuncBody;
use vela_ir::{DeclContextId, DeclId, Span, StringInterner, TokenKind, TokenList};

use crate::context::CapturedScopes;
use crate::cursor::CursorPosition;
use crate::{BodyPolicy, DeclParseFlags, ParseOutput, Parser, ParserOptions};

/// A contiguous range of token indices.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TokenRange {
    pub start: usize,
    pub end: usize,
}

/// A function body recorded for later parsing.
#[derive(Debug)]
pub struct DelayedBody {
    pub tokens: TokenRange,
    pub scopes: CapturedScopes,
    pub context: DeclContextId,
}

/// A whole declaration delayed by the code-completion first pass.
#[derive(Debug)]
pub struct DelayedDecl {
    pub flags: DeclParseFlags,
    pub context: DeclContextId,
    pub scopes: CapturedScopes,
    pub tokens: TokenRange,
    /// Byte range from declaration start through the completion token.
    pub range: Span,
}

/// Deferred-parse records, persistent across passes.
///
/// Each record is consumed exactly once upon re-entry.
#[derive(Debug, Default)]
pub struct ParserState {
    delayed_bodies: FxHashMap<DeclId, DelayedBody>,
    delayed_decl: Option<DelayedDecl>,
}

impl ParserState {
    pub fn delay_body(&mut self, decl: DeclId, record: DelayedBody) {
        self.delayed_bodies.insert(decl, record);
    }

    /// Take the body record for a declaration, consuming it.
    pub fn take_body_state(&mut self, decl: DeclId) -> Option<DelayedBody> {
        self.delayed_bodies.remove(&decl)
    }

    pub fn has_delayed_body(&self, decl: DeclId) -> bool {
        self.delayed_bodies.contains_key(&decl)
    }

    pub fn delayed_body_count(&self) -> usize {
        self.delayed_bodies.len()
    }

    /// Declarations with delayed bodies, in arbitrary order.
    pub fn delayed_body_decls(&self) -> Vec<DeclId> {
        self.delayed_bodies.keys().copied().collect()
    }

    pub fn delay_decl(&mut self, record: DelayedDecl) {
        self.delayed_decl = Some(record);
    }

    /// Take the delayed declaration record, consuming it.
    pub fn take_delayed_decl(&mut self) -> Option<DelayedDecl> {
        self.delayed_decl.take()
    }

    pub fn has_delayed_decl(&self) -> bool {
        self.delayed_decl.is_some()
    }
}

impl Parser<'_> {
    /// Consume a function body region without parsing it, balancing braces.
    ///
    /// At EOF with opens outstanding, rewinds and truncates the body at the
    /// first token that is a plausible next-declaration start (excluding
    /// `var`, which is common inside bodies).
    pub(crate) fn consume_function_body(
        &mut self,
        decl: DeclId,
        _attrs: &vela_ir::attr::DeclAttributes,
    ) {
        let begin = self.cursor.save_position();
        let begin_token = self.cursor.position();

        self.cursor.advance(); // '{'
        let mut open_braces = 1u32;
        while open_braces != 0 && !self.cursor.is_at_end() {
            if self.cursor.consume_if(TokenKind::LBrace).is_some() {
                open_braces += 1;
                continue;
            }
            if self.cursor.consume_if(TokenKind::RBrace).is_some() {
                open_braces -= 1;
                continue;
            }
            self.cursor.advance();
        }

        if open_braces != 0 && !self.cursor.check(TokenKind::CodeComplete) {
            // Unbalanced braces at EOF: rewind and cut the body off before
            // the next plausible declaration. `var` does not count — it is
            // common inside bodies.
            self.cursor.restore_position(begin);
            self.cursor.advance(); // '{'
            while !self.cursor.is_at_end()
                && !(crate::DECL_KEYWORDS_NO_VAR.contains_tag(self.cursor.current_tag())
                    || self.is_start_of_operator_decl())
            {
                self.cursor.advance();
            }
        }

        let end = self.cursor.previous_end();
        if self.options.body_policy == BodyPolicy::Delay {
            self.state.delay_body(
                decl,
                DelayedBody {
                    tokens: TokenRange {
                        start: begin_token,
                        end: self.cursor.position(),
                    },
                    scopes: self.capture_scopes(),
                    context: self.current_context(),
                },
            );
            self.set_func_body(decl, FuncBody::Delayed { end });
        } else {
            self.set_func_body(decl, FuncBody::Skipped { end });
        }
    }

    /// Code-completion first pass: rewind to the declaration start, consume
    /// through the completion token, and register the declaration for the
    /// second pass. Top-level declarations additionally skip to EOF, since
    /// forward references are not allowed at the top level.
    pub(crate) fn consume_decl(
        &mut self,
        begin: CursorPosition,
        flags: DeclParseFlags,
        is_top_level: bool,
    ) {
        self.cursor.restore_position(begin);
        let begin_loc = self.cursor.current_span();
        let token_start = self.cursor.position();

        while !self.cursor.check(TokenKind::CodeComplete) && !self.cursor.is_at_end() {
            self.cursor.advance();
        }
        self.cursor.consume_if(TokenKind::CodeComplete);
        let end_loc = self.cursor.current_span();

        self.state.delay_decl(DelayedDecl {
            flags,
            context: self.current_context(),
            scopes: self.capture_scopes(),
            tokens: TokenRange {
                start: token_start,
                end: self.cursor.position(),
            },
            range: Span::new(begin_loc.start, end_loc.start),
        });

        if is_top_level {
            while !self.cursor.is_at_end() {
                self.cursor.advance();
            }
        }
    }

    /// Re-enter a delayed function body: replay the recorded token range
    /// under the captured scopes and context, attach the parsed body, and
    /// restore the cursor on exit.
    pub(crate) fn parse_delayed_body_inner(&mut self, decl: DeclId) -> bool {
        let Some(record) = self.state.take_body_state(decl) else {
            return false;
        };
        tracing::debug!(?decl, "resuming delayed function body");

        let saved = self.cursor.save_position();
        let old_limit = self
            .cursor
            .begin_bounded_replay(record.tokens.start, record.tokens.end);

        let parsed = self.with_captured_scopes(record.scopes, |p| {
            p.with_decl_context(record.context, |p| {
                let body = p.parse_brace_item_list(ErrorCode::E1105);
                body.into_value()
            })
        });

        self.cursor.end_bounded_replay(old_limit);
        self.cursor.restore_position(saved);

        match parsed {
            Some(list) => {
                self.set_func_body(decl, FuncBody::Parsed(list));
                true
            }
            None => false,
        }
    }

    /// Re-enter a delayed declaration (completion second pass).
    pub(crate) fn parse_delayed_decl_inner(&mut self) -> Vec<DeclId> {
        let Some(record) = self.state.take_delayed_decl() else {
            return Vec::new();
        };
        tracing::debug!(range = %record.range, "resuming delayed declaration");

        let saved = self.cursor.save_position();
        let old_limit = self
            .cursor
            .begin_bounded_replay(record.tokens.start, record.tokens.end);

        let mut entries = Vec::new();
        self.with_captured_scopes(record.scopes, |p| {
            p.with_decl_context(record.context, |p| {
                let _ = p.parse_decl(&mut entries, record.flags);
            });
        });

        self.cursor.end_bounded_replay(old_limit);
        self.cursor.restore_position(saved);
        entries
    }
}

/// Parse a previously delayed function body, attaching the result to the
/// declaration inside `output`. Returns `true` on success.
pub fn parse_delayed_body(
    output: &mut ParseOutput,
    tokens: &TokenList,
    source: &str,
    interner: &StringInterner,
    decl: DeclId,
    mut options: ParserOptions,
) -> bool {
    // The resumed parse must parse the body for real.
    options.body_policy = BodyPolicy::Immediate;

    let arena = std::mem::take(&mut output.arena);
    let state = std::mem::take(&mut output.state);
    let mut parser = Parser::resume(
        tokens,
        source,
        interner,
        options,
        arena,
        state,
        output.file.context,
    );

    let ok = parser.parse_delayed_body_inner(decl);

    output.arena = std::mem::take(&mut parser.arena);
    output.state = std::mem::take(&mut parser.state);
    output
        .diagnostics
        .extend(std::mem::take(&mut parser.sink).into_diagnostics());
    ok
}

/// Parse the declaration delayed by the completion first pass. Returns the
/// declarations it produced.
pub fn parse_delayed_decl(
    output: &mut ParseOutput,
    tokens: &TokenList,
    source: &str,
    interner: &StringInterner,
    mut options: ParserOptions,
) -> Vec<DeclId> {
    options.completion_first_pass = false;

    let arena = std::mem::take(&mut output.arena);
    let state = std::mem::take(&mut output.state);
    let mut parser = Parser::resume(
        tokens,
        source,
        interner,
        options,
        arena,
        state,
        output.file.context,
    );

    let entries = parser.parse_delayed_decl_inner();

    output.arena = std::mem::take(&mut parser.arena);
    output.state = std::mem::take(&mut parser.state);
    output
        .diagnostics
        .extend(std::mem::take(&mut parser.sink).into_diagnostics());
    entries
}
