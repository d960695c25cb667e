//! Recursive descent declaration parser for Vela.
//!
//! Consumes a lexed `TokenList` and builds declaration AST nodes in a
//! `DeclArena`. Diagnostics flow into a write-only sink and never abort
//! parsing; every sub-parser reports a status (error bit plus
//! code-completion bit) and the outer loops recover locally.
//!
//! Function bodies can be deferred: the parser captures its position, scope
//! stack and declaration context into a persistent [`ParserState`] and
//! resumes from that record later, restoring itself exactly on exit.

mod context;
mod cursor;
mod delayed;
mod grammar;
mod recovery;
mod sil;
mod status;

#[cfg(test)]
mod tests;

pub use context::{CapturedScopes, DeclParseFlags, ScopeKind};
pub use cursor::{Cursor, CursorPosition};
pub use delayed::{parse_delayed_body, parse_delayed_decl, ParserState};
pub use recovery::{synchronize, TokenSet, DECL_KEYWORDS, DECL_KEYWORDS_NO_VAR};
pub use status::{ParserResult, ParserStatus};

use vela_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode};
use vela_ir::ast::{AstStage, BraceItem, BraceItemList, DeclContext, DeclContextKind, SourceFile};
use vela_ir::{DeclArena, DeclContextId, Span, StringInterner, TokenKind, TokenList};

/// What to do with function bodies during the main parse.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum BodyPolicy {
    /// Parse bodies eagerly.
    #[default]
    Immediate,
    /// Record bodies for later re-entry via [`parse_delayed_body`].
    Delay,
    /// Consume bodies without building an AST.
    Skip,
}

/// Per-parse configuration.
#[derive(Copy, Clone, Debug)]
pub struct ParserOptions {
    /// Unlocks SIL top-level forms and SIL-only type attributes, and
    /// relaxes body-required rules.
    pub sil_mode: bool,
    /// Script/REPL mode: executable code may appear at the top level.
    pub allow_top_level_code: bool,
    pub body_policy: BodyPolicy,
    /// First pass of a code-completion parse: declarations containing the
    /// completion token are delayed instead of reported as errors.
    pub completion_first_pass: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            sil_mode: false,
            allow_top_level_code: false,
            body_policy: BodyPolicy::Immediate,
            completion_first_pass: true,
        }
    }
}

/// Everything a parse produces.
#[derive(Debug)]
pub struct ParseOutput {
    pub file: SourceFile,
    pub arena: DeclArena,
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any executable top-level code was found (script mode).
    pub found_top_level_code: bool,
    /// Deferred-parse records, persistent across passes.
    pub state: ParserState,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Parser state.
pub struct Parser<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) source: &'a str,
    pub(crate) arena: DeclArena,
    pub(crate) sink: DiagnosticSink,
    pub(crate) options: ParserOptions,
    pub(crate) state: ParserState,
    pub(crate) scopes: Vec<ScopeKind>,
    pub(crate) context_stack: Vec<DeclContextId>,
    pub(crate) file_context: DeclContextId,
}

impl<'a> Parser<'a> {
    /// Create a new parser over a token stream.
    pub fn new(
        tokens: &'a TokenList,
        source: &'a str,
        interner: &'a StringInterner,
        options: ParserOptions,
    ) -> Self {
        let mut arena = DeclArena::new();
        let file_context = arena.alloc_context(DeclContext::new(DeclContextKind::SourceFile, None));
        Parser {
            cursor: Cursor::new(tokens, interner),
            source,
            arena,
            sink: DiagnosticSink::new(),
            options,
            state: ParserState::default(),
            scopes: Vec::new(),
            context_stack: Vec::new(),
            file_context,
        }
    }

    /// Rebuild a parser around state from a previous pass, for delayed
    /// re-entry. The cursor starts primed at the beginning of the stream;
    /// the caller rewinds it to the recorded position.
    pub(crate) fn resume(
        tokens: &'a TokenList,
        source: &'a str,
        interner: &'a StringInterner,
        options: ParserOptions,
        arena: DeclArena,
        state: ParserState,
        file_context: DeclContextId,
    ) -> Self {
        Parser {
            cursor: Cursor::new(tokens, interner),
            source,
            arena,
            sink: DiagnosticSink::new(),
            options,
            state,
            scopes: Vec::new(),
            context_stack: Vec::new(),
            file_context,
        }
    }

    #[inline]
    pub(crate) fn interner(&self) -> &'a StringInterner {
        self.cursor.interner()
    }

    // --- Diagnostics ---

    pub(crate) fn emit(&mut self, diagnostic: Diagnostic) {
        self.sink.emit(diagnostic);
    }

    /// Report an error with a single "here" label.
    pub(crate) fn error_at(&mut self, code: ErrorCode, span: Span, message: impl Into<String>) {
        self.sink
            .emit(Diagnostic::error(code).with_message(message).with_label(span, "here"));
    }

    /// Consume a token of the expected kind, or diagnose and return `None`.
    /// A synthesized location (the current span start) stands in on failure.
    pub(crate) fn consume_expected(&mut self, kind: TokenKind, code: ErrorCode) -> Option<Span> {
        if self.cursor.check(kind) {
            Some(self.cursor.advance())
        } else {
            let found = self.cursor.current_kind();
            self.error_at(
                code,
                self.cursor.current_span(),
                format!(
                    "expected '{}', found '{}'",
                    kind.display_name(),
                    found.display_name()
                ),
            );
            None
        }
    }

    /// Consume a closing token, pointing back at the opening one on failure.
    pub(crate) fn parse_matching(
        &mut self,
        kind: TokenKind,
        code: ErrorCode,
        opening: Span,
    ) -> Option<Span> {
        if self.cursor.check(kind) {
            Some(self.cursor.advance())
        } else {
            let diag = Diagnostic::error(code)
                .with_message(format!("expected '{}'", kind.display_name()))
                .with_label(self.cursor.current_span(), "here")
                .with_secondary_label(opening, "to match this opening");
            self.sink.emit(diag);
            None
        }
    }

    // --- Declaration-start detection ---

    /// Whether the current token begins a declaration.
    pub(crate) fn is_start_of_decl(&self) -> bool {
        if DECL_KEYWORDS.contains_tag(self.cursor.current_tag()) {
            return true;
        }
        self.is_start_of_operator_decl()
    }

    /// `operator` followed by `prefix`/`postfix`/`infix` begins an operator
    /// declaration. Both words are contextual keywords.
    pub(crate) fn is_start_of_operator_decl(&self) -> bool {
        self.cursor.ident_text_is("operator")
            && (self.cursor.peek_ident_text_is("prefix")
                || self.cursor.peek_ident_text_is("postfix")
                || self.cursor.peek_ident_text_is("infix"))
    }

    /// Skip tokens until a `}` or a plausible declaration start.
    pub(crate) fn skip_until_decl_rbrace(&mut self) {
        while !self.cursor.is_at_end()
            && !self.cursor.check(TokenKind::RBrace)
            && !self.is_start_of_decl()
        {
            self.cursor.advance();
        }
    }

    /// Consume spurious leading `}` tokens with a diagnostic each.
    pub(crate) fn skip_extra_top_level_rbraces(&mut self) -> bool {
        if !self.cursor.check(TokenKind::RBrace) {
            return false;
        }
        while self.cursor.check(TokenKind::RBrace) {
            let span = self.cursor.current_span();
            let diag = Diagnostic::error(ErrorCode::E1004)
                .with_message("extraneous '}' at top level")
                .with_label(span, "here")
                .with_fixit_remove(span);
            self.sink.emit(diag);
            self.cursor.advance();
        }
        true
    }

    /// Wrap an item in an implicit top-level-code declaration (script mode).
    pub(crate) fn wrap_in_top_level_code(&mut self, item: BraceItem, span: Span) -> vela_ir::DeclId {
        use vela_ir::ast::{Decl, DeclKind};

        let list = self.arena.alloc_brace_list(BraceItemList::new(
            Span::point(span.start),
            vec![item],
            Span::point(span.end),
        ));
        let decl = self.arena.alloc_decl(Decl::new(
            DeclKind::TopLevelCode { body: list },
            span,
            self.current_context(),
        ));
        let context = self.arena.alloc_context(DeclContext::with_decl(
            DeclContextKind::TopLevelCode,
            self.current_context(),
            decl,
        ));
        // Re-home the wrapped binding into the new context.
        if let BraceItem::Decl(inner) = item {
            self.arena.decl_mut(inner).context = context;
        }
        decl
    }

    /// Parse the whole top-level unit.
    ///
    /// Primes the cursor, elects SIL top-level forms when the leading token
    /// is a SIL keyword, and otherwise runs the declaration dispatcher in a
    /// loop, appending results to the source file. Returns the parse output;
    /// `found_top_level_code` reports whether executable top-level code was
    /// seen.
    pub fn parse_top_level(mut self) -> ParseOutput {
        let mut file = SourceFile::new(self.file_context);
        file.stage = AstStage::Parsing;
        tracing::debug!(
            sil = self.options.sil_mode,
            top_level_code = self.options.allow_top_level_code,
            "parsing top-level unit"
        );

        self.skip_extra_top_level_rbraces();

        if self.at_sil_top_level() {
            // SIL bodies may only appear at the top level; their grammar
            // belongs to a peer subsystem.
            self.parse_sil_top_level();
        }
        self.parse_top_level_items(&mut file);

        let found_top_level_code = file
            .decls
            .iter()
            .any(|&d| matches!(self.arena.decl(d).kind, vela_ir::ast::DeclKind::TopLevelCode { .. }));

        file.stage = AstStage::Parsed;

        ParseOutput {
            file,
            arena: self.arena,
            diagnostics: self.sink.into_diagnostics(),
            found_top_level_code,
            state: self.state,
        }
    }

    fn parse_top_level_items(&mut self, file: &mut SourceFile) {
        while !self.cursor.is_at_end() {
            if self.cursor.check(TokenKind::RBrace) {
                self.skip_extra_top_level_rbraces();
                continue;
            }

            if self.at_sil_top_level() {
                self.parse_sil_top_level();
                continue;
            }

            if self.is_start_of_decl() {
                let mut entries = Vec::new();
                let start = self.cursor.position();
                let status = self.parse_decl(&mut entries, DeclParseFlags::ALLOW_TOP_LEVEL);
                file.decls.extend_from_slice(&entries);
                if status.is_error() {
                    synchronize(&mut self.cursor, DECL_KEYWORDS);
                }
                if self.cursor.position() == start {
                    // No progress; drop the offending token.
                    self.cursor.advance();
                }
                continue;
            }

            if self.options.allow_top_level_code {
                let start = self.cursor.position();
                let result = self.parse_expr(ErrorCode::E1111);
                match result.get() {
                    Some(expr) => {
                        let span = self.arena.expr(expr).span;
                        let decl = self.wrap_in_top_level_code(BraceItem::Expr(expr), span);
                        file.decls.push(decl);
                        self.cursor.consume_if(TokenKind::Semi);
                    }
                    None => {
                        if self.cursor.position() == start {
                            self.cursor.advance();
                        }
                    }
                }
            } else {
                self.error_at(
                    ErrorCode::E1001,
                    self.cursor.current_span(),
                    "expected declaration",
                );
                if !synchronize(&mut self.cursor, DECL_KEYWORDS) {
                    break;
                }
            }
        }
    }
}

/// Parse a source file. Convenience entry point.
pub fn parse_source_file(
    source: &str,
    tokens: &TokenList,
    interner: &StringInterner,
    options: ParserOptions,
) -> ParseOutput {
    Parser::new(tokens, source, interner, options).parse_top_level()
}
