//! Constructor and destructor parsing.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::ast::{Decl, DeclContextKind, DeclKind, FuncBody, PatternKind};
use vela_ir::{DeclId, PatternId, Span, TokenKind};

use crate::{BodyPolicy, DeclParseFlags, Parser, ParserResult, ParserStatus, ScopeKind};

impl Parser<'_> {
    /// Parse an `init` declaration.
    ///
    /// \verbatim
    ///   decl-constructor:
    ///     'init' generic-params? pattern-tuple stmt-brace
    /// \endverbatim
    pub(crate) fn parse_decl_constructor(
        &mut self,
        flags: DeclParseFlags,
        attrs: &vela_ir::attr::DeclAttributes,
    ) -> ParserResult<DeclId> {
        let init_span = self.cursor.advance(); // 'init'

        let constructors_not_allowed = !flags.has(DeclParseFlags::HAS_CONTAINER_TYPE)
            || flags.has(DeclParseFlags::IN_PROTOCOL);
        if constructors_not_allowed {
            self.error_at(
                ErrorCode::E1075,
                self.cursor.current_span(),
                "initializers are only allowed inside a type",
            );
        }

        self.with_scope(ScopeKind::Generics, |p| {
            let (generics, mut status) = p.maybe_parse_generic_params();

            // Parse the parameters as an (external, internal) pattern pair.
            let (arg_pattern, body_pattern, selector_style, signature_status) =
                p.parse_constructor_arguments();
            status |= signature_status;
            if signature_status.has_code_completion() {
                // Trigger delayed parsing; no need to continue.
                return ParserResult::code_completion();
            }
            let Some(arg_pattern) = arg_pattern else {
                return ParserResult::with_status(status, None);
            };

            p.with_scope(ScopeKind::ConstructorBody, |p| {
                let self_var = p.alloc_implicit_self_var(init_span);

                let mut decl = Decl::new(
                    DeclKind::Constructor {
                        generics,
                        arg_pattern,
                        body_pattern,
                        self_var,
                        selector_style,
                        body: FuncBody::None,
                    },
                    init_span,
                    p.current_context(),
                );
                if attrs.is_valid() {
                    decl.attrs = attrs.clone();
                }
                let decl_id = p.arena.alloc_decl(decl);

                if constructors_not_allowed {
                    // Tell the type checker not to touch this constructor.
                    p.arena.decl_mut(decl_id).invalid = true;
                }

                if !p.cursor.check(TokenKind::LBrace) {
                    if !p.options.sil_mode {
                        if !signature_status.is_error() {
                            p.error_at(
                                ErrorCode::E1045,
                                p.cursor.current_span(),
                                "expected '{' for initializer body",
                            );
                        }
                        return ParserResult::with_status(ParserStatus::error(), None);
                    }
                } else {
                    p.with_new_context(DeclContextKind::ConstructorBody, decl_id, |p| {
                        if p.options.body_policy == BodyPolicy::Immediate {
                            let body = p.parse_brace_item_list(ErrorCode::E1045);
                            status |= body.status();
                            if let Some(list) = body.get() {
                                p.set_func_body(decl_id, FuncBody::Parsed(list));
                            }
                        } else {
                            p.consume_function_body(decl_id, attrs);
                        }
                    });
                }

                let end = p.cursor.previous_span();
                p.arena.decl_mut(decl_id).span = init_span.merge(end);
                ParserResult::with_status(status, Some(decl_id))
            })
        })
    }

    /// Parse constructor arguments, producing the external (argument) and
    /// internal (body) pattern pair. The two currently share structure; the
    /// split exists for selector-style signatures where external names
    /// differ from body names.
    fn parse_constructor_arguments(
        &mut self,
    ) -> (Option<PatternId>, PatternId, bool, ParserStatus) {
        let mut status = ParserStatus::success();

        if !self.cursor.check(TokenKind::LParen) {
            self.error_at(
                ErrorCode::E1003,
                self.cursor.current_span(),
                "expected '(' in initializer declaration",
            );
            status.set_is_parse_error();
            let placeholder = self.empty_tuple_pattern(self.cursor.current_span());
            return (None, placeholder, false, status);
        }

        let tuple = self.parse_pattern_tuple(false);
        status |= tuple.status();
        if tuple.has_code_completion() {
            let placeholder = self.empty_tuple_pattern(self.cursor.current_span());
            return (None, placeholder, false, status);
        }
        match tuple.get() {
            Some(pattern) => {
                let mut selector_style = false;
                // Selector-style piece: `name (pattern)` continues the
                // signature.
                while matches!(self.cursor.current_kind(), TokenKind::Ident(_))
                    && matches!(self.cursor.peek().kind, TokenKind::LParen)
                {
                    selector_style = true;
                    self.cursor.advance();
                    let piece = self.parse_pattern_tuple(false);
                    status |= piece.status();
                    if piece.is_null() {
                        break;
                    }
                }
                (Some(pattern), pattern, selector_style, status)
            }
            None => {
                status.set_is_parse_error();
                let placeholder = self.empty_tuple_pattern(self.cursor.current_span());
                (None, placeholder, false, status)
            }
        }
    }

    /// Parse a `destructor` declaration.
    ///
    /// \verbatim
    ///   decl-destructor:
    ///     'destructor' '(' ')' stmt-brace
    /// \endverbatim
    pub(crate) fn parse_decl_destructor(
        &mut self,
        flags: DeclParseFlags,
        attrs: &vela_ir::attr::DeclAttributes,
    ) -> ParserResult<DeclId> {
        let destructor_span = self.cursor.advance(); // 'destructor'

        let mut status = ParserStatus::success();
        let params: PatternId;

        if self.cursor.check(TokenKind::LParen) {
            let lparen = self.cursor.current_span();
            let parsed = self.parse_pattern_tuple(true);
            status |= parsed.status();
            match parsed.get() {
                Some(pattern) => {
                    // Destructors take zero parameters.
                    if let Some(elements_range) = self.pattern_tuple_elements_range(pattern) {
                        self.emit(
                            Diagnostic::error(ErrorCode::E1077)
                                .with_message("destructors cannot have parameters")
                                .with_label(lparen, "here")
                                .with_fixit_remove(elements_range),
                        );
                        status.set_is_parse_error();
                        params = self.empty_tuple_pattern(lparen);
                    } else {
                        params = pattern;
                    }
                }
                None => {
                    params = self.empty_tuple_pattern(lparen);
                }
            }
        } else {
            let after_keyword = destructor_span.end;
            self.emit(
                Diagnostic::error(ErrorCode::E1078)
                    .with_message("expected '()' after 'destructor'")
                    .with_label(Span::point(after_keyword), "here")
                    .with_fixit_insert(after_keyword, "()"),
            );
            status.set_is_parse_error();
            params = self.empty_tuple_pattern(Span::point(after_keyword));
        }

        if !self.cursor.check(TokenKind::LBrace) && !self.options.sil_mode {
            self.error_at(
                ErrorCode::E1045,
                self.cursor.current_span(),
                "expected '{' for destructor body",
            );
            return ParserResult::error();
        }

        self.with_scope(ScopeKind::DestructorBody, |p| {
            let self_var = p.alloc_implicit_self_var(destructor_span);

            let mut decl = Decl::new(
                DeclKind::Destructor {
                    params,
                    self_var,
                    body: FuncBody::None,
                },
                destructor_span,
                p.current_context(),
            );
            if attrs.is_valid() {
                decl.attrs = attrs.clone();
            }
            let decl_id = p.arena.alloc_decl(decl);

            if p.cursor.check(TokenKind::LBrace) {
                p.with_new_context(DeclContextKind::DestructorBody, decl_id, |p| {
                    if p.options.body_policy == BodyPolicy::Immediate {
                        let body = p.parse_brace_item_list(ErrorCode::E1045);
                        status |= body.status();
                        if let Some(list) = body.get() {
                            p.set_func_body(decl_id, FuncBody::Parsed(list));
                        }
                    } else {
                        p.consume_function_body(decl_id, attrs);
                    }
                });
            }

            // Reject 'destructor' outside of classes.
            if !flags.has(DeclParseFlags::ALLOW_DESTRUCTOR) {
                p.error_at(
                    ErrorCode::E1076,
                    destructor_span,
                    "destructors are only allowed inside a class",
                );
                // Tell the type checker not to touch this destructor.
                p.arena.decl_mut(decl_id).invalid = true;
            }

            let end = p.cursor.previous_span();
            p.arena.decl_mut(decl_id).span = destructor_span.merge(end);
            ParserResult::with_status(status, Some(decl_id))
        })
    }

    /// Allocate the implicit, immutable `self` variable a constructor or
    /// destructor body binds.
    pub(crate) fn alloc_implicit_self_var(&mut self, span: Span) -> DeclId {
        let self_name = self.interner().intern("self");
        let pattern = self.alloc_named_pattern(self_name, Span::point(span.start), true);
        match &self.arena.pattern(pattern).kind {
            PatternKind::Named { var, .. } => *var,
            // alloc_named_pattern always produces a named pattern.
            _ => unreachable!("implicit self must be a named pattern"),
        }
    }
}
