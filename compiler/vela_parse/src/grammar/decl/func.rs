//! Function declaration parsing.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::ast::{Decl, DeclContextKind, DeclKind, FuncBody, GenericParams};
use vela_ir::{DeclId, PatternId, Span, TokenKind, TokenTag, TypeReprId};

use crate::recovery::TokenSet;
use crate::{BodyPolicy, DeclParseFlags, Parser, ParserResult, ParserStatus, ScopeKind};

impl Parser<'_> {
    /// Parse a `func` declaration, returning null on error. The caller
    /// handles recovery.
    ///
    /// \verbatim
    ///   decl-func:
    ///     'static'? 'func' attribute-list any-identifier generic-params?
    ///         func-signature stmt-brace?
    /// \endverbatim
    pub(crate) fn parse_decl_func(
        &mut self,
        static_span: Option<Span>,
        flags: DeclParseFlags,
        attrs: &vela_ir::attr::DeclAttributes,
    ) -> ParserResult<DeclId> {
        let has_container_type = flags.has(DeclParseFlags::HAS_CONTAINER_TYPE);

        // Reject 'static' functions at global scope.
        let mut static_span = static_span;
        if let Some(span) = static_span {
            if !has_container_type {
                self.emit(
                    Diagnostic::error(ErrorCode::E1042)
                        .with_message("static functions are only allowed inside types")
                        .with_label(self.cursor.current_span(), "here")
                        .with_fixit_remove(Span::new(span.start, self.cursor.current_span().start)),
                );
                static_span = None;
            }
        }

        let func_span = self.cursor.advance(); // 'func'

        // Operator functions are only legal at global or container scope.
        if !flags.has(DeclParseFlags::ALLOW_TOP_LEVEL)
            && !flags.has(DeclParseFlags::DISALLOW_FUNC_DEF)
            && !has_container_type
            && matches!(self.cursor.current_kind(), TokenKind::Oper(_))
        {
            self.error_at(
                ErrorCode::E1107,
                self.cursor.current_span(),
                "operator functions are only allowed at file or type scope",
            );
            return ParserResult::error();
        }

        let (mut name, mut name_span) = match self.parse_any_identifier() {
            Some(pair) => pair,
            None => {
                let recovered = self.parse_identifier_decl_name(
                    TokenSet::new()
                        .with(TokenTag::LParen)
                        .with(TokenTag::Arrow)
                        .with(TokenTag::LBrace),
                    false,
                    Some((ErrorCode::E1002, "function")),
                );
                match recovered.get() {
                    Some(pair) => pair,
                    None => return ParserResult::error(),
                }
            }
        };

        self.with_scope(ScopeKind::Generics, |p| {
            // If the name is an operator token ending in '<' and the next
            // token is an identifier, split the '<' off as a separate token
            // so `func ==<T>(x: T, y: T)` parses as '==' plus '<T>'.
            let mut status = ParserStatus::success();
            let name_text = p.cursor.text_of(name).to_owned();
            let (generics, generics_status): (Option<GenericParams>, ParserStatus) = if name_text
                .len()
                > 1
                && name_text.ends_with('<')
                && matches!(p.cursor.current_kind(), TokenKind::Ident(_))
            {
                let trimmed = &name_text[..name_text.len() - 1];
                name = p.interner().intern(trimmed);
                let langle_start = name_span.start + trimmed.len() as u32;
                name_span = Span::new(name_span.start, langle_start);
                let langle = Span::new(langle_start, langle_start + 1);
                p.parse_generic_params(langle)
            } else {
                p.maybe_parse_generic_params()
            };
            status |= generics_status;

            let mut arg_params: Vec<PatternId> = Vec::new();
            let mut body_params: Vec<PatternId> = Vec::new();

            // Inside a container, the first (implicit) parameter clause
            // matches the container type as 'self'.
            if has_container_type {
                let self_pattern = p.build_implicit_self_parameter(name_span);
                arg_params.push(self_pattern);
                body_params.push(self_pattern);
            }

            let mut ret: Option<TypeReprId> = None;
            let mut selector_style = false;
            let signature_status = p.parse_function_signature(
                &mut arg_params,
                &mut body_params,
                &mut ret,
                &mut selector_style,
            );
            status |= signature_status;

            if signature_status.has_code_completion() {
                // Trigger delayed parsing; no need to continue.
                return ParserResult::code_completion();
            }

            // Enter a function-body scope even when there is no body, so
            // argument-name duplication is detected uniformly.
            p.with_scope(ScopeKind::FunctionBody, |p| {
                let mut decl = Decl::new(
                    DeclKind::Func {
                        static_span,
                        name,
                        name_span,
                        generics,
                        arg_params,
                        body_params,
                        ret,
                        selector_style,
                        body: FuncBody::None,
                    },
                    func_span,
                    p.current_context(),
                );
                if attrs.is_valid() {
                    decl.attrs = attrs.clone();
                }
                let has_asmname = decl.attrs.asm_name.is_some();
                let decl_id = p.arena.alloc_decl(decl);
                p.set_local_discriminator(decl_id);

                p.with_new_context(DeclContextKind::FunctionBody, decl_id, |p| {
                    if p.cursor.check(TokenKind::LBrace) {
                        if flags.has(DeclParseFlags::DISALLOW_FUNC_DEF) {
                            let lbrace = p.cursor.current_span();
                            p.error_at(
                                ErrorCode::E1106,
                                lbrace,
                                "function definitions are not allowed here",
                            );
                            p.cursor.advance();
                            crate::recovery::skip_until(
                                &mut p.cursor,
                                TokenSet::single(TokenTag::RBrace),
                            );
                            p.cursor.consume_if(TokenKind::RBrace);
                        } else if p.options.body_policy == BodyPolicy::Immediate {
                            let body = p.parse_brace_item_list(ErrorCode::E1105);
                            status |= body.status();
                            if let Some(list) = body.get() {
                                p.set_func_body(decl_id, FuncBody::Parsed(list));
                            }
                        } else {
                            p.consume_function_body(decl_id, attrs);
                        }
                    } else if !has_asmname
                        && !flags.has(DeclParseFlags::DISALLOW_FUNC_DEF)
                        && !signature_status.is_error()
                        && !p.options.sil_mode
                    {
                        p.error_at(
                            ErrorCode::E1105,
                            p.cursor.current_span(),
                            "function body required",
                        );
                    }
                });

                let end = p.cursor.previous_span();
                p.arena.decl_mut(decl_id).span = func_span.merge(end);
                ParserResult::with_status(status, Some(decl_id))
            })
        })
    }

    /// Update a function-like declaration's body slot.
    pub(crate) fn set_func_body(&mut self, decl: DeclId, body: FuncBody) {
        match &mut self.arena.decl_mut(decl).kind {
            DeclKind::Func { body: slot, .. }
            | DeclKind::Constructor { body: slot, .. }
            | DeclKind::Destructor { body: slot, .. } => *slot = body,
            _ => {}
        }
    }

    /// Parse a function signature: one or more parameter clauses, an
    /// optional selector-style piece naming, and an optional return type.
    ///
    /// \verbatim
    ///   func-signature:
    ///     pattern-tuple+ func-signature-result?
    ///     pattern-tuple (identifier pattern-tuple)+ func-signature-result?
    ///   func-signature-result:
    ///     '->' type
    /// \endverbatim
    pub(crate) fn parse_function_signature(
        &mut self,
        arg_params: &mut Vec<PatternId>,
        body_params: &mut Vec<PatternId>,
        ret: &mut Option<TypeReprId>,
        selector_style: &mut bool,
    ) -> ParserStatus {
        let mut status = ParserStatus::success();

        if !self.cursor.check(TokenKind::LParen) {
            self.error_at(
                ErrorCode::E1003,
                self.cursor.current_span(),
                "expected '(' in function signature",
            );
            status.set_is_parse_error();
            return status;
        }

        loop {
            let clause = self.parse_pattern_tuple(false);
            status |= clause.status();
            if clause.has_code_completion() {
                return status;
            }
            match clause.get() {
                Some(pattern) => {
                    arg_params.push(pattern);
                    body_params.push(pattern);
                }
                None => {
                    status.set_is_parse_error();
                    return status;
                }
            }

            // Curried clause: another '(' follows directly.
            if self.cursor.check(TokenKind::LParen) {
                continue;
            }

            // Selector-style piece: `name (pattern)`.
            if matches!(self.cursor.current_kind(), TokenKind::Ident(_))
                && matches!(self.cursor.peek().kind, TokenKind::LParen)
            {
                *selector_style = true;
                self.cursor.advance(); // piece name
                continue;
            }

            break;
        }

        if self.cursor.consume_if(TokenKind::Arrow).is_some() {
            let ty = self.parse_type_annotation(ErrorCode::E1110);
            status |= ty.status();
            *ret = ty.get();
        }

        status
    }
}
