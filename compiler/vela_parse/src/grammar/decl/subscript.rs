//! Subscript declaration parsing.

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{Decl, DeclKind};
use vela_ir::{DeclId, TokenKind};

use crate::{Parser, ParserStatus};

impl Parser<'_> {
    /// Parse a `subscript` declaration.
    ///
    /// \verbatim
    ///   decl-subscript:
    ///     subscript-head get-set
    ///   subscript-head:
    ///     'subscript' attribute-list pattern-tuple '->' type
    /// \endverbatim
    pub(crate) fn parse_decl_subscript(
        &mut self,
        has_container_type: bool,
        need_definition: bool,
        attrs: &vela_ir::attr::DeclAttributes,
        entries: &mut Vec<DeclId>,
    ) -> ParserStatus {
        let mut status = ParserStatus::success();
        let subscript_span = self.cursor.advance(); // 'subscript'

        // pattern-tuple
        if !self.cursor.check(TokenKind::LParen) {
            self.error_at(
                ErrorCode::E1083,
                self.cursor.current_span(),
                "expected '(' for subscript index list",
            );
            return ParserStatus::error();
        }
        let indices = self.parse_pattern_tuple(false);
        if indices.has_code_completion() {
            return ParserStatus::code_completion();
        }
        let Some(indices) = indices.get() else {
            return ParserStatus::error();
        };

        // '->'
        if !self.cursor.check(TokenKind::Arrow) {
            self.error_at(
                ErrorCode::E1084,
                self.cursor.current_span(),
                "expected '->' in subscript declaration",
            );
            return ParserStatus::error();
        }
        let arrow = self.cursor.advance();

        // element type
        let element_ty = self.parse_type_annotation(ErrorCode::E1110);
        if element_ty.has_code_completion() {
            return ParserStatus::code_completion();
        }
        let Some(element_ty) = element_ty.get() else {
            return ParserStatus::error();
        };

        // '{' get-set '}'
        let mut braces = None;
        let mut get = None;
        let mut set = None;
        if self.cursor.check(TokenKind::LBrace) {
            let lbrace = self.cursor.advance();

            let clauses = self.parse_get_set(has_container_type, Some(indices), element_ty, None);
            if clauses.invalid {
                status.set_is_parse_error();
            }

            if status.is_error() {
                self.skip_until_decl_rbrace();
            }
            let rbrace = match self.parse_matching(TokenKind::RBrace, ErrorCode::E1046, lbrace) {
                Some(span) => span,
                None => vela_ir::Span::point(clauses.last_valid),
            };

            if clauses.get.is_none() {
                if status.is_success() {
                    self.error_at(
                        ErrorCode::E1082,
                        subscript_span,
                        "subscript requires a getter",
                    );
                }
                status.set_is_parse_error();
            }

            get = clauses.get;
            set = clauses.set;
            braces = Some((lbrace, rbrace));
        } else if need_definition && !self.options.sil_mode {
            self.error_at(
                ErrorCode::E1045,
                self.cursor.current_span(),
                "expected '{' for subscript accessors",
            );
            return ParserStatus::error();
        }

        // Reject 'subscript' outside of type declarations.
        if !has_container_type {
            self.error_at(
                ErrorCode::E1081,
                subscript_span,
                "subscripts are only allowed inside a type",
            );
            status.set_is_parse_error();
        }

        if status.is_success() {
            let end = self.cursor.previous_span();
            let mut decl = Decl::new(
                DeclKind::Subscript {
                    indices,
                    arrow,
                    element_ty,
                    braces,
                    get,
                    set,
                },
                subscript_span.merge(end),
                self.current_context(),
            );
            if attrs.is_valid() {
                decl.attrs = attrs.clone();
            }
            let decl_id = self.arena.alloc_decl(decl);
            entries.push(decl_id);

            // Add get/set in source order.
            let mut accessors: Vec<DeclId> = get.into_iter().chain(set).collect();
            accessors.sort_by_key(|&id| self.arena.decl(id).span.start);
            let context = self.current_context();
            for accessor in accessors {
                self.arena.decl_mut(accessor).context = context;
                entries.push(accessor);
            }
        }

        status
    }
}
