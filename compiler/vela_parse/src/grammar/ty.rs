//! Type parsing.
//!
//! A peer subsystem of the declaration parser. The surface here covers what
//! declarations need: type identifiers with generic arguments, tuples,
//! function types, and attributed types.

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{TypeRepr, TypeReprKind};
use vela_ir::{Span, TokenKind, TypeReprId};

use crate::{Parser, ParserResult};

impl Parser<'_> {
    /// Parse a type, diagnosing with `code` if none is present.
    ///
    /// \verbatim
    ///   type:
    ///     attribute-list? type-simple ('->' type)?
    ///   type-simple:
    ///     type-identifier
    ///     type-tuple
    /// \endverbatim
    pub(crate) fn parse_type(&mut self, code: ErrorCode) -> ParserResult<TypeReprId> {
        // Leading type attributes.
        if self.cursor.check(TokenKind::At) {
            let mut attrs = vela_ir::attr::TypeAttributes::default();
            self.parse_type_attribute_list(&mut attrs);
            let start = self.cursor.current_span();
            let inner = self.parse_type(code);
            return match inner.get() {
                Some(inner_id) => {
                    let span = start.merge(self.arena.type_repr(inner_id).span);
                    let id = self
                        .arena
                        .alloc_type_repr(TypeRepr::new(TypeReprKind::Attributed { attrs, inner: inner_id }, span));
                    ParserResult::with_status(inner.status(), Some(id))
                }
                None => inner,
            };
        }

        let base = match self.cursor.current_kind() {
            TokenKind::Ident(_) => self.parse_type_identifier(),
            TokenKind::LParen => self.parse_type_tuple_body(),
            TokenKind::CodeComplete => {
                self.cursor.advance();
                return ParserResult::code_completion();
            }
            _ => {
                self.error_at(code, self.cursor.current_span(), "expected type");
                return ParserResult::error();
            }
        };

        let Some(base_id) = base.get() else {
            return base;
        };
        let mut status = base.status();

        // Function type suffix.
        if self.cursor.check(TokenKind::Arrow) {
            self.cursor.advance();
            let ret = self.parse_type(code);
            status |= ret.status();
            if let Some(ret_id) = ret.get() {
                let span = self
                    .arena
                    .type_repr(base_id)
                    .span
                    .merge(self.arena.type_repr(ret_id).span);
                let id = self.arena.alloc_type_repr(TypeRepr::new(
                    TypeReprKind::Function {
                        arg: base_id,
                        ret: ret_id,
                    },
                    span,
                ));
                return ParserResult::with_status(status, Some(id));
            }
            return ParserResult::with_status(status, Some(base_id));
        }

        ParserResult::with_status(status, Some(base_id))
    }

    /// Parse a type annotation position (after `:` or `->`).
    pub(crate) fn parse_type_annotation(&mut self, code: ErrorCode) -> ParserResult<TypeReprId> {
        self.parse_type(code)
    }

    /// Parse a dotted type identifier with optional generic arguments on the
    /// last component: `Foo.Bar<Int>`.
    pub(crate) fn parse_type_identifier(&mut self) -> ParserResult<TypeReprId> {
        let TokenKind::Ident(first) = self.cursor.current_kind() else {
            self.error_at(
                ErrorCode::E1110,
                self.cursor.current_span(),
                "expected type identifier",
            );
            return ParserResult::error();
        };

        let mut span = self.cursor.advance();
        let mut components = vec![(first, span)];

        while self.cursor.check(TokenKind::Period) {
            self.cursor.advance();
            match self.cursor.current_kind() {
                TokenKind::Ident(name) => {
                    let name_span = self.cursor.advance();
                    components.push((name, name_span));
                    span = span.merge(name_span);
                }
                TokenKind::CodeComplete => {
                    self.cursor.advance();
                    return ParserResult::code_completion();
                }
                _ => {
                    self.error_at(
                        ErrorCode::E1110,
                        self.cursor.current_span(),
                        "expected type identifier after '.'",
                    );
                    break;
                }
            }
        }

        // Generic argument list on the last component.
        let mut generic_args = Vec::new();
        if self.cursor.oper_text_is("<") {
            self.cursor.advance();
            loop {
                let arg = self.parse_type(ErrorCode::E1110);
                match arg.get() {
                    Some(id) => generic_args.push(id),
                    None => break,
                }
                if self.cursor.consume_if(TokenKind::Comma).is_none() {
                    break;
                }
            }
            if self.cursor.oper_text_is(">") {
                span = span.merge(self.cursor.advance());
            } else {
                self.error_at(
                    ErrorCode::E1110,
                    self.cursor.current_span(),
                    "expected '>' to close generic argument list",
                );
            }
        }

        let id = self.arena.alloc_type_repr(TypeRepr::new(
            TypeReprKind::Named {
                components,
                generic_args,
            },
            span,
        ));
        ParserResult::ok(id)
    }

    /// Parse a type identifier with keyword recovery, used by extensions.
    ///
    /// On failure with a promising keyword at the cursor, synthesizes a
    /// sentinel-named type and reports success-with-error.
    pub(crate) fn parse_type_identifier_with_recovery(&mut self) -> ParserResult<TypeReprId> {
        if matches!(self.cursor.current_kind(), TokenKind::Ident(_)) {
            return self.parse_type_identifier();
        }
        if self.cursor.check(TokenKind::CodeComplete) {
            self.cursor.advance();
            return ParserResult::code_completion();
        }

        self.error_at(
            ErrorCode::E1110,
            self.cursor.current_span(),
            "expected type in extension declaration",
        );

        if self.cursor.current_kind().is_keyword() {
            let name_result = self.parse_identifier_decl_name(
                crate::TokenSet::new()
                    .with(vela_ir::TokenTag::Colon)
                    .with(vela_ir::TokenTag::LBrace),
                false,
                None,
            );
            if let Some((name, name_span)) = name_result.get() {
                let id = self
                    .arena
                    .alloc_type_repr(TypeRepr::simple(name, name_span));
                return ParserResult::error_with(id);
            }
        }
        ParserResult::error()
    }

    /// Parse a tuple type body: `( type (',' type)* )`.
    pub(crate) fn parse_type_tuple_body(&mut self) -> ParserResult<TypeReprId> {
        let lparen = self.cursor.current_span();
        if self.cursor.consume_if(TokenKind::LParen).is_none() {
            self.error_at(ErrorCode::E1110, lparen, "expected '(' in tuple type");
            return ParserResult::error();
        }

        let mut status = crate::ParserStatus::success();
        let mut elements = Vec::new();
        if !self.cursor.check(TokenKind::RParen) {
            loop {
                let element = self.parse_type(ErrorCode::E1110);
                status |= element.status();
                match element.get() {
                    Some(id) => elements.push(id),
                    None => break,
                }
                if self.cursor.consume_if(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        let rparen = match self.parse_matching(TokenKind::RParen, ErrorCode::E1110, lparen) {
            Some(span) => span,
            None => {
                status.set_is_parse_error();
                self.cursor.previous_span()
            }
        };

        let span = lparen.merge(rparen);
        let id = self
            .arena
            .alloc_type_repr(TypeRepr::new(TypeReprKind::Tuple(elements), span));
        ParserResult::with_status(status, Some(id))
    }

    /// Allocate an error-type placeholder.
    pub(crate) fn error_type(&mut self, span: Span) -> TypeReprId {
        self.arena
            .alloc_type_repr(TypeRepr::new(TypeReprKind::Error, span))
    }
}
