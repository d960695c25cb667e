//! Pattern parsing.
//!
//! A peer subsystem of the declaration parser. Named patterns allocate
//! their `Var` declaration on the spot; `var` parsing later walks the
//! pattern to finish those variables (context, attributes, staticness).

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{Decl, DeclKind, Pattern, PatternKind};
use vela_ir::{PatternId, Span, TokenKind};

use crate::{Parser, ParserResult, ParserStatus};

impl Parser<'_> {
    /// Parse a pattern with an optional trailing type annotation.
    ///
    /// \verbatim
    ///   pattern:
    ///     pattern-atom (':' type-annotation)?
    ///   pattern-atom:
    ///     identifier
    ///     '_'
    ///     pattern-tuple
    /// \endverbatim
    pub(crate) fn parse_pattern(&mut self) -> ParserResult<PatternId> {
        let atom = match self.cursor.current_kind() {
            TokenKind::Ident(name) => {
                let span = self.cursor.advance();
                if self.cursor.text_of(name) == "_" {
                    ParserResult::ok(
                        self.arena.alloc_pattern(Pattern::new(PatternKind::Any, span)),
                    )
                } else {
                    ParserResult::ok(self.alloc_named_pattern(name, span, false))
                }
            }
            TokenKind::LParen => self.parse_pattern_tuple(false),
            TokenKind::CodeComplete => {
                self.cursor.advance();
                return ParserResult::code_completion();
            }
            _ => {
                self.error_at(
                    ErrorCode::E1112,
                    self.cursor.current_span(),
                    "expected pattern",
                );
                return ParserResult::error();
            }
        };

        let Some(sub) = atom.get() else {
            return atom;
        };
        let mut status = atom.status();

        if self.cursor.check(TokenKind::Colon) {
            self.cursor.advance();
            let ty = self.parse_type_annotation(ErrorCode::E1110);
            status |= ty.status();
            let ty_id = match ty.get() {
                Some(id) => id,
                None => self.error_type(self.cursor.current_span()),
            };
            let span = self
                .arena
                .pattern(sub)
                .span
                .merge(self.arena.type_repr(ty_id).span);
            let typed = self
                .arena
                .alloc_pattern(Pattern::new(PatternKind::Typed { sub, ty: ty_id }, span));
            return ParserResult::with_status(status, Some(typed));
        }

        ParserResult::with_status(status, Some(sub))
    }

    /// Parse a parenthesized pattern list.
    ///
    /// A single unnamed element yields a paren pattern; everything else a
    /// tuple pattern. With `allow_init`, each element accepts a `= expr`
    /// default whose value is not retained in the pattern (the callers that
    /// pass `true` reject non-empty tuples outright).
    pub(crate) fn parse_pattern_tuple(&mut self, allow_init: bool) -> ParserResult<PatternId> {
        let lparen = self.cursor.current_span();
        if self.cursor.consume_if(TokenKind::LParen).is_none() {
            self.error_at(ErrorCode::E1112, lparen, "expected '(' in pattern");
            return ParserResult::error();
        }

        let mut status = ParserStatus::success();
        let mut elements = Vec::new();
        let mut saw_comma = false;

        while !self.cursor.check(TokenKind::RParen) && !self.cursor.is_at_end() {
            let element = self.parse_pattern();
            status |= element.status();
            if element.has_code_completion() {
                return ParserResult::code_completion();
            }
            match element.get() {
                Some(id) => elements.push(id),
                None => break,
            }

            if allow_init && self.cursor.check(TokenKind::Equal) {
                self.cursor.advance();
                let init = self.parse_expr(ErrorCode::E1111);
                status |= init.status();
            }

            if self.cursor.consume_if(TokenKind::Comma).is_some() {
                saw_comma = true;
            } else {
                break;
            }
        }

        let rparen = match self.parse_matching(TokenKind::RParen, ErrorCode::E1003, lparen) {
            Some(span) => span,
            None => {
                status.set_is_parse_error();
                self.cursor.previous_span()
            }
        };

        let span = lparen.merge(rparen);
        let id = if elements.len() == 1 && !saw_comma {
            self.arena
                .alloc_pattern(Pattern::new(PatternKind::Paren(elements[0]), span))
        } else {
            self.arena.alloc_pattern(Pattern::new(
                PatternKind::Tuple {
                    elements,
                    lparen,
                    rparen,
                },
                span,
            ))
        };
        ParserResult::with_status(status, Some(id))
    }

    /// Allocate a named pattern plus the `Var` declaration it binds.
    pub(crate) fn alloc_named_pattern(
        &mut self,
        name: vela_ir::Name,
        span: Span,
        implicit: bool,
    ) -> PatternId {
        let mut var = Decl::new(
            DeclKind::Var {
                name,
                name_span: span,
                is_static: false,
                accessors: None,
            },
            span,
            self.current_context(),
        );
        var.implicit = implicit;
        let var_id = self.arena.alloc_decl(var);
        let mut pattern = Pattern::new(PatternKind::Named { name, var: var_id }, span);
        pattern.implicit = implicit;
        self.arena.alloc_pattern(pattern)
    }

    /// Build the implicit `self` parameter pattern for the current context.
    pub(crate) fn build_implicit_self_parameter(&mut self, span: Span) -> PatternId {
        let self_name = self.interner().intern("self");
        let named = self.alloc_named_pattern(self_name, span, true);
        // Typed with an unspelled annotation slot; the container type is
        // computed during semantic analysis.
        let ty = self.error_type(Span::point(span.start));
        let mut typed = Pattern::new(PatternKind::Typed { sub: named, ty }, span);
        typed.implicit = true;
        self.arena.alloc_pattern(typed)
    }

    /// Number of elements in a parsed parameter tuple.
    pub(crate) fn pattern_tuple_arity(&self, pattern: PatternId) -> usize {
        match &self.arena.pattern(pattern).kind {
            PatternKind::Tuple { elements, .. } => elements.len(),
            PatternKind::Paren(_) => 1,
            _ => 1,
        }
    }

    /// Source range covered by the elements of a parameter tuple, if any.
    pub(crate) fn pattern_tuple_elements_range(&self, pattern: PatternId) -> Option<Span> {
        match &self.arena.pattern(pattern).kind {
            PatternKind::Tuple { elements, .. } => {
                let first = elements.first()?;
                let last = elements.last()?;
                Some(
                    self.arena
                        .pattern(*first)
                        .span
                        .merge(self.arena.pattern(*last).span),
                )
            }
            PatternKind::Paren(sub) => Some(self.arena.pattern(*sub).span),
            _ => None,
        }
    }

    /// Allocate an empty tuple pattern at a point location.
    pub(crate) fn empty_tuple_pattern(&mut self, at: Span) -> PatternId {
        self.arena.alloc_pattern(Pattern::new(
            PatternKind::Tuple {
                elements: Vec::new(),
                lparen: at,
                rparen: at,
            },
            at,
        ))
    }
}
