//! Expression parsing.
//!
//! A peer subsystem of the declaration parser. The surface here covers what
//! declarations need: literals (for raw values and `asmname` validation),
//! references, member access, and assignment for accessor bodies.

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{Expr, ExprKind};
use vela_ir::{ExprId, TokenKind};

use crate::{Parser, ParserResult};

impl Parser<'_> {
    /// Parse an expression, diagnosing with `code` if none is present.
    pub(crate) fn parse_expr(&mut self, code: ErrorCode) -> ParserResult<ExprId> {
        let lhs = self.parse_postfix_expr(code);
        let Some(lhs_id) = lhs.get() else {
            return lhs;
        };
        let mut status = lhs.status();

        // Assignment binds loosest and to the right.
        if self.cursor.check(TokenKind::Equal) {
            self.cursor.advance();
            let rhs = self.parse_expr(code);
            status |= rhs.status();
            if let Some(rhs_id) = rhs.get() {
                let span = self
                    .arena
                    .expr(lhs_id)
                    .span
                    .merge(self.arena.expr(rhs_id).span);
                let id = self.arena.alloc_expr(Expr::new(
                    ExprKind::Assign {
                        lhs: lhs_id,
                        rhs: rhs_id,
                    },
                    span,
                ));
                return ParserResult::with_status(status, Some(id));
            }
            return ParserResult::with_status(status, Some(lhs_id));
        }

        ParserResult::with_status(status, Some(lhs_id))
    }

    fn parse_postfix_expr(&mut self, code: ErrorCode) -> ParserResult<ExprId> {
        let primary = self.parse_primary_expr(code);
        let Some(mut expr) = primary.get() else {
            return primary;
        };
        let mut status = primary.status();

        while self.cursor.check(TokenKind::Period) {
            self.cursor.advance();
            match self.cursor.current_kind() {
                TokenKind::Ident(name) => {
                    let name_span = self.cursor.advance();
                    let span = self.arena.expr(expr).span.merge(name_span);
                    expr = self
                        .arena
                        .alloc_expr(Expr::new(ExprKind::Member { base: expr, name }, span));
                }
                TokenKind::CodeComplete => {
                    self.cursor.advance();
                    status.set_has_code_completion();
                    break;
                }
                _ => {
                    self.error_at(
                        ErrorCode::E1111,
                        self.cursor.current_span(),
                        "expected member name after '.'",
                    );
                    status.set_is_parse_error();
                    break;
                }
            }
        }

        ParserResult::with_status(status, Some(expr))
    }

    fn parse_primary_expr(&mut self, code: ErrorCode) -> ParserResult<ExprId> {
        let span = self.cursor.current_span();
        let kind = match self.cursor.current_kind() {
            TokenKind::IntLit(value) => {
                self.cursor.advance();
                ExprKind::IntLit(value)
            }
            TokenKind::FloatLit(bits) => {
                self.cursor.advance();
                ExprKind::FloatLit(bits)
            }
            TokenKind::StringLit { interpolated, .. } => {
                self.cursor.advance();
                ExprKind::StringLit { interpolated }
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                ExprKind::DeclRef(name)
            }
            TokenKind::KwSelf => {
                self.cursor.advance();
                ExprKind::SelfRef
            }
            TokenKind::LParen => {
                let lparen = self.cursor.advance();
                let inner = self.parse_expr(code);
                let Some(inner_id) = inner.get() else {
                    return inner;
                };
                let mut status = inner.status();
                let rparen = match self.parse_matching(TokenKind::RParen, ErrorCode::E1003, lparen)
                {
                    Some(span) => span,
                    None => {
                        status.set_is_parse_error();
                        self.cursor.previous_span()
                    }
                };
                let id = self
                    .arena
                    .alloc_expr(Expr::new(ExprKind::Paren(inner_id), lparen.merge(rparen)));
                return ParserResult::with_status(status, Some(id));
            }
            TokenKind::CodeComplete => {
                self.cursor.advance();
                return ParserResult::code_completion();
            }
            _ => {
                self.error_at(code, span, "expected expression");
                return ParserResult::error();
            }
        };

        let id = self.arena.alloc_expr(Expr::new(kind, span));
        ParserResult::ok(id)
    }
}
