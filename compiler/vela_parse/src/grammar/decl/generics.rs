//! Generic parameter list parsing.

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{GenericParam, GenericParams};
use vela_ir::{Span, TokenKind};

use crate::{Parser, ParserStatus};

impl Parser<'_> {
    /// Parse a generic parameter list if the cursor is at `<`.
    pub(crate) fn maybe_parse_generic_params(&mut self) -> (Option<GenericParams>, ParserStatus) {
        if self.cursor.oper_text_is("<") {
            let langle = self.cursor.advance();
            self.parse_generic_params(langle)
        } else {
            (None, ParserStatus::success())
        }
    }

    /// Parse the body of a generic parameter list; the `<` at `langle` has
    /// already been consumed (or synthesized by splitting an operator name).
    ///
    /// \verbatim
    ///   generic-params:
    ///     '<' generic-param (',' generic-param)* '>'
    ///   generic-param:
    ///     identifier inheritance?
    /// \endverbatim
    pub(crate) fn parse_generic_params(
        &mut self,
        langle: Span,
    ) -> (Option<GenericParams>, ParserStatus) {
        let mut status = ParserStatus::success();
        let mut params = Vec::new();

        loop {
            let TokenKind::Ident(name) = self.cursor.current_kind() else {
                self.error_at(
                    ErrorCode::E1002,
                    self.cursor.current_span(),
                    "expected generic parameter name",
                );
                status.set_is_parse_error();
                break;
            };
            let span = self.cursor.advance();

            let mut inherited = Vec::new();
            if self.cursor.check(TokenKind::Colon) {
                status |= self.parse_inheritance(&mut inherited);
            }

            params.push(GenericParam {
                name,
                span,
                inherited,
            });

            if self.cursor.consume_if(TokenKind::Comma).is_none() {
                break;
            }
        }

        let rangle = if self.cursor.oper_text_is(">") {
            self.cursor.advance()
        } else {
            self.error_at(
                ErrorCode::E1003,
                self.cursor.current_span(),
                "expected '>' to close generic parameter list",
            );
            status.set_is_parse_error();
            self.cursor.previous_span()
        };

        (
            Some(GenericParams {
                langle,
                params,
                rangle,
            }),
            status,
        )
    }
}
