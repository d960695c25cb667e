//! Operator declaration parsing.
//!
//! `operator` and the fixity words are contextual keywords; the dispatcher
//! only routes here when `operator` is followed by one of them.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::ast::{Associativity, Decl, DeclKind, InfixData, OperatorFixity};
use vela_ir::{DeclId, Span, TokenKind};

use crate::{Parser, ParserResult};

impl Parser<'_> {
    /// Parse an operator declaration.
    ///
    /// \verbatim
    ///   decl-operator:
    ///     'operator' operator-fixity any-operator '{' operator-body '}'
    ///   operator-fixity:
    ///     'prefix' | 'postfix' | 'infix'
    /// \endverbatim
    pub(crate) fn parse_decl_operator(
        &mut self,
        allow_top_level: bool,
        attrs: &vela_ir::attr::DeclAttributes,
    ) -> ParserResult<DeclId> {
        let operator_span = self.cursor.advance(); // 'operator'

        if attrs.is_valid() {
            let at = attrs.at_span.unwrap_or(operator_span);
            self.emit(
                Diagnostic::error(ErrorCode::E1090)
                    .with_message("attributes are not allowed on operator declarations")
                    .with_label(at, "here"),
            );
        }

        // The dispatcher guarantees a fixity word follows.
        let fixity = match self.cursor.current_text() {
            Some("prefix") => OperatorFixity::Prefix,
            Some("postfix") => OperatorFixity::Postfix,
            _ => OperatorFixity::Infix,
        };
        self.cursor.advance(); // fixity

        let TokenKind::Oper(name) = self.cursor.current_kind() else {
            self.error_at(
                ErrorCode::E1091,
                self.cursor.current_span(),
                "expected operator name after fixity",
            );
            return ParserResult::error();
        };
        let name_span = self.cursor.advance();

        // Postfix '!' is reserved.
        if matches!(fixity, OperatorFixity::Postfix) && self.cursor.text_of(name) == "!" {
            self.error_at(ErrorCode::E1092, name_span, "postfix '!' is reserved");
        }

        if !self.cursor.check(TokenKind::LBrace) {
            self.error_at(
                ErrorCode::E1045,
                self.cursor.current_span(),
                "expected '{' after operator name",
            );
            return ParserResult::error();
        }
        let lbrace = self.cursor.advance();

        let infix = match fixity {
            OperatorFixity::Infix => match self.parse_infix_operator_body() {
                Some(data) => Some(data),
                None => return ParserResult::error(),
            },
            OperatorFixity::Prefix | OperatorFixity::Postfix => {
                if !self.parse_empty_operator_body(fixity) {
                    return ParserResult::error();
                }
                None
            }
        };

        let rbrace = self.cursor.current_span();
        self.cursor.consume_if(TokenKind::RBrace);

        if !allow_top_level {
            self.error_at(
                ErrorCode::E1093,
                operator_span,
                "operator declarations are only valid at file scope",
            );
            return ParserResult::error();
        }

        let decl = Decl::new(
            DeclKind::Operator {
                fixity,
                name,
                name_span,
                braces: (lbrace, rbrace),
                infix,
            },
            operator_span.merge(rbrace),
            self.current_context(),
        );
        ParserResult::ok(self.arena.alloc_decl(decl))
    }

    /// Prefix and postfix operator bodies accept no attributes.
    fn parse_empty_operator_body(&mut self, fixity: OperatorFixity) -> bool {
        if self.cursor.check(TokenKind::RBrace) {
            return true;
        }
        if let Some(text) = self.cursor.current_text() {
            self.error_at(
                ErrorCode::E1095,
                self.cursor.current_span(),
                format!(
                    "'{text}' is not a valid {} operator attribute",
                    fixity.as_str()
                ),
            );
        } else {
            self.error_at(
                ErrorCode::E1094,
                self.cursor.current_span(),
                "expected an operator body attribute",
            );
        }
        self.skip_until_decl_rbrace();
        false
    }

    /// Parse an infix operator body: `associativity` and `precedence`, each
    /// at most once, in any order.
    ///
    /// \verbatim
    ///   operator-body-infix:
    ///     ('associativity' ('none'|'left'|'right'))?
    ///     ('precedence' integer-literal)?
    /// \endverbatim
    fn parse_infix_operator_body(&mut self) -> Option<InfixData> {
        let mut data = InfixData::default();
        let mut associativity_span: Option<Span> = None;
        let mut precedence_span: Option<Span> = None;

        while !self.cursor.check(TokenKind::RBrace) {
            let Some(text) = self.cursor.current_text() else {
                self.error_at(
                    ErrorCode::E1094,
                    self.cursor.current_span(),
                    "expected an operator body attribute",
                );
                self.skip_until_decl_rbrace();
                return None;
            };

            if text == "associativity" {
                if let Some(previous) = associativity_span {
                    self.emit(
                        Diagnostic::error(ErrorCode::E1096)
                            .with_message("'associativity' declared more than once")
                            .with_label(self.cursor.current_span(), "here")
                            .with_secondary_label(previous, "previously declared here"),
                    );
                    self.skip_until_decl_rbrace();
                    return None;
                }
                associativity_span = Some(self.cursor.advance());

                let Some(value_text) = self.cursor.current_text() else {
                    self.error_at(
                        ErrorCode::E1097,
                        self.cursor.current_span(),
                        "expected associativity ('none', 'left', or 'right')",
                    );
                    self.skip_until_decl_rbrace();
                    return None;
                };
                match Associativity::from_name(value_text) {
                    Some(associativity) => {
                        data.associativity = associativity;
                        self.cursor.advance();
                    }
                    None => {
                        self.error_at(
                            ErrorCode::E1098,
                            self.cursor.current_span(),
                            format!("'{value_text}' is not a valid associativity"),
                        );
                        self.skip_until_decl_rbrace();
                        return None;
                    }
                }
                continue;
            }

            if text == "precedence" {
                if let Some(previous) = precedence_span {
                    self.emit(
                        Diagnostic::error(ErrorCode::E1099)
                            .with_message("'precedence' declared more than once")
                            .with_label(self.cursor.current_span(), "here")
                            .with_secondary_label(previous, "previously declared here"),
                    );
                    self.skip_until_decl_rbrace();
                    return None;
                }
                precedence_span = Some(self.cursor.advance());

                let TokenKind::IntLit(value) = self.cursor.current_kind() else {
                    self.error_at(
                        ErrorCode::E1100,
                        self.cursor.current_span(),
                        "expected precedence integer",
                    );
                    self.skip_until_decl_rbrace();
                    return None;
                };
                match u8::try_from(value) {
                    Ok(precedence) => data.precedence = precedence,
                    Err(_) => {
                        self.error_at(
                            ErrorCode::E1101,
                            self.cursor.current_span(),
                            "precedence does not fit the allowed range",
                        );
                        data.precedence = 255;
                    }
                }
                self.cursor.advance();
                continue;
            }

            self.error_at(
                ErrorCode::E1095,
                self.cursor.current_span(),
                format!("'{text}' is not a valid infix operator attribute"),
            );
            self.skip_until_decl_rbrace();
            return None;
        }

        Some(data)
    }
}
