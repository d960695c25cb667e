//! Attribute list parsing.
//!
//! Declarations and types have parallel fixed attribute vocabularies.
//! Lookup is by exact spelling. Validation rules:
//!
//! - unknown names that belong to the *other* vocabulary get a wrong-kind
//!   diagnostic; recovery swallows `@name` and an optional `= value` tail
//! - duplicates diagnose but keep the first location
//! - ownership attributes are mutually exclusive, as are the resilience
//!   set, `prefix`/`postfix`, and `inout`/`auto_closure`
//! - `asmname` takes `= "literal"` with a single non-interpolated segment
//! - `cc` takes `(name)` from a fixed calling-convention table
//! - the `sil_*` family and `local_storage` require SIL mode
//!
//! \verbatim
//!   attribute-list:
//!     /*empty*/
//!     attribute-list-clause attribute-list
//!   attribute-list-clause:
//!     '@' attribute
//!     '@' attribute ','? attribute-list-clause
//! \endverbatim

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::attr::{AbstractCC, DeclAttrKind, DeclAttributes, TypeAttrKind, TypeAttributes};
use vela_ir::TokenKind;

use crate::Parser;

impl Parser<'_> {
    /// Parse an optional declaration attribute list.
    pub(crate) fn parse_decl_attribute_list(&mut self, attrs: &mut DeclAttributes) {
        if !self.cursor.check(TokenKind::At) {
            return;
        }
        attrs.at_span = Some(self.cursor.current_span());
        loop {
            if self.consume_expected(TokenKind::At, ErrorCode::E1003).is_none() {
                return;
            }
            if self.parse_decl_attribute(attrs) {
                return;
            }
            // Commas are optional; any '@' continues the list, and a
            // trailing comma is tolerated.
            if self.cursor.check(TokenKind::At) {
                continue;
            }
            if self.cursor.consume_if(TokenKind::Comma).is_some() && self.cursor.check(TokenKind::At)
            {
                continue;
            }
            return;
        }
    }

    /// Parse an optional type attribute list.
    pub(crate) fn parse_type_attribute_list(&mut self, attrs: &mut TypeAttributes) {
        if !self.cursor.check(TokenKind::At) {
            return;
        }
        attrs.at_span = Some(self.cursor.current_span());
        loop {
            if self.consume_expected(TokenKind::At, ErrorCode::E1003).is_none() {
                return;
            }
            if self.parse_type_attribute(attrs) {
                return;
            }
            if self.cursor.check(TokenKind::At) {
                continue;
            }
            if self.cursor.consume_if(TokenKind::Comma).is_some() && self.cursor.check(TokenKind::At)
            {
                continue;
            }
            return;
        }
    }

    /// The attribute-name position accepts identifiers plus a few keywords
    /// whose spelling doubles as an attribute name.
    fn attribute_name_text(&self) -> Option<&str> {
        match self.cursor.current_kind() {
            TokenKind::Ident(name) => Some(self.cursor.text_of(name)),
            TokenKind::KwIn => Some("in"),
            TokenKind::KwWeak => Some("weak"),
            TokenKind::KwUnowned => Some("unowned"),
            _ => None,
        }
    }

    /// Recovery for unknown attributes: the name is already diagnosed; eat
    /// it and an optional `= value` tail.
    fn skip_unknown_attribute(&mut self) {
        self.cursor.advance();
        if self.cursor.consume_if(TokenKind::Equal).is_some() {
            if matches!(
                self.cursor.current_kind(),
                TokenKind::Ident(_) | TokenKind::IntLit(_) | TokenKind::FloatLit(_)
            ) {
                self.cursor.advance();
            }
        }
    }

    /// Parse one declaration attribute. Returns `true` on malformed input
    /// that should end the attribute list.
    ///
    /// \verbatim
    ///   attribute:
    ///     'asmname' '=' string-literal
    ///     'weak' | 'unowned' | 'noreturn' | 'optional' | ...
    /// \endverbatim
    pub(crate) fn parse_decl_attribute(&mut self, attrs: &mut DeclAttributes) -> bool {
        let Some(text) = self.attribute_name_text() else {
            self.error_at(
                ErrorCode::E1010,
                self.cursor.current_span(),
                "expected an attribute name",
            );
            return true;
        };

        let Some(kind) = DeclAttrKind::from_spelling(text) else {
            if TypeAttrKind::from_spelling(text).is_some() {
                self.error_at(
                    ErrorCode::E1012,
                    self.cursor.current_span(),
                    format!("attribute '{text}' can only be applied to types, not declarations"),
                );
            } else {
                self.error_at(
                    ErrorCode::E1011,
                    self.cursor.current_span(),
                    format!("unknown attribute '{text}'"),
                );
            }
            self.skip_unknown_attribute();
            return true;
        };

        let loc = self.cursor.advance();

        // Duplicates diagnose but keep the first location.
        let was_duplicate = attrs.has(kind);
        if was_duplicate {
            self.error_at(ErrorCode::E1014, loc, "duplicate attribute");
        } else {
            attrs.set(kind, loc);
        }

        match kind {
            // Ownership attributes: test for a sibling by temporarily
            // removing this one.
            DeclAttrKind::Weak | DeclAttrKind::Unowned if !was_duplicate => {
                attrs.clear(kind);
                if attrs.has_ownership() {
                    self.error_at(ErrorCode::E1014, loc, "duplicate attribute");
                } else {
                    attrs.set(kind, loc);
                }
            }

            // Resilience attributes: at most one of the set.
            DeclAttrKind::Resilient | DeclAttrKind::Fragile | DeclAttrKind::BornFragile
                if !was_duplicate =>
            {
                attrs.clear(kind);
                if !matches!(attrs.resilience(), vela_ir::attr::Resilience::Default) {
                    self.error_at(ErrorCode::E1014, loc, "duplicate attribute");
                } else {
                    attrs.set(kind, loc);
                }
            }

            DeclAttrKind::Prefix => {
                if attrs.is_postfix() {
                    self.error_at(
                        ErrorCode::E1015,
                        loc,
                        "attribute cannot be combined with 'postfix'",
                    );
                    attrs.clear(kind);
                }
            }

            DeclAttrKind::Postfix => {
                if attrs.is_prefix() {
                    self.error_at(
                        ErrorCode::E1015,
                        loc,
                        "attribute cannot be combined with 'prefix'",
                    );
                    attrs.clear(kind);
                }
            }

            DeclAttrKind::AsmName => {
                if self.cursor.consume_if(TokenKind::Equal).is_none() {
                    self.error_at(ErrorCode::E1016, loc, "'asmname' attribute requires '='");
                    attrs.clear(kind);
                    return false;
                }

                let token = *self.cursor.current();
                let TokenKind::StringLit { interpolated, .. } = token.kind else {
                    self.error_at(
                        ErrorCode::E1017,
                        loc,
                        "'asmname' attribute requires a string literal",
                    );
                    attrs.clear(kind);
                    return false;
                };

                let content = token.span.shrink(1);
                let segments = vela_lexer::string_segments(self.source, content);
                if interpolated
                    || segments.len() != 1
                    || matches!(segments[0].kind, vela_lexer::SegmentKind::Expr)
                {
                    self.error_at(
                        ErrorCode::E1018,
                        loc,
                        "'asmname' string cannot be an interpolated string",
                    );
                    attrs.clear(kind);
                } else {
                    attrs.asm_name = Some(segments[0].span);
                }
                self.cursor.advance();
            }

            _ => {}
        }

        false
    }

    /// Parse one type attribute. Returns `true` on malformed input that
    /// should end the attribute list.
    pub(crate) fn parse_type_attribute(&mut self, attrs: &mut TypeAttributes) -> bool {
        let Some(text) = self.attribute_name_text() else {
            self.error_at(
                ErrorCode::E1010,
                self.cursor.current_span(),
                "expected an attribute name",
            );
            return true;
        };

        let Some(kind) = TypeAttrKind::from_spelling(text) else {
            if DeclAttrKind::from_spelling(text).is_some() {
                self.error_at(
                    ErrorCode::E1013,
                    self.cursor.current_span(),
                    format!("attribute '{text}' can only be applied to declarations, not types"),
                );
            } else {
                self.error_at(
                    ErrorCode::E1011,
                    self.cursor.current_span(),
                    format!("unknown attribute '{text}'"),
                );
            }
            self.skip_unknown_attribute();
            return true;
        };

        let loc = self.cursor.advance();

        let was_duplicate = attrs.has(kind);
        if was_duplicate {
            self.error_at(ErrorCode::E1014, loc, "duplicate attribute");
        } else {
            attrs.set(kind, loc);
        }

        match kind {
            TypeAttrKind::LocalStorage | TypeAttrKind::SilSelf => {
                if !self.options.sil_mode {
                    self.error_at(
                        ErrorCode::E1023,
                        loc,
                        format!("attribute '{}' is only allowed in SIL mode", kind.spelling()),
                    );
                    attrs.clear(kind);
                }
            }

            // SIL-level ownership attributes.
            TypeAttrKind::SilWeak | TypeAttrKind::SilUnowned if !was_duplicate => {
                attrs.clear(kind);
                if !self.options.sil_mode {
                    self.error_at(
                        ErrorCode::E1023,
                        loc,
                        format!("attribute '{}' is only allowed in SIL mode", kind.spelling()),
                    );
                    return false;
                }
                if attrs.has_ownership() {
                    self.error_at(ErrorCode::E1014, loc, "duplicate attribute");
                } else {
                    attrs.set(kind, loc);
                }
            }

            // Cannot be both inout and auto_closure.
            TypeAttrKind::Inout => {
                if attrs.has(TypeAttrKind::AutoClosure) {
                    self.error_at(
                        ErrorCode::E1015,
                        loc,
                        "attribute cannot be combined with 'auto_closure'",
                    );
                    attrs.clear(TypeAttrKind::Inout);
                }
            }

            TypeAttrKind::AutoClosure => {
                if attrs.has(TypeAttrKind::Inout) {
                    self.error_at(
                        ErrorCode::E1015,
                        loc,
                        "attribute cannot be combined with 'inout'",
                    );
                    attrs.clear(TypeAttrKind::AutoClosure);
                }
            }

            TypeAttrKind::Cc => {
                // Parse the cc name in parens; the '(' must stay on the line.
                let mut name: Option<(String, vela_ir::Span)> = None;
                if let Some(lparen) = self.cursor.consume_if_not_at_line_start(TokenKind::LParen) {
                    if let TokenKind::Ident(ident) = self.cursor.current_kind() {
                        let text = self.cursor.text_of(ident).to_owned();
                        let name_span = self.cursor.advance();
                        name = Some((text, name_span));
                    } else {
                        self.error_at(
                            ErrorCode::E1020,
                            self.cursor.current_span(),
                            "expected calling convention name in 'cc' attribute",
                        );
                    }
                    if self
                        .parse_matching(TokenKind::RParen, ErrorCode::E1021, lparen)
                        .is_none()
                    {
                        // Diagnosed; keep whatever name we saw.
                    }
                } else {
                    self.error_at(
                        ErrorCode::E1019,
                        self.cursor.current_span(),
                        "expected '(' after 'cc' attribute",
                    );
                }

                if let Some((text, name_span)) = name {
                    match AbstractCC::from_name(&text) {
                        Some(cc) => attrs.cc = Some(cc),
                        None => {
                            self.emit(
                                Diagnostic::error(ErrorCode::E1022)
                                    .with_message(format!(
                                        "unknown calling convention '{text}'"
                                    ))
                                    .with_label(name_span, "here"),
                            );
                            attrs.clear(kind);
                        }
                    }
                }
                return false;
            }

            _ => {}
        }

        false
    }
}
