//! Typealias and associated-type parsing.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::ast::{Decl, DeclKind};
use vela_ir::attr::DeclAttributes;
use vela_ir::{DeclId, TokenKind, TokenTag};

use crate::recovery::TokenSet;
use crate::{Parser, ParserResult};

impl Parser<'_> {
    /// Parse a typealias declaration.
    ///
    /// In protocol context the alias declares an associated type: no `=` is
    /// allowed, and a spelled definition is diagnosed and dropped.
    ///
    /// \verbatim
    ///   decl-typealias:
    ///     'typealias' identifier inheritance? ('=' type)?
    /// \endverbatim
    pub(crate) fn parse_decl_typealias(
        &mut self,
        want_definition: bool,
        is_associated_type: bool,
        attrs: &DeclAttributes,
    ) -> ParserResult<DeclId> {
        let typealias_span = self.cursor.advance(); // 'typealias'

        if attrs.is_valid() {
            let at = attrs.at_span.unwrap_or(typealias_span);
            self.emit(
                Diagnostic::error(ErrorCode::E1035)
                    .with_message("attributes are not allowed on typealias declarations")
                    .with_label(at, "here"),
            );
        }

        let name_result = self.parse_identifier_decl_name(
            TokenSet::new().with(TokenTag::Colon).with(TokenTag::Equal),
            false,
            Some((ErrorCode::E1002, "typealias")),
        );
        let Some((name, name_span)) = name_result.get() else {
            return ParserResult::error();
        };
        let mut status = name_result.status();

        let mut inherited = Vec::new();
        if self.cursor.check(TokenKind::Colon) {
            status |= self.parse_inheritance(&mut inherited);
        }

        let mut underlying = None;
        if want_definition || self.cursor.check(TokenKind::Equal) {
            if self
                .consume_expected(TokenKind::Equal, ErrorCode::E1036)
                .is_none()
            {
                status.set_is_parse_error();
                return ParserResult::with_status(status, None);
            }
            let ty = self.parse_type(ErrorCode::E1110);
            status |= ty.status();
            let Some(ty_id) = ty.get() else {
                return ParserResult::with_status(status, None);
            };
            underlying = Some(ty_id);

            if !want_definition {
                // Associated types must not have definitions; discard it.
                self.emit(
                    Diagnostic::error(ErrorCode::E1037)
                        .with_message(format!(
                            "associated type '{}' must not have a definition",
                            self.cursor.text_of(name)
                        ))
                        .with_label(name_span, "here"),
                );
                underlying = None;
            }
        }

        let end = self.cursor.previous_span();
        let decl = if is_associated_type {
            Decl::new(
                DeclKind::AssociatedType {
                    name,
                    name_span,
                    inherited,
                },
                typealias_span.merge(end),
                self.current_context(),
            )
        } else {
            Decl::new(
                DeclKind::TypeAlias {
                    name,
                    name_span,
                    inherited,
                    underlying,
                },
                typealias_span.merge(end),
                self.current_context(),
            )
        };

        let decl_id = self.arena.alloc_decl(decl);
        self.set_local_discriminator(decl_id);
        ParserResult::with_status(status, Some(decl_id))
    }
}
