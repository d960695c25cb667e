//! Extension declaration parsing.

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{Decl, DeclContextKind, DeclKind};
use vela_ir::attr::DeclAttributes;
use vela_ir::{DeclId, TokenKind};

use crate::{DeclParseFlags, Parser, ParserResult, ScopeKind};

impl Parser<'_> {
    /// Parse an `extension` declaration.
    ///
    /// \verbatim
    ///   extension:
    ///     'extension' attribute-list type-identifier inheritance?
    ///         '{' decl* '}'
    /// \endverbatim
    pub(crate) fn parse_decl_extension(
        &mut self,
        flags: DeclParseFlags,
        attrs: &DeclAttributes,
    ) -> ParserResult<DeclId> {
        let extension_span = self.cursor.advance(); // 'extension'

        let ty = self.parse_type_identifier_with_recovery();
        if ty.has_code_completion() {
            return ParserResult::code_completion();
        }
        let Some(ty_id) = ty.get() else {
            return ParserResult::error();
        };
        let mut status = ty.status();

        let mut inherited = Vec::new();
        if self.cursor.check(TokenKind::Colon) {
            status |= self.parse_inheritance(&mut inherited);
        }

        let mut decl = Decl::new(
            DeclKind::Extension {
                ty: ty_id,
                inherited,
                members: Vec::new(),
                braces: (extension_span, extension_span),
            },
            extension_span,
            self.current_context(),
        );
        decl.attrs = attrs.clone();
        let decl_id = self.arena.alloc_decl(decl);

        let mut members = Vec::new();
        let braces;
        match self.consume_expected(TokenKind::LBrace, ErrorCode::E1045) {
            None => {
                let here = self.cursor.current_span();
                braces = (here, here);
                status.set_is_parse_error();
            }
            Some(lbrace) => {
                let member_flags = DeclParseFlags::HAS_CONTAINER_TYPE
                    .with(DeclParseFlags::DISALLOW_STORED_INSTANCE_VAR);
                let (rbrace, body_error) = self.with_new_context(
                    DeclContextKind::Extension,
                    decl_id,
                    |p| {
                        p.with_scope(ScopeKind::Extension, |p| {
                            p.parse_nominal_members(&mut members, member_flags, lbrace, "extension")
                        })
                    },
                );
                braces = (lbrace, rbrace);
                // Code completion inside members cannot be helped here; only
                // the error bit propagates.
                if body_error {
                    status.set_is_parse_error();
                }
            }
        }

        {
            let decl = self.arena.decl_mut(decl_id);
            if let DeclKind::Extension {
                members: slot,
                braces: braces_slot,
                ..
            } = &mut decl.kind
            {
                *slot = members;
                *braces_slot = braces;
            }
            decl.span = extension_span.merge(braces.1);
        }

        if !flags.has(DeclParseFlags::ALLOW_TOP_LEVEL) {
            self.error_at(
                ErrorCode::E1005,
                extension_span,
                "declaration is only valid at file scope",
            );
            status.set_is_parse_error();
            // Tell the type checker not to touch this extension.
            self.arena.decl_mut(decl_id).invalid = true;
        }

        ParserResult::with_status(status, Some(decl_id))
    }
}
