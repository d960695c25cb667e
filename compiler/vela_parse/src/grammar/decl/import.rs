//! Import declaration parsing.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::ast::{Decl, DeclKind, ImportKind};
use vela_ir::attr::{DeclAttrKind, DeclAttributes};
use vela_ir::{DeclId, TokenKind};

use crate::{DeclParseFlags, Parser, ParserResult};

impl Parser<'_> {
    /// Parse an `import` declaration, doing no token skipping on error.
    ///
    /// \verbatim
    ///   decl-import:
    ///     'import' attribute-list import-kind? import-path
    ///   import-kind:
    ///     'typealias' | 'struct' | 'class' | 'enum' | 'protocol'
    ///     | 'var' | 'func'
    ///   import-path:
    ///     any-identifier ('.' any-identifier)*
    /// \endverbatim
    pub(crate) fn parse_decl_import(
        &mut self,
        flags: DeclParseFlags,
        attrs: &mut DeclAttributes,
    ) -> ParserResult<DeclId> {
        let import_span = self.cursor.advance(); // 'import'

        // 'exported' is the only attribute imports honor.
        let exported = attrs.is_exported();
        attrs.clear(DeclAttrKind::Exported);
        if !attrs.is_empty() {
            let at = attrs.at_span.unwrap_or(import_span);
            self.emit(
                Diagnostic::error(ErrorCode::E1030)
                    .with_message("attributes are not allowed on import declarations")
                    .with_label(at, "here"),
            );
        }

        if !flags.has(DeclParseFlags::ALLOW_TOP_LEVEL) {
            self.error_at(
                ErrorCode::E1005,
                import_span,
                "declaration is only valid at file scope",
            );
            return ParserResult::error();
        }

        let mut kind = ImportKind::Module;
        let mut kind_span = None;
        if self.cursor.current_kind().is_keyword() {
            let mapped = match self.cursor.current_kind() {
                TokenKind::KwTypealias => Some(ImportKind::Type),
                TokenKind::KwStruct => Some(ImportKind::Struct),
                TokenKind::KwClass => Some(ImportKind::Class),
                TokenKind::KwEnum => Some(ImportKind::Enum),
                TokenKind::KwProtocol => Some(ImportKind::Protocol),
                TokenKind::KwVar => Some(ImportKind::Var),
                TokenKind::KwFunc => Some(ImportKind::Func),
                _ => None,
            };
            match mapped {
                Some(k) => {
                    kind = k;
                    kind_span = Some(self.cursor.advance());
                }
                None => {
                    self.error_at(
                        ErrorCode::E1002,
                        self.cursor.current_span(),
                        "expected identifier in import declaration",
                    );
                    return ParserResult::error();
                }
            }
        }

        let mut path = Vec::new();
        loop {
            match self.cursor.current_kind() {
                TokenKind::Ident(name) | TokenKind::Oper(name) => {
                    let span = self.cursor.advance();
                    path.push((name, span));
                }
                _ => {
                    self.error_at(
                        ErrorCode::E1002,
                        self.cursor.current_span(),
                        "expected identifier in import declaration",
                    );
                    return ParserResult::error();
                }
            }
            if self.cursor.consume_if(TokenKind::Period).is_none() {
                break;
            }
        }

        // A scoped import needs at least `Module.member`.
        if kind != ImportKind::Module && path.len() == 1 {
            self.error_at(
                ErrorCode::E1031,
                path[0].1,
                "expected module name in import declaration",
            );
            return ParserResult::error();
        }

        let end = path.last().map_or(import_span, |&(_, span)| span);
        let decl = Decl::new(
            DeclKind::Import {
                kind,
                kind_span,
                exported,
                path,
            },
            import_span.merge(end),
            self.current_context(),
        );
        ParserResult::ok(self.arena.alloc_decl(decl))
    }
}
