//! Identifier parsing with keyword resynchronization.
//!
//! Declaration-name positions recover from a keyword in name position when
//! the following token is one of a small set of expected resynchronization
//! tokens: a sentinel identifier is synthesized from the keyword text plus
//! `#` (unspellable in source, so nothing can resolve to it), the keyword is
//! consumed, and the parse continues as a success.

use vela_diagnostic::ErrorCode;
use vela_ir::{Name, Span, TokenKind};

use crate::recovery::TokenSet;
use crate::{Parser, ParserResult};

impl Parser<'_> {
    /// Parse a declaration name.
    ///
    /// `resync` is the set of tokens that, when seen after a keyword in name
    /// position, justify treating the keyword as a misspelled name. When
    /// `resync_starts_with_less` is set, an operator token starting with `<`
    /// (the opening of a generic parameter list) also qualifies. `diag`
    /// carries the diagnostic to emit when the name is missing; `None`
    /// suppresses it (the caller already diagnosed).
    pub(crate) fn parse_identifier_decl_name(
        &mut self,
        resync: TokenSet,
        resync_starts_with_less: bool,
        diag: Option<(ErrorCode, &'static str)>,
    ) -> ParserResult<(Name, Span)> {
        if let TokenKind::Ident(name) = self.cursor.current_kind() {
            let span = self.cursor.advance();
            return ParserResult::ok((name, span));
        }

        if let Some((code, what)) = diag {
            self.error_at(
                code,
                self.cursor.current_span(),
                format!("expected identifier in {what} declaration"),
            );
        }

        let kind = self.cursor.current_kind();
        if kind.is_keyword() {
            let peek = *self.cursor.peek();
            let peek_matches = resync.contains(&peek.kind)
                || (resync_starts_with_less && self.cursor.token_starts_with_less(&peek));
            if peek_matches {
                // Append a character that cannot be spelled in source so
                // nothing can resolve to the recovered name.
                let text = kind.keyword_text().unwrap_or("");
                let sentinel = format!("{text}#");
                let name = self.interner().intern(&sentinel);
                let span = self.cursor.advance();
                // Recovered: report success.
                return ParserResult::ok((name, span));
            }
        }

        ParserResult::error()
    }

    /// Parse any identifier: a plain identifier or an operator token (for
    /// operator function names).
    pub(crate) fn parse_any_identifier(&mut self) -> Option<(Name, Span)> {
        match self.cursor.current_kind() {
            TokenKind::Ident(name) | TokenKind::Oper(name) => {
                let span = self.cursor.advance();
                Some((name, span))
            }
            _ => None,
        }
    }
}
