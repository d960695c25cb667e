//! SIL top-level forms.
//!
//! In SIL mode the top level admits `sil`, `sil_stage`, `sil_vtable` and
//! `sil_global` forms. Their grammar belongs to a peer subsystem; the
//! declaration parser's responsibility ends at recognizing the leading
//! keyword and consuming the form (with brace balancing) so the ordinary
//! declarations around it parse normally. SIL bodies can only appear at the
//! top level.

use vela_ir::TokenKind;

use crate::Parser;

const SIL_KEYWORDS: [&str; 4] = ["sil", "sil_stage", "sil_vtable", "sil_global"];

impl Parser<'_> {
    /// Whether the cursor sits at a SIL top-level keyword. Outside SIL mode
    /// these lex as ordinary identifiers and never match here.
    pub(crate) fn at_sil_top_level(&self) -> bool {
        self.options.sil_mode
            && matches!(self.cursor.current_text(), Some(text) if SIL_KEYWORDS.contains(&text))
    }

    /// Consume one or more leading SIL top-level forms.
    pub(crate) fn parse_sil_top_level(&mut self) {
        while self.at_sil_top_level() && !self.cursor.is_at_end() {
            tracing::debug!(form = ?self.cursor.current_text(), "skipping SIL top-level form");
            self.cursor.advance();

            let mut depth = 0u32;
            while !self.cursor.is_at_end() {
                if depth == 0
                    && self.cursor.at_start_of_line()
                    && (self.at_sil_top_level() || self.is_start_of_decl())
                {
                    break;
                }
                if self.cursor.consume_if(TokenKind::LBrace).is_some() {
                    depth += 1;
                    continue;
                }
                if self.cursor.consume_if(TokenKind::RBrace).is_some() {
                    depth = depth.saturating_sub(1);
                    continue;
                }
                self.cursor.advance();
            }
        }
    }
}
