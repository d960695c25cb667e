//! Brace item list parsing.
//!
//! A peer subsystem of the declaration parser: function, constructor,
//! destructor and accessor bodies are brace item lists. Accessor bodies are
//! unbraced runs of items that stop at the next accessor clause.

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{BraceItem, BraceItemList};
use vela_ir::{BraceItemListId, Span, TokenKind};

use crate::{DeclParseFlags, Parser, ParserResult, ParserStatus};

impl Parser<'_> {
    /// Parse `{ brace-item* }`.
    pub(crate) fn parse_brace_item_list(&mut self, code: ErrorCode) -> ParserResult<BraceItemListId> {
        let lbrace = self.cursor.current_span();
        if self.cursor.consume_if(TokenKind::LBrace).is_none() {
            self.error_at(code, lbrace, "expected '{' to begin body");
            return ParserResult::error();
        }

        let mut items = Vec::new();
        let mut status = self.parse_brace_items(&mut items, |p| p.cursor.check(TokenKind::RBrace));

        let rbrace = match self.parse_matching(TokenKind::RBrace, ErrorCode::E1046, lbrace) {
            Some(span) => span,
            None => {
                status.set_is_parse_error();
                self.cursor.previous_span()
            }
        };

        let id = self
            .arena
            .alloc_brace_list(BraceItemList::new(lbrace, items, rbrace));
        ParserResult::with_status(status, Some(id))
    }

    /// Parse the unbraced item run of one accessor clause, stopping at the
    /// next accessor keyword, an attribute list, or the closing brace.
    pub(crate) fn parse_accessor_items(&mut self, colon: Span) -> (BraceItemListId, ParserStatus) {
        let mut items = Vec::new();
        let status = self.parse_brace_items(&mut items, |p| {
            p.cursor.check(TokenKind::RBrace)
                || p.cursor.check(TokenKind::At)
                || p.cursor.ident_text_is("get")
                || p.cursor.ident_text_is("set")
        });
        let end = Span::point(self.cursor.previous_end());
        let id = self
            .arena
            .alloc_brace_list(BraceItemList::new(colon, items, end));
        (id, status)
    }

    /// Parse brace items until `stop` holds or the stream ends.
    fn parse_brace_items(
        &mut self,
        items: &mut Vec<BraceItem>,
        stop: impl Fn(&Parser<'_>) -> bool,
    ) -> ParserStatus {
        let mut status = ParserStatus::success();

        while !self.cursor.is_at_end() && !stop(self) {
            let start = self.cursor.position();

            if self.cursor.check(TokenKind::KwReturn) {
                let return_span = self.cursor.advance();
                let value = if stop(self) || self.cursor.is_at_end() {
                    None
                } else {
                    let result = self.parse_expr(ErrorCode::E1111);
                    status |= result.status();
                    result.get()
                };
                items.push(BraceItem::Return {
                    span: return_span,
                    value,
                });
            } else if self.is_start_of_decl() {
                let mut entries = Vec::new();
                let decl_status = self.parse_decl(&mut entries, DeclParseFlags::NONE);
                status |= decl_status;
                items.extend(entries.into_iter().map(BraceItem::Decl));
                if decl_status.is_error() {
                    self.skip_until_decl_rbrace();
                }
            } else {
                let result = self.parse_expr(ErrorCode::E1111);
                status |= result.status();
                match result.get() {
                    Some(expr) => items.push(BraceItem::Expr(expr)),
                    None => {
                        if result.has_code_completion() {
                            break;
                        }
                    }
                }
            }

            self.cursor.consume_if(TokenKind::Semi);

            if self.cursor.position() == start {
                // No progress; drop the offending token so the loop ends.
                self.cursor.advance();
            }
        }

        status
    }
}
