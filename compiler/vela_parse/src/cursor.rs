//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, conditional consumption and
//! position checkpointing. A cursor can be clamped to a sub-range of the
//! token list when replaying a deferred body; within the clamp it behaves as
//! if the range were the whole stream.

use vela_ir::{Name, Span, StringInterner, Token, TokenFlags, TokenKind, TokenList, TokenTag};

/// Opaque cursor checkpoint. Restoring rewinds the cursor exactly: the
/// tokens seen after restoration equal those originally seen.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct CursorPosition {
    pub(crate) pos: usize,
    /// Span end of the token before `pos`, for previous-location queries.
    pub(crate) previous_end: u32,
}

/// Cursor over a lexed token list.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    /// Dense array of discriminant tags, parallel to `tokens`.
    tags: &'a [u8],
    interner: &'a StringInterner,
    pos: usize,
    /// Exclusive upper bound for bounded replay; tokens at or past the
    /// limit read as EOF.
    limit: usize,
}

static EOF_TOKEN: Token = Token {
    kind: TokenKind::Eof,
    span: Span::DUMMY,
};

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of the token stream.
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Cursor {
            tokens,
            tags: tokens.tags(),
            interner,
            pos: 0,
            limit: tokens.len(),
        }
    }

    /// Get a reference to the string interner.
    #[inline]
    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    /// Current position in the token stream.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The current token.
    #[inline]
    pub fn current(&self) -> &Token {
        if self.pos < self.limit {
            &self.tokens[self.pos]
        } else {
            // Bounded replay: reads past the clamp are EOF.
            &EOF_TOKEN
        }
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the most recently consumed token.
    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    /// The location immediately following the previously consumed token.
    #[inline]
    pub fn previous_end(&self) -> u32 {
        self.previous_span().end
    }

    /// Discriminant tag of the current token.
    #[inline]
    pub fn current_tag(&self) -> u8 {
        if self.pos < self.limit {
            self.tags[self.pos]
        } else {
            TokenTag::Eof as u8
        }
    }

    /// Check if at end of the (possibly clamped) stream.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_tag() == TokenTag::Eof as u8
    }

    /// Check if the current token matches the given kind's discriminant.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_tag() == kind.discriminant_index()
    }

    #[inline]
    pub fn check_tag(&self, tag: TokenTag) -> bool {
        self.current_tag() == tag as u8
    }

    /// Peek at the next token (one-token lookahead).
    #[inline]
    pub fn peek(&self) -> &Token {
        if self.pos + 1 < self.limit {
            &self.tokens[self.pos + 1]
        } else {
            &EOF_TOKEN
        }
    }

    /// Whether the current token is the first non-trivia token on its line.
    #[inline]
    pub fn at_start_of_line(&self) -> bool {
        if self.pos < self.limit {
            self.tokens.flags_at(self.pos).has(TokenFlags::AT_LINE_START)
        } else {
            true
        }
    }

    /// Advance to the next token, returning the consumed token's span.
    #[inline]
    pub fn advance(&mut self) -> Span {
        let span = self.current_span();
        if self.pos < self.limit {
            self.pos += 1;
        }
        span
    }

    /// Consume the current token if it matches, returning its span.
    #[inline]
    pub fn consume_if(&mut self, kind: TokenKind) -> Option<Span> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume the current token if it matches and does not start a line.
    ///
    /// Used for trailing clauses that must stay on the same line, like the
    /// parenthesized name of the `cc` attribute.
    #[inline]
    pub fn consume_if_not_at_line_start(&mut self, kind: TokenKind) -> Option<Span> {
        if self.check(kind) && !self.at_start_of_line() {
            Some(self.advance())
        } else {
            None
        }
    }

    // --- Text predicates for contextual keywords ---

    /// Text of the current token, when it is an identifier or operator.
    pub fn current_text(&self) -> Option<&'a str> {
        match self.current().kind {
            TokenKind::Ident(name) | TokenKind::Oper(name) => Some(self.interner.lookup(name)),
            _ => None,
        }
    }

    /// Check if the current token is an identifier spelling `text`.
    pub fn ident_text_is(&self, text: &str) -> bool {
        matches!(self.current().kind, TokenKind::Ident(name) if self.interner.lookup(name) == text)
    }

    /// Check if the next token is an identifier spelling `text`.
    pub fn peek_ident_text_is(&self, text: &str) -> bool {
        matches!(self.peek().kind, TokenKind::Ident(name) if self.interner.lookup(name) == text)
    }

    /// Check if a token is an operator whose first character would open a
    /// generic parameter list.
    pub fn token_starts_with_less(&self, token: &Token) -> bool {
        matches!(token.kind, TokenKind::Oper(name) if self.interner.lookup(name).starts_with('<'))
    }

    /// `starts-with-less` on the current token.
    pub fn starts_with_less(&self) -> bool {
        let current = *self.current();
        self.token_starts_with_less(&current)
    }

    /// Check if the current token is an operator spelling `text` exactly.
    pub fn oper_text_is(&self, text: &str) -> bool {
        matches!(self.current().kind, TokenKind::Oper(name) if self.interner.lookup(name) == text)
    }

    /// Resolve a `Name` to its text.
    #[inline]
    pub fn text_of(&self, name: Name) -> &'a str {
        self.interner.lookup(name)
    }

    // --- Checkpointing ---

    /// Save the current position as an opaque checkpoint.
    #[inline]
    pub fn save_position(&self) -> CursorPosition {
        CursorPosition {
            pos: self.pos,
            previous_end: self.previous_end(),
        }
    }

    /// Restore a previously saved position.
    #[inline]
    pub fn restore_position(&mut self, position: CursorPosition) {
        debug_assert!(position.pos <= self.tokens.len());
        self.pos = position.pos;
    }

    /// Clamp the cursor to `[start, end)` for bounded replay. Returns the
    /// previous limit, which the caller must reinstall when done.
    pub fn begin_bounded_replay(&mut self, start: usize, end: usize) -> usize {
        let old_limit = self.limit;
        self.limit = end.min(self.tokens.len());
        self.pos = start;
        old_limit
    }

    /// End a bounded replay, reinstalling the saved limit.
    pub fn end_bounded_replay(&mut self, old_limit: usize) {
        self.limit = old_limit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ir::StringInterner;

    fn cursor_over(source: &str, interner: &StringInterner) -> TokenList {
        vela_lexer::lex(source, interner)
    }

    #[test]
    fn checkpoint_restores_exactly() {
        let interner = StringInterner::new();
        let tokens = cursor_over("var x = 1", &interner);
        let mut cursor = Cursor::new(&tokens, &interner);

        let saved = cursor.save_position();
        let first: Vec<TokenKind> = (0..3).map(|_| {
            let kind = cursor.current_kind();
            cursor.advance();
            kind
        }).collect();

        cursor.restore_position(saved);
        let second: Vec<TokenKind> = (0..3).map(|_| {
            let kind = cursor.current_kind();
            cursor.advance();
            kind
        }).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn bounded_replay_reads_eof_at_limit() {
        let interner = StringInterner::new();
        let tokens = cursor_over("a b c d", &interner);
        let mut cursor = Cursor::new(&tokens, &interner);

        let old = cursor.begin_bounded_replay(1, 3);
        assert!(matches!(cursor.current_kind(), TokenKind::Ident(_)));
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_at_end());
        cursor.end_bounded_replay(old);
        assert!(!cursor.is_at_end());
    }

    #[test]
    fn starts_with_less_detects_operator() {
        let interner = StringInterner::new();
        let tokens = cursor_over("<*>", &interner);
        let cursor = Cursor::new(&tokens, &interner);
        assert!(cursor.starts_with_less());
    }

    #[test]
    fn consume_if_not_at_line_start_requires_same_line() {
        let interner = StringInterner::new();
        let tokens = cursor_over("cc\n(", &interner);
        let mut cursor = Cursor::new(&tokens, &interner);
        cursor.advance(); // cc
        assert!(cursor.consume_if_not_at_line_start(TokenKind::LParen).is_none());
        assert!(cursor.consume_if(TokenKind::LParen).is_some());
    }
}
