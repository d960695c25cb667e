//! Error recovery for the parser.
//!
//! Provides token sets and synchronization helpers for continuing parsing
//! after errors. Token sets use a `u128` bitset over discriminant indices
//! for O(1) membership testing.

use vela_ir::{TokenKind, TokenTag};

use crate::cursor::Cursor;

// Compile-time assertion: TokenSet uses a u128 bitset, so all discriminant
// indices must fit in 0..127.
const _: () = assert!(
    TokenTag::MAX_DISCRIMINANT < 128,
    "TokenSet uses u128 bitset; all discriminant indices must be < 128"
);

/// A set of token kinds using bitset representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    /// Create an empty token set.
    #[inline]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Create a token set containing a single tag.
    #[inline]
    pub const fn single(tag: TokenTag) -> Self {
        Self(1u128 << (tag as u8))
    }

    /// Add a tag to this set (builder pattern for const contexts).
    #[inline]
    #[must_use]
    pub const fn with(self, tag: TokenTag) -> Self {
        Self(self.0 | (1u128 << (tag as u8)))
    }

    /// Union of two token sets.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check if this set contains a token kind.
    #[inline]
    pub const fn contains(&self, kind: &TokenKind) -> bool {
        (self.0 & (1u128 << kind.discriminant_index())) != 0
    }

    /// Check if this set contains a raw discriminant tag.
    #[inline]
    pub const fn contains_tag(&self, tag: u8) -> bool {
        (self.0 & (1u128 << tag)) != 0
    }

    /// Check if this set is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TokenSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Keywords that introduce a declaration. `@` is included because an
/// attribute list can only precede a declaration.
pub const DECL_KEYWORDS: TokenSet = TokenSet::new()
    .with(TokenTag::KwImport)
    .with(TokenTag::KwExtension)
    .with(TokenTag::KwTypealias)
    .with(TokenTag::KwVar)
    .with(TokenTag::KwFunc)
    .with(TokenTag::KwEnum)
    .with(TokenTag::KwCase)
    .with(TokenTag::KwStruct)
    .with(TokenTag::KwClass)
    .with(TokenTag::KwProtocol)
    .with(TokenTag::KwInit)
    .with(TokenTag::KwDestructor)
    .with(TokenTag::KwSubscript)
    .with(TokenTag::KwStatic)
    .with(TokenTag::At);

/// Declaration starters minus `var`, for malformed-body truncation.
pub const DECL_KEYWORDS_NO_VAR: TokenSet = TokenSet::new()
    .with(TokenTag::KwImport)
    .with(TokenTag::KwExtension)
    .with(TokenTag::KwTypealias)
    .with(TokenTag::KwFunc)
    .with(TokenTag::KwEnum)
    .with(TokenTag::KwCase)
    .with(TokenTag::KwStruct)
    .with(TokenTag::KwClass)
    .with(TokenTag::KwProtocol)
    .with(TokenTag::KwInit)
    .with(TokenTag::KwDestructor)
    .with(TokenTag::KwSubscript)
    .with(TokenTag::KwStatic)
    .with(TokenTag::At);

/// Resynchronization tokens for declaration-name recovery.
pub const NAME_RESYNC: TokenSet = TokenSet::new()
    .with(TokenTag::Colon)
    .with(TokenTag::LBrace)
    .with(TokenTag::Equal)
    .with(TokenTag::LParen)
    .with(TokenTag::Arrow);

/// Advance the cursor until reaching a token in the recovery set or EOF.
///
/// Returns `true` if a recovery token was found, `false` at EOF.
pub fn synchronize(cursor: &mut Cursor<'_>, recovery: TokenSet) -> bool {
    while !cursor.is_at_end() {
        if recovery.contains_tag(cursor.current_tag()) {
            return true;
        }
        cursor.advance();
    }
    false
}

/// Skip until one of the given kinds (or EOF), without consuming the match.
pub fn skip_until(cursor: &mut Cursor<'_>, kinds: TokenSet) {
    synchronize(cursor, kinds);
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ir::StringInterner;

    #[test]
    fn set_membership() {
        assert!(DECL_KEYWORDS.contains(&TokenKind::KwVar));
        assert!(!DECL_KEYWORDS_NO_VAR.contains(&TokenKind::KwVar));
        assert!(DECL_KEYWORDS.contains(&TokenKind::At));
        assert!(!DECL_KEYWORDS.contains(&TokenKind::LBrace));
    }

    #[test]
    fn synchronize_stops_at_member() {
        let interner = StringInterner::new();
        let tokens = vela_lexer::lex("+ + + func f", &interner);
        let mut cursor = Cursor::new(&tokens, &interner);
        assert!(synchronize(&mut cursor, DECL_KEYWORDS));
        assert!(cursor.check(TokenKind::KwFunc));
    }

    #[test]
    fn synchronize_returns_false_at_eof() {
        let interner = StringInterner::new();
        let tokens = vela_lexer::lex("+ - *", &interner);
        let mut cursor = Cursor::new(&tokens, &interner);
        assert!(!synchronize(&mut cursor, DECL_KEYWORDS));
        assert!(cursor.is_at_end());
    }
}
