//! Compact discriminant tag for `TokenKind`.

/// Compact discriminant tag for `TokenKind`, with semantic range layout.
///
/// All values fit in a single `u8` (max 127) so recovery sets can use a
/// `u128` bitset. Categories sit in contiguous ranges with gaps for future
/// expansion:
///
/// | Range | Category    |
/// |-------|-------------|
/// | 0-9   | Literals    |
/// | 10-39 | Keywords    |
/// | 40-59 | Punctuation |
/// | 60-63 | Special     |
///
/// This enum is the single source of truth for discriminant values;
/// `TokenKind::tag()` derives from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenTag {
    // === Literals (0-9) ===
    Ident = 0,
    Oper = 1,
    IntLit = 2,
    FloatLit = 3,
    StringLit = 4,

    // === Keywords (10-39) ===
    KwImport = 10,
    KwExtension = 11,
    KwTypealias = 12,
    KwVar = 13,
    KwFunc = 14,
    KwEnum = 15,
    KwCase = 16,
    KwStruct = 17,
    KwClass = 18,
    KwProtocol = 19,
    KwInit = 20,
    KwDestructor = 21,
    KwSubscript = 22,
    KwStatic = 23,
    KwWeak = 24,
    KwUnowned = 25,
    KwIn = 26,
    KwSelf = 27,
    KwReturn = 28,

    // === Punctuation (40-59) ===
    LParen = 40,
    RParen = 41,
    LBrace = 42,
    RBrace = 43,
    LBracket = 44,
    RBracket = 45,
    Comma = 46,
    Colon = 47,
    Semi = 48,
    Equal = 49,
    Arrow = 50,
    At = 51,
    Period = 52,

    // === Special (60-63) ===
    CodeComplete = 60,
    Error = 61,
    Eof = 62,
}

impl TokenTag {
    /// Highest discriminant value in use. Must stay below 128 so token sets
    /// fit in a `u128` bitset.
    pub const MAX_DISCRIMINANT: u8 = TokenTag::Eof as u8;

    /// First and last keyword tags, for range checks.
    pub const FIRST_KEYWORD: u8 = TokenTag::KwImport as u8;
    pub const LAST_KEYWORD: u8 = TokenTag::KwReturn as u8;
}

#[cfg(test)]
mod tests {
    use super::TokenTag;

    #[test]
    fn discriminants_fit_bitset() {
        assert!(TokenTag::MAX_DISCRIMINANT < 128);
    }

    #[test]
    fn keyword_range_is_contiguous() {
        assert!(TokenTag::FIRST_KEYWORD <= TokenTag::KwSelf as u8);
        assert!((TokenTag::KwSelf as u8) <= TokenTag::LAST_KEYWORD);
    }
}
