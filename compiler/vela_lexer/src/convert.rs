//! Raw token conversion with string interning.

use vela_ir::{StringInterner, TokenKind};

use crate::raw_token::RawToken;
use crate::segments::has_interpolation;

/// Map an identifier slice to its keyword kind, if reserved.
fn keyword_kind(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "import" => TokenKind::KwImport,
        "extension" => TokenKind::KwExtension,
        "typealias" => TokenKind::KwTypealias,
        "var" => TokenKind::KwVar,
        "func" => TokenKind::KwFunc,
        "enum" => TokenKind::KwEnum,
        "case" => TokenKind::KwCase,
        "struct" => TokenKind::KwStruct,
        "class" => TokenKind::KwClass,
        "protocol" => TokenKind::KwProtocol,
        "init" => TokenKind::KwInit,
        "destructor" => TokenKind::KwDestructor,
        "subscript" => TokenKind::KwSubscript,
        "static" => TokenKind::KwStatic,
        "weak" => TokenKind::KwWeak,
        "unowned" => TokenKind::KwUnowned,
        "in" => TokenKind::KwIn,
        "self" => TokenKind::KwSelf,
        "return" => TokenKind::KwReturn,
        _ => return None,
    };
    Some(kind)
}

/// Parse an integer literal slice, tolerating `_` separators.
fn parse_int(text: &str) -> Option<u64> {
    let (digits, radix) = match text.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (text, 10),
    };
    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    u64::from_str_radix(&cleaned, radix).ok()
}

/// Parse a float literal slice, tolerating `_` separators.
fn parse_float(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    cleaned.parse().ok()
}

/// Convert a raw token to a `TokenKind`, interning payloads.
pub fn convert_token(raw: RawToken, slice: &str, interner: &StringInterner) -> TokenKind {
    match raw {
        RawToken::Ident => {
            keyword_kind(slice).unwrap_or_else(|| TokenKind::Ident(interner.intern(slice)))
        }
        RawToken::Oper => match slice {
            "=" => TokenKind::Equal,
            "->" => TokenKind::Arrow,
            "." => TokenKind::Period,
            _ => TokenKind::Oper(interner.intern(slice)),
        },
        RawToken::Int => match parse_int(slice) {
            Some(value) => TokenKind::IntLit(value),
            None => TokenKind::Error,
        },
        RawToken::Float => match parse_float(slice) {
            Some(value) => TokenKind::FloatLit(value.to_bits()),
            None => TokenKind::Error,
        },
        RawToken::String => {
            // Strip the quotes; the content keeps its escapes.
            let content = &slice[1..slice.len() - 1];
            TokenKind::StringLit {
                value: interner.intern(content),
                interpolated: has_interpolation(content),
            }
        }
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semi => TokenKind::Semi,
        RawToken::At => TokenKind::At,
        // Skipped by logos; never reaches conversion.
        RawToken::LineComment | RawToken::BlockComment => TokenKind::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_reserved() {
        let interner = StringInterner::new();
        assert_eq!(
            convert_token(RawToken::Ident, "var", &interner),
            TokenKind::KwVar
        );
        assert!(matches!(
            convert_token(RawToken::Ident, "operator", &interner),
            TokenKind::Ident(_)
        ));
    }

    #[test]
    fn reserved_operator_spellings() {
        let interner = StringInterner::new();
        assert_eq!(
            convert_token(RawToken::Oper, "=", &interner),
            TokenKind::Equal
        );
        assert_eq!(
            convert_token(RawToken::Oper, "->", &interner),
            TokenKind::Arrow
        );
        assert!(matches!(
            convert_token(RawToken::Oper, "==", &interner),
            TokenKind::Oper(_)
        ));
    }

    #[test]
    fn int_parsing_handles_hex_and_separators() {
        assert_eq!(parse_int("1_000"), Some(1000));
        assert_eq!(parse_int("0xFF"), Some(255));
    }
}
