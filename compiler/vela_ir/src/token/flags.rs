//! Per-token metadata flags.

/// Compact per-token flags, stored in a parallel array in `TokenList`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[repr(transparent)]
pub struct TokenFlags(u8);

impl TokenFlags {
    /// No flags set.
    pub const EMPTY: TokenFlags = TokenFlags(0);

    /// The token is the first non-trivia token on its line.
    pub const AT_LINE_START: TokenFlags = TokenFlags(1);

    /// Combine flag sets.
    #[inline]
    #[must_use]
    pub const fn with(self, other: TokenFlags) -> TokenFlags {
        TokenFlags(self.0 | other.0)
    }

    /// Check whether all bits of `other` are set.
    #[inline]
    pub const fn has(self, other: TokenFlags) -> bool {
        (self.0 & other.0) == other.0
    }
}

#[cfg(test)]
mod tests {
    use super::TokenFlags;

    #[test]
    fn with_and_has() {
        let f = TokenFlags::EMPTY.with(TokenFlags::AT_LINE_START);
        assert!(f.has(TokenFlags::AT_LINE_START));
        assert!(!TokenFlags::EMPTY.has(TokenFlags::AT_LINE_START));
    }
}
