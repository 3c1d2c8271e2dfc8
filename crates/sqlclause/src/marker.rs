//! Operand rendering mode.

/// How a condition renders its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Marker {
    /// Render each operand as a `?` placeholder, bound later.
    #[default]
    Placeholder,
    /// Render operands inline as SQL literals.
    UseValue,
}

impl Marker {
    /// Pick the mode matching a "placeholders enabled" flag.
    pub fn from_placeholders(enabled: bool) -> Self {
        if enabled {
            Marker::Placeholder
        } else {
            Marker::UseValue
        }
    }

    /// The token emitted for one operand: `?`, or nothing in literal mode.
    pub fn symbol(self) -> &'static str {
        match self {
            Marker::Placeholder => "?",
            Marker::UseValue => "",
        }
    }

    /// Whether operands are bound rather than inlined.
    pub fn is_placeholder(self) -> bool {
        self == Marker::Placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::Marker;

    #[test]
    fn symbols() {
        assert_eq!(Marker::Placeholder.symbol(), "?");
        assert_eq!(Marker::UseValue.symbol(), "");
        assert_eq!(Marker::from_placeholders(false), Marker::UseValue);
    }
}
