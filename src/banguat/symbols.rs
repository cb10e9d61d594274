//! Static mapping from Banguat numeric currency codes to display symbols.

/// Display symbol for a numeric currency code, `None` when the code is not
/// in the published table.
pub fn symbol_for(code: i64) -> Option<&'static str> {
    match code {
        1 => Some("Q"),  // Quetzal
        2 => Some("$"),  // US dollar
        3 => Some("€"),  // Euro
        4 => Some("£"),  // Pound sterling
        5 => Some("¥"),  // Yen
        6 => Some("₩"),  // Won
        7 => Some("¥"),  // Yuan
        8 => Some("$"),  // Mexican peso
        9 => Some("R$"), // Brazilian real
        10 => Some("$"), // Argentine peso
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(symbol_for(1), Some("Q"));
        assert_eq!(symbol_for(2), Some("$"));
        assert_eq!(symbol_for(3), Some("€"));
        assert_eq!(symbol_for(9), Some("R$"));
    }

    #[test]
    fn test_yen_and_yuan_share_a_symbol() {
        assert_eq!(symbol_for(5), symbol_for(7));
    }

    #[test]
    fn test_unknown_codes_have_no_symbol() {
        assert_eq!(symbol_for(0), None);
        assert_eq!(symbol_for(11), None);
        assert_eq!(symbol_for(-3), None);
    }
}
