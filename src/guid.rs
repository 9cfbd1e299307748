//! Pseudo-random identifier strings
//!
//! Identifiers look like `3F2504E0-4F89-41D3-9A0C-0305E82C3301`: uppercase
//! hex, version nibble 4, variant nibble 8-B. Uniqueness is best effort only.

use uuid::Uuid;

/// Generates a new identifier
pub fn generate() -> String {
    Uuid::new_v4().hyphenated().to_string().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_format() {
        let id = generate();
        let groups: Vec<&str> = id.split('-').collect();
        assert_eq!(
            groups.iter().map(|g| g.len()).collect::<Vec<_>>(),
            vec![8, 4, 4, 4, 12]
        );
        assert!(id
            .chars()
            .all(|c| c == '-' || c.is_ascii_digit() || ('A'..='F').contains(&c)));
        assert!(groups[2].starts_with('4'));
        assert!(matches!(groups[3].chars().next(), Some('8' | '9' | 'A' | 'B')));
    }

    #[test]
    fn test_identifiers_differ() {
        let ids: HashSet<String> = (0..1000).map(|_| generate()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
