//! Default expense category catalogue shown by the category picker.

/// One entry of the built-in category catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
}

const fn category(id: &'static str, name: &'static str, emoji: &'static str) -> ExpenseCategory {
    ExpenseCategory { id, name, emoji }
}

pub const DEFAULT_EXPENSE_CATEGORIES: [ExpenseCategory; 12] = [
    category("1", "Food & Dining", "🍔"),
    category("2", "Transportation", "🚗"),
    category("3", "Shopping", "🛍️"),
    category("4", "Utilities", "💡"),
    category("5", "Entertainment", "🎮"),
    category("6", "Healthcare", "🏥"),
    category("7", "Groceries", "🛒"),
    category("8", "Travel", "✈️"),
    category("9", "Education", "📚"),
    category("10", "Housing", "🏠"),
    category("11", "Personal Care", "💅"),
    category("12", "Gifts", "🎁"),
];

/// Looks up a catalogue entry by exact display name.
pub fn find_category(name: &str) -> Option<&'static ExpenseCategory> {
    DEFAULT_EXPENSE_CATEGORIES
        .iter()
        .find(|category| category.name == name)
}

#[cfg(test)]
mod tests {
    use super::{find_category, DEFAULT_EXPENSE_CATEGORIES};
    use std::collections::HashSet;

    #[test]
    fn catalogue_ids_and_names_are_unique() {
        let ids: HashSet<_> = DEFAULT_EXPENSE_CATEGORIES.iter().map(|c| c.id).collect();
        let names: HashSet<_> = DEFAULT_EXPENSE_CATEGORIES.iter().map(|c| c.name).collect();
        assert_eq!(ids.len(), DEFAULT_EXPENSE_CATEGORIES.len());
        assert_eq!(names.len(), DEFAULT_EXPENSE_CATEGORIES.len());
    }

    #[test]
    fn find_category_matches_exact_name_only() {
        assert_eq!(find_category("Groceries").map(|c| c.emoji), Some("🛒"));
        assert!(find_category("groceries").is_none());
    }
}
