//! Route to action-key resolution.
//!
//! Callers may name the operation class they are checking. When they don't,
//! it is derived from the route through a static, ordered table: exact entry
//! first, then the longest entry that is a string prefix of the route, then
//! [`DEFAULT_ACTION_KEY`].

use crate::constants::DEFAULT_ACTION_KEY;
use crate::util::route::normalize;

/// Built-in route to action mapping for the case-management screens.
pub const DEFAULT_ACTION_TABLE: &[(&str, &str)] = &[
    ("/dashboard/beneficiaries/add", "ADD"),
    ("/dashboard/beneficiaries/edit", "EDIT"),
    ("/dashboard/beneficiaries/delete", "DELETE"),
    ("/dashboard/baseline-qol/add", "ADD"),
    ("/dashboard/baseline-qol/edit", "EDIT"),
    ("/dashboard/baseline-qol/delete", "DELETE"),
    ("/dashboard/income/add", "ADD"),
    ("/dashboard/income/edit", "EDIT"),
    ("/dashboard/income/delete", "DELETE"),
    ("/dashboard/approvals/approve", "APPROVE"),
    ("/dashboard/approvals/reject", "REJECT"),
    ("/dashboard/reports/export", "EXPORT"),
    ("/dashboard/reports/pdf", "EXPORT"),
];

/// Upper-cases and trims a caller-supplied action key. Blank keys yield `None`.
#[must_use]
pub fn canonical_action_key(key: &str) -> Option<String> {
    let trimmed = key.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_ascii_uppercase())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTable {
    entries: Vec<(String, String)>,
}

impl ActionTable {
    /// Builds a table from `(route, action)` pairs. Routes are normalized and
    /// actions upper-cased; entry order is kept for tie-breaking.
    #[must_use]
    pub fn new<R, A>(entries: impl IntoIterator<Item = (R, A)>) -> Self
    where
        R: AsRef<str>,
        A: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .filter_map(|(route, action)| {
                let route = normalize(route.as_ref());
                let action = canonical_action_key(action.as_ref())?;
                (!route.is_empty()).then_some((route, action))
            })
            .collect();

        Self { entries }
    }

    /// Resolves the action key for a route. Always upper-case.
    #[must_use]
    pub fn action_for(&self, route: &str) -> String {
        let route = normalize(route);

        if let Some((_, action)) = self.entries.iter().find(|(key, _)| *key == route) {
            return action.clone();
        }

        // Longest string prefix; the first entry wins among equal lengths.
        let mut best: Option<&(String, String)> = None;
        for entry in &self.entries {
            if route.starts_with(entry.0.as_str())
                && best.is_none_or(|current| entry.0.len() > current.0.len())
            {
                best = Some(entry);
            }
        }

        best.map_or_else(|| DEFAULT_ACTION_KEY.to_string(), |(_, action)| action.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::new(DEFAULT_ACTION_TABLE.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_entry() {
        let table = ActionTable::default();
        assert_eq!(table.action_for("/dashboard/baseline-qol/add"), "ADD");
        assert_eq!(table.action_for("/dashboard/approvals/approve/"), "APPROVE");
    }

    #[test]
    fn prefix_entry() {
        let table = ActionTable::default();
        assert_eq!(table.action_for("/dashboard/baseline-qol/add/17"), "ADD");
        assert_eq!(table.action_for("/dashboard/income/edit/3?tab=2"), "EDIT");
    }

    #[test]
    fn longest_prefix_wins() {
        let table = ActionTable::new([("/a", "view"), ("/a/b", "edit"), ("/a/b/c", "delete")]);
        assert_eq!(table.action_for("/a/b/x"), "EDIT");
        assert_eq!(table.action_for("/a/b/c/d"), "DELETE");
        assert_eq!(table.action_for("/a/z"), "VIEW");
    }

    #[test]
    fn defaults_to_view() {
        let table = ActionTable::default();
        assert_eq!(table.action_for("/dashboard/beneficiaries"), "VIEW");
        assert_eq!(table.action_for(""), "VIEW");
    }

    #[test]
    fn output_is_uppercase() {
        let table = ActionTable::new([("/x/add", "add")]);
        assert_eq!(table.action_for("/x/add"), "ADD");
    }

    #[test]
    fn blank_entries_are_dropped() {
        let table = ActionTable::new([("", "ADD"), ("/x", " "), ("/y", "edit")]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn canonical_key() {
        assert_eq!(canonical_action_key(" edit "), Some("EDIT".to_string()));
        assert_eq!(canonical_action_key("  "), None);
    }
}
