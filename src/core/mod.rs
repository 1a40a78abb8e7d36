//! Core business logic - framework-agnostic workflow operations over the event store.

/// Approval request guard and approval listings
pub mod approval;
/// Budget line totals and budget item mutations
pub mod budget;
/// Approval decision handling
pub mod decision;
/// Teams, departments and profiles
pub mod directory;
/// Event creation, lookup and manual status edits
pub mod event;
/// Log-and-continue wrapper for background side effects
pub mod housekeeping;
/// Event progress synchronization
pub mod progress;
/// Task mutations
pub mod task;

/// Trims a free-text field, mapping blank input to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(Some(" palco ".to_string())), Some("palco".to_string()));
    }
}
