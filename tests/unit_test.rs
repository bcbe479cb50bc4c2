// Unit tests for ocm-users
// These tests exercise the public building blocks without touching the network

#[cfg(test)]
mod output_tests {
    use ocm_users::output::{DEFAULT_COLUMN_WIDTH, LineSink, MemorySink, RolePrinter};

    #[test]
    fn test_pad_is_always_exactly_width() {
        let printer = RolePrinter::default();
        for len in [0, 1, 38, 39, 40, 41, 100] {
            let value = "x".repeat(len);
            let padded = printer.pad(&value);
            assert_eq!(padded.chars().count(), DEFAULT_COLUMN_WIDTH, "len={len}");
        }
    }

    #[test]
    fn test_long_value_keeps_prefix() {
        let printer = RolePrinter::new(10);
        assert_eq!(printer.pad("0123456789abc"), "01234567  ");
    }

    #[test]
    fn test_roles_in_resolution_order() {
        let printer = RolePrinter::new(4);
        let roles: Vec<String> = vec!["first".into(), "second".into(), "third".into()];
        let line = printer.format("u", "i", &roles);
        assert!(line.ends_with("first second third"));
    }

    #[test]
    fn test_memory_sink_collects_lines() {
        let sink = MemorySink::new();
        sink.write_line(&RolePrinter::default().header()).unwrap();
        assert_eq!(sink.lines().len(), 1);
        assert!(sink.lines()[0].starts_with("USER"));
    }
}

#[cfg(test)]
mod search_tests {
    use std::collections::HashSet;

    use ocm_users::search::{RoleFilter, SearchScope, matches};

    #[test]
    fn test_matches_with_empty_wanted_set() {
        let wanted = HashSet::new();
        assert!(matches(&[], &wanted));
        assert!(matches(&["A".to_string()], &wanted));
    }

    #[test]
    fn test_matches_requires_intersection() {
        let wanted: HashSet<String> = ["A".to_string(), "C".to_string()].into();
        assert!(matches(&["B".to_string(), "C".to_string()], &wanted));
        assert!(!matches(&["B".to_string()], &wanted));
    }

    #[test]
    fn test_role_filter_from_cli_values() {
        let filter = RoleFilter::new(vec!["OrganizationAdmin".to_string()]);
        assert!(!filter.is_empty());
        assert!(filter.accepts(&["OrganizationAdmin".to_string()]));
    }

    #[test]
    fn test_scope_variants() {
        let roles = vec!["A".to_string()];
        let explicit = SearchScope::select(Some("o"), &[]);
        assert!(matches!(explicit, SearchScope::ExplicitOrg(_)));
        let role_query = SearchScope::select(None, &roles);
        assert!(matches!(role_query, SearchScope::RoleQuery(_)));
        assert_eq!(SearchScope::select(None, &[]), SearchScope::CurrentUserOrg);
    }
}

#[cfg(test)]
mod remote_tests {
    use ocm_users::remote::{Account, Page};

    #[test]
    fn test_account_struct() {
        let account = Account::new("1a2b", "jdoe").with_organization("org-1");
        assert_eq!(account.id, "1a2b");
        assert_eq!(account.username, "jdoe");
        assert_eq!(account.organization_id(), Some("org-1"));
    }

    #[test]
    fn test_page_last_detection() {
        let full = Page::new(vec![Account::new("1", "a"), Account::new("2", "b")]);
        assert!(!full.is_last(2));
        assert!(full.is_last(3));
    }
}
