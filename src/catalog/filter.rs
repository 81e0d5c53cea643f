//! Search and category filtering over a catalog.
//!
//! Filtering is a pure projection: the input slice is never touched and the
//! result keeps the relative order of the matches.

use super::types::{AppRecord, Category};

/// Return the records matching both the search term and the category.
///
/// - The term is matched case-insensitively, as typed, as a substring of
///   `name`, `company`, and `app_id` (when present). An empty or
///   whitespace-only term matches every record.
/// - `None` for the category matches every record.
pub fn filter(all: &[AppRecord], term: &str, category: Option<Category>) -> Vec<AppRecord> {
    let needle = normalize_term(term);
    all.iter()
        .filter(|app| matches_category(app, category) && matches_term(app, &needle))
        .cloned()
        .collect()
}

/// Lowercase a raw search term. Whitespace-only terms become empty;
/// otherwise surrounding spaces are kept and take part in the match.
pub fn normalize_term(term: &str) -> String {
    if term.trim().is_empty() {
        return String::new();
    }
    term.to_lowercase()
}

/// `needle` must already be normalized with [`normalize_term`].
pub fn matches_term(app: &AppRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    app.name.to_lowercase().contains(needle)
        || app.company.to_lowercase().contains(needle)
        || app
            .app_id
            .as_deref()
            .is_some_and(|id| id.to_lowercase().contains(needle))
}

pub fn matches_category(app: &AppRecord, category: Option<Category>) -> bool {
    category.is_none_or(|c| app.category == c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn app(id: i64, name: &str, company: &str, category: Category) -> AppRecord {
        AppRecord {
            id,
            app_id: None,
            name: name.to_string(),
            company: company.to_string(),
            category,
            icon_url: String::new(),
            update_time: None,
            insert_time: None,
        }
    }

    fn sample() -> Vec<AppRecord> {
        vec![
            app(1, "Alpha", "Acme", Category::Game),
            app(2, "Beta", "Zenith", Category::News),
        ]
    }

    fn ids(apps: &[AppRecord]) -> Vec<i64> {
        apps.iter().map(|a| a.id).collect()
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        assert_eq!(ids(&filter(&sample(), "al", None)), vec![1]);
        assert_eq!(ids(&filter(&sample(), "AL", None)), vec![1]);
    }

    #[test]
    fn category_filter_is_exact() {
        assert_eq!(ids(&filter(&sample(), "", Some(Category::News))), vec![2]);
        assert!(filter(&sample(), "", Some(Category::General)).is_empty());
    }

    #[test]
    fn search_matches_company() {
        assert_eq!(ids(&filter(&sample(), "zen", None)), vec![2]);
    }

    #[test]
    fn search_matches_app_id_when_present() {
        let mut apps = sample();
        apps[1].app_id = Some("com.zenith.Beta.Reader".into());
        assert_eq!(ids(&filter(&apps, "reader", None)), vec![2]);
    }

    #[test]
    fn empty_and_whitespace_terms_match_everything() {
        assert_eq!(ids(&filter(&sample(), "", None)), vec![1, 2]);
        assert_eq!(ids(&filter(&sample(), "   ", None)), vec![1, 2]);
    }

    #[test]
    fn surrounding_spaces_are_part_of_the_term() {
        let apps = vec![
            app(1, "Sky Runner", "Bluepeak", Category::Game),
            app(2, "Runnerz", "Acme", Category::Game),
        ];
        assert_eq!(ids(&filter(&apps, " runner", None)), vec![1]);
        assert_eq!(ids(&filter(&apps, "runner", None)), vec![1, 2]);
        assert_eq!(normalize_term("  "), "");
        assert_eq!(normalize_term(" Sky "), " sky ");
    }

    #[test]
    fn both_predicates_must_hold() {
        assert!(filter(&sample(), "alpha", Some(Category::News)).is_empty());
        assert_eq!(ids(&filter(&sample(), "alpha", Some(Category::Game))), vec![1]);
    }

    #[test]
    fn unicode_terms_match() {
        let apps = vec![app(9, "天气预报", "Météo", Category::General)];
        assert_eq!(ids(&filter(&apps, "天气", None)), vec![9]);
        assert_eq!(ids(&filter(&apps, "MÉTÉO", None)), vec![9]);
    }

    #[test]
    fn input_is_left_untouched() {
        let apps = sample();
        let before = apps.clone();
        let _ = filter(&apps, "beta", Some(Category::News));
        assert_eq!(apps, before);
    }
}
