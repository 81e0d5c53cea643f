//! Property tests for the filter engine.

use appshelf::catalog::{filter, AppRecord, Category, CATEGORY_FILTERS};
use proptest::prelude::*;

fn arb_category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Game),
        Just(Category::ShortPlay),
        Just(Category::News),
        Just(Category::General),
        Just(Category::Unknown),
    ]
}

fn arb_filter() -> impl Strategy<Value = Option<Category>> {
    (0..CATEGORY_FILTERS.len()).prop_map(|i| CATEGORY_FILTERS[i])
}

fn arb_catalog() -> impl Strategy<Value = Vec<AppRecord>> {
    prop::collection::vec(
        (
            "[A-Za-z ]{0,12}",
            "[A-Za-z ]{0,12}",
            prop::option::of("[a-z.]{0,12}"),
            arb_category(),
        ),
        0..24,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (name, company, app_id, category))| AppRecord {
                id: i as i64 + 1,
                app_id,
                name,
                company,
                category,
                icon_url: String::new(),
                update_time: None,
                insert_time: None,
            })
            .collect()
    })
}

/// Returns true if `sub` appears in `all` in the same relative order.
fn is_ordered_subsequence(sub: &[AppRecord], all: &[AppRecord]) -> bool {
    let mut rest = all.iter();
    sub.iter().all(|s| rest.any(|a| a == s))
}

proptest! {
    #[test]
    fn result_is_ordered_subsequence(
        catalog in arb_catalog(),
        term in "[A-Za-z ]{0,4}",
        category in arb_filter(),
    ) {
        let result = filter(&catalog, &term, category);
        prop_assert!(is_ordered_subsequence(&result, &catalog));
    }

    #[test]
    fn empty_term_and_all_is_identity(catalog in arb_catalog()) {
        prop_assert_eq!(filter(&catalog, "", None), catalog);
    }

    #[test]
    fn filtering_is_idempotent(
        catalog in arb_catalog(),
        term in "[A-Za-z ]{0,4}",
        category in arb_filter(),
    ) {
        let once = filter(&catalog, &term, category);
        let twice = filter(&once, &term, category);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn every_result_matches_category(
        catalog in arb_catalog(),
        category in arb_category(),
    ) {
        let result = filter(&catalog, "", Some(category));
        prop_assert!(result.iter().all(|a| a.category == category));
    }

    #[test]
    fn search_is_case_insensitive(catalog in arb_catalog(), term in "[a-z]{1,3}") {
        let lower = filter(&catalog, &term, None);
        let upper = filter(&catalog, &term.to_uppercase(), None);
        prop_assert_eq!(lower, upper);
    }
}
