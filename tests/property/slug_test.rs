//! Property-based tests for collection slug derivation.

use linkshelf::types::collection::slugify;
use proptest::prelude::*;

fn arb_name() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            3 => "[A-Za-z0-9]{1,8}",
            1 => "[ \t\n]{1,3}",
            1 => "[éÅß_.!]{1,2}",
        ],
        0..8,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn prop_slug_has_no_whitespace(name in arb_name()) {
        let slug = slugify(&name);
        prop_assert!(!slug.chars().any(char::is_whitespace));
    }

    #[test]
    fn prop_slug_is_lowercase(name in arb_name()) {
        let slug = slugify(&name);
        prop_assert_eq!(slug.to_lowercase(), slug);
    }

    #[test]
    fn prop_slug_is_idempotent(name in arb_name()) {
        let once = slugify(&name);
        prop_assert_eq!(slugify(&once), once);
    }

    #[test]
    fn prop_slug_hyphens_only_join_words(name in "[a-z ]{0,30}") {
        let slug = slugify(&name);
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(!slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
        prop_assert_eq!(slug.split('-').filter(|w| !w.is_empty()).count(), name.split_whitespace().count());
    }

    #[test]
    fn prop_names_differing_in_case_and_spacing_collide(words in prop::collection::vec("[a-z]{1,6}", 1..5)) {
        let plain = words.join(" ");
        let shouted = words.iter().map(|w| w.to_uppercase()).collect::<Vec<_>>().join("   ");
        prop_assert_eq!(slugify(&plain), slugify(&shouted));
    }
}
