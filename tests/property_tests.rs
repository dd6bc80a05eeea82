//! Property-based tests for search and parsing.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use pr_commenter::comment::{compose_body, find_comment, find_comments, marker, parse_reactions};
use pr_commenter::forge::mock::MockForge;
use pr_commenter::forge::{Reaction, RepoRef};

/// Strategy for reaction tokens, valid or not.
fn reaction_token() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(Reaction::all().to_vec()).prop_map(|r| r.as_str().to_string()),
        "[a-z+\\-]{0,8}",
    ]
}

/// Strategy for whitespace that may surround tokens.
fn padding() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec![' ', '\t', '\n']), 0..3)
        .prop_map(|chars| chars.into_iter().collect())
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    /// Parsed reactions are recognised, unique, and in first-occurrence order.
    #[test]
    fn parsed_reactions_are_unique_and_ordered(
        tokens in prop::collection::vec((padding(), reaction_token(), padding()), 0..12)
    ) {
        let raw = tokens
            .iter()
            .map(|(l, t, r)| format!("{}{}{}", l, t, r))
            .collect::<Vec<_>>()
            .join(",");

        let parsed = parse_reactions(&raw);

        let mut expected: Vec<Reaction> = Vec::new();
        for (_, token, _) in &tokens {
            let compact: String = token.chars().filter(|c| !c.is_whitespace()).collect();
            if let Some(r) = Reaction::parse(&compact) {
                if !expected.contains(&r) {
                    expected.push(r);
                }
            }
        }
        prop_assert_eq!(parsed, expected);
    }

    /// Unmatched searches fetch every content page plus one empty page.
    #[test]
    fn search_fetch_count(n in 0usize..40, p in 1usize..10) {
        let forge = MockForge::new().with_page_size(p);
        for i in 0..n {
            forge.seed_comment(1, Some(&format!("comment {}", i)));
        }
        let repo = RepoRef::new("o", "r");

        let found = block_on(find_comments(&forge, &repo, 1, &marker("t"), None)).unwrap();

        prop_assert!(found.is_empty());
        prop_assert_eq!(forge.page_fetches(), n.div_ceil(p) + 1);
    }

    /// The single-match search returns the first tagged comment in arrival order.
    #[test]
    fn first_match_wins(
        tagged in prop::collection::vec(any::<bool>(), 1..20),
        p in 1usize..6,
    ) {
        let forge = MockForge::new().with_page_size(p);
        let mut first = None;
        for (i, is_tagged) in tagged.iter().enumerate() {
            let body = if *is_tagged {
                compose_body(&format!("c{}", i), Some("t"))
            } else {
                format!("c{}", i)
            };
            let comment = forge.seed_comment(1, Some(&body));
            if *is_tagged && first.is_none() {
                first = Some(comment);
            }
        }
        let repo = RepoRef::new("o", "r");

        let found = block_on(find_comment(&forge, &repo, 1, &marker("t"), None)).unwrap();

        prop_assert_eq!(found, first);
    }

    /// A tag marker never matches a body tagged with a different tag.
    #[test]
    fn markers_do_not_cross_match(a in "[a-z0-9-]{1,12}", b in "[a-z0-9-]{1,12}") {
        prop_assume!(a != b);
        let body = compose_body("content", Some(&a));
        prop_assert!(body.contains(&marker(&a)));
        prop_assert!(!body.contains(&marker(&b)));
    }
}
