use proptest::prelude::*;

use globtask::task::{expand_destination, GlobPattern};

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,8}"
}

proptest! {
    #[test]
    fn single_star_never_crosses_a_separator(
        dirs in proptest::collection::vec(segment(), 1..4),
        name in segment(),
    ) {
        let pattern = GlobPattern::compile("src/*.scss").unwrap();
        let nested = format!("src/{}/{}.scss", dirs.join("/"), name);
        let flat = format!("src/{name}.scss");

        prop_assert!(!pattern.is_match(&nested));
        prop_assert!(pattern.is_match(&flat));
    }

    #[test]
    fn double_star_group_round_trips_into_destination(
        dirs in proptest::collection::vec(segment(), 0..4),
        name in segment(),
    ) {
        let mut parts = dirs.clone();
        parts.push(name);
        let stem = parts.join("/");

        let pattern = GlobPattern::compile("src/(**).scss").unwrap();
        let captures = pattern.captures(&format!("src/{stem}.scss")).unwrap();

        prop_assert_eq!(captures.len(), 1);
        prop_assert_eq!(expand_destination("dist/$1.css", &captures), format!("dist/{stem}.css"));
    }

    #[test]
    fn literal_text_is_never_a_wildcard(name in "[a-z.+?\\[\\]{}^$|]{1,12}") {
        let pattern = GlobPattern::compile(&format!("src/{name}")).unwrap();
        let expected = format!("src/{name}");
        prop_assert!(pattern.is_match(&expected));
        let extended = format!("{}x", expected);
        prop_assert!(!pattern.is_match(&extended));
    }
}
