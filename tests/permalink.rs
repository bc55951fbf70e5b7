use post_embed::{Error, parse_post_id};

#[test]
fn returns_exactly_the_digits() {
    for (handle, digits) in [("a", "1"), ("punchfork", "16342628623"), ("x_y_9", "007")] {
        for scheme in ["http", "https"] {
            let url = format!("{scheme}://twitter.com/{handle}/status/{digits}");
            assert_eq!(parse_post_id(&url).unwrap().as_str(), digits, "{url}");
        }
    }
}

#[test]
fn rejects_everything_else() {
    for url in [
        "https://twitter.com/punchfork",
        "https://twitter.com/punchfork/status/16342628623/photo/1",
        "https://twitter.com/punchfork/likes/16342628623",
        "mailto:punchfork@example.com",
    ] {
        assert!(matches!(parse_post_id(url), Err(Error::InvalidUrl(_))), "{url}");
    }
}
