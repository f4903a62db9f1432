//! Post text cleanup applied before scoring.

/// Cleans post text for scoring.
///
/// Each pass strips `@` mention markers, collapses whitespace runs to a
/// single space and trims, removes every literal `RT` (case-sensitive, no
/// word-boundary check, so `START` becomes `STA`), then removes `#` hashtag
/// markers. Passes repeat until the text stops changing, which guarantees
/// `normalize(normalize(t)) == normalize(t)` and leaves no double spaces
/// behind a removed `RT`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut current = normalize_pass(text);
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_pass(text: &str) -> String {
    let without_mentions = text.replace('@', "");
    let collapsed = without_mentions
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    collapsed.replace("RT", "").replace('#', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_mentions_retweets_and_hashtags() {
        assert_eq!(normalize("@alice RT said #hi"), "alice said hi");
    }

    #[test]
    fn retweet_prefix_example() {
        assert_eq!(normalize("@bob RT great #win"), "bob great win");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(normalize("ok"), "ok");
        assert_eq!(normalize("bad"), "bad");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize("  hello \t\n  world  "), "hello world");
    }

    #[test]
    fn rt_inside_words_is_removed() {
        assert_eq!(normalize("START the PARTY"), "STA the PAY");
    }

    #[test]
    fn lowercase_rt_is_kept() {
        assert_eq!(normalize("rt this Rt that"), "rt this Rt that");
    }

    #[test]
    fn leading_retweet_marker_leaves_no_leading_space() {
        assert_eq!(normalize("RT @ScottPresler: The socialist"), "ScottPresler: The socialist");
    }

    #[test]
    fn nested_rt_is_removed_completely() {
        assert_eq!(normalize("RRTT"), "");
        assert_eq!(normalize("R#T go"), "go");
    }

    #[test]
    fn only_markers_becomes_empty() {
        assert_eq!(normalize("RT @ #"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn idempotent_on_tricky_inputs() {
        for input in [
            "@alice RT said #hi",
            "RRTT",
            "R@T R#T",
            "  #RT@  RT  ",
            "STARTRT ##tag @@user",
            "ünïcödé RT\u{00a0}spaces",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }
}
