use kodegen_markdown_bridge::{html_to_markdown, markdown_to_html};
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn styled_word() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => word(),
        1 => word().prop_map(|w| format!("*{w}*")),
        1 => word().prop_map(|w| format!("**{w}**")),
        1 => word().prop_map(|w| format!("`{w}`")),
    ]
}

fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(styled_word(), 1..6).prop_map(|words| words.join(" "))
}

fn block() -> impl Strategy<Value = String> {
    prop_oneof![
        sentence(),
        (1usize..=6, sentence()).prop_map(|(level, text)| format!("{} {text}", "#".repeat(level))),
        prop::collection::vec(sentence(), 1..4).prop_map(|items| {
            items.iter().map(|i| format!("- {i}")).collect::<Vec<_>>().join("\n")
        }),
        prop::collection::vec(sentence(), 1..4).prop_map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(n, i)| format!("{}. {i}", n + 1))
                .collect::<Vec<_>>()
                .join("\n")
        }),
        sentence().prop_map(|s| format!("> {s}")),
        prop::collection::vec(word(), 1..4).prop_map(|lines| format!("```\n{}\n```", lines.join("\n"))),
        (word(), word()).prop_map(|(a, b)| format!("$${a}+{b}$$")),
        prop::collection::vec((any::<bool>(), word()), 1..4).prop_map(|items| {
            items
                .iter()
                .map(|(checked, w)| format!("- [{}] {w}", if *checked { 'x' } else { ' ' }))
                .collect::<Vec<_>>()
                .join("\n\n")
        }),
    ]
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(block(), 1..6).prop_map(|blocks| blocks.join("\n\n"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// One markdown -> HTML -> markdown trip reaches a fixed point.
    #[test]
    fn round_trip_is_idempotent(doc in document()) {
        let once = html_to_markdown(markdown_to_html(doc.as_str()).as_str());
        let twice = html_to_markdown(markdown_to_html(once.as_str()).as_str());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn conversions_never_panic(input in "\\PC{0,200}") {
        let _ = markdown_to_html(input.as_str());
        let _ = html_to_markdown(input.as_str());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// Deep nesting and wide spans stay within the never-fail contract.
    #[test]
    fn adversarial_sizes_never_abort(depth in 1_000usize..60_000, span in any::<u64>()) {
        let nested = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
        prop_assert_eq!(html_to_markdown(nested.as_str()), "x");

        let table = format!(r#"<table><tr><td colspan="{span}">a</td></tr></table>"#);
        let md = html_to_markdown(table.as_str());
        let columns = md.lines().nth(1).map_or(0, |line| line.matches("---").count());
        prop_assert!((1..=1000).contains(&columns), "{} columns", columns);
    }
}
