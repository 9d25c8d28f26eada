use kodegen_markdown_bridge::{html_to_markdown, markdown_to_html};

#[test]
fn test_gfm_table_renders() {
    let html = markdown_to_html("| a | b |\n| --- | ---: |\n| 1 | 2 |");
    assert_eq!(
        html,
        "<table>\n<thead>\n<tr>\n<th>a</th>\n<th style=\"text-align:right\">b</th>\n</tr>\n</thead>\n\
         <tbody>\n<tr>\n<td>1</td>\n<td style=\"text-align:right\">2</td>\n</tr>\n</tbody>\n</table>\n"
    );
}

#[test]
fn test_table_with_head_to_markdown() {
    let html = "<table><thead><tr><th>Name</th><th>Qty</th></tr></thead>\
                <tbody><tr><td>apple</td><td>3</td></tr></tbody></table>";
    assert_eq!(
        html_to_markdown(html),
        "| Name | Qty |\n| --- | --- |\n| apple | 3   |"
    );
}

/// Without a header section a separator is synthesized after the first row.
#[test]
fn test_separator_is_synthesized() {
    let html = "<table><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table>";
    assert_eq!(
        html_to_markdown(html),
        "| a   | b   |\n| --- | --- |\n| c   | d   |"
    );
}

/// `colspan="3"` adds exactly two padded cells after the real one.
#[test]
fn test_colspan_pads_cells() {
    let html = r#"<table><tr><th colspan="3">wide</th></tr><tr><td>1</td><td>2</td><td>3</td></tr></table>"#;
    let md = html_to_markdown(html);
    let first = md.lines().next().unwrap();
    assert_eq!(first, "| wide |     |     |");
    assert_eq!(md.lines().nth(1), Some("| --- | --- | --- |"));
}

#[test]
fn test_empty_rows_are_skipped() {
    let html = "<table><tr><th>h</th></tr><tr><td> </td></tr><tr><td>x</td></tr></table>";
    assert_eq!(html_to_markdown(html), "| h   |\n| --- |\n| x   |");
}

#[test]
fn test_cell_content_is_one_line_with_escaped_pipes() {
    let html = "<table><tr><th>h</th></tr><tr><td><p>a|b</p><p>c</p></td></tr></table>";
    assert_eq!(html_to_markdown(html), "| h   |\n| --- |\n| a\\|b c |");
}

/// LaTeX in cells must survive both directions without doubled backslashes.
#[test]
fn test_table_math_round_trip() {
    let source = "| expr | note |\n| --- | --- |\n| $\\sum_{i=1}^{n} i$ | sum |";
    let html = markdown_to_html(source);
    assert!(html.contains("inline-math"), "math not recognised in {html}");

    let md = html_to_markdown(html.as_str());
    println!("Round-tripped table:\n{md}");
    assert!(md.contains("$\\sum_{i=1}^{n} i$"), "latex damaged: {md}");
    assert!(!md.contains("\\\\sum"), "backslash doubled: {md}");

    let again = html_to_markdown(markdown_to_html(md.as_str()).as_str());
    assert_eq!(again, md, "table round trip is not stable");
}

#[test]
fn test_caption_precedes_table() {
    let html = "<table><caption>Totals</caption><tr><th>a</th></tr></table>";
    assert_eq!(html_to_markdown(html), "Totals\n\n| a   |\n| --- |");
}

/// Oversized spans are clamped to 1000 columns.
#[test]
fn test_huge_colspan_is_clamped() {
    let html = r#"<table><tr><td colspan="4000000000">a</td></tr></table>"#;
    let md = html_to_markdown(html);
    let separator = md.lines().nth(1).unwrap();
    println!("Output length: {} bytes", md.len());
    assert_eq!(separator.matches("---").count(), 1000);
    assert!(md.len() < 20_000, "row not bounded: {} bytes", md.len());
}

#[test]
fn test_zero_colspan_is_one_cell() {
    let html = r#"<table><tr><td colspan="0">a</td><td>b</td></tr></table>"#;
    assert_eq!(html_to_markdown(html), "| a   | b   |\n| --- | --- |");
}

/// `$$...$$` written in a cell is block math and comes back unchanged.
#[test]
fn test_block_math_in_cell_round_trip() {
    let source = "| expr | note |\n| --- | --- |\n| $$x+y$$ | c |";
    let html = markdown_to_html(source);
    assert!(
        html.contains(r#"<td><div data-latex="x+y" data-type="block-math"></div></td>"#),
        "cell math not recognised in {html}"
    );

    let md = html_to_markdown(html.as_str());
    println!("Round-tripped table:\n{md}");
    assert!(md.contains("| $$x+y$$ | c   |"), "cell math damaged: {md}");

    let again = html_to_markdown(markdown_to_html(md.as_str()).as_str());
    assert_eq!(again, md, "table round trip is not stable");
}
