use harvester_engine::{extract_links, ExtractError, LinkExtractor, LinkSet};
use pretty_assertions::assert_eq;
use scraper::Html;

#[test]
fn pdf_links_follow_rule_order_and_case_insensitive_suffix() {
    let html = r#"
        <object data="r.pdf"></object>
        <a href="x.pdf">x</a>
        <a href="y.PDF">y</a>
        <a href="z.txt">z</a>
    "#;

    let links = extract_links(html).unwrap();
    assert_eq!(links.as_slice(), ["x.pdf", "y.PDF", "r.pdf"]);
}

#[test]
fn iframe_query_string_is_accepted_but_anchor_is_not() {
    let html = r#"
        <a href="doc.pdf?v=2">anchor</a>
        <iframe src="doc.pdf?v=2"></iframe>
    "#;

    let links = extract_links(html).unwrap();
    assert_eq!(links.as_slice(), ["doc.pdf?v=2"]);
}

#[test]
fn all_four_sources_in_scan_order() {
    let html = r#"
        <embed src="/c.pdf">
        <object data="https://ex.com/d.pdf"></object>
        <iframe src="b.pdf#page=1"></iframe>
        <a href="a.pdf">a</a>
    "#;

    let links = extract_links(html).unwrap();
    assert_eq!(
        links.into_vec(),
        vec!["a.pdf", "b.pdf#page=1", "/c.pdf", "https://ex.com/d.pdf"]
    );
}

#[test]
fn duplicates_and_relative_paths_are_preserved() {
    let html = r#"
        <a href="../files/a.pdf">1</a>
        <a href="../files/a.pdf">2</a>
        <embed src="../files/a.pdf">
    "#;

    let links = extract_links(html).unwrap();
    assert_eq!(
        links.as_slice(),
        ["../files/a.pdf", "../files/a.pdf", "../files/a.pdf"]
    );
}

#[test]
fn no_matching_tags_is_no_links_found() {
    let html = r#"<p>Nothing here</p><a href="page.html">page</a><img src="x.pdf">"#;
    assert_eq!(extract_links(html), Err(ExtractError::NoLinksFound));
}

#[test]
fn blank_input_has_no_links() {
    assert_eq!(extract_links(""), Err(ExtractError::NoLinksFound));
    assert_eq!(extract_links("   \n"), Err(ExtractError::NoLinksFound));
}

#[test]
fn extractor_accepts_a_parsed_document() {
    let document = Html::parse_fragment(r#"<a href="frag.pdf">f</a>"#);
    let extractor = LinkExtractor::pdf().unwrap();

    assert_eq!(extractor.rules().count(), 4);
    assert_eq!(
        extractor.extract_from_document(&document).unwrap(),
        LinkSet::from(vec!["frag.pdf".to_string()])
    );
}

#[test]
fn extraction_is_deterministic() {
    let html = r#"<a href="1.pdf"></a><iframe src="2.pdf"></iframe><a href="3.pdf"></a>"#;
    assert_eq!(extract_links(html), extract_links(html));
    assert_eq!(
        extract_links(html).unwrap().as_slice(),
        ["1.pdf", "3.pdf", "2.pdf"]
    );
}
