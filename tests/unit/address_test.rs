use focusbrowser::navigation::address::{normalize_input, search_url};
use focusbrowser::types::settings::SearchEngine;
use rstest::rstest;

#[rstest]
#[case("https://example.com/page", "https://example.com/page")]
#[case("http://localhost:8000", "http://localhost:8000")]
#[case("  https://example.com  ", "https://example.com")]
#[case("example.com", "https://example.com")]
#[case("en.wikipedia.org/wiki/Cell", "https://en.wikipedia.org/wiki/Cell")]
fn test_urls_are_navigable(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(normalize_input(input, SearchEngine::Google).as_deref(), Some(expected));
}

#[rstest]
#[case("photosynthesis", "https://www.google.com/search?q=photosynthesis")]
#[case("what is a cell", "https://www.google.com/search?q=what+is+a+cell")]
#[case("cell biology.pdf notes", "https://www.google.com/search?q=cell+biology.pdf+notes")]
fn test_plain_text_becomes_search(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(normalize_input(input, SearchEngine::Google).as_deref(), Some(expected));
}

#[rstest]
#[case(SearchEngine::Bing, "https://www.bing.com/search?q=rna")]
#[case(SearchEngine::DuckDuckGo, "https://duckduckgo.com/?q=rna")]
#[case(SearchEngine::Brave, "https://search.brave.com/search?q=rna")]
#[case(SearchEngine::Ecosia, "https://www.ecosia.org/search?q=rna")]
fn test_search_engine_is_respected(#[case] engine: SearchEngine, #[case] expected: &str) {
    assert_eq!(search_url("rna", engine), expected);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t\n")]
fn test_blank_input_yields_nothing(#[case] input: &str) {
    assert_eq!(normalize_input(input, SearchEngine::Google), None);
}

#[test]
fn test_special_characters_are_encoded() {
    assert_eq!(
        search_url("c++ & rust?", SearchEngine::Google),
        "https://www.google.com/search?q=c%2B%2B+%26+rust%3F"
    );
}
