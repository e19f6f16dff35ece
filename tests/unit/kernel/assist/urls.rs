use super::*;

#[test]
fn finds_urls_in_order_and_keeps_duplicates() {
    let urls = extract_urls("see https://a.dev/x and http://b.dev, then https://a.dev/x");
    assert_eq!(urls, vec!["https://a.dev/x", "http://b.dev", "https://a.dev/x"]);
}

#[test]
fn strips_trailing_sentence_punctuation() {
    let urls = extract_urls("Read https://docs.rs/tokio. Also https://x.io/a?b=1!");
    assert_eq!(urls, vec!["https://docs.rs/tokio", "https://x.io/a?b=1"]);
}

#[test]
fn stops_at_closing_brackets() {
    let urls = extract_urls("[link](https://a.dev/page) <https://b.dev>");
    assert_eq!(urls, vec!["https://a.dev/page", "https://b.dev"]);
}

#[test]
fn ignores_text_without_urls() {
    assert!(extract_urls("rename foo to bar").is_empty());
    assert!(extract_urls("ftp://files.example.com").is_empty());
}
