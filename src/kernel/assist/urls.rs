use regex::Regex;
use std::sync::OnceLock;

const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

fn url_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://[^\s)>\]]+").ok())
        .as_ref()
}

/// `http(s)://` tokens in `text`, in order of appearance, with trailing
/// sentence punctuation stripped. Duplicates are kept.
pub fn extract_urls(text: &str) -> Vec<String> {
    let Some(re) = url_regex() else {
        return Vec::new();
    };
    re.find_iter(text)
        .filter_map(|m| {
            let url = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            let (_, rest) = url.split_once("://")?;
            (!rest.is_empty()).then(|| url.to_string())
        })
        .collect()
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/assist/urls.rs"]
mod tests;
