use scraper::Html;

pub const DEFAULT_SUMMARY_LENGTH: usize = 300;

/// Appended to a summary cut short
pub const ELLIPSIS: &str = "...";

/// A paragraph must be strictly longer than this to be picked as summary
const MIN_PARAGRAPH_LENGTH: usize = 50;

/// Remove all the markup of an HTML fragment and return its trimmed text.
pub fn clean_html(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<String>();

    text.trim().to_owned()
}

/// Plain text summary of some HTML content: its first real paragraph, cut to `max_length`
/// characters on a word boundary.
pub fn extract_summary(content: &str, max_length: usize) -> String {
    let text = clean_html(content);

    let paragraph = text
        .split('\n')
        .map(str::trim)
        .find(|paragraph| paragraph.chars().count() > MIN_PARAGRAPH_LENGTH)
        .unwrap_or(&text);

    truncate(paragraph, max_length)
}

fn truncate(text: &str, max_length: usize) -> String {
    let cut = match text.char_indices().nth(max_length) {
        Some((index, _)) => &text[..index],
        None => return text.to_owned(),
    };

    let kept = match cut.rfind(char::is_whitespace) {
        Some(index) => &cut[..index],
        None => cut,
    };

    format!("{}{}", kept.trim_end(), ELLIPSIS)
}
