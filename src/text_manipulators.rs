macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        static $name: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
            regex::Regex::new($pattern).expect("pattern is a valid literal regex")
        });
    };
}

pub(crate) use static_regex;

static_regex!(NUMBER, r"\d[\d,]*(?:\.\d+)?");
static_regex!(INTEGER, r"\d[\d,]*");
static_regex!(PERCENTAGE, r"(\d[\d,]*(?:\.\d+)?)\s*%");
static_regex!(MINIMUM_FEE, r"ขั้นต่ำ\s*(\d[\d,]*(?:\.\d+)?)\s*(?:บาท|USD)");
static_regex!(LIST_MARKER, r"\d+\.");

const CONDITION_MARKER: &str = "เงื่อนไข:";
const YEAR_MARKER: &str = "ปีที่";
const NUXT_MARKER: &str = "window.__NUXT__";

/// Collapses every whitespace run (including non-breaking spaces) into one space.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Like [`clean_text`], with thousands separators removed first.
pub fn clean_amount_text(text: &str) -> String {
    clean_text(&text.replace(',', ""))
}

pub fn split_clean(text: &str, delimiter: &str) -> Vec<String> {
    text.split(delimiter)
        .map(clean_text)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Byte offsets of `N.` list markers. A marker followed by another digit is a
/// decimal number, not a marker.
fn list_marker_positions(text: &str) -> Vec<(usize, usize)> {
    LIST_MARKER
        .find_iter(text)
        .filter(|m| {
            let next_is_digit = text[m.end()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit());
            let prev_is_digit_or_dot = text[..m.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_digit() || c == '.');
            !next_is_digit && !prev_is_digit_or_dot
        })
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Splits `1. foo 2. bar` into `["foo", "bar"]`; falls back to `-` separated
/// parts when the text has no numbered markers.
pub fn split_numbered_list(text: &str) -> Vec<String> {
    let markers = list_marker_positions(text);
    if markers.is_empty() {
        return split_clean(text, "-");
    }

    let mut parts = Vec::with_capacity(markers.len() + 1);
    let mut cursor = 0;
    for (start, end) in markers {
        parts.push(clean_text(&text[cursor..start]));
        cursor = end;
    }
    parts.push(clean_text(&text[cursor..]));
    parts.into_iter().filter(|part| !part.is_empty()).collect()
}

/// Keeps only the numbered items, markers included: `1. foo 2. bar`.
pub fn numbered_items(text: &str) -> Vec<String> {
    let markers = list_marker_positions(text);
    markers
        .iter()
        .enumerate()
        .map(|(i, &(start, _))| {
            let end = markers.get(i + 1).map_or(text.len(), |&(next, _)| next);
            clean_text(&text[start..end])
        })
        .filter(|item| !item.is_empty())
        .collect()
}

/// `None` for empty cells and the `-` placeholder.
pub fn optional_text(text: &str) -> Option<String> {
    let cleaned = clean_text(text);
    if cleaned.is_empty() || cleaned == "-" {
        None
    } else {
        Some(cleaned)
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse().ok()
}

pub fn first_integer(text: &str) -> Option<i64> {
    INTEGER
        .find(text)
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

pub fn first_number(text: &str) -> Option<f64> {
    NUMBER.find(text).and_then(|m| parse_number(m.as_str()))
}

/// The number the text starts with, like `"15% ต่อปี"` -> `15`.
pub fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    NUMBER
        .find(text)
        .filter(|m| m.start() == 0)
        .and_then(|m| parse_number(m.as_str()))
}

pub fn all_numbers(text: &str) -> Vec<f64> {
    NUMBER
        .find_iter(text)
        .filter_map(|m| parse_number(m.as_str()))
        .collect()
}

pub fn all_integers(text: &str) -> Vec<i64> {
    INTEGER
        .find_iter(text)
        .filter_map(|m| m.as_str().replace(',', "").parse().ok())
        .collect()
}

pub fn percentage(text: &str) -> Option<f64> {
    PERCENTAGE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_number(m.as_str()))
}

pub fn all_percentages(text: &str) -> Vec<f64> {
    PERCENTAGE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| parse_number(m.as_str()))
        .collect()
}

/// First and second number in a fee text. A "minimum N baht" phrase wins over
/// the positional minimum.
pub fn min_max_fee(text: &str) -> (Option<f64>, Option<f64>) {
    let numbers = all_numbers(text);
    let mut min_fee = numbers.first().copied();
    let max_fee = numbers.get(1).copied();

    if let Some(minimum) = minimum_fee(text) {
        min_fee = Some(minimum);
    }

    (min_fee, max_fee)
}

/// The amount of a "minimum N baht" (or USD) phrase.
pub fn minimum_fee(text: &str) -> Option<f64> {
    MINIMUM_FEE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_number(m.as_str()))
}

pub fn condition_after_marker(text: &str) -> Option<String> {
    text.split_once(CONDITION_MARKER)
        .map(|(_, condition)| clean_text(condition))
        .filter(|condition| !condition.is_empty())
}

pub fn mentions_condition(text: &str) -> bool {
    text.contains("เงื่อนไข")
}

/// `(min, max)` from the first two integers; one integer gives `(n, n)`.
pub fn range_pair(text: &str) -> Option<(i64, i64)> {
    match all_integers(text).as_slice() {
        [] => None,
        [only] => Some((*only, *only)),
        [min, max, ..] => Some((*min, *max)),
    }
}

/// `(min, max)` only when the text is a genuine `a - b` range.
pub fn two_number_range(text: &str) -> Option<(i64, i64)> {
    let (left, right) = text.split_once('-')?;
    let min = first_integer(left)?;
    let max = first_integer(right)?;
    Some((min, max))
}

/// Splits `ปีที่ 1 ... ปีที่ 2 ...` into one entry per year, keeping the prefix.
pub fn year_conditions(text: &str) -> Vec<String> {
    text.split(YEAR_MARKER)
        .map(clean_text)
        .filter(|part| !part.is_empty())
        .map(|part| format!("{YEAR_MARKER} {part}"))
        .collect()
}

pub fn decode_unicode_slashes(text: &str) -> String {
    text.replace("\\u002F", "/").replace("\\u002f", "/")
}

/// The body of the `window.__NUXT__` script, up to its closing tag.
pub fn nuxt_script(html: &str) -> Option<&str> {
    let start = html.find(NUXT_MARKER)?;
    let script = &html[start..];
    let end = script.find("</script>").unwrap_or(script.len());
    Some(&script[..end])
}
