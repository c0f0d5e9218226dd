use crate::measure::TextMeasure;

/// Greedy word wrap: words are appended while the line's measured width
/// stays within `max_width`. A word wider than `max_width` gets a line of
/// its own and is not split. An empty `text` yields no lines.
pub fn wrap_to_width(
    text: &str,
    font_size: f64,
    max_width: f64,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut cur = String::new();
    for word in text.split(' ') {
        let candidate = format!("{cur} {word}");
        let candidate = candidate.trim();
        if measure.text_width(candidate, font_size) <= max_width {
            cur = candidate.to_string();
        } else {
            if !cur.is_empty() {
                lines.push(std::mem::take(&mut cur));
            }
            cur = word.to_string();
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

/// Wrap each input line independently and concatenate the results.
pub fn wrap_all<S: AsRef<str>>(
    lines: &[S],
    font_size: f64,
    max_width: f64,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    lines
        .iter()
        .flat_map(|l| wrap_to_width(l.as_ref(), font_size, max_width, measure))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FixedAdvance;

    // One pixel per character at size 1.
    const M: FixedAdvance = FixedAdvance { em: 1.0 };

    #[test]
    fn packs_words_greedily() {
        let lines = wrap_to_width("aa bb cc dd", 1.0, 5.0, &M);
        assert_eq!(lines, ["aa bb", "cc dd"]);
    }

    #[test]
    fn fits_on_one_line() {
        assert_eq!(wrap_to_width("Händler: Conrad", 1.0, 100.0, &M), ["Händler: Conrad"]);
    }

    #[test]
    fn long_word_stays_whole() {
        let lines = wrap_to_width("ab abcdefghij cd", 1.0, 5.0, &M);
        assert_eq!(lines, ["ab", "abcdefghij", "cd"]);
    }

    #[test]
    fn empty_line_has_no_output() {
        assert!(wrap_to_width("", 1.0, 10.0, &M).is_empty());
    }

    #[test]
    fn trailing_space_is_trimmed() {
        assert_eq!(wrap_to_width("Garantie: ", 1.0, 40.0, &M), ["Garantie:"]);
    }

    #[test]
    fn wrap_all_expands_lines() {
        let out = wrap_all(&["aa bb cc", "dd"], 1.0, 5.0, &M);
        assert_eq!(out, ["aa bb", "cc", "dd"]);
    }
}
