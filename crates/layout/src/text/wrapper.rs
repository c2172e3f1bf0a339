//! Greedy line breaking over measured strings.

/// Breaks `text` into lines no wider than `width`.
///
/// Explicit newlines start new paragraphs and an empty paragraph yields an
/// empty line. Words wider than `width` are split with a trailing hyphen when
/// `hyphenate` is set and left to overflow otherwise.
pub fn wrap_text(
    text: &str,
    width: f32,
    hyphenate: bool,
    measure: &dyn Fn(&str) -> f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
                continue;
            }
            let candidate = format!("{} {}", current, word);
            if measure(&candidate) <= width {
                current = candidate;
            } else {
                push_word_lines(&mut lines, &current, width, hyphenate, measure);
                current = word.to_string();
            }
        }
        push_word_lines(&mut lines, &current, width, hyphenate, measure);
    }
    lines
}

/// Like [`wrap_text`], pairing each line with whether it ends its paragraph.
pub fn wrap_paragraphs(
    text: &str,
    width: f32,
    hyphenate: bool,
    measure: &dyn Fn(&str) -> f32,
) -> Vec<(String, bool)> {
    text.split('\n')
        .flat_map(|paragraph| {
            let lines = wrap_text(paragraph, width, hyphenate, measure);
            let last = lines.len().saturating_sub(1);
            lines
                .into_iter()
                .enumerate()
                .map(move |(i, line)| (line, i == last))
        })
        .collect()
}

fn push_word_lines(
    lines: &mut Vec<String>,
    line: &str,
    width: f32,
    hyphenate: bool,
    measure: &dyn Fn(&str) -> f32,
) {
    if !hyphenate || line.is_empty() || measure(line) <= width {
        lines.push(line.to_string());
        return;
    }
    lines.extend(split_long_word(line, width, measure));
}

fn split_long_word(word: &str, width: f32, measure: &dyn Fn(&str) -> f32) -> Vec<String> {
    let mut segments = Vec::new();
    let mut remainder: Vec<char> = word.chars().collect();
    while remainder.len() > 1 && measure(&remainder.iter().collect::<String>()) > width {
        let split = find_split_index(&remainder, width, measure);
        let mut head: String = remainder[..split].iter().collect();
        head.push('-');
        segments.push(head);
        remainder.drain(..split);
    }
    segments.push(remainder.into_iter().collect());
    segments
}

/// The longest prefix (at least two characters when possible) that fits with a hyphen.
fn find_split_index(word: &[char], width: f32, measure: &dyn Fn(&str) -> f32) -> usize {
    for idx in (2..word.len()).rev() {
        let mut segment: String = word[..idx].iter().collect();
        segment.push('-');
        if measure(&segment) <= width {
            return idx;
        }
    }
    word.len().saturating_sub(1).max(1)
}

/// Shortens `line` until it fits `width` with `ellipsis` appended.
pub fn apply_ellipsis(
    line: &str,
    width: f32,
    ellipsis: &str,
    measure: &dyn Fn(&str) -> f32,
) -> String {
    let mut chars: Vec<char> = line.chars().collect();
    while !chars.is_empty() {
        let candidate: String = chars.iter().collect::<String>() + ellipsis;
        if measure(&candidate) <= width {
            return candidate;
        }
        chars.pop();
    }
    ellipsis.to_string()
}
