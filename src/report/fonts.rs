//! Text measurement for the built-in Helvetica faces.
//!
//! Built-in PDF fonts carry no metrics we can query at runtime, so glyph
//! advances for printable ASCII come from the standard Helvetica AFM
//! (units of 1/1000 em). Bold is approximated from the regular widths.

/// Helvetica advance widths for ' ' (0x20) through '~' (0x7E)
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const BOLD_FACTOR: f32 = 1.08;

/// Replace characters the built-in fonts cannot encode.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if (' '..='~').contains(&c) { c } else if c.is_whitespace() { ' ' } else { '?' })
        .collect()
}

fn glyph_width(c: char) -> u16 {
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        HELVETICA_WIDTHS[(code - 0x20) as usize]
    } else {
        556
    }
}

/// Width of `text` in points.
pub fn text_width(text: &str, font_size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_width(c) as u32).sum();
    let width = units as f32 * font_size / 1000.0;
    if bold {
        width * BOLD_FACTOR
    } else {
        width
    }
}

/// Greedy word wrap to `max_width` points.
///
/// Words wider than a line are split between characters. Always returns at
/// least one line so empty cells keep their row height.
pub fn wrap_text(text: &str, max_width: f32, font_size: f32, bold: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width(&candidate, font_size, bold) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, font_size, bold) <= max_width {
            current = word.to_string();
        } else {
            for c in word.chars() {
                current.push(c);
                if text_width(&current, font_size, bold) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_width() {
        assert!((text_width("1000", 10.0, false) - 22.24).abs() < 1e-3);
        assert!(text_width("1000", 10.0, true) > text_width("1000", 10.0, false));
    }

    #[test]
    fn test_wrap_header_into_lines() {
        let lines = wrap_text("Old Balance (Receiver)", 60.0, 10.0, true);
        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), "Old Balance (Receiver)");
        for line in &lines {
            assert!(text_width(line, 10.0, true) <= 60.0);
        }
    }

    #[test]
    fn test_long_word_is_split() {
        let lines = wrap_text("12345678901234567890", 30.0, 10.0, false);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "12345678901234567890");
    }

    #[test]
    fn test_empty_text_keeps_one_line() {
        assert_eq!(wrap_text("", 50.0, 10.0, false), vec![String::new()]);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("café\tbar"), "caf? bar");
        assert_eq!(sanitize("plain"), "plain");
    }
}
