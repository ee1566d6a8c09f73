//! Reading time estimate

use std::fmt;

/// Words per minute when the site config does not say otherwise
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Estimated time to read a post body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingTime {
    pub words: usize,
    pub minutes: usize,
}

impl ReadingTime {
    /// Estimate from a markdown body, rounding minutes up
    pub fn estimate(body: &str, words_per_minute: u32) -> Self {
        let words = count_words(body);
        let wpm = words_per_minute.max(1) as usize;
        Self {
            words,
            minutes: words.div_ceil(wpm),
        }
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min read", self.minutes)
    }
}

/// Count words: every CJK character is a word, otherwise runs of alphanumerics
pub fn count_words(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;

    for c in text.chars() {
        if is_cjk(c) {
            count += 1;
            in_word = false;
        } else if c.is_alphanumeric() {
            if !in_word {
                in_word = true;
                count += 1;
            }
        } else if c == '\'' || c == '\u{2019}' {
            // Apostrophes keep "don't" as one word
        } else {
            in_word = false;
        }
    }

    count
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30FF}'    // Hiragana, Katakana
        | '\u{3400}'..='\u{4DBF}'  // CJK extension A
        | '\u{4E00}'..='\u{9FFF}'  // CJK unified ideographs
        | '\u{AC00}'..='\u{D7A3}'  // Hangul syllables
        | '\u{F900}'..='\u{FAFF}') // CJK compatibility ideographs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("Hello, world!"), 2);
        assert_eq!(count_words("don't stop"), 2);
        assert_eq!(count_words("# Title\n\n- item one\n- item two"), 5);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_count_cjk_words() {
        assert_eq!(count_words("안녕하세요"), 5);
        assert_eq!(count_words("中文 test"), 3);
    }

    #[test]
    fn test_estimate_rounds_up() {
        let body = "word ".repeat(201);
        let rt = ReadingTime::estimate(&body, 200);
        assert_eq!(rt.words, 201);
        assert_eq!(rt.minutes, 2);
        assert_eq!(rt.to_string(), "2 min read");
    }

    #[test]
    fn test_estimate_short_and_empty() {
        assert_eq!(ReadingTime::estimate("one", 200).to_string(), "1 min read");
        assert_eq!(ReadingTime::estimate("", 200).to_string(), "0 min read");
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let body = "The same body produces the same estimate.";
        assert_eq!(
            ReadingTime::estimate(body, DEFAULT_WORDS_PER_MINUTE),
            ReadingTime::estimate(body, DEFAULT_WORDS_PER_MINUTE)
        );
    }
}
