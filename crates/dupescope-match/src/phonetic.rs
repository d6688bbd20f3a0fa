//! Soundex-style phonetic codes for single name tokens.

use serde::Serialize;

/// Length of a non-empty code: one letter followed by three digits.
pub const CODE_LEN: usize = 4;

/// A phonetic code, or the empty sentinel for tokens without letters.
///
/// Deliberately not `PartialEq`: use [`PhoneticCode::matches`], under which
/// the sentinel matches nothing, not even another sentinel.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct PhoneticCode(String);

impl PhoneticCode {
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, other: &PhoneticCode) -> bool {
        !self.is_empty() && !other.is_empty() && self.0 == other.0
    }
}

#[derive(Clone, Copy)]
enum Sound {
    Class(u8),
    /// A E I O U Y: dropped, but separate repeated classes.
    Vowel,
    /// H W: dropped without separating.
    Silent,
}

fn sound(letter: u8) -> Sound {
    match letter {
        b'B' | b'F' | b'P' | b'V' => Sound::Class(b'1'),
        b'C' | b'G' | b'J' | b'K' | b'Q' | b'S' | b'X' | b'Z' => Sound::Class(b'2'),
        b'D' | b'T' => Sound::Class(b'3'),
        b'L' => Sound::Class(b'4'),
        b'M' | b'N' => Sound::Class(b'5'),
        b'R' => Sound::Class(b'6'),
        b'H' | b'W' => Sound::Silent,
        _ => Sound::Vowel,
    }
}

/// Encode one word. Characters other than ASCII letters are ignored.
pub fn phonetic_code(token: &str) -> PhoneticCode {
    let mut letters = token
        .bytes()
        .filter(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_uppercase());

    let Some(first) = letters.next() else {
        return PhoneticCode::empty();
    };

    let mut code = String::with_capacity(CODE_LEN);
    code.push(first as char);

    let mut last = match sound(first) {
        Sound::Class(digit) => Some(digit),
        _ => None,
    };

    for letter in letters {
        if code.len() == CODE_LEN {
            break;
        }
        match sound(letter) {
            Sound::Class(digit) => {
                if last != Some(digit) {
                    code.push(digit as char);
                }
                last = Some(digit);
            }
            Sound::Vowel => last = None,
            Sound::Silent => {}
        }
    }

    while code.len() < CODE_LEN {
        code.push('0');
    }

    PhoneticCode(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_codes() {
        assert_eq!(phonetic_code("Robert").as_str(), "R163");
        assert_eq!(phonetic_code("Rupert").as_str(), "R163");
        assert_eq!(phonetic_code("Rubin").as_str(), "R150");
        assert_eq!(phonetic_code("Tymczak").as_str(), "T522");
        assert_eq!(phonetic_code("Lee").as_str(), "L000");
    }

    #[test]
    fn test_h_and_w_do_not_separate() {
        assert_eq!(phonetic_code("Ashcraft").as_str(), "A261");
        assert_eq!(phonetic_code("Honeyman").as_str(), "H555");
    }

    #[test]
    fn test_first_letter_class_collapses_with_next() {
        assert_eq!(phonetic_code("Pfister").as_str(), "P236");
    }

    #[test]
    fn test_case_and_punctuation_are_ignored() {
        assert_eq!(phonetic_code("o'brien").as_str(), phonetic_code("OBrien").as_str());
    }

    #[test]
    fn test_empty_sentinel_never_matches() {
        let empty = phonetic_code("");
        let blank = phonetic_code("   ");
        let punct = phonetic_code("-.'");
        assert!(empty.is_empty());
        assert!(blank.is_empty());
        assert!(punct.is_empty());
        assert!(!empty.matches(&blank));
        assert!(!blank.matches(&blank));
        assert!(!empty.matches(&phonetic_code("Smith")));
    }

    #[test]
    fn test_sound_alikes_match() {
        assert!(phonetic_code("Smith").matches(&phonetic_code("Smyth")));
        assert!(!phonetic_code("Smith").matches(&phonetic_code("Jones")));
    }
}
