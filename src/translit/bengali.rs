//! Bengali → ISO 15919 romanization.
//!
//! A rule-table transliterator covering the Bengali block: consonants carry
//! an inherent `a` unless followed by a vowel sign or a virama, independent
//! vowels and signs map one-to-one, and the danda becomes a full stop so
//! sentence breaks survive into the romanized text. Characters outside the
//! tables pass through unchanged, which also makes non-Bengali input a
//! no-op rather than an error.

use crate::Transliterator;

/// Hasanta / virama: suppresses the inherent vowel of the preceding consonant.
const VIRAMA: char = '\u{09CD}';

/// Combining nukta; turns ড/ঢ/য into their dotted forms.
const NUKTA: char = '\u{09BC}';

/// Consonant base letters, without the inherent vowel.
fn consonant(ch: char) -> Option<&'static str> {
    let base = match ch {
        'ক' => "k",
        'খ' => "kh",
        'গ' => "g",
        'ঘ' => "gh",
        'ঙ' => "ṅ",
        'চ' => "c",
        'ছ' => "ch",
        'জ' => "j",
        'ঝ' => "jh",
        'ঞ' => "ñ",
        'ট' => "ṭ",
        'ঠ' => "ṭh",
        'ড' => "ḍ",
        'ঢ' => "ḍh",
        'ণ' => "ṇ",
        'ত' => "t",
        'থ' => "th",
        'দ' => "d",
        'ধ' => "dh",
        'ন' => "n",
        'প' => "p",
        'ফ' => "ph",
        'ব' => "b",
        'ভ' => "bh",
        'ম' => "m",
        'য' => "y",
        'র' => "r",
        'ল' => "l",
        'শ' => "ś",
        'ষ' => "ṣ",
        'স' => "s",
        'হ' => "h",
        // Nukta consonants (precomposed forms)
        '\u{09DC}' => "ṛ",
        '\u{09DD}' => "ṛh",
        '\u{09DF}' => "ẏ",
        _ => return None,
    };
    Some(base)
}

/// Dotted form of a consonant when a combining nukta follows it.
///
/// Decomposed spellings are the common case: U+09DC/09DD/09DF are excluded
/// from NFC composition, so most real text carries base + nukta pairs.
fn nukta_form(ch: char) -> Option<&'static str> {
    match ch {
        'ড' => Some("ṛ"),
        'ঢ' => Some("ṛh"),
        'য' => Some("ẏ"),
        _ => None,
    }
}

/// Dependent vowel signs (matras) attached to a consonant.
fn vowel_sign(ch: char) -> Option<&'static str> {
    let sign = match ch {
        '\u{09BE}' => "ā",  // া
        '\u{09BF}' => "i",  // ি
        '\u{09C0}' => "ī",  // ী
        '\u{09C1}' => "u",  // ু
        '\u{09C2}' => "ū",  // ূ
        '\u{09C3}' => "r̥", // ৃ
        '\u{09C7}' => "ē",  // ে
        '\u{09C8}' => "ai", // ৈ
        '\u{09CB}' => "ō",  // ো
        '\u{09CC}' => "au", // ৌ
        _ => return None,
    };
    Some(sign)
}

/// Independent vowels, modifiers, digits and punctuation.
fn standalone(ch: char) -> Option<&'static str> {
    let out = match ch {
        'অ' => "a",
        'আ' => "ā",
        'ই' => "i",
        'ঈ' => "ī",
        'উ' => "u",
        'ঊ' => "ū",
        'ঋ' => "r̥",
        'এ' => "ē",
        'ঐ' => "ai",
        'ও' => "ō",
        'ঔ' => "au",
        '\u{0982}' => "ṁ",  // anusvara ং
        '\u{0983}' => "ḥ",  // visarga ঃ
        '\u{0981}' => "m̐", // candrabindu ঁ
        'ৎ' => "t",         // khanda ta
        '০' => "0",
        '১' => "1",
        '২' => "2",
        '৩' => "3",
        '৪' => "4",
        '৫' => "5",
        '৬' => "6",
        '৭' => "7",
        '৮' => "8",
        '৯' => "9",
        '।' => ".",
        '॥' => ".",
        NUKTA => "", // stray nukta with nothing to dot
        _ => return None,
    };
    Some(out)
}

/// Romanize Bengali-script text into ISO 15919.
pub fn romanize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if let Some(mut base) = consonant(ch) {
            if let Some(dotted) = nukta_form(ch) {
                if chars.peek() == Some(&NUKTA) {
                    base = dotted;
                    chars.next();
                }
            }
            out.push_str(base);
            match chars.peek().copied() {
                Some(VIRAMA) => {
                    chars.next();
                }
                Some(next) => {
                    if let Some(sign) = vowel_sign(next) {
                        out.push_str(sign);
                        chars.next();
                    } else {
                        out.push('a');
                    }
                }
                None => out.push('a'),
            }
        } else if let Some(mapped) = standalone(ch) {
            out.push_str(mapped);
        } else {
            out.push(ch);
        }
    }

    out
}

/// The default [`Transliterator`]: Bengali → ISO 15919 via [`romanize`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoTransliterator;

impl Transliterator for IsoTransliterator {
    fn transform(&self, text: &str) -> Result<String, Box<dyn std::error::Error>> {
        Ok(romanize(text))
    }
}
