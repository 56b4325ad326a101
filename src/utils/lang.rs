//! Subtitle language detection.
//!
//! Subtitle filenames carry trailing language markers in wildly mixed
//! forms (`.en`, `.eng`, `.spanish`, `.Portuguese`). The table maps
//! ISO 639 names and codes back to the 639-1 code used as the
//! language hint in destinations.

use super::text::levenshtein;

/// (english name, 639-1, 639-2) rows.
const LANGUAGES: &[(&str, &str, &str)] = &[
    ("afrikaans", "af", "afr"),
    ("albanian", "sq", "sqi"),
    ("amharic", "am", "amh"),
    ("arabic", "ar", "ara"),
    ("armenian", "hy", "hye"),
    ("azerbaijani", "az", "aze"),
    ("basque", "eu", "eus"),
    ("belarusian", "be", "bel"),
    ("bengali", "bn", "ben"),
    ("bosnian", "bs", "bos"),
    ("bulgarian", "bg", "bul"),
    ("burmese", "my", "mya"),
    ("catalan", "ca", "cat"),
    ("chinese", "zh", "zho"),
    ("croatian", "hr", "hrv"),
    ("czech", "cs", "ces"),
    ("danish", "da", "dan"),
    ("dutch", "nl", "nld"),
    ("english", "en", "eng"),
    ("estonian", "et", "est"),
    ("filipino", "tl", "tgl"),
    ("finnish", "fi", "fin"),
    ("french", "fr", "fra"),
    ("galician", "gl", "glg"),
    ("georgian", "ka", "kat"),
    ("german", "de", "deu"),
    ("greek", "el", "ell"),
    ("gujarati", "gu", "guj"),
    ("hebrew", "he", "heb"),
    ("hindi", "hi", "hin"),
    ("hungarian", "hu", "hun"),
    ("icelandic", "is", "isl"),
    ("indonesian", "id", "ind"),
    ("irish", "ga", "gle"),
    ("italian", "it", "ita"),
    ("japanese", "ja", "jpn"),
    ("kannada", "kn", "kan"),
    ("kazakh", "kk", "kaz"),
    ("khmer", "km", "khm"),
    ("korean", "ko", "kor"),
    ("kurdish", "ku", "kur"),
    ("lao", "lo", "lao"),
    ("latin", "la", "lat"),
    ("latvian", "lv", "lav"),
    ("lithuanian", "lt", "lit"),
    ("macedonian", "mk", "mkd"),
    ("malay", "ms", "msa"),
    ("malayalam", "ml", "mal"),
    ("maltese", "mt", "mlt"),
    ("marathi", "mr", "mar"),
    ("mongolian", "mn", "mon"),
    ("nepali", "ne", "nep"),
    ("norwegian", "no", "nor"),
    ("pashto", "ps", "pus"),
    ("persian", "fa", "fas"),
    ("polish", "pl", "pol"),
    ("portuguese", "pt", "por"),
    ("punjabi", "pa", "pan"),
    ("romanian", "ro", "ron"),
    ("russian", "ru", "rus"),
    ("serbian", "sr", "srp"),
    ("sinhala", "si", "sin"),
    ("slovak", "sk", "slk"),
    ("slovenian", "sl", "slv"),
    ("somali", "so", "som"),
    ("spanish", "es", "spa"),
    ("swahili", "sw", "swa"),
    ("swedish", "sv", "swe"),
    ("tamil", "ta", "tam"),
    ("telugu", "te", "tel"),
    ("thai", "th", "tha"),
    ("turkish", "tr", "tur"),
    ("ukrainian", "uk", "ukr"),
    ("urdu", "ur", "urd"),
    ("uzbek", "uz", "uzb"),
    ("vietnamese", "vi", "vie"),
    ("welsh", "cy", "cym"),
    ("yiddish", "yi", "yid"),
    ("zulu", "zu", "zul"),
];

/// Resolve a filename part to an ISO 639-1 code.
///
/// Two-letter parts match 639-1 codes, three-letter parts match 639-2
/// codes or are tried as misspelled names, longer parts match names
/// exactly or within a small edit distance (`subtitles.spansih.srt`
/// still resolves to `es`).
pub fn detect_language(part: &str) -> Option<String> {
    let part = part.trim().to_lowercase();

    if part.len() < 2 || !part.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    match part.len() {
        2 => LANGUAGES
            .iter()
            .find(|(_, iso1, _)| *iso1 == part)
            .map(|(_, iso1, _)| iso1.to_string()),
        3 => LANGUAGES
            .iter()
            .find(|(_, _, iso2)| *iso2 == part)
            .map(|(_, iso1, _)| iso1.to_string()),
        _ => {
            if let Some((_, iso1, _)) = LANGUAGES.iter().find(|(name, _, _)| *name == part) {
                return Some(iso1.to_string());
            }

            // Tolerate small misspellings of full names only; short
            // tokens are too easy to match by accident.
            if part.len() >= 5 {
                let mut best: Option<(usize, &str)> = None;
                for (name, iso1, _) in LANGUAGES.iter().copied() {
                    let dist = levenshtein(&part, name);
                    if dist <= 2 && best.map_or(true, |(d, _)| dist < d) {
                        best = Some((dist, iso1));
                    }
                }
                return best.map(|(_, iso1)| iso1.to_string());
            }

            None
        }
    }
}
