use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    // The builtin PDF fonts are WinAnsi-encoded and silently render Turkish
    // diacritics as the wrong glyph. Every diacritic appearing in any literal
    // the report emits must have an entry here.
    static ref REPLACEMENTS: HashMap<char, &'static str> = {
        let mut map = HashMap::new();
        map.insert('ğ', "g");
        map.insert('Ğ', "G");
        map.insert('ş', "s");
        map.insert('Ş', "S");
        map.insert('ı', "i");
        map.insert('İ', "I");
        map.insert('ç', "c");
        map.insert('Ç', "C");
        map.insert('ö', "o");
        map.insert('Ö', "O");
        map.insert('ü', "u");
        map.insert('Ü', "U");
        map
    };
}

/// Replaces every Turkish diacritic with its closest unaccented Latin
/// equivalent. Applied to all text before it reaches the PDF font layer.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match REPLACEMENTS.get(&c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_every_turkish_diacritic() {
        assert_eq!(transliterate("ğĞşŞıİçÇöÖüÜ"), "gGsSiIcCoOuU");
    }

    #[test]
    fn passes_plain_ascii_through() {
        assert_eq!(transliterate("Rapor Tarihi: 01-01-2026 12:00"), "Rapor Tarihi: 01-01-2026 12:00");
    }

    #[test]
    fn handles_mixed_text() {
        assert_eq!(
            transliterate("YÜKSEK RİSK (TÜMÖR ŞÜPHESİ)"),
            "YUKSEK RISK (TUMOR SUPHESI)"
        );
        assert_eq!(transliterate("DÜŞÜK RİSK (TEMİZ)"), "DUSUK RISK (TEMIZ)");
    }
}
