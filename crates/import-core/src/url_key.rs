//! Display-name to url-key normalization.

/// Derive a url-key style slug from a display name.
///
/// Lowercases, transliterates common Latin diacritics to ASCII (characters
/// with no reasonable equivalent are dropped), collapses every run of
/// non-alphanumeric characters into a single `-` and strips leading and
/// trailing delimiters. Total and deterministic; degenerate input yields
/// an empty string, which callers must treat as unusable for a unique key.
pub fn url_key_from_name(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii() {
            push_ascii(&mut key, ch);
        } else {
            for t in transliterate(ch).chars() {
                push_ascii(&mut key, t);
            }
        }
    }
    if key.ends_with('-') {
        key.pop();
    }
    key
}

fn push_ascii(key: &mut String, c: char) {
    if c.is_ascii_alphanumeric() {
        key.push(c);
    } else if !key.is_empty() && !key.ends_with('-') {
        key.push('-');
    }
}

/// ASCII equivalents for the Latin diacritics that show up in catalog
/// data. Input is already lowercased; anything unmapped is dropped.
fn transliterate(ch: char) -> &'static str {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => "i",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => "o",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => "u",
        'ý' | 'ÿ' => "y",
        'ç' | 'ć' | 'č' => "c",
        'ñ' | 'ń' | 'ň' => "n",
        'š' | 'ś' => "s",
        'ž' | 'ź' | 'ż' => "z",
        'ł' => "l",
        'đ' | 'ð' => "d",
        'ř' => "r",
        'ť' => "t",
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        'þ' => "th",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transliterates_and_collapses() {
        assert_eq!(url_key_from_name("Café Table — Deluxe!!"), "cafe-table-deluxe");
    }

    #[test]
    fn already_normalized_is_unchanged() {
        let slug = url_key_from_name("white-dwarf-with-mask");
        assert_eq!(slug, "white-dwarf-with-mask");
        assert_eq!(url_key_from_name(&slug), slug);
    }

    #[test]
    fn output_alphabet_is_bounded() {
        let slug = url_key_from_name("  Übergroße  Bücher & Mäntel (2024)  ");
        assert!(!slug.is_empty());
        assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        assert!(!slug.contains("--"));
    }

    #[test]
    fn degenerate_input_yields_empty() {
        assert_eq!(url_key_from_name("!!!"), "");
        assert_eq!(url_key_from_name(""), "");
        assert_eq!(url_key_from_name("→←"), "");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(url_key_from_name("Model 3000, v2"), "model-3000-v2");
    }
}
