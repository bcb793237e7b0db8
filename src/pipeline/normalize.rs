//! Pure string normalization for facility, owner and municipality names.
//!
//! The registry is inconsistent about casing: many names are entered in all
//! caps, organizational suffixes come back title-cased ("As", "Il") and
//! municipality labels sometimes use historical or Norwegian-only spellings
//! that do not match the boundary data.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Canonical casing for individual words after the title-case pass.
static WORD_SUBSTITUTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Organizational suffixes
        ("As", "AS"),
        ("Asa", "ASA"),
        ("Ba", "BA"),
        ("Sa", "SA"),
        ("Da", "DA"),
        ("Ans", "ANS"),
        ("Kf", "KF"),
        ("Iks", "IKS"),
        ("Il", "IL"),
        ("Ik", "IK"),
        ("Bk", "BK"),
        ("Fk", "FK"),
        ("Vgs", "VGS"),
        // Building and facility words are lower case when not leading
        ("Skole", "skole"),
        ("Stadion", "stadion"),
        ("Idrettshall", "idrettshall"),
        ("Idrettspark", "idrettspark"),
        ("Idrettsplass", "idrettsplass"),
        ("Svømmehall", "svømmehall"),
        ("Samfunnshus", "samfunnshus"),
        ("Klubbhus", "klubbhus"),
        ("Skytebane", "skytebane"),
        ("Lysløype", "lysløype"),
        ("Ballbinge", "ballbinge"),
        ("Gymsal", "gymsal"),
        ("Kommune", "kommune"),
        ("Fylkeskommune", "fylkeskommune"),
        ("Idrettslag", "idrettslag"),
        ("Og", "og"),
        ("I", "i"),
    ])
});

/// Municipality spellings used by the registry feed where the boundary data
/// uses another form. Maps the Kartverket name to the registry's form.
static MUNICIPALITY_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Tana", "Deatnu-Tana"),
        ("Kautokeino", "Guovdageaidnu-Kautok"),
        ("Karasjok", "Karasjohka-Karasjok"),
        ("Nesseby", "Unjargga-Nesseby"),
        ("Aurskog-Høland", "Aurskog Høland"),
    ])
});

/// Capitalizes the first letter of every word if the input is entirely upper
/// case; mixed-case input passes through unchanged. A letter following any
/// non-alphabetic character starts a new word, so hyphenated names capitalize
/// on both sides of the hyphen.
pub fn title_case(text: &str) -> String {
    if text.is_empty() || text != text.to_uppercase() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(c);
            in_word = false;
        }
    }
    result
}

/// Normalizes a facility name. The first word keeps its casing so names like
/// "Stadion Kunstgress" do not lose their leading capital.
pub fn normalize_facility_name(name: &str) -> String {
    substitute_words(&title_case(&clean_separators(name)), true)
}

/// Normalizes an owner or operator name; the substitution table applies to
/// every word.
pub fn normalize_owner(name: &str) -> String {
    substitute_words(&title_case(&clean_separators(name)), false)
}

/// Normalizes a municipality label into the form used as boundary lookup key:
/// strips a trailing administrative suffix, lower-cases the conjunction and
/// resolves historical or Norwegian-only spellings.
pub fn normalize_municipality(name: &str) -> String {
    let trimmed = name.trim();
    let stripped = strip_kommune_suffix(trimmed);

    let conjunction_fixed = stripped
        .split(' ')
        .map(|word| if word == "Og" { "og" } else { word })
        .collect::<Vec<_>>()
        .join(" ");

    match MUNICIPALITY_ALIASES.get(conjunction_fixed.as_str()) {
        Some(alias) => (*alias).to_string(),
        None => conjunction_fixed,
    }
}

/// Collapses runs of the registry's `;` separator into a comma and trims
/// surrounding whitespace.
fn clean_separators(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_separator = false;
    for c in text.trim().chars() {
        if c == ';' {
            if !in_separator {
                result.push(',');
            }
            in_separator = true;
        } else {
            result.push(c);
            in_separator = false;
        }
    }
    result
}

fn strip_kommune_suffix(name: &str) -> &str {
    const SUFFIX: &str = " kommune";
    if name.len() >= SUFFIX.len() {
        let split = name.len() - SUFFIX.len();
        if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(SUFFIX) {
            return name[..split].trim_end();
        }
    }
    name
}

fn substitute_words(text: &str, skip_first: bool) -> String {
    text.split(' ')
        .enumerate()
        .map(|(index, word)| {
            if skip_first && index == 0 {
                return word;
            }
            WORD_SUBSTITUTIONS.get(word).copied().unwrap_or(word)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
