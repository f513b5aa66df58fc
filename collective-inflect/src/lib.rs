//! Fast, no-regex English pluralization.
//!
//! This crate turns singular English nouns into their plural form using table
//! lookups and suffix matching only. It is the naming collaborator used by
//! `collective` to derive accessor names (`thing` → `things`, `all_things`).
//!
//! # Example
//!
//! ```
//! use collective_inflect::{pluralize, pluralize_identifier};
//!
//! assert_eq!(pluralize("dependency"), "dependencies");
//! assert_eq!(pluralize("item"), "items");
//! assert_eq!(pluralize("child"), "children");
//! assert_eq!(pluralize("box"), "boxes");
//! assert_eq!(pluralize_identifier("map_of_thing"), "map_of_things");
//! ```
//!
//! The rules expect lowercase input, which is what identifiers look like in
//! practice.

#![no_std]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::string::String;

/// Irregular singular → plural mappings.
///
/// Sorted alphabetically by singular for binary search.
#[cfg(feature = "alloc")]
static IRREGULARS: &[(&str, &str)] = &[
    ("analysis", "analyses"),
    ("axis", "axes"),
    ("basis", "bases"),
    ("cactus", "cacti"),
    ("child", "children"),
    ("crisis", "crises"),
    ("criterion", "criteria"),
    ("curriculum", "curricula"),
    ("datum", "data"),
    ("diagnosis", "diagnoses"),
    ("die", "dice"),
    ("ellipsis", "ellipses"),
    ("focus", "foci"),
    ("foot", "feet"),
    ("formula", "formulae"),
    ("fungus", "fungi"),
    ("genus", "genera"),
    ("goose", "geese"),
    ("hypothesis", "hypotheses"),
    ("index", "indices"),
    ("larva", "larvae"),
    ("louse", "lice"),
    ("man", "men"),
    ("matrix", "matrices"),
    ("medium", "media"),
    ("memorandum", "memoranda"),
    ("mouse", "mice"),
    ("nebula", "nebulae"),
    ("nucleus", "nuclei"),
    ("oasis", "oases"),
    ("octopus", "octopi"),
    ("ox", "oxen"),
    ("parenthesis", "parentheses"),
    ("person", "people"),
    ("phenomenon", "phenomena"),
    ("radius", "radii"),
    ("stimulus", "stimuli"),
    ("stratum", "strata"),
    ("syllabus", "syllabi"),
    ("synopsis", "synopses"),
    ("thesis", "theses"),
    ("tooth", "teeth"),
    ("vertebra", "vertebrae"),
    ("vertex", "vertices"),
    ("woman", "women"),
];

/// Words that are the same in singular and plural form.
static UNCOUNTABLE: &[&str] = &[
    "aircraft",
    "bison",
    "buffalo",
    "deer",
    "equipment",
    "fish",
    "furniture",
    "information",
    "machinery",
    "moose",
    "news",
    "rice",
    "salmon",
    "series",
    "sheep",
    "shrimp",
    "software",
    "species",
    "swine",
    "trout",
    "tuna",
];

/// Words ending in `-o` that take `-es` rather than `-s`.
#[cfg(feature = "alloc")]
static O_TO_OES: &[&str] = &[
    "echo", "embargo", "hero", "potato", "tomato", "torpedo", "veto",
];

/// Words whose trailing `-f` / `-fe` becomes `-ves`.
///
/// Entries longer than three letters also cover compounds (bookshelf,
/// werewolf, penknife); `elf` only matches itself so that delf, golf and
/// friends keep a plain `-s`.
#[cfg(feature = "alloc")]
static F_TO_VES: &[&str] = &[
    "calf", "elf", "half", "knife", "leaf", "life", "loaf", "self", "sheaf", "shelf", "thief",
    "wife", "wolf",
];

/// Returns `true` if `word` has no distinct plural form (sheep, news, ...).
///
/// This function is allocation-free.
pub fn is_uncountable(word: &str) -> bool {
    UNCOUNTABLE.binary_search(&word).is_ok()
}

/// Convert a singular English word to its plural form.
///
/// This function handles:
/// - Irregular plurals (child → children, person → people, etc.)
/// - Uncountable nouns (sheep, fish, etc.) - returned unchanged
/// - Standard suffix rules:
///   - consonant + `-y` → `-ies` (dependency → dependencies)
///   - `-f` / `-fe` → `-ves` for a known set of endings (wolf → wolves, knife → knives)
///   - `-s`, `-x`, `-z`, `-ch`, `-sh` → add `-es` (box → boxes)
///   - `-o` → add `-es` for a short list (hero → heroes), otherwise `-s`
///   - otherwise add `-s` (item → items)
///
/// # Examples
///
/// ```
/// use collective_inflect::pluralize;
///
/// // Irregular
/// assert_eq!(pluralize("child"), "children");
/// assert_eq!(pluralize("person"), "people");
/// assert_eq!(pluralize("mouse"), "mice");
///
/// // Standard rules
/// assert_eq!(pluralize("dependency"), "dependencies");
/// assert_eq!(pluralize("box"), "boxes");
/// assert_eq!(pluralize("item"), "items");
/// assert_eq!(pluralize("wolf"), "wolves");
///
/// // Uncountable (unchanged)
/// assert_eq!(pluralize("sheep"), "sheep");
/// ```
#[cfg(feature = "alloc")]
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    if let Ok(idx) = IRREGULARS.binary_search_by_key(&word, |&(singular, _)| singular) {
        return String::from(IRREGULARS[idx].1);
    }

    if is_uncountable(word) {
        return String::from(word);
    }

    pluralize_by_suffix(word)
}

/// Pluralize the last `_`-separated segment of a snake_case identifier.
///
/// ```
/// use collective_inflect::pluralize_identifier;
///
/// assert_eq!(pluralize_identifier("other_thing"), "other_things");
/// assert_eq!(pluralize_identifier("map_of_child"), "map_of_children");
/// assert_eq!(pluralize_identifier("category"), "categories");
/// ```
#[cfg(feature = "alloc")]
pub fn pluralize_identifier(ident: &str) -> String {
    match ident.rsplit_once('_') {
        Some((head, tail)) if !tail.is_empty() => {
            let mut out = String::with_capacity(ident.len() + 3);
            out.push_str(head);
            out.push('_');
            out.push_str(&pluralize(tail));
            out
        }
        Some(_) => alloc::format!("{ident}s"),
        None => pluralize(ident),
    }
}

#[cfg(feature = "alloc")]
fn pluralize_by_suffix(word: &str) -> String {
    let len = word.len();

    // consonant + y → ies; vowel + y just takes -s (day → days)
    if len > 1 && word.ends_with('y') {
        let prefix = &word[..len - 1];
        if !prefix.ends_with(is_vowel) {
            return alloc::format!("{prefix}ies");
        }
    }

    if let Some(ending) = F_TO_VES
        .iter()
        .find(|base| word == **base || (base.len() > 3 && word.ends_with(**base)))
    {
        // drop the trailing "f" or "fe"
        let cut = if ending.ends_with("fe") { 2 } else { 1 };
        return alloc::format!("{}ves", &word[..len - cut]);
    }

    // quiz → quizzes, but waltz → waltzes
    if len > 1 && word.ends_with('z') && !word.ends_with("zz") {
        let prefix = &word[..len - 1];
        if prefix.ends_with(is_vowel) {
            return alloc::format!("{word}zes");
        }
    }

    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return alloc::format!("{word}es");
    }

    if word.ends_with('o') && O_TO_OES.binary_search(&word).is_ok() {
        return alloc::format!("{word}es");
    }

    alloc::format!("{word}s")
}

#[cfg(feature = "alloc")]
fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
