//! Convert raw titles and file names into comparable canonical strings.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::matching::StopWords;

/// Comma-inverted article at the end of a file name, optionally followed by tag groups:
/// "Legend of Zelda, The (U) [!]"
static RE_INVERTED_ARTICLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<body>.*?),\s*(?P<article>the|an|a)(?P<tags>(?:\s*(?:\([^)]*\)|\[[^\]]*\]))*)\s*$")
        .expect("Failed to create regex pattern for inverted article")
});

static RE_LEADING_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:the|an|a)\s+").expect("Failed to create regex pattern for leading article"));

/// Parenthesized and bracketed segments that carry region, version and dump tags.
static RE_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)|\[[^\]]*\]").expect("Failed to create regex pattern for tags"));

/// Roman numerals that are converted to digits when they appear as a separate word.
const ROMAN_NUMERALS: [(&str, &str); 4] = [("I", "1"), ("II", "2"), ("III", "3"), ("IV", "4")];

/// What kind of name is being normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Entry from the wanted list.
    Title,
    /// Candidate file name without extension.
    FileName,
}

/// Canonical form of a title or file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Canonical {
    /// Lowercase, space-separated tokens.
    pub text: String,
    pub tokens: Vec<String>,
    /// Numeric values found in the name after tag and year removal.
    pub numbers: BTreeSet<u64>,
}

impl Canonical {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Highest numeric value, used as the sequel number of a title.
    #[must_use]
    pub fn max_number(&self) -> Option<u64> {
        self.numbers.last().copied()
    }
}

impl fmt::Display for Canonical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Normalize a raw title or file stem into its canonical form.
#[must_use]
pub fn normalize(raw: &str, kind: NameKind, stop_words: &StopWords) -> Canonical {
    let mut text = raw.trim().to_string();

    if kind == NameKind::FileName {
        text = RE_INVERTED_ARTICLE
            .replace(&text, "${article} ${body}${tags}")
            .to_string();
    }

    text = RE_LEADING_ARTICLE.replace(&text, "").to_string();
    text = replace_roman_numerals(&text);
    text = RE_TAGS.replace_all(&text, " ").to_string();

    if kind == NameKind::Title {
        text = remove_years(&text);
    }

    let numbers = bare_number_spans(&text)
        .into_iter()
        .filter_map(|(start, end)| text[start..end].parse::<u64>().ok())
        .collect();

    let cleaned: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();

    let words: Vec<String> = cleaned.split_whitespace().map(str::to_string).collect();
    let tokens = stop_words.strip(&words);

    Canonical {
        text: tokens.join(" "),
        tokens,
        numbers,
    }
}

/// Replace roman numerals I to IV that stand as their own space-separated word.
///
/// This also rewrites the pronoun "I".
fn replace_roman_numerals(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            ROMAN_NUMERALS
                .iter()
                .find(|(roman, _)| *roman == word)
                .map_or(word, |(_, digit)| digit)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove bare 2 to 4 digit numbers from a title, unless nothing alphanumeric would remain.
fn remove_years(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for (start, end) in bare_number_spans(text) {
        if (2..=4).contains(&(end - start)) {
            result.push_str(&text[last..start]);
            result.push(' ');
            last = end;
        }
    }
    result.push_str(&text[last..]);

    if result.chars().any(char::is_alphanumeric) {
        result
    } else {
        text.to_string()
    }
}

/// Byte ranges of ASCII digit runs that are not attached to other alphanumeric characters.
fn bare_number_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut run_start: Option<usize> = None;
    let mut before_run: Option<char> = None;
    let mut previous: Option<char> = None;

    for (index, c) in text.char_indices() {
        if c.is_ascii_digit() {
            if run_start.is_none() {
                run_start = Some(index);
                before_run = previous;
            }
        } else if let Some(start) = run_start.take() {
            if !before_run.is_some_and(char::is_alphanumeric) && !c.is_alphanumeric() {
                spans.push((start, index));
            }
        }
        previous = Some(c);
    }

    if let Some(start) = run_start {
        if !before_run.is_some_and(char::is_alphanumeric) {
            spans.push((start, text.len()));
        }
    }

    spans
}

#[cfg(test)]
mod normalize_tests {
    use super::*;

    fn title(raw: &str) -> Canonical {
        normalize(raw, NameKind::Title, &StopWords::default())
    }

    fn file(raw: &str) -> Canonical {
        normalize(raw, NameKind::FileName, &StopWords::default())
    }

    #[test]
    fn test_basic_title() {
        let canonical = title("Sonic the Hedgehog 2");
        assert_eq!(canonical.text, "sonic hedgehog 2");
        assert_eq!(canonical.tokens, vec!["sonic", "hedgehog", "2"]);
        assert_eq!(canonical.numbers, BTreeSet::from([2]));
    }

    #[test]
    fn test_file_name_tags_removed() {
        let canonical = file("Sonic the Hedgehog 2 (U) [!]");
        assert_eq!(canonical.text, "sonic hedgehog 2");
        assert_eq!(canonical.max_number(), Some(2));
    }

    #[test]
    fn test_tag_numbers_are_not_tracked() {
        let canonical = file("Sonic the Hedgehog (1991)(Sega)[b1]");
        assert_eq!(canonical.text, "sonic hedgehog");
        assert!(canonical.numbers.is_empty());
    }

    #[test]
    fn test_leading_article_removed() {
        assert_eq!(title("The Lion King").text, "lion king");
        assert_eq!(title("A Bug's Life").text, "bug s life");
        assert_eq!(title("an American Tail").text, "american tail");
    }

    #[test]
    fn test_inverted_article_in_file_name() {
        assert_eq!(file("Legend of Zelda, The").text, "legend zelda");
        assert_eq!(file("Legend of Zelda, The (U) [!]").text, "legend zelda");
        assert_eq!(file("Bug's Life, A (E)").text, "bug s life");
    }

    #[test]
    fn test_inverted_article_only_for_file_names() {
        assert_eq!(title("Ooze, The").text, "ooze");
        // The comma becomes a space and the trailing article is a stop word either way,
        // but a non-article word after a comma is kept
        assert_eq!(file("Sonic, Another").text, "sonic another");
    }

    #[test]
    fn test_roman_numerals() {
        assert_eq!(title("Street Fighter II").text, "street fighter 2");
        assert_eq!(title("Phantasy Star III Generations").text, "phantasy star 3 generations");
        assert_eq!(title("Shining Force IV").text, "shining force 4");
        assert_eq!(file("Final Fantasy III (U)").numbers, BTreeSet::from([3]));
    }

    #[test]
    fn test_roman_numeral_rewrites_pronoun() {
        assert_eq!(title("Before I Sleep").text, "before 1 sleep");
    }

    #[test]
    fn test_roman_numeral_at_string_edges() {
        // Start and end of the text count as word boundaries
        let canonical = title("I Have No Mouth");
        assert_eq!(canonical.text, "1 have no mouth");
        assert_eq!(canonical.numbers, BTreeSet::from([1]));
        assert_eq!(title("Rocky IV").text, "rocky 4");
        assert_eq!(file("II (U)").text, "2");
    }

    #[test]
    fn test_roman_numerals_only_as_whole_words() {
        assert_eq!(title("Ivanhoe").text, "ivanhoe");
        assert_eq!(title("Mission: II-Impossible").text, "mission ii impossible");
        assert_eq!(title("Street Fighter ii").text, "street fighter ii");
    }

    #[test]
    fn test_title_years_removed() {
        let canonical = title("NHL 94");
        assert_eq!(canonical.text, "nhl");
        assert!(canonical.numbers.is_empty());
        assert_eq!(title("FIFA Soccer 2004").text, "fifa soccer");
    }

    #[test]
    fn test_file_years_kept() {
        let canonical = file("NHL 94 (U)");
        assert_eq!(canonical.text, "nhl 94");
        assert_eq!(canonical.numbers, BTreeSet::from([94]));
    }

    #[test]
    fn test_title_number_only_is_protected() {
        let canonical = title("1942");
        assert_eq!(canonical.text, "1942");
        assert_eq!(canonical.numbers, BTreeSet::from([1942]));
    }

    #[test]
    fn test_attached_numbers_are_not_bare() {
        let canonical = title("Sonic 3D Blast");
        assert_eq!(canonical.text, "sonic 3d blast");
        assert!(canonical.numbers.is_empty());

        let canonical = title("F-22 Interceptor");
        assert_eq!(canonical.text, "f interceptor");
    }

    #[test]
    fn test_single_and_long_digits_kept_in_titles() {
        assert_eq!(title("Streets of Rage 3").numbers, BTreeSet::from([3]));
        assert_eq!(title("Puzzle 12345").numbers, BTreeSet::from([12345]));
    }

    #[test]
    fn test_punctuation_replaced() {
        assert_eq!(title("Sonic & Knuckles").text, "sonic knuckles");
        assert_eq!(title("Ms. Pac-Man").text, "ms pac man");
        assert_eq!(title("Toe Jam & Earl: Panic on Funkotron").text, "toe jam earl panic on funkotron");
    }

    #[test]
    fn test_stop_words_case_insensitive() {
        assert_eq!(title("Streets Of Rage").text, "streets rage");
        assert_eq!(title("Mortal Kombat VS Street Fighter").text, "mortal kombat street fighter");
        assert_eq!(title("Mickey Mouse Starring in Castle of Illusion").text, "mickey mouse castle illusion");
    }

    #[test]
    fn test_video_game_phrase_removed() {
        assert_eq!(title("The Lion King Video Game").text, "lion king");
    }

    #[test]
    fn test_extra_stop_words() {
        let stop_words = StopWords::with_extra(&["edition".to_string()]);
        let canonical = normalize("Doom Special Edition", NameKind::Title, &stop_words);
        assert_eq!(canonical.text, "doom special");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(title("  Ecco   the\tDolphin  ").text, "ecco dolphin");
    }

    #[test]
    fn test_empty_after_cleaning() {
        assert!(title("The (Beta)").is_empty());
        assert!(title("[!]").is_empty());
        assert!(file("").is_empty());
        assert!(title("The Of And").tokens.is_empty());
    }

    #[test]
    fn test_unicode_letters_kept() {
        assert_eq!(title("Pokémon Stadium").text, "pokémon stadium");
    }

    #[test]
    fn test_idempotent_on_canonical_title() {
        let inputs = [
            "Sonic the Hedgehog 2",
            "Streets of Rage 3",
            "The Legend of Zelda: A Link to the Past",
            "Before I Sleep",
            "NBA Jam 2000",
            "1942",
            "Street Fighter II' - Special Champion Edition (U) [!]",
            "Ecco the Dolphin",
            "F-22 Interceptor",
        ];
        for input in inputs {
            let first = title(input);
            let second = title(&first.text);
            assert_eq!(first, second, "normalization not idempotent for '{input}'");
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(title("Vectorman 2"), title("Vectorman 2"));
    }

    #[test]
    fn test_bare_number_spans() {
        assert_eq!(bare_number_spans("a 12 b3 45c 6"), vec![(2, 4), (12, 13)]);
        assert_eq!(bare_number_spans("99"), vec![(0, 2)]);
        assert!(bare_number_spans("abc").is_empty());
    }
}
