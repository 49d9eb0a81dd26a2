//! Match thresholds and stop-word configuration.

use std::fmt;

use itertools::Itertools;

use crate::matching::PickError;

/// Default threshold for the first pass.
pub const DEFAULT_PRIMARY_THRESHOLD: f64 = 0.8;

/// Default threshold for the optional second pass.
pub const DEFAULT_SECONDARY_THRESHOLD: f64 = 0.6;

/// Default number of titles read from the game list.
pub const DEFAULT_MAX_TITLES: usize = 100;

/// Words and phrases removed from both titles and file names before comparison.
pub const STOP_WORDS: &[&str] = &[
    "the",
    "of",
    "in",
    "and",
    "a",
    "an",
    "vs",
    "versus",
    "starring",
    "video game",
];

/// Validated threshold pair where the secondary threshold is always lower than the primary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    primary: f64,
    secondary: f64,
}

/// Stop words split into lowercase word sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWords {
    phrases: Vec<Vec<String>>,
}

impl Thresholds {
    /// Create a threshold pair.
    ///
    /// # Errors
    /// Returns an error if either value is outside `(0, 1]`,
    /// or if the secondary threshold is not strictly lower than the primary.
    pub fn new(primary: f64, secondary: f64) -> Result<Self, PickError> {
        Self::check_range("primary", primary)?;
        Self::check_range("secondary", secondary)?;
        if secondary >= primary {
            return Err(PickError::ThresholdOrder { primary, secondary });
        }
        Ok(Self { primary, secondary })
    }

    #[must_use]
    pub const fn primary(&self) -> f64 {
        self.primary
    }

    #[must_use]
    pub const fn secondary(&self) -> f64 {
        self.secondary
    }

    fn check_range(name: &'static str, value: f64) -> Result<(), PickError> {
        // NaN fails both comparisons
        if value > 0.0 && value <= 1.0 {
            Ok(())
        } else {
            Err(PickError::InvalidThreshold { name, value })
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_THRESHOLD,
            secondary: DEFAULT_SECONDARY_THRESHOLD,
        }
    }
}

impl fmt::Display for Thresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "primary {:.2}, secondary {:.2}", self.primary, self.secondary)
    }
}

impl StopWords {
    /// Default stop words extended with user supplied words.
    ///
    /// Extra entries are lowercased and split on non-alphanumeric characters the same way names are,
    /// so "disney's" matches the tokens "disney s". Empty and duplicate entries are ignored.
    #[must_use]
    pub fn with_extra(extra: &[String]) -> Self {
        let phrases = STOP_WORDS
            .iter()
            .map(|word| (*word).to_string())
            .chain(extra.iter().map(|word| word.to_lowercase()))
            .map(|phrase| {
                phrase
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|word| !word.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|words| !words.is_empty())
            .unique()
            .collect();

        Self { phrases }
    }

    /// Remove stop words from a sequence of lowercase tokens.
    ///
    /// Longer phrases are tried first so that a multi-word entry wins over its single-word prefix.
    #[must_use]
    pub fn strip(&self, tokens: &[String]) -> Vec<String> {
        let phrases: Vec<&Vec<String>> = self.phrases.iter().sorted_by_key(|p| std::cmp::Reverse(p.len())).collect();
        let mut result = Vec::with_capacity(tokens.len());
        let mut index = 0;
        'outer: while index < tokens.len() {
            for phrase in &phrases {
                let end = index + phrase.len();
                if end <= tokens.len() && tokens[index..end] == phrase[..] {
                    index = end;
                    continue 'outer;
                }
            }
            result.push(tokens[index].clone());
            index += 1;
        }
        result
    }

    /// Number of configured phrases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::with_extra(&[])
    }
}
