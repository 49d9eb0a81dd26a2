//! Combine edit-distance similarity with token and sequel number checks.
//!
//! Plain edit distance cannot tell "Streets of Rage 2" from "Streets of Rage 3",
//! so the raw score is adjusted with two signals:
//! whether every file token appears in the title,
//! and whether the file carries the title's highest sequel number.

use std::fmt;

use crate::matching::Canonical;
use crate::matching::similarity::similarity;

/// Score for a file whose tokens all appear in the title.
pub const SUBSET_BOOST_SCORE: f64 = 0.95;

/// Maximum score for a token subset that is missing the title's sequel number.
pub const SUBSET_CONFLICT_CAP: f64 = 0.50;

/// Maximum score for any file missing the title's sequel number.
pub const NUMERIC_CONFLICT_CAP: f64 = 0.65;

/// Adjustment applied on top of the raw similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    None,
    /// Token subset without a number conflict, raised to at least 0.95.
    SubsetBoost,
    /// Token subset with a number conflict, capped to 0.50.
    SubsetConflictCap,
    /// Number conflict, capped to 0.65.
    NumericCap,
}

/// Result of comparing one title against one file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub raw_score: f64,
    pub score: f64,
    pub adjustment: Adjustment,
    pub token_subset: bool,
    pub numeric_conflict: bool,
}

impl Evaluation {
    #[must_use]
    pub fn is_match(&self, threshold: f64) -> bool {
        self.score >= threshold
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::SubsetBoost => write!(f, "token subset boost"),
            Self::SubsetConflictCap => write!(f, "token subset with number conflict"),
            Self::NumericCap => write!(f, "number conflict"),
        }
    }
}

/// Score a canonical file name against a canonical title.
#[must_use]
pub fn evaluate(title: &Canonical, file: &Canonical) -> Evaluation {
    let raw_score = similarity(&title.text, &file.text);
    let token_subset = is_token_subset(title, file);
    let numeric_conflict = has_numeric_conflict(title, file);

    let mut score = raw_score;
    let mut adjustment = Adjustment::None;

    if token_subset {
        if numeric_conflict {
            score = score.min(SUBSET_CONFLICT_CAP);
            adjustment = Adjustment::SubsetConflictCap;
        } else if score < SUBSET_BOOST_SCORE {
            score = SUBSET_BOOST_SCORE;
            adjustment = Adjustment::SubsetBoost;
        }
    }

    if numeric_conflict && score > NUMERIC_CONFLICT_CAP {
        score = NUMERIC_CONFLICT_CAP;
        adjustment = Adjustment::NumericCap;
    }

    Evaluation {
        raw_score,
        score,
        adjustment,
        token_subset,
        numeric_conflict,
    }
}

/// True when every file token is also a title token.
/// A file without tokens is never a subset.
fn is_token_subset(title: &Canonical, file: &Canonical) -> bool {
    !file.tokens.is_empty() && file.tokens.iter().all(|token| title.tokens.contains(token))
}

/// True when the title has numbers and the file lacks the highest one.
fn has_numeric_conflict(title: &Canonical, file: &Canonical) -> bool {
    title
        .max_number()
        .is_some_and(|number| !file.numbers.contains(&number))
}
