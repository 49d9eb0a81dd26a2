//! Matching engine for picking ROM files from a list of wanted game titles.
//!
//! Titles and file names are normalized into canonical token strings,
//! scored with an edit-distance ratio adjusted by token and sequel number checks,
//! and ranked by region and dump quality tags.

mod disambiguate;
mod error;
mod input;
mod normalize;
mod rank;
mod rescan;
mod scan;
mod settings;
mod similarity;

pub use disambiguate::{Adjustment, Evaluation, NUMERIC_CONFLICT_CAP, SUBSET_BOOST_SCORE, SUBSET_CONFLICT_CAP, evaluate};
pub use error::PickError;
pub use input::{CandidateFile, gather_candidates, parse_title_list, read_title_list};
pub use normalize::{Canonical, NameKind, normalize};
pub use rank::{MatchCandidate, Tier, pick_best, rank};
pub use rescan::{RescanReport, rescan};
pub use scan::{Delivery, Outcome, ScanOptions, ScanReport, Scanner, Selection, TitleResult};
pub use settings::{
    DEFAULT_MAX_TITLES, DEFAULT_PRIMARY_THRESHOLD, DEFAULT_SECONDARY_THRESHOLD, STOP_WORDS, StopWords, Thresholds,
};
pub use similarity::similarity;
