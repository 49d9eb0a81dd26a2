//! Prefer USA and multi-region good dumps among the files that passed the threshold.

use std::cmp::Ordering;
use std::fmt;

use crate::matching::CandidateFile;
use crate::matching::disambiguate::Evaluation;

/// Region markers for USA and multi-region releases.
const PREFERRED_REGION_MARKERS: [&str; 2] = ["(U)", "(JUE)"];

/// Verified good dump marker.
const GOOD_DUMP_MARKER: &str = "[!]";

/// Priority of a matching file based on its region and dump tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Baseline = 1,
    PreferredRegion = 2,
    GoodDump = 3,
}

/// A file that passed the threshold for one title.
#[derive(Debug, Clone)]
pub struct MatchCandidate<'a> {
    /// Position of the file in the scanned candidate list.
    pub index: usize,
    pub file: &'a CandidateFile,
    pub evaluation: Evaluation,
    pub tier: Tier,
}

impl Tier {
    /// Determine tier from the original file name, including tags.
    #[must_use]
    pub fn from_file_name(name: &str) -> Self {
        let preferred_region = PREFERRED_REGION_MARKERS.iter().any(|marker| name.contains(marker));
        if !preferred_region {
            Self::Baseline
        } else if name.contains(GOOD_DUMP_MARKER) {
            Self::GoodDump
        } else {
            Self::PreferredRegion
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

impl<'a> MatchCandidate<'a> {
    #[must_use]
    pub fn new(index: usize, file: &'a CandidateFile, evaluation: Evaluation) -> Self {
        Self {
            index,
            file,
            evaluation,
            tier: Tier::from_file_name(&file.name),
        }
    }

    #[must_use]
    pub const fn score(&self) -> f64 {
        self.evaluation.score
    }
}

/// Order candidates best first by tier, then by score.
///
/// The sort is stable, so equal candidates keep their enumeration order.
#[must_use]
pub fn rank(mut candidates: Vec<MatchCandidate<'_>>) -> Vec<MatchCandidate<'_>> {
    candidates.sort_by(|a, b| match b.tier.cmp(&a.tier) {
        Ordering::Equal => b.score().total_cmp(&a.score()),
        ordering => ordering,
    });
    candidates
}

/// Pick the single best candidate.
#[must_use]
pub fn pick_best(candidates: Vec<MatchCandidate<'_>>) -> Option<MatchCandidate<'_>> {
    rank(candidates).into_iter().next()
}

#[cfg(test)]
mod rank_tests {
    use std::path::PathBuf;

    use super::*;
    use crate::matching::disambiguate::Adjustment;

    fn make_file(name: &str) -> CandidateFile {
        CandidateFile::new(PathBuf::from("/roms").join(name))
    }

    fn make_evaluation(score: f64) -> Evaluation {
        Evaluation {
            raw_score: score,
            score,
            adjustment: Adjustment::None,
            token_subset: false,
            numeric_conflict: false,
        }
    }

    #[test]
    fn tier_from_markers() {
        assert_eq!(Tier::from_file_name("Sonic (E).bin"), Tier::Baseline);
        assert_eq!(Tier::from_file_name("Sonic (U).bin"), Tier::PreferredRegion);
        assert_eq!(Tier::from_file_name("Sonic (JUE).bin"), Tier::PreferredRegion);
        assert_eq!(Tier::from_file_name("Sonic (U) [!].bin"), Tier::GoodDump);
        assert_eq!(Tier::from_file_name("Sonic (JUE) [!].bin"), Tier::GoodDump);
    }

    #[test]
    fn good_dump_requires_region() {
        assert_eq!(Tier::from_file_name("Sonic (E) [!].bin"), Tier::Baseline);
        assert_eq!(Tier::from_file_name("Sonic [!].bin"), Tier::Baseline);
    }

    #[test]
    fn markers_are_case_sensitive() {
        assert_eq!(Tier::from_file_name("Sonic (u).bin"), Tier::Baseline);
    }

    #[test]
    fn tier_display() {
        assert_eq!(Tier::GoodDump.to_string(), "3");
        assert_eq!(Tier::Baseline.to_string(), "1");
    }

    #[test]
    fn higher_tier_beats_higher_score() {
        let europe = make_file("Sonic (E).bin");
        let usa = make_file("Sonic (U) [!].bin");
        let candidates = vec![
            MatchCandidate::new(0, &europe, make_evaluation(1.0)),
            MatchCandidate::new(1, &usa, make_evaluation(0.8)),
        ];
        let best = pick_best(candidates).expect("should have a winner");
        assert_eq!(best.file.name, "Sonic (U) [!].bin");
    }

    #[test]
    fn higher_score_wins_within_tier() {
        let first = make_file("Sonic Spinball (U).bin");
        let second = make_file("Sonic (U).bin");
        let candidates = vec![
            MatchCandidate::new(0, &first, make_evaluation(0.75)),
            MatchCandidate::new(1, &second, make_evaluation(0.9)),
        ];
        let ranked = rank(candidates);
        assert_eq!(ranked[0].file.name, "Sonic (U).bin");
        assert_eq!(ranked[1].file.name, "Sonic Spinball (U).bin");
    }

    #[test]
    fn ties_keep_enumeration_order() {
        let files = [
            make_file("Sonic (U) (REV00).bin"),
            make_file("Sonic (U) (REV01).bin"),
            make_file("Sonic (U) (REV02).bin"),
        ];
        let candidates = files
            .iter()
            .enumerate()
            .map(|(index, file)| MatchCandidate::new(index, file, make_evaluation(0.9)))
            .collect();
        let ranked = rank(candidates);
        let names: Vec<&str> = ranked.iter().map(|c| c.file.name.as_str()).collect();
        assert_eq!(ranked.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(
            names,
            vec!["Sonic (U) (REV00).bin", "Sonic (U) (REV01).bin", "Sonic (U) (REV02).bin"]
        );
    }

    #[test]
    fn pick_best_empty() {
        assert!(pick_best(Vec::new()).is_none());
    }
}
