//! One matching pass over the wanted titles.

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::Colorize;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::matching::disambiguate::{Adjustment, Evaluation, evaluate};
use crate::matching::normalize::{Canonical, NameKind, normalize};
use crate::matching::rank::{MatchCandidate, Tier, rank};
use crate::matching::{CandidateFile, StopWords};
use crate::{print_error, print_warning};

const SAME_FILE_ERROR: &str = "source and destination are the same file";

/// Options shared by every pass.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub stop_words: StopWords,
    /// Report matches without copying.
    pub dryrun: bool,
    pub verbose: bool,
}

/// Matches titles against a fixed snapshot of candidate files and copies the winners.
pub struct Scanner {
    candidates: Vec<CandidateFile>,
    /// Canonical file names in the same order as `candidates`.
    canonical: Vec<Canonical>,
    destination: PathBuf,
    options: ScanOptions,
}

/// What happened to the chosen file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Copied,
    /// Dryrun mode, nothing was written.
    DryRun,
    /// Copy reported success but the destination file does not exist.
    Unverified,
    Failed(String),
}

/// The winning file for a title.
#[derive(Debug, Clone)]
pub struct Selection {
    pub file: CandidateFile,
    pub canonical: String,
    pub evaluation: Evaluation,
    pub tier: Tier,
    /// Number of other files that also passed the threshold.
    pub alternatives: usize,
    pub target: PathBuf,
    pub delivery: Delivery,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    /// Title normalized to an empty string and could not be scored.
    Skipped,
    /// No file reached the threshold.
    Unmatched { best_score: Option<f64> },
    Matched(Box<Selection>),
}

/// Result for a single title.
#[derive(Debug, Clone)]
pub struct TitleResult {
    pub title: String,
    pub canonical: String,
    pub outcome: Outcome,
}

/// Results of one pass.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub threshold: f64,
    /// Per-title results in input order.
    pub results: Vec<TitleResult>,
    /// Titles without a match in input order.
    pub unmatched: Vec<String>,
    pub elapsed: Duration,
}

impl Scanner {
    /// Create a scanner over a snapshot of candidate files.
    #[must_use]
    pub fn new(candidates: Vec<CandidateFile>, destination: PathBuf, options: ScanOptions) -> Self {
        let canonical = candidates
            .par_iter()
            .map(|file| normalize(&file.stem, NameKind::FileName, &options.stop_words))
            .collect();

        Self {
            candidates,
            canonical,
            destination,
            options,
        }
    }

    #[must_use]
    pub fn candidates(&self) -> &[CandidateFile] {
        &self.candidates
    }

    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    #[must_use]
    pub const fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Create the destination directory if needed. Does nothing in dryrun mode.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn ensure_destination(&self) -> anyhow::Result<()> {
        if self.options.dryrun || self.destination.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.destination)
            .with_context(|| format!("Failed to create destination directory: {}", self.destination.display()))
    }

    /// Run one pass over the given titles.
    pub fn scan(&self, titles: &[String], threshold: f64) -> ScanReport {
        let start = Instant::now();
        let mut results = Vec::with_capacity(titles.len());
        let mut unmatched = Vec::new();

        for (index, title) in titles.iter().enumerate() {
            println!(
                "{} {}",
                format!("[{}/{}]", index + 1, titles.len()).bold(),
                title.cyan()
            );
            let result = self.process_title(title, threshold);
            if matches!(result.outcome, Outcome::Unmatched { .. }) {
                unmatched.push(title.clone());
            }
            results.push(result);
        }

        let report = ScanReport {
            threshold,
            results,
            unmatched,
            elapsed: start.elapsed(),
        };
        report.print_summary();
        report
    }

    /// Evaluate one title against every candidate and deliver the best match.
    fn process_title(&self, title: &str, threshold: f64) -> TitleResult {
        let canonical = normalize(title, NameKind::Title, &self.options.stop_words);
        if canonical.is_empty() {
            print_warning!("  Skipped: nothing left to compare after cleaning");
            return TitleResult {
                title: title.to_string(),
                canonical: String::new(),
                outcome: Outcome::Skipped,
            };
        }

        if self.options.verbose {
            println!("  canonical: {}", canonical.text);
        }

        let evaluations = self.evaluate_all(&canonical);
        let passing: Vec<MatchCandidate<'_>> = self
            .candidates
            .iter()
            .zip(&evaluations)
            .enumerate()
            .filter(|(_, (_, evaluation))| evaluation.is_match(threshold))
            .map(|(index, (file, evaluation))| MatchCandidate::new(index, file, *evaluation))
            .collect();

        let ranked = rank(passing);
        let Some(best) = ranked.first() else {
            let best_score = evaluations.iter().map(|e| e.score).reduce(f64::max);
            println!(
                "  {}",
                format!(
                    "No match at threshold {threshold:.2} (best {})",
                    best_score.map_or_else(|| "-".to_string(), |score| format!("{score:.2}"))
                )
                .yellow()
            );
            return TitleResult {
                title: title.to_string(),
                canonical: canonical.text,
                outcome: Outcome::Unmatched { best_score },
            };
        };

        let file_canonical = self.canonical[best.index].text.clone();
        self.print_selection(best, &canonical.text, &file_canonical, &ranked[1..]);

        let target = self.destination.join(best.file.path.file_name().unwrap_or_else(|| OsStr::new(&best.file.name)));
        let delivery = self.deliver(best.file, &target);

        TitleResult {
            title: title.to_string(),
            canonical: canonical.text,
            outcome: Outcome::Matched(Box::new(Selection {
                file: best.file.clone(),
                canonical: file_canonical,
                evaluation: best.evaluation,
                tier: best.tier,
                alternatives: ranked.len() - 1,
                target,
                delivery,
            })),
        }
    }

    /// Score the title against all candidates in parallel, keeping candidate order.
    fn evaluate_all(&self, title: &Canonical) -> Vec<Evaluation> {
        self.canonical.par_iter().map(|file| evaluate(title, file)).collect()
    }

    /// Copy the chosen file, overwriting any existing file with the same name.
    /// A file is never copied onto itself.
    fn deliver(&self, file: &CandidateFile, target: &Path) -> Delivery {
        if self.options.dryrun {
            println!("  {} {}", "[DRYRUN] Copy:".magenta(), crate::path_to_string(target));
            return Delivery::DryRun;
        }

        if is_same_file(&file.path, target) {
            print_error!("Source and destination are the same file: {}", target.display());
            return Delivery::Failed(SAME_FILE_ERROR.to_string());
        }

        match fs::copy(&file.path, target) {
            Ok(_) if target.exists() => {
                if self.options.verbose {
                    println!("  Copied to {}", crate::path_to_string(target));
                }
                Delivery::Copied
            }
            Ok(_) => {
                print_warning!("  Copied file not found at destination: {}", target.display());
                Delivery::Unverified
            }
            Err(error) => {
                print_error!("Failed to copy {} to {}: {error}", file.name, target.display());
                Delivery::Failed(error.to_string())
            }
        }
    }

    fn print_selection(
        &self,
        best: &MatchCandidate<'_>,
        title_canonical: &str,
        file_canonical: &str,
        others: &[MatchCandidate<'_>],
    ) {
        let evaluation = &best.evaluation;
        println!(
            "  {} {} {}",
            "->".green(),
            best.file.name.green().bold(),
            format!("(score {:.2}, tier {})", evaluation.score, best.tier).dimmed()
        );
        if evaluation.adjustment != Adjustment::None {
            println!(
                "  adjusted {:.2} -> {:.2}: {}",
                evaluation.raw_score, evaluation.score, evaluation.adjustment
            );
        }
        if self.options.verbose {
            crate::show_diff(title_canonical, file_canonical);
            for other in others {
                println!(
                    "    {} (score {:.2}, tier {})",
                    other.file.name,
                    other.score(),
                    other.tier
                );
            }
        }
    }
}

/// True when both paths resolve to the same existing file.
fn is_same_file(source: &Path, target: &Path) -> bool {
    match (dunce::canonicalize(source), dunce::canonicalize(target)) {
        (Ok(source), Ok(target)) => source == target,
        _ => false,
    }
}

impl ScanReport {
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.results
            .iter()
            .filter(|result| matches!(result.outcome, Outcome::Matched(_)))
            .count()
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|result| matches!(result.outcome, Outcome::Skipped))
            .count()
    }

    /// Matched titles whose file could not be copied or verified.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.selections()
            .filter(|selection| matches!(selection.delivery, Delivery::Failed(_) | Delivery::Unverified))
            .count()
    }

    /// Iterate over the chosen files.
    pub fn selections(&self) -> impl Iterator<Item = &Selection> {
        self.results.iter().filter_map(|result| match &result.outcome {
            Outcome::Matched(selection) => Some(selection.as_ref()),
            _ => None,
        })
    }

    /// Find the result for a title.
    #[must_use]
    pub fn result_for(&self, title: &str) -> Option<&TitleResult> {
        self.results.iter().find(|result| result.title == title)
    }

    fn print_summary(&self) {
        println!(
            "{}",
            format!(
                "Pass at {:.2} finished in {}: {} matched, {} unmatched, {} skipped, {} failed",
                self.threshold,
                crate::format_duration(self.elapsed),
                self.matched_count(),
                self.unmatched.len(),
                self.skipped_count(),
                self.failed_count()
            )
            .bold()
        );
    }
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copied => write!(f, "copied"),
            Self::DryRun => write!(f, "dryrun"),
            Self::Unverified => write!(f, "not found after copy"),
            Self::Failed(error) => write!(f, "copy failed: {error}"),
        }
    }
}
