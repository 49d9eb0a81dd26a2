//! Two-pass matching: a strict primary pass, then an optional looser pass over what is left.

use anyhow::Result;
use colored::Colorize;

use crate::matching::{ScanReport, Scanner, Thresholds};

/// Reports from both passes.
#[derive(Debug, Clone)]
pub struct RescanReport {
    pub primary: ScanReport,
    /// Present when the secondary pass was confirmed and run.
    pub secondary: Option<ScanReport>,
}

impl RescanReport {
    /// Titles still unmatched after the last pass that ran.
    #[must_use]
    pub fn unmatched(&self) -> &[String] {
        self.secondary
            .as_ref()
            .map_or(&self.primary.unmatched, |report| &report.unmatched)
    }

    /// Total matched titles over both passes.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.primary.matched_count() + self.secondary.as_ref().map_or(0, ScanReport::matched_count)
    }
}

/// Run the primary pass over all titles and, if `confirm` agrees,
/// a secondary pass over the unmatched titles at the lower threshold.
///
/// `confirm` receives the finished primary report and is only called when some titles are unmatched.
///
/// # Errors
/// Returns an error if the destination cannot be created or `confirm` fails.
pub fn rescan<F>(scanner: &Scanner, titles: &[String], thresholds: Thresholds, confirm: F) -> Result<RescanReport>
where
    F: FnOnce(&ScanReport) -> Result<bool>,
{
    scanner.ensure_destination()?;

    println!(
        "{}",
        format!(
            "Primary scan: {} titles against {} files at threshold {:.2}",
            titles.len(),
            scanner.candidates().len(),
            thresholds.primary()
        )
        .magenta()
        .bold()
    );
    let primary = scanner.scan(titles, thresholds.primary());

    if primary.unmatched.is_empty() {
        return Ok(RescanReport {
            primary,
            secondary: None,
        });
    }

    if !confirm(&primary)? {
        return Ok(RescanReport {
            primary,
            secondary: None,
        });
    }

    println!(
        "{}",
        format!(
            "Secondary scan: {} titles at threshold {:.2}",
            primary.unmatched.len(),
            thresholds.secondary()
        )
        .magenta()
        .bold()
    );
    let secondary = scanner.scan(&primary.unmatched, thresholds.secondary());

    Ok(RescanReport {
        primary,
        secondary: Some(secondary),
    })
}
