use std::fs;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use rom_picker::matching::{Delivery, Outcome, ScanReport};

use crate::config::Config;

/// Plain text run log with buffered writes
pub struct FileLogger {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileLogger {
    /// Create a new file logger, writing to ~/logs/rom-picker/rompick_<timestamp>.log
    pub(crate) fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        let log_dir = home_dir.join("logs").join(env!("CARGO_PKG_NAME"));
        Self::in_directory(&log_dir)
    }

    /// Create a new log file in the given directory.
    /// The timestamp in the file name identifies the run.
    pub(crate) fn in_directory(log_dir: &Path) -> Result<Self> {
        if !log_dir.exists() {
            fs::create_dir_all(log_dir).context("Failed to create log directory")?;
        }

        let log_path = log_dir.join(format!(
            "{}_{}.log",
            env!("CARGO_BIN_NAME"),
            Local::now().format("%Y-%m-%d_%H-%M-%S")
        ));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        Ok(Self {
            writer: BufWriter::new(file),
            path: log_path,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Log when starting the program
    pub(crate) fn log_init(&mut self, config: &Config, title_count: usize, file_count: usize) {
        let _ = writeln!(
            self.writer,
            "[{}] INIT \"{}\"",
            Self::timestamp(),
            config.game_list.display()
        );
        let _ = writeln!(self.writer, "  source: {}", config.source.display());
        let _ = writeln!(self.writer, "  destination: {}", config.destination.display());
        let _ = writeln!(self.writer, "  thresholds: {}", config.thresholds);
        if !config.extra_stop_words.is_empty() {
            let _ = writeln!(self.writer, "  extra_stop_words: {:?}", config.extra_stop_words);
        }
        let _ = writeln!(self.writer, "  max_titles: {}", config.max_titles);
        let _ = writeln!(self.writer, "  rescan: {:?}", config.rescan);
        let _ = writeln!(self.writer, "  dryrun: {}", config.dryrun);
        let _ = writeln!(self.writer, "  titles: {title_count}");
        let _ = writeln!(self.writer, "  files: {file_count}");
        let _ = self.writer.flush();
    }

    /// Log every title outcome of a pass followed by the pass totals
    pub(crate) fn log_pass(&mut self, name: &str, report: &ScanReport) {
        let _ = writeln!(
            self.writer,
            "[{}] PASS {} threshold {:.2}",
            Self::timestamp(),
            name.to_uppercase(),
            report.threshold
        );
        for result in &report.results {
            match &result.outcome {
                Outcome::Skipped => {
                    let _ = writeln!(self.writer, "  SKIPPED   \"{}\" | empty after cleaning", result.title);
                }
                Outcome::Unmatched { best_score } => {
                    let _ = writeln!(
                        self.writer,
                        "  UNMATCHED \"{}\" | \"{}\" | best {}",
                        result.title,
                        result.canonical,
                        best_score.map_or_else(|| "-".to_string(), |score| format!("{score:.3}"))
                    );
                }
                Outcome::Matched(selection) => {
                    let kind = match selection.delivery {
                        Delivery::Copied | Delivery::DryRun => "MATCHED  ",
                        Delivery::Unverified => "WARNING  ",
                        Delivery::Failed(_) => "ERROR    ",
                    };
                    let _ = writeln!(
                        self.writer,
                        "  {kind} \"{}\" -> \"{}\" | score {:.3} (raw {:.3}, {}) | tier {} | {}",
                        result.title,
                        selection.file.name,
                        selection.evaluation.score,
                        selection.evaluation.raw_score,
                        selection.evaluation.adjustment,
                        selection.tier,
                        selection.delivery
                    );
                }
            }
        }
        let _ = writeln!(
            self.writer,
            "  matched: {}, unmatched: {}, skipped: {}, failed: {}, time: {}",
            report.matched_count(),
            report.unmatched.len(),
            report.skipped_count(),
            report.failed_count(),
            rom_picker::format_duration(report.elapsed)
        );
        let _ = self.writer.flush();
    }

    /// Log final unmatched titles
    pub(crate) fn log_unmatched(&mut self, unmatched: &[String]) {
        let _ = writeln!(self.writer, "[{}] UNMATCHED {}", Self::timestamp(), unmatched.len());
        for title in unmatched {
            let _ = writeln!(self.writer, "  {title}");
        }
        let _ = writeln!(self.writer, "[{}] END", Self::timestamp());
        let _ = self.writer.flush();
    }
}
