use std::io::Write;

use anyhow::Result;
use colored::Colorize;

use rom_picker::matching::{
    RescanReport, ScanOptions, Scanner, StopWords, gather_candidates, read_title_list, rescan,
};
use rom_picker::{print_bold, print_warning};

use crate::Args;
use crate::config::{Config, RescanMode};
use crate::logger::FileLogger;

pub struct RomPick {
    config: Config,
}

impl RomPick {
    pub fn new(args: Args) -> Result<Self> {
        let config = Config::from_args(args)?;
        Ok(Self { config })
    }

    pub fn run(&self) -> Result<()> {
        let titles = read_title_list(&self.config.game_list, self.config.max_titles)?;
        let candidates = gather_candidates(&self.config.source)?;

        if self.config.verbose {
            self.print_config();
        }

        if titles.is_empty() {
            print_warning!("No titles found in: {}", self.config.game_list.display());
            return Ok(());
        }
        if candidates.is_empty() {
            print_warning!("No files found in: {}", self.config.source.display());
            return Ok(());
        }

        print_bold!(
            "Found {} title(s) and {} candidate file(s)",
            titles.len(),
            candidates.len()
        );

        let mut logger = self.create_logger();
        if let Some(logger) = logger.as_mut() {
            logger.log_init(&self.config, titles.len(), candidates.len());
        }

        let options = ScanOptions {
            stop_words: StopWords::with_extra(&self.config.extra_stop_words),
            dryrun: self.config.dryrun,
            verbose: self.config.verbose,
        };
        let scanner = Scanner::new(candidates, self.config.destination.clone(), options);
        // Primary results are logged before the secondary prompt
        let mut primary_logged = false;
        let report = rescan(&scanner, &titles, self.config.thresholds, |primary| {
            if let Some(logger) = logger.as_mut() {
                logger.log_pass("primary", primary);
            }
            primary_logged = true;
            self.confirm_secondary(&primary.unmatched)
        })?;

        if let Some(logger) = logger.as_mut() {
            if !primary_logged {
                logger.log_pass("primary", &report.primary);
            }
            if let Some(secondary) = &report.secondary {
                logger.log_pass("secondary", secondary);
            }
            logger.log_unmatched(report.unmatched());
            println!("Log written to: {}", rom_picker::path_to_string(logger.path()));
        }

        Self::print_result(&report);
        Ok(())
    }

    /// Decide whether to run the secondary pass over the unmatched titles.
    fn confirm_secondary(&self, unmatched: &[String]) -> Result<bool> {
        match self.config.rescan {
            RescanMode::Never => Ok(false),
            RescanMode::Always => Ok(true),
            RescanMode::Ask => {
                println!(
                    "\n{}",
                    format!("{} title(s) without a match:", unmatched.len()).yellow().bold()
                );
                for title in unmatched {
                    println!("  {title}");
                }
                print!(
                    "{}",
                    format!(
                        "Proceed with secondary scan at {:.2}? (y/n): ",
                        self.config.thresholds.secondary()
                    )
                    .magenta()
                );
                std::io::stdout().flush()?;

                let mut input = String::new();
                std::io::stdin().read_line(&mut input)?;
                let answer = input.trim();
                Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
            }
        }
    }

    /// Open the run log, continuing without one if it cannot be created.
    fn create_logger(&self) -> Option<FileLogger> {
        if !self.config.log {
            return None;
        }
        FileLogger::new()
            .map_err(|e| print_warning!("Failed to create log file: {e}"))
            .ok()
    }

    fn print_config(&self) {
        println!("Game list:   {}", rom_picker::path_to_string(&self.config.game_list));
        println!("Source:      {}", rom_picker::path_to_string(&self.config.source));
        println!("Destination: {}", rom_picker::path_to_string(&self.config.destination));
        println!("Thresholds:  {}", self.config.thresholds);
        println!("Max titles:  {}", self.config.max_titles);
        if !self.config.extra_stop_words.is_empty() {
            println!("Stop words:  {:?}", self.config.extra_stop_words);
        }
        println!("Dryrun:      {}", rom_picker::colorize_bool(self.config.dryrun));
        println!("Log:         {}", rom_picker::colorize_bool(self.config.log));
    }

    fn print_result(report: &RescanReport) {
        let unmatched = report.unmatched();
        println!();
        print_bold!("Matched {} title(s)", report.matched_count());
        if unmatched.is_empty() {
            println!("{}", "All titles matched".green());
            return;
        }
        println!(
            "{}",
            format!("{} title(s) still without a match:", unmatched.len()).yellow().bold()
        );
        for title in unmatched {
            println!("  {title}");
        }
    }
}
