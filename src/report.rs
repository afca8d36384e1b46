//! Outcome aggregation and the JSON report.
//!
//! Field names follow the established report format: consumers parse
//! `stats`, `escaped`, `timeouted`, `killed` and `errored`, with camelCase
//! mutant fields.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::exec::Outcome;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Report {
    pub stats: Stats,
    pub escaped: Vec<Mutant>,
    pub timeouted: Vec<Mutant>,
    pub killed: Vec<Mutant>,
    pub errored: Vec<Mutant>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_mutants_count: i64,
    pub killed_count: i64,
    pub not_covered_count: i64,
    pub escaped_count: i64,
    pub error_count: i64,
    pub skipped_count: i64,
    pub time_out_count: i64,
    pub msi: f64,
    pub mutation_code_coverage: i64,
    pub covered_code_msi: f64,
    #[serde(skip)]
    pub duplicated_count: i64,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Mutant {
    pub mutator: MutantMeta,
    pub diff: String,
    #[serde(rename = "processOutput", skip_serializing_if = "String::is_empty", default)]
    pub process_output: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutantMeta {
    pub mutator_name: String,
    pub original_source_code: String,
    pub mutated_source_code: String,
    pub original_file_path: String,
    pub original_start_line: i64,
}

impl Report {
    /// Classifies one executed mutant into the matching list and counter.
    /// Duplicates and cancellation never reach this point.
    pub fn record(&mut self, outcome: &Outcome, mutant: Mutant) {
        match outcome {
            Outcome::Killed => {
                self.stats.killed_count += 1;
                self.killed.push(mutant);
            }
            Outcome::Survived => {
                self.stats.escaped_count += 1;
                self.escaped.push(mutant);
            }
            Outcome::CompileError => {
                self.stats.skipped_count += 1;
            }
            Outcome::Timeout => {
                self.stats.skipped_count += 1;
                self.timeouted.push(mutant);
            }
            Outcome::Unknown(_) => {
                self.stats.error_count += 1;
                self.errored.push(mutant);
            }
            Outcome::Cancelled => {}
        }
    }

    pub fn record_duplicate(&mut self) {
        self.stats.duplicated_count += 1;
    }

    pub fn total_count(&self) -> i64 {
        self.stats.killed_count
            + self.stats.escaped_count
            + self.stats.error_count
            + self.stats.skipped_count
    }

    /// Mutation score: `(killed + errored + skipped) / total`, 0 when no
    /// mutants were executed.
    pub fn msi_score(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            return 0.0;
        }
        (self.stats.killed_count + self.stats.error_count + self.stats.skipped_count) as f64
            / total as f64
    }

    pub fn calculate(&mut self) {
        self.stats.msi = self.msi_score();
        self.stats.total_mutants_count = self.total_count();
    }

    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        let mut json = serde_json::to_string(self)?;
        json.push('\n');
        std::fs::write(path, json)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The mutation score is {:.6} ({} passed, {} failed, {} duplicated, {} skipped, total is {})",
            self.stats.msi,
            self.stats.killed_count,
            self.stats.escaped_count,
            self.stats.duplicated_count,
            self.stats.skipped_count,
            self.stats.total_mutants_count,
        )
    }
}
