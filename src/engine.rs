//! Engine orchestrator: per-file parse → walk → serialize → execute →
//! classify loop.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::ast::{NodeRef, Tree};
use crate::diff;
use crate::error::EngineError;
use crate::exec::{self, CancelToken, CustomOptions, GoTestOptions, Outcome};
use crate::files;
use crate::output;
use crate::parse;
use crate::printer;
use crate::registry::Registry;
use crate::report::{Mutant, MutantMeta, Report};
use crate::serialize;
use crate::skip;
use crate::types::TypeInfo;
use crate::walker;

const MD5_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    /// Packages, directories or files to mutate.
    pub args: Vec<String>,
    pub discovery: files::Options,
    /// Disable patterns for mutator names (glob, `*` suffix allowed).
    pub disable: Vec<String>,
    /// Blacklist files of fingerprints to ignore.
    pub blacklist: Vec<PathBuf>,
    /// Only mutate functions whose name matches this regex.
    pub match_pattern: Option<String>,
    /// Custom exec command, whitespace-split into argv. Built-in `go test`
    /// when absent.
    pub exec: Option<String>,
    /// Generate mutants without executing anything.
    pub no_exec: bool,
    /// Per-execution timeout in seconds.
    pub exec_timeout: u64,
    pub test_recursive: bool,
    pub silent: bool,
    pub keep_tmp: bool,
    pub json_output: bool,
    pub report_path: PathBuf,
    pub debug: bool,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            args: Vec::new(),
            discovery: files::Options::default(),
            disable: Vec::new(),
            blacklist: Vec::new(),
            match_pattern: None,
            exec: None,
            no_exec: false,
            exec_timeout: 10,
            test_recursive: false,
            silent: false,
            keep_tmp: false,
            json_output: false,
            report_path: PathBuf::from("report.json"),
            debug: false,
            verbose: false,
        }
    }
}

pub fn run(cfg: &Config, cancel: &CancelToken) -> Result<Report, EngineError> {
    let mut report = Report::default();

    let match_re = match cfg.match_pattern.as_deref() {
        Some(p) if !p.is_empty() => Some(
            regex::Regex::new(p)
                .map_err(|e| EngineError::Config(format!("match regex is not valid: {}", e)))?,
        ),
        _ => None,
    };

    let found = files::files_of_args(&cfg.args, &cfg.discovery)?;
    if found.is_empty() {
        warn!("could not find any suitable Go source files");
        return Ok(report);
    }

    let mut fingerprints = HashSet::new();
    load_blacklist(&cfg.blacklist, &mut fingerprints)?;

    let registry = Registry::with_defaults();
    let mutators = registry.enabled(&cfg.disable);
    for (name, _) in &mutators {
        info!("enable mutator {:?}", name);
    }

    let tmp_dir = tempfile::Builder::new()
        .prefix("go-mutesting-")
        .tempdir()?
        .keep();
    info!("save mutations into {:?}", tmp_dir);

    let execs: Vec<String> = cfg
        .exec
        .as_deref()
        .map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    let gofmt_on = serialize::gofmt_available();
    if !gofmt_on {
        debug!("gofmt not found on PATH; writing mutants unformatted");
    }

    let mut cancelled = false;
    for file in &found {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }
        info!("mutate {:?}", file);

        let source = std::fs::read_to_string(file)?;
        let mut tree = parse::parse_source(&source).map_err(|e| EngineError::Parse {
            file: file.clone(),
            message: e.message,
        })?;
        let package_path = files::package_path(file);
        let skip_map = skip::skips(&tree);
        let type_info = TypeInfo::infer(&tree);
        let printed_original = printer::print(&tree);

        let rel = file.strip_prefix("/").unwrap_or(file);
        let tmp_file = tmp_dir.join(rel);
        if let Some(parent) = tmp_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let original_copy = PathBuf::from(format!("{}.original", tmp_file.display()));
        std::fs::copy(file, &original_copy)?;
        debug!("save original into {:?}", original_copy);

        let roots: Vec<NodeRef> = match &match_re {
            Some(re) => tree
                .functions()
                .iter()
                .filter(|(_, f)| re.is_match(&f.name))
                .map(|(id, _)| NodeRef::Item(*id))
                .collect(),
            None => vec![NodeRef::File],
        };

        let mut mutation_id: u64 = 0;
        let mut fatal: Option<EngineError> = None;

        'mutators: for (name, mutator) in &mutators {
            debug!("mutator {}", name);
            for root in &roots {
                let mut on_mutant = |mutated: &Tree| {
                    if fatal.is_some() || cancelled {
                        return;
                    }
                    if cancel.is_cancelled() {
                        cancelled = true;
                        return;
                    }
                    run_mutant(MutantContext {
                        cfg,
                        cancel,
                        report: &mut report,
                        fingerprints: &mut fingerprints,
                        cancelled: &mut cancelled,
                        fatal: &mut fatal,
                        mutated,
                        mutator_name: name,
                        file,
                        source: &source,
                        printed_original: &printed_original,
                        package_path: &package_path,
                        execs: &execs,
                        gofmt_on,
                        mutation_file: PathBuf::from(format!(
                            "{}.{}",
                            tmp_file.display(),
                            mutation_id
                        )),
                    });
                    mutation_id += 1;
                };
                walker::mutate_walk(
                    &mut tree,
                    &type_info,
                    *root,
                    *mutator,
                    &skip_map,
                    &mut on_mutant,
                    &mut |_| {},
                );
                if cancelled || fatal.is_some() {
                    break 'mutators;
                }
            }
        }

        if let Some(e) = fatal {
            return Err(e);
        }
        if cancelled {
            break;
        }
    }

    if !cfg.keep_tmp {
        std::fs::remove_dir_all(&tmp_dir)?;
        debug!("remove {:?}", tmp_dir);
    }

    if cancelled {
        warn!("cancel signal received, exiting now");
        return Err(EngineError::Cancelled);
    }

    report.calculate();
    Ok(report)
}

struct MutantContext<'a> {
    cfg: &'a Config,
    cancel: &'a CancelToken,
    report: &'a mut Report,
    fingerprints: &'a mut HashSet<String>,
    cancelled: &'a mut bool,
    fatal: &'a mut Option<EngineError>,
    mutated: &'a Tree,
    mutator_name: &'a str,
    file: &'a Path,
    source: &'a str,
    printed_original: &'a str,
    package_path: &'a str,
    execs: &'a [String],
    gofmt_on: bool,
    mutation_file: PathBuf,
}

/// The critical path for one yielded mutation: serialize, deduplicate,
/// execute, classify.
fn run_mutant(ctx: MutantContext) {
    let cfg = ctx.cfg;
    let saved = match serialize::save_mutant(
        ctx.mutated,
        ctx.fingerprints,
        &ctx.mutation_file,
        ctx.gofmt_on,
    ) {
        Ok(saved) => saved,
        Err(e) => {
            println!("INTERNAL ERROR {}", e);
            return;
        }
    };

    if saved.duplicate {
        debug!("{:?} is a duplicate, we ignore it", ctx.mutation_file);
        ctx.report.record_duplicate();
        return;
    }
    debug!(
        "save mutation into {:?} with checksum {}",
        ctx.mutation_file, saved.checksum
    );

    if cfg.no_exec {
        return;
    }

    let diff_text = diff::compare(ctx.printed_original, &saved.printed, ctx.mutator_name);

    let outcome = if ctx.execs.is_empty() {
        let opts = GoTestOptions {
            package_path: ctx.package_path,
            recursive: cfg.test_recursive,
            timeout: Duration::from_secs(cfg.exec_timeout),
            dir: None,
        };
        match exec::exec_builtin(ctx.file, &ctx.mutation_file, &opts, ctx.cancel) {
            Ok(outcome) => outcome,
            Err(e) => {
                *ctx.fatal = Some(EngineError::Restore(e));
                return;
            }
        }
    } else {
        let opts = CustomOptions {
            changed: &ctx.mutation_file,
            original: ctx.file,
            package_path: ctx.package_path,
            debug: cfg.debug,
            verbose: cfg.verbose,
            timeout_secs: cfg.exec_timeout,
            recursive: cfg.test_recursive,
        };
        exec::exec_custom(ctx.execs, &opts, ctx.cancel)
    };

    if outcome == Outcome::Cancelled {
        *ctx.cancelled = true;
        return;
    }

    let mutated_source = std::fs::read_to_string(&ctx.mutation_file).unwrap_or_default();
    let mut mutant = Mutant {
        mutator: MutantMeta {
            mutator_name: ctx.mutator_name.to_string(),
            original_source_code: ctx.source.to_string(),
            mutated_source_code: mutated_source,
            original_file_path: ctx.file.display().to_string(),
            original_start_line: 0,
        },
        diff: diff_text.clone(),
        process_output: String::new(),
    };

    let msg = format!("{:?} with checksum {}", ctx.mutation_file.display().to_string(), saved.checksum);
    match &outcome {
        Outcome::Killed => {
            mutant.process_output = format!("PASS {}\n", msg);
            if !cfg.silent {
                output::print_pass(&msg);
            }
            if cfg.debug {
                println!("{}", diff::colorize(&diff_text));
            }
        }
        Outcome::Survived => {
            mutant.process_output = format!("FAIL {}\n", msg);
            if !cfg.silent {
                output::print_fail(&msg);
                println!("{}", diff::colorize(&diff_text));
            }
        }
        Outcome::CompileError => {
            mutant.process_output = format!("SKIP {}\n", msg);
            info!("Mutation did not compile");
            if !cfg.silent {
                output::print_skip(&msg);
            }
            if cfg.debug {
                println!("{}", diff::colorize(&diff_text));
            }
        }
        Outcome::Timeout => {
            mutant.process_output = format!("SKIP {}\n", msg);
            if !cfg.silent {
                output::print_skip(&msg);
                println!("{}", diff::colorize(&diff_text));
            }
        }
        Outcome::Unknown(detail) => {
            let out = format!("UNKNOWN exit code for {}: {}\n", msg, detail);
            mutant.process_output = out.clone();
            if !cfg.silent {
                print!("{}", out);
            }
        }
        Outcome::Cancelled => unreachable!("handled above"),
    }

    ctx.report.record(&outcome, mutant);
}

fn load_blacklist(
    files: &[PathBuf],
    fingerprints: &mut HashSet<String>,
) -> Result<(), EngineError> {
    for file in files {
        let contents = std::fs::read_to_string(file)
            .map_err(|e| EngineError::Config(format!("read blacklist file {:?}: {}", file, e)))?;
        for line in contents.lines() {
            if line.is_empty() {
                continue;
            }
            // First 32 chars are the checksum; the rest is a comment.
            let checksum = line
                .get(..MD5_LEN)
                .ok_or_else(|| EngineError::Config(format!("{:?} is not a MD5 checksum", line)))?;
            fingerprints.insert(checksum.to_string());
        }
    }
    Ok(())
}
