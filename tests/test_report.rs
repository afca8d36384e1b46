use gomute::exec::Outcome;
use gomute::report::{Mutant, MutantMeta, Report};

fn mutant(name: &str) -> Mutant {
    Mutant {
        mutator: MutantMeta {
            mutator_name: name.to_string(),
            original_source_code: "package a\n".to_string(),
            mutated_source_code: "package b\n".to_string(),
            original_file_path: "a.go".to_string(),
            original_start_line: 0,
        },
        diff: String::new(),
        process_output: "PASS\n".to_string(),
    }
}

#[test]
fn record_classifies_outcomes() {
    let mut report = Report::default();
    report.record(&Outcome::Killed, mutant("m"));
    report.record(&Outcome::Survived, mutant("m"));
    report.record(&Outcome::CompileError, mutant("m"));
    report.record(&Outcome::Timeout, mutant("m"));
    report.record(&Outcome::Unknown("exit code 3".to_string()), mutant("m"));

    assert_eq!(report.stats.killed_count, 1);
    assert_eq!(report.stats.escaped_count, 1);
    assert_eq!(report.stats.skipped_count, 2);
    assert_eq!(report.stats.error_count, 1);
    assert_eq!(report.killed.len(), 1);
    assert_eq!(report.escaped.len(), 1);
    assert_eq!(report.timeouted.len(), 1);
    assert_eq!(report.errored.len(), 1);
}

#[test]
fn stats_invariant_holds() {
    let mut report = Report::default();
    report.record(&Outcome::Killed, mutant("m"));
    report.record(&Outcome::Killed, mutant("m"));
    report.record(&Outcome::Survived, mutant("m"));
    report.record(&Outcome::CompileError, mutant("m"));
    report.record_duplicate();
    report.calculate();

    let stats = &report.stats;
    assert_eq!(
        stats.total_mutants_count,
        stats.killed_count + stats.escaped_count + stats.error_count + stats.skipped_count
    );
    assert_eq!(stats.duplicated_count, 1);
    // Duplicates are not part of the total.
    assert_eq!(stats.total_mutants_count, 4);
    assert!((stats.msi - 0.75).abs() < 1e-9);
}

#[test]
fn score_is_zero_without_mutants() {
    let mut report = Report::default();
    report.calculate();
    assert_eq!(report.stats.total_mutants_count, 0);
    assert_eq!(report.stats.msi, 0.0);
}

#[test]
fn score_range() {
    let mut report = Report::default();
    report.record(&Outcome::Survived, mutant("m"));
    report.calculate();
    assert_eq!(report.stats.msi, 0.0);

    let mut report = Report::default();
    report.record(&Outcome::Killed, mutant("m"));
    report.calculate();
    assert_eq!(report.stats.msi, 1.0);
}

#[test]
fn display_summary_line() {
    let mut report = Report::default();
    report.record(&Outcome::Killed, mutant("m"));
    report.record(&Outcome::Survived, mutant("m"));
    report.record_duplicate();
    report.calculate();

    assert_eq!(
        report.to_string(),
        "The mutation score is 0.500000 (1 passed, 1 failed, 1 duplicated, 0 skipped, total is 2)"
    );
}

#[test]
fn json_shape_matches_report_format() {
    let mut report = Report::default();
    report.record(&Outcome::Killed, mutant("arithmetic/base"));
    report.calculate();

    let value = serde_json::to_value(&report).unwrap();
    assert!(value.get("stats").is_some());
    assert!(value.get("escaped").is_some());
    assert!(value.get("timeouted").is_some());
    assert!(value.get("killed").is_some());
    assert!(value.get("errored").is_some());

    let stats = &value["stats"];
    for key in [
        "totalMutantsCount",
        "killedCount",
        "notCoveredCount",
        "escapedCount",
        "errorCount",
        "skippedCount",
        "timeOutCount",
        "msi",
        "mutationCodeCoverage",
        "coveredCodeMsi",
    ] {
        assert!(stats.get(key).is_some(), "missing stats key {}", key);
    }
    assert!(stats.get("duplicatedCount").is_none(), "duplicates stay out of the report file");

    let killed = &value["killed"][0];
    assert!(killed.get("diff").is_some());
    assert_eq!(killed["processOutput"], "PASS\n");
    let meta = &killed["mutator"];
    for key in [
        "mutatorName",
        "originalSourceCode",
        "mutatedSourceCode",
        "originalFilePath",
        "originalStartLine",
    ] {
        assert!(meta.get(key).is_some(), "missing mutator key {}", key);
    }
}

#[test]
fn empty_process_output_is_omitted() {
    let mut report = Report::default();
    let mut m = mutant("m");
    m.process_output = String::new();
    report.record(&Outcome::Killed, m);
    let value = serde_json::to_value(&report).unwrap();
    assert!(value["killed"][0].get("processOutput").is_none());
}

#[test]
fn report_round_trips_through_json() {
    let mut report = Report::default();
    report.record(&Outcome::Killed, mutant("m"));
    report.calculate();
    let json = serde_json::to_string(&report).unwrap();
    let back: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(back.stats.killed_count, 1);
    assert_eq!(back.killed.len(), 1);
    assert_eq!(back.killed[0].mutator.mutator_name, "m");
}
