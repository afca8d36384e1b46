use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use gomute::exec::{self, CancelToken, CustomOptions, GoTestOptions, Outcome};

/// Puts a stub `go` binary on PATH that exits according to the package name
/// it is asked to test. Installed once per test process, before any test in
/// this file spawns a child.
fn stub_go() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        let dir = std::env::temp_dir().join(format!("gomute-stub-go-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let script = "#!/bin/sh\n# $1=test $2=-count $3=1 $4=package\ncase \"$4\" in\npass*) exit 0 ;;\nfail*) exit 1 ;;\ncompile*) exit 2 ;;\nslow*) sleep 5 ; exit 0 ;;\n*) exit 3 ;;\nesac\n";
        let go = dir.join("go");
        std::fs::write(&go, script).unwrap();
        make_executable(&go);
        let path = std::env::var("PATH").unwrap_or_default();
        std::env::set_var("PATH", format!("{}:{}", dir.display(), path));
    });
}

fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

fn custom_opts<'a>(changed: &'a Path, original: &'a Path, timeout_secs: u64) -> CustomOptions<'a> {
    CustomOptions {
        changed,
        original,
        package_path: "demo",
        debug: false,
        verbose: false,
        timeout_secs,
        recursive: false,
    }
}

// --- custom exec ---

#[test]
fn custom_exit_zero_kills() {
    stub_go();
    let outcome = exec::exec_custom(
        &["true".to_string()],
        &custom_opts(Path::new("m.go"), Path::new("o.go"), 10),
        &CancelToken::new(),
    );
    assert_eq!(outcome, Outcome::Killed);
}

#[test]
fn custom_exit_one_survives() {
    stub_go();
    let outcome = exec::exec_custom(
        &["false".to_string()],
        &custom_opts(Path::new("m.go"), Path::new("o.go"), 10),
        &CancelToken::new(),
    );
    assert_eq!(outcome, Outcome::Survived);
}

#[test]
fn custom_exit_two_is_a_compile_error() {
    stub_go();
    let dir = tempfile::TempDir::new().unwrap();
    let script = dir.path().join("exec.sh");
    std::fs::write(&script, "#!/bin/sh\nexit 2\n").unwrap();
    make_executable(&script);

    let outcome = exec::exec_custom(
        &[script.to_string_lossy().to_string()],
        &custom_opts(Path::new("m.go"), Path::new("o.go"), 10),
        &CancelToken::new(),
    );
    assert_eq!(outcome, Outcome::CompileError);
}

#[test]
fn custom_other_exit_codes_are_unknown() {
    stub_go();
    let dir = tempfile::TempDir::new().unwrap();
    let script = dir.path().join("exec.sh");
    std::fs::write(&script, "#!/bin/sh\nexit 7\n").unwrap();
    make_executable(&script);

    let outcome = exec::exec_custom(
        &[script.to_string_lossy().to_string()],
        &custom_opts(Path::new("m.go"), Path::new("o.go"), 10),
        &CancelToken::new(),
    );
    assert!(matches!(outcome, Outcome::Unknown(ref msg) if msg.contains("7")));
}

#[test]
fn custom_missing_command_is_unknown() {
    stub_go();
    let outcome = exec::exec_custom(
        &["gomute-no-such-command-xyz".to_string()],
        &custom_opts(Path::new("m.go"), Path::new("o.go"), 10),
        &CancelToken::new(),
    );
    assert!(matches!(outcome, Outcome::Unknown(_)));
}

#[test]
fn custom_exec_receives_mutation_environment() {
    stub_go();
    let dir = tempfile::TempDir::new().unwrap();
    let script = dir.path().join("exec.sh");
    let env_dump = dir.path().join("env.txt");
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\necho \"$MUTATE_CHANGED $MUTATE_ORIGINAL $MUTATE_PACKAGE $MUTATE_DEBUG $MUTATE_TIMEOUT $TEST_RECURSIVE\" > {}\nexit 0\n",
            env_dump.display()
        ),
    )
    .unwrap();
    make_executable(&script);

    let outcome = exec::exec_custom(
        &[script.to_string_lossy().to_string()],
        &custom_opts(Path::new("changed.go"), Path::new("orig.go"), 42),
        &CancelToken::new(),
    );
    assert_eq!(outcome, Outcome::Killed);

    let dump = std::fs::read_to_string(&env_dump).unwrap();
    assert_eq!(dump.trim(), "changed.go orig.go demo false 42 false");
}

#[test]
fn custom_timeout_fires() {
    stub_go();
    let outcome = exec::exec_custom(
        &["sleep".to_string(), "30".to_string()],
        &custom_opts(Path::new("m.go"), Path::new("o.go"), 1),
        &CancelToken::new(),
    );
    assert_eq!(outcome, Outcome::Timeout);
}

#[test]
fn cancellation_interrupts_a_running_command() {
    stub_go();
    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(200));
        trigger.cancel();
    });

    let outcome = exec::exec_custom(
        &["sleep".to_string(), "30".to_string()],
        &custom_opts(Path::new("m.go"), Path::new("o.go"), 60),
        &cancel,
    );
    handle.join().unwrap();
    assert_eq!(outcome, Outcome::Cancelled);
}

// --- built-in go test backend (stubbed go binary) ---

fn go_opts(pkg: &str, timeout: Duration) -> GoTestOptions<'_> {
    GoTestOptions { package_path: pkg, recursive: false, timeout, dir: None }
}

#[test]
fn go_test_exit_codes_map_to_outcomes() {
    stub_go();
    let cancel = CancelToken::new();
    assert_eq!(exec::run_go_test(&go_opts("pass", Duration::from_secs(10)), &cancel), Outcome::Survived);
    assert_eq!(exec::run_go_test(&go_opts("fail", Duration::from_secs(10)), &cancel), Outcome::Killed);
    assert_eq!(exec::run_go_test(&go_opts("compile", Duration::from_secs(10)), &cancel), Outcome::CompileError);
    assert!(matches!(
        exec::run_go_test(&go_opts("weird", Duration::from_secs(10)), &cancel),
        Outcome::Unknown(_)
    ));
}

#[test]
fn go_test_recursive_appends_ellipsis() {
    stub_go();
    // The stub matches the prefix, so fail/... still exits 1.
    let opts = GoTestOptions {
        package_path: "fail",
        recursive: true,
        timeout: Duration::from_secs(10),
        dir: None,
    };
    assert_eq!(exec::run_go_test(&opts, &CancelToken::new()), Outcome::Killed);
}

#[test]
fn go_test_timeout_is_reported() {
    stub_go();
    assert_eq!(
        exec::run_go_test(&go_opts("slow", Duration::from_secs(1)), &CancelToken::new()),
        Outcome::Timeout
    );
}

#[test]
fn builtin_swaps_mutant_in_and_restores_original() {
    stub_go();
    let dir = tempfile::TempDir::new().unwrap();
    let original = dir.path().join("demo.go");
    let mutant = dir.path().join("demo.go.0");
    std::fs::write(&original, "original content\n").unwrap();
    std::fs::write(&mutant, "mutated content\n").unwrap();

    let outcome = exec::exec_builtin(
        &original,
        &mutant,
        &go_opts("fail", Duration::from_secs(10)),
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Killed);
    assert_eq!(std::fs::read_to_string(&original).unwrap(), "original content\n");
    let backup = PathBuf::from(format!("{}.tmp", original.display()));
    assert!(!backup.exists(), "backup must be renamed back");
}

#[test]
fn builtin_restores_on_timeout_too() {
    stub_go();
    let dir = tempfile::TempDir::new().unwrap();
    let original = dir.path().join("demo.go");
    let mutant = dir.path().join("demo.go.0");
    std::fs::write(&original, "original content\n").unwrap();
    std::fs::write(&mutant, "mutated content\n").unwrap();

    let outcome = exec::exec_builtin(
        &original,
        &mutant,
        &go_opts("slow", Duration::from_secs(1)),
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Timeout);
    assert_eq!(std::fs::read_to_string(&original).unwrap(), "original content\n");
}
