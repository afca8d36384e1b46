use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use gomute::engine::{self, Config};
use gomute::error::EngineError;
use gomute::exec::CancelToken;
use gomute::files;
use gomute::output;
use gomute::parse;
use gomute::registry::Registry;

#[derive(Parser)]
#[command(name = "gomute", version, about = "Mutation testing for Go source code")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    opts: RunOpts,

    /// Packages, directories or files to mutate
    args: Vec<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct RunOpts {
    /// Debug log output
    #[arg(long, global = true)]
    debug: bool,

    /// Verbose log output
    #[arg(long, global = true)]
    verbose: bool,

    /// Disable mutators by name or using * as a suffix pattern
    #[arg(long, global = true)]
    disable: Vec<String>,

    /// Files with MD5 checksums of mutations which should be ignored
    #[arg(long, global = true)]
    blacklist: Vec<PathBuf>,

    /// Only mutate functions whose name matches this regex
    #[arg(long, global = true)]
    r#match: Option<String>,

    /// Test recursively with the package's subpackages
    #[arg(long, global = true)]
    test_recursive: bool,

    /// Do not remove the tmp folder where all mutations are saved to
    #[arg(long, global = true)]
    do_not_remove_tmp_folder: bool,

    /// Skip files without a related _test.go file
    #[arg(long, global = true)]
    skip_without_test: bool,

    /// Skip files with build tags in the related _test.go file
    #[arg(long, global = true)]
    skip_with_build_tags: bool,

    /// Execute this command for every mutation instead of the built-in
    /// go test runner
    #[arg(long, global = true)]
    exec: Option<String>,

    /// Skip the exec command and just generate the mutations
    #[arg(long, global = true)]
    no_exec: bool,

    /// Timeout for one command execution, in seconds
    #[arg(long, global = true, default_value_t = 10)]
    exec_timeout: u64,

    /// Suppress output
    #[arg(long, global = true)]
    silent_mode: bool,

    /// Exclude directories from the analysis
    #[arg(long, global = true)]
    exclude_dirs: Vec<String>,

    /// Write the report to a JSON file
    #[arg(long, global = true)]
    json_output: bool,

    /// Path of the JSON report file
    #[arg(long, global = true, default_value = "report.json")]
    report_file: PathBuf,

    /// Check only files changed against the given git branch
    #[arg(long, global = true)]
    git_branch: Option<String>,

    /// Return exit code 1 if there are survived mutations
    #[arg(long, global = true)]
    error_on_survivals: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List all files that would be mutated
    ListFiles {
        /// Packages, directories or files
        args: Vec<String>,
    },
    /// List all available mutators
    ListMutators,
    /// Print the syntax tree of a file
    PrintAst { file: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.opts.debug {
        LevelFilter::DEBUG
    } else if cli.opts.verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        let _ = ctrlc::set_handler(move || cancel.cancel());
    }

    let code = match run_cli(cli, &cancel) {
        Ok(()) => 0,
        Err(EngineError::MutantsEscaped) | Err(EngineError::Cancelled) => 1,
        Err(e) => {
            output::print_error(&e.to_string());
            1
        }
    };
    process::exit(code);
}

fn run_cli(cli: Cli, cancel: &CancelToken) -> Result<(), EngineError> {
    let discovery = files::Options {
        skip_without_test: cli.opts.skip_without_test,
        skip_with_build_tags: cli.opts.skip_with_build_tags,
        exclude_dirs: cli.opts.exclude_dirs.clone(),
        git_branch: cli.opts.git_branch.clone(),
    };

    match cli.command {
        Some(Commands::ListFiles { args }) => {
            for file in files::files_of_args(&args, &discovery)? {
                println!("{}", file.display());
            }
            Ok(())
        }
        Some(Commands::ListMutators) => {
            for name in Registry::with_defaults().list() {
                println!("{}", name);
            }
            Ok(())
        }
        Some(Commands::PrintAst { file }) => {
            let tree = parse::parse_file(&file).map_err(|e| EngineError::Parse {
                file,
                message: e.message,
            })?;
            print!("{}", tree.dump());
            Ok(())
        }
        None => {
            let cfg = Config {
                args: cli.args,
                discovery,
                disable: cli.opts.disable,
                blacklist: cli.opts.blacklist,
                match_pattern: cli.opts.r#match,
                exec: cli.opts.exec,
                no_exec: cli.opts.no_exec,
                exec_timeout: cli.opts.exec_timeout,
                test_recursive: cli.opts.test_recursive,
                silent: cli.opts.silent_mode,
                keep_tmp: cli.opts.do_not_remove_tmp_folder,
                json_output: cli.opts.json_output,
                report_path: cli.opts.report_file,
                debug: cli.opts.debug,
                verbose: cli.opts.verbose,
            };

            let report = engine::run(&cfg, cancel)?;

            if cfg.no_exec {
                println!("Cannot do a mutation testing summary since no exec command was executed.");
            } else if !cfg.silent {
                println!("{}", report);
            }

            if cfg.json_output {
                report.write_to_file(&cfg.report_path)?;
            }

            if cli.opts.error_on_survivals && report.stats.escaped_count > 0 {
                return Err(EngineError::MutantsEscaped);
            }
            Ok(())
        }
    }
}
