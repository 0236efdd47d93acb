use std::{fs, path::PathBuf, process::ExitCode, thread, time::Duration};

use clap::Parser;
use log::{LevelFilter, debug, error};
use quill::{
    config::{DEFAULT_PYTHON, Settings},
    interpreter::host::Host,
    tokenize,
};

/// Stack size of the interpreter thread. Deeply recursive programs nest the
/// evaluator once per call.
const INTERPRETER_STACK_SIZE: usize = 64 * 1024 * 1024;
/// Call depth allowed by default on the enlarged interpreter stack.
const MAX_CALL_DEPTH: usize = 1000;

/// quill is a small imperative scripting language with begin/end blocks,
/// functions, arrays and calls out to external scripts.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Program to run.
    file: PathBuf,

    /// Print the token stream instead of running the program.
    #[arg(long, conflicts_with = "ast")]
    tokens: bool,

    /// Print the syntax tree instead of running the program.
    #[arg(long)]
    ast: bool,

    /// Interpreter used for external scripts.
    #[arg(long, env = "QUILL_PYTHON", default_value = DEFAULT_PYTHON)]
    python: String,

    /// Kill external scripts after this many seconds.
    #[arg(long, env = "QUILL_SCRIPT_TIMEOUT")]
    timeout: Option<u64>,

    /// Maximum depth of nested function calls.
    #[arg(long, env = "QUILL_MAX_DEPTH", default_value_t = MAX_CALL_DEPTH)]
    max_depth: usize,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level)
                              .parse_default_env()
                              .init();

    let Ok(source) = fs::read_to_string(&args.file) else {
        eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                  args.file.display());
        return ExitCode::FAILURE;
    };

    let lexed = tokenize(&source);
    for error in &lexed.errors {
        eprintln!("{error}");
    }

    if args.tokens {
        for (token, location) in &lexed.tokens {
            println!("{}:{}\t{}\t{token}",
                     location.line,
                     location.offset,
                     token.kind_name());
        }
        return ExitCode::SUCCESS;
    }

    let program = match quill::parse_tokens(&lexed.tokens) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        },
    };

    if args.ast {
        print!("{}", program.pretty());
        return ExitCode::SUCCESS;
    }

    let settings = Settings::default().with_python(args.python)
                                      .with_script_timeout(args.timeout.map(Duration::from_secs))
                                      .with_max_call_depth(args.max_depth);
    debug!("settings: {settings:?}");

    let worker = thread::Builder::new().name("quill".to_string())
                                       .stack_size(INTERPRETER_STACK_SIZE)
                                       .spawn(move || {
                                           let host = Host::stdio(&settings);
                                           quill::run_with(&program, settings, host)
                                       });

    match worker.map(thread::JoinHandle::join) {
        Ok(Ok(Ok(()))) => ExitCode::SUCCESS,
        Ok(Ok(Err(e))) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
        Ok(Err(_)) => {
            error!("interpreter thread panicked");
            ExitCode::FAILURE
        },
        Err(e) => {
            error!("failed to start interpreter thread: {e}");
            ExitCode::FAILURE
        },
    }
}
