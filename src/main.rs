use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use highlighter::config::Config;
use highlighter::error::HighlightError;
use highlighter::{Event, Format, Session};

const DEFAULT_LOG: &str = "highlighter=warn";

/// highlighter: mark every occurrence of a search term in text.
/// Reads FILES (or stdin) and prints them with matches highlighted.
#[derive(Parser)]
#[command(name = "highlighter", version = highlighter::version(), about)]
struct Cli {
    /// Source text files. Reads stdin when none are given or for `-`.
    files: Vec<PathBuf>,

    /// Search term, matched literally. Empty highlights nothing.
    #[arg(short, long, default_value = "")]
    term: String,

    /// Match exact case only.
    #[arg(short, long, overrides_with = "ignore_case")]
    case_sensitive: bool,

    /// Match regardless of case (the default unless configured otherwise).
    #[arg(long, overrides_with = "case_sensitive")]
    ignore_case: bool,

    /// Output format.
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// TOML config file. Falls back to $HIGHLIGHTER_CONFIG.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Live mode: edit text, term and case toggle line by line.
    /// A single FILE seeds the initial text.
    #[arg(long)]
    interactive: bool,

    /// Run as MCP server (JSON-RPC on stdio).
    #[arg(long)]
    mcp: bool,

    /// Log filter directive, e.g. "highlighter=debug". Overrides RUST_LOG.
    #[arg(long, value_name = "DIRECTIVE")]
    log_level: Option<String>,

    /// Print shell completions for the given shell.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    let cli = Cli::parse();

    // Shell completions
    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "highlighter", &mut io::stdout());
        return;
    }

    init_logging(cli.log_level.as_deref());
    tracing::debug!("highlighter {}", highlighter::version());

    let config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| fail(&e));
    let format = cli.format.unwrap_or(config.format);
    let case_sensitive = if cli.case_sensitive {
        true
    } else if cli.ignore_case {
        false
    } else {
        config.case_sensitive
    };
    let style = config.style();

    // MCP mode: JSON-RPC server
    if cli.mcp {
        if let Err(e) = highlighter::mcp::run(style) {
            eprintln!("mcp error: {e}");
            process::exit(1);
        }
        return;
    }

    if cli.interactive {
        // stdin carries the commands, so it cannot also seed the text
        if cli.files.len() > 1 || cli.files.first().is_some_and(|p| p == Path::new("-")) {
            Cli::command()
                .error(
                    ErrorKind::ArgumentConflict,
                    "--interactive takes at most one FILE (not `-`) to seed the text",
                )
                .exit();
        }
        let mut session = Session::from_config(&config);
        session.set_format(format);
        session.handle(Event::SetCaseSensitive(case_sensitive));
        session.handle(Event::SetTerm(cli.term));
        if let Some(path) = cli.files.first() {
            let text = highlighter::input::read_source(path).unwrap_or_else(|e| fail(&e));
            session.handle(Event::SetSource(text));
        }
        if let Err(e) = highlighter::repl::run(&mut session, io::stdin().lock(), io::stdout().lock())
        {
            eprintln!("interactive error: {e}");
            process::exit(1);
        }
        return;
    }

    let files = if cli.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        cli.files
    };

    // Highlight in parallel, print in argument order.
    let results: Vec<Result<String, HighlightError>> = files
        .par_iter()
        .map(|path| {
            read_input(path).map(|text| {
                highlighter::highlight(&text, &cli.term, case_sensitive, format, &style)
            })
        })
        .collect();

    let mut exit_code = 0;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(output) => {
                let header = (files.len() > 1).then(|| format!("# {}", path.display()));
                if emit(&mut out, header.as_deref(), &output).is_err() {
                    // stdout closed (e.g. piped into head)
                    return;
                }
            }
            Err(e) => {
                eprintln!("{e}");
                exit_code = exit_code.max(e.exit_code());
            }
        }
    }

    if exit_code != 0 {
        process::exit(exit_code);
    }
}

fn read_input(path: &Path) -> Result<String, HighlightError> {
    if path == Path::new("-") {
        highlighter::input::read_stdin()
    } else {
        highlighter::input::read_source(path)
    }
}

/// Write one rendered document, newline-terminated.
fn emit(out: &mut impl Write, header: Option<&str>, output: &str) -> io::Result<()> {
    if let Some(h) = header {
        writeln!(out, "{h}")?;
    }
    out.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}

fn init_logging(directive: Option<&str>) {
    let filter = match directive {
        Some(d) => EnvFilter::try_new(d).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn fail(e: &HighlightError) -> ! {
    eprintln!("{e}");
    process::exit(e.exit_code());
}
