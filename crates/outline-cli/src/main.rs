use clap::{ArgAction, Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use outline_build::{FrontendKind, OutlineConfig, ParserConfig};
use outline_clang::ClangFrontend;
use outline_frontend_cpp::{CppFrontend, CppFrontendOptions};
use outline_walker::{outline_file, FileFilter, LineSink, VariableLabel, Walker, WriterSink};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "cpp-outline")]
#[command(author, version, about = "Print a nested outline of the declarations in a C++ file")]
struct Cli {
    /// C++ source file to outline
    file: PathBuf,

    /// Parser frontend [default: tree-sitter]
    #[arg(long, value_enum)]
    frontend: Option<FrontendArg>,

    /// Configuration file (default: ./outline.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// compile_commands.json to take include paths and defines from
    #[arg(long)]
    compile_commands: Option<PathBuf>,

    /// Extra include directory
    #[arg(short = 'I', long = "include")]
    includes: Vec<PathBuf>,

    /// Extra macro definition (NAME or NAME=VALUE)
    #[arg(short = 'D', long = "define")]
    defines: Vec<String>,

    /// Language standard [default: c++17]
    #[arg(long)]
    std: Option<String>,

    /// Apply the file filter at every level, not just the top
    #[arg(long)]
    deep_filter: bool,

    /// Print "variable" instead of "function" for variable declarations
    #[arg(long)]
    label_variables: bool,

    /// Include declaration names in function and variable lines
    #[arg(long)]
    names: bool,

    /// Indent nested lines by N spaces per level
    #[arg(long, value_name = "N")]
    indent: Option<usize>,

    /// Fail on syntax errors instead of outlining what was recovered
    #[arg(long)]
    strict: bool,

    /// Write the outline to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FrontendArg {
    /// tree-sitter-cpp, no system dependency
    TreeSitter,
    /// libclang, loaded at runtime
    Clang,
}

impl From<FrontendArg> for FrontendKind {
    fn from(arg: FrontendArg) -> Self {
        match arg {
            FrontendArg::TreeSitter => FrontendKind::TreeSitter,
            FrontendArg::Clang => FrontendKind::Clang,
        }
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = load_config(&cli)?;
    tracing::debug!(?config, "effective configuration");

    let walker = Walker::with_options(config.outline.walk);
    let lines = match config.parser.frontend {
        FrontendKind::TreeSitter => {
            let ignored = clang_only_settings(&config.parser);
            if !ignored.is_empty() {
                tracing::warn!(
                    settings = ?ignored,
                    "the tree-sitter frontend does not preprocess; use --frontend clang to apply them"
                );
            }
            let frontend = CppFrontend::with_options(CppFrontendOptions {
                include_dirs: config.parser.includes.clone(),
                follow_includes: config.parser.follow_includes,
                strict: config.parser.strict,
            });
            outline_file(&frontend, &cli.file, &walker)?
        }
        FrontendKind::Clang => {
            let frontend =
                ClangFrontend::new(config.parser.compiler_args()).strict(config.parser.strict);
            outline_file(&frontend, &cli.file, &walker)?
        }
    };

    let indent = config.outline.indent;
    match &cli.output {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            WriterSink::new(BufWriter::new(file))
                .with_indent(indent)
                .emit_all(&lines)
                .into_diagnostic()?;
        }
        None => {
            WriterSink::new(io::stdout().lock())
                .with_indent(indent)
                .emit_all(&lines)
                .into_diagnostic()?;
        }
    }

    Ok(())
}

/// Configuration file, then the compile database, then command-line flags.
fn load_config(cli: &Cli) -> Result<OutlineConfig> {
    let mut config = match &cli.config {
        Some(path) => OutlineConfig::from_file(path)?,
        None => OutlineConfig::discover(Path::new("."))?,
    };

    if let Some(db) = &cli.compile_commands {
        config.parser.compile_commands = Some(db.clone());
    }
    config.apply_compile_commands(&cli.file)?;

    apply_overrides(&mut config, cli);
    Ok(config)
}

fn apply_overrides(config: &mut OutlineConfig, cli: &Cli) {
    let parser = &mut config.parser;
    if let Some(frontend) = cli.frontend {
        parser.frontend = frontend.into();
    }
    if let Some(std) = &cli.std {
        parser.std = Some(std.clone());
    }

    // Command-line include dirs are searched first
    let mut includes = cli.includes.clone();
    includes.extend(parser.includes.drain(..).filter(|dir| !cli.includes.contains(dir)));
    parser.includes = includes;

    // Later definitions win in the compiler, so command-line ones go last
    parser.defines.retain(|define| !cli.defines.contains(define));
    parser.defines.extend(cli.defines.iter().cloned());

    if cli.strict {
        parser.strict = true;
    }

    let output = &mut config.outline;
    if cli.deep_filter {
        output.walk.filter = FileFilter::EveryLevel;
    }
    if cli.label_variables {
        output.walk.variable_label = VariableLabel::Variable;
    }
    if cli.names {
        output.walk.show_names = true;
    }
    if let Some(indent) = cli.indent {
        output.indent = indent;
    }
}

/// Settings that only take effect when clang preprocesses the source.
fn clang_only_settings(parser: &ParserConfig) -> Vec<&'static str> {
    let mut settings = Vec::new();
    if !parser.defines.is_empty() {
        settings.push("defines");
    }
    if parser.std.is_some() {
        settings.push("std");
    }
    if !parser.cflags.is_empty() {
        settings.push("cflags");
    }
    settings
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG, when set, replaces the verbosity level
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}
