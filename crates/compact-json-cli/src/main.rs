use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use compact_json::{Compiled, SlotKind};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    name = "compact-json",
    version,
    about = "Compile JSON documents into compact, deduplicated static tables"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Emit a Rust module exposing the document as `<name>::get()`.
    Compile {
        /// The JSON document to compile.
        input: PathBuf,

        /// Name of the generated module.
        #[arg(long)]
        name: String,

        /// Write the module to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Store every array and object at its own use site.
        #[arg(long)]
        no_dedup: bool,

        /// Store every occurrence of a long string separately.
        #[arg(long)]
        no_share_strings: bool,
    },
    /// Print statistics about the compact form of a document.
    Inspect {
        /// The JSON document to inspect.
        input: PathBuf,
    },
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read `{}`: {err}", path.display()))?;
    let value = serde_json::from_str(&content)
        .map_err(|err| format!("Invalid JSON in `{}`: {err}", path.display()))?;
    Ok(value)
}

fn compile(
    input: &Path,
    name: &str,
    output: Option<&Path>,
    deduplicate: bool,
    share_strings: bool,
) -> Result<()> {
    let name: syn::Ident =
        syn::parse_str(name).map_err(|_| format!("Invalid module name: `{name}`"))?;
    let document = read_json(input)?;
    let compiled = compact_json::options()
        .deduplicate(deduplicate)
        .share_strings(share_strings)
        .build(&document);
    log_stats(input, &compiled);

    let tokens = compact_json::codegen::module(&name, compiled.arena());
    let file: syn::File = syn::parse2(tokens)?;
    let source = format!(
        "// @generated by compact-json from `{}`\n\n{}",
        input.display(),
        prettyplease::unparse(&file)
    );

    match output {
        Some(path) => {
            fs::write(path, source)
                .map_err(|err| format!("Failed to write `{}`: {err}", path.display()))?;
            tracing::info!(output = %path.display(), "Module written");
        }
        None => io::stdout().lock().write_all(source.as_bytes())?,
    }
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let document = read_json(input)?;
    let compiled = compact_json::build(&document);
    let stats = compiled.stats();
    let count = |kind: SlotKind| {
        compiled
            .shared_slots()
            .iter()
            .filter(|slot| slot.kind == kind)
            .count()
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "nodes: {}", stats.nodes)?;
    writeln!(stdout, "records: {}", stats.records)?;
    writeln!(stdout, "pairs: {}", stats.pairs)?;
    writeln!(stdout, "string bytes: {}", stats.string_bytes)?;
    writeln!(
        stdout,
        "shared slots: {} (arrays: {}, objects: {}, members: {}, strings: {})",
        stats.shared_slots,
        count(SlotKind::Array),
        count(SlotKind::Object),
        count(SlotKind::Pair),
        count(SlotKind::String),
    )?;
    writeln!(stdout, "reused: {}", stats.reused)?;
    Ok(())
}

fn log_stats<J>(input: &Path, compiled: &Compiled<'_, J>) {
    let stats = compiled.stats();
    tracing::info!(
        input = %input.display(),
        nodes = stats.nodes,
        records = stats.records,
        pairs = stats.pairs,
        shared_slots = stats.shared_slots,
        "{} JSON values processed",
        stats.nodes
    );
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Compile {
            input,
            name,
            output,
            no_dedup,
            no_share_strings,
        } => compile(
            &input,
            &name,
            output.as_deref(),
            !no_dedup,
            !no_share_strings,
        ),
        Command::Inspect { input } => inspect(&input),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(io::stderr(), "Error: {err}");
            ExitCode::FAILURE
        }
    }
}
