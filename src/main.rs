use clap::{Parser, Subcommand};
use slice_oracle::cli::{
    assemble_files, build_manifest, plan_offsets, record_discovery, run_instance, show_inspect,
    AssembleOptions, ChunkFile, ManifestOptions, RecordOptions,
};
use slice_oracle::manifest::{Compression, Mode};
use slice_oracle::pipeline::{ChunkSpec, DEFAULT_CHUNK_SIZE};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Version info from build.rs
const VERSION: &str = env!("SLICE_ORACLE_VERSION");
const BUILD: &str = env!("SLICE_ORACLE_BUILD");
const PROFILE: &str = env!("SLICE_ORACLE_PROFILE");
const GIT_HASH: &str = env!("SLICE_ORACLE_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "slice-oracle")]
#[command(about = "Hash-indexed answer oracle with chunked transport of unrecognized inputs", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve one invocation: read stdin, write the answer, window or report to stdout
    #[command(alias = "r")]
    Run {
        /// Instance manifest
        manifest: PathBuf,
    },

    /// Show the meta report for a local file
    #[command(alias = "i")]
    Inspect {
        /// Input file
        file: PathBuf,

        /// Compression algorithm
        #[arg(long, default_value = "gzip", value_parser = parse_compression)]
        compression: Compression,
    },

    /// List the chunk offsets needed for a saved meta output
    #[command(alias = "p")]
    Plan {
        /// Saved meta-instance output
        meta: PathBuf,

        /// Window size of the chunk instances
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        size: usize,
    },

    /// Rebuild an input from saved meta and chunk outputs
    #[command(alias = "a")]
    Assemble {
        /// Saved meta-instance output
        meta: PathBuf,

        /// File to write the recovered input to
        output: PathBuf,

        /// Saved chunk output as OFFSET:PATH (repeatable)
        #[arg(long = "chunk", value_parser = parse_chunk)]
        chunks: Vec<ChunkFile>,

        /// Compression algorithm the instances used
        #[arg(long, default_value = "gzip", value_parser = parse_compression)]
        compression: Compression,
    },

    /// Build an instance manifest from an answer table
    #[command(alias = "m")]
    Manifest {
        /// Answer table (JSON array of {fingerprint, answer})
        table: PathBuf,

        /// Manifest file to write
        output: PathBuf,

        /// Window offset for a chunk instance
        #[arg(long, required_unless_present = "meta", conflicts_with = "meta")]
        offset: Option<usize>,

        /// Window size for a chunk instance
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        size: usize,

        /// Build a meta instance instead of a chunk instance
        #[arg(long)]
        meta: bool,

        /// Compression algorithm
        #[arg(long, default_value = "gzip", value_parser = parse_compression)]
        compression: Compression,

        /// Solver program and arguments for delegate entries
        #[arg(long, num_args = 1.., allow_hyphen_values = true)]
        solver: Option<Vec<String>>,
    },

    /// Record a discovered input in the catalogue and grow the answer table
    #[command(alias = "c")]
    Record {
        /// Catalogue file (created if absent)
        catalogue: PathBuf,

        /// Saved meta-instance output
        meta: PathBuf,

        /// Recovered input written by assemble
        #[arg(long)]
        input: Option<PathBuf>,

        /// File holding the answer for the input
        #[arg(long)]
        answer: Option<PathBuf>,

        /// Answer table to fold the catalogue into
        #[arg(long)]
        table: Option<PathBuf>,
    },
}

fn parse_compression(s: &str) -> Result<Compression, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn parse_chunk(s: &str) -> Result<ChunkFile, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    if cli.version {
        println!("slice-oracle {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            if let Err(e) = Cli::command().print_help() {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        Commands::Run { manifest } => {
            let stdin = io::stdin().lock();
            let mut stdout = io::stdout().lock();
            run_instance(&manifest, stdin, &mut stdout).map(|_| ())
        }

        Commands::Inspect { file, compression } => show_inspect(&file, compression).map(|info| {
            print!("{}", info);
        }),

        Commands::Plan { meta, size } => plan_offsets(&meta, size).map(|offsets| {
            print!("{}", offsets);
        }),

        Commands::Assemble {
            meta,
            output,
            chunks,
            compression,
        } => {
            let options = AssembleOptions {
                compression,
                chunks,
            };
            assemble_files(&meta, &output, &options).map(|chars| {
                println!("Recovered {} chars to {}", chars, output.display());
            })
        }

        Commands::Manifest {
            table,
            output,
            offset,
            size,
            meta,
            compression,
            solver,
        } => {
            let mode = match offset {
                Some(offset) if !meta => ChunkSpec::new(offset, size).map(Mode::Chunk),
                _ => Ok(Mode::Meta),
            };
            mode.and_then(|mode| {
                let options = ManifestOptions {
                    mode,
                    compression,
                    solver,
                };
                build_manifest(&table, &output, &options)
            })
            .map(|records| {
                println!("Wrote manifest with {} answers to {}", records, output.display());
            })
        }

        Commands::Record {
            catalogue,
            meta,
            input,
            answer,
            table,
        } => {
            let options = RecordOptions {
                input,
                answer,
                table,
            };
            record_discovery(&catalogue, &meta, &options).map(|summary| {
                println!(
                    "{:?} in {} ({} entries, {} pending)",
                    summary.recorded,
                    catalogue.display(),
                    summary.entries,
                    summary.pending
                );
                if let (Some(records), Some(table)) = (summary.table_records, &options.table) {
                    println!("Wrote {} answers to {}", records, table.display());
                }
            })
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
