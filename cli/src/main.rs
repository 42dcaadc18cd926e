use anyhow::Result;
use clap::Parser;
use itemsource_core::{generate_item_sources, InstanceNameTable};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const INPUT_FILE_NAME: &str = "data-tbc.lua";
const OUTPUT_FILE_NAME: &str = "ItemSources.lua";

#[derive(Parser)]
#[command(
    name = "itemsource",
    version = "0.1.0",
    about = "Generate ItemSources.lua (item id -> boss, instance) from AtlasLootClassic data",
    long_about = None
)]
struct Cli {
    /// Directory holding data-tbc.lua and ItemSources.lua
    /// (default: parent of the directory containing this executable)
    #[arg(long)]
    root: Option<PathBuf>,

    /// AtlasLoot data file to parse (default: <root>/data-tbc.lua)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Lua file to generate (default: <root>/ItemSources.lua)
    #[arg(long)]
    output: Option<PathBuf>,

    /// TOML file with extra or corrected instance display names
    #[arg(long)]
    instance_names: Option<PathBuf>,

    /// Path to log file
    #[arg(long, default_value = "/tmp/itemsource.log")]
    log_file: PathBuf,

    /// Verbosity level (repeat for more verbose output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbose: u8, log_file: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let filter_level = match verbose {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(filter_level.into());

    let file_appender = tracing_appender::rolling::never(
        log_file.parent().unwrap_or(Path::new(".")),
        log_file.file_name().unwrap_or(std::ffi::OsStr::new("itemsource.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::Layer::new().with_writer(std::io::stderr).with_ansi(true))
        .with(fmt::Layer::new().with_writer(non_blocking).with_ansi(false));

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}

/// The tool is installed one level below the data files, so default to the
/// parent of the executable's directory.
fn default_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().and_then(Path::parent).map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = setup_logging(cli.verbose, &cli.log_file)?;

    info!("Starting itemsource");

    let root = cli.root.unwrap_or_else(default_root);
    let input = cli.input.unwrap_or_else(|| root.join(INPUT_FILE_NAME));
    let output = cli.output.unwrap_or_else(|| root.join(OUTPUT_FILE_NAME));

    let instance_names = match &cli.instance_names {
        Some(path) => {
            info!("Loading instance names from {:?}", path);
            InstanceNameTable::with_overrides_from_file(path)
                .map_err(|e| anyhow::anyhow!("Failed to load instance names: {}", e))?
        }
        None => InstanceNameTable::default(),
    };
    info!("Using {} instance display names", instance_names.len());

    println!("Parsing {}...", input.display());
    let summary = generate_item_sources(&input, &output, &instance_names)?;
    println!("Found {} unique items", summary.unique_items);
    println!(
        "Generated {} with {} entries",
        summary.output.display(),
        summary.entries_written
    );
    println!(
        "Instances: {}, Bosses: {}",
        summary.stats.instances, summary.stats.bosses
    );

    info!("itemsource finished");
    Ok(())
}
