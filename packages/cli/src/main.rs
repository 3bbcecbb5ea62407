use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use krepis_reach::{
    dependency_listing, DependencyInput, DependencyMatrices, Lookup, MatrixKind, StateTable,
    TableConfig,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Krepis Reach CLI
/// State table self-test and dependency matrix queries
#[derive(Parser)]
#[command(name = "krepis-reach")]
#[command(about = "Krepis Reach state exploration tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill a state table up to its bound and check every lookup result
    Selftest {
        /// Initial capacity exponent
        #[arg(long, default_value_t = 2)]
        initial: u32,
        /// Maximum capacity exponent
        #[arg(long, default_value_t = 10)]
        max: u32,
        /// Distinct keys per round (default: as many as the bound allows)
        #[arg(long)]
        keys: Option<usize>,
        /// Passes over the key set
        #[arg(long, default_value_t = 500)]
        rounds: usize,
        /// Slots per key
        #[arg(long, default_value_t = 10)]
        slots: usize,
    },
    /// Print the dependency listing or query a dependency matrix
    Deps {
        /// Dependency input (JSON)
        input: PathBuf,
        /// Print the per-group read/write listing
        #[arg(long)]
        listing: bool,
        /// Matrix to query, by character (g R w r t c m e d u a A b)
        #[arg(short, long)]
        matrix: Option<char>,
        /// Query by column instead of by row
        #[arg(long, requires = "matrix")]
        invert: bool,
        /// Print only the image of this index
        #[arg(long, requires = "matrix")]
        index: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    info!("⚡ Krepis Reach CLI v{}", krepis_reach::VERSION);

    match cli.command {
        Commands::Selftest { initial, max, keys, rounds, slots } => {
            let config = TableConfig::new(slots).initial(initial).max(max);
            let summary = selftest(config, keys, rounds)?;
            info!("✅ State table self-test passed");
            println!("{summary}");
        }
        Commands::Deps { input, listing, matrix, invert, index } => {
            let input = load_input(&input)?;
            print!("{}", deps(&input, listing, matrix, invert, index)?);
        }
    }

    Ok(())
}

/// `RUST_LOG` when set, `info` otherwise; `--verbose` forces `debug`
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Keys that fit under the 75% load bound at max capacity
fn load_bound(config: &TableConfig) -> usize {
    3 * config.max_capacity() / 4
}

/// Insert `keys` distinct keys, look them up `rounds - 1` more times, then
/// check the next new key against the bound
fn selftest(config: TableConfig, keys: Option<usize>, rounds: usize) -> Result<String> {
    let mut table = StateTable::new(config).context("invalid table geometry")?;
    let bound = load_bound(&config);
    let keys = keys.unwrap_or(bound);
    if keys > bound {
        bail!("{keys} keys exceed the load bound of {bound} at 2^{}", config.max_capacity_pow2);
    }

    let mut key = vec![0; config.key_length];
    for round in 0..rounds {
        for i in 0..keys {
            key.fill(key_value(i)?);
            match table.lookup_or_insert(&key) {
                Lookup::Inserted if round == 0 => {}
                Lookup::Found if round > 0 => {}
                other => bail!(
                    "round {round}, key {i}: unexpected {other:?} (load {}, capacity {})",
                    table.load(),
                    table.capacity()
                ),
            }
        }
        debug!(round, load = table.load(), capacity = table.capacity(), "round complete");
    }

    key.fill(key_value(keys)?);
    let expected = if rounds > 0 && keys == bound { Lookup::Full } else { Lookup::Inserted };
    let extra = table.lookup_or_insert(&key);
    if extra != expected {
        bail!("key {keys}: expected {expected:?}, got {extra:?}");
    }
    if extra == Lookup::Full {
        info!(error = %table.full_error(), "bound reached");
    }

    let stats = table.stats();
    Ok(format!(
        "keys {keys} x {rounds} rounds: load {} / capacity {} (max {}), {} resizes, load factor {:.3}",
        stats.load,
        stats.capacity,
        stats.max_capacity,
        stats.resizes,
        stats.load_factor()
    ))
}

fn key_value(i: usize) -> Result<i32> {
    i32::try_from(i).with_context(|| format!("key index {i} does not fit a state slot"))
}

fn load_input(path: &Path) -> Result<DependencyInput> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Render the requested listing and matrix query
///
/// Without `--matrix` the listing is printed even if not asked for.
fn deps(
    input: &DependencyInput,
    listing: bool,
    matrix: Option<char>,
    invert: bool,
    index: Option<usize>,
) -> Result<String> {
    let matrices = DependencyMatrices::build(input).context("malformed dependency input")?;
    info!(
        groups = matrices.groups(),
        guards = matrices.guards(),
        slots = matrices.slots(),
        "dependency matrices built"
    );

    let mut out = String::new();
    if listing || matrix.is_none() {
        out.push_str(&dependency_listing(input));
    }
    let Some(c) = matrix else {
        return Ok(out);
    };

    let view = matrices.view(c, invert).with_context(|| {
        let known: String = MatrixKind::ALL.iter().map(|k| k.as_char()).collect();
        format!("unknown matrix '{c}', expected one of {known}")
    })?;
    let (from, to) = view.dimensions();
    out.push_str(&format!("{view}: {} ({from} -> {to})\n", view.kind().description()));

    let rows = match index {
        Some(i) if i >= view.in_dim() => {
            bail!("index {i} out of range, {from} has {} entries", view.in_dim())
        }
        Some(i) => i..i + 1,
        None => 0..view.in_dim(),
    };
    for i in rows {
        let image: Vec<String> = view.image(i).unwrap_or_default().iter().map(ToString::to_string).collect();
        out.push_str(&format!("{i}: {}\n", image.join(", ")));
    }

    Ok(out)
}
