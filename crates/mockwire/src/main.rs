//! Command-line entry point for the Mockwire replay corpus generator.
//!
//! Parses flags, resolves the protocol set and URL pool, then drives the
//! partitioner to exhaustion, serializing one replay file per iteration.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mockwire_gen::{Bounds, CorpusPartitioner, GeneratorConfig, ProtocolSet, UrlPool};

mod writer;
use writer::{CorpusWriter, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "mockwire",
    version,
    about = "Generate synthetic replay corpora for proxy test harnesses"
)]
struct Args {
    /// Number of total transactions to generate, exactly.
    #[arg(short = 'n', long = "number")]
    number: u64,

    /// Lower limit of transactions per session.
    #[arg(long = "trans-lower", alias = "tl", default_value_t = 10)]
    trans_lower: u64,

    /// Upper limit of transactions per session.
    #[arg(long = "trans-upper", alias = "tu", default_value_t = 10)]
    trans_upper: u64,

    /// Lower limit of sessions per file.
    #[arg(long = "sess-lower", alias = "sl", default_value_t = 10)]
    sess_lower: u64,

    /// Upper limit of sessions per file.
    #[arg(long = "sess-upper", alias = "su", default_value_t = 10)]
    sess_upper: u64,

    /// Comma-separated protocols allowed in generated sessions:
    /// http, tls, h2, all.
    #[arg(long = "protocols", alias = "tp", default_value = "all")]
    protocols: String,

    /// Path to a file listing candidate URLs, one per line.
    #[arg(short = 'u', long = "url-file")]
    url_file: PathBuf,

    /// Directory where the replay files are written.
    #[arg(short = 'o', long = "output", default_value = "replay")]
    output: PathBuf,

    /// Prefix for replay file names.
    #[arg(short = 'p', long = "prefix")]
    prefix: Option<String>,

    /// Write JSON instead of the default YAML.
    #[arg(short = 'j', long = "json", default_value_t = false)]
    json: bool,

    /// RNG seed for a reproducible corpus. Defaults to OS entropy.
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Replace the output directory if it already exists.
    #[arg(long = "force", default_value_t = false)]
    force: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    let (protocols, unknown) = ProtocolSet::from_tokens(args.protocols.split(','));
    for token in &unknown {
        warn!(token, "ignoring unrecognized protocol");
    }
    if !protocols.any() {
        bail!("no valid protocols in '{}' (expected http, tls, h2, or all)", args.protocols);
    }

    let url_text = fs::read_to_string(&args.url_file)
        .with_context(|| format!("read URL file {}", args.url_file.display()))?;
    let pool = UrlPool::parse(url_text.lines()).context("build URL pool")?;

    let config = GeneratorConfig {
        total_transactions: args.number,
        session_bounds: Bounds::new(args.sess_lower, args.sess_upper),
        transaction_bounds: Bounds::new(args.trans_lower, args.trans_upper),
        protocols,
    };
    let mut partitioner = CorpusPartitioner::new(&config, &pool).context("invalid configuration")?;

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Yaml
    };
    let mut writer = CorpusWriter::create(&args.output, args.prefix.as_deref(), format, args.force)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "seeding generator");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    while let Some(generated) = partitioner.next_file(&mut rng) {
        let generated = generated.context("protocol selection failed")?;
        let path = writer.write(&generated.file)?;
        info!(
            file = %path.display(),
            sessions = generated.session_count,
            transactions = generated.transaction_count,
            "generated replay file"
        );
    }

    Ok(())
}
