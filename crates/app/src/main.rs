//! huffpack: compress files into a packed bitstream plus a tree artifact,
//! and rebuild them from the pair.

mod config;
mod input_gen;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use huffpack_core::{
    artifact, code_table, codec, decoder, metrics::Metrics, tree_codec, TreeArtifact,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Cli, Config, Task};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(cli)?;
    init_logging(&config.log_level)?;

    if config.print_config {
        config.print();
    }

    match &config.task {
        Task::Compress { input, bitstream_out, tree_out } => {
            compress(&config, input, bitstream_out, tree_out)
        }
        Task::Decompress { bitstream, tree, out } => decompress(&config, bitstream, tree, out),
        Task::Codes { tree } => print_codes(tree),
        Task::Demo { seed, size } => demo(&config, *seed, *size),
    }
}

/// Initialize structured logging
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level: {level}"))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}

fn read_input(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let len = fs::metadata(path)
        .with_context(|| format!("failed to stat {}", path.display()))?
        .len();
    if len > max_bytes {
        bail!(
            "{} is {} bytes, over the {} byte limit",
            path.display(),
            len,
            max_bytes
        );
    }
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn compress(config: &Config, input: &Path, bitstream_out: &Path, tree_out: &Path) -> Result<()> {
    let mut metrics = Metrics::new();
    let data = read_input(input, config.max_input_bytes)?;
    info!(input = %input.display(), bytes = data.len(), "compressing");

    let encoded = match codec::encode(&data) {
        Ok(encoded) => encoded,
        Err(e) if e.is_empty_input() => {
            warn!(input = %input.display(), "input is empty, no artifacts written");
            return Ok(());
        }
        Err(e) => return Err(e).context("encoding failed"),
    };

    let bitstream_bytes = encoded.bitstream_bytes()?;
    let tree_json = encoded.tree_json()?;

    fs::write(bitstream_out, &bitstream_bytes)
        .with_context(|| format!("failed to write {}", bitstream_out.display()))?;
    fs::write(tree_out, &tree_json)
        .with_context(|| format!("failed to write {}", tree_out.display()))?;

    metrics.record_encoded(&encoded);
    metrics.tree_bytes = tree_json.len() as u64;
    metrics.complete();

    info!(
        bitstream = %bitstream_out.display(),
        tree = %tree_out.display(),
        "artifacts written"
    );
    if config.print_metrics {
        metrics.print_summary();
    }
    Ok(())
}

fn decompress(config: &Config, bitstream: &Path, tree: &Path, out: &Path) -> Result<()> {
    let mut metrics = Metrics::new();

    let bitstream_bytes = read_input(bitstream, config.max_input_bytes)?;
    let tree_json = fs::read_to_string(tree)
        .with_context(|| format!("failed to read {}", tree.display()))?;
    info!(bitstream = %bitstream.display(), tree = %tree.display(), "decompressing");

    let packed = artifact::parse_bitstream(&bitstream_bytes)
        .with_context(|| format!("invalid bitstream file {}", bitstream.display()))?;
    let tree_artifact = TreeArtifact::from_json(&tree_json)
        .with_context(|| format!("invalid tree file {}", tree.display()))?;
    let huffman_tree = tree_codec::deserialize(&tree_artifact)
        .with_context(|| format!("invalid tree file {}", tree.display()))?;

    let output = decoder::decode(packed.reader(), &huffman_tree).context("decoding failed")?;
    fs::write(out, &output).with_context(|| format!("failed to write {}", out.display()))?;

    metrics.record_decoded(&packed, &huffman_tree);
    metrics.tree_bytes = tree_json.len() as u64;
    metrics.output_bytes = output.len() as u64;
    metrics.complete();

    info!(out = %out.display(), bytes = output.len(), "output written");
    if config.print_metrics {
        metrics.print_summary();
    }
    Ok(())
}

fn print_codes(tree: &Path) -> Result<()> {
    let tree_json =
        fs::read_to_string(tree).with_context(|| format!("failed to read {}", tree.display()))?;
    let artifact = TreeArtifact::from_json(&tree_json)?;
    let tree = tree_codec::deserialize(&artifact)?;
    let codes = code_table::generate(&tree)?;

    println!("=== Code Table ({} symbols, depth {}) ===", codes.len(), tree.depth());
    for (symbol, code) in codes.iter() {
        println!("{:>3} {:<6} {}", symbol, display_symbol(symbol), code);
    }
    Ok(())
}

/// Printable form of a byte: the character itself, or its escape.
fn display_symbol(symbol: u8) -> String {
    match symbol {
        b' ' => "' '".to_string(),
        0x21..=0x7e => format!("'{}'", symbol as char),
        _ => format!("{:?}", symbol as char),
    }
}

fn demo(config: &Config, seed: u64, size: usize) -> Result<()> {
    if size as u64 > config.max_input_bytes {
        bail!("sample size {size} is over the {} byte limit", config.max_input_bytes);
    }

    let mut metrics = Metrics::new();
    let data = input_gen::generate_sample_data(seed, size);
    info!(seed, bytes = data.len(), "generated sample data");

    let encoded = match codec::encode(&data) {
        Ok(encoded) => encoded,
        Err(e) if e.is_empty_input() => {
            warn!("sample is empty, nothing to do");
            return Ok(());
        }
        Err(e) => return Err(e).context("encoding failed"),
    };

    // Go through the persisted forms so the demo exercises the same path as files.
    let bitstream_bytes = encoded.bitstream_bytes()?;
    let tree_json = encoded.tree_json()?;
    let decoded =
        codec::decode_persisted(&bitstream_bytes, &tree_json).context("decoding failed")?;

    metrics.record_encoded(&encoded);
    metrics.tree_bytes = tree_json.len() as u64;
    metrics.output_bytes = decoded.len() as u64;
    metrics.complete();

    if decoded != data {
        bail!("round trip mismatch: {} bytes in, {} bytes out", data.len(), decoded.len());
    }

    if config.print_metrics {
        metrics.print_summary();
    }
    println!("✓ Round trip verified ({} bytes)", data.len());
    Ok(())
}
