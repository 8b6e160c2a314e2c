//! Configuration for the huffpack command-line tool.
//!
//! Arguments are parsed with clap and resolved into a [`Config`]: default
//! output paths are derived from the input names and a missing demo seed is
//! taken from the clock. The resolved values can be printed so any run can
//! be repeated exactly.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

/// Default upper bound on input size (10 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

/// Extension of the packed bitstream artifact.
pub const BITSTREAM_EXT: &str = "huff";

/// Suffix of the tree artifact.
pub const TREE_SUFFIX: &str = ".tree.json";

/// Huffman compression with a separate tree artifact.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Reject inputs larger than this many bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_INPUT_BYTES)]
    pub max_input_bytes: u64,

    /// Print the resolved configuration before running
    #[arg(long, global = true)]
    pub print_config: bool,

    /// Don't print the metrics summary
    #[arg(long, global = true)]
    pub no_metrics: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compress a file into <name>.huff and <name>.tree.json
    Compress {
        /// File to compress
        input: PathBuf,

        /// Directory for the two artifacts (default: next to the input)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Rebuild the original file from both artifacts
    Decompress {
        /// Packed bitstream artifact (.huff)
        bitstream: PathBuf,

        /// Tree artifact (.tree.json)
        #[arg(long)]
        tree: PathBuf,

        /// Output path (default: <stem>.decompressed)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the code table described by a tree artifact
    Codes {
        /// Tree artifact (.tree.json)
        tree: PathBuf,
    },

    /// Round-trip generated sample data in memory
    Demo {
        /// Random seed for the sample (default: time-based)
        #[arg(long)]
        seed: Option<u64>,

        /// Sample size in bytes
        #[arg(long, default_value_t = 64 * 1024)]
        size: usize,
    },
}

/// What a run will do, with every path and default resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Compress {
        input: PathBuf,
        bitstream_out: PathBuf,
        tree_out: PathBuf,
    },
    Decompress {
        bitstream: PathBuf,
        tree: PathBuf,
        out: PathBuf,
    },
    Codes {
        tree: PathBuf,
    },
    Demo {
        seed: u64,
        size: usize,
    },
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    pub task: Task,

    /// Log level used when RUST_LOG is not set
    pub log_level: String,

    /// Upper bound on input size in bytes
    pub max_input_bytes: u64,

    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Resolve parsed arguments into a configuration.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        if cli.max_input_bytes == 0 {
            bail!("--max-input-bytes must be greater than zero");
        }

        let task = match cli.command {
            Command::Compress { input, out_dir } => {
                let Some(name) = input.file_name() else {
                    bail!("input path {} has no file name", input.display());
                };
                let dir = match out_dir {
                    Some(dir) => dir,
                    None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
                };
                let name = name.to_string_lossy().into_owned();
                Task::Compress {
                    bitstream_out: dir.join(format!("{name}.{BITSTREAM_EXT}")),
                    tree_out: dir.join(format!("{name}{TREE_SUFFIX}")),
                    input,
                }
            }
            Command::Decompress { bitstream, tree, out } => {
                let out = match out {
                    Some(out) => out,
                    None => default_decompressed_path(&bitstream),
                };
                Task::Decompress { bitstream, tree, out }
            }
            Command::Codes { tree } => Task::Codes { tree },
            Command::Demo { seed, size } => Task::Demo {
                seed: seed.unwrap_or_else(time_seed),
                size,
            },
        };

        Ok(Config {
            task,
            log_level: cli.log_level,
            max_input_bytes: cli.max_input_bytes,
            print_config: cli.print_config,
            print_metrics: !cli.no_metrics,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.task {
            Task::Compress { input, bitstream_out, tree_out } => {
                println!("Mode:        compress");
                println!("Input file:  {}", input.display());
                println!("Bitstream:   {}", bitstream_out.display());
                println!("Tree:        {}", tree_out.display());
            }
            Task::Decompress { bitstream, tree, out } => {
                println!("Mode:        decompress");
                println!("Bitstream:   {}", bitstream.display());
                println!("Tree:        {}", tree.display());
                println!("Output file: {}", out.display());
            }
            Task::Codes { tree } => {
                println!("Mode:        codes");
                println!("Tree:        {}", tree.display());
            }
            Task::Demo { seed, size } => {
                println!("Mode:        demo");
                println!("Seed:        {seed}");
                println!("Sample size: {size} bytes");
            }
        }
        println!();
        println!(
            "Max input:   {} bytes ({} KiB)",
            self.max_input_bytes,
            self.max_input_bytes / 1024
        );
        println!("Log level:   {}", self.log_level);
        println!("Metrics:     {}", if self.print_metrics { "on" } else { "off" });
        println!();
    }
}

/// `<dir>/<stem>.decompressed`, where a trailing `.huff` is dropped from the name.
fn default_decompressed_path(bitstream: &Path) -> PathBuf {
    let name = bitstream
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name
        .strip_suffix(&format!(".{BITSTREAM_EXT}"))
        .unwrap_or(&name);
    bitstream.with_file_name(format!("{stem}.decompressed"))
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(args: &[&str]) -> Config {
        let argv = std::iter::once("huffpack").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).unwrap();
        Config::from_cli(cli).unwrap()
    }

    #[test]
    fn test_compress_defaults() {
        let config = resolve(&["compress", "data/report.txt"]);

        assert_eq!(
            config.task,
            Task::Compress {
                input: PathBuf::from("data/report.txt"),
                bitstream_out: PathBuf::from("data/report.txt.huff"),
                tree_out: PathBuf::from("data/report.txt.tree.json"),
            }
        );
        assert_eq!(config.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
        assert!(config.print_metrics);
    }

    #[test]
    fn test_compress_out_dir() {
        let config = resolve(&["compress", "report.txt", "--out-dir", "artifacts"]);

        match config.task {
            Task::Compress { bitstream_out, tree_out, .. } => {
                assert_eq!(bitstream_out, PathBuf::from("artifacts/report.txt.huff"));
                assert_eq!(tree_out, PathBuf::from("artifacts/report.txt.tree.json"));
            }
            other => panic!("unexpected task {other:?}"),
        }
    }

    #[test]
    fn test_decompress_default_output() {
        let config = resolve(&[
            "decompress",
            "out/report.txt.huff",
            "--tree",
            "out/report.txt.tree.json",
        ]);

        match config.task {
            Task::Decompress { out, .. } => {
                assert_eq!(out, PathBuf::from("out/report.txt.decompressed"));
            }
            other => panic!("unexpected task {other:?}"),
        }
    }

    #[test]
    fn test_global_flags() {
        let config = resolve(&["demo", "--seed", "7", "--no-metrics", "--max-input-bytes", "1024"]);

        assert_eq!(config.task, Task::Demo { seed: 7, size: 64 * 1024 });
        assert!(!config.print_metrics);
        assert_eq!(config.max_input_bytes, 1024);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let cli = Cli::try_parse_from(["huffpack", "demo", "--max-input-bytes", "0"]).unwrap();
        assert!(Config::from_cli(cli).is_err());
    }
}
