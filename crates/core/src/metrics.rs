//! Metrics for a compress or decompress run.
//!
//! Tracks sizes on both sides of the codec plus wall-clock time, and derives
//! the figures shown to users: compression ratio, space savings, average
//! code length and throughput.
//!
//! # Thread Safety
//!
//! `Metrics` is a plain value. Each run owns its own instance.

use std::time::{Duration, Instant};

use crate::bitio::PackedBitstream;
use crate::codec::Encoded;
use crate::tree::HuffmanTree;

/// Counters and timing for one codec run.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Input ===
    /// Uncompressed size: bytes handed to the encoder, or the root weight of
    /// the tree when decompressing
    pub input_bytes: u64,

    /// Distinct symbols in the input
    pub distinct_symbols: u64,

    // === Artifacts ===
    /// Meaningful code bits, excluding padding
    pub code_bits: u64,

    /// Packed payload bytes, excluding the persisted header
    pub packed_bytes: u64,

    /// Filler bits in the final packed byte
    pub padding_bits: u8,

    /// Size of the serialized tree artifact
    pub tree_bytes: u64,

    // === Output ===
    /// Bytes recovered by the decoder
    pub output_bytes: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            input_bytes: 0,
            distinct_symbols: 0,
            code_bits: 0,
            packed_bytes: 0,
            padding_bits: 0,
            tree_bytes: 0,
            output_bytes: 0,
        }
    }

    /// Fill the input and artifact counters from an encode result.
    pub fn record_encoded(&mut self, encoded: &Encoded) {
        self.input_bytes = encoded.tree.weight();
        self.distinct_symbols = encoded.codes.len() as u64;
        self.code_bits = encoded.bitstream.bit_len() as u64;
        self.packed_bytes = encoded.bitstream.bytes().len() as u64;
        self.padding_bits = encoded.bitstream.padding();
    }

    /// Fill the same counters from the artifacts of a decode.
    ///
    /// The uncompressed size comes from the tree, so a compress run and the
    /// decompress run of its artifacts report identical sizes and ratios.
    pub fn record_decoded(&mut self, bitstream: &PackedBitstream, tree: &HuffmanTree) {
        self.input_bytes = tree.weight();
        self.distinct_symbols = tree.leaf_count() as u64;
        self.code_bits = bitstream.bit_len() as u64;
        self.packed_bytes = bitstream.bytes().len() as u64;
        self.padding_bits = bitstream.padding();
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Compression ratio (packed / raw).
    ///
    /// Returns 0.0 if nothing was compressed.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.packed_bytes as f64 / self.input_bytes as f64
        }
    }

    /// Percentage of the input size saved by packing, negative on expansion.
    pub fn space_savings_percent(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            (1.0 - self.compression_ratio()) * 100.0
        }
    }

    /// Average code length in bits per input symbol.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.code_bits as f64 / self.input_bytes as f64
        }
    }

    /// Input throughput in bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.input_bytes as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("=== Compression ===");
        println!(
            "Input:    {} bytes ({} distinct symbols)",
            self.input_bytes, self.distinct_symbols
        );
        println!(
            "Packed:   {} bytes ({} code bits, {} padding bits)",
            self.packed_bytes, self.code_bits, self.padding_bits
        );
        println!("Tree:     {} bytes", self.tree_bytes);
        println!("Ratio:    {:.1}%", self.compression_ratio() * 100.0);
        println!("Savings:  {:.2}%", self.space_savings_percent());
        println!("Average:  {:.3} bits/symbol", self.bits_per_symbol());
        println!();

        if self.output_bytes > 0 {
            println!("=== Decompression ===");
            println!("Output:   {} bytes", self.output_bytes);
            println!();
        }

        println!("=== Performance ===");
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             input_bytes={}\n\
             distinct_symbols={}\n\
             code_bits={}\n\
             packed_bytes={}\n\
             padding_bits={}\n\
             tree_bytes={}\n\
             output_bytes={}\n\
             compression_ratio={:.4}\n\
             space_savings_percent={:.2}\n",
            self.duration().as_millis(),
            self.input_bytes,
            self.distinct_symbols,
            self.code_bits,
            self.packed_bytes,
            self.padding_bits,
            self.tree_bytes,
            self.output_bytes,
            self.compression_ratio(),
            self.space_savings_percent(),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
