//! Sample input generation for the demo run.
//!
//! When no input file is given, the demo generates data whose symbol
//! distribution makes Huffman coding visible in the metrics:
//! - English-like text (skewed letter frequencies, short codes for `e`/space)
//! - Long runs of a single byte (one very heavy symbol)
//! - Uniform random bytes (flat distribution, close to 8 bits/symbol)
//!
//! Output is fully determined by the seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Letters in rough English frequency order, most common first.
const LETTERS_BY_FREQUENCY: &[u8] = b" etaoinshrdlcumwfgypbvkjxqz";

/// Section length before the generator switches style.
const SECTION_BYTES: usize = 4096;

/// Generate `size_bytes` of mixed-distribution sample data.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let section = (size_bytes - data.len()).min(SECTION_BYTES);

        match rng.gen_range(0..10u8) {
            // 60% text-like
            0..=5 => push_text(&mut rng, &mut data, section),

            // 20% runs
            6..=7 => {
                let byte_value: u8 = rng.gen();
                data.extend(std::iter::repeat(byte_value).take(section));
            }

            // 20% uniform noise
            _ => data.extend((0..section).map(|_| rng.gen::<u8>())),
        }
    }

    data
}

/// Append `len` bytes of pseudo-text drawn with a geometric-like bias
/// toward the front of [`LETTERS_BY_FREQUENCY`].
fn push_text(rng: &mut ChaCha8Rng, data: &mut Vec<u8>, len: usize) {
    let alphabet = LETTERS_BY_FREQUENCY.len();
    for i in 0..len {
        if i % 72 == 71 {
            data.push(b'\n');
            continue;
        }
        let a = rng.gen_range(0..alphabet);
        let b = rng.gen_range(0..alphabet);
        data.push(LETTERS_BY_FREQUENCY[a.min(b)]);
    }
}
