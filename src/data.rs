//! Random data staging.
//!
//! Generates the integer dataset that is injected into the shared data volume
//! and packages it as a tar archive the runtime can extract into a container.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

/// Generate `size` uniformly distributed integers in `range`.
///
/// A seed makes the output reproducible; without one the thread RNG is used.
pub fn generate_values(size: usize, range: Range<i64>, seed: Option<u64>) -> Vec<i64> {
    if range.is_empty() {
        return vec![range.start; size];
    }

    match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..size).map(|_| rng.random_range(range.clone())).collect()
        }
        None => {
            let mut rng = rand::rng();
            (0..size).map(|_| rng.random_range(range.clone())).collect()
        }
    }
}

/// Render values one per line, newline terminated.
pub fn render_values(values: &[i64]) -> Vec<u8> {
    let mut out = String::with_capacity(values.len() * 3);
    for value in values {
        out.push_str(&value.to_string());
        out.push('\n');
    }
    out.into_bytes()
}

/// Build a tar archive holding a single regular file.
///
/// # Errors
///
/// Returns error if the file name is not a valid archive path.
pub fn build_archive(file_name: &str, contents: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut header = tar::Header::new_gnu();
    header.set_size(contents.len() as u64);
    header.set_mode(0o644);
    header.set_entry_type(tar::EntryType::Regular);

    let mut builder = tar::Builder::new(Vec::new());
    builder.append_data(&mut header, file_name, contents)?;
    builder.into_inner()
}
