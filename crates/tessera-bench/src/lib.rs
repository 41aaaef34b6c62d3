//! Benchmark profiles and the multi-user exerciser for Tessera.
//!
//! Provides pre-built [`SheetConfig`] profiles for benchmarks and examples:
//!
//! - [`reference_profile`]: 100x200 sheet, the default exerciser target
//! - [`contention_profile`]: 8x8 sheet where almost every pair of
//!   operations shares a row or column
//! - [`seeded_sheet`]: a sheet pre-filled from the exerciser vocabulary
//!
//! and the [`Exerciser`], which drives a sheet from many threads at once.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod exerciser;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessera_engine::{Sheet, SheetConfig};

pub use exerciser::{
    ExerciseError, ExerciseReport, Exerciser, ExerciserConfig, Operation, Task, VOCABULARY,
};

/// Build the reference profile: a 100x200 sheet.
pub fn reference_profile() -> SheetConfig {
    SheetConfig::new(100, 200)
}

/// Build the contention profile: an 8x8 sheet.
pub fn contention_profile() -> SheetConfig {
    SheetConfig::new(8, 8)
}

/// Build a sheet from `config` with roughly `fill` of its cells set to
/// words from [`VOCABULARY`], chosen deterministically from `seed`.
///
/// # Panics
///
/// Panics if `config` is invalid; profiles are always valid.
pub fn seeded_sheet(config: SheetConfig, fill: f64, seed: u64) -> Sheet {
    let sheet = Sheet::new(config).expect("benchmark profile must be valid");
    let shape = sheet.shape();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for row in 0..shape.rows {
        for col in 0..shape.cols {
            if rng.random_bool(fill) {
                let word = VOCABULARY[rng.random_range(0..VOCABULARY.len())];
                sheet
                    .set(row, col, word)
                    .expect("index within the shape just created");
            }
        }
    }
    sheet
}
