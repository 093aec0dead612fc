//! Zobrist keys for incremental position hashing.
//!
//! One key per (cell, category) where the category is "empty", "stone of
//! player 0" or "stone of player 1". Keys are drawn once from a fixed seed
//! so hashes are reproducible across runs and processes. The table covers
//! the largest supported board; smaller boards use a prefix of it.

use std::sync::LazyLock;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::player::PlayerId;

/// Seed for the key table.
pub const ZOBRIST_SEED: u64 = 0x1e17_00fa_712f_c381;

/// Largest supported board side (one `u64` word per line).
pub const MAX_SIDE: usize = 64;

const CATEGORIES: usize = 3;
const EMPTY: usize = 0;

static KEYS: LazyLock<ZobristKeys> = LazyLock::new(|| ZobristKeys::generate(ZOBRIST_SEED));

/// Pre-generated hash keys.
pub struct ZobristKeys {
    keys: Box<[[u64; CATEGORIES]]>,
}

impl ZobristKeys {
    fn generate(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let keys = (0..MAX_SIDE * MAX_SIDE)
            .map(|_| [rng.next_u64(), rng.next_u64(), rng.next_u64()])
            .collect();
        Self { keys }
    }

    /// The shared key table.
    #[inline]
    pub fn get() -> &'static ZobristKeys {
        &KEYS
    }

    /// Key for an empty cell.
    #[inline]
    #[must_use]
    pub fn empty(&self, cell: usize) -> u64 {
        self.keys[cell][EMPTY]
    }

    /// Key for a stone of `player` on `cell`.
    #[inline]
    #[must_use]
    pub fn stone(&self, cell: usize, player: PlayerId) -> u64 {
        self.keys[cell][1 + player.index()]
    }

    /// Hash of an empty board with `cells` cells.
    #[must_use]
    pub fn empty_board(&self, cells: usize) -> u64 {
        self.keys[..cells].iter().fold(0, |hash, key| hash ^ key[EMPTY])
    }
}
