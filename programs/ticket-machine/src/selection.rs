//! Weighted winner selection over a resolved raffle's entries.
//!
//! Every entry owns a run of consecutive numbers on a line as wide as its
//! entry count. A draw picks a number uniformly and the owner of that number
//! wins, so the chance of winning a single draw is `entry_count / total`.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hashv;

use crate::constants::DEFAULT_WINNER_COUNT;

/// One user's weight in a raffle pool
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryWeight {
    pub user_id: u64,
    pub entry_count: u64,
}

/// Source of uniform draws
pub trait DrawSource {
    /// Uniform integer in `[1, upper]`. `upper` is at least 1.
    fn draw(&mut self, upper: u64) -> u64;
}

/// Deterministic SHA-256 counter stream.
/// Anyone holding the seed can replay a draw and check the winners.
pub struct SeededDraw {
    seed: [u8; 32],
    counter: u64,
}

impl SeededDraw {
    pub fn new(seed: [u8; 32]) -> Self {
        Self { seed, counter: 0 }
    }

    fn next_u64(&mut self) -> u64 {
        let digest = hashv(&[&self.seed, &self.counter.to_le_bytes()]).to_bytes();
        self.counter = self.counter.wrapping_add(1);
        let mut word = [0u8; 8];
        word.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(word)
    }
}

impl DrawSource for SeededDraw {
    fn draw(&mut self, upper: u64) -> u64 {
        // Values below 2^64 mod upper would make the low results more likely
        let threshold = upper.wrapping_neg() % upper;
        loop {
            let candidate = self.next_u64();
            if candidate >= threshold {
                return candidate % upper + 1;
            }
        }
    }
}

/// Entries laid end to end: entry `i` owns `[lo_i, hi_i]`
pub struct NumberLine {
    /// Inclusive upper bound of each entry's run
    upper_bounds: Vec<u64>,
    total: u64,
}

impl NumberLine {
    pub fn build(entries: &[EntryWeight]) -> Self {
        let mut total = 0u64;
        let upper_bounds = entries
            .iter()
            .map(|entry| {
                total = total.saturating_add(entry.entry_count);
                total
            })
            .collect();
        Self { upper_bounds, total }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Index of the entry owning `ticket` (1-based position on the line)
    pub fn owner_of(&self, ticket: u64) -> Option<usize> {
        if ticket == 0 || ticket > self.total {
            return None;
        }
        Some(self.upper_bounds.partition_point(|&hi| hi < ticket))
    }
}

/// Draw up to `winner_count` winners from `entries`.
///
/// Without duplicates a winner leaves the pool before the next draw, which
/// gives the same odds as redrawing on a repeat but always terminates; the
/// result holds `min(winner_count, entrants)` distinct users. With duplicates
/// every draw counts, bounded by the total weight.
pub fn pick_winners<R: DrawSource>(
    entries: &[EntryWeight],
    winner_count: u32,
    allow_duplicates: bool,
    rng: &mut R,
) -> Vec<u64> {
    // Zero-weight entries own no numbers and can never be drawn
    let mut pool: Vec<EntryWeight> = entries
        .iter()
        .filter(|entry| entry.entry_count > 0)
        .copied()
        .collect();

    let wanted = winner_count as u64;
    let mut winners = Vec::new();

    if allow_duplicates {
        let line = NumberLine::build(&pool);
        let target = wanted.min(line.total());
        while (winners.len() as u64) < target {
            if let Some(index) = line.owner_of(rng.draw(line.total())) {
                winners.push(pool[index].user_id);
            }
        }
    } else {
        let target = wanted.min(pool.len() as u64);
        while (winners.len() as u64) < target {
            let line = NumberLine::build(&pool);
            if let Some(index) = line.owner_of(rng.draw(line.total())) {
                winners.push(pool.swap_remove(index).user_id);
            }
        }
    }

    winners
}

/// `pick_winners` with the caller's options filled in: one winner, no repeats
pub fn draw_winners<R: DrawSource>(
    entries: &[EntryWeight],
    winner_count: Option<u32>,
    allow_duplicates: Option<bool>,
    rng: &mut R,
) -> Vec<u64> {
    pick_winners(
        entries,
        winner_count.unwrap_or(DEFAULT_WINNER_COUNT),
        allow_duplicates.unwrap_or(false),
        rng,
    )
}
