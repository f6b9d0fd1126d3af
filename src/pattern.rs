//! Workload pattern generation: bounded pools of random permutations.
//!
//! A fresh shuffle per iteration would cost O(users) or O(rows) per record;
//! cycling through a small precomputed pool gives a decorrelated,
//! non-sequential key order at fixed memory cost. Transaction order is keyed
//! off the *selected* user id rather than the slot index, which decorrelates
//! per-user transaction order from global iteration order.

use rand::seq::SliceRandom;
use rand::Rng;

/// Number of precomputed user-order permutations.
pub const USER_PATTERNS: usize = 100;

/// Number of precomputed transaction-order permutations.
pub const TXN_PATTERNS: usize = 1000;

/// Immutable pools of random permutations driving insertion order.
///
/// Built once before the background loops start and shared read-only
/// afterwards; never mutated again, so no synchronization is needed.
#[derive(Debug)]
pub struct PatternPool {
    user_patterns: Vec<Vec<u32>>,
    txn_patterns: Vec<Vec<u32>>,
}

impl PatternPool {
    /// Build both pools: [`USER_PATTERNS`] permutations of `1..=num_users`
    /// and [`TXN_PATTERNS`] permutations of `1..=rows_per_user`, each an
    /// independent in-place shuffle of the identity sequence.
    pub fn generate<R: Rng>(num_users: u32, rows_per_user: u32, rng: &mut R) -> PatternPool {
        PatternPool {
            user_patterns: permutations(USER_PATTERNS, num_users, rng),
            txn_patterns: permutations(TXN_PATTERNS, rows_per_user, rng),
        }
    }

    /// Derive the `(user_id, txn_id)` pair for iteration `i`, user slot `j`.
    ///
    /// `i` ranges over rows-per-user, `j` over users; both ids are 1-based.
    pub fn select(&self, i: usize, j: usize) -> (u32, u32) {
        let user_id = self.user_patterns[i % USER_PATTERNS][j];
        let txn_id = self.txn_patterns[user_id as usize % TXN_PATTERNS][i];
        (user_id, txn_id)
    }
}

fn permutations<R: Rng>(count: usize, domain: u32, rng: &mut R) -> Vec<Vec<u32>> {
    (0..count)
        .map(|_| {
            let mut pattern: Vec<u32> = (1..=domain).collect();
            pattern.shuffle(rng);
            pattern
        })
        .collect()
}
