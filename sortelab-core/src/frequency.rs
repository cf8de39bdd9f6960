//! Frequency engine: number → occurrence count over a set of draws.
//!
//! The table is the weight source for every history-biased strategy.
//! Windowing is the caller's job: pass only the draws that should count.

use std::collections::HashMap;

use crate::domain::{AnchorSet, HistoricalDraw};
use crate::format::LotteryFormat;

/// Occurrence counts in first-occurrence order.
///
/// Order is irrelevant to correctness; it only pins down tie behavior
/// so that identical inputs produce identical sampling streams.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    numbers: Vec<u8>,
    counts: Vec<u32>,
    index: HashMap<u8, usize>,
}

impl FrequencyTable {
    /// Count every canonical occurrence across `draws`.
    ///
    /// Numbers outside the format's range are ignored; numbers equal to
    /// an anchor are dropped from the table entirely, not weighted to
    /// zero.
    pub fn from_draws(
        format: &LotteryFormat,
        draws: &[HistoricalDraw],
        anchors: &AnchorSet,
    ) -> Self {
        let mut table = Self::default();
        for draw in draws {
            for &n in draw.canonical(format) {
                if !format.contains(n) || anchors.contains(n) {
                    continue;
                }
                table.bump(n);
            }
        }
        table
    }

    fn bump(&mut self, n: u8) {
        match self.index.get(&n) {
            Some(&i) => self.counts[i] += 1,
            None => {
                self.index.insert(n, self.numbers.len());
                self.numbers.push(n);
                self.counts.push(1);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    /// Numbers with nonzero count, in first-occurrence order.
    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    /// Counts parallel to [`Self::numbers`].
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn count_of(&self, n: u8) -> u32 {
        self.index.get(&n).map_or(0, |&i| self.counts[i])
    }

    /// Cold candidates: every in-range number with zero occurrences,
    /// minus anchors. If fewer than `needed` exist, the set is extended
    /// by borrowing the least-frequent warm numbers, ascending by count
    /// (first-occurrence order breaking ties).
    pub fn cold_set(
        &self,
        format: &LotteryFormat,
        anchors: &AnchorSet,
        needed: usize,
    ) -> Vec<u8> {
        let mut cold: Vec<u8> = format
            .universe()
            .into_iter()
            .filter(|&n| !anchors.contains(n) && self.count_of(n) == 0)
            .collect();

        if cold.len() < needed {
            let mut warm: Vec<(u32, usize)> = self
                .counts
                .iter()
                .enumerate()
                .map(|(i, &c)| (c, i))
                .collect();
            warm.sort_by_key(|&(count, first_seen)| (count, first_seen));
            for (_, i) in warm {
                if cold.len() >= needed {
                    break;
                }
                let n = self.numbers[i];
                if !cold.contains(&n) {
                    cold.push(n);
                }
            }
        }

        cold
    }

    /// Weighted view over the complete universe: historical count with a
    /// floor of 1, so never-drawn numbers stay reachable.
    pub fn universe_weights(&self, format: &LotteryFormat) -> (Vec<u8>, Vec<u32>) {
        let numbers = format.universe();
        let weights = numbers.iter().map(|&n| self.count_of(n).max(1)).collect();
        (numbers, weights)
    }
}
