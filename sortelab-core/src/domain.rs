//! Domain types: historical draws, anchor sets, generated games.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::format::LotteryFormat;

/// Maximum anchors a single request may force into a game.
pub const MAX_ANCHORS: usize = 3;

/// One historical draw as recorded by the import collaborator.
///
/// `numbers` keeps the full stored order, including the trailing second
/// draw for dual-draw formats; statistics go through [`Self::canonical`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalDraw {
    pub contest_id: u32,
    #[serde(default)]
    pub draw_date: Option<NaiveDate>,
    pub numbers: Vec<u8>,
}

impl HistoricalDraw {
    pub fn new(contest_id: u32, numbers: Vec<u8>) -> Self {
        Self {
            contest_id,
            draw_date: None,
            numbers,
        }
    }

    /// The numbers that count for statistics, dispatched on the
    /// format's draw shape.
    pub fn canonical<'a>(&'a self, format: &LotteryFormat) -> &'a [u8] {
        format.canonical(&self.numbers)
    }
}

/// Numbers the user forces into the result.
///
/// Parsing is best-effort: non-numeric tokens, out-of-range numbers,
/// and duplicates are dropped silently, and at most [`MAX_ANCHORS`]
/// survive. Anchors are excluded from the sampling population and
/// unioned back into the final game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorSet {
    numbers: Vec<u8>,
}

impl AnchorSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse raw user tokens against a format, best-effort.
    pub fn parse(raw: &[String], format: &LotteryFormat) -> Self {
        let cap = MAX_ANCHORS.min(format.draw_size);
        let mut numbers: Vec<u8> = Vec::with_capacity(cap);
        for token in raw {
            let Ok(n) = token.trim().parse::<u8>() else {
                continue;
            };
            if !format.contains(n) || numbers.contains(&n) {
                continue;
            }
            numbers.push(n);
            if numbers.len() == cap {
                break;
            }
        }
        numbers.sort_unstable();
        Self { numbers }
    }

    /// Same filtering as [`Self::parse`] for numeric input.
    pub fn from_numbers(raw: &[u8], format: &LotteryFormat) -> Self {
        let tokens: Vec<String> = raw.iter().map(|n| n.to_string()).collect();
        Self::parse(&tokens, format)
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn contains(&self, n: u8) -> bool {
        self.numbers.contains(&n)
    }
}

/// A generated candidate game: distinct numbers, sorted ascending.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GeneratedGame {
    numbers: Vec<u8>,
}

impl GeneratedGame {
    /// Build from a set of numbers; sorts ascending and drops duplicates.
    pub fn new(mut numbers: Vec<u8>) -> Self {
        numbers.sort_unstable();
        numbers.dedup();
        Self { numbers }
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn sum(&self) -> u32 {
        self.numbers.iter().map(|&n| n as u32).sum()
    }

    /// (even, odd) counts.
    pub fn parity(&self) -> (usize, usize) {
        let even = self.numbers.iter().filter(|&&n| n % 2 == 0).count();
        (even, self.numbers.len() - even)
    }

    pub fn contains(&self, n: u8) -> bool {
        self.numbers.binary_search(&n).is_ok()
    }
}

impl fmt::Display for GeneratedGame {
    /// Two-digit zero-padded, space-separated, ascending.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, n) in self.numbers.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{n:02}")?;
        }
        Ok(())
    }
}
