//! Lottery format registry.
//!
//! Each supported lottery is described by an immutable [`LotteryFormat`]:
//! the number range, how many balls an official draw contains, and how
//! many numbers a player may select on one ticket. Formats whose stored
//! records deviate from the plain "one pool, one draw per record" layout
//! carry a [`DrawShape`] capability, so statistics code can normalize a
//! record without ever comparing format names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a format's draw records are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawShape {
    /// One pool of distinct numbers, one draw per record.
    SinglePool,
    /// The record stores two sequential draws concatenated. Only the
    /// first `draw_size` numbers are canonical for statistics; the full
    /// order is preserved on the record itself.
    DualDraw,
    /// Fixed-width digit columns. A record may repeat digits, and a
    /// ticket is one digit per column rather than a distinct set.
    PositionalDigits { columns: usize },
}

impl DrawShape {
    /// Whether pool-style game synthesis (a distinct, sorted set of
    /// numbers) applies to this shape.
    pub fn supports_pool_games(&self) -> bool {
        !matches!(self, DrawShape::PositionalDigits { .. })
    }
}

/// Immutable rules for one lottery format. Constructed once at startup
/// and passed by reference into every component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotteryFormat {
    pub key: String,
    pub name: String,
    pub min_num: u8,
    pub max_num: u8,
    /// Balls per official draw; also the default game size.
    pub draw_size: usize,
    pub min_selectable: usize,
    pub max_selectable: usize,
    pub shape: DrawShape,
}

/// Errors from format lookup and construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("unknown lottery format '{0}'")]
    UnknownFormat(String),

    #[error("invalid format '{key}': {reason}")]
    InvalidFormat { key: String, reason: String },
}

impl LotteryFormat {
    /// Build a format, enforcing the structural invariants.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        key: &str,
        name: &str,
        min_num: u8,
        max_num: u8,
        draw_size: usize,
        min_selectable: usize,
        max_selectable: usize,
        shape: DrawShape,
    ) -> Result<Self, FormatError> {
        let invalid = |reason: &str| FormatError::InvalidFormat {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        if min_num >= max_num {
            return Err(invalid("min_num must be below max_num"));
        }
        if draw_size == 0 {
            return Err(invalid("draw_size must be at least 1"));
        }
        let range_size = (max_num - min_num) as usize + 1;
        if shape.supports_pool_games() {
            if draw_size > range_size {
                return Err(invalid("draw_size exceeds the number range"));
            }
            if min_selectable < draw_size {
                return Err(invalid("min_selectable below draw_size"));
            }
            if max_selectable > range_size {
                return Err(invalid("max_selectable exceeds the number range"));
            }
        }
        if min_selectable > max_selectable {
            return Err(invalid("min_selectable above max_selectable"));
        }

        Ok(Self {
            key: key.to_string(),
            name: name.to_string(),
            min_num,
            max_num,
            draw_size,
            min_selectable,
            max_selectable,
            shape,
        })
    }

    /// Count of numbers in the format's range.
    pub fn range_size(&self) -> usize {
        (self.max_num - self.min_num) as usize + 1
    }

    /// Every selectable number, ascending.
    pub fn universe(&self) -> Vec<u8> {
        (self.min_num..=self.max_num).collect()
    }

    pub fn contains(&self, n: u8) -> bool {
        n >= self.min_num && n <= self.max_num
    }

    /// Canonical view of a stored record for statistics, dispatched on
    /// the draw shape. Dual-draw records are truncated to the first
    /// draw; everything else passes through whole.
    pub fn canonical<'a>(&self, numbers: &'a [u8]) -> &'a [u8] {
        match self.shape {
            DrawShape::DualDraw => &numbers[..self.draw_size.min(numbers.len())],
            DrawShape::SinglePool | DrawShape::PositionalDigits { .. } => numbers,
        }
    }

    /// Balls a canonical record is expected to hold.
    pub fn canonical_len(&self) -> usize {
        match self.shape {
            DrawShape::PositionalDigits { columns } => columns,
            DrawShape::SinglePool | DrawShape::DualDraw => self.draw_size,
        }
    }
}

/// Static table of supported formats.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: Vec<LotteryFormat>,
}

impl FormatRegistry {
    /// The built-in formats.
    pub fn builtin() -> Self {
        let formats = vec![
            LotteryFormat::new("megasena", "Mega-Sena", 1, 60, 6, 6, 20, DrawShape::SinglePool)
                .expect("builtin format is valid"),
            LotteryFormat::new("quina", "Quina", 1, 80, 5, 5, 15, DrawShape::SinglePool)
                .expect("builtin format is valid"),
            LotteryFormat::new("lotofacil", "Lotofácil", 1, 25, 15, 15, 20, DrawShape::SinglePool)
                .expect("builtin format is valid"),
            LotteryFormat::new("duplasena", "Dupla Sena", 1, 50, 6, 6, 15, DrawShape::DualDraw)
                .expect("builtin format is valid"),
        ];
        Self { formats }
    }

    /// Registry extended with a custom format (replaces an existing key).
    pub fn with_format(mut self, format: LotteryFormat) -> Self {
        self.formats.retain(|f| f.key != format.key);
        self.formats.push(format);
        self
    }

    pub fn get(&self, key: &str) -> Result<&LotteryFormat, FormatError> {
        self.formats
            .iter()
            .find(|f| f.key == key)
            .ok_or_else(|| FormatError::UnknownFormat(key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LotteryFormat> {
        self.formats.iter()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
