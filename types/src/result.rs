use serde::{Deserialize, Serialize};

/// A block observed from the chain collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub hash: String,
    pub height: u64,
    /// Block timestamp in milliseconds.
    pub timestamp: u64,
}

/// Big/Small classification of a round sum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Size {
    Big,
    Small,
}

impl Size {
    /// Display character used in combo labels.
    pub fn label(&self) -> &'static str {
        match self {
            Size::Big => "大",
            Size::Small => "小",
        }
    }
}

/// Odd/Even classification of a round sum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    pub fn label(&self) -> &'static str {
        match self {
            Parity::Odd => "单",
            Parity::Even => "双",
        }
    }
}

/// Attributes derived from a round's three source digits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultAttributes {
    pub size: Size,
    pub parity: Parity,
    /// Exactly two of the three digits match.
    pub is_pair: bool,
    /// All three digits match. A leopard is never also a pair.
    pub is_leopard: bool,
    /// Display label combining size and parity, e.g. "大双".
    pub combo: String,
}

/// The outcome of one finalized issue. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundResult {
    /// Issue number: the height of the finalizing block.
    pub issue: u64,
    /// Hash of the finalizing block, kept for display and audit.
    pub hash: String,
    /// The three digits extracted from the hash.
    pub source_numbers: [u8; 3],
    /// Digit sum, 0..=27.
    pub sum: u8,
    pub attributes: ResultAttributes,
    /// Timestamp of the finalizing block in milliseconds.
    pub timestamp: u64,
}
