//! Deterministic derivation of a round result from a block hash.
//!
//! The algorithm: keep only the digits of the hash, take the last three as
//! (a, b, c), and sum them. Same hash in, same result out, always; this is
//! what makes every draw independently checkable against the chain.

use pc28_types::constants::BIG_THRESHOLD;
use pc28_types::{Block, Parity, ResultAttributes, RoundResult, Size};

/// Derive the result for an issue from its finalizing block hash.
pub fn derive(hash: &str, issue: u64, timestamp: u64) -> RoundResult {
    let mut digits: Vec<u8> = hash
        .bytes()
        .filter(|b| b.is_ascii_digit())
        .map(|b| b - b'0')
        .collect();

    // Pathological fallback: a hash with fewer than 3 digits is left-padded
    // with zeros so derivation still yields three source numbers.
    while digits.len() < 3 {
        digits.insert(0, 0);
    }

    let a = digits[digits.len() - 3];
    let b = digits[digits.len() - 2];
    let c = digits[digits.len() - 1];
    let sum = a + b + c;

    let size = if sum >= BIG_THRESHOLD {
        Size::Big
    } else {
        Size::Small
    };
    let parity = if sum % 2 == 0 {
        Parity::Even
    } else {
        Parity::Odd
    };
    let is_leopard = a == b && b == c;
    let is_pair = !is_leopard && (a == b || b == c || a == c);

    RoundResult {
        issue,
        hash: hash.to_string(),
        source_numbers: [a, b, c],
        sum,
        attributes: ResultAttributes {
            size,
            parity,
            is_pair,
            is_leopard,
            combo: format!("{}{}", size.label(), parity.label()),
        },
        timestamp,
    }
}

/// Derive the result for a finalizing block; the issue is its height.
pub fn derive_block(block: &Block) -> RoundResult {
    derive(&block.hash, block.height, block.timestamp)
}
