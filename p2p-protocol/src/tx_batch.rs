//! Sub-framing for batched transactions inside a single protobuf bytes field.
//!
//! ## Wire format
//!
//! ```text
//! [4 bytes: len (u32-be)][len bytes: tx 0][4 bytes: len (u32-be)][len bytes: tx 1]...
//! ```
//!
//! Decoding is attacker-facing: it never materializes more than
//! [`MAX_TRANSACTIONS_PER_BATCH`] entries, whatever the buffer contains.
//! The business-level limit (`max_transactions_per_request`) is lower and
//! enforced by request validation.

use crate::error::{P2pError, Result};

/// Hard cap on decoded entries, independent of any schema limit.
pub const MAX_TRANSACTIONS_PER_BATCH: usize = 1_000;

const LENGTH_PREFIX_LEN: usize = 4;

/// Pack `transactions` into one contiguous buffer, preserving order.
pub fn pack<T: AsRef<[u8]>>(transactions: &[T]) -> Result<Vec<u8>> {
    let capacity = transactions.iter().fold(0usize, |acc, tx| {
        acc.saturating_add(LENGTH_PREFIX_LEN)
            .saturating_add(tx.as_ref().len())
    });
    let mut buf = Vec::with_capacity(capacity);
    for tx in transactions {
        let tx = tx.as_ref();
        let len = u32::try_from(tx.len()).map_err(|_| P2pError::TransactionTooLarge(tx.len()))?;
        buf.extend_from_slice(&len.to_be_bytes());
        buf.extend_from_slice(tx);
    }
    Ok(buf)
}

/// Unpack a buffer produced by [`pack`].
///
/// - Fewer than four trailing bytes are ignored. Exactly four bytes are a
///   record: a trailing zero length yields an empty transaction.
/// - A length prefix claiming more bytes than remain is a hard error.
/// - Scanning stops after [`MAX_TRANSACTIONS_PER_BATCH`] entries.
///
/// Every returned transaction owns its bytes.
pub fn unpack(buf: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut transactions = Vec::new();
    let mut rest = buf;
    let mut offset = 0usize;

    while transactions.len() < MAX_TRANSACTIONS_PER_BATCH {
        let Some((prefix, body)) = rest.split_first_chunk::<LENGTH_PREFIX_LEN>() else {
            break;
        };
        let declared = u32::from_be_bytes(*prefix) as usize;
        if declared > body.len() {
            return Err(P2pError::TruncatedTransaction {
                offset,
                declared,
                remaining: body.len(),
            });
        }
        let (tx, tail) = body.split_at(declared);
        transactions.push(tx.to_vec());
        offset = offset
            .saturating_add(LENGTH_PREFIX_LEN)
            .saturating_add(declared);
        rest = tail;
    }

    Ok(transactions)
}
