//! Contiguous-block layout over retained linear indices.
//!
//! After a reduction, the surviving linear indices of the full enumeration
//! are grouped into maximal runs of consecutive integers and compacted into
//! a dense layout for downstream operator assembly.

use crate::error::{BasisError, Result};

/// An inclusive range `[start, end]` of linear indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// First linear index of the run
    pub start: usize,
    /// Last linear index of the run (inclusive)
    pub end: usize,
}

#[allow(clippy::len_without_is_empty)]
impl Block {
    /// Number of indices covered by the block. The range is inclusive, so
    /// a block always covers at least one index.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Enumerate the indices covered by the block
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        self.start..=self.end
    }
}

fn check_sorted(indices: &[usize]) -> Result<()> {
    if let Some(position) = indices.windows(2).position(|w| w[1] <= w[0]) {
        return Err(BasisError::UnsortedIndices {
            position: position + 1,
        });
    }
    Ok(())
}

/// Sorted linear indices in `[0, max_index]` that are *not* in `retained`.
///
/// Identifies which basis elements were pruned by a reduction.
///
/// # Example
/// ```
/// use truncdyn_basis::complement_indices;
///
/// let pruned = complement_indices(&[5, 6, 8, 9, 15, 25], 27).unwrap();
/// assert_eq!(
///     pruned,
///     vec![0, 1, 2, 3, 4, 7, 10, 11, 12, 13, 14, 16, 17, 18, 19, 20, 21, 22, 23, 24, 26, 27]
/// );
/// ```
///
/// # Errors
///
/// [`BasisError::UnsortedIndices`] if `retained` is not strictly
/// increasing, [`BasisError::IndexOutOfRange`] if it contains an index
/// above `max_index`.
pub fn complement_indices(retained: &[usize], max_index: usize) -> Result<Vec<usize>> {
    check_sorted(retained)?;
    if let Some(&value) = retained.last() {
        if value > max_index {
            return Err(BasisError::IndexOutOfRange {
                value,
                max: max_index,
            });
        }
    }

    let mut complement = Vec::with_capacity(max_index + 1 - retained.len());
    let mut kept = retained.iter().copied().peekable();
    for i in 0..=max_index {
        if kept.peek() == Some(&i) {
            kept.next();
        } else {
            complement.push(i);
        }
    }
    Ok(complement)
}

/// Group sorted linear indices into maximal runs of consecutive integers.
///
/// Empty input yields empty output.
///
/// # Example
/// ```
/// use truncdyn_basis::{contiguous_blocks, Block};
///
/// let blocks =
///     contiguous_blocks(&[0, 1, 2, 3, 4, 7, 8, 9, 10, 11, 14, 15, 16, 17, 18]).unwrap();
/// assert_eq!(
///     blocks,
///     vec![
///         Block { start: 0, end: 4 },
///         Block { start: 7, end: 11 },
///         Block { start: 14, end: 18 },
///     ]
/// );
/// ```
///
/// # Errors
///
/// [`BasisError::UnsortedIndices`] if `indices` is not strictly increasing.
pub fn contiguous_blocks(indices: &[usize]) -> Result<Vec<Block>> {
    check_sorted(indices)?;
    let mut blocks = Vec::new();
    let mut iter = indices.iter().copied();
    let Some(first) = iter.next() else {
        return Ok(blocks);
    };
    let mut start = first;
    let mut end = first;
    for i in iter {
        if i != end + 1 {
            blocks.push(Block { start, end });
            start = i;
        }
        end = i;
    }
    blocks.push(Block { start, end });
    Ok(blocks)
}

/// Remap blocks to a dense 0-based layout, preserving each block's length
/// and order.
///
/// Each compacted block starts one past the previous block's inclusive
/// end, so consecutive blocks abut and the total compacted span equals the
/// sum of the block lengths.
///
/// # Example
/// ```
/// use truncdyn_basis::{compact_ranges, Block};
///
/// let compacted = compact_ranges(&[
///     Block { start: 0, end: 4 },
///     Block { start: 7, end: 11 },
///     Block { start: 14, end: 22 },
/// ]);
/// assert_eq!(
///     compacted,
///     vec![
///         Block { start: 0, end: 4 },
///         Block { start: 5, end: 9 },
///         Block { start: 10, end: 18 },
///     ]
/// );
/// ```
pub fn compact_ranges(blocks: &[Block]) -> Vec<Block> {
    let mut compacted = Vec::with_capacity(blocks.len());
    let mut start = 0usize;
    for block in blocks {
        let end = start + (block.end - block.start);
        compacted.push(Block { start, end });
        start = end + 1;
    }
    compacted
}
