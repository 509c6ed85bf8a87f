//! Position Assigner
//!
//! Positions are plain ordinals among siblings. New entities go to the end
//! (`append_position`), and any sequence that was spliced is rewritten to
//! `0..n` (`renumber`) so positions never drift apart.

use crate::shared::board::Positioned;

/// Position for an entity appended after `existing_siblings`
pub fn append_position<T>(existing_siblings: &[T]) -> u32 {
    u32::try_from(existing_siblings.len()).unwrap_or(u32::MAX)
}

/// Rewrite positions to `0..n` following the given order
pub fn renumber<T: Positioned>(ordered: Vec<T>) -> Vec<T> {
    ordered
        .into_iter()
        .enumerate()
        .map(|(index, mut entity)| {
            entity.set_position(u32::try_from(index).unwrap_or(u32::MAX));
            entity
        })
        .collect()
}

/// Sort siblings by position
///
/// The sort is stable, so equal positions keep their insertion order.
pub fn sort_by_position<T: Positioned>(entities: &mut [T]) {
    entities.sort_by_key(|entity| entity.position());
}

/// True when positions are exactly `0, 1, .., n-1` in sequence order
pub fn is_contiguous<T: Positioned>(entities: &[T]) -> bool {
    entities
        .iter()
        .enumerate()
        .all(|(index, entity)| entity.position() as usize == index)
}
