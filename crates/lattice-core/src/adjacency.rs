// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Static neighbor topology of the probe ring.

use crate::error::AdjacencyError;

/// Neighbor lists of the 3×3-minus-center ring, 8-connected within the block.
///
/// Probe indices run row-major from the lowest row, skipping the center:
///
/// ```text
/// 5 6 7
/// 3 · 4
/// 0 1 2
/// ```
const RING_NEIGHBORS: [&[usize]; 8] = [
    &[1, 3],
    &[0, 2, 3, 4],
    &[1, 4],
    &[0, 1, 5, 6],
    &[1, 2, 6, 7],
    &[3, 6],
    &[3, 4, 5, 7],
    &[4, 6],
];

/// Immutable mapping from probe index to an ordered list of neighbor indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborAdjacency {
    table: Vec<Vec<usize>>,
}

impl NeighborAdjacency {
    /// The default ring topology for eight probes.
    pub fn ring() -> Self {
        Self {
            table: RING_NEIGHBORS.iter().map(|n| n.to_vec()).collect(),
        }
    }

    /// Validates a custom table: every neighbor must be a probe in
    /// `0..table.len()` other than the owner.
    pub fn new(table: Vec<Vec<usize>>) -> Result<Self, AdjacencyError> {
        let len = table.len();
        for (probe, neighbors) in table.iter().enumerate() {
            for &neighbor in neighbors {
                if neighbor == probe {
                    return Err(AdjacencyError::SelfNeighbor { probe });
                }
                if neighbor >= len {
                    return Err(AdjacencyError::NeighborOutOfRange {
                        probe,
                        neighbor,
                        len,
                    });
                }
            }
        }
        Ok(Self { table })
    }

    /// Neighbors of `probe`, or `None` if the table has no entry for it.
    pub fn neighbors(&self, probe: usize) -> Option<&[usize]> {
        self.table.get(probe).map(Vec::as_slice)
    }

    /// Number of probes described by the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// `true` for an empty table.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for NeighborAdjacency {
    fn default() -> Self {
        Self::ring()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_is_symmetric() {
        let adj = NeighborAdjacency::ring();
        assert_eq!(adj.len(), 8);
        for probe in 0..adj.len() {
            for &n in adj.neighbors(probe).unwrap_or_default() {
                assert!(
                    adj.neighbors(n).unwrap_or_default().contains(&probe),
                    "{probe} -> {n} has no back edge"
                );
            }
        }
        assert!(NeighborAdjacency::new(adj.table.clone()).is_ok());
    }

    #[test]
    fn missing_entry_is_none() {
        assert!(NeighborAdjacency::ring().neighbors(8).is_none());
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(
            NeighborAdjacency::new(vec![vec![1], vec![2]]),
            Err(AdjacencyError::NeighborOutOfRange {
                probe: 1,
                neighbor: 2,
                len: 2
            })
        );
        assert_eq!(
            NeighborAdjacency::new(vec![vec![0]]),
            Err(AdjacencyError::SelfNeighbor { probe: 0 })
        );
    }
}
