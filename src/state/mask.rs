//! Selection mask: the search state.

use std::fmt;

/// Boolean vector over PSUs; position `i` selects PSU `i`.
///
/// The length equals the PSU count of the warehouse being searched and
/// never changes during a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionMask {
    bits: Vec<bool>,
}

impl SelectionMask {
    /// Mask of length `n` with nothing selected.
    pub fn empty(n: usize) -> Self {
        Self {
            bits: vec![false; n],
        }
    }

    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Mask of length `n` selecting exactly the given indices.
    ///
    /// Indices outside `0..n` are ignored.
    pub fn from_indices(n: usize, indices: &[usize]) -> Self {
        let mut mask = Self::empty(n);
        for &i in indices.iter().filter(|&&i| i < n) {
            mask.bits[i] = true;
        }
        mask
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn into_bits(self) -> Vec<bool> {
        self.bits
    }

    /// Flips position `index` in place.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn flip(&mut self, index: usize) {
        self.bits[index] = !self.bits[index];
    }

    /// Copy of this mask with position `index` flipped.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn flipped(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.flip(index);
        next
    }

    /// Number of selected PSUs.
    pub fn count_selected(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Indices of the selected PSUs in ascending order.
    pub fn selected(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
    }

    /// Number of positions where the two masks differ.
    ///
    /// Positions beyond the shorter mask count as differing.
    pub fn hamming_distance(&self, other: &SelectionMask) -> usize {
        let common = self
            .bits
            .iter()
            .zip(&other.bits)
            .filter(|(a, b)| a != b)
            .count();
        common + self.len().abs_diff(other.len())
    }
}

impl From<Vec<bool>> for SelectionMask {
    fn from(bits: Vec<bool>) -> Self {
        Self::from_bits(bits)
    }
}

impl fmt::Display for SelectionMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.bits {
            f.write_str(if b { "1" } else { "0" })?;
        }
        Ok(())
    }
}
