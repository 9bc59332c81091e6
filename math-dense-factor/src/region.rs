//! Indexed region vector
//!
//! The only structure crossing the FTRAN/BTRAN boundary. It stores:
//! - `elements`: dense backing array of `capacity` values
//! - `indices`: occupied positions, in insertion order
//! - `packed`: layout of the values
//!
//! In unpacked mode the value for index `i` lives at `elements[i]`. In packed
//! mode the `k`-th value lives at `elements[k]`, aligned with `indices[k]`.
//! Either way every other slot of `elements` is zero.

use crate::traits::FactorScalar;
use ndarray::Array1;

/// Sparse/dense hybrid vector used as solve input and output
#[derive(Debug, Clone, PartialEq)]
pub struct RegionVector<T: FactorScalar> {
    elements: Vec<T>,
    indices: Vec<usize>,
    packed: bool,
}

impl<T: FactorScalar> RegionVector<T> {
    /// Create an empty unpacked region able to address `capacity` rows
    pub fn new(capacity: usize) -> Self {
        Self {
            elements: vec![T::zero(); capacity],
            indices: Vec::with_capacity(capacity),
            packed: false,
        }
    }

    /// Create an unpacked region from a dense array
    ///
    /// Only stores entries with magnitude > threshold
    pub fn from_array(dense: &Array1<T>, threshold: T) -> Self {
        let mut region = Self::new(dense.len());
        for (i, &value) in dense.iter().enumerate() {
            if value.magnitude() > threshold {
                region.insert(i, value);
            }
        }
        region
    }

    /// Create a packed region from index/value pairs
    ///
    /// # Panics
    ///
    /// Panics if `indices` and `values` differ in length or an index is out of
    /// range.
    pub fn from_packed(capacity: usize, indices: &[usize], values: &[T]) -> Self {
        assert_eq!(
            indices.len(),
            values.len(),
            "indices and values must have the same length"
        );
        let mut region = Self::new(capacity.max(values.len()));
        region.packed = true;
        for (&index, &value) in indices.iter().zip(values) {
            assert!(index < capacity, "index {index} out of range");
            region.elements[region.indices.len()] = value;
            region.indices.push(index);
        }
        region
    }

    /// Number of addressable rows
    pub fn capacity(&self) -> usize {
        self.elements.len()
    }

    /// Number of occupied entries
    pub fn num_elements(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn is_packed(&self) -> bool {
        self.packed
    }

    /// Switch layout.
    ///
    /// # Panics
    ///
    /// Panics if the region is not empty.
    pub fn set_packed_mode(&mut self, packed: bool) {
        assert!(
            self.indices.is_empty(),
            "packed mode can only change on an empty region"
        );
        self.packed = packed;
    }

    /// Dense backing array
    pub fn dense(&self) -> &[T] {
        &self.elements
    }

    /// Occupied indices
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut [T], &mut Vec<usize>) {
        (&mut self.elements, &mut self.indices)
    }

    /// Add a value at a currently unoccupied index
    ///
    /// # Panics
    ///
    /// Panics in unpacked mode if `index` is already occupied.
    pub fn insert(&mut self, index: usize, value: T) {
        if self.packed {
            self.elements[self.indices.len()] = value;
        } else {
            assert!(
                self.elements[index].is_zero(),
                "index {index} is already occupied"
            );
            self.elements[index] = value;
        }
        self.indices.push(index);
    }

    /// Value stored for `index`, zero when not occupied
    pub fn value_at(&self, index: usize) -> T {
        if self.packed {
            self.indices
                .iter()
                .position(|&i| i == index)
                .map_or_else(T::zero, |k| self.elements[k])
        } else {
            self.elements.get(index).copied().unwrap_or_else(T::zero)
        }
    }

    /// Iterate over `(index, value)` pairs in index-list order
    pub fn iter(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.indices.iter().enumerate().map(move |(k, &index)| {
            if self.packed {
                (index, self.elements[k])
            } else {
                (index, self.elements[index])
            }
        })
    }

    /// Zero the occupied entries and forget them
    pub fn clear(&mut self) {
        if self.packed {
            let count = self.indices.len();
            self.elements[..count].fill(T::zero());
        } else {
            for &index in &self.indices {
                self.elements[index] = T::zero();
            }
        }
        self.indices.clear();
    }

    /// Dense copy of length `len`, whatever the layout
    pub fn to_array(&self, len: usize) -> Array1<T> {
        let mut dense = Array1::from_elem(len, T::zero());
        for (index, value) in self.iter() {
            dense[index] = value;
        }
        dense
    }

    /// Whether every slot outside the occupied entries is exactly zero
    pub fn is_clean(&self) -> bool {
        let mut occupied = vec![false; self.elements.len()];
        if self.packed {
            occupied[..self.indices.len()].fill(true);
        } else {
            for &index in &self.indices {
                occupied[index] = true;
            }
        }
        self.elements
            .iter()
            .zip(&occupied)
            .all(|(value, &used)| used || value.is_zero())
    }
}
