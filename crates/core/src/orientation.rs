//! The six axis-aligned orientations of a box.
//!
//! An orientation permutes a `(length, breadth, height)` triple. Only the
//! dimensions are permuted; faces are not otherwise distinguished.

use nalgebra::Vector3;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the six permutations of `(length, breadth, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// `(l, b, h)`
    #[default]
    Identity,
    /// `(b, l, h)`
    SwapLengthBreadth,
    /// `(l, h, b)`
    SwapBreadthHeight,
    /// `(h, b, l)`
    SwapLengthHeight,
    /// `(h, l, b)`
    RotateForward,
    /// `(b, h, l)`
    RotateBackward,
}

impl Orientation {
    /// All orientations in index order.
    pub const ALL: [Orientation; 6] = [
        Orientation::Identity,
        Orientation::SwapLengthBreadth,
        Orientation::SwapBreadthHeight,
        Orientation::SwapLengthHeight,
        Orientation::RotateForward,
        Orientation::RotateBackward,
    ];

    /// Returns the orientation with the given index (0..6).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the index of this orientation (0..6).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Source axis for each output axis: `out[i] = in[perm[i]]`.
    pub fn permutation(self) -> [usize; 3] {
        match self {
            Orientation::Identity => [0, 1, 2],
            Orientation::SwapLengthBreadth => [1, 0, 2],
            Orientation::SwapBreadthHeight => [0, 2, 1],
            Orientation::SwapLengthHeight => [2, 1, 0],
            Orientation::RotateForward => [2, 0, 1],
            Orientation::RotateBackward => [1, 2, 0],
        }
    }

    /// The orientation that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Orientation::RotateForward => Orientation::RotateBackward,
            Orientation::RotateBackward => Orientation::RotateForward,
            swap => swap,
        }
    }

    /// Permutes a dimension triple.
    pub fn apply(self, dims: &Vector3<f64>) -> Vector3<f64> {
        let [i, j, k] = self.permutation();
        Vector3::new(dims[i], dims[j], dims[k])
    }

    /// Permutes integer per-axis counts the same way as dimensions.
    pub fn apply_counts(self, counts: [usize; 3]) -> [usize; 3] {
        let [i, j, k] = self.permutation();
        [counts[i], counts[j], counts[k]]
    }

    /// Restores the un-rotated triple from a triple produced by [`apply`](Self::apply).
    pub fn invert(self, dims: &Vector3<f64>) -> Vector3<f64> {
        self.inverse().apply(dims)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
