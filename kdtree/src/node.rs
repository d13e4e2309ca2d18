use nalgebra::{RealField, Vector3};

use crate::{KdTree, ResultSet};

/// Leaves never hold more indices than this, unless every point of the leaf
/// shares the same coordinates.
pub const MAX_LEAF_SIZE: usize = 25;

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum Node<T> {
    /// A contiguous range of the index buffer.
    Leaf { start: usize, len: usize },
    /// Indices under `children[0]` have `coord[dim] < value`, the ones under
    /// `children[1]` have `coord[dim] >= value`.
    Branch {
        children: [usize; 2],
        dim: usize,
        value: T,
    },
}

fn bounds<T: RealField + Copy>(
    coords: &[Vector3<T>],
    indices: &[usize],
) -> (Vector3<T>, Vector3<T>) {
    let first = coords[indices[0]];
    indices[1..]
        .iter()
        .fold((first, first), |(mut min, mut max), &index| {
            let coord = &coords[index];
            for dim in 0..3 {
                if coord[dim] < min[dim] {
                    min[dim] = coord[dim]
                }
                if coord[dim] > max[dim] {
                    max[dim] = coord[dim]
                }
            }
            (min, max)
        })
}

fn cut_split<T: RealField + Copy>(
    coords: &[Vector3<T>],
    indices: &mut [usize],
    dim: usize,
    value: T,
) -> usize {
    let mut split = 0;
    for cur in 0..indices.len() {
        if coords[indices[cur]][dim] < value {
            indices.swap(split, cur);
            split += 1;
        }
    }
    split
}

/// Returns `(split, dim, value)`, or `None` if the points can't be separated.
fn cut<T: RealField + Copy>(
    coords: &[Vector3<T>],
    indices: &mut [usize],
) -> Option<(usize, usize, T)> {
    let (min, max) = bounds(coords, indices);
    let dim = (max - min).imax();
    if !(max[dim] > min[dim]) {
        return None;
    }

    let two = T::one() + T::one();
    // Halving first keeps the midpoint finite near the largest finite value.
    let value = min[dim] / two + max[dim] / two;
    let split = cut_split(coords, indices, dim, value);
    if split > 0 && split < indices.len() {
        return Some((split, dim, value));
    }

    // The midpoint rounded onto `min`; cutting at `max` still separates them.
    let value = max[dim];
    let split = cut_split(coords, indices, dim, value);
    (split > 0 && split < indices.len()).then_some((split, dim, value))
}

/// Builds the node arena over `indices`, which gets permuted so that every
/// leaf covers a contiguous range of it. The root is `nodes[0]`.
pub(crate) fn build<T: RealField + Copy>(
    coords: &[Vector3<T>],
    indices: &mut [usize],
) -> Vec<Node<T>> {
    let mut nodes = vec![Node::Leaf {
        start: 0,
        len: indices.len(),
    }];

    let mut stack = vec![(0, 0, indices.len())];
    while let Some((node, start, end)) = stack.pop() {
        if end - start <= MAX_LEAF_SIZE {
            continue;
        }
        let Some((split, dim, value)) = cut(coords, &mut indices[start..end]) else {
            continue;
        };

        let left = nodes.len();
        nodes.push(Node::Leaf { start, len: split });
        nodes.push(Node::Leaf {
            start: start + split,
            len: end - start - split,
        });
        nodes[node] = Node::Branch {
            children: [left, left + 1],
            dim,
            value,
        };

        stack.push((left + 1, start + split, end));
        stack.push((left, start, start + split));
    }
    nodes
}

impl<'a, T: RealField + Copy> KdTree<'a, T> {
    pub(crate) fn radius_search<F>(&self, pivot: &Vector3<T>, radius: T, mut visit: F)
    where
        F: FnMut(T, usize),
    {
        if self.indices.is_empty() {
            return;
        }

        let mut stack = vec![0];
        while let Some(node) = stack.pop() {
            match self.nodes[node] {
                Node::Leaf { start, len } => {
                    for &index in &self.indices[start..][..len] {
                        let distance = (self.coords[index] - pivot).norm();
                        if distance < radius {
                            visit(distance, index)
                        }
                    }
                }
                Node::Branch {
                    children: [left, right],
                    dim,
                    value,
                } => {
                    if pivot[dim] - radius <= value {
                        stack.push(left)
                    }
                    if pivot[dim] + radius >= value {
                        stack.push(right)
                    }
                }
            }
        }
    }

    /// Pushes candidates into `result`, skipping subtrees that lie farther
    /// than its current maximum key once it is full.
    pub fn search(&self, pivot: &Vector3<T>, result: &mut impl ResultSet<Key = T, Value = usize>) {
        if self.indices.is_empty() {
            return;
        }

        let mut stack = vec![(0, T::zero())];
        while let Some((node, min_distance)) = stack.pop() {
            if result.is_full() && result.max_key().map_or(false, |max| *max < min_distance) {
                continue;
            }

            match self.nodes[node] {
                Node::Leaf { start, len } => {
                    for &index in &self.indices[start..][..len] {
                        let distance = (self.coords[index] - pivot).norm();
                        result.push(distance, index);
                    }
                }
                Node::Branch {
                    children: [left, right],
                    dim,
                    value,
                } => {
                    let diff = pivot[dim] - value;
                    let (next, other) = if diff < T::zero() {
                        (left, right)
                    } else {
                        (right, left)
                    };
                    stack.push((other, diff.abs()));
                    stack.push((next, min_distance));
                }
            }
        }
    }
}
