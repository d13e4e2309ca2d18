mod node;
mod result;

use nalgebra::{RealField, Scalar, Vector3};
use node::Node;
use pcseg_common::search::{SearchType, Searcher};

pub use self::{node::MAX_LEAF_SIZE, result::*};

/// A static kd-tree over a borrowed slice of points.
///
/// Every node cuts the bounding box of its points in half along the axis of
/// greatest extent. Nodes live in a flat arena and refer to their children by
/// position; leaves refer to contiguous ranges of a single permutation of the
/// point indices.
#[derive(Debug, Clone)]
pub struct KdTree<'a, T: Scalar> {
    coords: &'a [Vector3<T>],
    nodes: Vec<Node<T>>,
    indices: Vec<usize>,
}

impl<'a, T: RealField + Copy> KdTree<'a, T> {
    pub fn new(coords: &'a [Vector3<T>]) -> Self {
        let mut indices = (0..coords.len()).collect::<Vec<_>>();
        let nodes = node::build(coords, &mut indices);
        KdTree {
            coords,
            nodes,
            indices,
        }
    }

    #[inline]
    pub fn points(&self) -> &'a [Vector3<T>] {
        self.coords
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Calls `f` on every index `i` such that `|pivot - points[i]| < radius`.
    ///
    /// # Example
    ///
    /// ```
    /// use nalgebra::Vector3;
    /// use pcseg_kdtree::KdTree;
    ///
    /// let points = [Vector3::new(0., 0., 0.), Vector3::new(3., 0., 0.)];
    /// let tree = KdTree::new(&points);
    /// let mut found = Vec::new();
    /// tree.for_each_neighbor(&Vector3::new(0.5, 0., 0.), 1., |index| found.push(index));
    /// assert_eq!(found, vec![0]);
    /// ```
    pub fn for_each_neighbor<F>(&self, pivot: &Vector3<T>, radius: T, mut f: F)
    where
        F: FnMut(usize),
    {
        self.radius_search(pivot, radius, |_, index| f(index))
    }

    /// Iterates over the index ranges of all leaves.
    pub fn leaves(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.nodes.iter().filter_map(|node| match *node {
            Node::Leaf { start, len } => Some(&self.indices[start..][..len]),
            Node::Branch { .. } => None,
        })
    }
}

impl<'a, T: RealField + Copy> Searcher<'a, T> for KdTree<'a, T> {
    fn search(&self, pivot: &Vector3<T>, ty: SearchType<T>, result: &mut Vec<(T, usize)>) {
        result.clear();
        match ty {
            SearchType::Knn(num) => {
                let mut rs = KnnResultSet::new(num);
                KdTree::search(self, pivot, &mut rs);
                result.extend(rs);
            }
            SearchType::Radius(radius) => {
                self.radius_search(pivot, radius, |distance, index| result.push((distance, index)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, RngCore, SeedableRng};

    use super::*;

    fn unit(rng: &mut StdRng) -> f64 {
        rng.next_u32() as f64 / u32::MAX as f64
    }

    fn random_cloud(rng: &mut StdRng, num: usize) -> Vec<Vector3<f64>> {
        (0..num)
            .map(|_| Vector3::new(unit(rng), unit(rng) * 2., unit(rng) * 0.5))
            .collect()
    }

    fn brute_radius(points: &[Vector3<f64>], pivot: &Vector3<f64>, radius: f64) -> Vec<usize> {
        { 0..points.len() }
            .filter(|&index| (points[index] - pivot).norm() < radius)
            .collect()
    }

    fn collect_children(tree: &KdTree<f64>, node: usize, out: &mut Vec<usize>) {
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            match tree.nodes[node] {
                Node::Leaf { start, len } => out.extend_from_slice(&tree.indices[start..][..len]),
                Node::Branch {
                    children: [left, right],
                    ..
                } => stack.extend([left, right]),
            }
        }
    }

    #[test]
    fn test_radius_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = random_cloud(&mut rng, 2000);
        let tree = KdTree::new(&points);

        for _ in 0..100 {
            let pivot = Vector3::new(unit(&mut rng), unit(&mut rng) * 2., unit(&mut rng));
            let radius = unit(&mut rng) * 0.3;

            let mut found = Vec::new();
            tree.for_each_neighbor(&pivot, radius, |index| found.push(index));
            found.sort_unstable();
            assert_eq!(found, brute_radius(&points, &pivot, radius));
        }
    }

    #[test]
    fn test_radius_independent_of_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let points = random_cloud(&mut rng, 500);
        let reversed = points.iter().rev().cloned().collect::<Vec<_>>();
        let tree = KdTree::new(&points);
        let tree_rev = KdTree::new(&reversed);

        let pivot = Vector3::new(0.5, 1., 0.25);
        let mut found = Vec::new();
        tree.for_each_neighbor(&pivot, 0.4, |index| found.push(index));
        let mut found_rev = Vec::new();
        tree_rev.for_each_neighbor(&pivot, 0.4, |index| found_rev.push(points.len() - 1 - index));

        found.sort_unstable();
        found_rev.sort_unstable();
        assert!(!found.is_empty());
        assert_eq!(found, found_rev);
    }

    #[test]
    fn test_leaves_are_bounded_permutation() {
        let mut rng = StdRng::seed_from_u64(3);
        let points = random_cloud(&mut rng, 1234);
        let tree = KdTree::new(&points);

        let mut seen = vec![false; points.len()];
        for leaf in tree.leaves() {
            assert!(leaf.len() <= MAX_LEAF_SIZE);
            for &index in leaf {
                assert!(!seen[index], "index {} appears twice", index);
                seen[index] = true;
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn test_partition_invariant() {
        let mut rng = StdRng::seed_from_u64(5);
        let points = random_cloud(&mut rng, 800);
        let tree = KdTree::new(&points);

        for node in &tree.nodes {
            if let Node::Branch {
                children: [left, right],
                dim,
                value,
            } = *node
            {
                let mut under = Vec::new();
                collect_children(&tree, left, &mut under);
                assert!(under.iter().all(|&i| points[i][dim] < value));

                under.clear();
                collect_children(&tree, right, &mut under);
                assert!(under.iter().all(|&i| points[i][dim] >= value));
            }
        }
    }

    #[test]
    fn test_cut_along_largest_extent() {
        let points = (0..100)
            .map(|i| Vector3::new(i as f64 * 0.01, i as f64, 0.))
            .collect::<Vec<_>>();
        let tree = KdTree::new(&points);
        match tree.nodes[0] {
            Node::Branch { dim, value, .. } => {
                assert_eq!(dim, 1);
                assert_eq!(value, 49.5);
            }
            Node::Leaf { .. } => panic!("root should be a branch"),
        }
    }

    #[test]
    fn test_knn_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(13);
        let points = random_cloud(&mut rng, 1500);
        let tree = KdTree::new(&points);
        let mut result = Vec::new();

        for _ in 0..50 {
            let pivot = Vector3::new(unit(&mut rng), unit(&mut rng) * 2., unit(&mut rng));
            Searcher::search(&tree, &pivot, SearchType::Knn(20), &mut result);
            let mut found = result.iter().map(|(d, _)| *d).collect::<Vec<_>>();
            found.sort_by(|a, b| a.partial_cmp(b).unwrap());

            let mut expected = points.iter().map(|p| (p - pivot).norm()).collect::<Vec<_>>();
            expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
            expected.truncate(20);
            assert_eq!(found, expected);
        }
    }

    #[test]
    fn test_huge_coordinates() {
        let points = (0..40)
            .map(|i| Vector3::new(3.0e38f32 + i as f32 * 1e31, 0., 0.))
            .collect::<Vec<_>>();
        let tree = KdTree::new(&points);

        let mut seen = vec![false; points.len()];
        for leaf in tree.leaves() {
            assert!(leaf.len() <= MAX_LEAF_SIZE);
            for &index in leaf {
                assert!(!seen[index]);
                seen[index] = true;
            }
        }
        assert!(seen.into_iter().all(|seen| seen));
    }

    #[test]
    fn test_duplicated_points() {
        let points = vec![Vector3::new(1., 1., 1.); 60];
        let tree = KdTree::new(&points);
        assert_eq!(tree.leaves().count(), 1);

        let mut count = 0;
        tree.for_each_neighbor(&Vector3::new(1., 1., 1.), 0.1, |_| count += 1);
        assert_eq!(count, 60);
    }

    #[test]
    fn test_empty() {
        let points: Vec<Vector3<f32>> = Vec::new();
        let tree = KdTree::new(&points);
        assert!(tree.is_empty());

        let mut result = vec![(0., 0)];
        Searcher::search(&tree, &Vector3::zeros(), SearchType::Radius(10.), &mut result);
        assert!(result.is_empty());
    }
}
