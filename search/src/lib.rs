mod brute;

use nalgebra::{RealField, Vector3};
use pcseg_common::search::Searcher;
pub use pcseg_kdtree::*;

pub use self::brute::*;

/// Picks a linear scan for inputs that would fit in a single kd-tree leaf,
/// and a kd-tree otherwise. Both answer every query identically.
#[inline]
pub fn __searcher<'a, 'b, T>(
    input: &'a [Vector3<T>],
    storage: &'b mut (Option<BruteForce<'a, T>>, Option<KdTree<'a, T>>),
) -> &'b dyn Searcher<'a, T>
where
    T: RealField + Copy,
{
    if input.len() <= MAX_LEAF_SIZE {
        storage.0.insert(BruteForce::new(input)) as &dyn Searcher<'a, T>
    } else {
        storage.1.insert(KdTree::new(input)) as &dyn Searcher<'a, T>
    }
}

#[macro_export]
macro_rules! searcher {
    ($ident:ident in $input:expr) => {
        let mut __storage = (None, None);
        let $ident = $crate::__searcher($input, &mut __storage);
    };
}
