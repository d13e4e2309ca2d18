/// A filter that keeps some parts of input, for example, some elements of an
/// array, and transfers them to the output.
pub trait Filter<T: ?Sized> {
    /// Thus, the array output are not necessary at all times, but the indices
    /// in the input is returned in order to reduce the memory usage.
    fn filter_indices(&mut self, input: &T) -> Vec<usize>;

    /// Returns both the kept and the removed indices.
    fn filter_all_indices(&mut self, input: &T) -> (Vec<usize>, Vec<usize>) {
        (self.filter_indices(input), Vec::new())
    }
}
