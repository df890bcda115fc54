use arrayvec::ArrayVec;

/// Splits a flat iterator into groups of up to N consecutive elements.
/// Only the last group can be shorter than N, no group is empty.
pub fn lane_windows<T, const N: usize>(
    values: impl IntoIterator<Item = T>,
) -> impl Iterator<Item = ArrayVec<T, N>> {
    let mut iter = values.into_iter();
    std::iter::from_fn(move || {
        let window: ArrayVec<T, N> = iter.by_ref().take(N).collect();
        if window.is_empty() { None } else { Some(window) }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;
    use test_strategy::proptest;

    #[test]
    fn exact_fill() {
        let result: Vec<_> = lane_windows::<_, 4>(0..8).collect();
        assert!(result.len() == 2);
        assert!(result[0].as_slice() == [0, 1, 2, 3]);
        assert!(result[1].as_slice() == [4, 5, 6, 7]);
    }

    #[test]
    fn partial_fill() {
        let result: Vec<_> = lane_windows::<_, 4>(0..6).collect();
        assert!(result.len() == 2);
        assert!(result[1].as_slice() == [4, 5]);
    }

    #[test]
    fn empty() {
        assert!(lane_windows::<u32, 4>(std::iter::empty()).next().is_none());
    }

    #[proptest]
    fn keeps_order(#[strategy(0usize..100)] count: usize) {
        let windows: Vec<_> = lane_windows::<_, 8>(0..count).collect();
        assert!(windows.len() == count.div_ceil(8));
        assert!(windows.iter().all(|w| !w.is_empty()));
        let flat: Vec<_> = windows.into_iter().flatten().collect();
        assert!(flat == (0..count).collect::<Vec<_>>());
    }
}
