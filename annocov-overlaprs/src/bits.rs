use num_traits::{PrimInt, Unsigned, identities::zero};

use annocov_core::models::Interval;

/// A Binary Interval Search index over closed intervals.
///
/// From the journal article: <https://academic.oup.com/bioinformatics/article/29/1/1/273289>
///
/// Intervals are kept sorted by start. A query binary searches for the first interval
/// whose start is at least `query_start - max_len` (no earlier interval can reach the
/// query) and then scans forward until starts pass the query end. Both the stored
/// intervals and the query are inclusive on both ends.
///
/// # Examples
///
/// ```
/// use annocov_overlaprs::{Bits, Interval};
///
/// let exons = vec![
///     Interval { start: 100u32, end: 200, val: "exon1" },
///     Interval { start: 400, end: 500, val: "exon2" },
///     Interval { start: 450, end: 600, val: "exon3" },
/// ];
///
/// let bits = Bits::build(exons);
///
/// assert_eq!(bits.find_iter(200, 200).count(), 1);
/// assert_eq!(bits.find_iter(480, 490).count(), 2);
/// assert!(!bits.has_overlap(201, 399));
/// ```
#[derive(Debug, Clone)]
pub struct Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// List of intervals, sorted by start then end
    intervals: Vec<Interval<I, T>>,
    /// The largest `end - start` of any interval
    max_len: I,
}

impl<I, T> Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Create a new instance of Bits by passing in a vector of Intervals. This vector will
    /// immediately be sorted by start order.
    /// ```
    /// use annocov_overlaprs::{Bits, Interval};
    ///
    /// let data = (1..20).step_by(5)
    ///                   .map(|x| Interval{start: x, end: x + 10, val: true})
    ///                   .collect::<Vec<Interval<usize, bool>>>();
    /// let bits = Bits::build(data);
    /// assert_eq!(bits.len(), 4);
    /// ```
    pub fn build(mut intervals: Vec<Interval<I, T>>) -> Self {
        intervals.sort();
        let max_len = intervals
            .iter()
            .map(|iv| iv.end.checked_sub(&iv.start).unwrap_or_else(zero::<I>))
            .max()
            .unwrap_or_else(zero::<I>);
        Bits { intervals, max_len }
    }

    /// Lazily walk the intervals that overlap start ..= stop
    /// ```
    /// use annocov_overlaprs::{Bits, Interval};
    ///
    /// let bits = Bits::build((1..100).step_by(5)
    ///                                 .map(|x| Interval{start: x, end: x+2 , val: true})
    ///                                 .collect::<Vec<Interval<usize, bool>>>());
    /// assert_eq!(bits.find_iter(3, 6).count(), 2);
    /// ```
    #[inline]
    pub fn find_iter(&self, start: I, stop: I) -> IterFind<'_, I, T> {
        IterFind {
            inner: self,
            off: Self::lower_bound(
                start.checked_sub(&self.max_len).unwrap_or_else(zero::<I>),
                &self.intervals,
            ),
            start,
            stop,
        }
    }

    /// True if at least one interval overlaps start ..= stop
    #[inline]
    pub fn has_overlap(&self, start: I, stop: I) -> bool {
        self.find_iter(start, stop).next().is_some()
    }

    /// Get the number over intervals in Bits
    #[inline]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Check if BITS is empty (i.e. has no intervals)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Longest `end - start` among the stored intervals
    #[inline]
    pub fn max_len(&self) -> I {
        self.max_len
    }

    /// Determine the first index that we should start checking for overlaps for via a binary
    /// search.
    /// Assumes that the maximum interval length in `intervals` has been subtracted from
    /// `start`, otherwise the result is undefined
    #[inline]
    pub fn lower_bound(start: I, intervals: &[Interval<I, T>]) -> usize {
        let mut size = intervals.len();
        let mut low = 0;

        while size > 0 {
            let half = size / 2;
            let other_half = size - half;
            let probe = low + half;
            let other_low = low + other_half;
            let v = &intervals[probe];
            size = half;
            low = if v.start < start { other_low } else { low }
        }
        low
    }
}

/// Iterator over the intervals of a [`Bits`] that overlap a closed query range.
#[derive(Debug)]
pub struct IterFind<'a, I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    inner: &'a Bits<I, T>,
    off: usize,
    start: I,
    stop: I,
}

impl<'a, I, T> Iterator for IterFind<'a, I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    type Item = &'a Interval<I, T>;

    #[inline]
    // interval.start <= stop && interval.end >= start
    fn next(&mut self) -> Option<Self::Item> {
        while self.off < self.inner.intervals.len() {
            let interval = &self.inner.intervals[self.off];
            self.off += 1;
            if interval.overlap(self.start, self.stop) {
                return Some(interval);
            } else if interval.start > self.stop {
                break;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn intervals() -> Vec<Interval<u32, &'static str>> {
        vec![
            Interval {
                start: 6,
                end: 10,
                val: "c",
            },
            Interval {
                start: 1,
                end: 5,
                val: "a",
            },
            Interval {
                start: 8,
                end: 12,
                val: "d",
            },
            Interval {
                start: 3,
                end: 7,
                val: "b",
            },
        ]
    }

    #[rstest]
    fn test_build_sorts_and_tracks_max_len(intervals: Vec<Interval<u32, &'static str>>) {
        let bits = Bits::build(intervals.clone());
        assert_eq!(bits.len(), intervals.len());
        assert!(!bits.is_empty());
        assert_eq!(bits.max_len(), 4);

        let vals: Vec<&str> = bits.find_iter(0, 20).map(|iv| iv.val).collect();
        assert_eq!(vals, vec!["a", "b", "c", "d"]);
    }

    #[rstest]
    fn test_find_overlapping_intervals(intervals: Vec<Interval<u32, &'static str>>) {
        let bits = Bits::build(intervals);

        let vals: Vec<&str> = bits.find_iter(2, 4).map(|i| i.val).collect();
        assert_eq!(vals, vec!["a", "b"]);

        let vals: Vec<&str> = bits.find_iter(11, 11).map(|i| i.val).collect();
        assert_eq!(vals, vec!["d"]);
    }

    #[rstest]
    #[case(5, 5, vec!["a", "b"])]
    #[case(12, 20, vec!["d"])]
    #[case(13, 20, vec![])]
    #[case(0, 1, vec!["a"])]
    fn test_boundaries_are_inclusive(
        intervals: Vec<Interval<u32, &'static str>>,
        #[case] start: u32,
        #[case] stop: u32,
        #[case] expected: Vec<&'static str>,
    ) {
        let bits = Bits::build(intervals);
        let vals: Vec<&str> = bits.find_iter(start, stop).map(|i| i.val).collect();
        assert_eq!(vals, expected);
        assert_eq!(bits.has_overlap(start, stop), !expected.is_empty());
    }

    #[rstest]
    fn test_long_interval_is_found_far_from_its_start() {
        let bits = Bits::build(vec![
            Interval { start: 1u32, end: 100_000, val: 0usize },
            Interval { start: 50_000, end: 50_010, val: 1 },
            Interval { start: 90_000, end: 90_010, val: 2 },
        ]);
        let vals: Vec<usize> = bits.find_iter(95_000, 95_001).map(|i| i.val).collect();
        assert_eq!(vals, vec![0]);
    }

    #[rstest]
    fn test_empty_bits() {
        let bits: Bits<u32, &str> = Bits::build(vec![]);

        assert_eq!(bits.len(), 0);
        assert!(bits.is_empty());
        assert_eq!(bits.find_iter(1, 2).count(), 0);
    }
}
