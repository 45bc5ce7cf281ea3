use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::errors::LocationError;

/// Strand of a genomic location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    Unknown,
}

impl Strand {
    ///
    /// Interpret the strand column of an annotation line. Anything
    /// other than `+` or `-` (including a missing column) is unknown.
    ///
    pub fn from_column(column: Option<&str>) -> Strand {
        match column {
            Some("+") => Strand::Forward,
            Some("-") => Strand::Reverse,
            _ => Strand::Unknown,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::Unknown => '.',
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

///
/// A single contiguous stretch of a chromosome, 1-based and inclusive on both ends.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimpleLocation {
    start: u32,
    end: u32,
    strand: Strand,
}

impl SimpleLocation {
    /// Create a new location. Coordinates given in the wrong order are swapped.
    pub fn new(start: u32, end: u32, strand: Strand) -> Self {
        if end < start {
            SimpleLocation {
                start: end,
                end: start,
                strand,
            }
        } else {
            SimpleLocation { start, end, strand }
        }
    }

    ///
    /// Build a location from the raw start and end columns of an annotation line.
    ///
    /// # Arguments
    /// - start: start column text
    /// - end: end column text
    /// - strand: already interpreted strand
    pub fn parse(start: &str, end: &str, strand: Strand) -> Result<Self, LocationError> {
        let parse_coordinate = |raw: &str| {
            raw.trim()
                .parse::<u32>()
                .map_err(|_| LocationError::InvalidCoordinate(raw.to_string()))
        };
        Ok(SimpleLocation::new(
            parse_coordinate(start)?,
            parse_coordinate(end)?,
            strand,
        ))
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    #[inline]
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.start <= end && self.end >= start
    }
}

impl Ord for SimpleLocation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then(self.end.cmp(&other.end))
            .then(self.strand.cmp(&other.strand))
    }
}

impl PartialOrd for SimpleLocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for SimpleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}({})", self.start, self.end, self.strand)
    }
}

///
/// A spliced location made of several parts on the same chromosome, kept in
/// the order they were added. The bounding box is only used for ordering;
/// overlap is always decided part by part so gaps between parts never match.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeLocation {
    parts: Vec<SimpleLocation>,
    start: u32,
    end: u32,
    strand: Strand,
}

impl CompositeLocation {
    pub fn new(parts: Vec<SimpleLocation>) -> Result<Self, LocationError> {
        let first = parts.first().ok_or(LocationError::EmptyComposite)?;

        let mut start = first.start;
        let mut end = first.end;
        let mut strand = first.strand;
        for part in parts.iter().skip(1) {
            start = start.min(part.start);
            end = end.max(part.end);
            if part.strand != strand {
                strand = Strand::Unknown;
            }
        }

        Ok(CompositeLocation {
            parts,
            start,
            end,
            strand,
        })
    }

    pub fn parts(&self) -> &[SimpleLocation] {
        &self.parts
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    #[inline]
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.parts.iter().any(|part| part.overlaps(start, end))
    }
}

/// Location of a feature: either one contiguous stretch or a spliced set of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    Simple(SimpleLocation),
    Composite(CompositeLocation),
}

impl Location {
    pub fn new(start: u32, end: u32, strand: Strand) -> Self {
        Location::Simple(SimpleLocation::new(start, end, strand))
    }

    pub fn start(&self) -> u32 {
        match self {
            Location::Simple(loc) => loc.start(),
            Location::Composite(loc) => loc.start(),
        }
    }

    pub fn end(&self) -> u32 {
        match self {
            Location::Simple(loc) => loc.end(),
            Location::Composite(loc) => loc.end(),
        }
    }

    pub fn strand(&self) -> Strand {
        match self {
            Location::Simple(loc) => loc.strand(),
            Location::Composite(loc) => loc.strand(),
        }
    }

    /// The contiguous parts making up this location (a single one for simple locations)
    pub fn parts(&self) -> &[SimpleLocation] {
        match self {
            Location::Simple(loc) => std::slice::from_ref(loc),
            Location::Composite(loc) => loc.parts(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Location::Composite(_))
    }

    ///
    /// Check whether [start, end] (1-based, inclusive) shares at least one
    /// base with this location. Composite locations are tested part by part.
    ///
    #[inline]
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        match self {
            Location::Simple(loc) => loc.overlaps(start, end),
            Location::Composite(loc) => loc.overlaps(start, end),
        }
    }
}

impl From<SimpleLocation> for Location {
    fn from(value: SimpleLocation) -> Self {
        Location::Simple(value)
    }
}

impl From<CompositeLocation> for Location {
    fn from(value: CompositeLocation) -> Self {
        Location::Composite(value)
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start()
            .cmp(&other.start())
            .then(self.end().cmp(&other.end()))
            .then_with(|| self.parts().cmp(other.parts()))
            .then(self.is_composite().cmp(&other.is_composite()))
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Simple(loc) => write!(f, "{}", loc),
            Location::Composite(loc) => {
                let parts: Vec<String> = loc
                    .parts()
                    .iter()
                    .map(|p| format!("{}..{}", p.start(), p.end()))
                    .collect();
                write!(f, "join({})({})", parts.join(","), loc.strand())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn spliced() -> Location {
        CompositeLocation::new(vec![
            SimpleLocation::new(100, 200, Strand::Forward),
            SimpleLocation::new(400, 500, Strand::Forward),
        ])
        .unwrap()
        .into()
    }

    #[rstest]
    fn test_swapped_coordinates_are_normalized() {
        let loc = SimpleLocation::new(500, 100, Strand::Reverse);
        assert_eq!(loc.start(), 100);
        assert_eq!(loc.end(), 500);
    }

    #[rstest]
    #[case("10", "20", 10, 20)]
    #[case("20", "10", 10, 20)]
    #[case(" 7", "7 ", 7, 7)]
    fn test_parse_coordinates(
        #[case] start: &str,
        #[case] end: &str,
        #[case] exp_start: u32,
        #[case] exp_end: u32,
    ) {
        let loc = SimpleLocation::parse(start, end, Strand::Unknown).unwrap();
        assert_eq!((loc.start(), loc.end()), (exp_start, exp_end));
    }

    #[rstest]
    #[case("abc", "20")]
    #[case("10", "2.5")]
    #[case("-1", "20")]
    #[case("", "20")]
    fn test_parse_rejects_bad_coordinates(#[case] start: &str, #[case] end: &str) {
        let res = SimpleLocation::parse(start, end, Strand::Unknown);
        assert!(matches!(res, Err(LocationError::InvalidCoordinate(_))));
    }

    #[rstest]
    #[case(Some("+"), Strand::Forward)]
    #[case(Some("-"), Strand::Reverse)]
    #[case(Some("."), Strand::Unknown)]
    #[case(Some("?"), Strand::Unknown)]
    #[case(None, Strand::Unknown)]
    fn test_strand_from_column(#[case] column: Option<&str>, #[case] expected: Strand) {
        assert_eq!(Strand::from_column(column), expected);
    }

    #[rstest]
    fn test_composite_bounds(spliced: Location) {
        assert_eq!(spliced.start(), 100);
        assert_eq!(spliced.end(), 500);
        assert_eq!(spliced.strand(), Strand::Forward);
        assert_eq!(spliced.parts().len(), 2);
        assert!(spliced.is_composite());
    }

    #[rstest]
    #[case(150, 160, true)]
    #[case(250, 300, false)]
    #[case(201, 399, false)]
    #[case(200, 200, true)]
    #[case(350, 400, true)]
    #[case(501, 600, false)]
    fn test_composite_overlap_skips_gaps(
        spliced: Location,
        #[case] start: u32,
        #[case] end: u32,
        #[case] expected: bool,
    ) {
        assert_eq!(spliced.overlaps(start, end), expected);
    }

    #[rstest]
    fn test_composite_mixed_strand_is_unknown() {
        let loc = CompositeLocation::new(vec![
            SimpleLocation::new(1, 10, Strand::Forward),
            SimpleLocation::new(20, 30, Strand::Reverse),
        ])
        .unwrap();
        assert_eq!(loc.strand(), Strand::Unknown);
    }

    #[rstest]
    fn test_empty_composite_is_an_error() {
        assert!(matches!(
            CompositeLocation::new(vec![]),
            Err(LocationError::EmptyComposite)
        ));
    }

    #[rstest]
    fn test_ordering_by_start_then_end() {
        let mut locs = vec![
            Location::new(50, 60, Strand::Forward),
            Location::new(10, 90, Strand::Forward),
            Location::new(10, 20, Strand::Forward),
        ];
        locs.sort();
        let bounds: Vec<(u32, u32)> = locs.iter().map(|l| (l.start(), l.end())).collect();
        assert_eq!(bounds, vec![(10, 20), (10, 90), (50, 60)]);
    }

    #[rstest]
    fn test_display(spliced: Location) {
        assert_eq!(spliced.to_string(), "join(100..200,400..500)(+)");
        assert_eq!(Location::new(5, 9, Strand::Unknown).to_string(), "5-9(.)");
    }
}
