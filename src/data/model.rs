use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Segment – sales tier derived from net sales
// ---------------------------------------------------------------------------

/// Upper bound (inclusive) of the mid tier.
pub const HIGH_THRESHOLD: f64 = 15_000.0;
/// Lower bound (inclusive) of the mid tier.
pub const MID_THRESHOLD: f64 = 10_000.0;

/// Sales tier of a single (client, year) observation.
///
/// Variant order is the display order (highest tier first), which is also
/// the iteration order of `BTreeMap<Segment, _>` used by the summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    High,
    Mid,
    Low,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::High, Segment::Mid, Segment::Low];

    /// Stable identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Segment::High => "high",
            Segment::Mid => "mid",
            Segment::Low => "low",
        }
    }

    /// Tier label shown in widgets and charts.
    pub fn display_label(self) -> &'static str {
        match self {
            Segment::High => ">15K",
            Segment::Mid => "10K–15K",
            Segment::Low => "<10K",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_label())
    }
}

/// Classify an amount into its sales tier.
///
/// Exactly 15 000 is mid tier. NaN fails both comparisons and lands in
/// [`Segment::Low`], so every `f64` maps to exactly one tier.
pub fn label_segment(net_sales: f64) -> Segment {
    if net_sales > HIGH_THRESHOLD {
        Segment::High
    } else if net_sales >= MID_THRESHOLD {
        Segment::Mid
    } else {
        Segment::Low
    }
}

// ---------------------------------------------------------------------------
// SalesRecord – one row of the unified dataset
// ---------------------------------------------------------------------------

/// One (client, year) observation.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    /// Identifier exactly as written in the source file.
    pub client_code: String,
    /// Normalized numeric id, used for counting and exclusion.
    pub client_code_norm: i64,
    /// Display name (not unique).
    pub client_name: String,
    pub net_sales: f64,
    /// Year tag taken from the file name.
    pub year: i32,
    pub segment: Segment,
}

impl SalesRecord {
    /// Build a record, deriving its segment from `net_sales`.
    pub fn new(
        client_code: impl Into<String>,
        client_code_norm: i64,
        client_name: impl Into<String>,
        net_sales: f64,
        year: i32,
    ) -> Self {
        SalesRecord {
            client_code: client_code.into(),
            client_code_norm,
            client_name: client_name.into(),
            net_sales,
            year,
            segment: label_segment(net_sales),
        }
    }
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All loaded records, in load order, plus the distinct years present.
///
/// Read-only once built; views over it are index selections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesDataset {
    pub records: Vec<SalesRecord>,
    pub years: BTreeSet<i32>,
}

impl SalesDataset {
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let years = records.iter().map(|r| r.year).collect();
        SalesDataset { records, years }
    }

    /// Selection covering every record.
    pub fn all_indices(&self) -> Vec<usize> {
        (0..self.records.len()).collect()
    }

    /// Most recent year present, the default year filter.
    pub fn latest_year(&self) -> Option<i32> {
        self.years.iter().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
