use std::collections::BTreeSet;

use super::model::{SalesDataset, Segment};

// ---------------------------------------------------------------------------
// Filter state: what the sidebar currently selects
// ---------------------------------------------------------------------------

/// Segment selector: every tier, or a single one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentFilter {
    #[default]
    All,
    Only(Segment),
}

impl SegmentFilter {
    pub fn label(self) -> &'static str {
        match self {
            SegmentFilter::All => "All",
            SegmentFilter::Only(seg) => seg.display_label(),
        }
    }
}

/// Active filters. `year == None` means no year constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub year: Option<i32>,
    pub segment: SegmentFilter,
    /// Client display names removed from the slice.
    pub excluded_clients: BTreeSet<String>,
}

impl FilterState {
    /// Default filters for a freshly loaded dataset: latest year, all tiers.
    pub fn for_dataset(dataset: &SalesDataset) -> Self {
        FilterState {
            year: dataset.latest_year(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Selections
// ---------------------------------------------------------------------------
//
// A selection is a list of record indices in ascending order. Every function
// here returns a new selection and leaves both the dataset and its input
// untouched.

/// Keep records from `year`.
pub fn filter_by_year(dataset: &SalesDataset, selection: &[usize], year: i32) -> Vec<usize> {
    selection
        .iter()
        .copied()
        .filter(|&i| dataset.records[i].year == year)
        .collect()
}

/// Keep records of one tier, or pass everything through for [`SegmentFilter::All`].
pub fn filter_by_segment(
    dataset: &SalesDataset,
    selection: &[usize],
    segment: SegmentFilter,
) -> Vec<usize> {
    match segment {
        SegmentFilter::All => selection.to_vec(),
        SegmentFilter::Only(seg) => selection
            .iter()
            .copied()
            .filter(|&i| dataset.records[i].segment == seg)
            .collect(),
    }
}

/// Drop records whose `client_name` is in `excluded`.
///
/// Matching is by display name, so distinct clients that share a name are
/// dropped together.
pub fn exclude_clients(
    dataset: &SalesDataset,
    selection: &[usize],
    excluded: &BTreeSet<String>,
) -> Vec<usize> {
    if excluded.is_empty() {
        return selection.to_vec();
    }
    selection
        .iter()
        .copied()
        .filter(|&i| !excluded.contains(&dataset.records[i].client_name))
        .collect()
}

/// Sorted distinct client names of a selection (choices for the exclusion list).
pub fn exclusion_options(dataset: &SalesDataset, selection: &[usize]) -> Vec<String> {
    selection
        .iter()
        .map(|&i| dataset.records[i].client_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Year + segment slice, before client exclusion.
pub fn base_selection(dataset: &SalesDataset, filters: &FilterState) -> Vec<usize> {
    let all = dataset.all_indices();
    let by_year = match filters.year {
        Some(year) => filter_by_year(dataset, &all, year),
        None => all,
    };
    filter_by_segment(dataset, &by_year, filters.segment)
}

/// Apply every active filter: year, then segment, then client exclusion.
pub fn apply_filters(dataset: &SalesDataset, filters: &FilterState) -> Vec<usize> {
    let base = base_selection(dataset, filters);
    exclude_clients(dataset, &base, &filters.excluded_clients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SalesRecord;

    fn sample() -> SalesDataset {
        SalesDataset::from_records(vec![
            SalesRecord::new("A", 1, "Alpha", 20_000.0, 2024),
            SalesRecord::new("B", 2, "Beta", 11_000.0, 2024),
            SalesRecord::new("C", 3, "Alpha", 500.0, 2024),
            SalesRecord::new("A", 1, "Alpha", 9_000.0, 2025),
            SalesRecord::new("D", 4, "Delta", 15_000.0, 2025),
        ])
    }

    #[test]
    fn test_filter_by_year() {
        let ds = sample();
        let all = ds.all_indices();
        let y2024 = filter_by_year(&ds, &all, 2024);
        assert_eq!(y2024, vec![0, 1, 2]);
        assert!(y2024.iter().all(|&i| ds.records[i].year == 2024));
        assert!(filter_by_year(&ds, &all, 1999).is_empty());
    }

    #[test]
    fn test_year_slices_partition_dataset() {
        let ds = sample();
        let all = ds.all_indices();
        let mut union: Vec<usize> = ds
            .years
            .iter()
            .flat_map(|&y| filter_by_year(&ds, &all, y))
            .collect();
        union.sort_unstable();
        assert_eq!(union, all);
    }

    #[test]
    fn test_filter_by_segment() {
        let ds = sample();
        let all = ds.all_indices();
        assert_eq!(filter_by_segment(&ds, &all, SegmentFilter::All), all);
        assert_eq!(
            filter_by_segment(&ds, &all, SegmentFilter::Only(Segment::Mid)),
            vec![1, 4]
        );
        assert_eq!(
            filter_by_segment(&ds, &all, SegmentFilter::Only(Segment::Low)),
            vec![2, 3]
        );
    }

    #[test]
    fn test_exclusion_by_name_hits_every_homonym() {
        let ds = sample();
        let all = ds.all_indices();
        let excluded: BTreeSet<String> = ["Alpha".to_string()].into();
        let kept = exclude_clients(&ds, &all, &excluded);
        // Clients 1 and 3 are distinct but both named "Alpha".
        assert_eq!(kept, vec![1, 4]);
    }

    #[test]
    fn test_exclusion_is_idempotent() {
        let ds = sample();
        let all = ds.all_indices();
        let excluded: BTreeSet<String> = ["Beta".to_string(), "Delta".to_string()].into();
        let once = exclude_clients(&ds, &all, &excluded);
        let twice = exclude_clients(&ds, &once, &excluded);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_exclusion_options_sorted_unique() {
        let ds = sample();
        let sel = filter_by_year(&ds, &ds.all_indices(), 2024);
        assert_eq!(exclusion_options(&ds, &sel), vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_apply_filters() {
        let ds = sample();
        let mut filters = FilterState::for_dataset(&ds);
        assert_eq!(filters.year, Some(2025));
        assert_eq!(apply_filters(&ds, &filters), vec![3, 4]);

        filters.year = Some(2024);
        filters.segment = SegmentFilter::Only(Segment::High);
        assert_eq!(apply_filters(&ds, &filters), vec![0]);

        filters.excluded_clients.insert("Alpha".into());
        assert!(apply_filters(&ds, &filters).is_empty());
        assert_eq!(base_selection(&ds, &filters), vec![0]);

        let before = ds.clone();
        filters.year = None;
        filters.segment = SegmentFilter::All;
        assert_eq!(apply_filters(&ds, &filters), vec![1, 4]);
        assert_eq!(ds, before);
    }
}
