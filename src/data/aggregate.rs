use std::collections::{BTreeMap, HashSet};

use super::model::{SalesDataset, SalesRecord, Segment};

/// Number of clients in the ranking chart.
pub const TOP_N: usize = 20;

// ---------------------------------------------------------------------------
// Metric tiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub net_sales: f64,
    /// Distinct `client_code_norm` values.
    pub distinct_clients: usize,
}

pub fn totals(dataset: &SalesDataset, selection: &[usize]) -> Totals {
    let mut clients = HashSet::new();
    let mut net_sales = 0.0;
    for &i in selection {
        let rec = &dataset.records[i];
        if !rec.net_sales.is_nan() {
            net_sales += rec.net_sales;
        }
        clients.insert(rec.client_code_norm);
    }
    Totals {
        net_sales,
        distinct_clients: clients.len(),
    }
}

// ---------------------------------------------------------------------------
// Segment share
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentShare {
    pub segment: Segment,
    pub net_sales: f64,
}

/// Net sales per segment. Only segments present in the selection appear;
/// blank (NaN) amounts count as present but add nothing.
pub fn segment_summary(dataset: &SalesDataset, selection: &[usize]) -> Vec<SegmentShare> {
    let mut sums: BTreeMap<Segment, f64> = BTreeMap::new();
    for &i in selection {
        let rec = &dataset.records[i];
        let sum = sums.entry(rec.segment).or_default();
        if !rec.net_sales.is_nan() {
            *sum += rec.net_sales;
        }
    }
    sums.into_iter()
        .map(|(segment, net_sales)| SegmentShare { segment, net_sales })
        .collect()
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// The `n` largest records by net sales, largest first.
///
/// The sort is stable over an ascending selection, so equal amounts keep
/// their load order. Blank (NaN) amounts rank last.
pub fn top_clients(dataset: &SalesDataset, selection: &[usize], n: usize) -> Vec<usize> {
    let mut ranked = selection.to_vec();
    ranked.sort_by(|&a, &b| {
        let (va, vb) = (dataset.records[a].net_sales, dataset.records[b].net_sales);
        match (va.is_nan(), vb.is_nan()) {
            (false, false) => vb.total_cmp(&va),
            (a_nan, b_nan) => a_nan.cmp(&b_nan),
        }
    });
    ranked.truncate(n);
    ranked
}

/// Axis label for a client: the normalized id, or `"Name (id)"`.
pub fn client_label(record: &SalesRecord, show_names: bool) -> String {
    if show_names {
        format!("{} ({})", record.client_name, record.client_code_norm)
    } else {
        record.client_code_norm.to_string()
    }
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearTotal {
    pub year: i32,
    pub net_sales: f64,
}

/// Net sales per year over the whole dataset, ascending by year.
///
/// Takes no selection: the trend line ignores every sidebar filter.
pub fn yearly_totals(dataset: &SalesDataset) -> Vec<YearTotal> {
    let mut sums: BTreeMap<i32, f64> = BTreeMap::new();
    for rec in &dataset.records {
        let sum = sums.entry(rec.year).or_default();
        if !rec.net_sales.is_nan() {
            *sum += rec.net_sales;
        }
    }
    sums.into_iter()
        .map(|(year, net_sales)| YearTotal { year, net_sales })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{FilterState, SegmentFilter, apply_filters};

    fn sample() -> SalesDataset {
        SalesDataset::from_records(vec![
            SalesRecord::new("A", 1, "Alpha", 20_000.0, 2024),
            SalesRecord::new("B", 2, "Beta", 11_000.0, 2024),
            SalesRecord::new("C", 3, "Alpha", 500.0, 2024),
            SalesRecord::new("B", 2, "Beta", 11_000.0, 2024),
            SalesRecord::new("A", 1, "Alpha", 9_000.0, 2025),
            SalesRecord::new("D", 4, "Delta", 15_000.0, 2025),
        ])
    }

    #[test]
    fn test_totals() {
        let ds = sample();
        let t = totals(&ds, &ds.all_indices());
        assert_eq!(t.net_sales, 66_500.0);
        assert_eq!(t.distinct_clients, 4);

        let empty = totals(&ds, &[]);
        assert_eq!(empty, Totals::default());
    }

    #[test]
    fn test_distinct_clients_uses_normalized_code() {
        let ds = sample();
        // Records 0 and 2 share a name but not a code.
        assert_eq!(totals(&ds, &[0, 2]).distinct_clients, 2);
        // Records 1 and 3 are the same client.
        assert_eq!(totals(&ds, &[1, 3]).distinct_clients, 1);
    }

    #[test]
    fn test_segment_summary() {
        let ds = sample();
        let summary = segment_summary(&ds, &[0, 1, 2, 3]);
        assert_eq!(
            summary,
            vec![
                SegmentShare { segment: Segment::High, net_sales: 20_000.0 },
                SegmentShare { segment: Segment::Mid, net_sales: 22_000.0 },
                SegmentShare { segment: Segment::Low, net_sales: 500.0 },
            ]
        );
        assert!(segment_summary(&ds, &[]).is_empty());
    }

    #[test]
    fn test_top_clients_order_and_ties() {
        let ds = sample();
        let top = top_clients(&ds, &ds.all_indices(), 4);
        // 11 000 appears twice; load order decides.
        assert_eq!(top, vec![0, 5, 1, 3]);

        let amounts: Vec<f64> = top.iter().map(|&i| ds.records[i].net_sales).collect();
        assert!(amounts.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_top_clients_length() {
        let ds = sample();
        assert_eq!(top_clients(&ds, &ds.all_indices(), TOP_N).len(), 6);
        assert_eq!(top_clients(&ds, &[2, 4], 1), vec![4]);
        assert!(top_clients(&ds, &[], TOP_N).is_empty());
    }

    #[test]
    fn test_yearly_totals_ignore_filters() {
        let ds = sample();
        let expected = vec![
            YearTotal { year: 2024, net_sales: 42_500.0 },
            YearTotal { year: 2025, net_sales: 24_000.0 },
        ];
        assert_eq!(yearly_totals(&ds), expected);

        let mut filters = FilterState::for_dataset(&ds);
        filters.segment = SegmentFilter::Only(Segment::Low);
        filters.excluded_clients.insert("Alpha".into());
        assert!(apply_filters(&ds, &filters).is_empty());
        assert_eq!(yearly_totals(&ds), expected);
    }

    fn with_blank_amounts() -> SalesDataset {
        SalesDataset::from_records(vec![
            SalesRecord::new("A", 1, "Alpha", f64::NAN, 2024),
            SalesRecord::new("B", 2, "Beta", 500.0, 2024),
            SalesRecord::new("C", 3, "Gamma", 20_000.0, 2024),
            SalesRecord::new("D", 4, "Delta", -f64::NAN, 2025),
            SalesRecord::new("E", 5, "Echo", 100.0, 2025),
        ])
    }

    #[test]
    fn test_sums_skip_blank_amounts() {
        let ds = with_blank_amounts();
        let all = ds.all_indices();

        let t = totals(&ds, &all);
        assert_eq!(t.net_sales, 20_600.0);
        assert_eq!(t.distinct_clients, 5);

        assert_eq!(
            segment_summary(&ds, &all),
            vec![
                SegmentShare { segment: Segment::High, net_sales: 20_000.0 },
                SegmentShare { segment: Segment::Low, net_sales: 600.0 },
            ]
        );
        assert_eq!(
            yearly_totals(&ds),
            vec![
                YearTotal { year: 2024, net_sales: 20_500.0 },
                YearTotal { year: 2025, net_sales: 100.0 },
            ]
        );
        assert_eq!(segment_summary(&ds, &[0]), vec![SegmentShare {
            segment: Segment::Low,
            net_sales: 0.0
        }]);
    }

    #[test]
    fn test_top_clients_rank_blank_amounts_last() {
        let ds = with_blank_amounts();
        let top = top_clients(&ds, &ds.all_indices(), TOP_N);
        assert_eq!(top, vec![2, 1, 4, 0, 3]);
        assert_eq!(top_clients(&ds, &ds.all_indices(), 2), vec![2, 1]);
    }

    #[test]
    fn test_client_label() {
        let rec = SalesRecord::new("A-1", 101, "Acme", 1.0, 2024);
        assert_eq!(client_label(&rec, false), "101");
        assert_eq!(client_label(&rec, true), "Acme (101)");
    }
}
