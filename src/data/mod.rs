/// Data layer: core types, loading, caching, filtering and aggregation.
///
/// Architecture:
/// ```text
///  data/ventas_2024.csv, data/ventas_2025.csv, …
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  directory fingerprint → reuse or reload
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  validate, tag year, concat, drop excluded client
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SalesDataset  │  Vec<SalesRecord>, distinct years
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐     ┌───────────┐
///   │  filter   │ ──▶ │ aggregate │  totals, segments, top-N, trend
///   └──────────┘     └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod table;
