use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::auth::{self, AuthError};
use crate::config::AppConfig;
use crate::data::aggregate::{
    SegmentShare, Totals, YearTotal, segment_summary, top_clients, totals, yearly_totals,
};
use crate::data::cache::DatasetCache;
use crate::data::filter::{
    FilterState, SegmentFilter, base_selection, exclude_clients, exclusion_options,
};
use crate::data::loader::LoadWarning;
use crate::data::model::SalesDataset;

/// How often the data folder is re-fingerprinted while the app is open.
pub const RECHECK_INTERVAL: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Everything the central panel draws, recomputed on each filter change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    /// Active slice (year, segment and exclusion applied).
    pub selection: Vec<usize>,
    /// Client names offered by the exclusion list.
    pub exclusion_options: Vec<String>,
    pub totals: Totals,
    pub segments: Vec<SegmentShare>,
    /// Indices of the ranked clients, largest first.
    pub top: Vec<usize>,
    /// Whole-dataset trend, independent of the filters.
    pub yearly: Vec<YearTotal>,
}

impl DashboardView {
    pub fn compute(dataset: &SalesDataset, filters: &FilterState, top_n: usize) -> Self {
        let base = base_selection(dataset, filters);
        let options = exclusion_options(dataset, &base);
        let selection = exclude_clients(dataset, &base, &filters.excluded_clients);

        DashboardView {
            totals: totals(dataset, &selection),
            segments: segment_summary(dataset, &selection),
            top: top_clients(dataset, &selection, top_n),
            yearly: yearly_totals(dataset),
            exclusion_options: options,
            selection,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded dataset, reused until the data folder changes.
    pub cache: DatasetCache,

    /// Text typed into the password field.
    pub password_input: String,

    /// Result of the last unlock attempt.
    pub auth_error: Option<AuthError>,

    /// Set once the password matched; lasts for the process lifetime.
    pub unlocked: bool,

    pub filters: FilterState,

    /// Show client names in the ranking labels and table.
    pub show_names: bool,

    /// Cached views for the current filters.
    pub view: DashboardView,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    last_check: Option<Instant>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::new(),
            password_input: String::new(),
            auth_error: None,
            unlocked: false,
            filters: FilterState::default(),
            show_names: false,
            view: DashboardView::default(),
            status_message: None,
            last_check: None,
        }
    }

    /// Loaded dataset, if the gate is open and a load happened.
    pub fn dataset(&self) -> Option<&SalesDataset> {
        if !self.unlocked {
            return None;
        }
        self.cache.report().map(|r| &r.dataset)
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        self.cache
            .report()
            .map(|r| r.warnings.as_slice())
            .unwrap_or_default()
    }

    // -- Gate --

    /// Check the typed password; on success load the data.
    pub fn try_unlock(&mut self) {
        match auth::verify(&self.password_input, self.config.app_password.as_deref()) {
            Ok(()) => {
                log::info!("Access granted");
                self.unlocked = true;
                self.auth_error = None;
                self.password_input.clear();
                self.sync_dataset(true);
            }
            Err(e) => {
                log::warn!("Access denied: {e}");
                self.auth_error = Some(e);
            }
        }
    }

    // -- Data folder --

    /// Re-check the data folder and rebuild views if it changed.
    ///
    /// Unless `force` is set, checks run at most once per [`RECHECK_INTERVAL`].
    pub fn sync_dataset(&mut self, force: bool) {
        if !self.unlocked {
            return;
        }
        if !force {
            if let Some(at) = self.last_check {
                if at.elapsed() < RECHECK_INTERVAL {
                    return;
                }
            }
        }
        self.last_check = Some(Instant::now());

        if self.cache.refresh(&self.config.data_dir) {
            self.on_dataset_reloaded();
        }
    }

    /// Point the dashboard at another folder.
    pub fn set_data_dir(&mut self, dir: PathBuf) {
        log::info!("Switching data folder to {}", dir.display());
        self.config.data_dir = dir;
        self.sync_dataset(true);
    }

    /// Drop the cache and read the folder again.
    pub fn reload(&mut self) {
        self.cache.invalidate();
        self.sync_dataset(true);
    }

    fn on_dataset_reloaded(&mut self) {
        let Some(report) = self.cache.report() else {
            return;
        };
        let ds = &report.dataset;

        // Keep the chosen year across reloads when it still exists.
        if !self.filters.year.is_some_and(|y| ds.years.contains(&y)) {
            self.filters.year = ds.latest_year();
        }

        self.status_message = if ds.is_empty() {
            Some("No data to show".to_string())
        } else {
            Some(format!("{} records loaded", ds.len()))
        };
        self.refilter();
    }

    // -- Filters --

    /// Recompute the views after a filter change.
    ///
    /// Exclusions that are no longer offered for the current year and segment
    /// are dropped first.
    pub fn refilter(&mut self) {
        let Some(report) = self.cache.report() else {
            self.view = DashboardView::default();
            return;
        };
        let ds = &report.dataset;

        let options = exclusion_options(ds, &base_selection(ds, &self.filters));
        self.filters
            .excluded_clients
            .retain(|name| options.binary_search(name).is_ok());

        self.view = DashboardView::compute(ds, &self.filters, self.config.top_n);
    }

    pub fn set_year(&mut self, year: i32) {
        self.filters.year = Some(year);
        self.refilter();
    }

    pub fn set_segment(&mut self, segment: SegmentFilter) {
        let id = match segment {
            SegmentFilter::All => "all",
            SegmentFilter::Only(seg) => seg.as_str(),
        };
        log::debug!("Segment filter: {id}");
        self.filters.segment = segment;
        self.refilter();
    }

    /// Add or remove a client name from the exclusion set.
    pub fn toggle_excluded(&mut self, name: &str) {
        if !self.filters.excluded_clients.remove(name) {
            self.filters.excluded_clients.insert(name.to_string());
        }
        self.refilter();
    }

    pub fn clear_exclusions(&mut self) {
        self.filters.excluded_clients.clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Segment;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "client_code,client_code_norm,client_name,net_sales";

    fn fixture() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("ventas_2024.csv"),
            format!("{HEADER}\nA,1,Alpha,20000\nB,2,Beta,11000\nC,3,Gamma,500\n"),
        )
        .unwrap();
        fs::write(
            dir.path().join("ventas_2025.csv"),
            format!("{HEADER}\nA,1,Alpha,9000\nD,4,Delta,15000\nX,12334,Internal,1\n"),
        )
        .unwrap();

        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            app_password: Some("open".into()),
            ..AppConfig::default()
        };
        (AppState::new(config), dir)
    }

    fn unlocked() -> (AppState, TempDir) {
        let (mut state, dir) = fixture();
        state.password_input = "open".into();
        state.try_unlock();
        (state, dir)
    }

    #[test]
    fn test_locked_state_loads_nothing() {
        let (mut state, _dir) = fixture();
        state.sync_dataset(true);
        assert!(state.dataset().is_none());
        assert!(state.cache.report().is_none());

        state.password_input = "wrong".into();
        state.try_unlock();
        assert!(!state.unlocked);
        assert_eq!(state.auth_error, Some(AuthError::Incorrect));
        assert!(state.dataset().is_none());
    }

    #[test]
    fn test_unlock_loads_latest_year() {
        let (state, _dir) = unlocked();
        assert!(state.unlocked);
        assert!(state.password_input.is_empty());
        assert_eq!(state.dataset().unwrap().len(), 5);
        assert_eq!(state.filters.year, Some(2025));
        assert_eq!(state.view.totals.net_sales, 24_000.0);
        assert_eq!(state.view.totals.distinct_clients, 2);
        assert_eq!(state.view.exclusion_options, vec!["Alpha", "Delta"]);
    }

    #[test]
    fn test_filters_update_view_but_not_trend() {
        let (mut state, _dir) = unlocked();
        let trend = state.view.yearly.clone();
        assert_eq!(trend.len(), 2);

        state.set_year(2024);
        state.set_segment(SegmentFilter::Only(Segment::High));
        assert_eq!(state.view.selection.len(), 1);
        assert_eq!(state.view.yearly, trend);

        state.set_segment(SegmentFilter::All);
        state.toggle_excluded("Beta");
        assert_eq!(state.view.totals.net_sales, 20_500.0);
        assert_eq!(state.view.top.len(), 2);
        assert_eq!(state.view.yearly, trend);

        state.toggle_excluded("Beta");
        assert!(state.filters.excluded_clients.is_empty());
    }

    #[test]
    fn test_stale_exclusions_are_pruned() {
        let (mut state, _dir) = unlocked();
        state.set_year(2024);
        state.toggle_excluded("Gamma");
        state.toggle_excluded("Alpha");

        state.set_year(2025);
        let kept: Vec<&str> = state.filters.excluded_clients.iter().map(String::as_str).collect();
        assert_eq!(kept, vec!["Alpha"]);
        assert_eq!(state.view.selection.len(), 1);

        state.clear_exclusions();
        assert_eq!(state.view.selection.len(), 2);
    }

    #[test]
    fn test_switching_to_missing_folder_shows_warning() {
        let (mut state, dir) = unlocked();
        state.set_data_dir(dir.path().join("missing"));
        assert!(state.dataset().unwrap().is_empty());
        assert!(matches!(state.warnings(), [LoadWarning::MissingDirectory(_)]));
        assert_eq!(state.view, DashboardView::default());
        assert_eq!(state.filters.year, None);
    }

    #[test]
    fn test_reload_picks_up_new_year() {
        let (mut state, dir) = unlocked();
        fs::write(
            dir.path().join("ventas_2026.csv"),
            format!("{HEADER}\nE,5,Echo,100\n"),
        )
        .unwrap();
        state.reload();
        // The chosen year survives the reload.
        assert_eq!(state.filters.year, Some(2025));
        assert_eq!(state.view.yearly.len(), 3);
    }
}
