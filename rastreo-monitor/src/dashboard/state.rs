use std::sync::Arc;

use rastreo_api::{DeviceRecord, MapLocation};
use time::OffsetDateTime;

use crate::services::PollEvent;
use crate::status::{Criteria, PowerFilter, branch_names, filter, is_phone_on};

pub const ALL_BRANCHES: &str = "Todas las sucursales";
pub const LOADING_MESSAGE: &str = "Cargando dispositivos...";
pub const EMPTY_MESSAGE: &str = "No se encontraron dispositivos";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Devices passing the current filters
    pub total: usize,
    /// Of those, phones considered on
    pub on: usize,
    /// Of those, devices inside their zone
    pub in_zone: usize,
}

/// Everything the dashboard shows. Owned by the UI loop and only changed
/// through poll events and user actions.
#[derive(Debug, Default)]
pub struct DashboardState {
    devices: Arc<[DeviceRecord]>,
    branches: Vec<String>,
    pub criteria: Criteria,
    loading: bool,
    has_loaded: bool,
    error: Option<String>,
    selected: usize,
    map: Option<MapLocation>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: PollEvent) {
        match event {
            PollEvent::Started => {
                self.loading = true;
                self.error = None;
            }
            PollEvent::Loaded(devices) => {
                self.branches = branch_names(&devices);
                self.devices = devices.into();
                self.loading = false;
                self.has_loaded = true;
            }
            PollEvent::Failed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
        }
    }

    pub fn devices(&self) -> &Arc<[DeviceRecord]> {
        &self.devices
    }

    /// Records passing the current criteria, in snapshot order.
    pub fn visible(&self, now: OffsetDateTime) -> Vec<&DeviceRecord> {
        filter(&self.devices, &self.criteria, now)
    }

    pub fn stats(&self, now: OffsetDateTime) -> Stats {
        let visible = self.visible(now);

        Stats {
            total: visible.len(),
            on: visible.iter().filter(|device| is_phone_on(device, now)).count(),
            in_zone: visible.iter().filter(|device| device.inzona).count(),
        }
    }

    pub fn branches(&self) -> &[String] {
        &self.branches
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn show_loading(&self) -> bool {
        self.loading && !self.has_loaded
    }

    pub fn show_empty(&self, now: OffsetDateTime) -> bool {
        !self.loading && self.error.is_none() && self.visible(now).is_empty()
    }

    pub fn branch_label(&self) -> &str {
        self.criteria.sucursal.as_deref().unwrap_or(ALL_BRANCHES)
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.criteria.search_term = term.into();
        self.selected = 0;
    }

    /// All branches, then each known branch in order, then back to all.
    pub fn cycle_branch(&mut self) {
        let next = match self.criteria.sucursal.as_deref() {
            None => self.branches.first(),
            Some(current) => self
                .branches
                .iter()
                .position(|branch| branch == current)
                .and_then(|index| self.branches.get(index + 1)),
        };

        self.criteria.sucursal = next.cloned();
        self.selected = 0;
    }

    pub fn cycle_power(&mut self) {
        self.criteria.power_status = self.criteria.power_status.next();
        self.selected = 0;
    }

    pub fn power_filter(&self) -> PowerFilter {
        self.criteria.power_status
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, position: usize, visible_len: usize) {
        self.selected = position.min(visible_len.saturating_sub(1));
    }

    /// Pulls the selection back inside the filtered list, which can shrink
    /// under it after a reload or as data ages.
    pub fn clamp_selection(&mut self, visible_len: usize) {
        self.select(self.selected, visible_len);
    }

    pub fn select_next(&mut self, visible_len: usize) {
        self.select(self.selected.saturating_add(1), visible_len);
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_device(&self, now: OffsetDateTime) -> Option<&DeviceRecord> {
        self.visible(now).get(self.selected).copied()
    }

    /// Opens the map on the selected device. Devices without coordinates
    /// leave the overlay closed.
    pub fn open_map(&mut self, now: OffsetDateTime) -> bool {
        self.map = self
            .selected_device(now)
            .and_then(DeviceRecord::location);

        self.map.is_some()
    }

    pub fn close_map(&mut self) {
        self.map = None;
    }

    pub fn map(&self) -> Option<MapLocation> {
        self.map
    }
}

#[cfg(test)]
mod tests {
    use rastreo_api::Tracking;
    use time::Duration;

    use super::*;
    use crate::status::fixtures::{ago, device, now, staffed, tracking};
    use crate::status::{AgeTier, age_tier};

    fn loaded(devices: Vec<DeviceRecord>) -> DashboardState {
        let mut state = DashboardState::new();
        state.apply(PollEvent::Started);
        state.apply(PollEvent::Loaded(devices));
        state
    }

    #[test]
    fn test_field_device_scenario() {
        let record = DeviceRecord {
            inzona: true,
            ..device(Tracking {
                fechacaptura: ago(Duration::minutes(30)),
                gpsactivo: Some(true),
                bateria: Some(Some(80)),
                ..Tracking::default()
            })
        };
        let mut state = loaded(vec![record]);
        state.criteria.power_status = PowerFilter::On;

        assert_eq!(state.stats(now()), Stats { total: 1, on: 1, in_zone: 1 });
        let visible = state.visible(now());
        assert_eq!(visible[0].battery(), Some(80));
        assert_eq!(age_tier(visible[0].captured_at_millis(), now()), AgeTier::Fresh);
    }

    #[test]
    fn test_loading_indicator_only_before_first_load() {
        let mut state = DashboardState::new();
        assert!(!state.show_loading());

        state.apply(PollEvent::Started);
        assert!(state.show_loading());
        assert!(!state.show_empty(now()));

        state.apply(PollEvent::Loaded(Vec::new()));
        assert!(!state.show_loading());
        assert!(state.show_empty(now()));

        state.apply(PollEvent::Started);
        assert!(state.is_loading());
        assert!(!state.show_loading());
    }

    #[test]
    fn test_failure_keeps_previous_snapshot() {
        let mut state = loaded(vec![device(tracking()), device(tracking())]);
        let before = Arc::clone(state.devices());

        state.apply(PollEvent::Started);
        state.apply(PollEvent::Failed("Error HTTP: 503".into()));

        assert!(Arc::ptr_eq(&before, state.devices()));
        assert_eq!(state.error(), Some("Error HTTP: 503"));
        assert!(!state.show_empty(now()));

        state.apply(PollEvent::Started);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_first_load_failure_leaves_list_empty() {
        let mut state = DashboardState::new();
        state.apply(PollEvent::Started);
        state.apply(PollEvent::Failed("Error de red: timeout".into()));

        assert!(state.devices().is_empty());
        assert!(!state.show_loading());
        assert!(!state.show_empty(now()));
    }

    #[test]
    fn test_branch_cycle_wraps_to_all() {
        let mut state = loaded(vec![
            staffed("A", "Norte", tracking()),
            staffed("B", "Central", tracking()),
        ]);

        assert_eq!(state.branch_label(), "Todas las sucursales");
        state.cycle_branch();
        assert_eq!(state.branch_label(), "Central");
        state.cycle_branch();
        assert_eq!(state.branch_label(), "Norte");
        state.cycle_branch();
        assert_eq!(state.criteria.sucursal, None);
    }

    #[test]
    fn test_vanished_branch_resets_cycle() {
        let mut state = loaded(vec![staffed("A", "Norte", tracking())]);
        state.criteria.sucursal = Some("Cerrada".into());

        state.cycle_branch();
        assert_eq!(state.criteria.sucursal, None);
    }

    #[test]
    fn test_power_cycle() {
        let mut state = DashboardState::new();

        state.cycle_power();
        assert_eq!(state.power_filter(), PowerFilter::On);
        state.cycle_power();
        assert_eq!(state.power_filter(), PowerFilter::Off);
        state.cycle_power();
        assert_eq!(state.power_filter(), PowerFilter::All);
    }

    #[test]
    fn test_map_opens_only_with_coordinates() {
        let located = device(Tracking {
            latitud: Some(-25.28),
            longitud: Some(-57.63),
            ..tracking()
        });
        let mut state = loaded(vec![device(tracking()), located]);

        assert!(!state.open_map(now()));
        assert_eq!(state.map(), None);

        state.select_next(2);
        assert!(state.open_map(now()));
        assert_eq!(state.map(), Some(MapLocation { latitud: -25.28, longitud: -57.63 }));

        state.close_map();
        assert_eq!(state.map(), None);
    }

    #[test]
    fn test_selection_stays_in_range() {
        let mut state = loaded(vec![device(tracking()); 3]);

        state.select_next(3);
        state.select_next(3);
        state.select_next(3);
        assert_eq!(state.selected(), 2);

        state.apply(PollEvent::Loaded(vec![device(tracking())]));
        state.clamp_selection(state.visible(now()).len());
        assert_eq!(state.selected(), 0);

        state.select_previous();
        assert_eq!(state.selected(), 0);
    }

    #[test]
    fn test_selection_clamps_to_filtered_list() {
        let mut state = loaded(vec![
            staffed("A", "Central", tracking()),
            staffed("B", "Central", tracking()),
            staffed("C", "Central", tracking()),
        ]);
        state.cycle_branch();
        state.select(2, 3);

        state.apply(PollEvent::Loaded(vec![
            staffed("A", "Central", tracking()),
            staffed("B", "Norte", tracking()),
            staffed("C", "Norte", tracking()),
        ]));
        assert_eq!(state.selected_device(now()), None);

        state.clamp_selection(state.visible(now()).len());
        assert_eq!(state.selected(), 0);
        assert_eq!(state.selected_device(now()).and_then(DeviceRecord::salesperson), Some("A"));
    }

    #[test]
    fn test_search_resets_selection() {
        let mut state = loaded(vec![device(tracking()); 2]);
        state.select_next(2);

        state.set_search("central");
        assert_eq!(state.selected(), 0);
        assert_eq!(state.criteria.search_term, "central");
    }
}
