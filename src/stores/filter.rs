use crate::models::{ProcessFilter, ProcessStatus, SortDirection, SortField, SortSpec};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Editable filter and sort criteria.
///
/// `to_filter` and `to_sort` turn the current criteria into the query handed
/// to the process source. Thresholds keep "unset" and "zero" apart: zero is a
/// real bound.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStore {
    search: String,
    user: Option<String>,
    mine_only: bool,
    system_only: bool,
    non_system_only: bool,
    status: Option<ProcessStatus>,
    cpu_gt: Option<f32>,
    mem_gt_mb: Option<i64>,
    sort_field: SortField,
    sort_direction: SortDirection,
}

impl Default for FilterStore {
    fn default() -> Self {
        let sort = SortSpec::default();
        Self {
            search: String::new(),
            user: None,
            mine_only: false,
            system_only: false,
            non_system_only: false,
            status: None,
            cpu_gt: None,
            mem_gt_mb: None,
            sort_field: sort.field,
            sort_direction: sort.direction,
        }
    }
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn set_user(&mut self, user: Option<String>) {
        self.user = user;
    }

    pub fn mine_only(&self) -> bool {
        self.mine_only
    }

    pub fn set_mine_only(&mut self, on: bool) {
        self.mine_only = on;
    }

    pub fn system_only(&self) -> bool {
        self.system_only
    }

    /// Turning this on clears `non_system_only`.
    pub fn set_system_only(&mut self, on: bool) {
        self.system_only = on;
        if on {
            self.non_system_only = false;
        }
    }

    pub fn non_system_only(&self) -> bool {
        self.non_system_only
    }

    /// Turning this on clears `system_only`.
    pub fn set_non_system_only(&mut self, on: bool) {
        self.non_system_only = on;
        if on {
            self.system_only = false;
        }
    }

    pub fn status(&self) -> Option<ProcessStatus> {
        self.status
    }

    pub fn set_status(&mut self, status: Option<ProcessStatus>) {
        self.status = status;
    }

    pub fn cpu_gt(&self) -> Option<f32> {
        self.cpu_gt
    }

    pub fn set_cpu_gt(&mut self, cpu_gt: Option<f32>) {
        self.cpu_gt = cpu_gt;
    }

    /// Memory threshold in whole megabytes, as entered by the user.
    pub fn mem_gt_mb(&self) -> Option<i64> {
        self.mem_gt_mb
    }

    pub fn set_mem_gt_mb(&mut self, mem_gt_mb: Option<i64>) {
        self.mem_gt_mb = mem_gt_mb;
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Builds the minimal filter: only fields with a meaningful value.
    pub fn to_filter(&self) -> ProcessFilter {
        let mut f = ProcessFilter::default();

        let search = self.search.trim();
        if !search.is_empty() {
            f.search = Some(search.to_string());
        }
        if let Some(user) = self.user.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            f.user = Some(user.to_string());
        }
        if self.mine_only {
            f.mine_only = Some(true);
        }
        if self.system_only {
            f.system_only = Some(true);
        } else if self.non_system_only {
            f.non_system_only = Some(true);
        }
        f.status = self.status;

        // NaN fails the comparison and is dropped with the negatives.
        if let Some(cpu) = self.cpu_gt.filter(|c| *c >= 0.0) {
            f.cpu_gt = Some(cpu);
        }
        if let Some(mb) = self.mem_gt_mb.filter(|m| *m >= 0) {
            f.memory_gt_bytes = Some((mb as u64).saturating_mul(BYTES_PER_MB));
        }

        f
    }

    pub fn to_sort(&self) -> SortSpec {
        SortSpec {
            field: self.sort_field,
            direction: self.sort_direction,
        }
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = field.default_direction();
        }
        log::debug!(
            "Sort set to {:?} {:?}",
            self.sort_field,
            self.sort_direction
        );
    }

    /// Clears every filter criterion. Sort is a display preference and stays.
    pub fn reset(&mut self) {
        self.search.clear();
        self.user = None;
        self.mine_only = false;
        self.system_only = false;
        self.non_system_only = false;
        self.status = None;
        self.cpu_gt = None;
        self.mem_gt_mb = None;
    }
}
