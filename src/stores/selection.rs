/// The pid highlighted in the table, if any.
///
/// Not validated against the table: the selected process may already be
/// gone, so look it up before using it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionStore {
    selected_pid: Option<u32>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_pid(&self) -> Option<u32> {
        self.selected_pid
    }

    pub fn select(&mut self, pid: Option<u32>) {
        self.selected_pid = pid;
    }
}
