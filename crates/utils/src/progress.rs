use std::time::Instant;

/// Folder-level progress of a scan, shared with whoever renders it.
#[derive(Debug, Clone)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub message: String,
    pub started_at: Instant,
    pub is_complete: bool,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            current: 0,
            total: 0,
            message: String::new(),
            started_at: Instant::now(),
            is_complete: false,
        }
    }
}

impl Progress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self, total: usize) {
        self.current = 0;
        self.total = total;
        self.message.clear();
        self.started_at = Instant::now();
        self.is_complete = false;
    }

    /// Records one more finished folder.
    pub fn advance(&mut self, message: impl Into<String>) {
        self.current += 1;
        self.message = message.into();
    }

    pub fn finish(&mut self) {
        self.current = self.current.max(self.total);
        self.is_complete = true;
    }

    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64) * 100.0
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// One-line rendering used by the CLI ticker, e.g. `[ 3/10]  30% north_wall`.
    #[must_use]
    pub fn status_line(&self) -> String {
        let width = self.total.to_string().len();
        format!(
            "[{:>width$}/{}] {:>3.0}% {}",
            self.current,
            self.total,
            self.percentage(),
            self.message
        )
    }
}
