// src/progress.rs
/// Lightweight progress reporting used by the long-running parts of a run
/// (mapping refresh, inventory classification). Frontends implement this.
pub trait Progress {
    /// Called at the start of a phase with the number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One logical unit completed (e.g., a resource was classified).
    fn item_done(&mut self, _label: &str) {}

    /// One unit could not be processed; the run carries on.
    fn item_failed(&mut self, _label: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Plain stderr lines for the CLI.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn item_done(&mut self, label: &str) {
        self.done += 1;
        if self.total > 0 {
            eprintln!("[{}/{}] {label}", self.done, self.total);
        } else {
            eprintln!("{label}");
        }
    }

    fn item_failed(&mut self, label: &str, reason: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {label}: {reason}", self.done, self.total);
    }
}

/// Collects every call; used by tests to assert on what a run reported.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub lines: Vec<String>,
    pub done: Vec<String>,
    pub failed: Vec<String>,
    pub finished: bool,
}

impl Progress for RecordingProgress {
    fn log(&mut self, msg: &str) {
        self.lines.push(msg.to_string());
    }
    fn item_done(&mut self, label: &str) {
        self.done.push(label.to_string());
    }
    fn item_failed(&mut self, label: &str, _reason: &str) {
        self.failed.push(label.to_string());
    }
    fn finish(&mut self) {
        self.finished = true;
    }
}
