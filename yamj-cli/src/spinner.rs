//! Spinner lines for items being processed concurrently.
//!
//! One line per worker slot. An item claims a free slot when it starts and
//! hands it back when it finishes.

use std::collections::HashMap;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

const TICK: Duration = Duration::from_millis(100);

pub(crate) struct SpinnerPool {
    // Owns the draw target of every line.
    _mp: MultiProgress,
    lines: Vec<ProgressBar>,
    by_item: HashMap<usize, usize>,
    free: Vec<usize>,
}

impl SpinnerPool {
    /// `slots` lines, all hidden when `quiet`.
    pub(crate) fn new(slots: usize, quiet: bool) -> Self {
        let mp = if quiet {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::new()
        };
        let style = ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .expect("static pattern")
            .tick_chars("/-\\|");

        let lines = (0..slots)
            .map(|_| {
                let pb = mp.add(ProgressBar::new_spinner());
                pb.set_style(style.clone());
                pb
            })
            .collect();

        Self {
            _mp: mp,
            lines,
            by_item: HashMap::new(),
            free: (0..slots).rev().collect(),
        }
    }

    pub(crate) fn claim(&mut self, item: usize, msg: String) {
        let Some(slot) = self.free.pop() else { return };
        let line = &self.lines[slot];
        line.reset();
        line.enable_steady_tick(TICK);
        line.set_message(msg);
        self.by_item.insert(item, slot);
    }

    pub(crate) fn update(&self, item: usize, msg: String) {
        if let Some(&slot) = self.by_item.get(&item) {
            self.lines[slot].set_message(msg);
        }
    }

    pub(crate) fn release(&mut self, item: usize) {
        if let Some(slot) = self.by_item.remove(&item) {
            clear(&self.lines[slot]);
            self.free.push(slot);
        }
    }

    pub(crate) fn clear_all(&mut self) {
        self.lines.iter().for_each(clear);
        self.by_item.clear();
        self.free = (0..self.lines.len()).rev().collect();
    }
}

fn clear(line: &ProgressBar) {
    line.disable_steady_tick();
    line.set_message("");
    line.finish_and_clear();
}
