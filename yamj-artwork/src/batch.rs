//! Concurrent artwork processing over a whole library.
//!
//! The unit of work is one item: all requested kinds of an item run in
//! order on that item, so two workers never touch the same item. Up to
//! `max_workers` items are in flight at once.

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use yamj_core::{ArtworkKind, VideoItem};

use crate::log::{ArtworkLog, LogEntry};
use crate::scanner::{ArtworkRecord, ArtworkScanner};
use crate::storage::JukeboxLayout;

/// Options for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Kinds processed for every item, in this order.
    pub kinds: Vec<ArtworkKind>,
    pub max_workers: usize,
}

impl BatchOptions {
    pub fn new(kinds: Vec<ArtworkKind>, max_workers: usize) -> Self {
        Self {
            kinds,
            max_workers: max_workers.max(1),
        }
    }
}

/// Progress events from [`run_batch`].
#[derive(Debug, Clone)]
pub enum ArtworkEvent {
    Started { total: usize },
    ItemStarted { index: usize, name: String },
    KindStarted { index: usize, name: String, kind: ArtworkKind },
    KindFinished { index: usize, name: String, record: ArtworkRecord },
    ItemFinished { index: usize, name: String },
    Done,
}

/// Items in their original order with updated artwork fields, plus the
/// run log.
#[derive(Debug)]
pub struct BatchResult {
    pub items: Vec<VideoItem>,
    pub records: Vec<(String, ArtworkRecord)>,
    pub log: ArtworkLog,
}

/// Process every item. Per-kind failures stay inside their record; the
/// batch itself always completes.
pub async fn run_batch(
    scanner: &ArtworkScanner,
    layout: &JukeboxLayout,
    mut items: Vec<VideoItem>,
    options: &BatchOptions,
    events: mpsc::UnboundedSender<ArtworkEvent>,
) -> BatchResult {
    // Two items must never write the same jukebox file.
    let renamed = yamj_core::scan::assign_jukebox_names(&mut items);
    if renamed > 0 {
        log::warn!("{} items shared an output name with another item and were suffixed", renamed);
    }

    let total = items.len();
    let _ = events.send(ArtworkEvent::Started { total });
    log::info!(
        "Processing {} items, kinds [{}], {} workers",
        total,
        options.kinds.iter().map(|k| k.name()).collect::<Vec<_>>().join(", "),
        options.max_workers
    );

    let kinds = &options.kinds;
    let mut finished: Vec<(usize, VideoItem, Vec<ArtworkRecord>)> = stream::iter(items.into_iter().enumerate())
        .map(|(index, mut item)| {
            let events = events.clone();
            async move {
                let name = item.base_name.clone();
                let _ = events.send(ArtworkEvent::ItemStarted {
                    index,
                    name: name.clone(),
                });

                let mut records = Vec::with_capacity(kinds.len());
                for &kind in kinds {
                    let _ = events.send(ArtworkEvent::KindStarted {
                        index,
                        name: name.clone(),
                        kind,
                    });
                    let record = scanner.run(layout, &mut item, kind).await;
                    let _ = events.send(ArtworkEvent::KindFinished {
                        index,
                        name: name.clone(),
                        record: record.clone(),
                    });
                    records.push(record);
                }

                let _ = events.send(ArtworkEvent::ItemFinished { index, name });
                (index, item, records)
            }
        })
        .buffer_unordered(options.max_workers)
        .collect()
        .await;

    finished.sort_by_key(|(index, _, _)| *index);

    let mut log = ArtworkLog::new();
    let mut all_records = Vec::new();
    let mut out = Vec::with_capacity(finished.len());
    for (_, item, records) in finished {
        for record in records {
            if let Some(entry) = LogEntry::from_record(&item.base_name, &record) {
                log.add(entry);
            }
            all_records.push((item.base_name.clone(), record));
        }
        out.push(item);
    }

    let _ = events.send(ArtworkEvent::Done);
    BatchResult {
        items: out,
        records: all_records,
        log,
    }
}

#[cfg(test)]
#[path = "tests/batch_tests.rs"]
mod tests;
