use crate::diagnostics::event::{compute_event_hash, finalize_event, DiagnosticEvent, ZERO_HASH_64};
use crate::error::{CoreError, CoreResult};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Append-only NDJSON log of diagnostic events. Each line carries the hash
/// of the line before it.
pub struct DiagnosticsLog {
    path: PathBuf,
    last_hash: String,
}

impl DiagnosticsLog {
    /// Open an existing log and continue its chain, or start an empty one.
    pub fn open_or_create(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&path)?;
        let last_hash = read_events(&path)?
            .last()
            .map(|e| e.event_hash.clone())
            .unwrap_or_else(|| ZERO_HASH_64.to_string());
        Ok(DiagnosticsLog { path, last_hash })
    }

    /// Chain, validate and write one event. Nothing is written if the
    /// event fails validation.
    pub fn append(&mut self, mut event: DiagnosticEvent) -> CoreResult<DiagnosticEvent> {
        event.prev_event_hash = self.last_hash.clone();
        let event = finalize_event(event)?;
        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');
        OpenOptions::new()
            .append(true)
            .open(&self.path)?
            .write_all(&line)?;
        self.last_hash = event.event_hash.clone();
        Ok(event)
    }

    pub fn append_all(
        &mut self,
        events: impl IntoIterator<Item = DiagnosticEvent>,
    ) -> CoreResult<usize> {
        let mut n = 0;
        for ev in events {
            self.append(ev)?;
            n += 1;
        }
        Ok(n)
    }

    pub fn last_hash(&self) -> &str {
        &self.last_hash
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_events(path: &Path) -> CoreResult<Vec<DiagnosticEvent>> {
    let reader = BufReader::new(fs::File::open(path)?);
    let mut events = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            events.push(serde_json::from_str(&line)?);
        }
    }
    Ok(events)
}

/// Check every link and hash in the log; returns the number of events.
pub fn verify_chain(path: impl AsRef<Path>) -> CoreResult<usize> {
    let events = read_events(path.as_ref())?;
    let mut prev = ZERO_HASH_64;
    for (i, ev) in events.iter().enumerate() {
        if ev.prev_event_hash != prev {
            return Err(CoreError::InvalidInput(format!(
                "diagnostics chain broken at event {}",
                i + 1
            )));
        }
        if compute_event_hash(ev)? != ev.event_hash {
            return Err(CoreError::InvalidInput(format!(
                "diagnostics event_hash mismatch at event {}",
                i + 1
            )));
        }
        prev = ev.event_hash.as_str();
    }
    Ok(events.len())
}
