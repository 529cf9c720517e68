//! Number queue: the ordered collection of call targets.
//!
//! The queue is the single source of truth for what still needs dialing. It
//! is owned by the engine state and never exposed raw; only the dispatcher
//! moves entries into `Calling` and only the CDR recorder moves them out.

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{DialerError, Result};
use crate::types::{NumberId, NumberStatus};

/// Display name used when a manual add or import row carries no name.
const UNNAMED: &str = "Unnamed";

/// Field spellings tolerated in bulk-import rows.
const PHONE_KEYS: [&str; 4] = ["Telefon", "telefon", "Phone", "phone"];
const NAME_KEYS: [&str; 4] = ["Ad", "İsim", "Name", "name"];
const NOTE_KEYS: [&str; 2] = ["Not", "note"];

/// One call target in the queue.
#[derive(Debug, Clone, Serialize)]
pub struct QueuedNumber {
    pub id: NumberId,
    pub phone: String,
    pub name: String,
    pub note: String,
    pub status: NumberStatus,
    /// Incremented by exactly 1 each time the number transitions into `Calling`
    pub attempts: u32,
    pub last_call: Option<DateTime<Local>>,
    /// Talk duration of the last resolved call, 0 until resolved
    pub duration_secs: u64,
    /// Result summary of the last resolved call, `"-"` until resolved
    pub result: String,
}

impl QueuedNumber {
    fn new(phone: String, name: String, note: String) -> Self {
        Self {
            id: NumberId::new(),
            phone,
            name,
            note,
            status: NumberStatus::Waiting,
            attempts: 0,
            last_call: None,
            duration_secs: 0,
            result: "-".to_string(),
        }
    }
}

/// Ordered queue of call targets, insertion order preserved.
#[derive(Debug, Default)]
pub struct NumberQueue {
    entries: Vec<QueuedNumber>,
}

impl NumberQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new target in `Waiting` status.
    ///
    /// Fails with [`DialerError::InvalidNumber`] if the phone is empty; no
    /// state changes on failure.
    pub fn enqueue(&mut self, phone: &str, name: &str, note: &str) -> Result<NumberId> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(DialerError::invalid_number("phone number is required"));
        }
        let name = name.trim();
        let name = if name.is_empty() { UNNAMED } else { name };
        let entry = QueuedNumber::new(phone.to_string(), name.to_string(), note.trim().to_string());
        let id = entry.id.clone();
        self.entries.push(entry);
        Ok(id)
    }

    /// Remove a target from the queue.
    ///
    /// Removal is refused while the number is mid-call so an active call can
    /// never be orphaned of its queue entry.
    pub fn remove(&mut self, id: &NumberId) -> Result<QueuedNumber> {
        let pos = self
            .entries
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| DialerError::not_found(id))?;
        if self.entries[pos].status == NumberStatus::Calling {
            return Err(DialerError::in_call(id));
        }
        Ok(self.entries.remove(pos))
    }

    /// Read-only view of the queue, optionally filtered by status.
    pub fn list_filtered(&self, filter: Option<NumberStatus>) -> Vec<QueuedNumber> {
        self.entries
            .iter()
            .filter(|n| filter.map_or(true, |s| n.status == s))
            .cloned()
            .collect()
    }

    /// Snapshot of all entries, used by the stats aggregator.
    pub fn snapshot(&self) -> Vec<QueuedNumber> {
        self.entries.clone()
    }

    /// `(id, phone)` pairs of every entry currently in `Waiting` status.
    pub fn waiting_targets(&self) -> Vec<(NumberId, String)> {
        self.entries
            .iter()
            .filter(|n| n.status == NumberStatus::Waiting)
            .map(|n| (n.id.clone(), n.phone.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Map heterogeneous external rows into queue entries.
    ///
    /// Rows with no resolvable phone field are dropped silently; the accepted
    /// count is returned and individual bad rows never fail the import.
    pub fn bulk_import(&mut self, rows: &[Value]) -> usize {
        let mut accepted = 0;
        for row in rows {
            let Some(phone) = field(row, &PHONE_KEYS) else {
                debug!("import row dropped, no resolvable phone field");
                continue;
            };
            let name = field(row, &NAME_KEYS).unwrap_or_else(|| UNNAMED.to_string());
            let note = field(row, &NOTE_KEYS).unwrap_or_default();
            self.entries.push(QueuedNumber::new(phone, name, note));
            accepted += 1;
        }
        accepted
    }

    pub(crate) fn get(&self, id: &NumberId) -> Option<&QueuedNumber> {
        self.entries.iter().find(|n| &n.id == id)
    }

    /// Dispatcher-only transition `Waiting -> Calling`, bumping the attempt
    /// count. Returns false if the entry is gone or no longer waiting, in
    /// which case the placement is skipped.
    pub(crate) fn mark_calling(&mut self, id: &NumberId) -> bool {
        match self.entries.iter_mut().find(|n| &n.id == id) {
            Some(entry) if entry.status == NumberStatus::Waiting => {
                entry.status = NumberStatus::Calling;
                entry.attempts += 1;
                true
            }
            _ => false,
        }
    }

    /// Recorder-only transition `Calling -> terminal`, populating the result
    /// fields. Returns false if the entry no longer exists.
    pub(crate) fn mark_resolved(
        &mut self,
        id: &NumberId,
        status: NumberStatus,
        duration_secs: u64,
        summary: &str,
        at: DateTime<Local>,
    ) -> bool {
        match self.entries.iter_mut().find(|n| &n.id == id) {
            Some(entry) => {
                entry.status = status;
                entry.duration_secs = duration_secs;
                entry.last_call = Some(at);
                entry.result = summary.to_string();
                true
            }
            None => false,
        }
    }
}

/// First non-empty string-convertible value among the given keys. Numeric
/// cells are accepted too since spreadsheet phone columns often parse as
/// numbers.
fn field(row: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        match row.get(*key)? {
            Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enqueue_rejects_empty_phone() {
        let mut queue = NumberQueue::new();
        assert!(matches!(
            queue.enqueue("", "Someone", ""),
            Err(DialerError::InvalidNumber { .. })
        ));
        assert!(matches!(
            queue.enqueue("   ", "Someone", ""),
            Err(DialerError::InvalidNumber { .. })
        ));
        assert!(queue.is_empty());
    }

    #[test]
    fn enqueue_defaults() {
        let mut queue = NumberQueue::new();
        let id = queue.enqueue("+90 532 123 4567", "", "").expect("enqueue failed");
        let entry = queue.get(&id).expect("entry missing");
        assert_eq!(entry.status, NumberStatus::Waiting);
        assert_eq!(entry.attempts, 0);
        assert_eq!(entry.name, UNNAMED);
        assert_eq!(entry.duration_secs, 0);
        assert_eq!(entry.result, "-");
        assert!(entry.last_call.is_none());
    }

    #[test]
    fn bulk_import_drops_rows_without_phone() {
        let mut queue = NumberQueue::new();
        let rows = vec![json!({ "Telefon": "555" }), json!({ "foo": "bar" })];
        assert_eq!(queue.bulk_import(&rows), 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.snapshot()[0].phone, "555");
    }

    #[test]
    fn bulk_import_tolerates_field_spellings() {
        let mut queue = NumberQueue::new();
        let rows = vec![
            json!({ "Telefon": "111", "Ad": "Ay", "Not": "vip" }),
            json!({ "phone": "222", "name": "Bee" }),
            json!({ "Phone": "333", "İsim": "Ce" }),
            json!({ "telefon": 5551234 }),
        ];
        assert_eq!(queue.bulk_import(&rows), 4);
        let entries = queue.snapshot();
        assert_eq!(entries[0].note, "vip");
        assert_eq!(entries[1].name, "Bee");
        assert_eq!(entries[2].name, "Ce");
        assert_eq!(entries[3].phone, "5551234");
        assert_eq!(entries[3].name, UNNAMED);
    }

    #[test]
    fn list_filtered_preserves_insertion_order() {
        let mut queue = NumberQueue::new();
        let a = queue.enqueue("111", "", "").unwrap();
        queue.enqueue("222", "", "").unwrap();
        queue.enqueue("333", "", "").unwrap();
        queue.mark_calling(&a);

        let all = queue.list_filtered(None);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].phone, "111");
        assert_eq!(all[2].phone, "333");

        let waiting = queue.list_filtered(Some(NumberStatus::Waiting));
        assert_eq!(waiting.len(), 2);
        assert_eq!(waiting[0].phone, "222");
    }

    #[test]
    fn remove_refused_while_calling() {
        let mut queue = NumberQueue::new();
        let id = queue.enqueue("111", "", "").unwrap();
        assert!(queue.mark_calling(&id));
        assert!(matches!(
            queue.remove(&id),
            Err(DialerError::NumberInCall { .. })
        ));

        queue.mark_resolved(&id, NumberStatus::Busy, 0, "busy", Local::now());
        assert!(queue.remove(&id).is_ok());
        assert!(queue.is_empty());
    }

    #[test]
    fn remove_unknown_id_fails() {
        let mut queue = NumberQueue::new();
        let ghost = NumberId::new();
        assert!(matches!(
            queue.remove(&ghost),
            Err(DialerError::NumberNotFound { .. })
        ));
    }

    #[test]
    fn mark_calling_only_from_waiting() {
        let mut queue = NumberQueue::new();
        let id = queue.enqueue("111", "", "").unwrap();
        assert!(queue.mark_calling(&id));
        // Already calling; a second placement must not double-dial it
        assert!(!queue.mark_calling(&id));
        assert_eq!(queue.get(&id).unwrap().attempts, 1);

        queue.mark_resolved(&id, NumberStatus::NoAnswer, 0, "-", Local::now());
        // Terminal entries are excluded until explicitly reset
        assert!(!queue.mark_calling(&id));
        assert!(queue.waiting_targets().is_empty());
    }
}
