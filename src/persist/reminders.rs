use crate::foundation::error::WishlyResult;
use crate::persist::store::KeyValueStore;
use crate::reminder::schedule::ReminderRecord;

/// Slot holding the JSON array of saved reminders.
pub const REMINDERS_KEY: &str = "wishly_events_v3";

/// Saved reminders in insertion order. Absent or malformed lists read as empty.
pub fn list_reminders(store: &dyn KeyValueStore) -> Vec<ReminderRecord> {
    let raw = match store.get(REMINDERS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "reading reminders failed");
            return Vec::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "saved reminders are malformed; ignoring");
        Vec::new()
    })
}

/// Append `record` to the saved list.
pub fn save_reminder(store: &mut dyn KeyValueStore, record: ReminderRecord) -> WishlyResult<()> {
    let mut all = list_reminders(store);
    all.push(record);
    let json = serde_json::to_string(&all)?;
    store.set(REMINDERS_KEY, &json)?;
    tracing::debug!(count = all.len(), "reminder saved");
    Ok(())
}

pub fn clear_reminders(store: &mut dyn KeyValueStore) -> WishlyResult<()> {
    store.remove(REMINDERS_KEY)
}

#[cfg(test)]
#[path = "../../tests/unit/persist/reminders.rs"]
mod tests;
