//! Saved PromptPay identifiers.
//!
//! The collection lives under one storage key and is rewritten in full after
//! every mutation. Whenever the collection is non-empty exactly one record is
//! selected; selection changes are broadcast as `promptpay-save`.
use crate::app::AppContext;
use crate::events::AppEvent;
use crate::storage::StorageError;
use crate::util::sanitize_id;
use serde::{Deserialize, Serialize};

/// Storage key holding the JSON-encoded identifier collection.
pub const IDS_KEY: &str = "promptPayIds";
/// Older single-identifier key, migrated on first load.
pub const LEGACY_ID_KEY: &str = "promptPayId";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIdentifierRecord {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub selected: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentifierError {
    #[error("PromptPay ID must contain at least one digit")]
    Empty,
    #[error("PromptPay ID {0} is already saved")]
    Duplicate(String),
    #[error("no saved PromptPay ID at index {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug)]
pub struct IdentifierStore {
    records: Vec<PaymentIdentifierRecord>,
    collapsed: bool,
}

impl IdentifierStore {
    /// Read the persisted collection, migrating the legacy key when needed.
    pub fn load(ctx: &mut AppContext) -> Result<Self, IdentifierError> {
        let mut records = read_records(ctx);
        if ctx.store.get(IDS_KEY).is_none() {
            if let Some(legacy) = ctx.store.get(LEGACY_ID_KEY) {
                let id = sanitize_id(&legacy);
                if !id.is_empty() {
                    tracing::info!(%id, "migrating legacy PromptPay ID");
                    records = vec![PaymentIdentifierRecord {
                        id,
                        label: String::new(),
                        selected: true,
                    }];
                    persist(ctx, &records)?;
                }
                ctx.store.remove(LEGACY_ID_KEY)?;
            }
        }
        normalize_selection(&mut records);
        let collapsed = !records.is_empty();
        Ok(Self { records, collapsed })
    }

    pub fn records(&self) -> &[PaymentIdentifierRecord] {
        &self.records
    }

    pub fn selected(&self) -> Option<&PaymentIdentifierRecord> {
        self.records.iter().find(|record| record.selected)
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Save a new identifier; the first one saved becomes the selection.
    pub fn add(
        &mut self,
        ctx: &mut AppContext,
        raw_id: &str,
        label: &str,
    ) -> Result<(), IdentifierError> {
        let id = sanitize_id(raw_id);
        if id.is_empty() {
            tracing::warn!(raw = raw_id, "rejected empty PromptPay ID");
            return Err(IdentifierError::Empty);
        }
        if self.position(&id).is_some() {
            tracing::warn!(%id, "rejected duplicate PromptPay ID");
            return Err(IdentifierError::Duplicate(id));
        }

        let was_empty = self.records.is_empty();
        self.records.push(PaymentIdentifierRecord {
            id: id.clone(),
            label: label.trim().to_string(),
            selected: was_empty,
        });
        persist(ctx, &self.records)?;
        tracing::info!(%id, count = self.records.len(), "saved PromptPay ID");

        if was_empty {
            self.select(ctx, &id)?;
        }
        self.set_collapsed(ctx, true);
        Ok(())
    }

    /// Make `raw_id` the selection. Returns `false` when no record matches.
    pub fn select(
        &mut self,
        ctx: &mut AppContext,
        raw_id: &str,
    ) -> Result<bool, IdentifierError> {
        let id = sanitize_id(raw_id);
        let Some(index) = self.position(&id) else {
            tracing::debug!(%id, "select ignored; unknown PromptPay ID");
            return Ok(false);
        };
        for (idx, record) in self.records.iter_mut().enumerate() {
            record.selected = idx == index;
        }
        persist(ctx, &self.records)?;
        tracing::info!(%id, "selected PromptPay ID");
        let record = &self.records[index];
        ctx.bus.publish(AppEvent::PromptPaySave {
            id: record.id.clone(),
            label: record.label.clone(),
        });
        Ok(true)
    }

    /// Remove the record at `index`, moving the selection when needed.
    pub fn delete(
        &mut self,
        ctx: &mut AppContext,
        index: usize,
    ) -> Result<PaymentIdentifierRecord, IdentifierError> {
        if index >= self.records.len() {
            return Err(IdentifierError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        let removed = self.records.remove(index);
        persist(ctx, &self.records)?;
        tracing::info!(id = %removed.id, remaining = self.records.len(), "deleted PromptPay ID");

        if self.records.is_empty() {
            ctx.bus.publish(AppEvent::PromptPaySave {
                id: String::new(),
                label: String::new(),
            });
        } else if removed.selected {
            let first = self.records[0].id.clone();
            self.select(ctx, &first)?;
        }
        Ok(removed)
    }

    /// Show or hide the setup form.
    pub fn toggle_setup(&mut self, ctx: &mut AppContext) {
        let collapsed = !self.collapsed;
        self.set_collapsed(ctx, collapsed);
    }

    fn set_collapsed(&mut self, ctx: &mut AppContext, collapsed: bool) {
        self.collapsed = collapsed;
        ctx.bus.publish(AppEvent::SetupCollapse { collapsed });
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }
}

/// Selected record from the persisted collection, without building a store.
pub fn persisted_selection(ctx: &AppContext) -> Option<PaymentIdentifierRecord> {
    let mut records = read_records(ctx);
    normalize_selection(&mut records);
    records.into_iter().find(|record| record.selected)
}

fn read_records(ctx: &AppContext) -> Vec<PaymentIdentifierRecord> {
    let Some(raw) = ctx.store.get(IDS_KEY) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<PaymentIdentifierRecord>>(&raw) {
        Ok(mut records) => {
            for record in records.iter_mut() {
                record.id = sanitize_id(&record.id);
            }
            records.retain(|record| !record.id.is_empty());
            records
        }
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unreadable {IDS_KEY} entry");
            Vec::new()
        }
    }
}

/// Repair collections written by hand so exactly one record is selected.
fn normalize_selection(records: &mut [PaymentIdentifierRecord]) {
    let keep = records
        .iter()
        .position(|record| record.selected)
        .or_else(|| (!records.is_empty()).then_some(0));
    for (idx, record) in records.iter_mut().enumerate() {
        record.selected = Some(idx) == keep;
    }
}

fn persist(
    ctx: &mut AppContext,
    records: &[PaymentIdentifierRecord],
) -> Result<(), StorageError> {
    let json = serde_json::to_string(records).map_err(|source| StorageError::Encode {
        key: IDS_KEY.to_string(),
        source,
    })?;
    ctx.store.set(IDS_KEY, &json)
}

#[cfg(test)]
#[path = "identifiers_tests.rs"]
mod tests;
