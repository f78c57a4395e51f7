//! Typed notifications shared between widgets.
//!
//! Publishing is synchronous: every listener runs to completion, in the order
//! it subscribed, before `publish` returns.
use serde::{Deserialize, Serialize};

/// Notifications broadcast on the application bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "detail")]
pub enum AppEvent {
    /// Per-person share changed.
    #[serde(rename = "amount-change", rename_all = "camelCase")]
    AmountChange {
        amount: f64,
        total_amount: f64,
        no_of_people: u32,
    },
    /// Selected identifier changed; an empty id means nothing is selected.
    #[serde(rename = "promptpay-save")]
    PromptPaySave { id: String, label: String },
    #[serde(rename = "setup-collapse")]
    SetupCollapse { collapsed: bool },
}

impl AppEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::AmountChange { .. } => "amount-change",
            AppEvent::PromptPaySave { .. } => "promptpay-save",
            AppEvent::SetupCollapse { .. } => "setup-collapse",
        }
    }
}

type Listener = Box<dyn FnMut(&AppEvent)>;

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&AppEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn publish(&mut self, event: AppEvent) {
        tracing::debug!(
            event = event.name(),
            listeners = self.listeners.len(),
            "publish"
        );
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
