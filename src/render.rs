//! QR render widget.
//!
//! A pure subscriber: it never mutates shared state, it only recomputes its
//! view whenever the amount or the selected identifier changes.
use crate::app::AppContext;
use crate::events::AppEvent;
use crate::identifiers::persisted_selection;
use crate::payload::PayloadEncoder;
use crate::qr::{QrDrawer, QrOptions};
use crate::util::format_currency;
use std::fmt;

pub const NO_ID_MESSAGE: &str = "Please set your PromptPay ID first";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderState {
    NoIdentifier,
    Ready { id: String, label: String },
}

/// What the widget currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum QrView {
    Prompt,
    Ready(ReadyView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadyView {
    pub summary: Vec<String>,
    pub id: String,
    pub label: String,
    pub payload: Option<String>,
    /// Drawn bitmap in the configured format; empty when drawing failed.
    pub bitmap: Vec<u8>,
}

pub struct QrRender {
    encoder: Box<dyn PayloadEncoder>,
    drawer: Box<dyn QrDrawer>,
    options: QrOptions,
    state: RenderState,
    amount: f64,
    total_amount: f64,
    no_of_people: u32,
    view: QrView,
    alert: Option<String>,
    redraws: usize,
}

impl QrRender {
    /// Build the widget from the currently persisted selection and draw once.
    pub fn new(
        ctx: &AppContext,
        encoder: Box<dyn PayloadEncoder>,
        drawer: Box<dyn QrDrawer>,
        options: QrOptions,
    ) -> Self {
        let state = match persisted_selection(ctx) {
            Some(record) => RenderState::Ready {
                id: record.id,
                label: record.label,
            },
            None => RenderState::NoIdentifier,
        };
        let mut render = Self {
            encoder,
            drawer,
            options,
            state,
            amount: 0.0,
            total_amount: 0.0,
            no_of_people: 1,
            view: QrView::Prompt,
            alert: None,
            redraws: 0,
        };
        render.redraw();
        render
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn view(&self) -> &QrView {
        &self.view
    }

    /// Last user-facing failure, if the latest redraw hit one.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    #[cfg(test)]
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    pub fn on_event(&mut self, event: &AppEvent) {
        match event {
            AppEvent::AmountChange {
                amount,
                total_amount,
                no_of_people,
            } => {
                self.amount = *amount;
                self.total_amount = *total_amount;
                self.no_of_people = *no_of_people;
            }
            AppEvent::PromptPaySave { id, label } => {
                self.state = if id.is_empty() {
                    RenderState::NoIdentifier
                } else {
                    RenderState::Ready {
                        id: id.clone(),
                        label: label.clone(),
                    }
                };
            }
            AppEvent::SetupCollapse { .. } => return,
        }
        self.redraw();
    }

    fn redraw(&mut self) {
        self.redraws += 1;
        self.alert = None;
        let (id, label) = match &self.state {
            RenderState::NoIdentifier => {
                self.view = QrView::Prompt;
                return;
            }
            RenderState::Ready { id, label } => (id.clone(), label.clone()),
        };

        let mut bitmap: Vec<u8> = Vec::new();
        let payload = match self.encoder.encode(&id, self.amount) {
            Ok(payload) => {
                if let Err(err) = self.drawer.draw(&payload, &mut bitmap, &self.options) {
                    tracing::error!(error = %err, "QR render failed");
                    self.alert = Some("Error rendering QR code".to_string());
                    bitmap.clear();
                }
                Some(payload)
            }
            Err(err) => {
                tracing::error!(error = %err, %id, "QR payload encoding failed");
                self.alert = Some(format!("Error rendering QR code: {err}"));
                None
            }
        };
        tracing::debug!(%id, amount = self.amount, redraws = self.redraws, "QR redrawn");

        self.view = QrView::Ready(ReadyView {
            summary: self.summary_lines(),
            id,
            label,
            payload,
            bitmap,
        });
    }

    fn summary_lines(&self) -> Vec<String> {
        if self.no_of_people > 1 {
            vec![
                format!("Total: {}", format_currency(self.total_amount)),
                format!(
                    "{} people • {} each",
                    self.no_of_people,
                    format_currency(self.amount)
                ),
            ]
        } else {
            vec![format_currency(self.amount)]
        }
    }
}

impl fmt::Debug for QrRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QrRender")
            .field("state", &self.state)
            .field("amount", &self.amount)
            .field("no_of_people", &self.no_of_people)
            .field("redraws", &self.redraws)
            .finish()
    }
}

impl fmt::Display for QrView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QrView::Prompt => writeln!(f, "{NO_ID_MESSAGE}"),
            QrView::Ready(view) => {
                for line in &view.summary {
                    writeln!(f, "{line}")?;
                }
                if !view.bitmap.is_empty() {
                    write!(f, "{}", String::from_utf8_lossy(&view.bitmap))?;
                }
                if view.label.is_empty() {
                    writeln!(f, "PromptPay ID: {}", view.id)
                } else {
                    writeln!(f, "PromptPay ID: {} ({})", view.id, view.label)
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
