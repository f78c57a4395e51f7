use super::{QrRender, QrView, RenderState, NO_ID_MESSAGE};
use crate::app::AppContext;
use crate::events::AppEvent;
use crate::identifiers::IDS_KEY;
use crate::payload::PromptPayEncoder;
use crate::qr::{DrawError, QrCodeDrawer, QrDrawer, QrOptions};
use crate::storage::MemoryStore;
use std::io::Write;

struct FailingDrawer;

impl QrDrawer for FailingDrawer {
    fn draw(
        &self,
        _payload: &str,
        _target: &mut dyn Write,
        _options: &QrOptions,
    ) -> Result<(), DrawError> {
        Err(DrawError::Options("canvas unavailable".to_string()))
    }
}

/// Writes the payload itself so tests can assert on what would be drawn.
struct EchoDrawer;

impl QrDrawer for EchoDrawer {
    fn draw(
        &self,
        payload: &str,
        target: &mut dyn Write,
        _options: &QrOptions,
    ) -> Result<(), DrawError> {
        writeln!(target, "[{payload}]")?;
        Ok(())
    }
}

fn render_with(store: MemoryStore, drawer: Box<dyn QrDrawer>) -> QrRender {
    let ctx = AppContext::new(Box::new(store));
    QrRender::new(
        &ctx,
        Box::new(PromptPayEncoder),
        drawer,
        QrOptions::default(),
    )
}

fn select(id: &str, label: &str) -> AppEvent {
    AppEvent::PromptPaySave {
        id: id.to_string(),
        label: label.to_string(),
    }
}

#[test]
fn starts_without_identifier_and_shows_prompt() {
    let render = render_with(MemoryStore::new(), Box::new(QrCodeDrawer));
    assert_eq!(render.state(), &RenderState::NoIdentifier);
    assert_eq!(render.view(), &QrView::Prompt);
    assert_eq!(render.view().to_string(), format!("{NO_ID_MESSAGE}\n"));
}

#[test]
fn starts_ready_when_a_selection_is_persisted() {
    let store = MemoryStore::new().with_entry(
        IDS_KEY,
        r#"[{"id":"0812345678","label":"Personal","selected":true}]"#,
    );
    let render = render_with(store, Box::new(EchoDrawer));

    let QrView::Ready(view) = render.view() else {
        panic!("expected ready view");
    };
    assert_eq!(view.id, "0812345678");
    assert_eq!(view.summary, vec!["฿0.00"]);
}

#[test]
fn selection_events_drive_state_transitions() {
    let mut render = render_with(MemoryStore::new(), Box::new(EchoDrawer));

    render.on_event(&select("0812345678", "Personal"));
    assert_eq!(
        render.state(),
        &RenderState::Ready {
            id: "0812345678".to_string(),
            label: "Personal".to_string(),
        }
    );

    render.on_event(&select("", ""));
    assert_eq!(render.state(), &RenderState::NoIdentifier);
    assert_eq!(render.view(), &QrView::Prompt);
}

#[test]
fn amount_change_redraws_with_new_share() {
    let mut render = render_with(MemoryStore::new(), Box::new(EchoDrawer));
    render.on_event(&select("0812345678", ""));
    let before = render.redraw_count();

    render.on_event(&AppEvent::AmountChange {
        amount: 25.0,
        total_amount: 100.0,
        no_of_people: 4,
    });

    assert_eq!(render.redraw_count(), before + 1);
    let text = render.view().to_string();
    assert!(text.contains("Total: ฿100.00"));
    assert!(text.contains("4 people • ฿25.00 each"));
    assert!(text.contains("540525.00"));
    assert!(text.ends_with("PromptPay ID: 0812345678\n"));
}

#[test]
fn setup_collapse_does_not_redraw() {
    let mut render = render_with(MemoryStore::new(), Box::new(EchoDrawer));
    let before = render.redraw_count();
    render.on_event(&AppEvent::SetupCollapse { collapsed: false });
    assert_eq!(render.redraw_count(), before);
}

#[test]
fn draw_failure_raises_alert_and_stays_usable() {
    let mut render = render_with(MemoryStore::new(), Box::new(FailingDrawer));
    render.on_event(&select("0812345678", "Personal"));

    assert_eq!(render.alert(), Some("Error rendering QR code"));
    let QrView::Ready(view) = render.view() else {
        panic!("expected ready view");
    };
    assert!(view.bitmap.is_empty());
    assert!(view.payload.is_some());

    render.on_event(&select("", ""));
    assert_eq!(render.alert(), None);
}
