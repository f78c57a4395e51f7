//! Application context and widget wiring.
//!
//! The key-value store and the event bus are owned by one `AppContext` that is
//! passed explicitly to every widget operation.
use crate::amount::{AmountInput, AmountState};
use crate::events::EventBus;
use crate::identifiers::{IdentifierError, IdentifierStore, PaymentIdentifierRecord};
use crate::payload::{PayloadEncoder, PromptPayEncoder};
use crate::qr::{QrCodeDrawer, QrDrawer, QrOptions};
use crate::render::{QrRender, QrView, RenderState};
use crate::storage::KeyValueStore;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared collaborators every widget works against.
pub struct AppContext {
    pub store: Box<dyn KeyValueStore>,
    pub bus: EventBus,
}

impl AppContext {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            bus: EventBus::new(),
        }
    }
}

/// The three widgets bound to one context.
pub struct App {
    ctx: AppContext,
    amount: AmountInput,
    identifiers: IdentifierStore,
    render: Rc<RefCell<QrRender>>,
}

impl App {
    pub fn new(
        store: Box<dyn KeyValueStore>,
        options: QrOptions,
    ) -> Result<Self, IdentifierError> {
        Self::with_collaborators(
            store,
            Box::new(PromptPayEncoder),
            Box::new(QrCodeDrawer),
            options,
        )
    }

    pub fn with_collaborators(
        store: Box<dyn KeyValueStore>,
        encoder: Box<dyn PayloadEncoder>,
        drawer: Box<dyn QrDrawer>,
        options: QrOptions,
    ) -> Result<Self, IdentifierError> {
        let mut ctx = AppContext::new(store);
        let identifiers = IdentifierStore::load(&mut ctx)?;
        let render = Rc::new(RefCell::new(QrRender::new(&ctx, encoder, drawer, options)));
        let listener = Rc::clone(&render);
        ctx.bus
            .subscribe(move |event| listener.borrow_mut().on_event(event));
        tracing::debug!(saved = identifiers.records().len(), "app ready");
        Ok(Self {
            ctx,
            amount: AmountInput::new(),
            identifiers,
            render,
        })
    }

    pub fn context_mut(&mut self) -> &mut AppContext {
        &mut self.ctx
    }

    pub fn input_amount(&mut self, raw: &str) {
        self.amount.input_amount(&mut self.ctx, raw);
    }

    pub fn input_people(&mut self, raw: &str) {
        self.amount.input_people(&mut self.ctx, raw);
    }

    pub fn amount_state(&self) -> AmountState {
        self.amount.state()
    }

    pub fn add_identifier(&mut self, raw_id: &str, label: &str) -> Result<(), IdentifierError> {
        self.identifiers.add(&mut self.ctx, raw_id, label)
    }

    pub fn select_identifier(&mut self, raw_id: &str) -> Result<bool, IdentifierError> {
        self.identifiers.select(&mut self.ctx, raw_id)
    }

    pub fn delete_identifier(
        &mut self,
        index: usize,
    ) -> Result<PaymentIdentifierRecord, IdentifierError> {
        self.identifiers.delete(&mut self.ctx, index)
    }

    pub fn toggle_setup(&mut self) -> bool {
        self.identifiers.toggle_setup(&mut self.ctx);
        self.identifiers.is_collapsed()
    }

    pub fn identifiers(&self) -> &[PaymentIdentifierRecord] {
        self.identifiers.records()
    }

    pub fn selected_identifier(&self) -> Option<&PaymentIdentifierRecord> {
        self.identifiers.selected()
    }

    pub fn render_state(&self) -> RenderState {
        self.render.borrow().state().clone()
    }

    pub fn view(&self) -> QrView {
        self.render.borrow().view().clone()
    }

    pub fn alert(&self) -> Option<String> {
        self.render.borrow().alert().map(str::to_string)
    }
}
