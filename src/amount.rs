//! Amount input: total and party size, re-derived on every keystroke.
use crate::app::AppContext;
use crate::events::AppEvent;

/// In-memory amount state; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountState {
    /// `None` while the amount field holds something unparsable.
    pub total_amount: Option<f64>,
    pub party_count: u32,
}

impl Default for AmountState {
    fn default() -> Self {
        Self {
            total_amount: Some(0.0),
            party_count: 1,
        }
    }
}

impl AmountState {
    pub fn per_person_amount(&self) -> Option<f64> {
        self.total_amount
            .map(|total| total / f64::from(self.party_count.max(1)))
    }
}

#[derive(Debug, Default)]
pub struct AmountInput {
    state: AmountState,
}

impl AmountInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AmountState {
        self.state
    }

    /// Keystroke in the amount field.
    pub fn input_amount(&mut self, ctx: &mut AppContext, raw: &str) {
        self.state.total_amount = parse_amount(raw);
        self.notify(ctx);
    }

    /// Keystroke in the party-count field.
    pub fn input_people(&mut self, ctx: &mut AppContext, raw: &str) {
        self.state.party_count = parse_people(raw);
        self.notify(ctx);
    }

    fn notify(&self, ctx: &mut AppContext) {
        let Some(total_amount) = self.state.total_amount else {
            tracing::debug!("amount undefined; change not published");
            return;
        };
        if total_amount < 0.0 {
            tracing::debug!(total_amount, "negative amount; change not published");
            return;
        }
        let no_of_people = self.state.party_count;
        ctx.bus.publish(AppEvent::AmountChange {
            amount: total_amount / f64::from(no_of_people),
            total_amount,
            no_of_people,
        });
    }
}

/// Empty input means zero; anything unparsable leaves the amount undefined.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Party count is clamped to at least one; fractions are truncated.
pub fn parse_people(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let digits_end = trimmed
        .char_indices()
        .find(|(idx, ch)| !(ch.is_ascii_digit() || (*idx == 0 && *ch == '-')))
        .map(|(idx, _)| idx)
        .unwrap_or(trimmed.len());
    let number = &trimmed[..digits_end];
    match number.parse::<i64>() {
        Ok(count) => count.clamp(1, i64::from(u32::MAX)) as u32,
        // Too many digits for i64.
        Err(_) if !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()) => u32::MAX,
        Err(_) => 1,
    }
}

#[cfg(test)]
#[path = "amount_tests.rs"]
mod tests;
