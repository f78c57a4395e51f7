use super::{parse_amount, parse_people, AmountInput, AmountState};
use crate::app::test_support::recording_context;
use crate::events::AppEvent;
use crate::storage::MemoryStore;

#[test]
fn splits_total_across_party() {
    let (mut ctx, seen) = recording_context(MemoryStore::new());
    let mut input = AmountInput::new();

    input.input_amount(&mut ctx, "100");
    input.input_people(&mut ctx, "3");

    let events = seen.borrow();
    assert_eq!(events.len(), 2);
    match &events[1] {
        AppEvent::AmountChange {
            amount,
            total_amount,
            no_of_people,
        } => {
            assert!((amount - 33.333_333).abs() < 1e-4);
            assert_eq!(*total_amount, 100.0);
            assert_eq!(*no_of_people, 3);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn per_person_matches_division_for_valid_inputs() {
    for (total, people) in [(0.0, 1), (10.0, 4), (999.99, 7), (1.0, 1000)] {
        let state = AmountState {
            total_amount: Some(total),
            party_count: people,
        };
        let share = state.per_person_amount().expect("defined total");
        assert!((share - total / f64::from(people)).abs() < 1e-9);
    }
}

#[test]
fn party_count_is_clamped_to_one() {
    assert_eq!(parse_people(""), 1);
    assert_eq!(parse_people("0"), 1);
    assert_eq!(parse_people("-4"), 1);
    assert_eq!(parse_people("abc"), 1);
    assert_eq!(parse_people("3.7"), 3);
    assert_eq!(parse_people(" 12 "), 12);
}

#[test]
fn oversized_party_count_saturates() {
    assert_eq!(parse_people("99999999999999999999"), u32::MAX);
    assert_eq!(parse_people("4294967296"), u32::MAX);
    assert_eq!(parse_people("-99999999999999999999"), 1);
}

#[test]
fn empty_amount_is_zero_and_garbage_is_undefined() {
    assert_eq!(parse_amount(""), Some(0.0));
    assert_eq!(parse_amount("12.5"), Some(12.5));
    assert_eq!(parse_amount("twelve"), None);
    assert_eq!(parse_amount("NaN"), None);
}

#[test]
fn undefined_or_negative_total_is_not_published() {
    let (mut ctx, seen) = recording_context(MemoryStore::new());
    let mut input = AmountInput::new();

    input.input_amount(&mut ctx, "oops");
    input.input_people(&mut ctx, "2");
    input.input_amount(&mut ctx, "-10");
    assert!(seen.borrow().is_empty());

    input.input_amount(&mut ctx, "");
    assert_eq!(
        *seen.borrow(),
        vec![AppEvent::AmountChange {
            amount: 0.0,
            total_amount: 0.0,
            no_of_people: 2,
        }]
    );
}
