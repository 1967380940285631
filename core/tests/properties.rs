use hexcalc_core::{
    CalcError, Calculator, CalculatorOptions, HistoryError, Literal, assert_matches,
    codec::max_value_for_bits,
};
use proptest::prelude::*;

fn calculator(width: u32, ring_size: u32) -> Calculator {
    Calculator::new(CalculatorOptions::new(width, ring_size).unwrap())
}

fn literal(token: &str) -> Literal {
    Literal::parse(token).unwrap()
}

proptest! {
    #[test]
    fn set_width_truncates_or_extends(hex in "[0-9a-f]{1,16}", width in 1u32..=16) {
        let mut calc = calculator(0, 16);
        calc.assign(&literal(&hex)).unwrap();
        calc.set_width(width).unwrap();

        let value = u64::from_str_radix(&hex, 16).unwrap() & max_value_for_bits(width * 4);
        prop_assert_eq!(calc.state().digits().len(), width as usize);
        prop_assert_eq!(calc.state().hex(), format!("{value:0w$x}", w = width as usize));
    }

    #[test]
    fn double_inversion_is_identity(
        value in any::<u64>(),
        width in 1u32..=16,
        a in 0u32..64,
        b in 0u32..64,
    ) {
        let bits = width * 4;
        let (a, b) = (a % bits, b % bits);
        let mut calc = calculator(width, 16);
        calc.assign(&literal(&format!("{:x}", value & max_value_for_bits(bits)))).unwrap();
        let before = calc.state().clone();

        calc.invert(a, b).unwrap();
        calc.invert(b, a).unwrap();
        prop_assert_eq!(calc.state(), &before);
    }

    #[test]
    fn full_ring_keeps_all_but_one_slot(ring_size in 3u32..=24, extra in 0u32..40) {
        let mut calc = calculator(8, ring_size);
        let retained = ring_size as usize - 1;
        for i in 0..retained as u32 + extra {
            calc.assign(&literal(&format!("{i:x}"))).unwrap();
        }
        prop_assert_eq!(calc.checkpoints().len(), retained);

        for _ in 0..retained - 1 {
            prop_assert!(calc.undo().is_ok());
        }
        prop_assert_eq!(calc.undo(), Err(CalcError::History(HistoryError::EmptyUndoHistory)));
    }

    #[test]
    fn undo_then_redo_restores_state(values in prop::collection::vec(any::<u32>(), 1..10)) {
        let mut calc = Calculator::default();
        for value in values.iter() {
            calc.assign(&literal(&format!("'d{value}"))).unwrap();
        }
        let before = calc.state().clone();

        calc.undo().unwrap();
        calc.redo().unwrap();
        prop_assert_eq!(calc.state(), &before);
    }

    #[test]
    fn replace_round_trips_through_highlight(
        background in any::<u64>(),
        value in any::<u64>(),
        a in 0u32..64,
        b in 0u32..64,
    ) {
        let mut calc = calculator(16, 16);
        calc.assign(&literal(&format!("{background:x}"))).unwrap();
        calc.set_permanent_highlight(a, b).unwrap();
        let range = calc.state().permanent_highlight().unwrap();
        let width = range.width();

        let value = value & max_value_for_bits(width);
        calc.replace(&literal(&format!("{value:x}"))).unwrap();
        prop_assert_eq!(
            calc.state().read_bits(range),
            format!("{value:0w$b}", w = width as usize)
        );

        if width < 64 {
            let before = calc.state().clone();
            let too_large = value | (1 << width);
            prop_assert_eq!(
                calc.replace(&literal(&format!("{too_large:x}"))),
                Err(CalcError::ValueTooLargeForHighlight { bits: width })
            );
            prop_assert_eq!(calc.state(), &before);
        }
    }
}

#[test]
fn undoing_highlight_disables_replace() {
    let mut calc = calculator(4, 16);
    calc.set_permanent_highlight(0, 7).unwrap();
    assert_matches!(
        calc.replace(&literal("'d256")),
        Err(CalcError::ValueTooLargeForHighlight { bits: 8 })
    );
    calc.undo().unwrap();
    assert_matches!(calc.replace(&literal("1")), Err(CalcError::NoHighlight));
}
