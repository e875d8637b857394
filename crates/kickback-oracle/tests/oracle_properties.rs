//! Property-based tests for oracle compilation.

use kickback_ir::QubitId;
use kickback_oracle::{MarkedSet, PhaseFlip, TotalPredicate, compile, cost_of};
use proptest::prelude::*;

const WIDTH: u32 = 5;

fn arb_set() -> impl Strategy<Value = MarkedSet> {
    prop::collection::btree_set(0..(1i64 << WIDTH), 0..10)
        .prop_map(|members| MarkedSet::new(WIDTH, members).unwrap())
}

fn arb_flip() -> impl Strategy<Value = PhaseFlip> {
    prop_oneof![
        Just(PhaseFlip::InPlace),
        Just(PhaseFlip::ancilla(QubitId(WIDTH))),
        Just(PhaseFlip::kickback(QubitId(WIDTH))),
    ]
}

proptest! {
    #[test]
    fn gate_count_is_sum_of_costs(set in arb_set(), flip in arb_flip()) {
        let qubits: Vec<_> = QubitId::range(0, WIDTH).collect();
        let oracle = compile(&qubits, flip, &set).unwrap();
        let expected: usize = set.iter().map(|x| cost_of(x, WIDTH)).sum();
        prop_assert_eq!(oracle.num_ops(), expected);

        // Every op is an X dressing gate except one multi-controlled flip per member.
        let flips = oracle.operations().iter().filter(|op| op.is_controlled()).count();
        prop_assert_eq!(flips, set.len());
    }

    #[test]
    fn total_predicate_compiles_its_ones(
        entries in prop::collection::btree_map(0..(1i64 << WIDTH), any::<bool>(), 0..12),
        default in any::<bool>(),
    ) {
        let f = TotalPredicate::new(WIDTH, entries, default).unwrap();
        let qubits: Vec<_> = QubitId::range(0, WIDTH).collect();
        let oracle = compile(&qubits, PhaseFlip::kickback(QubitId(WIDTH)), &f).unwrap();
        let expected: usize = f.ones().map(|x| cost_of(x, WIDTH)).sum();
        prop_assert_eq!(oracle.num_ops(), expected);
    }
}
