use proptest::prelude::*;
use xf_record::{Predicate, Rank, Record, Sex};
use xf_reduce::{ConditionalCount, ConditionalRatio, Count, Reducer, RunningAverage};
use xf_test_utils::{record, record_strategy, records_strategy};

fn fold<R: Reducer>(reducer: &R, records: &[Record]) -> R::Acc {
    let mut acc = reducer.initial();
    for r in records {
        reducer.add(&mut acc, r);
    }
    acc
}

/// Add everything, remove the flagged records, compare with a fresh fold of
/// the survivors taken in a different order.
fn survivors_match<R: Reducer>(reducer: &R, records: &[Record], removed: &[bool]) {
    let mut acc = fold(reducer, records);
    let mut survivors = Vec::new();
    for (r, gone) in records.iter().zip(removed.iter().chain(std::iter::repeat(&false))) {
        if *gone {
            reducer.remove(&mut acc, r);
        } else {
            survivors.push(r.clone());
        }
    }
    survivors.reverse();
    assert_eq!(acc, fold(reducer, &survivors), "{}", reducer.name());
}

fn reversible<R: Reducer>(reducer: &R, base: &[Record], extra: &Record) {
    let before = fold(reducer, base);
    let mut acc = before.clone();
    reducer.add(&mut acc, extra);
    reducer.remove(&mut acc, extra);
    assert_eq!(acc, before, "{}", reducer.name());
}

fn reducers() -> (Count, ConditionalCount, ConditionalRatio, RunningAverage) {
    (
        Count,
        ConditionalCount::new(Predicate::Rank(Rank::AssocProf)),
        ConditionalRatio::share_of_rank(Sex::Female, Rank::Prof),
        RunningAverage::salary(),
    )
}

proptest! {
    #[test]
    fn prop_add_then_remove_is_identity(
        base in records_strategy(24),
        extra in record_strategy(),
    ) {
        let (count, conditional, ratio, average) = reducers();
        reversible(&count, &base, &extra);
        reversible(&conditional, &base, &extra);
        reversible(&ratio, &base, &extra);
        reversible(&average, &base, &extra);
    }

    #[test]
    fn prop_result_depends_only_on_survivors(
        records in records_strategy(32),
        removed in prop::collection::vec(any::<bool>(), 32),
    ) {
        let (count, conditional, ratio, average) = reducers();
        survivors_match(&count, &records, &removed);
        survivors_match(&conditional, &records, &removed);
        survivors_match(&ratio, &records, &removed);
        survivors_match(&average, &records, &removed);
    }

    #[test]
    fn prop_add_order_is_irrelevant(records in records_strategy(24).prop_shuffle()) {
        let (_, conditional, ratio, average) = reducers();
        let mut sorted = records.clone();
        sorted.sort_by_key(|r| (r.salary, r.rank, r.sex));
        prop_assert_eq!(fold(&ratio, &records), fold(&ratio, &sorted));
        prop_assert_eq!(fold(&average, &records), fold(&average, &sorted));
        prop_assert_eq!(fold(&conditional, &records), fold(&conditional, &sorted));
    }

    #[test]
    fn prop_emptied_accumulators_read_zero(records in records_strategy(16)) {
        let (_, _, ratio, average) = reducers();
        let mut r_acc = fold(&ratio, &records);
        let mut a_acc = fold(&average, &records);
        for r in &records {
            ratio.remove(&mut r_acc, r);
            average.remove(&mut a_acc, r);
        }
        prop_assert_eq!(ratio.value(&r_acc), 0.0);
        prop_assert_eq!(average.value(&a_acc), 0.0);
        prop_assert_eq!(r_acc, ratio.initial());
        prop_assert_eq!(a_acc, average.initial());
    }
}

#[test]
fn percent_professors_scenario() {
    let records = [
        record(Sex::Male, Rank::Prof, 100),
        record(Sex::Male, Rank::AsstProf, 100),
        record(Sex::Female, Rank::Prof, 100),
    ];
    let male = ConditionalRatio::share_of_rank(Sex::Male, Rank::Prof);
    let female = ConditionalRatio::share_of_rank(Sex::Female, Rank::Prof);

    assert_eq!(male.value(&fold(&male, &records)), 0.5);
    assert_eq!(female.value(&fold(&female, &records)), 1.0);
}

#[test]
fn running_average_scenario() {
    let low = record(Sex::Male, Rank::Prof, 100);
    let high = record(Sex::Male, Rank::Prof, 200);
    let average = RunningAverage::salary();

    let mut acc = fold(&average, &[low.clone(), high.clone()]);
    assert_eq!(average.value(&acc), 150.0);

    average.remove(&mut acc, &high);
    assert_eq!(average.value(&acc), 100.0);

    average.remove(&mut acc, &low);
    let value = average.value(&acc);
    assert_eq!(value, 0.0);
    assert!(!value.is_nan());
}
