//! Properties every replay must satisfy, checked over a deterministic
//! spread of gene chromosomes.

#![allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

use boom_core::{
    Chromosome, EngineError, Evaluator, RawAction, SetupError, SimulationConfig,
};
use boom_types::TickTrace;
use rust_decimal::Decimal;

/// Gene codes that decode to an action (or to nothing).
const ACTION_GENES: [i64; 5] = [0, 1, 2, 3, 6];

/// A spread of gene chromosomes: every code appears at every tick for some
/// seed, including runs far longer than the horizon.
fn gene_population() -> Vec<Chromosome> {
    (0..250_u64)
        .map(|seed| {
            let len = 8 + (seed % 9) as usize;
            let genes: Vec<i64> = (0..len)
                .map(|i| {
                    let pick = ((seed * 31 + (i as u64) * 17 + seed / 7) % 5) as usize;
                    ACTION_GENES.get(pick).copied().unwrap()
                })
                .collect();
            Chromosome::from_genes(&genes).unwrap()
        })
        .collect()
}

fn evaluator() -> Evaluator {
    Evaluator::new(&SimulationConfig::default()).unwrap()
}

fn traced(evaluator: &Evaluator, chromosome: &Chromosome) -> Vec<TickTrace> {
    evaluator.evaluate_traced(chromosome).unwrap().1
}

#[test]
fn stocks_never_negative_and_count_never_above_cap() {
    let evaluator = evaluator();
    for chromosome in gene_population() {
        for trace in traced(&evaluator, &chromosome) {
            assert!(trace.food >= Decimal::ZERO, "food negative at {}", trace.tick);
            assert!(trace.wood >= Decimal::ZERO, "wood negative at {}", trace.tick);
            assert!(
                trace.villagers <= trace.population_cap,
                "{} villagers over cap {} at tick {}",
                trace.villagers,
                trace.population_cap,
                trace.tick
            );
        }
    }
}

#[test]
fn idle_and_busy_ticks_cover_the_run() {
    let evaluator = evaluator();
    let tick_seconds = evaluator.config().tick_seconds;
    for chromosome in gene_population() {
        let (eval, traces) = evaluator.evaluate_traced(&chromosome).unwrap();
        let busy = traces.iter().filter(|t| t.training).count() as u64;
        assert_eq!(
            eval.report.tc_idle_seconds / tick_seconds + busy,
            eval.report.ticks_elapsed
        );
        assert!(eval.report.pop_block_seconds <= eval.report.ticks_elapsed * tick_seconds);
    }
}

#[test]
fn failures_only_for_dispatched_actions() {
    let evaluator = evaluator();
    for chromosome in gene_population() {
        let (eval, traces) = evaluator.evaluate_traced(&chromosome).unwrap();
        for failure in &eval.report.failures {
            assert!(failure.tick < eval.report.ticks_elapsed);
            let scheduled = chromosome.actions_at(failure.tick);
            assert!(scheduled.iter().any(|a| a.kind() == failure.action_kind));
        }
        let rejected: usize = traces
            .iter()
            .map(|t| t.outcomes.iter().filter(|o| !o.applied()).count())
            .sum();
        assert_eq!(rejected, eval.report.failures.len());
    }
}

#[test]
fn identical_inputs_give_byte_identical_reports() {
    let evaluator = evaluator();
    let population = gene_population();
    let first = evaluator.evaluate_population(&population);
    let second = evaluator.evaluate_population(&population);
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        let a = serde_json::to_string(a.as_ref().unwrap()).unwrap();
        let b = serde_json::to_string(b.as_ref().unwrap()).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn parallel_batch_matches_sequential_evaluation() {
    let evaluator = evaluator();
    let population = gene_population();
    let batch = evaluator.evaluate_population(&population);
    for (chromosome, result) in population.iter().zip(batch) {
        assert_eq!(evaluator.evaluate(chromosome).unwrap(), result.unwrap());
    }
}

#[test]
fn empty_chromosome_matches_all_noop_genes() {
    let evaluator = evaluator();
    let empty = evaluator.evaluate(&Chromosome::empty()).unwrap();
    let zeros = evaluator
        .evaluate(&Chromosome::from_genes(&[0; 12]).unwrap())
        .unwrap();
    assert_eq!(empty, zeros);
}

#[test]
fn actions_past_the_horizon_are_never_dispatched() {
    let evaluator = evaluator();
    let late = Chromosome::decode(&[
        RawAction::new(12, "train_villager"),
        RawAction::new(12, "build_house"),
        RawAction::new(40, "assign_food"),
    ])
    .unwrap();
    let eval = evaluator.evaluate(&late).unwrap();
    assert_eq!(eval, evaluator.evaluate(&Chromosome::empty()).unwrap());
}

#[test]
fn victory_ends_the_run_early() {
    let config = SimulationConfig::parse(
        "time:\n  max_ticks: 30\nvictory:\n  villager_target: 5\n",
    )
    .unwrap();
    let evaluator = Evaluator::new(&config).unwrap();
    let chromosome = Chromosome::decode(&[
        RawAction::new(0, "train_villager"),
        RawAction::new(4, "train_villager"),
        // After the victory tick: never dispatched.
        RawAction::new(10, "build_house"),
    ])
    .unwrap();
    let eval = evaluator.evaluate(&chromosome).unwrap();
    let report = &eval.report;

    assert!(report.victory);
    assert_eq!(report.villager_count, 5);
    // The second villager completes at tick 7.
    assert_eq!(report.ticks_elapsed, 8);
    assert!(report.failures.is_empty());
    assert_eq!(report.food, Decimal::new(100, 0));
    // Busy 0..=2 and 4..=6; idle at the end of 3 and 7.
    assert_eq!(report.tc_idle_seconds, 20);
    // 500 + 10 - 20 + 1000
    assert_eq!(eval.fitness, Decimal::new(1490, 0));
}

#[test]
fn setup_errors_yield_no_report() {
    let evaluator = evaluator();

    let out_of_order = Chromosome::decode(&[
        RawAction::new(5, "assign_food"),
        RawAction::new(4, "assign_food"),
    ]);
    assert!(matches!(out_of_order, Err(SetupError::OutOfOrder { .. })));

    let unknown = Chromosome::decode(&[RawAction::new(0, "attack")]);
    assert!(matches!(unknown, Err(SetupError::UnknownKind { .. })));

    let unreachable = Chromosome::decode(&[RawAction::new(0, "assign_food").with_target(3)])
        .unwrap();
    assert!(matches!(
        evaluator.evaluate(&unreachable),
        Err(EngineError::Setup {
            source: SetupError::TargetOutOfRange { .. }
        })
    ));
}

#[test]
fn ledger_balances_through_every_replay() {
    // A replay that ends out of balance would surface as an error.
    let evaluator = evaluator();
    for chromosome in gene_population() {
        let eval = evaluator.evaluate(&chromosome).unwrap();
        let traces = traced(&evaluator, &chromosome);
        let income: Decimal = traces.iter().map(|t| t.income.food).sum();
        let spent_on_villagers =
            Decimal::from(eval.report.villager_count - 3 + u32::from(trained_pending(&traces)))
                * Decimal::new(50, 0);
        assert_eq!(
            Decimal::new(200, 0) + income - spent_on_villagers,
            eval.report.food
        );
    }
}

/// 1 if a training order is still in flight at the end of the run.
fn trained_pending(traces: &[TickTrace]) -> u8 {
    u8::from(traces.last().is_some_and(|t| t.training))
}

#[test]
fn horizon_override_changes_run_length() {
    let config = SimulationConfig::parse("time:\n  max_ticks: 3\n").unwrap();
    let evaluator = Evaluator::new(&config).unwrap();
    let eval = evaluator.evaluate(&Chromosome::empty()).unwrap();
    assert_eq!(eval.report.ticks_elapsed, 3);
    assert_eq!(eval.report.tc_idle_seconds, 30);
}
