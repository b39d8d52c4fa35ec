//! Action validation and execution.
//!
//! Each handler checks its kind-specific preconditions in a fixed order and
//! applies the side effects only when every check passes:
//!
//! | Kind | Checks, in order | Effect |
//! |------|------------------|--------|
//! | `assign_food` / `assign_wood` | target (or any) villager idle | villager gathers |
//! | `build_house` | wood covers the cost | wood debited, house queued |
//! | `train_villager` | Town Center free, room under cap, food covers the cost | food debited, id reserved, order queued |
//!
//! A handler returns a [`Verdict`]: `Ok(())` when applied, or the
//! [`FailureReason`] when rejected. A rejected action changes nothing. The
//! outer `Result` is reserved for broken invariants.

use boom_ledger::LedgerError;
use boom_types::{Command, FailureReason, Resource, ResourceAmounts, Tick, VillagerId};
use tracing::debug;

use crate::config::ResolvedConfig;
use crate::queues::TrainingOrder;
use crate::tick::{SimulationError, SimulationState};

/// The outcome of one action: applied, or rejected with a reason.
pub type Verdict = Result<(), FailureReason>;

/// Validate and apply one command at `tick`.
pub fn dispatch(
    state: &mut SimulationState,
    config: &ResolvedConfig,
    tick: Tick,
    command: &Command,
) -> Result<Verdict, SimulationError> {
    match *command {
        Command::AssignFood { target } => Ok(assign(state, tick, target, Resource::Food)),
        Command::AssignWood { target } => Ok(assign(state, tick, target, Resource::Wood)),
        Command::BuildHouse => build_house(state, config, tick),
        Command::TrainVillager => train_villager(state, config, tick),
    }
}

/// Move an idle villager (the target, or the lowest-id idle one) to gathering.
fn assign(
    state: &mut SimulationState,
    tick: Tick,
    target: Option<VillagerId>,
    resource: Resource,
) -> Verdict {
    let villager = match target {
        Some(id) if state.roster.is_idle(id) => id,
        Some(_) => return Err(FailureReason::NoIdleVillager),
        None => state
            .roster
            .first_idle()
            .ok_or(FailureReason::NoIdleVillager)?,
    };
    if !state.roster.assign(villager, resource) {
        return Err(FailureReason::NoIdleVillager);
    }
    debug!(tick, %villager, %resource, "Villager assigned");
    Ok(())
}

/// Spend wood and queue a house.
fn build_house(
    state: &mut SimulationState,
    config: &ResolvedConfig,
    tick: Tick,
) -> Result<Verdict, SimulationError> {
    if let Err(reason) = spend(state, tick, &config.house_cost)? {
        return Ok(Err(reason));
    }
    let house = state.houses.start_house(tick, config.construction_ticks);
    debug!(
        tick,
        %house,
        completes_at = tick.saturating_add(config.construction_ticks),
        "House started"
    );
    Ok(Ok(()))
}

/// Spend food, reserve a villager id, and queue a training order.
fn train_villager(
    state: &mut SimulationState,
    config: &ResolvedConfig,
    tick: Tick,
) -> Result<Verdict, SimulationError> {
    if state.town_center.is_busy() {
        return Ok(Err(FailureReason::TownCenterBusy));
    }
    if !state.population.has_room() {
        return Ok(Err(FailureReason::PopulationCapped));
    }
    if let Err(reason) = spend(state, tick, &config.villager_cost)? {
        return Ok(Err(reason));
    }

    let villager = state.roster.reserve();
    let order = TrainingOrder {
        villager,
        issued_at: tick,
        completes_at: tick.saturating_add(config.training_ticks),
    };
    state
        .town_center
        .start_training(order)
        .map_err(|_busy| SimulationError::TrainingConflict { tick })?;
    debug!(
        tick,
        %villager,
        completes_at = order.completes_at,
        "Training started"
    );
    Ok(Ok(()))
}

/// Debit a cost. A short stock is a rejection; any other ledger failure is
/// an error.
fn spend(
    state: &mut SimulationState,
    tick: Tick,
    cost: &ResourceAmounts,
) -> Result<Verdict, SimulationError> {
    match state.ledger.debit(tick, cost) {
        Ok(()) => Ok(Ok(())),
        Err(LedgerError::Insufficient { resource, .. }) => {
            Ok(Err(FailureReason::shortage_of(resource)))
        }
        Err(source) => Err(SimulationError::Ledger { source }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boom_types::VillagerState;
    use rust_decimal::Decimal;

    use super::*;
    use crate::config::SimulationConfig;

    fn setup() -> (SimulationState, ResolvedConfig) {
        let config = SimulationConfig::default().resolve().unwrap();
        (SimulationState::new(&config).unwrap(), config)
    }

    fn run(state: &mut SimulationState, config: &ResolvedConfig, command: Command) -> Verdict {
        dispatch(state, config, 0, &command).unwrap()
    }

    #[test]
    fn assign_picks_lowest_idle() {
        let (mut state, config) = setup();
        assert_eq!(run(&mut state, &config, Command::AssignFood { target: None }), Ok(()));
        assert_eq!(run(&mut state, &config, Command::AssignWood { target: None }), Ok(()));
        assert_eq!(
            state.roster.state(VillagerId(0)),
            Some(VillagerState::GatheringFood)
        );
        assert_eq!(
            state.roster.state(VillagerId(1)),
            Some(VillagerState::GatheringWood)
        );
    }

    #[test]
    fn assign_with_busy_target_is_rejected() {
        let (mut state, config) = setup();
        let target = Some(VillagerId(1));
        assert_eq!(run(&mut state, &config, Command::AssignFood { target }), Ok(()));
        assert_eq!(
            run(&mut state, &config, Command::AssignWood { target }),
            Err(FailureReason::NoIdleVillager)
        );
        // Unaffected by the rejection.
        assert_eq!(
            state.roster.state(VillagerId(1)),
            Some(VillagerState::GatheringFood)
        );
    }

    #[test]
    fn assign_targeting_a_trainee_is_rejected() {
        let (mut state, config) = setup();
        assert_eq!(run(&mut state, &config, Command::TrainVillager), Ok(()));
        assert_eq!(
            run(&mut state, &config, Command::AssignFood { target: Some(VillagerId(3)) }),
            Err(FailureReason::NoIdleVillager)
        );
    }

    #[test]
    fn assign_without_idle_villagers_is_rejected() {
        let (mut state, config) = setup();
        for _ in 0..3 {
            assert_eq!(run(&mut state, &config, Command::AssignFood { target: None }), Ok(()));
        }
        assert_eq!(
            run(&mut state, &config, Command::AssignWood { target: None }),
            Err(FailureReason::NoIdleVillager)
        );
    }

    #[test]
    fn house_needs_wood() {
        let (mut state, config) = setup();
        assert_eq!(
            run(&mut state, &config, Command::BuildHouse),
            Err(FailureReason::NotEnoughWood)
        );
        assert_eq!(state.houses.under_construction(), 0);

        state.ledger.credit(0, Resource::Wood, Decimal::new(25, 0)).unwrap();
        assert_eq!(run(&mut state, &config, Command::BuildHouse), Ok(()));
        assert_eq!(state.ledger.wood(), Decimal::ZERO);
        assert_eq!(state.houses.under_construction(), 1);
    }

    #[test]
    fn houses_may_overlap() {
        let (mut state, config) = setup();
        state.ledger.credit(0, Resource::Wood, Decimal::new(50, 0)).unwrap();
        assert_eq!(run(&mut state, &config, Command::BuildHouse), Ok(()));
        assert_eq!(run(&mut state, &config, Command::BuildHouse), Ok(()));
        assert_eq!(state.houses.under_construction(), 2);
    }

    #[test]
    fn train_checks_busy_before_cap_before_food() {
        let config = SimulationConfig::parse("start:\n  villagers: 5\n  food: 0\n")
            .unwrap()
            .resolve()
            .unwrap();
        let mut state = SimulationState::new(&config).unwrap();
        // At cap and without food: the cap is reported first.
        assert_eq!(
            run(&mut state, &config, Command::TrainVillager),
            Err(FailureReason::PopulationCapped)
        );

        let (mut state, config) = setup();
        assert_eq!(run(&mut state, &config, Command::TrainVillager), Ok(()));
        // Busy wins over everything else.
        assert_eq!(
            run(&mut state, &config, Command::TrainVillager),
            Err(FailureReason::TownCenterBusy)
        );
    }

    #[test]
    fn train_without_food_is_rejected_and_reserves_nothing() {
        let config = SimulationConfig::parse("start:\n  food: 49.9\n")
            .unwrap()
            .resolve()
            .unwrap();
        let mut state = SimulationState::new(&config).unwrap();
        assert_eq!(
            run(&mut state, &config, Command::TrainVillager),
            Err(FailureReason::NotEnoughFood)
        );
        assert!(!state.town_center.is_busy());
        assert_eq!(state.roster.counts().in_training, 0);
        assert_eq!(state.ledger.food(), Decimal::new(499, 1));
    }

    #[test]
    fn train_debits_food_and_reserves_next_id() {
        let (mut state, config) = setup();
        assert_eq!(run(&mut state, &config, Command::TrainVillager), Ok(()));
        assert_eq!(state.ledger.food(), Decimal::new(150, 0));
        let order = state.town_center.in_flight().copied().unwrap();
        assert_eq!(order.villager, VillagerId(3));
        assert_eq!(order.completes_at, 3);
    }
}
