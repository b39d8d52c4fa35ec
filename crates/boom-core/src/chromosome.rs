//! Chromosome decoding and setup validation.
//!
//! A chromosome reaches the engine in one of two raw forms:
//!
//! - a list of [`RawAction`] records (`{tick, kind, target?}`), usually JSON;
//! - a dense gene vector with one integer gene per tick
//!   (see [`Chromosome::from_genes`] for the code table).
//!
//! Both are decoded once into a [`Chromosome`] of typed [`Action`] values.
//! Every problem is reported as a [`SetupError`] before any tick runs, so a
//! malformed chromosome never produces a partial report.

use serde::{Deserialize, Serialize};

use boom_types::{Action, ActionKind, Command, Resource, Tick, VillagerId};

use crate::config::ConfigError;

/// Errors raised while decoding or validating a chromosome.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// Actions must be non-decreasing in tick.
    #[error("action {index} at tick {tick} follows an action at tick {previous}")]
    OutOfOrder {
        /// Position of the offending action.
        index: usize,
        /// Its tick.
        tick: Tick,
        /// The tick of the action before it.
        previous: Tick,
    },

    /// The action kind is not one of the four known kinds.
    #[error("action {index} has unknown kind {kind:?}")]
    UnknownKind {
        /// Position of the offending action.
        index: usize,
        /// The unrecognized kind string.
        kind: String,
    },

    /// The gene code is not one of `0..=6`.
    #[error("gene {index} has unknown code {gene}")]
    UnknownGene {
        /// Position (tick) of the offending gene.
        index: usize,
        /// The unrecognized code.
        gene: i64,
    },

    /// Codes `4` and `5` release a worker back to idle. Villagers never
    /// leave a gathering assignment in this engine, so these genes have no
    /// action to decode to.
    #[error("gene {index} has code {gene} (release {resource} worker), which has no action")]
    UnsupportedGene {
        /// Position (tick) of the offending gene.
        index: usize,
        /// The release code.
        gene: i64,
        /// The gathering pool the gene would release from.
        resource: Resource,
    },

    /// Ticks start at zero.
    #[error("action {index} has negative tick {tick}")]
    NegativeTick {
        /// Position of the offending action.
        index: usize,
        /// The negative tick.
        tick: i64,
    },

    /// Villager ids start at zero.
    #[error("action {index} has negative target {target}")]
    NegativeTarget {
        /// Position of the offending action.
        index: usize,
        /// The negative target.
        target: i64,
    },

    /// Only assignments accept a target.
    #[error("action {index} ({kind}) does not take a target")]
    UnexpectedTarget {
        /// Position of the offending action.
        index: usize,
        /// The kind that received a target.
        kind: ActionKind,
    },

    /// The target names a villager that can never exist in this run.
    #[error("action {index} targets villager {target}, but ids only reach {limit}")]
    TargetOutOfRange {
        /// Position of the offending action.
        index: usize,
        /// The requested villager id.
        target: i64,
        /// Exclusive upper bound on villager ids for this chromosome.
        limit: u64,
    },

    /// The chromosome document is not valid JSON for its raw form.
    #[error("failed to parse chromosome JSON: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The configuration cannot drive a run.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },
}

impl SetupError {
    const fn unsupported(index: usize, gene: i64, resource: Resource) -> Self {
        Self::UnsupportedGene {
            index,
            gene,
            resource,
        }
    }
}

/// One action in its external, unvalidated form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAction {
    /// Tick at which to dispatch the action.
    pub tick: i64,
    /// Action kind name, such as `assign_food`.
    pub kind: String,
    /// Villager id for `assign_*` actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<i64>,
}

impl RawAction {
    /// Build a raw action with no target.
    pub fn new(tick: i64, kind: impl Into<String>) -> Self {
        Self {
            tick,
            kind: kind.into(),
            target: None,
        }
    }

    /// Attach a villager target.
    #[must_use]
    pub const fn with_target(mut self, target: i64) -> Self {
        self.target = Some(target);
        self
    }
}

/// A decoded, tick-ordered sequence of actions. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Chromosome {
    actions: Vec<Action>,
}

impl Chromosome {
    /// The empty chromosome. Replays as pure passive gathering.
    pub const fn empty() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Wrap already-typed actions, checking tick order.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::OutOfOrder`] if a tick decreases.
    pub fn new(actions: Vec<Action>) -> Result<Self, SetupError> {
        let mut previous: Tick = 0;
        for (index, action) in actions.iter().enumerate() {
            if action.tick < previous {
                return Err(SetupError::OutOfOrder {
                    index,
                    tick: action.tick,
                    previous,
                });
            }
            previous = action.tick;
        }
        Ok(Self { actions })
    }

    /// Decode raw actions.
    ///
    /// # Errors
    ///
    /// Returns the first [`SetupError`] found, scanning in order.
    pub fn decode(raw: &[RawAction]) -> Result<Self, SetupError> {
        let actions = raw
            .iter()
            .enumerate()
            .map(|(index, action)| decode_action(index, action))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(actions)
    }

    /// Decode a JSON array of raw actions.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Json`] for malformed JSON, otherwise as
    /// [`decode`](Self::decode).
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        let raw: Vec<RawAction> = serde_json::from_str(json)?;
        Self::decode(&raw)
    }

    /// Decode a dense gene vector; gene `i` is dispatched at tick `i`.
    ///
    /// | code | action |
    /// |------|--------|
    /// | `0` | none |
    /// | `1` | `train_villager` |
    /// | `2` | `assign_food` |
    /// | `3` | `assign_wood` |
    /// | `4` | release a food worker (rejected) |
    /// | `5` | release a wood worker (rejected) |
    /// | `6` | `build_house` |
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnsupportedGene`] for the release codes `4`
    /// and `5`, and [`SetupError::UnknownGene`] for a code outside `0..=6`.
    pub fn from_genes(genes: &[i64]) -> Result<Self, SetupError> {
        let mut actions = Vec::new();
        for (index, &gene) in genes.iter().enumerate() {
            let command = match gene {
                0 => continue,
                1 => Command::TrainVillager,
                2 => Command::AssignFood { target: None },
                3 => Command::AssignWood { target: None },
                4 => return Err(SetupError::unsupported(index, gene, Resource::Food)),
                5 => return Err(SetupError::unsupported(index, gene, Resource::Wood)),
                6 => Command::BuildHouse,
                _ => return Err(SetupError::UnknownGene { index, gene }),
            };
            let tick = Tick::try_from(index).unwrap_or(Tick::MAX);
            actions.push(Action::new(tick, command));
        }
        Ok(Self { actions })
    }

    /// All actions, in dispatch order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Number of actions.
    pub const fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether there are no actions.
    pub const fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The contiguous run of actions scheduled at `tick`.
    pub fn actions_at(&self, tick: Tick) -> &[Action] {
        let start = self.actions.partition_point(|a| a.tick < tick);
        let end = self.actions.partition_point(|a| a.tick <= tick);
        self.actions.get(start..end).unwrap_or_default()
    }

    /// Number of `train_villager` actions, dispatched or not.
    pub fn train_orders(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| a.kind() == ActionKind::TrainVillager)
            .count()
    }

    /// Check that every target names a villager id that could exist:
    /// below `initial_villagers` plus the number of training orders.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::TargetOutOfRange`] for the first bad target.
    pub fn validate_targets(&self, initial_villagers: u32) -> Result<(), SetupError> {
        let trained = u64::try_from(self.train_orders()).unwrap_or(u64::MAX);
        let limit = u64::from(initial_villagers).saturating_add(trained);
        let unreachable_target = self.actions.iter().enumerate().find_map(|(index, action)| {
            action
                .command
                .target()
                .filter(|id| u64::from(id.into_inner()) >= limit)
                .map(|id| (index, id))
        });
        match unreachable_target {
            Some((index, id)) => Err(SetupError::TargetOutOfRange {
                index,
                target: i64::from(id.into_inner()),
                limit,
            }),
            None => Ok(()),
        }
    }
}

fn decode_action(index: usize, raw: &RawAction) -> Result<Action, SetupError> {
    let Ok(tick) = Tick::try_from(raw.tick) else {
        return Err(SetupError::NegativeTick {
            index,
            tick: raw.tick,
        });
    };

    let kind = ActionKind::from_name(&raw.kind).ok_or_else(|| SetupError::UnknownKind {
        index,
        kind: raw.kind.clone(),
    })?;

    let target = match raw.target {
        None => None,
        Some(_) if !kind.takes_target() => {
            return Err(SetupError::UnexpectedTarget { index, kind });
        }
        Some(target) if target < 0 => {
            return Err(SetupError::NegativeTarget { index, target });
        }
        Some(target) => {
            let Ok(id) = u32::try_from(target) else {
                return Err(SetupError::TargetOutOfRange {
                    index,
                    target,
                    limit: u64::from(u32::MAX),
                });
            };
            Some(VillagerId(id))
        }
    };

    let command = match kind {
        ActionKind::AssignFood => Command::AssignFood { target },
        ActionKind::AssignWood => Command::AssignWood { target },
        ActionKind::BuildHouse => Command::BuildHouse,
        ActionKind::TrainVillager => Command::TrainVillager,
    };
    Ok(Action::new(tick, command))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decode_maps_kinds_and_targets() {
        let raw = vec![
            RawAction::new(0, "assign_food").with_target(2),
            RawAction::new(0, "train_villager"),
            RawAction::new(3, "build_house"),
        ];
        let chromosome = Chromosome::decode(&raw).unwrap();
        assert_eq!(chromosome.len(), 3);
        assert_eq!(
            chromosome.actions().first().map(|a| a.command),
            Some(Command::AssignFood {
                target: Some(VillagerId(2))
            })
        );
        assert_eq!(chromosome.train_orders(), 1);
    }

    #[test]
    fn out_of_order_ticks_are_rejected() {
        let raw = vec![
            RawAction::new(4, "assign_food"),
            RawAction::new(2, "assign_wood"),
        ];
        let err = Chromosome::decode(&raw).unwrap_err();
        assert!(matches!(
            err,
            SetupError::OutOfOrder {
                index: 1,
                tick: 2,
                previous: 4
            }
        ));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = Chromosome::decode(&[RawAction::new(0, "idle_one")]).unwrap_err();
        assert!(matches!(err, SetupError::UnknownKind { index: 0, .. }));
    }

    #[test]
    fn negative_tick_is_rejected() {
        let err = Chromosome::decode(&[RawAction::new(-1, "assign_food")]).unwrap_err();
        assert!(matches!(err, SetupError::NegativeTick { tick: -1, .. }));
    }

    #[test]
    fn target_rules() {
        let negative = Chromosome::decode(&[RawAction::new(0, "assign_wood").with_target(-3)]);
        assert!(matches!(negative, Err(SetupError::NegativeTarget { .. })));

        let unexpected = Chromosome::decode(&[RawAction::new(0, "build_house").with_target(0)]);
        assert!(matches!(
            unexpected,
            Err(SetupError::UnexpectedTarget {
                kind: ActionKind::BuildHouse,
                ..
            })
        ));
    }

    #[test]
    fn target_limit_counts_training_orders() {
        let raw = vec![
            RawAction::new(0, "train_villager"),
            RawAction::new(5, "assign_food").with_target(3),
        ];
        let chromosome = Chromosome::decode(&raw).unwrap();
        assert!(chromosome.validate_targets(3).is_ok());

        let raw = vec![RawAction::new(5, "assign_food").with_target(3)];
        let chromosome = Chromosome::decode(&raw).unwrap();
        assert!(matches!(
            chromosome.validate_targets(3),
            Err(SetupError::TargetOutOfRange { limit: 3, .. })
        ));
    }

    #[test]
    fn genes_decode_one_per_tick() {
        let chromosome = Chromosome::from_genes(&[2, 0, 3, 1, 6]).unwrap();
        let kinds: Vec<_> = chromosome.actions().iter().map(|a| (a.tick, a.kind())).collect();
        assert_eq!(
            kinds,
            vec![
                (0, ActionKind::AssignFood),
                (2, ActionKind::AssignWood),
                (3, ActionKind::TrainVillager),
                (4, ActionKind::BuildHouse),
            ]
        );
    }

    #[test]
    fn gene_code_table() {
        let kind_of = |gene: i64| {
            Chromosome::from_genes(&[gene])
                .map(|c| c.actions().first().map(Action::kind))
        };
        assert_eq!(kind_of(0).unwrap(), None);
        assert_eq!(kind_of(1).unwrap(), Some(ActionKind::TrainVillager));
        assert_eq!(kind_of(2).unwrap(), Some(ActionKind::AssignFood));
        assert_eq!(kind_of(3).unwrap(), Some(ActionKind::AssignWood));
        assert!(matches!(
            kind_of(4),
            Err(SetupError::UnsupportedGene {
                gene: 4,
                resource: Resource::Food,
                ..
            })
        ));
        assert!(matches!(
            kind_of(5),
            Err(SetupError::UnsupportedGene {
                gene: 5,
                resource: Resource::Wood,
                ..
            })
        ));
        assert_eq!(kind_of(6).unwrap(), Some(ActionKind::BuildHouse));
    }

    #[test]
    fn unknown_gene_is_rejected() {
        let err = Chromosome::from_genes(&[0, 7]).unwrap_err();
        assert!(matches!(err, SetupError::UnknownGene { index: 1, gene: 7 }));
        let err = Chromosome::from_genes(&[-1]).unwrap_err();
        assert!(matches!(err, SetupError::UnknownGene { index: 0, gene: -1 }));
    }

    #[test]
    fn actions_at_returns_the_tick_slice() {
        let raw = vec![
            RawAction::new(0, "assign_food"),
            RawAction::new(6, "assign_wood"),
            RawAction::new(6, "assign_food"),
            RawAction::new(9, "build_house"),
        ];
        let chromosome = Chromosome::decode(&raw).unwrap();
        assert_eq!(chromosome.actions_at(6).len(), 2);
        assert_eq!(chromosome.actions_at(7).len(), 0);
        assert_eq!(chromosome.actions_at(9).len(), 1);
        assert!(Chromosome::empty().actions_at(0).is_empty());
    }

    #[test]
    fn json_form_decodes() {
        let json = r#"[{"tick":0,"kind":"train_villager"},{"tick":3,"kind":"assign_wood","target":3}]"#;
        let chromosome = Chromosome::from_json(json).unwrap();
        assert_eq!(chromosome.len(), 2);

        assert!(matches!(
            Chromosome::from_json("{not json"),
            Err(SetupError::Json { .. })
        ));
    }
}
