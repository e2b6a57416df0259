//! # Shadow State
//!
//! The planner's self-sufficient clone of the battle used for forward
//! simulation. `ShadowState` is a persistent value: every transition clones
//! and returns a new state, so parent states remain valid as MCTS tree
//! nodes.

use crate::core::action::Action;
use crate::core::field::FieldState;
use crate::core::side::SideState;
use crate::data::GameData;
use crate::types::{MoveId, SpeciesId, Status};

/// Which side of the battle, from our perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideRef {
    Ours,
    Theirs,
}

impl SideRef {
    pub fn opponent(&self) -> SideRef {
        match self {
            SideRef::Ours => SideRef::Theirs,
            SideRef::Theirs => SideRef::Ours,
        }
    }
}

/// Events recorded while resolving a turn; used by tests and the CLI trace
/// output.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    Miss { side: SideRef, move_id: MoveId },
    Crit { side: SideRef, move_id: MoveId },
    Flinch { side: SideRef },
    ProtectSuccess { side: SideRef },
    ProtectFail { side: SideRef },
    BlockedByProtect { side: SideRef, move_id: MoveId },
    PriorityBlocked { side: SideRef, move_id: MoveId },
    Asleep { side: SideRef },
    Wake { side: SideRef },
    Frozen { side: SideRef },
    Thaw { side: SideRef },
    FullParalysis { side: SideRef },
    ConfusionSelfHit { side: SideRef },
    CrashDamage { side: SideRef },
    AutoSwitch { side: SideRef, species: SpeciesId },
}

/// Forced hit/crit outcomes set by the planner's hybrid expansion. Consumed
/// by the first accuracy/crit roll of the next `step` and then cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ForcedOutcome {
    pub hit: Option<bool>,
    pub crit: Option<bool>,
}

impl ForcedOutcome {
    pub fn is_set(&self) -> bool {
        self.hit.is_some() || self.crit.is_some()
    }
}

/// The complete simulated battle state.
#[derive(Debug, Clone)]
pub struct ShadowState {
    pub ours: SideState,
    pub theirs: SideState,
    pub field: FieldState,
    /// Simulated plies since the root state
    pub ply: u32,
    /// Battle flagged finished by the client (affects the win terminal)
    pub finished: bool,
    /// Evaluation snapshotted just before a forced replacement of our
    /// fainted active, so the KO penalty survives the auto-switch.
    pub pre_autoswitch_eval: Option<f32>,
    /// Forced hit/crit override for hybrid expansion
    pub forced: ForcedOutcome,
    /// Events recorded during the last `step`
    pub events: Vec<TurnEvent>,
}

impl ShadowState {
    pub fn new(ours: SideState, theirs: SideState) -> Self {
        Self {
            ours,
            theirs,
            field: FieldState::default(),
            ply: 0,
            finished: false,
            pre_autoswitch_eval: None,
            forced: ForcedOutcome::default(),
            events: Vec::new(),
        }
    }

    pub fn side(&self, side: SideRef) -> &SideState {
        match side {
            SideRef::Ours => &self.ours,
            SideRef::Theirs => &self.theirs,
        }
    }

    pub fn side_mut(&mut self, side: SideRef) -> &mut SideState {
        match side {
            SideRef::Ours => &mut self.ours,
            SideRef::Theirs => &mut self.theirs,
        }
    }

    /// Terminal when either side has no HP left anywhere.
    pub fn is_terminal(&self) -> bool {
        self.ours.all_fainted() || self.theirs.all_fainted()
    }

    /// Copy of this state with forced outcomes for the next move resolution.
    pub fn with_forced_outcome(&self, hit: Option<bool>, crit: Option<bool>) -> Self {
        let mut state = self.clone();
        state.forced = ForcedOutcome { hit, crit };
        state
    }

    pub fn record(&mut self, event: TurnEvent) {
        self.events.push(event);
    }

    /// Legal actions for one side.
    ///
    /// A fainted active restricts the side to switches (forced replacement).
    /// Choice lock and sleep filters narrow the move list: while more than
    /// one sleep turn remains only sleep-usable moves are offered, and on the
    /// guaranteed wake turn sleep-usable moves are dropped.
    pub fn legal_actions_for(&self, side_ref: SideRef, data: &GameData) -> Vec<Action> {
        let side = self.side(side_ref);
        let mut actions: Vec<Action> = Vec::new();

        if side.active_mon().is_fainted() {
            for handle in side.alive_bench() {
                actions.push(Action::Switch(handle));
            }
            if side_ref == SideRef::Theirs && side.can_materialize_unseen() {
                for slot in side.team.len()..crate::core::side::TEAM_SIZE {
                    actions.push(Action::SwitchUnseen(slot));
                }
            }
            return actions;
        }

        let active = side.active_mon();
        for move_id in &active.moves {
            actions.push(Action::Move(move_id.clone()));
        }

        // Choice lock: only the locked move remains selectable.
        if let Some(locked) = &side.choice_lock {
            if active.holds_choice_item() {
                let locked_actions: Vec<Action> = actions
                    .iter()
                    .filter(|a| a.move_id() == Some(locked))
                    .cloned()
                    .collect();
                if !locked_actions.is_empty() {
                    actions = locked_actions;
                }
            }
        }

        // Sleep filters.
        if active.status == Status::Sleep {
            let sleep_turns = active.volatiles.sleep_turns;
            if sleep_turns > 1 {
                let sleep_usable: Vec<Action> = actions
                    .iter()
                    .filter(|a| {
                        a.move_id()
                            .and_then(|id| data.movedex.get(id))
                            .map(|def| def.sleep_usable)
                            .unwrap_or(false)
                    })
                    .cloned()
                    .collect();
                if !sleep_usable.is_empty() {
                    actions = sleep_usable;
                }
            } else if sleep_turns == 1 {
                let waking: Vec<Action> = actions
                    .iter()
                    .filter(|a| {
                        !a.move_id()
                            .and_then(|id| data.movedex.get(id))
                            .map(|def| def.sleep_usable)
                            .unwrap_or(false)
                    })
                    .cloned()
                    .collect();
                if !waking.is_empty() {
                    actions = waking;
                }
            }
        }

        for handle in side.alive_bench() {
            actions.push(Action::Switch(handle));
        }

        if side_ref == SideRef::Theirs && side.can_materialize_unseen() {
            for slot in side.team.len()..crate::core::side::TEAM_SIZE {
                actions.push(Action::SwitchUnseen(slot));
            }
        }

        actions
    }

    /// Legal actions for our side (the planner's action space).
    pub fn legal_actions(&self, data: &GameData) -> Vec<Action> {
        self.legal_actions_for(SideRef::Ours, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pokemon::PokemonState;
    use crate::types::{ItemId, MoveId};

    fn mon(species: &str, moves: &[&str]) -> PokemonState {
        let mut m = PokemonState::new(species);
        m.moves = moves.iter().map(|s| MoveId::new(*s)).collect();
        m
    }

    fn two_v_two() -> (ShadowState, std::sync::Arc<GameData>) {
        let data = std::sync::Arc::new(GameData::default());
        let ours = SideState::new(
            vec![
                mon("garchomp", &["earthquake", "stoneedge"]),
                mon("rotomwash", &["voltswitch"]),
            ],
            0,
        );
        let theirs = SideState::new(
            vec![
                mon("corviknight", &["bravebird"]),
                mon("toxapex", &["scald"]),
            ],
            0,
        );
        (ShadowState::new(ours, theirs), data)
    }

    #[test]
    fn test_legal_actions_moves_then_switches() {
        let (state, data) = two_v_two();
        let actions = state.legal_actions(&data);
        assert_eq!(actions.len(), 3);
        assert!(actions.contains(&Action::Move(MoveId::new("earthquake"))));
        assert!(actions.contains(&Action::Switch(1)));
    }

    #[test]
    fn test_fainted_active_forces_switch() {
        let (mut state, data) = two_v_two();
        state.ours.team[0].hp = 0.0;
        let actions = state.legal_actions(&data);
        assert_eq!(actions, vec![Action::Switch(1)]);
    }

    #[test]
    fn test_choice_lock_restricts_moves() {
        let (mut state, data) = two_v_two();
        state.ours.team[0].item = Some(ItemId::new("choiceband"));
        state.ours.choice_lock = Some(MoveId::new("earthquake"));
        let actions = state.legal_actions(&data);
        let moves: Vec<_> = actions.iter().filter(|a| a.is_move()).collect();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].move_id(), Some(&MoveId::new("earthquake")));
    }

    #[test]
    fn test_terminal_detection() {
        let (mut state, _) = two_v_two();
        assert!(!state.is_terminal());
        for mon in state.theirs.team.iter_mut() {
            mon.hp = 0.0;
        }
        assert!(state.is_terminal());
    }
}
