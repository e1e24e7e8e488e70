use std::cell::RefCell;

use statefold_core::{AggregatingPlanner, Plan, PlannerConfig, StateKey, TreeError};
use tracing::debug;

use crate::{CompiledMdp, DeterministicDomain, MdpError, StateIndex, StateInterner};

/// Plan from `start` in a compiled MDP. State indices are used as keys directly.
pub fn plan_compiled(
    planner: &mut AggregatingPlanner,
    mdp: &CompiledMdp,
    start: StateIndex,
) -> Result<Plan, TreeError> {
    planner.plan(
        StateKey::from(start),
        |state| mdp.num_actions(StateIndex::from_key(state)).unwrap_or(0),
        |state, action| {
            let (next, reward, done) = mdp.transition(StateIndex::from_key(state), action.index());
            (StateKey::from(next), reward, done)
        },
    )
}

/// Planner over a `DeterministicDomain`, canonicalizing domain states into
/// planner keys with a `StateInterner`.
pub struct DomainPlanner<D>
where
    D: DeterministicDomain,
{
    domain: D,
    planner: AggregatingPlanner,
    interner: StateInterner<D::State>,
}

impl<D> DomainPlanner<D>
where
    D: DeterministicDomain,
{
    pub fn new(domain: D, config: PlannerConfig) -> Result<Self, MdpError> {
        Ok(Self {
            domain,
            planner: AggregatingPlanner::new(config)?,
            interner: StateInterner::new(),
        })
    }

    pub fn domain(&self) -> &D {
        &self.domain
    }

    /// The underlying planner, holding the tree of the last plan call.
    pub fn planner(&self) -> &AggregatingPlanner {
        &self.planner
    }

    /// States seen during the last plan call, by key.
    pub fn interner(&self) -> &StateInterner<D::State> {
        &self.interner
    }

    /// Search from `state` and return the greedy plan.
    pub fn plan(&mut self, state: &D::State) -> Result<Plan, MdpError> {
        let mut interner = std::mem::take(&mut self.interner);
        interner.clear();
        let root = interner.intern(state);

        let domain = &self.domain;
        let interner = RefCell::new(interner);
        let result = self.planner.plan(
            root,
            |key| {
                interner
                    .borrow()
                    .resolve(key)
                    .map_or(0, |state| domain.num_actions(state))
            },
            |key, action| {
                let current = interner.borrow().resolve(key).cloned();
                match current {
                    Some(state) => {
                        let (next, reward, done) = domain.step(&state, action.index());
                        (interner.borrow_mut().intern(&next), reward, done)
                    }
                    None => (key, 0.0, true),
                }
            },
        );

        self.interner = interner.into_inner();
        Ok(result?)
    }

    /// First action of a fresh plan from `state`, or `None` if the state is
    /// terminal or the plan is empty.
    pub fn act(&mut self, state: &D::State) -> Result<Option<usize>, MdpError> {
        if self.domain.is_terminal(state) {
            return Ok(None);
        }

        let plan = self.plan(state)?;
        let action = plan.first_action().map(|action| action.index());
        debug!(
            ?action,
            expansions = plan.metrics.expansions,
            states_explored = plan.metrics.states_explored,
            "domain planner chose action"
        );
        Ok(action)
    }
}
