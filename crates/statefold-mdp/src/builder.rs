use crate::{ActionSpec, CompiledMdp, MdpError, MdpSpec, StateSpec};

#[derive(Debug, Clone, Default)]
/// Struct to build deterministic MDPs in code
pub struct MdpBuilder {
    start: Option<String>,
    states: Vec<StateSpec>,
}

impl MdpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define the start position of the MDP
    pub fn set_start(&mut self, state: impl Into<String>) -> &mut Self {
        self.start = Some(state.into());
        self
    }

    /// Add a new state
    /// Terminal flag if this state is the final one
    pub fn add_state(&mut self, id: impl Into<String>, terminal: bool) -> &mut Self {
        self.states.push(StateSpec {
            id: id.into(),
            terminal: Some(terminal),
            actions: Some(Vec::new()),
        });
        self
    }

    /// Add an action leading from `state_id` to `next` with the given reward.
    /// The next state may be declared later.
    pub fn add_action(
        &mut self,
        state_id: impl AsRef<str>,
        action_id: impl Into<String>,
        next: impl Into<String>,
        reward: f64,
    ) -> Result<&mut Self, MdpError> {
        let state_id = state_id.as_ref();

        let state = self
            .states
            .iter_mut()
            .find(|s| s.id == state_id)
            .ok_or_else(|| MdpError::BuilderUnknownState {
                state: state_id.to_string(),
            })?;

        state.actions.get_or_insert_with(Vec::new).push(ActionSpec {
            id: action_id.into(),
            next: next.into(),
            reward,
        });

        Ok(self)
    }

    pub fn build_spec(self) -> Result<MdpSpec, MdpError> {
        let start = self.start.ok_or(MdpError::MissingStart)?;
        let spec = MdpSpec {
            version: Some(1),
            start,
            states: self.states,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn compile(self) -> Result<CompiledMdp, MdpError> {
        self.build_spec()?.compile()
    }
}
