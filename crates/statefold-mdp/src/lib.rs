mod builder;
mod compiled;
mod domain;
mod error;
mod generate;
mod interner;
mod io;
mod planning;
mod spec;

pub use builder::MdpBuilder;
pub use compiled::{CompiledMdp, StateIndex};
pub use domain::DeterministicDomain;
pub use error::MdpError;
pub use generate::{GeneratorParams, random_deterministic_spec};
pub use interner::StateInterner;
pub use io::{compile_yaml, load_yaml, parse_yaml, save_yaml};
pub use planning::{DomainPlanner, plan_compiled};
pub use spec::{ActionSpec, MdpSpec, StateSpec};
