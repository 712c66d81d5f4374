//! Read-only availability check.

use crate::{Command, CommandResult, LogicResult};
use wingman_core::{Assignable, ItemId};
use wingman_storage::{ItemManager, Model};

/// Report whether a pilot, crew member or plane is free to be linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckAvailability {
    Pilot(ItemId),
    Crew(ItemId),
    Plane(ItemId),
}

fn check<T>(registry: &ItemManager<T>, id: &str) -> LogicResult<CommandResult>
where
    T: Assignable + Clone + Send + Sync + 'static,
{
    let target = registry.require(id)?;
    let noun = T::ENTITY_TYPE.to_string().to_lowercase();
    let state = if target.is_available() {
        "available"
    } else {
        "unavailable"
    };
    Ok(CommandResult::new(format!("This {noun} is {state}.")))
}

impl Command for CheckAvailability {
    fn execute(&self, model: &Model) -> LogicResult<CommandResult> {
        match self {
            CheckAvailability::Pilot(id) => check(model.pilots(), id),
            CheckAvailability::Crew(id) => check(model.crew(), id),
            CheckAvailability::Plane(id) => check(model.planes(), id),
        }
    }
}
