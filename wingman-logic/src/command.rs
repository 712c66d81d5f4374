//! Command trait, result type and the shared link/unlink engine.
//!
//! Every link command runs in two phases. Phase one mutates the owner's link
//! all-or-nothing. Phase two, when the target carries an availability flag,
//! updates that flag on each target. The phases are not transactional: if
//! phase two fails the link change stands and the command reports
//! [`CommandError::PartiallyApplied`].

use crate::{CommandError, LogicResult};
use std::sync::Arc;
use tracing::{debug, info, warn};
use wingman_core::{Assignable, Item, ItemId, Link, LinkError, RoleTag};
use wingman_storage::{ItemManager, Model};

/// A target evicted from a full role by a revolving assignment.
///
/// Its availability flag is left as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Displaced {
    pub role: String,
    pub id: ItemId,
}

/// Outcome of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Message shown to the user.
    pub message: String,
    pub displaced: Vec<Displaced>,
}

impl CommandResult {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            displaced: Vec::new(),
        }
    }
}

/// An executable operation against a [`Model`].
pub trait Command {
    fn execute(&self, model: &Model) -> LogicResult<CommandResult>;
}

// ============================================================================
// ENGINE
// ============================================================================

struct Applied {
    message: String,
    target_ids: Vec<ItemId>,
    displaced: Vec<Displaced>,
}

impl Applied {
    fn into_result(self) -> CommandResult {
        CommandResult {
            message: self.message,
            displaced: self.displaced,
        }
    }
}

fn owner_phrase<O: Item>(owner: &O) -> String {
    format!(
        "{} {}",
        O::ENTITY_TYPE.to_string().to_lowercase(),
        owner.label()
    )
}

fn resolve_targets<R: RoleTag, T>(
    targets: &ItemManager<T>,
    pairs: &[(R, ItemId)],
    what: &'static str,
) -> LogicResult<Vec<(R, Arc<T>)>>
where
    T: Item + Clone + Send + Sync + 'static,
{
    if pairs.is_empty() {
        return Err(CommandError::NothingToDo { what });
    }
    pairs
        .iter()
        .map(|(role, id)| {
            targets
                .require(id)
                .map(|target| (*role, target))
                .map_err(CommandError::from)
        })
        .collect()
}

/// Phase one of a link command: revolve every pair into the owner's link.
fn assign<O, R, T, F>(
    owners: &ItemManager<O>,
    owner_id: &str,
    targets: &ItemManager<T>,
    pairs: &[(R, ItemId)],
    link_of: F,
    what: &'static str,
) -> LogicResult<Applied>
where
    O: Item + Clone + Send + Sync + 'static,
    R: RoleTag,
    T: Item + Clone + Send + Sync + 'static,
    F: Fn(&mut O) -> &mut Link<R, T>,
{
    let owner = owners.require(owner_id)?;
    let resolved = resolve_targets(targets, pairs, what)?;

    // Each eviction carries whether the id was linked before this command.
    let evicted = owners.update(
        owner_id,
        |owner| -> Result<Vec<(R, ItemId, bool)>, LinkError> {
            let link = link_of(owner);
            let mut staged = link.clone();
            let mut evicted = Vec::new();
            for (role, target) in &resolved {
                if let Some(id) = staged.assign_or_replace(*role, target)? {
                    let was_linked = link.contains(*role, &id);
                    evicted.push((*role, id, was_linked));
                }
            }
            *link = staged;
            Ok(evicted)
        },
    )??;

    // A target evicted by a later pair of the same command never stays linked.
    let kept: Vec<&(R, Arc<T>)> = resolved
        .iter()
        .filter(|(role, target)| {
            !evicted
                .iter()
                .any(|(r, id, _)| r == role && id == target.id())
        })
        .collect();

    // Only ids linked before this command count as displaced.
    let displaced: Vec<Displaced> = evicted
        .into_iter()
        .filter(|(_, _, was_linked)| *was_linked)
        .map(|(role, id, _)| {
            debug!(role = %role, id = %id, owner = owner_id, "displaced by revolving assignment");
            Displaced {
                role: role.to_string(),
                id,
            }
        })
        .collect();
    info!(
        owner = owner_id,
        linked = kept.len(),
        displaced = displaced.len(),
        "linked {what}"
    );

    Ok(Applied {
        message: format!(
            "Linked {} to {}.",
            describe(kept.iter().copied()),
            owner_phrase(owner.as_ref())
        ),
        target_ids: kept.iter().map(|(_, t)| t.id().to_string()).collect(),
        displaced,
    })
}

/// Phase one of an unlink command: remove every pair from the owner's link.
///
/// A target missing from its registry is removed by id if the owner's link
/// still holds it. Only targets that exist are returned for phase two.
fn unassign<O, R, T, F>(
    owners: &ItemManager<O>,
    owner_id: &str,
    targets: &ItemManager<T>,
    pairs: &[(R, ItemId)],
    link_of: F,
    what: &'static str,
) -> LogicResult<Applied>
where
    O: Item + Clone + Send + Sync + 'static,
    R: RoleTag,
    T: Item + Clone + Send + Sync + 'static,
    F: Fn(&mut O) -> &mut Link<R, T>,
{
    if pairs.is_empty() {
        return Err(CommandError::NothingToDo { what });
    }
    let owner = owners.require(owner_id)?;
    let found: Vec<Option<Arc<T>>> = pairs.iter().map(|(_, id)| targets.get(id)).collect();

    owners.update(owner_id, |owner| -> LogicResult<()> {
        let link = link_of(owner);
        let mut staged = link.clone();
        for ((role, id), target) in pairs.iter().zip(&found) {
            if target.is_none() {
                if !link.contains(*role, id) {
                    return Err(CommandError::NotFound {
                        entity_type: T::ENTITY_TYPE,
                        id: id.clone(),
                    });
                }
                debug!(role = %role, id = %id, owner = owner_id, "unlinking dangling id");
            }
            staged.remove_id(*role, id)?;
        }
        *link = staged;
        Ok(())
    })??;

    info!(owner = owner_id, unlinked = pairs.len(), "unlinked {what}");

    let described = pairs
        .iter()
        .zip(&found)
        .map(|((role, id), target)| match target {
            Some(target) => format!("{role}: {}", target.label()),
            None => format!("{role}: {id}"),
        })
        .collect::<Vec<_>>()
        .join(", ");

    Ok(Applied {
        message: format!(
            "Unlinked {} from {}.",
            described,
            owner_phrase(owner.as_ref())
        ),
        target_ids: pairs
            .iter()
            .zip(&found)
            .filter(|(_, target)| target.is_some())
            .map(|((_, id), _)| id.clone())
            .collect(),
        displaced: Vec::new(),
    })
}

fn describe<'a, R, T>(pairs: impl Iterator<Item = &'a (R, Arc<T>)>) -> String
where
    R: RoleTag,
    T: Item + 'a,
{
    pairs
        .map(|(role, target)| format!("{role}: {}", target.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Phase two: set the availability flag on every linked target.
///
/// Every id is attempted even after a failure.
fn set_availability<T>(
    targets: &ItemManager<T>,
    ids: &[ItemId],
    available: bool,
    applied_message: &str,
) -> LogicResult<()>
where
    T: Assignable + Clone + Send + Sync + 'static,
{
    let failures: Vec<String> = ids
        .iter()
        .filter_map(|id| {
            targets
                .update(id, |target| target.set_available(available))
                .err()
                .map(|e| e.to_string())
        })
        .collect();

    if failures.is_empty() {
        return Ok(());
    }
    let entity_type = T::ENTITY_TYPE;
    warn!(
        entity_type = %entity_type,
        available,
        failed = failures.len(),
        "link changed but availability update failed"
    );
    Err(CommandError::PartiallyApplied {
        linked: applied_message.trim_end_matches('.').to_string(),
        reason: failures.join("; "),
    })
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

pub(crate) fn link_only<O, R, T, F>(
    owners: &ItemManager<O>,
    owner_id: &str,
    targets: &ItemManager<T>,
    pairs: &[(R, ItemId)],
    link_of: F,
    what: &'static str,
) -> LogicResult<CommandResult>
where
    O: Item + Clone + Send + Sync + 'static,
    R: RoleTag,
    T: Item + Clone + Send + Sync + 'static,
    F: Fn(&mut O) -> &mut Link<R, T>,
{
    Ok(assign(owners, owner_id, targets, pairs, link_of, what)?.into_result())
}

/// Link, then mark every linked target unavailable.
pub(crate) fn link_and_reserve<O, R, T, F>(
    owners: &ItemManager<O>,
    owner_id: &str,
    targets: &ItemManager<T>,
    pairs: &[(R, ItemId)],
    link_of: F,
    what: &'static str,
) -> LogicResult<CommandResult>
where
    O: Item + Clone + Send + Sync + 'static,
    R: RoleTag,
    T: Assignable + Clone + Send + Sync + 'static,
    F: Fn(&mut O) -> &mut Link<R, T>,
{
    let applied = assign(owners, owner_id, targets, pairs, link_of, what)?;
    set_availability(targets, &applied.target_ids, false, &applied.message)?;
    Ok(applied.into_result())
}

pub(crate) fn unlink_only<O, R, T, F>(
    owners: &ItemManager<O>,
    owner_id: &str,
    targets: &ItemManager<T>,
    pairs: &[(R, ItemId)],
    link_of: F,
    what: &'static str,
) -> LogicResult<CommandResult>
where
    O: Item + Clone + Send + Sync + 'static,
    R: RoleTag,
    T: Item + Clone + Send + Sync + 'static,
    F: Fn(&mut O) -> &mut Link<R, T>,
{
    Ok(unassign(owners, owner_id, targets, pairs, link_of, what)?.into_result())
}

/// Unlink, then mark every unlinked target available again.
pub(crate) fn unlink_and_release<O, R, T, F>(
    owners: &ItemManager<O>,
    owner_id: &str,
    targets: &ItemManager<T>,
    pairs: &[(R, ItemId)],
    link_of: F,
    what: &'static str,
) -> LogicResult<CommandResult>
where
    O: Item + Clone + Send + Sync + 'static,
    R: RoleTag,
    T: Assignable + Clone + Send + Sync + 'static,
    F: Fn(&mut O) -> &mut Link<R, T>,
{
    let applied = unassign(owners, owner_id, targets, pairs, link_of, what)?;
    set_availability(targets, &applied.target_ids, true, &applied.message)?;
    Ok(applied.into_result())
}

/// Declares a command that applies a list of (role, target id) pairs to one
/// owner's link through one of the entry points above.
macro_rules! link_command {
    (
        $(#[$meta:meta])*
        $name:ident {
            $owner_field:ident: $owners:ident,
            $pairs_field:ident: $role:ty => $targets:ident,
            link: $link:ident,
            run: $run:ident,
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub $owner_field: wingman_core::ItemId,
            pub $pairs_field: Vec<($role, wingman_core::ItemId)>,
        }

        impl $name {
            pub fn new($owner_field: impl Into<wingman_core::ItemId>) -> Self {
                Self {
                    $owner_field: $owner_field.into(),
                    $pairs_field: Vec::new(),
                }
            }

            /// Add one (role, target id) pair.
            pub fn with(mut self, role: $role, id: impl Into<wingman_core::ItemId>) -> Self {
                self.$pairs_field.push((role, id.into()));
                self
            }
        }

        impl $crate::Command for $name {
            fn execute(
                &self,
                model: &wingman_storage::Model,
            ) -> $crate::LogicResult<$crate::CommandResult> {
                $crate::command::$run(
                    model.$owners(),
                    &self.$owner_field,
                    model.$targets(),
                    &self.$pairs_field,
                    |owner| &mut owner.$link,
                    stringify!($pairs_field),
                )
            }
        }
    };
}
