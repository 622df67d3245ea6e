//! Requirement set evaluation.
//!
//! A set combines its requirements with AND (`REQUIREMENTSET_TEST_ALL`) or OR
//! (`REQUIREMENTSET_TEST_ANY`). A requirement either references another set by
//! id, which is evaluated recursively, or is handed to the host predicate.
//! `Inverse` negates the requirement's own result before combining.

use policy_yields_protocol::{
    PlayerId, Requirement, RequirementKind, RequirementSet, RequirementSetType, Subject,
};
use tracing::{trace, warn};

use crate::{EvalContext, EvalError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    All,
    Any,
}

impl Combinator {
    fn of(set: &RequirementSet) -> Self {
        match &set.requirement_set_type {
            RequirementSetType::All => Combinator::All,
            RequirementSetType::Any => Combinator::Any,
            RequirementSetType::Other(raw) => {
                let err = EvalError::UnknownRequirementSetType(raw.clone());
                warn!(%err, set = ?set.requirement_set_id, "defaulting to ALL");
                Combinator::All
            }
        }
    }
}

/// Whether `subject` passes `set`. An absent set always passes.
///
/// Evaluation short-circuits. Fails only for malformed references (missing
/// `RequirementSetId`) or reference chains deeper than the configured limit.
pub fn is_subject_eligible(
    ctx: &EvalContext<'_>,
    player: PlayerId,
    subject: &Subject,
    set: Option<&RequirementSet>,
) -> Result<bool, EvalError> {
    match set {
        Some(set) => evaluate_set(ctx, player, subject, set, 0),
        None => Ok(true),
    }
}

fn evaluate_set(
    ctx: &EvalContext<'_>,
    player: PlayerId,
    subject: &Subject,
    set: &RequirementSet,
    depth: usize,
) -> Result<bool, EvalError> {
    let combinator = Combinator::of(set);

    for requirement in &set.requirements {
        let satisfied = evaluate_requirement(ctx, player, subject, requirement, depth)?;
        match combinator {
            Combinator::All if !satisfied => return Ok(false),
            Combinator::Any if satisfied => return Ok(true),
            _ => {}
        }
    }

    // Empty ALL is vacuously true, empty ANY vacuously false.
    Ok(combinator == Combinator::All)
}

fn evaluate_requirement(
    ctx: &EvalContext<'_>,
    player: PlayerId,
    subject: &Subject,
    requirement: &Requirement,
    depth: usize,
) -> Result<bool, EvalError> {
    let satisfied = match &requirement.kind {
        RequirementKind::RequirementSetIsMet => {
            let set_id = &requirement.arguments.get_asserted("RequirementSetId")?.value;
            if depth >= ctx.options.max_requirement_depth {
                return Err(EvalError::RequirementDepthExceeded {
                    set_id: set_id.clone(),
                    max_depth: ctx.options.max_requirement_depth,
                });
            }
            match ctx.requirements.requirement_set(set_id) {
                Some(nested) => evaluate_set(ctx, player, subject, nested, depth + 1)?,
                None => {
                    // An unresolved reference behaves like an absent set.
                    warn!(set_id = %set_id, "referenced requirement set not found");
                    true
                }
            }
        }
        RequirementKind::Predicate(_) => ctx
            .requirements
            .is_requirement_satisfied(player, subject, requirement),
    };

    trace!(
        kind = %requirement.kind,
        inverse = requirement.inverse,
        satisfied,
        "evaluated requirement"
    );
    Ok(satisfied != requirement.inverse)
}
