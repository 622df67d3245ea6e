use policy_yields_protocol::{Modifier, PlayerId, Subject};
use tracing::debug;

use crate::{is_subject_eligible, resolve_base_subjects, EvalContext, EvalError};

/// Subjects of `modifier` that pass its subject requirement set.
///
/// The owner requirement set is not checked here; callers test it against
/// the player before asking for subjects.
pub fn resolve_subjects_with_requirements(
    ctx: &EvalContext<'_>,
    player: PlayerId,
    modifier: &Modifier,
    parent: Option<&Subject>,
) -> Result<Vec<Subject>, EvalError> {
    let candidates = resolve_base_subjects(ctx, player, &modifier.collection_type, parent);
    let requirements = modifier.subject_requirement_set.as_ref();

    let mut subjects = Vec::with_capacity(candidates.len());
    for subject in candidates {
        if is_subject_eligible(ctx, player, &subject, requirements)? {
            subjects.push(subject);
        }
    }

    debug!(
        modifier = modifier.label(),
        count = subjects.len(),
        "resolved subjects"
    );
    Ok(subjects)
}
