//! The type's own operations must cope with an absent member.

use eqv_ir::InstanceError;
use eqv_witness::Member;

use super::{Checked, Context, Failure, Probe};
use crate::{CheckKind, ViolationKind};

pub(super) fn check(ctx: &Context<'_>, member: &Member) -> Result<Checked, Failure> {
    if member.is_non_nullable_primitive() || ctx.skips_nulls(member) {
        return Ok(Checked::NotApplicable);
    }
    let probe = Probe::of_member(CheckKind::NullHandling, member);
    let reference = ctx.reference();
    let changed = ctx.reference();
    changed.default_out(member)?;

    let throws = |explanation: String, err: InstanceError| -> Result<Checked, Failure> {
        Err(probe.fail_with(ViolationKind::NullPointer, explanation, err))
    };
    let (present, absent) = (reference.value(), changed.value());
    if let Err(err) = ctx.rt().invoke_equals(&present, &absent) {
        return throws(
            format!(
                "Non-nullity: equals throws when the argument's member `{}` is absent.",
                member.name
            ),
            err,
        );
    }
    if let Err(err) = ctx.rt().invoke_equals(&absent, &present) {
        return throws(
            format!(
                "Non-nullity: equals throws when its own member `{}` is absent.",
                member.name
            ),
            err,
        );
    }
    if let Err(err) = ctx.hash_of(&changed)? {
        return throws(
            format!("Non-nullity: hash_code throws when member `{}` is absent.", member.name),
            err,
        );
    }
    if let Err(err) = ctx.rt().invoke_render(&absent) {
        return throws(
            format!("Non-nullity: render throws when member `{}` is absent.", member.name),
            err,
        );
    }
    Ok(Checked::Pass)
}
