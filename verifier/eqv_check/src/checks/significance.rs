//! Whether `equals` and `hash_code` rely on the same members, and on the
//! members they are expected to rely on.

use eqv_witness::{InstanceAccessor, Member};

use super::{Checked, Context, Failure, Probe};
use crate::{CheckKind, ViolationKind, Warning};

pub(super) fn check(ctx: &Context<'_>, member: &Member) -> Result<Checked, Failure> {
    if ctx.config().is_cached_hash(member.name.as_str()) {
        return Ok(Checked::NotApplicable);
    }
    let probe = Probe::of_member(CheckKind::Significance, member);

    let reference = ctx.reference();
    let copy = ctx.reference();
    let changed = ctx.reference();
    ctx.change(&changed, member)?;
    compare(ctx, probe, member, &reference, &copy, &changed, false)?;

    let default = ctx.rt().default_for(&member.tag);
    if ctx.can_be_default(member) && !reference.get(member).structurally_equal(&default) {
        let reference = defaulted(ctx)?;
        let copy = defaulted(ctx)?;
        let changed = defaulted(ctx)?;
        changed.copy_member_from(&ctx.reference(), member)?;
        match compare(ctx, probe, member, &reference, &copy, &changed, true) {
            // Failures with absent members are reported by null handling.
            Err(Failure::Violation(v)) if v.kind == ViolationKind::PropagatedError => {}
            other => other?,
        }
    }
    Ok(Checked::Pass)
}

/// The primary witness with every member that may be absent defaulted out.
fn defaulted<'a>(ctx: &Context<'a>) -> Result<InstanceAccessor<'a>, Failure> {
    let subject = ctx.reference();
    for member in ctx
        .members()
        .iter()
        .filter(|m| !m.is_skipped() && ctx.can_be_default(m))
    {
        subject.default_out(member)?;
    }
    Ok(subject)
}

fn compare(
    ctx: &Context<'_>,
    probe: Probe<'_>,
    member: &Member,
    reference: &InstanceAccessor<'_>,
    copy: &InstanceAccessor<'_>,
    changed: &InstanceAccessor<'_>,
    with_defaults: bool,
) -> Result<(), Failure> {
    let equal_to_itself = ctx.equals(probe, reference, copy)?;
    let equals_changed = !ctx.equals(probe, reference, changed)?;
    let reference_hash = ctx.hash(probe, reference)?;
    let changed_hash = ctx.hash(probe, changed)?;
    let hash_changed = reference_hash != changed_hash;

    if equals_changed != hash_changed {
        let lenient = ctx.suppressed(Warning::STRICT_HASHCODE) || with_defaults;
        if equals_changed && !lenient {
            return Err(probe.fail(
                ViolationKind::EqualsWithoutHash,
                format!(
                    "Significant fields: equals relies on `{}`, but hash_code does not.\n  \
                     {} has hash {reference_hash}\n  {} has hash {changed_hash}",
                    member.name,
                    ctx.show(reference),
                    ctx.show(changed)
                ),
            ));
        }
        if hash_changed {
            return Err(probe.fail(
                ViolationKind::HashWithoutEquals,
                format!(
                    "Significant fields: hash_code relies on `{}`, but equals does not.\n\
                     These objects are equal, but probably shouldn't be:\n  {}\nand\n  {}",
                    member.name,
                    ctx.show(reference),
                    ctx.show(changed)
                ),
            ));
        }
    }

    if !should_be_used(ctx, member) || !is_eligible(ctx, member)? {
        return Ok(());
    }
    let ignored = ctx.config().is_ignored(member.name.as_str());
    if !ignored && !equal_to_itself && !ctx.suppressed(Warning::IDENTICAL_COPY) {
        return Err(probe.fail(
            ViolationKind::MemberNotUsed,
            format!("Significant fields: equals does not use `{}`.", member.name),
        ));
    }
    if !ignored && !equals_changed {
        return Err(probe.fail(
            ViolationKind::MemberNotUsed,
            format!(
                "Significant fields: equals does not use `{}`, or it is stateless.",
                member.name
            ),
        ));
    }
    if ignored && equals_changed && !with_defaults {
        return Err(probe.fail(
            ViolationKind::MemberShouldNotBeUsed,
            format!(
                "Significant fields: equals should not use `{}`, but it does.",
                member.name
            ),
        ));
    }
    Ok(())
}

fn should_be_used(ctx: &Context<'_>, member: &Member) -> bool {
    !ctx.suppressed(Warning::ALL_FIELDS_SHOULD_BE_USED)
        && !(ctx.suppressed(Warning::ALL_NONFINAL_FIELDS_SHOULD_BE_USED) && !member.is_final())
}

/// Transient members and members with a single possible value are not
/// expected to take part.
fn is_eligible(ctx: &Context<'_>, member: &Member) -> Result<bool, Failure> {
    Ok(!member.is_static() && !member.is_transient() && !ctx.is_degenerate(member)?)
}
