//! Per-member checks that compare the subject with variations of itself.

use eqv_ir::Value;
use eqv_witness::{InstanceAccessor, Member};

use super::{Checked, Context, Failure, Probe};
use crate::{CheckKind, ViolationKind, Warning};

// === Reflexivity ===

pub(super) fn reflexivity(ctx: &Context<'_>, member: &Member) -> Result<Checked, Failure> {
    let probe = Probe::of_member(CheckKind::Reflexivity, member);
    let reference = ctx.reference();
    let changed = ctx.reference();
    ctx.change(&reference, member)?;
    ctx.change(&changed, member)?;
    expect_reflexive(ctx, probe, &reference, &changed)?;

    if !ctx.suppressed(Warning::REFERENCE_EQUALITY) && !ctx.suppressed(Warning::IDENTICAL_COPY) {
        by_value(ctx, probe, member, &reference, &changed)?;
    }

    if ctx.can_be_default(member) {
        let reference = ctx.reference();
        let changed = ctx.reference();
        reference.default_out(member)?;
        changed.default_out(member)?;
        match expect_reflexive(ctx, probe, &reference, &changed) {
            // Failures on an absent member are reported by null handling.
            Err(Failure::Violation(v)) if v.kind == ViolationKind::PropagatedError => {}
            other => other?,
        }
    }
    Ok(Checked::Pass)
}

fn expect_reflexive(
    ctx: &Context<'_>,
    probe: Probe<'_>,
    reference: &InstanceAccessor<'_>,
    changed: &InstanceAccessor<'_>,
) -> Result<(), Failure> {
    let equal = ctx.equals(probe, reference, changed)?;
    if ctx.suppressed(Warning::IDENTICAL_COPY) {
        if equal {
            return Err(probe.fail(
                ViolationKind::UnnecessarySuppression,
                "Unnecessary suppression: IDENTICAL_COPY. Two identical copies are equal.",
            ));
        }
    } else if !equal {
        return Err(probe.fail(
            ViolationKind::IdenticalCopy,
            format!(
                "Reflexivity: object does not equal an identical copy of itself:\n  {}\n\
                 If this is intentional, suppress Warning::IDENTICAL_COPY.",
                ctx.show(reference)
            ),
        ));
    }
    Ok(())
}

/// Both sides hold the same member value; give one side an equal but
/// distinct copy of it. Only members whose own type has an equivalence of
/// its own can tell the two apart.
fn by_value(
    ctx: &Context<'_>,
    probe: Probe<'_>,
    member: &Member,
    reference: &InstanceAccessor<'_>,
    changed: &InstanceAccessor<'_>,
) -> Result<(), Failure> {
    if member.tag.is_top() {
        return Ok(());
    }
    let value = changed.get(member);
    let compares_by_value = match &value {
        Value::Str(_) | Value::Container(_) => true,
        Value::Object(obj) => ctx.rt().declares_equals(obj.tag().raw()),
        _ => false,
    };
    if !compares_by_value {
        return Ok(());
    }
    changed.set(member, ctx.rt().copy(&value))?;
    if !ctx.equals(probe, reference, changed)? {
        return Err(probe.fail(
            ViolationKind::ReferenceEquality,
            format!(
                "Reflexivity: identity used instead of equals on member `{}`.\n\
                 If this is intentional, suppress Warning::REFERENCE_EQUALITY.",
                member.name
            ),
        ));
    }
    Ok(())
}

// === Symmetry ===

pub(super) fn symmetry(ctx: &Context<'_>, member: &Member) -> Result<Checked, Failure> {
    let probe = Probe::of_member(CheckKind::Symmetry, member);
    let reference = ctx.reference();
    let changed = ctx.reference();
    expect_symmetric(ctx, probe, &reference, &changed)?;
    ctx.change(&changed, member)?;
    expect_symmetric(ctx, probe, &reference, &changed)?;
    ctx.change(&reference, member)?;
    expect_symmetric(ctx, probe, &reference, &changed)?;
    Ok(Checked::Pass)
}

fn expect_symmetric(
    ctx: &Context<'_>,
    probe: Probe<'_>,
    a: &InstanceAccessor<'_>,
    b: &InstanceAccessor<'_>,
) -> Result<(), Failure> {
    if ctx.equals(probe, a, b)? != ctx.equals(probe, b, a)? {
        return Err(probe.fail(
            ViolationKind::Asymmetric,
            format!(
                "Symmetry: objects are not symmetric:\n  {}\nand\n  {}",
                ctx.show(a),
                ctx.show(b)
            ),
        ));
    }
    Ok(())
}

// === Transitivity ===

/// `b1` differs from `a1` in the member under test only; `b2` shares that
/// member with `b1` and differs from `a1` in every member.
pub(super) fn transitivity(ctx: &Context<'_>, member: &Member) -> Result<Checked, Failure> {
    let probe = Probe::of_member(CheckKind::Transitivity, member);
    let a1 = ctx.reference();
    let b1 = ctx.reference();
    ctx.change(&b1, member)?;
    let b2 = a1.copy();
    b2.copy_member_from(&b1, member)?;
    for other in ctx
        .members()
        .iter()
        .filter(|m| !m.is_skipped() && m.index != member.index)
    {
        ctx.change(&b2, other)?;
    }

    let comparisons = [
        ctx.equals(probe, &a1, &b1)?,
        ctx.equals(probe, &b1, &b2)?,
        ctx.equals(probe, &a1, &b2)?,
    ];
    if comparisons.iter().filter(|equal| !**equal).count() == 1 {
        return Err(probe.fail(
            ViolationKind::Intransitive,
            format!(
                "Transitivity: two of these three instances are equal to each other, \
                 so the third one should be, too:\n-  {}\n-  {}\n-  {}",
                ctx.show(&a1),
                ctx.show(&b1),
                ctx.show(&b2)
            ),
        ));
    }
    Ok(Checked::Pass)
}

// === Mutability and transience ===

/// Whether changing `member` changes `equals`, measured against a baseline
/// in which unchanged copies are equal. `None` when there is no baseline.
fn equals_depends_on(ctx: &Context<'_>, probe: Probe<'_>, member: &Member) -> Result<Option<bool>, Failure> {
    let reference = ctx.reference();
    let changed = reference.copy();
    if !ctx.equals(probe, &reference, &changed)? {
        return Ok(None);
    }
    ctx.change(&changed, member)?;
    Ok(Some(!ctx.equals(probe, &reference, &changed)?))
}

pub(super) fn mutability(ctx: &Context<'_>, member: &Member) -> Result<Checked, Failure> {
    if member.is_final()
        || ctx.suppressed(Warning::NONFINAL_FIELDS)
        || ctx.config().is_cached_hash(member.name.as_str())
    {
        return Ok(Checked::NotApplicable);
    }
    let probe = Probe::of_member(CheckKind::Mutability, member);
    match equals_depends_on(ctx, probe, member)? {
        None => Ok(Checked::NotApplicable),
        Some(false) => Ok(Checked::Pass),
        Some(true) => Err(probe.fail(
            ViolationKind::MutableState,
            format!("Mutability: equals depends on mutable member `{}`.", member.name),
        )),
    }
}

pub(super) fn transient(ctx: &Context<'_>, member: &Member) -> Result<Checked, Failure> {
    if !member.is_transient()
        || ctx.suppressed(Warning::TRANSIENT_FIELDS)
        || ctx.config().is_cached_hash(member.name.as_str())
    {
        return Ok(Checked::NotApplicable);
    }
    let probe = Probe::of_member(CheckKind::Transient, member);
    match equals_depends_on(ctx, probe, member)? {
        None => Ok(Checked::NotApplicable),
        Some(false) => Ok(Checked::Pass),
        Some(true) => Err(probe.fail(
            ViolationKind::TransientUsed,
            format!(
                "Transient member `{}` should not be included in the equals/hash_code contract.",
                member.name
            ),
        )),
    }
}

// === Numeric and array edge cases ===

pub(super) fn floating_point(ctx: &Context<'_>, member: &Member) -> Result<Checked, Failure> {
    let Some(nan) = member.tag.primitive_kind().and_then(eqv_ir::PrimitiveKind::nan) else {
        return Ok(Checked::NotApplicable);
    };
    let probe = Probe::of_member(CheckKind::FloatingPoint, member);
    let reference = ctx.reference();
    let changed = ctx.reference();
    reference.set(member, nan.clone())?;
    changed.set(member, nan)?;
    if !ctx.equals(probe, &reference, &changed)? {
        return Err(probe.fail(
            ViolationKind::NanInequality,
            format!(
                "Floating point: equals does not compare member `{}` by bit pattern, \
                 so NaN does not equal itself.",
                member.name
            ),
        ));
    }
    Ok(Checked::Pass)
}

/// An element-wise copy of an array member keeps `equals` and `hash_code`.
pub(super) fn array_contents(ctx: &Context<'_>, member: &Member) -> Result<Checked, Failure> {
    if !member.is_array() {
        return Ok(Checked::NotApplicable);
    }
    let reference = ctx.reference();
    let changed = ctx.reference();
    let value = changed.get(member);
    if value.is_null() {
        return Ok(Checked::NotApplicable);
    }
    let probe = Probe::of_member(CheckKind::ArrayContents, member);
    let nested = member.tag.component().is_some_and(|c| c.is_array());
    changed.set(member, ctx.rt().deep_copy(&value))?;

    if !ctx.equals(probe, &reference, &changed)? {
        let explanation = if nested {
            format!(
                "Multidimensional array: identity or element-wise comparison used \
                 instead of deep comparison for member `{}`.",
                member.name
            )
        } else {
            format!(
                "Array: identity comparison used instead of element-wise comparison for member `{}`.",
                member.name
            )
        };
        return Err(probe.fail(ViolationKind::ArrayIdentity, explanation));
    }
    if ctx.hash(probe, &reference)? != ctx.hash(probe, &changed)? {
        let explanation = if nested {
            format!(
                "Multidimensional array: hash_code does not use a deep hash for member `{}`.",
                member.name
            )
        } else {
            format!(
                "Array: hash_code hashes member `{}` by identity instead of by elements.",
                member.name
            )
        };
        return Err(probe.fail(ViolationKind::ArrayHash, explanation));
    }
    Ok(Checked::Pass)
}
