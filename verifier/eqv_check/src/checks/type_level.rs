//! Checks about the subject type as a whole.

use eqv_ir::Value;
use eqv_witness::InstanceAccessor;

use super::{Context, Failure, Flow, Probe};
use crate::{CheckKind, ViolationKind, Warning};

/// Without an `equals` of its own the type compares by identity, and none
/// of the other checks mean anything.
pub(super) fn inherited_identity(ctx: &Context<'_>) -> Result<Flow, Failure> {
    if ctx.def().declares_equals() {
        return Ok(Flow::Continue);
    }
    if ctx.suppressed(Warning::INHERITED_DIRECTLY_FROM_OBJECT) {
        return Ok(Flow::Stop);
    }
    Err(Probe::of_type(CheckKind::InheritedIdentity).fail(
        ViolationKind::InheritedIdentity,
        format!(
            "Inherited identity: `{}` does not define equals, so it compares by identity.\n\
             If this is intentional, suppress Warning::INHERITED_DIRECTLY_FROM_OBJECT.",
            ctx.tag()
        ),
    ))
}

/// Both witnesses must equal themselves and an identical copy of
/// themselves.
pub(super) fn identical_copy(ctx: &Context<'_>) -> Result<Flow, Failure> {
    let probe = Probe::of_type(CheckKind::IdenticalCopy);
    for subject in [ctx.reference(), ctx.other()] {
        copy_of(ctx, probe, &subject)?;
    }
    Ok(Flow::Continue)
}

fn copy_of(ctx: &Context<'_>, probe: Probe<'_>, subject: &InstanceAccessor<'_>) -> Result<(), Failure> {
    if !ctx.equals(probe, subject, subject)? {
        return Err(probe.fail(
            ViolationKind::IdenticalCopy,
            format!("Reflexivity: object does not equal itself:\n  {}", ctx.show(subject)),
        ));
    }

    let copy = subject.copy();
    let equal = ctx.equals(probe, subject, &copy)?;
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
                ctx.show(subject)
            ),
        ));
    }
    Ok(())
}

pub(super) fn null_argument(ctx: &Context<'_>) -> Result<Flow, Failure> {
    let probe = Probe::of_type(CheckKind::NullArgument);
    let subject = ctx.reference();
    match ctx.rt().invoke_equals(&subject.value(), &Value::Null) {
        Ok(false) => Ok(Flow::Continue),
        Ok(true) => Err(probe.fail(
            ViolationKind::NullArgument,
            "Non-nullity: true returned for null value.",
        )),
        Err(err) => Err(probe.fail_with(
            ViolationKind::NullArgument,
            "Non-nullity: equals throws when its argument is absent.",
            err,
        )),
    }
}

const UNRELATED: &str = "something else entirely";

/// `equals` against a value of some other type is false, and does not throw.
pub(super) fn unrelated_type(ctx: &Context<'_>) -> Result<Flow, Failure> {
    let probe = Probe::of_type(CheckKind::TypeCheck);
    let subject = ctx.reference();
    let unrelated = Value::str(UNRELATED);
    match ctx.rt().invoke_equals(&subject.value(), &unrelated) {
        Ok(false) => Ok(Flow::Continue),
        Ok(true) => Err(probe.fail(
            ViolationKind::UnrelatedType,
            format!(
                "Type check: equals returns true for an unrelated type:\n  {} equals \"{UNRELATED}\"",
                ctx.show(&subject)
            ),
        )),
        Err(err) => Err(probe.fail_with(
            ViolationKind::UnrelatedType,
            "Type check: equals throws when its argument has an unrelated type.",
            err,
        )),
    }
}

/// Equal copies hash alike, and hashing twice gives the same hash. Both
/// witnesses are tried.
pub(super) fn hash_consistency(ctx: &Context<'_>) -> Result<Flow, Failure> {
    let probe = Probe::of_type(CheckKind::HashConsistency);
    for subject in [ctx.reference(), ctx.other()] {
        consistent_hash(ctx, probe, &subject)?;
    }
    Ok(Flow::Continue)
}

fn consistent_hash(ctx: &Context<'_>, probe: Probe<'_>, subject: &InstanceAccessor<'_>) -> Result<(), Failure> {
    let copy = subject.copy();
    if !ctx.equals(probe, subject, &copy)? {
        return Ok(());
    }
    let first = ctx.hash(probe, subject)?;
    let again = ctx.hash(probe, subject)?;
    if first != again {
        return Err(probe.fail(
            ViolationKind::HashInconsistent,
            format!(
                "hash_code: hash_code should be consistent:\n  {} has hash {first} and then {again}",
                ctx.show(subject)
            ),
        ));
    }
    let of_copy = ctx.hash(probe, &copy)?;
    if first != of_copy {
        return Err(probe.fail(
            ViolationKind::HashInconsistent,
            format!(
                "hash_code: equal objects must have equal hash codes:\n  {} has hash {first}\n  {} has hash {of_copy}",
                ctx.show(subject),
                ctx.show(&copy)
            ),
        ));
    }
    Ok(())
}

pub(super) fn distinct_witnesses(ctx: &Context<'_>) -> Result<Flow, Failure> {
    let probe = Probe::of_type(CheckKind::DistinctWitnesses);
    let primary = ctx.reference();
    let alternate = ctx.other();
    if ctx.equals(probe, &primary, &alternate)? {
        return Err(probe.fail(
            ViolationKind::IndistinctWitnesses,
            format!(
                "Precondition: the two witnesses of `{}` are equal:\n  {}\nand\n  {}\n\
                 Register distinct prefab values, or check whether equals uses any member at all.",
                ctx.tag(),
                ctx.show(&primary),
                ctx.show(&alternate)
            ),
        ));
    }
    Ok(Flow::Continue)
}
