//! The ordered check suite.
//!
//! Type-level checks run once, then every instance member gets the
//! per-member checks in [`CheckKind::PER_MEMBER`] order. Every check works
//! on fresh copies of the subject's witnesses; the cached triple is never
//! mutated.
//!
//! A check either passes, does not apply (no result is recorded), or fails
//! with a [`Violation`]. A failed reflexivity check, or any failure of the
//! type's own operations, ends the checks for that member. A failed identity
//! check ends the suite.

mod fields;
mod nulls;
mod significance;
mod type_level;

use eqv_ir::{AccessError, InstanceError, Name, Runtime, TypeDef, TypeTag, Value};
use eqv_witness::{InstanceAccessor, Member, RecursionGuard, ValueProvider, WitnessError};

use crate::{CheckKind, CheckResult, ContractConfig, Verdict, VerifyError, Violation, ViolationKind, Warning};

/// Why a check did not pass.
#[derive(Debug)]
pub(crate) enum Failure {
    /// The contract does not hold.
    Violation(Violation),
    /// The engine could not carry out the check.
    Engine(VerifyError),
}

impl From<WitnessError> for Failure {
    fn from(err: WitnessError) -> Self {
        Failure::Engine(err.into())
    }
}

impl From<AccessError> for Failure {
    fn from(err: AccessError) -> Self {
        Failure::Engine(err.into())
    }
}

/// A check that ran to completion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Checked {
    Pass,
    NotApplicable,
}

/// Whether the suite goes on after a type-level check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Stop,
}

/// The check being run and the member it is about.
#[derive(Copy, Clone)]
pub(crate) struct Probe<'m> {
    check: CheckKind,
    member: Option<&'m Member>,
}

impl<'m> Probe<'m> {
    pub(crate) fn of_type(check: CheckKind) -> Self {
        Probe { check, member: None }
    }

    pub(crate) fn of_member(check: CheckKind, member: &'m Member) -> Self {
        Probe {
            check,
            member: Some(member),
        }
    }

    pub(crate) fn fail(self, kind: ViolationKind, explanation: impl Into<String>) -> Failure {
        Failure::Violation(Violation::new(
            kind,
            self.member.map(|m| m.name.clone()),
            explanation,
        ))
    }

    pub(crate) fn fail_with(self, kind: ViolationKind, explanation: impl Into<String>, cause: InstanceError) -> Failure {
        let member = self.member.map(|m| m.name.clone());
        Failure::Violation(Violation::new(kind, member, explanation).caused_by(cause))
    }

    /// One of the type's own operations failed.
    pub(crate) fn thrown(self, operation: &str, err: InstanceError) -> Failure {
        let explanation = match self.member {
            Some(m) => format!(
                "{operation} failed during the {} check of member `{}`: {err}",
                self.check, m.name
            ),
            None => format!("{operation} failed during the {} check: {err}", self.check),
        };
        self.fail_with(ViolationKind::PropagatedError, explanation, err)
    }
}

/// Everything the checks of one verification share.
pub(crate) struct Context<'a> {
    rt: &'a Runtime,
    config: &'a ContractConfig,
    provider: &'a dyn ValueProvider,
    guard: RecursionGuard,
    primary: InstanceAccessor<'a>,
    alternate: InstanceAccessor<'a>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        rt: &'a Runtime,
        config: &'a ContractConfig,
        provider: &'a dyn ValueProvider,
        primary: &Value,
        alternate: &Value,
    ) -> Result<Self, AccessError> {
        Ok(Context {
            rt,
            config,
            provider,
            guard: RecursionGuard::new(),
            primary: InstanceAccessor::of(rt, primary)?,
            alternate: InstanceAccessor::of(rt, alternate)?,
        })
    }

    pub(crate) fn rt(&self) -> &'a Runtime {
        self.rt
    }

    pub(crate) fn config(&self) -> &'a ContractConfig {
        self.config
    }

    pub(crate) fn def(&self) -> &TypeDef {
        self.primary.def()
    }

    pub(crate) fn tag(&self) -> &TypeTag {
        self.config.tag()
    }

    pub(crate) fn members(&self) -> &[Member] {
        self.primary.members()
    }

    pub(crate) fn suppressed(&self, warning: Warning) -> bool {
        self.config.is_suppressed(warning)
    }

    /// A fresh copy of the primary witness.
    pub(crate) fn reference(&self) -> InstanceAccessor<'a> {
        self.primary.copy()
    }

    /// A fresh copy of the alternate witness.
    pub(crate) fn other(&self) -> InstanceAccessor<'a> {
        self.alternate.copy()
    }

    /// Replace `member` of `subject` with the other witness of its type.
    pub(crate) fn change(&self, subject: &InstanceAccessor<'_>, member: &Member) -> Result<(), Failure> {
        subject.change_member(member, self.provider, &self.guard)?;
        Ok(())
    }

    /// Whether `member`'s type has only one witness to offer.
    pub(crate) fn is_degenerate(&self, member: &Member) -> Result<bool, Failure> {
        Ok(self.provider.resolve(&member.tag, &self.guard)?.is_degenerate())
    }

    /// Null handling is not wanted for `member`.
    pub(crate) fn skips_nulls(&self, member: &Member) -> bool {
        self.suppressed(Warning::NULL_FIELDS) || self.config.is_non_null(member.name.as_str())
    }

    /// `member` may hold its zero/absent value in a meaningful instance.
    pub(crate) fn can_be_default(&self, member: &Member) -> bool {
        member.is_non_nullable_primitive() || !self.skips_nulls(member)
    }

    pub(crate) fn equals(&self, probe: Probe<'_>, a: &InstanceAccessor<'_>, b: &InstanceAccessor<'_>) -> Result<bool, Failure> {
        self.rt
            .invoke_equals(&a.value(), &b.value())
            .map_err(|err| probe.thrown("equals", err))
    }

    /// The hash of `subject`, with any cached hash member recomputed first.
    pub(crate) fn hash_of(&self, subject: &InstanceAccessor<'_>) -> Result<Result<i32, InstanceError>, AccessError> {
        if let Some(cached) = self.config.cached_hash() {
            if let Some(member) = subject.member(cached.member().as_str()) {
                let computed = cached.compute(&self.rt.instance(subject.subject())?);
                match computed {
                    Ok(h) => subject.set(member, Value::I32(h))?,
                    Err(err) => return Ok(Err(err)),
                }
            }
        }
        Ok(self.rt.invoke_hash(&subject.value()))
    }

    pub(crate) fn hash(&self, probe: Probe<'_>, subject: &InstanceAccessor<'_>) -> Result<i32, Failure> {
        self.hash_of(subject)?
            .map_err(|err| probe.thrown("hash_code", err))
    }

    /// Render for an explanation; a failing render is shown, not raised.
    pub(crate) fn show(&self, subject: &InstanceAccessor<'_>) -> String {
        self.rt
            .invoke_render(&subject.value())
            .unwrap_or_else(|err| format!("<render failed: {err}>"))
    }
}

type TypeCheck = fn(&Context<'_>) -> Result<Flow, Failure>;
type MemberCheck = fn(&Context<'_>, &Member) -> Result<Checked, Failure>;

const TYPE_CHECKS: [(CheckKind, TypeCheck); 6] = [
    (CheckKind::InheritedIdentity, type_level::inherited_identity),
    (CheckKind::IdenticalCopy, type_level::identical_copy),
    (CheckKind::NullArgument, type_level::null_argument),
    (CheckKind::TypeCheck, type_level::unrelated_type),
    (CheckKind::HashConsistency, type_level::hash_consistency),
    (CheckKind::DistinctWitnesses, type_level::distinct_witnesses),
];

const MEMBER_CHECKS: [(CheckKind, MemberCheck); 9] = [
    (CheckKind::Reflexivity, fields::reflexivity),
    (CheckKind::Symmetry, fields::symmetry),
    (CheckKind::Transitivity, fields::transitivity),
    (CheckKind::Significance, significance::check),
    (CheckKind::Mutability, fields::mutability),
    (CheckKind::Transient, fields::transient),
    (CheckKind::FloatingPoint, fields::floating_point),
    (CheckKind::ArrayContents, fields::array_contents),
    (CheckKind::NullHandling, nulls::check),
];

/// Run the whole suite against the context's subject.
pub(crate) fn run(ctx: &Context<'_>) -> Result<Vec<CheckResult>, VerifyError> {
    let mut results = Vec::new();

    for (check, run_check) in TYPE_CHECKS {
        let stop = match run_check(ctx) {
            Ok(flow) => {
                results.push(record(check, None, Verdict::Pass));
                flow == Flow::Stop
            }
            Err(Failure::Violation(v)) => {
                results.push(record(check, None, Verdict::Violation(v)));
                matches!(check, CheckKind::InheritedIdentity | CheckKind::IdenticalCopy)
            }
            Err(Failure::Engine(err)) => return Err(err),
        };
        if stop {
            tracing::debug!(check = %check, "suite stopped");
            return Ok(results);
        }
    }

    for member in ctx.members().iter().filter(|m| !m.is_skipped()) {
        for (check, run_check) in MEMBER_CHECKS {
            let name = Some(member.name.clone());
            match run_check(ctx, member) {
                Ok(Checked::Pass) => results.push(record(check, name, Verdict::Pass)),
                Ok(Checked::NotApplicable) => {}
                Err(Failure::Violation(v)) => {
                    let cascade = check == CheckKind::Reflexivity || v.kind == ViolationKind::PropagatedError;
                    results.push(record(check, name, Verdict::Violation(v)));
                    if cascade {
                        tracing::debug!(member = %member.name, "remaining checks skipped");
                        break;
                    }
                }
                Err(Failure::Engine(err)) => return Err(err),
            }
        }
    }
    Ok(results)
}

fn record(check: CheckKind, member: Option<Name>, verdict: Verdict) -> CheckResult {
    let member_name = member.as_ref().map_or("-", Name::as_str);
    match &verdict {
        Verdict::Pass => tracing::debug!(check = %check, member = member_name, "pass"),
        Verdict::Violation(v) => {
            tracing::debug!(check = %check, member = member_name, kind = ?v.kind, "violation");
        }
    }
    CheckResult { check, member, verdict }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
