//! What a verification reports.

use std::fmt;

use eqv_ir::{InstanceError, Name, TypeTag};

/// One check of the suite.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CheckKind {
    // Type level, once per verification.
    InheritedIdentity,
    IdenticalCopy,
    NullArgument,
    TypeCheck,
    HashConsistency,
    DistinctWitnesses,

    // Per member, in this order.
    Reflexivity,
    Symmetry,
    Transitivity,
    Significance,
    Mutability,
    Transient,
    FloatingPoint,
    ArrayContents,
    NullHandling,
}

impl CheckKind {
    pub const TYPE_LEVEL: [CheckKind; 6] = [
        CheckKind::InheritedIdentity,
        CheckKind::IdenticalCopy,
        CheckKind::NullArgument,
        CheckKind::TypeCheck,
        CheckKind::HashConsistency,
        CheckKind::DistinctWitnesses,
    ];

    pub const PER_MEMBER: [CheckKind; 9] = [
        CheckKind::Reflexivity,
        CheckKind::Symmetry,
        CheckKind::Transitivity,
        CheckKind::Significance,
        CheckKind::Mutability,
        CheckKind::Transient,
        CheckKind::FloatingPoint,
        CheckKind::ArrayContents,
        CheckKind::NullHandling,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CheckKind::InheritedIdentity => "inherited identity",
            CheckKind::IdenticalCopy => "identical copy",
            CheckKind::NullArgument => "null argument",
            CheckKind::TypeCheck => "type check",
            CheckKind::HashConsistency => "hash consistency",
            CheckKind::DistinctWitnesses => "distinct witnesses",
            CheckKind::Reflexivity => "reflexivity",
            CheckKind::Symmetry => "symmetry",
            CheckKind::Transitivity => "transitivity",
            CheckKind::Significance => "significance",
            CheckKind::Mutability => "mutability",
            CheckKind::Transient => "transient",
            CheckKind::FloatingPoint => "floating point",
            CheckKind::ArrayContents => "array contents",
            CheckKind::NullHandling => "null handling",
        }
    }

    pub fn is_type_level(self) -> bool {
        CheckKind::TYPE_LEVEL.contains(&self)
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The nature of a contract violation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// No `equals` of its own, so identity is inherited.
    InheritedIdentity,
    /// An instance is not equal to itself or to an identical copy.
    IdenticalCopy,
    /// `IDENTICAL_COPY` was suppressed, but identical copies are equal.
    UnnecessarySuppression,
    /// `equals(null)` returned true or threw.
    NullArgument,
    /// `equals` returned true or threw for a value of an unrelated type.
    UnrelatedType,
    /// Equal instances have different hashes.
    HashInconsistent,
    /// The two witnesses of the subject type are equal.
    IndistinctWitnesses,
    /// A member is compared by identity instead of its own `equals`.
    ReferenceEquality,
    Asymmetric,
    Intransitive,
    /// `equals` ignores a member that it should use.
    MemberNotUsed,
    /// `equals` uses a member that was declared ignored.
    MemberShouldNotBeUsed,
    /// `equals` uses a member that `hash_code` ignores.
    EqualsWithoutHash,
    /// `hash_code` uses a member that `equals` ignores.
    HashWithoutEquals,
    /// `equals` depends on a member that can change after construction.
    MutableState,
    /// `equals` depends on a transient member.
    TransientUsed,
    /// A floating point member is compared so that `NaN` differs from itself.
    NanInequality,
    /// An array member is compared by identity or shallowly.
    ArrayIdentity,
    /// An array member is hashed by identity or shallowly.
    ArrayHash,
    /// An operation fails when a member is absent.
    NullPointer,
    /// One of the type's own operations failed during a check.
    PropagatedError,
}

/// A failed check, explained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    /// The member under test; `None` for type-level checks.
    pub member: Option<Name>,
    pub explanation: String,
    /// The error raised by the type's own operation, if that is what failed.
    pub cause: Option<InstanceError>,
}

impl Violation {
    pub fn new(kind: ViolationKind, member: Option<Name>, explanation: impl Into<String>) -> Self {
        Violation {
            kind,
            member,
            explanation: explanation.into(),
            cause: None,
        }
    }

    #[must_use]
    pub fn caused_by(mut self, cause: InstanceError) -> Self {
        self.cause = Some(cause);
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.explanation)?;
        if let Some(cause) = &self.cause {
            write!(f, "\n  caused by: {cause}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Violation(Violation),
}

/// The outcome of one check, for the whole type or for one member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckResult {
    pub check: CheckKind,
    pub member: Option<Name>,
    pub verdict: Verdict,
}

impl CheckResult {
    pub fn pass(check: CheckKind, member: Option<Name>) -> Self {
        CheckResult {
            check,
            member,
            verdict: Verdict::Pass,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self.verdict, Verdict::Pass)
    }

    pub fn violation(&self) -> Option<&Violation> {
        match &self.verdict {
            Verdict::Pass => None,
            Verdict::Violation(v) => Some(v),
        }
    }
}

/// Every check result for one subject type, in the order the checks ran.
///
/// Checks that do not apply to a member, or that were cut short by an
/// earlier failure, have no result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub tag: TypeTag,
    pub results: Vec<CheckResult>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.results.iter().all(CheckResult::is_pass)
    }

    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.results.iter().filter_map(CheckResult::violation)
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.is_pass()).count()
    }

    /// Results concerning `member`.
    pub fn for_member<'a>(&'a self, member: &'a str) -> impl Iterator<Item = &'a CheckResult> + 'a {
        self.results
            .iter()
            .filter(move |r| r.member.as_ref().is_some_and(|m| m == member))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let violations: Vec<&Violation> = self.violations().collect();
        if violations.is_empty() {
            return write!(f, "`{}`: {} checks passed", self.tag, self.passed());
        }
        write!(
            f,
            "`{}`: {} of {} checks failed",
            self.tag,
            violations.len(),
            self.results.len()
        )?;
        for violation in violations {
            write!(f, "\n\n{violation}")?;
        }
        Ok(())
    }
}
