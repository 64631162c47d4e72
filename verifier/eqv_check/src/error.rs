//! Engine-level failures of a verification.
//!
//! A contract violation is not an error: it is reported in the
//! [`Report`](crate::Report). These are the cases where no report can be
//! produced at all.

use eqv_ir::{AccessError, Name, TypeTag};
use eqv_witness::WitnessError;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error(transparent)]
    Witness(#[from] WitnessError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("`{0}` is not a record type; only records have an equivalence contract to verify")]
    NotARecord(TypeTag),
}

/// A `ContractConfig` that does not fit the runtime it is verified against.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("`{ty}` has no member `{member}` (named as {setting})")]
    UnknownMember {
        ty: Name,
        member: Name,
        setting: &'static str,
    },

    #[error("cached hash member `{member}` does not exist on `{ty}`")]
    CachedHashMember { ty: Name, member: Name },

    #[error(transparent)]
    InvalidPrefab(#[from] WitnessError),
}
