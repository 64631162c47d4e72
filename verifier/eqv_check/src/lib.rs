//! Eqv Check - Equivalence Contract Verification
//!
//! Verifies that a registered type's `equals` and `hash_code` satisfy the
//! equivalence contract, using witnesses synthesized by `eqv_witness`:
//!
//! - **Type level**: an `equals` of its own, equality with an identical
//!   copy, `equals(null)` is false, equal copies hash alike, distinct
//!   witnesses are unequal
//! - **Per member**: reflexivity, symmetry, transitivity, significance,
//!   mutability, transience, `NaN` handling, array comparison and null
//!   handling
//!
//! Violations are reported, not raised: [`verify`] returns a [`Report`]
//! unless the engine itself could not run (an unresolvable or recursive
//! type, or a configuration that does not fit the runtime).
//!
//! ```text
//! let config = ContractConfig::for_type(TypeTag::simple("Point"));
//! let report = eqv_check::verify(&runtime, &config)?;
//! assert!(report.is_success(), "{report}");
//! ```

mod checks;
mod config;
mod error;
mod result;
mod warning;

use std::sync::Once;

use eqv_ir::Runtime;
use eqv_witness::{CachedValueProvider, FactoryRegistry, RecursionGuard, ValueProvider};
use rayon::prelude::*;

pub use config::{CachedHash, ContractConfig};
pub use error::{ConfigError, VerifyError};
pub use result::{CheckKind, CheckResult, Report, Verdict, Violation, ViolationKind};
pub use warning::Warning;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=eqv_check=debug`, or
/// `RUST_LOG=eqv_witness=trace` to follow witness resolution.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

/// Verify the equivalence contract of `config`'s subject type.
#[tracing::instrument(level = "debug", skip_all, fields(ty = %config.tag()))]
pub fn verify(rt: &Runtime, config: &ContractConfig) -> Result<Report, VerifyError> {
    config.validate(rt)?;
    let tag = config.tag();
    if !rt.require(tag.raw())?.is_record() {
        return Err(VerifyError::NotARecord(tag.clone()));
    }

    let registry = FactoryRegistry::with_defaults().merge(config.factories());
    let provider = CachedValueProvider::new(rt, &registry, config.prefab());
    let triple = provider.resolve(tag, &RecursionGuard::new())?;
    let ctx = checks::Context::new(rt, config, &provider, &triple.primary, &triple.alternate)?;
    let results = checks::run(&ctx)?;
    let report = Report {
        tag: tag.clone(),
        results,
    };
    tracing::debug!(
        passed = report.passed(),
        total = report.results.len(),
        "verification finished"
    );
    Ok(report)
}

/// Verify several types in parallel. Each verification resolves its own
/// witnesses; the runtime is shared read-only.
pub fn verify_all(rt: &Runtime, configs: &[ContractConfig]) -> Vec<Result<Report, VerifyError>> {
    configs.par_iter().map(|config| verify(rt, config)).collect()
}
