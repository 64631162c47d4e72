//! Per-type verification settings.

use std::fmt;
use std::sync::Arc;

use eqv_ir::{HashFn, Instance, InstanceError, Name, Runtime, TypeTag, Value};
use eqv_witness::{FactoryRegistry, PrefabValues, WitnessFactory};
use rustc_hash::FxHashSet;

use crate::{ConfigError, Warning};

/// A member that caches the type's own hash, together with the computation
/// that fills it.
///
/// Before every hash comparison the member is recomputed, so the cached
/// value always reflects the other members.
#[derive(Clone)]
pub struct CachedHash {
    member: Name,
    compute: HashFn,
}

impl CachedHash {
    pub fn new(
        member: impl Into<Name>,
        compute: impl Fn(&Instance<'_>) -> Result<i32, InstanceError> + Send + Sync + 'static,
    ) -> Self {
        CachedHash {
            member: member.into(),
            compute: Arc::new(compute),
        }
    }

    pub fn member(&self) -> &Name {
        &self.member
    }

    pub fn compute(&self, this: &Instance<'_>) -> Result<i32, InstanceError> {
        (self.compute)(this)
    }
}

impl fmt::Debug for CachedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedHash")
            .field("member", &self.member)
            .finish_non_exhaustive()
    }
}

/// Everything one verification needs besides the runtime.
///
/// ```text
/// ContractConfig::for_type(TypeTag::simple("Point"))
///     .suppress(Warning::NONFINAL_FIELDS)
///     .with_ignored_members(["cache"])
/// ```
#[derive(Clone, Debug)]
pub struct ContractConfig {
    tag: TypeTag,
    suppressed: Warning,
    ignored: FxHashSet<Name>,
    non_null: FxHashSet<Name>,
    prefab: PrefabValues,
    factories: FactoryRegistry,
    cached_hash: Option<CachedHash>,
}

impl ContractConfig {
    pub fn for_type(tag: TypeTag) -> Self {
        ContractConfig {
            tag,
            suppressed: Warning::empty(),
            ignored: FxHashSet::default(),
            non_null: FxHashSet::default(),
            prefab: PrefabValues::new(),
            factories: FactoryRegistry::new(),
            cached_hash: None,
        }
    }

    /// Switch off the given rules, in addition to any already suppressed.
    #[must_use]
    pub fn suppress(mut self, warnings: Warning) -> Self {
        self.suppressed |= warnings;
        self
    }

    /// Members that `equals` is expected not to use.
    #[must_use]
    pub fn with_ignored_members<N: Into<Name>>(mut self, names: impl IntoIterator<Item = N>) -> Self {
        self.ignored.extend(names.into_iter().map(Into::into));
        self
    }

    /// Members that are never absent, so null handling is not checked for them.
    #[must_use]
    pub fn with_non_null_members<N: Into<Name>>(mut self, names: impl IntoIterator<Item = N>) -> Self {
        self.non_null.extend(names.into_iter().map(Into::into));
        self
    }

    /// Witnesses for exactly `tag`. Checked by [`ContractConfig::validate`].
    #[must_use]
    pub fn with_prefab_values(mut self, tag: TypeTag, primary: Value, alternate: Value) -> Self {
        self.prefab.insert(tag, primary, alternate);
        self
    }

    /// Witnesses for every instantiation of the generic type `raw`.
    #[must_use]
    pub fn with_generic_prefab_values(mut self, raw: impl Into<Name>, primary: Value, alternate: Value) -> Self {
        self.prefab.insert_raw(raw, primary, alternate);
        self
    }

    /// A strategy for `raw`, taking precedence over the default registry.
    #[must_use]
    pub fn with_factory(mut self, raw: impl Into<Name>, factory: impl Into<WitnessFactory>) -> Self {
        self.factories.register(raw, factory.into());
        self
    }

    #[must_use]
    pub fn with_cached_hash(mut self, cached: CachedHash) -> Self {
        self.cached_hash = Some(cached);
        self
    }

    pub fn tag(&self) -> &TypeTag {
        &self.tag
    }

    pub fn suppressed(&self) -> Warning {
        self.suppressed
    }

    pub fn is_suppressed(&self, warning: Warning) -> bool {
        self.suppressed.contains(warning)
    }

    pub fn is_ignored(&self, member: &str) -> bool {
        self.ignored.contains(member)
    }

    pub fn is_non_null(&self, member: &str) -> bool {
        self.non_null.contains(member)
    }

    pub fn prefab(&self) -> &PrefabValues {
        &self.prefab
    }

    pub fn factories(&self) -> &FactoryRegistry {
        &self.factories
    }

    pub fn cached_hash(&self) -> Option<&CachedHash> {
        self.cached_hash.as_ref()
    }

    /// Whether `member` is the cached hash member.
    pub fn is_cached_hash(&self, member: &str) -> bool {
        self.cached_hash.as_ref().is_some_and(|c| c.member == member)
    }

    /// Check the named members and the registered witnesses against `rt`.
    ///
    /// Member names are only checked when the subject type is registered;
    /// an unknown subject is reported by the verification itself.
    pub fn validate(&self, rt: &Runtime) -> Result<(), ConfigError> {
        if let Some(def) = rt.lookup(self.tag.raw()) {
            let unknown = |setting: &'static str, names: &FxHashSet<Name>| {
                let mut missing: Vec<&Name> = names.iter().filter(|n| def.field(n.as_str()).is_none()).collect();
                missing.sort();
                missing.first().map(|member| ConfigError::UnknownMember {
                    ty: def.name().clone(),
                    member: (*member).clone(),
                    setting,
                })
            };
            if let Some(err) = unknown("ignored", &self.ignored) {
                return Err(err);
            }
            if let Some(err) = unknown("non-null", &self.non_null) {
                return Err(err);
            }
            if let Some(cached) = &self.cached_hash {
                if def.field(cached.member.as_str()).is_none() {
                    return Err(ConfigError::CachedHashMember {
                        ty: def.name().clone(),
                        member: cached.member.clone(),
                    });
                }
            }
        }
        self.prefab.validate(rt)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
