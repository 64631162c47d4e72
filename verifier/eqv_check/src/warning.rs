//! Suppressible rules.

use std::fmt;

bitflags::bitflags! {
    /// Rules a caller may switch off for one verification.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Warning: u16 {
        /// `equals` is identity-based on purpose; copies must then be unequal.
        const IDENTICAL_COPY = 1 << 0;
        /// Members may be compared by identity instead of their own `equals`.
        const REFERENCE_EQUALITY = 1 << 1;
        /// Members are never absent; skip every null-handling check.
        const NULL_FIELDS = 1 << 2;
        /// Allow `equals` to depend on members that are not fixed at construction.
        const NONFINAL_FIELDS = 1 << 3;
        /// Allow `hash_code` to ignore members that `equals` uses.
        const STRICT_HASHCODE = 1 << 4;
        /// Allow members that `equals` does not use.
        const ALL_FIELDS_SHOULD_BE_USED = 1 << 5;
        /// Allow unused members as long as they are not fixed at construction.
        const ALL_NONFINAL_FIELDS_SHOULD_BE_USED = 1 << 6;
        /// Allow transient members to take part in `equals`.
        const TRANSIENT_FIELDS = 1 << 7;
        /// Accept a type that inherits identity equivalence.
        const INHERITED_DIRECTLY_FROM_OBJECT = 1 << 8;
    }
}

impl Warning {
    const NAMES: [(Warning, &'static str); 9] = [
        (Warning::IDENTICAL_COPY, "IDENTICAL_COPY"),
        (Warning::REFERENCE_EQUALITY, "REFERENCE_EQUALITY"),
        (Warning::NULL_FIELDS, "NULL_FIELDS"),
        (Warning::NONFINAL_FIELDS, "NONFINAL_FIELDS"),
        (Warning::STRICT_HASHCODE, "STRICT_HASHCODE"),
        (Warning::ALL_FIELDS_SHOULD_BE_USED, "ALL_FIELDS_SHOULD_BE_USED"),
        (
            Warning::ALL_NONFINAL_FIELDS_SHOULD_BE_USED,
            "ALL_NONFINAL_FIELDS_SHOULD_BE_USED",
        ),
        (Warning::TRANSIENT_FIELDS, "TRANSIENT_FIELDS"),
        (
            Warning::INHERITED_DIRECTLY_FROM_OBJECT,
            "INHERITED_DIRECTLY_FROM_OBJECT",
        ),
    ];
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, name) in Warning::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("(none)")?;
        }
        Ok(())
    }
}
