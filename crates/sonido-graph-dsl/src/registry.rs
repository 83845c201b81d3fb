//! The registration lifecycle shared by [`crate::native_module::NativeModuleRegistry`]
//! and [`crate::task_function::TaskFunctionRegistry`].
//!
//! Generalizes `sonido-registry::EffectRegistry`'s simpler "always queryable"
//! pattern to the stricter phase-gating the compiler core requires: both
//! registries are populated once at process startup and are read-only for
//! the rest of the program's lifetime.

/// The lifecycle phase of a registry. Mutating calls are only accepted while
/// `Registering`; lookups are only meaningful once `Finalized`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegistrationPhase {
    /// No registry state has been set up yet.
    #[default]
    Uninitialized,
    /// The registry exists but registration has not started.
    Initialized,
    /// Registration is in progress; mutating calls are accepted.
    Registering,
    /// Registration finished successfully; the registry is read-only.
    Finalized,
}

impl RegistrationPhase {
    /// True if mutating calls (`register_*`) are currently accepted.
    #[must_use]
    pub fn accepts_mutation(self) -> bool {
        matches!(self, RegistrationPhase::Registering)
    }

    /// True if lookups are expected to see a complete, validated registry.
    #[must_use]
    pub fn is_finalized(self) -> bool {
        matches!(self, RegistrationPhase::Finalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_registering_accepts_mutation() {
        assert!(!RegistrationPhase::Uninitialized.accepts_mutation());
        assert!(!RegistrationPhase::Initialized.accepts_mutation());
        assert!(RegistrationPhase::Registering.accepts_mutation());
        assert!(!RegistrationPhase::Finalized.accepts_mutation());
    }
}
