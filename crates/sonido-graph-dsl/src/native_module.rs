//! The catalog of native modules: pure functions the compiler knows about,
//! each with a signature over the type/qualifier model, an optional
//! compile-time evaluator, and zero or more rewrite rules (§4.2).

use std::collections::HashMap;

use crate::error::RegistrationError;
use crate::pattern::OptimizationRule;
use crate::registry::RegistrationPhase;
use crate::types::{DataType, NativeModuleId, Qualifier, Value};

/// Small fixed ceiling on a native module's argument count, matching the
/// original source's `k_max_native_module_arguments`.
pub const MAX_NATIVE_MODULE_ARGUMENTS: usize = 10;

/// One argument of a native module's signature.
#[derive(Clone, Debug)]
pub struct Argument {
    /// How the argument flows.
    pub qualifier: Qualifier,
    /// The argument's primitive/array type.
    pub data_type: DataType,
    /// True if this output argument is the module's "return" argument for
    /// rule syntax (exactly one output per module is marked this way).
    pub is_return: bool,
}

impl Argument {
    /// Builds an input argument (`in` or `constant`).
    #[must_use]
    pub fn input(qualifier: Qualifier, data_type: DataType) -> Self {
        debug_assert!(matches!(qualifier, Qualifier::In | Qualifier::Constant));
        Self { qualifier, data_type, is_return: false }
    }

    /// Builds an output argument.
    #[must_use]
    pub fn output(data_type: DataType, is_return: bool) -> Self {
        Self { qualifier: Qualifier::Out, data_type, is_return }
    }

    /// True if this argument is consumed by the call (`in` or `constant`).
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(self.qualifier, Qualifier::In | Qualifier::Constant)
    }
}

/// Signature for a native module's compile-time evaluator: given the values
/// of every input argument in signature order, returns one value per output
/// argument, also in signature order.
pub type CompileTimeEval = fn(&[Value]) -> Vec<Value>;

/// A pure function known to the compiler.
#[derive(Clone)]
pub struct NativeModule {
    /// Fingerprint identifying this module.
    pub uid: NativeModuleId,
    /// Human-readable name used in diagnostics.
    pub display_name: String,
    /// Signature, in call-argument order.
    pub arguments: Vec<Argument>,
    /// Present if this module can be evaluated at compile time.
    pub compile_time_eval: Option<CompileTimeEval>,
}

impl std::fmt::Debug for NativeModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeModule")
            .field("uid", &self.uid)
            .field("display_name", &self.display_name)
            .field("arguments", &self.arguments)
            .field("is_compile_time_callable", &self.compile_time_eval.is_some())
            .finish()
    }
}

impl NativeModule {
    /// True if this module has a compile-time evaluator.
    #[must_use]
    pub fn is_compile_time_callable(&self) -> bool {
        self.compile_time_eval.is_some()
    }

    /// Indices, in signature order, of argument positions that are inputs.
    pub fn input_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.arguments
            .iter()
            .enumerate()
            .filter(|(_, arg)| arg.is_input())
            .map(|(i, _)| i)
    }

    /// Indices, in signature order, of argument positions that are outputs.
    pub fn output_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.arguments
            .iter()
            .enumerate()
            .filter(|(_, arg)| !arg.is_input())
            .map(|(i, _)| i)
    }

    /// Index of the argument marked as this module's return argument, if any.
    #[must_use]
    pub fn return_index(&self) -> Option<usize> {
        self.arguments.iter().position(|arg| arg.is_return)
    }
}

/// Metadata for a registered native module library.
#[derive(Clone, Debug)]
pub struct NativeModuleLibrary {
    /// Library identifier, the first half of every [`NativeModuleId`] it owns.
    pub id: u32,
    /// Human-readable library name.
    pub name: String,
    /// `(major, minor)` version.
    pub version: (u16, u16),
}

/// The process-lifetime catalog of native modules, operators, and
/// optimization rules. Follows the `Uninitialized -> Initialized ->
/// Registering -> Finalized` lifecycle (§4.2.2); mutating calls are rejected
/// outside `Registering`.
#[derive(Default)]
pub struct NativeModuleRegistry {
    phase: RegistrationPhase,
    libraries: HashMap<u32, NativeModuleLibrary>,
    modules: HashMap<NativeModuleId, NativeModule>,
    operators: HashMap<String, NativeModuleId>,
    rules: HashMap<NativeModuleId, Vec<OptimizationRule>>,
}

impl NativeModuleRegistry {
    /// Creates an empty registry in the `Initialized` phase.
    #[must_use]
    pub fn new() -> Self {
        Self { phase: RegistrationPhase::Initialized, ..Self::default() }
    }

    /// Moves the registry into the `Registering` phase.
    pub fn begin_registration(&mut self) {
        self.phase = RegistrationPhase::Registering;
    }

    /// Finalizes registration. On success, moves to `Finalized`; on failure,
    /// the registry remains in `Registering` so the caller can inspect what
    /// was partially registered.
    pub fn end_registration(&mut self) -> Result<(), RegistrationError> {
        // No cross-module validation is required beyond what each
        // register_* call already checked; this exists as the symmetric
        // counterpart to TaskFunctionRegistry::end_registration and as the
        // hook for future whole-registry validation.
        self.phase = RegistrationPhase::Finalized;
        Ok(())
    }

    /// The registry's current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> RegistrationPhase {
        self.phase
    }

    /// Registers a native module library.
    pub fn register_library(&mut self, id: u32, name: &str, version: (u16, u16)) -> Result<(), RegistrationError> {
        if !self.phase.accepts_mutation() {
            return Err(RegistrationError::UnknownLibrary { name: name.to_string(), library_id: id });
        }
        if self.libraries.contains_key(&id) {
            return Err(RegistrationError::UidCollision {
                name: name.to_string(),
                uid: format!("library:{id}"),
            });
        }
        self.libraries.insert(id, NativeModuleLibrary { id, name: name.to_string(), version });
        Ok(())
    }

    /// Registers a native module. Fails if its library was never registered
    /// or its uid collides with an existing module.
    pub fn register_native_module(&mut self, module: NativeModule) -> Result<(), RegistrationError> {
        if !self.phase.accepts_mutation() {
            return Err(RegistrationError::UnknownLibrary {
                name: module.display_name.clone(),
                library_id: module.uid.library_id,
            });
        }
        if !self.libraries.contains_key(&module.uid.library_id) {
            return Err(RegistrationError::UnknownLibrary {
                name: module.display_name.clone(),
                library_id: module.uid.library_id,
            });
        }
        if self.modules.contains_key(&module.uid) {
            return Err(RegistrationError::UidCollision {
                name: module.display_name.clone(),
                uid: module.uid.to_string(),
            });
        }
        debug_assert!(
            module.arguments.len() <= MAX_NATIVE_MODULE_ARGUMENTS,
            "native module '{}' exceeds the {} argument cap",
            module.display_name,
            MAX_NATIVE_MODULE_ARGUMENTS
        );
        self.modules.insert(module.uid, module);
        Ok(())
    }

    /// Binds a canonical operator token (e.g. `+`) to a native module uid.
    pub fn register_operator(&mut self, operator: &str, uid: NativeModuleId) -> Result<(), RegistrationError> {
        if let Some(existing) = self.operators.get(operator) {
            if *existing != uid {
                return Err(RegistrationError::DuplicateOperatorBinding { operator: operator.to_string() });
            }
            return Ok(());
        }
        self.operators.insert(operator.to_string(), uid);
        Ok(())
    }

    /// Registers an optimization rule. Rejects rules whose owning module is
    /// unknown or has more than one output argument (§4.4.3 edge case: the
    /// rule engine only supports single-output call roots).
    pub fn register_optimization_rule(&mut self, rule: OptimizationRule) -> Result<(), RegistrationError> {
        let module = self.modules.get(&rule.module).ok_or(RegistrationError::UnknownLibrary {
            name: format!("rule for {}", rule.module),
            library_id: rule.module.library_id,
        })?;
        if module.output_indices().count() != 1 {
            return Err(RegistrationError::InvalidRuleRoot { module: rule.module });
        }
        self.rules.entry(rule.module).or_default().push(rule);
        Ok(())
    }

    /// Looks up a native module by uid.
    #[must_use]
    pub fn get(&self, uid: NativeModuleId) -> Option<&NativeModule> {
        self.modules.get(&uid)
    }

    /// The native module uid bound to an operator token, if any.
    #[must_use]
    pub fn operator_module(&self, operator: &str) -> Option<NativeModuleId> {
        self.operators.get(operator).copied()
    }

    /// The optimization rules registered against the given module, in
    /// registration order. Empty if none are registered.
    #[must_use]
    pub fn rules_for(&self, uid: NativeModuleId) -> &[OptimizationRule] {
        self.rules.get(&uid).map_or(&[], Vec::as_slice)
    }

    /// Total number of registered optimization rules, across all modules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Total number of registered native modules.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Primitive;

    fn real_in() -> Argument {
        Argument::input(Qualifier::In, DataType::scalar(Primitive::Real))
    }

    fn real_out() -> Argument {
        Argument::output(DataType::scalar(Primitive::Real), true)
    }

    fn negation(uid: NativeModuleId) -> NativeModule {
        NativeModule {
            uid,
            display_name: "negation".to_string(),
            arguments: vec![real_in(), real_out()],
            compile_time_eval: Some(|args| vec![Value::Real(-args[0].as_real())]),
        }
    }

    #[test]
    fn registration_requires_registering_phase() {
        let mut registry = NativeModuleRegistry::new();
        let result = registry.register_library(0, "core", (1, 0));
        assert!(result.is_err());
    }

    #[test]
    fn happy_path_registration() {
        let mut registry = NativeModuleRegistry::new();
        registry.begin_registration();
        registry.register_library(0, "core", (1, 0)).unwrap();
        let uid = NativeModuleId::new(0, 0);
        registry.register_native_module(negation(uid)).unwrap();
        registry.end_registration().unwrap();

        assert_eq!(registry.phase(), RegistrationPhase::Finalized);
        assert!(registry.get(uid).unwrap().is_compile_time_callable());
    }

    #[test]
    fn rejects_unknown_library() {
        let mut registry = NativeModuleRegistry::new();
        registry.begin_registration();
        let uid = NativeModuleId::new(0, 0);
        let result = registry.register_native_module(negation(uid));
        assert!(matches!(result, Err(RegistrationError::UnknownLibrary { .. })));
    }

    #[test]
    fn rejects_uid_collision() {
        let mut registry = NativeModuleRegistry::new();
        registry.begin_registration();
        registry.register_library(0, "core", (1, 0)).unwrap();
        let uid = NativeModuleId::new(0, 0);
        registry.register_native_module(negation(uid)).unwrap();
        let result = registry.register_native_module(negation(uid));
        assert!(matches!(result, Err(RegistrationError::UidCollision { .. })));
    }

    #[test]
    fn rejects_duplicate_operator_binding() {
        let mut registry = NativeModuleRegistry::new();
        registry.begin_registration();
        registry.register_library(0, "core", (1, 0)).unwrap();
        let a = NativeModuleId::new(0, 0);
        let b = NativeModuleId::new(0, 1);
        registry.register_native_module(negation(a)).unwrap();
        registry.register_native_module(negation(b)).unwrap();
        registry.register_operator("-", a).unwrap();
        let result = registry.register_operator("-", b);
        assert!(matches!(result, Err(RegistrationError::DuplicateOperatorBinding { .. })));
    }

    #[test]
    fn rejects_rule_on_multi_output_module() {
        let mut registry = NativeModuleRegistry::new();
        registry.begin_registration();
        registry.register_library(0, "core", (1, 0)).unwrap();
        let uid = NativeModuleId::new(0, 0);
        let mut module = negation(uid);
        module.arguments.push(real_out());
        registry.register_native_module(module).unwrap();

        let rule = OptimizationRule::new(uid, vec![], vec![]);
        let result = registry.register_optimization_rule(rule);
        assert!(matches!(result, Err(RegistrationError::InvalidRuleRoot { .. })));
    }
}
