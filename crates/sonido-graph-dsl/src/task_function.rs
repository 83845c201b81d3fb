//! The task-function catalog: the executable counterparts native-module
//! calls compile down to, plus the per-native-module mapping list the task
//! graph builder uses to pick one for each call (§4.5).

use std::collections::{HashMap, HashSet};

use crate::error::RegistrationError;
use crate::native_module::{Argument, NativeModuleRegistry};
use crate::registry::RegistrationPhase;
use crate::types::{NativeModuleId, Qualifier, TaskFunctionId};

/// The shape of one native-module-call input argument, as observed in a
/// concrete execution graph (§4.6.1). Used to pick a compatible mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputShape {
    /// The argument has no value (never produced for real native module
    /// inputs, but task-function declared shapes may use it for symmetry).
    None,
    /// Fed by a constant node.
    Constant,
    /// Fed by another call's output that feeds more than one consumer.
    Variable,
    /// Fed by another call's output that feeds exactly one consumer (so the
    /// producing buffer can be reused in place, "branchless").
    BranchlessVariable,
}

impl InputShape {
    /// True if a mapping declaring `self` accepts a call argument whose
    /// observed shape is `actual` (§4.5 compatibility table).
    #[must_use]
    pub fn accepts(self, actual: InputShape) -> bool {
        match self {
            InputShape::None => actual == InputShape::None,
            InputShape::Constant => actual == InputShape::Constant,
            InputShape::Variable => matches!(actual, InputShape::Variable | InputShape::BranchlessVariable),
            InputShape::BranchlessVariable => actual == InputShape::BranchlessVariable,
        }
    }
}

/// One executable task function. Arguments reuse [`Argument`]'s
/// qualifier/type model; task functions additionally use
/// [`Qualifier::InOut`], which native modules never declare directly.
#[derive(Clone, Debug)]
pub struct TaskFunction {
    /// Fingerprint identifying this task function.
    pub uid: TaskFunctionId,
    /// Human-readable name used in diagnostics.
    pub display_name: String,
    /// Signature, in call-argument order.
    pub arguments: Vec<Argument>,
}

/// How one native-module argument (or an inout-paired input/output) maps to
/// a single task-function argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgSource {
    /// Maps directly to one native-module argument, by overall signature
    /// index.
    Single(usize),
    /// Maps an inout task-function argument to a paired native-module input
    /// and output, each by overall signature index.
    InOut {
        /// Overall index of the native-module input argument.
        input: usize,
        /// Overall index of the native-module output argument.
        output: usize,
    },
}

/// One candidate mapping from a native module's calls to a task function.
#[derive(Clone, Debug)]
pub struct TaskFunctionMapping {
    /// The task function this mapping targets.
    pub task_function: TaskFunctionId,
    /// Declared input shape, one entry per native-module input argument
    /// (dense, input-only order). A call's observed input shape vector must
    /// be accepted pointwise by this vector for the mapping to apply.
    pub input_shape: Vec<InputShape>,
    /// Per task-function argument (dense, in task-function signature
    /// order), which native-module argument(s) it corresponds to.
    pub arg_mapping: Vec<ArgSource>,
}

impl TaskFunctionMapping {
    /// Builds a new mapping. Validity (arity, type, and qualifier
    /// consistency with the owning native module and target task function)
    /// is checked at registration time, not here.
    #[must_use]
    pub fn new(task_function: TaskFunctionId, input_shape: Vec<InputShape>, arg_mapping: Vec<ArgSource>) -> Self {
        Self { task_function, input_shape, arg_mapping }
    }
}

/// Metadata for a registered task-function library.
#[derive(Clone, Debug)]
pub struct TaskFunctionLibrary {
    /// Library identifier, the first half of every [`TaskFunctionId`] it owns.
    pub id: u32,
    /// Human-readable library name.
    pub name: String,
    /// `(major, minor)` version.
    pub version: (u16, u16),
}

/// The process-lifetime catalog of task functions and native-module-to-task
/// -function mappings. Follows the same `Uninitialized -> Initialized ->
/// Registering -> Finalized` lifecycle as [`NativeModuleRegistry`].
#[derive(Default)]
pub struct TaskFunctionRegistry {
    phase: RegistrationPhase,
    libraries: HashMap<u32, TaskFunctionLibrary>,
    functions: HashMap<TaskFunctionId, TaskFunction>,
    mappings: HashMap<NativeModuleId, Vec<TaskFunctionMapping>>,
}

impl TaskFunctionRegistry {
    /// Creates an empty registry in the `Initialized` phase.
    #[must_use]
    pub fn new() -> Self {
        Self { phase: RegistrationPhase::Initialized, ..Self::default() }
    }

    /// Moves the registry into the `Registering` phase.
    pub fn begin_registration(&mut self) {
        self.phase = RegistrationPhase::Registering;
    }

    /// Finalizes registration.
    pub fn end_registration(&mut self) -> Result<(), RegistrationError> {
        self.phase = RegistrationPhase::Finalized;
        Ok(())
    }

    /// The registry's current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> RegistrationPhase {
        self.phase
    }

    /// Registers a task-function library.
    pub fn register_library(&mut self, id: u32, name: &str, version: (u16, u16)) -> Result<(), RegistrationError> {
        if !self.phase.accepts_mutation() {
            return Err(RegistrationError::UnknownLibrary { name: name.to_string(), library_id: id });
        }
        if self.libraries.contains_key(&id) {
            return Err(RegistrationError::UidCollision { name: name.to_string(), uid: format!("library:{id}") });
        }
        self.libraries.insert(id, TaskFunctionLibrary { id, name: name.to_string(), version });
        Ok(())
    }

    /// Registers a task function.
    pub fn register_task_function(&mut self, function: TaskFunction) -> Result<(), RegistrationError> {
        if !self.phase.accepts_mutation() {
            return Err(RegistrationError::UnknownLibrary {
                name: function.display_name.clone(),
                library_id: function.uid.library_id,
            });
        }
        if !self.libraries.contains_key(&function.uid.library_id) {
            return Err(RegistrationError::UnknownLibrary {
                name: function.display_name.clone(),
                library_id: function.uid.library_id,
            });
        }
        if self.functions.contains_key(&function.uid) {
            return Err(RegistrationError::UidCollision {
                name: function.display_name.clone(),
                uid: function.uid.to_string(),
            });
        }
        self.functions.insert(function.uid, function);
        Ok(())
    }

    /// Registers a mapping from `module_uid`'s calls to one of its candidate
    /// task functions, validating arity, type, and qualifier consistency
    /// against both the native module's signature (looked up in
    /// `native_modules`) and the target task function's signature.
    pub fn register_task_function_mapping(
        &mut self,
        native_modules: &NativeModuleRegistry,
        module_uid: NativeModuleId,
        mapping: TaskFunctionMapping,
    ) -> Result<(), RegistrationError> {
        if !self.phase.accepts_mutation() {
            return Err(RegistrationError::InvalidTaskFunctionMapping {
                module: module_uid,
                reason: "registry is not in the Registering phase".to_string(),
            });
        }
        let module = native_modules.get(module_uid).ok_or(RegistrationError::InvalidTaskFunctionMapping {
            module: module_uid,
            reason: "native module is not registered".to_string(),
        })?;
        let task_function =
            self.functions.get(&mapping.task_function).ok_or(RegistrationError::InvalidTaskFunctionMapping {
                module: module_uid,
                reason: format!("task function {} is not registered", mapping.task_function),
            })?;

        validate_mapping(module_uid, module, task_function, &mapping)
            .map_err(|reason| RegistrationError::InvalidTaskFunctionMapping { module: module_uid, reason })?;

        self.mappings.entry(module_uid).or_default().push(mapping);
        Ok(())
    }

    /// Looks up a task function by uid.
    #[must_use]
    pub fn get_task_function(&self, uid: TaskFunctionId) -> Option<&TaskFunction> {
        self.functions.get(&uid)
    }

    /// Scans `module_uid`'s registered mappings in registration order and
    /// returns the first whose declared input shape accepts `inputs`
    /// pointwise, together with the task function it targets.
    #[must_use]
    pub fn pick_mapping(
        &self,
        module_uid: NativeModuleId,
        inputs: &[InputShape],
    ) -> Option<(&TaskFunctionMapping, &TaskFunction)> {
        let candidates = self.mappings.get(&module_uid)?;
        let mapping = candidates.iter().find(|m| {
            m.input_shape.len() == inputs.len() && m.input_shape.iter().zip(inputs).all(|(d, a)| d.accepts(*a))
        })?;
        let task_function = self.functions.get(&mapping.task_function)?;
        Some((mapping, task_function))
    }

    /// Total number of registered task functions.
    #[must_use]
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Total number of registered mappings, across all native modules.
    #[must_use]
    pub fn mapping_count(&self) -> usize {
        self.mappings.values().map(Vec::len).sum()
    }
}

fn validate_mapping(
    module_uid: NativeModuleId,
    module: &crate::native_module::NativeModule,
    task_function: &TaskFunction,
    mapping: &TaskFunctionMapping,
) -> Result<(), String> {
    let input_count = module.input_indices().count();
    if mapping.input_shape.len() != input_count {
        return Err(format!(
            "input_shape has {} entries, expected {input_count} (one per native-module input)",
            mapping.input_shape.len()
        ));
    }
    if mapping.arg_mapping.len() != task_function.arguments.len() {
        return Err(format!(
            "arg_mapping has {} entries, expected {} (one per task-function argument)",
            mapping.arg_mapping.len(),
            task_function.arguments.len()
        ));
    }

    let mut used_native_args = HashSet::new();
    for source in &mapping.arg_mapping {
        let indices: Vec<usize> = match source {
            ArgSource::Single(i) => vec![*i],
            ArgSource::InOut { input, output } => {
                if *input == *output {
                    return Err("inout mapping cannot pair an argument with itself".to_string());
                }
                vec![*input, *output]
            }
        };
        for &i in &indices {
            if i >= module.arguments.len() {
                return Err(format!("native-module argument index {i} is out of range for {module_uid}"));
            }
            if !used_native_args.insert(i) {
                return Err(format!("native-module argument {i} is mapped more than once"));
            }
        }
    }

    for (task_idx, source) in mapping.arg_mapping.iter().enumerate() {
        let task_arg = &task_function.arguments[task_idx];
        match *source {
            ArgSource::Single(native_idx) => {
                let native_arg = &module.arguments[native_idx];
                let compatible_qualifier = match task_arg.qualifier {
                    Qualifier::In => matches!(native_arg.qualifier, Qualifier::In | Qualifier::Constant),
                    Qualifier::Out => native_arg.qualifier == Qualifier::Out,
                    Qualifier::Constant | Qualifier::InOut => false,
                };
                if !compatible_qualifier {
                    return Err(format!(
                        "task argument {task_idx} ({:?}) cannot map directly to native argument {native_idx} ({:?})",
                        task_arg.qualifier, native_arg.qualifier
                    ));
                }
                if task_arg.data_type != native_arg.data_type {
                    return Err(format!(
                        "task argument {task_idx} has type {} but native argument {native_idx} has type {}",
                        task_arg.data_type, native_arg.data_type
                    ));
                }
            }
            ArgSource::InOut { input, output } => {
                if task_arg.qualifier != Qualifier::InOut {
                    return Err(format!(
                        "task argument {task_idx} is paired with a native inout, but is not declared InOut"
                    ));
                }
                let native_input = &module.arguments[input];
                let native_output = &module.arguments[output];
                if native_input.qualifier != Qualifier::In {
                    return Err(format!("inout pairing's input argument {input} is not an In argument"));
                }
                if native_output.qualifier != Qualifier::Out {
                    return Err(format!("inout pairing's output argument {output} is not an Out argument"));
                }
                if native_input.data_type != native_output.data_type || native_input.data_type != task_arg.data_type {
                    return Err(format!(
                        "inout pairing's types disagree: task={}, in={}, out={}",
                        task_arg.data_type, native_input.data_type, native_output.data_type
                    ));
                }
            }
        }
    }

    Ok(())
}
