//! Error types for registration, optimization, and task graph construction.

use thiserror::Error;

use crate::types::NativeModuleId;

/// Errors raised while populating a [`crate::native_module::NativeModuleRegistry`]
/// or [`crate::task_function::TaskFunctionRegistry`].
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Two native modules (or task functions) were registered under the same uid.
    #[error("uid collision registering '{name}': {uid} is already registered")]
    UidCollision {
        /// Display name of the module/function that could not be registered.
        name: String,
        /// The uid that collided, formatted as `library:item`.
        uid: String,
    },

    /// A module or rule referenced a library id that was never registered.
    #[error("unknown library {library_id} referenced by '{name}'")]
    UnknownLibrary {
        /// Display name of the thing referencing the missing library.
        name: String,
        /// The library id that was not found.
        library_id: u32,
    },

    /// An operator was bound to more than one native module.
    #[error("operator '{operator}' is already bound to a different native module")]
    DuplicateOperatorBinding {
        /// The operator token, e.g. `+`.
        operator: String,
    },

    /// A rule's source pattern has a module root with more than one output port.
    #[error("optimization rule for {module} is invalid: rule roots must have exactly one output")]
    InvalidRuleRoot {
        /// The native module the rule was registered against.
        module: NativeModuleId,
    },

    /// A task function mapping's argument mapping is inconsistent with its
    /// native module's or task function's signature.
    #[error("invalid task function mapping for {module}: {reason}")]
    InvalidTaskFunctionMapping {
        /// The native module the mapping was registered against.
        module: NativeModuleId,
        /// Human-readable description of what is wrong with the mapping.
        reason: String,
    },

    /// Several registration errors accumulated during `end_registration()`.
    #[error("{0} registration errors occurred")]
    Multiple(Vec<RegistrationError>),
}

impl RegistrationError {
    /// Builds a [`RegistrationError::Multiple`] from a non-empty list of errors,
    /// or returns the single error directly if there is only one.
    #[must_use]
    pub fn aggregate(mut errors: Vec<RegistrationError>) -> Option<RegistrationError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(RegistrationError::Multiple(errors)),
        }
    }
}

/// Errors raised by [`crate::optimizer::optimize`].
#[derive(Debug, Error)]
pub enum GraphError {
    /// After optimization, an argument declared `Constant` is fed by a
    /// non-constant node.
    #[error("argument {arg_index} of {module} must be constant but is not")]
    NonConstantInput {
        /// The native module whose argument is violated.
        module: NativeModuleId,
        /// Index of the offending argument.
        arg_index: usize,
    },

    /// A debug-only invariant was violated: a rule's target pattern
    /// referenced a capture slot that the source pattern never bound. Also
    /// raised (in release builds too) when the optimizer's fixpoint loop
    /// exceeds [`crate::config::GraphDslConfig::max_optimizer_iterations`].
    #[error("optimizer invariant violated: {0}")]
    OptimizerInvariantViolation(String),

    /// Several constant-qualifier violations accumulated across the graph.
    #[error("{0} constant-qualifier violations found")]
    Multiple(Vec<GraphError>),
}

impl GraphError {
    /// Builds a [`GraphError::Multiple`] from a non-empty list of errors, or
    /// returns `None` if the list is empty.
    #[must_use]
    pub fn aggregate(mut errors: Vec<GraphError>) -> Option<GraphError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(GraphError::Multiple(errors)),
        }
    }
}

/// Raised when [`crate::task_function::TaskFunctionRegistry::pick_mapping`]
/// cannot find a task function mapping compatible with a call's input shape.
#[derive(Debug, Error)]
#[error("no task function mapping matches the input shape of {module} ('{display_name}')")]
pub struct NoTaskMappingError {
    /// The native module whose call could not be mapped.
    pub module: NativeModuleId,
    /// Display name of the native module, for diagnostics.
    pub display_name: String,
}

/// Errors raised by [`crate::task_graph::build_task_graph`].
#[derive(Debug, Error)]
pub enum BuildError {
    /// A native-module-call node had no compatible task function mapping.
    #[error(transparent)]
    NoTaskMapping(#[from] NoTaskMappingError),

    /// The execution graph violated an invariant the builder assumes holds
    /// (it should have been rejected by the optimizer or the front-end).
    #[error("execution graph is malformed: {0}")]
    MalformedGraph(String),
}
