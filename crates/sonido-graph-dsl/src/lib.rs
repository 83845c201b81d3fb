//! Sonido Graph DSL - offline dataflow graph compiler core
//!
//! This crate compiles a dataflow program — a graph of native-module calls,
//! constants, and outputs — down to a scheduled task graph a realtime
//! runtime can execute. It does no scheduling or execution itself; its job
//! ends once a [`TaskGraph`] exists.
//!
//! # Pipeline
//!
//! 1. Build an [`ExecutionGraph`] (§3): wire up native-module-call nodes,
//!    constant nodes, and output sinks via [`ExecutionGraph::add_edge`].
//! 2. Run [`optimize`] against a [`NativeModuleRegistry`]: folds
//!    compile-time-constant subgraphs, rewrites via registered
//!    [`OptimizationRule`]s, sweeps dead nodes, deduplicates, and validates
//!    every `constant`-qualified input actually resolved to a constant.
//! 3. Run [`build_task_graph`] against both registries to lower the
//!    optimized graph into a [`TaskGraph`]: one [`Task`] per surviving call,
//!    shared buffers honoring `inout` aliasing, successor/predecessor edges,
//!    and greedy concurrency estimates for sizing worker and buffer pools.
//!
//! # Registration
//!
//! [`NativeModuleRegistry`] and [`TaskFunctionRegistry`] are populated once
//! at process startup, via `begin_registration()` / `register_*` /
//! `end_registration()`, and are read-only afterward. A [`TaskFunctionMapping`]
//! links a native module to one of its possible task-function lowerings,
//! keyed by the call's observed [`InputShape`].
//!
//! # Configuration
//!
//! [`GraphDslConfig`] carries the handful of compiler knobs (currently just
//! the optimizer's fixpoint iteration cap) and loads from TOML via
//! [`GraphDslConfig::from_file`].

pub mod config;
pub mod constant_eval;
pub mod error;
pub mod graph;
pub mod native_module;
pub mod pattern;
pub mod predecessor;
pub mod registry;
pub mod optimizer;
pub mod task_function;
pub mod task_graph;
pub mod types;

pub use config::{GraphDslConfig, GraphDslConfigError};
pub use constant_eval::ConstantEvaluator;
pub use error::{BuildError, GraphError, NoTaskMappingError, RegistrationError};
pub use graph::{ConstantValue, EdgeId, ExecutionGraph, GraphEditError, NodeId, NodeKind};
pub use native_module::{
    Argument, CompileTimeEval, NativeModule, NativeModuleLibrary, NativeModuleRegistry, MAX_NATIVE_MODULE_ARGUMENTS,
};
pub use optimizer::optimize;
pub use pattern::{OptimizationRule, PatternBuilder, PatternSymbol, MAX_CAPTURE_SLOTS};
pub use predecessor::{estimate_max_concurrency, resolve as resolve_predecessors, PredecessorMatrix};
pub use registry::RegistrationPhase;
pub use task_function::{
    ArgSource, InputShape, TaskFunction, TaskFunctionLibrary, TaskFunctionMapping, TaskFunctionRegistry,
};
pub use task_graph::{
    build_task_graph, ArrayElement, BufferId, OutputValue, Task, TaskArg, TaskArgValue, TaskGraph, TaskId,
};
pub use types::{DataType, NativeModuleId, Primitive, Qualifier, TaskFunctionId, Value};
