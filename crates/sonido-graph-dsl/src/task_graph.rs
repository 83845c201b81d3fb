//! The task graph builder: lowers a finalized execution graph into a
//! scheduled, buffer-packed plan the runtime can execute (§4.6). Picks a
//! task function per call, packs dataflow edges into a minimal set of
//! shared buffers honoring `inout` aliasing, computes successor/predecessor
//! edges, and estimates upper bounds on concurrent tasks and buffers.

use std::collections::{HashMap, HashSet};

use crate::error::{BuildError, NoTaskMappingError};
use crate::graph::{ConstantValue, ExecutionGraph, NodeId, NodeKind};
use crate::native_module::NativeModuleRegistry;
use crate::predecessor;
use crate::task_function::{ArgSource, InputShape, TaskFunctionRegistry};
use crate::types::{DataType, Primitive, Qualifier, TaskFunctionId, Value};

/// Dense identifier of a task in a [`TaskGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(usize);

impl TaskId {
    /// Returns the raw index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Dense identifier of a shared buffer in a [`TaskGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferId(usize);

impl BufferId {
    /// Returns the raw index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One element of an array-typed task argument.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayElement {
    /// A compile-time constant element.
    Immediate(Value),
    /// An element fed by a shared buffer.
    Buffer(BufferId),
}

/// The resolved value of a task argument, after buffer allocation.
#[derive(Clone, Debug, PartialEq)]
pub enum TaskArgValue {
    /// A compile-time constant value, inlined.
    Immediate(Value),
    /// A value read from (and, for `inout` args, overwritten into) a shared
    /// buffer.
    Buffer(BufferId),
    /// An array argument, element-wise resolved.
    Array(Vec<ArrayElement>),
    /// A string constant, interned into [`TaskGraph::strings`].
    StringOffset(usize),
}

/// One argument of an emitted [`Task`].
#[derive(Clone, Debug)]
pub struct TaskArg {
    /// The task function argument's qualifier (`in`, `out`, or `inout`).
    pub qualifier: Qualifier,
    /// The task function argument's declared type.
    pub data_type: DataType,
    /// The resolved value.
    pub value: TaskArgValue,
}

/// One emitted unit of runtime work.
#[derive(Clone, Debug)]
pub struct Task {
    /// The task function to invoke.
    pub task_function: TaskFunctionId,
    /// Arguments, in task-function signature order.
    pub arguments: Vec<TaskArg>,
    /// Number of other tasks that must run before this one.
    pub predecessor_count: u32,
    /// Tasks that become one step closer to runnable once this one finishes.
    pub successors: Vec<TaskId>,
}

/// The resolved value of one graph output.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputValue {
    /// The output is a compile-time constant.
    Immediate(Value),
    /// The output reads a shared buffer.
    Buffer(BufferId),
}

/// The scheduled, buffer-packed lowering of an [`ExecutionGraph`], ready for
/// the runtime scheduler. Immutable once built.
#[derive(Clone, Debug)]
pub struct TaskGraph {
    /// Every emitted task, in build order (stable across identical inputs).
    pub tasks: Vec<Task>,
    /// Total number of distinct shared buffers allocated.
    pub buffer_count: usize,
    /// Per-buffer reference count: task-argument uses plus graph-output uses.
    pub buffer_use_counts: Vec<u32>,
    /// Tasks with no buffer-valued input argument; the runtime's starting
    /// frontier.
    pub initial_tasks: Vec<TaskId>,
    /// Graph outputs, in output-index order.
    pub outputs: Vec<OutputValue>,
    /// Interned string constants; [`TaskArgValue::StringOffset`] indexes here.
    pub strings: Vec<String>,
    /// Greedy upper bound on the number of tasks that may run concurrently.
    pub max_concurrent_tasks: u32,
    /// Greedy upper bound on the number of buffers that must be live at once.
    pub max_concurrent_buffers: u32,
}

enum RawArrayElement {
    Immediate(Value),
    Node(NodeId),
}

enum RawValue {
    Immediate(Value),
    Node(NodeId),
    Array(Vec<RawArrayElement>),
}

struct RawArg {
    qualifier: Qualifier,
    data_type: DataType,
    value: RawValue,
}

struct RawTask {
    task_function: TaskFunctionId,
    arguments: Vec<RawArg>,
}

fn read_scalar_constant(graph: &ExecutionGraph, node: NodeId) -> Value {
    match graph.node_kind(node) {
        NodeKind::Constant(ConstantValue::Real(v)) => Value::Real(*v),
        NodeKind::Constant(ConstantValue::Bool(v)) => Value::Bool(*v),
        NodeKind::Constant(ConstantValue::String(v)) => Value::String(v.clone()),
        other => panic!("expected a scalar constant, found {other:?}"),
    }
}

/// §4.6.1 step 1: constants classify as `Constant`; a non-constant producer's
/// shape depends on how many consumers its output port has.
fn classify_shape(graph: &ExecutionGraph, source: NodeId) -> InputShape {
    if graph.is_constant(source) {
        InputShape::Constant
    } else if graph.outgoing_count(source) == 1 {
        InputShape::BranchlessVariable
    } else {
        InputShape::Variable
    }
}

fn build_value(graph: &ExecutionGraph, producer: NodeId, data_type: DataType) -> RawValue {
    if data_type.is_array() {
        let elements = graph
            .array_element_sources(producer)
            .map(|element| {
                if graph.is_constant(element) {
                    RawArrayElement::Immediate(read_scalar_constant(graph, element))
                } else {
                    RawArrayElement::Node(element)
                }
            })
            .collect();
        RawValue::Array(elements)
    } else if graph.is_constant(producer) {
        RawValue::Immediate(read_scalar_constant(graph, producer))
    } else {
        RawValue::Node(producer)
    }
}

/// Walks from a call's output port to the calls it feeds, hopping through
/// array-constant containers (which are not tasks themselves) rather than
/// stopping at them.
fn successor_calls(graph: &ExecutionGraph, port: NodeId) -> Vec<NodeId> {
    let mut result = Vec::new();
    let mut stack = vec![port];
    while let Some(node) = stack.pop() {
        for &edge in graph.outgoing_edges(node) {
            let target = graph.edge_to(edge);
            match graph.node_kind(target) {
                NodeKind::IndexedInput { call, .. } => result.push(*call),
                NodeKind::Constant(ConstantValue::Array) => stack.push(target),
                _ => {}
            }
        }
    }
    result
}

fn intern_node(node_index: &mut HashMap<NodeId, usize>, node: NodeId) -> usize {
    let next = node_index.len();
    *node_index.entry(node).or_insert(next)
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

fn mark_concurrent(grid: &mut [Vec<bool>], a: usize, b: usize) {
    grid[a][b] = true;
    grid[b][a] = true;
}

/// Builds a [`TaskGraph`] from a finalized execution graph (§4.6). The graph
/// should already have been run through [`crate::optimizer::optimize`];
/// nothing here re-checks constant-qualifier validity.
pub fn build_task_graph(
    graph: &ExecutionGraph,
    native_modules: &NativeModuleRegistry,
    task_functions: &TaskFunctionRegistry,
) -> Result<TaskGraph, BuildError> {
    let _span = tracing::info_span!("task_graph_build").entered();

    let calls: Vec<NodeId> =
        graph.live_node_ids().filter(|&n| matches!(graph.node_kind(n), NodeKind::NativeModuleCall(_))).collect();

    let mut task_of_call: HashMap<NodeId, TaskId> = HashMap::with_capacity(calls.len());
    for (index, &call) in calls.iter().enumerate() {
        task_of_call.insert(call, TaskId(index));
    }

    let mut raw_tasks = Vec::with_capacity(calls.len());
    let mut inout_pairs: Vec<(NodeId, NodeId)> = Vec::new();

    for &call in &calls {
        let uid = graph.module_uid(call);
        let module = native_modules
            .get(uid)
            .ok_or_else(|| BuildError::MalformedGraph(format!("call references unregistered module {uid}")))?;

        let input_overall: Vec<usize> = module.input_indices().collect();
        let output_overall: Vec<usize> = module.output_indices().collect();

        let input_sources: Vec<NodeId> =
            (0..input_overall.len()).map(|dense| graph.call_input_source(call, dense)).collect();
        let output_ports: Vec<NodeId> =
            (0..output_overall.len()).map(|dense| graph.call_output_port(call, dense)).collect();

        let overall_to_input_source: HashMap<usize, NodeId> =
            input_overall.iter().copied().zip(input_sources.iter().copied()).collect();
        let overall_to_output_port: HashMap<usize, NodeId> =
            output_overall.iter().copied().zip(output_ports.iter().copied()).collect();

        let input_shape: Vec<InputShape> = input_sources.iter().map(|&source| classify_shape(graph, source)).collect();

        let Some((mapping, task_function)) = task_functions.pick_mapping(uid, &input_shape) else {
            tracing::warn!(module = %uid, "no task function mapping matches the call's input shape");
            return Err(BuildError::NoTaskMapping(NoTaskMappingError {
                module: uid,
                display_name: module.display_name.clone(),
            }));
        };

        let mut arguments = Vec::with_capacity(mapping.arg_mapping.len());
        for (task_idx, source) in mapping.arg_mapping.iter().enumerate() {
            let task_arg = &task_function.arguments[task_idx];
            let value = match *source {
                ArgSource::Single(native_idx) => {
                    let native_arg = &module.arguments[native_idx];
                    if native_arg.is_input() {
                        build_value(graph, overall_to_input_source[&native_idx], task_arg.data_type)
                    } else {
                        RawValue::Node(overall_to_output_port[&native_idx])
                    }
                }
                ArgSource::InOut { input, output } => {
                    let producer = overall_to_input_source[&input];
                    let output_port = overall_to_output_port[&output];
                    inout_pairs.push((producer, output_port));
                    RawValue::Node(output_port)
                }
            };
            arguments.push(RawArg { qualifier: task_arg.qualifier, data_type: task_arg.data_type, value });
        }

        raw_tasks.push(RawTask { task_function: task_function.uid, arguments });
    }
    tracing::debug!(task_count = raw_tasks.len(), "task selection complete");

    let outputs_sorted: Vec<NodeId> = {
        let mut nodes: Vec<NodeId> =
            graph.live_node_ids().filter(|&n| matches!(graph.node_kind(n), NodeKind::Output { .. })).collect();
        nodes.sort_by_key(|&n| match graph.node_kind(n) {
            NodeKind::Output { output_index } => *output_index,
            _ => unreachable!(),
        });
        nodes
    };

    // §4.6.2: intern every buffer-valued node reference, then union the
    // inout pairs so a producer and its in-place consumer share one id.
    let mut node_index: HashMap<NodeId, usize> = HashMap::new();
    for task in &raw_tasks {
        for arg in &task.arguments {
            match &arg.value {
                RawValue::Node(n) => {
                    intern_node(&mut node_index, *n);
                }
                RawValue::Array(elements) => {
                    for element in elements {
                        if let RawArrayElement::Node(n) = element {
                            intern_node(&mut node_index, *n);
                        }
                    }
                }
                RawValue::Immediate(_) => {}
            }
        }
    }
    let mut output_producers = Vec::with_capacity(outputs_sorted.len());
    for &output_node in &outputs_sorted {
        let producer = graph.nth_incoming_source(output_node, 0);
        if !graph.is_constant(producer) {
            intern_node(&mut node_index, producer);
        }
        output_producers.push(producer);
    }
    for &(a, b) in &inout_pairs {
        intern_node(&mut node_index, a);
        intern_node(&mut node_index, b);
    }

    let mut dsu = DisjointSet::new(node_index.len());
    for &(a, b) in &inout_pairs {
        dsu.union(node_index[&a], node_index[&b]);
    }

    let mut root_to_buffer: HashMap<usize, usize> = HashMap::new();
    let mut buffer_of_index = vec![0usize; node_index.len()];
    for i in 0..node_index.len() {
        let root = dsu.find(i);
        let next = root_to_buffer.len();
        let buffer = *root_to_buffer.entry(root).or_insert(next);
        buffer_of_index[i] = buffer;
    }
    let buffer_count = root_to_buffer.len();
    let buffer_for = |node: NodeId| BufferId(buffer_of_index[node_index[&node]]);
    tracing::debug!(buffer_count, "buffer allocation complete");

    let mut strings: Vec<String> = Vec::new();
    let mut string_index: HashMap<String, usize> = HashMap::new();

    let mut tasks = Vec::with_capacity(raw_tasks.len());
    for raw in raw_tasks {
        let mut arguments = Vec::with_capacity(raw.arguments.len());
        for arg in raw.arguments {
            let value = match arg.value {
                RawValue::Immediate(Value::String(s)) => {
                    let next = strings.len();
                    let offset = *string_index.entry(s.clone()).or_insert_with(|| {
                        strings.push(s);
                        next
                    });
                    TaskArgValue::StringOffset(offset)
                }
                RawValue::Immediate(v) => TaskArgValue::Immediate(v),
                RawValue::Node(n) => TaskArgValue::Buffer(buffer_for(n)),
                RawValue::Array(elements) => TaskArgValue::Array(
                    elements
                        .into_iter()
                        .map(|element| match element {
                            RawArrayElement::Immediate(v) => ArrayElement::Immediate(v),
                            RawArrayElement::Node(n) => ArrayElement::Buffer(buffer_for(n)),
                        })
                        .collect(),
                ),
            };
            arguments.push(TaskArg { qualifier: arg.qualifier, data_type: arg.data_type, value });
        }
        tasks.push(Task { task_function: raw.task_function, arguments, predecessor_count: 0, successors: Vec::new() });
    }

    let outputs: Vec<OutputValue> = output_producers
        .iter()
        .map(|&producer| {
            if graph.is_constant(producer) {
                OutputValue::Immediate(read_scalar_constant(graph, producer))
            } else {
                OutputValue::Buffer(buffer_for(producer))
            }
        })
        .collect();

    // §4.6.3: successor edges, deduplicated per source task.
    for (i, &call) in calls.iter().enumerate() {
        let mut seen = HashSet::new();
        let mut successors = Vec::new();
        for &edge in graph.outgoing_edges(call) {
            let port = graph.edge_to(edge);
            for consumer_call in successor_calls(graph, port) {
                if let Some(&task_id) = task_of_call.get(&consumer_call) {
                    if seen.insert(task_id) {
                        successors.push(task_id);
                    }
                }
            }
        }
        for &successor in &successors {
            tasks[successor.index()].predecessor_count += 1;
        }
        tasks[i].successors = successors;
    }

    let initial_tasks: Vec<TaskId> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| {
            !task.arguments.iter().any(|arg| {
                arg.qualifier != Qualifier::Out
                    && match &arg.value {
                        TaskArgValue::Buffer(_) => true,
                        TaskArgValue::Array(elements) => elements.iter().any(|e| matches!(e, ArrayElement::Buffer(_))),
                        _ => false,
                    }
            })
        })
        .map(|(i, _)| TaskId(i))
        .collect();

    // §4.6.4: concurrency estimates.
    let successors_by_index: Vec<Vec<usize>> =
        tasks.iter().map(|t| t.successors.iter().map(TaskId::index).collect()).collect();
    let predecessor_matrix = predecessor::resolve(tasks.len(), &successors_by_index);
    let max_concurrent_tasks =
        predecessor::estimate_max_concurrency(tasks.len(), |a, b| predecessor_matrix.concurrent(a, b)) as u32;

    let task_buffers: Vec<Vec<usize>> = tasks
        .iter()
        .map(|t| {
            let mut set = HashSet::new();
            for arg in &t.arguments {
                match &arg.value {
                    TaskArgValue::Buffer(b) => {
                        set.insert(b.index());
                    }
                    TaskArgValue::Array(elements) => {
                        for e in elements {
                            if let ArrayElement::Buffer(b) = e {
                                set.insert(b.index());
                            }
                        }
                    }
                    _ => {}
                }
            }
            set.into_iter().collect()
        })
        .collect();

    let mut buffer_concurrent = vec![vec![false; buffer_count]; buffer_count];
    for buffers in &task_buffers {
        for i in 0..buffers.len() {
            for j in (i + 1)..buffers.len() {
                mark_concurrent(&mut buffer_concurrent, buffers[i], buffers[j]);
            }
        }
    }
    for a in 0..tasks.len() {
        for b in (a + 1)..tasks.len() {
            if predecessor_matrix.concurrent(a, b) {
                for &ba in &task_buffers[a] {
                    for &bb in &task_buffers[b] {
                        mark_concurrent(&mut buffer_concurrent, ba, bb);
                    }
                }
            }
        }
    }
    let output_buffers: Vec<usize> =
        outputs.iter().filter_map(|o| if let OutputValue::Buffer(b) = o { Some(b.index()) } else { None }).collect();
    for i in 0..output_buffers.len() {
        for j in (i + 1)..output_buffers.len() {
            mark_concurrent(&mut buffer_concurrent, output_buffers[i], output_buffers[j]);
        }
    }
    let max_concurrent_buffers =
        predecessor::estimate_max_concurrency(buffer_count, |a, b| buffer_concurrent[a][b]) as u32;

    // §4.6.5: buffer use counts.
    let mut buffer_use_counts = vec![0u32; buffer_count];
    for task in &tasks {
        for arg in &task.arguments {
            match &arg.value {
                TaskArgValue::Buffer(b) => buffer_use_counts[b.index()] += 1,
                TaskArgValue::Array(elements) => {
                    for e in elements {
                        if let ArrayElement::Buffer(b) = e {
                            buffer_use_counts[b.index()] += 1;
                        }
                    }
                }
                _ => {}
            }
        }
    }
    for output in &outputs {
        if let OutputValue::Buffer(b) = output {
            buffer_use_counts[b.index()] += 1;
        }
    }

    tracing::info!(
        tasks = tasks.len(),
        buffer_count,
        max_concurrent_tasks,
        max_concurrent_buffers,
        "task graph build complete"
    );

    Ok(TaskGraph {
        tasks,
        buffer_count,
        buffer_use_counts,
        initial_tasks,
        outputs,
        strings,
        max_concurrent_tasks,
        max_concurrent_buffers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native_module::{Argument, NativeModule, NativeModuleRegistry};
    use crate::task_function::{TaskFunction, TaskFunctionMapping};
    use crate::types::{NativeModuleId, Qualifier};

    fn parameter_module(uid: NativeModuleId) -> NativeModule {
        NativeModule {
            uid,
            display_name: "parameter".to_string(),
            arguments: vec![Argument::output(DataType::scalar(Primitive::Real), true)],
            compile_time_eval: None,
        }
    }

    fn negation_module(uid: NativeModuleId) -> NativeModule {
        NativeModule {
            uid,
            display_name: "negation".to_string(),
            arguments: vec![
                Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
                Argument::output(DataType::scalar(Primitive::Real), true),
            ],
            compile_time_eval: None,
        }
    }

    fn multiplication_by_constant_module(uid: NativeModuleId) -> NativeModule {
        NativeModule {
            uid,
            display_name: "multiplication".to_string(),
            arguments: vec![
                Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
                Argument::input(Qualifier::Constant, DataType::scalar(Primitive::Real)),
                Argument::output(DataType::scalar(Primitive::Real), true),
            ],
            compile_time_eval: None,
        }
    }

    fn combine_module(uid: NativeModuleId) -> NativeModule {
        NativeModule {
            uid,
            display_name: "combine".to_string(),
            arguments: vec![
                Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
                Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
                Argument::output(DataType::scalar(Primitive::Real), true),
            ],
            compile_time_eval: None,
        }
    }

    fn single_in_single_out_task_function(uid: TaskFunctionId) -> TaskFunction {
        TaskFunction {
            uid,
            display_name: format!("{uid}"),
            arguments: vec![
                Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
                Argument::output(DataType::scalar(Primitive::Real), true),
            ],
        }
    }

    #[test]
    fn builds_a_single_task_chain() {
        let mut graph = ExecutionGraph::new();
        let mut native = NativeModuleRegistry::new();
        native.begin_registration();
        native.register_library(0, "core", (1, 0)).unwrap();
        let param_uid = NativeModuleId::new(0, 0);
        let neg_uid = NativeModuleId::new(0, 1);
        native.register_native_module(parameter_module(param_uid)).unwrap();
        native.register_native_module(negation_module(neg_uid)).unwrap();
        native.end_registration().unwrap();

        let mut tasks = TaskFunctionRegistry::new();
        tasks.begin_registration();
        tasks.register_library(0, "core", (1, 0)).unwrap();
        let param_tf = TaskFunctionId::new(0, 0);
        let neg_tf = TaskFunctionId::new(0, 1);
        tasks
            .register_task_function(TaskFunction {
                uid: param_tf,
                display_name: "task_parameter".to_string(),
                arguments: vec![Argument::output(DataType::scalar(Primitive::Real), true)],
            })
            .unwrap();
        tasks.register_task_function(single_in_single_out_task_function(neg_tf)).unwrap();
        tasks
            .register_task_function_mapping(
                &native,
                param_uid,
                TaskFunctionMapping::new(param_tf, vec![], vec![ArgSource::Single(0)]),
            )
            .unwrap();
        tasks
            .register_task_function_mapping(
                &native,
                neg_uid,
                TaskFunctionMapping::new(neg_tf, vec![InputShape::BranchlessVariable], vec![
                    ArgSource::Single(0),
                    ArgSource::Single(1),
                ]),
            )
            .unwrap();
        tasks.end_registration().unwrap();

        let param_call = graph.create_native_module_call(native.get(param_uid).unwrap());
        let neg_call = graph.create_native_module_call(native.get(neg_uid).unwrap());
        graph.add_edge(graph.call_output_port(param_call, 0), graph.call_input_port(neg_call, 0)).unwrap();
        let output = graph.create_output(0);
        graph.add_edge(graph.call_output_port(neg_call, 0), output).unwrap();

        let built = build_task_graph(&graph, &native, &tasks).unwrap();

        assert_eq!(built.tasks.len(), 2);
        assert_eq!(built.initial_tasks.len(), 1);
        assert_eq!(built.tasks[built.initial_tasks[0].index()].task_function, param_tf);
        assert_eq!(built.tasks[0].successors.len(), 1);
        assert_eq!(built.tasks[1].predecessor_count, 1);
        assert!(matches!(built.outputs.as_slice(), [OutputValue::Buffer(_)]));
    }

    #[test]
    fn inout_mapping_shares_one_buffer() {
        let mut graph = ExecutionGraph::new();
        let mut native = NativeModuleRegistry::new();
        native.begin_registration();
        native.register_library(0, "core", (1, 0)).unwrap();
        let param_uid = NativeModuleId::new(0, 0);
        let mul_uid = NativeModuleId::new(0, 1);
        native.register_native_module(parameter_module(param_uid)).unwrap();
        native.register_native_module(multiplication_by_constant_module(mul_uid)).unwrap();
        native.end_registration().unwrap();

        let mut tasks = TaskFunctionRegistry::new();
        tasks.begin_registration();
        tasks.register_library(0, "core", (1, 0)).unwrap();
        let param_tf = TaskFunctionId::new(0, 0);
        let mul_tf = TaskFunctionId::new(0, 1);
        tasks
            .register_task_function(TaskFunction {
                uid: param_tf,
                display_name: "task_parameter".to_string(),
                arguments: vec![Argument::output(DataType::scalar(Primitive::Real), true)],
            })
            .unwrap();
        tasks
            .register_task_function(TaskFunction {
                uid: mul_tf,
                display_name: "task_multiply_inplace".to_string(),
                arguments: vec![
                    Argument { qualifier: Qualifier::InOut, data_type: DataType::scalar(Primitive::Real), is_return: false },
                    Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
                ],
            })
            .unwrap();
        tasks
            .register_task_function_mapping(
                &native,
                param_uid,
                TaskFunctionMapping::new(param_tf, vec![], vec![ArgSource::Single(0)]),
            )
            .unwrap();
        tasks
            .register_task_function_mapping(
                &native,
                mul_uid,
                TaskFunctionMapping::new(
                    mul_tf,
                    vec![InputShape::BranchlessVariable, InputShape::Constant],
                    vec![ArgSource::InOut { input: 0, output: 2 }, ArgSource::Single(1)],
                ),
            )
            .unwrap();
        tasks.end_registration().unwrap();

        let param_call = graph.create_native_module_call(native.get(param_uid).unwrap());
        let mul_call = graph.create_native_module_call(native.get(mul_uid).unwrap());
        graph.add_edge(graph.call_output_port(param_call, 0), graph.call_input_port(mul_call, 0)).unwrap();
        let two = graph.create_constant_real(2.0);
        graph.add_edge(two, graph.call_input_port(mul_call, 1)).unwrap();
        let output = graph.create_output(0);
        graph.add_edge(graph.call_output_port(mul_call, 0), output).unwrap();

        let built = build_task_graph(&graph, &native, &tasks).unwrap();

        assert_eq!(built.buffer_count, 1);
        let mul_task = &built.tasks[1];
        assert!(matches!(mul_task.arguments[0].value, TaskArgValue::Buffer(BufferId(0))));
        assert!(matches!(mul_task.arguments[1].value, TaskArgValue::Immediate(Value::Real(v)) if v == 2.0));
    }

    #[test]
    fn diamond_graph_concurrency_is_two() {
        let mut graph = ExecutionGraph::new();
        let mut native = NativeModuleRegistry::new();
        native.begin_registration();
        native.register_library(0, "core", (1, 0)).unwrap();
        let source_uid = NativeModuleId::new(0, 0);
        let identity_uid = NativeModuleId::new(0, 1);
        let combine_uid = NativeModuleId::new(0, 2);
        native.register_native_module(parameter_module(source_uid)).unwrap();
        native.register_native_module(negation_module(identity_uid)).unwrap();
        native.register_native_module(combine_module(combine_uid)).unwrap();
        native.end_registration().unwrap();

        let mut tasks = TaskFunctionRegistry::new();
        tasks.begin_registration();
        tasks.register_library(0, "core", (1, 0)).unwrap();
        let source_tf = TaskFunctionId::new(0, 0);
        let identity_tf = TaskFunctionId::new(0, 1);
        let combine_tf = TaskFunctionId::new(0, 2);
        tasks
            .register_task_function(TaskFunction {
                uid: source_tf,
                display_name: "task_source".to_string(),
                arguments: vec![Argument::output(DataType::scalar(Primitive::Real), true)],
            })
            .unwrap();
        tasks.register_task_function(single_in_single_out_task_function(identity_tf)).unwrap();
        tasks
            .register_task_function(TaskFunction {
                uid: combine_tf,
                display_name: "task_combine".to_string(),
                arguments: vec![
                    Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
                    Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
                    Argument::output(DataType::scalar(Primitive::Real), true),
                ],
            })
            .unwrap();
        tasks
            .register_task_function_mapping(
                &native,
                source_uid,
                TaskFunctionMapping::new(source_tf, vec![], vec![ArgSource::Single(0)]),
            )
            .unwrap();
        tasks
            .register_task_function_mapping(
                &native,
                identity_uid,
                TaskFunctionMapping::new(identity_tf, vec![InputShape::Variable], vec![
                    ArgSource::Single(0),
                    ArgSource::Single(1),
                ]),
            )
            .unwrap();
        tasks
            .register_task_function_mapping(
                &native,
                combine_uid,
                TaskFunctionMapping::new(
                    combine_tf,
                    vec![InputShape::BranchlessVariable, InputShape::BranchlessVariable],
                    vec![ArgSource::Single(0), ArgSource::Single(1), ArgSource::Single(2)],
                ),
            )
            .unwrap();
        tasks.end_registration().unwrap();

        let a = graph.create_native_module_call(native.get(source_uid).unwrap());
        let b = graph.create_native_module_call(native.get(identity_uid).unwrap());
        let c = graph.create_native_module_call(native.get(identity_uid).unwrap());
        let d = graph.create_native_module_call(native.get(combine_uid).unwrap());
        graph.add_edge(graph.call_output_port(a, 0), graph.call_input_port(b, 0)).unwrap();
        graph.add_edge(graph.call_output_port(a, 0), graph.call_input_port(c, 0)).unwrap();
        graph.add_edge(graph.call_output_port(b, 0), graph.call_input_port(d, 0)).unwrap();
        graph.add_edge(graph.call_output_port(c, 0), graph.call_input_port(d, 1)).unwrap();
        let output = graph.create_output(0);
        graph.add_edge(graph.call_output_port(d, 0), output).unwrap();

        let built = build_task_graph(&graph, &native, &tasks).unwrap();

        assert_eq!(built.tasks.len(), 4);
        assert_eq!(built.max_concurrent_tasks, 2);
        // a's buffer and d's buffer are never concurrent (a strictly
        // precedes d), but b/c force every other pair concurrent, so the
        // greedy partition lands on three groups rather than the task-level
        // two: {a, d}, {b}, {c}.
        assert_eq!(built.max_concurrent_buffers, 3);
    }

    #[test]
    fn missing_mapping_fails_with_no_task_mapping() {
        let mut graph = ExecutionGraph::new();
        let mut native = NativeModuleRegistry::new();
        native.begin_registration();
        native.register_library(0, "core", (1, 0)).unwrap();
        let uid = NativeModuleId::new(0, 0);
        native.register_native_module(parameter_module(uid)).unwrap();
        native.end_registration().unwrap();

        let mut tasks = TaskFunctionRegistry::new();
        tasks.begin_registration();
        tasks.end_registration().unwrap();

        graph.create_native_module_call(native.get(uid).unwrap());

        let result = build_task_graph(&graph, &native, &tasks);
        assert!(matches!(result, Err(BuildError::NoTaskMapping(_))));
    }
}
