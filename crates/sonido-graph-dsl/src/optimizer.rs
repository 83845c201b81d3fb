//! The optimizer: iterated constant folding, pattern-rule rewriting,
//! dead-node sweep, and deduplication, run to a fixpoint, followed by
//! constant-qualifier validation (§4.4).

use std::collections::HashMap;

use crate::config::GraphDslConfig;
use crate::constant_eval::ConstantEvaluator;
use crate::error::GraphError;
use crate::graph::{ConstantValue, ExecutionGraph, NodeId, NodeKind};
use crate::native_module::NativeModuleRegistry;
use crate::pattern::{OptimizationRule, PatternSymbol, MAX_CAPTURE_SLOTS};
use crate::types::{Primitive, Qualifier, Value};

/// Runs the optimizer to a fixpoint, then deduplicates and validates. On
/// success the graph is normalized and compacted; on failure the graph is
/// still left compacted and normalized, but some `Constant`-qualified inputs
/// are fed by non-constant producers.
pub fn optimize(
    graph: &mut ExecutionGraph,
    registry: &NativeModuleRegistry,
    config: &GraphDslConfig,
) -> Result<(), GraphError> {
    let mut iterations: u32 = 0;
    loop {
        let mut changed = false;
        for node in graph.live_node_ids().collect::<Vec<_>>() {
            if graph.is_live(node) && optimize_node(graph, registry, node) {
                changed = true;
            }
        }
        if sweep_dead_nodes(graph) {
            changed = true;
        }
        iterations += 1;
        tracing::debug!(iterations, changed, "optimizer pass complete");
        if !changed {
            break;
        }
        if let Some(max) = config.max_optimizer_iterations {
            if iterations >= max {
                tracing::warn!(max, "optimizer reached max_optimizer_iterations without a fixpoint");
                break;
            }
        }
    }

    graph.compact();
    dedup_constants(graph);
    dedup_structural(graph, registry);
    graph.compact();

    validate_constant_qualifiers(graph, registry)
}

fn optimize_node(graph: &mut ExecutionGraph, registry: &NativeModuleRegistry, node: NodeId) -> bool {
    if !matches!(graph.node_kind(node), NodeKind::NativeModuleCall(_)) {
        return false;
    }
    if try_fold(graph, registry, node) {
        return true;
    }
    let uid = graph.module_uid(node);
    for rule in registry.rules_for(uid) {
        if try_apply_rule(graph, registry, node, rule) {
            return true;
        }
    }
    false
}

// --- §4.4.2 constant folding --------------------------------------------

fn try_fold(graph: &mut ExecutionGraph, registry: &NativeModuleRegistry, call: NodeId) -> bool {
    let uid = graph.module_uid(call);
    let Some(module) = registry.get(uid) else { return false };
    if !module.is_compile_time_callable() {
        return false;
    }

    let input_count = module.input_indices().count();
    let args = {
        let mut evaluator = ConstantEvaluator::new(graph, registry);
        let mut args = Vec::with_capacity(input_count);
        for dense in 0..input_count {
            let source = graph.call_input_source(call, dense);
            match evaluator.evaluate(source) {
                Some(v) => args.push(v),
                None => return false,
            }
        }
        args
    };

    let eval = module.compile_time_eval.expect("checked is_compile_time_callable above");
    let results = eval(&args);
    let output_count = module.output_indices().count();
    debug_assert_eq!(results.len(), output_count, "evaluator for {uid} returned the wrong output count");

    for (dense, value) in results.into_iter().enumerate() {
        let new_constant = materialize_constant(graph, &value);
        let port = graph.call_output_port(call, dense);
        graph.reroute_consumers(port, new_constant);
    }
    graph.remove_node(call);
    true
}

fn materialize_constant(graph: &mut ExecutionGraph, value: &Value) -> NodeId {
    match value {
        Value::Real(v) => graph.create_constant_real(*v),
        Value::Bool(v) => graph.create_constant_bool(*v),
        Value::String(v) => graph.create_constant_string(v.clone()),
        Value::RealArray(elements) => {
            let array = graph.create_constant_array(Primitive::Real);
            for &e in elements {
                let node = graph.create_constant_real(e);
                graph.add_edge(node, array).expect("fresh array node accepts unlimited elements");
            }
            array
        }
        Value::BoolArray(elements) => {
            let array = graph.create_constant_array(Primitive::Bool);
            for &e in elements {
                let node = graph.create_constant_bool(e);
                graph.add_edge(node, array).expect("fresh array node accepts unlimited elements");
            }
            array
        }
        Value::StringArray(elements) => {
            let array = graph.create_constant_array(Primitive::String);
            for e in elements {
                let node = graph.create_constant_string(e.clone());
                graph.add_edge(node, array).expect("fresh array node accepts unlimited elements");
            }
            array
        }
    }
}

// --- §4.4.3 rule application --------------------------------------------

#[derive(Default)]
struct Captures {
    variables: [Option<NodeId>; MAX_CAPTURE_SLOTS],
    constants: [Option<NodeId>; MAX_CAPTURE_SLOTS],
}

struct Cursor<'p> {
    symbols: &'p [PatternSymbol],
    pos: usize,
}

impl<'p> Cursor<'p> {
    fn next(&mut self) -> &'p PatternSymbol {
        let symbol = &self.symbols[self.pos];
        self.pos += 1;
        symbol
    }
}

fn try_match_source(
    graph: &ExecutionGraph,
    registry: &NativeModuleRegistry,
    call: NodeId,
    pattern: &[PatternSymbol],
) -> Option<Captures> {
    let mut cursor = Cursor { symbols: pattern, pos: 0 };
    match cursor.next() {
        PatternSymbol::Module(uid) if *uid == graph.module_uid(call) => {}
        _ => return None,
    }
    let module = registry.get(graph.module_uid(call))?;
    let mut captures = Captures::default();
    let input_count = module.input_indices().count();
    for dense in 0..input_count {
        let source = graph.call_input_source(call, dense);
        if !match_value(graph, registry, source, &mut cursor, &mut captures) {
            return None;
        }
    }
    if !matches!(cursor.next(), PatternSymbol::ModuleEnd) {
        return None;
    }
    Some(captures)
}

/// Matches one pattern symbol (and, for `Module`, its whole sub-expression)
/// against `value_node`, which is always either a `Constant` or the
/// `IndexedOutput` port of the node actually producing the value — never a
/// bare call, since call nodes are only ever reached by hopping through a
/// port.
fn match_value(
    graph: &ExecutionGraph,
    registry: &NativeModuleRegistry,
    value_node: NodeId,
    cursor: &mut Cursor,
    captures: &mut Captures,
) -> bool {
    match cursor.next() {
        PatternSymbol::Module(uid) => {
            let NodeKind::IndexedOutput { call, .. } = graph.node_kind(value_node) else { return false };
            let call = *call;
            if graph.module_uid(call) != *uid {
                return false;
            }
            let Some(module) = registry.get(*uid) else { return false };
            let input_count = module.input_indices().count();
            for dense in 0..input_count {
                let source = graph.call_input_source(call, dense);
                if !match_value(graph, registry, source, cursor, captures) {
                    return false;
                }
            }
            matches!(cursor.next(), PatternSymbol::ModuleEnd)
        }
        PatternSymbol::Variable(slot) => {
            if graph.is_constant(value_node) {
                return false;
            }
            captures.variables[*slot] = Some(value_node);
            true
        }
        PatternSymbol::Constant(slot) => {
            if !graph.is_constant(value_node) {
                return false;
            }
            captures.constants[*slot] = Some(value_node);
            true
        }
        PatternSymbol::RealValue(expected) => {
            matches!(graph.node_kind(value_node), NodeKind::Constant(ConstantValue::Real(actual)) if actual == expected)
        }
        PatternSymbol::BoolValue(expected) => {
            matches!(graph.node_kind(value_node), NodeKind::Constant(ConstantValue::Bool(actual)) if actual == expected)
        }
        PatternSymbol::ArrayDereference | PatternSymbol::ModuleEnd => {
            unreachable!("source patterns never use target-only or closing symbols mid-argument")
        }
    }
}

fn build_target(
    graph: &mut ExecutionGraph,
    registry: &NativeModuleRegistry,
    cursor: &mut Cursor,
    captures: &Captures,
) -> NodeId {
    match cursor.next().clone() {
        PatternSymbol::Module(uid) => {
            let module = registry.get(uid).expect("rule target references an unregistered module").clone();
            let call = graph.create_native_module_call(&module);
            let input_count = module.input_indices().count();
            for dense in 0..input_count {
                let arg_value = build_target(graph, registry, cursor, captures);
                let port = graph.call_input_port(call, dense);
                graph.add_edge(arg_value, port).expect("rule target wiring is well-typed by construction");
            }
            assert!(matches!(cursor.next(), PatternSymbol::ModuleEnd), "malformed rule target: missing ModuleEnd");
            let return_overall = module.return_index().expect("rule target module has no return argument");
            let return_dense = module
                .output_indices()
                .position(|overall| overall == return_overall)
                .expect("return argument is not among the module's outputs");
            graph.call_output_port(call, return_dense)
        }
        PatternSymbol::Variable(slot) => captures.variables[slot].expect("unbound variable capture in rule target"),
        PatternSymbol::Constant(slot) => captures.constants[slot].expect("unbound constant capture in rule target"),
        PatternSymbol::RealValue(v) => graph.create_constant_real(v),
        PatternSymbol::BoolValue(v) => graph.create_constant_bool(v),
        PatternSymbol::ArrayDereference => {
            let array = build_target(graph, registry, cursor, captures);
            let index = build_target(graph, registry, cursor, captures);
            resolve_array_dereference(graph, array, index)
        }
        PatternSymbol::ModuleEnd => unreachable!("ModuleEnd is consumed by its owning Module branch"),
    }
}

fn resolve_array_dereference(graph: &mut ExecutionGraph, array: NodeId, index_node: NodeId) -> NodeId {
    debug_assert!(graph.is_constant(array) && graph.data_type(array).is_array());
    let primitive = graph.data_type(array).primitive();
    let index_value = match graph.node_kind(index_node) {
        NodeKind::Constant(ConstantValue::Real(v)) => Some(*v),
        _ => None,
    };
    let elements: Vec<NodeId> = graph.array_element_sources(array).collect();
    index_value
        .filter(|v| v.is_finite())
        .map(f32::floor)
        .filter(|v| *v >= 0.0)
        .and_then(|v| elements.get(v as usize).copied())
        .unwrap_or_else(|| zero_constant(graph, primitive))
}

fn zero_constant(graph: &mut ExecutionGraph, primitive: Primitive) -> NodeId {
    match primitive {
        Primitive::Real => graph.create_constant_real(0.0),
        Primitive::Bool => graph.create_constant_bool(false),
        Primitive::String => graph.create_constant_string(String::new()),
    }
}

fn try_apply_rule(
    graph: &mut ExecutionGraph,
    registry: &NativeModuleRegistry,
    call: NodeId,
    rule: &OptimizationRule,
) -> bool {
    let Some(captures) = try_match_source(graph, registry, call, &rule.source) else { return false };

    let mut cursor = Cursor { symbols: &rule.target, pos: 0 };
    let new_value = build_target(graph, registry, &mut cursor, &captures);
    debug_assert_eq!(cursor.pos, rule.target.len(), "rule target left unconsumed trailing symbols");

    let module = registry.get(graph.module_uid(call)).expect("module disappeared mid-rewrite");
    let return_overall = module.return_index().expect("rule root module has no return argument");
    let return_dense =
        module.output_indices().position(|overall| overall == return_overall).expect("return arg not an output");
    let original_port = graph.call_output_port(call, return_dense);

    graph.reroute_consumers(original_port, new_value);
    graph.remove_node(call);
    true
}

// --- §4.4.4 dead-node sweep ----------------------------------------------

fn is_port(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::IndexedInput { .. } | NodeKind::IndexedOutput { .. })
}

fn sweep_dead_nodes(graph: &mut ExecutionGraph) -> bool {
    let mut reachable: std::collections::HashSet<NodeId> = std::collections::HashSet::new();
    let mut stack: Vec<NodeId> =
        graph.live_node_ids().filter(|&n| matches!(graph.node_kind(n), NodeKind::Output { .. })).collect();

    while let Some(node) = stack.pop() {
        if !reachable.insert(node) {
            continue;
        }
        for i in 0..graph.incoming_count(node) {
            stack.push(graph.nth_incoming_source(node, i));
        }
    }

    let dead: Vec<NodeId> =
        graph.live_node_ids().filter(|&n| !reachable.contains(&n) && !is_port(graph.node_kind(n))).collect();

    let mut changed = false;
    for node in dead {
        if graph.is_live(node) {
            graph.remove_node(node);
            changed = true;
        }
    }
    changed
}

// --- §4.4.5 deduplication --------------------------------------------------

#[derive(PartialEq, Eq, Hash)]
enum ConstantKey {
    Real(u32),
    Bool(bool),
    String(String),
}

impl ConstantKey {
    fn from_value(value: &ConstantValue) -> Option<Self> {
        match value {
            ConstantValue::Real(v) => Some(ConstantKey::Real(v.to_bits())),
            ConstantValue::Bool(v) => Some(ConstantKey::Bool(*v)),
            ConstantValue::String(v) => Some(ConstantKey::String(v.clone())),
            ConstantValue::Array => None,
        }
    }
}

fn dedup_constants(graph: &mut ExecutionGraph) -> bool {
    let mut groups: HashMap<ConstantKey, Vec<NodeId>> = HashMap::new();
    for node in graph.live_node_ids() {
        if let NodeKind::Constant(value) = graph.node_kind(node) {
            if let Some(key) = ConstantKey::from_value(value) {
                groups.entry(key).or_default().push(node);
            }
        }
    }

    let mut changed = false;
    for nodes in groups.into_values() {
        let Some((&canonical, duplicates)) = nodes.split_first() else { continue };
        for &dup in duplicates {
            graph.reroute_consumers(dup, canonical);
            graph.remove_node(dup);
            changed = true;
        }
    }
    changed
}

fn structurally_equal(graph: &ExecutionGraph, registry: &NativeModuleRegistry, a: NodeId, b: NodeId) -> bool {
    match (graph.node_kind(a).clone(), graph.node_kind(b).clone()) {
        (NodeKind::NativeModuleCall(uid_a), NodeKind::NativeModuleCall(uid_b)) => {
            if uid_a != uid_b {
                return false;
            }
            let Some(module) = registry.get(uid_a) else { return false };
            (0..module.input_indices().count()).all(|i| graph.call_input_source(a, i) == graph.call_input_source(b, i))
        }
        (NodeKind::Constant(ConstantValue::Array), NodeKind::Constant(ConstantValue::Array)) => {
            graph.data_type(a) == graph.data_type(b)
                && graph.array_element_sources(a).eq(graph.array_element_sources(b))
        }
        _ => false,
    }
}

fn merge_duplicate(graph: &mut ExecutionGraph, registry: &NativeModuleRegistry, canonical: NodeId, dup: NodeId) {
    match graph.node_kind(dup).clone() {
        NodeKind::NativeModuleCall(uid) => {
            let module = registry.get(uid).expect("structurally_equal already confirmed this module exists");
            for dense in 0..module.output_indices().count() {
                let dup_port = graph.call_output_port(dup, dense);
                let canonical_port = graph.call_output_port(canonical, dense);
                graph.reroute_consumers(dup_port, canonical_port);
            }
        }
        NodeKind::Constant(ConstantValue::Array) => graph.reroute_consumers(dup, canonical),
        other => unreachable!("merge_duplicate only called on calls or array constants, got {other:?}"),
    }
    graph.remove_node(dup);
}

fn dedup_structural(graph: &mut ExecutionGraph, registry: &NativeModuleRegistry) -> bool {
    let mut any_changed = false;
    loop {
        let candidates: Vec<NodeId> = graph
            .live_node_ids()
            .filter(|&n| matches!(graph.node_kind(n), NodeKind::NativeModuleCall(_) | NodeKind::Constant(ConstantValue::Array)))
            .collect();

        let mut merged_this_round = false;
        for i in 0..candidates.len() {
            let a = candidates[i];
            if !graph.is_live(a) {
                continue;
            }
            for &b in &candidates[i + 1..] {
                if graph.is_live(b) && structurally_equal(graph, registry, a, b) {
                    merge_duplicate(graph, registry, a, b);
                    merged_this_round = true;
                    any_changed = true;
                }
            }
        }
        if !merged_this_round {
            break;
        }
    }
    any_changed
}

// --- §4.4.6 constant-qualifier validation -----------------------------------

fn validate_constant_qualifiers(graph: &ExecutionGraph, registry: &NativeModuleRegistry) -> Result<(), GraphError> {
    let mut errors = Vec::new();
    for node in graph.live_node_ids() {
        let NodeKind::NativeModuleCall(uid) = graph.node_kind(node) else { continue };
        let Some(module) = registry.get(*uid) else { continue };
        for (dense, overall) in module.input_indices().enumerate() {
            if module.arguments[overall].qualifier == Qualifier::Constant {
                let source = graph.call_input_source(node, dense);
                if !graph.is_constant(source) {
                    errors.push(GraphError::NonConstantInput { module: *uid, arg_index: overall });
                }
            }
        }
    }
    match GraphError::aggregate(errors) {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
