//! Bottom-up, memoized evaluation of constant (or constant-foldable)
//! subgraphs (§4.3). Used by the optimizer's folding pass and by rule guards
//! that need to know whether a captured subgraph is a compile-time constant.

use std::collections::HashMap;

use crate::graph::{ConstantValue, ExecutionGraph, NodeId, NodeKind};
use crate::native_module::NativeModuleRegistry;
use crate::types::{Primitive, Value};

fn build_array(primitive: Primitive, elements: Vec<Value>) -> Value {
    match primitive {
        Primitive::Real => Value::RealArray(elements.into_iter().map(|v| v.as_real()).collect()),
        Primitive::Bool => Value::BoolArray(elements.into_iter().map(|v| v.as_bool()).collect()),
        Primitive::String => {
            Value::StringArray(elements.into_iter().map(|v| v.as_str().to_string()).collect())
        }
    }
}

/// Walks the graph on demand, evaluating nodes via registered compile-time
/// functions and memoizing results by node id. Read-only: never mutates the
/// graph. A single instance should be discarded once the graph it was built
/// against is mutated — the memo would otherwise go stale.
pub struct ConstantEvaluator<'a> {
    graph: &'a ExecutionGraph,
    registry: &'a NativeModuleRegistry,
    memo: HashMap<NodeId, Option<Value>>,
}

impl<'a> ConstantEvaluator<'a> {
    /// Builds an evaluator over `graph`, resolving compile-time evaluators
    /// through `registry`.
    #[must_use]
    pub fn new(graph: &'a ExecutionGraph, registry: &'a NativeModuleRegistry) -> Self {
        Self { graph, registry, memo: HashMap::new() }
    }

    /// Evaluates `node`, returning `Some` iff it is a constant, or an
    /// indexed-output of a call whose module has a compile-time evaluator
    /// and whose every transitive input (hopping through input ports) is
    /// likewise evaluable.
    pub fn evaluate(&mut self, node: NodeId) -> Option<Value> {
        if let Some(cached) = self.memo.get(&node) {
            return cached.clone();
        }

        let mut pending = vec![node];
        while let Some(&current) = pending.last() {
            if self.memo.contains_key(&current) {
                pending.pop();
                continue;
            }

            match self.graph.node_kind(current) {
                NodeKind::Constant(ConstantValue::Real(v)) => {
                    self.memo.insert(current, Some(Value::Real(*v)));
                    pending.pop();
                }
                NodeKind::Constant(ConstantValue::Bool(v)) => {
                    self.memo.insert(current, Some(Value::Bool(*v)));
                    pending.pop();
                }
                NodeKind::Constant(ConstantValue::String(v)) => {
                    self.memo.insert(current, Some(Value::String(v.clone())));
                    pending.pop();
                }
                NodeKind::Constant(ConstantValue::Array) => {
                    let elements: Vec<NodeId> = self.graph.array_element_sources(current).collect();
                    let mut ready = true;
                    for &element in &elements {
                        if !self.memo.contains_key(&element) {
                            ready = false;
                            pending.push(element);
                        }
                    }
                    if ready {
                        let primitive = self.graph.data_type(current).primitive();
                        let mut values = Vec::with_capacity(elements.len());
                        let mut invalid = false;
                        for element in &elements {
                            match &self.memo[element] {
                                Some(v) => values.push(v.clone()),
                                None => {
                                    invalid = true;
                                    break;
                                }
                            }
                        }
                        let result = if invalid { None } else { Some(build_array(primitive, values)) };
                        self.memo.insert(current, result);
                        pending.pop();
                    }
                }
                NodeKind::IndexedOutput { call, .. } => {
                    let call = *call;
                    let uid = self.graph.module_uid(call);
                    let Some(module) = self.registry.get(uid) else {
                        self.memo.insert(current, None);
                        pending.pop();
                        continue;
                    };
                    if !module.is_compile_time_callable() {
                        self.mark_all_outputs_invalid(call);
                        pending.pop();
                        continue;
                    }

                    let input_count = module.input_indices().count();
                    let sources: Vec<NodeId> =
                        (0..input_count).map(|dense| self.graph.call_input_source(call, dense)).collect();

                    let mut ready = true;
                    for &source in &sources {
                        if !self.memo.contains_key(&source) {
                            ready = false;
                            pending.push(source);
                        }
                    }
                    if !ready {
                        continue;
                    }

                    let mut invalid = false;
                    let mut args = Vec::with_capacity(sources.len());
                    for source in &sources {
                        match &self.memo[source] {
                            Some(v) => args.push(v.clone()),
                            None => {
                                invalid = true;
                                break;
                            }
                        }
                    }

                    if invalid {
                        self.mark_all_outputs_invalid(call);
                    } else {
                        let eval = module.compile_time_eval.expect("checked is_compile_time_callable above");
                        let results = eval(&args);
                        let output_count = module.output_indices().count();
                        assert!(
                            results.len() == output_count,
                            "compile-time evaluator for {uid} returned {} values, expected {output_count}",
                            results.len()
                        );
                        for (dense, value) in results.into_iter().enumerate() {
                            let port = self.graph.call_output_port(call, dense);
                            self.memo.insert(port, Some(value));
                        }
                    }
                    pending.pop();
                }
                other => unreachable!("constant evaluator should never visit a {other:?} node"),
            }
        }

        self.memo.get(&node).cloned().flatten()
    }

    fn mark_all_outputs_invalid(&mut self, call: NodeId) {
        let uid = self.graph.module_uid(call);
        let output_count = self.registry.get(uid).map_or(0, |m| m.output_indices().count());
        for dense in 0..output_count {
            let port = self.graph.call_output_port(call, dense);
            self.memo.insert(port, None);
        }
    }

    /// Convenience for rule guards: true iff `node` is fully constant-foldable.
    pub fn is_constant(&mut self, node: NodeId) -> bool {
        self.evaluate(node).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native_module::{Argument, NativeModule};
    use crate::types::{DataType, NativeModuleId, Qualifier};

    fn addition() -> NativeModule {
        NativeModule {
            uid: NativeModuleId::new(0, 0),
            display_name: "addition".to_string(),
            arguments: vec![
                Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
                Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
                Argument::output(DataType::scalar(Primitive::Real), true),
            ],
            compile_time_eval: Some(|args| vec![Value::Real(args[0].as_real() + args[1].as_real())]),
        }
    }

    fn runtime_only_negation() -> NativeModule {
        NativeModule {
            uid: NativeModuleId::new(0, 1),
            display_name: "negation".to_string(),
            arguments: vec![
                Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
                Argument::output(DataType::scalar(Primitive::Real), true),
            ],
            compile_time_eval: None,
        }
    }

    fn registry_with(modules: Vec<NativeModule>) -> NativeModuleRegistry {
        let mut registry = NativeModuleRegistry::new();
        registry.begin_registration();
        registry.register_library(0, "core", (1, 0)).unwrap();
        for module in modules {
            registry.register_native_module(module).unwrap();
        }
        registry.end_registration().unwrap();
        registry
    }

    #[test]
    fn evaluates_constant_directly() {
        let mut graph = ExecutionGraph::new();
        let registry = NativeModuleRegistry::new();
        let x = graph.create_constant_real(2.5);
        let mut evaluator = ConstantEvaluator::new(&graph, &registry);
        assert_eq!(evaluator.evaluate(x), Some(Value::Real(2.5)));
    }

    #[test]
    fn folds_all_constant_call() {
        let mut graph = ExecutionGraph::new();
        let registry = registry_with(vec![addition()]);
        let call = graph.create_native_module_call(registry.get(NativeModuleId::new(0, 0)).unwrap());
        let a = graph.create_constant_real(2.0);
        let b = graph.create_constant_real(3.0);
        graph.add_edge(a, graph.call_input_port(call, 0)).unwrap();
        graph.add_edge(b, graph.call_input_port(call, 1)).unwrap();

        let output = graph.call_output_port(call, 0);
        let mut evaluator = ConstantEvaluator::new(&graph, &registry);
        assert_eq!(evaluator.evaluate(output), Some(Value::Real(5.0)));
    }

    #[test]
    fn non_constant_input_is_not_evaluable() {
        let mut graph = ExecutionGraph::new();
        let registry = registry_with(vec![addition(), runtime_only_negation()]);
        let negation_call = graph.create_native_module_call(registry.get(NativeModuleId::new(0, 1)).unwrap());
        let x = graph.create_constant_real(1.0);
        graph.add_edge(x, graph.call_input_port(negation_call, 0)).unwrap();
        let negation_output = graph.call_output_port(negation_call, 0);

        let add_call = graph.create_native_module_call(registry.get(NativeModuleId::new(0, 0)).unwrap());
        graph.add_edge(negation_output, graph.call_input_port(add_call, 0)).unwrap();
        let c = graph.create_constant_real(4.0);
        graph.add_edge(c, graph.call_input_port(add_call, 1)).unwrap();
        let add_output = graph.call_output_port(add_call, 0);

        let mut evaluator = ConstantEvaluator::new(&graph, &registry);
        assert_eq!(evaluator.evaluate(negation_output), None);
        assert_eq!(evaluator.evaluate(add_output), None);
    }

    #[test]
    fn array_constant_evaluates_elementwise() {
        let mut graph = ExecutionGraph::new();
        let registry = NativeModuleRegistry::new();
        let array = graph.create_constant_array(Primitive::Real);
        let a = graph.create_constant_real(1.0);
        let b = graph.create_constant_real(2.0);
        graph.add_edge(a, array).unwrap();
        graph.add_edge(b, array).unwrap();

        let mut evaluator = ConstantEvaluator::new(&graph, &registry);
        assert_eq!(evaluator.evaluate(array), Some(Value::RealArray(vec![1.0, 2.0])));
    }

    #[test]
    fn repeated_evaluation_is_memoized_and_stable() {
        let mut graph = ExecutionGraph::new();
        let registry = registry_with(vec![addition()]);
        let call = graph.create_native_module_call(registry.get(NativeModuleId::new(0, 0)).unwrap());
        let a = graph.create_constant_real(2.0);
        let b = graph.create_constant_real(3.0);
        graph.add_edge(a, graph.call_input_port(call, 0)).unwrap();
        graph.add_edge(b, graph.call_input_port(call, 1)).unwrap();
        let output = graph.call_output_port(call, 0);

        let mut evaluator = ConstantEvaluator::new(&graph, &registry);
        assert_eq!(evaluator.evaluate(output), evaluator.evaluate(output));
    }
}
