//! Integration tests for the graph compiler core.
//!
//! Cross-module scenarios: the full build → optimize → task-graph pipeline
//! over a graph that mixes foldable and variable subgraphs, registry
//! lifecycle/validation error paths, and `GraphDslConfig` file loading.

use sonido_graph_dsl::{
    build_task_graph, optimize, ArgSource, Argument, BuildError, DataType, ExecutionGraph,
    GraphDslConfig, GraphDslConfigError, InputShape, NativeModule, NativeModuleId,
    NativeModuleRegistry, NodeKind, OutputValue, Primitive, Qualifier, RegistrationError,
    TaskArgValue, TaskFunction, TaskFunctionId, TaskFunctionMapping, TaskFunctionRegistry, Value,
};

fn parameter_module(uid: NativeModuleId) -> NativeModule {
    NativeModule {
        uid,
        display_name: "parameter$real".to_string(),
        arguments: vec![Argument::output(DataType::scalar(Primitive::Real), true)],
        compile_time_eval: None,
    }
}

fn addition_module(uid: NativeModuleId) -> NativeModule {
    NativeModule {
        uid,
        display_name: "addition".to_string(),
        arguments: vec![
            Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
            Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
            Argument::output(DataType::scalar(Primitive::Real), true),
        ],
        compile_time_eval: Some(|args| vec![Value::Real(args[0].as_real() + args[1].as_real())]),
    }
}

/// A graph with one variable parameter, one fully-constant subexpression
/// (`3.0 + 4.0`), and an addition combining the two. The optimizer should
/// fold the constant branch down to `7.0` but leave the parameter-fed
/// addition alive for the task graph builder to schedule.
#[test]
fn pipeline_folds_constants_and_schedules_the_remaining_call() {
    let param_uid = NativeModuleId::new(0, 0);
    let add_uid = NativeModuleId::new(0, 1);

    let mut native = NativeModuleRegistry::new();
    native.begin_registration();
    native.register_library(0, "core", (1, 0)).unwrap();
    native.register_native_module(parameter_module(param_uid)).unwrap();
    native.register_native_module(addition_module(add_uid)).unwrap();
    native.end_registration().unwrap();

    let mut graph = ExecutionGraph::new();
    let param_call = graph.create_native_module_call(native.get(param_uid).unwrap());
    let param_out = graph.call_output_port(param_call, 0);

    let three = graph.create_constant_real(3.0);
    let four = graph.create_constant_real(4.0);
    let constant_sum_call = graph.create_native_module_call(native.get(add_uid).unwrap());
    graph.add_edge(three, graph.call_input_port(constant_sum_call, 0)).unwrap();
    graph.add_edge(four, graph.call_input_port(constant_sum_call, 1)).unwrap();
    let constant_sum_out = graph.call_output_port(constant_sum_call, 0);

    let final_call = graph.create_native_module_call(native.get(add_uid).unwrap());
    graph.add_edge(param_out, graph.call_input_port(final_call, 0)).unwrap();
    graph.add_edge(constant_sum_out, graph.call_input_port(final_call, 1)).unwrap();
    let final_out = graph.call_output_port(final_call, 0);

    let output = graph.create_output(0);
    graph.add_edge(final_out, output).unwrap();

    optimize(&mut graph, &native, &GraphDslConfig::default()).unwrap();

    // Exactly two calls should survive: the parameter and the final addition.
    let surviving_calls: Vec<_> =
        graph.live_node_ids().filter(|&n| matches!(graph.node_kind(n), NodeKind::NativeModuleCall(_))).collect();
    assert_eq!(surviving_calls.len(), 2);

    let mut tasks = TaskFunctionRegistry::new();
    tasks.begin_registration();
    tasks.register_library(0, "core", (1, 0)).unwrap();
    let param_tf = TaskFunctionId::new(0, 0);
    let add_tf = TaskFunctionId::new(0, 1);
    tasks
        .register_task_function(TaskFunction {
            uid: param_tf,
            display_name: "task_parameter".to_string(),
            arguments: vec![Argument::output(DataType::scalar(Primitive::Real), true)],
        })
        .unwrap();
    tasks
        .register_task_function(TaskFunction {
            uid: add_tf,
            display_name: "task_add".to_string(),
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
            param_uid,
            TaskFunctionMapping::new(param_tf, vec![], vec![ArgSource::Single(0)]),
        )
        .unwrap();
    tasks
        .register_task_function_mapping(
            &native,
            add_uid,
            TaskFunctionMapping::new(add_tf, vec![InputShape::BranchlessVariable, InputShape::Constant], vec![
                ArgSource::Single(0),
                ArgSource::Single(1),
                ArgSource::Single(2),
            ]),
        )
        .unwrap();
    tasks.end_registration().unwrap();

    let built = build_task_graph(&graph, &native, &tasks).unwrap();

    assert_eq!(built.tasks.len(), 2);
    assert_eq!(built.initial_tasks.len(), 1);
    let add_task = built.tasks.iter().find(|t| t.task_function == add_tf).unwrap();
    // The constant branch folded to 7.0 and should arrive inlined, not via a buffer.
    assert!(matches!(add_task.arguments[1].value, TaskArgValue::Immediate(Value::Real(v)) if v == 7.0));
    assert!(matches!(built.outputs.as_slice(), [OutputValue::Buffer(_)]));
}

#[test]
fn registering_a_module_against_an_unregistered_library_fails() {
    let mut native = NativeModuleRegistry::new();
    native.begin_registration();
    let result = native.register_native_module(parameter_module(NativeModuleId::new(0, 0)));
    assert!(matches!(result, Err(RegistrationError::UnknownLibrary { .. })));
}

#[test]
fn registering_a_duplicate_library_id_fails() {
    let mut native = NativeModuleRegistry::new();
    native.begin_registration();
    native.register_library(0, "core", (1, 0)).unwrap();
    let result = native.register_library(0, "core-again", (1, 0));
    assert!(matches!(result, Err(RegistrationError::UidCollision { .. })));
}

#[test]
fn a_rule_root_with_two_outputs_is_rejected() {
    use sonido_graph_dsl::{OptimizationRule, PatternBuilder};

    let two_out_uid = NativeModuleId::new(0, 0);
    let mut native = NativeModuleRegistry::new();
    native.begin_registration();
    native.register_library(0, "core", (1, 0)).unwrap();
    native
        .register_native_module(NativeModule {
            uid: two_out_uid,
            display_name: "split".to_string(),
            arguments: vec![
                Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
                Argument::output(DataType::scalar(Primitive::Real), false),
                Argument::output(DataType::scalar(Primitive::Real), false),
            ],
            compile_time_eval: None,
        })
        .unwrap();

    let rule = OptimizationRule::new(
        two_out_uid,
        PatternBuilder::new().module(two_out_uid).variable(0).end_module().build(),
        PatternBuilder::new().variable(0).build(),
    );
    let result = native.register_optimization_rule(rule);
    assert!(matches!(result, Err(RegistrationError::InvalidRuleRoot { module }) if module == two_out_uid));
}

#[test]
fn a_task_function_mapping_with_the_wrong_arity_is_rejected() {
    let uid = NativeModuleId::new(0, 0);
    let mut native = NativeModuleRegistry::new();
    native.begin_registration();
    native.register_library(0, "core", (1, 0)).unwrap();
    native.register_native_module(addition_module(uid)).unwrap();
    native.end_registration().unwrap();

    let mut tasks = TaskFunctionRegistry::new();
    tasks.begin_registration();
    tasks.register_library(0, "core", (1, 0)).unwrap();
    let tf_uid = TaskFunctionId::new(0, 0);
    tasks
        .register_task_function(TaskFunction {
            uid: tf_uid,
            display_name: "task_add".to_string(),
            arguments: vec![
                Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
                Argument::input(Qualifier::In, DataType::scalar(Primitive::Real)),
                Argument::output(DataType::scalar(Primitive::Real), true),
            ],
        })
        .unwrap();

    // Only one input_shape entry for a module with two inputs.
    let result = tasks.register_task_function_mapping(
        &native,
        uid,
        TaskFunctionMapping::new(tf_uid, vec![InputShape::Variable], vec![
            ArgSource::Single(0),
            ArgSource::Single(1),
            ArgSource::Single(2),
        ]),
    );
    assert!(matches!(result, Err(RegistrationError::InvalidTaskFunctionMapping { module, .. }) if module == uid));
}

#[test]
fn a_graph_referencing_a_module_with_no_mapping_fails_to_build() {
    let uid = NativeModuleId::new(0, 0);
    let mut native = NativeModuleRegistry::new();
    native.begin_registration();
    native.register_library(0, "core", (1, 0)).unwrap();
    native.register_native_module(parameter_module(uid)).unwrap();
    native.end_registration().unwrap();

    let mut graph = ExecutionGraph::new();
    let call = graph.create_native_module_call(native.get(uid).unwrap());
    let output = graph.create_output(0);
    graph.add_edge(graph.call_output_port(call, 0), output).unwrap();

    let mut tasks = TaskFunctionRegistry::new();
    tasks.begin_registration();
    tasks.end_registration().unwrap();

    let result = build_task_graph(&graph, &native, &tasks);
    assert!(matches!(result, Err(BuildError::NoTaskMapping(_))));
}

#[test]
fn config_round_trips_through_toml() {
    let config = GraphDslConfig { max_optimizer_iterations: Some(128), verbose_dead_node_sweep: true };
    let toml = toml::to_string(&config).unwrap();
    let parsed = GraphDslConfig::from_toml_str(&toml).unwrap();
    assert_eq!(config, parsed);
}

#[test]
fn loading_config_from_a_missing_file_reports_read_error() {
    let result = GraphDslConfig::from_file("/nonexistent/path/graph-dsl.toml");
    assert!(matches!(result, Err(GraphDslConfigError::ReadFile { .. })));
}
