//! The execution graph: a directed acyclic multigraph of five node kinds,
//! stored as a tombstone arena so removed nodes can be swept in bulk and
//! indices stay stable until the caller explicitly asks for a `compact()`.
//!
//! The arena shape (`Vec<Option<NodeData>>` / `Vec<Option<EdgeData>>`, dense
//! id newtypes with an `index()` accessor) follows
//! `sonido_core::graph::processing::ProcessingGraph` and its `NodeId`/`EdgeId`
//! types; the node/edge *kinds* are specific to the compiler's dataflow IR
//! rather than to an audio routing DAG.

use std::collections::HashMap;

use thiserror::Error;

use crate::native_module::NativeModule;
use crate::types::{DataType, NativeModuleId, Primitive};

/// Unique identifier for a node in the execution graph. Stable until the
/// graph is [`ExecutionGraph::compact`]ed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the raw numeric identifier.
    #[must_use]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Unique identifier for an edge in the execution graph. Stable until the
/// graph is [`ExecutionGraph::compact`]ed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeId(pub(crate) u32);

impl EdgeId {
    /// Returns the raw numeric identifier.
    #[must_use]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// A constant node's payload. `Array` carries no inline value — its elements
/// are the node's incoming edges, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
    /// Scalar real constant.
    Real(f32),
    /// Scalar bool constant.
    Bool(bool),
    /// Scalar string constant.
    String(String),
    /// Array constant; elements are this node's incoming edges.
    Array,
}

/// The role a node plays in the dataflow graph (§3).
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// An immediate value, or an array whose elements are incoming edges.
    Constant(ConstantValue),
    /// A call to a native module. Incoming edges are its indexed-input
    /// ports (dense, one per input argument); outgoing edges are its
    /// indexed-output ports (dense, one per output argument).
    NativeModuleCall(NativeModuleId),
    /// A synthetic port representing one input slot of `call`. `arg_index`
    /// is the argument's position in the *full* native module signature
    /// (inputs and outputs interleaved), not a dense input-only index.
    IndexedInput {
        /// The call this port belongs to.
        call: NodeId,
        /// Position in the owning module's full argument list.
        arg_index: usize,
    },
    /// A synthetic port representing one output slot of `call`.
    IndexedOutput {
        /// The call this port belongs to.
        call: NodeId,
        /// Position in the owning module's full argument list.
        arg_index: usize,
    },
    /// A graph output sink.
    Output {
        /// Index of this output among the graph's outputs.
        output_index: usize,
    },
}

impl NodeKind {
    fn remap_call_ref(&mut self, map: &[Option<NodeId>]) {
        match self {
            NodeKind::IndexedInput { call, .. } | NodeKind::IndexedOutput { call, .. } => {
                *call = map[call.index() as usize].expect("port references a tombstoned call");
            }
            NodeKind::Constant(_) | NodeKind::NativeModuleCall(_) | NodeKind::Output { .. } => {}
        }
    }
}

#[derive(Clone, Debug)]
struct NodeData {
    kind: NodeKind,
    data_type: DataType,
    incoming: Vec<EdgeId>,
    outgoing: Vec<EdgeId>,
}

#[derive(Clone, Copy, Debug)]
struct EdgeData {
    from: NodeId,
    to: NodeId,
}

/// Errors raised by [`ExecutionGraph`]'s mutation API.
#[derive(Debug, Error)]
pub enum GraphEditError {
    /// An edge referenced a node that is not live (never existed, or was
    /// already removed).
    #[error("node {0:?} is not live")]
    DeadNode(NodeId),

    /// An edge was added into an indexed-input port that already has a
    /// producer; ports accept exactly one incoming edge.
    #[error("indexed input port {0:?} already has a value")]
    InputPortFull(NodeId),
}

/// A directed acyclic multigraph of dataflow nodes (§3, §4.1).
#[derive(Default)]
pub struct ExecutionGraph {
    nodes: Vec<Option<NodeData>>,
    edges: Vec<Option<EdgeData>>,
}

impl ExecutionGraph {
    /// Creates an empty execution graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push_node(&mut self, kind: NodeKind, data_type: DataType) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(NodeData { kind, data_type, incoming: Vec::new(), outgoing: Vec::new() }));
        id
    }

    fn node_data(&self, node: NodeId) -> &NodeData {
        self.nodes[node.index() as usize].as_ref().expect("node is not live")
    }

    fn node_data_mut(&mut self, node: NodeId) -> &mut NodeData {
        self.nodes[node.index() as usize].as_mut().expect("node is not live")
    }

    fn check_live(&self, node: NodeId) -> Result<(), GraphEditError> {
        if self.is_live(node) {
            Ok(())
        } else {
            Err(GraphEditError::DeadNode(node))
        }
    }

    /// Creates a real-valued constant node.
    pub fn create_constant_real(&mut self, value: f32) -> NodeId {
        self.push_node(NodeKind::Constant(ConstantValue::Real(value)), DataType::scalar(Primitive::Real))
    }

    /// Creates a bool-valued constant node.
    pub fn create_constant_bool(&mut self, value: bool) -> NodeId {
        self.push_node(NodeKind::Constant(ConstantValue::Bool(value)), DataType::scalar(Primitive::Bool))
    }

    /// Creates a string-valued constant node.
    pub fn create_constant_string(&mut self, value: impl Into<String>) -> NodeId {
        self.push_node(NodeKind::Constant(ConstantValue::String(value.into())), DataType::scalar(Primitive::String))
    }

    /// Creates an array constant node of the given element primitive. Callers
    /// must wire its elements with [`ExecutionGraph::add_edge`] afterward, one
    /// edge per element in order.
    pub fn create_constant_array(&mut self, element_primitive: Primitive) -> NodeId {
        self.push_node(NodeKind::Constant(ConstantValue::Array), DataType::array(element_primitive))
    }

    /// Creates a native-module-call node along with its indexed input and
    /// output ports, wired per the module's signature.
    pub fn create_native_module_call(&mut self, module: &NativeModule) -> NodeId {
        let call = self.push_node(NodeKind::NativeModuleCall(module.uid), DataType::scalar(Primitive::Bool));
        for (arg_index, arg) in module.arguments.iter().enumerate() {
            if arg.is_input() {
                let port = self.push_node(NodeKind::IndexedInput { call, arg_index }, arg.data_type);
                self.connect_unchecked(port, call);
            } else {
                let port = self.push_node(NodeKind::IndexedOutput { call, arg_index }, arg.data_type);
                self.connect_unchecked(call, port);
            }
        }
        call
    }

    /// Creates a graph-output sink node. Callers wire its single producer
    /// edge with [`ExecutionGraph::add_edge`].
    pub fn create_output(&mut self, output_index: usize) -> NodeId {
        self.push_node(NodeKind::Output { output_index }, DataType::scalar(Primitive::Real))
    }

    fn connect_unchecked(&mut self, from: NodeId, to: NodeId) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Some(EdgeData { from, to }));
        self.node_data_mut(from).outgoing.push(id);
        self.node_data_mut(to).incoming.push(id);
        id
    }

    /// Adds a directed edge `from -> to`. Rejects edges into an already-full
    /// indexed-input port, or edges touching a dead node.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<EdgeId, GraphEditError> {
        self.check_live(from)?;
        self.check_live(to)?;
        if matches!(self.node_data(to).kind, NodeKind::IndexedInput { .. }) && !self.node_data(to).incoming.is_empty()
        {
            return Err(GraphEditError::InputPortFull(to));
        }
        Ok(self.connect_unchecked(from, to))
    }

    fn destroy_edge(&mut self, edge_id: EdgeId) {
        let Some(edge) = self.edges[edge_id.index() as usize].take() else { return };
        if let Some(data) = self.nodes[edge.from.index() as usize].as_mut() {
            data.outgoing.retain(|&e| e != edge_id);
        }
        if let Some(data) = self.nodes[edge.to.index() as usize].as_mut() {
            data.incoming.retain(|&e| e != edge_id);
        }
    }

    /// Removes an edge.
    pub fn remove_edge(&mut self, edge_id: EdgeId) {
        self.destroy_edge(edge_id);
    }

    /// Tombstones a node and every edge touching it. If `node` is a
    /// native-module-call, its indexed-input and indexed-output port nodes
    /// are tombstoned too (ports have no independent lifetime). Callers are
    /// responsible for re-routing any edges they want preserved before
    /// calling this — e.g. constant folding reroutes a call's output
    /// consumers to the new constant before removing the call.
    pub fn remove_node(&mut self, node: NodeId) {
        let Some(data) = self.nodes[node.index() as usize].take() else { return };

        let mut port_nodes = Vec::new();
        if matches!(data.kind, NodeKind::NativeModuleCall(_)) {
            for &edge_id in &data.incoming {
                if let Some(edge) = self.edges[edge_id.index() as usize] {
                    port_nodes.push(edge.from);
                }
            }
            for &edge_id in &data.outgoing {
                if let Some(edge) = self.edges[edge_id.index() as usize] {
                    port_nodes.push(edge.to);
                }
            }
        }

        for edge_id in data.incoming.into_iter().chain(data.outgoing) {
            self.destroy_edge(edge_id);
        }

        for port in port_nodes {
            self.remove_node(port);
        }
    }

    /// True if `node` refers to a live (non-tombstoned, in-range) node.
    #[must_use]
    pub fn is_live(&self, node: NodeId) -> bool {
        self.nodes.get(node.index() as usize).is_some_and(Option::is_some)
    }

    /// Iterates the ids of every live node, in arena order.
    pub fn live_node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, slot)| slot.is_some().then_some(NodeId(i as u32)))
    }

    /// Upper bound on live node ids (arena length, including tombstones).
    #[must_use]
    pub fn node_capacity(&self) -> usize {
        self.nodes.len()
    }

    /// The kind of a live node.
    #[must_use]
    pub fn node_kind(&self, node: NodeId) -> &NodeKind {
        &self.node_data(node).kind
    }

    /// The data type of a live node.
    #[must_use]
    pub fn data_type(&self, node: NodeId) -> DataType {
        self.node_data(node).data_type
    }

    /// True if `node` is any kind of constant (scalar or array).
    #[must_use]
    pub fn is_constant(&self, node: NodeId) -> bool {
        matches!(self.node_kind(node), NodeKind::Constant(_))
    }

    /// The native module uid of a call node.
    ///
    /// # Panics
    /// Panics if `node` is not a `NativeModuleCall`.
    #[must_use]
    pub fn module_uid(&self, node: NodeId) -> NativeModuleId {
        match self.node_kind(node) {
            NodeKind::NativeModuleCall(uid) => *uid,
            other => panic!("node is not a native module call: {other:?}"),
        }
    }

    /// This node's incoming edges, in arena order.
    #[must_use]
    pub fn incoming_edges(&self, node: NodeId) -> &[EdgeId] {
        &self.node_data(node).incoming
    }

    /// This node's outgoing edges, in arena order.
    #[must_use]
    pub fn outgoing_edges(&self, node: NodeId) -> &[EdgeId] {
        &self.node_data(node).outgoing
    }

    /// Number of incoming edges.
    #[must_use]
    pub fn incoming_count(&self, node: NodeId) -> usize {
        self.node_data(node).incoming.len()
    }

    /// Number of outgoing edges.
    #[must_use]
    pub fn outgoing_count(&self, node: NodeId) -> usize {
        self.node_data(node).outgoing.len()
    }

    /// The source endpoint of an edge.
    #[must_use]
    pub fn edge_from(&self, edge: EdgeId) -> NodeId {
        self.edges[edge.index() as usize].expect("edge is not live").from
    }

    /// The destination endpoint of an edge.
    #[must_use]
    pub fn edge_to(&self, edge: EdgeId) -> NodeId {
        self.edges[edge.index() as usize].expect("edge is not live").to
    }

    /// Source node of the `dense_index`-th element of `node`'s incoming
    /// edges.
    #[must_use]
    pub fn nth_incoming_source(&self, node: NodeId, dense_index: usize) -> NodeId {
        self.edge_from(self.incoming_edges(node)[dense_index])
    }

    /// Destination node of the `dense_index`-th element of `node`'s outgoing
    /// edges.
    #[must_use]
    pub fn nth_outgoing_target(&self, node: NodeId, dense_index: usize) -> NodeId {
        self.edge_to(self.outgoing_edges(node)[dense_index])
    }

    /// The indexed-input port carrying `call`'s `dense_index`-th input
    /// argument (a dense counter over input args only).
    #[must_use]
    pub fn call_input_port(&self, call: NodeId, dense_index: usize) -> NodeId {
        self.nth_incoming_source(call, dense_index)
    }

    /// Hops through the input port to the node actually producing `call`'s
    /// `dense_index`-th input value.
    #[must_use]
    pub fn call_input_source(&self, call: NodeId, dense_index: usize) -> NodeId {
        let port = self.call_input_port(call, dense_index);
        self.nth_incoming_source(port, 0)
    }

    /// The indexed-output port carrying `call`'s `dense_index`-th output
    /// argument (a dense counter over output args only).
    #[must_use]
    pub fn call_output_port(&self, call: NodeId, dense_index: usize) -> NodeId {
        self.nth_outgoing_target(call, dense_index)
    }

    /// True if `node`'s incoming edges should be treated as an ordered,
    /// directly-indexable element list rather than a single producer — true
    /// for native-module-calls (indexed-input ports) and array constants
    /// (direct element edges).
    #[must_use]
    pub fn uses_indexed_inputs(&self, node: NodeId) -> bool {
        matches!(self.node_kind(node), NodeKind::NativeModuleCall(_) | NodeKind::Constant(ConstantValue::Array))
    }

    /// True if `node`'s outgoing edges should be treated the same way —
    /// true for native-module-calls (indexed-output ports); array constants
    /// have no indexed outputs of their own.
    #[must_use]
    pub fn uses_indexed_outputs(&self, node: NodeId) -> bool {
        matches!(self.node_kind(node), NodeKind::NativeModuleCall(_))
    }

    /// Reads a scalar real constant's value.
    ///
    /// # Panics
    /// Panics if `node` is not `Constant(Real)`.
    #[must_use]
    pub fn constant_real_value(&self, node: NodeId) -> f32 {
        match self.node_kind(node) {
            NodeKind::Constant(ConstantValue::Real(v)) => *v,
            other => panic!("node is not a real constant: {other:?}"),
        }
    }

    /// Reads a scalar bool constant's value.
    ///
    /// # Panics
    /// Panics if `node` is not `Constant(Bool)`.
    #[must_use]
    pub fn constant_bool_value(&self, node: NodeId) -> bool {
        match self.node_kind(node) {
            NodeKind::Constant(ConstantValue::Bool(v)) => *v,
            other => panic!("node is not a bool constant: {other:?}"),
        }
    }

    /// Reads a scalar string constant's value.
    ///
    /// # Panics
    /// Panics if `node` is not `Constant(String)`.
    #[must_use]
    pub fn constant_string_value(&self, node: NodeId) -> &str {
        match self.node_kind(node) {
            NodeKind::Constant(ConstantValue::String(v)) => v,
            other => panic!("node is not a string constant: {other:?}"),
        }
    }

    /// Iterates an array constant's element source nodes, in order.
    ///
    /// # Panics
    /// Panics if `node` is not `Constant(Array)`.
    pub fn array_element_sources(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        assert!(
            matches!(self.node_kind(node), NodeKind::Constant(ConstantValue::Array)),
            "node is not an array constant"
        );
        self.incoming_edges(node).iter().map(|&e| self.edge_from(e))
    }

    /// Re-routes every outgoing edge of `old_source` so that it originates
    /// from `new_source` instead, leaving the consumer end untouched. Used
    /// by constant folding and rule application to splice a new node in for
    /// an old one without visiting every consumer individually.
    pub fn reroute_consumers(&mut self, old_source: NodeId, new_source: NodeId) {
        let edges: Vec<EdgeId> = std::mem::take(&mut self.node_data_mut(old_source).outgoing);
        for edge_id in edges {
            if let Some(edge) = self.edges[edge_id.index() as usize].as_mut() {
                edge.from = new_source;
            }
            self.node_data_mut(new_source).outgoing.push(edge_id);
        }
    }

    /// Renumbers live nodes and edges densely starting at zero, rewriting
    /// every stored reference (edge endpoints, port `call` backlinks).
    /// Tombstones disappear; no other observable state changes.
    pub fn compact(&mut self) {
        let old_nodes = std::mem::take(&mut self.nodes);
        let old_edges = std::mem::take(&mut self.edges);

        let mut node_map: Vec<Option<NodeId>> = vec![None; old_nodes.len()];
        let mut new_nodes = Vec::with_capacity(old_nodes.len());
        for (old_index, slot) in old_nodes.into_iter().enumerate() {
            if let Some(data) = slot {
                node_map[old_index] = Some(NodeId(new_nodes.len() as u32));
                new_nodes.push(Some(data));
            }
        }

        let mut edge_map: Vec<Option<EdgeId>> = vec![None; old_edges.len()];
        let mut new_edges = Vec::with_capacity(old_edges.len());
        for (old_index, slot) in old_edges.into_iter().enumerate() {
            if let Some(edge) = slot {
                let from = node_map[edge.from.index() as usize].expect("edge references a tombstoned node");
                let to = node_map[edge.to.index() as usize].expect("edge references a tombstoned node");
                edge_map[old_index] = Some(EdgeId(new_edges.len() as u32));
                new_edges.push(Some(EdgeData { from, to }));
            }
        }

        for slot in &mut new_nodes {
            if let Some(data) = slot {
                data.kind.remap_call_ref(&node_map);
                data.incoming =
                    data.incoming.iter().map(|e| edge_map[e.index() as usize].expect("live edge")).collect();
                data.outgoing =
                    data.outgoing.iter().map(|e| edge_map[e.index() as usize].expect("live edge")).collect();
            }
        }

        self.nodes = new_nodes;
        self.edges = new_edges;
    }
}
