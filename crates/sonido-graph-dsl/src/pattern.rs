//! The optimization-rule pattern language (§4.2.1): a flat sequence of
//! symbols describing a subgraph shape to match (the rule's source) and a
//! subgraph shape to build in its place (the rule's target).

use crate::types::NativeModuleId;

/// Number of distinct `Variable`/`Constant` capture slots a single rule may
/// use. Small and fixed, matching the native module argument-count cap.
pub const MAX_CAPTURE_SLOTS: usize = 4;

/// One token in a rule's flat symbol sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum PatternSymbol {
    /// Begins a native-module sub-expression; followed by its arguments;
    /// terminated by [`PatternSymbol::ModuleEnd`].
    Module(NativeModuleId),
    /// Captures any non-constant subgraph in the numbered slot. On the
    /// source side this matches anything that is not a bare constant node;
    /// on the target side it re-emits the captured node.
    Variable(usize),
    /// Captures any constant (real/bool/array) subgraph in the numbered
    /// slot.
    Constant(usize),
    /// Literal match (source) / literal emission (target) of a real
    /// constant.
    RealValue(f32),
    /// Literal match (source) / literal emission (target) of a bool
    /// constant.
    BoolValue(bool),
    /// Target-only: followed by an array capture and an index capture; the
    /// emitted graph is the captured array's element at the captured index,
    /// resolved at rule-application time (§4.4.3).
    ArrayDereference,
    /// Closes the most recently opened [`PatternSymbol::Module`].
    ModuleEnd,
}

/// A registered rewrite rule: replace any subgraph matching `source` with the
/// subgraph described by `target`.
#[derive(Clone, Debug)]
pub struct OptimizationRule {
    /// The native module this rule is attached to (its calls are the only
    /// ones considered as match roots).
    pub module: NativeModuleId,
    /// The pattern to match, rooted at a call of `module`.
    pub source: Vec<PatternSymbol>,
    /// The pattern to build in place of a successful match.
    pub target: Vec<PatternSymbol>,
}

impl OptimizationRule {
    /// Builds a new rule. `source` must begin with `Module(module)` and end
    /// with the matching `ModuleEnd`; this is checked at registration time,
    /// not here, since that check needs the owning module's signature.
    #[must_use]
    pub fn new(module: NativeModuleId, source: Vec<PatternSymbol>, target: Vec<PatternSymbol>) -> Self {
        Self { module, source, target }
    }
}

/// Small fluent builder for assembling a pattern's flat symbol sequence,
/// matching the "const-constructable builder" recommended in the design
/// notes — rule bodies read as a sequence of chained calls rather than a
/// hand-assembled `Vec`.
#[derive(Clone, Debug, Default)]
pub struct PatternBuilder {
    symbols: Vec<PatternSymbol>,
}

impl PatternBuilder {
    /// Starts a new, empty pattern.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a module sub-expression.
    #[must_use]
    pub fn module(mut self, uid: NativeModuleId) -> Self {
        self.symbols.push(PatternSymbol::Module(uid));
        self
    }

    /// Captures a non-constant subgraph into the given variable slot.
    #[must_use]
    pub fn variable(mut self, slot: usize) -> Self {
        self.symbols.push(PatternSymbol::Variable(slot));
        self
    }

    /// Captures a constant subgraph into the given constant slot.
    #[must_use]
    pub fn constant(mut self, slot: usize) -> Self {
        self.symbols.push(PatternSymbol::Constant(slot));
        self
    }

    /// Matches (or emits) a literal real constant.
    #[must_use]
    pub fn real(mut self, value: f32) -> Self {
        self.symbols.push(PatternSymbol::RealValue(value));
        self
    }

    /// Matches (or emits) a literal bool constant.
    #[must_use]
    pub fn boolean(mut self, value: bool) -> Self {
        self.symbols.push(PatternSymbol::BoolValue(value));
        self
    }

    /// Target-only: dereferences a captured array at a captured index.
    #[must_use]
    pub fn array_dereference(mut self) -> Self {
        self.symbols.push(PatternSymbol::ArrayDereference);
        self
    }

    /// Closes the most recently opened module sub-expression.
    #[must_use]
    pub fn end_module(mut self) -> Self {
        self.symbols.push(PatternSymbol::ModuleEnd);
        self
    }

    /// Finishes building and returns the flat symbol sequence.
    #[must_use]
    pub fn build(self) -> Vec<PatternSymbol> {
        self.symbols
    }
}
