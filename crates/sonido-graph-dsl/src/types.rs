//! The primitive type, qualifier, and value model shared by the native
//! module registry, the execution graph, and the task graph builder.
//!
//! Everything in the compiler core is built on three primitive kinds (real,
//! bool, string), each optionally an array, paired with a qualifier that
//! says how an argument flows (`in`, `out`, or a compile-time `constant`).

use std::fmt;

/// One of the three primitive kinds a signal, constant, or task argument can
/// carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// 32-bit floating point signal or constant.
    Real,
    /// Boolean signal or constant.
    Bool,
    /// Owned string constant. Never a runtime signal.
    String,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Real => write!(f, "real"),
            Primitive::Bool => write!(f, "bool"),
            Primitive::String => write!(f, "string"),
        }
    }
}

/// A primitive, optionally arrayed. Arrays may only appear in `in`/`constant`
/// argument positions; task and native module outputs are always scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DataType {
    primitive: Primitive,
    is_array: bool,
}

impl DataType {
    /// A scalar data type of the given primitive.
    #[must_use]
    pub const fn scalar(primitive: Primitive) -> Self {
        Self { primitive, is_array: false }
    }

    /// An array data type of the given primitive.
    #[must_use]
    pub const fn array(primitive: Primitive) -> Self {
        Self { primitive, is_array: true }
    }

    /// The underlying primitive, ignoring array-ness.
    #[must_use]
    pub fn primitive(self) -> Primitive {
        self.primitive
    }

    /// True if this data type is an array of `primitive()`.
    #[must_use]
    pub fn is_array(self) -> bool {
        self.is_array
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_array {
            write!(f, "{}[]", self.primitive)
        } else {
            write!(f, "{}", self.primitive)
        }
    }
}

/// How an argument flows through a native module or task function call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Qualifier {
    /// A value consumed by the call.
    In,
    /// A value produced by the call.
    Out,
    /// An input that must resolve to a compile-time constant by the time
    /// optimization finishes; a non-constant survivor is a compile error.
    Constant,
    /// A single buffer both read on entry and overwritten on exit, used only
    /// by task-function arguments (native modules never declare `inout`
    /// directly — it arises from a task-function mapping pairing an input
    /// with an output).
    InOut,
}

/// A fingerprint identifying a native module uniquely across all registered
/// libraries. Comparison is by both halves; a `(library_id, module_id)` pair
/// is only meaningful once the owning library has been registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeModuleId {
    /// Identifier of the library this module belongs to.
    pub library_id: u32,
    /// Identifier of the module within its library.
    pub module_id: u32,
}

impl NativeModuleId {
    /// Builds a new native module identifier.
    #[must_use]
    pub const fn new(library_id: u32, module_id: u32) -> Self {
        Self { library_id, module_id }
    }
}

impl fmt::Display for NativeModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.library_id, self.module_id)
    }
}

/// A fingerprint identifying a task function uniquely across all registered
/// task-function libraries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskFunctionId {
    /// Identifier of the task function library.
    pub library_id: u32,
    /// Identifier of the task function within its library.
    pub function_id: u32,
}

impl TaskFunctionId {
    /// Builds a new task function identifier.
    #[must_use]
    pub const fn new(library_id: u32, function_id: u32) -> Self {
        Self { library_id, function_id }
    }
}

impl fmt::Display for TaskFunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.library_id, self.function_id)
    }
}

/// A fully evaluated compile-time value, either scalar or array. This is the
/// type the [`crate::constant_eval::ConstantEvaluator`] produces and the type
/// native module compile-time evaluators consume and return.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A scalar real value.
    Real(f32),
    /// A scalar boolean value.
    Bool(bool),
    /// A scalar string value.
    String(String),
    /// A real array, element order preserved.
    RealArray(Vec<f32>),
    /// A bool array, element order preserved.
    BoolArray(Vec<bool>),
    /// A string array, element order preserved.
    StringArray(Vec<String>),
}

impl Value {
    /// The data type of this value.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Real(_) => DataType::scalar(Primitive::Real),
            Value::Bool(_) => DataType::scalar(Primitive::Bool),
            Value::String(_) => DataType::scalar(Primitive::String),
            Value::RealArray(_) => DataType::array(Primitive::Real),
            Value::BoolArray(_) => DataType::array(Primitive::Bool),
            Value::StringArray(_) => DataType::array(Primitive::String),
        }
    }

    /// Returns the real value, panicking if this is not a scalar real.
    #[must_use]
    pub fn as_real(&self) -> f32 {
        match self {
            Value::Real(v) => *v,
            _ => panic!("value is not a real: {self:?}"),
        }
    }

    /// Returns the bool value, panicking if this is not a scalar bool.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(v) => *v,
            _ => panic!("value is not a bool: {self:?}"),
        }
    }

    /// Returns the string value, panicking if this is not a scalar string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Value::String(v) => v,
            _ => panic!("value is not a string: {self:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_display() {
        assert_eq!(DataType::scalar(Primitive::Real).to_string(), "real");
        assert_eq!(DataType::array(Primitive::Bool).to_string(), "bool[]");
    }

    #[test]
    fn native_module_id_equality_is_both_halves() {
        let a = NativeModuleId::new(1, 2);
        let b = NativeModuleId::new(1, 3);
        let c = NativeModuleId::new(2, 2);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, NativeModuleId::new(1, 2));
    }

    #[test]
    fn value_data_type_roundtrip() {
        assert_eq!(Value::Real(1.0).data_type(), DataType::scalar(Primitive::Real));
        assert_eq!(
            Value::RealArray(vec![1.0, 2.0]).data_type(),
            DataType::array(Primitive::Real)
        );
    }
}
