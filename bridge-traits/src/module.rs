//! Native module contract.
//!
//! A native module is a named bag of methods the host can invoke by name.
//! Every method takes positional dynamic arguments plus a [`Promise`] and
//! settles that promise exactly once.

use serde_json::{Number, Value};

use crate::error::{BridgeError, Result};
use crate::promise::Promise;

/// Positional arguments passed by the host.
pub type Arguments = Vec<Value>;

/// A module exposed to the host application layer.
///
/// `invoke` runs on whatever thread the host dispatches it to and may block
/// that thread. Implementations report failures by rejecting the promise,
/// never by panicking across the boundary.
pub trait NativeModule: Send + Sync {
    /// Name the host uses to look the module up (e.g. `"RNZcash"`).
    fn name(&self) -> &str;

    /// Methods this module answers to.
    fn method_names(&self) -> &[&'static str];

    /// Invokes `method` with `args`, settling `promise` with the outcome.
    fn invoke(&self, method: &str, args: Arguments, promise: Promise);

    fn has_method(&self, method: &str) -> bool {
        self.method_names().contains(&method)
    }
}

/// Conversion of a Rust value into a host argument.
///
/// JSON has no representation for infinity or NaN, so non-finite floats are
/// rejected here instead of degrading to `null`.
pub trait IntoArgument {
    fn into_argument(self) -> Result<Value>;
}

impl IntoArgument for Value {
    fn into_argument(self) -> Result<Value> {
        Ok(self)
    }
}

impl IntoArgument for f64 {
    fn into_argument(self) -> Result<Value> {
        Number::from_f64(self).map(Value::Number).ok_or_else(|| {
            BridgeError::InvalidArgument(format!("argument must be a finite number, got {}", self))
        })
    }
}

impl IntoArgument for f32 {
    fn into_argument(self) -> Result<Value> {
        f64::from(self).into_argument()
    }
}

macro_rules! lossless_argument {
    ($($ty:ty),*) => {
        $(
            impl IntoArgument for $ty {
                fn into_argument(self) -> Result<Value> {
                    Ok(Value::from(self))
                }
            }
        )*
    };
}

lossless_argument!(i8, i16, i32, i64, u8, u16, u32, u64, bool, String, &str);

/// Checks that exactly `expected` arguments were passed.
pub fn expect_arity(args: &[Value], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(BridgeError::InvalidArgument(format!(
            "expected {} argument(s), got {}",
            expected,
            args.len()
        )));
    }
    Ok(())
}

/// Extracts the numeric argument at `index`.
pub fn number_arg(args: &[Value], index: usize) -> Result<&Number> {
    match args.get(index) {
        Some(Value::Number(number)) => Ok(number),
        Some(other) => Err(BridgeError::InvalidArgument(format!(
            "argument {} must be a number, got {}",
            index,
            type_name(other)
        ))),
        None => Err(BridgeError::InvalidArgument(format!(
            "missing argument {}",
            index
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
