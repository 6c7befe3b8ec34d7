//! Human-readable rendering of call arguments for diagnostics

use crate::context::CallContext;
use crate::host::ScriptHost;
use crate::value::Value;

/// Render an object as its quoted tag, or `0` if it does not resolve
pub fn format_tag(tag: Option<&str>) -> String {
    match tag {
        Some(tag) => format!("\"{}\"", tag),
        None => "0".to_string(),
    }
}

/// Render one argument
pub fn format_value<H: ScriptHost + ?Sized>(value: &Value, host: &H, ctx: &CallContext) -> String {
    match value {
        Value::Void => "<void>".to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::String(v) => format!("\"{}\"", v),
        Value::Object(object) => {
            let tag = host.object_tag(*object, ctx.caller());
            format!("<object>({})", format_tag(tag.as_deref()))
        }
        Value::Vector(v) => format!("({}, {}, {})", v.x, v.y, v.z),
        Value::Struct(_) => "<struct>".to_string(),
        Value::EngineType(_) => "<engine>".to_string(),
        Value::ScriptState(_) => "<state>".to_string(),
    }
}

/// Render the full argument list, comma separated
pub fn format_params<H: ScriptHost + ?Sized>(ctx: &CallContext, host: &H) -> String {
    ctx.params()
        .iter()
        .map(|value| format_value(value, host, ctx))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Widest padding and most decimals a script may ask for
pub const MAX_FLOAT_WIDTH: usize = 256;

/// printf-style `%*.*f`: negative widths left-align
pub fn format_float(value: f32, width: i32, decimals: i32) -> String {
    let precision = (decimals.max(0) as usize).min(MAX_FLOAT_WIDTH);
    let pad = (width.unsigned_abs() as usize).min(MAX_FLOAT_WIDTH);
    if width < 0 {
        format!("{:<pad$.precision$}", value, pad = pad, precision = precision)
    } else {
        format!("{:>pad$.precision$}", value, pad = pad, precision = precision)
    }
}
