//! Console rendering of log events
//!
//! Each event is printed as `<timestamp>: <message>`. In color mode a message
//! holding JSON is pretty-printed with ANSI colors; anything else is printed as-is.

#![warn(clippy::all, rust_2018_idioms)]

use serde_json::Value;
use std::io::{self, Write};

use super::data_plane::cloudwatch_logs::LogEvent;

const INDENT: &str = "  ";

const RESET: &str = "\x1b[0m";
const KEY: &str = "\x1b[34;1m";
const STRING: &str = "\x1b[32m";
const NUMBER: &str = "\x1b[36m";
const BOOLEAN: &str = "\x1b[33m";
const NULL: &str = "\x1b[90m";

/// Write one event followed by a newline
pub fn write_event<W: Write>(out: &mut W, event: &LogEvent, color: bool) -> io::Result<()> {
    write!(out, "{}: ", event.timestamp)?;

    let message = event.message.trim_end_matches('\n');
    match color.then(|| serde_json::from_str::<Value>(message).ok()).flatten() {
        Some(value) => out.write_all(colorize(&value).as_bytes())?,
        None => out.write_all(message.as_bytes())?,
    }

    out.write_all(b"\n")
}

/// Pretty-print a JSON value with ANSI colors
pub fn colorize(value: &Value) -> String {
    let mut rendered = String::new();
    render(value, 0, &mut rendered);
    rendered
}

fn render(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Null => paint(NULL, "null", out),
        Value::Bool(flag) => paint(BOOLEAN, &flag.to_string(), out),
        Value::Number(number) => paint(NUMBER, &number.to_string(), out),
        Value::String(text) => paint(STRING, &Value::String(text.clone()).to_string(), out),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) => {
            out.push_str("[\n");
            for (index, item) in items.iter().enumerate() {
                indent(depth + 1, out);
                render(item, depth + 1, out);
                separator(index, items.len(), out);
            }
            indent(depth, out);
            out.push(']');
        }
        Value::Object(fields) if fields.is_empty() => out.push_str("{}"),
        Value::Object(fields) => {
            out.push_str("{\n");
            for (index, (key, item)) in fields.iter().enumerate() {
                indent(depth + 1, out);
                paint(KEY, &Value::String(key.clone()).to_string(), out);
                out.push_str(": ");
                render(item, depth + 1, out);
                separator(index, fields.len(), out);
            }
            indent(depth, out);
            out.push('}');
        }
    }
}

fn paint(color: &str, text: &str, out: &mut String) {
    out.push_str(color);
    out.push_str(text);
    out.push_str(RESET);
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn separator(index: usize, len: usize, out: &mut String) {
    if index + 1 < len {
        out.push(',');
    }
    out.push('\n');
}
