//! JSON-like text rendering of registry items.
//!
//! The output is not valid JSON in general:
//!
//! ```text
//! "items" : {
//!     "sub_item" : {
//! }
//!     "value_item" : "3.14"
//! }
//! ```
//!
//! Each child line is prefixed by the indentation unit repeated once per nesting level, while
//! closing braces are never indented.

use crate::item::{Contents, RegistryItem};

pub(crate) fn write_json(item: &RegistryItem, output: &mut String, indentation: &str, level: usize) {
    output.push('"');
    output.push_str(item.name());
    output.push_str("\" : ");

    match &*item.contents() {
        Contents::Value(slot) => match slot.value_string() {
            Some(value) => {
                output.push('"');
                output.push_str(&value);
                output.push_str("\"\n");
            }
            // An empty value slot renders like an empty item
            None => output.push_str("{\n}\n"),
        },
        Contents::Empty => output.push_str("{\n}\n"),
        Contents::Items(items) => {
            output.push_str("{\n");
            for child in items.values() {
                for _ in 0..=level {
                    output.push_str(indentation);
                }
                write_json(child, output, indentation, level + 1);
            }
            output.push_str("}\n");
        }
    }
}
