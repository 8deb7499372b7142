//! Document flattening
//!
//! Turns a nested document into dotted keys:
//! `{server: {port: 8080}}` becomes `server.port = 8080`.
//! Only mappings are expanded; sequences and scalars are leaves.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::property::{PropertySet, PropertyValue};
use crate::value::Value;

/// Flatten a document whose root must be a mapping
pub fn flatten(document: &Value) -> Result<PropertySet> {
    let map = document
        .as_mapping()
        .ok_or_else(|| Error::invalid_document_shape(document.type_name()))?;

    let mut properties = PropertySet::new();
    flatten_into(map, None, &mut properties);
    Ok(properties)
}

fn flatten_into(map: &IndexMap<String, Value>, parent: Option<&str>, out: &mut PropertySet) {
    for (key, value) in map {
        let current = match parent {
            Some(parent) => format!("{}.{}", parent, key),
            None => key.clone(),
        };

        match value {
            Value::Mapping(nested) => flatten_into(nested, Some(&current), out),
            leaf => {
                // Re-inserting a key keeps its original position but takes the new value
                out.insert(current, PropertyValue::from(leaf.clone()));
            }
        }
    }
}
