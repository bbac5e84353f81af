use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::item::{Contents, RegistryItem};

/// Serializes the contents of an item: values as their string form, everything else as a map
/// from child names to their contents, in insertion order.
///
/// The item's own name is not part of the output, since it is the key under which the parent
/// serializes it.
impl Serialize for RegistryItem {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &*self.contents() {
            Contents::Value(slot) => match slot.value_string() {
                Some(value) => serializer.serialize_str(&value),
                None => serializer.serialize_map(Some(0))?.end(),
            },
            Contents::Empty => serializer.serialize_map(Some(0))?.end(),
            Contents::Items(items) => {
                let mut map = serializer.serialize_map(Some(items.len()))?;
                for (name, child) in items {
                    map.serialize_entry(name, child.as_ref())?;
                }
                map.end()
            }
        }
    }
}
