use std::collections::BTreeMap;

use log::warn;
use serde::de::Error;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{CascadeError, PathEntry, SelectionPath};

/// The key under which node label is stored in JSON representation.
pub const LABEL_KEY: &str = "_";

/// Nested mapping of every visited selection path:
/// field name -> option value -> node (label and next level fields).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultTree {
    root: Node,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub label: Option<String>,
    pub fields: BTreeMap<String, BTreeMap<String, Node>>,
}

impl Node {
    pub fn child(&self, name: &str, value: &str) -> Option<&Node> {
        self.fields.get(name).and_then(|values| values.get(value))
    }

    pub fn is_leaf(&self) -> bool {
        self.fields.values().all(|values| values.is_empty())
    }

    fn count(&self) -> usize {
        self.fields
            .values()
            .flat_map(|values| values.values())
            .map(|node| 1 + node.count())
            .sum()
    }

    fn count_leaves(&self) -> usize {
        self.fields
            .values()
            .flat_map(|values| values.values())
            .map(|node| {
                if node.is_leaf() {
                    1
                } else {
                    node.count_leaves()
                }
            })
            .sum()
    }

    fn walk(&self, prefix: &mut Vec<PathEntry>, queries: &mut Vec<SelectionPath>) {
        for (name, values) in &self.fields {
            for (value, node) in values {
                let label = node.label.clone().unwrap_or_default();
                prefix.push(PathEntry::new(name, value, &label));
                queries.push(SelectionPath {
                    entries: prefix.clone(),
                });
                node.walk(prefix, queries);
                prefix.pop();
            }
        }
    }

    fn from_value(value: &Value) -> Result<Node, String> {
        let object = match value.as_object() {
            Some(object) => object,
            None => return Err(format!("node must be object, got {value}")),
        };
        let mut node = Node::default();
        for (key, value) in object {
            if key == LABEL_KEY {
                match value.as_str() {
                    Some(label) => node.label = Some(label.to_string()),
                    None => return Err(format!("node label must be string, got {value}")),
                }
                continue;
            }
            let values = match value.as_object() {
                Some(values) => values,
                None => return Err(format!("field {key} must be object, got {value}")),
            };
            let mut children = BTreeMap::new();
            for (option, child) in values {
                children.insert(option.clone(), Node::from_value(child)?);
            }
            node.fields.insert(key.clone(), children);
        }
        Ok(node)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let length = self.fields.len() + self.label.is_some() as usize;
        let mut map = serializer.serialize_map(Some(length))?;
        if let Some(label) = self.label.as_ref() {
            map.serialize_entry(LABEL_KEY, label)?;
        }
        for (name, values) in &self.fields {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Node::from_value(&value).map_err(D::Error::custom)
    }
}

impl ResultTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Inserts every prefix of the path, creating intermediate levels as needed.
    /// Existing labels are kept, so recorded associations never change.
    ///
    /// Returns the number of newly created nodes.
    pub fn record(&mut self, path: &SelectionPath) -> usize {
        let mut created = 0;
        let mut node = &mut self.root;
        for entry in &path.entries {
            let values = node.fields.entry(entry.name.clone()).or_default();
            let child = values.entry(entry.value.clone()).or_insert_with(|| {
                created += 1;
                Node::default()
            });
            if child.label.is_none() {
                child.label = Some(entry.label.clone());
            } else if child.label.as_ref() != Some(&entry.label) {
                warn!(
                    "label conflict at {}={}, keep {:?} over {:?}",
                    entry.name, entry.value, child.label, entry.label
                );
            }
            node = child;
        }
        created
    }

    pub fn get(&self, path: &[(&str, &str)]) -> Option<&Node> {
        let mut node = &self.root;
        for (name, value) in path {
            node = node.child(name, value)?;
        }
        Some(node)
    }

    pub fn contains(&self, path: &[(&str, &str)]) -> bool {
        self.get(path).is_some()
    }

    pub fn label(&self, path: &[(&str, &str)]) -> Option<&str> {
        self.get(path).and_then(|node| node.label.as_deref())
    }

    /// Number of recorded nodes, each one is a distinct path.
    pub fn len(&self) -> usize {
        self.root.count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.fields.is_empty()
    }

    /// Number of complete paths, those ending at a node without next level.
    pub fn leaves(&self) -> usize {
        self.root.count_leaves()
    }

    /// Every distinct path prefix in sorted order, parents before children.
    pub fn queries(&self) -> Vec<SelectionPath> {
        let mut queries = vec![];
        self.root.walk(&mut vec![], &mut queries);
        queries
    }

    pub fn to_json(&self) -> Result<String, CascadeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CascadeError> {
        Ok(serde_json::from_str(json)?)
    }
}
