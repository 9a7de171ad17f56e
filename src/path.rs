use serde::{Deserialize, Serialize};

use crate::{is_placeholder, Field};

/// The active choice at one cascade level.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathEntry {
    pub name: String,
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub disabled: bool,
}

impl PathEntry {
    pub fn new(name: &str, value: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            label: label.to_string(),
            disabled: false,
        }
    }
}

/// Ordered selections from outermost to innermost field.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SelectionPath {
    pub entries: Vec<PathEntry>,
}

impl SelectionPath {
    pub fn new() -> Self {
        Self { entries: vec![] }
    }

    /// Reads selections of all fields in order, locked ones included.
    /// Fields without selection or with placeholder selected are skipped.
    pub fn read(fields: &[Field]) -> Self {
        let mut entries = vec![];
        for field in fields {
            let option = match field.selected_option() {
                Some(option) => option,
                None => continue,
            };
            if is_placeholder(&option.value) {
                continue;
            }
            entries.push(PathEntry {
                name: field.name.trim().to_string(),
                value: option.value.trim().to_string(),
                label: option.label.clone(),
                disabled: field.disabled,
            });
        }
        Self { entries }
    }

    pub fn push(&mut self, entry: PathEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&PathEntry> {
        self.entries.last()
    }

    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value.as_str())
    }

    /// Renders path as search form parameters, `ALL` when nothing is selected.
    pub fn to_query_string(&self) -> String {
        let pairs: Vec<_> = self
            .entries
            .iter()
            .filter(|entry| !entry.name.starts_with('_'))
            .map(|entry| format!("{}={}", entry.name, entry.value))
            .collect();
        if pairs.is_empty() {
            return "ALL".to_string();
        }
        pairs.join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldOption;

    #[test]
    pub fn test_read_skips_placeholders() {
        let fields = vec![field("A", &["a1"], 0), field("B", &["", "b1"], 0)];
        let path = SelectionPath::read(&fields);
        assert_eq!(path.len(), 1);
        assert_eq!(path.value_of("A"), Some("a1"));
        assert_eq!(path.value_of("B"), None);
    }

    #[test]
    pub fn test_read_keeps_locked_fields() {
        let fields = vec![
            field("A", &["a1"], 0),
            field("B", &["b1", "b2"], 1).disabled(true),
            field("C", &["c1"], 0),
        ];
        let path = SelectionPath::read(&fields);
        let names: Vec<_> = path.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert!(path.entries[1].disabled);
        assert_eq!(path.entries[1].value, "b2");
    }

    #[test]
    pub fn test_read_keeps_trailing_locked_field() {
        let fields = vec![field("A", &["a1"], 0), field("B", &["b1"], 0).disabled(true)];
        let path = SelectionPath::read(&fields);
        assert_eq!(path.last().map(|e| e.name.as_str()), Some("B"));
    }

    #[test]
    pub fn test_query_string() {
        let mut path = SelectionPath::new();
        assert_eq!(path.to_query_string(), "ALL");
        path.push(PathEntry::new("tipo", "1", "Uno"));
        path.push(PathEntry::new("nivel", "2", "Dos"));
        assert_eq!(path.to_query_string(), "tipo=1&nivel=2");
    }

    #[test]
    pub fn test_query_string_of_hidden_entries() {
        let mut path = SelectionPath::new();
        path.push(PathEntry::new("_token", "abc", "abc"));
        path.push(PathEntry::new("_page", "2", "2"));
        assert_eq!(path.to_query_string(), "ALL");
        path.push(PathEntry::new("tipo", "1", "Uno"));
        assert_eq!(path.to_query_string(), "tipo=1");
    }

    fn field(name: &str, values: &[&str], selected: usize) -> Field {
        let options = values
            .iter()
            .map(|value| FieldOption::new(value, value))
            .collect();
        let mut field = Field::new(name, options);
        field.selected = Some(selected);
        field
    }
}
