use serde::{Deserialize, Serialize};

/// One choice widget of a cascade, the equivalent of HTML `<select>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub options: Vec<FieldOption>,
    /// Index of the currently selected option.
    pub selected: Option<usize>,
    /// Locked fields are never advanced but still take part in recorded paths.
    pub disabled: bool,
}

impl Field {
    pub fn new(name: &str, options: Vec<FieldOption>) -> Self {
        let selected = if options.is_empty() { None } else { Some(0) };
        Self {
            name: name.to_string(),
            options,
            selected,
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    pub fn selected_option(&self) -> Option<&FieldOption> {
        self.selected.and_then(|index| self.options.get(index))
    }

    /// Index of the sibling right after the current selection, placeholders included.
    pub fn next_index(&self) -> Option<usize> {
        let index = match self.selected {
            Some(index) => index + 1,
            None => 0,
        };
        if index < self.options.len() {
            Some(index)
        } else {
            None
        }
    }

    pub fn next_option(&self) -> Option<&FieldOption> {
        self.next_index().map(|index| &self.options[index])
    }

    pub fn has_choices(&self) -> bool {
        self.options.iter().any(|option| !option.is_placeholder())
    }

    /// Replaces options and moves selection to the first one,
    /// as browsers do when select element is repopulated.
    pub fn repopulate(&mut self, options: Vec<FieldOption>) {
        self.options = options;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.selected = if self.options.is_empty() { None } else { Some(0) };
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.trim().to_string(),
            label: normalize_text(label),
        }
    }

    pub fn placeholder(label: &str) -> Self {
        Self::new("", label)
    }

    #[inline(always)]
    pub fn is_placeholder(&self) -> bool {
        is_placeholder(&self.value)
    }
}

/// Sentinel entries like `<option value="">-- choose --</option>` or
/// `<option value="-1">` must never be enumerated.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.starts_with('-')
}

/// Collapses whitespace runs to a single space, the way text content is displayed.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
