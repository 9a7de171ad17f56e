use log::debug;

use crate::{read_fields, Cascade, CascadeError, Field, FieldOption, SelectionPath};

/// Repopulates a dependent field once something before it has changed.
/// Upstream fields are already refreshed when the dependent is visited.
pub trait OptionSource {
    fn refresh(&mut self, field: &mut Field, upstream: &[Field]) -> Result<(), CascadeError>;
}

/// Options never change. A dependent returns to its first option and stays
/// locked while its parent is locked or shows a placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetSource;

impl OptionSource for ResetSource {
    fn refresh(&mut self, field: &mut Field, upstream: &[Field]) -> Result<(), CascadeError> {
        field.reset();
        field.disabled = match upstream.last() {
            Some(parent) => {
                parent.disabled
                    || parent
                        .selected_option()
                        .map_or(true, FieldOption::is_placeholder)
            }
            None => false,
        };
        Ok(())
    }
}

/// Data dependent options, the field is locked when nothing but placeholders came back.
impl<F> OptionSource for F
where
    F: FnMut(&str, &SelectionPath) -> Vec<FieldOption>,
{
    fn refresh(&mut self, field: &mut Field, upstream: &[Field]) -> Result<(), CascadeError> {
        let path = SelectionPath::read(upstream);
        let options = self(&field.name, &path);
        field.repopulate(options);
        field.disabled = !field.has_choices();
        Ok(())
    }
}

/// Cascade kept entirely in memory.
///
/// Selection only marks dependents as stale, they are repopulated on settle
/// the same way a page updates its dependent selects after a remote call.
pub struct MemoryCascade<S: OptionSource> {
    fields: Vec<Field>,
    source: S,
    pending: Option<usize>,
}

impl<S: OptionSource> MemoryCascade<S> {
    pub fn new(fields: Vec<Field>, source: S) -> Self {
        Self {
            fields,
            source,
            pending: None,
        }
    }

    pub fn from_html(html: &str, selector: &str, source: S) -> Result<Self, CascadeError> {
        let fields = read_fields(html, selector)?;
        Ok(Self::new(fields, source))
    }

    pub fn is_settled(&self) -> bool {
        self.pending.is_none()
    }

    fn index_of(&self, name: &str) -> Result<usize, CascadeError> {
        self.fields
            .iter()
            .position(|field| field.name == name)
            .ok_or_else(|| CascadeError::FieldNotFound(name.to_string()))
    }
}

impl<S: OptionSource> Cascade for MemoryCascade<S> {
    fn fields(&self) -> Result<Vec<Field>, CascadeError> {
        Ok(self.fields.clone())
    }

    fn select(&mut self, field: &str, option: usize) -> Result<(), CascadeError> {
        let index = self.index_of(field)?;
        let target = &mut self.fields[index];
        if option >= target.options.len() {
            return Err(CascadeError::OptionNotFound {
                field: field.to_string(),
                index: option,
            });
        }
        target.selected = Some(option);
        self.pending = Some(match self.pending {
            Some(pending) => pending.min(index),
            None => index,
        });
        Ok(())
    }

    fn settle(&mut self) -> Result<(), CascadeError> {
        let changed = match self.pending.take() {
            Some(changed) => changed,
            None => return Ok(()),
        };
        for index in changed + 1..self.fields.len() {
            let (upstream, dependents) = self.fields.split_at_mut(index);
            self.source.refresh(&mut dependents[0], upstream)?;
        }
        debug!(
            "cascade settled, {} dependents of {} refreshed",
            self.fields.len() - changed - 1,
            self.fields[changed].name
        );
        Ok(())
    }
}
