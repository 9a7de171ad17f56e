use scraper::{ElementRef, Html, Selector};

use crate::{CascadeError, Field, FieldOption};

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, CascadeError> {
    Selector::parse(selector)
        .map_err(|error| CascadeError::Selector(format!("{selector}, {error:?}")))
}

/// Reads a snapshot of cascade fields from `<select>` elements matched by selector.
///
/// see details: https://developer.mozilla.org/en-US/docs/Web/HTML/Element/select
pub fn read_fields(html: &str, selector: &str) -> Result<Vec<Field>, CascadeError> {
    let document = Html::parse_document(html);
    let selects = parse_selector(selector)?;
    let options = parse_selector("option")?;
    let mut fields = vec![];
    for select in document.select(&selects) {
        if select.value().name() != "select" {
            continue;
        }
        fields.push(read_field(select, &options)?);
    }
    if fields.is_empty() {
        return Err(CascadeError::FieldsNotFound(selector.to_string()));
    }
    Ok(fields)
}

fn read_field(select: ElementRef, options: &Selector) -> Result<Field, CascadeError> {
    let element = select.value();
    let name = element
        .attr("name")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| CascadeError::AttributeNotFound {
            element: describe(select),
            attribute: "name".to_string(),
        })?;
    let mut field = Field::new(name, vec![]);
    let mut selected = None;
    for (index, option) in select.select(options).enumerate() {
        let text = option.text().collect::<String>();
        // the value of option defaults to its text content
        let value = option.value().attr("value").unwrap_or(text.as_str());
        field.options.push(FieldOption::new(value, &text));
        if option.value().attr("selected").is_some() {
            selected = Some(index);
        }
    }
    field.reset();
    if selected.is_some() {
        field.selected = selected;
    }
    field.disabled = element.attr("disabled").is_some();
    Ok(field)
}

fn describe(element: ElementRef) -> String {
    let element = element.value();
    match element.id() {
        Some(id) => format!("{}#{id}", element.name()),
        None => element.name().to_string(),
    }
}
