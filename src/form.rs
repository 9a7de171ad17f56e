use std::collections::BTreeMap;

use log::info;
use scraper::{ElementRef, Html};

use crate::html::parse_selector;
use crate::{normalize_text, CascadeError};

/// Every independent choice of a search form: input name -> value -> label.
pub type FormOptions = BTreeMap<String, BTreeMap<String, String>>;

/// Values the search form uses to say "any".
const ANY_VALUES: [&str; 3] = ["", "0", "-1"];

/// Lists all options of named selects and all named checkboxes of the form.
pub fn read_form(html: &str, form_id: &str) -> Result<FormOptions, CascadeError> {
    let document = Html::parse_document(html);
    let form = parse_selector(&format!("#{form_id}"))?;
    let form = document
        .select(&form)
        .next()
        .ok_or_else(|| CascadeError::FormNotFound(form_id.to_string()))?;
    let mut options = FormOptions::new();
    read_selects(form, &mut options)?;
    read_checkboxes(form, &mut options)?;
    info!(
        "form {form_id} has {} inputs, {} choices",
        options.len(),
        options.values().map(|values| values.len()).sum::<usize>()
    );
    Ok(options)
}

fn read_selects(form: ElementRef, result: &mut FormOptions) -> Result<(), CascadeError> {
    let selects = parse_selector("select[name]")?;
    let options = parse_selector("option")?;
    for select in form.select(&selects) {
        let name = match trimmed_attr(select, "name") {
            Some(name) => name,
            None => continue,
        };
        for option in select.select(&options) {
            let value = match trimmed_attr(option, "value") {
                Some(value) if !ANY_VALUES.contains(&value) => value,
                _ => continue,
            };
            let label = read_label(option);
            result
                .entry(name.to_string())
                .or_default()
                .insert(value.to_string(), label);
        }
    }
    Ok(())
}

fn read_checkboxes(form: ElementRef, result: &mut FormOptions) -> Result<(), CascadeError> {
    let checkboxes = parse_selector(r#"input[type="checkbox"]"#)?;
    let link = parse_selector("a")?;
    for checkbox in form.select(&checkboxes) {
        let name = match trimmed_attr(checkbox, "name") {
            Some(name) => name,
            None => continue,
        };
        let value = match trimmed_attr(checkbox, "value") {
            Some(value) => value,
            None => continue,
        };
        // the caption of checkbox is a link placed in the same table cell
        let caption = checkbox
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().name() == "td")
            .and_then(|cell| cell.select(&link).next())
            .ok_or_else(|| CascadeError::AttributeNotFound {
                element: format!("input[name={name}][value={value}]"),
                attribute: "caption".to_string(),
            })?;
        result
            .entry(name.to_string())
            .or_default()
            .insert(value.to_string(), read_label(caption));
    }
    Ok(())
}

fn trimmed_attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn read_label(element: ElementRef) -> String {
    let text = element.text().collect::<String>();
    // the site serves ñ as ń in some captions
    normalize_text(&text).replace('ń', "ñ")
}
