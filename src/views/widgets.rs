// ============================================================================
// WIDGETS - Small building blocks shared by the screens
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{field_value, on_change, on_click, on_value, set_text_content, ElementBuilder};
use crate::viewmodels::ValidationErrors;

pub fn button<F>(label: &str, class: &str, handler: F) -> Result<Element, JsValue>
where
    F: FnMut(web_sys::MouseEvent) + 'static,
{
    let button = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class(class)
        .text(label)
        .build();
    on_click(&button, handler)?;
    Ok(button)
}

/// `<div class="form-group">` with label, control and an error slot.
/// Returns the group and the error slot.
pub fn form_group(label: &str, control: &Element) -> Result<(Element, Element), JsValue> {
    let error = ElementBuilder::new("span")?.class("field-error").build();
    let group = ElementBuilder::new("div")?
        .class("form-group")
        .child(ElementBuilder::new("label")?.text(label).build())?
        .child(control.clone())?
        .child(error.clone())?
        .build();
    Ok((group, error))
}

/// Form group whose control writes into `form` through `setter`. Text
/// inputs update on every keystroke, selects on change.
pub fn bound_field<F: 'static>(
    form: &Rc<RefCell<F>>,
    label: &str,
    control: Element,
    setter: fn(&mut F, String),
) -> Result<(Element, Element), JsValue> {
    let is_select = control.tag_name().eq_ignore_ascii_case("select");
    let target = form.clone();
    if is_select {
        let field = control.clone();
        on_change(&control, move |_| {
            setter(&mut target.borrow_mut(), field_value(&field))
        })?;
    } else {
        on_value(&control, move |value| setter(&mut target.borrow_mut(), value))?;
    }
    form_group(label, &control)
}

/// Writes each field's message into its slot and clears the others.
pub fn show_errors(slots: &[(&'static str, Element)], errors: &ValidationErrors) {
    for (field, slot) in slots {
        set_text_content(slot, errors.get(field).unwrap_or_default());
    }
}

pub fn text_input(kind: &str, value: &str, placeholder: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("input")?
        .attr("type", kind)?
        .attr("value", value)?
        .attr("placeholder", placeholder)?
        .class("form-control")
        .build())
}

/// `options` are `(value, label)` pairs.
pub fn select(options: &[(&str, &str)], selected: &str) -> Result<Element, JsValue> {
    let select = ElementBuilder::new("select")?.class("form-control").build();
    for (value, label) in options {
        let option = ElementBuilder::new("option")?
            .attr("value", value)?
            .flag("selected", *value == selected)?
            .text(label)
            .build();
        select.append_child(&option)?;
    }
    Ok(select)
}

pub fn checkbox(label: &str, checked: bool) -> Result<(Element, Element), JsValue> {
    let input = ElementBuilder::new("input")?
        .attr("type", "checkbox")?
        .flag("checked", checked)?
        .build();
    let wrapper = ElementBuilder::new("label")?
        .class("checkbox")
        .child(input.clone())?
        .child(ElementBuilder::new("span")?.text(label).build())?
        .build();
    Ok((wrapper, input))
}

pub fn spinner(text: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("spinner")
        .child(ElementBuilder::new("div")?.class("spinner-circle").build())?
        .child(ElementBuilder::new("p")?.text(text).build())?
        .build())
}

pub fn empty_state(text: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?.class("empty-state").text(text).build())
}

pub fn stat_card(icon: &str, label: &str, value: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("stat-card")
        .child(ElementBuilder::new("div")?.class("stat-icon").text(icon).build())?
        .child(ElementBuilder::new("div")?.class("stat-value").text(value).build())?
        .child(ElementBuilder::new("div")?.class("stat-label").text(label).build())?
        .build())
}

/// `<tr>` of plain text cells
pub fn text_row(cells: &[&str]) -> Result<Element, JsValue> {
    let row = ElementBuilder::new("tr")?.build();
    for cell in cells {
        row.append_child(&ElementBuilder::new("td")?.text(cell).build())?;
    }
    Ok(row)
}

pub fn table_head(columns: &[&str]) -> Result<Element, JsValue> {
    let row = ElementBuilder::new("tr")?.build();
    for column in columns {
        row.append_child(&ElementBuilder::new("th")?.text(column).build())?;
    }
    Ok(ElementBuilder::new("thead")?.child(row)?.build())
}

/// Modal overlay mounted on `<body>`. Returns the overlay and its body slot.
pub fn dialog(title: &str) -> Result<(Element, Element), JsValue> {
    let content = ElementBuilder::new("div")?.class("dialog-body").build();
    let overlay = ElementBuilder::new("div")?
        .class("dialog-overlay")
        .child(
            ElementBuilder::new("div")?
                .class("dialog")
                .attr("role", "dialog")?
                .child(ElementBuilder::new("h2")?.class("dialog-title").text(title).build())?
                .child(content.clone())?
                .build(),
        )?
        .build();
    Ok((overlay, content))
}
