use tracing::{debug, warn};

use crate::error::WidgetError;
use crate::fill::matcher::{best_option, best_score_against};
use crate::form::classifier::{
    choice_options, dropdown_control, native_select_options, popup_options, text_control,
    visible_listboxes,
};
use crate::form::form_model::DropdownControl;
use crate::page::document::{DomEvent, FormDocument};
use crate::page::poll::{PollPolicy, poll_until};
use crate::template::template_model::FieldType;

/// What a checkbox pass changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckboxEffect {
    /// Options that should end up checked.
    pub selected: usize,
    /// Options whose state was flipped.
    pub toggled: usize,
}

/// Write `value` into the question's text control and notify the page.
pub fn apply_text<D: FormDocument>(
    doc: &mut D,
    container: D::Node,
    field_type: FieldType,
    value: &str,
) -> Result<(), WidgetError> {
    let control = text_control(doc, container, field_type).ok_or(WidgetError::MissingControl("text"))?;

    doc.focus(control)?;
    doc.set_value(control, value)?;
    doc.dispatch_event(control, DomEvent::Input)?;
    doc.dispatch_event(control, DomEvent::Change)?;
    Ok(())
}

/// Select the radio option closest to `desired`. An option that is already
/// selected is left alone.
pub fn apply_radio<D: FormDocument>(doc: &mut D, container: D::Node, desired: &str) -> Result<(), WidgetError> {
    let options = choice_options(doc, container, FieldType::Radio);
    if options.is_empty() {
        return Err(WidgetError::NoOptions);
    }

    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    let (idx, score) =
        best_option(desired, &labels).ok_or_else(|| WidgetError::NoMatchingOption(desired.to_string()))?;

    let option = &options[idx];
    debug!(option = %option.label, score, "radio choice");

    if !option.checked {
        doc.click(option.node)?;
    }
    Ok(())
}

/// Bring every checkbox option to its desired state.
///
/// An option should be checked when its best similarity against any desired
/// value reaches `threshold`; only options in the wrong state are toggled.
pub fn apply_checkbox<D: FormDocument>(
    doc: &mut D,
    container: D::Node,
    desired: &[String],
    threshold: f64,
) -> Result<CheckboxEffect, WidgetError> {
    let options = choice_options(doc, container, FieldType::Checkbox);
    if options.is_empty() {
        return Err(WidgetError::NoOptions);
    }

    let mut effect = CheckboxEffect::default();

    for option in &options {
        let score = best_score_against(&option.label, desired);
        let should_check = score >= threshold;
        if should_check {
            effect.selected += 1;
        }

        if should_check != option.checked {
            if let Err(e) = doc.click(option.node) {
                warn!(option = %option.label, error = %e, "checkbox toggle failed");
                continue;
            }
            effect.toggled += 1;
        }
    }

    Ok(effect)
}

/// Choose the dropdown entry closest to `desired`.
///
/// Native selects are set directly. Popup dropdowns are opened, polled for
/// their listbox, and dismissed again when nothing suitable shows up.
pub fn apply_dropdown<D: FormDocument>(
    doc: &mut D,
    container: D::Node,
    desired: &str,
    poll: &PollPolicy,
) -> Result<(), WidgetError> {
    match dropdown_control(doc, container).ok_or(WidgetError::MissingControl("dropdown"))? {
        DropdownControl::Native(select) => choose_native(doc, select, desired),
        DropdownControl::Popup(trigger) => choose_from_popup(doc, trigger, desired, poll),
    }
}

fn choose_native<D: FormDocument>(doc: &mut D, select: D::Node, desired: &str) -> Result<(), WidgetError> {
    let options = native_select_options(doc, select);
    if options.is_empty() {
        return Err(WidgetError::NoOptions);
    }

    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    let (idx, _) =
        best_option(desired, &labels).ok_or_else(|| WidgetError::NoMatchingOption(desired.to_string()))?;

    let option = options[idx].node;
    let value = doc
        .attribute(option, "value")
        .unwrap_or_else(|| options[idx].label.clone());

    doc.focus(select)?;
    doc.set_value(select, &value)?;
    doc.dispatch_event(select, DomEvent::Input)?;
    doc.dispatch_event(select, DomEvent::Change)?;
    Ok(())
}

fn choose_from_popup<D: FormDocument>(
    doc: &mut D,
    trigger: D::Node,
    desired: &str,
    poll: &PollPolicy,
) -> Result<(), WidgetError> {
    let open_before = visible_listboxes(doc);
    doc.click(trigger)?;

    let Some(options) = poll_until(doc, poll, |d| popup_options(d, trigger, &open_before)) else {
        doc.dismiss()?;
        return Err(WidgetError::PopupTimeout {
            waited_ms: poll.timeout_ms,
        });
    };

    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    match best_option(desired, &labels) {
        Some((idx, score)) => {
            debug!(option = %options[idx].label, score, "dropdown choice");
            doc.click(options[idx].node)
        }
        None => {
            doc.dismiss()?;
            Err(WidgetError::NoMatchingOption(desired.to_string()))
        }
    }
}
