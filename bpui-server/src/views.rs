//! HTML templates
//!
//! Fragments are swapped into the page by htmx; only [`IndexTemplate`] is a
//! full document.

use askama::Template;
use bpui_common::{Entry, Instruction};

use crate::validate::{EntryForm, FieldErrors, FormField};

/// Full page; the table body loads itself from `/entries`
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub headings: Vec<&'static str>,
}

impl Default for IndexTemplate {
    fn default() -> Self {
        Self {
            headings: FormField::ALL.iter().map(FormField::label).collect(),
        }
    }
}

/// Read-only table rows
#[derive(Template)]
#[template(path = "rows.html")]
pub struct RowsTemplate<'a> {
    pub entries: &'a [Entry],
}

/// A single read-only row
#[derive(Template)]
#[template(path = "row.html")]
pub struct RowTemplate<'a> {
    pub entry: &'a Entry,
}

/// Row turned into inputs for editing entry `id`
#[derive(Template)]
#[template(path = "edit_row.html")]
pub struct EditRowTemplate {
    pub id: u16,
    pub fields: Vec<FieldView>,
}

impl EditRowTemplate {
    pub fn new(id: u16, form: &EntryForm, errors: &FieldErrors) -> Self {
        Self {
            id,
            fields: FieldView::for_form(form, errors),
        }
    }
}

/// Form for a new entry
#[derive(Template)]
#[template(path = "add_row.html")]
pub struct AddRowTemplate {
    pub headings: Vec<&'static str>,
    pub fields: Vec<FieldView>,
}

impl AddRowTemplate {
    pub fn new(form: &EntryForm, errors: &FieldErrors) -> Self {
        Self {
            headings: FormField::ALL.iter().map(FormField::label).collect(),
            fields: FieldView::for_form(form, errors),
        }
    }
}

/// Confirmation dialog shown before deleting
#[derive(Template)]
#[template(path = "delete_modal.html")]
pub struct DeleteModalTemplate<'a> {
    pub entry: &'a Entry,
}

/// Script closing the dialog and removing the deleted row
#[derive(Template)]
#[template(path = "delete_done.html")]
pub struct DeleteDoneTemplate {
    pub id: u16,
}

/// One input of an entry form, ready for rendering
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub error: Option<&'static str>,
    /// Choices for select inputs; empty for free text
    pub options: Vec<OptionView>,
}

pub struct OptionView {
    pub value: &'static str,
    pub selected: bool,
}

impl FieldView {
    fn for_form(form: &EntryForm, errors: &FieldErrors) -> Vec<FieldView> {
        FormField::ALL
            .iter()
            .map(|&field| {
                let value = form.value(field).to_string();

                let options = if field == FormField::Instruction {
                    Instruction::ALL
                        .iter()
                        .map(|instruction| OptionView {
                            value: instruction.as_str(),
                            selected: instruction.as_str() == value,
                        })
                        .collect()
                } else {
                    Vec::new()
                };

                FieldView {
                    name: field.name(),
                    label: field.label(),
                    value,
                    error: errors.get(&field).copied(),
                    options,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> Entry {
        Entry {
            id: 4,
            reporting_name: "<proj>".to_string(),
            reporting_root: "/a/b/c/d/e".to_string(),
            directory: "/a/b/c/d/e/f".to_string(),
            instruction: Instruction::NoBackup,
            matches: String::new(),
            ignore: String::new(),
            requestor: "alice".to_string(),
            faculty: "sci".to_string(),
        }
    }

    #[test]
    fn test_row_escapes_values() {
        let entry = entry();
        let html = RowTemplate { entry: &entry }.render().unwrap();

        assert!(html.contains(r#"data-id="4""#));
        assert!(html.contains("&lt;proj&gt;"));
        assert!(!html.contains("<proj>"));
    }

    #[test]
    fn test_edit_row_selects_current_instruction() {
        let entry = entry();
        let form = EntryForm::from(&entry);
        let html = EditRowTemplate::new(entry.id, &form, &FieldErrors::new())
            .render()
            .unwrap();

        assert!(html.contains(r#"<option value="nobackup" selected>"#));
        assert!(html.contains(r#"<option value="backup">"#));
        assert!(html.contains("/actions/submit/4"));
    }

    #[test]
    fn test_delete_done_targets_row() {
        let html = DeleteDoneTemplate { id: 12 }.render().unwrap();

        assert!(html.contains("<script>"));
        assert!(html.contains(r#"tr[data-id="12"]"#));
        assert!(html.contains("getElementById('modal')"));
    }

    #[test]
    fn test_add_row_shows_errors() {
        let mut errors = FieldErrors::new();
        errors.insert(FormField::Faculty, "Faculty is wrong");

        let html = AddRowTemplate::new(&EntryForm::default(), &errors)
            .render()
            .unwrap();

        assert!(html.contains("<table"));
        assert!(html.contains("Faculty is wrong"));
    }
}
