//! Entry form parsing and validation
//!
//! Validation never fails the request: it yields at most one message per
//! field, which the handlers render inline next to the offending input.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use bpui_common::{Entry, Instruction};
use serde::Deserialize;

pub const ERR_BLANK_INPUT: &str = "You cannot leave this field blank";
pub const ERR_INVALID_INSTRUCTION: &str = "Instruction must be backup, nobackup or tempbackup";
pub const ERR_IGNORE_WITHOUT_BACKUP: &str = "Ignore can only be used with the backup instruction";
pub const ERR_ROOT_WITHOUT_SLASH: &str = "Reporting Root must start with a slash (/)";
pub const ERR_ROOT_NOT_DEEP_ENOUGH: &str = "Reporting Root must be at least five levels deep";
pub const ERR_DIRECTORY_NOT_IN_ROOT: &str = "Directory must be inside Reporting Root";

/// Minimum number of path segments in a reporting root
pub const MIN_ROOT_DEPTH: usize = 5;

/// Inputs of the entry edit/add forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    ReportingName,
    ReportingRoot,
    Directory,
    Instruction,
    Match,
    Ignore,
    Requestor,
    Faculty,
}

impl FormField {
    /// All fields in table column order
    pub const ALL: [FormField; 8] = [
        FormField::ReportingName,
        FormField::ReportingRoot,
        FormField::Directory,
        FormField::Instruction,
        FormField::Match,
        FormField::Ignore,
        FormField::Requestor,
        FormField::Faculty,
    ];

    /// Fields that may not be left blank
    pub const REQUIRED: [FormField; 6] = [
        FormField::ReportingName,
        FormField::ReportingRoot,
        FormField::Directory,
        FormField::Instruction,
        FormField::Requestor,
        FormField::Faculty,
    ];

    /// Name of the form input
    pub fn name(&self) -> &'static str {
        match self {
            FormField::ReportingName => "ReportingName",
            FormField::ReportingRoot => "ReportingRoot",
            FormField::Directory => "Directory",
            FormField::Instruction => "Instruction",
            FormField::Match => "Match",
            FormField::Ignore => "Ignore",
            FormField::Requestor => "Requestor",
            FormField::Faculty => "Faculty",
        }
    }

    /// Column heading shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            FormField::ReportingName => "Reporting Name",
            FormField::ReportingRoot => "Reporting Root",
            FormField::Directory => "Directory",
            FormField::Instruction => "Instruction",
            FormField::Match => "Match",
            FormField::Ignore => "Ignore",
            FormField::Requestor => "Requestor",
            FormField::Faculty => "Faculty",
        }
    }
}

/// Field → message, first error per field wins
pub type FieldErrors = BTreeMap<FormField, &'static str>;

/// Raw urlencoded form body; absent inputs are empty strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EntryForm {
    pub reporting_name: String,
    pub reporting_root: String,
    pub directory: String,
    pub instruction: String,
    #[serde(rename = "Match")]
    pub matches: String,
    pub ignore: String,
    pub requestor: String,
    pub faculty: String,
}

impl EntryForm {
    /// Trimmed value of `field`
    pub fn value(&self, field: FormField) -> &str {
        let raw = match field {
            FormField::ReportingName => &self.reporting_name,
            FormField::ReportingRoot => &self.reporting_root,
            FormField::Directory => &self.directory,
            FormField::Instruction => &self.instruction,
            FormField::Match => &self.matches,
            FormField::Ignore => &self.ignore,
            FormField::Requestor => &self.requestor,
            FormField::Faculty => &self.faculty,
        };
        raw.trim()
    }

    /// Build the entry this form describes
    ///
    /// Meant for forms that passed [`validate_form`]; an unknown instruction
    /// is still reported as an error rather than guessed.
    pub fn to_entry(&self, id: u16) -> bpui_common::Result<Entry> {
        Ok(Entry {
            id,
            reporting_name: self.value(FormField::ReportingName).to_string(),
            reporting_root: self.value(FormField::ReportingRoot).to_string(),
            directory: self.value(FormField::Directory).to_string(),
            instruction: self.value(FormField::Instruction).parse()?,
            matches: self.value(FormField::Match).to_string(),
            ignore: self.value(FormField::Ignore).to_string(),
            requestor: self.value(FormField::Requestor).to_string(),
            faculty: self.value(FormField::Faculty).to_string(),
        })
    }
}

impl From<&Entry> for EntryForm {
    fn from(entry: &Entry) -> Self {
        Self {
            reporting_name: entry.reporting_name.clone(),
            reporting_root: entry.reporting_root.clone(),
            directory: entry.directory.clone(),
            instruction: entry.instruction.to_string(),
            matches: entry.matches.clone(),
            ignore: entry.ignore.clone(),
            requestor: entry.requestor.clone(),
            faculty: entry.faculty.clone(),
        }
    }
}

/// Check a submitted form; an empty map means the form is valid
pub fn validate_form(form: &EntryForm) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for field in FormField::REQUIRED {
        if form.value(field).is_empty() {
            errors.insert(field, ERR_BLANK_INPUT);
        }
    }

    let instruction = form.value(FormField::Instruction);
    if instruction.parse::<Instruction>().is_err() {
        errors.entry(FormField::Instruction).or_insert(ERR_INVALID_INSTRUCTION);
    }

    if !form.value(FormField::Ignore).is_empty() && instruction != Instruction::Backup.as_str() {
        errors.entry(FormField::Ignore).or_insert(ERR_IGNORE_WITHOUT_BACKUP);
    }

    let root = form.value(FormField::ReportingRoot);
    let directory = form.value(FormField::Directory);

    if !root.starts_with('/') {
        errors.entry(FormField::ReportingRoot).or_insert(ERR_ROOT_WITHOUT_SLASH);
    }

    if path_depth(root) < MIN_ROOT_DEPTH {
        errors.entry(FormField::ReportingRoot).or_insert(ERR_ROOT_NOT_DEEP_ENOUGH);
    }

    if !is_within(root, directory) {
        errors.entry(FormField::Directory).or_insert(ERR_DIRECTORY_NOT_IN_ROOT);
    }

    errors
}

/// Number of non-empty `/`-separated segments
fn path_depth(path: &str) -> usize {
    path.split('/').filter(|part| !part.is_empty()).count()
}

/// Whether `dir` is `root` or lies below it, comparing paths lexically
fn is_within(root: &str, dir: &str) -> bool {
    let root = normalize(root);
    let dir = normalize(dir);

    if root.has_root() != dir.has_root() {
        return false;
    }

    dir.starts_with(&root)
}

/// Resolve `.` and `..` without touching the filesystem
fn normalize(path: &str) -> PathBuf {
    let mut out = PathBuf::new();

    for component in Path::new(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    out
}
