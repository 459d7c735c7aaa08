//! Completion percentages for the progress header and the tab strip.
use crate::document::{DocumentModel, MetaField};
use crate::flat::{FlatForm, StudentField, DOCUMENTATION_KEYS};

/// Metadata the structured store requires before a report counts as complete.
pub const REQUIRED_META: [MetaField; 3] = [
    MetaField::ProjectTitle,
    MetaField::StudentName,
    MetaField::GuideName,
];

/// Base count for the flat score: template, five student fields, eleven
/// documentation fields, code, screenshots and diagrams. References are
/// scored on top of it and cover the extra slot in the denominator.
pub const FLAT_TRACKED_ITEMS: usize = 1 + 5 + DOCUMENTATION_KEYS.len() + 3;

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = (done as f64 / total as f64) * 100.0;
    ratio.round().clamp(0.0, 100.0) as u8
}

fn all_or_nothing(present: bool) -> u8 {
    if present {
        100
    } else {
        0
    }
}

fn has_reference_url(doc: &DocumentModel) -> bool {
    doc.references.iter().any(|reference| filled(&reference.url))
}

/// Overall completion of the flat form.
///
/// Scored out of `FLAT_TRACKED_ITEMS + 1`, so a form with every item filled,
/// references included, scores exactly 100.
pub fn flat_completion(doc: &DocumentModel) -> u8 {
    let form = FlatForm::from_document(doc);
    let student_done = StudentField::REQUIRED
        .iter()
        .filter(|field| filled(form.student_details.get(**field)))
        .count();
    let docs_done = DOCUMENTATION_KEYS
        .iter()
        .filter(|(key, _)| filled(form.documentation_value(key)))
        .count();

    let done = usize::from(filled(&form.selected_template))
        + student_done
        + docs_done
        + usize::from(!doc.code_files.is_empty())
        + usize::from(!doc.figures.is_empty())
        + usize::from(!doc.diagrams.is_empty())
        + usize::from(has_reference_url(doc));

    percent(done, FLAT_TRACKED_ITEMS + 1)
}

/// Overall completion of the structured store: required metadata plus every
/// documentation section, equally weighted.
pub fn structured_completion(doc: &DocumentModel) -> u8 {
    let meta_done = REQUIRED_META
        .iter()
        .filter(|field| filled(doc.meta.get(**field)))
        .count();
    let sections_done = doc
        .sections
        .iter()
        .filter(|section| filled(&section.content))
        .count();
    percent(meta_done + sections_done, REQUIRED_META.len() + doc.sections.len())
}

/// State outside the document that some flat tabs score against.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabContext<'a> {
    pub preview_html: Option<&'a str>,
    pub has_export_result: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlatTabCompletion {
    pub details: u8,
    pub documentation: u8,
    pub code: u8,
    pub screenshots: u8,
    pub diagrams: u8,
    pub references: u8,
    pub preview: u8,
    pub export: u8,
}

pub fn flat_completion_by_tab(doc: &DocumentModel, ctx: TabContext<'_>) -> FlatTabCompletion {
    let form = FlatForm::from_document(doc);
    let details_done = usize::from(filled(&form.selected_template))
        + StudentField::REQUIRED
            .iter()
            .filter(|field| filled(form.student_details.get(**field)))
            .count();
    let docs_done = DOCUMENTATION_KEYS
        .iter()
        .filter(|(key, _)| filled(form.documentation_value(key)))
        .count();

    FlatTabCompletion {
        details: percent(details_done, 1 + StudentField::REQUIRED.len()),
        documentation: percent(docs_done, DOCUMENTATION_KEYS.len()),
        code: all_or_nothing(!doc.code_files.is_empty()),
        screenshots: all_or_nothing(!doc.figures.is_empty()),
        diagrams: all_or_nothing(!doc.diagrams.is_empty()),
        references: all_or_nothing(has_reference_url(doc)),
        preview: all_or_nothing(ctx.preview_html.is_some_and(|html| html.contains("<p>"))),
        export: all_or_nothing(ctx.has_export_result),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StructuredTabCompletion {
    pub project_details: u8,
    pub documentation: u8,
    pub diagrams: u8,
    pub code: u8,
    pub screenshots: u8,
    pub final_export: u8,
}

pub fn structured_completion_by_tab(doc: &DocumentModel) -> StructuredTabCompletion {
    let meta_done = REQUIRED_META
        .iter()
        .filter(|field| filled(doc.meta.get(**field)))
        .count();
    let sections_done = doc
        .sections
        .iter()
        .filter(|section| filled(&section.content))
        .count();

    StructuredTabCompletion {
        project_details: percent(meta_done, REQUIRED_META.len()),
        documentation: percent(sections_done, doc.sections.len()),
        diagrams: all_or_nothing(!doc.diagrams.is_empty()),
        code: all_or_nothing(!doc.code_files.is_empty()),
        screenshots: all_or_nothing(!doc.figures.is_empty()),
        final_export: structured_completion(doc),
    }
}

/// Whether the flat form has what the document generator requires.
pub fn ready_to_generate(doc: &DocumentModel) -> bool {
    let form = FlatForm::from_document(doc);
    filled(&form.selected_template)
        && StudentField::REQUIRED
            .iter()
            .all(|field| filled(form.student_details.get(*field)))
        && form.documentation.values().any(|value| filled(value))
}
