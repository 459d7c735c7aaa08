use blackbook_core::{
    flat_completion, flat_completion_by_tab, set_documentation_field, structured_completion,
    structured_completion_by_tab, CodeFile, Diagram, DiagramKind, DocumentModel, FileHandle,
    Figure, MetaField, Reference, TabContext, DOCUMENTATION_KEYS,
};
use pretty_assertions::assert_eq;

fn filled_document() -> DocumentModel {
    let mut doc = DocumentModel::default();
    doc.selected_template = "proj".to_string();
    doc.set_meta(MetaField::ProjectTitle, "Smart Attendance");
    doc.set_meta(MetaField::StudentName, "Asha");
    doc.set_meta(MetaField::GuideName, "Prof. Iyer");
    doc.set_meta(MetaField::ProfessorName, "Dr. Rao");
    doc.set_meta(MetaField::Year, "2025-2026");
    for (key, _) in DOCUMENTATION_KEYS {
        set_documentation_field(&mut doc, key, "Written.");
    }
    doc.upsert_code_file(CodeFile::from_text("main.rs", "rust", "fn main() {}".to_string()));
    doc.figures.push(Figure {
        preview_url: "/tmp/a.png".to_string(),
        ..Default::default()
    });
    doc.upsert_diagram(Diagram::manual(
        DiagramKind::UseCase,
        FileHandle::from_path("/tmp/uc.png"),
    ));
    doc.references = vec![Reference {
        label: "Rust".to_string(),
        url: "https://www.rust-lang.org".to_string(),
    }];
    doc
}

#[test]
fn empty_document_scores_zero() {
    let doc = DocumentModel::default();
    assert_eq!(flat_completion(&doc), 0);
    assert_eq!(structured_completion(&doc), 0);
}

#[test]
fn fully_filled_flat_form_reaches_one_hundred() {
    let doc = filled_document();
    assert_eq!(flat_completion(&doc), 100);
}

#[test]
fn flat_score_is_out_of_twenty_one() {
    let mut doc = DocumentModel::default();
    for (key, _) in DOCUMENTATION_KEYS.iter().take(10) {
        set_documentation_field(&mut doc, key, "Written.");
    }
    // 10 / 21
    assert_eq!(flat_completion(&doc), 48);

    let mut doc = filled_document();
    doc.references.clear();
    // 20 / 21
    assert_eq!(flat_completion(&doc), 95);
}

#[test]
fn fully_filled_structured_store_reaches_one_hundred() {
    let mut doc = filled_document();
    doc.set_section_content("conclusion", "Done.");
    assert_eq!(structured_completion(&doc), 100);
}

#[test]
fn completion_is_monotonic_as_fields_fill() {
    let mut doc = DocumentModel::default();
    let mut last = flat_completion(&doc);
    for (key, _) in DOCUMENTATION_KEYS {
        set_documentation_field(&mut doc, key, "text");
        let next = flat_completion(&doc);
        assert!(next >= last, "{key}: {next} < {last}");
        last = next;
    }
}

#[test]
fn whitespace_only_values_do_not_count() {
    let mut doc = DocumentModel::default();
    doc.set_meta(MetaField::ProjectTitle, "   ");
    doc.set_section_content("introduction", "\n\t");
    assert_eq!(flat_completion(&doc), 0);
    assert_eq!(structured_completion(&doc), 0);
}

#[test]
fn flat_tabs_reflect_each_area() {
    let mut doc = DocumentModel::default();
    doc.selected_template = "proj".to_string();
    doc.set_meta(MetaField::StudentName, "Asha");
    doc.set_meta(MetaField::ProjectTitle, "Attendance");
    set_documentation_field(&mut doc, "doc_scope", "Campus only.");

    let tabs = flat_completion_by_tab(
        &doc,
        TabContext {
            preview_html: Some("<article><p>x</p></article>"),
            has_export_result: false,
        },
    );
    // 3 of template + 5 student fields
    assert_eq!(tabs.details, 50);
    // 1 of 11
    assert_eq!(tabs.documentation, 9);
    assert_eq!(tabs.code, 0);
    assert_eq!(tabs.references, 0);
    assert_eq!(tabs.preview, 100);
    assert_eq!(tabs.export, 0);
}

#[test]
fn structured_tabs_report_final_export_as_overall_score() {
    let doc = filled_document();
    let tabs = structured_completion_by_tab(&doc);
    assert_eq!(tabs.project_details, 100);
    assert_eq!(tabs.diagrams, 100);
    assert_eq!(tabs.code, 100);
    assert_eq!(tabs.screenshots, 100);
    assert_eq!(tabs.final_export, structured_completion(&doc));
}
