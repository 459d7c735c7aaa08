//! Reference list editing. The list always keeps at least one editable row.
use crate::document::Reference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceField {
    Label,
    Url,
}

/// Rows shown by the editor: the stored list, or a single empty row.
pub fn editable_rows(references: &[Reference]) -> Vec<Reference> {
    if references.is_empty() {
        vec![Reference::default()]
    } else {
        references.to_vec()
    }
}

pub fn update_row(
    references: &[Reference],
    index: usize,
    field: ReferenceField,
    value: &str,
) -> Vec<Reference> {
    let mut rows = editable_rows(references);
    if let Some(row) = rows.get_mut(index) {
        match field {
            ReferenceField::Label => row.label = value.to_string(),
            ReferenceField::Url => row.url = value.to_string(),
        }
    }
    rows
}

pub fn add_row(references: &[Reference]) -> Vec<Reference> {
    let mut rows = editable_rows(references);
    rows.push(Reference::default());
    rows
}

/// Remove a row; removing the last one leaves a single empty row.
pub fn remove_row(references: &[Reference], index: usize) -> Vec<Reference> {
    let rows: Vec<Reference> = editable_rows(references)
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| *idx != index)
        .map(|(_, row)| row)
        .collect();
    editable_rows(&rows)
}

/// Trimmed references with a url, as sent to the document generator.
pub fn submission_references(references: &[Reference]) -> Vec<Reference> {
    references
        .iter()
        .map(|reference| Reference {
            label: reference.label.trim().to_string(),
            url: reference.url.trim().to_string(),
        })
        .filter(|reference| !reference.url.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(label: &str, url: &str) -> Reference {
        Reference {
            label: label.into(),
            url: url.into(),
        }
    }

    #[test]
    fn empty_list_renders_one_row() {
        assert_eq!(editable_rows(&[]), vec![Reference::default()]);
    }

    #[test]
    fn removing_last_row_reinserts_empty_row() {
        let rows = vec![reference("Docs", "https://docs.rs")];
        assert_eq!(remove_row(&rows, 0), vec![Reference::default()]);
    }

    #[test]
    fn remove_keeps_other_rows_in_order() {
        let rows = vec![reference("a", "1"), reference("b", "2"), reference("c", "3")];
        assert_eq!(
            remove_row(&rows, 1),
            vec![reference("a", "1"), reference("c", "3")]
        );
    }

    #[test]
    fn update_on_empty_list_edits_the_placeholder_row() {
        let rows = update_row(&[], 0, ReferenceField::Url, "https://rust-lang.org");
        assert_eq!(rows, vec![reference("", "https://rust-lang.org")]);
    }

    #[test]
    fn out_of_range_update_is_ignored() {
        let rows = update_row(&[reference("a", "1")], 4, ReferenceField::Label, "x");
        assert_eq!(rows, vec![reference("a", "1")]);
    }

    #[test]
    fn submission_trims_and_drops_rows_without_url() {
        let rows = vec![reference(" Rust ", " https://rust-lang.org "), reference("Empty", "  ")];
        assert_eq!(
            submission_references(&rows),
            vec![reference("Rust", "https://rust-lang.org")]
        );
    }
}
