use blackbook_core::Draft;
use blackbook_engine::{DraftError, DraftStore};
use blackbook_logging::{bb_debug, bb_error, bb_warn};

pub(crate) fn load_draft(store: &DraftStore) -> Option<Draft> {
    match store.load() {
        Ok(draft) => draft,
        Err(DraftError::Parse(err)) => {
            bb_warn!("Stored draft was unreadable and has been cleared: {}", err);
            None
        }
        Err(err) => {
            bb_warn!("Failed to read draft from {:?}: {}", store.path(), err);
            None
        }
    }
}

pub(crate) fn save_draft(store: &DraftStore, draft: &Draft) {
    match store.save(draft) {
        Ok(path) => bb_debug!("Draft saved to {:?}", path),
        Err(err) => bb_error!("Failed to save draft to {:?}: {}", store.path(), err),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use blackbook_core::{DocumentModel, MetaField, VersionHistory};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn saved_draft_loads_back() {
        let temp = TempDir::new().unwrap();
        let store = DraftStore::new(temp.path());
        let mut doc = DocumentModel::default();
        doc.set_meta(MetaField::ProjectTitle, "Library System");

        save_draft(&store, &Draft::new(doc, VersionHistory::default()));
        let loaded = load_draft(&store).expect("draft");
        assert_eq!(loaded.document.meta.project_title, "Library System");
    }

    #[test]
    fn unreadable_draft_loads_as_none() {
        let temp = TempDir::new().unwrap();
        let store = DraftStore::new(temp.path());
        fs::write(store.path(), "[]").unwrap();

        assert!(load_draft(&store).is_none());
        assert!(!store.path().exists());
    }
}
