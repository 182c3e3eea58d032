use crate::model::document::{Document, TaskEntry};
use crate::model::task::Task;
use crate::parse::tag_codec::{decode_tags, encode_tags};

/// Rebuild the in-memory task list from the persisted document, one task per
/// mapping entry in document order.
pub fn tasks_from_document(doc: &Document) -> Vec<Task> {
    doc.tasks
        .iter()
        .map(|(name, entry)| Task::from_parts(name.clone(), entry.time, decode_tags(&entry.tags)))
        .collect()
}

/// Write every task back into the document's task mapping. Each entry is
/// replaced wholesale — an existing entry under the same name is overwritten,
/// never merged. The document and the task list are otherwise left to drift;
/// this is the save-time half of the load/save reconciliation boundary.
pub fn reconcile_document(doc: &mut Document, tasks: &[Task]) {
    for task in tasks {
        doc.tasks.insert(
            task.name.clone(),
            TaskEntry {
                time: task.created_on,
                tags: encode_tags(&task.tags),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tag::Tag;

    #[test]
    fn document_and_tasks_round_trip() {
        let mut doc = Document::empty();
        let tasks = vec![
            Task::from_parts("groceries", 100, vec![Tag::new("milk")]),
            Task::from_parts(
                "deploy",
                200,
                vec![Tag::with_children("work", vec![Tag::new("urgent")])],
            ),
        ];
        reconcile_document(&mut doc, &tasks);
        assert_eq!(tasks_from_document(&doc), tasks);
    }

    #[test]
    fn reconcile_overwrites_same_name_entries() {
        let mut doc = Document::empty();
        reconcile_document(
            &mut doc,
            &[Task::from_parts("t", 1, vec![Tag::new("old")])],
        );
        reconcile_document(
            &mut doc,
            &[Task::from_parts("t", 2, vec![Tag::new("new")])],
        );
        assert_eq!(doc.tasks.len(), 1);
        let entry = &doc.tasks["t"];
        assert_eq!(entry.time, 2);
        let names: Vec<_> = entry.tags.0.keys().collect();
        assert_eq!(names, ["new"]);
    }

    #[test]
    fn duplicate_task_names_collapse_to_the_last() {
        let mut doc = Document::empty();
        let tasks = vec![
            Task::from_parts("t", 1, vec![Tag::new("a")]),
            Task::from_parts("t", 2, vec![Tag::new("b")]),
        ];
        reconcile_document(&mut doc, &tasks);
        assert_eq!(
            tasks_from_document(&doc),
            vec![Task::from_parts("t", 2, vec![Tag::new("b")])]
        );
    }

    #[test]
    fn reconcile_keeps_entries_for_tasks_not_in_the_list() {
        // No delete operation exists, so entries only ever accumulate.
        let mut doc = Document::empty();
        reconcile_document(&mut doc, &[Task::from_parts("kept", 1, Vec::new())]);
        reconcile_document(&mut doc, &[Task::from_parts("added", 2, Vec::new())]);
        let names: Vec<_> = doc.tasks.keys().collect();
        assert_eq!(names, ["kept", "added"]);
    }
}
