//! Completion items and deterministic ranking.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Variable,
    Function,
    Method,
    Field,
    Module,
    Type,
    Command,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionKind,
    /// Printed type, shown as the detail line.
    pub detail: String,
    /// Markdown rendering of the binding's docstring, if any.
    pub documentation: Option<String>,
    /// Overrides `label` when inserted (e.g. `"name: "` for a named arg).
    pub insert_text: Option<String>,
    /// Overrides `label` when rendered in the dropdown/detail bubble (e.g.
    /// `"name: Type"` for a named arg, per spec's E2 scenario).
    pub display_label: Option<String>,
}

impl CompletionItem {
    pub fn new(label: impl Into<String>, kind: CompletionKind, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: detail.into(),
            documentation: None,
            insert_text: None,
            display_label: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    pub fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    pub fn with_display_label(mut self, label: impl Into<String>) -> Self {
        self.display_label = Some(label.into());
        self
    }
}

/// Ranking bucket: exact-case prefix matches sort before case-insensitive
/// ones; items within a bucket keep the insertion order of the candidate
/// list handed in (itself the underlying binding's declaration order).
fn bucket(item: &CompletionItem, prefix: &str) -> u8 {
    if item.label.starts_with(prefix) {
        0
    } else if item.label.to_lowercase().starts_with(&prefix.to_lowercase()) {
        1
    } else {
        2
    }
}

/// Stable sort by `(bucket, insertion_index)`, dropping items that don't
/// match `prefix` at all (bucket 2).
pub fn rank(items: Vec<CompletionItem>, prefix: &str) -> Vec<CompletionItem> {
    let mut indexed: Vec<(u8, usize, CompletionItem)> = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| (bucket(&item, prefix), i, item))
        .filter(|(b, _, _)| *b < 2)
        .collect();
    indexed.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    indexed.into_iter().map(|(_, _, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(label: &str) -> CompletionItem {
        CompletionItem::new(label, CompletionKind::Variable, "Int")
    }

    #[test]
    fn exact_case_prefix_sorts_before_case_insensitive() {
        let items = vec![item("Container"), item("container")];
        let ranked = rank(items, "container");
        assert_eq!(ranked[0].label, "container");
        assert_eq!(ranked[1].label, "Container");
    }

    #[test]
    fn non_matching_items_are_dropped() {
        let items = vec![item("alpha"), item("beta")];
        let ranked = rank(items, "al");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].label, "alpha");
    }

    #[test]
    fn ties_within_bucket_keep_insertion_order() {
        let items = vec![item("apple"), item("ant"), item("avocado")];
        let ranked = rank(items, "a");
        let labels: Vec<_> = ranked.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["apple", "ant", "avocado"]);
    }
}
