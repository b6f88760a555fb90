//! Miller-column doc navigator (spec.md §4.9): one column per deepening
//! selection. Selecting an item in a column either opens a detail pane or,
//! if the selection has a drillable return env with members, appends a new
//! members column and trims anything to the right of the active column.

use std::collections::HashSet;

use dang_env::Env;
use dang_types::{ModuleArena, ModuleTypeId, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct DocItem {
    pub name: String,
    pub signature: String,
    pub doc: Option<String>,
    /// Members of this item's drillable return type, if any — present only
    /// for items whose return type is itself a record/module.
    pub members: Vec<DocItem>,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub items: Vec<DocItem>,
    pub selected: usize,
    /// Incremental substring filter; `None` means filter mode is inactive.
    pub filter: Option<String>,
}

impl Column {
    pub fn new(items: Vec<DocItem>) -> Self {
        Self { items, selected: 0, filter: None }
    }

    /// Items visible under the current filter, case-insensitive substring
    /// match against `name`.
    pub fn visible(&self) -> Vec<&DocItem> {
        match &self.filter {
            None => self.items.iter().collect(),
            Some(needle) => {
                let needle = needle.to_lowercase();
                self.items.iter().filter(|i| i.name.to_lowercase().contains(&needle)).collect()
            }
        }
    }

    pub fn selected_item(&self) -> Option<&DocItem> {
        self.visible().into_iter().nth(self.selected)
    }
}

/// Builds the root doc-item list (`:doc`'s starting column) from every
/// binding visible in `env`, recursively expanding record/module-shaped
/// return types into drillable members. Module references can be cyclic
/// (a `Container` field returning `Container`), so expansion tracks
/// visited module ids and stops rather than looping.
pub fn doc_items_from_env(env: &Env, arena: &ModuleArena) -> Vec<DocItem> {
    let mut items: Vec<DocItem> = env
        .bindings(false, true)
        .into_iter()
        .map(|(name, scheme)| {
            let mut visited = HashSet::new();
            DocItem {
                signature: format!("{name}: {}", scheme.ty),
                doc: env.doc_string(&name),
                members: members_of(&scheme.ty, arena, &mut visited),
                name,
            }
        })
        .collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));
    items
}

fn members_of(ty: &Type, arena: &ModuleArena, visited: &mut HashSet<ModuleTypeId>) -> Vec<DocItem> {
    match ty {
        Type::NonNull(inner) => members_of(inner, arena, visited),
        Type::Record(r) => r
            .fields
            .iter()
            .map(|f| DocItem {
                name: f.name.clone(),
                signature: format!("{}: {}", f.name, f.ty),
                doc: f.doc.clone(),
                members: members_of(&f.ty, arena, visited),
            })
            .collect(),
        Type::Module(id) => {
            if !visited.insert(*id) {
                return Vec::new();
            }
            let module = arena.get(*id);
            module
                .fields
                .iter()
                .map(|(name, scheme)| DocItem {
                    name: name.clone(),
                    signature: format!("{name}: {}", scheme.ty),
                    doc: None,
                    members: members_of(&scheme.ty, arena, visited),
                })
                .collect()
        }
        Type::Function(ft) => members_of(&ft.ret, arena, visited),
        _ => Vec::new(),
    }
}

pub struct DocBrowser {
    pub columns: Vec<Column>,
    pub active: usize,
}

impl DocBrowser {
    pub fn new(root_items: Vec<DocItem>) -> Self {
        Self { columns: vec![Column::new(root_items)], active: 0 }
    }

    pub fn move_selection(&mut self, delta: i32) {
        let Some(col) = self.columns.get_mut(self.active) else { return };
        let len = col.visible().len();
        if len == 0 {
            return;
        }
        let new = (col.selected as i32 + delta).clamp(0, len as i32 - 1);
        col.selected = new as usize;
    }

    pub fn cycle_column(&mut self) {
        if !self.columns.is_empty() {
            self.active = (self.active + 1) % self.columns.len();
        }
    }

    pub fn start_filter(&mut self) {
        if let Some(col) = self.columns.get_mut(self.active) {
            col.filter = Some(String::new());
        }
    }

    pub fn cancel_filter(&mut self) {
        if let Some(col) = self.columns.get_mut(self.active) {
            col.filter = None;
        }
    }

    pub fn push_filter_char(&mut self, ch: char) {
        if let Some(col) = self.columns.get_mut(self.active) {
            if let Some(f) = &mut col.filter {
                f.push(ch);
                col.selected = 0;
            }
        }
    }

    /// Selection changed in `column_index`: trim columns to its right and,
    /// if the selected item has members, append a new column for them.
    pub fn select(&mut self, column_index: usize) {
        self.columns.truncate(column_index + 1);
        self.active = column_index;
        let members = self.columns[column_index].selected_item().map(|item| item.members.clone());
        if let Some(members) = members {
            if !members.is_empty() {
                self.columns.push(Column::new(members));
                self.active = self.columns.len() - 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dang_env::{new_prelude_env, Visibility};
    use dang_types::{RecordField, RecordType, Scheme};

    #[test]
    fn doc_items_from_env_lists_bindings() {
        let env = new_prelude_env();
        let items = doc_items_from_env(&env, &ModuleArena::new());
        assert!(items.iter().any(|i| i.name == "print"));
    }

    #[test]
    fn doc_items_from_env_expands_record_return_type_into_members() {
        let env = new_prelude_env();
        let record = RecordType {
            fields: vec![RecordField { name: "stdout".into(), ty: Type::Const("String".into()), doc: None }],
        };
        env.add("container", Scheme::mono(Type::Record(record)), Visibility::Public);
        let items = doc_items_from_env(&env, &ModuleArena::new());
        let container = items.iter().find(|i| i.name == "container").unwrap();
        assert_eq!(container.members[0].name, "stdout");
    }

    fn leaf(name: &str) -> DocItem {
        DocItem { name: name.to_string(), signature: String::new(), doc: None, members: Vec::new() }
    }

    #[test]
    fn selecting_item_with_members_appends_column() {
        let parent = DocItem {
            name: "container".into(),
            signature: "container(): Container".into(),
            doc: None,
            members: vec![leaf("from"), leaf("withExec")],
        };
        let mut browser = DocBrowser::new(vec![parent]);
        browser.select(0);
        assert_eq!(browser.columns.len(), 2);
        assert_eq!(browser.active, 1);
    }

    #[test]
    fn selecting_leaf_trims_trailing_columns() {
        let parent = DocItem {
            name: "container".into(),
            signature: String::new(),
            doc: None,
            members: vec![leaf("from")],
        };
        let mut browser = DocBrowser::new(vec![parent]);
        browser.select(0);
        assert_eq!(browser.columns.len(), 2);
        browser.select(0);
        assert_eq!(browser.columns.len(), 1);
    }

    #[test]
    fn filter_restricts_visible_items() {
        let mut col = Column::new(vec![leaf("withExec"), leaf("withEnvVariable"), leaf("stdout")]);
        col.filter = Some("with".to_string());
        assert_eq!(col.visible().len(), 2);
    }

    #[test]
    fn move_selection_clamps_at_bounds() {
        let mut browser = DocBrowser::new(vec![leaf("a"), leaf("b")]);
        browser.move_selection(-5);
        assert_eq!(browser.columns[0].selected, 0);
        browser.move_selection(5);
        assert_eq!(browser.columns[0].selected, 1);
    }
}
