//! `Env`: a tree of [`Frame`]s, shared and mostly-immutable.
//!
//! Cloning an `Env` copies only the top frame's contents into a fresh cell;
//! the parent link is shared via `Rc`. This is what lets the LSP overlay a
//! request-scoped set of local bindings over a stable base environment
//! without ever mutating the base.

use std::cell::RefCell;
use std::rc::Rc;

use dang_types::{generalize as generalize_free, ModuleTypeId, Scheme};

use crate::frame::{EnvKind, Frame, Visibility};

struct EnvInner {
    frame: RefCell<Frame>,
    kind: EnvKind,
    name: Option<String>,
    doc: Option<String>,
    parent: Option<Env>,
}

#[derive(Clone)]
pub struct Env(Rc<EnvInner>);

impl Env {
    pub fn root() -> Self {
        Env(Rc::new(EnvInner {
            frame: RefCell::new(Frame::new()),
            kind: EnvKind::Root,
            name: None,
            doc: None,
            parent: None,
        }))
    }

    /// Creates a named module frame (`NewModuleEnv`).
    pub fn new_module(parent: &Env, kind: EnvKind, name: impl Into<String>, doc: Option<String>) -> Self {
        Env(Rc::new(EnvInner {
            frame: RefCell::new(Frame::new()),
            kind,
            name: Some(name.into()),
            doc,
            parent: Some(parent.clone()),
        }))
    }

    /// A child scope with no module identity (e.g. a `let`-block body).
    pub fn child(parent: &Env) -> Self {
        Env(Rc::new(EnvInner {
            frame: RefCell::new(Frame::new()),
            kind: EnvKind::Block,
            name: None,
            doc: None,
            parent: Some(parent.clone()),
        }))
    }

    pub fn kind(&self) -> EnvKind {
        self.0.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn parent(&self) -> Option<&Env> {
        self.0.parent.as_ref()
    }

    pub fn add(&self, name: impl Into<String>, scheme: Scheme, vis: Visibility) {
        self.0.frame.borrow_mut().bindings.insert(name.into(), (scheme, vis));
    }

    pub fn remove(&self, name: &str) {
        self.0.frame.borrow_mut().bindings.shift_remove(name);
    }

    pub fn set_visibility(&self, name: &str, vis: Visibility) -> bool {
        let mut frame = self.0.frame.borrow_mut();
        if let Some(entry) = frame.bindings.get_mut(name) {
            entry.1 = vis;
            true
        } else {
            false
        }
    }

    /// The scheme bound to `name` in this frame only.
    pub fn local_scheme_of(&self, name: &str) -> Option<Scheme> {
        self.0.frame.borrow().bindings.get(name).map(|(s, _)| s.clone())
    }

    /// The scheme bound to `name`, searching outward through parents.
    pub fn scheme_of(&self, name: &str) -> Option<Scheme> {
        if let Some(s) = self.local_scheme_of(name) {
            return Some(s);
        }
        self.0.parent.as_ref().and_then(|p| p.scheme_of(name))
    }

    /// Every binding visible from this frame. `recursive` walks parents;
    /// `public_only` filters by visibility. Order is innermost-first, then
    /// insertion order within a frame, matching the deterministic-ranking
    /// contract completion relies on.
    pub fn bindings(&self, public_only: bool, recursive: bool) -> Vec<(String, Scheme)> {
        let mut out = Vec::new();
        let mut seen = std::collections::HashSet::new();
        let mut cur = Some(self.clone());
        while let Some(env) = cur {
            for (name, (scheme, vis)) in env.0.frame.borrow().bindings.iter() {
                if public_only && *vis == Visibility::Private {
                    continue;
                }
                if seen.insert(name.clone()) {
                    out.push((name.clone(), scheme.clone()));
                }
            }
            if !recursive {
                break;
            }
            cur = env.0.parent.clone();
        }
        out
    }

    pub fn add_named_type(&self, name: impl Into<String>, id: ModuleTypeId) {
        self.0.frame.borrow_mut().named_types.insert(name.into(), id);
    }

    /// `AddClass` is `add_named_type` plus a binding for the class
    /// constructor's own name resolving to itself as a type — distinct
    /// call so inference call sites read as declaring a class, not just
    /// registering an arbitrary type alias.
    pub fn add_class(&self, name: impl Into<String>, id: ModuleTypeId) {
        self.add_named_type(name, id);
    }

    pub fn named_type(&self, name: &str) -> Option<ModuleTypeId> {
        if let Some(id) = self.0.frame.borrow().named_types.get(name) {
            return Some(*id);
        }
        self.0.parent.as_ref().and_then(|p| p.named_type(name))
    }

    pub fn set_doc_string(&self, name: impl Into<String>, doc: impl Into<String>) {
        self.0.frame.borrow_mut().docstrings.insert(name.into(), doc.into());
    }

    pub fn doc_string(&self, name: &str) -> Option<String> {
        if let Some(d) = self.0.frame.borrow().docstrings.get(name) {
            return Some(d.clone());
        }
        self.0.parent.as_ref().and_then(|p| p.doc_string(name))
    }

    /// Free type variables of every scheme reachable from this env,
    /// needed by `generalize` to know which vars are *not* safe to
    /// quantify.
    pub fn free_vars(&self) -> std::collections::BTreeSet<dang_types::TypeVar> {
        let mut out = std::collections::BTreeSet::new();
        for (_, scheme) in self.bindings(false, true) {
            out.extend(dang_types::Substitutable::free_vars(&scheme));
        }
        out
    }

    pub fn generalize(&self, ty: &dang_types::Type) -> Scheme {
        generalize_free(&self.free_vars(), ty)
    }

    /// Shallow-copy-of-top-frame `Clone`: a fresh env sharing this env's
    /// parent but with an independent, pre-populated copy of the current
    /// frame's bindings. Mutating the clone never touches `self`.
    pub fn scope_overlay(&self) -> Env {
        Env(Rc::new(EnvInner {
            frame: RefCell::new(self.0.frame.borrow().clone()),
            kind: self.0.kind,
            name: self.0.name.clone(),
            doc: self.0.doc.clone(),
            parent: self.0.parent.clone(),
        }))
    }
}
