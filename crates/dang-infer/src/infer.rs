//! The phased inference engine described in spec.md §4.2.

use std::collections::HashSet;

use dang_env::{Env, Visibility};
use dang_syntax::{
    Block, Expr, FieldDecl, Form, FnDeclForm, LetForm, Module, NodeId, TypeDeclForm, TypeDeclKind,
};
use dang_types::{
    unify, FunctionType, ModuleKind, ModuleType, RecordField, RecordType, Scheme, Type,
};

use crate::context::InferContext;
use crate::error::InferError;
use crate::resolve::resolve_type_ref;

/// Wraps every node's inference step: skips re-inference of an
/// already-annotated node (idempotence), attaches the node's location to
/// any error, and — in resilient mode — turns a failure into a recorded
/// error plus a fresh-variable fallback instead of propagating it.
fn infer_wrapped(
    ctx: &mut InferContext,
    node: NodeId,
    loc: &dang_syntax::SourceLocation,
    f: impl FnOnce(&mut InferContext) -> Result<Type, InferError>,
) -> Result<Type, InferError> {
    if let Some(t) = ctx.annotations.inferred_type(node) {
        return Ok(t.clone());
    }
    match f(ctx) {
        Ok(ty) => {
            ctx.annotations.set_type(node, ty.clone());
            Ok(ty)
        }
        Err(e) => {
            if ctx.resilient {
                ctx.errors.push(e);
                let fresh = Type::Var(ctx.fresher.fresh());
                ctx.annotations.set_type(node, fresh.clone());
                Ok(fresh)
            } else {
                Err(e)
            }
        }
    }
}

/// Unifies `a` and `b`. On failure in resilient mode, records the error
/// and returns the identity substitution rather than crashing the rest of
/// the phase; in strict mode, propagates.
fn unify_or_record(
    ctx: &mut InferContext,
    a: &Type,
    b: &Type,
    loc: &dang_syntax::SourceLocation,
) -> Result<dang_types::Substitution, InferError> {
    match unify(a, b, &ctx.arena) {
        Ok(s) => Ok(s),
        Err(e) => {
            let err = InferError::from_unify(loc.clone(), e);
            if ctx.resilient {
                ctx.errors.push(err);
                Ok(dang_types::Substitution::new())
            } else {
                Err(err)
            }
        }
    }
}

fn ident_refs(expr: &Expr, out: &mut HashSet<String>) {
    match expr {
        Expr::Ident(i) => {
            out.insert(i.name.clone());
        }
        Expr::Member(m) => ident_refs(&m.receiver, out),
        Expr::Call(c) => {
            ident_refs(&c.callee, out);
            for a in &c.args {
                ident_refs(&a.value, out);
            }
            if let Some(b) = &c.trailing_block {
                for f in &b.forms {
                    if let Form::Expr(e) = f {
                        ident_refs(&e.expr, out);
                    }
                }
            }
        }
        Expr::Object(o) => {
            for (_, v) in &o.fields {
                ident_refs(v, out);
            }
        }
        Expr::Block(b) => {
            for f in &b.forms {
                if let Form::Expr(e) = f {
                    ident_refs(&e.expr, out);
                }
            }
        }
        Expr::Int(_) | Expr::Bool(_) | Expr::Str(_) => {}
    }
}

pub fn infer_expr(ctx: &mut InferContext, env: &Env, expr: &Expr) -> Result<Type, InferError> {
    let loc = expr.loc().clone();
    let id = expr.id();
    match expr {
        Expr::Int(_) => infer_wrapped(ctx, id, &loc, |_| Ok(Type::Const("Int".into()))),
        Expr::Bool(_) => infer_wrapped(ctx, id, &loc, |_| Ok(Type::Const("Bool".into()))),
        Expr::Str(_) => infer_wrapped(ctx, id, &loc, |_| Ok(Type::Const("String".into()))),
        Expr::Ident(i) => {
            let name = i.name.clone();
            infer_wrapped(ctx, id, &loc, move |ctx| match env.scheme_of(&name) {
                Some(scheme) => Ok(dang_types::instantiate(&scheme, &ctx.fresher)),
                None => Err(InferError::new(loc.clone(), format!("undefined name `{name}`"))),
            })
        }
        Expr::Member(m) => {
            let recv_ty = infer_expr(ctx, env, &m.receiver)?;
            let field = m.field.clone();
            let field_loc = m.field_loc.clone();
            infer_wrapped(ctx, id, &loc, move |ctx| {
                member_field_type(ctx, &recv_ty, &field, &field_loc)
            })
        }
        Expr::Call(c) => {
            let callee_ty = infer_expr(ctx, env, &c.callee)?;
            let mut arg_types = Vec::with_capacity(c.args.len());
            for (idx, arg) in c.args.iter().enumerate() {
                let vty = infer_expr(ctx, env, &arg.value)?;
                arg_types.push((arg.name.clone(), vty, idx));
            }
            let trailing = match &c.trailing_block {
                Some(block) => Some(infer_block(ctx, env, block)?),
                None => None,
            };
            infer_wrapped(ctx, id, &loc, move |ctx| {
                call_result_type(ctx, &callee_ty, &arg_types, trailing, &loc)
            })
        }
        Expr::Object(o) => {
            let mut fields = Vec::with_capacity(o.fields.len());
            for (name, value) in &o.fields {
                let vty = infer_expr(ctx, env, value)?;
                fields.push(RecordField { name: name.clone(), ty: vty, doc: None });
            }
            infer_wrapped(ctx, id, &loc, move |_| Ok(Type::Record(RecordType { fields })))
        }
        Expr::Block(b) => infer_block(ctx, env, b),
    }
}

fn member_field_type(
    ctx: &mut InferContext,
    recv_ty: &Type,
    field: &str,
    loc: &dang_syntax::SourceLocation,
) -> Result<Type, InferError> {
    let stripped = match recv_ty {
        Type::NonNull(inner) => inner.as_ref(),
        other => other,
    };
    match stripped {
        Type::Record(r) => r
            .field(field)
            .map(|f| f.ty.clone())
            .ok_or_else(|| InferError::new(loc.clone(), format!("no field `{field}` in record"))),
        Type::Module(id) => {
            let module = ctx.arena.get(*id);
            module
                .fields
                .get(field)
                .map(|scheme| dang_types::instantiate(scheme, &ctx.fresher))
                .ok_or_else(|| {
                    InferError::new(loc.clone(), format!("no field `{field}` on `{}`", module.name))
                })
        }
        _ => Err(InferError::new(loc.clone(), format!("receiver has no field `{field}`"))),
    }
}

fn call_result_type(
    ctx: &mut InferContext,
    callee_ty: &Type,
    args: &[(Option<String>, Type, usize)],
    trailing: Option<Type>,
    loc: &dang_syntax::SourceLocation,
) -> Result<Type, InferError> {
    let ft = match callee_ty {
        Type::Function(ft) => ft.as_ref().clone(),
        Type::Var(_) => {
            // Callee not yet resolved to a concrete function (e.g. a
            // resilient-mode fallback). Nothing more we can check.
            return Ok(Type::Var(ctx.fresher.fresh()));
        }
        other => {
            return Err(InferError::new(loc.clone(), format!("`{other}` is not callable")));
        }
    };

    let call_record = positional_to_named_record(args, &ft.args, loc)?;
    let sub = unify_or_record(ctx, &Type::Record(call_record), &Type::Record(ft.args.clone()), loc)?;

    if let (Some(trailing_ty), Some(block_sig)) = (&trailing, &ft.block) {
        let expected = Type::Function(Box::new((**block_sig).clone()));
        unify_or_record(ctx, trailing_ty, &expected, loc)?;
    } else if trailing.is_none() != ft.block.is_none() {
        return Err(InferError::new(
            loc.clone(),
            "trailing block presence does not match function signature".to_string(),
        ));
    }

    Ok(dang_types::Substitutable::apply(&ft.ret, &sub))
}

/// Resolves positional arguments to field names using the callee's
/// declared parameter order — "positional calls are a syntactic
/// convenience resolved to names during inference" (spec.md §3).
fn positional_to_named_record(
    args: &[(Option<String>, Type, usize)],
    params: &RecordType,
    loc: &dang_syntax::SourceLocation,
) -> Result<RecordType, InferError> {
    let mut fields = Vec::with_capacity(args.len());
    for (name, ty, idx) in args {
        let resolved_name = match name {
            Some(n) => n.clone(),
            None => params
                .field_at(*idx)
                .map(|f| f.name.clone())
                .ok_or_else(|| InferError::new(loc.clone(), "too many positional arguments".to_string()))?,
        };
        fields.push(RecordField { name: resolved_name, ty: ty.clone(), doc: None });
    }
    Ok(RecordType { fields })
}

pub fn infer_block(ctx: &mut InferContext, parent: &Env, block: &Block) -> Result<Type, InferError> {
    if let Some(t) = ctx.annotations.inferred_type(block.id) {
        return Ok(t.clone());
    }
    let env = Env::child(parent);
    ctx.annotations.set_scope(block.id, env.clone());
    let mut last = Type::unit();
    for form in &block.forms {
        last = infer_form(ctx, &env, form)?.unwrap_or_else(Type::unit);
    }
    ctx.annotations.set_type(block.id, last.clone());
    Ok(last)
}

/// Infers one top-level (or block-nested) form outside the ordered
/// module-level phase pass; used for block bodies, which don't re-run the
/// full 8-phase pipeline, matching spec.md's "each [function body] uses
/// the signatures hoisted in phase 5" — a block is already inside an
/// inferred function.
fn infer_form(ctx: &mut InferContext, env: &Env, form: &Form) -> Result<Option<Type>, InferError> {
    match form {
        Form::Let(l) => {
            infer_let(ctx, env, l)?;
            Ok(None)
        }
        Form::Expr(e) => Ok(Some(infer_expr(ctx, env, &e.expr)?)),
        Form::Import(_) | Form::Directive(_) | Form::TypeDecl(_) | Form::FnDecl(_) => {
            // Nested declarations inside a block body are out of scope for
            // this engine; top-level phases handle all declarations.
            Ok(None)
        }
    }
}

fn infer_let(ctx: &mut InferContext, env: &Env, l: &LetForm) -> Result<(), InferError> {
    let ty = infer_expr(ctx, env, &l.value)?;
    let scheme = env.generalize(&ty);
    env.add(l.name.clone(), scheme, Visibility::Public);
    Ok(())
}

fn build_param_record(
    ctx: &mut InferContext,
    env: &Env,
    fields: &[dang_syntax::ParamDecl],
) -> Result<RecordType, InferError> {
    let mut out = Vec::with_capacity(fields.len());
    for p in fields {
        let ty = match &p.type_ref {
            Some(tref) => resolve_type_ref(tref, env, &dang_syntax::SourceLocation::synthetic())?,
            None => Type::Var(ctx.fresher.fresh()),
        };
        out.push(RecordField { name: p.name.clone(), ty, doc: None });
    }
    Ok(RecordType { fields: out })
}

fn fn_decl_signature(ctx: &mut InferContext, env: &Env, f: &FnDeclForm) -> Result<FunctionType, InferError> {
    let args = build_param_record(ctx, env, &f.params)?;
    let ret = match &f.ret {
        Some(tref) => resolve_type_ref(tref, env, &f.loc)?,
        None => Type::Var(ctx.fresher.fresh()),
    };
    let block = match &f.block_param {
        Some(b) => Some(Box::new(fn_decl_signature(ctx, env, b)?)),
        None => None,
    };
    Ok(FunctionType { args, ret, block })
}

fn type_decl_module(ctx: &mut InferContext, env: &Env, decl: &TypeDeclForm) -> Result<ModuleType, InferError> {
    let kind = match decl.kind {
        TypeDeclKind::Class => ModuleKind::Class,
        TypeDeclKind::Record => ModuleKind::Input,
        TypeDeclKind::Enum => ModuleKind::Enum,
    };
    let mut module = ModuleType::new(decl.name.clone(), kind);
    for FieldDecl { name, type_name, .. } in &decl.fields {
        let ty = resolve_type_ref(type_name, env, &decl.loc)?;
        module.fields.insert(name.clone(), Scheme::mono(ty));
    }
    Ok(module)
}

/// Runs the full 8-phase module-level inference pass. Returns `Ok(())` in
/// strict mode if every phase succeeded; in resilient mode this never
/// returns `Err` (failures are recorded into `ctx.errors` instead), which
/// matches spec.md's note that the top-level call only returns an error in
/// strict mode.
pub fn infer_module(ctx: &mut InferContext, env: &Env, module: &Module) -> Result<(), InferError> {
    // Phase 1: imports.
    for form in &module.forms {
        if let Form::Import(imp) = form {
            let mut placeholder = ModuleType::new(imp.module.clone(), ModuleKind::Object);
            placeholder.fields = Default::default();
            let id = ctx.arena.insert(placeholder);
            env.add_named_type(imp.module.clone(), id);
        }
    }

    // Phase 2: directives. No compile-time annotations are modeled beyond
    // parsing; presence is recorded but does not affect typing.

    // Phase 3: constants — `let`s with no dependency on another top-level
    // name declared in this module.
    let all_lets: Vec<&LetForm> = module
        .forms
        .iter()
        .filter_map(|f| if let Form::Let(l) = f { Some(l) } else { None })
        .collect();
    let let_names: HashSet<String> = all_lets.iter().map(|l| l.name.clone()).collect();
    let mut deferred_lets = Vec::new();
    for l in &all_lets {
        let mut refs = HashSet::new();
        ident_refs(&l.value, &mut refs);
        if refs.is_disjoint(&let_names) {
            infer_let(ctx, env, l)?;
        } else {
            deferred_lets.push(*l);
        }
    }

    // Phase 4: type declarations, hoisted before any bodies are visited.
    for form in &module.forms {
        if let Form::TypeDecl(decl) = form {
            let module_ty = infer_type_decl_resilient(ctx, env, decl)?;
            let id = ctx.arena.insert(module_ty);
            env.add_class(decl.name.clone(), id);
        }
    }

    // Phase 5: function signatures, hoisted so mutual recursion resolves.
    let fn_decls: Vec<&FnDeclForm> = module
        .forms
        .iter()
        .filter_map(|f| if let Form::FnDecl(f) = f { Some(f) } else { None })
        .collect();
    for f in &fn_decls {
        let sig = infer_fn_signature_resilient(ctx, env, f)?;
        env.add(f.name.clone(), Scheme::mono(Type::Function(Box::new(sig))), Visibility::Public);
        if let Some(doc) = &f.doc {
            env.set_doc_string(f.name.clone(), doc.clone());
        }
    }

    // Phase 6: remaining variables, stable-topologically sorted by usage;
    // a cycle that signatures can't break falls back to insertion order
    // and lets unification flag the resulting error.
    let ordered = topo_sort_lets(&deferred_lets);
    for l in ordered {
        infer_let(ctx, env, l)?;
    }

    // Phase 7: function bodies, using the signatures hoisted in phase 5.
    for f in &fn_decls {
        infer_fn_body_resilient(ctx, env, f)?;
    }

    // Phase 8: non-declaration top-level expressions.
    for form in &module.forms {
        if let Form::Expr(e) = form {
            infer_expr(ctx, env, &e.expr)?;
        }
    }

    Ok(())
}

fn topo_sort_lets<'a>(lets: &[&'a LetForm]) -> Vec<&'a LetForm> {
    let by_name: std::collections::HashMap<&str, &LetForm> =
        lets.iter().map(|l| (l.name.as_str(), *l)).collect();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut order = Vec::new();
    let mut stack: HashSet<&str> = HashSet::new();

    fn visit<'a>(
        name: &'a str,
        by_name: &std::collections::HashMap<&'a str, &'a LetForm>,
        visited: &mut HashSet<&'a str>,
        stack: &mut HashSet<&'a str>,
        order: &mut Vec<&'a LetForm>,
    ) {
        if visited.contains(name) || stack.contains(name) {
            return; // cycle: fall back, leave for insertion-order pass below
        }
        let Some(l) = by_name.get(name) else { return };
        stack.insert(name);
        let mut refs = HashSet::new();
        ident_refs(&l.value, &mut refs);
        for r in &refs {
            if by_name.contains_key(r.as_str()) {
                visit(r, by_name, visited, stack, order);
            }
        }
        stack.remove(name);
        if visited.insert(name) {
            order.push(*l);
        }
    }

    for l in lets {
        visit(&l.name, &by_name, &mut visited, &mut stack, &mut order);
    }
    // Anything a cycle prevented from being visited keeps insertion order.
    for l in lets {
        if !visited.contains(l.name.as_str()) {
            order.push(l);
        }
    }
    order
}

fn infer_type_decl_resilient(
    ctx: &mut InferContext,
    env: &Env,
    decl: &TypeDeclForm,
) -> Result<ModuleType, InferError> {
    match type_decl_module(ctx, env, decl) {
        Ok(m) => Ok(m),
        Err(e) => {
            if ctx.resilient {
                ctx.errors.push(e);
                Ok(ModuleType::new(decl.name.clone(), ModuleKind::Object))
            } else {
                Err(e)
            }
        }
    }
}

fn infer_fn_signature_resilient(
    ctx: &mut InferContext,
    env: &Env,
    f: &FnDeclForm,
) -> Result<FunctionType, InferError> {
    match fn_decl_signature(ctx, env, f) {
        Ok(sig) => Ok(sig),
        Err(e) => {
            if ctx.resilient {
                ctx.errors.push(e);
                Ok(FunctionType {
                    args: RecordType::default(),
                    ret: Type::Var(ctx.fresher.fresh()),
                    block: None,
                })
            } else {
                Err(e)
            }
        }
    }
}

fn infer_fn_body_resilient(ctx: &mut InferContext, env: &Env, f: &FnDeclForm) -> Result<(), InferError> {
    let Some(body) = &f.body else { return Ok(()) };
    let scheme = env.scheme_of(&f.name);
    let sig = match &scheme.map(|s| s.ty) {
        Some(Type::Function(ft)) => (**ft).clone(),
        _ => return Ok(()),
    };
    let fn_env = Env::child(env);
    for field in &sig.args.fields {
        fn_env.add(field.name.clone(), Scheme::mono(field.ty.clone()), Visibility::Public);
    }
    let result = infer_block(ctx, &fn_env, body);
    match result {
        Ok(body_ty) => {
            let loc = body.loc.clone();
            unify_or_record(ctx, &body_ty, &sig.ret, &loc)?;
            Ok(())
        }
        Err(e) => {
            if ctx.resilient {
                ctx.errors.push(e);
                Ok(())
            } else {
                Err(e)
            }
        }
    }
}

