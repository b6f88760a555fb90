//! AST node definitions.
//!
//! Every node carries a [`NodeId`] rather than an inference decoration
//! directly: downstream crates (inference, completion, LSP) keep their own
//! `NodeId -> T` side tables instead of dang-syntax depending on their
//! types. This mirrors the interning-table approach spec.md recommends for
//! the module graph, applied here to the node/annotation relationship so
//! the AST crate stays a leaf.

use crate::location::SourceLocation;

/// Stable identity for an AST node, assigned monotonically by the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// A whole parsed buffer: an ordered list of top-level forms.
#[derive(Debug, Clone)]
pub struct Module {
    pub forms: Vec<Form>,
}

/// Top-level forms, matching the phase ordering in spec.md §4.2.
#[derive(Debug, Clone)]
pub enum Form {
    Import(ImportForm),
    Directive(DirectiveForm),
    TypeDecl(TypeDeclForm),
    FnDecl(FnDeclForm),
    Let(LetForm),
    Expr(ExprStmt),
}

impl Form {
    pub fn id(&self) -> NodeId {
        match self {
            Form::Import(f) => f.id,
            Form::Directive(f) => f.id,
            Form::TypeDecl(f) => f.id,
            Form::FnDecl(f) => f.id,
            Form::Let(f) => f.id,
            Form::Expr(f) => f.id,
        }
    }

    pub fn loc(&self) -> &SourceLocation {
        match self {
            Form::Import(f) => &f.loc,
            Form::Directive(f) => &f.loc,
            Form::TypeDecl(f) => &f.loc,
            Form::FnDecl(f) => &f.loc,
            Form::Let(f) => &f.loc,
            Form::Expr(f) => &f.loc,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportForm {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub module: String,
    /// `true` for auto-import forms that splice the module's public
    /// bindings unqualified into the importing scope.
    pub unqualified: bool,
}

#[derive(Debug, Clone)]
pub struct DirectiveForm {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub name: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TypeDeclForm {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub name: String,
    pub kind: TypeDeclKind,
    pub fields: Vec<FieldDecl>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDeclKind {
    Class,
    Record,
    Enum,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub type_name: TypeRef,
    pub doc: Option<String>,
}

/// A syntactic type reference as written by the user (`String`, `Int!`,
/// `[Container!]`, …), resolved against the environment during inference.
#[derive(Debug, Clone)]
pub struct TypeRef {
    pub name: String,
    pub non_null: bool,
    pub list_of: Option<Box<TypeRef>>,
}

#[derive(Debug, Clone)]
pub struct FnDeclForm {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub name: String,
    pub params: Vec<ParamDecl>,
    pub ret: Option<TypeRef>,
    pub block_param: Option<Box<FnDeclForm>>,
    pub body: Option<Block>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: String,
    pub type_ref: Option<TypeRef>,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct LetForm {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub expr: Expr,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub forms: Vec<Form>,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Ident(IdentExpr),
    Int(LitExpr<i64>),
    Bool(LitExpr<bool>),
    Str(LitExpr<String>),
    Member(MemberExpr),
    Call(CallExpr),
    Object(ObjectExpr),
    Block(Block),
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Ident(e) => e.id,
            Expr::Int(e) => e.id,
            Expr::Bool(e) => e.id,
            Expr::Str(e) => e.id,
            Expr::Member(e) => e.id,
            Expr::Call(e) => e.id,
            Expr::Object(e) => e.id,
            Expr::Block(b) => b.id,
        }
    }

    pub fn loc(&self) -> &SourceLocation {
        match self {
            Expr::Ident(e) => &e.loc,
            Expr::Int(e) => &e.loc,
            Expr::Bool(e) => &e.loc,
            Expr::Str(e) => &e.loc,
            Expr::Member(e) => &e.loc,
            Expr::Call(e) => &e.loc,
            Expr::Object(e) => &e.loc,
            Expr::Block(b) => &b.loc,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IdentExpr {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct LitExpr<T> {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub value: T,
}

#[derive(Debug, Clone)]
pub struct MemberExpr {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub receiver: Box<Expr>,
    pub field: String,
    pub field_loc: SourceLocation,
}

/// A call argument. Positional arguments (`name: None`) are resolved to
/// field names during inference per spec.md §3's RecordType note.
#[derive(Debug, Clone)]
pub struct CallArg {
    pub name: Option<String>,
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub callee: Box<Expr>,
    pub args: Vec<CallArg>,
    pub trailing_block: Option<Block>,
}

#[derive(Debug, Clone)]
pub struct ObjectExpr {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub fields: Vec<(String, Expr)>,
}

/// Monotonic [`NodeId`] allocator, owned by a parser instance.
#[derive(Default)]
pub struct NodeIdGen(u32);

impl NodeIdGen {
    pub fn next(&mut self) -> NodeId {
        let id = NodeId(self.0);
        self.0 += 1;
        id
    }
}
