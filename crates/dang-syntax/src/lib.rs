//! Lexer, AST, and source-location types for the dang expression language.
//!
//! This crate is a leaf: it has no dependency on `dang-types` or
//! `dang-infer`. AST nodes carry a [`ast::NodeId`] instead of an inference
//! decoration so that downstream crates can attach their own `NodeId -> T`
//! side tables without this crate knowing they exist.

pub mod ast;
pub mod lexer;
pub mod location;
pub mod parser;

pub use ast::{
    Block, CallArg, CallExpr, DirectiveForm, Expr, ExprStmt, FieldDecl, FnDeclForm, Form,
    IdentExpr, ImportForm, LetForm, LitExpr, MemberExpr, Module, NodeId, NodeIdGen, ObjectExpr,
    ParamDecl, TypeDeclForm, TypeDeclKind, TypeRef,
};
pub use lexer::{LexError, Lexer, Token, TokenKind};
pub use location::SourceLocation;
pub use parser::{parse_module, ParseError, Parser, ReferenceParser};
