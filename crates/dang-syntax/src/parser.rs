//! A minimal recursive-descent parser for the dang expression language.
//!
//! This is the reference implementation of the `Parser` trait: spec.md
//! treats "the surface parser" as an external collaborator assumed to hand
//! the rest of the system AST nodes with source ranges. Something has to
//! fill that seam for the engine to be exercised and tested, so this module
//! provides a small, real one — not a generated PEG/tree-sitter grammar,
//! which spec.md's Non-goals explicitly rule out.

use crate::ast::*;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::location::SourceLocation;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
#[error("{loc}: {message}")]
pub struct ParseError {
    pub loc: SourceLocation,
    pub message: String,
}

/// External-collaborator seam: anything that can turn a source buffer into
/// a [`Module`] plus per-node locations. [`ReferenceParser`] is the concrete
/// implementation used by the REPL, LSP, and tests; a production deployment
/// may swap in a different front end without touching the inference or
/// completion engines.
pub trait Parser {
    fn parse(&self, filename: &str, src: &str) -> Result<Module, Vec<ParseError>>;
}

#[derive(Default)]
pub struct ReferenceParser;

impl Parser for ReferenceParser {
    fn parse(&self, filename: &str, src: &str) -> Result<Module, Vec<ParseError>> {
        parse_module(filename, src)
    }
}

pub fn parse_module(filename: &str, src: &str) -> Result<Module, Vec<ParseError>> {
    let tokens = Lexer::new(filename, src)
        .tokenize()
        .map_err(|e| vec![ParseError { loc: e.loc, message: e.message }])?;
    let mut p = ParserState {
        tokens,
        pos: 0,
        ids: NodeIdGen::default(),
        errors: Vec::new(),
    };
    let forms = p.parse_forms(&[TokenKind::Eof]);
    if p.errors.is_empty() {
        Ok(Module { forms })
    } else {
        Err(p.errors)
    }
}

struct ParserState {
    tokens: Vec<Token>,
    pos: usize,
    ids: NodeIdGen,
    errors: Vec<ParseError>,
}

impl ParserState {
    fn cur(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.cur().kind == kind
    }

    fn bump(&mut self) -> Token {
        let t = self.cur().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Option<Token> {
        if self.at(kind) {
            Some(self.bump())
        } else {
            self.errors.push(ParseError {
                loc: self.cur().loc.clone(),
                message: format!("expected {what}, found {:?}", self.cur().kind),
            });
            None
        }
    }

    fn ident(&mut self) -> Option<(String, SourceLocation)> {
        if let TokenKind::Ident(name) = self.cur().kind.clone() {
            let loc = self.cur().loc.clone();
            self.bump();
            Some((name, loc))
        } else {
            self.errors.push(ParseError {
                loc: self.cur().loc.clone(),
                message: format!("expected identifier, found {:?}", self.cur().kind),
            });
            None
        }
    }

    fn parse_forms(&mut self, stop: &[TokenKind]) -> Vec<Form> {
        let mut forms = Vec::new();
        while !stop.iter().any(|k| self.at(k)) {
            let before = self.pos;
            if let Some(form) = self.parse_form() {
                forms.push(form);
            }
            if self.pos == before {
                // Didn't make progress; skip the token to avoid looping forever.
                self.bump();
            }
        }
        forms
    }

    fn parse_form(&mut self) -> Option<Form> {
        match &self.cur().kind {
            TokenKind::Import => self.parse_import(),
            TokenKind::At => self.parse_directive(),
            TokenKind::Class => self.parse_type_decl(TypeDeclKind::Class),
            TokenKind::Record => self.parse_type_decl(TypeDeclKind::Record),
            TokenKind::Enum => self.parse_type_decl(TypeDeclKind::Enum),
            TokenKind::Fn => self.parse_fn_decl(),
            TokenKind::Let => self.parse_let(),
            _ => {
                let loc = self.cur().loc.clone();
                let id = self.ids.next();
                let expr = self.parse_expr()?;
                Some(Form::Expr(ExprStmt { id, loc, expr }))
            }
        }
    }

    fn parse_import(&mut self) -> Option<Form> {
        let loc = self.cur().loc.clone();
        let id = self.ids.next();
        self.bump(); // import
        let (module, _) = self.ident()?;
        Some(Form::Import(ImportForm {
            id,
            loc,
            module,
            unqualified: true,
        }))
    }

    fn parse_directive(&mut self) -> Option<Form> {
        let loc = self.cur().loc.clone();
        let id = self.ids.next();
        self.bump(); // @
        let (name, _) = self.ident()?;
        let mut args = Vec::new();
        if self.at(&TokenKind::LParen) {
            self.bump();
            while !self.at(&TokenKind::RParen) && !self.at(&TokenKind::Eof) {
                if let TokenKind::Str(s) = self.cur().kind.clone() {
                    args.push(s);
                    self.bump();
                } else if let TokenKind::Ident(s) = self.cur().kind.clone() {
                    args.push(s);
                    self.bump();
                } else {
                    break;
                }
                if self.at(&TokenKind::Comma) {
                    self.bump();
                }
            }
            self.expect(&TokenKind::RParen, "`)`");
        }
        Some(Form::Directive(DirectiveForm { id, loc, name, args }))
    }

    fn parse_type_ref(&mut self) -> Option<TypeRef> {
        if self.at(&TokenKind::LBracket) {
            self.bump();
            let inner = self.parse_type_ref()?;
            self.expect(&TokenKind::RBracket, "`]`");
            let non_null = if self.at(&TokenKind::Bang) {
                self.bump();
                true
            } else {
                false
            };
            return Some(TypeRef {
                name: "List".into(),
                non_null,
                list_of: Some(Box::new(inner)),
            });
        }
        let (name, _) = self.ident()?;
        let non_null = if self.at(&TokenKind::Bang) {
            self.bump();
            true
        } else {
            false
        };
        Some(TypeRef { name, non_null, list_of: None })
    }

    fn parse_type_decl(&mut self, kind: TypeDeclKind) -> Option<Form> {
        let loc = self.cur().loc.clone();
        let id = self.ids.next();
        self.bump(); // class/record/enum
        let (name, _) = self.ident()?;
        let mut fields = Vec::new();
        self.expect(&TokenKind::LBrace, "`{`")?;
        while !self.at(&TokenKind::RBrace) && !self.at(&TokenKind::Eof) {
            let (fname, _) = self.ident()?;
            self.expect(&TokenKind::Colon, "`:`");
            let type_name = self.parse_type_ref()?;
            fields.push(FieldDecl { name: fname, type_name, doc: None });
            if self.at(&TokenKind::Comma) {
                self.bump();
            }
        }
        self.expect(&TokenKind::RBrace, "`}`");
        Some(Form::TypeDecl(TypeDeclForm { id, loc, name, kind, fields, doc: None }))
    }

    fn parse_fn_decl(&mut self) -> Option<Form> {
        let loc = self.cur().loc.clone();
        let id = self.ids.next();
        self.bump(); // fn
        let (name, _) = self.ident()?;
        let mut params = Vec::new();
        self.expect(&TokenKind::LParen, "`(`")?;
        while !self.at(&TokenKind::RParen) && !self.at(&TokenKind::Eof) {
            let (pname, _) = self.ident()?;
            let type_ref = if self.at(&TokenKind::Colon) {
                self.bump();
                self.parse_type_ref()
            } else {
                None
            };
            params.push(ParamDecl { name: pname, type_ref, default: None });
            if self.at(&TokenKind::Comma) {
                self.bump();
            }
        }
        self.expect(&TokenKind::RParen, "`)`");
        let ret = if self.at(&TokenKind::Colon) {
            self.bump();
            self.parse_type_ref()
        } else {
            None
        };
        let body = if self.at(&TokenKind::LBrace) {
            Some(self.parse_block())
        } else {
            None
        };
        Some(Form::FnDecl(FnDeclForm {
            id,
            loc,
            name,
            params,
            ret,
            block_param: None,
            body,
            doc: None,
        }))
    }

    fn parse_let(&mut self) -> Option<Form> {
        let loc = self.cur().loc.clone();
        let id = self.ids.next();
        self.bump(); // let
        let (name, _) = self.ident()?;
        self.expect(&TokenKind::Equals, "`=`")?;
        let value = self.parse_expr()?;
        Some(Form::Let(LetForm { id, loc, name, value }))
    }

    fn parse_block(&mut self) -> Block {
        let loc = self.cur().loc.clone();
        let id = self.ids.next();
        self.bump(); // {
        let forms = self.parse_forms(&[TokenKind::RBrace, TokenKind::Eof]);
        self.expect(&TokenKind::RBrace, "`}`");
        Block { id, loc, forms }
    }

    fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_postfix()
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let loc = self.cur().loc.clone();
        match self.cur().kind.clone() {
            TokenKind::Int(v) => {
                let id = self.ids.next();
                self.bump();
                Some(Expr::Int(LitExpr { id, loc, value: v }))
            }
            TokenKind::Bool(v) => {
                let id = self.ids.next();
                self.bump();
                Some(Expr::Bool(LitExpr { id, loc, value: v }))
            }
            TokenKind::Str(v) => {
                let id = self.ids.next();
                self.bump();
                Some(Expr::Str(LitExpr { id, loc, value: v }))
            }
            TokenKind::Ident(name) => {
                let id = self.ids.next();
                self.bump();
                Some(Expr::Ident(IdentExpr { id, loc, name }))
            }
            TokenKind::LBrace => {
                // Disambiguate `{ field: value }` object literal from a block
                // by lookahead: `ident :` immediately inside.
                if self.looks_like_object_literal() {
                    Some(self.parse_object_literal())
                } else {
                    Some(Expr::Block(self.parse_block()))
                }
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr();
                self.expect(&TokenKind::RParen, "`)`");
                inner
            }
            _ => {
                self.errors.push(ParseError {
                    loc,
                    message: format!("unexpected token {:?}", self.cur().kind),
                });
                None
            }
        }
    }

    fn looks_like_object_literal(&self) -> bool {
        matches!(self.tokens.get(self.pos + 1).map(|t| &t.kind), Some(TokenKind::Ident(_)))
            && matches!(self.tokens.get(self.pos + 2).map(|t| &t.kind), Some(TokenKind::Colon))
    }

    fn parse_object_literal(&mut self) -> Expr {
        let loc = self.cur().loc.clone();
        let id = self.ids.next();
        self.bump(); // {
        let mut fields = Vec::new();
        while !self.at(&TokenKind::RBrace) && !self.at(&TokenKind::Eof) {
            let Some((fname, _)) = self.ident() else { break };
            self.expect(&TokenKind::Colon, "`:`");
            let Some(value) = self.parse_expr() else { break };
            fields.push((fname, value));
            if self.at(&TokenKind::Comma) {
                self.bump();
            }
        }
        self.expect(&TokenKind::RBrace, "`}`");
        Expr::Object(ObjectExpr { id, loc, fields })
    }

    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match &self.cur().kind {
                TokenKind::Dot => {
                    let loc = expr.loc().clone();
                    let id = self.ids.next();
                    self.bump();
                    let field_loc = self.cur().loc.clone();
                    let (field, _) = self.ident()?;
                    expr = Expr::Member(MemberExpr {
                        id,
                        loc,
                        receiver: Box::new(expr),
                        field,
                        field_loc,
                    });
                }
                TokenKind::LParen => {
                    let loc = expr.loc().clone();
                    let id = self.ids.next();
                    self.bump();
                    let mut args = Vec::new();
                    while !self.at(&TokenKind::RParen) && !self.at(&TokenKind::Eof) {
                        args.push(self.parse_call_arg()?);
                        if self.at(&TokenKind::Comma) {
                            self.bump();
                        }
                    }
                    self.expect(&TokenKind::RParen, "`)`");
                    let trailing_block = if self.at(&TokenKind::LBrace) {
                        Some(self.parse_block())
                    } else {
                        None
                    };
                    expr = Expr::Call(CallExpr {
                        id,
                        loc,
                        callee: Box::new(expr),
                        args,
                        trailing_block,
                    });
                }
                _ => break,
            }
        }
        Some(expr)
    }

    fn parse_call_arg(&mut self) -> Option<CallArg> {
        // `name: value` if the next two tokens are `ident :`, else positional.
        if let TokenKind::Ident(name) = self.cur().kind.clone() {
            if matches!(self.tokens.get(self.pos + 1).map(|t| &t.kind), Some(TokenKind::Colon)) {
                self.bump(); // name
                self.bump(); // :
                let value = self.parse_expr()?;
                return Some(CallArg { name: Some(name), value });
            }
        }
        let value = self.parse_expr()?;
        Some(CallArg { name: None, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Module {
        parse_module("test.dang", src).expect("parse ok")
    }

    #[test]
    fn parses_member_chain() {
        let m = parse("container.from(\"alpine\").withExec(args: [\"ls\"])");
        assert_eq!(m.forms.len(), 1);
    }

    #[test]
    fn parses_let_binding() {
        let m = parse("let a = container.xx");
        match &m.forms[0] {
            Form::Let(l) => assert_eq!(l.name, "a"),
            other => panic!("expected let, got {other:?}"),
        }
    }

    #[test]
    fn parses_fn_decl_with_named_args() {
        let m = parse("fn withExec(args: [String!]!, stdin: String): Container { container }");
        match &m.forms[0] {
            Form::FnDecl(f) => {
                assert_eq!(f.name, "withExec");
                assert_eq!(f.params.len(), 2);
            }
            other => panic!("expected fn decl, got {other:?}"),
        }
    }

    #[test]
    fn parses_object_literal() {
        let m = parse("let a = { x: 1, y: 2 }");
        match &m.forms[0] {
            Form::Let(l) => assert!(matches!(l.value, Expr::Object(_))),
            other => panic!("expected let, got {other:?}"),
        }
    }

    #[test]
    fn reports_error_on_unexpected_token() {
        let err = parse_module("test.dang", "let a = )").unwrap_err();
        assert!(!err.is_empty());
    }
}
