//! Statement classification using syn.
//!
//! A code cell is parsed as the body of a block, so it may mix items (`use`,
//! `fn`, `struct`), `let` bindings, and expression statements, with or
//! without a trailing expression.
//!
//! A show-doc invocation is either the macro form `show_doc!(Point)`, which
//! accepts any item name, or the call form `show_doc(area)` for values.

use syn::ext::IdentExt;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Expr, Item, Macro, Stmt, Token};

use super::tree::{DefinitionKind, ParseTree, Statement};

/// Parse `source` into top-level statements and classify each one.
pub fn parse_source(source: &str, show_doc_name: &str) -> syn::Result<ParseTree> {
    let stmts = syn::Block::parse_within.parse_str(source)?;
    let statements = stmts
        .iter()
        .map(|stmt| classify(stmt, show_doc_name))
        .collect();
    Ok(ParseTree::new(statements))
}

fn classify(stmt: &Stmt, show_doc_name: &str) -> Statement {
    match stmt {
        Stmt::Item(Item::Use(_) | Item::ExternCrate(_)) => Statement::Import,
        Stmt::Item(item) => match definition(item) {
            Some((name, kind)) => Statement::Definition { name, kind },
            None => Statement::Other,
        },
        Stmt::Expr(Expr::Call(call), _) if is_path_named(&call.func, show_doc_name) => {
            Statement::ShowDoc {
                target: first_identifier(&call.args),
            }
        }
        Stmt::Macro(stmt) if stmt.mac.path.is_ident(show_doc_name) => Statement::ShowDoc {
            target: macro_target(&stmt.mac),
        },
        Stmt::Expr(Expr::Macro(expr), _) if expr.mac.path.is_ident(show_doc_name) => {
            Statement::ShowDoc {
                target: macro_target(&expr.mac),
            }
        }
        _ => Statement::Other,
    }
}

fn definition(item: &Item) -> Option<(String, DefinitionKind)> {
    let (ident, kind) = match item {
        Item::Fn(f) => (&f.sig.ident, DefinitionKind::Function),
        Item::Struct(s) => (&s.ident, DefinitionKind::Struct),
        Item::Enum(e) => (&e.ident, DefinitionKind::Enum),
        Item::Trait(t) => (&t.ident, DefinitionKind::Trait),
        Item::Union(u) => (&u.ident, DefinitionKind::Union),
        _ => return None,
    };
    Some((ident.unraw().to_string(), kind))
}

/// Whether `expr` is the bare, unqualified path `name`.
fn is_path_named(expr: &Expr, name: &str) -> bool {
    match expr {
        Expr::Path(path) => path.qself.is_none() && path.path.is_ident(name),
        _ => false,
    }
}

/// The first argument, when it is a plain identifier.
fn first_identifier(args: &Punctuated<Expr, Token![,]>) -> Option<String> {
    match args.first()? {
        Expr::Path(path) if path.qself.is_none() => {
            path.path.get_ident().map(|ident| ident.unraw().to_string())
        }
        _ => None,
    }
}

/// The first macro argument, when the body parses as comma-separated expressions.
fn macro_target(mac: &Macro) -> Option<String> {
    mac.parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated)
        .ok()
        .and_then(|args| first_identifier(&args))
}
