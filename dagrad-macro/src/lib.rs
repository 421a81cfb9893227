use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, BinOp, Expr, ExprLit, Lit, UnOp};

/// Build a `dagrad::Expression` from Rust expression syntax.
///
/// `^` is the power operator. It binds looser than `+` in Rust, so
/// parenthesize it: `expr!((x ^ 2) + (x ^ 2))`. Calls to `exp`, `log`,
/// `sin` and `cos` apply the unary operators, and `{ e }` splices an
/// existing `Expression` value.
#[proc_macro]
pub fn expr(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let input = parse_macro_input!(input as Expr);

    match traverse_expr(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}

fn number(lit: &ExprLit, negate: bool) -> syn::Result<TokenStream2> {
    match lit.lit {
        Lit::Int(_) | Lit::Float(_) => {
            let sign = if negate { quote! { - } } else { quote! {} };
            Ok(quote! {
                ::dagrad::Expression::constant(#sign (#lit as f64))
            })
        }
        _ => Err(syn::Error::new_spanned(lit, "only numeric literals are supported")),
    }
}

fn traverse_expr(input: &Expr) -> syn::Result<TokenStream2> {
    match input {
        Expr::Binary(ex) => {
            let op = match ex.op {
                BinOp::Add(_) => quote! { ADD },
                BinOp::Sub(_) => quote! { SUB },
                BinOp::Mul(_) => quote! { MUL },
                BinOp::Div(_) => quote! { DIV },
                BinOp::BitXor(_) => quote! { POW },
                _ => {
                    return Err(syn::Error::new_spanned(
                        &ex.op,
                        "expected one of `+`, `-`, `*`, `/`, `^`",
                    ))
                }
            };
            let lhs = traverse_expr(&ex.left)?;
            let rhs = traverse_expr(&ex.right)?;
            Ok(quote! {
                ::dagrad::Expression::binary(#lhs, ::dagrad::Operator::#op, #rhs)
            })
        }
        Expr::Paren(ex) => traverse_expr(&ex.expr),
        Expr::Group(ex) => traverse_expr(&ex.expr),
        Expr::Lit(lit) => number(lit, false),
        Expr::Unary(ex) => match (&ex.op, &*ex.expr) {
            (UnOp::Neg(_), Expr::Lit(lit)) => number(lit, true),
            _ => Err(syn::Error::new_spanned(
                ex,
                "only negative numeric literals are supported",
            )),
        },
        Expr::Path(path) => {
            let name = path
                .path
                .get_ident()
                .ok_or_else(|| syn::Error::new_spanned(path, "expected a variable name"))?
                .to_string();
            Ok(quote! {
                ::dagrad::Expression::variable(#name)
            })
        }
        Expr::Call(call) => {
            let func = match &*call.func {
                Expr::Path(func) => func.path.get_ident().map(|id| id.to_string()),
                _ => None,
            };
            let op = match func.as_deref() {
                Some("exp") => quote! { EXP },
                Some("log") => quote! { LOG },
                Some("sin") => quote! { SIN },
                Some("cos") => quote! { COS },
                _ => {
                    return Err(syn::Error::new_spanned(
                        &call.func,
                        "expected one of `exp`, `log`, `sin`, `cos`",
                    ))
                }
            };
            let arg = match (call.args.len(), call.args.first()) {
                (1, Some(arg)) => traverse_expr(arg)?,
                _ => {
                    return Err(syn::Error::new_spanned(
                        &call.args,
                        "unary functions take exactly one argument",
                    ))
                }
            };
            Ok(quote! {
                ::dagrad::Expression::unary(::dagrad::Operator::#op, #arg)
            })
        }
        Expr::Block(block) => Ok(quote! {
            ::dagrad::Expression::clone(&#block)
        }),
        _ => Err(syn::Error::new_spanned(input, "unsupported expression")),
    }
}
