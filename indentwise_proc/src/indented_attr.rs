// SPDX-License-Identifier: MIT OR Apache-2.0
use proc_macro::{Delimiter, TokenStream, TokenTree};

/// Options accepted inside `#[indented(...)]`.
#[derive(Debug, Default)]
struct AttrOptions {
    announce: bool,
    name: Option<String>,
}

fn compile_error(message: &str) -> TokenStream {
    format!("compile_error!({message:?});").parse().unwrap()
}

/// Parses `announce` and `name = "..."`, separated by commas.
fn parse_attr(attr: TokenStream) -> Result<AttrOptions, String> {
    let mut options = AttrOptions::default();
    let mut tokens = attr.into_iter();
    while let Some(token) = tokens.next() {
        match token {
            TokenTree::Ident(ident) => match ident.to_string().as_str() {
                "announce" => options.announce = true,
                "name" => {
                    match tokens.next() {
                        Some(TokenTree::Punct(p)) if p.as_char() == '=' => {}
                        _ => return Err("expected `=` after `name`".to_string()),
                    }
                    match tokens.next() {
                        Some(TokenTree::Literal(lit)) => {
                            let raw = lit.to_string();
                            let Some(unquoted) = raw
                                .strip_prefix('"')
                                .and_then(|s| s.strip_suffix('"'))
                            else {
                                return Err("`name` must be a string literal".to_string());
                            };
                            options.name = Some(unquoted.to_string());
                        }
                        _ => return Err("`name` must be a string literal".to_string()),
                    }
                }
                other => return Err(format!("unknown #[indented] option `{other}`")),
            },
            TokenTree::Punct(p) if p.as_char() == ',' => {}
            other => return Err(format!("unexpected token `{other}` in #[indented]")),
        }
    }
    Ok(options)
}

/// Implementation of the `#[indented]` attribute macro.
///
/// Rewrites the function body so that a `DepthGuard` is held for the whole
/// body. With `announce`, entry and exit lines are logged at the caller's depth
/// from the function's own module, so they carry the caller-visible target.
pub fn indented_attr_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let options = match parse_attr(attr) {
        Ok(options) => options,
        Err(message) => return compile_error(&message),
    };

    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    let mut fn_name: Option<String> = None;
    let mut body_idx: Option<usize> = None;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            TokenTree::Ident(ident) if ident.to_string() == "fn" && fn_name.is_none() => {
                if let Some(TokenTree::Ident(name)) = tokens.get(i + 1) {
                    let name = name.to_string();
                    fn_name = Some(name.strip_prefix("r#").unwrap_or(&name).to_string());
                }
            }
            // the body is the last brace group; where clauses and return types come before it
            TokenTree::Group(g) if g.delimiter() == Delimiter::Brace && fn_name.is_some() => {
                body_idx = Some(i);
            }
            _ => {}
        }
    }

    let Some(fn_name) = fn_name else {
        return compile_error("#[indented] can only be applied to functions");
    };
    let Some(body_idx) = body_idx else {
        return compile_error("#[indented] requires a function with a body");
    };

    let body_tokens = if let TokenTree::Group(g) = &tokens[body_idx] {
        g.stream()
    } else {
        return compile_error("expected function body");
    };

    let operation = options.name.unwrap_or(fn_name);

    let guard_src = if options.announce {
        // the announcement text is a format string on the other side
        let shown = operation.replace('{', "{{").replace('}', "}}");
        format!(
            r#"{{
                indentwise::hidden::tracing::debug!("Entering {shown}");
                indentwise::hidden::DepthGuard::with_exit("{operation}", || {{
                    indentwise::hidden::tracing::debug!("Exiting {shown}");
                }})
            }}"#
        )
    } else {
        format!(r#"indentwise::hidden::DepthGuard::enter("{operation}")"#)
    };

    let new_body_src = format!(
        r#"{{
            let _indentwise_depth_guard = {guard_src};
            {{ {body_tokens} }}
        }}"#
    );

    let new_body: TokenStream = new_body_src.parse().unwrap();
    let new_body_group = new_body.into_iter().next().unwrap();

    tokens[body_idx] = new_body_group;

    tokens.into_iter().collect()
}
