use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Attribute, Expr, Ident, ImplItem, ItemImpl, ItemStruct, LitStr, Token, parse::Parse,
    parse::ParseStream, parse_macro_input,
};

const VERB_ATTRS: &[&str] = &[
    "get", "head", "post", "put", "delete", "connect", "options", "patch", "all",
];

const ROUTE_ATTRS: &[&str] = &["route", "before", "after", "verbs"];

struct ControllerArgs {
    prefixes: Vec<LitStr>,
    before: Vec<Expr>,
    after: Vec<Expr>,
}

impl Parse for ControllerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut prefixes = Vec::new();
        let mut before = Vec::new();
        let mut after = Vec::new();

        while !input.is_empty() {
            let name: Ident = input.parse()?;
            if name == "prefix" {
                input.parse::<Token![=]>()?;
                prefixes.push(input.parse::<LitStr>()?);
            } else if name == "before" || name == "after" {
                input.parse::<Token![=]>()?;
                let content;
                syn::bracketed!(content in input);
                let items = content.parse_terminated(Expr::parse, Token![,])?;
                if name == "before" {
                    before.extend(items);
                } else {
                    after.extend(items);
                }
            } else if name == "verbs" || VERB_ATTRS.contains(&name.to_string().as_str()) {
                return Err(syn::Error::new_spanned(
                    &name,
                    "verbs can only be assigned to controller methods, not to the controller itself",
                ));
            } else {
                return Err(syn::Error::new_spanned(
                    &name,
                    "unsupported controller option; expected `prefix`, `before` or `after`",
                ));
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(ControllerArgs {
            prefixes,
            before,
            after,
        })
    }
}

pub fn controller_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ControllerArgs);
    let input = parse_macro_input!(item as ItemStruct);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(&input.generics, "generic controllers are not supported")
            .to_compile_error()
            .into();
    }

    TokenStream::from(generate_controller_impl(&args, &input))
}

fn generate_controller_impl(args: &ControllerArgs, input: &ItemStruct) -> TokenStream2 {
    let struct_name = &input.ident;
    let prefixes = &args.prefixes;
    let before = &args.before;
    let after = &args.after;

    quote! {
        #input

        impl ::rudder::ControllerRoot for #struct_name {
            fn root_state() -> ::rudder::RouterConfigState {
                let state = ::rudder::RouterConfigState::new();
                #(let state = state.with_path(&::rudder::ConfigScope::Root, #prefixes);)*
                #(let state = state.with_before(&::rudder::ConfigScope::Root, #before);)*
                #(let state = state.with_after(&::rudder::ConfigScope::Root, #after);)*
                state
            }
        }
    }
}

/// One declaration on a routed method, kept in source order.
enum RouteOp {
    Path(LitStr),
    Before(Expr),
    After(Expr),
    Verbs(Vec<TokenStream2>),
}

struct MethodRoutes {
    name: String,
    ops: Vec<RouteOp>,
}

pub fn routes_attribute(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemImpl);
    match generate_routes_impl(input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(error) => TokenStream::from(error.to_compile_error()),
    }
}

fn generate_routes_impl(input: ItemImpl) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "generic controllers are not supported",
        ));
    }
    if input.trait_.is_some() {
        return Err(syn::Error::new_spanned(
            &input.self_ty,
            "#[routes] must be applied to an inherent impl block",
        ));
    }

    let self_ty = &input.self_ty;
    let export_name = type_name(self_ty)?;

    let mut methods: Vec<MethodRoutes> = Vec::new();
    let mut clean_items: Vec<ImplItem> = Vec::new();

    for item in input.items.iter() {
        if let ImplItem::Fn(method) = item {
            let ops = extract_route_ops(&method.attrs)?;
            if !ops.is_empty() {
                methods.push(MethodRoutes {
                    name: method.sig.ident.to_string(),
                    ops,
                });
            }
            let mut clean_method = method.clone();
            clean_method.attrs.retain(|attr| !is_route_attr(attr));
            clean_items.push(ImplItem::Fn(clean_method));
        } else {
            clean_items.push(item.clone());
        }
    }

    let method_blocks = methods.iter().map(|method| {
        let name = &method.name;
        let ops = method.ops.iter().map(|op| match op {
            RouteOp::Path(path) => quote! {
                let state = state.with_path(&scope, #path);
            },
            RouteOp::Before(middleware) => quote! {
                let state = state.with_before(&scope, #middleware);
            },
            RouteOp::After(middleware) => quote! {
                let state = state.with_after(&scope, #middleware);
            },
            RouteOp::Verbs(verbs) => quote! {
                let state = state.with_verbs(#name, &[#(#verbs),*]);
            },
        });
        quote! {
            let state = {
                let scope = ::rudder::ConfigScope::method(#name);
                #(#ops)*
                state
            };
        }
    });

    Ok(quote! {
        impl #self_ty {
            #(#clean_items)*
        }

        impl ::rudder::RoutedController for #self_ty {
            fn routing_state() -> ::rudder::RouterConfigState {
                let state = <Self as ::rudder::ControllerRoot>::root_state();
                #(#method_blocks)*
                state
            }
        }

        ::rudder::inventory::submit! {
            ::rudder::ModuleRegistration {
                path: ::core::file!(),
                line: ::core::line!(),
                exports: || ::core::result::Result::Ok(
                    ::rudder::ModuleExports::new()
                        .with_named(#export_name, ::rudder::ExportValue::decorated::<#self_ty>()),
                ),
            }
        }
    })
}

fn extract_route_ops(attrs: &[Attribute]) -> syn::Result<Vec<RouteOp>> {
    let mut ops = Vec::new();

    for attr in attrs {
        let Some(ident) = attr.path().get_ident() else {
            continue;
        };
        let name = ident.to_string();

        if name == "route" {
            ops.push(RouteOp::Path(attr.parse_args::<LitStr>()?));
        } else if name == "before" {
            ops.push(RouteOp::Before(attr.parse_args::<Expr>()?));
        } else if name == "after" {
            ops.push(RouteOp::After(attr.parse_args::<Expr>()?));
        } else if name == "verbs" {
            let idents =
                attr.parse_args_with(|input: ParseStream| {
                    input.parse_terminated(Ident::parse, Token![,])
                })?;
            let mut verbs = Vec::new();
            for ident in idents {
                verbs.push(verb_tokens(&ident)?);
            }
            ops.push(RouteOp::Verbs(verbs));
        } else if VERB_ATTRS.contains(&name.as_str()) {
            if let syn::Meta::List(_) = &attr.meta {
                ops.push(RouteOp::Path(attr.parse_args::<LitStr>()?));
            }
            ops.push(RouteOp::Verbs(vec![verb_tokens(ident)?]));
        }
    }

    Ok(ops)
}

fn verb_tokens(ident: &Ident) -> syn::Result<TokenStream2> {
    let variant = match ident.to_string().to_lowercase().as_str() {
        "get" => quote! { Get },
        "head" => quote! { Head },
        "post" => quote! { Post },
        "put" => quote! { Put },
        "delete" => quote! { Delete },
        "connect" => quote! { Connect },
        "options" => quote! { Options },
        "patch" => quote! { Patch },
        "all" => quote! { All },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "unknown HTTP verb; expected one of GET, HEAD, POST, PUT, DELETE, CONNECT, OPTIONS, PATCH, ALL",
            ));
        }
    };
    Ok(quote! { ::rudder::HttpVerb::#variant })
}

fn is_route_attr(attr: &Attribute) -> bool {
    attr.path().get_ident().is_some_and(|ident| {
        let name = ident.to_string();
        ROUTE_ATTRS.contains(&name.as_str()) || VERB_ATTRS.contains(&name.as_str())
    })
}

fn type_name(self_ty: &syn::Type) -> syn::Result<String> {
    if let syn::Type::Path(type_path) = self_ty {
        if let Some(segment) = type_path.path.segments.last() {
            return Ok(segment.ident.to_string());
        }
    }
    Err(syn::Error::new_spanned(
        self_ty,
        "#[routes] requires a plain type name",
    ))
}
