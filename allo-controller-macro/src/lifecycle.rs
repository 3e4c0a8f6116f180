use crate::case::snake_to_camel;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, FnArg, GenericArgument, ImplItem, ImplItemFn, ItemImpl, PatType,
    PathArguments, Type,
};

const HOOKS: [&str; 4] = ["startup", "before_render", "after_render", "shutdown"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Role {
    Hook,
    /// Carries the dependency name.
    Inject(String),
    View,
}

fn role_of(ident: &str) -> Option<Role> {
    if HOOKS.contains(&ident) {
        return Some(Role::Hook);
    }
    let suffix_of = |prefix: &str| ident.strip_prefix(prefix).filter(|s| !s.is_empty());
    if let Some(name) = suffix_of("inject_") {
        return Some(Role::Inject(snake_to_camel(name)));
    }
    if suffix_of("action_").or_else(|| suffix_of("render_")).is_some() {
        return Some(Role::View);
    }
    None
}

pub fn lifecycle_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[lifecycle] takes no arguments",
        )
        .into_compile_error()
        .into();
    }
    let input = parse_macro_input!(item as ItemImpl);
    generate_lifecycle_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn generate_lifecycle_impl(input: &ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[lifecycle] must be placed on an inherent impl block",
        ));
    }
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[lifecycle] does not support generic impl blocks",
        ));
    }

    let mut shims = Vec::new();
    let mut entries = Vec::new();

    for item in &input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let ident = method.sig.ident.to_string();
        let Some(role) = role_of(&ident) else {
            continue;
        };
        check_receiver(method)?;

        let shim = format_ident!("__allo_lifecycle_{}", ident);
        let convention = snake_to_camel(&ident);
        let (shim_fn, handler) = generate_shim(method, &role, &shim)?;
        shims.push(shim_fn);
        entries.push(quote! { (#convention, #handler) });
    }

    let self_ty = &input.self_ty;
    Ok(quote! {
        #input

        impl #self_ty {
            #(#shims)*
        }

        impl ::allo_controller::ControllerMethods for #self_ty {
            fn methods() -> ::std::vec::Vec<(
                &'static str,
                ::allo_controller::controller::Handler<Self>,
            )> {
                ::std::vec![#(#entries),*]
            }
        }
    })
}

fn generate_shim(
    method: &ImplItemFn,
    role: &Role,
    shim: &syn::Ident,
) -> syn::Result<(TokenStream2, TokenStream2)> {
    let method_name = &method.sig.ident;
    let args = typed_args(method);
    let call_await = method.sig.asyncness.map(|_| quote! { .await });
    let output = quote! {
        ::allo_controller::controller::BoxFuture<
            'a,
            ::allo_controller::Result<::allo_controller::Flow>,
        >
    };

    match role {
        Role::Hook => {
            if let Some(extra) = args.first() {
                return Err(syn::Error::new_spanned(
                    extra,
                    format!("`{method_name}` is a lifecycle hook and takes no arguments"),
                ));
            }
            Ok((
                quote! {
                    #[doc(hidden)]
                    fn #shim<'a>(controller: &'a mut Self) -> #output {
                        ::std::boxed::Box::pin(async move {
                            ::allo_controller::IntoOutcome::into_outcome(
                                controller.#method_name() #call_await,
                            )
                        })
                    }
                },
                quote! { ::allo_controller::controller::Handler::Hook(Self::#shim) },
            ))
        }
        Role::Inject(name) => {
            let dependency_ty = match args.as_slice() {
                [arg] => arc_inner(&arg.ty).ok_or_else(|| {
                    syn::Error::new_spanned(&arg.ty, "inject methods take an `Arc<T>` argument")
                })?,
                _ => {
                    return Err(syn::Error::new_spanned(
                        &method.sig,
                        "inject methods take exactly one `Arc<T>` argument",
                    ))
                }
            };
            Ok((
                quote! {
                    #[doc(hidden)]
                    fn #shim<'a>(
                        controller: &'a mut Self,
                        dependency: ::allo_controller::di::Dependency,
                    ) -> #output {
                        ::std::boxed::Box::pin(async move {
                            let dependency =
                                ::allo_controller::di::downcast::<#dependency_ty>(#name, dependency)?;
                            ::allo_controller::IntoOutcome::into_outcome(
                                controller.#method_name(dependency) #call_await,
                            )
                        })
                    }
                },
                quote! { ::allo_controller::controller::Handler::Inject(Self::#shim) },
            ))
        }
        Role::View => {
            let call = match args.as_slice() {
                [] => quote! {{
                    let _ = params;
                    controller.#method_name() #call_await
                }},
                [_] => quote! { controller.#method_name(params) #call_await },
                _ => {
                    return Err(syn::Error::new_spanned(
                        &method.sig,
                        "action and render methods take at most one `&Params` argument",
                    ))
                }
            };
            Ok((
                quote! {
                    #[doc(hidden)]
                    fn #shim<'a>(
                        controller: &'a mut Self,
                        params: &'a ::allo_controller::Params,
                    ) -> #output {
                        ::std::boxed::Box::pin(async move {
                            ::allo_controller::IntoOutcome::into_outcome(#call)
                        })
                    }
                },
                quote! { ::allo_controller::controller::Handler::View(Self::#shim) },
            ))
        }
    }
}

fn check_receiver(method: &ImplItemFn) -> syn::Result<()> {
    match method.sig.inputs.first() {
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() => Ok(()),
        _ => Err(syn::Error::new_spanned(
            &method.sig,
            "lifecycle methods must take `&mut self`",
        )),
    }
}

fn typed_args(method: &ImplItemFn) -> Vec<&PatType> {
    method
        .sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(pat_type) => Some(pat_type),
            FnArg::Receiver(_) => None,
        })
        .collect()
}

fn arc_inner(ty: &Type) -> Option<Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Arc" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner.clone()),
        _ => None,
    }
}
