use darling::ast::NestedMeta;
use darling::FromMeta;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Field, Fields, ItemStruct, Type};

#[derive(Debug, Default, FromMeta)]
struct ControllerArgs {
    #[darling(default)]
    name: Option<String>,
}

pub fn controller_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr_args = match NestedMeta::parse_meta_list(attr.into()) {
        Ok(list) => list,
        Err(e) => return TokenStream::from(darling::Error::from(e).write_errors()),
    };
    let args = match ControllerArgs::from_list(&attr_args) {
        Ok(args) => args,
        Err(e) => return TokenStream::from(e.write_errors()),
    };
    let input = parse_macro_input!(item as ItemStruct);

    generate_controller_impl(&args, &input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn generate_controller_impl(args: &ControllerArgs, input: &ItemStruct) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[controller] does not support generic structs",
        ));
    }

    let fields = match &input.fields {
        Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "#[controller] only supports structs with named fields",
            ))
        }
    };

    let mut contexts = fields.iter().filter(|field| is_context(field));
    let Some(context) = contexts.next() else {
        return Err(syn::Error::new_spanned(
            struct_name,
            "#[controller] requires a `ControllerContext` field",
        ));
    };
    if let Some(extra) = contexts.next() {
        return Err(syn::Error::new_spanned(
            extra,
            "#[controller] allows only one `ControllerContext` field",
        ));
    }
    let context_field = &context.ident;

    let initializers = fields.iter().map(|field| {
        let field_name = &field.ident;
        if is_context(field) {
            quote! { #field_name: context }
        } else {
            quote! { #field_name: ::core::default::Default::default() }
        }
    });

    let name = args
        .name
        .clone()
        .unwrap_or_else(|| struct_name.to_string());

    Ok(quote! {
        #input

        impl ::allo_controller::Controller for #struct_name {
            const NAME: &'static str = #name;

            fn create(context: ::allo_controller::ControllerContext) -> Self {
                Self { #(#initializers),* }
            }

            fn context(&self) -> &::allo_controller::ControllerContext {
                &self.#context_field
            }

            fn context_mut(&mut self) -> &mut ::allo_controller::ControllerContext {
                &mut self.#context_field
            }
        }
    })
}

fn is_context(field: &Field) -> bool {
    match &field.ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "ControllerContext"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_generates_impl() {
        let input: ItemStruct = parse_quote! {
            struct HomepageController {
                ctx: ControllerContext,
                visits: u32,
            }
        };
        let output = generate_controller_impl(&ControllerArgs::default(), &input)
            .unwrap()
            .to_string();

        assert!(output.contains("\"HomepageController\""));
        assert!(output.contains("ctx : context"));
        assert!(output.contains("visits : :: core :: default :: Default :: default ()"));
    }

    #[test]
    fn test_custom_name() {
        let input: ItemStruct = parse_quote! {
            struct Home { ctx: allo_controller::ControllerContext }
        };
        let args = ControllerArgs {
            name: Some("HomepageController".to_string()),
        };
        let output = generate_controller_impl(&args, &input).unwrap().to_string();
        assert!(output.contains("\"HomepageController\""));
    }

    #[test]
    fn test_context_field_required_once() {
        let missing: ItemStruct = parse_quote! { struct Home { visits: u32 } };
        assert!(generate_controller_impl(&ControllerArgs::default(), &missing).is_err());

        let twice: ItemStruct = parse_quote! {
            struct Home { a: ControllerContext, b: ControllerContext }
        };
        assert!(generate_controller_impl(&ControllerArgs::default(), &twice).is_err());

        let tuple: ItemStruct = parse_quote! { struct Home(ControllerContext); };
        assert!(generate_controller_impl(&ControllerArgs::default(), &tuple).is_err());
    }
}
