use crate::component::expand_component;
use crate::constructor::expand_component_constructors;
use crate::injectable::expand_injectable;
use proc_macro::TokenStream;
use proc_macro2::Span;
use syn::{parse_macro_input, DeriveInput, Error, Item, ItemImpl};

mod attributes;
mod component;
mod constructor;
mod injectable;

fn reject_arguments(attr: TokenStream, name: &str) -> Option<TokenStream> {
    if attr.is_empty() {
        None
    } else {
        Some(
            Error::new(
                Span::call_site(),
                format!("#[{name}] does not accept arguments!"),
            )
            .into_compile_error()
            .into(),
        )
    }
}

#[proc_macro_derive(Component, attributes(component))]
pub fn generate_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_component(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

#[proc_macro_attribute]
pub fn injectable(attr: TokenStream, input: TokenStream) -> TokenStream {
    if let Some(error) = reject_arguments(attr, "injectable") {
        return error;
    }

    let input = parse_macro_input!(input as Item);
    expand_injectable(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

#[proc_macro_attribute]
pub fn component_constructors(attr: TokenStream, input: TokenStream) -> TokenStream {
    if let Some(error) = reject_arguments(attr, "component_constructors") {
        return error;
    }

    let input = parse_macro_input!(input as ItemImpl);
    expand_component_constructors(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}
