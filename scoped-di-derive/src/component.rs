use crate::attributes::{
    extract_attributes, ComponentAttributes, DefaultDefinition, FieldAttributes,
};
use crate::constructor::MAX_PARAMETER_COUNT;
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{Data, DataStruct, DeriveInput, Error, Field, Fields, Generics, Result, Type};

/// Single injected constructor parameter, bound to a local variable in the generated code.
pub struct InjectedParameter<'a> {
    pub binding: Ident,
    pub ty: &'a Type,
}

impl<'a> InjectedParameter<'a> {
    pub fn new(index: usize, ty: &'a Type) -> Self {
        Self {
            binding: format_ident!("parameter_{}", index),
            ty,
        }
    }
}

/// Generates `Injectable` and `Component` implementations. `construction` should evaluate to
/// `Result<Self, ContainerError>` and can use parameter bindings, which are resolved in order.
pub fn generate_component_impl(
    self_ty: TokenStream,
    generics: &Generics,
    parameters: &[InjectedParameter],
    construction: TokenStream,
) -> TokenStream {
    let (impl_generics, _, where_clause) = generics.split_for_impl();
    let bindings: Vec<_> = parameters.iter().map(|parameter| &parameter.binding).collect();
    let types: Vec<_> = parameters.iter().map(|parameter| parameter.ty).collect();

    quote! {
        #[automatically_derived]
        impl #impl_generics scoped_di::component::Injectable for #self_ty #where_clause {
            fn auto_provide(
                container: &mut scoped_di::container::Container,
            ) -> std::result::Result<bool, scoped_di::ContainerError> {
                scoped_di::component::provide_local::<Self>(container)
            }
        }

        #[automatically_derived]
        impl #impl_generics scoped_di::component::Component for #self_ty #where_clause {
            fn signature() -> scoped_di::component::Signature {
                scoped_di::component::Signature::new(vec![
                    #(<#types as scoped_di::component::Dependency>::parameter()),*
                ])
            }

            #[allow(unused_variables)]
            fn create(
                container: &mut scoped_di::container::Container,
            ) -> std::result::Result<Self, scoped_di::ContainerError> {
                #(
                    let #bindings = <#types as scoped_di::component::Dependency>::resolve(container)?;
                )*
                #construction
            }
        }
    }
}

fn default_initializer(field: &Field) -> Result<Option<TokenStream>> {
    let attributes = extract_attributes::<FieldAttributes>(&field.attrs)?;
    Ok(
        match attributes.and_then(|attributes| attributes.default) {
            Some(DefaultDefinition::Expr(path)) => Some(quote!(#path())),
            Some(DefaultDefinition::Default) => Some(quote!(std::default::Default::default())),
            None => None,
        },
    )
}

fn expand_struct_component(input: &DeriveInput, fields: &Fields) -> Result<TokenStream> {
    let mut parameters = Vec::new();
    let mut initializers = Vec::new();

    for field in fields {
        if let Some(initializer) = default_initializer(field)? {
            initializers.push(initializer);
        } else {
            let parameter = InjectedParameter::new(parameters.len(), &field.ty);
            let binding = &parameter.binding;
            initializers.push(quote!(#binding));
            parameters.push(parameter);
        }
    }

    if parameters.len() >= MAX_PARAMETER_COUNT {
        return Err(Error::new(
            input.ident.span(),
            format!(
                "Components can have at most {} injected fields - provide `{}` with an explicit builder instead!",
                MAX_PARAMETER_COUNT - 1,
                input.ident
            ),
        ));
    }

    let construction = match fields {
        Fields::Named(named) => {
            let idents = named.named.iter().map(|field| &field.ident);
            quote! {
                Self {
                    #(#idents: #initializers),*
                }
            }
        }
        Fields::Unnamed(_) => quote!(Self(#(#initializers),*)),
        Fields::Unit => quote!(Self),
    };

    let ident = &input.ident;
    let (_, ty_generics, _) = input.generics.split_for_impl();

    Ok(generate_component_impl(
        quote!(#ident #ty_generics),
        &input.generics,
        &parameters,
        quote!(std::result::Result::Ok(#construction)),
    ))
}

pub fn expand_component(input: &DeriveInput) -> Result<TokenStream> {
    if let Data::Struct(DataStruct { fields, .. }) = &input.data {
        let is_default = extract_attributes::<ComponentAttributes>(&input.attrs)?
            .map(|attributes| attributes.is_default)
            .unwrap_or(false);

        if is_default {
            let ident = &input.ident;
            let (_, ty_generics, _) = input.generics.split_for_impl();

            Ok(generate_component_impl(
                quote!(#ident #ty_generics),
                &input.generics,
                &[],
                quote!(std::result::Result::Ok(<Self as std::default::Default>::default())),
            ))
        } else {
            expand_struct_component(input, fields)
        }
    } else {
        Err(Error::new(
            input.span(),
            "Can only derive Component on structs!",
        ))
    }
}
