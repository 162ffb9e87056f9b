use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Error, Generics, Ident, Item, Result};

fn generate_type_impl(ident: &Ident, generics: &Generics) -> TokenStream {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    quote! {
        #[automatically_derived]
        impl #impl_generics scoped_di::component::Injectable for #ident #ty_generics #where_clause {}
    }
}

pub fn expand_injectable(item: &Item) -> Result<TokenStream> {
    let generated = match item {
        Item::Trait(item_trait) => {
            if !item_trait.generics.params.is_empty() {
                return Err(Error::new(
                    item_trait.generics.span(),
                    "Generic traits cannot be injectable!",
                ));
            }

            let ident = &item_trait.ident;
            quote! {
                #[automatically_derived]
                impl scoped_di::component::Injectable for dyn #ident {}

                #[automatically_derived]
                impl scoped_di::component::Injectable
                    for dyn #ident + std::marker::Send + std::marker::Sync {}
            }
        }
        Item::Struct(item_struct) => generate_type_impl(&item_struct.ident, &item_struct.generics),
        Item::Enum(item_enum) => generate_type_impl(&item_enum.ident, &item_enum.generics),
        _ => {
            return Err(Error::new(
                item.span(),
                "Only traits, structs and enums can be injectable!",
            ))
        }
    };

    Ok(quote! {
        #item

        #generated
    })
}
