use crate::attributes::{extract_attributes, ConstructorAttributes, COMPONENT};
use crate::component::{generate_component_impl, InjectedParameter};
use itertools::Itertools;
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    Error, FnArg, GenericArgument, ImplItem, ImplItemFn, ItemImpl, PathArguments, Result,
    ReturnType, Type,
};

/// Upper bound (exclusive) for the number of constructor parameters.
pub const MAX_PARAMETER_COUNT: usize = 100;

/// An associated function which can construct the type.
pub struct ConstructorCandidate<'a> {
    pub ident: &'a Ident,
    pub parameters: Vec<&'a Type>,
    pub is_fallible: bool,
}

impl ConstructorCandidate<'_> {
    #[inline]
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

fn is_self_type(ty: &Type, self_ty: &Type) -> bool {
    if let Type::Path(path) = ty {
        if path.qself.is_none() && path.path.is_ident("Self") {
            return true;
        }
    }

    quote!(#ty).to_string() == quote!(#self_ty).to_string()
}

fn is_error_ptr(ty: &Type) -> bool {
    if let Type::Path(path) = ty {
        path.qself.is_none()
            && path
                .path
                .segments
                .last()
                .map(|segment| segment.ident == "ErrorPtr" && segment.arguments.is_none())
                .unwrap_or(false)
    } else {
        false
    }
}

/// Returns `Some(is_fallible)` for `Self` and `Result<Self, ErrorPtr>` return types. Other
/// results of `Self` are rejected, since their errors cannot be forwarded.
fn constructed_type(output: &ReturnType, self_ty: &Type) -> Result<Option<bool>> {
    let ReturnType::Type(_, ty) = output else {
        return Ok(None);
    };

    if is_self_type(ty, self_ty) {
        return Ok(Some(false));
    }

    let Type::Path(path) = ty.as_ref() else {
        return Ok(None);
    };

    let Some(segment) = path.path.segments.last() else {
        return Ok(None);
    };
    if segment.ident != "Result" {
        return Ok(None);
    }

    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return Ok(None);
    };

    let mut arguments = arguments.args.iter();
    match arguments.next() {
        Some(GenericArgument::Type(ok_ty)) if is_self_type(ok_ty, self_ty) => {}
        _ => return Ok(None),
    }

    match (arguments.next(), arguments.next()) {
        (Some(GenericArgument::Type(error_ty)), None) if is_error_ptr(error_ty) => Ok(Some(true)),
        _ => Err(Error::new(
            ty.span(),
            "Fallible constructors must return `Result<Self, ErrorPtr>` - convert the error with `error_ptr` or mark the function with #[component(ignore)]!",
        )),
    }
}

fn to_candidate<'a>(
    function: &'a ImplItemFn,
    self_ty: &Type,
) -> Result<Option<ConstructorCandidate<'a>>> {
    let ignore = extract_attributes::<ConstructorAttributes>(&function.attrs)?
        .map(|attributes| attributes.ignore)
        .unwrap_or(false);

    let signature = &function.sig;
    if ignore
        || signature.receiver().is_some()
        || !signature.generics.params.is_empty()
        || signature.asyncness.is_some()
        || signature.variadic.is_some()
    {
        return Ok(None);
    }

    Ok(
        constructed_type(&signature.output, self_ty)?.map(|is_fallible| ConstructorCandidate {
            ident: &signature.ident,
            parameters: signature
                .inputs
                .iter()
                .filter_map(|argument| match argument {
                    FnArg::Typed(argument) => Some(argument.ty.as_ref()),
                    FnArg::Receiver(_) => None,
                })
                .collect(),
            is_fallible,
        }),
    )
}

/// Finds all candidate constructors in given impl block.
pub fn collect_candidates(item_impl: &ItemImpl) -> Result<Vec<ConstructorCandidate<'_>>> {
    item_impl
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(function) => to_candidate(function, &item_impl.self_ty).transpose(),
            _ => None,
        })
        .try_collect()
}

/// Selects the candidate with the shortest arity, which is not shared with any other candidate.
pub fn deduce_constructor<'a, 'b>(
    candidates: &'b [ConstructorCandidate<'a>],
) -> Option<&'b ConstructorCandidate<'a>> {
    (0..MAX_PARAMETER_COUNT).find_map(|arity| {
        candidates
            .iter()
            .filter(|candidate| candidate.arity() == arity)
            .exactly_one()
            .ok()
    })
}

fn strip_helper_attributes(item_impl: &mut ItemImpl) {
    for item in &mut item_impl.items {
        if let ImplItem::Fn(function) = item {
            function
                .attrs
                .retain(|attribute| !attribute.path().is_ident(COMPONENT));
        }
    }
}

pub fn expand_component_constructors(item_impl: &ItemImpl) -> Result<TokenStream> {
    if item_impl.trait_.is_some() {
        return Err(Error::new(
            item_impl.span(),
            "Component constructors can only be declared in inherent impl blocks!",
        ));
    }

    let self_ident = if let Type::Path(path) = item_impl.self_ty.as_ref() {
        path.path
            .segments
            .last()
            .map(|segment| &segment.ident)
            .ok_or_else(|| Error::new(path.span(), "Missing type identifier!"))?
    } else {
        return Err(Error::new(
            item_impl.self_ty.span(),
            "Component constructors are only available for named types!",
        ));
    };

    let candidates = collect_candidates(item_impl)?;
    let constructor = deduce_constructor(&candidates).ok_or_else(|| {
        Error::new(
            item_impl.self_ty.span(),
            format!(
                "Cannot deduce an unambiguous constructor for `{}` - provide it with an explicit builder instead!",
                self_ident
            ),
        )
    })?;

    let parameters: Vec<_> = constructor
        .parameters
        .iter()
        .enumerate()
        .map(|(index, ty)| InjectedParameter::new(index, ty))
        .collect();
    let bindings = parameters.iter().map(|parameter| &parameter.binding);
    let ident = constructor.ident;

    let construction = if constructor.is_fallible {
        quote! {
            Self::#ident(#(#bindings),*).map_err(scoped_di::ContainerError::construction::<Self>)
        }
    } else {
        quote!(std::result::Result::Ok(Self::#ident(#(#bindings),*)))
    };

    let self_ty = &item_impl.self_ty;
    let generated = generate_component_impl(
        quote!(#self_ty),
        &item_impl.generics,
        &parameters,
        construction,
    );

    let mut item_impl = item_impl.clone();
    strip_helper_attributes(&mut item_impl);

    Ok(quote! {
        #item_impl

        #generated
    })
}

#[cfg(test)]
mod tests {
    use crate::constructor::{
        collect_candidates, deduce_constructor, expand_component_constructors,
        MAX_PARAMETER_COUNT,
    };
    use syn::{parse_quote, ItemImpl};

    fn deduced_name(item_impl: &ItemImpl) -> Option<String> {
        let candidates = collect_candidates(item_impl).unwrap();
        deduce_constructor(&candidates).map(|candidate| candidate.ident.to_string())
    }

    #[test]
    fn should_select_shortest_unambiguous_arity() {
        let item_impl: ItemImpl = parse_quote! {
            impl TestComponent {
                fn first(a: ComponentInstancePtr<A>) -> Self { todo!() }
                fn second(b: ComponentInstancePtr<B>) -> Self { todo!() }
                fn empty() -> Self { todo!() }
                fn full(a: ComponentInstancePtr<A>, b: ComponentInstancePtr<B>, c: ComponentInstancePtr<C>) -> Self { todo!() }
            }
        };

        assert_eq!(deduced_name(&item_impl).as_deref(), Some("empty"));
    }

    #[test]
    fn should_skip_ambiguous_arity() {
        let item_impl: ItemImpl = parse_quote! {
            impl TestComponent {
                fn first(a: ComponentInstancePtr<A>) -> Self { todo!() }
                fn second(b: ComponentInstancePtr<B>) -> TestComponent { todo!() }
                fn full(a: ComponentInstancePtr<A>, b: ComponentInstancePtr<B>, c: ComponentInstancePtr<C>) -> Self { todo!() }
            }
        };

        assert_eq!(deduced_name(&item_impl).as_deref(), Some("full"));
    }

    #[test]
    fn should_only_consider_constructors() {
        let item_impl: ItemImpl = parse_quote! {
            impl TestComponent {
                fn method(&self) -> Self { todo!() }
                fn generic<T>() -> Self { todo!() }
                async fn asynchronous() -> Self { todo!() }
                fn other() -> i8 { todo!() }
                #[component(ignore)]
                fn ignored() -> Self { todo!() }
                fn fallible(a: ComponentInstancePtr<A>) -> Result<Self, ErrorPtr> { todo!() }
            }
        };

        let candidates = collect_candidates(&item_impl).unwrap();

        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].is_fallible);
        assert_eq!(candidates[0].arity(), 1);
    }

    #[test]
    fn should_not_deduce_fully_ambiguous_constructors() {
        let item_impl: ItemImpl = parse_quote! {
            impl TestComponent {
                fn first() -> Self { todo!() }
                fn second() -> Self { todo!() }
            }
        };

        assert_eq!(deduced_name(&item_impl), None);
        assert!(expand_component_constructors(&item_impl).is_err());
    }

    #[test]
    fn should_not_deduce_constructors_above_limit() {
        let parameters = (0..MAX_PARAMETER_COUNT)
            .map(|index| format!("p{index}: ComponentInstancePtr<A>"))
            .collect::<Vec<_>>()
            .join(", ");
        let item_impl: ItemImpl = syn::parse_str(&format!(
            "impl TestComponent {{ fn huge({parameters}) -> Self {{ todo!() }} }}"
        ))
        .unwrap();

        assert_eq!(deduced_name(&item_impl), None);
    }

    #[test]
    fn should_reject_trait_impls() {
        let item_impl: ItemImpl = parse_quote! {
            impl Default for TestComponent {
                fn default() -> Self { todo!() }
            }
        };

        assert!(expand_component_constructors(&item_impl).is_err());
    }

    #[test]
    fn should_strip_helper_attributes() {
        let item_impl: ItemImpl = parse_quote! {
            impl TestComponent {
                fn new() -> Self { todo!() }
                #[component(ignore)]
                fn ignored() -> Self { todo!() }
            }
        };

        let output = expand_component_constructors(&item_impl)
            .unwrap()
            .to_string();
        assert!(!output.contains("# [component"));
        assert!(output.contains("Self :: new ()"));
    }

    #[test]
    fn should_not_treat_other_types_with_same_name_as_constructors() {
        let item_impl: ItemImpl = parse_quote! {
            impl TestComponent {
                fn new() -> Self { todo!() }
                fn foreign() -> other::TestComponent { todo!() }
                fn qualified() -> crate::TestComponent { todo!() }
            }
        };

        assert_eq!(collect_candidates(&item_impl).unwrap().len(), 1);
        assert_eq!(deduced_name(&item_impl).as_deref(), Some("new"));
    }

    #[test]
    fn should_match_generic_self_type_exactly() {
        let item_impl: ItemImpl = parse_quote! {
            impl<T> TestComponent<T> {
                fn new() -> TestComponent<T> { todo!() }
                fn concrete() -> TestComponent<u8> { todo!() }
            }
        };

        assert_eq!(deduced_name(&item_impl).as_deref(), Some("new"));
    }

    #[test]
    fn should_reject_unsupported_error_types() {
        let item_impl: ItemImpl = parse_quote! {
            impl TestComponent {
                fn new() -> Result<Self, std::fmt::Error> { todo!() }
            }
        };

        let error = expand_component_constructors(&item_impl).err().unwrap();
        assert!(error.to_string().contains("Result<Self, ErrorPtr>"));
    }

    #[test]
    fn should_accept_qualified_error_ptr() {
        let item_impl: ItemImpl = parse_quote! {
            impl TestComponent {
                fn new() -> Result<Self, scoped_di::instance::ErrorPtr> { todo!() }
                #[component(ignore)]
                fn parse(value: &str) -> Result<Self, std::fmt::Error> { todo!() }
            }
        };

        let candidates = collect_candidates(&item_impl).unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].is_fallible);
    }
}
