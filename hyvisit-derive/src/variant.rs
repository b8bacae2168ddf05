use proc_macro2::{Literal, TokenStream};
use quote::{ToTokens, quote};
use syn::{Data, DeriveInput, Fields, GenericParam, Ident, Type, parse_quote};

/// One alternative of the derived enum: the variant name and the type it carries.
struct Alt<'a> {
    ident: &'a Ident,
    ty: &'a Type,
}

/// Paths of the traits, trampoline alias and trampoline function for one value category.
struct DispatchKind {
    visit: TokenStream,
    handle: TokenStream,
    alias: TokenStream,
    trampoline: TokenStream,
}

impl DispatchKind {
    fn all() -> [DispatchKind; 3] {
        [
            DispatchKind {
                visit: quote!(::hyvisit::dispatch::Visit),
                handle: quote!(::hyvisit::handler::Handle),
                alias: quote!(::hyvisit::dispatch::Trampoline),
                trampoline: quote!(::hyvisit::dispatch::trampoline),
            },
            DispatchKind {
                visit: quote!(::hyvisit::dispatch::VisitMut),
                handle: quote!(::hyvisit::handler::HandleMut),
                alias: quote!(::hyvisit::dispatch::TrampolineMut),
                trampoline: quote!(::hyvisit::dispatch::trampoline_mut),
            },
            DispatchKind {
                visit: quote!(::hyvisit::dispatch::VisitOwned),
                handle: quote!(::hyvisit::handler::HandleOwned),
                alias: quote!(::hyvisit::dispatch::TrampolineOwned),
                trampoline: quote!(::hyvisit::dispatch::trampoline_owned),
            },
        ]
    }
}

pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let alternatives = collect_alternatives(input)?;

    let mut output = expand_variant(input, &alternatives);
    for (index, alt) in alternatives.iter().enumerate() {
        output.extend(expand_alternative(input, index, alt));
    }
    for kind in DispatchKind::all() {
        output.extend(expand_dispatch(input, &alternatives, &kind));
    }
    // `TypeId` needs `'static`, which a lifetime parameter rules out.
    if input.generics.lifetimes().next().is_none() {
        output.extend(expand_dyn_variant(input, &alternatives));
    }
    Ok(output)
}

fn collect_alternatives(input: &DeriveInput) -> syn::Result<Vec<Alt<'_>>> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(Variant)] only applies to enums",
        ));
    };

    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(Variant)] requires at least one alternative",
        ));
    }

    let mut alternatives: Vec<Alt<'_>> = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        let ty = match &variant.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => &fields.unnamed[0].ty,
            _ => {
                return Err(syn::Error::new_spanned(
                    variant,
                    "each alternative must carry exactly one unnamed field, e.g. `Int(i32)`",
                ));
            }
        };

        let key = display_type(ty);
        if let Some(previous) = alternatives.iter().find(|alt| display_type(alt.ty) == key) {
            return Err(syn::Error::new_spanned(
                ty,
                format!(
                    "alternatives `{}` and `{}` both hold `{}`; the alternative types of a variant must be distinct",
                    previous.ident, variant.ident, key
                ),
            ));
        }

        alternatives.push(Alt {
            ident: &variant.ident,
            ty,
        });
    }
    Ok(alternatives)
}

fn expand_variant(input: &DeriveInput, alternatives: &[Alt<'_>]) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let names = alternatives.iter().map(|alt| display_type(alt.ty));
    let arms = alternatives.iter().enumerate().map(|(index, alt)| {
        let ident = alt.ident;
        let index = Literal::usize_unsuffixed(index);
        quote!(Self::#ident(_) => #index,)
    });

    quote! {
        impl #impl_generics ::hyvisit::variant::Variant for #name #ty_generics #where_clause {
            const ALTERNATIVES: &'static [&'static str] = &[#(#names),*];

            #[inline]
            fn discriminant(&self) -> usize {
                match self {
                    #(#arms)*
                }
            }
        }
    }
}

fn expand_alternative(input: &DeriveInput, index: usize, alt: &Alt<'_>) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let index = Literal::usize_unsuffixed(index);
    let Alt { ident, ty } = alt;

    quote! {
        impl #impl_generics ::hyvisit::variant::Alternative<#index> for #name #ty_generics #where_clause {
            type Type = #ty;

            #[inline]
            fn from_alternative(value: #ty) -> Self {
                Self::#ident(value)
            }

            #[inline]
            fn try_get(&self) -> ::core::option::Option<&#ty> {
                match self {
                    Self::#ident(value) => ::core::option::Option::Some(value),
                    #[allow(unreachable_patterns)]
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn try_get_mut(&mut self) -> ::core::option::Option<&mut #ty> {
                match self {
                    Self::#ident(value) => ::core::option::Option::Some(value),
                    #[allow(unreachable_patterns)]
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn try_into_alternative(self) -> ::core::result::Result<#ty, Self> {
                match self {
                    Self::#ident(value) => ::core::result::Result::Ok(value),
                    #[allow(unreachable_patterns)]
                    other => ::core::result::Result::Err(other),
                }
            }
        }
    }
}

/// Emit the dispatch table of one value category.
///
/// The where-clause is the handler-set validation: the first alternative fixes the result
/// type and every other alternative must produce exactly that type.
fn expand_dispatch(input: &DeriveInput, alternatives: &[Alt<'_>], kind: &DispatchKind) -> TokenStream {
    let name = &input.ident;
    let (_, ty_generics, _) = input.generics.split_for_impl();
    let DispatchKind {
        visit,
        handle,
        alias,
        trampoline,
    } = kind;

    let first = alternatives[0].ty;
    let output: Type = parse_quote!(<__H as #handle<#first>>::Output);

    let mut generics = input.generics.clone();
    generics.params.push(parse_quote!(__H));
    let predicates = &mut generics.make_where_clause().predicates;
    predicates.push(parse_quote!(__H: #handle<#first>));
    for alt in &alternatives[1..] {
        let ty = alt.ty;
        predicates.push(parse_quote!(__H: #handle<#ty, Output = #output>));
    }
    let (impl_generics, _, where_clause) = generics.split_for_impl();

    let count = Literal::usize_unsuffixed(alternatives.len());
    let entries = (0..alternatives.len()).map(|index| {
        let index = Literal::usize_unsuffixed(index);
        quote!(#trampoline::<__H, Self, #index>)
    });

    quote! {
        impl #impl_generics #visit<__H> for #name #ty_generics #where_clause {
            type Output = #output;
            type Table = [#alias<__H, Self, #output>; #count];

            const TABLE: [#alias<__H, Self, #output>; #count] = [#(#entries),*];
        }
    }
}

fn expand_dyn_variant(input: &DeriveInput, alternatives: &[Alt<'_>]) -> TokenStream {
    let name = &input.ident;
    let (_, ty_generics, _) = input.generics.split_for_impl();

    let mut generics = input.generics.clone();
    for param in generics.params.iter_mut() {
        if let GenericParam::Type(param) = param {
            param.bounds.push(parse_quote!('static));
        }
    }
    let (impl_generics, _, where_clause) = generics.split_for_impl();

    let types = alternatives.iter().map(|alt| alt.ty);
    let idents: Vec<_> = alternatives.iter().map(|alt| alt.ident).collect();

    quote! {
        impl #impl_generics ::hyvisit::variant::DynVariant for #name #ty_generics #where_clause {
            fn alternative_types() -> ::std::vec::Vec<::hyvisit::variant::AlternativeType> {
                ::std::vec![#(::hyvisit::variant::AlternativeType::of::<#types>()),*]
            }

            #[inline]
            fn payload(&self) -> &dyn ::core::any::Any {
                match self {
                    #(Self::#idents(value) => value as &dyn ::core::any::Any,)*
                }
            }

            #[inline]
            fn payload_mut(&mut self) -> &mut dyn ::core::any::Any {
                match self {
                    #(Self::#idents(value) => value as &mut dyn ::core::any::Any,)*
                }
            }
        }
    }
}

/// Render a type the way it is usually written: `Vec<u8>`, `&mut str`, `(i32, f64)`.
pub(crate) fn display_type(ty: &Type) -> String {
    let raw = ty.to_token_stream().to_string();
    let chars: Vec<char> = raw.chars().collect();
    let word = |c: char| c.is_alphanumeric() || c == '_' || c == '\'';

    let mut out = String::with_capacity(raw.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let before = i.checked_sub(1).map(|j| chars[j]);
            let after = chars.get(i + 1).copied();
            let keep = matches!(before, Some(b) if word(b) || b == ',')
                && matches!(after, Some(a) if word(a) || a == '&' || a == '(');
            if !keep {
                continue;
            }
        }
        out.push(c);
    }
    out
}
