use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{
    ExprClosure, Index, Lifetime, Pat, Token, Type, TypeReference,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    visit_mut::{self, VisitMut},
};

use crate::variant::display_type;

pub struct HandlerList {
    closures: Punctuated<ExprClosure, Token![,]>,
}

impl Parse for HandlerList {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        Ok(HandlerList {
            closures: Punctuated::parse_terminated(input)?,
        })
    }
}

/// How a handler receives its alternative.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Category {
    Shared,
    Mut,
    Owned,
}

/// Handler trait slot claimed by a closure. A `&T` closure claims both borrowed slots.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Handle,
    HandleMut,
    HandleOwned,
}

impl Category {
    fn slots(self) -> &'static [Slot] {
        match self {
            Category::Shared => &[Slot::Handle, Slot::HandleMut],
            Category::Mut => &[Slot::HandleMut],
            Category::Owned => &[Slot::HandleOwned],
        }
    }
}

struct Handler {
    closure: ExprClosure,
    /// Argument type as written, e.g. `&mut f64`.
    argument: Type,
    /// Alternative type with every elided lifetime named, e.g. `&'__hv0_0 str`.
    alternative: Type,
    /// Lifetimes introduced while naming elided ones.
    lifetimes: Vec<Lifetime>,
    category: Category,
}

/// Names elided lifetimes so the alternative type can appear in an impl header and in the
/// handler method signature with the same meaning.
struct NameElided {
    handler: usize,
    introduced: Vec<Lifetime>,
}

impl NameElided {
    fn fresh(&mut self) -> Lifetime {
        let lifetime = Lifetime::new(
            &format!("'__hv{}_{}", self.handler, self.introduced.len()),
            Span::call_site(),
        );
        self.introduced.push(lifetime.clone());
        lifetime
    }
}

impl VisitMut for NameElided {
    fn visit_type_reference_mut(&mut self, reference: &mut TypeReference) {
        if reference.lifetime.is_none() {
            reference.lifetime = Some(self.fresh());
        }
        visit_mut::visit_type_reference_mut(self, reference);
    }

    fn visit_lifetime_mut(&mut self, lifetime: &mut Lifetime) {
        if lifetime.ident == "_" {
            *lifetime = self.fresh();
        }
    }

    // Elided lifetimes of `fn(&T)` and `Fn(&T)` are higher-ranked; leave them alone.
    fn visit_type_bare_fn_mut(&mut self, _: &mut syn::TypeBareFn) {}

    fn visit_parenthesized_generic_arguments_mut(
        &mut self,
        _: &mut syn::ParenthesizedGenericArguments,
    ) {
    }
}

fn parse_handler(index: usize, closure: ExprClosure) -> syn::Result<Handler> {
    if closure.inputs.len() != 1 {
        return Err(syn::Error::new_spanned(
            &closure.inputs,
            "visitor handlers take exactly one argument: the alternative they accept",
        ));
    }

    let Pat::Type(pat_type) = &closure.inputs[0] else {
        return Err(syn::Error::new_spanned(
            &closure.inputs[0],
            "annotate the handler argument with the alternative it accepts, e.g. `|x: &i32|`",
        ));
    };
    let argument = (*pat_type.ty).clone();

    let (mut alternative, category) = match &argument {
        Type::Reference(reference) => {
            if let Some(lifetime) = &reference.lifetime {
                return Err(syn::Error::new_spanned(
                    lifetime,
                    "the handler argument borrows the variant for the duration of the call; remove this lifetime",
                ));
            }
            let category = if reference.mutability.is_some() {
                Category::Mut
            } else {
                Category::Shared
            };
            ((*reference.elem).clone(), category)
        }
        other => (other.clone(), Category::Owned),
    };

    let mut namer = NameElided {
        handler: index,
        introduced: Vec::new(),
    };
    namer.visit_type_mut(&mut alternative);

    Ok(Handler {
        closure,
        argument,
        alternative,
        lifetimes: namer.introduced,
        category,
    })
}

/// Reject two closures claiming the same handler slot for the same alternative.
fn check_ambiguity(handlers: &[Handler]) -> syn::Result<()> {
    let mut claimed: Vec<(Slot, String, usize)> = Vec::new();
    for (index, handler) in handlers.iter().enumerate() {
        let key = match &handler.argument {
            Type::Reference(reference) => display_type(&reference.elem),
            other => display_type(other),
        };

        for &slot in handler.category.slots() {
            if let Some((_, _, previous)) = claimed
                .iter()
                .find(|(claimed_slot, claimed_key, _)| *claimed_slot == slot && *claimed_key == key)
            {
                return Err(syn::Error::new_spanned(
                    &handler.argument,
                    format!(
                        "ambiguous visitor: handlers #{} and #{} both accept `{}`",
                        previous + 1,
                        index + 1,
                        key
                    ),
                ));
            }
        }
        for &slot in handler.category.slots() {
            claimed.push((slot, key.clone(), index));
        }
    }
    Ok(())
}

pub fn expand(input: HandlerList) -> syn::Result<TokenStream> {
    if input.closures.is_empty() {
        return Err(syn::Error::new(
            Span::call_site(),
            "visitor! needs at least one handler",
        ));
    }

    let handlers = input
        .closures
        .into_iter()
        .enumerate()
        .map(|(index, closure)| parse_handler(index, closure))
        .collect::<syn::Result<Vec<_>>>()?;
    check_ambiguity(&handlers)?;

    let fs: Vec<_> = (0..handlers.len()).map(|i| format_ident!("__F{}", i)).collect();
    let rs: Vec<_> = (0..handlers.len()).map(|i| format_ident!("__R{}", i)).collect();
    let args: Vec<_> = (0..handlers.len()).map(|i| format_ident!("f{}", i)).collect();

    let mut impls = TokenStream::new();
    for (index, handler) in handlers.iter().enumerate() {
        let field = Index::from(index);
        let f = &fs[index];
        let r = &rs[index];
        let lts = &handler.lifetimes;
        let ty = &handler.alternative;

        match handler.category {
            Category::Shared => impls.extend(quote! {
                impl<#(#lts,)* #(#fs,)* #r> ::hyvisit::handler::Handle<#ty> for __HyVisitor<#(#fs),*>
                where
                    #f: FnMut(&#ty) -> #r,
                {
                    type Output = #r;

                    #[inline]
                    fn handle(&mut self, value: &#ty) -> #r {
                        (self.#field)(value)
                    }
                }

                impl<#(#lts,)* #(#fs,)* #r> ::hyvisit::handler::HandleMut<#ty> for __HyVisitor<#(#fs),*>
                where
                    #f: FnMut(&#ty) -> #r,
                {
                    type Output = #r;

                    #[inline]
                    fn handle_mut(&mut self, value: &mut #ty) -> #r {
                        (self.#field)(&*value)
                    }
                }
            }),
            Category::Mut => impls.extend(quote! {
                impl<#(#lts,)* #(#fs,)* #r> ::hyvisit::handler::HandleMut<#ty> for __HyVisitor<#(#fs),*>
                where
                    #f: FnMut(&mut #ty) -> #r,
                {
                    type Output = #r;

                    #[inline]
                    fn handle_mut(&mut self, value: &mut #ty) -> #r {
                        (self.#field)(value)
                    }
                }
            }),
            Category::Owned => impls.extend(quote! {
                impl<#(#lts,)* #(#fs,)* #r> ::hyvisit::handler::HandleOwned<#ty> for __HyVisitor<#(#fs),*>
                where
                    #f: FnMut(#ty) -> #r,
                {
                    type Output = #r;

                    #[inline]
                    fn handle_owned(&mut self, value: #ty) -> #r {
                        (self.#field)(value)
                    }
                }
            }),
        }
    }

    let arguments = handlers.iter().map(|handler| &handler.argument);
    let closures = handlers.iter().map(|handler| &handler.closure);

    // The constructor's bounds drive closure signature inference at the call site.
    Ok(quote! {
        {
            struct __HyVisitor<#(#fs),*>(#(#fs),*);

            #impls

            #[inline]
            fn __hyvisit_new<#(#fs, #rs),*>(#(#args: #fs),*) -> __HyVisitor<#(#fs),*>
            where
                #(#fs: FnMut(#arguments) -> #rs,)*
            {
                __HyVisitor(#(#args),*)
            }

            __hyvisit_new(#(#closures),*)
        }
    })
}
