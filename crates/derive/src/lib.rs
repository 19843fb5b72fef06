//! Proc macros for deriving STAC traits. Should usually not be used directly;
//! re-exported from the `stac` crate.

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

/// Derives `stac::SelfHref` for a struct with a `self_href: Option<String>` field.
#[proc_macro_derive(SelfHref)]
pub fn self_href(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let expanded = quote! {
        impl #impl_generics stac::SelfHref for #name #ty_generics #where_clause {
            fn self_href(&self) -> ::std::option::Option<&str> {
                self.self_href.as_deref()
            }

            fn self_href_mut(&mut self) -> &mut ::std::option::Option<::std::string::String> {
                &mut self.self_href
            }
        }
    };
    expanded.into()
}

/// Derives `stac::Links` for a struct with a `links: Vec<Link>` field.
#[proc_macro_derive(Links)]
pub fn links(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let expanded = quote! {
        impl #impl_generics stac::Links for #name #ty_generics #where_clause {
            fn links(&self) -> &[stac::Link] {
                &self.links
            }

            fn links_mut(&mut self) -> &mut ::std::vec::Vec<stac::Link> {
                &mut self.links
            }
        }
    };
    expanded.into()
}

/// Derives `stac::Fields` for a struct with an `additional_fields:
/// serde_json::Map<String, serde_json::Value>` field.
#[proc_macro_derive(Fields)]
pub fn fields(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let expanded = quote! {
        impl #impl_generics stac::Fields for #name #ty_generics #where_clause {
            fn fields(&self) -> &::serde_json::Map<::std::string::String, ::serde_json::Value> {
                &self.additional_fields
            }

            fn fields_mut(&mut self) -> &mut ::serde_json::Map<::std::string::String, ::serde_json::Value> {
                &mut self.additional_fields
            }
        }
    };
    expanded.into()
}
