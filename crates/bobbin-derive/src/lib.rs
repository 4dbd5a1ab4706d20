use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{
    Data, DeriveInput, Expr, ExprLit, Fields, Ident, Lit, LitStr, Meta, Token, parse_macro_input,
};

/// Attribute macro that adds an `extra_data` field to structs to capture unknown fields
/// during deserialization.
///
/// Unknown fields are written back out on serialization, so a record read
/// from the network and re-encoded loses nothing.
///
/// # Example
/// ```ignore
/// #[lexicon]
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Post {
///     text: SmolStr,
/// }
/// // Expands to:
/// // struct Post {
/// //     text: SmolStr,
/// //     #[serde(flatten, default)]
/// //     pub extra_data: ::bobbin_common::types::value::Object,
/// // }
/// ```
///
/// If the struct derives `bon::Builder`, the field gets `#[builder(default)]`.
#[proc_macro_attribute]
pub fn lexicon(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(item as DeriveInput);

    let builds = derives(&input, "Builder");
    match &mut input.data {
        Data::Struct(data_struct) => {
            if let Fields::Named(fields) = &mut data_struct.fields {
                let has_extra_data = fields
                    .named
                    .iter()
                    .any(|f| f.ident.as_ref().is_some_and(|i| i == "extra_data"));

                if !has_extra_data {
                    let builder_attr = builds.then(|| quote! { #[builder(default)] });
                    let new_field: syn::Field = syn::parse_quote! {
                        #[serde(flatten, default)]
                        #builder_attr
                        pub extra_data: ::bobbin_common::types::value::Object
                    };
                    fields.named.push(new_field);
                }
            } else {
                return syn::Error::new_spanned(
                    input,
                    "lexicon attribute can only be used on structs with named fields",
                )
                .to_compile_error()
                .into();
            }

            quote! { #input }.into()
        }
        _ => syn::Error::new_spanned(input, "lexicon attribute can only be used on structs")
            .to_compile_error()
            .into(),
    }
}

/// Attribute macro that turns an enum into an open union keyed on `$type`.
///
/// Every variant must hold exactly one payload and carry `#[tag = "..."]`
/// naming its discriminator. The macro appends
/// `Unknown(::bobbin_common::types::union::UnknownVariant)` and implements
/// `OpenUnion`, `Serialize` and `Deserialize`. Do not derive the serde
/// traits yourself.
///
/// With `#[open_union(lenient)]`, documents without a `$type` decode as
/// `Unknown` instead of failing.
///
/// # Example
/// ```ignore
/// #[open_union]
/// #[derive(Debug, Clone, PartialEq)]
/// pub enum PostEmbed {
///     #[tag = "app.bsky.embed.images"]
///     Images(Box<Images>),
///     #[tag = "app.bsky.embed.external"]
///     External(Box<External>),
/// }
/// ```
#[proc_macro_attribute]
pub fn open_union(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match Punctuated::<Ident, Token![,]>::parse_terminated.parse(attr) {
        Ok(args) => args,
        Err(e) => return e.to_compile_error().into(),
    };
    let mut lenient = false;
    for arg in &args {
        if arg == "lenient" {
            lenient = true;
        } else {
            return syn::Error::new_spanned(arg, "unknown open_union option, expected `lenient`")
                .to_compile_error()
                .into();
        }
    }

    let input = parse_macro_input!(item as DeriveInput);
    match expand_open_union(input, lenient) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

struct UnionVariant {
    ident: Ident,
    tag: LitStr,
}

fn expand_open_union(mut input: DeriveInput, lenient: bool) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "open_union enums cannot be generic",
        ));
    }
    if derives(&input, "Serialize") || derives(&input, "Deserialize") {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "open_union implements Serialize and Deserialize itself, remove the derives",
        ));
    }

    let Data::Enum(data_enum) = &mut input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "open_union attribute can only be used on enums",
        ));
    };

    let mut variants: Vec<UnionVariant> = Vec::new();
    for variant in data_enum.variants.iter_mut() {
        if variant.ident == "Unknown" {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "the Unknown variant is added by open_union",
            ));
        }
        match &variant.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {}
            _ => {
                return Err(syn::Error::new_spanned(
                    &variant.ident,
                    "open_union variants must hold exactly one payload, like `Images(Images)`",
                ));
            }
        }

        let tag = take_tag(&mut variant.attrs)?.ok_or_else(|| {
            syn::Error::new_spanned(&variant.ident, "missing #[tag = \"...\"] on variant")
        })?;
        if let Some(prev) = variants.iter().find(|v| v.tag.value() == tag.value()) {
            return Err(syn::Error::new_spanned(
                &tag,
                format!("tag already used by variant `{}`", prev.ident),
            ));
        }
        variants.push(UnionVariant {
            ident: variant.ident.clone(),
            tag,
        });
    }

    let unknown: syn::Variant = syn::parse_quote! {
        /// A variant whose `$type` is not recognized, kept verbatim.
        Unknown(::bobbin_common::types::union::UnknownVariant)
    };
    data_enum.variants.push(unknown);

    let name = &input.ident;
    let name_str = name.to_string();
    let idents: Vec<&Ident> = variants.iter().map(|v| &v.ident).collect();
    let tags: Vec<&LitStr> = variants.iter().map(|v| &v.tag).collect();
    let require_tag = !lenient;

    Ok(quote! {
        #input

        impl ::bobbin_common::types::union::OpenUnion for #name {
            const NAME: &'static str = #name_str;
            const KNOWN_TAGS: &'static [&'static str] = &[#(#tags),*];
            const REQUIRE_TAG: bool = #require_tag;

            #[allow(unreachable_patterns)]
            fn decode_known(
                tag: &str,
                doc: ::bobbin_common::types::value::Object,
            ) -> ::std::option::Option<
                ::std::result::Result<Self, ::bobbin_common::error::DecodeError>,
            > {
                match tag {
                    #(
                        #tags => ::std::option::Option::Some(
                            ::bobbin_common::types::union::decode_payload(tag, doc)
                                .map(Self::#idents),
                        ),
                    )*
                    _ => ::std::option::Option::None,
                }
            }

            fn encode_known(
                &self,
            ) -> ::std::option::Option<
                ::std::result::Result<
                    (&'static str, ::bobbin_common::types::value::Object),
                    ::bobbin_common::error::EncodeError,
                >,
            > {
                match self {
                    #(
                        Self::#idents(payload) => ::std::option::Option::Some(
                            ::bobbin_common::types::union::encode_payload(#tags, payload),
                        ),
                    )*
                    Self::Unknown(_) => ::std::option::Option::None,
                }
            }

            fn from_unknown(unknown: ::bobbin_common::types::union::UnknownVariant) -> Self {
                Self::Unknown(unknown)
            }

            #[allow(unreachable_patterns)]
            fn as_unknown(
                &self,
            ) -> ::std::option::Option<&::bobbin_common::types::union::UnknownVariant> {
                match self {
                    Self::Unknown(unknown) => ::std::option::Option::Some(unknown),
                    _ => ::std::option::Option::None,
                }
            }

            fn tag(&self) -> &str {
                match self {
                    #( Self::#idents(_) => #tags, )*
                    Self::Unknown(unknown) => unknown.tag(),
                }
            }
        }

        impl ::bobbin_common::serde::Serialize for #name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::bobbin_common::serde::Serializer,
            {
                ::bobbin_common::types::union::serialize_union(self, serializer)
            }
        }

        impl<'de> ::bobbin_common::serde::Deserialize<'de> for #name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::bobbin_common::serde::Deserializer<'de>,
            {
                ::bobbin_common::types::union::deserialize_union(deserializer)
            }
        }
    })
}

/// Remove `#[tag = "..."]` from `attrs` and return its value.
fn take_tag(attrs: &mut Vec<syn::Attribute>) -> syn::Result<Option<LitStr>> {
    let mut found = None;
    let mut err = None;
    attrs.retain(|attr| {
        if !attr.path().is_ident("tag") {
            return true;
        }
        match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) if found.is_none() => found = Some(s.clone()),
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => err = Some(syn::Error::new_spanned(s, "duplicate #[tag] attribute")),
                other => err = Some(syn::Error::new_spanned(other, "expected a string literal")),
            },
            other => err = Some(syn::Error::new_spanned(other, "expected #[tag = \"...\"]")),
        }
        false
    });
    match err {
        Some(e) => Err(e),
        None => Ok(found),
    }
}

/// Whether `input` has a `#[derive(...)]` whose last path segment is `name`.
fn derives(input: &DeriveInput, name: &str) -> bool {
    input
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .any(|attr| {
            attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
                .map(|paths| {
                    paths
                        .iter()
                        .any(|p| p.segments.last().is_some_and(|s| s.ident == name))
                })
                .unwrap_or(false)
        })
}
