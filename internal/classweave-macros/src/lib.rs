use std::{env, path::Path};

use anyhow::{anyhow, bail};
use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::{quote, quote_spanned};
use syn::{
    bracketed,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    LitStr, Token,
};

enum LocationItem {
    Ident(Ident),
    Str(LitStr),
}

impl LocationItem {
    /// `bottom_left` and `"bottom-left"` both name the `bottom-left` location.
    fn location(&self) -> String {
        match self {
            LocationItem::Ident(ident) => ident.to_string().replace('_', "-"),
            LocationItem::Str(lit) => lit.value(),
        }
    }

    fn span(&self) -> Span {
        match self {
            LocationItem::Ident(ident) => ident.span(),
            LocationItem::Str(lit) => lit.span(),
        }
    }
}

impl Parse for LocationItem {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            input.parse().map(LocationItem::Str)
        } else {
            input.parse().map(LocationItem::Ident)
        }
    }
}

struct BlockInput {
    base_class: LitStr,
    locations: Punctuated<LocationItem, Token![,]>,
}

impl Parse for BlockInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let base_class: LitStr = input.parse()?;
        let locations = if input.parse::<Token![,]>().is_ok() && !input.is_empty() {
            let content;
            bracketed!(content in input);
            content.parse_terminated(LocationItem::parse, Token![,])?
        } else {
            Punctuated::new()
        };
        Ok(BlockInput {
            base_class,
            locations,
        })
    }
}

fn location_ident(location: &str, span: Span) -> anyhow::Result<Ident> {
    let name = location.replace('-', "_");
    let valid = name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        bail!("location `{location}` can't be used as a constant name");
    }
    if name == "base" {
        bail!("location `base` collides with the base class constant");
    }
    Ok(Ident::new(&name, span))
}

fn try_block_classes(input: &BlockInput) -> syn::Result<TokenStream> {
    let to_syn = |span: Span| move |err: anyhow::Error| syn::Error::new(span, err.to_string());

    let manifest_dir_env = env::var_os("CARGO_MANIFEST_DIR")
        .ok_or(anyhow!("CARGO_MANIFEST_DIR env var not found"))
        .map_err(to_syn(Span::call_site()))?;
    let manifest_path = Path::new(&manifest_dir_env);

    let config = classweave_core::load_config(manifest_path).map_err(to_syn(Span::call_site()))?;

    let base_class = input.base_class.value().trim().to_owned();
    let locations = input
        .locations
        .iter()
        .map(LocationItem::location)
        .collect::<Vec<_>>();

    let classes = classweave_core::get_block_classes(&base_class, &locations, &config)
        .map_err(to_syn(input.base_class.span()))?;

    let output_fields = classes
        .iter()
        .zip(&input.locations)
        .map(|(class, item)| {
            let span = item.span();
            let ident = location_ident(&class.location, span).map_err(to_syn(span))?;
            let class_str = &class.class_name;
            Ok(quote_spanned!(span =>
                #[allow(non_upper_case_globals)]
                pub const #ident: &str = #class_str;
            ))
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let manifest_file = manifest_path.join("Cargo.toml");
    let manifest_file = manifest_file.to_string_lossy();

    Ok(quote! {
        const _ : &[u8] = include_bytes!(#manifest_file);
        #[allow(non_upper_case_globals)]
        pub const base: &str = #base_class;
        #(#output_fields )*
    }
    .into())
}

/// Expands a block's base class and its location-suffixed classes into
/// `pub const` items, using the modifier pattern configured in the calling
/// crate's `[package.metadata.classweave]`.
#[proc_macro]
pub fn block_classes(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as BlockInput);

    match try_block_classes(&input) {
        Ok(ts) => ts,
        Err(err) => err.to_compile_error().into(),
    }
}
