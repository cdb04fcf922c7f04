use std::{env, fs, path::PathBuf};

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, Ident, ItemStruct, LitBool, LitStr, Token,
};

/// Compiles a JSON document into static tables at build time.
///
/// # Usage
///
/// ```ignore
/// // From file path, relative to `CARGO_MANIFEST_DIR`
/// #[compact_json_codegen::document(path = "settings.json")]
/// struct Settings;
///
/// // From inline JSON string
/// #[compact_json_codegen::document(json = r#"{"retries": 3}"#, deduplicate = false)]
/// struct Defaults;
///
/// let retries = Defaults::get().root().get("retries")?.extract::<u32>()?;
/// ```
///
/// This generates an `impl` block with a `get` function returning a
/// `compact_json::Document<'static>`. The calling crate must depend on `compact-json`.
#[proc_macro_attribute]
pub fn document(attr: TokenStream, item: TokenStream) -> TokenStream {
    let config = parse_macro_input!(attr as Config);
    let item = parse_macro_input!(item as ItemStruct);

    match document_impl(&config, &item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct Config {
    source: DocumentSource,
    deduplicate: Option<LitBool>,
}

enum DocumentSource {
    Path(LitStr),
    Json(LitStr),
}

impl Parse for Config {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut source = None;
        let mut deduplicate = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "path" => source = Some(DocumentSource::Path(input.parse()?)),
                "json" => source = Some(DocumentSource::Json(input.parse()?)),
                "deduplicate" => deduplicate = Some(input.parse()?),
                _ => {
                    return Err(syn::Error::new_spanned(
                        ident,
                        "Expected `path`, `json`, or `deduplicate` attribute",
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        let source = source.ok_or_else(|| {
            syn::Error::new(input.span(), "Missing required `path` or `json` attribute")
        })?;

        Ok(Config {
            source,
            deduplicate,
        })
    }
}

fn document_impl(config: &Config, input: &ItemStruct) -> syn::Result<proc_macro2::TokenStream> {
    let (content, literal, recompile_trigger) = match &config.source {
        DocumentSource::Path(value) => {
            let path = resolve_document_path(value)?;
            let content = fs::read_to_string(&path).map_err(|err| {
                syn::Error::new_spanned(
                    value,
                    format!("Failed to read `{}`: {err}", path.display()),
                )
            })?;
            let path = path.to_string_lossy();
            (
                content,
                value,
                quote! {
                    const _: &str = include_str!(#path);
                },
            )
        }
        DocumentSource::Json(value) => (value.value(), value, quote! {}),
    };

    let parsed: serde_json::Value = serde_json::from_str(&content)
        .map_err(|err| syn::Error::new_spanned(literal, format!("Invalid JSON: {err}")))?;

    let deduplicate = config.deduplicate.as_ref().is_none_or(LitBool::value);
    let arena = compact_json::options()
        .deduplicate(deduplicate)
        .build(&parsed)
        .into_arena();
    let document = compact_json::codegen::document_expr(&arena);

    let name = &input.ident;
    Ok(quote! {
        #input

        impl #name {
            #[must_use]
            pub fn get() -> ::compact_json::Document<'static> {
                #recompile_trigger
                #document
            }
        }
    })
}

fn resolve_document_path(lit: &LitStr) -> syn::Result<PathBuf> {
    let raw = lit.value();
    let path = PathBuf::from(&raw);
    if path.is_absolute() {
        return Ok(path);
    }
    let manifest_dir = env::var("CARGO_MANIFEST_DIR")
        .map_err(|_| syn::Error::new_spanned(lit, "CARGO_MANIFEST_DIR is not set"))?;
    let full = PathBuf::from(manifest_dir).join(&path);
    if full.exists() {
        return Ok(full);
    }
    Err(syn::Error::new_spanned(
        lit,
        format!("Document file not found: `{}`", full.display()),
    ))
}
