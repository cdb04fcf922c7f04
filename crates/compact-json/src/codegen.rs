//! Rust source for built documents.
//!
//! The emitted tokens only refer to items through `::compact_json`, so they can be placed in any
//! crate that depends on this one. Every table becomes a `static`, which makes the resulting
//! [`Document<'static>`](crate::Document) free to construct.
use proc_macro2::{Ident, Literal, TokenStream};
use quote::{quote, ToTokens};

use crate::{
    arena::Arena,
    record::{Pair, Record, Run, Str},
};

impl ToTokens for Run {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let Run { offset, len } = self;
        tokens.extend(quote! { ::compact_json::Run::new(#offset, #len) });
    }
}

impl ToTokens for Str {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(match self {
            Str::Inline { len, bytes, hash } => {
                let bytes = bytes.iter();
                quote! {
                    ::compact_json::Str::Inline { len: #len, bytes: [#(#bytes),*], hash: #hash }
                }
            }
            Str::Indirect { offset, len, hash } => quote! {
                ::compact_json::Str::Indirect { offset: #offset, len: #len, hash: #hash }
            },
        });
    }
}

impl ToTokens for Record {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(match self {
            Record::Null => quote! { ::compact_json::Record::Null },
            Record::Boolean(b) => quote! { ::compact_json::Record::Boolean(#b) },
            Record::Integer(i) => {
                let value = if *i < 0 {
                    let magnitude = Literal::u64_unsuffixed(i.unsigned_abs());
                    quote! { -#magnitude }
                } else {
                    Literal::i64_unsuffixed(*i).into_token_stream()
                };
                quote! { ::compact_json::Record::Integer(#value) }
            }
            Record::UInteger(u) => quote! { ::compact_json::Record::UInteger(#u) },
            Record::Float(f) => {
                // Bit pattern keeps the exact value, signed zero and NaN included.
                let bits = f.to_bits();
                quote! { ::compact_json::Record::Float(f64::from_bits(#bits)) }
            }
            Record::String(s) => quote! { ::compact_json::Record::String(#s) },
            Record::Array(run) => quote! { ::compact_json::Record::Array(#run) },
            Record::Object { run, sorted } => quote! {
                ::compact_json::Record::Object { run: #run, sorted: #sorted }
            },
        });
    }
}

impl ToTokens for Pair {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let Pair { key, value } = self;
        tokens.extend(quote! { ::compact_json::Pair::new(#key, #value) });
    }
}

/// A block expression evaluating to a `Document<'static>` with the content of `arena`.
#[must_use]
pub fn document_expr(arena: &Arena) -> TokenStream {
    let records = arena.records();
    let pairs = arena.pairs();
    let records_len = records.len();
    let pairs_len = pairs.len();
    let strings = arena.strings();
    let root = arena.root();
    quote! {
        {
            static RECORDS: [::compact_json::Record; #records_len] = [#(#records),*];
            static PAIRS: [::compact_json::Pair; #pairs_len] = [#(#pairs),*];
            static STRINGS: &str = #strings;
            static ROOT: ::compact_json::Record = #root;
            ::compact_json::Document::new(&RECORDS, &PAIRS, STRINGS, &ROOT)
        }
    }
}

/// A module named `name` with a `get()` function returning the document.
#[must_use]
pub fn module(name: &Ident, arena: &Arena) -> TokenStream {
    let document = document_expr(arena);
    quote! {
        pub mod #name {
            #[must_use]
            pub fn get() -> ::compact_json::Document<'static> {
                #document
            }
        }
    }
}
