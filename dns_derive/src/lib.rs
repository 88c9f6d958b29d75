// derive macros for the DNS wire structures
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod dns_enum;
mod dns_struct;

use dns_enum::dns_enum;
use dns_struct::dns_struct;

/// Implements `ToNetworkOrder` and `FromNetworkOrder` for a structure by
/// delegating to each field in declaration order, which is also the wire
/// order for every DNS structure in the library.
#[proc_macro_derive(DnsStruct)]
pub fn dns_macro_struct(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let ast = parse_macro_input!(input as DeriveInput);

    // inject code
    dns_struct(&ast)
}

/// Implements `Default`, `TryFrom<u8>`, `TryFrom<u16>` and `FromStr` for a
/// unit enum whose variants all carry literal integer discriminants, as the
/// DNS code enums (type, class, opcode, rcode) all do.
#[proc_macro_derive(DnsEnum)]
pub fn dns_macro_enum(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let ast = parse_macro_input!(input as DeriveInput);

    // inject code
    dns_enum(&ast)
}

#[cfg(test)]
fn get_derive_input(s: &str) -> DeriveInput {
    syn::parse_str::<DeriveInput>(s).unwrap()
}
