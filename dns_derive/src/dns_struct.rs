// field-wise implementation of the wire conversion traits
use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DataStruct, DeriveInput};

// verify the derive macro is applied to a structure with named fields
fn get_struct(ast: &DeriveInput) -> &DataStruct {
    if let Data::Struct(struct_token) = &ast.data {
        if matches!(struct_token.fields, syn::Fields::Named(_)) {
            return struct_token;
        }
        panic!("<{}> has no named fields!", ast.ident);
    }
    panic!("<{}> is not a struct!", ast.ident);
}

// create the impl blocks for the ToNetworkOrder & FromNetworkOrder traits
pub fn dns_struct(ast: &DeriveInput) -> TokenStream {
    // get struct data or panic
    let struct_token = get_struct(ast);

    // save structure name because we're gonna use it soon
    let structure_name = &ast.ident;

    // to_network_bytes() call for each field
    let to_method_calls = struct_token.fields.iter().map(|f| {
        // get name of the field as TokenStream
        let field_name = f.ident.as_ref().unwrap();

        quote! {
            length += crate::network_order::ToNetworkOrder::to_network_bytes(&self.#field_name, buffer)?;
        }
    });

    // from_network_bytes() call for each field
    let from_method_calls = struct_token.fields.iter().map(|f| {
        // get name of the field as TokenStream
        let field_name = f.ident.as_ref().unwrap();

        quote! {
            crate::network_order::FromNetworkOrder::from_network_bytes(&mut self.#field_name, buffer)?;
        }
    });

    let new_code = quote! {
        // the generated impls.
        impl crate::network_order::ToNetworkOrder for #structure_name {
            fn to_network_bytes(&self, buffer: &mut crate::network_order::PacketBuffer) -> crate::error::DNSResult<usize> {
                let mut length = 0usize;
                #( #to_method_calls)*
                Ok(length)
            }
        }

        impl<'a> crate::network_order::FromNetworkOrder<'a> for #structure_name {
            fn from_network_bytes(&mut self, buffer: &mut std::io::Cursor<&'a [u8]>) -> crate::error::DNSResult<()> {
                #( #from_method_calls)*
                Ok(())
            }
        }
    };

    // Hand the output tokens back to the compiler
    TokenStream::from(new_code)
}
