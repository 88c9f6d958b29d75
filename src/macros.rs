// auto-implement the wire conversion traits for the DNS code enums
#[macro_export]
macro_rules! derive_enum {
    ($t:ty, u8) => {
        impl ToNetworkOrder for $t {
            fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
                buffer.write_u8(*self as u8)?;
                Ok(1)
            }
        }

        impl<'a> FromNetworkOrder<'a> for $t {
            fn from_network_bytes(&mut self, buffer: &mut std::io::Cursor<&'a [u8]>) -> DNSResult<()> {
                let value = buffer.read_u8()?;
                *self = <$t>::try_from(value).map_err(DNSError::Parse)?;
                Ok(())
            }
        }
    };

    ($t:ty, u16) => {
        impl ToNetworkOrder for $t {
            fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
                buffer.write_u16::<BigEndian>(*self as u16)?;
                Ok(2)
            }
        }

        impl<'a> FromNetworkOrder<'a> for $t {
            fn from_network_bytes(&mut self, buffer: &mut std::io::Cursor<&'a [u8]>) -> DNSResult<()> {
                let value = buffer.read_u16::<BigEndian>()?;
                *self = <$t>::try_from(value).map_err(DNSError::Parse)?;
                Ok(())
            }
        }
    };
}

// useful helpers for tests
#[macro_export]
macro_rules! test_from_network {
    ($slice:ident, $t:ty) => {{
        let s = crate::util::get_sample_slice($slice);
        let mut buffer = std::io::Cursor::new(s.as_slice());
        let mut v = <$t>::default();
        assert!(v.from_network_bytes(&mut buffer).is_ok());
        v
    }};
}

#[macro_export]
macro_rules! test_to_network {
    ($data:ident) => {{
        let mut buffer = crate::network_order::PacketBuffer::new();
        let bytes_written = $data.to_network_bytes(&mut buffer).unwrap();

        (buffer.into_bytes(), bytes_written)
    }};
}
