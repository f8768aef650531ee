pub mod ids;

pub use ids::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_id_mint_is_unique() {
        let a = RefId::new();
        let b = RefId::new();
        assert_ne!(a, b);
        assert_eq!(a, a);
    }

    #[test]
    fn ref_id_copy_shares_identity() {
        let a = RefId::new();
        let b = a;
        assert_eq!(a, b);
    }

    #[test]
    fn guid_stringifies() {
        let guid = Guid::from_bytes([
            0xde, 0xad, 0xbe, 0xef, 0xc0, 0xfe, 0x13, 0x37, 0x01, 0x23, 0x45, 0x67, 0x89, 0xab,
            0xcd, 0xef,
        ]);
        assert_eq!(guid.to_string(), "efbeadde-fec0-3713-0123-456789abcdef");
    }

    #[test]
    fn guid_parses() {
        let guid = Guid::parse("efbeadde-fec0-3713-0123-456789abcdef").unwrap();
        assert_eq!(
            guid.to_bytes(),
            [
                0xde, 0xad, 0xbe, 0xef, 0xc0, 0xfe, 0x13, 0x37, 0x01, 0x23, 0x45, 0x67, 0x89,
                0xab, 0xcd, 0xef,
            ]
        );
    }

    #[test]
    fn guid_parse_accepts_uppercase_hex() {
        let upper = Guid::parse("EFBEADDE-FEC0-3713-0123-456789ABCDEF").unwrap();
        let lower = Guid::parse("efbeadde-fec0-3713-0123-456789abcdef").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.to_string(), "efbeadde-fec0-3713-0123-456789abcdef");
    }

    #[test]
    fn guid_parse_rejects_other_shapes() {
        assert!(Guid::parse("").is_err());
        assert!(Guid::parse("efbeaddefec037130123456789abcdef").is_err());
        assert!(Guid::parse("{efbeadde-fec0-3713-0123-456789abcdef}").is_err());
        assert!(Guid::parse("efbeadde-fec0-3713-0123-456789abcdeg").is_err());
        assert!(Guid::parse("efbeadde-fec0-3713-0123-456789abcde").is_err());
    }

    #[test]
    fn guid_counter_projection_is_little_endian() {
        assert_eq!(
            Guid::from_u128(0).to_string(),
            "00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            Guid::from_u128(1).to_string(),
            "00000001-0000-0000-0000-000000000000"
        );
        assert_eq!(
            Guid::from_u128(0x1234).to_string(),
            "00001234-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn guid_u128_roundtrip() {
        for value in [0u128, 1, 255, 0xdead_beef, u128::MAX / 7] {
            assert_eq!(Guid::from_u128(value).as_u128(), value);
        }
    }
}
