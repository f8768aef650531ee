pub mod compression;
pub mod convert;
pub mod reader;
pub mod writer;

pub use compression::*;
pub use convert::*;
pub use reader::*;
pub use writer::*;

#[cfg(test)]
mod tests {
    use super::*;
    use datree_model::{
        ComponentData, DataTreeRoot, DynamicReferenceVariable, ProtoFluxDataRelay, Slot,
    };
    use datree_types::Type;
    use serde_json::json;

    fn relay_tree() -> DataTreeRoot {
        let mut relay =
            ProtoFluxDataRelay::new(ProtoFluxDataRelay::value_relay(Type::simple("int")));
        relay.input.data = Some(relay.base.id);
        let relay_id = relay.base.id;
        let relay_input_field_id = relay.input.id;

        let mut output_var = DynamicReferenceVariable::new(Type::namespaced(
            "FrooxEngine",
            "FrooxEngine.ProtoFlux.INodeOutput",
        ));
        output_var.variable_name.data = Some("Output".to_string());
        output_var.reference.data = Some(relay_id);

        let mut input_var =
            DynamicReferenceVariable::new(Type::namespaced("FrooxEngine", "FrooxEngine.ISyncRef"));
        input_var.variable_name.data = Some("Input".to_string());
        input_var.reference.data = Some(relay_input_field_id);

        let mut object = Slot::new();
        object.name.data = Some("Relay".to_string());
        object.components.data = vec![
            ComponentData::ProtoFluxDataRelay(relay),
            ComponentData::DynamicReferenceVariable(output_var),
            ComponentData::DynamicReferenceVariable(input_var),
        ];

        DataTreeRoot::new("2025.3.25.1348", object)
    }

    #[test]
    fn header_roundtrip() {
        let mut writer = ByteWriter::new();
        write_header(&mut writer, FORMAT_VERSION, Compression::Deflate);
        let bytes = writer.into_bytes();
        assert_eq!(&bytes[..4], b"FrDT");

        let mut reader = ByteReader::new(&bytes);
        let header = try_read_header(&mut reader).expect("header");
        assert_eq!(header.version, 0);
        assert_eq!(header.compression, 3);
    }

    #[test]
    fn load_is_quiet_on_unrelated_bytes() {
        assert!(load_auto(b"").unwrap().is_none());
        assert!(load_auto(b"PK\x03\x04 some zip").unwrap().is_none());
        assert!(load_auto(b"FrD").unwrap().is_none());
        // Right magic, truncated before the version field ends.
        assert!(load_auto(b"FrDT\x00\x00").unwrap().is_none());
        // Magic + version, truncated before the compression code.
        assert!(load_auto(b"FrDT\x00\x00\x00\x00").unwrap().is_none());
    }

    #[test]
    fn version_too_new_is_fatal() {
        let mut writer = ByteWriter::new();
        write_header(&mut writer, 1, Compression::Deflate);
        let error = load_auto(&writer.into_bytes()).unwrap_err();
        match error {
            ConvertError::VersionTooNew(version) => assert_eq!(version, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reserved_codecs_fail_by_name() {
        for codec in [Compression::None, Compression::Lz4, Compression::Lzma] {
            let mut writer = ByteWriter::new();
            write_header(&mut writer, 0, codec);
            writer.push_buffer(b"payload");
            let error = load_auto(&writer.into_bytes()).unwrap_err();
            let message = error.to_string();
            assert!(
                message.contains(&codec.to_string()),
                "error should name {codec}: {message}"
            );
        }
    }

    #[test]
    fn unrecognized_codec_code_is_fatal() {
        let mut writer = ByteWriter::new();
        writer.push_buffer(&DATA_TREE_MAGIC);
        writer.push_i32(0);
        writer.push_7bit_encoded_uint(7);
        writer.push_buffer(b"payload");
        let error = load_auto(&writer.into_bytes()).unwrap_err();
        match error {
            ConvertError::UnknownCompression(code) => assert_eq!(code, 7),
            other => panic!("unexpected error: {other}"),
        }
        assert!(error.to_string().contains('7'));
    }

    #[test]
    fn saving_with_a_reserved_codec_is_rejected() {
        let tree = relay_tree();
        assert!(save_with(&tree, Compression::Lzma).is_err());
        assert!(save_with(&tree, Compression::None).is_err());
    }

    #[test]
    fn decodes_handcrafted_document() {
        let document = json!({
            "VersionNumber": "1",
            "FeatureFlags": {
                "ColorManagement": 0,
                "ResetGUID": 0,
                "ProtoFlux": 0,
                "TEXTURE_QUALITY": 0,
                "TypeManagement": 0,
                "ALIGNER_FILTERING": 0,
                "PhotonDust": 0
            },
            "Types": [],
            "TypeVersions": {},
            "Object": {
                "ID": "00000000-0000-0000-0000-000000000000",
                "Components": {"ID": "00000001-0000-0000-0000-000000000000", "Data": []},
                "Name": {"ID": "00000002-0000-0000-0000-000000000000", "Data": "root"},
                "Tag": {"ID": "00000003-0000-0000-0000-000000000000", "Data": null},
                "Active": {"ID": "00000004-0000-0000-0000-000000000000", "Data": true},
                "Persistent-ID": "00000005-0000-0000-0000-000000000000",
                "Position": {"ID": "00000006-0000-0000-0000-000000000000", "Data": [0.0, 0.0, 0.0]},
                "Rotation": {"ID": "00000007-0000-0000-0000-000000000000", "Data": [0.0, 0.0, 0.0, 1.0]},
                "Scale": {"ID": "00000008-0000-0000-0000-000000000000", "Data": [1.0, 1.0, 1.0]},
                "OrderOffset": {"ID": "00000009-0000-0000-0000-000000000000", "Data": 0},
                "ParentReference": "0000000a-0000-0000-0000-000000000000",
                "Children": []
            }
        });

        let payload = compress_deflate_best(&serde_json::to_vec(&document).unwrap()).unwrap();
        let mut writer = ByteWriter::new();
        writer.push_buffer(&DATA_TREE_MAGIC);
        writer.push_i32(0);
        writer.push_7bit_encoded_uint(3);
        writer.push_buffer(&payload);

        let root = load_auto(&writer.into_bytes())
            .expect("decode")
            .expect("recognized document");
        assert_eq!(root.version_number, "1");
        assert_eq!(root.object.name.data.as_deref(), Some("root"));
        assert!(root.object.components.data.is_empty());
        assert!(root.object.children.is_empty());
        assert_eq!(root.feature_flags.get("ProtoFlux"), 0);
    }

    #[test]
    fn save_load_roundtrip_preserves_identity() {
        let tree = relay_tree();
        let bytes = save(&tree).expect("save");

        let mut reader = ByteReader::new(&bytes);
        let header = try_read_header(&mut reader).expect("header");
        assert_eq!(header.version, FORMAT_VERSION);
        assert_eq!(header.compression, Compression::Deflate.code());

        let root = load_auto(&bytes).expect("load").expect("recognized");
        assert_eq!(root.version_number, tree.version_number);
        assert_eq!(root.object.name.data.as_deref(), Some("Relay"));

        let components = &root.object.components.data;
        let ComponentData::ProtoFluxDataRelay(relay) = &components[0] else {
            panic!("expected a relay");
        };
        let ComponentData::DynamicReferenceVariable(output_var) = &components[1] else {
            panic!("expected a reference variable");
        };
        let ComponentData::DynamicReferenceVariable(input_var) = &components[2] else {
            panic!("expected a reference variable");
        };

        // Shared handles stay shared, distinct handles stay distinct.
        assert_eq!(output_var.reference.data, Some(relay.base.id));
        assert_eq!(relay.input.data, Some(relay.base.id));
        assert_eq!(input_var.reference.data, Some(relay.input.id));
        assert_ne!(relay.base.id, relay.input.id);
        assert_ne!(output_var.base.id, input_var.base.id);
    }

    #[test]
    fn save_load_save_is_byte_stable() {
        let bytes = save(&relay_tree()).expect("save");
        let root = load_auto(&bytes).expect("load").expect("recognized");
        let again = save(&root).expect("save again");
        assert_eq!(bytes, again);
    }

    #[test]
    fn corrupt_payload_is_fatal() {
        let mut writer = ByteWriter::new();
        write_header(&mut writer, 0, Compression::Deflate);
        writer.push_buffer(b"\xde\xad\xbe\xef not deflate");
        assert!(load_auto(&writer.into_bytes()).is_err());
    }
}
