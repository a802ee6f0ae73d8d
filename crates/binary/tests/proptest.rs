//! Property-based tests for pqbin-binary using proptest.

use pqbin_binary::{
    ArrayDecoder, ArrayDim, ArrayEncoder, ArrayHeader, CompositeDecoder, CompositeEncoder,
    ParameterBuffer, Value, WireValue,
};
use pqbin_core::DataType;
use proptest::prelude::*;

fn scalar_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i16>().prop_map(Value::Int2),
        any::<i32>().prop_map(Value::Int4),
        any::<i64>().prop_map(Value::Int8),
        any::<u32>().prop_map(Value::Oid),
        any::<f64>()
            .prop_filter("nan never compares equal", |v| !v.is_nan())
            .prop_map(Value::Float8),
        "[a-zA-Z0-9 ]{0,24}".prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(Value::Bytea),
    ]
}

proptest! {
    #[test]
    fn scalar_roundtrip(value in scalar_value()) {
        let bytes = value.to_wire().unwrap();
        prop_assert_eq!(Value::decode_oid(value.oid(), &bytes).unwrap(), value);
    }

    #[test]
    fn int8_decode_rejects_wrong_width(v in any::<i64>(), cut in 0usize..8) {
        let mut buf = Vec::new();
        v.encode(&mut buf);
        prop_assert!(i64::decode(&buf[..cut]).is_err());
        buf.push(0);
        prop_assert!(i64::decode(&buf).is_err());
    }

    #[test]
    fn array_roundtrip(
        shape in prop::collection::vec(0i32..4, 1..4),
        lower in -3i32..3,
        seed in prop::collection::vec(prop::option::of(any::<i32>()), 64),
    ) {
        let dims: Vec<ArrayDim> = shape.iter().map(|&n| ArrayDim::new(n, lower)).collect();
        let header = ArrayHeader::new(23, dims.clone()).unwrap();
        let count = header.element_count();
        let items: Vec<Option<Value>> = seed[..count].iter().map(|v| v.map(Value::Int4)).collect();

        let mut enc = ArrayEncoder::new(header);
        for item in &items {
            enc.push_optional(item.as_ref()).unwrap();
        }
        let bytes = enc.finish().unwrap();

        let dec = ArrayDecoder::new(&bytes).unwrap();
        prop_assert_eq!(dec.header().dims(), &dims[..]);
        prop_assert_eq!(dec.header().flags & 1 == 1, items.iter().any(Option::is_none));
        prop_assert_eq!(dec.into_values().unwrap(), items);
    }

    #[test]
    fn record_roundtrip(columns in prop::collection::vec(prop::option::of(scalar_value()), 0..8)) {
        let mut enc = CompositeEncoder::new();
        for column in &columns {
            match column {
                Some(v) => enc.push_value(v).unwrap(),
                None => enc.push_null(DataType::Text.oid()).unwrap(),
            }
        }
        let bytes = enc.finish().unwrap();
        let dec = CompositeDecoder::new(&bytes).unwrap();
        prop_assert_eq!(dec.columns(), columns.len());
        prop_assert_eq!(dec.into_values().unwrap(), columns);
    }

    #[test]
    fn parameter_offsets_are_contiguous(values in prop::collection::vec(prop::option::of(scalar_value()), 0..32)) {
        let mut pb = ParameterBuffer::new();
        for v in &values {
            pb.add_optional(DataType::Int4, v.as_ref()).unwrap();
        }

        let mut expected_offset = 0usize;
        for (entry, v) in pb.parameters().iter().zip(&values) {
            prop_assert_eq!(entry.offset, expected_offset);
            match v {
                Some(v) => {
                    prop_assert_eq!(entry.length as usize, v.to_wire().unwrap().len());
                    expected_offset += entry.length as usize;
                }
                None => prop_assert!(entry.is_null()),
            }
        }
        prop_assert_eq!(pb.payload_len(), expected_offset);

        let finalized = pb.finalize();
        for (&bytes, v) in finalized.values.iter().zip(&values) {
            let expected = v.as_ref().map(|v| v.to_wire().unwrap());
            prop_assert_eq!(bytes.map(|b| b.to_vec()), expected);
        }
    }
}
