//! Typed decoding of glTF accessors.
//!
//! An accessor describes `count` elements living inside a buffer view. Each element is made of
//! one or more components of the same numeric type, stored little-endian. Views may interleave
//! several attributes, in which case the view stride is larger than the element itself and the
//! gap between elements is skipped.

use gltf::json::accessor::{ComponentType, Type};
use gltf::json::validation::Checked;

use crate::document::{self, Document};
use crate::error::{ExtractError, Result};

/// A single decoded component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Component {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    U32(u32),
    F32(f32),
}

impl Component {
    pub fn as_f32(self) -> f32 {
        match self {
            Component::I8(value) => value as f32,
            Component::U8(value) => value as f32,
            Component::I16(value) => value as f32,
            Component::U16(value) => value as f32,
            Component::U32(value) => value as f32,
            Component::F32(value) => value,
        }
    }

    /// Non-negative integer components as an index. Floats never qualify.
    pub fn as_index(self) -> Option<u32> {
        match self {
            Component::I8(value) => u32::try_from(value).ok(),
            Component::U8(value) => Some(value.into()),
            Component::I16(value) => u32::try_from(value).ok(),
            Component::U16(value) => Some(value.into()),
            Component::U32(value) => Some(value),
            Component::F32(_) => None,
        }
    }
}

/// One decoded accessor element.
///
/// Single-component elements (SCALAR) decode to the bare component, everything else to the
/// components in increasing byte offset order.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Scalar(Component),
    Vector(Vec<Component>),
}

impl Element {
    pub fn as_index(&self) -> Option<u32> {
        match self {
            Element::Scalar(component) => component.as_index(),
            Element::Vector(_) => None,
        }
    }

    pub fn to_array<const N: usize>(&self) -> Option<[f32; N]> {
        match self {
            Element::Vector(components) if components.len() == N => {
                let mut array = [0.0; N];
                for (slot, component) in array.iter_mut().zip(components) {
                    *slot = component.as_f32();
                }
                Some(array)
            }
            _ => None,
        }
    }

    /// Every component as a float, whatever the element's width.
    pub fn to_vec(&self) -> Vec<f32> {
        match self {
            Element::Scalar(component) => vec![component.as_f32()],
            Element::Vector(components) => components.iter().map(|c| c.as_f32()).collect(),
        }
    }
}

pub fn component_count(element_type: Type) -> usize {
    match element_type {
        Type::Scalar => 1,
        Type::Vec2 => 2,
        Type::Vec3 => 3,
        Type::Vec4 => 4,
        Type::Mat2 => 4,
        Type::Mat3 => 9,
        Type::Mat4 => 16,
    }
}

pub fn component_size(component_type: ComponentType) -> usize {
    match component_type {
        ComponentType::I8 | ComponentType::U8 => 1,
        ComponentType::I16 | ComponentType::U16 => 2,
        ComponentType::U32 | ComponentType::F32 => 4,
    }
}

/// Decodes one component. `bytes` must be exactly `component_size(component_type)` long.
fn decode_component(component_type: ComponentType, bytes: &[u8]) -> Component {
    match component_type {
        ComponentType::I8 => Component::I8(i8::from_le_bytes([bytes[0]])),
        ComponentType::U8 => Component::U8(bytes[0]),
        ComponentType::I16 => Component::I16(i16::from_le_bytes([bytes[0], bytes[1]])),
        ComponentType::U16 => Component::U16(u16::from_le_bytes([bytes[0], bytes[1]])),
        ComponentType::U32 => {
            Component::U32(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        }
        ComponentType::F32 => {
            Component::F32(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        }
    }
}

fn decode_element(
    element_type: Type,
    component_type: ComponentType,
    element_bytes: &[u8],
) -> Element {
    if component_count(element_type) == 1 {
        Element::Scalar(decode_component(component_type, element_bytes))
    } else {
        Element::Vector(
            element_bytes
                .chunks_exact(component_size(component_type))
                .map(|bytes| decode_component(component_type, bytes))
                .collect(),
        )
    }
}

/// Decodes every element of accessor `index` out of `buffer` (the document's buffer 0).
pub fn decode_accessor(document: &Document, buffer: &[u8], index: usize) -> Result<Vec<Element>> {
    let accessor = document::accessor(document, index)?;
    let (view_index, view) = document::buffer_view(document, index)?;

    let buffer_index = view.buffer.value();
    if buffer_index != 0 {
        return Err(ExtractError::UnsupportedBuffer {
            view: view_index,
            buffer: buffer_index,
        });
    }

    let element_type = match &accessor.type_ {
        Checked::Valid(element_type) => *element_type,
        Checked::Invalid => {
            return Err(ExtractError::InvalidAccessorField {
                accessor: index,
                field: "type",
            })
        }
    };
    let component_type = match &accessor.component_type {
        Checked::Valid(component_type) => component_type.0,
        Checked::Invalid => {
            return Err(ExtractError::InvalidAccessorField {
                accessor: index,
                field: "componentType",
            })
        }
    };

    let accessor_offset = accessor.byte_offset.as_ref().map_or(0, |offset| offset.0);
    let view_offset = view.byte_offset.as_ref().map_or(0, |offset| offset.0);

    let element_size = component_count(element_type) * component_size(component_type);
    // A zero or missing stride means tightly packed.
    let view_stride = view.byte_stride.as_ref().map_or(0, |stride| stride.0);
    let element_stride = element_size.max(view_stride);

    let count = accessor.count.0;
    let view_length = view.byte_length.0;
    let required = match count {
        0 => Some(0),
        _ => (count - 1)
            .checked_mul(element_stride as u64)
            .and_then(|bytes| bytes.checked_add(element_size as u64)),
    };
    let view_end = required.and_then(|required| accessor_offset.checked_add(required));
    let required = match (required, view_end) {
        (Some(required), Some(view_end)) if view_end <= view_length => required,
        _ => {
            return Err(ExtractError::ViewOverrun {
                accessor: index,
                view: view_index,
                offset: accessor_offset,
                required: required.unwrap_or(u64::MAX),
                view_length,
            })
        }
    };

    let buffer_length = buffer.len() as u64;
    let start = accessor_offset.checked_add(view_offset);
    let end = start.and_then(|start| start.checked_add(required));
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) if end <= buffer_length => (start, end),
        _ => {
            return Err(ExtractError::BufferOverrun {
                accessor: index,
                start: start.unwrap_or(u64::MAX),
                end: end.unwrap_or(u64::MAX),
                buffer_length,
            })
        }
    };

    log::debug!(
        "Decoding accessor {}: {} x {:?}/{:?}, bytes {}..{}, stride {}",
        index,
        count,
        element_type,
        component_type,
        start,
        end,
        element_stride
    );

    // Both bounds fit in usize once they are within the buffer.
    let bytes = &buffer[start as usize..end as usize];

    // The last chunk is exactly one element long, every other chunk is one stride long.
    Ok(bytes
        .chunks(element_stride)
        .map(|chunk| decode_element(element_type, component_type, &chunk[..element_size]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn document_with_accessor(
        component_type: u32,
        element_type: &str,
        count: usize,
        byte_length: usize,
        byte_stride: Option<usize>,
    ) -> Document {
        let mut view = json!({ "buffer": 0, "byteLength": byte_length });
        if let Some(stride) = byte_stride {
            view["byteStride"] = json!(stride);
        }
        Document::try_from(json!({
            "asset": { "version": "2.0" },
            "buffers": [{ "byteLength": byte_length }],
            "bufferViews": [view],
            "accessors": [{
                "bufferView": 0,
                "componentType": component_type,
                "count": count,
                "type": element_type
            }]
        }))
        .expect("Failed to build test document")
    }

    fn f32_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|value| value.to_le_bytes()).collect()
    }

    #[test]
    fn test_scalar_component_types() {
        let bytes = [0xFFu8, 0xFF];
        let cases = [
            (5120, Component::I8(-1)),
            (5121, Component::U8(255)),
            (5122, Component::I16(-1)),
            (5123, Component::U16(65535)),
        ];

        for (component_type, expected) in cases {
            let count = if component_type <= 5121 { 2 } else { 1 };
            let document = document_with_accessor(component_type, "SCALAR", count, 2, None);
            let elements = decode_accessor(&document, &bytes, 0).unwrap();
            assert_eq!(elements.len(), count);
            assert!(elements
                .iter()
                .all(|element| *element == Element::Scalar(expected)));
        }
    }

    #[test]
    fn test_scalar_u32_and_f32() {
        let document = document_with_accessor(5125, "SCALAR", 1, 4, None);
        let elements = decode_accessor(&document, &0xDEADBEEFu32.to_le_bytes(), 0).unwrap();
        assert_eq!(elements, vec![Element::Scalar(Component::U32(0xDEADBEEF))]);

        let document = document_with_accessor(5126, "SCALAR", 1, 4, None);
        let elements = decode_accessor(&document, &(-2.5f32).to_le_bytes(), 0).unwrap();
        assert_eq!(elements, vec![Element::Scalar(Component::F32(-2.5))]);
    }

    #[test]
    fn test_vec3_float_tightly_packed() {
        let bytes = f32_bytes(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let document = document_with_accessor(5126, "VEC3", 2, 24, None);

        let elements = decode_accessor(&document, &bytes, 0).unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].to_array::<3>(), Some([1.0, 2.0, 3.0]));
        assert_eq!(elements[1].to_array::<3>(), Some([4.0, 5.0, 6.0]));
    }

    #[test]
    fn test_interleaved_stride_skips_gap() {
        let mut bytes = f32_bytes(&[1.0, 2.0, 3.0]);
        bytes.extend(f32_bytes(&[-9.0; 5]));
        bytes.extend(f32_bytes(&[4.0, 5.0, 6.0]));
        bytes.extend(f32_bytes(&[-9.0; 5]));
        assert_eq!(bytes.len(), 64);
        let document = document_with_accessor(5126, "VEC3", 2, 64, Some(32));

        let elements = decode_accessor(&document, &bytes, 0).unwrap();

        assert_eq!(elements[0].to_array::<3>(), Some([1.0, 2.0, 3.0]));
        assert_eq!(elements[1].to_array::<3>(), Some([4.0, 5.0, 6.0]));
    }

    #[test]
    fn test_stride_smaller_than_element_is_ignored() {
        let bytes = f32_bytes(&[1.0, 2.0, 3.0, 4.0]);
        let document = document_with_accessor(5126, "VEC2", 2, 16, Some(4));

        let elements = decode_accessor(&document, &bytes, 0).unwrap();

        assert_eq!(elements[1].to_array::<2>(), Some([3.0, 4.0]));
    }

    #[test]
    fn test_offsets_are_combined() {
        let document: Document = Document::try_from(json!({
            "asset": { "version": "2.0" },
            "buffers": [{ "byteLength": 8 }],
            "bufferViews": [{ "buffer": 0, "byteOffset": 2, "byteLength": 6 }],
            "accessors": [{
                "bufferView": 0,
                "byteOffset": 2,
                "componentType": 5123,
                "count": 2,
                "type": "SCALAR"
            }]
        }))
        .unwrap();
        let bytes = [0u8, 0, 0, 0, 7, 0, 9, 0];

        let elements = decode_accessor(&document, &bytes, 0).unwrap();

        assert_eq!(
            elements,
            vec![
                Element::Scalar(Component::U16(7)),
                Element::Scalar(Component::U16(9))
            ]
        );
    }

    #[test]
    fn test_view_too_short_is_rejected() {
        let bytes = f32_bytes(&[0.0; 6]);
        let document = document_with_accessor(5126, "VEC3", 2, 20, None);

        let err = decode_accessor(&document, &bytes, 0).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Bounds);
        assert!(matches!(
            err,
            ExtractError::ViewOverrun {
                required: 24,
                view_length: 20,
                ..
            }
        ));
    }

    #[test]
    fn test_accessor_offset_overrun_is_rejected() {
        let document: Document = Document::try_from(json!({
            "asset": { "version": "2.0" },
            "buffers": [{ "byteLength": 28 }],
            "bufferViews": [{ "buffer": 0, "byteLength": 24 }],
            "accessors": [{
                "bufferView": 0,
                "byteOffset": 4,
                "componentType": 5126,
                "count": 2,
                "type": "VEC3"
            }]
        }))
        .unwrap();

        let err = decode_accessor(&document, &[0; 28], 0).unwrap_err();

        assert!(matches!(
            err,
            ExtractError::ViewOverrun {
                offset: 4,
                required: 24,
                view_length: 24,
                ..
            }
        ));
    }

    #[test]
    fn test_huge_count_is_rejected() {
        let document: Document = Document::try_from(json!({
            "asset": { "version": "2.0" },
            "buffers": [{ "byteLength": 12 }],
            "bufferViews": [{ "buffer": 0, "byteLength": 12 }],
            "accessors": [{
                "bufferView": 0,
                "componentType": 5126,
                "count": (1u64 << 62) + 1,
                "type": "VEC3"
            }]
        }))
        .unwrap();

        let err = decode_accessor(&document, &[0; 12], 0).unwrap_err();

        assert!(matches!(
            err,
            ExtractError::ViewOverrun {
                required: u64::MAX,
                view_length: 12,
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Bounds);
    }

    #[test]
    fn test_offset_overflow_is_rejected() {
        let document: Document = Document::try_from(json!({
            "asset": { "version": "2.0" },
            "buffers": [{ "byteLength": 8 }],
            "bufferViews": [{ "buffer": 0, "byteOffset": u64::MAX, "byteLength": 8 }],
            "accessors": [{
                "bufferView": 0,
                "byteOffset": 4,
                "componentType": 5126,
                "count": 1,
                "type": "SCALAR"
            }]
        }))
        .unwrap();

        let err = decode_accessor(&document, &[0; 8], 0).unwrap_err();

        assert!(matches!(
            err,
            ExtractError::BufferOverrun {
                start: u64::MAX,
                end: u64::MAX,
                buffer_length: 8,
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Bounds);
    }

    #[test]
    fn test_buffer_too_short_is_rejected() {
        let document = document_with_accessor(5126, "VEC3", 2, 24, None);

        let err = decode_accessor(&document, &[0; 16], 0).unwrap_err();

        assert!(matches!(err, ExtractError::BufferOverrun { .. }));
        assert_eq!(err.kind(), ErrorKind::Bounds);
    }

    #[test]
    fn test_other_buffer_is_rejected() {
        let document: Document = Document::try_from(json!({
            "asset": { "version": "2.0" },
            "buffers": [{ "byteLength": 4 }, { "byteLength": 4 }],
            "bufferViews": [{ "buffer": 1, "byteLength": 4 }],
            "accessors": [{
                "bufferView": 0,
                "componentType": 5126,
                "count": 1,
                "type": "SCALAR"
            }]
        }))
        .unwrap();

        let err = decode_accessor(&document, &[0; 4], 0).unwrap_err();

        assert!(matches!(
            err,
            ExtractError::UnsupportedBuffer { view: 0, buffer: 1 }
        ));
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_unknown_accessor_is_rejected() {
        let document = document_with_accessor(5126, "SCALAR", 1, 4, None);

        let err = decode_accessor(&document, &[0; 4], 3).unwrap_err();

        assert!(matches!(err, ExtractError::UnknownAccessor(3)));
    }

    #[test]
    fn test_empty_accessor() {
        let document = document_with_accessor(5126, "VEC3", 0, 0, None);

        let elements = decode_accessor(&document, &[], 0).unwrap();

        assert!(elements.is_empty());
    }

    #[test]
    fn test_element_conversions() {
        assert_eq!(Element::Scalar(Component::I16(-1)).as_index(), None);
        assert_eq!(Element::Scalar(Component::U8(7)).as_index(), Some(7));
        assert_eq!(Element::Scalar(Component::F32(1.0)).as_index(), None);
        assert_eq!(Element::Scalar(Component::U16(3)).to_vec(), vec![3.0]);
        assert_eq!(
            Element::Vector(vec![Component::U8(1), Component::I8(-2)]).to_array::<2>(),
            Some([1.0, -2.0])
        );
        assert_eq!(
            Element::Vector(vec![Component::F32(1.0)]).to_array::<2>(),
            None
        );
    }

    #[test]
    fn test_component_counts() {
        assert_eq!(component_count(Type::Scalar), 1);
        assert_eq!(component_count(Type::Mat2), 4);
        assert_eq!(component_count(Type::Mat3), 9);
        assert_eq!(component_count(Type::Mat4), 16);
    }
}
