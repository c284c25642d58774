//! Tuple descriptor (schema).
//!
//! A `TupleDesc` is the single authority for the binary layout of a record.
//! Fields are packed back to back in declaration order with no padding:
//! ```text
//! Offset       Size             Description
//! 0            width(type[0])   field 0
//! offset[1]    width(type[1])   field 1
//! ...
//! offset[n-1]  width(type[n-1]) field n-1
//! ```
//!
//! Encoding per type:
//! - `Int`: `i32`, 4 bytes little-endian
//! - `Double`: `f64`, 8 bytes little-endian
//! - `Char`: UTF-8 text, left-justified and NUL padded to 64 bytes. Longer
//!   text is rejected, never truncated. Trailing NULs are stripped on read,
//!   so text that genuinely ends in NUL does not round-trip.

use crate::error::{Result, StorageError};
use crate::record::{Field, Tuple};
use crate::types::{FieldType, CHAR_WIDTH};
use std::collections::HashSet;

/// Ordered list of typed, named fields with precomputed byte offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleDesc {
    types: Vec<FieldType>,
    names: Vec<String>,
    offsets: Vec<usize>,
    length: usize,
}

impl TupleDesc {
    /// Create a descriptor from parallel lists of types and names
    ///
    /// Fails if the lists differ in length or a name repeats.
    pub fn new<S: Into<String>>(types: Vec<FieldType>, names: Vec<S>) -> Result<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if types.len() != names.len() {
            return Err(StorageError::schema(format!(
                "{} types but {} names",
                types.len(),
                names.len()
            )));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(StorageError::schema(format!("duplicate field name `{}`", name)));
            }
        }

        let mut offsets = Vec::with_capacity(types.len());
        let mut length = 0;
        for ty in &types {
            offsets.push(length);
            length += ty.width();
        }

        Ok(Self {
            types,
            names,
            offsets,
            length,
        })
    }

    /// Create a descriptor from `(type, name)` pairs
    pub fn from_fields<S, I>(fields: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (FieldType, S)>,
    {
        let (types, names): (Vec<FieldType>, Vec<String>) = fields
            .into_iter()
            .map(|(ty, name)| (ty, name.into()))
            .unzip();
        Self::new(types, names)
    }

    /// Concatenate two descriptors, `a`'s fields first
    pub fn merge(a: &TupleDesc, b: &TupleDesc) -> Result<Self> {
        let types = a.types.iter().chain(&b.types).copied().collect();
        let names = a.names.iter().chain(&b.names).cloned().collect::<Vec<_>>();
        Self::new(types, names)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Total record width in bytes
    pub fn length(&self) -> usize {
        self.length
    }

    /// Byte offset of the field at `index`
    pub fn offset_of(&self, index: usize) -> Result<usize> {
        self.offsets
            .get(index)
            .copied()
            .ok_or(StorageError::FieldIndexOutOfRange {
                index,
                field_count: self.len(),
            })
    }

    /// Position of the field called `name`
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| StorageError::UnknownField(name.to_string()))
    }

    pub fn field_type(&self, index: usize) -> Result<FieldType> {
        self.types
            .get(index)
            .copied()
            .ok_or(StorageError::FieldIndexOutOfRange {
                index,
                field_count: self.len(),
            })
    }

    pub fn field_name(&self, index: usize) -> Result<&str> {
        self.names
            .get(index)
            .map(String::as_str)
            .ok_or(StorageError::FieldIndexOutOfRange {
                index,
                field_count: self.len(),
            })
    }

    pub fn types(&self) -> &[FieldType] {
        &self.types
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Check that `tuple` has this schema's arity and field types
    pub fn compatible(&self, tuple: &Tuple) -> bool {
        tuple.len() == self.len()
            && tuple
                .fields()
                .iter()
                .zip(&self.types)
                .all(|(field, ty)| field.field_type() == *ty)
    }

    /// Check that `tuple` is compatible and that every field fits its slot
    pub fn validate(&self, tuple: &Tuple) -> Result<()> {
        if !self.compatible(tuple) {
            return Err(StorageError::schema(format!(
                "tuple {} does not match schema ({})",
                tuple,
                self.describe()
            )));
        }

        for (i, field) in tuple.fields().iter().enumerate() {
            if let Field::Char(text) = field {
                if text.len() > CHAR_WIDTH {
                    return Err(StorageError::TextTooLong {
                        field: self.names[i].clone(),
                        len: text.len(),
                        max: CHAR_WIDTH,
                    });
                }
            }
        }

        Ok(())
    }

    /// Encode `tuple` into a new buffer of `length()` bytes
    pub fn serialize(&self, tuple: &Tuple) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.length];
        self.serialize_into(tuple, &mut buf)?;
        Ok(buf)
    }

    /// Encode `tuple` into the first `length()` bytes of `buf`
    ///
    /// `buf` is left untouched if the tuple is rejected.
    pub fn serialize_into(&self, tuple: &Tuple, buf: &mut [u8]) -> Result<()> {
        if buf.len() < self.length {
            return Err(StorageError::schema(format!(
                "record buffer is {} bytes, need {}",
                buf.len(),
                self.length
            )));
        }
        self.validate(tuple)?;

        for (field, &offset) in tuple.fields().iter().zip(&self.offsets) {
            match field {
                Field::Int(v) => buf[offset..offset + 4].copy_from_slice(&v.to_le_bytes()),
                Field::Double(v) => buf[offset..offset + 8].copy_from_slice(&v.to_le_bytes()),
                Field::Char(text) => {
                    let dst = &mut buf[offset..offset + CHAR_WIDTH];
                    dst.fill(0);
                    dst[..text.len()].copy_from_slice(text.as_bytes());
                }
            }
        }

        Ok(())
    }

    /// Decode a record from the first `length()` bytes of `bytes`
    pub fn deserialize(&self, bytes: &[u8]) -> Result<Tuple> {
        if bytes.len() < self.length {
            return Err(StorageError::corruption(format!(
                "record is {} bytes, schema needs {}",
                bytes.len(),
                self.length
            )));
        }

        let mut fields = Vec::with_capacity(self.len());
        for (i, (ty, &offset)) in self.types.iter().zip(&self.offsets).enumerate() {
            let field = match ty {
                FieldType::Int => {
                    let mut raw = [0u8; 4];
                    raw.copy_from_slice(&bytes[offset..offset + 4]);
                    Field::Int(i32::from_le_bytes(raw))
                }
                FieldType::Double => {
                    let mut raw = [0u8; 8];
                    raw.copy_from_slice(&bytes[offset..offset + 8]);
                    Field::Double(f64::from_le_bytes(raw))
                }
                FieldType::Char => {
                    let raw = &bytes[offset..offset + CHAR_WIDTH];
                    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
                    let text = std::str::from_utf8(&raw[..end]).map_err(|e| {
                        StorageError::corruption(format!(
                            "field `{}` is not valid UTF-8: {}",
                            self.names[i], e
                        ))
                    })?;
                    Field::Char(text.to_string())
                }
            };
            fields.push(field);
        }

        Ok(Tuple::new(fields))
    }

    /// Render as `name:type, ...`
    pub fn describe(&self) -> String {
        self.names
            .iter()
            .zip(&self.types)
            .map(|(name, ty)| format!("{}:{}", name, ty))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> TupleDesc {
        TupleDesc::from_fields([
            (FieldType::Int, "id"),
            (FieldType::Char, "name"),
            (FieldType::Double, "score"),
        ])
        .unwrap()
    }

    #[test]
    fn test_offsets_and_length() {
        let td = people();
        assert_eq!(td.offset_of(0).unwrap(), 0);
        assert_eq!(td.offset_of(1).unwrap(), 4);
        assert_eq!(td.offset_of(2).unwrap(), 68);
        assert_eq!(td.length(), 76);
        assert_eq!(td.len(), 3);

        assert!(matches!(
            td.offset_of(3),
            Err(StorageError::FieldIndexOutOfRange { index: 3, field_count: 3 })
        ));
    }

    #[test]
    fn test_construction_errors() {
        let mismatched = TupleDesc::new(vec![FieldType::Int, FieldType::Int], vec!["a"]);
        assert!(matches!(mismatched, Err(StorageError::Schema(_))));

        let duplicate = TupleDesc::new(vec![FieldType::Int, FieldType::Double], vec!["a", "a"]);
        assert!(matches!(duplicate, Err(StorageError::Schema(_))));
    }

    #[test]
    fn test_index_of() {
        let td = people();
        assert_eq!(td.index_of("id").unwrap(), 0);
        assert_eq!(td.index_of("score").unwrap(), 2);
        assert!(matches!(
            td.index_of("missing"),
            Err(StorageError::UnknownField(n)) if n == "missing"
        ));
        assert_eq!(td.field_name(1).unwrap(), "name");
        assert_eq!(td.field_type(2).unwrap(), FieldType::Double);
    }

    #[test]
    fn test_compatible() {
        let td = people();
        let good = Tuple::new(vec![Field::Int(1), Field::from("a"), Field::Double(0.5)]);
        let wrong_type = Tuple::new(vec![Field::Int(1), Field::Int(2), Field::Double(0.5)]);
        let wrong_arity = Tuple::new(vec![Field::Int(1), Field::from("a")]);

        assert!(td.compatible(&good));
        assert!(!td.compatible(&wrong_type));
        assert!(!td.compatible(&wrong_arity));
    }

    #[test]
    fn test_roundtrip_all_types() -> Result<()> {
        let td = people();
        let tuples = [
            Tuple::new(vec![Field::Int(42), Field::from("alice"), Field::Double(3.25)]),
            Tuple::new(vec![Field::Int(i32::MIN), Field::from(""), Field::Double(-0.0)]),
            Tuple::new(vec![
                Field::Int(i32::MAX),
                Field::from("héllo wörld"),
                Field::Double(f64::MAX),
            ]),
        ];

        for t in &tuples {
            let bytes = td.serialize(t)?;
            assert_eq!(bytes.len(), td.length());
            assert_eq!(&td.deserialize(&bytes)?, t);
        }
        Ok(())
    }

    #[test]
    fn test_layout_bytes() -> Result<()> {
        let td = people();
        let t = Tuple::new(vec![Field::Int(1), Field::from("ab"), Field::Double(1.0)]);
        let bytes = td.serialize(&t)?;

        assert_eq!(&bytes[0..4], &1i32.to_le_bytes());
        assert_eq!(&bytes[4..6], b"ab");
        assert!(bytes[6..68].iter().all(|&b| b == 0));
        assert_eq!(&bytes[68..76], &1.0f64.to_le_bytes());
        Ok(())
    }

    #[test]
    fn test_char_boundary() -> Result<()> {
        let td = TupleDesc::from_fields([(FieldType::Char, "text")])?;

        let exact = "x".repeat(CHAR_WIDTH);
        let t = Tuple::new(vec![Field::from(exact.as_str())]);
        assert_eq!(td.deserialize(&td.serialize(&t)?)?, t);

        let long = "x".repeat(CHAR_WIDTH + 1);
        let err = td.serialize(&Tuple::new(vec![Field::from(long.as_str())])).unwrap_err();
        assert!(matches!(err, StorageError::TextTooLong { len: 65, max: 64, .. }));

        // Trailing NULs are indistinguishable from padding.
        let t = Tuple::new(vec![Field::from("ab\0")]);
        assert_eq!(td.deserialize(&td.serialize(&t)?)?, Tuple::new(vec![Field::from("ab")]));
        Ok(())
    }

    #[test]
    fn test_serialize_into_rejects_without_writing() {
        let td = people();
        let mut buf = vec![0xAAu8; td.length()];
        let bad = Tuple::new(vec![Field::Int(1)]);

        assert!(td.serialize_into(&bad, &mut buf).is_err());
        assert!(buf.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_deserialize_invalid_utf8() {
        let td = TupleDesc::from_fields([(FieldType::Char, "text")]).unwrap();
        let mut bytes = vec![0u8; CHAR_WIDTH];
        bytes[0] = 0xFF;
        assert!(matches!(td.deserialize(&bytes), Err(StorageError::Corruption(_))));
    }

    #[test]
    fn test_merge() -> Result<()> {
        let a = people();
        let b = TupleDesc::from_fields([(FieldType::Int, "age")])?;
        let merged = TupleDesc::merge(&a, &b)?;

        assert_eq!(merged.len(), 4);
        assert_eq!(merged.offset_of(3)?, 76);
        assert_eq!(merged.length(), 80);
        assert_eq!(merged.index_of("age")?, 3);

        assert!(matches!(TupleDesc::merge(&a, &a), Err(StorageError::Schema(_))));
        Ok(())
    }
}
