//! Field values and tuples.

use crate::types::FieldType;
use serde::Serialize;
use std::fmt;

/// A single typed field value
///
/// Serialization is output only (JSON for the CLI). Non-finite doubles
/// render as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field {
    Int(i32),
    Double(f64),
    Char(String),
}

impl Field {
    /// The type tag of this value
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Int(_) => FieldType::Int,
            Self::Double(_) => FieldType::Double,
            Self::Char(_) => FieldType::Char,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::Char(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for Field {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Field {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Field {
    fn from(v: String) -> Self {
        Self::Char(v)
    }
}

impl From<&str> for Field {
    fn from(v: &str) -> Self {
        Self::Char(v.to_string())
    }
}

/// One record's field values, in schema order.
///
/// A tuple carries no layout information of its own; it becomes bytes only
/// when paired with a [`TupleDesc`](crate::record::TupleDesc).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Tuple {
    fields: Vec<Field>,
}

impl Tuple {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get the field at `index`, if present
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Get the type of the field at `index`, if present
    pub fn field_type(&self, index: usize) -> Option<FieldType> {
        self.fields.get(index).map(Field::field_type)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

}

impl From<Vec<Field>> for Tuple {
    fn from(fields: Vec<Field>) -> Self {
        Self::new(fields)
    }
}

impl FromIterator<Field> for Tuple {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", field)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_types() {
        assert_eq!(Field::Int(1).field_type(), FieldType::Int);
        assert_eq!(Field::Double(1.5).field_type(), FieldType::Double);
        assert_eq!(Field::from("x").field_type(), FieldType::Char);
    }

    #[test]
    fn test_tuple_accessors() {
        let t = Tuple::new(vec![Field::Int(1), Field::from("bob"), Field::Double(2.5)]);
        assert_eq!(t.len(), 3);
        assert!(!t.is_empty());
        assert_eq!(t.field(1), Some(&Field::from("bob")));
        assert_eq!(t.field_type(2), Some(FieldType::Double));
        assert_eq!(t.field(3), None);
        assert_eq!(t.field_type(3), None);
        assert_eq!(t.to_string(), "(1, bob, 2.5)");
    }

    #[test]
    fn test_tuple_json() {
        let t: Tuple = vec![Field::Int(1), Field::from("bob"), Field::Double(2.5)].into();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"[1,"bob",2.5]"#);
    }

    #[test]
    fn test_non_finite_double_json() {
        let t = Tuple::new(vec![Field::Double(f64::NAN), Field::Double(f64::INFINITY)]);
        assert_eq!(serde_json::to_string(&t).unwrap(), "[null,null]");
    }
}
