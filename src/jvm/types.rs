// src/jvm/types.rs
//! JVM-level types, stored as field descriptors.
//!
//! The descriptor grammar is the standard one: primitive letters
//! (`V Z B C S I J F D`), reference descriptors `L<internal>;`, and
//! arrays prefixed with `[`. Internal names use '/' separators.

use thiserror::Error;

use crate::jvm::names;

/// A descriptor that does not conform to the JVM descriptor grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("malformed type descriptor '{0}'")]
    MalformedType(String),
    #[error("malformed method descriptor '{0}'")]
    MalformedMethod(String),
}

/// A JVM type, identified by its field descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JvmType {
    descriptor: String,
}

impl JvmType {
    pub fn void() -> Self {
        Self::primitive('V')
    }

    pub fn boolean() -> Self {
        Self::primitive('Z')
    }

    pub fn byte() -> Self {
        Self::primitive('B')
    }

    pub fn char() -> Self {
        Self::primitive('C')
    }

    pub fn short() -> Self {
        Self::primitive('S')
    }

    pub fn int() -> Self {
        Self::primitive('I')
    }

    pub fn long() -> Self {
        Self::primitive('J')
    }

    pub fn float() -> Self {
        Self::primitive('F')
    }

    pub fn double() -> Self {
        Self::primitive('D')
    }

    fn primitive(letter: char) -> Self {
        Self {
            descriptor: letter.to_string(),
        }
    }

    /// Reference type from an internal name, e.g. `java/lang/String`.
    pub fn object(internal_name: &str) -> Self {
        Self {
            descriptor: format!("L{};", internal_name),
        }
    }

    /// Reference type from a canonical name, e.g. `java.lang.String`.
    pub fn object_canonical(canonical_name: &str) -> Self {
        Self::object(&names::canonical_to_internal(canonical_name))
    }

    /// Array with the given element type.
    pub fn array_of(element: &JvmType) -> Self {
        Self {
            descriptor: format!("[{}", element.descriptor),
        }
    }

    /// Parse and validate a single field descriptor.
    pub fn from_descriptor(descriptor: &str) -> Result<Self, DescriptorError> {
        let mut chars = descriptor.char_indices();
        match take_type(&mut chars) {
            Some(end) if end == descriptor.len() => Ok(Self {
                descriptor: descriptor.to_string(),
            }),
            _ => Err(DescriptorError::MalformedType(descriptor.to_string())),
        }
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// The signature form. Generic type variables are not emitted in this
    /// front end, so the signature always equals the descriptor.
    pub fn signature(&self) -> &str {
        &self.descriptor
    }

    /// Internal name of a plain reference type (`Lfoo/Bar;` yields `foo/Bar`).
    pub fn internal_name(&self) -> Option<&str> {
        self.descriptor
            .strip_prefix('L')
            .and_then(|rest| rest.strip_suffix(';'))
    }

    pub fn is_void(&self) -> bool {
        self.descriptor == "V"
    }

    pub fn is_primitive(&self) -> bool {
        self.descriptor.len() == 1 && self.descriptor != "V"
    }

    pub fn is_reference(&self) -> bool {
        self.descriptor.starts_with('L')
    }

    pub fn is_array(&self) -> bool {
        self.descriptor.starts_with('[')
    }

    /// Element type of an array descriptor.
    pub fn element_type(&self) -> Option<JvmType> {
        self.descriptor
            .strip_prefix('[')
            .map(|rest| JvmType {
                descriptor: rest.to_string(),
            })
    }
}

impl std::fmt::Display for JvmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.descriptor)
    }
}

/// Consume one field descriptor starting at the iterator's position.
/// Returns the byte offset one past the consumed descriptor.
fn take_type(chars: &mut std::str::CharIndices<'_>) -> Option<usize> {
    let (start, c) = chars.next()?;
    match c {
        'V' | 'Z' | 'B' | 'C' | 'S' | 'I' | 'J' | 'F' | 'D' => Some(start + 1),
        '[' => take_type(chars),
        'L' => {
            let mut saw_segment_char = false;
            for (i, c) in chars.by_ref() {
                match c {
                    ';' => {
                        return if saw_segment_char { Some(i + 1) } else { None };
                    }
                    '/' if !saw_segment_char => return None,
                    '/' => saw_segment_char = false,
                    '.' | '[' => return None,
                    _ => saw_segment_char = true,
                }
            }
            None
        }
        _ => None,
    }
}

/// Split a method descriptor into parameter types and a return type.
pub fn parse_method_descriptor(descriptor: &str) -> Result<(Vec<JvmType>, JvmType), DescriptorError> {
    let malformed = || DescriptorError::MalformedMethod(descriptor.to_string());
    let inner = descriptor.strip_prefix('(').ok_or_else(malformed)?;
    let close = inner.find(')').ok_or_else(malformed)?;
    let (params_str, rest) = inner.split_at(close);
    let return_str = &rest[1..];

    let mut params = Vec::new();
    let mut consumed = 0;
    while consumed < params_str.len() {
        let remaining = &params_str[consumed..];
        let mut chars = remaining.char_indices();
        let end = take_type(&mut chars).ok_or_else(malformed)?;
        params.push(JvmType::from_descriptor(&remaining[..end]).map_err(|_| malformed())?);
        consumed += end;
    }

    let return_type = JvmType::from_descriptor(return_str).map_err(|_| malformed())?;
    Ok((params, return_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_descriptors() {
        assert_eq!(JvmType::int().descriptor(), "I");
        assert_eq!(JvmType::boolean().descriptor(), "Z");
        assert_eq!(JvmType::double().descriptor(), "D");
        assert_eq!(JvmType::void().descriptor(), "V");
        assert!(JvmType::int().is_primitive());
        assert!(!JvmType::void().is_primitive());
        assert!(JvmType::void().is_void());
    }

    #[test]
    fn object_descriptor() {
        let string = JvmType::object("java/lang/String");
        assert_eq!(string.descriptor(), "Ljava/lang/String;");
        assert_eq!(string.internal_name(), Some("java/lang/String"));
        assert!(string.is_reference());

        let from_canonical = JvmType::object_canonical("java.lang.String");
        assert_eq!(from_canonical, string);
    }

    #[test]
    fn array_descriptor() {
        let ints = JvmType::array_of(&JvmType::int());
        assert_eq!(ints.descriptor(), "[I");
        assert!(ints.is_array());
        assert_eq!(ints.element_type(), Some(JvmType::int()));

        let strings = JvmType::array_of(&JvmType::object("java/lang/String"));
        assert_eq!(strings.descriptor(), "[Ljava/lang/String;");
    }

    #[test]
    fn from_descriptor_validates() {
        assert!(JvmType::from_descriptor("I").is_ok());
        assert!(JvmType::from_descriptor("[[J").is_ok());
        assert!(JvmType::from_descriptor("Ljava/util/Map;").is_ok());

        assert!(JvmType::from_descriptor("").is_err());
        assert!(JvmType::from_descriptor("X").is_err());
        assert!(JvmType::from_descriptor("II").is_err());
        assert!(JvmType::from_descriptor("Ljava/lang/String").is_err());
        assert!(JvmType::from_descriptor("L;").is_err());
        assert!(JvmType::from_descriptor("Ljava..String;").is_err());
    }

    #[test]
    fn method_descriptor_round_trip() {
        let (params, ret) = parse_method_descriptor("(ILjava/util/Map;)V").unwrap();
        assert_eq!(params, vec![JvmType::int(), JvmType::object("java/util/Map")]);
        assert_eq!(ret, JvmType::void());

        let (params, ret) = parse_method_descriptor("()Ljava/lang/String;").unwrap();
        assert!(params.is_empty());
        assert_eq!(ret, JvmType::object("java/lang/String"));

        let (params, _) = parse_method_descriptor("([Ljava/lang/String;DZ)I").unwrap();
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn method_descriptor_rejects_garbage() {
        assert!(parse_method_descriptor("II)V").is_err());
        assert!(parse_method_descriptor("(I").is_err());
        assert!(parse_method_descriptor("(X)V").is_err());
        assert!(parse_method_descriptor("(I)").is_err());
    }
}
