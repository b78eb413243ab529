// src/jvm/descriptors.rs
//! Low-level member descriptors handed to the bytecode emitter.

use crate::jvm::types::{DescriptorError, JvmType, parse_method_descriptor};

/// A resolved JVM method: owner, name, descriptor, and dispatch flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JvmMethodDescriptor {
    owner_internal_name: String,
    name: String,
    descriptor: String,
    is_static: bool,
    on_interface: bool,
}

impl JvmMethodDescriptor {
    pub fn new(
        owner_internal_name: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
        is_static: bool,
        on_interface: bool,
    ) -> Self {
        Self {
            owner_internal_name: owner_internal_name.into(),
            name: name.into(),
            descriptor: descriptor.into(),
            is_static,
            on_interface,
        }
    }

    pub fn owner_internal_name(&self) -> &str {
        &self.owner_internal_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn on_interface(&self) -> bool {
        self.on_interface
    }

    pub fn parameter_types(&self) -> Result<Vec<JvmType>, DescriptorError> {
        parse_method_descriptor(&self.descriptor).map(|(params, _)| params)
    }

    pub fn return_type(&self) -> Result<JvmType, DescriptorError> {
        parse_method_descriptor(&self.descriptor).map(|(_, ret)| ret)
    }
}

/// A resolved JVM constructor. The member name is always `<init>` and the
/// return type always `V`, so only owner and descriptor are carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JvmConstructorDescriptor {
    owner_internal_name: String,
    descriptor: String,
}

impl JvmConstructorDescriptor {
    pub fn new(owner_internal_name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            owner_internal_name: owner_internal_name.into(),
            descriptor: descriptor.into(),
        }
    }

    pub fn owner_internal_name(&self) -> &str {
        &self.owner_internal_name
    }

    pub fn name(&self) -> &str {
        "<init>"
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn parameter_types(&self) -> Result<Vec<JvmType>, DescriptorError> {
        parse_method_descriptor(&self.descriptor).map(|(params, _)| params)
    }
}

/// A resolved JVM field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JvmFieldDescriptor {
    owner_internal_name: String,
    name: String,
    field_type: JvmType,
    is_static: bool,
}

impl JvmFieldDescriptor {
    pub fn new(
        owner_internal_name: impl Into<String>,
        name: impl Into<String>,
        field_type: JvmType,
        is_static: bool,
    ) -> Self {
        Self {
            owner_internal_name: owner_internal_name.into(),
            name: name.into(),
            field_type,
            is_static,
        }
    }

    pub fn owner_internal_name(&self) -> &str {
        &self.owner_internal_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &JvmType {
        &self.field_type
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_descriptor_accessors() {
        let method = JvmMethodDescriptor::new(
            "java/lang/String",
            "substring",
            "(II)Ljava/lang/String;",
            false,
            false,
        );
        assert_eq!(method.owner_internal_name(), "java/lang/String");
        assert_eq!(method.name(), "substring");
        assert_eq!(
            method.parameter_types().unwrap(),
            vec![JvmType::int(), JvmType::int()]
        );
        assert_eq!(
            method.return_type().unwrap(),
            JvmType::object("java/lang/String")
        );
    }

    #[test]
    fn constructor_descriptor_accessors() {
        let ctor = JvmConstructorDescriptor::new("me/example/Point", "(ILjava/util/Map;)V");
        assert_eq!(ctor.name(), "<init>");
        assert_eq!(
            ctor.parameter_types().unwrap(),
            vec![JvmType::int(), JvmType::object("java/util/Map")]
        );
    }
}
