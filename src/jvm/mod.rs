// src/jvm/mod.rs
pub mod descriptors;
pub mod names;
pub mod types;

pub use descriptors::{JvmConstructorDescriptor, JvmFieldDescriptor, JvmMethodDescriptor};
pub use names::{canonical_to_internal, internal_to_canonical, package_of, simple_name};
pub use types::{DescriptorError, JvmType, parse_method_descriptor};
