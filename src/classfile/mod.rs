// src/classfile/mod.rs
//! Minimal class-file metadata reader.
//!
//! Reads just enough of the class-file format for member lookup: constant
//! pool, access flags, this/super class, implemented interfaces, and the
//! name/descriptor pairs of fields and methods. Code and attributes are
//! skipped.

use thiserror::Error;

const MAGIC: u32 = 0xCAFE_BABE;

const ACC_STATIC: u16 = 0x0008;
const ACC_FINAL: u16 = 0x0010;
const ACC_INTERFACE: u16 = 0x0200;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassFileError {
    #[error("class file is truncated")]
    Truncated,
    #[error("bad magic number {0:#010x}")]
    BadMagic(u32),
    #[error("constant pool index {0} is not a {1}")]
    BadConstantIndex(u16, &'static str),
    #[error("unsupported constant pool tag {0}")]
    UnsupportedTag(u8),
    #[error("constant pool holds invalid UTF-8")]
    InvalidUtf8,
}

/// A field or method: access flags plus name and descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
}

impl MemberInfo {
    pub fn is_static(&self) -> bool {
        self.access_flags & ACC_STATIC != 0
    }

    pub fn is_final(&self) -> bool {
        self.access_flags & ACC_FINAL != 0
    }
}

/// Parsed class metadata. Names are internal ('/'-separated).
#[derive(Debug, Clone)]
pub struct ClassFile {
    access_flags: u16,
    this_class: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<MemberInfo>,
    methods: Vec<MemberInfo>,
}

impl ClassFile {
    /// Parse class metadata out of raw bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self, ClassFileError> {
        let mut reader = Reader::new(bytes);

        let magic = reader.u32()?;
        if magic != MAGIC {
            return Err(ClassFileError::BadMagic(magic));
        }
        let _minor = reader.u16()?;
        let _major = reader.u16()?;

        let pool = ConstantPool::parse(&mut reader)?;

        let access_flags = reader.u16()?;
        let this_class = pool.class_name(reader.u16()?)?.to_string();
        let super_index = reader.u16()?;
        let super_class = if super_index == 0 {
            None
        } else {
            Some(pool.class_name(super_index)?.to_string())
        };

        let interface_count = reader.u16()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            interfaces.push(pool.class_name(reader.u16()?)?.to_string());
        }

        let fields = read_members(&mut reader, &pool)?;
        let methods = read_members(&mut reader, &pool)?;

        Ok(Self {
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
        })
    }

    pub fn this_class(&self) -> &str {
        &self.this_class
    }

    pub fn super_class(&self) -> Option<&str> {
        self.super_class.as_deref()
    }

    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    pub fn fields(&self) -> &[MemberInfo] {
        &self.fields
    }

    pub fn methods(&self) -> &[MemberInfo] {
        &self.methods
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE != 0
    }
}

fn read_members(reader: &mut Reader<'_>, pool: &ConstantPool) -> Result<Vec<MemberInfo>, ClassFileError> {
    let count = reader.u16()?;
    let mut members = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let access_flags = reader.u16()?;
        let name = pool.utf8(reader.u16()?)?.to_string();
        let descriptor = pool.utf8(reader.u16()?)?.to_string();
        skip_attributes(reader)?;
        members.push(MemberInfo {
            access_flags,
            name,
            descriptor,
        });
    }
    Ok(members)
}

fn skip_attributes(reader: &mut Reader<'_>) -> Result<(), ClassFileError> {
    let count = reader.u16()?;
    for _ in 0..count {
        let _name = reader.u16()?;
        let length = reader.u32()?;
        reader.skip(length as usize)?;
    }
    Ok(())
}

/// Constant pool entries this reader cares about. Everything else is
/// skipped but must still be walked for its size.
enum Constant {
    Utf8(String),
    Class(u16),
    Other,
}

struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, ClassFileError> {
        let count = reader.u16()?;
        // Index 0 is unused by the format.
        let mut entries = vec![Constant::Other];
        while entries.len() < count as usize {
            let tag = reader.u8()?;
            match tag {
                1 => {
                    let length = reader.u16()?;
                    let bytes = reader.take(length as usize)?;
                    let text = std::str::from_utf8(bytes)
                        .map_err(|_| ClassFileError::InvalidUtf8)?;
                    entries.push(Constant::Utf8(text.to_string()));
                }
                7 => {
                    let name_index = reader.u16()?;
                    entries.push(Constant::Class(name_index));
                }
                3 | 4 => {
                    reader.skip(4)?;
                    entries.push(Constant::Other);
                }
                // Longs and doubles occupy two pool slots.
                5 | 6 => {
                    reader.skip(8)?;
                    entries.push(Constant::Other);
                    entries.push(Constant::Other);
                }
                8 | 16 | 19 | 20 => {
                    reader.skip(2)?;
                    entries.push(Constant::Other);
                }
                9 | 10 | 11 | 12 | 17 | 18 => {
                    reader.skip(4)?;
                    entries.push(Constant::Other);
                }
                15 => {
                    reader.skip(3)?;
                    entries.push(Constant::Other);
                }
                other => return Err(ClassFileError::UnsupportedTag(other)),
            }
        }
        Ok(Self { entries })
    }

    fn utf8(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.entries.get(index as usize) {
            Some(Constant::Utf8(text)) => Ok(text),
            _ => Err(ClassFileError::BadConstantIndex(index, "Utf8")),
        }
    }

    fn class_name(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.entries.get(index as usize) {
            Some(Constant::Class(name_index)) => self.utf8(*name_index),
            _ => Err(ClassFileError::BadConstantIndex(index, "Class")),
        }
    }
}

/// Big-endian cursor over the raw bytes.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ClassFileError> {
        let end = self.pos.checked_add(n).ok_or(ClassFileError::Truncated)?;
        if end > self.bytes.len() {
            return Err(ClassFileError::Truncated);
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, n: usize) -> Result<(), ClassFileError> {
        self.take(n).map(|_| ())
    }

    fn u8(&mut self) -> Result<u8, ClassFileError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, ClassFileError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn u32(&mut self) -> Result<u32, ClassFileError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
