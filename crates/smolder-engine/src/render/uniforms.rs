use super::backend::{BackendError, Uniform, UniformDecl, UniformKind};

/// Placed uniform inside a block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformSlot {
    pub name: &'static str,
    pub kind: UniformKind,
    pub offset: u64,
}

/// CPU-side uniform block of one program.
///
/// Layout follows WGSL uniform rules for the supported kinds: members are
/// placed in declaration order at their natural alignment and the block size
/// is rounded up to 16 bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformBlock {
    slots: Vec<UniformSlot>,
    data: Vec<u8>,
}

#[inline]
pub(crate) fn align_up(value: u64, align: u64) -> u64 {
    value.div_ceil(align) * align
}

impl UniformBlock {
    pub fn new(decls: &[UniformDecl]) -> Self {
        let mut slots = Vec::with_capacity(decls.len());
        let mut end = 0u64;
        for d in decls {
            let offset = align_up(end, d.kind.align());
            slots.push(UniformSlot { name: d.name, kind: d.kind, offset });
            end = offset + d.kind.size();
        }
        let size = align_up(end, 16);
        Self {
            slots,
            data: vec![0; size as usize],
        }
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn slots(&self) -> &[UniformSlot] {
        &self.slots
    }

    pub fn slot(&self, name: &str) -> Option<&UniformSlot> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Writes `value` into the slot named `name`.
    ///
    /// `program` only labels errors.
    pub fn set(&mut self, program: &str, name: &str, value: Uniform) -> Result<(), BackendError> {
        let slot = *self.slot(name).ok_or_else(|| BackendError::UnknownUniform {
            program: program.to_string(),
            name: name.to_string(),
        })?;

        if slot.kind != value.kind() {
            return Err(BackendError::UniformKindMismatch {
                program: program.to_string(),
                name: name.to_string(),
                expected: slot.kind,
                actual: value.kind(),
            });
        }

        let start = slot.offset as usize;
        match value {
            Uniform::Float(v) => self.put(start, bytemuck::bytes_of(&v)),
            Uniform::Int(v) => self.put(start, bytemuck::bytes_of(&v)),
            Uniform::Vec4(v) => self.put(start, bytemuck::cast_slice(&v.to_array())),
            Uniform::Mat4(m) => self.put(start, bytemuck::cast_slice(&m.to_cols_array())),
        }
        Ok(())
    }

    fn put(&mut self, start: usize, bytes: &[u8]) {
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
    }
}
