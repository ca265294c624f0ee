// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Memory-mapped access to the VE registers.

use std::ffi::c_void;
use std::fs::File;
use std::fs::OpenOptions;
use std::num::NonZeroUsize;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::path::PathBuf;
use std::ptr::NonNull;

use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::libc::off_t;
use nix::sys::mman::mmap;
use nix::sys::mman::munmap;
use nix::sys::mman::MapFlags;
use nix::sys::mman::ProtFlags;
use thiserror::Error;

use crate::device::cedar::regs::VE_BASE;
use crate::device::cedar::regs::VE_REGS_SIZE;
use crate::device::cedar::RegisterSpace;

/// Device node exposing the VE registers through mmap.
pub const CEDAR_DEVICE_PATH: &str = "/dev/cedar_dev";

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot map an empty register window")]
    EmptyWindow,
    #[error("register window offset {0:#x} is not addressable")]
    Offset(u32),
    #[error("failed to map the register window: {0}")]
    Mmap(Errno),
}

/// A window of device registers mapped into our address space.
pub struct MappedRegisters {
    base: NonNull<c_void>,
    len: NonZeroUsize,
    // Keeps the device open for as long as the mapping exists.
    _device: File,
}

// SAFETY: The mapping is owned by this object and only accessed through it.
unsafe impl Send for MappedRegisters {}

impl MappedRegisters {
    /// Maps `len` bytes of `path` starting at `phys_base`.
    pub fn open<P: AsRef<Path>>(
        path: P,
        phys_base: u32,
        len: usize,
    ) -> Result<Self, MappingError> {
        let path = path.as_ref();
        let len = NonZeroUsize::new(len).ok_or(MappingError::EmptyWindow)?;
        let offset = off_t::try_from(phys_base).map_err(|_| MappingError::Offset(phys_base))?;

        let device = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags((OFlag::O_SYNC | OFlag::O_CLOEXEC).bits())
            .open(path)
            .map_err(|source| MappingError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        // SAFETY: We map a fresh shared region that nothing else in this process references.
        let base = unsafe {
            mmap(
                None,
                len,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
                &device,
                offset,
            )
        }
        .map_err(MappingError::Mmap)?;

        log::debug!("Mapped {} bytes of {} at {:#x}", len.get(), path.display(), phys_base);

        Ok(Self {
            base,
            len,
            _device: device,
        })
    }

    /// Maps the VE control block through the cedar device node.
    pub fn open_cedar() -> Result<Self, MappingError> {
        Self::open(CEDAR_DEVICE_PATH, VE_BASE, VE_REGS_SIZE)
    }

    fn register(&self, offset: u32) -> *mut u32 {
        let offset = offset as usize;
        assert!(
            offset % 4 == 0 && offset + 4 <= self.len.get(),
            "register {:#x} outside of the {:#x} bytes window",
            offset,
            self.len.get()
        );

        // SAFETY: `offset` is aligned and within the mapping.
        unsafe { self.base.as_ptr().cast::<u8>().add(offset).cast::<u32>() }
    }
}

impl RegisterSpace for MappedRegisters {
    fn read(&self, offset: u32) -> u32 {
        // SAFETY: `register` only returns pointers into the live mapping.
        unsafe { std::ptr::read_volatile(self.register(offset)) }
    }

    fn write(&mut self, offset: u32, value: u32) {
        // SAFETY: `register` only returns pointers into the live mapping.
        unsafe { std::ptr::write_volatile(self.register(offset), value) }
    }
}

impl Drop for MappedRegisters {
    fn drop(&mut self) {
        // SAFETY: `base` and `len` describe the mapping created in `open`, which no reference
        // outlives.
        if let Err(e) = unsafe { munmap(self.base, self.len.get()) } {
            log::error!("Failed to unmap register window: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MappedRegisters;
    use super::MappingError;

    #[test]
    fn missing_device() {
        let err = MappedRegisters::open("/nonexistent/cedar_dev", 0x01c0_e000, 0x800)
            .err()
            .unwrap();

        assert!(matches!(err, MappingError::Open { .. }));
        assert!(err.to_string().starts_with("failed to open /nonexistent/cedar_dev"));
    }

    #[test]
    fn empty_window() {
        let err = MappedRegisters::open("/dev/null", 0, 0).err().unwrap();

        assert!(matches!(err, MappingError::EmptyWindow));
    }
}
