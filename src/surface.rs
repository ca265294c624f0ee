// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Engine-visible picture buffers.
//!
//! Surfaces are allocated by the client from memory the engine can reach (usually a physically
//! contiguous pool), this module only describes where they live.

use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

/// A virtual address in the client's mapping of engine-visible memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtAddr(pub usize);

impl VirtAddr {
    pub fn offset(self, bytes: usize) -> VirtAddr {
        VirtAddr(self.0 + bytes)
    }
}

impl<T> From<*const T> for VirtAddr {
    fn from(ptr: *const T) -> Self {
        VirtAddr(ptr as usize)
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Opaque identifier the client uses to refer to a previously decoded surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceHandle(pub u32);

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "surface {}", self.0)
    }
}

/// A planar picture buffer: a luma plane immediately followed by the interleaved chroma plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Surface {
    pub addr: VirtAddr,
    /// Size of the luma plane, in bytes.
    pub plane_size: usize,
}

impl Surface {
    pub fn new(addr: VirtAddr, plane_size: usize) -> Self {
        Self { addr, plane_size }
    }

    pub fn luma_addr(&self) -> VirtAddr {
        self.addr
    }

    pub fn chroma_addr(&self) -> VirtAddr {
        self.addr.offset(self.plane_size)
    }
}

/// Resolves reference handles into surfaces.
pub trait SurfaceLookup {
    /// Returns the surface designated by `handle`, or `None` if the handle is unknown.
    fn surface(&self, handle: SurfaceHandle) -> Option<Surface>;
}

impl<S: BuildHasher> SurfaceLookup for HashMap<SurfaceHandle, Surface, S> {
    fn surface(&self, handle: SurfaceHandle) -> Option<Surface> {
        self.get(&handle).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::Surface;
    use super::SurfaceHandle;
    use super::SurfaceLookup;
    use super::VirtAddr;

    #[test]
    fn plane_addresses() {
        let surface = Surface::new(VirtAddr(0x4000_0000), 720 * 576);
        assert_eq!(surface.luma_addr(), VirtAddr(0x4000_0000));
        assert_eq!(surface.chroma_addr(), VirtAddr(0x4006_5400));
    }

    #[test]
    fn lookup() {
        let surface = Surface::new(VirtAddr(0x1000), 0x100);
        let surfaces = HashMap::from([(SurfaceHandle(3), surface)]);

        assert_eq!(surfaces.surface(SurfaceHandle(3)), Some(surface));
        assert_eq!(surfaces.surface(SurfaceHandle(4)), None);
    }

    #[test]
    fn display() {
        assert_eq!(VirtAddr(0xbeef).to_string(), "0xbeef");
        assert_eq!(SurfaceHandle(7).to_string(), "surface 7");
    }
}
