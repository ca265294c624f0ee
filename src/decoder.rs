// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Decoders driving the engine for one picture at a time.

pub mod mpeg12;

use std::time::Duration;

use thiserror::Error;

use crate::device::cedar::memory::TranslationError;
use crate::surface::SurfaceHandle;
use crate::surface::VirtAddr;

/// Error returned when decoding a picture.
///
/// All of them only affect the picture being decoded: the engine is left idle and can be used
/// for the next one.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("coded picture is {len} bytes, more than the {capacity} bytes bitstream buffer")]
    BitstreamTooLarge { len: usize, capacity: usize },
    #[error("bitstream buffer of {0} bytes is larger than the engine can address")]
    UnsupportedBufferSize(usize),
    #[error("reference {0} cannot be resolved")]
    InvalidReference(SurfaceHandle),
    #[error(transparent)]
    AddressTranslation(#[from] TranslationError),
    #[error("engine did not complete the picture within {0:?}")]
    HardwareTimeout(Duration),
    #[error("failed to wait for the engine: {0:#}")]
    Wait(anyhow::Error),
}

/// A coded picture in the engine-visible bitstream buffer.
#[derive(Clone, Copy, Debug)]
pub struct BitstreamBuffer<'a> {
    data: &'a [u8],
    addr: VirtAddr,
}

impl<'a> BitstreamBuffer<'a> {
    /// Creates a buffer for `data`, which the engine sees at virtual address `addr`.
    pub fn new(data: &'a [u8], addr: VirtAddr) -> Self {
        Self { data, addr }
    }

    /// Creates a buffer for `data` living directly in engine-visible memory.
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::new(data, VirtAddr::from(data.as_ptr()))
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn addr(&self) -> VirtAddr {
        self.addr
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
