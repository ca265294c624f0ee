// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Translation of client addresses into addresses the engine can use.
//!
//! The VE is not behind an IOMMU: every buffer it touches must live in physically contiguous
//! memory and be programmed with its physical address.

use thiserror::Error;

use crate::surface::VirtAddr;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("address {0} is not in engine-visible memory")]
    OutOfPool(VirtAddr),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Converts virtual addresses of engine-visible buffers into physical addresses.
pub trait AddressTranslator {
    fn phys_addr(&self, addr: VirtAddr) -> Result<u32, TranslationError>;
}

/// Translator for a single physically contiguous pool mapped at `virt_base`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearTranslator {
    virt_base: VirtAddr,
    phys_base: u32,
    size: usize,
}

impl LinearTranslator {
    pub fn new(virt_base: VirtAddr, phys_base: u32, size: usize) -> Self {
        Self {
            virt_base,
            phys_base,
            size,
        }
    }
}

impl AddressTranslator for LinearTranslator {
    fn phys_addr(&self, addr: VirtAddr) -> Result<u32, TranslationError> {
        let offset = addr
            .0
            .checked_sub(self.virt_base.0)
            .filter(|&offset| offset < self.size)
            .ok_or(TranslationError::OutOfPool(addr))?;

        u32::try_from(offset)
            .ok()
            .and_then(|offset| self.phys_base.checked_add(offset))
            .ok_or(TranslationError::OutOfPool(addr))
    }
}
