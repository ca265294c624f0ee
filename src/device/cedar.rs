// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Access to the Cedar video engine.
//!
//! The [`Engine`] is the exclusive handle over one VE instance. It bundles the three services a
//! decode needs from the platform: register access ([`RegisterSpace`]), completion notification
//! ([`CompletionWait`]) and physical address translation ([`AddressTranslator`]). Codec-specific
//! sequencing lives in [`crate::decoder`].

pub mod completion;
pub mod controls;
pub mod memory;
pub mod mmio;
pub mod regs;
pub mod trace;

use std::time::Duration;

use crate::device::cedar::completion::CompletionWait;
use crate::device::cedar::completion::WaitStatus;
use crate::device::cedar::memory::AddressTranslator;
use crate::device::cedar::memory::TranslationError;
use crate::device::cedar::regs::VE_CTRL;
use crate::device::cedar::regs::VE_CTRL_MODE_MASK;
use crate::surface::Surface;
use crate::surface::VirtAddr;

/// Size of the bitstream (VBV) buffer the engine reads coded pictures from.
pub const VBV_SIZE: usize = 1024 * 1024;

/// Largest bitstream buffer whose length in bits fits the 32-bit VLD registers.
pub const MAX_VBV_SIZE: usize = (u32::MAX / 8) as usize;

/// Word-granular access to the VE registers.
pub trait RegisterSpace {
    fn read(&self, offset: u32) -> u32;
    fn write(&mut self, offset: u32, value: u32);
}

/// Codec mode selected in the low bits of `VE_CTRL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum EngineMode {
    Mpeg = 0x0,
    /// No codec engine selected.
    Disabled = 0x7,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// How long to wait for a picture to be decoded before giving up on it.
    pub completion_timeout: Duration,
    /// Capacity of the bitstream buffers handed to the engine.
    pub vbv_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            completion_timeout: Duration::from_secs(1),
            vbv_size: VBV_SIZE,
        }
    }
}

/// Physical addresses of the two planes of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneAddrs {
    pub luma: u32,
    pub chroma: u32,
}

/// Exclusive handle over a VE instance.
///
/// Only one transaction can be in flight at a time, which `&mut self` on every programming method
/// enforces. Share an engine between threads by putting it behind a `Mutex` held for the whole
/// transaction.
pub struct Engine<R, W, T> {
    registers: R,
    completion: W,
    translator: T,
    config: EngineConfig,
}

impl<R, W, T> Engine<R, W, T>
where
    R: RegisterSpace,
    W: CompletionWait,
    T: AddressTranslator,
{
    pub fn new(registers: R, completion: W, translator: T, config: EngineConfig) -> Self {
        Self {
            registers,
            completion,
            translator,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registers(&self) -> &R {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.registers
    }

    pub fn completion(&self) -> &W {
        &self.completion
    }

    pub fn completion_mut(&mut self) -> &mut W {
        &mut self.completion
    }

    pub fn read(&self, offset: u32) -> u32 {
        self.registers.read(offset)
    }

    pub fn write(&mut self, offset: u32, value: u32) {
        log::trace!(
            "{} <- {:#010x}",
            regs::name(offset).unwrap_or("VE register"),
            value
        );
        self.registers.write(offset, value);
    }

    /// Selects `mode` in `VE_CTRL`, leaving the other control bits untouched.
    pub fn set_mode(&mut self, mode: EngineMode) {
        let ctrl = self.read(VE_CTRL);
        self.write(VE_CTRL, (ctrl & !VE_CTRL_MODE_MASK) | mode as u32);
    }

    pub fn phys_addr(&self, addr: VirtAddr) -> Result<u32, TranslationError> {
        self.translator.phys_addr(addr)
    }

    pub fn plane_addrs(&self, surface: &Surface) -> Result<PlaneAddrs, TranslationError> {
        Ok(PlaneAddrs {
            luma: self.phys_addr(surface.luma_addr())?,
            chroma: self.phys_addr(surface.chroma_addr())?,
        })
    }

    /// Drops completions left over from earlier transactions.
    pub fn discard_completions(&mut self) -> anyhow::Result<()> {
        self.completion.reset()
    }

    /// Blocks until the engine signals `events` completions or the configured timeout elapses.
    pub fn wait_for_completion(&mut self, events: u32) -> anyhow::Result<WaitStatus> {
        self.completion.wait(events, self.config.completion_timeout)
    }

    pub fn into_parts(self) -> (R, W, T) {
        (self.registers, self.completion, self.translator)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::Engine;
    use super::EngineConfig;
    use super::EngineMode;
    use super::PlaneAddrs;
    use crate::device::cedar::completion::WaitStatus;
    use crate::device::cedar::memory::LinearTranslator;
    use crate::device::cedar::memory::TranslationError;
    use crate::device::cedar::regs::VE_CTRL;
    use crate::device::cedar::trace::RegisterTrace;
    use crate::device::cedar::trace::ScriptedCompletion;
    use crate::surface::Surface;
    use crate::surface::VirtAddr;

    fn engine() -> Engine<RegisterTrace, ScriptedCompletion, LinearTranslator> {
        Engine::new(
            RegisterTrace::new(),
            ScriptedCompletion::new(),
            LinearTranslator::new(VirtAddr(0x1000_0000), 0x4000_0000, 0x0010_0000),
            EngineConfig {
                completion_timeout: Duration::from_millis(40),
                ..Default::default()
            },
        )
    }

    #[test]
    fn mode_preserves_control_bits() {
        let mut engine = engine();
        engine.registers_mut().preset(VE_CTRL, 0x0013_0007);

        engine.set_mode(EngineMode::Mpeg);
        assert_eq!(engine.read(VE_CTRL), 0x0013_0000);
        engine.set_mode(EngineMode::Disabled);
        assert_eq!(engine.read(VE_CTRL), 0x0013_0007);

        assert_eq!(engine.registers().writes_to(VE_CTRL), vec![0x0013_0000, 0x0013_0007]);
    }

    #[test]
    fn surface_planes() {
        let engine = engine();
        let surface = Surface::new(VirtAddr(0x1000_2000), 0x1_0000);

        assert_eq!(
            engine.plane_addrs(&surface).unwrap(),
            PlaneAddrs {
                luma: 0x4000_2000,
                chroma: 0x4001_2000
            }
        );

        // Chroma plane past the end of the pool.
        let surface = Surface::new(VirtAddr(0x100f_f000), 0x1000);
        assert!(matches!(
            engine.plane_addrs(&surface),
            Err(TranslationError::OutOfPool(VirtAddr(0x1010_0000)))
        ));
    }

    #[test]
    fn wait_uses_configured_timeout() {
        let mut engine = engine();
        engine.completion_mut().then(WaitStatus::TimedOut);

        assert_eq!(engine.wait_for_completion(1).unwrap(), WaitStatus::TimedOut);
        assert_eq!(engine.completion().waits(), &[(1, Duration::from_millis(40))]);
    }
}
