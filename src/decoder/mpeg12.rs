// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! MPEG-1/2 picture decoding.
//!
//! A picture is decoded in a single blocking transaction:
//!
//! 1. select the MPEG engine,
//! 2. load the quantizer matrices, frame size and picture header,
//! 3. point the engine at the reference, output and bitstream buffers,
//! 4. trigger, then wait for the completion interrupt,
//! 5. acknowledge the interrupt and deselect the engine.
//!
//! Everything that can fail before the hardware is touched (reference lookup, address
//! translation) is resolved first, so a failed decode either never programs the engine or leaves
//! it idle.

use log::debug;

use crate::codec::mpeg12::parser;
use crate::codec::mpeg12::picture::PictureParameters;
use crate::codec::mpeg12::picture::Profile;
use crate::decoder::BitstreamBuffer;
use crate::decoder::DecodeError;
use crate::device::cedar::completion::CompletionWait;
use crate::device::cedar::completion::WaitStatus;
use crate::device::cedar::controls::mpeg12::CedarMpeg12Controls;
use crate::device::cedar::memory::AddressTranslator;
use crate::device::cedar::regs::*;
use crate::device::cedar::Engine;
use crate::device::cedar::EngineMode;
use crate::device::cedar::MAX_VBV_SIZE;
use crate::device::cedar::PlaneAddrs;
use crate::device::cedar::RegisterSpace;
use crate::surface::Surface;
use crate::surface::SurfaceHandle;
use crate::surface::SurfaceLookup;
use crate::Resolution;

/// Value of `VE_MPEG_VLD_ADDR` for a bitstream buffer at physical address `addr`.
fn vld_addr(addr: u32) -> u32 {
    (addr & 0x0fff_fff0) | (addr >> 28) | VE_MPEG_VLD_ADDR_VALID
}

/// Value of `VE_MPEG_TRIGGER` starting a picture decode for `profile`.
fn trigger(profile: Profile) -> u32 {
    let mode = if profile.is_mpeg1() {
        VE_MPEG_TRIGGER_MODE_MPEG1
    } else {
        VE_MPEG_TRIGGER_MODE_MPEG2
    };

    (mode << VE_MPEG_TRIGGER_MODE_SHIFT) | VE_MPEG_TRIGGER_START
}

/// Decoding context of an MPEG-1/2 stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mpeg12Decoder {
    profile: Profile,
    resolution: Resolution,
}

impl Mpeg12Decoder {
    pub fn new(profile: Profile, resolution: Resolution) -> Self {
        Self {
            profile,
            resolution,
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn resolve_reference<R, W, T, S>(
        engine: &Engine<R, W, T>,
        surfaces: &S,
        reference: Option<SurfaceHandle>,
    ) -> Result<Option<PlaneAddrs>, DecodeError>
    where
        R: RegisterSpace,
        W: CompletionWait,
        T: AddressTranslator,
        S: SurfaceLookup + ?Sized,
    {
        let Some(handle) = reference else {
            return Ok(None);
        };

        let surface = surfaces
            .surface(handle)
            .ok_or(DecodeError::InvalidReference(handle))?;

        Ok(Some(engine.plane_addrs(&surface)?))
    }

    /// Decodes the picture in `bitstream` into `output`.
    ///
    /// References named by `params` are looked up in `surfaces`. Returns once the engine has
    /// finished writing `output`.
    pub fn decode_picture<R, W, T, S>(
        &self,
        engine: &mut Engine<R, W, T>,
        surfaces: &S,
        bitstream: &BitstreamBuffer,
        params: &PictureParameters,
        output: &Surface,
    ) -> Result<(), DecodeError>
    where
        R: RegisterSpace,
        W: CompletionWait,
        T: AddressTranslator,
        S: SurfaceLookup + ?Sized,
    {
        let capacity = engine.config().vbv_size;
        if capacity > MAX_VBV_SIZE {
            return Err(DecodeError::UnsupportedBufferSize(capacity));
        }
        if bitstream.len() > capacity {
            return Err(DecodeError::BitstreamTooLarge {
                len: bitstream.len(),
                capacity,
            });
        }

        let start_offset = parser::payload_offset(bitstream.data());

        let forward = Self::resolve_reference(engine, surfaces, params.forward_reference)?;
        let backward = Self::resolve_reference(engine, surfaces, params.backward_reference)?;
        let output = engine.plane_addrs(output)?;
        let input_addr = engine.phys_addr(bitstream.addr())?;

        let mut controls = CedarMpeg12Controls::new();
        controls
            .set_quantization_tables(params)
            .set_frame_size(self.resolution)
            .set_picture_header(params, self.profile);

        debug!(
            "Decoding {:?} picture ({:?}): {} bytes, payload at offset {}",
            params.picture_coding_type,
            self.profile,
            bitstream.len(),
            start_offset
        );

        engine.set_mode(EngineMode::Mpeg);

        for &entry in controls.quant_table() {
            engine.write(VE_MPEG_IQ_MIN_INPUT, entry);
        }

        engine.write(VE_MPEG_SIZE, controls.size());
        engine.write(VE_MPEG_FRAME_SIZE, controls.frame_size());
        engine.write(VE_MPEG_PIC_HDR, controls.picture_header());
        engine.write(VE_MPEG_CTRL, VE_MPEG_CTRL_PRIMING);

        if let Some(forward) = forward {
            engine.write(VE_MPEG_FWD_LUMA, forward.luma);
            engine.write(VE_MPEG_FWD_CHROMA, forward.chroma);
        }
        if let Some(backward) = backward {
            engine.write(VE_MPEG_BACK_LUMA, backward.luma);
            engine.write(VE_MPEG_BACK_CHROMA, backward.chroma);
        }

        // The output is both the reconstruction and the display (rotation) target.
        engine.write(VE_MPEG_REC_LUMA, output.luma);
        engine.write(VE_MPEG_REC_CHROMA, output.chroma);
        engine.write(VE_MPEG_ROT_LUMA, output.luma);
        engine.write(VE_MPEG_ROT_CHROMA, output.chroma);

        // Bitstream window, in bits.
        engine.write(VE_MPEG_VLD_OFFSET, (start_offset * 8) as u32);
        engine.write(VE_MPEG_VLD_LEN, ((bitstream.len() - start_offset) * 8) as u32);
        let vld_end = input_addr.wrapping_add((capacity as u32).saturating_sub(1));
        engine.write(VE_MPEG_VLD_END, vld_end);
        engine.write(VE_MPEG_VLD_ADDR, vld_addr(input_addr));

        // A stale completion would end the wait early, so never trigger without dropping them.
        let status = match engine.discard_completions() {
            Ok(()) => {
                engine.write(VE_MPEG_TRIGGER, trigger(self.profile));
                engine.wait_for_completion(1)
            }
            Err(e) => Err(e.context("failed to drop stale completions")),
        };

        engine.write(VE_MPEG_STATUS, VE_MPEG_STATUS_CLEAR);
        engine.set_mode(EngineMode::Disabled);

        match status {
            Ok(WaitStatus::Completed) => {
                debug!("Picture decoded");
                Ok(())
            }
            Ok(WaitStatus::TimedOut) => {
                let timeout = engine.config().completion_timeout;
                log::warn!("Engine did not complete the picture within {:?}", timeout);
                Err(DecodeError::HardwareTimeout(timeout))
            }
            Err(e) => {
                log::error!("Waiting for the engine failed: {:#}", e);
                Err(DecodeError::Wait(e))
            }
        }
    }
}
