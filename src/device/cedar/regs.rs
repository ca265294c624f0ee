// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Cedar VE register map.
//!
//! Offsets are relative to the base of the VE control block.

/// Physical address of the VE control block on sun4i/sun5i/sun7i SoCs.
pub const VE_BASE: u32 = 0x01c0_e000;
/// Size of the VE control block mapping.
pub const VE_REGS_SIZE: usize = 0x800;

pub const VE_CTRL: u32 = 0x000;
pub const VE_VERSION: u32 = 0x0f0;

pub const VE_MPEG_PIC_HDR: u32 = 0x100;
pub const VE_MPEG_SIZE: u32 = 0x108;
pub const VE_MPEG_FRAME_SIZE: u32 = 0x10c;
pub const VE_MPEG_CTRL: u32 = 0x114;
pub const VE_MPEG_TRIGGER: u32 = 0x118;
pub const VE_MPEG_STATUS: u32 = 0x11c;
pub const VE_MPEG_VLD_ADDR: u32 = 0x128;
pub const VE_MPEG_VLD_OFFSET: u32 = 0x12c;
pub const VE_MPEG_VLD_LEN: u32 = 0x130;
pub const VE_MPEG_VLD_END: u32 = 0x134;
pub const VE_MPEG_REC_LUMA: u32 = 0x148;
pub const VE_MPEG_REC_CHROMA: u32 = 0x14c;
pub const VE_MPEG_FWD_LUMA: u32 = 0x150;
pub const VE_MPEG_FWD_CHROMA: u32 = 0x154;
pub const VE_MPEG_BACK_LUMA: u32 = 0x158;
pub const VE_MPEG_BACK_CHROMA: u32 = 0x15c;
pub const VE_MPEG_IQ_MIN_INPUT: u32 = 0x180;
pub const VE_MPEG_ROT_LUMA: u32 = 0x1cc;
pub const VE_MPEG_ROT_CHROMA: u32 = 0x1d0;

/// Codec mode selection bits of `VE_CTRL`.
pub const VE_CTRL_MODE_MASK: u32 = 0xf;

/// Written to `VE_MPEG_CTRL` before programming the buffers. Meaning unknown, required by the
/// hardware.
pub const VE_MPEG_CTRL_PRIMING: u32 = 0x8000_01b8;

/// Start bits of `VE_MPEG_TRIGGER`.
pub const VE_MPEG_TRIGGER_START: u32 = 0x8000_000f;
/// Decode sub-mode field of `VE_MPEG_TRIGGER`.
pub const VE_MPEG_TRIGGER_MODE_SHIFT: u32 = 24;
pub const VE_MPEG_TRIGGER_MODE_MPEG1: u32 = 1;
pub const VE_MPEG_TRIGGER_MODE_MPEG2: u32 = 2;

/// Acknowledges every completion and error interrupt in `VE_MPEG_STATUS`.
pub const VE_MPEG_STATUS_CLEAR: u32 = 0x0000_c00f;

/// Addressing mode bits OR'd into `VE_MPEG_VLD_ADDR`.
pub const VE_MPEG_VLD_ADDR_VALID: u32 = 0x7 << 28;

/// Returns a human readable name for register `offset`, if it is one this crate programs.
pub fn name(offset: u32) -> Option<&'static str> {
    let name = match offset {
        VE_CTRL => "VE_CTRL",
        VE_VERSION => "VE_VERSION",
        VE_MPEG_PIC_HDR => "VE_MPEG_PIC_HDR",
        VE_MPEG_SIZE => "VE_MPEG_SIZE",
        VE_MPEG_FRAME_SIZE => "VE_MPEG_FRAME_SIZE",
        VE_MPEG_CTRL => "VE_MPEG_CTRL",
        VE_MPEG_TRIGGER => "VE_MPEG_TRIGGER",
        VE_MPEG_STATUS => "VE_MPEG_STATUS",
        VE_MPEG_VLD_ADDR => "VE_MPEG_VLD_ADDR",
        VE_MPEG_VLD_OFFSET => "VE_MPEG_VLD_OFFSET",
        VE_MPEG_VLD_LEN => "VE_MPEG_VLD_LEN",
        VE_MPEG_VLD_END => "VE_MPEG_VLD_END",
        VE_MPEG_REC_LUMA => "VE_MPEG_REC_LUMA",
        VE_MPEG_REC_CHROMA => "VE_MPEG_REC_CHROMA",
        VE_MPEG_FWD_LUMA => "VE_MPEG_FWD_LUMA",
        VE_MPEG_FWD_CHROMA => "VE_MPEG_FWD_CHROMA",
        VE_MPEG_BACK_LUMA => "VE_MPEG_BACK_LUMA",
        VE_MPEG_BACK_CHROMA => "VE_MPEG_BACK_CHROMA",
        VE_MPEG_IQ_MIN_INPUT => "VE_MPEG_IQ_MIN_INPUT",
        VE_MPEG_ROT_LUMA => "VE_MPEG_ROT_LUMA",
        VE_MPEG_ROT_CHROMA => "VE_MPEG_ROT_CHROMA",
        _ => return None,
    };

    Some(name)
}
