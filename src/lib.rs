// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! MPEG-1/2 picture decoding on the Allwinner Cedar video engine (VE).
//!
//! The VE is a fixed-function decoder driven entirely through memory-mapped registers. This crate
//! turns a coded picture and its parameters into the register sequence that configures, triggers
//! and waits for the engine:
//!
//! * [`codec::mpeg12`] holds the bitstream-side types and the start code scanner,
//! * [`device::cedar`] holds the register map, the register word encoders and the engine handle,
//! * [`decoder::mpeg12`] sequences one decode transaction.

pub mod codec;
pub mod decoder;
pub mod device;
pub mod surface;

/// Size of a macroblock side, in pixels.
pub const MB_SIZE: u32 = 16;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Number of macroblock columns needed to cover `width`.
    pub fn width_in_mbs(&self) -> u32 {
        self.width.div_ceil(MB_SIZE)
    }

    /// Number of macroblock rows needed to cover `height`.
    pub fn height_in_mbs(&self) -> u32 {
        self.height.div_ceil(MB_SIZE)
    }

    /// Returns this resolution rounded up to the macroblock grid. Dimensions that round up past
    /// `u32::MAX` wrap around.
    pub fn aligned_to_mbs(&self) -> Resolution {
        Resolution {
            width: self.width_in_mbs().wrapping_mul(MB_SIZE),
            height: self.height_in_mbs().wrapping_mul(MB_SIZE),
        }
    }
}

impl From<(u32, u32)> for Resolution {
    fn from(value: (u32, u32)) -> Self {
        Self {
            width: value.0,
            height: value.1,
        }
    }
}
