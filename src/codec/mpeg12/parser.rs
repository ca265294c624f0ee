// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Start code scanning for MPEG-1/2 coded pictures.
//!
//! The VE parses slices and macroblocks by itself, so the only thing software needs to know about
//! a coded picture is where the first slice begins. Everything before it (sequence header, GOP,
//! extensions, the picture header itself) has already been consumed by the client and must be
//! skipped when programming the bitstream window.

use thiserror::Error;

/// First marker byte of the slice start code range.
pub const SLICE_START_CODE_MIN: u8 = 0x01;
/// Last marker byte of the slice start code range.
pub const SLICE_START_CODE_MAX: u8 = 0xaf;

/// Length of a start code (prefix plus marker), in bytes.
const START_CODE_LEN: usize = 4;

/// Meaning of the marker byte following a `00 00 01` prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartCode {
    Picture,
    /// Slice start code, carrying the slice vertical position.
    Slice(u8),
    UserData,
    SequenceHeader,
    SequenceError,
    Extension,
    SequenceEnd,
    GroupOfPictures,
    Reserved(u8),
    /// Codes used by the system layer (packs, PES streams).
    System(u8),
}

impl StartCode {
    /// Whether the decodable payload of a picture starts at this code.
    pub fn starts_payload(&self) -> bool {
        matches!(self, StartCode::Slice(_))
    }
}

impl From<u8> for StartCode {
    fn from(marker: u8) -> Self {
        match marker {
            0x00 => StartCode::Picture,
            SLICE_START_CODE_MIN..=SLICE_START_CODE_MAX => StartCode::Slice(marker),
            0xb2 => StartCode::UserData,
            0xb3 => StartCode::SequenceHeader,
            0xb4 => StartCode::SequenceError,
            0xb5 => StartCode::Extension,
            0xb7 => StartCode::SequenceEnd,
            0xb8 => StartCode::GroupOfPictures,
            0xb0 | 0xb1 | 0xb6 => StartCode::Reserved(marker),
            _ => StartCode::System(marker),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("no slice start code found in the coded picture")]
    NoStartCode,
}

/// Returns the offset of the first slice start code in `data`.
///
/// A start code is two or more zero bytes, a single `0x01` and a marker byte. The returned offset
/// points to the first byte of the 4-byte code, so any additional leading zeros are left before
/// it. Start codes whose marker is not a slice are skipped.
pub fn find_start_code(data: &[u8]) -> Result<usize, ScanError> {
    let mut pos = 0;

    while pos < data.len() {
        let mut zeros = 0usize;
        let mut found_prefix = false;

        while pos < data.len() {
            let byte = data[pos];
            pos += 1;

            match byte {
                0x00 => zeros += 1,
                0x01 if zeros >= 2 => {
                    found_prefix = true;
                    break;
                }
                _ => zeros = 0,
            }
        }

        if !found_prefix {
            break;
        }

        // The prefix may be the last thing in the buffer.
        let Some(&marker) = data.get(pos) else {
            break;
        };
        pos += 1;

        let code = StartCode::from(marker);
        if code.starts_payload() {
            return Ok(pos - START_CODE_LEN);
        }

        log::trace!("Skipping {:?} start code at offset {}", code, pos - START_CODE_LEN);
    }

    Err(ScanError::NoStartCode)
}

/// Returns the offset at which the decodable payload of `data` begins.
///
/// When no slice start code can be found the whole buffer is handed to the engine, i.e. the
/// payload begins at offset 0.
pub fn payload_offset(data: &[u8]) -> usize {
    match find_start_code(data) {
        Ok(offset) => offset,
        Err(err) => {
            log::warn!("{}, decoding from offset 0", err);
            0
        }
    }
}
