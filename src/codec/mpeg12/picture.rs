// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::str::FromStr;

use enumn::N;

use crate::surface::SurfaceHandle;

/// Default intra quantizer matrix, in zigzag scan order.
pub const DEFAULT_INTRA_QUANT_MATRIX: [u8; 64] = [
    8, 16, 16, 19, 16, 19, 22, 22, 22, 22, 22, 22, 26, 24, 26, 27, 27, 27, 26, 26, 26, 26, 27, 27,
    27, 29, 29, 29, 34, 34, 34, 29, 29, 29, 27, 27, 29, 29, 32, 32, 34, 34, 37, 38, 37, 35, 35, 34,
    35, 38, 38, 40, 40, 40, 48, 48, 46, 46, 56, 56, 58, 69, 69, 83,
];

/// Default non-intra quantizer matrix.
pub const DEFAULT_NON_INTRA_QUANT_MATRIX: [u8; 64] = [16; 64];

/// f_code value signalling an unused motion vector direction.
pub const F_CODE_UNUSED: u8 = 0xf;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Profile {
    #[default]
    Mpeg1,
    Mpeg2Simple,
    Mpeg2Main,
}

impl Profile {
    pub fn is_mpeg1(&self) -> bool {
        matches!(self, Profile::Mpeg1)
    }
}

impl FromStr for Profile {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mpeg1" | "MPEG1" => Ok(Profile::Mpeg1),
            "mpeg2-simple" | "MPEG2_SIMPLE" => Ok(Profile::Mpeg2Simple),
            "mpeg2" | "mpeg2-main" | "MPEG2_MAIN" => Ok(Profile::Mpeg2Main),
            _ => Err("unrecognized profile. Valid values: mpeg1, mpeg2-simple, mpeg2-main"),
        }
    }
}

#[derive(N, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum PictureCodingType {
    #[default]
    Intra = 1,
    Predictive = 2,
    Bidirectional = 3,
    /// MPEG-1 only.
    DcIntra = 4,
}

impl FromStr for PictureCodingType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "i" | "I" => Ok(PictureCodingType::Intra),
            "p" | "P" => Ok(PictureCodingType::Predictive),
            "b" | "B" => Ok(PictureCodingType::Bidirectional),
            "d" | "D" => Ok(PictureCodingType::DcIntra),
            _ => Err("unrecognized picture coding type. Valid values: I, P, B, D"),
        }
    }
}

#[derive(N, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum PictureStructure {
    TopField = 1,
    BottomField = 2,
    #[default]
    Frame = 3,
}

/// Everything the engine needs to know about a picture besides its bitstream.
///
/// Field names follow the picture header and picture coding extension syntax elements. MPEG-1
/// pictures only use `picture_coding_type`, `f_code`, the full-pel flags and the matrices, the
/// other fields are ignored for them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PictureParameters {
    pub picture_coding_type: PictureCodingType,
    /// `f_code[s][t]`: `s` is the direction (0 forward, 1 backward), `t` the component (0
    /// horizontal, 1 vertical).
    pub f_code: [[u8; 2]; 2],
    pub intra_dc_precision: u8,
    pub picture_structure: PictureStructure,
    pub top_field_first: bool,
    pub frame_pred_frame_dct: bool,
    pub concealment_motion_vectors: bool,
    pub q_scale_type: bool,
    pub intra_vlc_format: bool,
    pub alternate_scan: bool,
    pub full_pel_forward_vector: bool,
    pub full_pel_backward_vector: bool,
    pub intra_quantizer_matrix: [u8; 64],
    pub non_intra_quantizer_matrix: [u8; 64],
    /// Previously decoded picture used for forward prediction, if any.
    pub forward_reference: Option<SurfaceHandle>,
    /// Previously decoded picture used for backward prediction, if any.
    pub backward_reference: Option<SurfaceHandle>,
}

impl Default for PictureParameters {
    fn default() -> Self {
        Self {
            picture_coding_type: Default::default(),
            f_code: [[F_CODE_UNUSED; 2]; 2],
            intra_dc_precision: 0,
            picture_structure: Default::default(),
            top_field_first: false,
            frame_pred_frame_dct: true,
            concealment_motion_vectors: false,
            q_scale_type: false,
            intra_vlc_format: false,
            alternate_scan: false,
            full_pel_forward_vector: false,
            full_pel_backward_vector: false,
            intra_quantizer_matrix: DEFAULT_INTRA_QUANT_MATRIX,
            non_intra_quantizer_matrix: DEFAULT_NON_INTRA_QUANT_MATRIX,
            forward_reference: None,
            backward_reference: None,
        }
    }
}
