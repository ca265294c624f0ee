// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::codec::mpeg12::picture::PictureCodingType;
use crate::codec::mpeg12::picture::PictureParameters;
use crate::codec::mpeg12::picture::PictureStructure;
use crate::codec::mpeg12::picture::Profile;
use crate::Resolution;

/// Number of entries in one quantizer matrix.
pub const QUANT_MATRIX_LEN: usize = 64;
/// Number of writes to `VE_MPEG_IQ_MIN_INPUT` needed to load both matrices.
pub const QUANT_TABLE_WRITES: usize = 2 * QUANT_MATRIX_LEN;
/// Index tag of the first intra matrix entry. Non-intra entries are tagged from 0.
pub const INTRA_QUANT_TAG_BASE: u32 = 64;

/// Picture header bits MPEG-1 pictures must carry: frame picture, frame_pred_frame_dct and
/// top_field_first.
pub const MPEG1_PIC_HDR_BITS: u32 = 0x0000_03c0;

/// Field-by-field view of the `VE_MPEG_PIC_HDR` register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PictureHeader {
    pub picture_coding_type: u8,
    pub f_code: [[u8; 2]; 2],
    pub intra_dc_precision: u8,
    pub picture_structure: u8,
    pub top_field_first: bool,
    pub frame_pred_frame_dct: bool,
    pub concealment_motion_vectors: bool,
    pub q_scale_type: bool,
    pub intra_vlc_format: bool,
    pub alternate_scan: bool,
    pub full_pel_forward_vector: bool,
    pub full_pel_backward_vector: bool,
}

impl PictureHeader {
    pub fn new(params: &PictureParameters) -> Self {
        Self {
            picture_coding_type: params.picture_coding_type as u8,
            f_code: params.f_code,
            intra_dc_precision: params.intra_dc_precision,
            picture_structure: params.picture_structure as u8,
            top_field_first: params.top_field_first,
            frame_pred_frame_dct: params.frame_pred_frame_dct,
            concealment_motion_vectors: params.concealment_motion_vectors,
            q_scale_type: params.q_scale_type,
            intra_vlc_format: params.intra_vlc_format,
            alternate_scan: params.alternate_scan,
            full_pel_forward_vector: params.full_pel_forward_vector,
            full_pel_backward_vector: params.full_pel_backward_vector,
        }
    }

    /// Packs the header into its register layout. Each field is truncated to its width.
    pub fn to_word(&self) -> u32 {
        let flag = |value: bool, shift: u32| u32::from(value) << shift;

        ((u32::from(self.picture_coding_type) & 0xf) << 28)
            | ((u32::from(self.f_code[0][0]) & 0xf) << 24)
            | ((u32::from(self.f_code[0][1]) & 0xf) << 20)
            | ((u32::from(self.f_code[1][0]) & 0xf) << 16)
            | ((u32::from(self.f_code[1][1]) & 0xf) << 12)
            | ((u32::from(self.intra_dc_precision) & 0x3) << 10)
            | ((u32::from(self.picture_structure) & 0x3) << 8)
            | flag(self.top_field_first, 7)
            | flag(self.frame_pred_frame_dct, 6)
            | flag(self.concealment_motion_vectors, 5)
            | flag(self.q_scale_type, 4)
            | flag(self.intra_vlc_format, 3)
            | flag(self.alternate_scan, 2)
            | flag(self.full_pel_forward_vector, 1)
            | flag(self.full_pel_backward_vector, 0)
    }

    pub fn from_word(word: u32) -> Self {
        let field = |shift: u32, mask: u32| ((word >> shift) & mask) as u8;
        let flag = |shift: u32| (word >> shift) & 1 != 0;

        Self {
            picture_coding_type: field(28, 0xf),
            f_code: [[field(24, 0xf), field(20, 0xf)], [field(16, 0xf), field(12, 0xf)]],
            intra_dc_precision: field(10, 0x3),
            picture_structure: field(8, 0x3),
            top_field_first: flag(7),
            frame_pred_frame_dct: flag(6),
            concealment_motion_vectors: flag(5),
            q_scale_type: flag(4),
            intra_vlc_format: flag(3),
            alternate_scan: flag(2),
            full_pel_forward_vector: flag(1),
            full_pel_backward_vector: flag(0),
        }
    }

    pub fn coding_type(&self) -> Option<PictureCodingType> {
        PictureCodingType::n(self.picture_coding_type)
    }

    pub fn structure(&self) -> Option<PictureStructure> {
        PictureStructure::n(self.picture_structure)
    }
}

/// Register words programming one MPEG-1/2 picture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CedarMpeg12Controls {
    quant_table: [u32; QUANT_TABLE_WRITES],
    size: u32,
    frame_size: u32,
    picture_header: u32,
}

impl Default for CedarMpeg12Controls {
    fn default() -> Self {
        Self {
            quant_table: [0; QUANT_TABLE_WRITES],
            size: 0,
            frame_size: 0,
            picture_header: 0,
        }
    }
}

impl CedarMpeg12Controls {
    pub fn new() -> Self {
        Default::default()
    }

    /// Fills the quantizer table: the intra matrix first, tagged from [`INTRA_QUANT_TAG_BASE`],
    /// then the non-intra matrix tagged from 0. Each entry is `(tag << 8) | value`.
    pub fn set_quantization_tables(&mut self, params: &PictureParameters) -> &mut Self {
        let (intra, non_intra) = self.quant_table.split_at_mut(QUANT_MATRIX_LEN);

        for (i, (entry, &value)) in intra.iter_mut().zip(&params.intra_quantizer_matrix).enumerate()
        {
            *entry = (INTRA_QUANT_TAG_BASE + i as u32) << 8 | u32::from(value);
        }
        for (i, (entry, &value)) in
            non_intra.iter_mut().zip(&params.non_intra_quantizer_matrix).enumerate()
        {
            *entry = (i as u32) << 8 | u32::from(value);
        }
        self
    }

    /// Sets the macroblock grid and the macroblock-aligned frame size.
    pub fn set_frame_size(&mut self, resolution: Resolution) -> &mut Self {
        let width_mbs = resolution.width_in_mbs();
        let height_mbs = resolution.height_in_mbs();
        let aligned = resolution.aligned_to_mbs();

        self.size = (width_mbs << 8) | height_mbs;
        self.frame_size = (aligned.width << 16) | aligned.height;
        self
    }

    pub fn set_picture_header(
        &mut self,
        params: &PictureParameters,
        profile: Profile,
    ) -> &mut Self {
        let mut word = PictureHeader::new(params).to_word();
        if profile.is_mpeg1() {
            word |= MPEG1_PIC_HDR_BITS;
        }

        self.picture_header = word;
        self
    }

    /// Words to write to `VE_MPEG_IQ_MIN_INPUT`, in order.
    pub fn quant_table(&self) -> &[u32] {
        &self.quant_table
    }

    /// Value of `VE_MPEG_SIZE`.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Value of `VE_MPEG_FRAME_SIZE`.
    pub fn frame_size(&self) -> u32 {
        self.frame_size
    }

    /// Value of `VE_MPEG_PIC_HDR`.
    pub fn picture_header(&self) -> u32 {
        self.picture_header
    }
}

#[cfg(test)]
mod tests {
    use super::CedarMpeg12Controls;
    use super::PictureHeader;
    use super::MPEG1_PIC_HDR_BITS;
    use crate::codec::mpeg12::picture::PictureCodingType;
    use crate::codec::mpeg12::picture::PictureParameters;
    use crate::codec::mpeg12::picture::PictureStructure;
    use crate::codec::mpeg12::picture::Profile;
    use crate::Resolution;

    fn mpeg2_b_field() -> PictureParameters {
        PictureParameters {
            picture_coding_type: PictureCodingType::Bidirectional,
            f_code: [[0x1, 0x2], [0x3, 0x4]],
            intra_dc_precision: 2,
            picture_structure: PictureStructure::BottomField,
            top_field_first: true,
            frame_pred_frame_dct: false,
            concealment_motion_vectors: true,
            q_scale_type: false,
            intra_vlc_format: true,
            alternate_scan: false,
            full_pel_forward_vector: true,
            full_pel_backward_vector: false,
            ..Default::default()
        }
    }

    #[test]
    fn quant_table_tags() {
        let mut params = PictureParameters::default();
        for i in 0..64 {
            params.intra_quantizer_matrix[i] = i as u8;
            params.non_intra_quantizer_matrix[i] = 255 - i as u8;
        }

        let mut controls = CedarMpeg12Controls::new();
        controls.set_quantization_tables(&params);
        let table = controls.quant_table();

        assert_eq!(table.len(), 128);
        for i in 0..64 {
            assert_eq!(table[i] >> 8, 64 + i as u32);
            assert_eq!(table[i] & 0xff, i as u32);
            assert_eq!(table[64 + i] >> 8, i as u32);
            assert_eq!(table[64 + i] & 0xff, 255 - i as u32);
        }
        assert_eq!(table[0], 0x4000);
        assert_eq!(table[127], 0x3fc0);
    }

    #[test]
    fn frame_size() {
        let mut controls = CedarMpeg12Controls::new();
        controls.set_frame_size(Resolution::from((123, 77)));

        assert_eq!(controls.size(), (8 << 8) | 5);
        assert_eq!(controls.frame_size(), (128 << 16) | 80);

        controls.set_frame_size(Resolution::from((720, 480)));
        assert_eq!(controls.size(), 0x2d1e);
        assert_eq!(controls.frame_size(), 0x02d0_01e0);

        // Oversized dimensions wrap instead of overflowing.
        controls.set_frame_size(Resolution::from((u32::MAX, 16)));
        assert_eq!(controls.size(), 1);
        assert_eq!(controls.frame_size(), 16);
    }

    #[test]
    fn picture_header_layout() {
        let mut controls = CedarMpeg12Controls::new();
        controls.set_picture_header(&mpeg2_b_field(), Profile::Mpeg2Main);

        // 3 | 1 2 3 4 | 10 10 | 1 0 1 0 1 0 1 0
        assert_eq!(controls.picture_header(), 0x3123_4aaa);
    }

    #[test]
    fn picture_header_single_fields() {
        let base = PictureParameters {
            picture_coding_type: PictureCodingType::Intra,
            f_code: [[0; 2]; 2],
            picture_structure: PictureStructure::Frame,
            frame_pred_frame_dct: false,
            ..Default::default()
        };
        let word = |params: &PictureParameters| PictureHeader::new(params).to_word();
        let base_word = word(&base);
        assert_eq!(base_word, 0x1000_0300);

        let cases: [(fn(&mut PictureParameters), u32); 12] = [
            (|p| p.f_code[0][0] = 0xf, 0xf << 24),
            (|p| p.f_code[0][1] = 0xf, 0xf << 20),
            (|p| p.f_code[1][0] = 0xf, 0xf << 16),
            (|p| p.f_code[1][1] = 0xf, 0xf << 12),
            (|p| p.intra_dc_precision = 3, 0x3 << 10),
            (|p| p.top_field_first = true, 1 << 7),
            (|p| p.frame_pred_frame_dct = true, 1 << 6),
            (|p| p.concealment_motion_vectors = true, 1 << 5),
            (|p| p.q_scale_type = true, 1 << 4),
            (|p| p.intra_vlc_format = true, 1 << 3),
            (|p| p.alternate_scan = true, 1 << 2),
            (|p| p.full_pel_forward_vector = true, 1 << 1),
        ];
        for (set, bits) in cases {
            let mut params = base.clone();
            set(&mut params);
            assert_eq!(word(&params), base_word | bits);
        }

        let params = PictureParameters {
            full_pel_backward_vector: true,
            ..base.clone()
        };
        assert_eq!(word(&params), base_word | 1);
    }

    #[test]
    fn picture_header_truncates_fields() {
        let header = PictureHeader {
            picture_coding_type: 0x12,
            f_code: [[0x1f, 0], [0, 0]],
            intra_dc_precision: 0x7,
            ..Default::default()
        };

        assert_eq!(header.to_word(), 0x2f00_0c00);
    }

    #[test]
    fn mpeg1_fixed_bits() {
        let params = PictureParameters {
            picture_coding_type: PictureCodingType::Predictive,
            f_code: [[0x2, 0x2], [0xf, 0xf]],
            picture_structure: PictureStructure::Frame,
            frame_pred_frame_dct: false,
            ..Default::default()
        };

        let mut controls = CedarMpeg12Controls::new();
        controls.set_picture_header(&params, Profile::Mpeg1);
        assert_eq!(controls.picture_header(), 0x222f_f3c0);
        assert_eq!(controls.picture_header() & MPEG1_PIC_HDR_BITS, MPEG1_PIC_HDR_BITS);

        controls.set_picture_header(&params, Profile::Mpeg2Simple);
        assert_eq!(controls.picture_header(), 0x222f_f300);
    }

    #[test]
    fn picture_header_from_word() {
        let params = mpeg2_b_field();
        let header = PictureHeader::from_word(PictureHeader::new(&params).to_word());

        assert_eq!(header, PictureHeader::new(&params));
        assert_eq!(header.coding_type(), Some(PictureCodingType::Bidirectional));
        assert_eq!(header.structure(), Some(PictureStructure::BottomField));
        assert_eq!(header.f_code, params.f_code);
        assert_eq!(header.intra_dc_precision, 2);
        assert!(header.top_field_first);
        assert!(!header.frame_pred_frame_dct);
        assert!(header.concealment_motion_vectors);
        assert!(!header.q_scale_type);
        assert!(header.intra_vlc_format);
        assert!(!header.alternate_scan);
        assert!(header.full_pel_forward_vector);
        assert!(!header.full_pel_backward_vector);

        let header = PictureHeader::from_word(0);
        assert_eq!(header.coding_type(), None);
        assert_eq!(header.structure(), None);
    }
}
