// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! ve-trace, prints the VE register sequence cedar-codecs produces for a coded MPEG-1/2 picture.
//!
//! The picture is decoded against a software register space, so no hardware is needed. Buffers
//! live in a simulated engine memory pool whose physical base can be chosen on the command line.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use anyhow::Context;
use argh::FromArgs;

use cedar_codecs::codec::mpeg12::parser::find_start_code;
use cedar_codecs::codec::mpeg12::picture::PictureCodingType;
use cedar_codecs::codec::mpeg12::picture::PictureParameters;
use cedar_codecs::codec::mpeg12::picture::Profile;
use cedar_codecs::decoder::mpeg12::Mpeg12Decoder;
use cedar_codecs::decoder::BitstreamBuffer;
use cedar_codecs::device::cedar::controls::mpeg12::PictureHeader;
use cedar_codecs::device::cedar::memory::LinearTranslator;
use cedar_codecs::device::cedar::regs::VE_MPEG_PIC_HDR;
use cedar_codecs::device::cedar::regs::VE_MPEG_TRIGGER;
use cedar_codecs::device::cedar::trace::RegisterTrace;
use cedar_codecs::device::cedar::trace::ScriptedCompletion;
use cedar_codecs::device::cedar::Engine;
use cedar_codecs::device::cedar::EngineConfig;
use cedar_codecs::device::cedar::VBV_SIZE;
use cedar_codecs::surface::Surface;
use cedar_codecs::surface::SurfaceHandle;
use cedar_codecs::surface::VirtAddr;
use cedar_codecs::Resolution;

const FORWARD: SurfaceHandle = SurfaceHandle(1);
const BACKWARD: SurfaceHandle = SurfaceHandle(2);

fn parse_hex(value: &str) -> Result<u32, String> {
    let digits = value.trim_start_matches("0x");
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid address {}: {}", value, e))
}

/// Print the VE register writes needed to decode one MPEG-1/2 picture
#[derive(Debug, FromArgs)]
struct Args {
    /// coded picture, as handed to the decoder (picture header up to the last slice)
    #[argh(positional)]
    input: PathBuf,

    /// stream profile (mpeg1, mpeg2-simple or mpeg2-main). Default: mpeg1
    #[argh(option, default = "Profile::Mpeg1")]
    profile: Profile,

    /// picture coding type (I, P, B or D). Default: I
    #[argh(option, default = "PictureCodingType::Intra")]
    coding_type: PictureCodingType,

    /// picture width in pixels
    #[argh(option)]
    width: u32,

    /// picture height in pixels
    #[argh(option)]
    height: u32,

    /// whether the picture uses a forward reference
    #[argh(switch)]
    forward: bool,

    /// whether the picture uses a backward reference
    #[argh(switch)]
    backward: bool,

    /// physical base address of the simulated memory pool, in hex. Default: 0x40000000
    #[argh(option, default = "0x4000_0000", from_str_fn(parse_hex))]
    phys_base: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Args = argh::from_env();

    let input = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    if input.len() > VBV_SIZE {
        bail!("{} does not fit in the {} bytes bitstream buffer", args.input.display(), VBV_SIZE);
    }

    let resolution = Resolution::from((args.width, args.height));
    let plane_size = {
        let aligned = resolution.aligned_to_mbs();
        (aligned.width * aligned.height) as usize
    };
    let frame_size = plane_size * 3 / 2;

    // Bitstream buffer, then output, forward and backward surfaces.
    let mut pool = vec![0u8; VBV_SIZE + 3 * frame_size];
    pool[..input.len()].copy_from_slice(&input);
    let pool_addr = VirtAddr::from(pool.as_ptr());

    let surface_at =
        |index: usize| Surface::new(pool_addr.offset(VBV_SIZE + index * frame_size), plane_size);
    let output = surface_at(0);
    let surfaces = HashMap::from([(FORWARD, surface_at(1)), (BACKWARD, surface_at(2))]);

    let mut engine = Engine::new(
        RegisterTrace::new(),
        ScriptedCompletion::new(),
        LinearTranslator::new(pool_addr, args.phys_base, pool.len()),
        EngineConfig {
            completion_timeout: Duration::from_secs(1),
            vbv_size: VBV_SIZE,
        },
    );

    let params = PictureParameters {
        picture_coding_type: args.coding_type,
        forward_reference: args.forward.then_some(FORWARD),
        backward_reference: args.backward.then_some(BACKWARD),
        ..Default::default()
    };

    match find_start_code(&input) {
        Ok(offset) => println!("first slice at offset {}", offset),
        Err(e) => println!("{}, decoding from offset 0", e),
    }

    let decoder = Mpeg12Decoder::new(args.profile, resolution);
    decoder.decode_picture(
        &mut engine,
        &surfaces,
        &BitstreamBuffer::new(&pool[..input.len()], pool_addr),
        &params,
        &output,
    )?;

    for write in engine.registers().writes() {
        match write.offset {
            VE_MPEG_PIC_HDR => println!("{}  {:?}", write, PictureHeader::from_word(write.value)),
            VE_MPEG_TRIGGER => println!("{}\n(wait for completion)", write),
            _ => println!("{}", write),
        }
    }

    Ok(())
}
