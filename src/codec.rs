// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Bitstream-side types for the codecs supported by this crate.
//!
//! Nothing in here touches the hardware: the types describe what a client hands to a decoder and
//! the helpers only ever look at bytes in memory.

pub mod mpeg12;
