// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Builders for the register words the engine is programmed with.

pub mod mpeg12;
