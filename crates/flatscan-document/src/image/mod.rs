// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — input decoding and output encoding.

pub mod processor;

pub use processor::{decode_image, encode_jpeg, encode_png};
