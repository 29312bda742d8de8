// Copyright (c) 2024, The QuicFuscate Project Authors.
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are
// met:
//
//     * Redistributions of source code must retain the above copyright
//       notice, this list of conditions and the following disclaimer.
//
//     * Redistributions in binary form must reproduce the above
//       copyright notice, this list of conditions and the following disclaimer
//       in the documentation and/or other materials provided with the
//       distribution.
//
//     * Neither the name of the copyright holder nor the names of its
//       contributors may be used to endorse or promote products derived from
//       this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS
// "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT
// LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR
// A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT
// OWNER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
// SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT
// LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE,
// DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY
// THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT
// (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! # Windowed GF(256) FEC module
//!
//! Forward error correction over a sliding window of short-header packet
//! payloads. A sender accumulates recent payloads and periodically emits
//! repair packets carrying a random linear combination of the window
//! (`encoder`), generated from a TinyMT32-seeded coefficient stream
//! (`tinymt32`, `coeffs`) over GF(2^8) arithmetic (`gf256`, `linear`). A
//! receiver buffers whatever source and repair symbols arrive (`symbol`,
//! `recoverer`) and recovers missing payloads by Gaussian elimination
//! (`solver`) once it holds enough independent repair rows.

pub mod coeffs;
pub mod encoder;
pub mod gf256;
pub mod linear;
pub mod recoverer;
pub mod solver;
pub mod symbol;
pub mod tinymt32;

pub use coeffs::{gen_coeffs, FEC_MAX_DENSITY};
pub use encoder::{FecEncoder, RepairPacketSink};
pub use recoverer::FecRecoverer;
pub use solver::SolveError;
pub use symbol::{RepairSymbol, Slot, SourceSymbol};
pub use tinymt32::TinyMt32;
