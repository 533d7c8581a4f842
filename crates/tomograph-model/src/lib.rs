// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Tomograph-Model: problem and solution types for binary tomography
//!
//! A binary tomography instance prescribes how many ones each row and each
//! column of an unknown 0/1 matrix must contain. This crate holds the
//! immutable `ProblemInstance`, the `Solution` grid produced by the search,
//! and the adapters that build instances from text or from grayscale pixel
//! buffers.
//!
//! Module map
//! - `index`: typed row and column indices.
//! - `instance`: validated row/column targets.
//! - `solution`: reconstructed grids and their text rendering.
//! - `loading`: two-line whitespace-separated text format.
//! - `projection`: thresholding of grayscale buffers into instances.

pub mod index;
pub mod instance;
pub mod loading;
pub mod projection;
pub mod solution;
