// Copyright (C) 2019-2020 Aleo Systems Inc.
// This file is part of the weierstrass library.

// The weierstrass library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The weierstrass library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the weierstrass library. If not, see <https://www.gnu.org/licenses/>.

#![deny(unused_import_braces, trivial_casts, trivial_numeric_casts)]
#![deny(variant_size_differences, stable_features)]
#![deny(non_shorthand_field_patterns, unused_attributes, unused_extern_crates)]
#![deny(
    renamed_and_removed_lints,
    unused_allocation,
    unused_comparisons,
    bare_trait_objects
)]
#![deny(unused_must_use, unused_mut, unused_unsafe)]
#![forbid(unsafe_code)]

pub mod curve;
pub use curve::*;

pub mod f2m;

pub mod fp;

pub mod multiplier;
pub use multiplier::*;

pub mod point;
pub use point::*;
