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

use weierstrass_errors::curves::FieldError;

pub mod field;
pub use field::*;

pub mod precompute;
pub use precompute::*;

/// Inverts every nonzero element of `v` in place, using Montgomery's trick to
/// trade all but one of the inversions for multiplications. Zero elements are
/// left untouched.
pub fn batch_inversion<F: FieldElement>(v: &mut [F]) -> Result<(), FieldError> {
    // Montgomery's Trick and Fast Implementation of Masked AES
    // Genelle, Prouff and Quisquater
    // Section 3.2
    let one = match v.first() {
        Some(f) => f.one(),
        None => return Ok(()),
    };

    // First pass: compute [a, ab, abc, ...]
    let mut prod = Vec::with_capacity(v.len());
    let mut tmp = one.clone();
    for f in v.iter().filter(|f| !f.is_zero()) {
        tmp = tmp.mul(f);
        prod.push(tmp.clone());
    }

    // Invert `tmp`. The product of nonzero elements is nonzero.
    tmp = tmp.invert()?;

    // Second pass: iterate backwards to compute inverses
    for (f, s) in v
        .iter_mut()
        // Backwards
        .rev()
        // Ignore zero elements
        .filter(|f| !f.is_zero())
        // Backwards, skip last element, fill in one for last term.
        .zip(prod.into_iter().rev().skip(1).chain(Some(one)))
    {
        // tmp := tmp * f; f := tmp * s = 1/f
        let new_tmp = tmp.mul(f);
        *f = tmp.mul(&s);
        tmp = new_tmp;
    }

    Ok(())
}
