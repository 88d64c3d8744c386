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
use weierstrass_models::curves::FieldElement;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::Arc,
};

/// A binary field `GF(2^m)` in polynomial basis.
///
/// The reduction polynomial is `x^m + x^k3 + x^k2 + x^k1 + 1` for the middle
/// exponents in `ks` (descending); a trinomial has a single middle exponent.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct F2mField {
    m: u32,
    ks: Vec<u32>,
    poly: BigUint,
}

impl F2mField {
    pub fn new(m: u32, ks: &[u32]) -> Result<Self, FieldError> {
        if m == 0 {
            return Err(FieldError::Message("the extension degree must be positive".into()));
        }
        if ks.is_empty() || (ks.len() != 1 && ks.len() != 3) {
            return Err(FieldError::Message(
                "the reduction polynomial must be a trinomial or a pentanomial".into(),
            ));
        }
        let mut poly = (BigUint::one() << m) | BigUint::one();
        let mut previous = m;
        for &k in ks {
            if k == 0 || k >= previous {
                return Err(FieldError::Message(
                    "reduction exponents must be descending and inside (0, m)".into(),
                ));
            }
            previous = k;
            poly |= BigUint::one() << k;
        }
        Ok(Self { m, ks: ks.to_vec(), poly })
    }

    pub fn m(&self) -> u32 {
        self.m
    }

    pub fn ks(&self) -> &[u32] {
        &self.ks
    }

    pub fn size_in_bits(&self) -> u64 {
        u64::from(self.m)
    }

    /// Constructs the element with the given polynomial bits.
    pub fn element(self: &Arc<Self>, value: BigUint) -> Result<F2mElement, FieldError> {
        if value.bits() > u64::from(self.m) {
            return Err(FieldError::NotInField(format!("{:x}", value)));
        }
        Ok(F2mElement {
            field: self.clone(),
            value,
        })
    }

    /// Reduces an at-most-degree-`2m` polynomial modulo the field polynomial.
    fn reduce(&self, mut value: BigUint) -> BigUint {
        let m = u64::from(self.m);
        while value.bits() > m {
            let shift = value.bits() - 1 - m;
            value ^= &self.poly << shift;
        }
        value
    }
}

/// An element of a binary field, held as the bits of its polynomial
/// representative of degree below `m`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct F2mElement {
    field: Arc<F2mField>,
    value: BigUint,
}

impl F2mElement {
    pub fn field(&self) -> &Arc<F2mField> {
        &self.field
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Guards that both operands belong to the same binary field.
    pub fn check_field_elements(a: &F2mElement, b: &F2mElement) -> Result<(), FieldError> {
        if a.field != b.field {
            return Err(FieldError::IncompatibleFields);
        }
        Ok(())
    }

    fn make(&self, value: BigUint) -> F2mElement {
        F2mElement {
            field: self.field.clone(),
            value,
        }
    }

    /// Every element of a binary field has a unique square root,
    /// `self^(2^(m-1))`.
    pub fn square_root(&self) -> F2mElement {
        let mut out = self.clone();
        for _ in 1..self.field.m {
            out = out.square();
        }
        out
    }

    /// The absolute trace of `self`, an element of GF(2).
    pub fn trace(&self) -> bool {
        let mut t = self.value.clone();
        let mut x = self.clone();
        for _ in 1..self.field.m {
            x = x.square();
            t ^= &x.value;
        }
        t.is_one()
    }

    /// The half-trace of `self`, defined for odd `m`. When `self` has trace
    /// zero, the result `z` satisfies `z^2 + z = self`.
    pub fn half_trace(&self) -> Result<F2mElement, FieldError> {
        if self.field.m & 1 == 0 {
            return Err(FieldError::Message(
                "the half-trace is only defined for an odd extension degree".into(),
            ));
        }
        let mut ht = self.clone();
        let mut x = self.clone();
        for _ in 0..(self.field.m - 1) / 2 {
            x = x.square().square();
            ht = ht.add(&x);
        }
        Ok(ht)
    }
}

impl FieldElement for F2mElement {
    fn field_size_in_bits(&self) -> u64 {
        self.field.size_in_bits()
    }

    fn one(&self) -> Self {
        self.make(BigUint::one())
    }

    fn add(&self, other: &Self) -> Self {
        debug_assert_eq!(self.field, other.field);
        self.make(&self.value ^ &other.value)
    }

    // Subtraction coincides with addition in characteristic two.
    fn sub(&self, other: &Self) -> Self {
        self.add(other)
    }

    fn mul(&self, other: &Self) -> Self {
        debug_assert_eq!(self.field, other.field);
        let mut acc = BigUint::zero();
        for i in 0..other.value.bits() {
            if other.value.bit(i) {
                acc ^= &self.value << i;
            }
        }
        self.make(self.field.reduce(acc))
    }

    fn square(&self) -> Self {
        self.mul(self)
    }

    fn divide(&self, other: &Self) -> Result<Self, FieldError> {
        Ok(self.mul(&other.invert()?))
    }

    fn invert(&self) -> Result<Self, FieldError> {
        if self.value.is_zero() {
            return Err(FieldError::DivisionByZero);
        }
        // Extended Euclid over GF(2)[x].
        let one = BigUint::one();
        let mut u = self.value.clone();
        let mut v = self.field.poly.clone();
        let mut g1 = BigUint::one();
        let mut g2 = BigUint::zero();
        while u != one {
            if u.is_zero() {
                return Err(FieldError::Message(
                    "the reduction polynomial is not irreducible".into(),
                ));
            }
            if u.bits() < v.bits() {
                std::mem::swap(&mut u, &mut v);
                std::mem::swap(&mut g1, &mut g2);
            }
            let j = u.bits() - v.bits();
            u ^= &v << j;
            g1 ^= &g2 << j;
        }
        Ok(self.make(self.field.reduce(g1)))
    }

    // Every element is its own additive inverse in characteristic two.
    fn negate(&self) -> Self {
        self.clone()
    }

    fn add_one(&self) -> Self {
        self.make(&self.value ^ BigUint::one())
    }

    fn sqrt(&self) -> Option<Self> {
        Some(self.square_root())
    }

    fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    fn is_one(&self) -> bool {
        self.value.is_one()
    }

    fn test_bit_zero(&self) -> bool {
        self.value.bit(0)
    }

    fn bit_length(&self) -> u64 {
        self.value.bits()
    }

    fn to_biguint(&self) -> BigUint {
        self.value.clone()
    }

    fn to_bytes_be(&self) -> Vec<u8> {
        let width = ((self.field.size_in_bits() + 7) / 8) as usize;
        let bytes = self.value.to_bytes_be();
        let mut out = vec![0u8; width - bytes.len()];
        out.extend_from_slice(&bytes);
        out
    }
}

impl Display for F2mElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:x}", self.value)
    }
}
