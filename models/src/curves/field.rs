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

use num_bigint::BigUint;
use weierstrass_errors::curves::FieldError;

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// The interface for an element of a finite field.
///
/// Elements are immutable values; every operation returns a new element.
/// Equality and hashing are defined on the canonical representative.
pub trait FieldElement: Clone + Debug + Display + Send + Sync + Sized + Eq + Hash + 'static {
    /// Returns the size of the field in bits.
    fn field_size_in_bits(&self) -> u64;

    /// Returns the multiplicative identity of the field this element belongs to.
    #[must_use]
    fn one(&self) -> Self;

    /// Returns `self + other`.
    #[must_use]
    fn add(&self, other: &Self) -> Self;

    /// Returns `self - other`. In characteristic two this is `add`.
    #[must_use]
    fn sub(&self, other: &Self) -> Self;

    /// Returns `self * other`.
    #[must_use]
    fn mul(&self, other: &Self) -> Self;

    /// Returns `self * self`.
    #[must_use]
    fn square(&self) -> Self;

    /// Returns `self + self`.
    #[must_use]
    fn double(&self) -> Self {
        self.add(self)
    }

    /// Returns `self / other`, failing on a zero divisor.
    fn divide(&self, other: &Self) -> Result<Self, FieldError>;

    /// Returns the multiplicative inverse of `self`, failing on zero.
    fn invert(&self) -> Result<Self, FieldError>;

    /// Returns `-self`.
    #[must_use]
    fn negate(&self) -> Self;

    /// Returns `self + 1`.
    #[must_use]
    fn add_one(&self) -> Self;

    /// Returns a square root of `self`, if one exists.
    #[must_use]
    fn sqrt(&self) -> Option<Self>;

    fn is_zero(&self) -> bool;

    fn is_one(&self) -> bool;

    /// Returns the lowest bit of the canonical representative.
    fn test_bit_zero(&self) -> bool;

    /// Returns the bit length of the canonical representative.
    fn bit_length(&self) -> u64;

    /// Returns the canonical representative as an unsigned integer.
    fn to_biguint(&self) -> BigUint;

    /// Encodes the canonical representative as big-endian bytes of fixed
    /// width `ceil(field_size_in_bits / 8)`.
    fn to_bytes_be(&self) -> Vec<u8>;
}
