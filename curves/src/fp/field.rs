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

#[cfg(test)]
thread_local! {
    /// Counts modular inversions on this thread, so tests can pin the
    /// single-inversion property of batch normalization.
    pub(crate) static INVERSION_COUNT: std::cell::Cell<u64> = std::cell::Cell::new(0);
}

/// A prime field `GF(p)` for an odd prime modulus.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct FpField {
    modulus: BigUint,
}

impl FpField {
    pub fn new(modulus: BigUint) -> Result<Self, FieldError> {
        if modulus < BigUint::from(3u32) || (&modulus & BigUint::one()).is_zero() {
            return Err(FieldError::Message(
                "the field characteristic must be an odd prime".into(),
            ));
        }
        Ok(Self { modulus })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn size_in_bits(&self) -> u64 {
        self.modulus.bits()
    }

    /// Constructs the element with the given canonical representative.
    pub fn element(self: &Arc<Self>, value: BigUint) -> Result<FpElement, FieldError> {
        if value >= self.modulus {
            return Err(FieldError::NotInField(value.to_string()));
        }
        Ok(FpElement {
            field: self.clone(),
            value,
        })
    }
}

/// An element of a prime field, held as its canonical representative in
/// `[0, p)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FpElement {
    field: Arc<FpField>,
    value: BigUint,
}

impl FpElement {
    pub fn field(&self) -> &Arc<FpField> {
        &self.field
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Returns `self^exp`.
    pub fn pow(&self, exp: &BigUint) -> FpElement {
        FpElement {
            field: self.field.clone(),
            value: self.value.modpow(exp, &self.field.modulus),
        }
    }

    fn make(&self, value: BigUint) -> FpElement {
        FpElement {
            field: self.field.clone(),
            value,
        }
    }

    /// Evaluates the Legendre symbol of `self`: 1, 0 or -1 encoded as the
    /// residue of `self^((p-1)/2)`.
    fn is_quadratic_residue(&self) -> bool {
        let p = &self.field.modulus;
        let e = (p - BigUint::one()) >> 1;
        self.value.modpow(&e, p).is_one()
    }

    /// Tonelli-Shanks for a modulus without the `p = 3 (mod 4)` shortcut.
    fn sqrt_tonelli_shanks(&self) -> Option<FpElement> {
        let p = &self.field.modulus;
        let one = BigUint::one();

        // p - 1 = q * 2^s with q odd
        let mut q = p - &one;
        let mut s = 0u64;
        while (&q & &one).is_zero() {
            q >>= 1;
            s += 1;
        }

        // The smallest quadratic non-residue; half of the field qualifies, so
        // the scan is short.
        let mut z = BigUint::from(2u32);
        let legendre_exp = (p - &one) >> 1;
        while z.modpow(&legendre_exp, p).is_one() {
            z += &one;
        }

        let mut m = s;
        let mut c = z.modpow(&q, p);
        let mut t = self.value.modpow(&q, p);
        let mut r = self.value.modpow(&((&q + &one) >> 1), p);

        loop {
            if t.is_one() {
                return Some(self.make(r));
            }
            let mut i = 0u64;
            let mut t2 = t.clone();
            while !t2.is_one() {
                t2 = (&t2 * &t2) % p;
                i += 1;
                if i == m {
                    return None;
                }
            }
            let b = c.modpow(&(&one << (m - i - 1)), p);
            m = i;
            c = (&b * &b) % p;
            t = (&t * &c) % p;
            r = (&r * &b) % p;
        }
    }
}

impl FieldElement for FpElement {
    fn field_size_in_bits(&self) -> u64 {
        self.field.size_in_bits()
    }

    fn one(&self) -> Self {
        self.make(BigUint::one())
    }

    fn add(&self, other: &Self) -> Self {
        debug_assert_eq!(self.field, other.field);
        let mut sum = &self.value + &other.value;
        if sum >= self.field.modulus {
            sum -= &self.field.modulus;
        }
        self.make(sum)
    }

    fn sub(&self, other: &Self) -> Self {
        debug_assert_eq!(self.field, other.field);
        if self.value >= other.value {
            self.make(&self.value - &other.value)
        } else {
            self.make(&self.field.modulus - &other.value + &self.value)
        }
    }

    fn mul(&self, other: &Self) -> Self {
        debug_assert_eq!(self.field, other.field);
        self.make((&self.value * &other.value) % &self.field.modulus)
    }

    fn square(&self) -> Self {
        self.make((&self.value * &self.value) % &self.field.modulus)
    }

    fn divide(&self, other: &Self) -> Result<Self, FieldError> {
        Ok(self.mul(&other.invert()?))
    }

    fn invert(&self) -> Result<Self, FieldError> {
        if self.value.is_zero() {
            return Err(FieldError::DivisionByZero);
        }
        #[cfg(test)]
        INVERSION_COUNT.with(|c| c.set(c.get() + 1));
        // Fermat: a^(p-2) = a^(-1) for prime p.
        let exp = &self.field.modulus - BigUint::from(2u32);
        Ok(self.pow(&exp))
    }

    fn negate(&self) -> Self {
        if self.value.is_zero() {
            self.clone()
        } else {
            self.make(&self.field.modulus - &self.value)
        }
    }

    fn add_one(&self) -> Self {
        self.add(&self.one())
    }

    fn sqrt(&self) -> Option<Self> {
        if self.value.is_zero() {
            return Some(self.clone());
        }
        if !self.is_quadratic_residue() {
            return None;
        }
        let p = &self.field.modulus;
        if (p % BigUint::from(4u32)) == BigUint::from(3u32) {
            let e = (p + BigUint::one()) >> 2;
            return Some(self.pow(&e));
        }
        self.sqrt_tonelli_shanks()
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

impl Display for FpElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.value)
    }
}
