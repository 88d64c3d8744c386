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

use crate::{
    curve::Curve,
    f2m::point::F2mPoint,
    fp::point::FpPoint,
    multiplier::{EcMultiplier, PreCompSlot},
};
use weierstrass_errors::curves::PointError;
use weierstrass_models::curves::FieldElement;

use num_bigint::BigUint;
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
};

/// A point of either curve family.
///
/// This layer carries the representation-independent operations: encoding,
/// equality, normalization, repeated doubling and the scalar-multiplication
/// dispatch. The family-specific algebra lives on `FpPoint` and `F2mPoint`.
#[derive(Clone, Debug)]
pub enum Point {
    Fp(FpPoint),
    F2m(F2mPoint),
}

impl From<FpPoint> for Point {
    fn from(p: FpPoint) -> Self {
        Point::Fp(p)
    }
}

impl From<F2mPoint> for Point {
    fn from(p: F2mPoint) -> Self {
        Point::F2m(p)
    }
}

impl Point {
    pub fn curve(&self) -> Curve {
        match self {
            Point::Fp(p) => Curve::Fp(p.curve().clone()),
            Point::F2m(p) => Curve::F2m(p.curve().clone()),
        }
    }

    pub fn as_fp(&self) -> Option<&FpPoint> {
        match self {
            Point::Fp(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_f2m(&self) -> Option<&F2mPoint> {
        match self {
            Point::F2m(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_infinity(&self) -> bool {
        match self {
            Point::Fp(p) => p.is_infinity(),
            Point::F2m(p) => p.is_infinity(),
        }
    }

    pub fn is_normalized(&self) -> bool {
        match self {
            Point::Fp(p) => p.is_normalized(),
            Point::F2m(p) => p.is_normalized(),
        }
    }

    pub fn with_compression(&self) -> bool {
        match self {
            Point::Fp(p) => p.with_compression(),
            Point::F2m(p) => p.with_compression(),
        }
    }

    pub fn precomp(&self) -> &PreCompSlot {
        match self {
            Point::Fp(p) => p.precomp(),
            Point::F2m(p) => p.precomp(),
        }
    }

    /// Returns an equivalent point whose coordinates are affine values.
    /// Infinity and already-normalized points are returned unchanged.
    pub fn normalize(&self) -> Result<Point, PointError> {
        match self {
            Point::Fp(p) => Ok(Point::Fp(p.normalize()?)),
            Point::F2m(p) => Ok(Point::F2m(p.normalize()?)),
        }
    }

    pub fn affine_x_coord(&self) -> Result<BigUint, PointError> {
        match self {
            Point::Fp(p) => Ok(p.affine_x_coord()?.to_biguint()),
            Point::F2m(p) => Ok(p.affine_x_coord()?.to_biguint()),
        }
    }

    pub fn affine_y_coord(&self) -> Result<BigUint, PointError> {
        match self {
            Point::Fp(p) => Ok(p.affine_y_coord()?.to_biguint()),
            Point::F2m(p) => Ok(p.affine_y_coord()?.to_biguint()),
        }
    }

    pub fn negate(&self) -> Point {
        match self {
            Point::Fp(p) => Point::Fp(p.negate()),
            Point::F2m(p) => Point::F2m(p.negate()),
        }
    }

    pub fn add(&self, b: &Point) -> Result<Point, PointError> {
        match (self, b) {
            (Point::Fp(p), Point::Fp(q)) => Ok(Point::Fp(p.add(q)?)),
            (Point::F2m(p), Point::F2m(q)) => Ok(Point::F2m(p.add(q)?)),
            _ => Err(PointError::CurveMismatch),
        }
    }

    /// `self - b`, as `self + (-b)` with an infinity short-circuit.
    pub fn subtract(&self, b: &Point) -> Result<Point, PointError> {
        if b.is_infinity() {
            return Ok(self.clone());
        }
        self.add(&b.negate())
    }

    pub fn twice(&self) -> Result<Point, PointError> {
        match self {
            Point::Fp(p) => Ok(Point::Fp(p.twice()?)),
            Point::F2m(p) => Ok(Point::F2m(p.twice()?)),
        }
    }

    /// `2 * self + b`.
    pub fn twice_plus(&self, b: &Point) -> Result<Point, PointError> {
        match (self, b) {
            (Point::Fp(p), Point::Fp(q)) => Ok(Point::Fp(p.twice_plus(q)?)),
            (Point::F2m(p), Point::F2m(q)) => Ok(Point::F2m(p.twice_plus(q)?)),
            _ => Err(PointError::CurveMismatch),
        }
    }

    /// `3 * self`.
    pub fn three_times(&self) -> Result<Point, PointError> {
        match self {
            Point::Fp(p) => Ok(Point::Fp(p.three_times()?)),
            Point::F2m(p) => Ok(Point::F2m(p.twice_plus(p)?)),
        }
    }

    /// `e` repeated doublings; `e` must not be negative.
    pub fn times_pow2(&self, e: i32) -> Result<Point, PointError> {
        if e < 0 {
            return Err(PointError::InvalidArgument("'e' cannot be negative".into()));
        }
        let mut p = self.clone();
        for _ in 0..e {
            p = p.twice()?;
        }
        Ok(p)
    }

    /// `k * self`, through the curve's multiplier.
    pub fn multiply(&self, k: &BigUint) -> Result<Point, PointError> {
        self.curve().multiplier().multiply(self, k)
    }

    /// Verifies that the point lies on its curve. Diagnostic.
    pub fn check_curve_equation(&self) -> Result<(), PointError> {
        let ok = match self {
            Point::Fp(p) => p.satisfies_curve_equation()?,
            Point::F2m(p) => p.satisfies_curve_equation()?,
        };
        if ok {
            Ok(())
        } else {
            Err(PointError::InvariantViolation)
        }
    }

    fn x_bytes(&self) -> Result<Vec<u8>, PointError> {
        match self {
            Point::Fp(p) => Ok(p.affine_x_coord()?.to_bytes_be()),
            Point::F2m(p) => Ok(p.affine_x_coord()?.to_bytes_be()),
        }
    }

    fn y_bytes(&self) -> Result<Vec<u8>, PointError> {
        match self {
            Point::Fp(p) => Ok(p.affine_y_coord()?.to_bytes_be()),
            Point::F2m(p) => Ok(p.affine_y_coord()?.to_bytes_be()),
        }
    }

    fn compression_y_tilde(&self) -> Result<bool, PointError> {
        match self {
            Point::Fp(p) => p.compression_y_tilde(),
            Point::F2m(p) => p.compression_y_tilde(),
        }
    }

    /// The SEC1 encoding of the point: a single zero byte for infinity,
    /// `02/03 || X` compressed, `04 || X || Y` uncompressed.
    pub fn get_encoded(&self, compressed: bool) -> Result<Vec<u8>, PointError> {
        if self.is_infinity() {
            return Ok(vec![0u8]);
        }
        let normalized = self.normalize()?;
        let x = normalized.x_bytes()?;
        if compressed {
            let y_tilde = normalized.compression_y_tilde()?;
            let mut out = Vec::with_capacity(1 + x.len());
            out.push(if y_tilde { 0x03 } else { 0x02 });
            out.extend_from_slice(&x);
            return Ok(out);
        }
        let y = normalized.y_bytes()?;
        let mut out = Vec::with_capacity(1 + x.len() + y.len());
        out.push(0x04);
        out.extend_from_slice(&x);
        out.extend_from_slice(&y);
        Ok(out)
    }

    /// The SEC1 encoding using the point's compression hint.
    pub fn get_encoded_default(&self) -> Result<Vec<u8>, PointError> {
        self.get_encoded(self.with_compression())
    }

    /// Point equality modulo representation: both infinity on equal curves,
    /// or equal affine coordinates on equal curves. The second operand is
    /// re-represented on this point's curve and both sides share a single
    /// batch normalization.
    pub fn eq_point(&self, other: &Point) -> Result<bool, PointError> {
        let i1 = self.is_infinity();
        let i2 = other.is_infinity();
        if i1 || i2 {
            return Ok(i1 && i2 && self.curve() == other.curve());
        }
        let curve = self.curve();
        if curve != other.curve() {
            return Ok(false);
        }
        let mut pair = [self.clone(), curve.import_point(other)?];
        curve.normalize_all(&mut pair)?;
        Ok(Self::raw_affine_eq(&pair[0], &pair[1]))
    }

    fn raw_affine_eq(a: &Point, b: &Point) -> bool {
        match (a, b) {
            (Point::Fp(p), Point::Fp(q)) => {
                p.x_coord() == q.x_coord() && p.y_coord() == q.y_coord()
            }
            (Point::F2m(p), Point::F2m(q)) => {
                p.x_coord() == q.x_coord() && p.raw_y_coord() == q.raw_y_coord()
            }
            _ => false,
        }
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.eq_point(other).unwrap_or(false)
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Point::Fp(p) => p.curve().hash(state),
            Point::F2m(p) => p.curve().hash(state),
        }
        if self.is_infinity() {
            // Infinity hashes to the curve-derived value alone.
            return;
        }
        if let Ok(normalized) = self.normalize() {
            if let (Ok(x), Ok(y)) = (normalized.affine_x_coord(), normalized.affine_y_coord()) {
                x.hash(state);
                y.hash(state);
            }
        }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.is_infinity() {
            return write!(f, "(infinity)");
        }
        match self {
            Point::Fp(p) => {
                if let (Some(x), Some(y)) = (p.x_coord(), p.y_coord()) {
                    write!(f, "({}", x)?;
                    write!(f, ", {}", y)?;
                    for i in 0.. {
                        match p.z_coord(i) {
                            Some(z) => write!(f, ", {}", z)?,
                            None => break,
                        }
                    }
                }
                write!(f, ")")
            }
            Point::F2m(p) => {
                if let (Some(x), Some(y)) = (p.x_coord(), p.raw_y_coord()) {
                    write!(f, "({}", x)?;
                    write!(f, ", {}", y)?;
                    for i in 0.. {
                        match p.z_coord(i) {
                            Some(z) => write!(f, ", {}", z)?,
                            None => break,
                        }
                    }
                }
                write!(f, ")")
            }
        }
    }
}
