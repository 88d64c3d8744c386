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
    f2m::{curve::F2mCurve, field::F2mElement},
    fp::{curve::FpCurve, field::FpElement},
    multiplier::DoubleAndAddMultiplier,
    point::Point,
};
use weierstrass_errors::curves::PointError;
use weierstrass_models::curves::{batch_inversion, FieldElement};

use num_bigint::BigUint;
use std::sync::Arc;

/// The projective coordinate systems a curve can be configured with.
///
/// Jacobian flavors apply to prime fields, lambda flavors to binary fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CoordinateSystem {
    Affine,
    Homogeneous,
    Jacobian,
    JacobianChudnovsky,
    JacobianModified,
    LambdaAffine,
    LambdaProjective,
}

impl CoordinateSystem {
    pub fn name(self) -> &'static str {
        match self {
            CoordinateSystem::Affine => "affine",
            CoordinateSystem::Homogeneous => "homogeneous",
            CoordinateSystem::Jacobian => "Jacobian",
            CoordinateSystem::JacobianChudnovsky => "Chudnovsky Jacobian",
            CoordinateSystem::JacobianModified => "modified Jacobian",
            CoordinateSystem::LambdaAffine => "lambda-affine",
            CoordinateSystem::LambdaProjective => "lambda-projective",
        }
    }

    /// True for systems whose points carry no projective auxiliaries.
    pub fn is_affine(self) -> bool {
        matches!(self, CoordinateSystem::Affine | CoordinateSystem::LambdaAffine)
    }

    /// True for systems storing `lambda = x + y/x` instead of y.
    pub fn is_lambda(self) -> bool {
        matches!(
            self,
            CoordinateSystem::LambdaAffine | CoordinateSystem::LambdaProjective
        )
    }
}

/// A curve of either family, the handle the representation-independent point
/// layer works against.
///
/// Equality is parameter-wise (field and `a`/`b`); two configurations of the
/// same parameters in different coordinate systems are interchangeable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Curve {
    Fp(Arc<FpCurve>),
    F2m(Arc<F2mCurve>),
}

impl Curve {
    pub fn coordinate_system(&self) -> CoordinateSystem {
        match self {
            Curve::Fp(c) => c.coordinate_system(),
            Curve::F2m(c) => c.coordinate_system(),
        }
    }

    pub fn field_size(&self) -> u64 {
        match self {
            Curve::Fp(c) => c.field_size(),
            Curve::F2m(c) => c.field_size(),
        }
    }

    pub fn a(&self) -> BigUint {
        match self {
            Curve::Fp(c) => c.a().to_biguint(),
            Curve::F2m(c) => c.a().to_biguint(),
        }
    }

    pub fn b(&self) -> BigUint {
        match self {
            Curve::Fp(c) => c.b().to_biguint(),
            Curve::F2m(c) => c.b().to_biguint(),
        }
    }

    pub fn order(&self) -> Option<&BigUint> {
        match self {
            Curve::Fp(c) => c.order(),
            Curve::F2m(c) => c.order(),
        }
    }

    pub fn cofactor(&self) -> Option<&BigUint> {
        match self {
            Curve::Fp(c) => c.cofactor(),
            Curve::F2m(c) => c.cofactor(),
        }
    }

    pub fn infinity(&self) -> Point {
        match self {
            Curve::Fp(c) => Point::Fp(c.infinity()),
            Curve::F2m(c) => Point::F2m(c.infinity()),
        }
    }

    /// The multiplier `Point::multiply` delegates to.
    pub fn multiplier(&self) -> DoubleAndAddMultiplier {
        DoubleAndAddMultiplier::default()
    }

    /// Creates a validated point from affine coordinates.
    pub fn create_point(&self, x: &BigUint, y: &BigUint) -> Result<Point, PointError> {
        match self {
            Curve::Fp(c) => Ok(Point::Fp(c.create_point(x, y)?)),
            Curve::F2m(c) => Ok(Point::F2m(c.create_point(x, y)?)),
        }
    }

    /// Re-represents a point from an equivalent curve in this curve's
    /// coordinate system.
    pub fn import_point(&self, p: &Point) -> Result<Point, PointError> {
        match (self, p) {
            (Curve::Fp(c), Point::Fp(q)) => Ok(Point::Fp(c.import_point(q)?)),
            (Curve::F2m(c), Point::F2m(q)) => Ok(Point::F2m(c.import_point(q)?)),
            _ => Err(PointError::CurveMismatch),
        }
    }

    fn owns(&self, p: &Point) -> bool {
        match (self, p) {
            (Curve::Fp(c), Point::Fp(q)) => **c == **q.curve(),
            (Curve::F2m(c), Point::F2m(q)) => **c == **q.curve(),
            _ => false,
        }
    }

    /// Normalizes an ordered sequence of points with a single field
    /// inversion, using Montgomery's trick. Infinity and already-normalized
    /// points are skipped and left unchanged.
    pub fn normalize_all(&self, points: &mut [Point]) -> Result<(), PointError> {
        for p in points.iter() {
            if !self.owns(p) {
                return Err(PointError::CurveMismatch);
            }
        }
        match self {
            Curve::Fp(_) => {
                let mut zs: Vec<FpElement> = Vec::new();
                let mut indices = Vec::new();
                for (i, p) in points.iter().enumerate() {
                    if p.is_normalized() {
                        continue;
                    }
                    if let Point::Fp(q) = p {
                        let z = q
                            .z_coord(0)
                            .ok_or_else(|| PointError::Message("missing Z coordinate".into()))?;
                        zs.push(z.clone());
                        indices.push(i);
                    }
                }
                if indices.is_empty() {
                    return Ok(());
                }
                batch_inversion(&mut zs)?;
                for (j, &i) in indices.iter().enumerate() {
                    let normalized = match &points[i] {
                        Point::Fp(q) => Point::Fp(q.normalize_with_z_inv(&zs[j])?),
                        _ => continue,
                    };
                    points[i] = normalized;
                }
                Ok(())
            }
            Curve::F2m(_) => {
                let mut zs: Vec<F2mElement> = Vec::new();
                let mut indices = Vec::new();
                for (i, p) in points.iter().enumerate() {
                    if p.is_normalized() {
                        continue;
                    }
                    if let Point::F2m(q) = p {
                        let z = q
                            .z_coord(0)
                            .ok_or_else(|| PointError::Message("missing Z coordinate".into()))?;
                        zs.push(z.clone());
                        indices.push(i);
                    }
                }
                if indices.is_empty() {
                    return Ok(());
                }
                batch_inversion(&mut zs)?;
                for (j, &i) in indices.iter().enumerate() {
                    let normalized = match &points[i] {
                        Point::F2m(q) => Point::F2m(q.normalize_with_z_inv(&zs[j])?),
                        _ => continue,
                    };
                    points[i] = normalized;
                }
                Ok(())
            }
        }
    }

    /// Decodes a SEC1 point encoding produced by `Point::get_encoded`.
    ///
    /// Rejects every leading byte other than `0x00`, `0x02`, `0x03` and
    /// `0x04`, any length mismatch, and any decoded point that fails the
    /// curve equation.
    pub fn decode_point(&self, encoded: &[u8]) -> Result<Point, PointError> {
        let width = ((self.field_size() + 7) / 8) as usize;
        let first = *encoded.first().ok_or(PointError::InvalidEncoding)?;
        match first {
            0x00 => {
                if encoded.len() != 1 {
                    return Err(PointError::InvalidEncoding);
                }
                Ok(self.infinity())
            }
            0x02 | 0x03 => {
                if encoded.len() != 1 + width {
                    return Err(PointError::InvalidEncoding);
                }
                let y_tilde = first == 0x03;
                let x = BigUint::from_bytes_be(&encoded[1..]);
                match self {
                    Curve::Fp(c) => Ok(Point::Fp(c.decompress_point(&x, y_tilde)?)),
                    Curve::F2m(c) => Ok(Point::F2m(c.decompress_point(&x, y_tilde)?)),
                }
            }
            0x04 => {
                if encoded.len() != 1 + 2 * width {
                    return Err(PointError::InvalidEncoding);
                }
                let x = BigUint::from_bytes_be(&encoded[1..1 + width]);
                let y = BigUint::from_bytes_be(&encoded[1 + width..]);
                self.create_point(&x, &y)
            }
            _ => Err(PointError::InvalidEncoding),
        }
    }
}
