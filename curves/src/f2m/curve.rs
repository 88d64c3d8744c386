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
    curve::CoordinateSystem,
    f2m::{
        field::{F2mElement, F2mField},
        point::F2mPoint,
    },
    multiplier::PreCompSlot,
};
use weierstrass_errors::curves::{FieldError, PointError};
use weierstrass_models::curves::FieldElement;

use num_bigint::BigUint;
use std::{
    hash::{Hash, Hasher},
    sync::Arc,
};

/// A short Weierstrass curve `y^2 + xy = x^3 + ax^2 + b` over a binary
/// field.
///
/// Lambda coordinate systems store `lambda = x + y/x` in the y slot; the
/// order-two point `(0, sqrt(b))` keeps its y value there instead, since
/// lambda is undefined at `x = 0`. Two curves compare equal when their field
/// and `a`/`b` parameters agree, regardless of coordinate system.
#[derive(Debug)]
pub struct F2mCurve {
    field: Arc<F2mField>,
    a: F2mElement,
    b: F2mElement,
    order: Option<BigUint>,
    cofactor: Option<BigUint>,
    coord: CoordinateSystem,
}

impl PartialEq for F2mCurve {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.a == other.a && self.b == other.b
    }
}

impl Eq for F2mCurve {}

impl Hash for F2mCurve {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field.m().hash(state);
        self.field.ks().hash(state);
        self.a.to_biguint().hash(state);
        self.b.to_biguint().hash(state);
    }
}

impl F2mCurve {
    pub const DEFAULT_COORDINATE_SYSTEM: CoordinateSystem = CoordinateSystem::LambdaProjective;

    pub fn new(
        m: u32,
        ks: &[u32],
        a: &BigUint,
        b: &BigUint,
        order: Option<BigUint>,
        cofactor: Option<BigUint>,
    ) -> Result<Arc<Self>, PointError> {
        let field = Arc::new(F2mField::new(m, ks)?);
        let a = field.element(a.clone())?;
        let b = field.element(b.clone())?;
        if b.is_zero() {
            return Err(PointError::InvalidArgument(
                "the curve coefficient b must be nonzero".into(),
            ));
        }
        Ok(Arc::new(Self {
            field,
            a,
            b,
            order,
            cofactor,
            coord: Self::DEFAULT_COORDINATE_SYSTEM,
        }))
    }

    /// Returns an equivalent curve configured with the given coordinate
    /// system.
    pub fn configure(&self, coord: CoordinateSystem) -> Result<Arc<Self>, PointError> {
        if !Self::supports_coordinate_system(coord) {
            return Err(PointError::UnsupportedCoordinateSystem(coord.name()));
        }
        Ok(Arc::new(Self {
            field: self.field.clone(),
            a: self.a.clone(),
            b: self.b.clone(),
            order: self.order.clone(),
            cofactor: self.cofactor.clone(),
            coord,
        }))
    }

    pub fn supports_coordinate_system(coord: CoordinateSystem) -> bool {
        matches!(
            coord,
            CoordinateSystem::Affine
                | CoordinateSystem::Homogeneous
                | CoordinateSystem::LambdaAffine
                | CoordinateSystem::LambdaProjective
        )
    }

    pub fn field(&self) -> &Arc<F2mField> {
        &self.field
    }

    pub fn a(&self) -> &F2mElement {
        &self.a
    }

    pub fn b(&self) -> &F2mElement {
        &self.b
    }

    pub fn order(&self) -> Option<&BigUint> {
        self.order.as_ref()
    }

    pub fn cofactor(&self) -> Option<&BigUint> {
        self.cofactor.as_ref()
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.coord
    }

    pub fn field_size(&self) -> u64 {
        self.field.size_in_bits()
    }

    pub fn from_biguint(&self, value: &BigUint) -> Result<F2mElement, FieldError> {
        self.field.element(value.clone())
    }

    pub fn infinity(self: &Arc<Self>) -> F2mPoint {
        F2mPoint {
            curve: self.clone(),
            x: None,
            y: None,
            zs: Vec::new(),
            with_compression: false,
            precomp: PreCompSlot::new(),
        }
    }

    pub(crate) fn one_element(&self) -> F2mElement {
        self.a.one()
    }

    pub(crate) fn zero_element(&self) -> F2mElement {
        self.a.sub(&self.a)
    }

    /// The projective auxiliaries a fresh affine-valued point carries in this
    /// curve's coordinate system.
    pub(crate) fn initial_zs(&self) -> Vec<F2mElement> {
        match self.coord {
            CoordinateSystem::Affine | CoordinateSystem::LambdaAffine => Vec::new(),
            _ => vec![self.one_element()],
        }
    }

    pub(crate) fn affine_valued_point(
        self: &Arc<Self>,
        x: F2mElement,
        y: F2mElement,
        with_compression: bool,
    ) -> F2mPoint {
        F2mPoint {
            curve: self.clone(),
            x: Some(x),
            y: Some(y),
            zs: self.initial_zs(),
            with_compression,
            precomp: PreCompSlot::new(),
        }
    }

    pub fn satisfies_curve_equation(&self, x: &F2mElement, y: &F2mElement) -> bool {
        let lhs = y.square().add(&x.mul(y));
        let rhs = x.square().mul(x).add(&self.a.mul(&x.square())).add(&self.b);
        lhs == rhs
    }

    /// Creates a validated point from affine coordinates. In lambda systems
    /// the y coordinate is converted to `lambda = x + y/x` on the way in.
    pub fn create_point(self: &Arc<Self>, x: &BigUint, y: &BigUint) -> Result<F2mPoint, PointError> {
        self.create_point_with_compression(x, y, false)
    }

    pub(crate) fn create_point_with_compression(
        self: &Arc<Self>,
        x: &BigUint,
        y: &BigUint,
        with_compression: bool,
    ) -> Result<F2mPoint, PointError> {
        let x = self.from_biguint(x)?;
        let mut y = self.from_biguint(y)?;
        if !self.satisfies_curve_equation(&x, &y) {
            return Err(PointError::InvariantViolation);
        }
        if self.coord.is_lambda() && !x.is_zero() {
            // The y slot stores lambda; the order-two point keeps y itself.
            y = y.divide(&x)?.add(&x);
        }
        Ok(self.affine_valued_point(x, y, with_compression))
    }

    /// Low-level constructor that does not revalidate the curve equation.
    /// Used after algebraic operations, which preserve curve membership.
    pub fn create_raw_point(
        self: &Arc<Self>,
        x: Option<F2mElement>,
        y: Option<F2mElement>,
        zs: Vec<F2mElement>,
        with_compression: bool,
    ) -> Result<F2mPoint, PointError> {
        if x.is_some() != y.is_some() {
            return Err(PointError::InvalidArgument(
                "exactly one of the coordinates is missing".into(),
            ));
        }
        if x.is_some() {
            let valid = match self.coord {
                CoordinateSystem::Affine | CoordinateSystem::LambdaAffine => zs.is_empty(),
                CoordinateSystem::Homogeneous | CoordinateSystem::LambdaProjective => {
                    zs.len() == 1
                }
                _ => false,
            };
            if !valid {
                return Err(PointError::InvalidArgument(
                    "the projective coordinates do not match the coordinate system".into(),
                ));
            }
        }
        Ok(F2mPoint {
            curve: self.clone(),
            x,
            y,
            zs,
            with_compression,
            precomp: PreCompSlot::new(),
        })
    }

    /// Re-represents a point from an equivalent curve in this curve's
    /// coordinate system.
    pub fn import_point(self: &Arc<Self>, p: &F2mPoint) -> Result<F2mPoint, PointError> {
        if **self != **p.curve() {
            return Err(PointError::CurveMismatch);
        }
        if self.coord == p.curve().coordinate_system() {
            return Ok(p.clone());
        }
        if p.is_infinity() {
            return Ok(self.infinity());
        }
        let normalized = p.normalize()?;
        let x = normalized
            .x_coord()
            .ok_or(PointError::InvariantViolation)?
            .to_biguint();
        let y = normalized.affine_y_coord()?.to_biguint();
        self.create_point_with_compression(&x, &y, p.with_compression())
    }

    /// Recovers the point with the given x-coordinate and y parity from a
    /// compressed encoding, solving `z^2 + z = x + a + b/x^2` by half-trace.
    pub(crate) fn decompress_point(
        self: &Arc<Self>,
        x: &BigUint,
        y_tilde: bool,
    ) -> Result<F2mPoint, PointError> {
        let x = self
            .from_biguint(x)
            .map_err(|_| PointError::InvalidEncoding)?;
        let y = if x.is_zero() {
            self.b.square_root()
        } else {
            let beta = x.square().invert()?.mul(&self.b).add(&self.a).add(&x);
            let mut z = self.solve_quadratic_equation(&beta)?;
            if z.test_bit_zero() != y_tilde {
                z = z.add_one();
            }
            if self.coord.is_lambda() {
                z.add(&x)
            } else {
                z.mul(&x)
            }
        };
        Ok(self.affine_valued_point(x, y, true))
    }

    /// Solves `z^2 + z = beta`, failing when the trace of `beta` is one.
    fn solve_quadratic_equation(&self, beta: &F2mElement) -> Result<F2mElement, PointError> {
        if beta.is_zero() {
            return Ok(beta.clone());
        }
        let z = beta.half_trace()?;
        if z.square().add(&z) != *beta {
            return Err(PointError::InvalidEncoding);
        }
        Ok(z)
    }
}
