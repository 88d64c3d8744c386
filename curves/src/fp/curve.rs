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
    fp::{
        field::{FpElement, FpField},
        point::FpPoint,
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

/// A short Weierstrass curve `y^2 = x^3 + ax + b` over a prime field.
///
/// The coordinate system is fixed at construction; `configure` produces an
/// equivalent curve in another system. Two curves compare equal when their
/// field and `a`/`b` parameters agree, regardless of coordinate system.
#[derive(Debug)]
pub struct FpCurve {
    field: Arc<FpField>,
    a: FpElement,
    b: FpElement,
    order: Option<BigUint>,
    cofactor: Option<BigUint>,
    coord: CoordinateSystem,
}

impl PartialEq for FpCurve {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.a == other.a && self.b == other.b
    }
}

impl Eq for FpCurve {}

impl Hash for FpCurve {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field.modulus().hash(state);
        self.a.to_biguint().hash(state);
        self.b.to_biguint().hash(state);
    }
}

impl FpCurve {
    pub const DEFAULT_COORDINATE_SYSTEM: CoordinateSystem = CoordinateSystem::JacobianModified;

    pub fn new(
        modulus: BigUint,
        a: &BigUint,
        b: &BigUint,
        order: Option<BigUint>,
        cofactor: Option<BigUint>,
    ) -> Result<Arc<Self>, PointError> {
        let field = Arc::new(FpField::new(modulus)?);
        let a = field.element(a.clone())?;
        let b = field.element(b.clone())?;
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
                | CoordinateSystem::Jacobian
                | CoordinateSystem::JacobianModified
        )
    }

    pub fn field(&self) -> &Arc<FpField> {
        &self.field
    }

    pub fn a(&self) -> &FpElement {
        &self.a
    }

    pub fn b(&self) -> &FpElement {
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

    pub fn from_biguint(&self, value: &BigUint) -> Result<FpElement, FieldError> {
        self.field.element(value.clone())
    }

    pub fn infinity(self: &Arc<Self>) -> FpPoint {
        FpPoint {
            curve: self.clone(),
            x: None,
            y: None,
            zs: Vec::new(),
            with_compression: false,
            precomp: PreCompSlot::new(),
        }
    }

    pub(crate) fn one_element(&self) -> FpElement {
        self.a.one()
    }

    /// The projective auxiliaries a fresh affine-valued point carries in this
    /// curve's coordinate system.
    pub(crate) fn initial_zs(&self) -> Vec<FpElement> {
        let one = self.one_element();
        match self.coord {
            CoordinateSystem::Affine | CoordinateSystem::LambdaAffine => Vec::new(),
            CoordinateSystem::Homogeneous
            | CoordinateSystem::Jacobian
            | CoordinateSystem::LambdaProjective => vec![one],
            CoordinateSystem::JacobianChudnovsky => vec![one.clone(), one.clone(), one],
            CoordinateSystem::JacobianModified => vec![one, self.a.clone()],
        }
    }

    pub(crate) fn affine_valued_point(
        self: &Arc<Self>,
        x: FpElement,
        y: FpElement,
        with_compression: bool,
    ) -> FpPoint {
        FpPoint {
            curve: self.clone(),
            x: Some(x),
            y: Some(y),
            zs: self.initial_zs(),
            with_compression,
            precomp: PreCompSlot::new(),
        }
    }

    pub fn satisfies_curve_equation(&self, x: &FpElement, y: &FpElement) -> bool {
        let rhs = x.square().mul(x).add(&self.a.mul(x)).add(&self.b);
        y.square() == rhs
    }

    /// Creates a validated point from affine coordinates.
    pub fn create_point(self: &Arc<Self>, x: &BigUint, y: &BigUint) -> Result<FpPoint, PointError> {
        self.create_point_with_compression(x, y, false)
    }

    pub(crate) fn create_point_with_compression(
        self: &Arc<Self>,
        x: &BigUint,
        y: &BigUint,
        with_compression: bool,
    ) -> Result<FpPoint, PointError> {
        let x = self.from_biguint(x)?;
        let y = self.from_biguint(y)?;
        if !self.satisfies_curve_equation(&x, &y) {
            return Err(PointError::InvariantViolation);
        }
        Ok(self.affine_valued_point(x, y, with_compression))
    }

    /// Low-level constructor that does not revalidate the curve equation.
    /// Used after algebraic operations, which preserve curve membership.
    pub fn create_raw_point(
        self: &Arc<Self>,
        x: Option<FpElement>,
        y: Option<FpElement>,
        zs: Vec<FpElement>,
        with_compression: bool,
    ) -> Result<FpPoint, PointError> {
        if x.is_some() != y.is_some() {
            return Err(PointError::InvalidArgument(
                "exactly one of the coordinates is missing".into(),
            ));
        }
        if x.is_some() {
            let valid = match self.coord {
                CoordinateSystem::Affine => zs.is_empty(),
                CoordinateSystem::Homogeneous | CoordinateSystem::Jacobian => zs.len() == 1,
                CoordinateSystem::JacobianChudnovsky => zs.len() == 3,
                // Doublings feeding an addition may omit the W auxiliary.
                CoordinateSystem::JacobianModified => zs.len() == 1 || zs.len() == 2,
                _ => false,
            };
            if !valid {
                return Err(PointError::InvalidArgument(
                    "the projective coordinates do not match the coordinate system".into(),
                ));
            }
        }
        Ok(FpPoint {
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
    pub fn import_point(self: &Arc<Self>, p: &FpPoint) -> Result<FpPoint, PointError> {
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
        let (x, y) = normalized.coords()?;
        self.create_point_with_compression(&x.to_biguint(), &y.to_biguint(), p.with_compression())
    }

    /// Recovers the point with the given x-coordinate and y parity from a
    /// compressed encoding.
    pub(crate) fn decompress_point(
        self: &Arc<Self>,
        x: &BigUint,
        y_tilde: bool,
    ) -> Result<FpPoint, PointError> {
        let x = self
            .from_biguint(x)
            .map_err(|_| PointError::InvalidEncoding)?;
        let rhs = x.square().mul(&x).add(&self.a.mul(&x)).add(&self.b);
        let mut y = rhs.sqrt().ok_or(PointError::InvalidEncoding)?;
        if y.test_bit_zero() != y_tilde {
            y = y.negate();
        }
        Ok(self.affine_valued_point(x, y, true))
    }
}
