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
    f2m::{curve::F2mCurve, field::F2mElement},
    multiplier::PreCompSlot,
};
use weierstrass_errors::curves::PointError;
use weierstrass_models::curves::FieldElement;

use std::sync::Arc;

/// A point on a short Weierstrass curve over a binary field, in the
/// coordinate system its curve is configured with.
///
/// `x` and `y` are absent exactly when the point is at infinity. In lambda
/// systems the y slot stores `lambda = x + y/x`, except for the order-two
/// point `(0, sqrt(b))` which keeps its y value there.
#[derive(Clone, Debug)]
pub struct F2mPoint {
    pub(crate) curve: Arc<F2mCurve>,
    pub(crate) x: Option<F2mElement>,
    pub(crate) y: Option<F2mElement>,
    pub(crate) zs: Vec<F2mElement>,
    pub(crate) with_compression: bool,
    pub(crate) precomp: PreCompSlot,
}

impl F2mPoint {
    pub fn curve(&self) -> &Arc<F2mCurve> {
        &self.curve
    }

    pub fn is_infinity(&self) -> bool {
        match &self.x {
            None => true,
            Some(_) => self.zs.first().map_or(false, |z| z.is_zero()),
        }
    }

    pub fn is_normalized(&self) -> bool {
        self.curve.coordinate_system().is_affine() || self.is_infinity() || self.zs[0].is_one()
    }

    pub fn x_coord(&self) -> Option<&F2mElement> {
        self.x.as_ref()
    }

    pub fn raw_y_coord(&self) -> Option<&F2mElement> {
        self.y.as_ref()
    }

    pub fn z_coord(&self, index: usize) -> Option<&F2mElement> {
        self.zs.get(index)
    }

    pub fn with_compression(&self) -> bool {
        self.with_compression
    }

    pub fn precomp(&self) -> &PreCompSlot {
        &self.precomp
    }

    /// The affine-flavored y value. In lambda systems the stored lambda is
    /// converted back on read, `y = (lambda - x) * x / z`, even for points
    /// that are not normalized.
    pub fn y_coord(&self) -> Option<F2mElement> {
        if self.is_infinity() {
            return None;
        }
        match (&self.x, &self.y) {
            (Some(x), Some(l)) if self.curve.coordinate_system().is_lambda() => {
                if x.is_zero() {
                    // The order-two point stores y itself in the lambda slot.
                    return Some(l.clone());
                }
                let mut y = l.add(x).mul(x);
                if self.curve.coordinate_system() == CoordinateSystem::LambdaProjective {
                    let z = &self.zs[0];
                    if !z.is_one() {
                        y = y.divide(z).ok()?;
                    }
                }
                Some(y)
            }
            (_, y) => y.clone(),
        }
    }

    pub fn affine_x_coord(&self) -> Result<F2mElement, PointError> {
        if !self.is_normalized() {
            return Err(PointError::NotNormalized);
        }
        self.x.clone().ok_or_else(|| {
            PointError::Message("the point at infinity has no affine coordinates".into())
        })
    }

    pub fn affine_y_coord(&self) -> Result<F2mElement, PointError> {
        if !self.is_normalized() {
            return Err(PointError::NotNormalized);
        }
        self.y_coord().ok_or_else(|| {
            PointError::Message("the point at infinity has no affine coordinates".into())
        })
    }

    pub(crate) fn coords(&self) -> Result<(&F2mElement, &F2mElement), PointError> {
        match (&self.x, &self.y) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(PointError::Message(
                "the point at infinity has no coordinates".into(),
            )),
        }
    }

    fn new_raw(&self, x: F2mElement, y: F2mElement, zs: Vec<F2mElement>) -> F2mPoint {
        F2mPoint {
            curve: self.curve.clone(),
            x: Some(x),
            y: Some(y),
            zs,
            with_compression: self.with_compression,
            precomp: PreCompSlot::new(),
        }
    }

    fn check_curve(&self, b: &F2mPoint) -> Result<(), PointError> {
        if *self.curve != *b.curve {
            return Err(PointError::CurveMismatch);
        }
        Ok(())
    }

    /// The point `(0, sqrt(b))` of order two.
    fn order_two_point(&self) -> F2mPoint {
        let x = self.curve.zero_element();
        let y = self.curve.b().square_root();
        self.curve.affine_valued_point(x, y, self.with_compression)
    }

    pub fn normalize(&self) -> Result<F2mPoint, PointError> {
        if self.is_infinity() || self.curve.coordinate_system().is_affine() {
            return Ok(self.clone());
        }
        let z = &self.zs[0];
        if z.is_one() {
            return Ok(self.clone());
        }
        self.normalize_with_z_inv(&z.invert()?)
    }

    pub(crate) fn normalize_with_z_inv(&self, z_inv: &F2mElement) -> Result<F2mPoint, PointError> {
        let (x, y) = self.coords()?;
        match self.curve.coordinate_system() {
            CoordinateSystem::Homogeneous | CoordinateSystem::LambdaProjective => {
                let x = x.mul(z_inv);
                let y = y.mul(z_inv);
                Ok(self.curve.affine_valued_point(x, y, self.with_compression))
            }
            coord => Err(PointError::UnsupportedCoordinateSystem(coord.name())),
        }
    }

    pub fn negate(&self) -> F2mPoint {
        if self.is_infinity() {
            return self.clone();
        }
        let (x, y) = match (&self.x, &self.y) {
            (Some(x), Some(y)) => (x, y),
            _ => return self.clone(),
        };
        if x.is_zero() {
            // A point with x = 0 is its own additive inverse.
            return self.clone();
        }
        let y_new = match self.curve.coordinate_system() {
            CoordinateSystem::Affine | CoordinateSystem::Homogeneous => y.add(x),
            CoordinateSystem::LambdaAffine => y.add_one(),
            CoordinateSystem::LambdaProjective => y.add(&self.zs[0]),
            _ => return self.clone(),
        };
        F2mPoint {
            curve: self.curve.clone(),
            x: Some(x.clone()),
            y: Some(y_new),
            zs: self.zs.clone(),
            with_compression: self.with_compression,
            precomp: PreCompSlot::new(),
        }
    }

    /// The Frobenius endomorphism `(x, y) -> (x^2, y^2)`.
    pub fn tau(&self) -> Result<F2mPoint, PointError> {
        if self.is_infinity() {
            return Ok(self.clone());
        }
        let (x1, y1) = self.coords()?;
        match self.curve.coordinate_system() {
            CoordinateSystem::Affine | CoordinateSystem::LambdaAffine => Ok(self
                .curve
                .affine_valued_point(x1.square(), y1.square(), self.with_compression)),
            CoordinateSystem::Homogeneous | CoordinateSystem::LambdaProjective => {
                let z1 = &self.zs[0];
                Ok(self.new_raw(x1.square(), y1.square(), vec![z1.square()]))
            }
            coord => Err(PointError::UnsupportedCoordinateSystem(coord.name())),
        }
    }

    pub fn add(&self, b: &F2mPoint) -> Result<F2mPoint, PointError> {
        self.check_curve(b)?;
        if self.is_infinity() {
            return Ok(b.clone());
        }
        if b.is_infinity() {
            return Ok(self.clone());
        }
        if std::ptr::eq(self, b) {
            return self.twice();
        }
        if b.curve.coordinate_system() != self.curve.coordinate_system() {
            let imported = self.curve.import_point(b)?;
            return self.add(&imported);
        }
        match self.curve.coordinate_system() {
            CoordinateSystem::Affine => self.add_affine(b),
            CoordinateSystem::Homogeneous => self.add_homogeneous(b),
            CoordinateSystem::LambdaAffine => self.add_lambda_affine(b),
            CoordinateSystem::LambdaProjective => self.add_lambda_projective(b),
            coord => Err(PointError::UnsupportedCoordinateSystem(coord.name())),
        }
    }

    fn add_affine(&self, b: &F2mPoint) -> Result<F2mPoint, PointError> {
        let (x1, y1) = self.coords()?;
        let (x2, y2) = b.coords()?;
        let dx = x1.add(x2);
        let dy = y1.add(y2);
        if dx.is_zero() {
            if dy.is_zero() {
                // The two points are equal, so we double.
                return self.twice();
            }
            // The two points are opposite, so the sum is the point at infinity.
            return Ok(self.curve.infinity());
        }
        let l = dy.divide(&dx)?;
        let x3 = l.square().add(&l).add(&dx).add(self.curve.a());
        let y3 = l.mul(&x1.add(&x3)).add(&x3).add(y1);
        Ok(self.curve.affine_valued_point(x3, y3, self.with_compression))
    }

    fn add_homogeneous(&self, b: &F2mPoint) -> Result<F2mPoint, PointError> {
        let (x1, y1) = self.coords()?;
        let (x2, y2) = b.coords()?;
        let z1 = &self.zs[0];
        let z2 = &b.zs[0];
        let z1_is_one = z1.is_one();
        let z2_is_one = z2.is_one();

        let u1 = if z1_is_one { y2.clone() } else { y2.mul(z1) };
        let u2 = if z2_is_one { y1.clone() } else { y1.mul(z2) };
        let u = u1.add(&u2);
        let v1 = if z1_is_one { x2.clone() } else { x2.mul(z1) };
        let v2 = if z2_is_one { x1.clone() } else { x1.mul(z2) };
        let v = v1.add(&v2);

        // Check if b == this or b == -this
        if v.is_zero() {
            if u.is_zero() {
                return self.twice();
            }
            return Ok(self.curve.infinity());
        }

        let w = if z1_is_one {
            z2.clone()
        } else if z2_is_one {
            z1.clone()
        } else {
            z1.mul(z2)
        };
        let v_squared = v.square();
        let v_cubed = v_squared.mul(&v);
        let uv = u.add(&v);
        let a = u
            .mul(&uv)
            .add(&self.curve.a().mul(&v_squared))
            .mul(&w)
            .add(&v_cubed);

        let x3 = v.mul(&a);
        let v_squared_z2 = if z2_is_one { v_squared } else { v_squared.mul(z2) };
        let y3 = u
            .mul(x1)
            .add(&v.mul(y1))
            .mul(&v_squared_z2)
            .add(&uv.mul(&a));
        let z3 = v_cubed.mul(&w);

        Ok(self.new_raw(x3, y3, vec![z3]))
    }

    fn add_lambda_affine(&self, b: &F2mPoint) -> Result<F2mPoint, PointError> {
        let (x1, l1) = self.coords()?;
        let (x2, l2) = b.coords()?;
        if x1.is_zero() {
            if x2.is_zero() {
                return Ok(self.curve.infinity());
            }
            return b.add(self);
        }

        let a_sum = l1.add(l2);
        let b_sum = x1.add(x2);
        if b_sum.is_zero() {
            if a_sum.is_zero() {
                return self.twice();
            }
            return Ok(self.curve.infinity());
        }

        if x2.is_zero() {
            // The second operand is the order-two point, whose lambda slot
            // holds y itself; fall back to an affine-style computation.
            let y1 = l1.add(x1).mul(x1);
            let y2 = l2;
            let l = y1.add(y2).divide(x1)?;
            let x3 = l.square().add(&l).add(x1).add(self.curve.a());
            if x3.is_zero() {
                return Ok(self.order_two_point());
            }
            let y3 = l.mul(&x1.add(&x3)).add(&x3).add(&y1);
            let l3 = y3.divide(&x3)?.add(&x3);
            return Ok(self.curve.affine_valued_point(x3, l3, self.with_compression));
        }

        let b_squared = b_sum.square();
        let x3 = a_sum.square().mul(x1).mul(x2);
        if x3.is_zero() {
            return Ok(self.order_two_point());
        }
        let z3 = a_sum.mul(&b_squared);
        let l3 = a_sum
            .mul(x2)
            .add(&b_squared)
            .square()
            .add(&z3.mul(&l1.add_one()));
        let z_inv = z3.invert()?;
        Ok(self.curve.affine_valued_point(
            x3.mul(&z_inv),
            l3.mul(&z_inv),
            self.with_compression,
        ))
    }

    fn add_lambda_projective(&self, b: &F2mPoint) -> Result<F2mPoint, PointError> {
        let (x1, l1) = self.coords()?;
        let (x2, l2) = b.coords()?;
        if x1.is_zero() {
            if x2.is_zero() {
                return Ok(self.curve.infinity());
            }
            return b.add(self);
        }
        let z1 = &self.zs[0];
        let z2 = &b.zs[0];
        let z1_is_one = z1.is_one();
        let z2_is_one = z2.is_one();

        let mut u2 = x2.clone();
        let mut s2 = l2.clone();
        if !z1_is_one {
            u2 = u2.mul(z1);
            s2 = s2.mul(z1);
        }
        let mut u1 = x1.clone();
        let mut s1 = l1.clone();
        if !z2_is_one {
            u1 = u1.mul(z2);
            s1 = s1.mul(z2);
        }

        let a_sum = s1.add(&s2);
        let b_sum = u1.add(&u2);

        // Check if b == this or b == -this
        if b_sum.is_zero() {
            if a_sum.is_zero() {
                return self.twice();
            }
            return Ok(self.curve.infinity());
        }

        if x2.is_zero() {
            // The second operand is the order-two point, whose lambda slot
            // holds y itself; fall back to an affine-style computation.
            // TODO Derive a fused projective formula for this case and skip
            // the normalization.
            let p = self.normalize()?;
            let (x1n, _) = p.coords()?;
            let y1 = p
                .y_coord()
                .ok_or_else(|| PointError::Message("missing y coordinate".into()))?;
            let y2 = l2;

            let l = y1.add(y2).divide(x1n)?;
            let x3 = l.square().add(&l).add(x1n).add(self.curve.a());
            if x3.is_zero() {
                return Ok(self.order_two_point());
            }
            let y3 = l.mul(&x1n.add(&x3)).add(&x3).add(&y1);
            let l3 = y3.divide(&x3)?.add(&x3);
            let z3 = self.curve.one_element();
            return Ok(self.new_raw(x3, l3, vec![z3]));
        }

        let b_squared = b_sum.square();
        let au1 = a_sum.mul(&u1);
        let au2 = a_sum.mul(&u2);
        let x3 = au1.mul(&au2);
        if x3.is_zero() {
            return Ok(self.order_two_point());
        }

        let mut abz2 = a_sum.mul(&b_squared);
        if !z2_is_one {
            abz2 = abz2.mul(z2);
        }
        let l3 = au2.add(&b_squared).square().add(&abz2.mul(&l1.add(z1)));
        let mut z3 = abz2;
        if !z1_is_one {
            z3 = z3.mul(z1);
        }

        Ok(self.new_raw(x3, l3, vec![z3]))
    }

    pub fn twice(&self) -> Result<F2mPoint, PointError> {
        if self.is_infinity() {
            return Ok(self.clone());
        }
        let (x1, y1) = self.coords()?;
        if x1.is_zero() {
            // A point with x = 0 is its own additive inverse.
            return Ok(self.curve.infinity());
        }
        match self.curve.coordinate_system() {
            CoordinateSystem::Affine => {
                let l1 = y1.divide(x1)?.add(x1);
                let x3 = l1.square().add(&l1).add(self.curve.a());
                let y3 = x1.square().add(&x3.mul(&l1.add_one()));
                Ok(self.curve.affine_valued_point(x3, y3, self.with_compression))
            }
            CoordinateSystem::Homogeneous => self.twice_homogeneous(),
            CoordinateSystem::LambdaAffine => self.twice_lambda_affine(),
            CoordinateSystem::LambdaProjective => self.twice_lambda_projective(),
            coord => Err(PointError::UnsupportedCoordinateSystem(coord.name())),
        }
    }

    fn twice_homogeneous(&self) -> Result<F2mPoint, PointError> {
        let (x1, y1) = self.coords()?;
        let z1 = &self.zs[0];
        let z1_is_one = z1.is_one();

        let x1z1 = if z1_is_one { x1.clone() } else { x1.mul(z1) };
        let y1z1 = if z1_is_one { y1.clone() } else { y1.mul(z1) };

        let x1_squared = x1.square();
        let s = x1_squared.add(&y1z1);
        let v = x1z1;
        let v_squared = v.square();
        let sv = s.add(&v);
        let h = s.mul(&sv).add(&self.curve.a().mul(&v_squared));

        let x3 = v.mul(&h);
        let y3 = x1_squared.square().mul(&v).add(&h.mul(&sv));
        let z3 = v.mul(&v_squared);

        Ok(self.new_raw(x3, y3, vec![z3]))
    }

    fn twice_lambda_affine(&self) -> Result<F2mPoint, PointError> {
        let (x1, l1) = self.coords()?;
        let t = l1.square().add(l1).add(self.curve.a());
        if t.is_zero() {
            return Ok(self.order_two_point());
        }
        // x3 = T; lambda3 = (X1^2 + T*L1 + T^2 + T) / T
        let l3 = x1
            .square()
            .add(&t.mul(l1))
            .add(&t.square())
            .add(&t)
            .mul(&t.invert()?);
        Ok(self.curve.affine_valued_point(t, l3, self.with_compression))
    }

    fn twice_lambda_projective(&self) -> Result<F2mPoint, PointError> {
        let (x1, l1) = self.coords()?;
        let z1 = &self.zs[0];
        let z1_is_one = z1.is_one();

        let l1z1 = if z1_is_one { l1.clone() } else { l1.mul(z1) };
        let z1_squared = if z1_is_one { z1.clone() } else { z1.square() };
        let a = self.curve.a();
        let a_z1_squared = if z1_is_one { a.clone() } else { a.mul(&z1_squared) };

        let t = l1.square().add(&l1z1).add(&a_z1_squared);
        if t.is_zero() {
            return Ok(self.order_two_point());
        }

        let x3 = t.square();
        let z3 = if z1_is_one { t.clone() } else { t.mul(&z1_squared) };

        let b = self.curve.b();
        let l3 = if b.bit_length() < u64::from(self.curve.field().m() >> 1) {
            let t1 = l1.add(x1).square();
            let t2 = if b.is_one() {
                a_z1_squared.add(&z1_squared).square()
            } else {
                a_z1_squared.square().add(&b.mul(&z1_squared.square()))
            };
            let mut l3 = t1.add(&t).add(&z1_squared).mul(&t1).add(&t2).add(&x3);
            if a.is_zero() {
                l3 = l3.add(&z3);
            } else if !a.is_one() {
                l3 = l3.add(&a.add_one().mul(&z3));
            }
            l3
        } else {
            let x1z1 = if z1_is_one { x1.clone() } else { x1.mul(z1) };
            x1z1.square().add(&x3).add(&t.mul(&l1z1)).add(&z3)
        };

        Ok(self.new_raw(x3, l3, vec![z3]))
    }

    /// Computes `2 * self + b`, with a dedicated path in lambda-projective
    /// coordinates when the second operand is lambda-affine.
    pub fn twice_plus(&self, b: &F2mPoint) -> Result<F2mPoint, PointError> {
        self.check_curve(b)?;
        if self.is_infinity() {
            return Ok(b.clone());
        }
        if b.is_infinity() {
            return self.twice();
        }
        let (x1, _) = self.coords()?;
        if x1.is_zero() {
            // A point with x = 0 is its own additive inverse.
            return Ok(b.clone());
        }
        if b.curve.coordinate_system() != self.curve.coordinate_system() {
            let imported = self.curve.import_point(b)?;
            return self.twice_plus(&imported);
        }
        match self.curve.coordinate_system() {
            CoordinateSystem::LambdaProjective => {
                let (x2, l2) = b.coords()?;
                let z2 = &b.zs[0];
                if x2.is_zero() || !z2.is_one() {
                    return self.twice()?.add(b);
                }

                let l1 = self.coords()?.1;
                let z1 = &self.zs[0];

                let x1_squared = x1.square();
                let l1_squared = l1.square();
                let z1_squared = z1.square();
                let l1z1 = l1.mul(z1);

                let a = self.curve.a();
                let t = a.mul(&z1_squared).add(&l1_squared).add(&l1z1);
                let l2_plus_one = l2.add_one();
                let big_a = a
                    .add(&l2_plus_one)
                    .mul(&z1_squared)
                    .add(&l1_squared)
                    .mul(&t)
                    .add(&x1_squared.mul(&z1_squared));
                let x2z1_squared = x2.mul(&z1_squared);
                let big_b = x2z1_squared.add(&t).square();

                if big_b.is_zero() {
                    if big_a.is_zero() {
                        // 2 * self == b, so the result is its double.
                        return b.twice();
                    }
                    return Ok(self.curve.infinity());
                }

                if big_a.is_zero() {
                    return Ok(self.order_two_point());
                }

                let x3 = big_a.square().mul(&x2z1_squared);
                let z3 = big_a.mul(&big_b).mul(&z1_squared);
                let l3 = big_a
                    .add(&big_b)
                    .square()
                    .mul(&t)
                    .add(&l2_plus_one.mul(&z3));

                Ok(self.new_raw(x3, l3, vec![z3]))
            }
            _ => self.twice()?.add(b),
        }
    }

    /// The parity bit of the compressed encoding; callers normalize first.
    /// An x of zero forces the bit to false.
    pub(crate) fn compression_y_tilde(&self) -> Result<bool, PointError> {
        let (x, y) = self.coords()?;
        if x.is_zero() {
            return Ok(false);
        }
        if self.curve.coordinate_system().is_lambda() {
            // The y slot stores lambda, and lambda - x has the parity of y/x.
            Ok(y.test_bit_zero() != x.test_bit_zero())
        } else {
            Ok(y.divide(x)?.test_bit_zero())
        }
    }

    /// Verifies that the point lies on its curve. Diagnostic.
    pub fn satisfies_curve_equation(&self) -> Result<bool, PointError> {
        if self.is_infinity() {
            return Ok(true);
        }
        let normalized = self.normalize()?;
        let x = normalized
            .x_coord()
            .ok_or(PointError::InvariantViolation)?
            .clone();
        let y = normalized
            .y_coord()
            .ok_or(PointError::InvariantViolation)?;
        Ok(self.curve.satisfies_curve_equation(&x, &y))
    }
}
