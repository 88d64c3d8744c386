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
    fp::{curve::FpCurve, field::FpElement},
    multiplier::PreCompSlot,
};
use weierstrass_errors::curves::PointError;
use weierstrass_models::curves::FieldElement;

use num_bigint::BigUint;
use std::sync::Arc;

fn two(x: &FpElement) -> FpElement {
    x.double()
}

fn three(x: &FpElement) -> FpElement {
    x.double().add(x)
}

fn four(x: &FpElement) -> FpElement {
    x.double().double()
}

fn eight(x: &FpElement) -> FpElement {
    four(x).double()
}

/// A point on a short Weierstrass curve over a prime field, in the coordinate
/// system its curve is configured with.
///
/// `x` and `y` are absent exactly when the point is at infinity. The layout
/// of `zs` is fixed by the coordinate system: empty for affine, `[Z]` for
/// homogeneous and Jacobian, `[Z, aZ^4]` for modified Jacobian (doublings
/// feeding straight into an addition may omit the auxiliary, which is then
/// recomputed on read).
#[derive(Clone, Debug)]
pub struct FpPoint {
    pub(crate) curve: Arc<FpCurve>,
    pub(crate) x: Option<FpElement>,
    pub(crate) y: Option<FpElement>,
    pub(crate) zs: Vec<FpElement>,
    pub(crate) with_compression: bool,
    pub(crate) precomp: PreCompSlot,
}

impl FpPoint {
    pub fn curve(&self) -> &Arc<FpCurve> {
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

    pub fn x_coord(&self) -> Option<&FpElement> {
        self.x.as_ref()
    }

    pub fn y_coord(&self) -> Option<&FpElement> {
        self.y.as_ref()
    }

    pub fn z_coord(&self, index: usize) -> Option<&FpElement> {
        self.zs.get(index)
    }

    pub fn with_compression(&self) -> bool {
        self.with_compression
    }

    pub fn precomp(&self) -> &PreCompSlot {
        &self.precomp
    }

    pub fn affine_x_coord(&self) -> Result<FpElement, PointError> {
        if !self.is_normalized() {
            return Err(PointError::NotNormalized);
        }
        self.x.clone().ok_or_else(|| {
            PointError::Message("the point at infinity has no affine coordinates".into())
        })
    }

    pub fn affine_y_coord(&self) -> Result<FpElement, PointError> {
        if !self.is_normalized() {
            return Err(PointError::NotNormalized);
        }
        self.y.clone().ok_or_else(|| {
            PointError::Message("the point at infinity has no affine coordinates".into())
        })
    }

    pub(crate) fn coords(&self) -> Result<(&FpElement, &FpElement), PointError> {
        match (&self.x, &self.y) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(PointError::Message(
                "the point at infinity has no coordinates".into(),
            )),
        }
    }

    fn new_raw(&self, x: FpElement, y: FpElement, zs: Vec<FpElement>) -> FpPoint {
        FpPoint {
            curve: self.curve.clone(),
            x: Some(x),
            y: Some(y),
            zs,
            with_compression: self.with_compression,
            precomp: PreCompSlot::new(),
        }
    }

    fn check_curve(&self, b: &FpPoint) -> Result<(), PointError> {
        if *self.curve != *b.curve {
            return Err(PointError::CurveMismatch);
        }
        Ok(())
    }

    pub fn normalize(&self) -> Result<FpPoint, PointError> {
        if self.is_infinity() || self.curve.coordinate_system().is_affine() {
            return Ok(self.clone());
        }
        let z = &self.zs[0];
        if z.is_one() {
            return Ok(self.clone());
        }
        self.normalize_with_z_inv(&z.invert()?)
    }

    pub(crate) fn normalize_with_z_inv(&self, z_inv: &FpElement) -> Result<FpPoint, PointError> {
        let (x, y) = self.coords()?;
        match self.curve.coordinate_system() {
            CoordinateSystem::Homogeneous => {
                let x = x.mul(z_inv);
                let y = y.mul(z_inv);
                Ok(self.curve.affine_valued_point(x, y, self.with_compression))
            }
            CoordinateSystem::Jacobian
            | CoordinateSystem::JacobianChudnovsky
            | CoordinateSystem::JacobianModified => {
                let z_inv_squared = z_inv.square();
                let z_inv_cubed = z_inv_squared.mul(z_inv);
                let x = x.mul(&z_inv_squared);
                let y = y.mul(&z_inv_cubed);
                Ok(self.curve.affine_valued_point(x, y, self.with_compression))
            }
            coord => Err(PointError::UnsupportedCoordinateSystem(coord.name())),
        }
    }

    pub fn negate(&self) -> FpPoint {
        if self.is_infinity() {
            return self.clone();
        }
        match (&self.x, &self.y) {
            (Some(x), Some(y)) => FpPoint {
                curve: self.curve.clone(),
                x: Some(x.clone()),
                y: Some(y.negate()),
                zs: self.zs.clone(),
                with_compression: self.with_compression,
                precomp: PreCompSlot::new(),
            },
            _ => self.clone(),
        }
    }

    pub fn add(&self, b: &FpPoint) -> Result<FpPoint, PointError> {
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
            CoordinateSystem::Jacobian => self.add_jacobian(b, false),
            CoordinateSystem::JacobianModified => self.add_jacobian(b, true),
            coord => Err(PointError::UnsupportedCoordinateSystem(coord.name())),
        }
    }

    fn add_affine(&self, b: &FpPoint) -> Result<FpPoint, PointError> {
        let (x1, y1) = self.coords()?;
        let (x2, y2) = b.coords()?;
        let dx = x2.sub(x1);
        let dy = y2.sub(y1);
        if dx.is_zero() {
            if dy.is_zero() {
                // The two points are equal, so we double.
                return self.twice();
            }
            // The two points are opposite, so the sum is the point at infinity.
            return Ok(self.curve.infinity());
        }
        let gamma = dy.divide(&dx)?;
        let x3 = gamma.square().sub(x1).sub(x2);
        let y3 = gamma.mul(&x1.sub(&x3)).sub(y1);
        Ok(self.curve.affine_valued_point(x3, y3, self.with_compression))
    }

    fn add_homogeneous(&self, b: &FpPoint) -> Result<FpPoint, PointError> {
        let (x1, y1) = self.coords()?;
        let (x2, y2) = b.coords()?;
        let z1 = &self.zs[0];
        let z2 = &b.zs[0];
        let z1_is_one = z1.is_one();
        let z2_is_one = z2.is_one();

        let u1 = if z1_is_one { y2.clone() } else { y2.mul(z1) };
        let u2 = if z2_is_one { y1.clone() } else { y1.mul(z2) };
        let u = u1.sub(&u2);
        let v1 = if z1_is_one { x2.clone() } else { x2.mul(z1) };
        let v2 = if z2_is_one { x1.clone() } else { x1.mul(z2) };
        let v = v1.sub(&v2);

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
        let v_squared_v2 = v_squared.mul(&v2);
        let a = u.square().mul(&w).sub(&v_cubed).sub(&two(&v_squared_v2));

        let x3 = v.mul(&a);
        let y3 = v_squared_v2.sub(&a).mul(&u).sub(&v_cubed.mul(&u2));
        let z3 = v_cubed.mul(&w);

        Ok(self.new_raw(x3, y3, vec![z3]))
    }

    fn add_jacobian(&self, b: &FpPoint, modified: bool) -> Result<FpPoint, PointError> {
        let (x1, y1) = self.coords()?;
        let (x2, y2) = b.coords()?;
        let z1 = &self.zs[0];
        let z2 = &b.zs[0];
        let z1_is_one = z1.is_one();

        let x3;
        let y3;
        let z3;
        let mut z3_squared: Option<FpElement> = None;

        if !z1_is_one && z1 == z2 {
            // The operands share a Z coordinate, which admits a cheaper
            // co-Z addition.
            let dx = x1.sub(x2);
            let dy = y1.sub(y2);
            if dx.is_zero() {
                if dy.is_zero() {
                    return self.twice();
                }
                return Ok(self.curve.infinity());
            }
            let c = dx.square();
            let w1 = x1.mul(&c);
            let w2 = x2.mul(&c);
            let a1 = w1.sub(&w2).mul(y1);
            x3 = dy.square().sub(&w1).sub(&w2);
            y3 = w1.sub(&x3).mul(&dy).sub(&a1);
            z3 = dx.mul(z1);
        } else {
            let (u2, s2) = if z1_is_one {
                (x2.clone(), y2.clone())
            } else {
                let z1_squared = z1.square();
                (z1_squared.mul(x2), z1_squared.mul(z1).mul(y2))
            };
            let z2_is_one = z2.is_one();
            let (u1, s1) = if z2_is_one {
                (x1.clone(), y1.clone())
            } else {
                let z2_squared = z2.square();
                (z2_squared.mul(x1), z2_squared.mul(z2).mul(y1))
            };

            let h = u1.sub(&u2);
            let r = s1.sub(&s2);

            // Check if b == this or b == -this
            if h.is_zero() {
                if r.is_zero() {
                    // The two points are equal, so we double.
                    return self.twice();
                }
                // The two points are opposite, so the sum is the point at infinity.
                return Ok(self.curve.infinity());
            }

            let h_squared = h.square();
            let g = h_squared.mul(&h);
            let v = h_squared.mul(&u1);

            x3 = r.square().add(&g).sub(&two(&v));
            y3 = v.sub(&x3).mul(&r).sub(&s1.mul(&g));

            let mut z = h.clone();
            if !z1_is_one {
                z = z.mul(z1);
            }
            if !z2_is_one {
                z = z.mul(z2);
            }
            if z1_is_one && z2_is_one {
                z3_squared = Some(h_squared);
            }
            z3 = z;
        }

        let zs = if modified {
            let w3 = self.calculate_jacobian_modified_w(&z3, z3_squared.as_ref());
            vec![z3, w3]
        } else {
            vec![z3]
        };
        Ok(self.new_raw(x3, y3, zs))
    }

    pub fn twice(&self) -> Result<FpPoint, PointError> {
        if self.is_infinity() {
            return Ok(self.clone());
        }
        let (x1, y1) = self.coords()?;
        if y1.is_zero() {
            // A point with y = 0 has order two; doubling it gives infinity.
            return Ok(self.curve.infinity());
        }
        match self.curve.coordinate_system() {
            CoordinateSystem::Affine => {
                let gamma = three(&x1.square()).add(self.curve.a()).divide(&two(y1))?;
                let x3 = gamma.square().sub(&two(x1));
                let y3 = gamma.mul(&x1.sub(&x3)).sub(y1);
                Ok(self.curve.affine_valued_point(x3, y3, self.with_compression))
            }
            CoordinateSystem::Homogeneous => self.twice_homogeneous(),
            CoordinateSystem::Jacobian => self.twice_jacobian(),
            CoordinateSystem::JacobianModified => self.twice_jacobian_modified(true),
            coord => Err(PointError::UnsupportedCoordinateSystem(coord.name())),
        }
    }

    fn twice_homogeneous(&self) -> Result<FpPoint, PointError> {
        let (x1, y1) = self.coords()?;
        let z1 = &self.zs[0];
        let z1_is_one = z1.is_one();

        let mut w = self.curve.a().clone();
        if !w.is_zero() && !z1_is_one {
            w = w.mul(&z1.square());
        }
        w = w.add(&three(&x1.square()));

        let s = if z1_is_one { y1.clone() } else { y1.mul(z1) };
        let t = if z1_is_one { y1.square() } else { s.mul(y1) };
        let b = x1.mul(&t);
        let _4b = four(&b);
        let h = w.square().sub(&two(&_4b));

        let _2s = two(&s);
        let _2t = two(&t);
        let x3 = h.mul(&_2s);
        let y3 = _4b.sub(&h).mul(&w).sub(&two(&_2t.square()));
        let _4s_squared = if z1_is_one { two(&_2t) } else { _2s.square() };
        let z3 = two(&_4s_squared).mul(&s);

        Ok(self.new_raw(x3, y3, vec![z3]))
    }

    fn twice_jacobian(&self) -> Result<FpPoint, PointError> {
        let (x1, y1) = self.coords()?;
        let z1 = &self.zs[0];
        let z1_is_one = z1.is_one();

        let y1_squared = y1.square();
        let t = y1_squared.square();

        let a4 = self.curve.a();
        let a4_neg = a4.negate();

        let m;
        let s;
        if a4_neg.to_biguint() == BigUint::from(3u32) {
            let z1_squared = if z1_is_one { z1.clone() } else { z1.square() };
            m = three(&x1.add(&z1_squared).mul(&x1.sub(&z1_squared)));
            s = four(&y1_squared.mul(x1));
        } else {
            let mut m0 = three(&x1.square());
            if z1_is_one {
                m0 = m0.add(a4);
            } else {
                let z1_pow4 = z1.square().square();
                // Multiply by whichever of a and -a is smaller.
                if a4_neg.bit_length() < a4.bit_length() {
                    m0 = m0.sub(&z1_pow4.mul(&a4_neg));
                } else {
                    m0 = m0.add(&z1_pow4.mul(a4));
                }
            }
            m = m0;
            s = four(&x1.mul(&y1_squared));
        }

        let x3 = m.square().sub(&two(&s));
        let y3 = s.sub(&x3).mul(&m).sub(&eight(&t));

        let mut z3 = two(y1);
        if !z1_is_one {
            z3 = z3.mul(z1);
        }

        Ok(self.new_raw(x3, y3, vec![z3]))
    }

    /// Doubling threaded through the cached `W = aZ^4` auxiliary. When
    /// `calculate_w` is false the auxiliary of the result is omitted, for
    /// callers that feed the result straight into an addition.
    fn twice_jacobian_modified(&self, calculate_w: bool) -> Result<FpPoint, PointError> {
        let (x1, y1) = self.coords()?;
        let z1 = &self.zs[0];
        let w1 = self.jacobian_modified_w();

        let m = three(&x1.square()).add(&w1);
        let _2y1 = two(y1);
        let _2y1_squared = _2y1.mul(y1);
        let s = two(&x1.mul(&_2y1_squared));
        let x3 = m.square().sub(&two(&s));
        let _4t = _2y1_squared.square();
        let _8t = two(&_4t);
        let y3 = m.mul(&s.sub(&x3)).sub(&_8t);
        let z3 = if z1.is_one() { _2y1 } else { _2y1.mul(z1) };

        let zs = if calculate_w {
            let w3 = two(&_8t.mul(&w1));
            vec![z3, w3]
        } else {
            vec![z3]
        };
        Ok(self.new_raw(x3, y3, zs))
    }

    pub(crate) fn jacobian_modified_w(&self) -> FpElement {
        if self.zs.len() > 1 {
            return self.zs[1].clone();
        }
        // The auxiliary was omitted by a doubling feeding an addition.
        self.calculate_jacobian_modified_w(&self.zs[0], None)
    }

    fn calculate_jacobian_modified_w(
        &self,
        z: &FpElement,
        z_squared: Option<&FpElement>,
    ) -> FpElement {
        let a4 = self.curve.a();
        if a4.is_zero() || z.is_one() {
            return a4.clone();
        }
        let z_squared = match z_squared {
            Some(zz) => zz.clone(),
            None => z.square(),
        };
        let mut w = z_squared.square();
        let a4_neg = a4.negate();
        // Multiply by whichever of a and -a is smaller.
        if a4_neg.bit_length() < a4.bit_length() {
            w = w.mul(&a4_neg).negate();
        } else {
            w = w.mul(a4);
        }
        w
    }

    /// Computes `2 * self + b` with one inversion in affine coordinates,
    /// falling back to `twice` and `add` elsewhere.
    pub fn twice_plus(&self, b: &FpPoint) -> Result<FpPoint, PointError> {
        if std::ptr::eq(self, b) {
            return self.three_times();
        }
        self.check_curve(b)?;
        if self.is_infinity() {
            return Ok(b.clone());
        }
        if b.is_infinity() {
            return self.twice();
        }
        if b.curve.coordinate_system() != self.curve.coordinate_system() {
            let imported = self.curve.import_point(b)?;
            return self.twice_plus(&imported);
        }
        let (x1, y1) = self.coords()?;
        if y1.is_zero() {
            // 2 * self is infinity for a point of order two.
            return Ok(b.clone());
        }
        match self.curve.coordinate_system() {
            CoordinateSystem::Affine => {
                let (x2, y2) = b.coords()?;
                let dx = x2.sub(x1);
                let dy = y2.sub(y1);

                if dx.is_zero() {
                    if dy.is_zero() {
                        return self.three_times();
                    }
                    // b == -this, so 2 * this + b == this.
                    return Ok(self.clone());
                }

                let x = dx.square();
                let y = dy.square();
                let d = x.mul(&two(x1).add(x2)).sub(&y);
                if d.is_zero() {
                    return Ok(self.curve.infinity());
                }

                let dd = d.mul(&dx);
                let i = dd.invert()?;
                let l1 = d.mul(&i).mul(&dy);
                let l2 = two(y1).mul(&x).mul(&dx).mul(&i).sub(&l1);
                let x4 = l2.sub(&l1).mul(&l1.add(&l2)).add(x2);
                let y4 = x1.sub(&x4).mul(&l2).sub(y1);
                Ok(self.curve.affine_valued_point(x4, y4, self.with_compression))
            }
            CoordinateSystem::JacobianModified => self.twice_jacobian_modified(false)?.add(b),
            _ => self.twice()?.add(b),
        }
    }

    /// Computes `3 * self` with one inversion in affine coordinates, falling
    /// back to `twice` and `add` elsewhere.
    pub fn three_times(&self) -> Result<FpPoint, PointError> {
        if self.is_infinity() {
            return Ok(self.clone());
        }
        let (x1, y1) = self.coords()?;
        if y1.is_zero() {
            // For a point of order two, 3 * self == self.
            return Ok(self.clone());
        }
        match self.curve.coordinate_system() {
            CoordinateSystem::Affine => {
                let _2y1 = two(y1);
                let x = _2y1.square();
                let z = three(&x1.square()).add(self.curve.a());
                let y = z.square();

                let d = three(x1).mul(&x).sub(&y);
                if d.is_zero() {
                    return Ok(self.curve.infinity());
                }

                let dd = d.mul(&_2y1);
                let i = dd.invert()?;
                let l1 = d.mul(&i).mul(&z);
                let l2 = x.square().mul(&i).sub(&l1);
                let x4 = l2.sub(&l1).mul(&l1.add(&l2)).add(x1);
                let y4 = x1.sub(&x4).mul(&l2).sub(y1);
                Ok(self.curve.affine_valued_point(x4, y4, self.with_compression))
            }
            _ => self.twice()?.add(self),
        }
    }

    /// The parity bit of the compressed encoding; callers normalize first.
    pub(crate) fn compression_y_tilde(&self) -> Result<bool, PointError> {
        let (_, y) = self.coords()?;
        Ok(y.test_bit_zero())
    }

    /// Verifies that the point lies on its curve. Diagnostic.
    pub fn satisfies_curve_equation(&self) -> Result<bool, PointError> {
        if self.is_infinity() {
            return Ok(true);
        }
        let normalized = self.normalize()?;
        let (x, y) = normalized.coords()?;
        Ok(self.curve.satisfies_curve_equation(x, y))
    }
}
