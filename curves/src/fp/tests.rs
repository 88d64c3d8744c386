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
    curve::{CoordinateSystem, Curve},
    fp::{
        curve::FpCurve,
        field::{FpField, INVERSION_COUNT},
    },
    point::Point,
};
use weierstrass_errors::curves::{FieldError, PointError};
use weierstrass_models::curves::{batch_inversion, FieldElement, PreCompInfo};

use num_bigint::BigUint;
use num_traits::One;
use rand::{RngCore, SeedableRng};
use rand_xorshift::XorShiftRng;
use std::{any::Any, sync::Arc};

const ITERATIONS: usize = 10;

const COORDS: [CoordinateSystem; 4] = [
    CoordinateSystem::Affine,
    CoordinateSystem::Homogeneous,
    CoordinateSystem::Jacobian,
    CoordinateSystem::JacobianModified,
];

fn hex_uint(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 16).unwrap()
}

fn p256(coord: CoordinateSystem) -> Arc<FpCurve> {
    let p = hex_uint("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF");
    let a = hex_uint("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFC");
    let b = hex_uint("5AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604B");
    let n = hex_uint("FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551");
    FpCurve::new(p, &a, &b, Some(n), Some(BigUint::one()))
        .unwrap()
        .configure(coord)
        .unwrap()
}

fn p256_generator(curve: &Arc<FpCurve>) -> Point {
    let gx = hex_uint("6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296");
    let gy = hex_uint("4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5");
    Point::Fp(curve.create_point(&gx, &gy).unwrap())
}

fn secp256k1_generator() -> Point {
    let p = hex_uint("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F");
    let a = BigUint::from(0u32);
    let b = BigUint::from(7u32);
    let n = hex_uint("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");
    let curve = FpCurve::new(p, &a, &b, Some(n), Some(BigUint::one())).unwrap();
    let gx = hex_uint("79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798");
    let gy = hex_uint("483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8");
    Point::Fp(curve.create_point(&gx, &gy).unwrap())
}

fn random_scalar(rng: &mut XorShiftRng, order: &BigUint) -> BigUint {
    let mut bytes = [0u8; 40];
    rng.fill_bytes(&mut bytes);
    BigUint::from_bytes_be(&bytes) % order
}

#[test]
fn test_p256_generator_is_on_curve() {
    for &coord in &COORDS {
        let curve = p256(coord);
        let g = p256_generator(&curve);
        g.check_curve_equation().unwrap();
        g.multiply(&BigUint::from(7u32))
            .unwrap()
            .check_curve_equation()
            .unwrap();
    }
}

#[test]
fn test_p256_doubling_matches_published_value() {
    let two_g_x = hex_uint("7CF27B188D034F7E8A52380304B51AC3C08969E277F21B35A60B48FC47669978");
    let two_g_y = hex_uint("07775510DB8ED040293D9AC69F7430DBBA7DAD63CE3CA2CD7C52A3B08854F355");
    for &coord in &COORDS {
        let curve = p256(coord);
        let g = p256_generator(&curve);
        let doubled = g.twice().unwrap().normalize().unwrap();
        assert_eq!(doubled.affine_x_coord().unwrap(), two_g_x);
        assert_eq!(doubled.affine_y_coord().unwrap(), two_g_y);
        // g + g must agree with twice(g).
        assert_eq!(g.add(&g.clone()).unwrap(), doubled);
    }
}

#[test]
fn test_representation_invariance() {
    // The same multiple computed in every coordinate system must be the same
    // group element, with identical affine encodings.
    let mut rng = XorShiftRng::seed_from_u64(1231275789u64);
    let reference_curve = p256(CoordinateSystem::Affine);
    let order = reference_curve.order().unwrap().clone();
    for _ in 0..ITERATIONS {
        let k = random_scalar(&mut rng, &order);
        let reference = p256_generator(&reference_curve).multiply(&k).unwrap();
        let expected = reference.get_encoded(false).unwrap();
        for &coord in &COORDS[1..] {
            let curve = p256(coord);
            let p = p256_generator(&curve).multiply(&k).unwrap();
            assert_eq!(p.get_encoded(false).unwrap(), expected);
            assert_eq!(p, reference);
        }
    }
}

#[test]
fn test_group_laws() {
    let mut rng = XorShiftRng::seed_from_u64(1231275789u64);
    for &coord in &COORDS {
        let curve = p256(coord);
        let g = p256_generator(&curve);
        let order = curve.order().unwrap().clone();
        let infinity = Curve::Fp(curve.clone()).infinity();

        let a = g.multiply(&random_scalar(&mut rng, &order)).unwrap();
        let b = g.multiply(&random_scalar(&mut rng, &order)).unwrap();
        let c = g.multiply(&random_scalar(&mut rng, &order)).unwrap();

        // Identity
        assert_eq!(a.add(&infinity).unwrap(), a);
        assert_eq!(infinity.add(&a).unwrap(), a);

        // Inverses
        assert!(a.add(&a.negate()).unwrap().is_infinity());
        assert_eq!(a.negate().negate(), a);
        assert!(infinity.negate().is_infinity());

        // Commutativity
        assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());

        // Associativity
        assert_eq!(
            a.add(&b).unwrap().add(&c).unwrap(),
            a.add(&b.add(&c).unwrap()).unwrap()
        );

        // Subtraction
        assert!(a.subtract(&a).unwrap().is_infinity());
        assert_eq!(a.subtract(&infinity).unwrap(), a);
    }
}

#[test]
fn test_doubling_consistency() {
    let mut rng = XorShiftRng::seed_from_u64(1231275789u64);
    for &coord in &COORDS {
        let curve = p256(coord);
        let g = p256_generator(&curve);
        let order = curve.order().unwrap().clone();
        let p = g.multiply(&random_scalar(&mut rng, &order)).unwrap();
        let q = g.multiply(&random_scalar(&mut rng, &order)).unwrap();

        let doubled = p.twice().unwrap();
        assert_eq!(p.add(&p.clone()).unwrap(), doubled);

        let tripled = p.three_times().unwrap();
        assert_eq!(doubled.add(&p).unwrap(), tripled);
        assert_eq!(p.twice_plus(&p).unwrap(), tripled);
        assert_eq!(p.twice_plus(&p.clone()).unwrap(), tripled);

        // twice_plus against its definition
        assert_eq!(p.twice_plus(&q).unwrap(), doubled.add(&q).unwrap());
    }
}

#[test]
fn test_twice_plus_special_cases() {
    for &coord in &COORDS {
        let curve = p256(coord);
        let g = p256_generator(&curve);
        // b == -p, so 2p + b == p.
        assert_eq!(g.twice_plus(&g.negate()).unwrap(), g);
        // b == -(2p), so 2p + b is the point at infinity.
        let minus_2g = g.twice().unwrap().negate();
        assert!(g.twice_plus(&minus_2g).unwrap().is_infinity());
    }
}

#[test]
fn test_co_z_jacobian_addition() {
    // Two Jacobian points sharing a non-trivial Z coordinate take the co-Z
    // shortcut; the sum must still match the affine result.
    let curve = p256(CoordinateSystem::Jacobian);
    let g = p256_generator(&curve);
    let two_g = g.twice().unwrap().normalize().unwrap();

    let z = curve.from_biguint(&BigUint::from(12345u32)).unwrap();
    let z_squared = z.square();
    let z_cubed = z_squared.mul(&z);
    let scale = |p: &Point| {
        let q = p.as_fp().unwrap();
        let x = q.x_coord().unwrap().mul(&z_squared);
        let y = q.y_coord().unwrap().mul(&z_cubed);
        Point::Fp(
            curve
                .create_raw_point(Some(x), Some(y), vec![z.clone()], false)
                .unwrap(),
        )
    };

    let p = scale(&g);
    let q = scale(&two_g);
    assert_eq!(p, g);
    assert_eq!(p.add(&q).unwrap(), g.three_times().unwrap());
    // Shared-Z operands that are opposite still cancel to infinity.
    assert!(p.add(&scale(&g.negate())).unwrap().is_infinity());
    // Shared-Z operands that are equal fall back to doubling.
    assert_eq!(p.add(&scale(&g.clone())).unwrap(), two_g);
}

#[test]
fn test_scalar_consistency() {
    for &coord in &COORDS {
        let curve = p256(coord);
        let g = p256_generator(&curve);
        let n = curve.order().unwrap().clone();
        let infinity = Curve::Fp(curve.clone()).infinity();

        assert!(g.multiply(&BigUint::from(0u32)).unwrap().is_infinity());
        assert_eq!(g.multiply(&BigUint::one()).unwrap(), g);
        assert!(g.multiply(&n).unwrap().is_infinity());
        assert_eq!(g.multiply(&(&n - 1u32)).unwrap(), g.negate());

        // Infinity is idempotent under every operation.
        assert!(infinity.add(&infinity).unwrap().is_infinity());
        assert!(infinity.twice().unwrap().is_infinity());
        assert!(infinity.multiply(&n).unwrap().is_infinity());
        assert!(g.add(&g.negate()).unwrap().is_infinity());

        // e repeated doublings match multiplication by 2^e.
        let expected = g.multiply(&BigUint::from(32u32)).unwrap();
        assert_eq!(g.times_pow2(5).unwrap(), expected);
    }
}

#[test]
fn test_times_pow2_rejects_negative() {
    let curve = p256(CoordinateSystem::Jacobian);
    let g = p256_generator(&curve);
    match g.times_pow2(-1) {
        Err(PointError::InvalidArgument(_)) => {}
        other => panic!("expected InvalidArgument, got {:?}", other),
    }
}

#[test]
fn test_encoding() {
    let curve = p256(CoordinateSystem::JacobianModified);
    let g = p256_generator(&curve);
    let wrapped = Curve::Fp(curve.clone());

    let compressed = g.get_encoded(true).unwrap();
    assert_eq!(compressed.len(), 33);
    assert!(compressed[0] == 0x02 || compressed[0] == 0x03);

    let uncompressed = g.get_encoded(false).unwrap();
    assert_eq!(uncompressed.len(), 65);
    assert_eq!(uncompressed[0], 0x04);

    let infinity = wrapped.infinity();
    assert_eq!(infinity.get_encoded(true).unwrap(), vec![0u8]);
    assert_eq!(infinity.get_encoded(false).unwrap(), vec![0u8]);

    // Round trips, compressed and uncompressed, and for infinity.
    assert_eq!(wrapped.decode_point(&uncompressed).unwrap(), g);
    assert_eq!(wrapped.decode_point(&compressed).unwrap(), g);
    assert!(wrapped.decode_point(&[0u8]).unwrap().is_infinity());

    // A negated point flips the parity byte.
    let neg_compressed = g.negate().get_encoded(true).unwrap();
    assert_ne!(neg_compressed[0], compressed[0]);
    assert_eq!(neg_compressed[1..], compressed[1..]);
}

#[test]
fn test_decode_rejects_malformed_encodings() {
    let jacobian = p256(CoordinateSystem::Jacobian);
    let curve = Curve::Fp(jacobian.clone());
    let g = p256_generator(&jacobian);
    let mut uncompressed = g.get_encoded(false).unwrap();

    // Unknown leading byte.
    let mut hybrid = uncompressed.clone();
    hybrid[0] = 0x06;
    assert_eq!(curve.decode_point(&hybrid), Err(PointError::InvalidEncoding));

    // Length mismatches.
    assert_eq!(curve.decode_point(&[]), Err(PointError::InvalidEncoding));
    assert_eq!(
        curve.decode_point(&uncompressed[..33]),
        Err(PointError::InvalidEncoding)
    );
    assert_eq!(
        curve.decode_point(&[0u8, 0u8]),
        Err(PointError::InvalidEncoding)
    );

    // A tampered y coordinate no longer satisfies the curve equation.
    let last = uncompressed.len() - 1;
    uncompressed[last] ^= 1;
    assert_eq!(
        curve.decode_point(&uncompressed),
        Err(PointError::InvariantViolation)
    );
}

#[test]
fn test_batch_normalization() {
    let curve = p256(CoordinateSystem::Jacobian);
    let g = p256_generator(&curve);
    let wrapped = Curve::Fp(curve.clone());

    let mut points = Vec::new();
    for k in 1u32..=10 {
        points.push(g.multiply(&BigUint::from(k)).unwrap());
    }
    // Mix in points that must be skipped.
    points.push(wrapped.infinity());
    points.push(g.clone());
    assert!(!points[1].is_normalized());
    assert!(!points[2].is_normalized());

    let individually: Vec<Point> = points.iter().map(|p| p.normalize().unwrap()).collect();

    let mut batch = points.clone();
    INVERSION_COUNT.with(|c| c.set(0));
    wrapped.normalize_all(&mut batch).unwrap();
    INVERSION_COUNT.with(|c| assert_eq!(c.get(), 1));

    for (a, b) in batch.iter().zip(individually.iter()) {
        assert!(a.is_normalized());
        assert_eq!(a, b);
        if !a.is_infinity() {
            assert_eq!(
                a.affine_x_coord().unwrap(),
                b.affine_x_coord().unwrap()
            );
        }
    }

    // A fully normalized input performs no inversion at all.
    INVERSION_COUNT.with(|c| c.set(0));
    wrapped.normalize_all(&mut batch).unwrap();
    INVERSION_COUNT.with(|c| assert_eq!(c.get(), 0));
}

#[test]
fn test_normalize_is_idempotent() {
    let curve = p256(CoordinateSystem::JacobianModified);
    let g = p256_generator(&curve);
    let p = g.multiply(&BigUint::from(5u32)).unwrap();
    assert!(!p.is_normalized());
    let n = p.normalize().unwrap();
    assert!(n.is_normalized());
    let nn = n.normalize().unwrap();
    assert!(nn.is_normalized());
    assert_eq!(n, nn);
    assert_eq!(n.affine_x_coord().unwrap(), nn.affine_x_coord().unwrap());
}

#[test]
fn test_affine_accessors_require_normalization() {
    let curve = p256(CoordinateSystem::Jacobian);
    let g = p256_generator(&curve);
    let p = g.twice().unwrap();
    assert!(!p.is_normalized());
    assert_eq!(p.affine_x_coord(), Err(PointError::NotNormalized));
    assert_eq!(p.affine_y_coord(), Err(PointError::NotNormalized));
    assert!(p.normalize().unwrap().affine_x_coord().is_ok());
}

#[test]
fn test_curve_mismatch() {
    let curve = p256(CoordinateSystem::Jacobian);
    let g = p256_generator(&curve);
    let other = secp256k1_generator();
    assert_eq!(g.add(&other), Err(PointError::CurveMismatch));
    assert_eq!(g.subtract(&other), Err(PointError::CurveMismatch));
    assert_ne!(g, other);
    // Infinities of different curves are distinct.
    let inf1 = Curve::Fp(curve).infinity();
    let inf2 = other.curve().infinity();
    assert_ne!(inf1, inf2);
}

#[test]
fn test_structurally_equal_curves_are_interchangeable() {
    // The same parameters configured with different coordinate systems
    // produce interchangeable points.
    let affine = p256(CoordinateSystem::Affine);
    let jacobian = p256(CoordinateSystem::Jacobian);
    assert_eq!(Curve::Fp(affine.clone()), Curve::Fp(jacobian.clone()));

    let a = p256_generator(&affine).twice().unwrap();
    let b = p256_generator(&jacobian);
    let sum = a.add(&b).unwrap();
    assert_eq!(sum, b.three_times().unwrap());

    let imported = Curve::Fp(affine).import_point(&b).unwrap();
    assert_eq!(imported, b);
    assert_eq!(
        imported.curve().coordinate_system(),
        CoordinateSystem::Affine
    );
}

#[test]
fn test_unsupported_coordinate_systems() {
    let curve = p256(CoordinateSystem::Affine);
    for &coord in &[
        CoordinateSystem::JacobianChudnovsky,
        CoordinateSystem::LambdaAffine,
        CoordinateSystem::LambdaProjective,
    ] {
        match curve.configure(coord) {
            Err(PointError::UnsupportedCoordinateSystem(_)) => {}
            other => panic!("expected UnsupportedCoordinateSystem, got {:?}", other),
        }
    }
}

#[test]
fn test_create_raw_point_rejects_half_infinity() {
    let curve = p256(CoordinateSystem::Jacobian);
    let x = curve.from_biguint(&BigUint::from(5u32)).unwrap();
    match curve.create_raw_point(Some(x), None, vec![], false) {
        Err(PointError::InvalidArgument(_)) => {}
        other => panic!("expected InvalidArgument, got {:?}", other),
    }
}

#[test]
fn test_field_sqrt() {
    // A modulus with p = 1 (mod 4) exercises the general Tonelli-Shanks path.
    let field = Arc::new(FpField::new(BigUint::from(13u32)).unwrap());
    let qr = field.element(BigUint::from(10u32)).unwrap();
    let root = qr.sqrt().unwrap();
    assert_eq!(root.square(), qr);
    let non_residue = field.element(BigUint::from(2u32)).unwrap();
    assert!(non_residue.sqrt().is_none());

    assert_eq!(
        field.element(BigUint::from(0u32)).unwrap().invert(),
        Err(FieldError::DivisionByZero)
    );
}

#[test]
fn test_batch_inversion_matches_individual_inverts() {
    let field = Arc::new(FpField::new(BigUint::from(1009u32)).unwrap());
    let mut elements: Vec<_> = (1u32..8)
        .map(|v| field.element(BigUint::from(v * 17 % 1009)).unwrap())
        .collect();
    elements.push(field.element(BigUint::from(0u32)).unwrap());

    let expected: Vec<_> = elements
        .iter()
        .map(|e| if e.is_zero() { e.clone() } else { e.invert().unwrap() })
        .collect();

    batch_inversion(&mut elements).unwrap();
    assert_eq!(elements, expected);
}

#[derive(Debug)]
struct TestPreComp(u32);

impl PreCompInfo for TestPreComp {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn test_precomp_slot_does_not_survive_new_instances() {
    let curve = p256(CoordinateSystem::Jacobian);
    let g = p256_generator(&curve);
    assert!(g.precomp().is_empty());
    g.precomp().insert("test", Arc::new(TestPreComp(42)));

    let info = g.precomp().get("test").unwrap();
    let downcast = info.as_any().downcast_ref::<TestPreComp>().unwrap();
    assert_eq!(downcast.0, 42);

    // Any new instance starts with an empty slot.
    assert!(g.clone().precomp().is_empty());
    assert!(g.twice().unwrap().precomp().is_empty());
    assert!(g.negate().precomp().is_empty());
}

#[test]
fn test_hash_agrees_across_representations() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let hash_of = |p: &Point| {
        let mut hasher = DefaultHasher::new();
        p.hash(&mut hasher);
        hasher.finish()
    };

    let k = BigUint::from(9u32);
    let a = p256_generator(&p256(CoordinateSystem::Affine))
        .multiply(&k)
        .unwrap();
    let b = p256_generator(&p256(CoordinateSystem::JacobianModified))
        .multiply(&k)
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}
