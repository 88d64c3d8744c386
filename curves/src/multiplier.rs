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

use crate::point::Point;
use weierstrass_errors::curves::PointError;
use weierstrass_models::curves::PreCompInfo;

use num_bigint::BigUint;
use num_traits::Zero;
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

/// A scalar-multiplication strategy. Implementations use only the public
/// point operations.
pub trait EcMultiplier {
    /// Computes `k * p`.
    fn multiply(&self, p: &Point, k: &BigUint) -> Result<Point, PointError>;
}

/// Most-significant-bit-first double-and-add. The reference multiplier;
/// windowed strategies plug in through the same trait and may stash their
/// tables in the point's precomputation slot.
#[derive(Clone, Copy, Debug, Default)]
pub struct DoubleAndAddMultiplier;

impl EcMultiplier for DoubleAndAddMultiplier {
    fn multiply(&self, p: &Point, k: &BigUint) -> Result<Point, PointError> {
        if k.is_zero() || p.is_infinity() {
            return Ok(p.curve().infinity());
        }
        let mut res = p.curve().infinity();
        for i in (0..k.bits()).rev() {
            res = res.twice()?;
            if k.bit(i) {
                res = res.add(p)?;
            }
        }
        Ok(res)
    }
}

/// The caller-owned precomputation slot carried by every point, keyed by the
/// producing multiplier. Entries are replaceable under a lock; a new point
/// instance always starts with an empty slot.
pub struct PreCompSlot {
    entries: RwLock<HashMap<&'static str, Arc<dyn PreCompInfo>>>,
}

impl PreCompSlot {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, producer: &'static str) -> Option<Arc<dyn PreCompInfo>> {
        self.entries.read().get(producer).cloned()
    }

    pub fn insert(&self, producer: &'static str, info: Arc<dyn PreCompInfo>) {
        self.entries.write().insert(producer, info);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for PreCompSlot {
    fn default() -> Self {
        Self::new()
    }
}

// Caches do not survive into new point instances.
impl Clone for PreCompSlot {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl Debug for PreCompSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "PreCompSlot({} entries)", self.entries.read().len())
    }
}
