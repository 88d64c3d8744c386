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

use std::{any::Any, fmt::Debug};

/// An opaque cache of precomputed values attached to a point for
/// scalar-multiplication use.
///
/// The contents are owned and interpreted by the multiplier that produced
/// them; the point layer only stores and hands back the handle. Caches do not
/// survive into new point instances.
pub trait PreCompInfo: Any + Send + Sync + Debug {
    /// Returns `self` for downcasting by the producing multiplier.
    fn as_any(&self) -> &dyn Any;
}
