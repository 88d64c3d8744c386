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

pub mod curve;
pub use curve::*;

pub mod field;
pub use field::*;

pub mod point;
pub use point::*;
