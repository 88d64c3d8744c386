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

use crate::curves::FieldError;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointError {
    #[error("{0}: {1}")]
    Crate(&'static str, String),

    #[error("Attempting to combine points on different curves")]
    CurveMismatch,

    #[error("{0}")]
    FieldError(FieldError),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Attempting to decode an invalid point encoding")]
    InvalidEncoding,

    #[error("Point does not satisfy the curve equation")]
    InvariantViolation,

    #[error("{0}")]
    Message(String),

    #[error("Affine coordinates requested from a point that is not normalized")]
    NotNormalized,

    #[error("The {0} coordinate system is not supported here")]
    UnsupportedCoordinateSystem(&'static str),
}

impl From<FieldError> for PointError {
    fn from(error: FieldError) -> Self {
        PointError::FieldError(error)
    }
}

impl From<std::io::Error> for PointError {
    fn from(error: std::io::Error) -> Self {
        PointError::Crate("std::io", format!("{:?}", error))
    }
}

impl From<PointError> for std::io::Error {
    fn from(error: PointError) -> Self {
        std::io::Error::new(std::io::ErrorKind::Other, format!("{}", error))
    }
}
