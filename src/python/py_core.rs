//! Core type bindings for Python.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{Action, Face, PlayerId};

/// Python wrapper for PlayerId.
#[pyclass(name = "PlayerId")]
#[derive(Clone, Debug)]
pub struct PyPlayerId(pub PlayerId);

#[pymethods]
impl PyPlayerId {
    /// Create a seat id (0 or 1).
    #[new]
    fn new(id: u8) -> PyResult<Self> {
        PlayerId::try_from(id).map(Self).map_err(PyValueError::new_err)
    }

    /// Get the seat index (0-based).
    fn index(&self) -> usize {
        self.0.index()
    }

    /// The other seat.
    fn other(&self) -> Self {
        Self(self.0.other())
    }

    fn __repr__(&self) -> String {
        format!("PlayerId({})", self.0.index())
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        self.0.index() as u64
    }
}

pub(crate) fn face(value: u8) -> PyResult<Face> {
    Face::new(value).ok_or_else(|| PyValueError::new_err(format!("face value {value} outside 1..=6")))
}

/// Python wrapper for Action.
#[pyclass(name = "Action")]
#[derive(Clone, Debug)]
pub struct PyAction(pub Action);

#[pymethods]
impl PyAction {
    /// A bet of `quantity` dice showing `value`.
    #[staticmethod]
    fn bet(quantity: u32, value: u8) -> PyResult<Self> {
        if quantity == 0 {
            return Err(PyValueError::new_err("quantity must be at least 1"));
        }
        Ok(Self(Action::bet(quantity, face(value)?)))
    }

    /// A challenge of the current bet.
    #[staticmethod]
    fn challenge() -> Self {
        Self(Action::Challenge)
    }

    #[getter]
    fn is_challenge(&self) -> bool {
        self.0.is_challenge()
    }

    /// Bet quantity, or None for a challenge.
    #[getter]
    fn quantity(&self) -> Option<u32> {
        match self.0 {
            Action::Bet { quantity, .. } => Some(quantity),
            Action::Challenge => None,
        }
    }

    /// Bet face, or None for a challenge.
    #[getter]
    fn value(&self) -> Option<u8> {
        match self.0 {
            Action::Bet { value, .. } => Some(value.value()),
            Action::Challenge => None,
        }
    }

    /// JSON form, e.g. `{"action":"bet","quantity":3,"value":4}`.
    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.0).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        match self.0 {
            Action::Bet { quantity, value } => format!("Action.bet({quantity}, {value})"),
            Action::Challenge => "Action.challenge()".to_string(),
        }
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        hasher.finish()
    }
}
