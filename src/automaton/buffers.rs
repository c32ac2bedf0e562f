//! Double-buffered cell storage.
//!
//! `current` is the buffer the update kernel writes; it is lent out by value
//! while an update is in flight. `previous` is an immutable snapshot shared
//! with every reader (update kernel, alive counter, external views) through an
//! `Arc`. It can only be overwritten once no reader holds it.

use std::sync::Arc;

use super::grid::Dimensions;
use crate::error::ConfigError;

pub struct GridBuffers {
    dims: Dimensions,
    current: Option<Vec<u8>>,
    previous: Arc<[u8]>,
}

impl GridBuffers {
    /// Both buffers start as a copy of `cells`.
    pub fn new(dims: Dimensions, cells: Vec<u8>) -> Result<Self, ConfigError> {
        if cells.len() != dims.cell_count() {
            return Err(ConfigError::CellCountMismatch {
                expected: dims.cell_count(),
                got: cells.len(),
            });
        }
        let cells: Vec<u8> = cells.into_iter().map(|c| u8::from(c != 0)).collect();
        let previous = Arc::from(cells.as_slice());
        Ok(GridBuffers {
            dims,
            current: Some(cells),
            previous,
        })
    }

    /// All-dead grid.
    pub fn zeroed(dims: Dimensions) -> Self {
        let cells = vec![0; dims.cell_count()];
        GridBuffers {
            dims,
            previous: Arc::from(cells.as_slice()),
            current: Some(cells),
        }
    }

    pub fn dims(&self) -> &Dimensions {
        &self.dims
    }

    pub fn len(&self) -> usize {
        self.previous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }

    /// True while the update kernel holds `current`.
    pub fn is_current_lent(&self) -> bool {
        self.current.is_none()
    }

    /// The buffer being produced this generation.
    ///
    /// # Panics
    /// While an update is in flight.
    pub fn current(&self) -> &[u8] {
        self.current
            .as_deref()
            .expect("current buffer read while an update is in flight")
    }

    /// The settled snapshot neighbors are evaluated against.
    pub fn previous(&self) -> &[u8] {
        &self.previous
    }

    /// Shared handle to the settled snapshot, for scheduled readers.
    pub fn snapshot(&self) -> Arc<[u8]> {
        Arc::clone(&self.previous)
    }

    /// State of one cell in `current`.
    pub fn read(&self, index: usize) -> u8 {
        self.current()[index]
    }

    /// Set one cell in `current`. Non-zero values store as alive.
    ///
    /// # Panics
    /// While an update is in flight, or if `index` is out of range.
    pub fn write(&mut self, index: usize, state: u8) {
        let current = self
            .current
            .as_mut()
            .expect("current buffer written while an update is in flight");
        current[index] = u8::from(state != 0);
    }

    /// Overwrite `previous` with the whole of `current`.
    ///
    /// # Panics
    /// If an update still holds `current` or any reader still holds the
    /// previous snapshot.
    pub fn copy_to_previous(&mut self) {
        let current = self
            .current
            .as_deref()
            .expect("copy requested while an update is still writing the current buffer");
        let previous = Arc::get_mut(&mut self.previous)
            .expect("copy requested while the previous snapshot is still being read");
        previous.copy_from_slice(current);
    }

    /// Hand `current` to an update job.
    pub(crate) fn lend_current(&mut self) -> Vec<u8> {
        self.current
            .take()
            .expect("current buffer lent twice without being returned")
    }

    /// Take `current` back from a completed update job.
    pub(crate) fn return_current(&mut self, current: Vec<u8>) {
        assert!(
            self.current.is_none(),
            "current buffer returned while it was not lent"
        );
        assert_eq!(current.len(), self.len(), "returned buffer changed size");
        self.current = Some(current);
    }
}
