// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ndarray::Array1;

pub trait GlobalValue {
    /// Return the group-level value of the result.
    fn global_value(&self) -> f64;
}

pub trait LocalValues: GlobalValue {
    /// Return one value per row, `None` where the row was excluded.
    fn local_values(&self) -> Vec<Option<f64>>;

    /// Local values of the included rows only, in row order.
    fn defined_local_values(&self) -> Array1<f64> {
        self.local_values().into_iter().flatten().collect()
    }

    /// Mean of the defined local values, `None` if every row was excluded.
    fn mean_local_value(&self) -> Option<f64> {
        self.defined_local_values().mean()
    }
}

/// Cooperative cancellation, polled once at the top of every Monte-Carlo repetition.
pub trait CancelToken {
    fn is_cancelled(&self) -> bool;
}

/// Token that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelToken for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl CancelToken for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<T: CancelToken + ?Sized> CancelToken for Arc<T> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<T: CancelToken + ?Sized> CancelToken for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Adapter for a closure that reports cancellation.
pub struct CancelFn<F>(pub F);

impl<F: Fn() -> bool> CancelToken for CancelFn<F> {
    fn is_cancelled(&self) -> bool {
        (self.0)()
    }
}
