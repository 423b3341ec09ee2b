//! Readiness state machine
//!
//! A glass surface becomes visible only after two independent signals have
//! both arrived at least once:
//!
//! - the container was laid out with a non-zero size
//! - the filter asset reported that it attached
//!
//! ```text
//!   Unmeasured ──measured──► Measured ──asset──► Ready
//!       │ asset                                   ▲
//!       ▼                                         │
//!   Unmeasured{asset_attached} ────measured───────┘
//! ```
//!
//! No transition leaves `Ready`. Resizes after that only update the stored
//! dimensions. If the asset never attaches the surface stays on its fallback
//! presentation for good, which is not treated as an error.

use smallvec::SmallVec;

use crate::filter::Dimensions;

/// Phase of the readiness machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadinessPhase {
    /// No non-zero size seen yet. Records whether the asset already attached.
    Unmeasured { asset_attached: bool },
    /// Size known, asset not attached yet
    Measured,
    /// Both signals arrived (terminal)
    Ready,
}

impl Default for ReadinessPhase {
    fn default() -> Self {
        Self::Unmeasured {
            asset_attached: false,
        }
    }
}

/// Signals fed into the machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadinessSignal {
    /// Container observed with width and height both > 0
    ContainerMeasured,
    /// Filter asset fired its load signal
    AssetAttached,
}

/// Flag view of the machine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadinessState {
    pub container_measured: bool,
    pub asset_attached: bool,
}

impl ReadinessState {
    pub fn visible(&self) -> bool {
        self.container_measured && self.asset_attached
    }
}

impl From<ReadinessPhase> for ReadinessState {
    fn from(phase: ReadinessPhase) -> Self {
        match phase {
            ReadinessPhase::Unmeasured { asset_attached } => Self {
                container_measured: false,
                asset_attached,
            },
            ReadinessPhase::Measured => Self {
                container_measured: true,
                asset_attached: false,
            },
            ReadinessPhase::Ready => Self {
                container_measured: true,
                asset_attached: true,
            },
        }
    }
}

/// Callback fired when the machine enters `Ready`
pub type ReadyCallback = Box<dyn FnMut() + Send>;

/// Per-instance readiness coordinator
pub struct ReadinessCoordinator {
    phase: ReadinessPhase,
    dimensions: Dimensions,
    /// History of phase changes (for debugging)
    history: SmallVec<[(ReadinessPhase, ReadinessSignal, ReadinessPhase); 2]>,
    on_ready: Vec<ReadyCallback>,
}

impl ReadinessCoordinator {
    pub fn new() -> Self {
        Self {
            phase: ReadinessPhase::default(),
            dimensions: Dimensions::ZERO,
            history: SmallVec::new(),
            on_ready: Vec::new(),
        }
    }

    pub fn phase(&self) -> ReadinessPhase {
        self.phase
    }

    pub fn state(&self) -> ReadinessState {
        self.phase.into()
    }

    pub fn is_ready(&self) -> bool {
        self.phase == ReadinessPhase::Ready
    }

    /// Whether consumers should keep the plain presentation up
    pub fn should_show_fallback(&self) -> bool {
        !self.is_ready()
    }

    /// Most recently observed container size
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Phase changes so far, oldest first
    pub fn history(&self) -> &[(ReadinessPhase, ReadinessSignal, ReadinessPhase)] {
        &self.history
    }

    /// Register a callback for entering `Ready`.
    ///
    /// Runs immediately when the machine is already ready.
    pub fn on_ready<F: FnMut() + Send + 'static>(&mut self, mut callback: F) {
        if self.is_ready() {
            callback();
        } else {
            self.on_ready.push(Box::new(callback));
        }
    }

    /// Record a layout observation.
    ///
    /// Returns true when the stored dimensions changed. Only a size with both
    /// axes > 0 counts as the container being measured.
    pub fn observe_size(&mut self, dimensions: Dimensions) -> bool {
        let changed = dimensions != self.dimensions;
        self.dimensions = dimensions;

        if dimensions.is_nonzero() {
            self.send(ReadinessSignal::ContainerMeasured);
        }
        changed
    }

    /// Record the filter asset's load signal
    pub fn attach_asset(&mut self) {
        self.send(ReadinessSignal::AssetAttached);
    }

    /// Feed a signal. Signals with no transition from the current phase are
    /// ignored.
    pub fn send(&mut self, signal: ReadinessSignal) -> ReadinessPhase {
        use ReadinessPhase::*;
        use ReadinessSignal::*;

        let current = self.phase;
        let next = match (current, signal) {
            (Unmeasured { asset_attached: false }, ContainerMeasured) => Measured,
            (Unmeasured { asset_attached: true }, ContainerMeasured) => Ready,
            (Unmeasured { asset_attached: false }, AssetAttached) => Unmeasured {
                asset_attached: true,
            },
            (Measured, AssetAttached) => Ready,
            _ => return current,
        };

        self.phase = next;
        self.history.push((current, signal, next));
        tracing::debug!("readiness {:?} --{:?}--> {:?}", current, signal, next);

        if next == Ready {
            for mut callback in self.on_ready.drain(..) {
                callback();
            }
        }
        next
    }
}

impl Default for ReadinessCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReadinessCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessCoordinator")
            .field("phase", &self.phase)
            .field("dimensions", &self.dimensions)
            .field("pending_callbacks", &self.on_ready.len())
            .finish()
    }
}
