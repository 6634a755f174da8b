//! Model-View-Intent primitives.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! Reducers are pure. Side effects (persisting, broadcasting, fetching)
//! live in the view that drives the reducer.

/// Marker trait for view state.
///
/// States are replaced, never edited (Clone to produce the next one) and
/// comparable so a view can tell whether anything changed.
pub trait ViewState: Clone + PartialEq + Default + Send + 'static {}

/// Marker trait for intents: user actions or system events.
pub trait Intent: Send + 'static {}

/// Transforms state based on intents: `(State, Intent) -> State`.
pub trait Reducer {
    type State: ViewState;

    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
