//! State capability for finite-state machine states.
//!
//! A state is a set of lifecycle hooks the machine calls as it enters,
//! ticks and leaves the state. The machine only knows states by name;
//! everything a state does happens through these hooks.

/// Lifecycle hooks of a machine state.
///
/// `on_exit` of the old state is always called before `on_enter` of the
/// new one. The empty string stands for "no state" on `start` and `stop`.
///
/// # Example
///
/// ```rust
/// use agentmind::core::State;
///
/// #[derive(Default)]
/// struct Patrol {
///     ticks: i64,
/// }
///
/// impl State for Patrol {
///     fn on_update(&mut self, dt: i64) {
///         self.ticks += dt;
///     }
/// }
///
/// let mut patrol = Patrol::default();
/// patrol.on_enter("");
/// patrol.on_update(16);
/// assert_eq!(patrol.ticks, 16);
/// ```
pub trait State {
    /// Called when the machine enters this state from `from`.
    fn on_enter(&mut self, from: &str) {
        let _ = from;
    }

    /// Called once per tick while this state is current.
    fn on_update(&mut self, dt: i64) {
        let _ = dt;
    }

    /// Called when the machine leaves this state for `to`.
    fn on_exit(&mut self, to: &str) {
        let _ = to;
    }
}

impl<S: State + ?Sized> State for Box<S> {
    fn on_enter(&mut self, from: &str) {
        (**self).on_enter(from)
    }

    fn on_update(&mut self, dt: i64) {
        (**self).on_update(dt)
    }

    fn on_exit(&mut self, to: &str) {
        (**self).on_exit(to)
    }
}

/// State with no behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoopState;

impl State for NoopState {}
