//! Fixture Lifecycle
//!
//! A fixture is per-case state that is set up once, shared by every repetition
//! of the case body, and torn down once when the case ends.
//!
//! ```text
//! Uninitialized ─▶ SetupRunning ─▶ Ready ⇄ BodyRunning
//!                        │           │
//!                        └───────────┴──▶ TeardownRunning ─▶ Done
//! ```
//!
//! Teardown is tied to [`FixtureSlot`]'s `Drop`, so it also runs when setup
//! fails or the body panics.

use crate::CaseError;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// State shared across the repetitions of a fixture-based benchmark.
///
/// The harness creates the value with [`Default`], calls [`setup`](Fixture::setup)
/// once, hands `&mut Self` to the body for every repetition, then calls
/// [`teardown`](Fixture::teardown) once.
///
/// ```ignore
/// #[derive(Default)]
/// struct Haystack {
///     data: Vec<u8>,
/// }
///
/// impl Fixture for Haystack {
///     fn setup(&mut self) -> anyhow::Result<()> {
///         self.data = vec![b' '; 1 << 20];
///         Ok(())
///     }
///
///     fn teardown(&mut self) -> anyhow::Result<()> {
///         self.data = Vec::new();
///         Ok(())
///     }
/// }
/// ```
pub trait Fixture: Default + 'static {
    /// Acquire resources. Runs once, before any repetition of the body.
    fn setup(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Release resources acquired by `setup`. Runs once, after the last
    /// repetition, and also after a failed setup.
    fn teardown(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Lifecycle phase of a fixture slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixturePhase {
    /// Default-constructed, setup not yet started
    Uninitialized,
    /// `Fixture::setup` in progress (or it failed)
    SetupRunning,
    /// Set up and idle between body invocations
    Ready,
    /// Case body currently borrows the state
    BodyRunning,
    /// `Fixture::teardown` in progress (or it panicked)
    TeardownRunning,
    /// Torn down
    Done,
}

/// Owned fixture state with guaranteed teardown
pub struct FixtureSlot<F: Fixture> {
    state: F,
    phase: FixturePhase,
}

impl<F: Fixture> FixtureSlot<F> {
    /// Allocate a default-initialized fixture
    pub fn new() -> Self {
        Self {
            state: F::default(),
            phase: FixturePhase::Uninitialized,
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> FixturePhase {
        self.phase
    }

    /// Shared access to the fixture state
    pub fn state(&self) -> &F {
        &self.state
    }

    /// Run `Fixture::setup`
    pub fn setup(&mut self) -> Result<(), CaseError> {
        debug_assert_eq!(self.phase, FixturePhase::Uninitialized);
        self.phase = FixturePhase::SetupRunning;
        self.state
            .setup()
            .map_err(|e| CaseError::Setup(format!("{e:#}")))?;
        self.phase = FixturePhase::Ready;
        Ok(())
    }

    /// Lend the state to one invocation of the case body
    #[inline]
    pub fn with_body<R>(&mut self, body: impl FnOnce(&mut F) -> R) -> R {
        self.phase = FixturePhase::BodyRunning;
        let output = body(&mut self.state);
        self.phase = FixturePhase::Ready;
        output
    }

    /// Run `Fixture::teardown` if setup was attempted and teardown has not run yet
    pub fn teardown(&mut self) -> Result<(), CaseError> {
        if matches!(
            self.phase,
            FixturePhase::Uninitialized | FixturePhase::TeardownRunning | FixturePhase::Done
        ) {
            return Ok(());
        }

        self.phase = FixturePhase::TeardownRunning;
        let result = self.state.teardown();
        self.phase = FixturePhase::Done;
        result.map_err(|e| CaseError::Teardown(format!("{e:#}")))
    }
}

impl<F: Fixture> Default for FixtureSlot<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Fixture> Drop for FixtureSlot<F> {
    fn drop(&mut self) {
        if matches!(
            self.phase,
            FixturePhase::Uninitialized | FixturePhase::TeardownRunning | FixturePhase::Done
        ) {
            return;
        }

        // A second panic while unwinding would abort the whole run
        if std::thread::panicking() {
            match catch_unwind(AssertUnwindSafe(|| self.teardown())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("fixture teardown after panic failed: {e}"),
                Err(_) => tracing::warn!("fixture teardown panicked while unwinding"),
            }
        } else if let Err(e) = self.teardown() {
            tracing::warn!("fixture teardown failed: {e}");
        }
    }
}

/// Bracket `run` with one setup/teardown pair.
///
/// On setup failure teardown still runs (the state is always a valid value),
/// and the setup error is returned. A teardown failure after a successful run
/// is returned as [`CaseError::Teardown`].
pub fn run_with_fixture<F, R>(run: impl FnOnce(&mut FixtureSlot<F>) -> R) -> Result<R, CaseError>
where
    F: Fixture,
{
    let mut slot = FixtureSlot::<F>::new();

    if let Err(setup_err) = slot.setup() {
        if let Err(teardown_err) = slot.teardown() {
            tracing::warn!("teardown after failed setup also failed: {teardown_err}");
        }
        return Err(setup_err);
    }

    let output = run(&mut slot);
    slot.teardown()?;
    Ok(output)
}
