//! Scenario state and runtime plumbing for the reviewer notification BDD
//! tests.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use nudger::{RunError, RunSummary};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tokio::runtime::Runtime;
use wiremock::MockServer;

/// Shared runtime wrapper that can be stored in an `rstest-bdd` Slot.
#[derive(Clone)]
pub(crate) struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    pub(crate) fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

/// Pull request number with the logins requested to review it.
pub(crate) type RequestedReviewers = (u64, Vec<String>);

#[derive(ScenarioState, Default)]
pub(crate) struct NotifyState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) pull_requests: Slot<Vec<RequestedReviewers>>,
    pub(crate) identities: Slot<Vec<(String, String)>>,
    pub(crate) failing_channels: Slot<Vec<String>>,
    pub(crate) reject_token: Slot<bool>,
    pub(crate) summary: Slot<RunSummary>,
    pub(crate) error: Slot<RunError>,
    pub(crate) messages: Slot<Vec<String>>,
    pub(crate) discord_requests: Slot<usize>,
}

/// Appends `item` to the list held in `slot`.
pub(crate) fn push<T>(slot: &Slot<Vec<T>>, item: T) {
    let mut items = slot.take().unwrap_or_default();
    items.push(item);
    slot.set(items);
}

/// Ensures a Tokio runtime and Wiremock server are initialised.
///
/// # Errors
///
/// Returns an error if the Tokio runtime cannot be created.
pub(crate) fn ensure_runtime_and_server(state: &NotifyState) -> Result<SharedRuntime, io::Error> {
    if state.runtime.with_ref(|_| ()).is_none() {
        state.runtime.set(SharedRuntime::new(Runtime::new()?));
    }

    let shared_runtime = state
        .runtime
        .get()
        .ok_or_else(|| io::Error::other("runtime not initialised after set"))?;

    if state.server.with_ref(|_| ()).is_none() {
        state.server.set(shared_runtime.block_on(MockServer::start()));
    }

    Ok(shared_runtime)
}
