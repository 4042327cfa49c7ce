//! Host screen lifecycle around a [`FetchWorkflow`].
//!
//! The map widget's own lifecycle is opaque: [`Screen`] only forwards
//! resume, pause and destroy to it. Destroying the screen also cancels the
//! in-flight request so a late response never reaches the sinks.

use std::cell::RefCell;

use tokio_util::sync::CancellationToken;

use crate::{Collaborators, FetchWorkflow, Outcome};

/// Lifecycle hooks of the external map widget.
pub trait MapLifecycle {
    /// The screen became visible again.
    fn resume(&mut self);
    /// The screen is no longer in the foreground.
    fn pause(&mut self);
    /// The screen is being torn down.
    fn detach(&mut self);
}

/// A single map screen: one workflow, one in-flight request at a time.
#[derive(Debug)]
pub struct Screen<L> {
    workflow: FetchWorkflow,
    lifecycle: RefCell<L>,
    cancel: CancellationToken,
}

impl<L: MapLifecycle> Screen<L> {
    /// Bind `workflow` to the widget lifecycle `lifecycle`.
    pub fn new(workflow: FetchWorkflow, lifecycle: L) -> Self {
        Self {
            workflow,
            lifecycle: RefCell::new(lifecycle),
            cancel: CancellationToken::new(),
        }
    }

    /// Run the workflow for this screen load.
    ///
    /// Returns [`Outcome::Cancelled`] once the screen has been destroyed.
    pub async fn load(&self, collaborators: &mut Collaborators<'_>) -> Outcome {
        self.workflow.run(collaborators, &self.cancel).await
    }

    /// Forward a resume to the widget.
    pub fn resume(&self) {
        self.lifecycle.borrow_mut().resume();
    }

    /// Forward a pause to the widget.
    pub fn pause(&self) {
        self.lifecycle.borrow_mut().pause();
    }

    /// Cancel any in-flight request and detach the widget.
    pub fn destroy(&self) {
        if !self.cancel.is_cancelled() {
            log::debug!("screen destroyed, cancelling in-flight request");
            self.cancel.cancel();
        }
        self.lifecycle.borrow_mut().detach();
    }

    /// Whether [`Screen::destroy`] has been called.
    pub fn is_destroyed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The configured workflow.
    pub const fn workflow(&self) -> &FetchWorkflow {
        &self.workflow
    }

    /// Consume the screen and return the widget lifecycle handle.
    pub fn into_lifecycle(self) -> L {
        self.lifecycle.into_inner()
    }
}
