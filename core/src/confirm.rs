//! Two-step removal gate.
//!
//! A `RemovalConfirmation` can only be obtained by asking the owning
//! component for one, and is consumed by the removal itself. The UI shows
//! its prompt in between; dropping the value is the "cancel" answer.

#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a removal confirmation cancels the removal"]
pub struct RemovalConfirmation<I> {
    id: I,
}

impl<I: Copy> RemovalConfirmation<I> {
    pub(crate) fn new(id: I) -> Self {
        Self { id }
    }

    /// The id the user is being asked about.
    pub fn id(&self) -> I {
        self.id
    }
}
