/// Two-step confirmation of a destructive action.
///
/// `Idle -> Armed(target)` on request, back to `Idle` on cancel or once the
/// action is taken. Nothing is sent while armed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation<T> {
    Idle,
    Armed(T),
}

impl<T> Default for Confirmation<T> {
    fn default() -> Self {
        Confirmation::Idle
    }
}

impl<T> Confirmation<T> {
    pub fn arm(&mut self, target: T) {
        *self = Confirmation::Armed(target);
    }

    pub fn cancel(&mut self) {
        *self = Confirmation::Idle;
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, Confirmation::Armed(_))
    }

    pub fn pending(&self) -> Option<&T> {
        match self {
            Confirmation::Armed(target) => Some(target),
            Confirmation::Idle => None,
        }
    }

    /// Confirm: hand out the target and return to idle.
    pub fn take(&mut self) -> Option<T> {
        match std::mem::take(self) {
            Confirmation::Armed(target) => Some(target),
            Confirmation::Idle => None,
        }
    }
}
