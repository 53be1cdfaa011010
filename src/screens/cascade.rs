use tracing::debug;

use crate::models::Keyed;

/// Proof of which parent a dependent-list fetch was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    parent: i64,
}

impl LoadTicket {
    pub fn parent(&self) -> i64 {
        self.parent
    }
}

/// Options that depend on another selection (courses of a department).
///
/// A response is applied only while its parent is still the selected one,
/// so a slow answer for an earlier parent never overwrites a newer choice.
#[derive(Debug, Clone)]
pub struct DependentOptions<T> {
    parent: Option<i64>,
    options: Vec<T>,
    loading: bool,
    enabled: bool,
}

impl<T> Default for DependentOptions<T> {
    fn default() -> Self {
        Self {
            parent: None,
            options: Vec::new(),
            loading: false,
            enabled: false,
        }
    }
}

impl<T: Keyed> DependentOptions<T> {
    pub fn parent(&self) -> Option<i64> {
        self.parent
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The dependent field accepts input only once options for the parent arrived.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn contains(&self, id: i64) -> bool {
        self.options.iter().any(|o| o.key() == id)
    }

    pub fn find(&self, id: i64) -> Option<&T> {
        self.options.iter().find(|o| o.key() == id)
    }

    /// Change the parent. Clears and disables the options; returns a ticket
    /// when a fetch must start. Re-selecting a parent already loading or
    /// loaded is a no-op.
    pub fn select_parent(&mut self, parent: Option<i64>) -> Option<LoadTicket> {
        if parent.is_some() && parent == self.parent && (self.loading || self.enabled) {
            return None;
        }

        self.parent = parent;
        self.options.clear();
        self.enabled = false;
        self.loading = parent.is_some();
        parent.map(|parent| LoadTicket { parent })
    }

    /// Apply fetched options. Returns `false` and changes nothing when the ticket is stale.
    pub fn apply(&mut self, ticket: LoadTicket, options: Vec<T>) -> bool {
        if self.parent != Some(ticket.parent) {
            debug!("Discarding options for stale parent {}", ticket.parent);
            return false;
        }
        self.options = options;
        self.loading = false;
        self.enabled = !self.options.is_empty();
        true
    }

    /// Fetch failed; the field stays disabled.
    pub fn fail(&mut self, ticket: LoadTicket) {
        if self.parent == Some(ticket.parent) {
            self.loading = false;
            self.enabled = false;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A list fetched on first need and then kept.
#[derive(Debug, Clone)]
pub struct LazyOptions<T> {
    items: Vec<T>,
    loaded: bool,
    loading: bool,
}

impl<T> Default for LazyOptions<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
            loading: false,
        }
    }
}

impl<T> LazyOptions<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the caller should start the fetch now.
    pub fn begin(&mut self) -> bool {
        if self.loaded || self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    pub fn finish(&mut self, items: Vec<T>) {
        self.items = items;
        self.loaded = true;
        self.loading = false;
    }

    pub fn fail(&mut self) {
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, CourseType};

    fn course(id: i64) -> Course {
        Course {
            id,
            name: format!("Corso {id}"),
            course_type: CourseType::Triennale,
            department: None,
        }
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut courses = DependentOptions::default();

        let ticket_a = courses.select_parent(Some(1)).unwrap();
        let ticket_b = courses.select_parent(Some(2)).unwrap();

        assert!(courses.apply(ticket_b, vec![course(20)]));
        assert!(!courses.apply(ticket_a, vec![course(10)]));

        assert_eq!(courses.parent(), Some(2));
        assert!(courses.contains(20));
        assert!(!courses.contains(10));
        assert!(courses.is_enabled());
    }

    #[test]
    fn reselecting_loading_parent_does_not_refetch() {
        let mut courses: DependentOptions<Course> = DependentOptions::default();
        assert!(courses.select_parent(Some(1)).is_some());
        assert!(courses.select_parent(Some(1)).is_none());
        assert!(courses.is_loading());
    }

    #[test]
    fn empty_or_failed_keeps_field_disabled() {
        let mut courses: DependentOptions<Course> = DependentOptions::default();
        let t = courses.select_parent(Some(3)).unwrap();
        courses.apply(t, vec![]);
        assert!(!courses.is_enabled());

        let t = courses.select_parent(Some(4)).unwrap();
        courses.fail(t);
        assert!(!courses.is_loading());
        assert!(courses.select_parent(None).is_none());
        assert!(!courses.is_enabled());
    }

    #[test]
    fn lazy_options_load_once() {
        let mut opts: LazyOptions<u8> = LazyOptions::default();
        assert!(opts.begin());
        assert!(!opts.begin());
        opts.finish(vec![1, 2]);
        assert!(!opts.begin());
        assert_eq!(opts.items(), &[1, 2]);
    }
}
