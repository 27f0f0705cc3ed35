//! Scoped replacement of shared bindings.
//!
//! Code under test reads collaborators through a [`Binding`] instead of a
//! hard-wired value. Tests swap the bound value with [`replace_binding`],
//! which returns a [`PatchGuard`] recording the original. The original comes
//! back when the guard is restored or dropped.
//!
//! [`ReplacementScope`] ties replacements to a test lifecycle: entries
//! registered with [`ReplacementScope::replace_before_each`] are applied by
//! [`before_each`](ReplacementScope::before_each) and restored by
//! [`after_each`](ReplacementScope::after_each), and likewise for the
//! `before_all` / `after_all` pair.
//!
//! # Limitation
//!
//! Restoration runs only when a guard is dropped or a scope reaches its
//! `after_*` hook. If the test process aborts first (for example with
//! `panic = "abort"` or a killed runner thread that leaks its guards), later
//! readers keep observing the replaced value.
//!
//! # Example
//!
//! ```rust
//! use std::sync::LazyLock;
//! use mockwright::replace::{replace_binding, Binding};
//!
//! static GREETING: LazyLock<Binding<String>> =
//!     LazyLock::new(|| Binding::new("hello".to_string()));
//!
//! fn greet(name: &str) -> String {
//!     format!("{} {name}", GREETING.get())
//! }
//!
//! {
//!     let _guard = replace_binding(&GREETING, "hi".to_string());
//!     assert_eq!(greet("ada"), "hi ada");
//! }
//! assert_eq!(greet("ada"), "hello ada");
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

/// A replaceable shared value.
///
/// `Binding` is `Send + Sync` for `T: Send + Sync`, so it can live in a
/// `static` behind [`LazyLock`](std::sync::LazyLock).
pub struct Binding<T> {
    slot: RwLock<Arc<T>>,
}

impl<T> Binding<T> {
    /// Create a binding holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            slot: RwLock::new(Arc::new(value)),
        }
    }

    /// The currently bound value.
    #[must_use]
    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.slot.read())
    }

    /// Run `f` against the currently bound value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let current = self.get();
        f(&current)
    }

    fn swap(&self, value: Arc<T>) -> Arc<T> {
        std::mem::replace(&mut *self.slot.write(), value)
    }
}

impl<T: Default> Default for Binding<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("value", &*self.get())
            .finish()
    }
}

/// Patch record for one replaced binding.
///
/// Holds the value that was bound before the replacement and puts it back
/// when restored or dropped. Nested guards on the same binding must be
/// restored in reverse order of creation; each guard restores exactly the
/// value it displaced.
#[must_use = "the original value is restored as soon as the guard is dropped"]
pub struct PatchGuard<'a, T> {
    binding: &'a Binding<T>,
    original: Option<Arc<T>>,
}

impl<T> PatchGuard<'_, T> {
    /// The value bound before this replacement.
    pub fn original(&self) -> Option<&T> {
        self.original.as_deref()
    }

    /// Restore the original value now.
    ///
    /// This is called automatically when the guard is dropped.
    pub fn restore(self) {
        drop(self);
    }
}

impl<T> Drop for PatchGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(original) = self.original.take() {
            self.binding.swap(original);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PatchGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchGuard")
            .field("original", &self.original)
            .finish_non_exhaustive()
    }
}

/// Bind `value` to `binding` until the returned guard is restored or dropped.
pub fn replace_binding<T>(binding: &Binding<T>, value: T) -> PatchGuard<'_, T> {
    let original = binding.swap(Arc::new(value));
    PatchGuard {
        binding,
        original: Some(original),
    }
}

type Replacement = Box<dyn Fn() -> ActivePatch + Send + Sync>;
type ActivePatch = Box<dyn Send>;

/// Lifecycle-bound replacements for a group of tests.
///
/// ```rust
/// use std::sync::LazyLock;
/// use mockwright::replace::{Binding, ReplacementScope};
///
/// static LIMIT: LazyLock<Binding<u32>> = LazyLock::new(|| Binding::new(10));
///
/// let mut scope = ReplacementScope::new();
/// scope.replace_before_each(&LIMIT, 1);
///
/// scope.before_each();
/// assert_eq!(*LIMIT.get(), 1);
/// scope.after_each();
/// assert_eq!(*LIMIT.get(), 10);
/// ```
#[derive(Default)]
pub struct ReplacementScope {
    each: Vec<Replacement>,
    all: Vec<Replacement>,
    active_each: Mutex<Vec<ActivePatch>>,
    active_all: Mutex<Vec<ActivePatch>>,
}

impl ReplacementScope {
    /// Create a scope with no registered replacements.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `binding` with `value` around every test.
    pub fn replace_before_each<T>(&mut self, binding: &'static Binding<T>, value: T) -> &mut Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.each.push(patch(binding, value));
        self
    }

    /// Replace `binding` with `value` around the whole group.
    pub fn replace_before_all<T>(&mut self, binding: &'static Binding<T>, value: T) -> &mut Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.all.push(patch(binding, value));
        self
    }

    /// Apply the per-test replacements.
    pub fn before_each(&self) {
        apply("each", &self.each, &self.active_each);
    }

    /// Restore the per-test replacements, most recent first.
    pub fn after_each(&self) {
        restore_all(&self.active_each);
    }

    /// Apply the group replacements.
    pub fn before_all(&self) {
        apply("all", &self.all, &self.active_all);
    }

    /// Restore the group replacements, most recent first.
    pub fn after_all(&self) {
        restore_all(&self.active_all);
    }

    /// Number of replacements currently applied.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active_each.lock().len() + self.active_all.lock().len()
    }
}

impl Drop for ReplacementScope {
    fn drop(&mut self) {
        restore_all(&self.active_each);
        restore_all(&self.active_all);
    }
}

impl fmt::Debug for ReplacementScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplacementScope")
            .field("each", &self.each.len())
            .field("all", &self.all.len())
            .field("active", &self.active())
            .finish()
    }
}

fn patch<T>(binding: &'static Binding<T>, value: T) -> Replacement
where
    T: Clone + Send + Sync + 'static,
{
    Box::new(move || Box::new(replace_binding(binding, value.clone())) as ActivePatch)
}

fn apply(hook: &str, replacements: &[Replacement], active: &Mutex<Vec<ActivePatch>>) {
    let mut active = active.lock();
    if !active.is_empty() {
        tracing::warn!(
            hook,
            stale = active.len(),
            "replacements still applied from a previous run, restoring first"
        );
        while let Some(stale) = active.pop() {
            drop(stale);
        }
    }
    active.extend(replacements.iter().map(|replacement| replacement()));
    tracing::debug!(hook, applied = active.len(), "applied replacements");
}

fn restore_all(active: &Mutex<Vec<ActivePatch>>) {
    let mut active = active.lock();
    while let Some(patch) = active.pop() {
        drop(patch);
    }
}
