//! Client-side resource stores
//!
//! Each store is a single mutable cell holding the currently-loaded page
//! of a backend collection plus an independently-tracked total count.
//! Mutations are pure state transitions applied under a write lock;
//! subscribers are notified through a broadcast channel so views can
//! re-read selectors after each change.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;

use crate::model::{ClientResponse, Notification, Role, TicketResponse, UserResponse};

/// Natural-key access used by `remove_one`
pub trait Keyed {
    type Key: PartialEq + Clone + Send;

    fn key(&self) -> Self::Key;
}

impl Keyed for TicketResponse {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for Role {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for ClientResponse {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for Notification {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for UserResponse {
    type Key = String;

    fn key(&self) -> String {
        self.email.clone()
    }
}

/// The pure state of one store: loaded items plus the collection total.
///
/// `count` is never derived from `items.len()`: the list holds the
/// current page, the count tracks the whole collection.
#[derive(Debug, Clone)]
pub struct StoreState<T> {
    items: Vec<T>,
    count: i64,
}

impl<T: Keyed + Clone> StoreState<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
        }
    }

    /// Replace the full list verbatim; leaves `count` untouched
    pub fn set_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Prepend a newly-created entity so it surfaces first
    pub fn add_one(&mut self, item: T) {
        self.items.insert(0, item);
    }

    /// Drop the entity matching the natural key; absent keys are a no-op
    pub fn remove_one(&mut self, key: &T::Key) {
        self.items.retain(|item| item.key() != *key);
    }

    pub fn set_count(&mut self, count: i64) {
        self.count = count;
    }

    pub fn adjust_count(&mut self, delta: i64) {
        self.count += delta;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn count(&self) -> i64 {
        self.count
    }
}

impl<T: Keyed + Clone> Default for StoreState<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A shared store: the pure state behind a write lock, with change
/// notifications for subscribers
#[derive(Debug)]
pub struct Store<T> {
    state: Arc<RwLock<StoreState<T>>>,
    changes: broadcast::Sender<()>,
}

impl<T: Keyed + Clone> Store<T> {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            state: Arc::new(RwLock::new(StoreState::new())),
            changes,
        }
    }

    pub fn set_all(&self, items: Vec<T>) {
        self.state.write().unwrap().set_all(items);
        self.notify();
    }

    pub fn add_one(&self, item: T) {
        self.state.write().unwrap().add_one(item);
        self.notify();
    }

    pub fn remove_one(&self, key: &T::Key) {
        self.state.write().unwrap().remove_one(key);
        self.notify();
    }

    pub fn set_count(&self, count: i64) {
        self.state.write().unwrap().set_count(count);
        self.notify();
    }

    pub fn adjust_count(&self, delta: i64) {
        self.state.write().unwrap().adjust_count(delta);
        self.notify();
    }

    /// Snapshot of the loaded items, in display order
    pub fn items(&self) -> Vec<T> {
        self.state.read().unwrap().items().to_vec()
    }

    /// The independently-tracked collection total
    pub fn count(&self) -> i64 {
        self.state.read().unwrap().count()
    }

    /// Number of currently-loaded items (page size, not the total)
    pub fn len(&self) -> usize {
        self.state.read().unwrap().items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a loaded entity by its natural key
    pub fn find(&self, key: &T::Key) -> Option<T> {
        self.state
            .read()
            .unwrap()
            .items()
            .iter()
            .find(|item| item.key() == *key)
            .cloned()
    }

    /// Receive a tick after every store mutation
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }

    fn notify(&self) {
        // No receivers is fine; views subscribe lazily.
        let _ = self.changes.send(());
    }

    fn clear(&self) {
        {
            let mut state = self.state.write().unwrap();
            state.set_all(Vec::new());
            state.set_count(0);
        }
        self.notify();
    }
}

impl<T: Keyed + Clone> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            changes: self.changes.clone(),
        }
    }
}

/// Open/close tallies for the ticket dashboard, tracked separately from
/// the ticket store's collection total
#[derive(Debug, Default)]
struct TicketTallies {
    open: i64,
    close: i64,
}

/// Shared open/close ticket counters
#[derive(Debug, Clone, Default)]
pub struct TicketCounts {
    inner: Arc<RwLock<TicketTallies>>,
}

impl TicketCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_open(&self, count: i64) {
        self.inner.write().unwrap().open = count;
    }

    pub fn set_close(&self, count: i64) {
        self.inner.write().unwrap().close = count;
    }

    pub fn adjust_open(&self, delta: i64) {
        self.inner.write().unwrap().open += delta;
    }

    pub fn adjust_close(&self, delta: i64) {
        self.inner.write().unwrap().close += delta;
    }

    pub fn open(&self) -> i64 {
        self.inner.read().unwrap().open
    }

    pub fn close(&self) -> i64 {
        self.inner.read().unwrap().close
    }

    fn clear(&self) {
        let mut tallies = self.inner.write().unwrap();
        tallies.open = 0;
        tallies.close = 0;
    }
}

/// The application-state container: every resource store plus the
/// notification badge flag.
///
/// Constructed once at client startup, shared by `Arc`, and torn down
/// with [`AppState::reset`] at sign-out. There is no process-global
/// instance; whoever owns the `Latte` client owns the state.
#[derive(Debug)]
pub struct AppState {
    pub tickets: Store<TicketResponse>,
    pub ticket_counts: TicketCounts,
    pub users: Store<UserResponse>,
    pub roles: Store<Role>,
    pub clients: Store<ClientResponse>,
    pub notifications: Store<Notification>,
    recent_notification: AtomicBool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tickets: Store::new(),
            ticket_counts: TicketCounts::new(),
            users: Store::new(),
            roles: Store::new(),
            clients: Store::new(),
            notifications: Store::new(),
            recent_notification: AtomicBool::new(false),
        }
    }

    /// Raise the "unseen notification" badge flag
    pub fn mark_recent_notification(&self) {
        self.recent_notification.store(true, Ordering::SeqCst);
    }

    /// Clear the badge flag; called when the notification list is opened
    pub fn clear_recent_notification(&self) {
        self.recent_notification.store(false, Ordering::SeqCst);
    }

    pub fn has_recent_notification(&self) -> bool {
        self.recent_notification.load(Ordering::SeqCst)
    }

    /// Drop every cached entity and counter; used at sign-out
    pub fn reset(&self) {
        self.tickets.clear();
        self.ticket_counts.clear();
        self.users.clear();
        self.roles.clear();
        self.clients.clear();
        self.notifications.clear();
        self.clear_recent_notification();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Status, UserDto};
    use chrono::Utc;

    fn ticket(id: i64, title: &str) -> TicketResponse {
        TicketResponse {
            id,
            title: title.to_string(),
            description: String::new(),
            priority: Priority::Medium,
            status: Status::Open,
            lock: false,
            created_by: UserDto {
                firstname: "Maya".to_string(),
                email: "maya@example.com".to_string(),
            },
            assigned_to: None,
            client: None,
            created_at: Utc::now(),
            last_updated: Utc::now(),
        }
    }

    fn user(email: &str) -> UserResponse {
        UserResponse {
            firstname: "Sam".to_string(),
            email: email.to_string(),
            role: Role::empty(),
            editable: true,
            deletable: true,
        }
    }

    #[test]
    fn add_one_prepends() {
        let store: Store<TicketResponse> = Store::new();
        store.set_all(vec![ticket(1, "first"), ticket(2, "second")]);
        store.add_one(ticket(3, "newest"));

        let ids: Vec<i64> = store.items().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn remove_one_filters_by_key() {
        let store: Store<TicketResponse> = Store::new();
        store.set_all(vec![ticket(1, "a"), ticket(2, "b"), ticket(3, "c")]);
        store.remove_one(&2);

        let ids: Vec<i64> = store.items().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);

        // Removing an absent key is a no-op, so duplicate server
        // acknowledgements are safe.
        store.remove_one(&2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn users_are_keyed_by_email() {
        let store: Store<UserResponse> = Store::new();
        store.set_all(vec![user("a@example.com"), user("b@example.com")]);
        store.remove_one(&"a@example.com".to_string());

        let emails: Vec<String> = store.items().iter().map(|u| u.email.clone()).collect();
        assert_eq!(emails, vec!["b@example.com".to_string()]);
    }

    #[test]
    fn count_is_independent_of_list_mutations() {
        let store: Store<TicketResponse> = Store::new();
        store.set_count(42);

        store.set_all(vec![ticket(1, "a")]);
        store.add_one(ticket(2, "b"));
        store.remove_one(&1);
        assert_eq!(store.count(), 42, "list mutations must not touch count");
        assert_eq!(store.len(), 1);

        store.adjust_count(-1);
        assert_eq!(store.count(), 41);
        assert_eq!(store.len(), 1, "count mutations must not touch the list");

        store.set_count(7);
        assert_eq!(store.count(), 7);
    }

    #[test]
    fn find_by_natural_key() {
        let store: Store<TicketResponse> = Store::new();
        store.set_all(vec![ticket(1, "a"), ticket(2, "b")]);
        assert_eq!(store.find(&2).unwrap().title, "b");
        assert!(store.find(&9).is_none());
    }

    #[test]
    fn subscribers_see_mutations() {
        let store: Store<TicketResponse> = Store::new();
        let mut changes = store.subscribe();
        store.add_one(ticket(1, "a"));
        assert!(changes.try_recv().is_ok());
    }

    #[test]
    fn ticket_counts_track_open_and_close() {
        let counts = TicketCounts::new();
        counts.set_open(5);
        counts.set_close(2);
        counts.adjust_open(-1);
        counts.adjust_close(1);
        assert_eq!(counts.open(), 4);
        assert_eq!(counts.close(), 3);
    }

    #[test]
    fn reset_clears_everything() {
        let state = AppState::new();
        state.tickets.set_all(vec![ticket(1, "a")]);
        state.tickets.set_count(10);
        state.ticket_counts.set_open(4);
        state.users.set_all(vec![user("a@example.com")]);
        state.mark_recent_notification();

        state.reset();

        assert!(state.tickets.is_empty());
        assert_eq!(state.tickets.count(), 0);
        assert_eq!(state.ticket_counts.open(), 0);
        assert!(state.users.is_empty());
        assert!(!state.has_recent_notification());
    }
}
