//! Route guard for the authenticated section of the app

use tokio::sync::watch;

use crate::auth::Auth;

/// Outcome of a guarded navigation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// The check is still in flight; the splash screen is showing
    Pending,
    /// The session verified; navigation proceeds
    Authorized,
    /// Verification failed or errored; redirect to sign-in, replacing
    /// history so back-navigation cannot re-enter the guarded route
    Unauthorized,
}

/// The splash/loading indicator shown while the guard check runs
#[derive(Clone)]
pub struct Splash {
    processing: watch::Sender<bool>,
}

impl Splash {
    pub fn new() -> Self {
        let (processing, _) = watch::channel(false);
        Self { processing }
    }

    pub fn set_processing(&self, value: bool) {
        self.processing.send_replace(value);
    }

    pub fn processing(&self) -> bool {
        *self.processing.borrow()
    }

    /// Observe the indicator; the splash view re-renders on change
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.processing.subscribe()
    }
}

impl Default for Splash {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the guard check for a protected navigation.
///
/// Shows the splash for the entire duration of the verification round
/// trip and clears it exactly once, on either outcome. The check always
/// settles: [`Auth::is_authenticated`] folds every error into `false`,
/// so the caller can never be left in [`GuardState::Pending`].
pub async fn authorize(auth: &Auth, splash: &Splash) -> GuardState {
    splash.set_processing(true);
    let authenticated = auth.is_authenticated().await;
    splash.set_processing(false);

    if authenticated {
        GuardState::Authorized
    } else {
        GuardState::Unauthorized
    }
}
