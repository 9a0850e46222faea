//! Maps session state and the local auth toggle onto the screen to render.

use tokio::sync::mpsc;

use super::dashboard::DashboardView;
use super::pointer::{Bounds, PointerBus};
use super::profile_menu::ProfileMenu;
use crate::domain::{SessionState, SessionStore, SessionSubscription};

/// Caption of the placeholder shown while the session is being resolved.
pub const LOADING_CAPTION: &str = "Carregando...";

/// Which unauthenticated screen is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthScreen {
    /// The sign-in form.
    #[default]
    SignIn,
    /// The registration form.
    SignUp,
}

/// Screen the renderer should draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Session lookup still running.
    Loading,
    /// Anonymous user on the sign-in form.
    SignIn,
    /// Anonymous user on the registration form.
    SignUp,
    /// Signed-in shell.
    Dashboard(DashboardView),
}

/// Cloneable trigger that switches the router back to the sign-in screen.
///
/// Handed to [`crate::inbound::forms::SignUpForm::submit`] as its redirect
/// callback.
#[derive(Debug, Clone)]
pub struct SignInRedirect {
    sender: mpsc::UnboundedSender<()>,
}

impl SignInRedirect {
    /// Request the switch. Ignored once the router is gone.
    pub fn fire(&self) {
        if self.sender.send(()).is_err() {
            tracing::debug!("sign-in redirect dropped; router is gone");
        }
    }
}

/// Session-driven view selection.
#[derive(Debug)]
pub struct ViewRouter {
    session: SessionSubscription,
    state: SessionState,
    screen: AuthScreen,
    bus: PointerBus,
    menu_bounds: Bounds,
    menu: Option<ProfileMenu>,
    redirects: mpsc::UnboundedReceiver<()>,
    redirect_sender: mpsc::UnboundedSender<()>,
}

impl ViewRouter {
    /// Router following `store`, with the profile menu listening on `bus`.
    pub fn new(store: &SessionStore, bus: PointerBus) -> Self {
        let (redirect_sender, redirects) = mpsc::unbounded_channel();
        let mut session = store.subscribe();
        let initial = session.current();
        let mut router = Self {
            session,
            state: SessionState::Loading,
            screen: AuthScreen::SignIn,
            bus,
            menu_bounds: Bounds::default(),
            menu: None,
            redirects,
            redirect_sender,
        };
        router.apply(initial);
        router
    }

    /// Screen to render for the latest state the router has seen.
    pub fn view(&self) -> View {
        match &self.state {
            SessionState::Loading => View::Loading,
            SessionState::Anonymous => match self.screen {
                AuthScreen::SignIn => View::SignIn,
                AuthScreen::SignUp => View::SignUp,
            },
            SessionState::Authenticated(session) => View::Dashboard(DashboardView::from_session(
                session,
                self.menu.as_ref().is_some_and(ProfileMenu::is_open),
            )),
        }
    }

    /// Active unauthenticated screen.
    pub fn screen(&self) -> AuthScreen {
        self.screen
    }

    /// Switch to the registration form.
    pub fn show_sign_up(&mut self) {
        self.screen = AuthScreen::SignUp;
    }

    /// Switch to the sign-in form.
    pub fn show_sign_in(&mut self) {
        self.screen = AuthScreen::SignIn;
    }

    /// Trigger for the post-registration redirect.
    pub fn sign_in_redirect(&self) -> SignInRedirect {
        SignInRedirect {
            sender: self.redirect_sender.clone(),
        }
    }

    /// Hit area given to the profile menu, now and when it is next created.
    pub fn set_menu_bounds(&mut self, bounds: Bounds) {
        self.menu_bounds = bounds;
        if let Some(menu) = self.menu.as_mut() {
            menu.set_bounds(bounds);
        }
    }

    /// Profile dropdown, present only while signed in.
    pub fn profile_menu_mut(&mut self) -> Option<&mut ProfileMenu> {
        self.menu.as_mut()
    }

    /// Apply any pending session change or redirect without waiting.
    ///
    /// Returns whether the view may have changed.
    pub fn sync(&mut self) -> bool {
        let mut changed = false;
        if self.session.has_changed() {
            let next = self.session.current();
            self.apply(next);
            changed = true;
        }
        while self.redirects.try_recv().is_ok() {
            self.show_sign_in();
            changed = true;
        }
        changed
    }

    /// Wait for the next session change or redirect and apply it.
    ///
    /// Returns `false` once the session store has been dropped.
    pub async fn changed(&mut self) -> bool {
        tokio::select! {
            alive = self.session.changed() => {
                if !alive {
                    return false;
                }
                let next = self.session.current();
                self.apply(next);
            }
            Some(()) = self.redirects.recv() => self.show_sign_in(),
        }
        true
    }

    fn apply(&mut self, next: SessionState) {
        match &next {
            SessionState::Authenticated(_) => {
                if self.menu.is_none() {
                    self.menu = Some(ProfileMenu::new(self.bus.clone(), self.menu_bounds));
                }
            }
            SessionState::Anonymous => {
                self.menu = None;
                if !matches!(self.state, SessionState::Anonymous) {
                    self.screen = AuthScreen::SignIn;
                }
            }
            SessionState::Loading => self.menu = None,
        }
        self.state = next;
    }
}
