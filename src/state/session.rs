// Session state - who is signed in, plus the login/register form buffers.
//
// The token itself lives inside the API client on the worker thread and
// never reaches UI state; all the interface needs is the username.

#[derive(Debug, Default)]
pub struct SessionState {
    pub username: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(&self) -> bool {
        self.username.is_some()
    }

    pub fn begin(&mut self, username: String) {
        self.username = Some(username);
    }

    pub fn end(&mut self) {
        self.username = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTab {
    Login,
    Register,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthNotice {
    Info(String),
    Error(String),
}

/// Input buffers for the authentication card.
pub struct AuthForm {
    pub tab: AuthTab,
    pub username: String,
    pub password: String,
    pub confirm: String,
    pub notice: Option<AuthNotice>,
    /// A login or register request is in flight; the submit buttons are
    /// disabled while this holds.
    pub busy: bool,
}

impl AuthForm {
    pub fn new() -> Self {
        Self {
            tab: AuthTab::Login,
            username: String::new(),
            password: String::new(),
            confirm: String::new(),
            notice: None,
            busy: false,
        }
    }

    pub fn switch_tab(&mut self, tab: AuthTab) {
        if self.tab != tab {
            self.tab = tab;
            self.notice = None;
        }
    }

    pub fn clear_secrets(&mut self) {
        self.password.clear();
        self.confirm.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_tracks_sign_in_and_out() {
        let mut session = SessionState::new();
        assert!(!session.signed_in());

        session.begin("neru".to_string());
        assert!(session.signed_in());
        assert_eq!(session.username.as_deref(), Some("neru"));

        session.end();
        assert!(!session.signed_in());
    }

    #[test]
    fn switching_tabs_drops_the_notice() {
        let mut form = AuthForm::new();
        form.notice = Some(AuthNotice::Error("Invalid credentials".into()));

        form.switch_tab(AuthTab::Register);
        assert!(form.notice.is_none());
        assert_eq!(form.tab, AuthTab::Register);

        // Re-selecting the active tab keeps whatever is displayed.
        form.notice = Some(AuthNotice::Info("Registration successful".into()));
        form.switch_tab(AuthTab::Register);
        assert!(form.notice.is_some());
    }
}
