// Status bar state - transient error and info messages
use std::time::Instant;

pub struct StatusState {
    pub error_message: Option<(String, Instant)>,
    pub info_message: Option<(String, Instant)>,
}

impl StatusState {
    pub fn new() -> Self {
        Self {
            error_message: None,
            info_message: None,
        }
    }

    pub fn set_error(&mut self, message: String) {
        tracing::warn!(message = %message, "Surfacing error to status bar");
        self.error_message = Some((message, Instant::now()));
        self.info_message = None;
    }

    pub fn set_info(&mut self, message: String) {
        self.info_message = Some((message, Instant::now()));
        self.error_message = None;
    }

    pub fn clear_expired_messages(&mut self, timeout_secs: u64) {
        if let Some((_, time)) = &self.error_message {
            if time.elapsed().as_secs() >= timeout_secs {
                self.error_message = None;
            }
        }
        if let Some((_, time)) = &self.info_message {
            if time.elapsed().as_secs() >= timeout_secs {
                self.info_message = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_message_replaces_the_other_kind() {
        let mut status = StatusState::new();
        status.set_error("boom".to_string());
        status.set_info("all good".to_string());

        assert!(status.error_message.is_none());
        assert!(status.info_message.is_some());
    }

    #[test]
    fn zero_timeout_expires_immediately() {
        let mut status = StatusState::new();
        status.set_error("boom".to_string());
        status.clear_expired_messages(0);
        assert!(status.error_message.is_none());
    }
}
