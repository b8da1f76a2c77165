//! crates/medconnect_core/src/call.rs
//!
//! The simulated video consultation. There is no media here: the call is
//! "connecting" until the hosting service reports the connect delay has
//! elapsed, then counts seconds on every tick it receives.

/// An enum representing the phase of the mock call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    Connecting,
    Connected { elapsed_secs: u64 },
}

/// The optional side panel. Opening one closes the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPanel {
    Closed,
    Chat,
    Upload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSession {
    phase: CallPhase,
    mic_on: bool,
    video_on: bool,
    panel: CallPanel,
    chat_draft: String,
    upload_acknowledged: bool,
}

impl Default for CallSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CallSession {
    pub fn new() -> Self {
        Self {
            phase: CallPhase::Connecting,
            mic_on: true,
            video_on: true,
            panel: CallPanel::Closed,
            chat_draft: String::new(),
            upload_acknowledged: false,
        }
    }

    pub fn phase(&self) -> CallPhase {
        self.phase
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.phase, CallPhase::Connected { .. })
    }

    pub fn elapsed_secs(&self) -> u64 {
        match self.phase {
            CallPhase::Connecting => 0,
            CallPhase::Connected { elapsed_secs } => elapsed_secs,
        }
    }

    pub fn mic_on(&self) -> bool {
        self.mic_on
    }

    pub fn video_on(&self) -> bool {
        self.video_on
    }

    pub fn panel(&self) -> CallPanel {
        self.panel
    }

    pub fn chat_draft(&self) -> &str {
        &self.chat_draft
    }

    pub fn upload_acknowledged(&self) -> bool {
        self.upload_acknowledged
    }

    /// Connect delay elapsed. Idempotent.
    pub fn connect(&mut self) {
        if self.phase == CallPhase::Connecting {
            self.phase = CallPhase::Connected { elapsed_secs: 0 };
        }
    }

    /// One second passed. Ignored while still connecting.
    pub fn tick(&mut self) -> Option<u64> {
        match &mut self.phase {
            CallPhase::Connecting => None,
            CallPhase::Connected { elapsed_secs } => {
                *elapsed_secs += 1;
                Some(*elapsed_secs)
            }
        }
    }

    pub fn toggle_mic(&mut self) -> bool {
        self.mic_on = !self.mic_on;
        self.mic_on
    }

    pub fn toggle_video(&mut self) -> bool {
        self.video_on = !self.video_on;
        self.video_on
    }

    fn toggle_panel(&mut self, panel: CallPanel) {
        self.panel = if self.panel == panel {
            CallPanel::Closed
        } else {
            panel
        };
    }

    pub fn toggle_chat(&mut self) {
        self.toggle_panel(CallPanel::Chat);
    }

    pub fn toggle_upload(&mut self) {
        self.toggle_panel(CallPanel::Upload);
    }

    pub fn set_chat_draft(&mut self, text: impl Into<String>) {
        self.chat_draft = text.into();
    }

    /// Sending only clears the draft; nothing is delivered anywhere.
    pub fn send_chat(&mut self) -> String {
        std::mem::take(&mut self.chat_draft)
    }

    /// Marks a (pretend) file as received. Returns false when the upload
    /// panel is not open or the previous upload is still acknowledged.
    pub fn upload(&mut self) -> bool {
        if self.panel != CallPanel::Upload || self.upload_acknowledged {
            return false;
        }
        self.upload_acknowledged = true;
        true
    }

    /// The acknowledgment flash is over: hide it and close the panel.
    pub fn clear_upload_ack(&mut self) {
        if self.upload_acknowledged {
            self.upload_acknowledged = false;
            self.panel = CallPanel::Closed;
        }
    }
}

/// Renders an elapsed duration as `m:ss`.
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_only_count_once_connected() {
        let mut call = CallSession::new();
        assert_eq!(call.tick(), None);
        assert_eq!(call.elapsed_secs(), 0);

        call.connect();
        assert_eq!(call.tick(), Some(1));
        assert_eq!(call.tick(), Some(2));
        call.connect();
        assert_eq!(call.elapsed_secs(), 2);
    }

    #[test]
    fn panels_are_mutually_exclusive() {
        let mut call = CallSession::new();
        call.toggle_chat();
        assert_eq!(call.panel(), CallPanel::Chat);
        call.toggle_upload();
        assert_eq!(call.panel(), CallPanel::Upload);
        call.toggle_upload();
        assert_eq!(call.panel(), CallPanel::Closed);
    }

    #[test]
    fn upload_ack_clears_and_closes_panel() {
        let mut call = CallSession::new();
        assert!(!call.upload());
        call.toggle_upload();
        assert!(call.upload());
        assert!(call.upload_acknowledged());

        call.clear_upload_ack();
        assert!(!call.upload_acknowledged());
        assert_eq!(call.panel(), CallPanel::Closed);
    }

    #[test]
    fn upload_is_refused_while_acknowledged() {
        let mut call = CallSession::new();
        call.toggle_upload();
        assert!(call.upload());
        assert!(!call.upload());
        assert!(call.upload_acknowledged());

        call.clear_upload_ack();
        call.toggle_upload();
        assert!(call.upload());
    }

    #[test]
    fn chat_send_clears_draft() {
        let mut call = CallSession::new();
        call.set_chat_draft("Hola doctora");
        assert_eq!(call.send_chat(), "Hola doctora");
        assert_eq!(call.chat_draft(), "");
    }

    #[test]
    fn toggles_flip_devices() {
        let mut call = CallSession::new();
        assert!(!call.toggle_mic());
        assert!(!call.toggle_video());
        assert!(call.toggle_mic());
    }

    #[test]
    fn durations_render_as_minutes_and_seconds() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(7), "0:07");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(3600), "60:00");
    }
}
