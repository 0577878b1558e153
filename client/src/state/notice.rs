//! Transient user notices (toast messages).
//!
//! DESIGN
//! ======
//! Notices are appended with a fresh id so the renderer can dismiss a single
//! toast after its timeout without disturbing ones pushed later.

#[cfg(test)]
#[path = "notice_test.rs"]
mod notice_test;

/// How long a notice stays on screen before auto-dismissal.
pub const NOTICE_TIMEOUT_MS: u32 = 3_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

impl NoticeKind {
    /// CSS modifier used by the toast renderer.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Success => "notice--success",
            Self::Failure => "notice--failure",
        }
    }
}

/// One message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into() }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Failure, message: message.into() }
    }
}

/// Currently visible notices, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeState {
    pub items: Vec<(u64, Notice)>,
    next_id: u64,
}

impl NoticeState {
    /// Show `notice` and return the id to dismiss it with.
    pub fn push(&mut self, notice: Notice) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push((id, notice));
        id
    }

    /// Remove the notice with `id`; unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|(item_id, _)| *item_id != id);
    }
}
