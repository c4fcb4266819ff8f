/// A parsed SMTP reply: three-digit status code plus the joined text lines.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub message: String,
}

impl SmtpReply {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// 2xx: the command was accepted.
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// 4xx: the server refused for now but may accept later.
    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }

    /// 5xx: the server refused permanently.
    pub fn is_permanent_failure(&self) -> bool {
        (500..600).contains(&self.code)
    }

    /// Single-line rendering of a possibly multiline reply text.
    pub fn one_line(&self) -> String {
        self.message.replace('\n', " / ")
    }
}

/// Decisive result of one probe attempt against one exchanger.
///
/// Transport problems are not outcomes; they surface as
/// [`SmtpError`](super::SmtpError) instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server accepted the recipient.
    Accepted { reply: SmtpReply },
    /// The server refused the recipient permanently.
    Rejected { reply: SmtpReply },
    /// The server refused for now; greylisting looks like this.
    Transient { reply: SmtpReply },
}

impl ProbeOutcome {
    pub fn reply(&self) -> &SmtpReply {
        match self {
            Self::Accepted { reply } | Self::Rejected { reply } | Self::Transient { reply } => reply,
        }
    }

    /// Classifies the decisive `RCPT TO` reply. Anything outside the three
    /// standard classes counts as a rejection, carrying the raw code.
    pub(crate) fn from_rcpt_reply(reply: SmtpReply) -> Self {
        if reply.is_positive_completion() {
            Self::Accepted { reply }
        } else if reply.is_transient_failure() {
            Self::Transient { reply }
        } else {
            Self::Rejected { reply }
        }
    }

    /// Classifies a refusal on an earlier step (greeting, `EHLO`,
    /// `MAIL FROM`): transient replies stay retryable, everything else is
    /// final for this exchanger.
    pub(crate) fn from_step_refusal(reply: SmtpReply) -> Self {
        if reply.is_transient_failure() {
            Self::Transient { reply }
        } else {
            Self::Rejected { reply }
        }
    }
}
