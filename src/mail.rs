//! Mail hand-off: turn a complete request into a pre-filled compose action.
//!
//! The wizard never talks to a mail client. A [`Handoff`] receives the
//! finished request; [`SystemMailer`] composes a `mailto:` URI and asks the
//! host's URL opener to launch it. There is no delivery confirmation.

use std::process::Command;

use serde::Serialize;
use tracing::{debug, info};

use crate::model::InterviewRequest;

/// Last line of every body.
pub const TRAILER: &str = "This interview request was sent from your portfolio website.";

/// Errors from handing a request off to the host.
#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error("failed to run {opener}: {source}")]
    Launch {
        opener: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{opener} could not open the mail composer: {detail}")]
    Rejected { opener: String, detail: String },

    #[error("failed to write the request: {0}")]
    Write(#[from] std::io::Error),
}

/// Something that accepts a finished request. Fire-and-forget.
pub trait Handoff {
    fn hand_off(&self, request: &InterviewRequest) -> Result<(), HandoffError>;
}

/// A composed message, ready to become a `mailto:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailDraft {
    pub fn compose(recipient: &str, request: &InterviewRequest) -> Self {
        Self {
            to: recipient.to_string(),
            subject: subject(request),
            body: body(request),
        }
    }

    /// `mailto:{to}?subject=…&body=…` with both parameters percent-encoded.
    pub fn uri(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.to,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body),
        )
    }
}

/// `Interview Request - {position} at {company}`.
pub fn subject(request: &InterviewRequest) -> String {
    format!(
        "Interview Request - {} at {}",
        request.position, request.company
    )
}

/// The labelled body, fields in fixed order, ending with [`TRAILER`].
pub fn body(request: &InterviewRequest) -> String {
    [
        format!("Name: {}", request.name),
        format!("Email: {}", request.email),
        format!("Company: {}", request.company),
        format!("Position: {}", request.position),
        format!("Preferred Date: {}", request.long_date()),
        format!("Preferred Time: {}", request.time),
        String::new(),
        "Message:".to_string(),
        request.message.clone(),
        String::new(),
        TRAILER.to_string(),
    ]
    .join("\n")
}

/// Opens composed mail through the host's URL opener.
#[derive(Debug, Clone)]
pub struct SystemMailer {
    recipient: String,
    opener: Vec<String>,
}

impl SystemMailer {
    /// A mailer using `opener` (program followed by leading arguments) or,
    /// when `None`, the platform default.
    pub fn new(recipient: impl Into<String>, opener: Option<&str>) -> Self {
        let opener = match opener {
            Some(cmd) => cmd.split_whitespace().map(String::from).collect(),
            None => default_opener(),
        };
        Self {
            recipient: recipient.into(),
            opener,
        }
    }

    /// The opener command line, for display.
    pub fn opener(&self) -> String {
        self.opener.join(" ")
    }

    /// Program and arguments that open `uri`. The URI is always one argument.
    fn command_line(&self, uri: &str) -> Vec<String> {
        let mut argv = self.opener.clone();
        argv.push(uri.to_string());
        argv
    }
}

impl Handoff for SystemMailer {
    fn hand_off(&self, request: &InterviewRequest) -> Result<(), HandoffError> {
        let draft = MailDraft::compose(&self.recipient, request);
        let uri = draft.uri();
        let opener = self.opener();

        if self.opener.is_empty() {
            return Err(HandoffError::Rejected {
                opener,
                detail: "no opener command configured".to_string(),
            });
        }
        let argv = self.command_line(&uri);
        let (program, args) = (&argv[0], &argv[1..]);

        debug!(%opener, subject = %draft.subject, "opening mail composer");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| HandoffError::Launch {
                opener: opener.clone(),
                source,
            })?;

        if output.status.success() {
            info!(to = %self.recipient, subject = %draft.subject, "mail composer opened");
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            };
            Err(HandoffError::Rejected { opener, detail })
        }
    }
}

fn default_opener() -> Vec<String> {
    default_opener_for(std::env::consts::OS)
}

/// The URL opener for `os`.
///
/// Windows goes through `rundll32` rather than `cmd /C start`: cmd would
/// split the URI at `&` and expand `%XX` sequences.
fn default_opener_for(os: &str) -> Vec<String> {
    let parts: &[&str] = match os {
        "macos" => &["open"],
        "windows" => &["rundll32", "url.dll,FileProtocolHandler"],
        _ => &["xdg-open"],
    };
    parts.iter().map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;

    use crate::model::TimeSlot;

    fn request() -> InterviewRequest {
        InterviewRequest {
            name: "Jane Doe".to_string(),
            email: "jane@co.com".to_string(),
            company: "Acme".to_string(),
            position: "CTO".to_string(),
            date: date(2026, 10, 17),
            time: TimeSlot::Ten,
            message: "Let's discuss the backend architecture.".to_string(),
        }
    }

    #[test]
    fn subject_names_position_and_company() {
        assert_eq!(subject(&request()), "Interview Request - CTO at Acme");
    }

    #[test]
    fn body_follows_the_template() {
        let expected = "\
Name: Jane Doe
Email: jane@co.com
Company: Acme
Position: CTO
Preferred Date: Saturday, October 17, 2026
Preferred Time: 10:00 AM

Message:
Let's discuss the backend architecture.

This interview request was sent from your portfolio website.";
        assert_eq!(body(&request()), expected);
    }

    #[test]
    fn uri_encodes_subject_and_body() {
        let draft = MailDraft::compose("interviews@example.com", &request());
        let uri = draft.uri();

        assert!(uri.starts_with(
            "mailto:interviews@example.com?subject=Interview%20Request%20-%20CTO%20at%20Acme&body="
        ));
        assert!(uri.contains("Name%3A%20Jane%20Doe%0AEmail%3A%20jane%40co.com"));
        assert!(!uri.contains('\n'));
        assert_eq!(uri.matches('&').count(), 1);
    }

    #[test]
    fn ampersands_in_fields_stay_inside_their_parameter() {
        let mut req = request();
        req.company = "Smith & Sons".to_string();
        let uri = MailDraft::compose("a@b.c", &req).uri();
        assert!(uri.contains("Smith%20%26%20Sons"));
        assert_eq!(uri.matches('&').count(), 1);
    }

    #[test]
    fn custom_opener_is_split_into_program_and_args() {
        let mailer = SystemMailer::new("a@b.c", Some("firefox --new-tab"));
        assert_eq!(mailer.opener(), "firefox --new-tab");
    }

    #[test]
    fn windows_opener_passes_the_uri_as_one_argument() {
        let mailer = SystemMailer {
            recipient: "a@b.c".to_string(),
            opener: default_opener_for("windows"),
        };
        let uri = MailDraft::compose("a@b.c", &request()).uri();
        let argv = mailer.command_line(&uri);

        assert_eq!(argv[0], "rundll32");
        assert_eq!(argv[1], "url.dll,FileProtocolHandler");
        assert_eq!(argv[2], uri);
        assert_eq!(argv.len(), 3);
        assert!(!argv.iter().any(|a| a.eq_ignore_ascii_case("cmd")));
    }

    #[test]
    fn platform_openers() {
        assert_eq!(default_opener_for("macos"), ["open"]);
        assert_eq!(default_opener_for("linux"), ["xdg-open"]);
        assert_eq!(default_opener_for("freebsd"), ["xdg-open"]);
    }

    #[test]
    fn empty_opener_is_rejected() {
        let mailer = SystemMailer::new("a@b.c", Some("   "));
        let err = mailer.hand_off(&request()).unwrap_err();
        assert!(matches!(err, HandoffError::Rejected { .. }));
    }

    #[test]
    fn missing_opener_program_is_a_launch_error() {
        let mailer = SystemMailer::new("a@b.c", Some("definitely-not-an-installed-opener-9f3a"));
        let err = mailer.hand_off(&request()).unwrap_err();
        assert!(matches!(err, HandoffError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn opener_exit_status_decides_outcome() {
        assert!(SystemMailer::new("a@b.c", Some("true")).hand_off(&request()).is_ok());
        let err = SystemMailer::new("a@b.c", Some("false"))
            .hand_off(&request())
            .unwrap_err();
        assert!(matches!(err, HandoffError::Rejected { .. }));
    }
}
