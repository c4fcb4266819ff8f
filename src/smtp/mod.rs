//! Live SMTP handshake probing.
//!
//! One probe runs the scripted sequence greeting, `EHLO`, `MAIL FROM`,
//! `RCPT TO`, `QUIT` against a single exchanger and classifies the replies.
//! No message data is ever sent. Whatever the exit path, the connection is
//! released: `QUIT` on protocol exits, an immediate drop on transport
//! errors.

mod error;
mod session;
mod types;

pub use error::SmtpError;
pub use types::{ProbeOutcome, SmtpReply};

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::config::EngineConfig;
use crate::control::CancelToken;
use crate::dns::MailExchanger;
use crate::syntax::EmailAddress;
use session::SmtpSession;

/// Seam for the probe step so the pipeline can run against scripted
/// outcomes in tests.
pub(crate) trait ProbeMailbox {
    fn probe(
        &self,
        exchanger: &MailExchanger,
        recipient: &EmailAddress,
        cancel: &CancelToken,
    ) -> Result<ProbeOutcome, SmtpError>;
}

/// Handshake prober speaking plain SMTP on a fixed port.
#[derive(Debug, Clone)]
pub struct SmtpProber {
    port: u16,
    connect_timeout: Duration,
    command_timeout: Duration,
    helo_name: String,
    sender: String,
}

impl SmtpProber {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            port: config.smtp_port,
            connect_timeout: config.smtp_timeout,
            command_timeout: config.smtp_timeout,
            helo_name: config.helo_name.clone(),
            sender: config.sender.clone(),
        }
    }

    /// Asks `exchanger` whether it would accept mail for `recipient`.
    ///
    /// The cancel token is consulted before the connect and before each
    /// command; a cancelled probe drops the connection and reports
    /// [`SmtpError::Cancelled`].
    pub fn check(
        &self,
        exchanger: &MailExchanger,
        recipient: &EmailAddress,
        cancel: &CancelToken,
    ) -> Result<ProbeOutcome, SmtpError> {
        if cancel.is_cancelled() {
            return Err(SmtpError::Cancelled);
        }

        let targets = resolve_targets(&exchanger.host, self.port)?;
        let mut session =
            SmtpSession::connect(&targets, self.connect_timeout, self.command_timeout)
                .map_err(SmtpError::connect)?;
        debug!(host = %exchanger.host, "connected to exchanger");

        let greeting = session.read_reply().map_err(SmtpError::from_io)?;
        if !greeting.is_positive_completion() {
            return Ok(refuse(&mut session, greeting));
        }

        let reply = exchange(&mut session, &format!("EHLO {}", self.helo_name), cancel)?;
        if !reply.is_positive_completion() {
            return Ok(refuse(&mut session, reply));
        }

        let reply = exchange(
            &mut session,
            &format!("MAIL FROM:<{}>", self.sender),
            cancel,
        )?;
        if !reply.is_positive_completion() {
            return Ok(refuse(&mut session, reply));
        }

        let reply = exchange(
            &mut session,
            &format!("RCPT TO:<{}@{}>", recipient.local, recipient.ascii_domain),
            cancel,
        )?;
        debug!(host = %exchanger.host, code = reply.code, "decisive RCPT reply");
        quit(&mut session);
        Ok(ProbeOutcome::from_rcpt_reply(reply))
    }
}

impl ProbeMailbox for SmtpProber {
    fn probe(
        &self,
        exchanger: &MailExchanger,
        recipient: &EmailAddress,
        cancel: &CancelToken,
    ) -> Result<ProbeOutcome, SmtpError> {
        self.check(exchanger, recipient, cancel)
    }
}

fn resolve_targets(host: &str, port: u16) -> Result<Vec<SocketAddr>, SmtpError> {
    let targets: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(SmtpError::connect)?
        .collect();
    if targets.is_empty() {
        return Err(SmtpError::connect(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "exchanger resolved to no addresses",
        )));
    }
    Ok(targets)
}

fn exchange(
    session: &mut SmtpSession,
    command: &str,
    cancel: &CancelToken,
) -> Result<SmtpReply, SmtpError> {
    if cancel.is_cancelled() {
        return Err(SmtpError::Cancelled);
    }
    session.send_line(command).map_err(SmtpError::from_io)?;
    session.read_reply().map_err(SmtpError::from_io)
}

/// Closes the session politely and classifies the refusal.
fn refuse(session: &mut SmtpSession, reply: SmtpReply) -> ProbeOutcome {
    quit(session);
    ProbeOutcome::from_step_refusal(reply)
}

/// Best-effort `QUIT`; servers that hang up first are not an error.
fn quit(session: &mut SmtpSession) {
    if session.send_line("QUIT").is_ok() {
        let _ = session.read_reply();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{self, ValidationMode};
    use std::io::{BufRead, BufReader, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::thread::{self, JoinHandle};

    type Script = Vec<(&'static str, &'static str)>;

    /// Binds a scripted SMTP server on an ephemeral loopback port. Each
    /// script entry is an expected command prefix and the reply to send.
    fn spawn_mock_server(script: Script) -> (u16, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let port = listener.local_addr().expect("local addr").port();
        let (ready_tx, ready_rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            ready_tx.send(()).expect("signal readiness");
            let (stream, _) = listener.accept().expect("accept probe connection");
            handle_session(stream, script);
        });

        ready_rx.recv().expect("mock server readiness");
        (port, handle)
    }

    fn handle_session(stream: TcpStream, script: Script) {
        let mut writer = stream.try_clone().expect("clone stream");
        let mut reader = BufReader::new(stream);

        writer
            .write_all(b"220 mock.smtp.test ESMTP\r\n")
            .expect("write banner");

        for (expected_prefix, response) in script {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read command");
            assert!(
                line.starts_with(expected_prefix),
                "expected {expected_prefix:?}, got {line:?}"
            );
            writer.write_all(response.as_bytes()).expect("write response");
        }
    }

    fn prober_on(port: u16) -> SmtpProber {
        SmtpProber {
            port,
            connect_timeout: Duration::from_secs(2),
            command_timeout: Duration::from_secs(2),
            helo_name: "mailvet.invalid".to_string(),
            sender: "verify-probe@example.com".to_string(),
        }
    }

    fn recipient() -> EmailAddress {
        syntax::validate("user@example.com", ValidationMode::Strict).expect("valid recipient")
    }

    #[test]
    fn prober_inherits_engine_config() {
        let config = EngineConfig {
            smtp_port: 2525,
            helo_name: "probe.example".to_string(),
            ..EngineConfig::default()
        };
        let prober = SmtpProber::from_config(&config);
        assert_eq!(prober.port, 2525);
        assert_eq!(prober.helo_name, "probe.example");
        assert_eq!(prober.sender, "verify-probe@example.com");
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn accepted_recipient_reports_accepted() {
        let (port, server) = spawn_mock_server(vec![
            ("EHLO", "250-mock.smtp.test\r\n250 SIZE 35882577\r\n"),
            ("MAIL FROM:", "250 2.1.0 Ok\r\n"),
            ("RCPT TO:<user@example.com>", "250 2.1.5 Ok\r\n"),
            ("QUIT", "221 2.0.0 Bye\r\n"),
        ]);

        let outcome = prober_on(port)
            .check(&MailExchanger::new(10, "127.0.0.1"), &recipient(), &CancelToken::new())
            .expect("probe must succeed");
        assert!(matches!(outcome, ProbeOutcome::Accepted { .. }));
        server.join().expect("mock server");
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn unknown_mailbox_reports_rejected() {
        let (port, server) = spawn_mock_server(vec![
            ("EHLO", "250 mock.smtp.test\r\n"),
            ("MAIL FROM:", "250 2.1.0 Ok\r\n"),
            ("RCPT TO:", "550 5.1.1 User unknown\r\n"),
            ("QUIT", "221 2.0.0 Bye\r\n"),
        ]);

        let outcome = prober_on(port)
            .check(&MailExchanger::new(10, "127.0.0.1"), &recipient(), &CancelToken::new())
            .expect("probe must succeed");
        match outcome {
            ProbeOutcome::Rejected { reply } => {
                assert_eq!(reply.code, 550);
                assert!(reply.message.contains("User unknown"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        server.join().expect("mock server");
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn greylisting_reports_transient() {
        let (port, server) = spawn_mock_server(vec![
            ("EHLO", "250 mock.smtp.test\r\n"),
            ("MAIL FROM:", "250 2.1.0 Ok\r\n"),
            ("RCPT TO:", "451 4.7.1 Greylisted, try again later\r\n"),
            ("QUIT", "221 2.0.0 Bye\r\n"),
        ]);

        let outcome = prober_on(port)
            .check(&MailExchanger::new(10, "127.0.0.1"), &recipient(), &CancelToken::new())
            .expect("probe must succeed");
        match outcome {
            ProbeOutcome::Transient { reply } => assert_eq!(reply.code, 451),
            other => panic!("unexpected outcome: {other:?}"),
        }
        server.join().expect("mock server");
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn mail_from_refusal_stops_before_rcpt() {
        let (port, server) = spawn_mock_server(vec![
            ("EHLO", "250 mock.smtp.test\r\n"),
            ("MAIL FROM:", "554 5.7.1 Sender refused\r\n"),
            ("QUIT", "221 2.0.0 Bye\r\n"),
        ]);

        let outcome = prober_on(port)
            .check(&MailExchanger::new(10, "127.0.0.1"), &recipient(), &CancelToken::new())
            .expect("probe must succeed");
        match outcome {
            ProbeOutcome::Rejected { reply } => assert_eq!(reply.code, 554),
            other => panic!("unexpected outcome: {other:?}"),
        }
        server.join().expect("mock server");
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn unreachable_port_is_a_transport_error() {
        // Bind then drop so the port is very likely closed.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("local addr").port()
        };

        let err = prober_on(port)
            .check(&MailExchanger::new(10, "127.0.0.1"), &recipient(), &CancelToken::new())
            .expect_err("probe must fail");
        assert!(matches!(err, SmtpError::ConnectFailed { .. }));
    }

    #[test]
    fn cancelled_token_stops_before_connecting() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = prober_on(1)
            .check(&MailExchanger::new(10, "192.0.2.1"), &recipient(), &cancel)
            .expect_err("must not connect");
        assert!(matches!(err, SmtpError::Cancelled));
    }
}
