use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use super::types::SmtpReply;

/// A plain-text SMTP connection with per-command timeouts.
///
/// The session only moves bytes; interpreting replies is the prober's job.
/// Dropping the session closes the socket.
pub(crate) struct SmtpSession {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl SmtpSession {
    /// Connects to the first address that answers within `connect_timeout`
    /// and arms both socket directions with `command_timeout`.
    pub(crate) fn connect(
        addrs: &[SocketAddr],
        connect_timeout: Duration,
        command_timeout: Duration,
    ) -> io::Result<Self> {
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(addr, connect_timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(command_timeout))?;
                    stream.set_write_timeout(Some(command_timeout))?;
                    let reader = BufReader::new(stream.try_clone()?);
                    return Ok(Self { stream, reader });
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "no socket address available")
        }))
    }

    /// Sends one command line; CRLF is appended here.
    pub(crate) fn send_line(&mut self, command: &str) -> io::Result<()> {
        self.stream.write_all(command.as_bytes())?;
        self.stream.write_all(b"\r\n")?;
        self.stream.flush()
    }

    /// Reads one full reply, following `NNN-` continuation lines.
    pub(crate) fn read_reply(&mut self) -> io::Result<SmtpReply> {
        read_reply_from(&mut self.reader)
    }
}

/// RFC 5321 reply parsing over any buffered reader.
///
/// Every line of a multiline reply must repeat the same status code; the
/// text lines are joined with `'\n'`.
pub(crate) fn read_reply_from<R: BufRead>(reader: &mut R) -> io::Result<SmtpReply> {
    let mut code: Option<u16> = None;
    let mut lines = Vec::new();

    loop {
        let mut raw = String::new();
        if reader.read_line(&mut raw)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed while reading reply",
            ));
        }
        let line = raw.trim_end_matches(['\r', '\n']);

        let parsed = line
            .get(..3)
            .and_then(|digits| digits.parse::<u16>().ok())
            .ok_or_else(|| invalid_reply(line))?;

        match code {
            Some(existing) if existing != parsed => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("inconsistent reply codes {existing} and {parsed}"),
                ));
            }
            None => code = Some(parsed),
            _ => {}
        }

        let continued = line.as_bytes().get(3) == Some(&b'-');
        lines.push(line.get(4..).unwrap_or("").to_string());
        if !continued {
            break;
        }
    }

    let code = code.ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "reply missing status code")
    })?;
    Ok(SmtpReply {
        code,
        message: lines.join("\n"),
    })
}

fn invalid_reply(line: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("malformed SMTP reply: '{line}'"),
    )
}
