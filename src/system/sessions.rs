use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use tracing::debug;

use super::platform::{FieldSpan, LOGIN_RECORD};
use crate::error::CollectionError;

pub const UTMP_PATH: &str = "/var/run/utmp";

/// Size of one login record on this target.
pub const RECORD_SIZE: usize = LOGIN_RECORD.size;

/// `ut_type` of a normal login session.
pub const USER_PROCESS: i16 = 7;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserSession {
    pub user: String,
    pub line: String,
    pub host: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginRecord {
    pub kind: i16,
    pub session: UserSession,
}

impl LoginRecord {
    pub fn decode(buf: &[u8; RECORD_SIZE]) -> Self {
        let at = LOGIN_RECORD.kind;
        LoginRecord {
            kind: i16::from_ne_bytes([buf[at], buf[at + 1]]),
            session: UserSession {
                user: c_field(buf, LOGIN_RECORD.user),
                line: c_field(buf, LOGIN_RECORD.line),
                host: c_field(buf, LOGIN_RECORD.host),
            },
        }
    }

    pub fn is_user_process(&self) -> bool {
        self.kind == USER_PROCESS
    }
}

/// NUL-terminated, or filling the whole field when exactly full.
fn c_field(buf: &[u8], span: FieldSpan) -> String {
    let bytes = &buf[span.offset..span.end()];
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Returns the user sessions found in a stream of login records.
/// A trailing partial record is ignored.
pub fn read_sessions_from<R: Read>(reader: R) -> io::Result<Vec<UserSession>> {
    let mut reader = BufReader::new(reader);
    let mut buf = [0u8; RECORD_SIZE];
    let mut sessions = Vec::new();

    loop {
        match reader.read_exact(&mut buf) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        }
        let record = LoginRecord::decode(&buf);
        if record.is_user_process() {
            sessions.push(record.session);
        }
    }

    Ok(sessions)
}

pub fn read_sessions(path: &Path) -> Result<Vec<UserSession>, CollectionError> {
    let file = File::open(path).map_err(|e| CollectionError::io(path, e))?;
    let sessions = read_sessions_from(file).map_err(|e| CollectionError::io(path, e))?;
    debug!(count = sessions.len(), path = %path.display(), "login records read");
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_PROCESS: i16 = 6;
    const BOOT_TIME: i16 = 2;

    fn encode_record(kind: i16, user: &str, line: &str, host: &str) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        let layout = LOGIN_RECORD;
        buf[layout.kind..layout.kind + 2].copy_from_slice(&kind.to_ne_bytes());
        for (span, text) in [(layout.line, line), (layout.user, user), (layout.host, host)] {
            buf[span.offset..span.offset + text.len()].copy_from_slice(text.as_bytes());
        }
        buf
    }

    #[test]
    fn decodes_fields() {
        let buf = encode_record(USER_PROCESS, "alice", "pts/0", "10.0.0.5");
        let record = LoginRecord::decode(&buf);
        assert!(record.is_user_process());
        assert_eq!(record.session.user, "alice");
        assert_eq!(record.session.line, "pts/0");
        assert_eq!(record.session.host, "10.0.0.5");
    }

    #[test]
    fn full_width_field_without_nul() {
        let name = "u".repeat(LOGIN_RECORD.user.len);
        let buf = encode_record(USER_PROCESS, &name, "tty1", "");
        assert_eq!(LoginRecord::decode(&buf).session.user, name);
    }

    #[test]
    fn keeps_only_user_processes() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&encode_record(BOOT_TIME, "reboot", "~", "6.1.0"));
        stream.extend_from_slice(&encode_record(USER_PROCESS, "alice", "pts/0", "10.0.0.5"));
        stream.extend_from_slice(&encode_record(LOGIN_PROCESS, "LOGIN", "tty1", ""));
        stream.extend_from_slice(&encode_record(USER_PROCESS, "bob", "tty2", ""));

        let sessions = read_sessions_from(stream.as_slice()).unwrap();
        let users: Vec<_> = sessions.iter().map(|s| s.user.as_str()).collect();
        assert_eq!(users, ["alice", "bob"]);
    }

    #[test]
    fn trailing_partial_record_ignored() {
        let mut stream = encode_record(USER_PROCESS, "alice", "pts/0", "").to_vec();
        stream.extend_from_slice(&[0u8; RECORD_SIZE / 2]);
        let sessions = read_sessions_from(stream.as_slice()).unwrap();
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_sessions(Path::new("/nonexistent/sysglance/utmp")).unwrap_err();
        assert!(matches!(err, CollectionError::Io { .. }));
    }
}
