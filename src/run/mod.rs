//! Interactive study session
//!
//! A reader thread forwards stdin lines over a channel. The loop owns the
//! timer and the log, and redraws the elapsed time on every tick while the
//! timer runs and stdout is a terminal.

mod input;

use chrono::{DateTime, FixedOffset};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::core::SessionRecord;
use crate::error::AppError;
use crate::store::SessionLog;
use crate::timer::{Phase, Timer, format_elapsed};
use crate::utils::{Timezone, debug_enabled};

pub(crate) use input::{HELP, Input, parse_input};

/// What the loop should print and whether it should stop
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Reply {
    pub(crate) message: Option<String>,
    pub(crate) quit: bool,
}

impl Reply {
    fn say(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            quit: false,
        }
    }

    fn silent() -> Self {
        Self::default()
    }
}

pub(crate) struct StudySession<'a> {
    timer: Timer,
    topic: String,
    log: &'a SessionLog,
    timezone: Timezone,
}

impl<'a> StudySession<'a> {
    pub(crate) fn new(log: &'a SessionLog, timezone: Timezone, topic: Option<String>) -> Self {
        Self {
            timer: Timer::new(),
            topic: topic.unwrap_or_default(),
            log,
            timezone,
        }
    }

    pub(crate) fn has_unfinished(&self) -> bool {
        self.timer.phase() != Phase::Idle
    }

    pub(crate) fn handle(&mut self, input: Input, now: Instant) -> Result<Reply, AppError> {
        let reply = match input {
            Input::Start => {
                if self.timer.start(now) {
                    Reply::say(format!("Started at {}", self.elapsed_text(now)))
                } else {
                    Reply::say("Timer is already running")
                }
            }
            Input::Pause => {
                if self.timer.pause(now) {
                    Reply::say(format!("Paused at {}", self.elapsed_text(now)))
                } else {
                    Reply::say("Timer is not running")
                }
            }
            Input::Topic(topic) => {
                self.topic = topic;
                if self.topic.trim().is_empty() {
                    Reply::say("Topic cleared")
                } else {
                    Reply::say(format!("Topic: {}", self.topic))
                }
            }
            Input::Finish(topic) => {
                if let Some(topic) = topic {
                    self.topic = topic;
                }
                let ended_at = self.timezone.now();
                return self.finish(now, ended_at);
            }
            Input::Status => Reply::say(self.status_line(now)),
            Input::Reset => {
                self.timer.reset();
                Reply::say("Session discarded")
            }
            Input::Help => Reply::say(HELP),
            Input::Quit => Reply {
                message: None,
                quit: true,
            },
            Input::Empty => Reply::silent(),
            Input::Unknown(word) => Reply::say(format!("Unknown command: {word} (type `help`)")),
        };
        Ok(reply)
    }

    /// Record the running or paused session.
    ///
    /// The timer is only reset once the record and its backup are on disk.
    /// A failed append leaves the log untouched, so retrying is safe.
    fn finish(&mut self, now: Instant, ended_at: DateTime<FixedOffset>) -> Result<Reply, AppError> {
        let mut next = self.timer.clone();
        let Some(done) = next.finish(&self.topic, now)? else {
            return Ok(Reply::say("Timer has not been started"));
        };

        let record = SessionRecord::from_finished(done, ended_at);
        let backup = self.log.append(&record)?;
        self.timer = next;
        self.topic.clear();

        Ok(Reply::say(format!(
            "Recorded {} of {} ({}, {}). Backup: {}",
            record.duration,
            record.topic,
            record.date,
            record.shift,
            backup_name(&backup)
        )))
    }

    pub(crate) fn status_line(&self, now: Instant) -> String {
        let topic = self.topic.trim();
        if topic.is_empty() {
            format!("[{}] {}", self.timer.phase().label(), self.elapsed_text(now))
        } else {
            format!(
                "[{}] {}  {}",
                self.timer.phase().label(),
                self.elapsed_text(now),
                topic
            )
        }
    }

    fn elapsed_text(&self, now: Instant) -> String {
        format_elapsed(self.timer.elapsed(now))
    }
}

fn backup_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run the interactive loop until `quit` or end of input
pub(crate) fn run_interactive(
    log: &SessionLog,
    timezone: Timezone,
    topic: Option<String>,
    tick: Duration,
) -> Result<(), AppError> {
    let live = io::stdout().is_terminal();
    let mut session = StudySession::new(log, timezone, topic);
    let rx = spawn_stdin_reader();

    println!("Study timer. Log: {}", log.path().display());
    println!("{HELP}");
    if debug_enabled() {
        eprintln!("Tick interval: {}ms, live display: {}", tick.as_millis(), live);
    }

    let mut shown = String::new();
    loop {
        match rx.recv_timeout(tick) {
            Ok(line) => {
                if !shown.is_empty() {
                    println!();
                    shown.clear();
                }
                match session.handle(parse_input(&line), Instant::now()) {
                    Ok(reply) => {
                        if let Some(message) = reply.message {
                            println!("{message}");
                        }
                        if reply.quit {
                            break;
                        }
                    }
                    Err(e) if e.is_user_error() => eprintln!("Warning: {e}"),
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if live && session.timer.is_running() {
                    let line = session.status_line(Instant::now());
                    if line != shown {
                        print!("\r{line}");
                        let _ = io::stdout().flush();
                        shown = line;
                    }
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    if !shown.is_empty() {
        println!();
    }
    if session.has_unfinished() {
        eprintln!(
            "Warning: unfinished session ({}) was not recorded",
            session.elapsed_text(Instant::now())
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DateFilter;
    use chrono::TimeZone;
    use std::fs;

    fn setup() -> (tempfile::TempDir, SessionLog) {
        let tmp = tempfile::tempdir().unwrap();
        let log = SessionLog::in_dir(tmp.path());
        (tmp, log)
    }

    fn utc_tz() -> Timezone {
        Timezone::Named(chrono_tz::UTC)
    }

    fn evening() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 16, 20, 15, 0)
            .unwrap()
    }

    #[test]
    fn finish_without_topic_writes_nothing() {
        let (_tmp, log) = setup();
        let mut session = StudySession::new(&log, utc_tz(), None);
        let t0 = Instant::now();
        session.handle(Input::Start, t0).unwrap();

        let err = session
            .handle(Input::Finish(None), t0 + Duration::from_secs(60))
            .unwrap_err();
        assert!(matches!(err, AppError::MissingInput { .. }));
        assert!(!log.path().exists());
        assert!(log.backups().list().is_empty());
        assert!(session.timer.is_running());
    }

    #[test]
    fn finish_records_session_with_shift_and_backup() {
        let (_tmp, log) = setup();
        let mut session = StudySession::new(&log, utc_tz(), Some("Geometry".to_string()));
        let t0 = Instant::now();
        session.handle(Input::Start, t0).unwrap();

        let reply = session
            .finish(t0 + Duration::from_secs(3661), evening())
            .unwrap();
        let message = reply.message.unwrap();
        assert!(message.starts_with("Recorded 01:01:01 of Geometry (2026-10-16, Evening)"));

        let records = log.read(&DateFilter::default()).unwrap().records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "Geometry");
        assert_eq!(records[0].duration, "01:01:01");
        assert_eq!(log.backups().list().len(), 1);
        assert!(!session.has_unfinished());
        assert!(session.topic.is_empty());
    }

    #[test]
    fn finish_argument_overrides_topic() {
        let (_tmp, log) = setup();
        let mut session = StudySession::new(&log, utc_tz(), Some("Old".to_string()));
        let t0 = Instant::now();
        session.handle(Input::Start, t0).unwrap();
        session
            .handle(Input::Finish(Some("New".to_string())), t0)
            .unwrap();
        let records = log.read(&DateFilter::default()).unwrap().records;
        assert_eq!(records[0].topic, "New");
    }

    #[test]
    fn finish_before_start_records_nothing() {
        let (_tmp, log) = setup();
        let mut session = StudySession::new(&log, utc_tz(), Some("Music".to_string()));
        let reply = session.handle(Input::Finish(None), Instant::now()).unwrap();
        assert_eq!(reply.message.as_deref(), Some("Timer has not been started"));
        assert!(!log.path().exists());
    }

    #[test]
    fn failed_write_keeps_session() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the data directory should be makes every write fail
        let blocker = tmp.path().join("blocked");
        fs::write(&blocker, "").unwrap();
        let log = SessionLog::in_dir(&blocker);

        let mut session = StudySession::new(&log, utc_tz(), Some("Art".to_string()));
        let t0 = Instant::now();
        session.handle(Input::Start, t0).unwrap();
        let err = session.finish(t0 + Duration::from_secs(5), evening()).unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
        assert!(session.has_unfinished());
        assert_eq!(session.topic, "Art");
    }

    #[test]
    fn retry_after_failed_backup_records_session_once() {
        let (_tmp, log) = setup();
        fs::write(log.backups().path(), "").unwrap();

        let mut session = StudySession::new(&log, utc_tz(), Some("Logic".to_string()));
        let t0 = Instant::now();
        session.handle(Input::Start, t0).unwrap();
        assert!(session.finish(t0 + Duration::from_secs(30), evening()).is_err());
        assert!(session.has_unfinished());

        fs::remove_file(log.backups().path()).unwrap();
        session.finish(t0 + Duration::from_secs(40), evening()).unwrap();

        let records = log.read(&DateFilter::default()).unwrap().records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duration, "00:00:40");
        assert_eq!(log.backups().list().len(), 1);
    }

    #[test]
    fn pause_and_resume_messages() {
        let (_tmp, log) = setup();
        let mut session = StudySession::new(&log, utc_tz(), None);
        let t0 = Instant::now();
        let reply = session.handle(Input::Pause, t0).unwrap();
        assert_eq!(reply.message.as_deref(), Some("Timer is not running"));

        session.handle(Input::Start, t0).unwrap();
        let reply = session.handle(Input::Start, t0).unwrap();
        assert_eq!(reply.message.as_deref(), Some("Timer is already running"));

        let reply = session
            .handle(Input::Pause, t0 + Duration::from_secs(90))
            .unwrap();
        assert_eq!(reply.message.as_deref(), Some("Paused at 00:01:30"));
    }

    #[test]
    fn status_line_shows_phase_time_and_topic() {
        let (_tmp, log) = setup();
        let mut session = StudySession::new(&log, utc_tz(), None);
        let t0 = Instant::now();
        assert_eq!(session.status_line(t0), "[idle] 00:00:00");

        session.handle(Input::Topic("Poetry".to_string()), t0).unwrap();
        session.handle(Input::Start, t0).unwrap();
        assert_eq!(
            session.status_line(t0 + Duration::from_secs(75)),
            "[running] 00:01:15  Poetry"
        );
    }

    #[test]
    fn reset_discards_and_quit_stops() {
        let (_tmp, log) = setup();
        let mut session = StudySession::new(&log, utc_tz(), None);
        let t0 = Instant::now();
        session.handle(Input::Start, t0).unwrap();
        session.handle(Input::Reset, t0).unwrap();
        assert!(!session.has_unfinished());

        let reply = session.handle(Input::Quit, t0).unwrap();
        assert!(reply.quit);
        assert_eq!(session.handle(Input::Empty, t0).unwrap(), Reply::default());
    }
}
