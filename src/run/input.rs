/// One line typed during an interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Input {
    Start,
    Pause,
    /// Set the topic used by the next `finish`
    Topic(String),
    /// Finish, optionally overriding the current topic
    Finish(Option<String>),
    Status,
    Reset,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub(crate) const HELP: &str = "\
Commands:
  start, s            start or resume the timer
  pause, p            pause the timer
  topic, t <text>     set the study topic
  finish, f [topic]   stop and record the session
  status              show elapsed time
  reset               discard the current session
  help, ?             show this help
  quit, q             leave (an unfinished session is discarded)";

pub(crate) fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    let rest = (!rest.is_empty()).then(|| rest.to_string());

    match word.to_ascii_lowercase().as_str() {
        "start" | "s" | "resume" => Input::Start,
        "pause" | "p" => Input::Pause,
        "topic" | "t" => Input::Topic(rest.unwrap_or_default()),
        "finish" | "f" | "stop" => Input::Finish(rest),
        "status" | "st" => Input::Status,
        "reset" => Input::Reset,
        "help" | "h" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        _ => Input::Unknown(word.to_string()),
    }
}
