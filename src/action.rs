use std::fmt;
use std::str::FromStr;

/// Routing key selecting which controller a request invokes.
///
/// Closed enumeration shared with the front-end client; the wire spelling is
/// the lowercase variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Add,
    Delete,
    Search,
    Cal,
    Config,
    Download,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Delete => "delete",
            Action::Search => "search",
            Action::Cal => "cal",
            Action::Config => "config",
            Action::Download => "download",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown action name; callers decide whether that means 404 or fall-through.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Action::Add),
            "delete" => Ok(Action::Delete),
            "search" => Ok(Action::Search),
            "cal" => Ok(Action::Cal),
            "config" => Ok(Action::Config),
            "download" => Ok(Action::Download),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}
