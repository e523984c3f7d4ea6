//! Translation of song paths between the local playlist convention and the
//! orchestrator convention.
//!
//! Playlists are often written on one machine and read on another, so the
//! two sides are reconciled purely by prefix substitution plus, when the two
//! configured prefixes disagree on the separator style, a separator rewrite.

use crate::config::PathSettings;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Separator {
    /// `/`
    Unix,
    /// `\`
    Windows,
}

impl Separator {
    /// Style implied by a configured prefix: anything rooted at `/` is unix.
    pub fn of_prefix(prefix: &str) -> Self {
        if prefix.starts_with('/') {
            Self::Unix
        } else {
            Self::Windows
        }
    }

    /// Separator a prefix actually uses, defaulting to `/`.
    fn used_in(prefix: &str) -> Self {
        if prefix.contains('\\') && !prefix.contains('/') {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Unix => '/',
            Self::Windows => '\\',
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PathConvention {
    /// Paths as stored inside the playlist files.
    Local,
    /// Paths as resolved by the orchestrator on this machine.
    Orchestrator,
}

#[derive(Debug, Clone)]
pub struct PathTranslator {
    local_prefix: String,
    orchestrator_prefix: String,
    convert: bool,
}

impl PathTranslator {
    pub fn new(local_prefix: impl Into<String>, orchestrator_prefix: impl Into<String>) -> Self {
        let local_prefix = local_prefix.into();
        let orchestrator_prefix = orchestrator_prefix.into();
        let convert = Separator::of_prefix(&local_prefix) != Separator::of_prefix(&orchestrator_prefix);
        Self {
            local_prefix,
            orchestrator_prefix,
            convert,
        }
    }

    pub fn from_settings(settings: &PathSettings) -> Self {
        Self::new(&settings.local_prefix, &settings.orchestrator_prefix)
    }

    /// Whether the two conventions use different separator styles.
    pub fn converts_separators(&self) -> bool {
        self.convert
    }

    pub fn prefix(&self, convention: PathConvention) -> &str {
        match convention {
            PathConvention::Local => &self.local_prefix,
            PathConvention::Orchestrator => &self.orchestrator_prefix,
        }
    }

    pub fn style(&self, convention: PathConvention) -> Separator {
        Separator::of_prefix(self.prefix(convention))
    }

    /// Remove the convention's prefix from the start of `path`, then any
    /// leading separators of either style. Separators in the prefix match
    /// either style in `path`. An unconfigured prefix leaves `path` untouched.
    pub fn strip_prefix(&self, path: &str, convention: PathConvention) -> String {
        let prefix = self.prefix(convention);
        if prefix.is_empty() {
            return path.to_string();
        }
        strip_leading(path, prefix)
            .unwrap_or(path)
            .trim_start_matches(['/', '\\'])
            .to_string()
    }

    /// Rewrite every separator in `path` to `target`. No-op unless the two
    /// conventions use different styles.
    pub fn convert_separators(&self, path: &str, target: Separator) -> String {
        if !self.convert {
            return path.to_string();
        }
        match target {
            Separator::Unix => path.replace('\\', "/"),
            Separator::Windows => path.replace('/', "\\"),
        }
    }

    /// Resolve a playlist entry to a path the orchestrator can open.
    pub fn to_orchestrator(&self, entry: &str) -> String {
        let target = self.style(PathConvention::Orchestrator);
        let fragment = self.strip_prefix(entry, PathConvention::Local);
        let fragment = self.convert_separators(&fragment, target);
        self.join(&self.orchestrator_prefix, &fragment, target)
    }

    /// Turn an orchestrator `location` back into a playlist entry.
    pub fn to_local(&self, location: &str) -> String {
        let target = self.style(PathConvention::Local);
        let fragment = self.strip_prefix(location, PathConvention::Orchestrator);
        let fragment = self.convert_separators(&fragment, target);
        let prefix = self.convert_separators(&self.local_prefix, target);
        let joined = self.join(&prefix, &fragment, target);
        self.convert_separators(&joined, target)
    }

    /// Append `fragment` to `prefix` with exactly one separator between them.
    pub fn join(&self, prefix: &str, fragment: &str, target: Separator) -> String {
        if prefix.is_empty() {
            return fragment.to_string();
        }
        if prefix.ends_with(['/', '\\']) {
            return format!("{prefix}{fragment}");
        }
        let sep = if self.convert {
            target
        } else {
            Separator::used_in(prefix)
        };
        format!("{prefix}{}{fragment}", sep.as_char())
    }
}

fn is_separator(b: u8) -> bool {
    b == b'/' || b == b'\\'
}

/// `path` without its leading `prefix`, treating `/` and `\` as equal.
fn strip_leading<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let head = path.get(..prefix.len())?;
    let same = head
        .bytes()
        .zip(prefix.bytes())
        .all(|(a, b)| a == b || (is_separator(a) && is_separator(b)));
    same.then(|| &path[prefix.len()..])
}
