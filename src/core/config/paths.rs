use crate::flags::Flags;
use crate::path::PathExpander;
use std::path::PathBuf;

const RC_FILE: &str = ".venarc";

/// Where the startup rc file lives and whether the user asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub rc_path: PathBuf,
    /// Set when the path came from `--config`; a missing file is then an error.
    pub explicit: bool,
}

impl ConfigPaths {
    /// `--config <file>` wins; otherwise `~/.venarc` if a home directory is
    /// known. `None` means there is nothing to source.
    pub fn from_flags(flags: &Flags) -> Option<Self> {
        if let Some(path) = flags.get_value("config") {
            return Some(ConfigPaths {
                rc_path: PathBuf::from(path),
                explicit: true,
            });
        }

        PathExpander::new()
            .get_home_dir()
            .ok()
            .map(|home| ConfigPaths {
                rc_path: home.join(RC_FILE),
                explicit: false,
            })
    }
}
