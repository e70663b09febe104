use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};

use crate::{Directives, domain::ParseError};

/// The default location of the OpenSSH server configuration.
pub const DEFAULT_PATH: &str = "/etc/ssh/sshd_config";

/// Errors that can occur while loading or saving a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file could not be opened, read or written.
    #[error("failed to access '{}': {source}", .path.display())]
    FileAccess {
        /// The file that was being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The file was read but contained no directives.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A configuration file at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}

impl ConfigFile {
    /// Refer to the configuration file at `path`.
    ///
    /// Nothing is read until [`Self::load`] is called.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
    /// stray Latin-1 comment does not hide the directives around it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileAccess`] if the file cannot be read, or
    /// [`Error::Parse`] if it contains no directives.
    #[instrument(level = "debug")]
    pub fn load(&self) -> Result<Directives, Error> {
        let bytes = fs::read(&self.path).map_err(|source| self.access_error(source))?;
        let directives: Directives = String::from_utf8_lossy(&bytes).parse()?;
        debug!(directives = directives.len(), "loaded configuration");
        Ok(directives)
    }

    /// Overwrite the file with the serialized directives.
    ///
    /// The file must already exist; it is truncated and rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileAccess`] if the file cannot be opened or written.
    #[instrument(level = "debug", skip(directives))]
    pub fn save(&self, directives: &Directives) -> Result<(), Error> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| self.access_error(source))?;

        file.write_all(directives.to_string().as_bytes())
            .map_err(|source| self.access_error(source))?;

        debug!(directives = directives.len(), "saved configuration");
        Ok(())
    }

    fn access_error(&self, source: io::Error) -> Error {
        Error::FileAccess {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn config_file(contents: &str) -> (tempfile::NamedTempFile, ConfigFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let config = ConfigFile::new(file.path());
        (file, config)
    }

    #[test]
    fn load_reads_directives() {
        let (_file, config) = config_file("# comment\nPort 22\nUsePAM yes\n");
        let directives = config.load().unwrap();
        assert_eq!(directives.len(), 2);
        assert_eq!(directives.values("Port").collect::<Vec<_>>(), vec!["22"]);
    }

    #[test]
    fn load_missing_file_is_an_access_error() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ConfigFile::new(tmp.path().join("sshd_config"));

        let error = config.load().unwrap_err();
        assert!(matches!(error, Error::FileAccess { .. }));
        assert!(error.to_string().starts_with("failed to access"));
    }

    #[test]
    fn load_file_without_directives_is_a_parse_error() {
        let (_file, config) = config_file("# nothing here\n\n");
        let error = config.load().unwrap_err();
        assert!(matches!(error, Error::Parse(ParseError::EmptyConfig)));
        assert_eq!(error.to_string(), "no entries found in file");
    }

    #[test]
    fn load_tolerates_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"# Configuraci\xf3n\nPermitRootLogin no\nUsePAM yes\n")
            .unwrap();
        let config = ConfigFile::new(file.path());

        let mut directives = config.load().unwrap();
        assert_eq!(directives.len(), 2);

        directives.set("Port", "2222");
        config.save(&directives).unwrap();
        assert_eq!(
            fs::read_to_string(file.path()).unwrap(),
            "PermitRootLogin no\nPort 2222\nUsePAM yes"
        );
    }

    #[test]
    fn save_truncates_and_sorts() {
        let (file, config) = config_file("# a long header that must disappear\nUsePAM yes\nPort 22\n");
        let mut directives = config.load().unwrap();
        directives.add("Port", "2222");
        config.save(&directives).unwrap();

        let written = fs::read_to_string(file.path()).unwrap();
        assert_eq!(written, "Port 22\nPort 2222\nUsePAM yes");
    }

    #[test]
    fn save_round_trips() {
        let (_file, config) = config_file("Port\t22\nPort 2222\nHostKey /etc/ssh/ssh_host_rsa_key\n");
        let first = config.load().unwrap();
        config.save(&first).unwrap();
        let second = config.load().unwrap();
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn save_does_not_create_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sshd_config");
        let config = ConfigFile::new(&path);

        let error = config.save(&"Port 22".parse().unwrap()).unwrap_err();
        assert!(matches!(error, Error::FileAccess { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn default_points_at_system_config() {
        assert_eq!(ConfigFile::default().path(), Path::new(DEFAULT_PATH));
    }
}
