use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// File mode codes as recorded in tree entries and the index
///
/// The codes follow the git convention: `100644` regular, `100755`
/// executable, `040000` directory, `120000` symlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
    Directory,
    Symlink,
}

impl FileMode {
    pub fn as_str(&self) -> &str {
        match self {
            FileMode::Regular => "100644",
            FileMode::Executable => "100755",
            FileMode::Directory => "040000",
            FileMode::Symlink => "120000",
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, FileMode::Directory)
    }

    /// Whether this mode is accepted by the index
    ///
    /// The index allow-list is narrower than the object model: symlinks are
    /// valid in tree entries but cannot be staged.
    pub fn is_indexable(&self) -> bool {
        matches!(
            self,
            FileMode::Regular | FileMode::Executable | FileMode::Directory
        )
    }
}

impl TryFrom<&str> for FileMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "100644" => Ok(FileMode::Regular),
            "100755" => Ok(FileMode::Executable),
            "040000" => Ok(FileMode::Directory),
            "120000" => Ok(FileMode::Symlink),
            _ => Err(anyhow::anyhow!("Invalid file mode: {value}")),
        }
    }
}

impl std::fmt::Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for FileMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FileMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        FileMode::try_from(raw.as_str()).map_err(serde::de::Error::custom)
    }
}
