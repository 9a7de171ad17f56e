use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};

use crate::{CascadeError, ResultTree};

/// Keeps a complete enumeration result as JSON file.
pub struct TreeCache {
    path: PathBuf,
    max_age: Option<Duration>,
    reload: bool,
}

impl TreeCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_age: None,
            reload: false,
        }
    }

    pub fn max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn reload(mut self, reload: bool) -> Self {
        self.reload = reload;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_stale(&self) -> Result<bool, CascadeError> {
        if self.reload || !self.path.is_file() {
            return Ok(true);
        }
        let max_age = match self.max_age {
            Some(max_age) => max_age,
            None => return Ok(false),
        };
        let modified = fs::metadata(&self.path)?.modified()?;
        match modified.elapsed() {
            Ok(age) => Ok(age > max_age),
            Err(_) => {
                warn!("cache file {:?} modified in the future", self.path);
                Ok(false)
            }
        }
    }

    pub fn read(&self) -> Result<ResultTree, CascadeError> {
        let json = fs::read_to_string(&self.path)?;
        ResultTree::from_json(&json)
            .map_err(|error| CascadeError::Cache(format!("{:?} unreadable, {error}", self.path)))
    }

    pub fn write(&self, tree: &ResultTree) -> Result<(), CascadeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, tree.to_json()?)?;
        Ok(())
    }

    /// Returns cached tree while it is fresh, otherwise runs enumeration and
    /// stores its result. Failed runs leave the cache untouched.
    pub fn fetch<F>(&self, run: F) -> Result<ResultTree, CascadeError>
    where
        F: FnOnce() -> Result<ResultTree, CascadeError>,
    {
        if !self.is_stale()? {
            info!("read cascade from cache {:?}", self.path);
            return self.read();
        }
        let tree = run()?;
        self.write(&tree)?;
        info!("cascade cached to {:?}", self.path);
        Ok(tree)
    }
}
