use crate::{dataset::ScrapeDataset, errors::PipelineError, io::open_reader};
use rayon::prelude::*;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::{
    collections::VecDeque,
    fs,
    io::BufRead,
    marker::PhantomData,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Reads JSON-lines records, one document per line, from a file or a directory tree.
#[derive(Debug)]
pub struct JsonLinesLoader<REC: DeserializeOwned> {
    /// File, or directory searched recursively.
    path: PathBuf,
    /// Only files whose path matches are read.
    regex_filter: Option<Regex>,
    /// Undecodable records are logged and dropped instead of failing the load.
    skip_invalid: bool,
    _rec: PhantomData<fn() -> REC>,
}

impl<REC: DeserializeOwned + Send> JsonLinesLoader<REC> {
    pub fn new(path: impl Into<PathBuf>, regex_filter: Option<Regex>) -> Self {
        Self {
            path: path.into(),
            regex_filter,
            skip_invalid: false,
            _rec: PhantomData,
        }
    }

    pub fn set_skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    fn is_dir<P: AsRef<Path>>(p: &P) -> Result<bool, PipelineError> {
        Ok(fs::metadata(p)?.is_dir())
    }

    fn accept_file(&self, path: PathBuf, paths: &mut Vec<PathBuf>) {
        match &self.regex_filter {
            Some(pattern) => {
                if path.to_str().is_some_and(|name| pattern.is_match(name)) {
                    paths.push(path);
                }
            }
            None => paths.push(path),
        }
    }

    /// Every accepted file under the loader's path, sorted so loads are reproducible.
    pub fn files_vec(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let mut paths = vec![];
        if !Self::is_dir(&self.path)? {
            self.accept_file(self.path.clone(), &mut paths);
            return Ok(paths);
        }
        let mut queue = VecDeque::from([self.path.clone()]);
        while let Some(dir) = queue.pop_back() {
            for entry in fs::read_dir(&dir)?.flatten() {
                let p = entry.path();
                if Self::is_dir(&p)? {
                    queue.push_back(p);
                } else {
                    self.accept_file(p, &mut paths);
                }
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Decode every record. Files are read in parallel; the result keeps file order and record
    /// order within each file.
    pub fn load(&self) -> Result<Vec<REC>, PipelineError> {
        let paths = self.files_vec()?;
        if paths.is_empty() {
            return Err(PipelineError::NoInput(self.path.clone()));
        }
        let per_file = paths
            .par_iter()
            .map(|path| self.load_file(path))
            .collect::<Result<Vec<_>, _>>()?;
        let records: Vec<REC> = per_file.into_iter().flatten().collect();
        info!(files = paths.len(), records = records.len(), "Loaded JSON records");
        Ok(records)
    }

    fn load_file(&self, path: &Path) -> Result<Vec<REC>, PipelineError> {
        debug!(?path, "Loading file");
        let reader = open_reader(path)?;
        let mut records = vec![];
        let mut skipped = 0usize;
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<REC>(&line) {
                Ok(record) => records.push(record),
                Err(err) if self.skip_invalid => {
                    warn!(?path, line = line_no + 1, error = %err, "Skipping undecodable record");
                    skipped += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
        if skipped > 0 {
            info!(?path, loaded = records.len(), skipped, "Loaded file with skipped records");
        }
        Ok(records)
    }
}

/// Load a [`ScrapeDataset`] stored as one JSON document.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<ScrapeDataset, PipelineError> {
    let path = path.as_ref();
    let dataset: ScrapeDataset = serde_json::from_reader(open_reader(path)?)?;
    info!(
        ?path,
        videos = dataset.list_video_data.len(),
        "Loaded scrape dataset"
    );
    Ok(dataset)
}

pub fn save_dataset(dataset: &ScrapeDataset, path: impl AsRef<Path>) -> Result<(), PipelineError> {
    crate::io::write_with(path.as_ref(), |w| Ok(serde_json::to_writer(w, dataset)?))
}
