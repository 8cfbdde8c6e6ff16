//! File formats at the edge of the pipeline. Files ending in `.gz` or `.bz2` are transparently
//! (de)compressed.

pub mod csv_tables;
pub mod json_loader;
pub mod node_link;

use bzip2::{read::BzDecoder, write::BzEncoder};
use flate2::{read::GzDecoder, write::GzEncoder};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Compression {
    None,
    Gzip,
    Bzip2,
}

impl Compression {
    pub(crate) fn of(path: &Path) -> Self {
        match path.file_name().and_then(|name| name.to_str()) {
            Some(name) if name.ends_with(".gz") => Compression::Gzip,
            Some(name) if name.ends_with(".bz2") => Compression::Bzip2,
            _ => Compression::None,
        }
    }
}

pub(crate) fn open_reader(path: &Path) -> io::Result<BufReader<Box<dyn Read>>> {
    let f = File::open(path)?;
    let inner: Box<dyn Read> = match Compression::of(path) {
        Compression::Gzip => Box::new(GzDecoder::new(f)),
        Compression::Bzip2 => Box::new(BzDecoder::new(f)),
        Compression::None => Box::new(f),
    };
    Ok(BufReader::new(inner))
}

/// Write through a (possibly compressing) writer and finish the stream.
pub(crate) fn write_with<F>(path: &Path, body: F) -> Result<(), crate::errors::PipelineError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), crate::errors::PipelineError>,
{
    let f = BufWriter::new(File::create(path)?);
    match Compression::of(path) {
        Compression::Gzip => {
            let mut w = GzEncoder::new(f, flate2::Compression::default());
            body(&mut w)?;
            w.finish()?.flush()?;
        }
        Compression::Bzip2 => {
            let mut w = BzEncoder::new(f, bzip2::Compression::default());
            body(&mut w)?;
            w.finish()?.flush()?;
        }
        Compression::None => {
            let mut w = f;
            body(&mut w)?;
            w.flush()?;
        }
    }
    Ok(())
}
