//! One CSV file per staged table. Column headers are `type.field`, e.g. `Video.play_count`.
//!
//! CSV has no null, so empty cells are read back as follows: absent for numeric and boolean
//! columns, the null marker for `definition` / `format`, and the empty string for other text.

use crate::{
    errors::PipelineError,
    io::open_reader,
    staging::{Row, StagedTables},
};
use clipgraph_api::{
    core::{entities::properties::attrs::AttrKey, storage::arc_str::ArcStr, PropType},
    EdgeAttrKey, EdgeType, NodeAttrKey, NodeType, Prop,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

fn table_path(dir: &Path, tag: &str) -> PathBuf {
    dir.join(format!("{tag}.csv"))
}

fn write_table<K: AttrKey>(path: &Path, tag: &str, vocabulary: &[K], rows: &[Row]) -> Result<(), PipelineError> {
    let tag_key = ArcStr::from(tag);
    let columns: Vec<K> = vocabulary
        .iter()
        .copied()
        .filter(|k| *k != K::TYPE_KEY)
        .filter(|k| {
            rows.is_empty()
                || rows
                    .iter()
                    .any(|row| row.contains_key(&(tag_key.clone(), ArcStr::from(k.as_str()))))
        })
        .collect();

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(columns.iter().map(|k| format!("{tag}.{k}")))?;
    for row in rows {
        writer.write_record(columns.iter().map(|k| {
            row.get(&(tag_key.clone(), ArcStr::from(k.as_str())))
                .map(Prop::to_string)
                .unwrap_or_default()
        }))?;
    }
    writer.flush()?;
    debug!(?path, rows = rows.len(), columns = columns.len(), "Wrote table");
    Ok(())
}

fn read_cell<K: AttrKey>(key: K, cell: &str) -> Result<Option<Prop>, PipelineError> {
    let expected = key.prop_type();
    if cell.is_empty() {
        return Ok(match (expected, key.as_str()) {
            (PropType::Str, "definition" | "format") => Some(Prop::Null),
            (PropType::Str, _) => Some(Prop::str("")),
            _ => None,
        });
    }
    Ok(Some(match expected {
        PropType::Str => Prop::str(cell),
        _ => Prop::parse(cell, expected)?,
    }))
}

fn read_table<K: AttrKey>(path: &Path, tag: &str) -> Result<Vec<Row>, PipelineError> {
    let malformed = |reason: String| PipelineError::MalformedTable {
        table: tag.to_owned(),
        reason,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(open_reader(path)?);
    let columns = reader
        .headers()?
        .iter()
        .map(|header| {
            let (found, field) = header
                .split_once('.')
                .ok_or_else(|| malformed(format!("header '{header}' is not of the form type.field")))?;
            if found != tag {
                return Err(malformed(format!("column '{header}' belongs to another table")));
            }
            Ok(field.parse::<K>()?)
        })
        .collect::<Result<Vec<K>, PipelineError>>()?;

    let tag_key = ArcStr::from(tag);
    let mut rows = vec![];
    for record in reader.records() {
        let record = record?;
        let mut row = Row::default();
        for (key, cell) in columns.iter().zip(record.iter()) {
            if let Some(value) = read_cell(*key, cell)? {
                row.insert((tag_key.clone(), ArcStr::from(key.as_str())), value);
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

impl StagedTables {
    /// Write every table into `dir`, which is created if needed.
    pub fn write_csv(&self, dir: impl AsRef<Path>) -> Result<(), PipelineError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        for ntype in NodeType::ALL {
            write_table(
                &table_path(dir, ntype.as_str()),
                ntype.as_str(),
                ntype.attr_keys(),
                self.node_table(ntype),
            )?;
        }
        for etype in EdgeType::ALL {
            write_table(
                &table_path(dir, etype.as_str()),
                etype.as_str(),
                &EdgeAttrKey::ALL,
                self.edge_table(etype),
            )?;
        }
        info!(
            ?dir,
            nodes = self.num_node_rows(),
            edges = self.num_edge_rows(),
            "Wrote staged tables"
        );
        Ok(())
    }

    /// Read the tables written by [`StagedTables::write_csv`]. Missing table files are empty.
    pub fn read_csv(dir: impl AsRef<Path>) -> Result<StagedTables, PipelineError> {
        let dir = dir.as_ref();
        let mut tables = StagedTables::new();
        let mut found = 0;
        for ntype in NodeType::ALL {
            let path = table_path(dir, ntype.as_str());
            if path.exists() {
                found += 1;
                for row in read_table::<NodeAttrKey>(&path, ntype.as_str())? {
                    tables.push_node_row(ntype, row);
                }
            }
        }
        for etype in EdgeType::ALL {
            let path = table_path(dir, etype.as_str());
            if path.exists() {
                found += 1;
                for row in read_table::<EdgeAttrKey>(&path, etype.as_str())? {
                    tables.push_edge_row(etype, row);
                }
            }
        }
        if found == 0 {
            return Err(PipelineError::NoInput(dir.to_path_buf()));
        }
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{video_record, COLLECTED_AT};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn staged() -> StagedTables {
        let mut tables = StagedTables::new();
        let mut first = video_record("1", "7", "10", &[("100", "zouk")]);
        first["video"].as_object_mut().unwrap().remove("definition");
        tables.push_video(&first, COLLECTED_AT).unwrap();
        tables
            .push_video(&video_record("2", "7", "11", &[]), COLLECTED_AT)
            .unwrap();
        tables
    }

    #[test]
    fn tables_survive_a_round_trip() {
        let dir = tempdir().unwrap();
        let tables = staged();
        tables.write_csv(dir.path()).unwrap();
        let back = StagedTables::read_csv(dir.path()).unwrap();
        assert_eq!(back, tables);
        assert_eq!(
            back.into_graph().unwrap().to_node_link(),
            tables.into_graph().unwrap().to_node_link()
        );
    }

    #[test]
    fn headers_are_type_dot_field() {
        let dir = tempdir().unwrap();
        staged().write_csv(dir.path()).unwrap();
        let video = fs::read_to_string(dir.path().join("Video.csv")).unwrap();
        let header = video.lines().next().unwrap();
        assert!(header.starts_with("Video.id,Video.text,Video.creation_time"));
        assert!(!header.contains("Video.timestamp"));
        let edges = fs::read_to_string(dir.path().join("VideoToHashtag.csv")).unwrap();
        assert_eq!(
            edges.lines().collect::<Vec<_>>(),
            vec!["VideoToHashtag.src_original_id,VideoToHashtag.dst_original_id", "1,100"]
        );
    }

    #[test]
    fn foreign_columns_are_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Music.csv"), "Video.id\n1\n").unwrap();
        assert!(matches!(
            StagedTables::read_csv(dir.path()),
            Err(PipelineError::MalformedTable { .. })
        ));
    }

    #[test]
    fn bad_cells_are_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Music.csv"), "Music.id,Music.duration\n1,long\n").unwrap();
        assert!(matches!(
            StagedTables::read_csv(dir.path()),
            Err(PipelineError::Prop(_))
        ));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            StagedTables::read_csv(dir.path()),
            Err(PipelineError::NoInput(_))
        ));
    }
}
