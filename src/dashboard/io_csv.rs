// Primitives for reading and writing the vote file.

use std::fs;
use std::path::{Path, PathBuf};

use community_scores::builder::BallotBuilder;
use serde::{Deserialize, Serialize};

use crate::dashboard::*;

pub const HEADER: [&str; 4] = ["votante", "evaluado", "categoria", "puntos"];

/// One line of the vote file.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct VoteRow {
    votante: String,
    evaluado: String,
    categoria: String,
    puntos: u32,
}

impl From<VoteRow> for Vote {
    fn from(row: VoteRow) -> Vote {
        Vote {
            voter: row.votante,
            evaluated: row.evaluado,
            category: row.categoria,
            points: row.puntos,
        }
    }
}

impl From<&Vote> for VoteRow {
    fn from(v: &Vote) -> VoteRow {
        VoteRow {
            votante: v.voter.clone(),
            evaluado: v.evaluated.clone(),
            categoria: v.category.clone(),
            puntos: v.points,
        }
    }
}

/// The CSV file holding all the votes.
///
/// Readers go through `&self`. Submitting needs `&mut self`, so a store
/// value is the only writer of its file within the process. Other processes
/// are not coordinated with.
#[derive(Debug)]
pub struct VoteStore {
    path: PathBuf,
}

impl VoteStore {
    /// Opens the vote file, creating it with its header if it does not exist.
    pub fn open(path: &Path) -> DashResult<VoteStore> {
        let store = VoteStore {
            path: path.to_path_buf(),
        };
        if !path.exists() {
            info!("VoteStore::open: creating {:?}", path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).context(WritingFileSnafu {
                    path: parent.display().to_string(),
                })?;
            }
            store.write_all(&[]).map_err(|e| match e {
                DashError::CsvWrite { source, path } => DashError::CsvCreate { source, path },
                e => e,
            })?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }

    /// Reads every vote, in file order.
    pub fn read_votes(&self) -> DashResult<Vec<Vote>> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .context(CsvOpenSnafu {
                path: self.path_str(),
            })?;
        let mut res: Vec<Vote> = Vec::new();
        for (idx, row_r) in rdr.deserialize::<VoteRow>().enumerate() {
            // The header is line 1.
            let lineno = (idx + 2) as u64;
            let row = row_r.context(CsvLineParseSnafu { lineno })?;
            res.push(row.into());
        }
        debug!("read_votes: {} votes from {:?}", res.len(), self.path);
        Ok(res)
    }

    pub fn read_raw(&self) -> DashResult<String> {
        fs::read_to_string(&self.path).context(ReadingFileSnafu {
            path: self.path_str(),
        })
    }

    /// Records a ballot.
    ///
    /// The file is read again right before writing, so that the already voted
    /// check sees the votes submitted since the last read. The whole file is
    /// then rewritten with the new votes at the end.
    pub fn submit(&mut self, ballot: &BallotBuilder<'_>) -> DashResult<Vec<Vote>> {
        let mut votes = self.read_votes()?;
        let new_votes = ballot.build(&votes).context(ScoringSnafu {})?;
        info!(
            "VoteStore::submit: appending {} votes to {} existing",
            new_votes.len(),
            votes.len()
        );
        votes.extend(new_votes.iter().cloned());
        self.write_all(&votes)?;
        Ok(new_votes)
    }

    /// Copies the vote file as is. Returns the number of bytes copied.
    pub fn export_raw(&self, dest: &Path) -> DashResult<u64> {
        fs::copy(&self.path, dest).context(WritingFileSnafu {
            path: dest.display().to_string(),
        })
    }

    // Writes to a sibling file first, then renames it over the vote file.
    fn write_all(&self, votes: &[Vote]) -> DashResult<()> {
        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);
        let tmp_str = tmp_path.display().to_string();

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&tmp_path)
            .context(CsvWriteSnafu {
                path: tmp_str.clone(),
            })?;
        wtr.write_record(HEADER).context(CsvWriteSnafu {
            path: tmp_str.clone(),
        })?;
        for v in votes.iter() {
            wtr.serialize(VoteRow::from(v)).context(CsvWriteSnafu {
                path: tmp_str.clone(),
            })?;
        }
        wtr.flush().context(WritingFileSnafu {
            path: tmp_str.clone(),
        })?;
        drop(wtr);
        fs::rename(&tmp_path, &self.path).context(WritingFileSnafu {
            path: self.path_str(),
        })
    }
}
