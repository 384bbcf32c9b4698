//! Result export.
//!
//! Flat record-per-solution CSV written when the search terminates on
//! its wall-clock budget: a `groupname` column followed by the five
//! objective scores in registration order, one row per surviving
//! population entry.

use std::path::Path;

use thiserror::Error;

use crate::objectives::ObjectiveSet;
use crate::population::Population;

/// Result-file writing failure.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv writer error: {0}")]
    Finish(String),
}

/// Renders the result records to a CSV string.
///
/// The header is `groupname` plus the registered objective names, so it
/// stays in lockstep with the evaluation coordinate order.
pub fn render_results(
    group: &str,
    objectives: &ObjectiveSet,
    population: &Population,
) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(vec![]);

    let mut header = vec!["groupname"];
    header.extend(objectives.names());
    writer.write_record(&header)?;

    for (evaluation, _) in population.iter() {
        let mut record = vec![group.to_string()];
        record.extend(evaluation.values().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| ExportError::Finish(e.to_string()))?;
    String::from_utf8(data).map_err(|e| ExportError::Finish(e.to_string()))
}

/// Writes the result records to a file.
pub fn write_results(
    path: impl AsRef<Path>,
    group: &str,
    objectives: &ObjectiveSet,
    population: &Population,
) -> Result<(), ExportError> {
    let contents = render_results(group, objectives, population)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssignmentMatrix, Section, Ta};
    use crate::objectives::AssignmentProblem;

    fn populated() -> (ObjectiveSet, Population) {
        let problem = AssignmentProblem::new(
            vec![Ta::new("t0", 1), Ta::new("t1", 1)],
            vec![Section::new("s0", "M 10", 1), Section::new("s1", "T 12", 1)],
        );
        let objectives = ObjectiveSet::standard();

        let mut population = Population::new();
        for matrix in [AssignmentMatrix::zeros(2, 2), AssignmentMatrix::ones(2, 2)] {
            population.insert(objectives.evaluate(&problem, &matrix), matrix);
        }
        (objectives, population)
    }

    #[test]
    fn test_header_matches_registration_order() {
        let (objectives, _) = populated();
        let out = render_results("jms", &objectives, &Population::new()).unwrap();
        assert_eq!(
            out.trim_end(),
            "groupname,overallocation,conflicts,undersupport,unwilling,unpreferred"
        );
    }

    #[test]
    fn test_one_row_per_entry() {
        let (objectives, population) = populated();
        let out = render_results("jms", &objectives, &population).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1..].iter().all(|l| l.starts_with("jms,")));
        // Empty grid on this dataset: no costs except two short sections
        assert!(out.contains("jms,0,0,2,0,0"));
    }

    #[test]
    fn test_rows_parse_back() {
        let (objectives, population) = populated();
        let out = render_results("jms", &objectives, &population).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_bytes());
        assert_eq!(reader.headers().unwrap().len(), 6);
        let mut count = 0;
        for record in reader.records() {
            let record = record.unwrap();
            assert_eq!(record.len(), 6);
            assert_eq!(record.get(0), Some("jms"));
            for value in record.iter().skip(1) {
                value.parse::<u32>().unwrap();
            }
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn test_write_results_to_disk() {
        let (objectives, population) = populated();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        write_results(&path, "jms", &objectives, &population).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("groupname,"));
        assert_eq!(contents.lines().count(), 3);
    }
}
