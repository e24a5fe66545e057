use crate::evaluation::Snapshot;
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;

pub enum CurveFormat {
    Csv,
    Tsv,
    Json,
}

pub struct LearningCurve {
    entries: Vec<Snapshot>,
}

impl LearningCurve {
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    /// Writes the curve to `path`. Delimited formats carry the headline
    /// columns only; JSON keeps the extra metrics as well.
    pub fn export<P: AsRef<Path>>(&self, path: P, fmt: CurveFormat) -> Result<(), Error> {
        match fmt {
            CurveFormat::Csv => self.export_with_delimiter(path, ','),
            CurveFormat::Tsv => self.export_with_delimiter(path, '\t'),
            CurveFormat::Json => self.export_json(path),
        }
    }

    fn export_with_delimiter<P: AsRef<Path>>(&self, path: P, delimiter: char) -> Result<(), Error> {
        let mut w = File::create(path)?;
        writeln!(
            w,
            "instances_seen{d}subset_accuracy{d}hamming_score{d}seconds",
            d = delimiter
        )?;
        for s in &self.entries {
            writeln!(
                w,
                "{}{d}{:.12}{d}{:.12}{d}{:.6}",
                s.instances_seen,
                s.subset_accuracy,
                s.hamming_score,
                s.seconds,
                d = delimiter
            )?;
        }
        Ok(())
    }

    fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let w = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(w, &self.entries)?;
        Ok(())
    }
}

impl Default for LearningCurve {
    fn default() -> Self {
        Self { entries: vec![] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::NamedTempFile;

    fn snap(seen: u64, subset: f64, hamming: f64, secs: f64) -> Snapshot {
        Snapshot {
            instances_seen: seen,
            subset_accuracy: subset,
            hamming_score: hamming,
            seconds: secs,
            extras: BTreeMap::new(),
        }
    }

    #[test]
    fn default_is_empty_and_latest_none() {
        let lc = LearningCurve::default();
        assert_eq!(lc.len(), 0);
        assert!(lc.latest().is_none());
    }

    #[test]
    fn push_increases_len_and_latest_returns_newest() {
        let mut lc = LearningCurve::default();
        lc.push(snap(10, 1.0, 0.5, 2.5));
        assert_eq!(lc.len(), 1);
        let last = lc.latest().unwrap();
        assert_eq!(last.instances_seen, 10);
        assert_eq!(last.subset_accuracy, 1.0);
        assert_eq!(last.hamming_score, 0.5);
        assert_eq!(last.seconds, 2.5);

        lc.push(snap(20, 0.25, 0.0, 3.0));
        assert_eq!(lc.len(), 2);
        let last = lc.latest().unwrap();
        assert_eq!(last.instances_seen, 20);
        assert_eq!(last.subset_accuracy, 0.25);
        assert_eq!(last.hamming_score, 0.0);
        assert_eq!(last.seconds, 3.0);
    }

    #[test]
    fn export_csv_with_two_rows() {
        let mut lc = LearningCurve::default();
        lc.push(snap(10, 1.0, 0.5, 2.5));
        lc.push(snap(20, 0.25, 0.0, 3.0));

        let tf = NamedTempFile::new().unwrap();
        lc.export(tf.path(), CurveFormat::Csv).unwrap();

        let got = fs::read_to_string(tf.path()).unwrap();
        let exp = "\
instances_seen,subset_accuracy,hamming_score,seconds
10,1.000000000000,0.500000000000,2.500000
20,0.250000000000,0.000000000000,3.000000
";
        assert_eq!(got, exp);
    }

    #[test]
    fn export_tsv_with_two_rows() {
        let mut lc = LearningCurve::default();
        lc.push(snap(10, 1.0, 0.5, 2.5));

        let tf = NamedTempFile::new().unwrap();
        lc.export(tf.path(), CurveFormat::Tsv).unwrap();

        let got = fs::read_to_string(tf.path()).unwrap();
        let exp = "\
instances_seen\tsubset_accuracy\thamming_score\tseconds
10\t1.000000000000\t0.500000000000\t2.500000
";
        assert_eq!(got, exp);
    }

    #[test]
    fn export_json_keeps_extra_metrics() {
        let mut lc = LearningCurve::default();
        let mut entry = snap(10, 1.0, 0.5, 2.5);
        entry
            .extras
            .insert("Micro-Averaged Precision".into(), 0.75);
        lc.push(entry);

        let tf = NamedTempFile::new().unwrap();
        lc.export(tf.path(), CurveFormat::Json).unwrap();

        let got = fs::read_to_string(tf.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&got).unwrap();
        assert_eq!(parsed[0]["instances_seen"], 10);
        assert_eq!(parsed[0]["subset_accuracy"], 1.0);
        assert_eq!(parsed[0]["extras"]["Micro-Averaged Precision"], 0.75);
    }

    #[test]
    fn export_empty_curves() {
        let lc = LearningCurve::default();

        let tf_csv = NamedTempFile::new().unwrap();
        lc.export(tf_csv.path(), CurveFormat::Csv).unwrap();
        let got_csv = fs::read_to_string(tf_csv.path()).unwrap();
        assert_eq!(got_csv, "instances_seen,subset_accuracy,hamming_score,seconds\n");

        let tf_json = NamedTempFile::new().unwrap();
        lc.export(tf_json.path(), CurveFormat::Json).unwrap();
        let got_json = fs::read_to_string(tf_json.path()).unwrap();
        assert_eq!(got_json.trim(), "[]");
    }
}
