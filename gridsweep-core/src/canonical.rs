//! Order-independent comparison of solver result files.
//!
//! Solvers may emit their records in any order (the reference solver walks a
//! hash map), so outputs are compared after a full-line lexicographic sort.
//! Comparison is exact: a differently formatted distance is a mismatch.

use std::{cmp::Ordering, fmt, fs, io, path::Path};

/// Lines of a result file in sorted order.
///
/// # Examples
/// ```
/// use gridsweep_core::{CanonicalOutput, verify};
///
/// let baseline = CanonicalOutput::from_lines(["1 0 1", "0 0 0"]);
/// let candidate = CanonicalOutput::from_lines(["0 0 0", "1 0 1"]);
/// assert!(verify(&candidate, &baseline));
/// assert_eq!(baseline.render(), "0 0 0\n1 0 1\n");
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct CanonicalOutput {
    lines: Vec<String>,
}

impl CanonicalOutput {
    /// Sorts `lines` into canonical order.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sorted: Vec<String> = lines.into_iter().map(Into::into).collect();
        sorted.sort_unstable();
        Self { lines: sorted }
    }

    /// Canonicalises the lines of `text`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    /// Returns the sorted lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of result records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` when there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Renders the canonical file contents; every line is newline terminated.
    #[must_use]
    pub fn render(&self) -> String {
        let capacity = self
            .lines
            .iter()
            .map(|line| line.len().saturating_add(1))
            .sum();
        let mut text = String::with_capacity(capacity);
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    /// Overwrites `path` with the canonical form.
    ///
    /// # Errors
    /// Returns any error raised while writing the file.
    pub fn persist(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.render())
    }
}

/// Reads `path`, rewrites it in canonical form and returns the result.
///
/// Canonicalising a file that is already canonical leaves it unchanged.
///
/// # Errors
/// Returns any error raised while reading or writing the file.
pub fn canonicalize_file(path: &Path) -> io::Result<CanonicalOutput> {
    let canonical = CanonicalOutput::parse(&fs::read_to_string(path)?);
    canonical.persist(path)?;
    Ok(canonical)
}

/// Returns `true` when `candidate` holds exactly the baseline's records.
#[must_use]
pub fn verify(candidate: &CanonicalOutput, baseline: &CanonicalOutput) -> bool {
    candidate == baseline
}

/// Line-level differences between a candidate and the baseline.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LineDiff {
    /// Baseline records absent from the candidate.
    pub missing: usize,
    /// Candidate records absent from the baseline.
    pub unexpected: usize,
    /// Smallest missing record.
    pub first_missing: Option<String>,
    /// Smallest unexpected record.
    pub first_unexpected: Option<String>,
}

impl LineDiff {
    /// Returns `true` when the outputs agree.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.missing == 0 && self.unexpected == 0
    }

    fn record_missing(&mut self, line: &str) {
        self.missing = self.missing.saturating_add(1);
        self.first_missing.get_or_insert_with(|| line.to_owned());
    }

    fn record_unexpected(&mut self, line: &str) {
        self.unexpected = self.unexpected.saturating_add(1);
        self.first_unexpected.get_or_insert_with(|| line.to_owned());
    }
}

impl fmt::Display for LineDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} missing, {} unexpected line(s)",
            self.missing, self.unexpected
        )?;
        if let Some(line) = &self.first_missing {
            write!(f, "; first missing `{line}`")?;
        }
        if let Some(line) = &self.first_unexpected {
            write!(f, "; first unexpected `{line}`")?;
        }
        Ok(())
    }
}

/// Walks both sorted outputs and counts the records each lacks.
#[must_use]
pub fn diff(candidate: &CanonicalOutput, baseline: &CanonicalOutput) -> LineDiff {
    let mut report = LineDiff::default();
    let mut expected = baseline.lines.iter().peekable();
    let mut actual = candidate.lines.iter().peekable();
    loop {
        match (expected.peek().copied(), actual.peek().copied()) {
            (None, None) => break,
            (Some(line), None) => {
                report.record_missing(line);
                expected.next();
            }
            (None, Some(line)) => {
                report.record_unexpected(line);
                actual.next();
            }
            (Some(want), Some(got)) => match want.cmp(got) {
                Ordering::Equal => {
                    expected.next();
                    actual.next();
                }
                Ordering::Less => {
                    report.record_missing(want);
                    expected.next();
                }
                Ordering::Greater => {
                    report.record_unexpected(got);
                    actual.next();
                }
            },
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    fn canonicalize_file_sorts_in_place() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("output.txt");
        fs::write(&path, "2 2 4\n0 0 0\n1 0 1").expect("write output");

        let canonical = canonicalize_file(&path).expect("canonicalise");
        assert_eq!(canonical.lines(), ["0 0 0", "1 0 1", "2 2 4"]);
        assert_eq!(
            fs::read_to_string(&path).expect("read back"),
            "0 0 0\n1 0 1\n2 2 4\n"
        );
    }

    #[rstest]
    fn canonicalize_file_is_idempotent_on_disk() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("output.txt");
        fs::write(&path, "b\na\nc\na\n").expect("write output");

        let first = canonicalize_file(&path).expect("first pass");
        let bytes = fs::read(&path).expect("read back");
        let second = canonicalize_file(&path).expect("second pass");
        assert_eq!(first, second);
        assert_eq!(fs::read(&path).expect("read again"), bytes);
    }

    #[rstest]
    fn canonicalize_file_reports_missing_file() {
        let dir = TempDir::new().expect("temp dir");
        let err = canonicalize_file(&dir.path().join("absent.txt"))
            .expect_err("missing file must fail");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    #[case::reordered(&["0 0 0", "1 0 1"], &["1 0 1", "0 0 0"], true)]
    #[case::removed_line(&["0 0 0", "1 0 1"], &["0 0 0"], false)]
    #[case::extra_line(&["0 0 0"], &["0 0 0", "0 1 1"], false)]
    #[case::formatting(&["1 0 1"], &["1 0 1.0"], false)]
    #[case::duplicate(&["1 0 1"], &["1 0 1", "1 0 1"], false)]
    #[case::both_empty(&[], &[], true)]
    fn verify_requires_exact_line_multiset(
        #[case] baseline: &[&str],
        #[case] candidate: &[&str],
        #[case] expected: bool,
    ) {
        let baseline = CanonicalOutput::from_lines(baseline.iter().copied());
        let candidate = CanonicalOutput::from_lines(candidate.iter().copied());
        assert_eq!(verify(&candidate, &baseline), expected);
        assert_eq!(diff(&candidate, &baseline).is_empty(), expected);
    }

    #[rstest]
    fn diff_names_first_differences() {
        let baseline = CanonicalOutput::from_lines(["0 0 0", "1 0 1", "2 0 2"]);
        let candidate = CanonicalOutput::from_lines(["0 0 0", "2 0 2.5", "2 0 2"]);
        let report = diff(&candidate, &baseline);
        assert_eq!(report.missing, 1);
        assert_eq!(report.unexpected, 1);
        assert_eq!(report.first_missing.as_deref(), Some("1 0 1"));
        assert_eq!(report.first_unexpected.as_deref(), Some("2 0 2.5"));
        assert_eq!(
            report.to_string(),
            "1 missing, 1 unexpected line(s); first missing `1 0 1`; first unexpected `2 0 2.5`"
        );
    }

    proptest! {
        #[test]
        fn canonicalisation_is_idempotent(lines in prop::collection::vec("[0-9 .]{0,12}", 0..32)) {
            let once = CanonicalOutput::from_lines(lines.iter().cloned());
            let twice = CanonicalOutput::parse(&once.render());
            prop_assert_eq!(&once, &twice);
        }

        #[test]
        fn canonicalisation_ignores_order(mut lines in prop::collection::vec("[0-9 ]{1,8}", 0..32)) {
            let forward = CanonicalOutput::from_lines(lines.iter().cloned());
            lines.reverse();
            let backward = CanonicalOutput::from_lines(lines);
            prop_assert!(verify(&forward, &backward));
        }
    }
}
