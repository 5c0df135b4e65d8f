//! Module containing the run report types

/// A single URL entry inside a [`RunReport`]
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
	/// The URL as it was requested
	pub url:   String,
	/// The title that was found for the URL
	pub title: String,
}

impl ReportEntry {
	/// Create a new instance of [`ReportEntry`]
	pub fn new<U: Into<String>, T: Into<String>>(url: U, title: T) -> Self {
		return Self {
			url:   url.into(),
			title: title.into(),
		};
	}
}

/// Aggregated outcome of a full run, where every processed URL ends up in exactly one list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunReport {
	/// URLs that have been downloaded and moved successfully
	success: Vec<ReportEntry>,
	/// URLs that failed to download
	failed:  Vec<ReportEntry>,
	/// URLs that were skipped because they were already downloaded
	skipped: Vec<ReportEntry>,
}

impl RunReport {
	/// Create a new empty instance
	#[must_use]
	pub fn new() -> Self {
		return Self::default();
	}

	/// Record a URL as successfully downloaded
	pub fn record_success(&mut self, entry: ReportEntry) {
		self.success.push(entry);
	}

	/// Record a URL as failed
	pub fn record_failed(&mut self, entry: ReportEntry) {
		self.failed.push(entry);
	}

	/// Record a URL as skipped (already downloaded)
	pub fn record_skipped(&mut self, entry: ReportEntry) {
		self.skipped.push(entry);
	}

	/// Get all successful entries
	#[must_use]
	pub fn success(&self) -> &[ReportEntry] {
		return &self.success;
	}

	/// Get all failed entries
	#[must_use]
	pub fn failed(&self) -> &[ReportEntry] {
		return &self.failed;
	}

	/// Get all skipped entries
	#[must_use]
	pub fn skipped(&self) -> &[ReportEntry] {
		return &self.skipped;
	}

	/// Get whether any URL has failed
	#[must_use]
	pub fn has_failures(&self) -> bool {
		return !self.failed.is_empty();
	}

	/// Get how many URLs have been recorded in total
	#[must_use]
	pub fn total(&self) -> usize {
		return self.success.len() + self.failed.len() + self.skipped.len();
	}
}
