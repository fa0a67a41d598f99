use turnout_config::PAGE_SIZE_BUCKETS;

/// A normalized page request: `page >= 1` and a page size that is always one of the buckets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageRequest {
	page: u32,
	page_size: u32,
}
impl PageRequest {
	pub fn new(page: Option<i64>, page_size: Option<i64>, default_page_size: u32) -> Self {
		let page = page.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32;
		let page_size = match page_size {
			Some(requested) => clamp_page_size(requested),
			None => clamp_page_size(i64::from(default_page_size)),
		};

		Self { page, page_size }
	}

	pub fn page(&self) -> u32 {
		self.page
	}

	pub fn page_size(&self) -> u32 {
		self.page_size
	}

	pub fn offset(&self) -> i64 {
		i64::from(self.page - 1) * i64::from(self.page_size)
	}

	/// Rows to fetch: one more than the page so the extra row can answer "is there more".
	pub fn fetch_limit(&self) -> i64 {
		i64::from(self.page_size) + 1
	}

	/// Splits an over-fetched row set into the page and the has-more flag.
	pub fn split_overfetch<T>(&self, mut rows: Vec<T>) -> (Vec<T>, bool) {
		let page_size = self.page_size as usize;
		let has_more = rows.len() > page_size;

		rows.truncate(page_size);

		(rows, has_more)
	}
}

/// Snaps a requested page size onto the bucket set: bucket values pass through, anything else
/// moves to `10` below 10, `25` below 25, and `50` otherwise.
pub fn clamp_page_size(requested: i64) -> u32 {
	if let Some(bucket) = PAGE_SIZE_BUCKETS.iter().find(|bucket| i64::from(**bucket) == requested) {
		return *bucket;
	}

	if requested < 10 {
		10
	} else if requested < 25 {
		25
	} else {
		50
	}
}
