use crate::domain::model::{Review, ReviewPage};
use crate::domain::ports::ReviewTransport;
use crate::utils::error::{FetchError, Result};
use crate::utils::validation;

pub const PAGE_SIZE: u32 = 100;
pub const DEFAULT_REVIEW_CAP: usize = 300;

/// Sequentially pulls review pages for one business unit, bounded by a review cap.
pub struct PaginationController<'a, T: ReviewTransport> {
    transport: &'a T,
    review_cap: usize,
}

/// A review cap must be a positive whole number of pages.
pub fn check_review_cap(field_name: &str, review_cap: usize) -> Result<usize> {
    let page_size = PAGE_SIZE as usize;
    validation::validate_positive_number(field_name, review_cap, page_size)?;
    validation::validate_multiple_of(field_name, review_cap, page_size)?;
    Ok(review_cap)
}

impl<'a, T: ReviewTransport> PaginationController<'a, T> {
    pub fn new(transport: &'a T, review_cap: usize) -> Result<Self> {
        Ok(Self {
            transport,
            review_cap: check_review_cap("review_cap", review_cap)?,
        })
    }

    /// Number of pages to request, decided once before any fetch.
    ///
    /// Above the cap this is a fixed `cap / PAGE_SIZE`, however large the reported total.
    pub fn page_count(&self, total_review_count: u64) -> u32 {
        let page_size = u64::from(PAGE_SIZE);
        if total_review_count > self.review_cap as u64 {
            (self.review_cap as u64 / page_size) as u32
        } else {
            total_review_count.div_ceil(page_size) as u32
        }
    }

    /// Fetches every page in order and concatenates their reviews.
    ///
    /// The first failing page aborts the retrieval and its error is returned as is.
    /// A unit reporting zero reviews issues no requests at all.
    pub async fn fetch_reviews(
        &self,
        business_unit_id: &str,
        total_review_count: u64,
    ) -> std::result::Result<Vec<Review>, FetchError> {
        let pages = self.page_count(total_review_count);
        tracing::debug!(
            "Fetching {} page(s) for business unit {} ({} reviews reported, cap {})",
            pages,
            business_unit_id,
            total_review_count,
            self.review_cap
        );

        let mut reviews = Vec::new();
        let mut page_index = 1;
        while page_index <= pages {
            let page = self.fetch_page(business_unit_id, page_index).await?;
            tracing::debug!(
                "Page {}/{} returned {} review(s)",
                page.page_index,
                pages,
                page.reviews.len()
            );
            reviews.extend(page.reviews);
            page_index += 1;
        }

        Ok(reviews)
    }

    async fn fetch_page(
        &self,
        business_unit_id: &str,
        page_index: u32,
    ) -> std::result::Result<ReviewPage, FetchError> {
        let reviews = self
            .transport
            .fetch_review_page(business_unit_id, page_index, PAGE_SIZE)
            .await
            .inspect_err(|e| tracing::warn!("Page {} failed: {}", page_index, e))?;

        Ok(ReviewPage {
            page_index,
            reviews,
        })
    }
}
