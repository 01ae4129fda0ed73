use model::models::{Announcement, Promo, PromoQualifier, UserRecord};
use model::pagination::{Page, PageRequest, PerPageParam};

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> ApiClient<T> {
    /// The announcement board. This endpoint spells its page size `perPage`.
    pub async fn announcements(&self, request: PageRequest) -> ApiResult<Page<Announcement>> {
        self.page("announcements", request, PerPageParam::Camel, Vec::new())
            .await
    }

    /// Admin users table, optionally filtered by a username search.
    pub async fn users(
        &self,
        request: PageRequest,
        search: Option<&str>,
    ) -> ApiResult<Page<UserRecord>> {
        let extra = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| vec![("search".to_string(), s.to_string())])
            .unwrap_or_default();
        self.page("admin/users", request, PerPageParam::Snake, extra)
            .await
    }

    pub async fn promos(&self) -> ApiResult<Vec<Promo>> {
        self.call_data(ApiRequest::get("promos")).await
    }

    pub async fn promo_qualifiers(
        &self,
        promo_id: u64,
        request: PageRequest,
    ) -> ApiResult<Page<PromoQualifier>> {
        self.page(
            &format!("promos/{promo_id}/qualifiers"),
            request,
            PerPageParam::Snake,
            Vec::new(),
        )
        .await
    }

    /// Every qualifier of a promo, walking the pages, for CSV export.
    ///
    /// Pages are requested in order up to the `last_page` reported by the
    /// first response. A response for a page other than the one requested is
    /// a decode error.
    pub async fn all_promo_qualifiers(
        &self,
        promo_id: u64,
        per_page: u32,
    ) -> ApiResult<Vec<PromoQualifier>> {
        let mut request = PageRequest::first(per_page);
        let mut rows = Vec::new();
        let mut last_page = None;
        loop {
            let page = self.promo_qualifiers(promo_id, request).await?;
            if page.current_page != request.page {
                return Err(ApiError::Decode(format!(
                    "asked for page {} of promo {promo_id} qualifiers, got page {}",
                    request.page, page.current_page
                )));
            }
            let last = *last_page.get_or_insert(page.last_page);
            let done = page.is_empty() || request.page >= last;
            rows.extend(page.data);
            if done {
                break;
            }
            request = request.with_page(request.page + 1);
        }
        Ok(rows)
    }
}
