use crate::model::Article;

/// A news source never fails its caller: "no news" and "news fetch failed"
/// both come back as an empty list.
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_top_articles(&self, company_name: &str, limit: usize) -> Vec<Article>;
}
