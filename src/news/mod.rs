// News: latest headlines mentioning the company.

pub mod fetcher;
pub mod traits;

pub use fetcher::NewsApiClient;
pub use traits::NewsSource;
